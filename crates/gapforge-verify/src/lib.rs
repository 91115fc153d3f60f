//! GapForge Verify — suggests entity types from a structured knowledge base.
//!
//! Results are advisory: nothing here mutates a graph.

pub mod knowledge;
pub mod mapping;
pub mod verifier;
pub mod wikidata;

pub use knowledge::{KbEntity, KnowledgeBase};
pub use verifier::EntityVerifier;
pub use wikidata::WikidataClient;
