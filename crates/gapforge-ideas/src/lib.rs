//! GapForge Ideas — bridging research ideas for a knowledge gap.
//!
//! Calls go to an external chat-completion provider (OpenAI, Anthropic or
//! Groq); no local model is required.

pub mod client;
pub mod config;
pub mod generator;
pub mod parse;
pub mod prompt;
pub mod types;

pub use client::{unconfigured, ChatClient, GenerativeService};
pub use config::{LLMConfig, ResolvedProvider};
pub use generator::IdeaGenerator;
pub use types::*;
