//! GapForge HTTP surface: extraction, gap analysis, ideas and verification.

pub mod error;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
