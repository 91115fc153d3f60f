//! The three relation levels: dependency, pattern and semantic.

pub mod dependency;
pub mod patterns;
pub mod semantic;

pub use patterns::Catalogue;
pub use semantic::SemanticOutcome;

/// Unordered node pair.
pub type PairKey = (u64, u64);

pub fn pair_key(a: u64, b: u64) -> PairKey {
    (a.min(b), a.max(b))
}
