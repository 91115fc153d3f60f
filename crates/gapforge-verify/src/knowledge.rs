use std::future::Future;

use gapforge_core::Result;

/// A knowledge-base record for a looked-up label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KbEntity {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    /// Class identifiers the entity is an instance of.
    pub instance_of: Vec<String>,
}

/// Lookup keyed by entity label.
pub trait KnowledgeBase: Send + Sync {
    fn name(&self) -> &str;

    /// Best match for `label`, or `None` when the knowledge base has nothing.
    fn lookup(&self, label: &str) -> impl Future<Output = Result<Option<KbEntity>>> + Send;
}
