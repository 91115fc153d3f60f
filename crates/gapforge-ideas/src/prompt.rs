//! Prompt construction for bridging ideas.

use gapforge_core::Gap;

use crate::types::ChatMessage;

const SYSTEM_PROMPT: &str = "You are a research strategist who proposes novel studies that connect \
separate bodies of knowledge. Answer with JSON only.";

/// System and user messages asking for exactly `count` ideas for `gap`.
pub fn build_messages(gap: &Gap, count: usize) -> Vec<ChatMessage> {
    let mut user = String::new();
    user.push_str(&format!("Knowledge gap: {}\n", gap.title));
    if !gap.description.is_empty() {
        user.push_str(&format!("Description: {}\n", gap.description));
    }
    user.push_str(&format!("Significance: {}\n", gap.significance));
    user.push_str(&format!(
        "Semantic distance between the clusters: {:.2} (0 = identical, 1 = unrelated)\n",
        gap.semantic_distance
    ));
    user.push_str(&format!("Cluster 1 concepts: {}\n", gap.cluster_1_keywords.join(", ")));
    user.push_str(&format!("Cluster 2 concepts: {}\n", gap.cluster_2_keywords.join(", ")));
    if !gap.bridge_suggestion.is_empty() {
        user.push_str(&format!("Starting question: {}\n", gap.bridge_suggestion));
    }
    user.push_str(&format!(
        "\nPropose exactly {count} research ideas that bridge the two clusters. \
Return a JSON array of {count} objects with the string fields \
\"bridging_question\", \"novelty\", \"methodology\" and \"impact\" \
(impact is one of \"High\", \"Medium\", \"Low\"). Order them from most to least novel."
    ));

    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
}
