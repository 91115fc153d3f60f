//! Level 1: relations read off the parsed clause structure.

use std::collections::HashSet;

use gapforge_core::{Edge, EdgeSource};

use crate::document::AnalyzedSentence;
use crate::nlp::Argument;

use super::{pair_key, PairKey};

struct Occurrence {
    from: u64,
    to: u64,
    label: String,
    reason: String,
}

/// Dependency edges for one sentence and the node pairs they claim.
///
/// When one pair is linked by several clauses of the sentence, the most
/// frequent label wins and ties go to the label seen first.
pub fn extract(sentence: &AnalyzedSentence, weight: f64) -> (Vec<Edge>, HashSet<PairKey>) {
    let mut occurrences: Vec<Occurrence> = Vec::new();

    for clause in &sentence.clauses {
        let mut record = |from: usize, to: usize, argument: Option<&Argument>, reason: String| {
            let from = sentence.node_ids[from];
            let to = sentence.node_ids[to];
            if from == to {
                return;
            }
            occurrences.push(Occurrence {
                from,
                to,
                label: clause.relation_label(argument),
                reason,
            });
        };
        let text = |mention: usize| sentence.mentions[mention].text.as_str();

        if clause.passive {
            for &agent in &clause.agents {
                for &patient in &clause.subjects {
                    let reason = format!(
                        "'{}' by {} (agent) on {} (patient)",
                        clause.verb,
                        text(agent),
                        text(patient)
                    );
                    record(agent, patient, None, reason);
                }
            }
        } else {
            for &subject in &clause.subjects {
                for argument in &clause.objects {
                    let role = match &argument.preposition {
                        Some(prep) => format!("object of '{prep}'"),
                        None if clause.verb == "be" => "attribute".to_string(),
                        None => "direct object".to_string(),
                    };
                    let reason = format!(
                        "'{}' links {} (subject) to {} ({role})",
                        clause.verb,
                        text(subject),
                        text(argument.mention)
                    );
                    record(subject, argument.mention, Some(argument), reason);
                }
            }
        }
    }

    // Group by unordered pair, keeping first-seen order of pairs and labels.
    let mut pairs: Vec<(PairKey, Vec<(usize, usize)>)> = Vec::new();
    for (i, occ) in occurrences.iter().enumerate() {
        let key = pair_key(occ.from, occ.to);
        let slot = match pairs.iter().position(|(k, _)| *k == key) {
            Some(slot) => slot,
            None => {
                pairs.push((key, Vec::new()));
                pairs.len() - 1
            }
        };
        let labels = &mut pairs[slot].1;
        match labels
            .iter_mut()
            .find(|(first, _)| occurrences[*first].label == occ.label)
        {
            Some((_, count)) => *count += 1,
            None => labels.push((i, 1)),
        }
    }

    let mut claimed = HashSet::new();
    let edges = pairs
        .into_iter()
        .map(|(key, labels)| {
            let mut winner = labels[0];
            for &candidate in &labels[1..] {
                if candidate.1 > winner.1 {
                    winner = candidate;
                }
            }
            claimed.insert(key);
            let occ = &occurrences[winner.0];
            Edge {
                from: occ.from,
                to: occ.to,
                label: occ.label.clone(),
                source: EdgeSource::Dependency,
                context: sentence.text.clone(),
                reason: occ.reason.clone(),
                weight,
            }
        })
        .collect();
    (edges, claimed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::analyze;

    #[test]
    fn test_scenario_sentence() {
        let doc = analyze("Alice works at Acme Corp.");
        let (edges, claimed) = extract(&doc[0], 0.9);
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].from, edges[0].to), (1, 2));
        assert_eq!(edges[0].label, "works_at");
        assert_eq!(edges[0].weight, 0.9);
        assert_eq!(edges[0].reason, "'work' links Alice (subject) to Acme Corp (object of 'at')");
        assert!(claimed.contains(&pair_key(2, 1)));
    }

    #[test]
    fn test_passive_agent_direction() {
        let doc = analyze("Beta Labs was acquired by Acme Corp.");
        let (edges, _) = extract(&doc[0], 0.9);
        assert_eq!((edges[0].from, edges[0].to), (2, 1));
        assert_eq!(edges[0].label, "acquires");
        assert_eq!(edges[0].reason, "'acquire' by Acme Corp (agent) on Beta Labs (patient)");
    }

    #[test]
    fn test_one_edge_per_pair_per_sentence() {
        let doc = analyze("Acme Corp acquired Beta Labs, which later acquired Acme Corp.");
        let (edges, _) = extract(&doc[0], 0.9);
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].from, edges[0].to), (1, 2));
    }
}
