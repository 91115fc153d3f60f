//! Level 2: versioned catalogue of lexical and positional patterns.
//!
//! Patterns run in catalogue order. A node pair claimed by the dependency
//! level in the same sentence, or by an earlier pattern, is never matched
//! again, which makes the earlier pattern win on overlap.

use std::collections::HashSet;

use gapforge_core::{EntityType, Edge, EdgeSource, Error, Result};

use crate::document::AnalyzedSentence;
use crate::nlp::Mention;

use super::{pair_key, PairKey};

use EntityType::*;

#[derive(Debug, Clone, Copy)]
enum Rule {
    /// `from` … cue … `to` within `max_gap` tokens. With `passive`, also
    /// `to` … cue … `by` … `from`.
    Cue {
        from: &'static [EntityType],
        to: &'static [EntityType],
        cues: &'static [&'static str],
        max_gap: usize,
        passive: bool,
    },
    /// `from` immediately followed by `,` and `to`.
    Appositive {
        from: &'static [EntityType],
        to: &'static [EntityType],
    },
    /// `from` and a DATE whose starts lie fewer than `window` tokens apart.
    Temporal {
        from: &'static [EntityType],
        window: usize,
    },
    /// `from` followed within `window` tokens by a temporal preposition and a DATE.
    Dated {
        from: &'static [EntityType],
        preps: &'static [&'static str],
        window: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Pattern {
    name: &'static str,
    label: &'static str,
    rule: Rule,
}

const CATALOGUE_V1: &[Pattern] = &[
    Pattern {
        name: "founded",
        label: "founded",
        rule: Rule::Cue {
            from: &[Person, Org],
            to: &[Org, Product],
            cues: &[
                "founded", "co-founded", "cofounded", "established", "started", "created",
                "launched", "founder", "co-founder", "cofounder", "founders",
            ],
            max_gap: 8,
            passive: true,
        },
    },
    Pattern {
        name: "employment",
        label: "works_at",
        rule: Rule::Cue {
            from: &[Person],
            to: &[Org],
            cues: &[
                "works", "work", "worked", "working", "employed", "employee", "joined", "joins",
                "ceo", "cto", "cfo", "director", "engineer", "researcher", "scientist",
                "professor", "president", "chairman", "manager", "leads", "led", "heads", "headed",
            ],
            max_gap: 8,
            passive: false,
        },
    },
    Pattern {
        name: "location",
        label: "located_in",
        rule: Rule::Cue {
            from: &[Person, Org, Fac, Event],
            to: &[Gpe, Loc, Fac],
            cues: &["in", "at", "near", "based", "located", "headquartered", "situated"],
            max_gap: 6,
            passive: false,
        },
    },
    Pattern {
        name: "location appositive",
        label: "located_in",
        rule: Rule::Appositive {
            from: &[Org, Fac, Gpe],
            to: &[Gpe],
        },
    },
    Pattern {
        name: "event date",
        label: "occurred_on",
        rule: Rule::Temporal {
            from: &[Event, WorkOfArt, Law],
            window: 15,
        },
    },
    Pattern {
        name: "entity date",
        label: "dated",
        rule: Rule::Dated {
            from: &[Person, Org, Product],
            preps: &["in", "on", "since", "during"],
            window: 6,
        },
    },
];

/// An ordered, versioned pattern set.
#[derive(Debug, Clone)]
pub struct Catalogue {
    version: &'static str,
    patterns: &'static [Pattern],
}

struct Match {
    from: usize,
    to: usize,
    evidence: String,
}

impl Catalogue {
    pub fn for_version(version: &str) -> Result<Self> {
        match version {
            "v1" => Ok(Self {
                version: "v1",
                patterns: CATALOGUE_V1,
            }),
            other => Err(Error::Config(format!("Unknown pattern catalogue version: {other}"))),
        }
    }

    pub fn version(&self) -> &str {
        self.version
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Apply every pattern to one sentence. `claimed` holds pairs already
    /// linked in this sentence and is extended with each new match.
    pub fn apply(&self, sentence: &AnalyzedSentence, claimed: &mut HashSet<PairKey>, weight: f64) -> Vec<Edge> {
        let mut edges = Vec::new();
        for pattern in self.patterns {
            for m in matches(&pattern.rule, sentence) {
                let from = sentence.node_ids[m.from];
                let to = sentence.node_ids[m.to];
                if from == to || !claimed.insert(pair_key(from, to)) {
                    continue;
                }
                let (a, b) = (&sentence.mentions[m.from], &sentence.mentions[m.to]);
                let start = a.start.min(b.start);
                let end = a.end.max(b.end);
                edges.push(Edge {
                    from,
                    to,
                    label: pattern.label.to_string(),
                    source: EdgeSource::Pattern,
                    context: sentence.span(start, end).to_string(),
                    reason: format!("Pattern '{}' matched {}", pattern.name, m.evidence),
                    weight,
                });
            }
        }
        edges
    }
}

fn is(mention: &Mention, types: &[EntityType]) -> bool {
    types.contains(&mention.entity_type)
}

fn matches(rule: &Rule, sentence: &AnalyzedSentence) -> Vec<Match> {
    let mentions = &sentence.mentions;
    let tokens = &sentence.tokens;
    let mut found = Vec::new();

    for (i, a) in mentions.iter().enumerate() {
        for (j, b) in mentions.iter().enumerate() {
            if i == j {
                continue;
            }
            let hit = match *rule {
                Rule::Cue { from, to, cues, max_gap, passive } => {
                    if !is(a, from) || !is(b, to) {
                        None
                    } else if a.end <= b.start && b.start - a.end <= max_gap {
                        tokens[a.end..b.start]
                            .iter()
                            .find(|t| cues.contains(&t.lower.as_str()))
                            .map(|t| format!("cue '{}'", t.lower))
                    } else if passive && b.end <= a.start && a.start - b.end <= max_gap {
                        let gap = &tokens[b.end..a.start];
                        let by_agent = gap.last().is_some_and(|t| t.lower == "by");
                        gap.iter()
                            .find(|t| cues.contains(&t.lower.as_str()))
                            .filter(|_| by_agent)
                            .map(|t| format!("passive cue '{} by'", t.lower))
                    } else {
                        None
                    }
                }
                Rule::Appositive { from, to } => (is(a, from)
                    && is(b, to)
                    && b.start == a.end + 1
                    && tokens[a.end].is_punct(","))
                .then(|| "appositive ','".to_string()),
                Rule::Temporal { from, window } => (is(a, from)
                    && b.entity_type == Date
                    && a.start.abs_diff(b.start) < window)
                    .then(|| format!("date within {window} tokens")),
                Rule::Dated { from, preps, window } => {
                    if is(a, from) && b.entity_type == Date && a.end < b.start && b.start - a.end <= window {
                        let prep = &tokens[b.start - 1];
                        preps
                            .contains(&prep.lower.as_str())
                            .then(|| format!("temporal preposition '{}'", prep.lower))
                    } else {
                        None
                    }
                }
            };
            if let Some(evidence) = hit {
                found.push(Match { from: i, to: j, evidence });
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::analyze;

    fn apply(text: &str) -> Vec<Edge> {
        let doc = analyze(text);
        let catalogue = Catalogue::for_version("v1").unwrap();
        doc.iter()
            .flat_map(|s| catalogue.apply(s, &mut HashSet::new(), 0.7))
            .collect()
    }

    #[test]
    fn test_unknown_version() {
        assert!(matches!(Catalogue::for_version("v9"), Err(Error::Config(_))));
        assert_eq!(Catalogue::for_version("v1").unwrap().len(), 6);
    }

    #[test]
    fn test_location_cue() {
        let edges = apply("Acme Corp is located in Paris.");
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].from, edges[0].to), (1, 2));
        assert_eq!(edges[0].label, "located_in");
        assert_eq!(edges[0].context, "Acme Corp is located in Paris");
        assert_eq!(edges[0].weight, 0.7);
    }

    #[test]
    fn test_priority_founded_beats_employment() {
        let edges = apply("Alice founded Acme Corp.");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].label, "founded");
    }

    #[test]
    fn test_passive_founded() {
        let edges = apply("Acme Corp was founded by Alice.");
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].from, edges[0].to), (2, 1));
        assert_eq!(edges[0].label, "founded");
    }

    #[test]
    fn test_appositive_and_dates() {
        let edges = apply("The Lyon Summit opened in Lyon, France on March 3, 2021.");
        let labels: Vec<&str> = edges.iter().map(|e| e.label.as_str()).collect();
        assert!(labels.contains(&"located_in"));
        assert!(labels.contains(&"occurred_on"));
    }

    #[test]
    fn test_claimed_pairs_are_skipped() {
        let doc = analyze("Alice works at Acme Corp.");
        let catalogue = Catalogue::for_version("v1").unwrap();
        let mut claimed: HashSet<PairKey> = [pair_key(1, 2)].into_iter().collect();
        assert!(catalogue.apply(&doc[0], &mut claimed, 0.7).is_empty());
        assert_eq!(catalogue.apply(&doc[0], &mut HashSet::new(), 0.7).len(), 1);
    }
}
