//! Parsing of model output into ideas.

use gapforge_core::{Error, Idea, IdeaConfig, Impact, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RawIdea {
    #[serde(default, alias = "bridgingQuestion", alias = "question")]
    bridging_question: String,
    #[serde(default)]
    novelty: String,
    #[serde(default)]
    methodology: String,
    #[serde(default)]
    impact: String,
}

/// Strip a surrounding markdown code fence, if any.
fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string (`json`) on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Locate the JSON payload: the whole text, or the outermost array/object in it.
fn find_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (text.find(open), text.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str(&text[start..=end]) {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Parse exactly `config.count` ideas, assigning rank-based novelty scores.
pub fn parse_ideas(raw: &str, config: &IdeaConfig, semantic_distance: f64) -> Result<Vec<Idea>> {
    let value = find_json(strip_fence(raw))
        .ok_or_else(|| Error::parse("Model output is not JSON", raw))?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("ideas") {
            Some(Value::Array(items)) => items,
            _ => return Err(Error::parse("Model output has no \"ideas\" array", raw)),
        },
        _ => return Err(Error::parse("Model output is neither an array nor an object", raw)),
    };

    let mut ideas = Vec::with_capacity(config.count);
    for item in items {
        let Ok(idea) = serde_json::from_value::<RawIdea>(item) else {
            continue;
        };
        if idea.bridging_question.trim().is_empty() {
            continue;
        }
        let impact = Impact::parse(&idea.impact).unwrap_or_else(|| {
            warn!("Unknown impact '{}'; using Medium", idea.impact);
            Impact::Medium
        });
        let rank = ideas.len();
        ideas.push(Idea {
            bridging_question: idea.bridging_question.trim().to_string(),
            novelty: idea.novelty.trim().to_string(),
            methodology: idea.methodology.trim().to_string(),
            impact,
            novelty_score: config.novelty_score(rank),
            semantic_distance,
        });
        if ideas.len() == config.count {
            break;
        }
    }

    if ideas.len() < config.count {
        return Err(Error::parse(
            format!("Expected {} ideas, model returned {} usable", config.count, ideas.len()),
            raw,
        ));
    }
    Ok(ideas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ideas_json(n: usize) -> String {
        let items: Vec<Value> = (0..n)
            .map(|i| {
                serde_json::json!({
                    "bridging_question": format!("Question {i}?"),
                    "novelty": "new",
                    "methodology": "survey",
                    "impact": if i == 0 { "HIGH" } else { "low" },
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    #[test]
    fn test_rank_based_novelty() {
        let ideas = parse_ideas(&ideas_json(5), &IdeaConfig::default(), 0.42).unwrap();
        let scores: Vec<u8> = ideas.iter().map(|i| i.novelty_score).collect();
        assert_eq!(scores, vec![85, 80, 75, 70, 70]);
        assert_eq!(ideas[0].impact, Impact::High);
        assert!(ideas.iter().all(|i| i.semantic_distance == 0.42));
    }

    #[test]
    fn test_fenced_and_wrapped_output() {
        let fenced = format!("```json\n{{\"ideas\": {}}}\n```", ideas_json(6));
        let ideas = parse_ideas(&fenced, &IdeaConfig::default(), 0.5).unwrap();
        assert_eq!(ideas.len(), 5);

        let chatty = format!("Here are your ideas:\n{}\nGood luck!", ideas_json(5));
        assert_eq!(parse_ideas(&chatty, &IdeaConfig::default(), 0.5).unwrap().len(), 5);
    }

    #[test]
    fn test_too_few_ideas_is_parse_error() {
        match parse_ideas(&ideas_json(3), &IdeaConfig::default(), 0.5) {
            Err(Error::Parse { message, excerpt }) => {
                assert!(message.contains("Expected 5"));
                assert!(excerpt.starts_with('['));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_garbage_excerpt_is_bounded() {
        let garbage = "no json here ".repeat(100);
        match parse_ideas(&garbage, &IdeaConfig::default(), 0.5) {
            Err(Error::Parse { excerpt, .. }) => assert!(excerpt.chars().count() <= 301),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_impact_defaults_to_medium() {
        let raw = r#"[{"bridgingQuestion": "Why?", "novelty": "n", "methodology": "m", "impact": "enormous"}]"#;
        let config = IdeaConfig {
            count: 1,
            ..Default::default()
        };
        let ideas = parse_ideas(raw, &config, 0.1).unwrap();
        assert_eq!(ideas[0].impact, Impact::Medium);
        assert_eq!(ideas[0].bridging_question, "Why?");
    }
}
