//! Rule-based named-entity recognizer.
//!
//! Candidates are date expressions and capitalized token runs. Each candidate
//! is classified by the first matching rule, which fixes both its type and
//! its confidence.

use std::collections::HashMap;

use gapforge_core::EntityType;
use once_cell::sync::Lazy;
use regex::Regex;

use super::lemma::lemmatize_verb;
use super::lexicon::{
    is_closed_class, DEMONYMS, EVENT_SUFFIXES, FAC_SUFFIXES, FIRST_NAMES, GAZETTEER,
    LAW_SUFFIXES, LOCATION_PREPOSITIONS, LOC_SUFFIXES, MONTHS, ORG_HEADS, ORG_SUFFIXES,
    SENTENCE_OPENERS, TITLES, WEEKDAYS,
};
use super::tokenize::{Token, TokenKind};

/// A typed entity mention spanning tokens `start..end` of one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct Mention {
    pub text: String,
    pub entity_type: EntityType,
    pub confidence: f64,
    pub start: usize,
    pub end: usize,
    /// Name of the recognizer rule that classified the mention.
    pub rule: &'static str,
}

const MONTH_ALT: &str = "January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec";

static FULL_DATE: Lazy<Regex> = Lazy::new(|| {
    let patterns = [
        format!(r"\b(?:{MONTH_ALT})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b"),
        format!(r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?(?:{MONTH_ALT})\.?,?\s+\d{{4}}\b"),
        format!(r"\b(?:{MONTH_ALT})\.?\s+\d{{4}}\b"),
        r"\b\d{4}-\d{1,2}-\d{1,2}\b".to_string(),
        r"\b\d{1,2}/\d{1,2}/\d{2,4}\b".to_string(),
    ];
    Regex::new(&patterns.join("|")).expect("date pattern is valid")
});

static BARE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:1[5-9]\d{2}|20\d{2})s?\b").expect("year pattern is valid"));

/// Run connectors that may sit between capitalized words (`Bank of America`).
const CONNECTORS: &[&str] = &["of", "de", "von", "van", "der", "del", "da", "la", "&"];

/// Suffixes of sentence-initial words that are usually common nouns.
const COMMON_SHAPES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ers", "ists", "ics", "ism", "ance", "ence", "ies",
    "ing", "ly", "ous", "ful", "less", "able",
];

pub struct Recognizer {
    extra: HashMap<String, EntityType>,
}

impl Recognizer {
    pub fn new(extra: HashMap<String, EntityType>) -> Self {
        let extra = extra
            .into_iter()
            .map(|(label, ty)| (label.to_lowercase(), ty))
            .collect();
        Self { extra }
    }

    pub fn gazetteer_size(&self) -> usize {
        GAZETTEER.len() + self.extra.len()
    }

    fn gazetteer(&self, lower: &str) -> Option<EntityType> {
        self.extra
            .get(lower)
            .or_else(|| GAZETTEER.get(lower))
            .copied()
    }

    /// Recognize mentions in a tokenized sentence, ordered by position.
    pub fn recognize(&self, sentence: &str, tokens: &[Token]) -> Vec<Mention> {
        let mut claimed = vec![false; tokens.len()];
        let mut mentions = Vec::new();

        for (regex, confidence, rule) in [
            (&*FULL_DATE, 0.9, "date expression"),
            (&*BARE_YEAR, 0.75, "bare year"),
        ] {
            for m in regex.find_iter(sentence) {
                let covered: Vec<usize> = (0..tokens.len())
                    .filter(|&i| tokens[i].start >= m.start() && tokens[i].end <= m.end())
                    .collect();
                let (Some(&first), Some(&last)) = (covered.first(), covered.last()) else {
                    continue;
                };
                if covered.iter().any(|&i| claimed[i]) {
                    continue;
                }
                covered.iter().for_each(|&i| claimed[i] = true);
                mentions.push(self.mention(sentence, tokens, first, last + 1, EntityType::Date, confidence, rule));
            }
        }

        let mut i = 0;
        while i < tokens.len() {
            if claimed[i] || !tokens[i].is_capitalized() {
                i += 1;
                continue;
            }

            if TITLES.contains(tokens[i].lower.as_str()) {
                let mut j = i + 1;
                if j < tokens.len() && tokens[j].is_punct(".") {
                    j += 1;
                }
                if j < tokens.len() && tokens[j].is_capitalized() && !claimed[j] {
                    let end = extend_run(tokens, &claimed, j);
                    mentions.push(self.mention(sentence, tokens, j, end, EntityType::Person, 0.9, "title prefix"));
                    i = end;
                    continue;
                }
            }

            if is_non_entity(tokens, i) {
                i += 1;
                continue;
            }

            let end = extend_run(tokens, &claimed, i);
            let (entity_type, confidence, rule) = self.classify(tokens, i, end);
            if i == 0 && end == 1 && rule == "capitalized span" && looks_common(&tokens[0].lower) {
                i = end;
                continue;
            }
            mentions.push(self.mention(sentence, tokens, i, end, entity_type, confidence, rule));
            i = end;
        }

        mentions.sort_by_key(|m| m.start);
        mentions
    }

    fn classify(&self, tokens: &[Token], start: usize, end: usize) -> (EntityType, f64, &'static str) {
        let span = &tokens[start..end];
        let first = span[0].lower.as_str();
        let last = span[span.len() - 1].lower.as_str();
        let label = span
            .iter()
            .map(|t| t.lower.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if let Some(ty) = self.gazetteer(&label) {
            return (ty, 0.9, "gazetteer");
        }
        let quoted = |t: Option<&Token>| t.is_some_and(|t| matches!(t.text.as_str(), "\"" | "“" | "”"));
        if start > 0 && quoted(tokens.get(start - 1)) && quoted(tokens.get(end)) {
            return (EntityType::WorkOfArt, 0.7, "quoted title");
        }
        let has_of = span.iter().any(|t| t.lower == "of");
        if ORG_SUFFIXES.contains(last) || (has_of && ORG_HEADS.contains(first)) {
            return (EntityType::Org, 0.85, "organisation suffix");
        }
        if span.len() > 1 || !FIRST_NAMES.contains(first) {
            if EVENT_SUFFIXES.contains(last) || (has_of && EVENT_SUFFIXES.contains(first)) {
                return (EntityType::Event, 0.8, "event suffix");
            }
            if LAW_SUFFIXES.contains(last) || (has_of && LAW_SUFFIXES.contains(first)) {
                return (EntityType::Law, 0.8, "law suffix");
            }
            if FAC_SUFFIXES.contains(last) {
                return (EntityType::Fac, 0.8, "facility suffix");
            }
            if LOC_SUFFIXES.contains(last) || (span.len() > 1 && LOC_SUFFIXES.contains(first)) {
                return (EntityType::Loc, 0.8, "location suffix");
            }
        }
        if FIRST_NAMES.contains(first) {
            return (EntityType::Person, 0.8, "known first name");
        }
        if span.len() == 1 && DEMONYMS.contains(first) {
            return (EntityType::Norp, 0.8, "demonym");
        }
        if span.len() > 1 && span[1..].iter().any(Token::has_digit) {
            return (EntityType::Product, 0.6, "model number");
        }
        if start > 0 && LOCATION_PREPOSITIONS.contains(tokens[start - 1].lower.as_str()) {
            return (EntityType::Gpe, 0.55, "location context");
        }
        (EntityType::Org, 0.45, "capitalized span")
    }

    #[allow(clippy::too_many_arguments)]
    fn mention(
        &self,
        sentence: &str,
        tokens: &[Token],
        start: usize,
        end: usize,
        entity_type: EntityType,
        confidence: f64,
        rule: &'static str,
    ) -> Mention {
        Mention {
            text: sentence[tokens[start].start..tokens[end - 1].end].to_string(),
            entity_type,
            confidence,
            start,
            end,
            rule,
        }
    }
}

/// Capitalized tokens that never open an entity run.
fn is_non_entity(tokens: &[Token], i: usize) -> bool {
    let lower = tokens[i].lower.as_str();
    if lower == "i" || MONTHS.contains(lower) || WEEKDAYS.contains(lower) {
        return true;
    }
    let sentence_initial = i == 0 || (i == 1 && tokens[0].kind == TokenKind::Punct);
    sentence_initial
        && (is_closed_class(lower) || SENTENCE_OPENERS.contains(lower) || lemmatize_verb(lower).is_some())
}

fn looks_common(lower: &str) -> bool {
    COMMON_SHAPES.iter().any(|s| lower.ends_with(s))
}

/// End (exclusive) of the capitalized run starting at `start`.
fn extend_run(tokens: &[Token], claimed: &[bool], start: usize) -> usize {
    let usable = |j: usize| j < tokens.len() && !claimed[j];
    let mut j = start + 1;
    while usable(j) {
        let tok = &tokens[j];
        if tok.is_capitalized() && !MONTHS.contains(tok.lower.as_str()) {
            j += 1;
        } else if (tok.kind == TokenKind::Number || (tok.kind == TokenKind::Word && tok.has_digit()))
            && tokens[j - 1].is_capitalized()
        {
            j += 1;
        } else if CONNECTORS.contains(&tok.lower.as_str()) && usable(j + 1) && tokens[j + 1].is_capitalized() {
            j += 2;
        } else if tok.lower == "and" && usable(j + 1) && tokens[j + 1].is_capitalized() {
            let mut k = j + 1;
            while usable(k) && tokens[k].is_capitalized() {
                k += 1;
            }
            if ORG_SUFFIXES.contains(tokens[k - 1].lower.as_str()) {
                j = k;
            } else {
                break;
            }
        } else {
            break;
        }
    }
    j
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::tokenize::tokenize;

    fn recognize(sentence: &str) -> Vec<(String, EntityType, f64)> {
        let tokens = tokenize(sentence);
        Recognizer::new(HashMap::new())
            .recognize(sentence, &tokens)
            .into_iter()
            .map(|m| (m.text, m.entity_type, m.confidence))
            .collect()
    }

    #[test]
    fn test_scenario_sentences() {
        assert_eq!(
            recognize("Alice works at Acme Corp."),
            vec![
                ("Alice".into(), EntityType::Person, 0.8),
                ("Acme Corp".into(), EntityType::Org, 0.85),
            ]
        );
        assert_eq!(
            recognize("Acme Corp is located in Paris."),
            vec![
                ("Acme Corp".into(), EntityType::Org, 0.85),
                ("Paris".into(), EntityType::Gpe, 0.9),
            ]
        );
    }

    #[test]
    fn test_title_and_dates() {
        let found = recognize("Dr. Jane Goodall arrived on March 3, 1960 and left in 1975.");
        assert_eq!(found[0], ("Jane Goodall".into(), EntityType::Person, 0.9));
        assert_eq!(found[1], ("March 3, 1960".into(), EntityType::Date, 0.9));
        assert_eq!(found[2], ("1975".into(), EntityType::Date, 0.75));
    }

    #[test]
    fn test_suffix_rules() {
        let found = recognize("The Paris Agreement was discussed at the Climate Summit near Lake Geneva.");
        let types: Vec<EntityType> = found.iter().map(|f| f.1).collect();
        assert_eq!(types, vec![EntityType::Law, EntityType::Event, EntityType::Loc]);
    }

    #[test]
    fn test_of_names_classified_by_head() {
        let found = recognize("The Treaty of Versailles was signed in 1919.");
        assert_eq!(found[0], ("Treaty of Versailles".into(), EntityType::Law, 0.8));

        let found = recognize("The army lost the Battle of Hastings in 1066.");
        assert_eq!(found[0], ("Battle of Hastings".into(), EntityType::Event, 0.8));
    }

    #[test]
    fn test_connectors_and_conjunctions() {
        let found = recognize("She studied at the University of Oxford and Harvard.");
        assert_eq!(found[0].0, "University of Oxford");
        assert_eq!(found[0].1, EntityType::Org);
        assert_eq!(found[1].0, "Harvard");

        let split = recognize("Alice and Bob met in Zurich.");
        assert_eq!(split.len(), 3);
        assert_eq!(split[1], ("Bob".into(), EntityType::Person, 0.8));
    }

    #[test]
    fn test_fallbacks() {
        let found = recognize("They moved from Springfield to Zentrix Galaxy 9.");
        assert_eq!(found[0], ("Springfield".into(), EntityType::Gpe, 0.55));
        assert_eq!(found[1], ("Zentrix Galaxy 9".into(), EntityType::Product, 0.6));
        assert!(recognize("Researchers disagree.").is_empty());
    }

    #[test]
    fn test_extra_gazetteer() {
        let mut extra = HashMap::new();
        extra.insert("Zentrix".to_string(), EntityType::Org);
        let tokens = tokenize("We visited Zentrix.");
        let found = Recognizer::new(extra).recognize("We visited Zentrix.", &tokens);
        assert_eq!(found[0].entity_type, EntityType::Org);
        assert_eq!(found[0].rule, "gazetteer");
    }
}
