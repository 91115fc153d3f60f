//! Document themes: the most frequent content words outside entity mentions.

use std::collections::HashMap;

use gapforge_core::Theme;

use crate::document::AnalyzedSentence;
use crate::nlp::lemma::{lemmatize_verb, singular_noun};
use crate::nlp::lexicon::{is_closed_class, THEME_STOPWORDS};
use crate::nlp::TokenKind;

/// Up to `limit` keywords ranked by count, ties alphabetical.
pub fn document_themes(sentences: &[AnalyzedSentence], limit: usize) -> Vec<Theme> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for sentence in sentences {
        let mut in_mention = vec![false; sentence.tokens.len()];
        for m in &sentence.mentions {
            in_mention[m.start..m.end].iter_mut().for_each(|slot| *slot = true);
        }

        for (token, &covered) in sentence.tokens.iter().zip(&in_mention) {
            if covered || token.kind != TokenKind::Word {
                continue;
            }
            let lower = token.lower.as_str();
            if lower.len() < 3
                || !lower.chars().all(|c| c.is_alphabetic())
                || is_closed_class(lower)
                || THEME_STOPWORDS.contains(lower)
                || lemmatize_verb(lower).is_some()
            {
                continue;
            }
            *counts.entry(singular_noun(lower)).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(keyword, count)| Theme { keyword, count })
        .collect()
}
