//! Lexicon-checked lemmatizer for verbs and plural nouns.
//!
//! Candidate lemmas come from a suffix table; a candidate is accepted only when
//! it is a known verb base, so `located` → `locate` and `founded` → `found`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::lexicon::VERBS;

/// Inflection observed on a verb token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbForm {
    Base,
    ThirdPerson,
    /// `-ed` or an irregular past; doubles as the past participle.
    Past,
    /// Irregular form that is only a past participle (`known`, `written`).
    Participle,
    Gerund,
}

static IRREGULAR: Lazy<HashMap<&'static str, (&'static str, VerbForm)>> = Lazy::new(|| {
    use VerbForm::*;
    let mut m = HashMap::new();
    for (word, lemma, form) in [
        ("bought", "buy", Past),
        ("sold", "sell", Past),
        ("led", "lead", Past),
        ("ran", "run", Past),
        ("left", "leave", Past),
        ("met", "meet", Past),
        ("built", "build", Past),
        ("wrote", "write", Past),
        ("written", "write", Participle),
        ("taught", "teach", Past),
        ("won", "win", Past),
        ("lost", "lose", Past),
        ("beat", "beat", Past),
        ("beaten", "beat", Participle),
        ("made", "make", Past),
        ("took", "take", Past),
        ("taken", "take", Participle),
        ("gave", "give", Past),
        ("given", "give", Participle),
        ("got", "get", Past),
        ("gotten", "get", Participle),
        ("saw", "see", Past),
        ("seen", "see", Participle),
        ("knew", "know", Past),
        ("known", "know", Participle),
        ("found", "find", Past),
        ("held", "hold", Past),
        ("said", "say", Past),
        ("told", "tell", Past),
        ("spoke", "speak", Past),
        ("spoken", "speak", Participle),
        ("born", "bear", Participle),
        ("bore", "bear", Past),
        ("grew", "grow", Past),
        ("grown", "grow", Participle),
        ("became", "become", Past),
        ("began", "begin", Past),
        ("begun", "begin", Participle),
        ("flew", "fly", Past),
        ("flown", "fly", Participle),
        ("drove", "drive", Past),
        ("driven", "drive", Participle),
        ("lay", "lie", Past),
        ("split", "split", Past),
        ("lies", "lie", ThirdPerson),
        ("dies", "die", ThirdPerson),
        ("died", "die", Past),
        ("dying", "die", Gerund),
        ("lying", "lie", Gerund),
    ] {
        m.insert(word, (lemma, form));
    }
    m
});

/// Suffix rules: (suffix, replacement, form). Longer suffixes first.
const SUFFIXES: &[(&str, &str, VerbForm)] = &[
    ("ies", "y", VerbForm::ThirdPerson),
    ("ches", "ch", VerbForm::ThirdPerson),
    ("shes", "sh", VerbForm::ThirdPerson),
    ("sses", "ss", VerbForm::ThirdPerson),
    ("xes", "x", VerbForm::ThirdPerson),
    ("zes", "z", VerbForm::ThirdPerson),
    ("oes", "o", VerbForm::ThirdPerson),
    ("es", "e", VerbForm::ThirdPerson),
    ("s", "", VerbForm::ThirdPerson),
    ("ied", "y", VerbForm::Past),
    ("pped", "p", VerbForm::Past),
    ("tted", "t", VerbForm::Past),
    ("nned", "n", VerbForm::Past),
    ("rred", "r", VerbForm::Past),
    ("ed", "e", VerbForm::Past),
    ("ed", "", VerbForm::Past),
    ("d", "", VerbForm::Past),
    ("pping", "p", VerbForm::Gerund),
    ("tting", "t", VerbForm::Gerund),
    ("nning", "n", VerbForm::Gerund),
    ("rring", "r", VerbForm::Gerund),
    ("ying", "y", VerbForm::Gerund),
    ("ing", "e", VerbForm::Gerund),
    ("ing", "", VerbForm::Gerund),
];

/// Lemma and inflection of `word` when it is a known verb form.
pub fn lemmatize_verb(word: &str) -> Option<(String, VerbForm)> {
    let lower = word.to_lowercase();
    if let Some((lemma, form)) = IRREGULAR.get(lower.as_str()) {
        return Some((lemma.to_string(), *form));
    }
    if VERBS.contains(lower.as_str()) {
        return Some((lower, VerbForm::Base));
    }
    SUFFIXES.iter().find_map(|(suffix, replacement, form)| {
        let stem = lower.strip_suffix(suffix)?;
        if stem.len() < 2 {
            return None;
        }
        let candidate = format!("{stem}{replacement}");
        VERBS
            .contains(candidate.as_str())
            .then_some((candidate, *form))
    })
}

/// Third-person singular present of a verb lemma (`work` → `works`, `be` → `is`).
pub fn third_person(lemma: &str) -> String {
    match lemma {
        "be" => return "is".into(),
        "have" => return "has".into(),
        "do" => return "does".into(),
        _ => {}
    }
    if let Some(stem) = lemma.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if ["s", "sh", "ch", "x", "z", "o"].iter().any(|s| lemma.ends_with(s)) {
        return format!("{lemma}es");
    }
    format!("{lemma}s")
}

/// Singular form of a plural common noun, for theme counting.
pub fn singular_noun(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.len() <= 3 || lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return lower;
    }
    for (suffix, replacement) in [("ies", "y"), ("ches", "ch"), ("shes", "sh"), ("xes", "x"), ("s", "")] {
        if let Some(stem) = lower.strip_suffix(suffix) {
            return format!("{stem}{replacement}");
        }
    }
    lower
}
