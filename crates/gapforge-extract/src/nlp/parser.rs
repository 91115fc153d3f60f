//! Clause-level dependency parser.
//!
//! Entity mentions are treated as noun-phrase units. Each verb group becomes
//! one [`Clause`] with its nominal subjects (`nsubj`/`nsubjpass`), direct or
//! prepositional objects (`dobj`/`attr`/`pobj`) and passive agents. Coordinated
//! subjects and objects are expanded.

use super::lemma::{lemmatize_verb, third_person, VerbForm};
use super::lexicon::{
    ADVERBS, AUXILIARIES, CONJUNCTIONS, DETERMINERS, PREPOSITIONS, PRONOUNS, RELATIVE_PRONOUNS,
    SUBORDINATORS,
};
use super::recognizer::Mention;
use super::tokenize::{Token, TokenKind};

/// An object reached directly or through a preposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub mention: usize,
    pub preposition: Option<String>,
}

/// One governing verb with the entity mentions it connects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Lemma of the main verb, or `be` for a bare copula.
    pub verb: String,
    pub passive: bool,
    pub subjects: Vec<usize>,
    pub objects: Vec<Argument>,
    /// Mentions introduced by `by` in a passive clause.
    pub agents: Vec<usize>,
}

impl Clause {
    /// Relation name for an object: third-person verb form plus `_<prep>`.
    pub fn relation_label(&self, argument: Option<&Argument>) -> String {
        let verb = third_person(&self.verb);
        match argument.and_then(|a| a.preposition.as_deref()) {
            Some(prep) => format!("{verb}_{prep}"),
            None => verb,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Chunk {
    Entity(usize),
    Det,
    Prep(String),
    Conj,
    Aux(&'static str),
    Verb(String, VerbForm),
    Pron,
    Relative,
    Adv,
    Boundary,
    Comma,
    To,
    Noun,
}

struct VerbGroup {
    start: usize,
    end: usize,
    lemma: String,
    passive: bool,
}

/// Parse one tokenized sentence into clauses.
pub fn parse(tokens: &[Token], mentions: &[Mention]) -> Vec<Clause> {
    let chunks = chunk(tokens, mentions);
    let groups = verb_groups(&chunks);

    groups
        .iter()
        .enumerate()
        .filter_map(|(k, group)| {
            let region_start = if k == 0 { 0 } else { groups[k - 1].end };
            let region_end = groups.get(k + 1).map_or(chunks.len(), |g| g.start);
            let subjects = subjects(&chunks, region_start, group.start);
            if subjects.is_empty() {
                return None;
            }
            let (objects, agents) = arguments(&chunks, group, region_end);
            Some(Clause {
                verb: group.lemma.clone(),
                passive: group.passive,
                subjects,
                objects,
                agents,
            })
        })
        .collect()
}

fn chunk(tokens: &[Token], mentions: &[Mention]) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if let Some((idx, m)) = mentions.iter().enumerate().find(|(_, m)| m.start == i) {
            chunks.push(Chunk::Entity(idx));
            i = m.end.max(i + 1);
            continue;
        }
        let tok = &tokens[i];
        let lower = tok.lower.as_str();
        let next = match tok.kind {
            TokenKind::Punct if matches!(lower, "\"" | "'" | "“" | "”" | "‘" | "’") => {
                i += 1;
                continue;
            }
            TokenKind::Punct if lower == "," => Chunk::Comma,
            TokenKind::Punct if lower == "&" => Chunk::Conj,
            TokenKind::Punct => Chunk::Boundary,
            TokenKind::Number => Chunk::Noun,
            TokenKind::Word => classify_word(lower, &chunks),
        };
        chunks.push(next);
        i += 1;
    }
    chunks
}

fn classify_word(lower: &str, chunks: &[Chunk]) -> Chunk {
    let prev = chunks.last();
    let after_nominal = matches!(prev, Some(Chunk::Entity(_)) | Some(Chunk::Noun) | Some(Chunk::Pron));
    if lower == "'s" && after_nominal {
        return Chunk::Det;
    }
    if lower == "to" {
        return Chunk::To;
    }
    if RELATIVE_PRONOUNS.contains(lower)
        && matches!(prev, Some(Chunk::Entity(_)) | Some(Chunk::Comma))
    {
        return Chunk::Relative;
    }
    if let Some(lemma) = AUXILIARIES.get(lower) {
        return Chunk::Aux(*lemma);
    }
    if DETERMINERS.contains(lower) {
        return Chunk::Det;
    }
    if PREPOSITIONS.contains(lower) {
        return Chunk::Prep(lower.to_string());
    }
    if CONJUNCTIONS.contains(lower) {
        return Chunk::Conj;
    }
    if SUBORDINATORS.contains(lower) {
        return Chunk::Boundary;
    }
    if PRONOUNS.contains(lower) {
        return Chunk::Pron;
    }
    if ADVERBS.contains(lower) || (lower.len() > 4 && lower.ends_with("ly")) {
        return Chunk::Adv;
    }
    let Some((lemma, form)) = lemmatize_verb(lower) else {
        return Chunk::Noun;
    };
    let after_aux = matches!(prev, Some(Chunk::Aux(_)) | Some(Chunk::To));
    // "Acme Corp, a robotics startup, acquired ...": the insertion is closed.
    let after_insertion = chunks
        .len()
        .checked_sub(1)
        .and_then(|close| insertion_head(chunks, close))
        .is_some();
    let as_verb = match form {
        _ if matches!(prev, Some(Chunk::Det) | Some(Chunk::Prep(_))) => false,
        VerbForm::Base => {
            after_aux
                || after_insertion
                || matches!(
                    prev,
                    Some(Chunk::Entity(_)) | Some(Chunk::Pron) | Some(Chunk::Adv) | Some(Chunk::Relative)
                )
        }
        VerbForm::ThirdPerson => !matches!(prev, Some(Chunk::Conj)) || after_nominal,
        VerbForm::Past => !matches!(prev, Some(Chunk::Comma)) || after_insertion,
        VerbForm::Participle | VerbForm::Gerund => after_aux,
    };
    if as_verb {
        Chunk::Verb(lemma, form)
    } else {
        Chunk::Noun
    }
}

fn verb_groups(chunks: &[Chunk]) -> Vec<VerbGroup> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < chunks.len() {
        if !matches!(chunks[i], Chunk::Aux(_) | Chunk::Verb(..)) {
            i += 1;
            continue;
        }
        let start = i;
        let mut auxiliaries: Vec<&'static str> = Vec::new();
        let mut main: Option<(String, VerbForm)> = None;
        while i < chunks.len() {
            match &chunks[i] {
                Chunk::Aux(lemma) if main.is_none() => auxiliaries.push(*lemma),
                Chunk::Adv => {}
                Chunk::Verb(lemma, form) if main.is_none() => main = Some((lemma.clone(), *form)),
                // "plans to acquire": the governed infinitive names the relation.
                Chunk::To if main.is_some() => match chunks.get(i + 1) {
                    Some(Chunk::Verb(lemma, form)) => {
                        main = Some((lemma.clone(), *form));
                        i += 1;
                    }
                    _ => break,
                },
                _ => break,
            }
            i += 1;
        }
        let (lemma, passive) = match main {
            Some((lemma, form)) => {
                let passive = auxiliaries.contains(&"be")
                    && matches!(form, VerbForm::Past | VerbForm::Participle);
                (lemma, passive)
            }
            None if auxiliaries.contains(&"be") => ("be".to_string(), false),
            None if auxiliaries.contains(&"have") => ("have".to_string(), false),
            None => continue,
        };
        groups.push(VerbGroup {
            start,
            end: i,
            lemma,
            passive,
        });
    }
    groups
}

/// Entity opening a comma-delimited insertion (`Entity , … ,`) whose closing
/// comma sits at `close`.
fn insertion_head(chunks: &[Chunk], close: usize) -> Option<usize> {
    if close < 3 || chunks.get(close) != Some(&Chunk::Comma) {
        return None;
    }
    let mut p = close - 1;
    while p > 0 {
        match chunks[p] {
            Chunk::Comma => {
                let head = matches!(chunks[p - 1], Chunk::Entity(_)) && p + 1 < close;
                return head.then_some(p - 1);
            }
            Chunk::Boundary | Chunk::Verb(..) | Chunk::Aux(_) | Chunk::Relative | Chunk::To => {
                return None
            }
            _ => p -= 1,
        }
    }
    None
}

/// Subjects immediately preceding the verb group, with coordination.
fn subjects(chunks: &[Chunk], region_start: usize, verb_start: usize) -> Vec<usize> {
    let mut pos = verb_start;
    while pos > region_start && chunks[pos - 1] == Chunk::Adv {
        pos -= 1;
    }
    if pos == region_start {
        return Vec::new();
    }
    match chunks[pos - 1] {
        Chunk::Entity(m) => {
            let mut found = vec![m];
            let mut p = pos - 1;
            while p >= region_start + 2 {
                let linked = matches!(chunks[p - 1], Chunk::Conj | Chunk::Comma);
                let Chunk::Entity(other) = chunks[p - 2] else {
                    break;
                };
                let governed = p >= 3 && matches!(chunks[p - 3], Chunk::Prep(_) | Chunk::Det);
                if !linked || governed {
                    break;
                }
                found.insert(0, other);
                p -= 2;
            }
            found
        }
        Chunk::Relative => {
            let antecedent = match (pos.checked_sub(2).map(|i| &chunks[i]), pos.checked_sub(3).map(|i| &chunks[i])) {
                (Some(Chunk::Entity(m)), _) => Some(*m),
                (Some(Chunk::Comma), Some(Chunk::Entity(m))) => Some(*m),
                _ => None,
            };
            antecedent.into_iter().collect()
        }
        Chunk::Comma => match insertion_head(chunks, pos - 1) {
            Some(head) if head >= region_start => subjects(chunks, region_start, head + 1),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Whether `pos` holds an entity that is really the subject of the next clause.
fn opens_next_clause(chunks: &[Chunk], pos: usize, region_end: usize) -> bool {
    let mut p = pos + 1;
    while p < region_end && chunks[p] == Chunk::Adv {
        p += 1;
    }
    p == region_end && region_end < chunks.len()
}

/// Coordinated mentions following the entity at `pos`. Returns the new position.
fn expand_conj(chunks: &[Chunk], mut pos: usize, region_end: usize, out: &mut Vec<usize>) -> usize {
    while pos + 2 < region_end {
        if !matches!(chunks[pos + 1], Chunk::Conj | Chunk::Comma) {
            break;
        }
        let Chunk::Entity(m) = chunks[pos + 2] else {
            break;
        };
        if opens_next_clause(chunks, pos + 2, region_end) {
            break;
        }
        out.push(m);
        pos += 2;
    }
    pos
}

fn arguments(chunks: &[Chunk], group: &VerbGroup, region_end: usize) -> (Vec<Argument>, Vec<usize>) {
    let mut objects = Vec::new();
    let mut agents = Vec::new();
    let mut preposition: Option<String> = None;
    let mut nominal_object = false;
    let mut pos = group.end;

    while pos < region_end {
        match &chunks[pos] {
            Chunk::Relative | Chunk::Verb(..) | Chunk::Aux(_) => break,
            Chunk::Adv | Chunk::Det => {}
            Chunk::Noun | Chunk::Pron => nominal_object = true,
            Chunk::Prep(p) => {
                if nominal_object && p != "by" {
                    break;
                }
                preposition = Some(p.clone());
            }
            Chunk::Entity(m) => {
                if opens_next_clause(chunks, pos, region_end) {
                    break;
                }
                let mut found = vec![*m];
                pos = expand_conj(chunks, pos, region_end, &mut found);
                if group.passive {
                    if preposition.as_deref() == Some("by") {
                        agents.extend(found);
                    }
                } else if preposition.is_some() || !nominal_object || objects.is_empty() {
                    objects.extend(found.into_iter().map(|mention| Argument {
                        mention,
                        preposition: preposition.clone(),
                    }));
                }
                preposition = None;
                nominal_object = false;
            }
            Chunk::Conj | Chunk::Comma | Chunk::To => {
                if !objects.is_empty() || !agents.is_empty() {
                    break;
                }
            }
            Chunk::Boundary => break,
        }
        pos += 1;
    }
    (objects, agents)
}
