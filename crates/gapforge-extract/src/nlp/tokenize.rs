//! Sentence splitting and word tokenization.

use super::lexicon::ABBREVIATIONS;

/// A trimmed sentence of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Number,
    Punct,
}

/// A token with byte offsets relative to its sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub lower: String,
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn is_capitalized(&self) -> bool {
        self.kind == TokenKind::Word && self.text.chars().next().is_some_and(char::is_uppercase)
    }

    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    pub fn has_digit(&self) -> bool {
        self.text.chars().any(|c| c.is_ascii_digit())
    }
}

/// Split text into sentences on `.`, `!` or `?` followed by whitespace.
///
/// A period does not end the sentence after a known abbreviation, after a
/// single-letter initial, or when the next word starts in lowercase.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    for (i, &(pos, c)) in chars.iter().enumerate() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(_, next)) = chars.get(i + 1) else {
            continue;
        };
        if !next.is_whitespace() {
            continue;
        }
        if c == '.' && !ends_sentence(text, start, pos, &chars[i + 1..]) {
            continue;
        }
        push_sentence(&mut sentences, text, start, pos + c.len_utf8());
        start = pos + c.len_utf8();
    }
    push_sentence(&mut sentences, text, start, text.len());
    sentences
}

fn ends_sentence(text: &str, start: usize, dot: usize, rest: &[(usize, char)]) -> bool {
    let word: String = text[start..dot]
        .chars()
        .rev()
        .take_while(|c| c.is_alphanumeric())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if ABBREVIATIONS.contains(word.to_lowercase().as_str()) {
        return false;
    }
    if word.chars().count() == 1 && word.chars().all(char::is_uppercase) {
        return false;
    }
    match rest.iter().map(|&(_, c)| c).find(|c| !c.is_whitespace()) {
        Some(c) => !c.is_lowercase(),
        None => true,
    }
}

fn push_sentence(sentences: &mut Vec<Sentence>, text: &str, start: usize, end: usize) {
    let trimmed = text[start..end].trim();
    if !trimmed.is_empty() {
        sentences.push(Sentence {
            text: trimmed.to_string(),
        });
    }
}

/// Tokenize a sentence into words, numbers and punctuation.
///
/// Words keep inner hyphens and apostrophes; a trailing possessive `'s` is
/// split off as its own token.
pub fn tokenize(sentence: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut iter = sentence.char_indices().peekable();

    while let Some((start, c)) = iter.next() {
        if c.is_whitespace() {
            continue;
        }
        if !c.is_alphanumeric() {
            tokens.push(make_token(sentence, start, start + c.len_utf8(), TokenKind::Punct));
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(pos, next)) = iter.peek() {
            let joins = next.is_alphanumeric()
                || (matches!(next, '-' | '\'' | '’' | '.')
                    && sentence[pos + next.len_utf8()..]
                        .chars()
                        .next()
                        .is_some_and(char::is_alphanumeric));
            if !joins {
                break;
            }
            end = pos + next.len_utf8();
            iter.next();
        }

        let word = &sentence[start..end];
        let lower = word.to_lowercase();
        let kind = if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
            TokenKind::Number
        } else {
            TokenKind::Word
        };
        if kind == TokenKind::Word && (lower.ends_with("'s") || lower.ends_with("’s")) && word.len() > 3 {
            let split = end - if lower.ends_with("'s") { 2 } else { "’s".len() };
            tokens.push(make_token(sentence, start, split, TokenKind::Word));
            tokens.push(make_token(sentence, split, end, TokenKind::Word));
        } else {
            tokens.push(make_token(sentence, start, end, kind));
        }
    }
    tokens
}

fn make_token(sentence: &str, start: usize, end: usize, kind: TokenKind) -> Token {
    let text = sentence[start..end].to_string();
    let lower = text.to_lowercase().replace('’', "'");
    Token {
        text,
        lower,
        start,
        end,
        kind,
    }
}
