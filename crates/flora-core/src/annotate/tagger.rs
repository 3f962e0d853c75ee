//! Vocabulary tagging and part-of-speech assignment.

use std::collections::HashMap;

use flora_model::{CharOffsets, PartOfSpeech, TermLabel, TextSpan, Token};
use flora_terms::TermRegistry;

use super::tokenizer::tokenize;

/// Vocabulary phrases keyed by their lowercase token sequence.
#[derive(Debug, Clone, Default)]
pub struct PhraseIndex {
    phrases: HashMap<Vec<String>, (String, TermLabel)>,
    max_len: usize,
}

impl PhraseIndex {
    pub fn new(terms: &TermRegistry) -> Self {
        let mut index = Self::default();
        for term in terms.terms() {
            let offsets = CharOffsets::new(&term.pattern);
            let key: Vec<String> = tokenize(
                &term.pattern,
                &offsets,
                TextSpan::new(0, offsets.char_len()),
            )
            .into_iter()
            .map(|token| token.lower)
            .collect();
            if key.is_empty() {
                continue;
            }
            index.max_len = index.max_len.max(key.len());
            index
                .phrases
                .insert(key, (term.pattern.clone(), term.label.clone()));
        }
        index
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Longest vocabulary phrase starting at `start`, as `(token count, pattern, label)`.
    fn longest_at(&self, tokens: &[Token], start: usize) -> Option<(usize, &str, &TermLabel)> {
        let longest = self.max_len.min(tokens.len() - start);
        (1..=longest).rev().find_map(|len| {
            let window = &tokens[start..start + len];
            if window.iter().any(|t| t.label.is_some()) {
                return None;
            }
            let key: Vec<String> = window.iter().map(|t| t.lower.clone()).collect();
            self.phrases
                .get(&key)
                .map(|(pattern, label)| (len, pattern.as_str(), label))
        })
    }
}

/// Merges vocabulary phrases into single labeled tokens, longest match first.
pub fn tag_terms(
    tokens: Vec<Token>,
    index: &PhraseIndex,
    text: &str,
    offsets: &CharOffsets,
) -> Vec<Token> {
    let mut tagged = Vec::with_capacity(tokens.len());
    let mut pos = 0;
    while pos < tokens.len() {
        match index.longest_at(&tokens, pos) {
            Some((len, pattern, label)) => {
                let start = tokens[pos].start;
                let end = tokens[pos + len - 1].end;
                let mut token = Token::new(offsets.slice(text, start, end), start, end, 0)
                    .with_label(label.clone());
                token.lower = pattern.to_string();
                tagged.push(token);
                pos += len;
            }
            None => {
                tagged.push(tokens[pos].clone());
                pos += 1;
            }
        }
    }
    reindex(tagged)
}

/// Folds bracketed sex and uncertainty markers, `(pistillate)` and `(?)`, into
/// one token carrying the inner token's label.
pub fn merge_bracketed(tokens: Vec<Token>, text: &str, offsets: &CharOffsets) -> Vec<Token> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut pos = 0;
    while pos < tokens.len() {
        if let Some(token) = bracketed_at(&tokens, pos, text, offsets) {
            merged.push(token);
            pos += 3;
        } else {
            merged.push(tokens[pos].clone());
            pos += 1;
        }
    }
    reindex(merged)
}

fn bracketed_at(tokens: &[Token], pos: usize, text: &str, offsets: &CharOffsets) -> Option<Token> {
    let [open, inner, close] = tokens.get(pos..pos + 3)? else {
        return None;
    };
    let paired = matches!(
        (open.text.as_str(), close.text.as_str()),
        ("(", ")") | ("[", "]")
    );
    let label = inner.label.as_ref()?;
    if !paired || !matches!(label, TermLabel::Sex | TermLabel::Quest) {
        return None;
    }
    let mut token = Token::new(offsets.slice(text, open.start, close.end), open.start, close.end, 0)
        .with_label(label.clone());
    token.lower = inner.lower.clone();
    Some(token)
}

fn reindex(mut tokens: Vec<Token>) -> Vec<Token> {
    for (index, token) in tokens.iter_mut().enumerate() {
        token.index = index;
    }
    tokens
}

const AUXILIARIES: &[&str] = &["is", "are", "was", "were", "be", "been", "becoming"];
const ADPOSITIONS: &[&str] = &[
    "of", "in", "to", "with", "for", "on", "at", "by", "from", "near", "along", "below", "above",
];
const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor"];
const DETERMINERS: &[&str] = &["a", "an", "the", "each", "some"];

/// Coarse part-of-speech from labels and word shape.
pub fn part_of_speech(token: &Token) -> PartOfSpeech {
    match &token.label {
        Some(TermLabel::Range(_) | TermLabel::CountWord) => return PartOfSpeech::Num,
        Some(TermLabel::Part | TermLabel::Subpart | TermLabel::Units) => return PartOfSpeech::Noun,
        Some(
            TermLabel::Color
            | TermLabel::ColorMod
            | TermLabel::Shape
            | TermLabel::Descriptor
            | TermLabel::Location
            | TermLabel::Sex
            | TermLabel::Dimension
            | TermLabel::CountSuffix,
        ) => return PartOfSpeech::Adj,
        _ => {}
    }
    let lower = token.lower.as_str();
    if !lower.chars().any(char::is_alphanumeric) {
        PartOfSpeech::Punct
    } else if lower.ends_with("ly") {
        PartOfSpeech::Adv
    } else if AUXILIARIES.contains(&lower) {
        PartOfSpeech::Aux
    } else if ADPOSITIONS.contains(&lower) {
        PartOfSpeech::Adp
    } else if CONJUNCTIONS.contains(&lower) {
        PartOfSpeech::Cconj
    } else if DETERMINERS.contains(&lower) {
        PartOfSpeech::Det
    } else if lower.ends_with("ed") || lower.ends_with("ing") {
        PartOfSpeech::Verb
    } else {
        PartOfSpeech::Noun
    }
}

pub fn assign_pos(tokens: &mut [Token]) {
    for token in tokens {
        token.pos = part_of_speech(token);
    }
}
