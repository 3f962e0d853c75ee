//! Token-sequence patterns.
//!
//! Patterns are written as whitespace separated words, each optionally
//! suffixed with `?`, `*` or `+`:
//!
//! ```text
//! about? range units follow*
//! open? range plus? -? count_suffix close?
//! ```
//!
//! Every word is looked up in a [`Decoder`] that maps it to a token test.
//! Unknown words are a compile error.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use flora_model::Token;

use crate::error::{CoreError, Result};

/// Predicate over a single token.
pub type TokenTest = Arc<dyn Fn(&Token) -> bool + Send + Sync>;

/// Maps pattern words to token tests.
#[derive(Clone, Default)]
pub struct Decoder {
    entries: HashMap<String, TokenTest>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with<F>(mut self, word: &str, test: F) -> Self
    where
        F: Fn(&Token) -> bool + Send + Sync + 'static,
    {
        self.entries.insert(word.to_string(), Arc::new(test));
        self
    }

    pub fn get(&self, word: &str) -> Option<&TokenTest> {
        self.entries.get(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<&String> = self.entries.keys().collect();
        words.sort();
        f.debug_struct("Decoder").field("words", &words).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantifier {
    One,
    Optional,
    Star,
    Plus,
}

#[derive(Clone)]
struct Element {
    test: TokenTest,
    quantifier: Quantifier,
}

/// A compiled token pattern.
#[derive(Clone)]
pub struct TokenPattern {
    source: String,
    elements: Vec<Element>,
}

impl fmt::Debug for TokenPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenPattern").field(&self.source).finish()
    }
}

/// Splits a trailing quantifier off a pattern word. A word that is only a
/// quantifier character (`?`) is a literal.
fn split_quantifier(word: &str) -> (&str, Quantifier) {
    if word.chars().count() > 1 {
        let quantifier = match word.chars().last() {
            Some('?') => Some(Quantifier::Optional),
            Some('*') => Some(Quantifier::Star),
            Some('+') => Some(Quantifier::Plus),
            _ => None,
        };
        if let Some(quantifier) = quantifier {
            return (&word[..word.len() - 1], quantifier);
        }
    }
    (word, Quantifier::One)
}

impl TokenPattern {
    pub fn compile(source: &str, decoder: &Decoder) -> Result<Self> {
        let mut elements = Vec::new();
        for word in source.split_whitespace() {
            let (name, quantifier) = split_quantifier(word);
            let test = decoder
                .get(name)
                .ok_or_else(|| CoreError::pattern(source, format!("unknown word {name:?}")))?;
            elements.push(Element {
                test: Arc::clone(test),
                quantifier,
            });
        }
        if elements.is_empty() {
            return Err(CoreError::pattern(source, "empty pattern"));
        }
        if elements
            .iter()
            .all(|e| matches!(e.quantifier, Quantifier::Optional | Quantifier::Star))
        {
            return Err(CoreError::pattern(source, "pattern can match nothing"));
        }
        Ok(Self {
            source: source.to_string(),
            elements,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Exclusive end positions of every non-empty match starting at `start`.
    pub fn match_ends(&self, tokens: &[Token], start: usize) -> BTreeSet<usize> {
        let mut ends = BTreeSet::new();
        let mut visited = HashSet::new();
        self.walk(tokens, 0, start, &mut visited, &mut ends);
        ends.remove(&start);
        ends
    }

    /// Every `(start, end)` token span the pattern matches.
    pub fn find_all(&self, tokens: &[Token]) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        for start in 0..tokens.len() {
            for end in self.match_ends(tokens, start) {
                spans.push((start, end));
            }
        }
        spans
    }

    fn walk(
        &self,
        tokens: &[Token],
        elem: usize,
        pos: usize,
        visited: &mut HashSet<(usize, usize)>,
        ends: &mut BTreeSet<usize>,
    ) {
        if !visited.insert((elem, pos)) {
            return;
        }
        let Some(element) = self.elements.get(elem) else {
            ends.insert(pos);
            return;
        };
        let accepts = |p: usize| tokens.get(p).is_some_and(|token| (element.test)(token));
        match element.quantifier {
            Quantifier::One => {
                if accepts(pos) {
                    self.walk(tokens, elem + 1, pos + 1, visited, ends);
                }
            }
            Quantifier::Optional => {
                self.walk(tokens, elem + 1, pos, visited, ends);
                if accepts(pos) {
                    self.walk(tokens, elem + 1, pos + 1, visited, ends);
                }
            }
            Quantifier::Star | Quantifier::Plus => {
                if element.quantifier == Quantifier::Star {
                    self.walk(tokens, elem + 1, pos, visited, ends);
                }
                let mut next = pos;
                while accepts(next) {
                    next += 1;
                    self.walk(tokens, elem + 1, next, visited, ends);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i, i + 1, i))
            .collect()
    }

    fn decoder() -> Decoder {
        Decoder::new()
            .with("a", |t| t.lower == "a")
            .with("b", |t| t.lower == "b")
            .with("c", |t| t.lower == "c")
            .with("?", |t| t.text == "?")
    }

    #[test]
    fn test_quantifiers() {
        let pattern = TokenPattern::compile("a? b+ c*", &decoder()).expect("compile");
        let toks = tokens(&["a", "b", "b", "c", "x"]);
        assert_eq!(
            pattern.match_ends(&toks, 0).into_iter().collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
        assert_eq!(
            pattern.match_ends(&toks, 1).into_iter().collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
        assert!(pattern.match_ends(&toks, 4).is_empty());
    }

    #[test]
    fn test_literal_question_mark() {
        let pattern = TokenPattern::compile("a ?", &decoder()).expect("compile");
        let toks = tokens(&["a", "?"]);
        assert_eq!(pattern.find_all(&toks), vec![(0, 2)]);
    }

    #[test]
    fn test_unknown_word_fails() {
        let error = TokenPattern::compile("a nope", &decoder()).unwrap_err();
        assert!(matches!(error, CoreError::Pattern { .. }));
    }

    #[test]
    fn test_all_optional_pattern_is_rejected() {
        assert!(TokenPattern::compile("a? b*", &decoder()).is_err());
        assert!(TokenPattern::compile("   ", &decoder()).is_err());
    }

    #[test]
    fn test_find_all_lists_every_span() {
        let pattern = TokenPattern::compile("b+", &decoder()).expect("compile");
        let toks = tokens(&["b", "b"]);
        assert_eq!(pattern.find_all(&toks), vec![(0, 1), (0, 2), (1, 2)]);
    }
}
