//! Rule-based dependency heads.
//!
//! Treatment sentences are telegraphic: a part name followed by the traits
//! describing it. Heads follow that shape. The first part is the root, later
//! parts hang off the previous part, subparts off the nearest part before
//! them, and everything else off the nearest anchor before it. A sex word
//! right before a part or subpart modifies it (`staminate flowers`) and hangs
//! off that anchor instead.

use flora_model::{DependencyGraph, Result, TermLabel, Token};

fn is_part(token: &Token) -> bool {
    token.has_label(&TermLabel::Part)
}

fn is_anchor(token: &Token) -> bool {
    is_part(token) || token.has_label(&TermLabel::Subpart)
}

/// Computes the head of every token in a sentence.
pub fn heads(tokens: &[Token]) -> Vec<Option<usize>> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let root = tokens
        .iter()
        .position(is_part)
        .or_else(|| tokens.iter().position(is_anchor))
        .unwrap_or(0);

    let nearest_before = |idx: usize, test: fn(&Token) -> bool| {
        tokens[..idx].iter().rposition(test)
    };

    tokens
        .iter()
        .enumerate()
        .map(|(idx, token)| {
            if idx == root {
                return None;
            }
            let modifies_next =
                token.has_label(&TermLabel::Sex) && tokens.get(idx + 1).is_some_and(is_anchor);
            let head = if modifies_next {
                Some(idx + 1)
            } else if is_part(token) {
                nearest_before(idx, is_part)
            } else if token.has_label(&TermLabel::Subpart) {
                nearest_before(idx, is_part).or_else(|| nearest_before(idx, is_anchor))
            } else {
                nearest_before(idx, is_anchor)
            };
            Some(head.unwrap_or(root))
        })
        .collect()
}

/// Builds the dependency graph of a sentence.
pub fn parse(tokens: &[Token]) -> Result<DependencyGraph> {
    DependencyGraph::from_heads(heads(tokens))
}
