//! Annotated sentences and their dependency graphs.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::token::Token;

/// Dependency relations between the tokens of one sentence, stored as
/// adjacency lists keyed by token index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    heads: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Builds a graph from the head of each token (`None` marks a root).
    ///
    /// # Errors
    ///
    /// Returns an error when a head index is out of range or the heads
    /// contain a cycle.
    pub fn from_heads(heads: Vec<Option<usize>>) -> Result<Self> {
        let len = heads.len();
        let mut children = vec![Vec::new(); len];
        for (index, head) in heads.iter().enumerate() {
            if let Some(head) = *head {
                if head >= len || head == index {
                    return Err(ModelError::InvalidHead { index, head });
                }
                children[head].push(index);
            }
        }
        for start in 0..len {
            let mut steps = 0;
            let mut current = heads[start];
            while let Some(node) = current {
                steps += 1;
                if steps > len {
                    return Err(ModelError::DependencyCycle(start));
                }
                current = heads[node];
            }
        }
        Ok(Self { heads, children })
    }

    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    pub fn head(&self, index: usize) -> Option<usize> {
        self.heads.get(index).copied().flatten()
    }

    pub fn children(&self, index: usize) -> &[usize] {
        self.children.get(index).map_or(&[], Vec::as_slice)
    }

    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.heads
            .iter()
            .enumerate()
            .filter(|(_, head)| head.is_none())
            .map(|(index, _)| index)
    }

    /// Ancestors of `index` paired with their distance, nearest first.
    pub fn ancestors(&self, index: usize) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        let mut depth = 0;
        let mut current = self.head(index);
        while let Some(node) = current {
            depth += 1;
            found.push((node, depth));
            current = self.head(node);
        }
        found
    }

    /// Descendants of `index` paired with their depth, breadth first.
    pub fn descendants(&self, index: usize) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        let mut queue: VecDeque<(usize, usize)> = self
            .children(index)
            .iter()
            .map(|&child| (child, 1))
            .collect();
        while let Some((node, depth)) = queue.pop_front() {
            found.push((node, depth));
            queue.extend(self.children(node).iter().map(|&child| (child, depth + 1)));
        }
        found
    }
}

/// One sentence worth of annotation, as handed over by an annotator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedSentence {
    pub start: usize,
    pub end: usize,
    pub tokens: Vec<Token>,
    pub graph: DependencyGraph,
}

impl AnnotatedSentence {
    pub fn new(start: usize, end: usize, tokens: Vec<Token>, graph: DependencyGraph) -> Self {
        Self {
            start,
            end,
            tokens,
            graph,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Character span covered by tokens `[first, last)`.
    pub fn char_span(&self, first: usize, last: usize) -> Option<(usize, usize)> {
        if first >= last {
            return None;
        }
        let start = self.tokens.get(first)?.start;
        let end = self.tokens.get(last - 1)?.end;
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> DependencyGraph {
        // 0 <- 1 <- 2, 0 <- 3
        DependencyGraph::from_heads(vec![None, Some(0), Some(1), Some(0)]).expect("graph")
    }

    #[test]
    fn test_children_and_heads() {
        let graph = graph();
        assert_eq!(graph.children(0), &[1, 3]);
        assert_eq!(graph.head(2), Some(1));
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_descendants_carry_depth() {
        let graph = graph();
        assert_eq!(graph.descendants(0), vec![(1, 1), (3, 1), (2, 2)]);
        assert_eq!(graph.ancestors(2), vec![(1, 1), (0, 2)]);
    }

    #[test]
    fn test_rejects_cycles_and_bad_heads() {
        assert!(matches!(
            DependencyGraph::from_heads(vec![Some(1), Some(0)]),
            Err(ModelError::DependencyCycle(_))
        ));
        assert!(matches!(
            DependencyGraph::from_heads(vec![None, Some(7)]),
            Err(ModelError::InvalidHead { index: 1, head: 7 })
        ));
    }
}
