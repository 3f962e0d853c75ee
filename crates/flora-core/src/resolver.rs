//! Span conflict resolution.
//!
//! Candidates are bucketed by priority tier (lower number wins). Within a
//! tier they are ordered longest first, then leftmost, then by declaration
//! order, and accepted greedily unless they overlap something already
//! accepted. Spans are half-open `[start, end)` token ranges.

use std::collections::BTreeMap;

/// Tier for rules that do not declare one.
pub const DEFAULT_PRIORITY: u32 = 9999;

/// A pattern match found in one sentence, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Index of the rule that produced the match.
    pub rule: usize,
    pub start: usize,
    pub end: usize,
    pub priority: u32,
    /// Declaration order of the producing rule and pattern; breaks exact ties.
    pub order: usize,
}

impl Candidate {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &Candidate) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Selects a non-overlapping subset of `candidates`, returned in start order.
pub fn resolve(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut tiers: BTreeMap<u32, Vec<Candidate>> = BTreeMap::new();
    for candidate in candidates.into_iter().filter(|c| !c.is_empty()) {
        tiers.entry(candidate.priority).or_default().push(candidate);
    }

    let mut accepted: Vec<Candidate> = Vec::new();
    for (_, mut tier) in tiers {
        tier.sort_by(|a, b| {
            b.len()
                .cmp(&a.len())
                .then(a.start.cmp(&b.start))
                .then(a.order.cmp(&b.order))
        });
        for candidate in tier {
            if accepted.iter().all(|kept| !kept.overlaps(&candidate)) {
                accepted.push(candidate);
            }
        }
    }

    accepted.sort_by_key(|c| (c.start, c.end));
    accepted
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn candidate(rule: usize, start: usize, end: usize, priority: u32) -> Candidate {
        Candidate {
            rule,
            start,
            end,
            priority,
            order: rule,
        }
    }

    #[test]
    fn test_longest_then_leftmost() {
        let kept = resolve(vec![
            candidate(0, 0, 2, DEFAULT_PRIORITY),
            candidate(1, 1, 4, DEFAULT_PRIORITY),
            candidate(2, 3, 5, DEFAULT_PRIORITY),
        ]);
        assert_eq!(kept, vec![candidate(1, 1, 4, DEFAULT_PRIORITY)]);

        let kept = resolve(vec![
            candidate(0, 2, 4, DEFAULT_PRIORITY),
            candidate(1, 1, 3, DEFAULT_PRIORITY),
        ]);
        assert_eq!(kept, vec![candidate(1, 1, 3, DEFAULT_PRIORITY)]);
    }

    #[test]
    fn test_lower_tier_wins_regardless_of_length() {
        let kept = resolve(vec![
            candidate(0, 0, 10, DEFAULT_PRIORITY),
            candidate(1, 4, 5, 100),
        ]);
        assert_eq!(kept, vec![candidate(1, 4, 5, 100)]);
    }

    #[test]
    fn test_exact_ties_go_to_declaration_order() {
        let kept = resolve(vec![
            candidate(3, 2, 4, DEFAULT_PRIORITY),
            candidate(1, 2, 4, DEFAULT_PRIORITY),
        ]);
        assert_eq!(kept, vec![candidate(1, 2, 4, DEFAULT_PRIORITY)]);
    }

    #[test]
    fn test_adjacent_spans_do_not_conflict() {
        let kept = resolve(vec![
            candidate(0, 0, 2, DEFAULT_PRIORITY),
            candidate(1, 2, 4, DEFAULT_PRIORITY),
        ]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].start, 0);
    }

    #[test]
    fn test_empty_spans_are_dropped() {
        assert!(resolve(vec![candidate(0, 3, 3, DEFAULT_PRIORITY)]).is_empty());
    }

    fn arb_candidates() -> impl Strategy<Value = Vec<Candidate>> {
        prop::collection::vec((0usize..30, 1usize..8, prop::sample::select(vec![1u32, 100, 9999])), 0..25)
            .prop_map(|raw| {
                raw.into_iter()
                    .enumerate()
                    .map(|(order, (start, len, priority))| Candidate {
                        rule: order,
                        start,
                        end: start + len,
                        priority,
                        order,
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn resolved_spans_never_overlap(candidates in arb_candidates()) {
            let kept = resolve(candidates);
            for (i, a) in kept.iter().enumerate() {
                for b in kept.iter().skip(i + 1) {
                    prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
                }
            }
        }

        #[test]
        fn rejected_candidates_lose_to_equal_or_better_tier(candidates in arb_candidates()) {
            let kept = resolve(candidates.clone());
            for candidate in candidates.iter().filter(|c| !kept.contains(c)) {
                prop_assert!(kept
                    .iter()
                    .any(|k| k.overlaps(candidate) && k.priority <= candidate.priority));
            }
        }

        #[test]
        fn resolution_is_deterministic(candidates in arb_candidates()) {
            let mut reversed = candidates.clone();
            reversed.reverse();
            prop_assert_eq!(resolve(candidates), resolve(reversed));
        }
    }
}
