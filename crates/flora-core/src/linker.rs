//! Dependency linkers.
//!
//! A linker copies the value of an anchor record (part, subpart or sex) onto
//! the trait records it governs. Which anchor governs a trait is decided by
//! graph patterns such as `part >> trait` or `sex . link >> trait`:
//!
//! | op  | meaning                        | cost  |
//! |-----|--------------------------------|-------|
//! | `<` | left is a child of right       | 1     |
//! | `>` | left is the head of right      | 1     |
//! | `>>`| left is an ancestor of right   | depth |
//! | `<<`| left is a descendant of right  | depth |
//! | `.` | left immediately precedes right| 1     |
//! | `;` | left immediately follows right | 1     |
//!
//! The first node is the anchor and the last node must fall on the trait.
//! For each anchor the first pattern that matches sets the cost; the anchor
//! with the lowest `(cost, pattern, token distance, position)` wins.

use flora_model::{DependencyGraph, PartOfSpeech, Token, TraitKind};
use tracing::trace;

use crate::error::{CoreError, Result};
use crate::table::AnnotationTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkOp {
    Head,
    Child,
    Descendant,
    Ancestor,
    Next,
    Prev,
}

impl LinkOp {
    fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "<" => Self::Head,
            ">" => Self::Child,
            ">>" => Self::Descendant,
            "<<" => Self::Ancestor,
            "." => Self::Next,
            ";" => Self::Prev,
            _ => return None,
        })
    }

    /// Tokens reachable from `token`, with the cost of getting there.
    fn step(self, token: usize, graph: &DependencyGraph, len: usize) -> Vec<(usize, usize)> {
        match self {
            Self::Head => graph.head(token).map(|head| (head, 1)).into_iter().collect(),
            Self::Child => graph.children(token).iter().map(|&c| (c, 1)).collect(),
            Self::Descendant => graph.descendants(token),
            Self::Ancestor => graph.ancestors(token),
            Self::Next => (token + 1 < len).then_some((token + 1, 1)).into_iter().collect(),
            Self::Prev => token.checked_sub(1).map(|prev| (prev, 1)).into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeTest {
    Part,
    Subpart,
    Sex,
    Trait,
    Count,
    Link,
    Adv,
    Dash,
}

impl NodeTest {
    fn parse(word: &str) -> Option<Self> {
        Some(match word {
            "part" => Self::Part,
            "subpart" => Self::Subpart,
            "sex" => Self::Sex,
            "trait" => Self::Trait,
            "count" => Self::Count,
            "link" => Self::Link,
            "adv" => Self::Adv,
            "dash" => Self::Dash,
            _ => return None,
        })
    }
}

/// What a node test can look at.
struct Scope<'a> {
    tokens: &'a [Token],
    graph: &'a DependencyGraph,
    table: &'a AnnotationTable,
    targets: &'a [TraitKind],
}

impl Scope<'_> {
    fn accepts(&self, test: NodeTest, token: usize) -> bool {
        let kind = self.table.owner_kind(token);
        match test {
            NodeTest::Part => kind == Some(TraitKind::Part),
            NodeTest::Subpart => kind == Some(TraitKind::Subpart),
            NodeTest::Sex => kind == Some(TraitKind::Sex),
            NodeTest::Count => kind == Some(TraitKind::Count),
            NodeTest::Trait => kind.is_some_and(|kind| self.targets.contains(&kind)),
            NodeTest::Link => self.tokens.get(token).is_some_and(|t| {
                matches!(t.pos, PartOfSpeech::Adj | PartOfSpeech::Aux | PartOfSpeech::Verb)
            }),
            NodeTest::Adv => self
                .tokens
                .get(token)
                .is_some_and(|t| t.pos == PartOfSpeech::Adv),
            NodeTest::Dash => self.tokens.get(token).is_some_and(Token::is_dash),
        }
    }
}

/// A compiled `node op node ...` pattern.
#[derive(Debug, Clone)]
pub struct LinkPattern {
    source: String,
    first: NodeTest,
    steps: Vec<(LinkOp, NodeTest)>,
}

impl LinkPattern {
    pub fn compile(source: &str) -> Result<Self> {
        let words: Vec<&str> = source.split_whitespace().collect();
        let node = |word: &str| {
            NodeTest::parse(word)
                .ok_or_else(|| CoreError::pattern(source, format!("unknown node {word:?}")))
        };
        let Some((head, rest)) = words.split_first() else {
            return Err(CoreError::pattern(source, "empty pattern"));
        };
        if rest.is_empty() || rest.len() % 2 != 0 {
            return Err(CoreError::pattern(source, "expected node (op node)+"));
        }
        let first = node(head)?;
        let steps = rest
            .chunks(2)
            .map(|pair| {
                let op = LinkOp::parse(pair[0])
                    .ok_or_else(|| CoreError::pattern(source, format!("unknown op {:?}", pair[0])))?;
                Ok((op, node(pair[1])?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            source: source.to_string(),
            first,
            steps,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Cheapest path from a token of record `anchor` to a token of record `target`.
    fn cost(&self, scope: &Scope<'_>, anchor: usize, target: usize) -> Option<usize> {
        let (first, last) = scope.table.span(anchor)?;
        let mut best = None;
        for token in first..last {
            if scope.table.owner(token) == Some(anchor) && scope.accepts(self.first, token) {
                self.walk(scope, 0, token, 0, target, &mut best);
            }
        }
        best
    }

    fn walk(
        &self,
        scope: &Scope<'_>,
        step: usize,
        token: usize,
        cost: usize,
        target: usize,
        best: &mut Option<usize>,
    ) {
        let Some(&(op, test)) = self.steps.get(step) else {
            return;
        };
        let is_last = step + 1 == self.steps.len();
        for (next, hop) in op.step(token, scope.graph, scope.tokens.len()) {
            if !scope.accepts(test, next) {
                continue;
            }
            let total = cost + hop;
            if best.is_some_and(|b| total >= b) {
                continue;
            }
            if is_last {
                if scope.table.owner(next) == Some(target) {
                    *best = Some(total);
                }
            } else {
                self.walk(scope, step + 1, next, total, target, best);
            }
        }
    }
}

/// Attaches one anchor kind to the traits it governs.
#[derive(Debug, Clone)]
pub struct Linker {
    name: &'static str,
    anchor: TraitKind,
    targets: Vec<TraitKind>,
    patterns: Vec<LinkPattern>,
}

const SEX_PATTERNS: &[&str] = &[
    "sex >> trait",
    "sex < trait",
    "sex . trait",
    "sex . trait >> trait",
    "sex . link >> trait",
    "sex > link >> trait",
    "sex < trait >> trait",
    "sex < part < part",
    "sex ; part < link >> trait",
];

const PART_PATTERNS: &[&str] = &[
    "part < trait",
    "part . trait",
    "part >> trait",
    "part . trait >> trait",
    "part . link >> trait",
    "part < link >> trait",
    "part > link >> trait",
    "part < trait >> trait",
    "part . adv . trait",
    "part < subpart < trait",
];

const SUBPART_PATTERNS: &[&str] = &[
    "subpart ; dash ; count",
    "subpart >> trait",
    "subpart < trait",
    "subpart . trait",
    "subpart . trait >> trait",
    "subpart . link >> trait",
    "subpart > link >> trait",
    "subpart < trait >> trait",
    "subpart ; part < link >> trait",
];

impl Linker {
    pub fn new(
        name: &'static str,
        anchor: TraitKind,
        targets: Vec<TraitKind>,
        patterns: &[&str],
    ) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|source| LinkPattern::compile(source))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name,
            anchor,
            targets,
            patterns,
        })
    }

    fn all_but(excluded: &[TraitKind]) -> Vec<TraitKind> {
        TraitKind::ALL
            .into_iter()
            .filter(|kind| !excluded.contains(kind))
            .collect()
    }

    pub fn sex() -> Result<Self> {
        Self::new("sex", TraitKind::Sex, Self::all_but(&[TraitKind::Sex]), SEX_PATTERNS)
    }

    pub fn part() -> Result<Self> {
        Self::new("part", TraitKind::Part, Self::all_but(&[TraitKind::Part]), PART_PATTERNS)
    }

    pub fn subpart() -> Result<Self> {
        Self::new(
            "subpart",
            TraitKind::Subpart,
            Self::all_but(&[TraitKind::Part, TraitKind::Subpart]),
            SUBPART_PATTERNS,
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn anchor(&self) -> TraitKind {
        self.anchor
    }

    pub fn targets(&self) -> &[TraitKind] {
        &self.targets
    }

    pub fn patterns(&self) -> &[LinkPattern] {
        &self.patterns
    }

    /// Copies the anchor's value field onto every target record that lacks it.
    pub fn link(&self, tokens: &[Token], graph: &DependencyGraph, table: &mut AnnotationTable) {
        let field = self.anchor.as_str();
        let anchors = table.indices_of(self.anchor);
        if anchors.is_empty() {
            return;
        }
        let mut links: Vec<(usize, String)> = Vec::new();
        {
            let view: &AnnotationTable = table;
            let scope = Scope {
                tokens,
                graph,
                table: view,
                targets: &self.targets,
            };
            for (target, record) in view.records().iter().enumerate() {
                if !self.targets.contains(&record.kind) || record.has(field) {
                    continue;
                }
                let Some(anchor) = self.best_anchor(&scope, &anchors, target) else {
                    continue;
                };
                if let Some(value) = view.record(anchor).and_then(|r| r.text(field)) {
                    links.push((target, value.to_string()));
                }
            }
        }
        for (target, value) in links {
            if let Some(record) = table.record_mut(target) {
                trace!(linker = self.name, %value, start = record.start, "linked");
                record.insert(field, value);
            }
        }
    }

    fn best_anchor(&self, scope: &Scope<'_>, anchors: &[usize], target: usize) -> Option<usize> {
        let target_start = scope.table.span(target)?.0;
        anchors
            .iter()
            .filter(|&&anchor| anchor != target)
            .filter_map(|&anchor| {
                let (pattern, cost) = self
                    .patterns
                    .iter()
                    .enumerate()
                    .find_map(|(idx, pattern)| Some((idx, pattern.cost(scope, anchor, target)?)))?;
                let anchor_start = scope.table.span(anchor)?.0;
                let distance = anchor_start.abs_diff(target_start);
                Some(((cost, pattern, distance, anchor_start), anchor))
            })
            .min_by_key(|(key, _)| *key)
            .map(|(_, anchor)| anchor)
    }
}

/// Linkers in application order: sex, part, subpart.
pub fn default_linkers() -> Result<Vec<Linker>> {
    Ok(vec![Linker::sex()?, Linker::part()?, Linker::subpart()?])
}
