//! Built-in extraction rules.
//!
//! A rule is a set of token patterns, a priority tier and a [`RuleAction`].
//! The [`RuleSet`] runs every enabled rule over a sentence and hands the
//! matches to the resolver as candidates.
//!
//! # Rule table
//!
//! | Rule | Tier | Action |
//! |------|------|--------|
//! | `part`, `subpart` | 100 | Term |
//! | `size`, `size.high_only`, `size.double_dim` | default | Size |
//! | `not_a_size`, `not_a_count` | default | Reject |
//! | `count`, `count.suffix`, `count.word` | default | Count |
//! | `color`, `shape`, `descriptor` | default | Color, Shape, Descriptor |
//! | `sex`, `location` | default | Term |

use std::collections::HashSet;

use flora_model::{PartOfSpeech, TermLabel, Token};
use tracing::debug;

use crate::error::Result;
use crate::matchers::{COLOR_CONNECTORS, Enricher, RuleAction};
use crate::pattern::{Decoder, TokenPattern};
use crate::resolver::{Candidate, DEFAULT_PRIORITY};

/// Tier of part and subpart names, ahead of every trait rule.
pub const TERM_PRIORITY: u32 = 100;

const NOT_SIZE_WORDS: &[&str] = &["for", "after", "within"];
const NOT_COUNT_WORDS: &[&str] = &[
    "/", "%", "average", "side", "sides", "times", "days", "weeks", "years", "by",
];

/// Metadata and compiled patterns of one rule.
#[derive(Debug, Clone)]
pub struct Rule {
    id: &'static str,
    action: RuleAction,
    priority: u32,
    patterns: Vec<TokenPattern>,
    enricher: Option<Enricher>,
}

impl Rule {
    pub fn new(
        id: &'static str,
        action: RuleAction,
        priority: u32,
        patterns: &[&str],
        decoder: &Decoder,
    ) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|source| TokenPattern::compile(source, decoder))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            id,
            action,
            priority,
            patterns,
            enricher: action.enricher(),
        })
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn action(&self) -> RuleAction {
        self.action
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn patterns(&self) -> &[TokenPattern] {
        &self.patterns
    }

    /// `None` for rules that only suppress overlapping matches.
    pub fn enricher(&self) -> Option<Enricher> {
        self.enricher
    }
}

fn has(label: TermLabel) -> impl Fn(&Token) -> bool + Send + Sync + 'static {
    move |token| token.has_label(&label)
}

fn word(words: &'static [&'static str]) -> impl Fn(&Token) -> bool + Send + Sync + 'static {
    move |token| token.label.is_none() && words.contains(&token.lower.as_str())
}

fn is_range(token: &Token) -> bool {
    token.range_keys().is_some()
}

fn is_color_word(token: &Token) -> bool {
    token.has_label(&TermLabel::Color) || token.has_label(&TermLabel::ColorMod)
}

/// Words usable in rule patterns.
pub fn decoder() -> Decoder {
    Decoder::new()
        .with("range", is_range)
        .with("units", has(TermLabel::Units))
        .with("dim", has(TermLabel::Dimension))
        .with("sex", has(TermLabel::Sex))
        .with("quest", has(TermLabel::Quest))
        .with("about", has(TermLabel::About))
        .with("cross", has(TermLabel::Cross))
        .with("follow", |t| {
            t.has_label(&TermLabel::Dimension) || t.has_label(&TermLabel::Sex)
        })
        .with("to", word(&["to"]))
        .with("and", word(&["and"]))
        .with("slash", word(&["/"]))
        .with(",", word(&[","]))
        .with("-", Token::is_dash)
        .with("plus", word(&["+"]))
        .with("open", word(&["(", "["]))
        .with("close", word(&[")", "]"]))
        .with("adp", |t| t.pos == PartOfSpeech::Adp)
        .with("not_size", word(NOT_SIZE_WORDS))
        .with("per_count", has(TermLabel::PerCount))
        .with("count_suffix", has(TermLabel::CountSuffix))
        .with("count_word", has(TermLabel::CountWord))
        .with("not_count_word", |t| {
            t.has_label(&TermLabel::Cross) || word(NOT_COUNT_WORDS)(t)
        })
        .with("missing", has(TermLabel::Missing))
        .with("color_start", |t| t.has_label(&TermLabel::Missing) || is_color_word(t))
        .with("color_end", is_color_word)
        .with("color_any", |t| {
            is_color_word(t)
                || t.has_label(&TermLabel::Missing)
                || t.is_dash()
                || word(COLOR_CONNECTORS)(t)
        })
        .with("shape", has(TermLabel::Shape))
        .with("shape_mod", has(TermLabel::ShapeMod))
        .with("shape_join", |t| t.has_label(&TermLabel::Shape) || t.is_dash())
        .with("descriptor", has(TermLabel::Descriptor))
        .with("part", has(TermLabel::Part))
        .with("subpart", has(TermLabel::Subpart))
        .with("location", has(TermLabel::Location))
}

type RuleSpec = (&'static str, RuleAction, u32, &'static [&'static str]);

const RULES: &[RuleSpec] = &[
    ("part", RuleAction::Term, TERM_PRIORITY, &["part"]),
    ("subpart", RuleAction::Term, TERM_PRIORITY, &["subpart"]),
    (
        "size",
        RuleAction::Size,
        DEFAULT_PRIORITY,
        &[
            "about? range quest? units follow*",
            "about? range quest? units? follow* cross to? about? range quest? units follow*",
            "about? range quest? units? follow* cross to? about? range quest? units? follow* \
             cross to? about? range quest? units follow*",
        ],
    ),
    (
        "size.high_only",
        RuleAction::SizeHighOnly,
        DEFAULT_PRIORITY,
        &["to about? range quest? units follow*"],
    ),
    (
        "size.double_dim",
        RuleAction::SizeDoubleDim,
        DEFAULT_PRIORITY,
        &[
            "about? range units sex? ,? dim and dim",
            "about? range units? cross to? about? range units dim and dim",
        ],
    ),
    (
        "not_a_size",
        RuleAction::Reject,
        DEFAULT_PRIORITY,
        &[
            "not_size about? range units?",
            "not_size about? range units? cross to? about? range units",
        ],
    ),
    (
        "count",
        RuleAction::Count,
        DEFAULT_PRIORITY,
        &[
            "range -? per_count?",
            "per_count adp? range",
            "open range close per_count",
        ],
    ),
    (
        "count.suffix",
        RuleAction::SuffixCount,
        DEFAULT_PRIORITY,
        &["open? range plus? -? count_suffix close?"],
    ),
    ("count.word", RuleAction::CountWord, DEFAULT_PRIORITY, &["count_word"]),
    (
        "not_a_count",
        RuleAction::Reject,
        DEFAULT_PRIORITY,
        &[
            "range not_count_word range?",
            "range slash range slash range",
            "slash range",
        ],
    ),
    (
        "color",
        RuleAction::Color,
        DEFAULT_PRIORITY,
        &["color_start color_any* color_end", "color_end"],
    ),
    (
        "shape",
        RuleAction::Shape,
        DEFAULT_PRIORITY,
        &["shape_mod* -? shape shape_join*"],
    ),
    ("descriptor", RuleAction::Descriptor, DEFAULT_PRIORITY, &["descriptor"]),
    ("sex", RuleAction::Term, DEFAULT_PRIORITY, &["sex"]),
    ("location", RuleAction::Term, DEFAULT_PRIORITY, &["location"]),
];

/// The compiled rules, in declaration order, with per-rule switches.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    disabled: HashSet<&'static str>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            disabled: HashSet::new(),
        }
    }

    /// Compiles the built-in rule table.
    pub fn builtin() -> Result<Self> {
        let decoder = decoder();
        let rules = RULES
            .iter()
            .map(|(id, action, priority, patterns)| {
                Rule::new(*id, *action, *priority, patterns, &decoder)
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(rules = rules.len(), "compiled rule set");
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn disable(&mut self, id: &str) {
        if let Some(rule) = self.rules.iter().find(|r| r.id == id) {
            self.disabled.insert(rule.id);
        }
    }

    pub fn enable(&mut self, id: &str) {
        self.disabled.remove(id);
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        !self.disabled.contains(id)
    }

    /// Every match of every enabled rule. `order` numbers patterns across the
    /// whole rule set so earlier declarations win exact ties.
    pub fn candidates(&self, tokens: &[Token]) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        let mut order = 0;
        for (index, rule) in self.rules.iter().enumerate() {
            let enabled = self.is_enabled(rule.id);
            for pattern in &rule.patterns {
                if enabled {
                    candidates.extend(pattern.find_all(tokens).into_iter().map(|(start, end)| {
                        Candidate {
                            rule: index,
                            start,
                            end,
                            priority: rule.priority,
                            order,
                        }
                    }));
                }
                order += 1;
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use flora_terms::TermRegistry;

    use super::*;
    use crate::annotate::{Annotator, RuleAnnotator};
    use crate::resolver::resolve;

    fn winners(text: &str) -> Vec<(&'static str, String)> {
        let terms = TermRegistry::builtin().expect("builtin terms");
        let sentence = RuleAnnotator::new(Arc::clone(&terms))
            .annotate(text)
            .expect("annotate")
            .remove(0);
        let rules = RuleSet::builtin().expect("rules");
        resolve(rules.candidates(&sentence.tokens))
            .into_iter()
            .map(|c| {
                let words: Vec<&str> = sentence.tokens[c.start..c.end]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect();
                (rules.rules()[c.rule].id(), words.join(" "))
            })
            .collect()
    }

    #[test]
    fn test_builtin_rules_compile() {
        let rules = RuleSet::builtin().expect("rules");
        assert!(rules.rules().iter().all(|r| !r.patterns().is_empty()));
        assert!(rules.rules().iter().any(|r| r.action() == RuleAction::Reject));
    }

    #[test]
    fn test_size_beats_bare_count() {
        assert_eq!(
            winners("Leaf (12-)23-34 × 45-56 cm"),
            vec![
                ("part", "Leaf".to_string()),
                ("size", "(12-)23-34 × 45-56 cm".to_string()),
            ]
        );
    }

    #[test]
    fn test_suffix_count_beats_bare_count() {
        let found = winners("leaf shallowly to deeply 5–7-lobed");
        assert_eq!(found.last(), Some(&("count.suffix", "5–7 - lobed".to_string())));
    }

    #[test]
    fn test_not_a_size_suppresses_size() {
        let found = winners("Pedicels for 3 mm");
        assert!(found.iter().any(|(id, _)| *id == "not_a_size"));
        assert!(found.iter().all(|(id, _)| *id != "size"));
    }

    #[test]
    fn test_to_after_cross_stays_in_size() {
        let found = winners("leaflets obovate, 1-2.5 × to 1.6 cm,");
        assert!(found.contains(&("size", "1-2.5 × to 1.6 cm".to_string())));
        assert!(found.iter().all(|(id, _)| *id != "size.high_only"));
    }

    #[test]
    fn test_fraction_range_is_not_a_count() {
        let found = winners("leaf sinuses 1/5–1/4 to base");
        assert!(found.contains(&("not_a_count", "1 / 5–1 / 4".to_string())));
        assert!(found.iter().all(|(id, _)| !id.starts_with("count")));
    }

    #[test]
    fn test_disabled_rule_yields_no_candidates() {
        let mut rules = RuleSet::builtin().expect("rules");
        rules.disable("part");
        assert!(!rules.is_enabled("part"));
        let tokens = vec![Token::new("leaf", 0, 4, 0).with_label(TermLabel::Part)];
        assert!(rules.candidates(&tokens).is_empty());
        rules.enable("part");
        assert_eq!(rules.candidates(&tokens).len(), 1);
    }
}
