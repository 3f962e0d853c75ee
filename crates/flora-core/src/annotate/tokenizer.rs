//! Word, number and range tokenization.
//!
//! Numeric range notations are kept together as one token labeled with the
//! range slots they fill:
//!
//! | text            | label                   |
//! |-----------------|-------------------------|
//! | `23–34`         | `range.low.high`        |
//! | `(12-)23-34`    | `range.min.low.high`    |
//! | `5–8(–10)`      | `range.low.high.max`    |
//! | `[5–]7–25[–32]` | `range.min.low.high.max`|
//!
//! A run of digits and dots that is not a number (`1.2.3`) stays one
//! unlabeled token so it never turns into a value.

use std::sync::LazyLock;

use flora_model::{CharOffsets, RangeKey, RangeKeys, TermLabel, TextSpan, Token};
use flora_normalization::to_positive_float;
use regex::Regex;

const DASH: &str = r"[-–—‐‑]+";
const NUM: &str = r"(?:\d+(?:\.\d+)?|\.\d+)";

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^(?P<min>[(\[]\s*{NUM}\s*{DASH}\s*[)\]]\s*)?(?P<low>{NUM})(?:\s*{DASH}\s*(?P<high>{NUM}))?(?:\s*[(\[]\s*{DASH}\s*(?P<max>{NUM})\s*[)\]])?"
    );
    Regex::new(&pattern).expect("RANGE_RE regex is invalid")
});
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\W\d_]+").expect("WORD_RE regex is invalid"));
static ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:n|st|nd|rd|th)\b").expect("ALNUM_RE regex is invalid")
});
static NUMBER_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.]*\d[\d.]*").expect("NUMBER_RUN_RE regex is invalid"));

/// Tokenizes the characters of `span` within `text`.
///
/// Token offsets are character offsets into `text`; `index` counts from the
/// start of the span.
pub fn tokenize(text: &str, offsets: &CharOffsets, span: TextSpan) -> Vec<Token> {
    let base = offsets.char_to_byte(span.start);
    let limit = offsets.char_to_byte(span.end);
    let Some(slice) = text.get(base..limit) else {
        return Vec::new();
    };
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < slice.len() {
        let rest = &slice[pos..];
        let Some(first) = rest.chars().next() else {
            break;
        };
        if first.is_whitespace() {
            pos += first.len_utf8();
            continue;
        }
        let (len, label) = scan_token(rest, first);
        let start = offsets.byte_to_char(base + pos);
        let end = offsets.byte_to_char(base + pos + len);
        let mut token = Token::new(&rest[..len], start, end, tokens.len());
        if let Some(label) = label {
            token = token.with_label(label);
        }
        tokens.push(token);
        pos += len;
    }
    tokens
}

/// Length of a malformed number at the start of `rest`. A trailing sentence
/// period is not part of the number.
fn malformed_number(rest: &str) -> Option<usize> {
    let run = NUMBER_RUN_RE.find(rest)?.as_str().trim_end_matches('.');
    if run.is_empty() || to_positive_float(run).is_some() {
        return None;
    }
    Some(run.len())
}

/// Length of a `.3` glued to the end of a range, which makes the last number
/// of `2–1.2.3` malformed.
fn trailing_fraction(rest: &str) -> Option<usize> {
    let mut chars = rest.chars();
    if chars.next() != Some('.') || !chars.next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    let run = NUMBER_RUN_RE.find(rest)?.as_str().trim_end_matches('.');
    Some(run.len())
}

/// Byte length and label of the token at the start of `rest`.
fn scan_token(rest: &str, first: char) -> (usize, Option<TermLabel>) {
    if let Some(m) = ALNUM_RE.find(rest) {
        return (m.end(), None);
    }
    if let Some(len) = malformed_number(rest) {
        return (len, None);
    }
    if let Some(caps) = RANGE_RE.captures(rest) {
        let whole = caps.get(0).map_or(0, |m| m.end());
        if whole > 0 {
            if let Some(tail) = trailing_fraction(&rest[whole..]) {
                return (whole + tail, None);
            }
            let mut keys = Vec::new();
            for (name, key) in [
                ("min", RangeKey::Min),
                ("low", RangeKey::Low),
                ("high", RangeKey::High),
                ("max", RangeKey::Max),
            ] {
                if caps.name(name).is_some() {
                    keys.push(key);
                }
            }
            return (whole, Some(TermLabel::Range(RangeKeys::new(keys))));
        }
    }
    if let Some(m) = WORD_RE.find(rest) {
        return (m.end(), None);
    }
    if first.is_ascii_digit() {
        let len = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(rest.len(), |(idx, _)| idx);
        return (len, None);
    }
    (first.len_utf8(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        let offsets = CharOffsets::new(text);
        tokenize(text, &offsets, TextSpan::new(0, offsets.char_len()))
    }

    fn texts(text: &str) -> Vec<String> {
        tokens(text).into_iter().map(|t| t.text).collect()
    }

    fn range_label(text: &str) -> Option<String> {
        tokens(text)
            .into_iter()
            .find_map(|t| t.range_keys().map(RangeKeys::label))
    }

    #[test]
    fn test_range_notations() {
        assert_eq!(range_label("23–34").as_deref(), Some("range.low.high"));
        assert_eq!(range_label("(12-)23-34").as_deref(), Some("range.min.low.high"));
        assert_eq!(range_label("5–8(–10)").as_deref(), Some("range.low.high.max"));
        assert_eq!(
            range_label("[5–]7–25[–32]").as_deref(),
            Some("range.min.low.high.max")
        );
        assert_eq!(range_label("5--16").as_deref(), Some("range.low.high"));
        assert_eq!(range_label("8").as_deref(), Some("range.low"));
    }

    #[test]
    fn test_suffix_after_range_is_split() {
        assert_eq!(texts("5–7-lobed"), vec!["5–7", "-", "lobed"]);
    }

    #[test]
    fn test_char_offsets_after_multibyte() {
        let toks = tokens("Leaf (12-)23-34 × 45-56 cm");
        let spans: Vec<(usize, usize)> = toks.iter().map(|t| (t.start, t.end)).collect();
        assert_eq!(spans, vec![(0, 4), (5, 15), (16, 17), (18, 23), (24, 26)]);
    }

    #[test]
    fn test_number_followed_by_letter_is_a_word() {
        let toks = tokens("2n = 34");
        assert_eq!(toks[0].text, "2n");
        assert!(toks[0].label.is_none());
        assert!(toks[2].range_keys().is_some());
    }

    #[test]
    fn test_units_glued_to_number_are_split() {
        assert_eq!(texts("Petals 5mm."), vec!["Petals", "5", "mm", "."]);
        assert_eq!(range_label("5mm").as_deref(), Some("range.low"));
        assert_eq!(texts("3x2 cm"), vec!["3", "x", "2", "cm"]);
    }

    #[test]
    fn test_malformed_number_is_one_unlabeled_token() {
        let toks = tokens("Fruit 1.2.3 mm");
        assert_eq!(toks[1].text, "1.2.3");
        assert!(toks[1].label.is_none());
        assert_eq!(toks.len(), 3);

        let toks = tokens("2–1.2.3 mm");
        assert_eq!(toks[0].text, "2–1.2.3");
        assert!(toks[0].label.is_none());
    }

    #[test]
    fn test_sentence_period_after_decimal_is_punctuation() {
        assert_eq!(texts("Seeds 2.5."), vec!["Seeds", "2.5", "."]);
        assert_eq!(range_label("2.5.").as_deref(), Some("range.low"));
    }

    #[test]
    fn test_punctuation_and_parentheses() {
        assert_eq!(
            texts("mm (pistillate), ca."),
            vec!["mm", "(", "pistillate", ")", ",", "ca", "."]
        );
    }

    #[test]
    fn test_indices_are_sentence_relative() {
        let text = "Leaves green. Petals white.";
        let offsets = CharOffsets::new(text);
        let toks = tokenize(text, &offsets, TextSpan::new(14, 26));
        assert_eq!(toks[0].text, "Petals");
        assert_eq!(toks[0].index, 0);
        assert_eq!(toks[0].start, 14);
    }
}
