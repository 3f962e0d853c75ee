//! Sentence segmentation.

use flora_model::TextSpan;

/// Words that end in a period without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "al", "c", "ca", "cf", "e.g", "fig", "figs", "i.e", "sp", "spp", "ssp", "subsp", "var", "vs",
];

const CLOSERS: &[char] = &['"', '\'', '”', '’', ')', ']'];

/// Splits text into sentence spans (character offsets).
///
/// A sentence ends at a period, optionally followed by closing quotes or
/// brackets, then whitespace and an uppercase letter or a digit. Periods
/// inside parentheses or brackets, and periods after known abbreviations, do
/// not end a sentence. Blank lines always do.
pub fn split_sentences(text: &str) -> Vec<TextSpan> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();
    let mut start = 0;
    let mut depth: usize = 0;
    let mut idx = 0;
    while idx < chars.len() {
        match chars[idx] {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '\n' if is_blank_line(&chars, idx) => {
                push_trimmed(&chars, start, idx, &mut spans);
                start = idx + 1;
                depth = 0;
            }
            '.' if depth == 0 => {
                if let Some(end) = sentence_end(&chars, idx) {
                    push_trimmed(&chars, start, end, &mut spans);
                    start = end;
                    idx = end;
                    continue;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    push_trimmed(&chars, start, chars.len(), &mut spans);
    spans
}

fn is_blank_line(chars: &[char], idx: usize) -> bool {
    let mut next = idx + 1;
    while next < chars.len() && chars[next] != '\n' && chars[next].is_whitespace() {
        next += 1;
    }
    next < chars.len() && chars[next] == '\n'
}

/// End (exclusive) of a sentence whose final period is at `dot`.
fn sentence_end(chars: &[char], dot: usize) -> Option<usize> {
    if is_abbreviation(chars, dot) {
        return None;
    }
    let mut end = dot + 1;
    while end < chars.len() && CLOSERS.contains(&chars[end]) {
        end += 1;
    }
    let mut next = end;
    while next < chars.len() && chars[next].is_whitespace() {
        next += 1;
    }
    if next == end || next >= chars.len() {
        return None;
    }
    let c = chars[next];
    (c.is_uppercase() || c.is_ascii_digit()).then_some(end)
}

fn is_abbreviation(chars: &[char], dot: usize) -> bool {
    let mut begin = dot;
    while begin > 0 && (chars[begin - 1].is_alphabetic() || chars[begin - 1] == '.') {
        begin -= 1;
    }
    if begin == dot {
        return false;
    }
    let word: String = chars[begin..dot].iter().collect::<String>().to_lowercase();
    ABBREVIATIONS.contains(&word.trim_matches('.'))
}

fn push_trimmed(chars: &[char], mut start: usize, mut end: usize, spans: &mut Vec<TextSpan>) {
    while start < end && chars[start].is_whitespace() {
        start += 1;
    }
    while end > start && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    if start < end {
        spans.push(TextSpan::new(start, end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(text: &str) -> usize {
        split_sentences(text).len()
    }

    #[test]
    fn test_closing_quote_ends_sentence() {
        assert_eq!(count("It was common “along a tiny stream.” Argia apicalis."), 2);
    }

    #[test]
    fn test_parenthesised_citation() {
        assert_eq!(count("(Dunn et al. 2009, Jørgensen 2015)."), 1);
    }

    #[test]
    fn test_simple_split() {
        let text = "Up to 3 mm. Sometimes blue.";
        let spans = split_sentences(text);
        assert_eq!(spans, vec![TextSpan::new(0, 11), TextSpan::new(12, 27)]);
    }

    #[test]
    fn test_brackets_do_not_block_split() {
        let text = "Herbs perennial, sparsely hairy. Stems [10–]30–70[–100] cm. \
                    Leaves: petiole 1–3 cm.";
        assert_eq!(count(text), 3);
    }

    #[test]
    fn test_decimal_point_and_digit_start() {
        let text = "Seeds 3.5–5 mm wide. 2n = 34, 56 (South America).";
        assert_eq!(count(text), 2);
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(count("Petals 15–21 × ca. 8 mm. Sepals green."), 2);
        assert_eq!(count("Trunk to 30 cm diam. Bark gray."), 2);
    }

    #[test]
    fn test_blank_line_splits() {
        assert_eq!(count("Leaves green\n\nFlowers white"), 2);
    }
}
