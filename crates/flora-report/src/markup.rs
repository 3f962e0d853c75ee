//! Nested markup over overlapping highlight spans.
//!
//! Every [`Highlight`] becomes an open and a close [`Cut`]. Cuts are sorted so
//! that at one position closes come before opens, longer spans open first and
//! close last, and of two equal spans the later highlight opens outside. Walking
//! the sorted cuts with a stack of open spans produces balanced tags even when
//! spans cross: closing a span that is not on top of the stack closes the
//! spans above it and reopens them right after.

use std::collections::VecDeque;

use flora_model::CharOffsets;
use quick_xml::escape::escape;
use tracing::trace;

use crate::error::{RenderError, Result};

/// Visual treatment of a highlighted span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Style {
    /// `<strong>`
    Bold,
    /// `<span class="...">`
    Class(String),
}

impl Style {
    fn element(&self) -> &'static str {
        match self {
            Style::Bold => "strong",
            Style::Class(_) => "span",
        }
    }
}

/// A character span `[start, end)` to mark up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    pub style: Style,
    pub title: Option<String>,
}

impl Highlight {
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self {
            start,
            end,
            style,
            title: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// One endpoint of a highlight.
///
/// `len` and `id` are negated on open cuts so one ascending sort orders both
/// kinds of endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cut {
    pub pos: usize,
    pub open: bool,
    pub len: isize,
    pub id: isize,
    pub end: usize,
    pub style: Style,
    pub title: Option<String>,
}

impl Cut {
    fn key(&self) -> (usize, bool, isize, isize) {
        (self.pos, self.open, self.len, self.id)
    }

    fn same_span(&self, other: &Cut) -> bool {
        self.id.unsigned_abs() == other.id.unsigned_abs()
    }

    fn open_tag(&self) -> String {
        let mut tag = format!("<{}", self.style.element());
        if let Style::Class(class) = &self.style {
            tag.push_str(&format!(" class=\"{}\"", escape(class.as_str())));
        }
        if let Some(title) = &self.title {
            tag.push_str(&format!(" title=\"{}\"", escape(title.as_str())));
        }
        tag.push('>');
        tag
    }

    fn close_tag(&self) -> String {
        format!("</{}>", self.style.element())
    }
}

/// Open and close cuts for every highlight, sorted for [`insert_markup`].
pub fn cuts_for(highlights: &[Highlight]) -> Vec<Cut> {
    let mut cuts = Vec::with_capacity(highlights.len() * 2);
    for (index, highlight) in highlights.iter().enumerate() {
        let id = index as isize + 1;
        let len = highlight.end.saturating_sub(highlight.start) as isize;
        cuts.push(Cut {
            pos: highlight.start,
            open: true,
            len: -len,
            id: -id,
            end: highlight.end,
            style: highlight.style.clone(),
            title: highlight.title.clone(),
        });
        cuts.push(Cut {
            pos: highlight.end,
            open: false,
            len,
            id,
            end: highlight.end,
            style: highlight.style.clone(),
            title: highlight.title.clone(),
        });
    }
    cuts.sort_by_key(Cut::key);
    cuts
}

/// Interleaves `cuts` with the escaped text they point into.
///
/// Fails when a close cut has no open cut on the stack; that only happens
/// when the cuts were not built in pairs.
pub fn insert_markup(text: &str, cuts: &[Cut]) -> Result<String> {
    let offsets = CharOffsets::new(text);
    let mut parts: Vec<String> = Vec::with_capacity(cuts.len() * 2 + 1);
    let mut stack: VecDeque<&Cut> = VecDeque::new();
    let mut prev = 0;

    for cut in cuts {
        if cut.pos > prev {
            parts.push(escape(offsets.slice(text, prev, cut.pos)).into_owned());
            prev = cut.pos;
        }

        if cut.open {
            parts.push(cut.open_tag());
            stack.push_front(cut);
            continue;
        }

        let Some(depth) = stack.iter().position(|open| open.same_span(cut)) else {
            return Err(RenderError::UnmatchedClose {
                pos: cut.pos,
                id: cut.id.unsigned_abs(),
            });
        };
        for open in stack.iter().take(depth + 1) {
            parts.push(open.close_tag());
        }
        stack.remove(depth);
        if depth > 0 {
            trace!(pos = cut.pos, reopened = depth, "crossing spans");
        }
        for open in stack.iter().take(depth).rev() {
            parts.push(open.open_tag());
        }
    }

    parts.push(escape(offsets.slice(text, prev, offsets.char_len())).into_owned());
    Ok(parts.concat())
}

/// Marks up `text` with `highlights`. Empty spans and spans past the end of
/// the text are rejected.
pub fn render_markup(text: &str, highlights: &[Highlight]) -> Result<String> {
    let len = text.chars().count();
    if let Some(bad) = highlights
        .iter()
        .find(|h| h.start >= h.end || h.end > len)
    {
        return Err(RenderError::SpanOutOfRange {
            start: bad.start,
            end: bad.end,
            len,
        });
    }
    insert_markup(text, &cuts_for(highlights))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> Style {
        Style::Class(name.to_string())
    }

    #[test]
    fn test_no_highlights_escapes() {
        assert_eq!(render_markup("a < b & c", &[]).unwrap(), "a &lt; b &amp; c");
    }

    #[test]
    fn test_nested_spans() {
        let highlights = [
            Highlight::new(0, 4, Style::Bold),
            Highlight::new(0, 12, class("c0")),
        ];
        insta::assert_snapshot!(
            render_markup("Leaf 3-5 cm.", &highlights).unwrap(),
            @r#"<span class="c0"><strong>Leaf</strong> 3-5 cm.</span>"#
        );
    }

    #[test]
    fn test_crossing_spans_reopen() {
        let highlights = [
            Highlight::new(0, 6, class("c0")),
            Highlight::new(3, 9, class("c1")),
        ];
        insta::assert_snapshot!(
            render_markup("abcdefghi", &highlights).unwrap(),
            @r#"<span class="c0">abc<span class="c1">def</span></span><span class="c1">ghi</span>"#
        );
    }

    #[test]
    fn test_adjacent_spans_close_first() {
        let highlights = [
            Highlight::new(0, 2, class("c0")),
            Highlight::new(2, 4, class("c1")),
        ];
        assert_eq!(
            render_markup("abcd", &highlights).unwrap(),
            r#"<span class="c0">ab</span><span class="c1">cd</span>"#
        );
    }

    #[test]
    fn test_title_is_escaped() {
        let highlights = [Highlight::new(0, 2, class("c0")).with_title("a \"b\"")];
        assert_eq!(
            render_markup("xy", &highlights).unwrap(),
            r#"<span class="c0" title="a &quot;b&quot;">xy</span>"#
        );
    }

    #[test]
    fn test_multibyte_offsets() {
        let highlights = [Highlight::new(2, 5, Style::Bold)];
        assert_eq!(
            render_markup("5–7 µm", &highlights).unwrap(),
            "5–<strong>7 µ</strong>m"
        );
    }

    #[test]
    fn test_unmatched_close_is_an_error() {
        let mut cuts = cuts_for(&[Highlight::new(0, 2, Style::Bold)]);
        cuts.retain(|cut| !cut.open);
        assert!(matches!(
            insert_markup("ab", &cuts),
            Err(RenderError::UnmatchedClose { pos: 2, id: 1 })
        ));
    }

    #[test]
    fn test_out_of_range_span() {
        let result = render_markup("ab", &[Highlight::new(1, 3, Style::Bold)]);
        assert!(matches!(result, Err(RenderError::SpanOutOfRange { len: 2, .. })));
    }
}
