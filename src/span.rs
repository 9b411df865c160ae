use serde::Serialize;

/// Whether a span was produced by a line-comment leader or block delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpanKind {
    Line,
    Block,
}

/// One detected comment occurrence.
///
/// Lines are 1-based and inclusive; `start_line == end_line` for single-line
/// spans. Columns are 1-based character positions on the first/last line of
/// the span — a line comment may trail real code, so `column_start` marks
/// where the leader begins.
#[derive(Debug, Clone, Serialize)]
pub struct CommentSpan {
    pub start_line: usize,
    pub end_line: usize,
    pub kind: SpanKind,
    /// Exact comment text, newline-joined for multi-line block spans.
    pub raw_text: String,
    pub column_start: usize,
    pub column_end: usize,
    /// Matches one of the profile's documentation shapes (JSDoc block,
    /// Python docstring, Dart `///`). Documentation spans are kept unless
    /// explicitly selected for removal.
    pub is_documentation: bool,
    /// `Some(true)` = remove, `Some(false)` = keep, `None` = kind default.
    pub selected: Option<bool>,
}

impl CommentSpan {
    /// Resolve the tri-state selection: unset falls back to the kind-based
    /// default (documentation kept, everything else removed).
    pub fn should_remove(&self) -> bool {
        self.selected.unwrap_or(!self.is_documentation)
    }

    /// True when the span occupies the given 1-based line (wholly or, for a
    /// trailing line comment, partially).
    pub fn covers_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// Absolute position of a scanned sub-range within its parent document.
///
/// The scanner always works in the coordinate space of the text it is given;
/// this offset is the only bridge back to whole-document line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubrangeContext {
    /// 1-based document line corresponding to local line 1.
    pub start_line: usize,
}

/// Outcome of a full scan-and-rewrite pass over one text.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteResult {
    pub original_text: String,
    pub new_text: String,
    /// Full span list with final `selected`/`is_documentation` state.
    pub spans: Vec<CommentSpan>,
    pub language: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subrange: Option<SubrangeContext>,
}
