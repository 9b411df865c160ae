use crate::language::LanguageProfile;
use crate::rewrite::rewrite;
use crate::scan::scan;
use crate::span::{CommentSpan, RewriteResult, SpanKind, SubrangeContext};

/// Spans reviewed together: consecutive block spans whose line ranges touch
/// (gap of at most one line) coalesce, every line span stands alone.
#[derive(Debug, Clone)]
pub struct SpanGroup {
    /// Indices into the session's span list, ascending.
    pub span_ids: Vec<usize>,
}

pub fn group_spans(spans: &[CommentSpan]) -> Vec<SpanGroup> {
    let mut groups: Vec<SpanGroup> = Vec::new();
    for (id, span) in spans.iter().enumerate() {
        if span.kind == SpanKind::Block
            && let Some(group) = groups.last_mut()
            && let Some(&prev_id) = group.span_ids.last()
        {
            let prev = &spans[prev_id];
            if prev.kind == SpanKind::Block && span.start_line <= prev.end_line + 1 {
                group.span_ids.push(id);
                continue;
            }
        }
        groups.push(SpanGroup { span_ids: vec![id] });
    }
    groups
}

/// One in-flight review of a single text: the scanned spans, their grouping,
/// and the caller's keep/remove decisions. The engine holds no state outside
/// a session, so independent sessions may run concurrently; ownership of
/// "the one session currently shown to the user" is the caller's policy.
#[derive(Debug)]
pub struct ReviewSession {
    text: String,
    language: &'static str,
    spans: Vec<CommentSpan>,
    groups: Vec<SpanGroup>,
    subrange: Option<SubrangeContext>,
}

impl ReviewSession {
    /// Scan `text` and set up a review. `subrange` records where the text
    /// sits inside a larger document, if the caller cut one out; spans are
    /// always reported in the submitted text's own 1-based coordinates.
    pub fn new(
        text: impl Into<String>,
        profile: &LanguageProfile,
        subrange: Option<SubrangeContext>,
    ) -> Self {
        let text = text.into();
        let spans = scan(&text, profile);
        let groups = group_spans(&spans);
        ReviewSession {
            text,
            language: profile.name,
            spans,
            groups,
            subrange,
        }
    }

    pub fn language(&self) -> &'static str {
        self.language
    }

    pub fn spans(&self) -> &[CommentSpan] {
        &self.spans
    }

    pub fn groups(&self) -> &[SpanGroup] {
        &self.groups
    }

    /// Mark one span for removal (`true`) or preservation (`false`).
    /// Returns false when the id is out of range.
    pub fn set_selection(&mut self, span_id: usize, remove: bool) -> bool {
        match self.spans.get_mut(span_id) {
            Some(span) => {
                span.selected = Some(remove);
                true
            }
            None => false,
        }
    }

    /// Apply one decision to every span in a group. All-or-nothing: an
    /// unknown group id changes no span.
    pub fn set_group_selection(&mut self, group_id: usize, remove: bool) -> bool {
        let Some(group) = self.groups.get(group_id) else {
            return false;
        };
        for &id in &group.span_ids {
            self.spans[id].selected = Some(remove);
        }
        true
    }

    /// Index of the span covering the given local 1-based line, if any.
    pub fn span_at_line(&self, line: usize) -> Option<usize> {
        self.spans.iter().position(|s| s.covers_line(line))
    }

    /// Translate a local line number to whole-document coordinates.
    pub fn to_document_line(&self, local: usize) -> usize {
        match self.subrange {
            Some(ctx) => ctx.start_line + local - 1,
            None => local,
        }
    }

    /// Translate a whole-document line number back into this session's
    /// coordinates. None when the line falls before the sub-range.
    pub fn to_local_line(&self, document: usize) -> Option<usize> {
        match self.subrange {
            Some(ctx) => (document >= ctx.start_line).then(|| document - ctx.start_line + 1),
            None => Some(document),
        }
    }

    /// Run the rewrite with the selections made so far.
    pub fn finish(&self) -> RewriteResult {
        RewriteResult {
            original_text: self.text.clone(),
            new_text: rewrite(&self.text, &self.spans),
            spans: self.spans.clone(),
            language: self.language,
            subrange: self.subrange,
        }
    }
}
