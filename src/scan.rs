use crate::language::LanguageProfile;
use crate::span::{CommentSpan, SpanKind};

/// Split a text into lines the way both the scanner and the rewriter count
/// them: on `\n`, with a trailing newline remembered separately so it does
/// not manufacture a phantom final line.
pub(crate) fn source_lines(text: &str) -> (Vec<&str>, bool) {
    let had_trailing_newline = text.ends_with('\n');
    let mut lines: Vec<&str> = text.split('\n').collect();
    if had_trailing_newline {
        lines.pop();
    }
    (lines, had_trailing_newline)
}

/// 1-based character column of a byte offset within a line.
fn column_at(line: &str, byte_idx: usize) -> usize {
    line[..byte_idx].chars().count() + 1
}

/// Detect every comment span in `text` under the given language rules.
///
/// Single top-to-bottom pass; each line is visited at most once. Line-leader
/// matches anywhere on a line win over block openers, block openers are only
/// recognized at the start of a trimmed line, and unterminated blocks extend
/// to the last line rather than failing. Empty or whitespace-only input
/// yields zero spans.
pub fn scan(text: &str, profile: &LanguageProfile) -> Vec<CommentSpan> {
    let (lines, _) = source_lines(text);
    let mut spans = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if let Some(leader_idx) = line.find(profile.line_leader) {
            let raw = &line[leader_idx..];
            let is_doc = profile.line_comment_is_doc(raw, i, &lines);
            spans.push(CommentSpan {
                start_line: i + 1,
                end_line: i + 1,
                kind: SpanKind::Line,
                raw_text: raw.to_string(),
                column_start: column_at(line, leader_idx),
                column_end: line.chars().count(),
                is_documentation: is_doc,
                selected: None,
            });
            i += 1;
            continue;
        }

        let trimmed = line.trim_start();
        if let Some((open, close)) = profile.block_open_at(trimmed) {
            let open_idx = line.len() - trimmed.len();
            let is_doc = profile.block_comment_is_doc(trimmed, i, &lines);

            let after_open = &trimmed[open.len()..];
            if let Some(close_pos) = after_open.find(close) {
                // Open and close share the line.
                let end_idx = open_idx + open.len() + close_pos + close.len();
                spans.push(CommentSpan {
                    start_line: i + 1,
                    end_line: i + 1,
                    kind: SpanKind::Block,
                    raw_text: line[open_idx..end_idx].to_string(),
                    column_start: column_at(line, open_idx),
                    column_end: line[..end_idx].chars().count(),
                    is_documentation: is_doc,
                    selected: None,
                });
                i += 1;
                continue;
            }

            // Walk forward to the closing line; tolerate a missing close by
            // extending the span to the last line.
            let mut end = lines.len().saturating_sub(1);
            let mut close_end: Option<usize> = None;
            for (j, candidate) in lines.iter().enumerate().skip(i + 1) {
                if let Some(pos) = candidate.find(close) {
                    end = j;
                    close_end = Some(pos + close.len());
                    break;
                }
            }

            let mut raw = String::from(&line[open_idx..]);
            for body in &lines[i + 1..end] {
                raw.push('\n');
                raw.push_str(body);
            }
            let last = lines[end];
            let last_end = close_end.unwrap_or(last.len());
            if end > i {
                raw.push('\n');
                raw.push_str(&last[..last_end]);
            }

            spans.push(CommentSpan {
                start_line: i + 1,
                end_line: end + 1,
                kind: SpanKind::Block,
                raw_text: raw,
                column_start: column_at(line, open_idx),
                column_end: last[..last_end].chars().count(),
                is_documentation: is_doc,
                selected: None,
            });
            i = end + 1;
            continue;
        }

        i += 1;
    }

    spans
}
