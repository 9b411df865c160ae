use crate::scan::source_lines;
use crate::span::{CommentSpan, SpanKind};

#[derive(Clone, Copy)]
enum Edit {
    /// Drop the line entirely.
    Drop,
    /// Keep the code before a trailing line comment, trailing whitespace
    /// trimmed. `cut` is the character column where the leader starts.
    TrimFrom { cut: usize },
}

/// Byte offset of the n-th character (saturating at end of line).
fn byte_at_char(line: &str, n: usize) -> usize {
    line.char_indices().nth(n).map_or(line.len(), |(b, _)| b)
}

/// Reconstruct `text` with every span whose selection resolves to "remove"
/// taken out. Kept spans (explicitly or by documentation default) are copied
/// verbatim, trailing content included.
///
/// Removal policy per line: a trailing line comment loses only its comment
/// portion (the line is dropped if no code remains); whole-line comments and
/// every line of a block span are dropped entirely.
pub fn rewrite(text: &str, spans: &[CommentSpan]) -> String {
    let (lines, had_trailing_newline) = source_lines(text);
    let mut edits: Vec<Option<Edit>> = vec![None; lines.len()];

    for span in spans {
        if !span.should_remove() {
            continue;
        }
        match span.kind {
            SpanKind::Line => {
                let idx = span.start_line - 1;
                if idx < lines.len() {
                    edits[idx] = Some(Edit::TrimFrom {
                        cut: span.column_start - 1,
                    });
                }
            }
            SpanKind::Block => {
                for line in span.start_line..=span.end_line {
                    let idx = line - 1;
                    if idx < lines.len() {
                        edits[idx] = Some(Edit::Drop);
                    }
                }
            }
        }
    }

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        match edits[idx] {
            None => kept.push(line),
            Some(Edit::Drop) => {}
            Some(Edit::TrimFrom { cut }) => {
                let code = line[..byte_at_char(line, cut)].trim_end();
                if !code.is_empty() {
                    kept.push(code);
                }
            }
        }
    }

    let mut out = kept.join("\n");
    // An empty `out` can mean "every line was dropped" (no newline) or "the
    // only kept line is empty" (newline restored); only `kept` tells them apart.
    if had_trailing_newline && !kept.is_empty() {
        out.push('\n');
    }
    out
}
