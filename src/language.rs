use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unsupported language for extension `{0}`")]
    UnsupportedLanguage(String),
}

/// A structural pattern identifying documentation comments. Shapes are
/// evaluated in the order the profile lists them; the first one that applies
/// to the span's kind and matches wins.
#[derive(Debug)]
pub enum DocShape {
    /// Block span whose opening delimiter continues into this token
    /// (the `/**` shape). Ignored for line spans.
    BlockOpener(&'static str),
    /// Line span whose comment text begins with this token (Dart `///`).
    /// Ignored for block spans.
    LineLeader(&'static str),
    /// The nearest non-blank, non-comment line above the span matches this
    /// header pattern (Python `def`/`class` ending in `:`). Applies to both
    /// kinds.
    PrecedingHeader(Regex),
}

/// Static per-language lexical rules: how comments start and end, and which
/// shapes count as documentation.
#[derive(Debug)]
pub struct LanguageProfile {
    pub name: &'static str,
    /// Lookup keys, lowercase, without the leading dot.
    pub extensions: &'static [&'static str],
    pub line_leader: &'static str,
    /// (open, close) delimiter pairs. Python carries two (`"""` and `'''`);
    /// the first pair whose opener starts the trimmed line wins.
    pub block_delimiters: &'static [(&'static str, &'static str)],
    pub doc_shapes: Vec<DocShape>,
}

impl LanguageProfile {
    /// Block delimiter pair whose opener begins the (already trimmed) line.
    pub(crate) fn block_open_at(&self, trimmed: &str) -> Option<(&'static str, &'static str)> {
        self.block_delimiters
            .iter()
            .copied()
            .find(|(open, _)| trimmed.starts_with(open))
    }

    pub(crate) fn line_comment_is_doc(
        &self,
        comment: &str,
        line_idx: usize,
        lines: &[&str],
    ) -> bool {
        for shape in &self.doc_shapes {
            match shape {
                DocShape::BlockOpener(_) => {}
                DocShape::LineLeader(tok) => {
                    if comment.starts_with(tok) {
                        return true;
                    }
                }
                DocShape::PrecedingHeader(re) => {
                    if self.preceding_header_matches(re, line_idx, lines) {
                        return true;
                    }
                }
            }
        }
        false
    }

    pub(crate) fn block_comment_is_doc(
        &self,
        trimmed: &str,
        line_idx: usize,
        lines: &[&str],
    ) -> bool {
        for shape in &self.doc_shapes {
            match shape {
                DocShape::BlockOpener(tok) => {
                    if trimmed.starts_with(tok) {
                        return true;
                    }
                }
                DocShape::LineLeader(_) => {}
                DocShape::PrecedingHeader(re) => {
                    if self.preceding_header_matches(re, line_idx, lines) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Backward-look used by docstring conventions: skip blank lines and
    /// line comments, then test the first real line against the header
    /// pattern. Only that one line is consulted.
    fn preceding_header_matches(&self, re: &Regex, line_idx: usize, lines: &[&str]) -> bool {
        for j in (0..line_idx).rev() {
            let prev = lines[j].trim();
            if prev.is_empty() || prev.starts_with(self.line_leader) {
                continue;
            }
            return re.is_match(prev);
        }
        false
    }
}

static PROFILES: LazyLock<Vec<LanguageProfile>> = LazyLock::new(|| {
    let header = |pattern: &str| {
        DocShape::PrecedingHeader(Regex::new(pattern).expect("valid doc-shape pattern"))
    };

    vec![
        LanguageProfile {
            name: "Python",
            extensions: &["py"],
            line_leader: "#",
            block_delimiters: &[("\"\"\"", "\"\"\""), ("'''", "'''")],
            doc_shapes: vec![header(r"^(def|class)\s+\w+.*:\s*$")],
        },
        LanguageProfile {
            name: "JavaScript",
            extensions: &["js"],
            line_leader: "//",
            block_delimiters: &[("/*", "*/")],
            doc_shapes: vec![DocShape::BlockOpener("/**")],
        },
        LanguageProfile {
            name: "TypeScript",
            extensions: &["ts", "tsx"],
            line_leader: "//",
            block_delimiters: &[("/*", "*/")],
            doc_shapes: vec![DocShape::BlockOpener("/**")],
        },
        LanguageProfile {
            name: "Dart",
            extensions: &["dart"],
            line_leader: "//",
            block_delimiters: &[("/*", "*/")],
            doc_shapes: vec![DocShape::BlockOpener("/**"), DocShape::LineLeader("///")],
        },
    ]
});

/// Look up the profile for a file extension. Leading dot and case are
/// tolerated. Failure is terminal: callers must reject the input before any
/// scanning is attempted.
pub fn resolve_profile(extension: &str) -> Result<&'static LanguageProfile, EngineError> {
    let norm = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    PROFILES
        .iter()
        .find(|p| p.extensions.contains(&norm.as_str()))
        .ok_or(EngineError::UnsupportedLanguage(norm))
}

/// All extensions the profile table recognizes.
pub fn supported_extensions() -> Vec<&'static str> {
    PROFILES.iter().flat_map(|p| p.extensions.iter().copied()).collect()
}
