use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};

pub mod language;
pub mod rewrite;
pub mod scan;
pub mod session;
pub mod span;

pub use language::{resolve_profile, supported_extensions, DocShape, EngineError, LanguageProfile};
pub use rewrite::rewrite;
pub use scan::scan;
pub use session::{group_spans, ReviewSession, SpanGroup};
pub use span::{CommentSpan, RewriteResult, SpanKind, SubrangeContext};

/// Configuration passed from the CLI layer (main.rs) into the core logic.
#[derive(Debug)]
pub struct Config {
    pub exts: HashSet<String>,
    pub paths: Vec<PathBuf>,
    pub follow_symlinks: bool,
    pub no_gitignore: bool,
    pub excludes: Vec<String>,
    pub max_bytes: Option<u64>,
    /// Also remove documentation comments (kept by default).
    pub include_docs: bool,
    /// 1-based lines whose comment spans must be preserved.
    pub keep_lines: Vec<usize>,
    pub write: bool,
    pub list: bool,
    pub json: bool,
    pub end_marker: bool,
}

#[derive(serde::Serialize)]
struct FileReport<'a> {
    path: &'a str,
    file_name: String,
    language: &'static str,
    spans: &'a [CommentSpan],
    content: &'a str,
}

pub fn run_with_config(cfg: Config) -> Result<()> {
    let exclude_globset = build_exclude_globset(&cfg.excludes)?;

    let mut had_error = false;
    let mut first_file = true;

    if cfg.json {
        println!("[");
    }

    for raw_root in &cfg.paths {
        // Canonicalise roots so running from arbitrary working dirs is reliable.
        let canon_root = match raw_root.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Skipping root {:?}: {}", raw_root, e);
                had_error = true;
                continue;
            }
        };

        let mut builder = WalkBuilder::new(&canon_root);
        builder.follow_links(cfg.follow_symlinks);

        // Helps avoid edge cases where process CWD is invalid and global ignores need a base.
        builder.current_dir(canon_root.clone());

        if cfg.no_gitignore {
            builder
                .git_ignore(false)
                .git_exclude(false)
                .git_global(false)
                .ignore(false);
        } else {
            builder
                .git_ignore(true)
                .git_exclude(true)
                .git_global(true)
                .ignore(true)
                .require_git(false);
        }

        // Values moved into the 'static filter closure must be owned separately.
        let root_for_filter = canon_root.clone();
        let exclude_globset = exclude_globset.clone();

        builder.filter_entry(move |entry: &DirEntry| {
            // Always keep the root.
            if entry.depth() == 0 {
                return true;
            }

            // Apply user exclude globs, relative to the current root.
            if let Some(ref gs) = exclude_globset {
                let path = entry.path();
                let rel = path.strip_prefix(&root_for_filter).unwrap_or(path);
                let rel_norm = normalize_for_matching(rel);

                if gs.is_match(&rel_norm) {
                    return false;
                }

                // If this is a directory, also try a trailing slash to make patterns
                // like `tests/**` able to prune the whole subtree early.
                if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false)
                    && !rel_norm.ends_with('/')
                {
                    let rel_dir = format!("{rel_norm}/");
                    if gs.is_match(&rel_dir) {
                        return false;
                    }
                }
            }

            true
        });

        let walker = builder.build();

        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    eprintln!("Walk error: {err}");
                    had_error = true;
                    continue;
                }
            };

            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();

            // Files named directly on the command line are always attempted,
            // so an unsupported extension is reported instead of silently
            // skipped. Walked files are filtered to the active extension set.
            let explicit = entry.depth() == 0;
            if !explicit && !matches_ext(path, &cfg.exts) {
                continue;
            }

            let display_path = make_display_path(&canon_root, path);

            if let Some(limit) = cfg.max_bytes
                && let Ok(meta) = fs::metadata(path)
                && meta.len() > limit
            {
                eprintln!(
                    "Skipping {} (size {} bytes > max {} bytes)",
                    display_path,
                    meta.len(),
                    limit
                );
                continue;
            }

            let outcome = review_file(path, &display_path, &cfg)
                .and_then(|result| emit_result(path, &display_path, &result, &cfg, first_file));
            if let Err(err) = outcome {
                eprintln!("Error processing {}: {:#}", display_path, err);
                had_error = true;
            } else {
                first_file = false;
            }
        }
    }

    if cfg.json {
        println!("\n]");
    }

    if had_error {
        anyhow::bail!("One or more files could not be processed. See stderr for details.");
    }

    Ok(())
}

/// Scan one file, apply the configured selection tweaks, and produce the
/// rewrite result. Resolution failure (unknown extension) aborts before any
/// scanning happens.
fn review_file(path: &Path, display_path: &str, cfg: &Config) -> Result<RewriteResult> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    let profile = resolve_profile(ext)?;

    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", display_path))?;
    let text = String::from_utf8_lossy(&bytes).into_owned();

    let mut session = ReviewSession::new(text, profile, None);

    if cfg.include_docs {
        for id in 0..session.spans().len() {
            if session.spans()[id].is_documentation {
                session.set_selection(id, true);
            }
        }
    }

    for &line in &cfg.keep_lines {
        match session.span_at_line(line) {
            Some(id) => {
                session.set_selection(id, false);
            }
            None => eprintln!("{display_path}: no comment on line {line} to keep"),
        }
    }

    Ok(session.finish())
}

fn emit_result(
    path: &Path,
    display_path: &str,
    result: &RewriteResult,
    cfg: &Config,
    first_file: bool,
) -> Result<()> {
    if cfg.list {
        print_span_list(display_path, result);
    } else if cfg.json {
        if !first_file {
            println!(",");
        }
        print_file_json(path, display_path, result)?;
    } else if cfg.write {
        write_in_place(path, display_path, result)?;
    } else {
        print_file(display_path, result, cfg.end_marker);
    }
    Ok(())
}

/// Build a GlobSet from the user–provided `--exclude` patterns.
/// Returns `Ok(None)` if there are no patterns.
fn build_exclude_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();

    for pat in patterns {
        let pat = pat.trim();
        if pat.is_empty() {
            continue;
        }

        let glob =
            Glob::new(pat).with_context(|| format!("Invalid --exclude glob pattern: {pat}"))?;
        builder.add(glob);
    }

    let set = builder
        .build()
        .context("Failed to build exclude glob set")?;

    Ok(Some(set))
}

/// Case-insensitive extension match, using the provided extension set.
pub fn matches_ext(path: &Path, exts: &HashSet<String>) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => exts.contains(&ext.to_ascii_lowercase()),
        None => false,
    }
}

/// Produce a display path relative to `root` (stable regardless of current working directory).
pub fn make_display_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);

    // If root is a file and path == root, rel is empty.
    if rel.as_os_str().is_empty() {
        return path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
    }

    normalize_for_matching(rel)
}

/// Print the rewritten file with a header (and optional end marker).
fn print_file(display_path: &str, result: &RewriteResult, end_marker: bool) {
    println!("========== FILE: {} ==========", display_path);
    print!("{}", result.new_text);

    // Ensure there is a trailing newline before the separator between files.
    if !result.new_text.ends_with('\n') {
        println!();
    }

    if end_marker {
        println!("========== END FILE: {} ==========\n", display_path);
    } else {
        println!();
    }
}

/// One line per detected span: location, kind, documentation flag, and the
/// first line of the comment text.
fn print_span_list(display_path: &str, result: &RewriteResult) {
    for span in &result.spans {
        let loc = if span.start_line == span.end_line {
            span.start_line.to_string()
        } else {
            format!("{}-{}", span.start_line, span.end_line)
        };
        let kind = match span.kind {
            SpanKind::Line => "line",
            SpanKind::Block => "block",
        };
        let doc = if span.is_documentation { " [doc]" } else { "" };
        let preview = span.raw_text.lines().next().unwrap_or("");
        println!("{display_path}:{loc}: {kind}{doc} {preview}");
    }
}

fn print_file_json(path: &Path, display_path: &str, result: &RewriteResult) -> Result<()> {
    let report = FileReport {
        path: display_path,
        file_name: path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string(),
        language: result.language,
        spans: &result.spans,
        content: &result.new_text,
    };

    let json = serde_json::to_string(&report)?;
    print!("{}", json);

    Ok(())
}

fn write_in_place(path: &Path, display_path: &str, result: &RewriteResult) -> Result<()> {
    if result.new_text == result.original_text {
        return Ok(());
    }

    fs::write(path, &result.new_text)
        .with_context(|| format!("Failed to write {}", display_path))?;

    let removed = result.spans.iter().filter(|s| s.should_remove()).count();
    eprintln!(
        "Rewrote {} (removed {} comment{})",
        display_path,
        removed,
        if removed == 1 { "" } else { "s" }
    );

    Ok(())
}

/// Convert paths to a stable, slash-separated form for matching/printing.
fn normalize_for_matching(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
