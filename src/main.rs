use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser};
use decomment::{Config, resolve_profile, run_with_config, supported_extensions};

/// decomment - review and remove comments from source files.
///
/// Recursively scan source files, detect line and block comments by
/// language-specific rules, and print (or write back) the files with the
/// unwanted comments removed. By default it:
///
///   - respects .gitignore / .ignore / git exclude files
///   - keeps documentation comments (JSDoc blocks, Python docstrings, Dart ///)
///   - allows keeping individual comments by line number
#[derive(Parser, Debug)]
#[command(
    name = "decomment",
    author,
    version,
    about = "Detect and selectively remove comments from source files, respecting .gitignore",
    long_about = r#"Recursively scan source files, detect line and block comments by
language-specific rules, and print (or write back) the files with the
unwanted comments removed.

By default it:
  • respects .gitignore / .ignore / git exclude files
  • keeps documentation comments (JSDoc blocks, Python docstrings, Dart ///)
  • prints rewritten files to stdout; use --write to edit in place

Typical usage:
  decomment src/main.py
  decomment -t py,ts src tests
  decomment --list .
  decomment --write --keep 12 lib/app.dart
"#
)]
struct Args {
    /// File extensions / types to include (e.g. py, ts).
    ///
    /// Defaults to every supported language. Can be repeated or
    /// comma-separated:
    ///   decomment -t py
    ///   decomment -t py,ts
    ///   decomment -t py -t ts
    #[arg(
        short = 't',
        long = "type",
        alias = "ext",
        value_name = "EXT",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    exts: Vec<String>,

    /// Paths to scan (files or directories). Defaults to current directory.
    ///
    /// Files named directly are always processed; an unsupported extension
    /// is an error rather than a silent skip.
    #[arg(value_name = "PATH", default_value = ".")]
    paths: Vec<PathBuf>,

    /// Also remove documentation comments.
    ///
    /// Documentation comments (JSDoc-style blocks, Python docstrings, Dart
    /// /// comments) are preserved unless this flag is set.
    #[arg(long = "include-docs")]
    include_docs: bool,

    /// Keep the comment covering this 1-based line (repeatable).
    ///
    /// Applies to every processed file; lines with no comment produce a
    /// warning on stderr:
    ///   decomment --keep 3 --keep 10,12 main.py
    #[arg(
        long = "keep",
        value_name = "LINE",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    keep_lines: Vec<usize>,

    /// List detected comments instead of rewriting.
    ///
    /// One line per comment: path:line(s), kind, a [doc] marker for
    /// documentation comments, and the first line of the comment text.
    #[arg(long = "list", conflicts_with_all = ["write", "json"])]
    list: bool,

    /// Rewrite files in place instead of printing to stdout.
    #[arg(long = "write", conflicts_with = "json")]
    write: bool,

    /// Output a JSON array of { "path", "file_name", "language", "spans", "content" }.
    #[arg(long = "json")]
    json: bool,

    /// Follow symbolic links during traversal.
    #[arg(long = "follow-symlinks")]
    follow_symlinks: bool,

    /// Disable reading .gitignore / .ignore / git exclude files.
    #[arg(long = "no-gitignore")]
    no_gitignore: bool,

    /// Additional glob patterns to exclude (files or directories).
    ///
    /// Patterns are evaluated relative to each PATH root and use glob-style
    /// matching (via globset), e.g.:
    ///
    ///   decomment --exclude 'migrations/**'
    ///   decomment --exclude 'tests/**,*.gen.py'
    #[arg(
        long = "exclude",
        short = 'E',
        value_name = "GLOB",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    excludes: Vec<String>,

    /// Maximum file size to process, in bytes (skip larger files).
    #[arg(long = "max-bytes", value_name = "N")]
    max_bytes: Option<u64>,

    /// Print an explicit END marker after each file (stdout mode only).
    #[arg(long = "end-marker")]
    end_marker: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    // Normalise extensions to lowercase, no leading dot, and reject
    // unsupported languages up front, before any file is scanned.
    let mut ext_set = HashSet::new();
    for e in &args.exts {
        let norm = e.trim().trim_start_matches('.').to_ascii_lowercase();
        if norm.is_empty() {
            continue;
        }
        resolve_profile(&norm)?;
        ext_set.insert(norm);
    }

    if ext_set.is_empty() {
        if !args.exts.is_empty() {
            bail!("No valid extensions provided (after normalisation).");
        }
        ext_set.extend(supported_extensions().iter().map(|e| e.to_string()));
    }

    let cfg = Config {
        exts: ext_set,
        paths: args.paths,
        follow_symlinks: args.follow_symlinks,

        no_gitignore: args.no_gitignore,
        excludes: args.excludes,
        max_bytes: args.max_bytes,
        include_docs: args.include_docs,
        keep_lines: args.keep_lines,
        write: args.write,
        list: args.list,
        json: args.json,
        end_marker: args.end_marker,
    };

    run_with_config(cfg)
}
