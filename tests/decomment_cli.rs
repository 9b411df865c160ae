use std::error::Error;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn prints_rewritten_files_with_headers() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let src_dir = temp.child("src");
    src_dir.create_dir_all()?;

    let main_js = src_dir.child("main.js");
    main_js.write_str("// drop this\nlet x = 1; // note\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "========== FILE: src/main.js ==========",
        ))
        .stdout(predicate::str::contains("let x = 1;"))
        .stdout(predicate::str::contains("drop this").not())
        .stdout(predicate::str::contains("note").not());

    Ok(())
}

#[test]
fn docstrings_survive_unless_include_docs_is_set() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("sample.py");
    f.write_str("def f():\n    \"\"\"Keep me.\"\"\"\n    return 1  # drop me\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep me."))
        .stdout(predicate::str::contains("drop me").not());

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("--include-docs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep me.").not())
        .stdout(predicate::str::contains("return 1"));

    Ok(())
}

#[test]
fn keep_flag_preserves_the_named_line() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("notes.py");
    f.write_str("# one\n# two\nx = 1\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("--keep")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("# one"))
        .stdout(predicate::str::contains("# two").not());

    Ok(())
}

#[test]
fn keep_flag_warns_on_comment_free_lines() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("plain.py").write_str("x = 1\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("--keep")
        .arg("1")
        .assert()
        .success()
        // Root-relative path, like every other diagnostic.
        .stderr(predicate::str::is_match(
            r"(?m)^plain\.py: no comment on line 1 to keep$",
        )?);

    Ok(())
}

#[test]
fn write_flag_rewrites_in_place() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("app.ts");
    f.write_str("// gone\nconst x = 1;\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("--write")
        .assert()
        .success()
        .stderr(predicate::str::contains("Rewrote app.ts"));

    f.assert("const x = 1;\n");

    Ok(())
}

#[test]
fn write_flag_leaves_clean_files_untouched() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("clean.ts");
    f.write_str("const x = 1;\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("--write")
        .assert()
        .success()
        .stderr(predicate::str::contains("Rewrote").not());

    f.assert("const x = 1;\n");

    Ok(())
}

#[test]
fn write_flag_keeps_newline_only_files_intact() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("blank.py");
    f.write_str("\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("--write")
        .assert()
        .success()
        .stderr(predicate::str::contains("Rewrote").not());

    f.assert("\n");

    Ok(())
}

#[test]
fn list_mode_shows_spans_with_doc_markers() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("lib.js");
    f.write_str("/**\n * docs\n */\nfunction f() {} // trailing\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("lib.js:1-3: block [doc] /**"))
        .stdout(predicate::str::contains("lib.js:4: line // trailing"));

    Ok(())
}

#[test]
fn json_output_carries_language_and_spans() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let src_dir = temp.child("src");
    src_dir.create_dir_all()?;
    src_dir.child("main.js").write_str("// gone\nlet x = 1;\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"path\":\"src/main.js\""))
        .stdout(predicate::str::contains("\"language\":\"JavaScript\""))
        .stdout(predicate::str::contains("\"kind\":\"Line\""))
        .stdout(predicate::str::contains("\"content\":\"let x = 1;\\n\""));

    Ok(())
}

#[test]
fn unsupported_extension_named_directly_is_an_error() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("query.sql");
    f.write_str("-- comment\nselect 1;\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("query.sql")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported language"));

    Ok(())
}

#[test]
fn unsupported_type_flag_is_rejected_before_scanning() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("main.py").write_str("# x\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("sql")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported language"))
        .stdout(predicate::str::contains("FILE:").not());

    Ok(())
}

#[test]
fn respects_gitignore_by_default() -> TestResult {
    let temp = assert_fs::TempDir::new()?;

    temp.child(".gitignore").write_str("ignored.py\n")?;

    temp.child("included.py").write_str("# c\nprint('included')\n")?;
    temp.child("ignored.py").write_str("print('ignored')\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("included.py"))
        .stdout(predicate::str::contains("ignored.py").not());

    Ok(())
}

#[test]
fn exclude_glob_skips_matching_paths() -> TestResult {
    let temp = assert_fs::TempDir::new()?;

    let src = temp.child("src");
    let tests = temp.child("tests");
    src.create_dir_all()?;
    tests.create_dir_all()?;

    src.child("main.py").write_str("print('main')\n")?;
    tests.child("test_example.py").write_str("print('test')\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("--exclude")
        .arg("tests/**")
        .assert()
        .success()
        .stdout(predicate::str::contains("src/main.py"))
        .stdout(predicate::str::contains("tests/test_example.py").not());

    Ok(())
}

#[test]
fn type_flag_narrows_the_extension_set() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    temp.child("a.py").write_str("# py\nx = 1\n")?;
    temp.child("b.js").write_str("// js\nlet y = 2;\n")?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("py")
        .assert()
        .success()
        .stdout(predicate::str::contains("a.py"))
        .stdout(predicate::str::contains("b.js").not());

    Ok(())
}

#[test]
fn max_bytes_skips_large_files_and_logs_to_stderr() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("big.py");

    // Create a >50-byte file
    let content = "print('x')\n".repeat(10);
    f.write_str(&content)?;

    let mut cmd = cargo_bin_cmd!("decomment");
    cmd.current_dir(&temp)
        .arg("--max-bytes")
        .arg("50")
        .assert()
        .success()
        .stdout(predicate::str::contains("big.py").not())
        .stderr(predicate::str::contains("Skipping big.py"));

    Ok(())
}
