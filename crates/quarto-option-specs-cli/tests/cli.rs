/*
 * cli.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the optionspecs binary.
 */

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const TOCTREE_BLOCK: &str = "   :caption:           Title for the general case
   :caption:html:html: Title for html
   :caption::html:     Header of other builders with html format
   :caption:epub:      Header for the epub builder
   :maxdepth: 2
";

fn optionspecs(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_optionspecs"))
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("Failed to run optionspecs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn resolve_picks_most_specific_caption() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let input = temp.path().join("block.txt");
    fs::write(&input, TOCTREE_BLOCK).unwrap();

    let output = optionspecs(
        temp.path(),
        &["resolve", "-b", "singlehtml", "-f", "html", "block.txt"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["caption"], "Header of other builders with html format");
    assert_eq!(json["maxdepth"], 2);
}

#[test]
fn resolve_reports_conflicts() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        temp.path().join("block.txt"),
        ":caption:html: One\n:caption:html: Two\n",
    )
    .unwrap();

    let output = optionspecs(
        temp.path(),
        &["resolve", "--builder", "html", "--format", "html", "block.txt"],
    );
    assert!(!output.status.success());
    assert!(
        stderr(&output)
            .contains("Duplicate Directive Option [Q-15-2] duplicate option \"caption:html\""),
        "stderr: {}",
        stderr(&output)
    );
}

#[test]
fn resolve_uses_discovered_option_tables() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        temp.path().join("_optionspecs.yml"),
        "directives:\n  figure:\n    width: int\n    align:\n      kind: choice\n      choices: [left, right]\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("block.txt"),
        ":width: 300\n:width:latex: 120\n:align::latex: Right\n",
    )
    .unwrap();

    let output = optionspecs(
        temp.path(),
        &["resolve", "-b", "latex", "-f", "latex", "-d", "figure", "block.txt"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["width"], 120);
    assert_eq!(json["align"], "right");
}

#[test]
fn resolve_unknown_directive_fails() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    fs::write(temp.path().join("block.txt"), ":caption: x\n").unwrap();

    let output = optionspecs(temp.path(), &["resolve", "-d", "nosuch", "block.txt"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no option table for directive 'nosuch'"));
}

#[test]
fn weigh_prints_specificity() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let output = optionspecs(
        temp.path(),
        &["weigh", "-b", "html", "-f", "html", "caption:html:html", "caption:epub"],
    );
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "caption:html:html  111\ncaption:epub       rejected\n"
    );
}

#[test]
fn tables_lists_builtin_toctree() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let output = optionspecs(temp.path(), &["tables"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("toctree\n"));
    assert!(text.contains("  maxdepth       int\n"));
}

#[test]
fn resolve_reads_mixed_case_field_names() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        temp.path().join("block.txt"),
        ":Caption: General\n:caption:HTML: Html\n:MaxDepth: 3\n",
    )
    .unwrap();

    let output = optionspecs(temp.path(), &["resolve", "-b", "html", "block.txt"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["caption"], "Html");
    assert_eq!(json["maxdepth"], 3);
}

#[test]
fn resolve_rejects_tab_after_field_marker() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    fs::write(temp.path().join("block.txt"), ":caption:\tTabbed\n").unwrap();

    let output = optionspecs(temp.path(), &["resolve", "block.txt"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("Invalid Option Block [Q-15-6] invalid option block"),
        "stderr: {}",
        stderr(&output)
    );
}
