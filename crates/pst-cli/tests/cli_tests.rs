//! Integration tests for the `pst` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the args, decode
//! and encode subcommands through the actual binary, including stdin/stdout
//! piping, file I/O, logging and roundtrip correctness.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the sample.json fixture.
fn sample_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.json")
}

/// Helper: path to the sample.pst fixture.
fn sample_pst_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.pst")
}

/// Helper: a `pst` command with logging left at its default.
fn pst() -> Command {
    let mut cmd = Command::cargo_bin("pst").unwrap();
    cmd.env_remove("PST_LOG");
    cmd
}

/// Helper: parse a command's stdout as JSON.
fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("pst should run");
    assert!(output.status.success(), "pst failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// Args subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn args_decodes_command_line() {
    pst()
        .args(["args", "--", "name:", "Alice", "-v", "tags:", "{", "a", "b", "}"])
        .assert()
        .success()
        .stdout(r#"{"name":"Alice","v":true,"tags":["a","b"]}"#.to_owned() + "\n");
}

#[test]
fn args_keep_spaces_inside_one_argument() {
    let json = stdout_json(pst().args(["args", "--", "title:", "two words"]));
    assert_eq!(json, serde_json::json!({"title": "two words"}));
}

#[test]
fn args_with_nothing_is_null() {
    pst().arg("args").assert().success().stdout("null\n");
}

#[test]
fn args_split_into_positionals_and_options() {
    let json = stdout_json(pst().args(["args", "--split", "--", "build", "-j", "4", "--", "-x"]));
    assert_eq!(
        json,
        serde_json::json!({"positional": ["build", "-x"], "options": {"j": 4}})
    );
}

#[test]
fn args_split_keeps_empty_argument() {
    let json = stdout_json(pst().args(["args", "--split", "--", "out:", "", "dst"]));
    assert_eq!(
        json,
        serde_json::json!({"positional": ["dst"], "options": {"out": ""}})
    );
}

#[test]
fn args_split_bundled_flags() {
    let bundled = stdout_json(pst().args(["args", "--split", "--", "-ab"]));
    let separate = stdout_json(pst().args(["args", "--split", "--", "-a", "-b"]));
    assert_eq!(bundled, separate);
    assert_eq!(bundled["options"], serde_json::json!({"a": true, "b": true}));
}

#[test]
fn args_split_without_delimiter() {
    let json = stdout_json(pst().args(["args", "--split", "--no-delimiter", "--", "a", "--", "-b"]));
    assert_eq!(
        json,
        serde_json::json!({"positional": ["a"], "options": {"": true, "b": true}})
    );
}

#[test]
fn no_delimiter_requires_split() {
    pst()
        .args(["args", "--no-delimiter", "--", "a"])
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decode_stdin_to_stdout() {
    pst()
        .arg("decode")
        .write_stdin("a: 1 b: { 2 3 }")
        .assert()
        .success()
        .stdout("{\"a\":1,\"b\":[2,3]}\n");
}

#[test]
fn decode_file() {
    let json = stdout_json(pst().args(["decode", "-i", sample_pst_path()]));
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Alice",
            "v": true,
            "jobs": 4,
            "tags": ["x y", "z", 1.5],
            "nested": {"a": 1}
        })
    );
}

#[test]
fn decode_file_to_file() {
    let json_path = "/tmp/pst-test-decode-output.json";
    let _ = std::fs::remove_file(json_path);

    pst()
        .args(["decode", "-i", sample_pst_path(), "-o", json_path])
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(json_path).expect("output JSON file must exist");
    assert!(content.contains("Alice"), "Decoded JSON should contain 'Alice'");

    let _ = std::fs::remove_file(json_path);
}

#[test]
fn decode_pretty() {
    pst()
        .args(["decode", "--pretty"])
        .write_stdin("a: 1")
        .assert()
        .success()
        .stdout("{\n  \"a\": 1\n}\n");
}

#[test]
fn decode_empty_input_is_null() {
    pst().arg("decode").write_stdin("").assert().success().stdout("null\n");
}

#[test]
fn decode_malformed_input_still_succeeds() {
    pst().arg("decode").write_stdin("} }} x").assert().success().stdout("\"x\"\n");
}

#[test]
fn decode_invalid_utf8_is_replaced() {
    pst()
        .arg("decode")
        .write_stdin(b"k: \xff".to_vec())
        .assert()
        .success()
        .stdout("{\"k\":\"\u{fffd}\"}\n");
}

#[test]
fn decode_missing_file_fails() {
    pst()
        .args(["decode", "-i", "/nonexistent/input.pst"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Encode subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_stdin_to_stdout() {
    pst()
        .arg("encode")
        .write_stdin(r#"{"v":true,"out":"a b","n":[1,2]}"#)
        .assert()
        .success()
        .stdout("v: true out: \"a b\" n: { 1 2 }\n");
}

#[test]
fn encode_with_flags() {
    pst()
        .args(["encode", "--flags"])
        .write_stdin(r#"{"v":true,"verbose":true,"q":false}"#)
        .assert()
        .success()
        .stdout("-v --verbose q: false\n");
}

#[test]
fn encode_with_short_and_long_flags() {
    let input = r#"{"v":true,"verbose":true}"#;
    pst()
        .args(["encode", "--short-flags"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("-v verbose: true\n");
    pst()
        .args(["encode", "--long-flags"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("--v --verbose\n");
}

#[test]
fn encode_with_tab_indent() {
    pst()
        .args(["encode", "--tab"])
        .write_stdin(r#"{"a":[1,2]}"#)
        .assert()
        .success()
        .stdout("a: {\n\t1\n\t2\n}\n");
}

#[test]
fn encode_with_space_indent() {
    pst()
        .args(["encode", "--indent", "2"])
        .write_stdin(r#"{"a":{"b":1}}"#)
        .assert()
        .success()
        .stdout("a: {{\n  b: 1\n}}\n");
}

#[test]
fn encode_with_escape() {
    pst()
        .args(["encode", "--escape"])
        .write_stdin(r#"{"s":"a\nb"}"#)
        .assert()
        .success()
        .stdout("s: \"a\\nb\"\n");
}

#[test]
fn encode_explicit() {
    pst()
        .args(["encode", "--explicit"])
        .write_stdin("[1,2]")
        .assert()
        .success()
        .stdout("{ 1 2 }\n");
}

#[test]
fn encode_conflicting_indent_fails() {
    pst()
        .args(["encode", "--tab", "--indent", "2"])
        .write_stdin("{}")
        .assert()
        .failure();
}

#[test]
fn encode_invalid_json_fails() {
    pst()
        .arg("encode")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON input"));
}

#[test]
fn encode_out_of_range_integer_fails() {
    pst()
        .arg("encode")
        .write_stdin("[18446744073709551615]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported value type"));
}

#[test]
fn encode_file_to_file() {
    let output_path = "/tmp/pst-test-encode-output.pst";
    let _ = std::fs::remove_file(output_path);

    pst()
        .args(["encode", "-i", sample_json_path(), "-o", output_path])
        .assert()
        .success();

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    assert!(content.starts_with("name: Alice verbose: true jobs: 4"));
    assert!(content.contains("output: \"build dir\""));
    assert!(!content.ends_with('\n'), "file output has no trailing newline");

    let _ = std::fs::remove_file(output_path);
}

// ─────────────────────────────────────────────────────────────────────────────
// Roundtrip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn roundtrip_json_through_pst() {
    let original = std::fs::read_to_string(sample_json_path()).expect("fixture must exist");
    let variants: [&[&str]; 4] = [&[], &["--flags"], &["--tab"], &["--escape", "--explicit"]];
    for extra in variants {
        let encoded = pst()
            .arg("encode")
            .args(extra)
            .write_stdin(original.clone())
            .output()
            .expect("encode should succeed");
        assert!(encoded.status.success());

        let decoded = stdout_json(pst().arg("decode").write_stdin(encoded.stdout));
        let expected: serde_json::Value = serde_json::from_str(&original).unwrap();
        assert_eq!(decoded, expected, "roundtrip with {extra:?}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn quiet_by_default() {
    pst().arg("decode").write_stdin("}").assert().success().stderr("");
}

#[test]
fn debug_log_reports_ignored_brackets() {
    pst()
        .env("PST_LOG", "debug")
        .arg("decode")
        .write_stdin("}")
        .assert()
        .success()
        .stderr(predicate::str::contains("ignoring unmatched closing bracket"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Help
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    pst()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("args"))
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("encode"));
}
