//! Integration tests for ocdiff
//!
//! These tests run the built binary against YANG models written to a temp dir.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const EXTENSIONS: &str = r#"module openconfig-extensions {
  namespace "http://openconfig.net/yang/openconfig-ext";
  prefix "oc-ext";

  extension openconfig-version {
    argument "semver";
  }
}
"#;

fn module(name: &str, version: Option<&str>, body: &str) -> String {
    let version = version
        .map(|v| format!("  oc-ext:openconfig-version \"{}\";\n", v))
        .unwrap_or_default();
    format!(
        "module {name} {{\n  namespace \"urn:{name}\";\n  prefix \"{name}\";\n\n  \
         import openconfig-extensions {{ prefix oc-ext; }}\n\n{version}\n{body}\n}}\n"
    )
}

/// Writes `old/` and `new/` model sets, each with the extensions module.
fn models(old: &str, new: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (side, body) in [("old", old), ("new", new)] {
        let side_dir = dir.path().join(side);
        fs::create_dir_all(&side_dir).unwrap();
        fs::write(side_dir.join("openconfig-extensions.yang"), EXTENSIONS).unwrap();
        fs::write(side_dir.join("m.yang"), body).unwrap();
    }
    dir
}

fn type_change_models() -> TempDir {
    models(
        &module("m", Some("1.2.0"), "  leaf leaf-y { type string; }\n  leaf kept { type int8; }"),
        &module(
            "m",
            Some("1.2.1"),
            "  leaf leaf-y { type uint32; }\n  leaf kept { type int8; }\n  leaf fresh { type boolean; }",
        ),
    )
}

fn ocdiff(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ocdiff"))
        .args(args)
        .current_dir(dir)
        .env_remove("OCDIFF_LOG")
        .output()
        .expect("failed to run ocdiff")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

const FILE_ARGS: [&str; 9] = [
    "diff",
    "--oldp",
    "old",
    "--newp",
    "new",
    "--oldfiles",
    "old/m.yang",
    "--newfiles",
    "new/m.yang",
];

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let dir = TempDir::new().unwrap();
    let output = ocdiff(dir.path(), &["--help"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("ocdiff"));
    assert!(out.contains("Backward-compatibility checker for OpenConfig YANG models"));

    let output = ocdiff(dir.path(), &["version"]);
    assert!(stdout(&output).starts_with("ocdiff v"));
}

#[test]
fn test_diff_reports_all_changes() {
    let dir = type_change_models();
    let output = ocdiff(dir.path(), &FILE_ARGS);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout(&output),
        "leaf updated: /m/leaf-y: type changed from Ystring to Yuint32 (\"m\": openconfig-version change 1.2.0 -> 1.2.1)\n\
         leaf added: /m/fresh (\"m\": openconfig-version change 1.2.0 -> 1.2.1)\n"
    );
}

#[test]
fn test_disallowed_incompats_exit_code() {
    let dir = type_change_models();
    let mut args = FILE_ARGS.to_vec();
    args.push("--disallowed-incompats");
    let output = ocdiff(dir.path(), &args);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        "Backward-incompatible changes not covered by version increments per semver.org:\n\
         leaf updated: /m/leaf-y: type changed from Ystring to Yuint32 (\"m\": openconfig-version change 1.2.0 -> 1.2.1)\n"
    );
}

#[test]
fn test_major_bump_passes_disallowed_check() {
    let dir = models(
        &module("m", Some("1.0.0"), "  leaf leaf-z { type string; }"),
        &module("m", Some("2.0.0"), ""),
    );
    let mut args = FILE_ARGS.to_vec();
    args.push("--disallowed-incompats");
    let output = ocdiff(dir.path(), &args);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_root_discovery() {
    let dir = models(
        &module("m", Some("1.0.0"), "  container c {\n    leaf gone { type string; }\n  }"),
        &module("m", Some("1.0.1"), "  container c;"),
    );
    let output = ocdiff(
        dir.path(),
        &["diff", "--oldroot", "old", "--newroot", "new", "--disallowed-incompats"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("leaf deleted: /m/c/gone"));
}

#[test]
fn test_github_comment_output() {
    let dir = type_change_models();
    let mut args = FILE_ARGS.to_vec();
    args.push("--github-comment");
    let output = ocdiff(dir.path(), &args);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "leaf updated: `/m/leaf-y`\n* type changed from Ystring to Yuint32\n* (\"m\": openconfig-version change 1.2.0 -> 1.2.1)\n\n\
         leaf added: `/m/fresh`\n* (\"m\": openconfig-version change 1.2.0 -> 1.2.1)\n\n"
    );
}

#[test]
fn test_json_output() {
    let dir = type_change_models();
    let mut args = FILE_ARGS.to_vec();
    args.extend(["--format", "json", "--disallowed-incompats"]);
    let output = ocdiff(dir.path(), &args);

    assert_eq!(output.status.code(), Some(1));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["disallowed_incompats_only"], true);
    let changes = summary["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0]["action"], "updated");
    assert_eq!(changes[0]["path"], "/m/leaf-y");
    assert_eq!(changes[0]["comments"][0], "type changed from Ystring to Yuint32");
}

#[test]
fn test_config_file_sets_style() {
    let dir = type_change_models();
    fs::write(dir.path().join("ocdiff.toml"), "[diff]\ngithub_comment = true\n").unwrap();
    let output = ocdiff(dir.path(), &FILE_ARGS);

    assert!(output.status.success());
    assert!(stdout(&output).starts_with("leaf updated: `/m/leaf-y`\n"));
}

#[test]
fn test_parse_error_fails() {
    let dir = models(&module("m", Some("1.0.0"), "  leaf broken {"), &module("m", Some("1.0.0"), ""));
    let output = ocdiff(dir.path(), &FILE_ARGS);

    assert!(!output.status.success());
    assert_eq!(stdout(&output), "");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("m.yang"), "{}", stderr);
    assert!(stderr.contains("missing '}'"), "{}", stderr);
}

#[test]
fn test_missing_inputs_fail() {
    let dir = TempDir::new().unwrap();
    let output = ocdiff(dir.path(), &["diff"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no YANG files given"));
}

#[test]
fn test_versions_listing() {
    let dir = type_change_models();
    fs::write(dir.path().join("old/plain.yang"), "module plain {\n  prefix p;\n}\n").unwrap();
    let output = ocdiff(dir.path(), &["versions", "-p", "old", "old/m.yang", "old/plain.yang"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "m.yang: openconfig-version:\"1.2.0\"\nopenconfig-extensions.yang:\nplain.yang:\n"
    );
}
