//! Integration tests for the `json2bq` binary.

use std::path::Path;
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn json2bq(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_json2bq"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run")
}

fn json2bq_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_json2bq"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary should run");
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("binary should finish")
}

fn write_schema(dir: &Path, contents: &str) -> String {
    let path = dir.join("schema.json");
    std::fs::write(&path, contents).expect("write schema");
    path.display().to_string()
}

#[test]
fn prints_formatted_source_to_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema: String = write_schema(
        dir.path(),
        r#"[{"type":"INTEGER","name":"numbers"},{"type":"STRING","name":"currency_code"}]"#,
    );
    let output: Output = json2bq(&["--schemaFile", &schema]);
    assert!(output.status.success());
    let stdout: String = String::from_utf8(output.stdout).expect("utf-8 stdout");
    assert!(stdout.starts_with("package main\n"));
    assert!(stdout.contains("\t\tName: \"currency_code\",\n"));
    assert!(output.stderr.is_empty());
}

#[test]
fn package_name_flag_and_output_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema: String = write_schema(dir.path(), r#"[{"type":"DATE","name":"day"}]"#);
    let out_path = dir.path().join("schema.go");
    let output: Output = json2bq(&[
        "--schemaFile",
        &schema,
        "--packageName",
        "tables",
        "-o",
        &out_path.display().to_string(),
    ]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let written: String = std::fs::read_to_string(&out_path).expect("output file");
    assert!(written.starts_with("package tables\n"));
    assert!(written.contains("bigquery.DateFieldType"));
}

#[test]
fn missing_schema_file_flag_fails() {
    let output: Output = json2bq(&[]);
    assert_eq!(Some(1), output.status.code());
    let stderr: String = String::from_utf8(output.stderr).expect("utf-8 stderr");
    assert!(stderr.starts_with("Error: failed to read file"), "{stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_type_fails_with_no_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema: String = write_schema(dir.path(), r#"[{"type":"NUMBER","name":"n"}]"#);
    let output: Output = json2bq(&["--schemaFile", &schema]);
    assert_eq!(Some(1), output.status.code());
    assert!(output.stdout.is_empty());
    let stderr: String = String::from_utf8(output.stderr).expect("utf-8 stderr");
    assert!(stderr.contains(&format!("unknown field type {schema} - NUMBER")), "{stderr}");
}

#[test]
fn dash_reads_schema_from_stdin() {
    let output: Output = json2bq_with_stdin(
        &["--schemaFile", "-"],
        r#"[{"type":"BOOLEAN","name":"b","mode":"Required"}]"#,
    );
    assert!(output.status.success());
    let stdout: String = String::from_utf8(output.stdout).expect("utf-8 stdout");
    let expected: &str = "\t&bigquery.FieldSchema{
\t\tName:     \"b\",
\t\tType:     bigquery.BooleanFieldType,
\t\tRepeated: true,
\t},
";
    assert!(stdout.contains(expected), "{stdout}");
}

#[test]
fn unknown_type_on_stdin_names_stdin() {
    let output: Output =
        json2bq_with_stdin(&["--schemaFile", "-"], r#"[{"type":"NUMBER","name":"n"}]"#);
    assert_eq!(Some(1), output.status.code());
    assert!(output.stdout.is_empty());
    let stderr: String = String::from_utf8(output.stderr).expect("utf-8 stderr");
    assert!(stderr.contains("unknown field type <stdin> - NUMBER"), "{stderr}");
}

#[test]
fn unwritable_output_names_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema: String = write_schema(dir.path(), r#"[{"type":"DATE","name":"day"}]"#);
    let out_path: String = dir.path().join("missing").join("schema.go").display().to_string();
    let output: Output = json2bq(&["--schemaFile", &schema, "-o", &out_path]);
    assert_eq!(Some(1), output.status.code());
    let stderr: String = String::from_utf8(output.stderr).expect("utf-8 stderr");
    assert!(
        stderr.starts_with(&format!("Error: failed to write file {out_path}: ")),
        "{stderr}"
    );
}

#[test]
fn help_shows_flags_and_sample() {
    let output: Output = json2bq(&["--help"]);
    assert!(output.status.success());
    let stdout: String = String::from_utf8(output.stdout).expect("utf-8 stdout");
    assert!(stdout.contains("--schemaFile"));
    assert!(stdout.contains("--packageName"));
    assert!(stdout.contains("Sample output:"));
    assert!(stdout.contains("Long flags take two dashes"));
}
