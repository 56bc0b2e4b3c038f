use std::process::Command;

fn binary_output(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dirmerge"))
        .args(args)
        .output()
        .unwrap_or_else(|error| panic!("failed to run dirmerge: {error}"))
}

#[test]
fn dirmerge_help_lists_usage() {
    let output = binary_output(&["--help"]);
    assert!(output.status.success(), "--help should succeed");
    assert!(
        output.stderr.is_empty(),
        "help output should not write to stderr"
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains("Usage: dirmerge"));
    assert!(stdout.contains("name-kind-conflict"));
}

#[test]
fn dirmerge_without_operands_fails_with_diagnostic() {
    let output = binary_output(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.starts_with("dirmerge: error: missing operands"));
}

#[test]
fn dirmerge_rejects_unknown_flag() {
    let output = binary_output(&["--definitely-not-a-flag"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("--definitely-not-a-flag"));
}
