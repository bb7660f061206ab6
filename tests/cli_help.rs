use std::process::Command;

#[test]
fn test_help_lists_commands() {
    let bin = env!("CARGO_BIN_EXE_apos-asset");

    let output = Command::new(bin).arg("--help").output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["build", "watch", "clear-cache", "scan", "manifest", "release-id"] {
        assert!(
            stdout.contains(command),
            "help output should list `{}`; got:\n{}",
            command,
            stdout
        );
    }
}

#[test]
fn test_unknown_command_fails() {
    let bin = env!("CARGO_BIN_EXE_apos-asset");

    let output = Command::new(bin).arg("deploy-everything").output().unwrap();

    assert!(!output.status.success());
}
