use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn tf_help_works() {
    Command::cargo_bin("tf")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("TaskFlow"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "register", "login", "category", "task", "progress", "theme", "clear",
    ];

    for cmd in subcommands {
        Command::cargo_bin("tf")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}
