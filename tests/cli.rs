use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_every_action() {
    Command::cargo_bin("mth")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("devices")
                .and(predicate::str::contains("locale"))
                .and(predicate::str::contains("logging"))
                .and(predicate::str::contains("screenshot"))
                .and(predicate::str::contains("switch"))
                .and(predicate::str::contains("video")),
        );
}

#[test]
fn unknown_verb_exits_with_code_one() {
    Command::cargo_bin("mth")
        .unwrap()
        .arg("teleport")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn missing_required_flag_exits_with_code_one() {
    Command::cargo_bin("mth")
        .unwrap()
        .args(["switch", "wifi"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--state"));
}

#[test]
fn invalid_state_value_is_rejected_by_the_parser() {
    Command::cargo_bin("mth")
        .unwrap()
        .args(["switch", "wifi", "-s", "MAYBE"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn video_timeout_above_the_screenrecord_limit_is_rejected() {
    Command::cargo_bin("mth")
        .unwrap()
        .args(["video", "-t", "300"])
        .assert()
        .failure()
        .code(1);
}
