use assert_cmd::Command;

use predicates::prelude::*;

#[test]
fn answers_ping() {
    let mut cmd = Command::cargo_bin("loctrans-core").unwrap();
    cmd.write_stdin("{\"id\": 7, \"cmd\": \"ping\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"ok\""))
        .stdout(predicate::str::contains("loctrans-core alive"));
}

#[test]
fn keeps_the_set_between_requests() {
    let input = [
        r#"{"id": 1, "cmd": "set.add", "payload": {"resources": [{"key": "a", "source": "A", "project": "p"}]}}"#,
        r#"{"id": 2, "cmd": "set.size"}"#,
    ]
    .join("\n");

    let mut cmd = Command::cargo_bin("loctrans-core").unwrap();
    cmd.write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"size\":1"));
}

#[test]
fn reports_bad_requests_without_exiting() {
    let input = "not json\n{\"id\": 3, \"cmd\": \"nope\"}\n{\"id\": 4, \"cmd\": \"ping\"}\n";

    let mut cmd = Command::cargo_bin("loctrans-core").unwrap();
    cmd.write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("invalid json"))
        .stdout(predicate::str::contains("unknown command"))
        .stdout(predicate::str::contains("\"id\":4"));
}
