use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn vyfw(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vyfw"));
    cmd.arg("--data-dir").arg(data_dir).arg("--firewall").arg("edge");
    cmd
}

#[test]
fn show_on_a_fresh_firewall_prints_the_placeholder() {
    let dir = tempdir().expect("tempdir");
    vyfw(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Empty rule set."));
}

#[test]
fn chain_and_rule_mutations_flow_through_to_show() {
    let dir = tempdir().expect("tempdir");

    vyfw(dir.path())
        .args(["chain", "add", "INPUT", "--description", "input chain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chain added"));

    vyfw(dir.path())
        .args([
            "chain",
            "rule-add",
            "INPUT",
            "10",
            "--action",
            "accept",
            "--dest-address",
            "10.0.0.0/24",
            "--protocol",
            "tcp",
            "--state-established",
        ])
        .assert()
        .success();

    vyfw(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "set firewall ipv4 name INPUT rule 10 action 'accept'",
        ))
        .stdout(predicate::str::contains(
            "set firewall ipv4 name INPUT rule 10 destination address '10.0.0.0/24'",
        ))
        .stdout(predicate::str::contains(
            "set firewall ipv4 name INPUT rule 10 state 'established'",
        ));
}

#[test]
fn reorder_to_an_existing_number_fails_with_a_reason() {
    let dir = tempdir().expect("tempdir");

    vyfw(dir.path())
        .args(["chain", "add", "INPUT"])
        .assert()
        .success();
    for number in ["10", "20"] {
        vyfw(dir.path())
            .args(["chain", "rule-add", "INPUT", number, "--action", "accept"])
            .assert()
            .success();
    }

    vyfw(dir.path())
        .args(["chain", "rule-move", "INPUT", "10", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    vyfw(dir.path())
        .args(["chain", "rule-move", "INPUT", "10", "15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rule moved"));
}

#[test]
fn snapshot_create_list_diff_round_trip() {
    let dir = tempdir().expect("tempdir");

    vyfw(dir.path())
        .args(["chain", "add", "INPUT"])
        .assert()
        .success();
    vyfw(dir.path())
        .args(["chain", "rule-add", "INPUT", "10", "--action", "accept"])
        .assert()
        .success();

    let output = vyfw(dir.path())
        .args(["snapshot", "create"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let label = String::from_utf8(output).expect("utf8").trim().to_string();
    assert!(!label.is_empty());

    vyfw(dir.path())
        .args(["snapshot", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(label.clone()));

    vyfw(dir.path())
        .args(["chain", "rule-add", "INPUT", "20", "--action", "drop"])
        .assert()
        .success();

    vyfw(dir.path())
        .args(["diff", &label, "current", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added=3"))
        .stdout(predicate::str::contains("removed=0"));
}

#[test]
fn render_with_delete_emits_the_wipe_preamble_first() {
    let dir = tempdir().expect("tempdir");

    vyfw(dir.path())
        .args(["chain", "add", "INPUT"])
        .assert()
        .success();

    vyfw(dir.path())
        .args(["render", "--delete"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#\n# Delete all firewall"))
        .stdout(predicate::str::contains("delete firewall"));
}

#[test]
fn diff_of_the_same_label_is_rejected() {
    let dir = tempdir().expect("tempdir");
    vyfw(dir.path())
        .args(["diff", "a", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("labels must differ"));
}

#[test]
fn json_export_includes_the_schema_version() {
    let dir = tempdir().expect("tempdir");
    vyfw(dir.path())
        .args(["chain", "add", "INPUT"])
        .assert()
        .success();
    vyfw(dir.path())
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\": 1"));
}
