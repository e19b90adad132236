mod support;

use predicates::str::contains;
use serde_json::Value;

use support::{lazytask_cmd, TestData};

#[test]
fn lazytask_help_works() {
    lazytask_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("local task list"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add", "list", "toggle", "rm", "clear", "stats", "settings", "theme", "reset",
    ];

    for cmd in subcommands {
        lazytask_cmd().arg(cmd).arg("--help").assert().success();
    }
}

#[test]
fn add_then_list_shows_newest_first() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    data.cmd().args(["add", "Buy milk"]).assert().success();
    data.cmd()
        .args(["add", "Pay rent", "--deadline", "2030-01-31"])
        .assert()
        .success()
        .stdout(contains("deadline: 2030-01-31 23:59 UTC"));

    let output = data.cmd().args(["--json", "list"]).output()?;
    assert!(output.status.success());
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["schema_version"], "lazytask.v1");
    assert_eq!(payload["command"], "list");
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["data"]["display"][0]["title"], "Pay rent");
    assert_eq!(payload["data"]["display"][1]["title"], "Buy milk");
    assert_eq!(payload["data"]["counts"]["total"], 2);

    let stored = data.read_json(&data.tasks_file())?;
    assert_eq!(stored.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn blank_title_adds_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    data.cmd()
        .args(["add", "   "])
        .assert()
        .success()
        .stdout(contains("nothing added"));
    assert!(!data.tasks_file().exists());
    Ok(())
}

#[test]
fn toggle_and_stats() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    let output = data.cmd().args(["--json", "add", "Ship it"]).output()?;
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    let id = payload["data"]["task"]["id"]
        .as_str()
        .ok_or("missing id")?
        .to_string();
    data.cmd().args(["add", "Other"]).assert().success();

    data.cmd()
        .args(["toggle", &id])
        .assert()
        .success()
        .stdout(contains("done"));

    let output = data.cmd().args(["--json", "stats"]).output()?;
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["data"]["completed"], 1);
    assert_eq!(payload["data"]["pending"], 1);
    assert_eq!(payload["data"]["completion_rate_percent"], 50);

    data.cmd()
        .args(["toggle", &id])
        .assert()
        .success()
        .stdout(contains("reopened"));
    Ok(())
}

#[test]
fn unknown_id_is_a_warning_not_a_failure() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    data.cmd()
        .args(["toggle", "missing"])
        .assert()
        .success()
        .stdout(contains("no task with id missing"));
    data.cmd()
        .args(["rm", "missing"])
        .assert()
        .success()
        .stdout(contains("0 removed"));
    Ok(())
}

#[test]
fn rm_and_clear() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    let output = data.cmd().args(["--json", "add", "Gone soon"]).output()?;
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    let id = payload["data"]["task"]["id"]
        .as_str()
        .ok_or("missing id")?
        .to_string();
    data.cmd().args(["add", "Also gone"]).assert().success();

    data.cmd()
        .args(["rm", &id])
        .assert()
        .success()
        .stdout(contains("1 removed"));
    data.cmd()
        .arg("clear")
        .assert()
        .success()
        .stdout(contains("1 removed"));
    assert!(!data.tasks_file().exists());

    data.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("0 shown"));
    Ok(())
}

#[test]
fn invalid_deadline_is_user_error() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    data.cmd()
        .args(["add", "Soon", "--deadline", "next week"])
        .assert()
        .code(2)
        .stderr(contains("Invalid deadline"));

    let output = data
        .cmd()
        .args(["--json", "add", "Soon", "--deadline", "next week"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error"]["kind"], "user_error");
    Ok(())
}
