mod support;

use predicates::str::contains;
use serde_json::Value;

use support::TestData;

#[test]
fn settings_show_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    let output = data.cmd().args(["--json", "settings", "show"]).output()?;
    assert!(output.status.success());
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["command"], "settings show");
    assert_eq!(payload["data"]["sortBy"], "manual");
    assert_eq!(payload["data"]["fontSize"], "medium");
    assert_eq!(payload["data"]["autoDeleteCompleted"], false);
    assert!(!data.settings_file().exists());
    Ok(())
}

#[test]
fn settings_set_persists_single_field() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    data.cmd()
        .args(["settings", "set", "fontSize", "large"])
        .assert()
        .success()
        .stdout(contains("fontSize = large"));

    let stored = data.read_json(&data.settings_file())?;
    assert_eq!(stored["fontSize"], "large");
    assert_eq!(stored["sortBy"], "manual");
    assert_eq!(stored["hapticFeedback"], true);
    Ok(())
}

#[test]
fn settings_set_rejects_unknown_key_and_value() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    data.cmd()
        .args(["settings", "set", "volume", "11"])
        .assert()
        .code(2)
        .stderr(contains("Unknown setting"))
        .stderr(contains("lazytask settings show"));

    data.cmd()
        .args(["settings", "set", "sortBy", "random"])
        .assert()
        .code(2)
        .stderr(contains("manual|deadline|alphabetical|newest|oldest"));
    Ok(())
}

#[test]
fn hidden_completed_tasks_leave_list() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    let output = data.cmd().args(["--json", "add", "Finished"]).output()?;
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    let id = payload["data"]["task"]["id"]
        .as_str()
        .ok_or("missing id")?
        .to_string();
    data.cmd().args(["add", "Open"]).assert().success();
    data.cmd().args(["toggle", &id]).assert().success();
    data.cmd()
        .args(["settings", "set", "showCompletedTasks", "false"])
        .assert()
        .success();

    let output = data.cmd().args(["--json", "list"]).output()?;
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    let display = payload["data"]["display"].as_array().ok_or("no display")?;
    assert_eq!(display.len(), 1);
    assert_eq!(display[0]["title"], "Open");
    assert_eq!(payload["data"]["counts"]["total"], 2);
    Ok(())
}

#[test]
fn theme_survives_settings_reset() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;

    data.cmd().args(["theme", "set", "dark"]).assert().success();
    data.cmd()
        .args(["theme", "tint", "purple"])
        .assert()
        .success()
        .stdout(contains("tintColor: purple"));
    data.cmd()
        .args(["settings", "set", "sortBy", "oldest"])
        .assert()
        .success();
    data.cmd().args(["settings", "reset"]).assert().success();

    let stored = data.read_json(&data.settings_file())?;
    assert_eq!(stored["theme"], "dark");
    assert_eq!(stored["tintColor"], "purple");
    assert_eq!(stored["sortBy"], "manual");

    data.cmd()
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(contains("theme: dark"));
    Ok(())
}

#[test]
fn reset_wipes_tasks_and_theme() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;
    let manifest = data.write_file("package.json", "{\"private\":true}")?;

    data.cmd().args(["add", "Doomed"]).assert().success();
    data.cmd().args(["theme", "set", "light"]).assert().success();
    data.cmd()
        .arg("reset")
        .assert()
        .success()
        .stdout(contains("tasks removed: 1"));

    assert!(!data.tasks_file().exists());
    let stored = data.read_json(&data.settings_file())?;
    assert!(stored.get("theme").is_none());
    assert_eq!(stored["sortBy"], "manual");
    assert_eq!(data.read_json(&manifest)?["private"], true);
    Ok(())
}

#[test]
fn custom_store_keys_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;
    data.write_file(
        "lazytask.toml",
        "[store]\ntasks_key = \"work\"\nsettings_key = \"work_settings\"\n",
    )?;

    data.cmd().args(["add", "Quarterly report"]).assert().success();
    data.cmd()
        .args(["settings", "set", "sortBy", "alphabetical"])
        .assert()
        .success();

    assert!(data.store_file("work.json").exists());
    assert!(data.store_file("work_settings.json").exists());
    assert!(!data.tasks_file().exists());
    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new()?;
    data.write_file("lazytask.toml", "[store]\ntasks_key = \"\"\n")?;

    data.cmd()
        .arg("list")
        .assert()
        .code(2)
        .stderr(contains("store.tasks_key cannot be empty"));
    Ok(())
}
