use assert_cmd::Command;

#[test]
fn help_mentions_audio_and_lyrics() {
    let output = Command::cargo_bin("tempotype")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--audio"));
    assert!(stdout.contains("--lyrics"));
    assert!(stdout.contains("--difficulty"));
}

#[test]
fn write_config_saves_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    Command::cargo_bin("tempotype")
        .unwrap()
        .env("HOME", dir.path())
        .args(["--write-config", "-d", "pro", "--idle-delay-ms", "120", "--config"])
        .arg(&path)
        .assert()
        .success();

    let saved: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(saved["default_difficulty"], "pro");
    assert_eq!(saved["idle_delay_ms"], 120);
    assert_eq!(saved["presets"]["semi_ms"], 300);
}

#[test]
fn refuses_to_run_without_a_tty() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("tempotype")
        .unwrap()
        .env("HOME", dir.path())
        .args(["--config"])
        .arg(dir.path().join("config.json"))
        .write_stdin("")
        .assert()
        .failure();
}
