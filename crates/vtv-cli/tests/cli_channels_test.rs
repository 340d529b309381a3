#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::collections::HashSet;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

const THREE_CHANNELS: &str = r#"[
  {"id": "x", "name": "News", "url": "https://www.youtube.com/watch?v=news", "type": "youtube"},
  {"id": "x", "name": "Music", "url": "https://youtu.be/music", "type": "youtube", "tags": ["lofi"]},
  {"name": "Sunset", "url": "https://example.com/sunset.jpg", "type": "image", "isEnabled": false}
]"#;

fn vtv(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("vtv");
    cmd.env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        .arg("--dir")
        .arg(dir);
    cmd
}

fn exported(dir: &Path) -> Vec<serde_json::Value> {
    let out = dir.join("out.json");
    vtv(dir)
        .args(["channels", "export", "--output"])
        .arg(&out)
        .assert()
        .success();
    serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap()
}

#[test]
fn test_channels_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("vtv");
    cmd.args(["channels", "add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--tags"));
}

#[test]
fn test_list_empty() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    vtv(dir.path())
        .args(["channels", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No channels"));
}

#[test]
fn test_add_and_list() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    vtv(dir.path())
        .args([
            "channels",
            "add",
            "--name",
            "Lofi Radio",
            "--url",
            "https://www.youtube.com/watch?v=abc",
            "--type",
            "youtube",
            "--tags",
            "music, chill",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added channel"));

    // Assert
    vtv(dir.path())
        .args(["channels", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lofi Radio"))
        .stdout(predicate::str::contains("Total: 1 channels"));

    let channels = exported(dir.path());
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0]["isEnabled"], true);
    assert_eq!(channels[0]["tags"], serde_json::json!(["music", "chill"]));
}

#[test]
fn test_add_reports_every_validation_error() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    vtv(dir.path())
        .args(["channels", "add", "--name", "  "])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Channel name is required"))
        .stdout(predicate::str::contains("Channel URL is required"))
        .stdout(predicate::str::contains("Channel type is required"));

    assert!(exported(dir.path()).is_empty());
}

#[test]
fn test_add_rejects_non_youtube_url() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    vtv(dir.path())
        .args([
            "channels",
            "add",
            "--name",
            "Bad",
            "--url",
            "ftp://x.com",
            "--type",
            "youtube",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid YouTube URL format"));
}

#[test]
fn test_add_rejects_unknown_type() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    vtv(dir.path())
        .args([
            "channels",
            "add",
            "--name",
            "Radio",
            "--url",
            "https://example.com/live",
            "--type",
            "radio",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown channel type: radio"));
}

#[test]
fn test_import_three_channels() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("in.json");
    std::fs::write(&file, THREE_CHANNELS).unwrap();

    // Act
    vtv(dir.path())
        .args(["--user", "alice", "channels", "import"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 channels"));

    // Assert
    let channels = exported(dir.path());
    assert_eq!(channels.len(), 3);
    let ids: HashSet<&str> = channels.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 3);
    assert!(!ids.contains("x"));
    assert_eq!(channels[2]["isEnabled"], false);

    vtv(dir.path())
        .args(["channels", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("Total: 3 entries"));
}

#[test]
fn test_back_to_back_imports_keep_ids_unique() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("in.json");
    std::fs::write(&file, THREE_CHANNELS).unwrap();

    // Act
    for _ in 0..2 {
        vtv(dir.path())
            .args(["channels", "import"])
            .arg(&file)
            .assert()
            .success();
    }

    // Assert
    let channels = exported(dir.path());
    let ids: HashSet<&str> = channels.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(channels.len(), 6);
    assert_eq!(ids.len(), 6);
}

#[test]
fn test_import_invalid_json() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("in.json");
    std::fs::write(&file, "not json").unwrap();

    // Act & Assert
    vtv(dir.path())
        .args(["channels", "import"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid import file format"));

    assert!(exported(dir.path()).is_empty());
}

#[test]
fn test_update_and_disable() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("in.json");
    std::fs::write(&file, THREE_CHANNELS).unwrap();
    vtv(dir.path())
        .args(["channels", "import"])
        .arg(&file)
        .assert()
        .success();
    let id = String::from(exported(dir.path())[0]["id"].as_str().unwrap());

    // Act
    vtv(dir.path())
        .args(["channels", "update", &id, "--name", "World News", "--disable"])
        .assert()
        .success();

    // Assert
    let channels = exported(dir.path());
    assert_eq!(channels[0]["name"], "World News");
    assert_eq!(channels[0]["isEnabled"], false);

    vtv(dir.path())
        .args(["channels", "history", "--channel-id", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("Total: 2 entries"));
}

#[test]
fn test_update_missing_channel_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    vtv(dir.path())
        .args(["channels", "update", "nope", "--name", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("channel nope not found"));
}

#[test]
fn test_delete_missing_channel_records_nothing() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    vtv(dir.path())
        .args(["channels", "delete", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("channel nope not found"));

    // Assert
    vtv(dir.path())
        .args(["channels", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No history"));
}

#[test]
fn test_delete_channel() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("in.json");
    std::fs::write(&file, THREE_CHANNELS).unwrap();
    vtv(dir.path())
        .args(["channels", "import"])
        .arg(&file)
        .assert()
        .success();
    let id = String::from(exported(dir.path())[1]["id"].as_str().unwrap());

    // Act
    vtv(dir.path())
        .args(["channels", "delete", &id])
        .assert()
        .success();

    // Assert
    let channels = exported(dir.path());
    assert_eq!(channels.len(), 2);
    assert!(channels.iter().all(|c| c["id"] != id.as_str()));
}

#[test]
fn test_export_default_file_name() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    vtv(dir.path())
        .current_dir(dir.path())
        .args(["channels", "export"])
        .assert()
        .success();

    // Assert
    let content = std::fs::read_to_string(dir.path().join("channels.json")).unwrap();
    assert_eq!(content, "[]");
}

#[test]
fn test_config_set_and_show() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    vtv(dir.path())
        .args(["config", "set", "--user-id", "bob", "--volume", "30"])
        .assert()
        .success();

    // Assert
    vtv(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("user.id = bob"))
        .stdout(predicate::str::contains("player.volume = 30"));
}

#[test]
fn test_config_rejects_volume_out_of_range() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    vtv(dir.path())
        .args(["config", "set", "--volume", "150"])
        .assert()
        .failure();
}
