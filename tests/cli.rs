use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::process::Stdio;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("folder-audit").unwrap()
}

#[test]
fn usage_without_arguments() {
    cmd()
        .assert()
        .code(1)
        .stdout(contains("Usage: folder-audit <input_folder>"));
}

#[test]
fn too_many_arguments_prints_usage() {
    cmd().args(["a", "b"]).assert().code(1).stdout(contains("Usage:"));
}

#[test]
fn missing_folder_exits_1_without_output() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .arg(tmp.path().join("nope"))
        .assert()
        .code(1)
        .stdout(contains("[ERROR] Input folder does not exist"))
        .stdout(contains("FAILED: Validation errors occurred"));
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn successful_run_writes_output_beside_input() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("input");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.txt"), "hello\nworld\n").unwrap();

    cmd()
        .arg(&input)
        .assert()
        .code(0)
        .stdout(contains("FOLDER AUDIT - Starting"))
        .stdout(contains("[SUCCESS] Validation passed: 1 valid file(s) found"))
        .stdout(contains("SUCCESS: Folder audit completed successfully!"))
        .stdout(contains("  - summary.txt"))
        .stdout(contains("  - automation.log"));

    let outputs: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p != &input)
        .collect();
    assert_eq!(outputs.len(), 1);
    let name = outputs[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("output_"));
    assert!(outputs[0].join("summary.txt").is_file());
    assert!(outputs[0].join("automation.log").is_file());
}

#[test]
fn empty_folder_exits_1() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("input");
    fs::create_dir(&input).unwrap();

    cmd()
        .arg(&input)
        .assert()
        .code(1)
        .stdout(contains("[ERROR] Input folder is empty - no files found"));
}

#[test]
fn closed_stdout_still_finishes_the_run() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("input");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.txt"), "kept\n").unwrap();
    // One warning line each, well past a pipe buffer.
    for i in 0..2000 {
        fs::write(input.join(format!("img_{:04}.png", i)), "x").unwrap();
    }

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("folder-audit"))
        .arg(&input)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    // Reader goes away before the first line is read, like `| head -0`.
    drop(child.stdout.take());
    let status = child.wait().unwrap();

    assert_eq!(status.code(), Some(0));
    let outputs: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p != &input)
        .collect();
    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].join("summary.txt").is_file());
    let log = fs::read_to_string(outputs[0].join("automation.log")).unwrap();
    assert!(log.contains("[SUCCESS] Validation passed: 1 valid file(s) found"));
    assert!(log.ends_with("[INFO] Saving log file"));
}
