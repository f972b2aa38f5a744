#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt as _;
use std::os::unix::process::CommandExt as _;
use std::path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Builds instantly, serves until killed.
fn serving_generator(dir: &path::Path) -> path::PathBuf {
    let script = dir.join("gen");
    fs::write(
        &script,
        "#!/bin/sh\necho \"$@\" >> calls.log\n[ \"$1\" = --listen ] && exec sleep 30\nexit 0\n",
    )
    .unwrap();
    let mut perms = fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).unwrap();
    script
}

fn wait_for_server(dir: &path::Path) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let calls = fs::read_to_string(dir.join("calls.log")).unwrap_or_default();
        if calls.contains("--listen") {
            return;
        }
        assert!(Instant::now() < deadline, "server never started: {calls:?}");
        thread::sleep(Duration::from_millis(20));
    }
}

/// Deliver Ctrl-C the way a terminal does, to the whole process group.
fn interrupt_group(pgid: u32) {
    let status = Command::new("kill")
        .args(["-s", "INT", "--", &format!("-{pgid}")])
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn interrupt_while_serving_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let generator = serving_generator(dir.path());

    let child = Command::new(env!("CARGO_BIN_EXE_sitectl"))
        .arg("--no-export")
        .arg("--generator")
        .arg(&generator)
        .current_dir(dir.path())
        .process_group(0)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    wait_for_server(dir.path());
    // Give sitectl a moment to start listening for the interrupt.
    thread::sleep(Duration::from_millis(300));
    interrupt_group(child.id());

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0), "stderr: {stderr}");
    assert!(
        stdout.contains("Stopping development server..."),
        "stdout: {stdout}"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("calls.log")).unwrap(),
        "content\n--listen --autoreload\n"
    );
}
