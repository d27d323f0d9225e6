// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_plays_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    // Resolve path to compiled binary (debug build during tests)
    let bin = assert_cmd::cargo::cargo_bin("zone");
    let log = tempfile::NamedTempFile::new()?;
    let cmd = format!(
        "{} --log-file {} -w 1000 -t 'hi there'",
        bin.display(),
        log.path().display()
    );

    // Spawn the TUI inside a pseudo terminal
    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // Start playback; two short words at 1000 wpm finish well within the wait
    p.send(" ")?;
    std::thread::sleep(Duration::from_millis(500));

    // Send ESC to close the reader
    p.send("\x1b")?; // ESC

    // Wait for the program to terminate cleanly
    p.expect(Eof)?;
    Ok(())
}

#[test]
fn missing_text_is_a_usage_error() {
    assert_cmd::Command::cargo_bin("zone")
        .unwrap()
        .arg("--log-file")
        .arg(std::env::temp_dir().join("zone-usage-test.log"))
        .assert()
        .failure();
}
