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
fn minimal_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    // Resolve path to compiled binary (debug build during tests)
    let bin = assert_cmd::cargo::cargo_bin("ccat-timer");
    let cmd = format!("{} -q 2 -s 10 --mute", bin.display());

    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // Advance past question 1, wait out the flash, then finish question 2
    p.send(" ")?;
    std::thread::sleep(Duration::from_millis(700));
    p.send(" ")?;
    std::thread::sleep(Duration::from_millis(200));

    // ESC exits from the finished screen
    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn quit_key_reaches_finished_screen() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("ccat-timer");
    let cmd = format!("{} --mute", bin.display());

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("q")?;
    p.expect("Done!")?;

    p.send("\x1b")?;
    p.expect(Eof)?;
    Ok(())
}
