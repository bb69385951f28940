//! Headless launch behavior
//!
//! Runs the binary with the display environment scrubbed and checks the
//! stderr contract. Only meaningful where the display probe reads the
//! environment, so the test is gated to those platforms.

#![cfg(all(unix, not(target_os = "macos")))]

use std::process::Command;

use scene3d::display::HEADLESS_MESSAGE;

#[test]
fn headless_run_prints_message_and_exits_with_one() {
    let output = Command::new(env!("CARGO_BIN_EXE_cube_app"))
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .output()
        .expect("failed to spawn cube_app");

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.trim_end(), HEADLESS_MESSAGE);
    assert!(output.stdout.is_empty());
}

#[test]
fn empty_display_variables_count_as_headless() {
    let output = Command::new(env!("CARGO_BIN_EXE_cube_app"))
        .env("DISPLAY", "")
        .env("WAYLAND_DISPLAY", "")
        .output()
        .expect("failed to spawn cube_app");

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No DISPLAY found"));
}
