// Startup sequence: splash screen, daemon events, skip and failure paths

use crate::common::harness::ShellTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Duration;
use windlass::services::async_bridge::ShellMessage;
use windlass::services::backend::RecordingBackend;

/// The splash covers the screen until the daemon reports its startup
/// checks finished, then the downloader page comes up.
#[test]
fn test_splash_holds_until_the_daemon_finishes() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.start().unwrap();

    assert!(harness.shell.splash().is_active());
    harness.assert_screen_contains("Windlass");
    harness.assert_screen_contains("Starting...");
    harness.assert_screen_not_contains("F1 Downloader");

    harness.finish_splash().unwrap();
    assert!(!harness.shell.splash().is_active());
    assert_eq!(harness.shell.router().current_name(), Some("downloader"));

    // Settle the slide-in, then the form is visible
    harness.advance(Duration::from_millis(200)).unwrap();
    harness.assert_screen_contains("URL");
    harness.assert_screen_contains("Video format");
}

#[test]
fn test_status_and_progress_lines_track_daemon_events() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.start().unwrap();

    harness.send_message(ShellMessage::SplashStatus {
        text: "Updating yt-dlp...".to_string(),
        can_skip: false,
        is_downloading: true,
    });
    harness.process_async_and_render().unwrap();
    harness.assert_screen_contains("Updating yt-dlp...");

    harness.send_message(ShellMessage::SplashProgress {
        text: "[download]  42.0% of 11.2MiB".to_string(),
    });
    harness.process_async_and_render().unwrap();
    harness.assert_screen_contains("42.0%");
}

/// Space only skips once the daemon has marked the wait skippable
#[test]
fn test_skip_needs_permission() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.start().unwrap();

    harness
        .send_key(KeyCode::Char(' '), KeyModifiers::NONE)
        .unwrap();
    assert!(harness.shell.splash().is_active());

    harness.send_message(ShellMessage::SplashStatus {
        text: "Downloading ffmpeg...".to_string(),
        can_skip: true,
        is_downloading: true,
    });
    harness.process_async_and_render().unwrap();
    harness.assert_screen_contains("Press Space to skip");

    harness
        .send_key(KeyCode::Char(' '), KeyModifiers::NONE)
        .unwrap();
    assert!(!harness.shell.splash().is_active());

    let loaded = harness
        .wait_for_async(|h| h.shell.router().view().is_some(), 2000)
        .unwrap();
    assert!(loaded);
}

/// Failed startup checks are reported but never trap the user on the
/// splash screen.
#[test]
fn test_failed_startup_checks_continue_to_the_shell() {
    let backend = RecordingBackend::default();
    backend.fail_startup_checks("yt-dlp not found");
    let mut harness = ShellTestHarness::with_backend(80, 24, backend).unwrap();
    harness.start().unwrap();

    let closed = harness
        .wait_for_async(|h| !h.shell.splash().is_active(), 2000)
        .unwrap();
    assert!(closed, "splash never closed after failed checks");

    let loaded = harness
        .wait_for_async(|h| h.shell.router().view().is_some(), 2000)
        .unwrap();
    assert!(loaded);
    harness.advance(Duration::from_millis(200)).unwrap();
    harness.assert_screen_contains("Downloader");
}

#[test]
fn test_daemon_exit_during_splash_is_a_failed_check() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.start().unwrap();

    harness.send_message(ShellMessage::BackendExited { code: Some(1) });
    harness.process_async_and_render().unwrap();

    assert!(!harness.shell.splash().is_active());
    assert_eq!(
        harness.shell.splash().error(),
        Some("daemon exited with code 1")
    );
}

/// A late duplicate finish event must not restart navigation
#[test]
fn test_finish_is_latched() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    harness.send_message(ShellMessage::SplashFinished);
    harness.process_async_and_render().unwrap();

    assert!(!harness.shell.router().is_loading());
    assert_eq!(harness.shell.router().current_name(), Some("downloader"));
}
