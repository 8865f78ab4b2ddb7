// Settings page: daemon snapshot fetch, apply, and save-back

use crate::common::harness::ShellTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Duration;
use windlass::config::{default_daemon_config, SettingValue};
use windlass::services::backend::{RecordedRequest, RecordingBackend};

fn open_settings(harness: &mut ShellTestHarness) {
    harness.send_key(KeyCode::F(3), KeyModifiers::NONE).unwrap();
    let ready = harness
        .wait_for_async(
            |h| {
                h.shell.router().current_name() == Some("settings")
                    && h.shell.daemon_config().is_some()
            },
            2000,
        )
        .unwrap();
    assert!(ready, "settings page never hydrated");
    harness.advance(Duration::from_millis(200)).unwrap();
}

fn saved_configs(harness: &ShellTestHarness) -> Vec<windlass::config::ConfigMap> {
    harness
        .backend
        .requests()
        .into_iter()
        .filter_map(|request| match request {
            RecordedRequest::SaveConfig(map) => Some(map),
            _ => None,
        })
        .collect()
}

#[test]
fn test_visit_fetches_and_applies_the_daemon_snapshot() {
    let mut config = default_daemon_config();
    config.insert("video_format".into(), "webm".into());
    config.insert("geo_bypass".into(), true.into());
    let backend = RecordingBackend::new(config);

    let mut harness = ShellTestHarness::with_backend(80, 24, backend).unwrap();
    harness.boot_to_downloader().unwrap();
    open_settings(&mut harness);

    let view = harness.shell.router().view().unwrap();
    assert_eq!(view.select_value("video_format"), Some("webm"));
    assert_eq!(view.checkbox_checked("geo_bypass"), Some(true));
    harness.assert_screen_contains("[webm");

    assert!(harness
        .backend
        .requests()
        .contains(&RecordedRequest::GetConfig));
}

#[test]
fn test_toggling_a_checkbox_saves_the_whole_map() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();
    open_settings(&mut harness);

    // theme, language, close_behavior, then the first update toggle
    for _ in 0..3 {
        harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    }
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.focused.as_deref(), Some("update_app"));
    }
    harness
        .send_key(KeyCode::Char(' '), KeyModifiers::NONE)
        .unwrap();

    let saved = harness
        .wait_for_async(|h| !saved_configs(h).is_empty(), 2000)
        .unwrap();
    assert!(saved, "no save request reached the daemon");

    let maps = saved_configs(&harness);
    assert_eq!(maps.len(), 1);
    assert_eq!(maps[0].len(), 12);
    assert_eq!(maps[0]["update_app"], SettingValue::Bool(false));
    assert_eq!(maps[0]["theme"], SettingValue::Text("System".into()));

    let confirmed = harness
        .wait_for_async(
            |h| h.shell.status_message() == Some("Settings saved"),
            2000,
        )
        .unwrap();
    assert!(confirmed);
    harness.assert_screen_contains("Settings saved");
}

#[test]
fn test_unknown_snapshot_values_keep_the_control_as_is() {
    let mut config = default_daemon_config();
    config.insert("video_format".into(), "flv".into());
    let backend = RecordingBackend::new(config);

    let mut harness = ShellTestHarness::with_backend(80, 24, backend).unwrap();
    harness.boot_to_downloader().unwrap();
    open_settings(&mut harness);

    let view = harness.shell.router().view().unwrap();
    assert_eq!(view.select_value("video_format"), Some("mp4"));
}

#[test]
fn test_failed_save_lands_in_the_status_bar_and_console() {
    let backend = RecordingBackend::default();
    backend.fail_save_config("disk full");

    let mut harness = ShellTestHarness::with_backend(80, 24, backend).unwrap();
    harness.boot_to_downloader().unwrap();
    open_settings(&mut harness);

    for _ in 0..3 {
        harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    }
    harness
        .send_key(KeyCode::Char(' '), KeyModifiers::NONE)
        .unwrap();

    let failed = harness
        .wait_for_async(
            |h| h.shell.status_message() == Some("Failed to save settings"),
            2000,
        )
        .unwrap();
    assert!(failed);

    // The console page carries the daemon error itself
    harness.send_key(KeyCode::F(2), KeyModifiers::NONE).unwrap();
    let loaded = harness
        .wait_for_async(|h| h.shell.router().current_name() == Some("console"), 2000)
        .unwrap();
    assert!(loaded);
    harness.advance(Duration::from_millis(200)).unwrap();
    harness.assert_screen_contains("settings save failed: disk full");
}

/// Every settings visit refetches; values changed daemon-side between
/// visits show up.
#[test]
fn test_each_visit_fetches_a_fresh_snapshot() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();
    open_settings(&mut harness);

    let fetches = |h: &ShellTestHarness| {
        h.backend
            .requests()
            .iter()
            .filter(|r| **r == RecordedRequest::GetConfig)
            .count()
    };
    assert_eq!(fetches(&harness), 1);

    harness.send_key(KeyCode::F(1), KeyModifiers::NONE).unwrap();
    let back = harness
        .wait_for_async(
            |h| h.shell.router().current_name() == Some("downloader"),
            2000,
        )
        .unwrap();
    assert!(back);

    open_settings(&mut harness);
    let refreshed = harness
        .wait_for_async(|h| fetches(h) == 2, 2000)
        .unwrap();
    assert!(refreshed, "second visit never refetched");
}

#[test]
fn test_radio_steps_by_key_and_mouse_and_saves() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();
    open_settings(&mut harness);

    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.focused.as_deref(), Some("close_behavior"));
    }

    harness.send_key(KeyCode::Right, KeyModifiers::NONE).unwrap();
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.radio_value("close_behavior"), Some("close"));
    }
    let first = harness
        .wait_for_async(|h| saved_configs(h).len() == 1, 2000)
        .unwrap();
    assert!(first, "radio change never saved");

    // Clicking the first option flips it back
    let (col, row) = harness
        .screen_position_of("Minimize to tray")
        .expect("radio option not on screen");
    harness.mouse_click(col, row).unwrap();
    let view = harness.shell.router().view().unwrap();
    assert_eq!(view.radio_value("close_behavior"), Some("hide"));

    let both_saved = harness
        .wait_for_async(|h| saved_configs(h).len() == 2, 2000)
        .unwrap();
    assert!(both_saved, "expected two save requests");

    let maps = saved_configs(&harness);
    assert_eq!(maps[0]["close_behavior"], SettingValue::Text("close".into()));
    assert_eq!(maps[1]["close_behavior"], SettingValue::Text("hide".into()));
}

/// A failed snapshot fetch leaves the page inert: edits stay local and
/// never overwrite the daemon's store with template defaults
#[test]
fn test_edits_after_a_failed_load_never_save() {
    let backend = RecordingBackend::default();
    backend.fail_get_config("config locked");

    let mut harness = ShellTestHarness::with_backend(80, 24, backend).unwrap();
    harness.boot_to_downloader().unwrap();

    harness.send_key(KeyCode::F(3), KeyModifiers::NONE).unwrap();
    let failed = harness
        .wait_for_async(
            |h| h.shell.status_message() == Some("Failed to load settings"),
            2000,
        )
        .unwrap();
    assert!(failed, "load failure never surfaced");
    harness.advance(Duration::from_millis(200)).unwrap();

    // The checkbox still flips on screen
    for _ in 0..3 {
        harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    }
    harness
        .send_key(KeyCode::Char(' '), KeyModifiers::NONE)
        .unwrap();
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.checkbox_checked("update_app"), Some(false));
    }

    // but no save ever reaches the daemon
    let saved = harness
        .wait_for_async(|h| !saved_configs(h).is_empty(), 300)
        .unwrap();
    assert!(!saved, "a save fired without an applied snapshot");

    // A later successful visit re-arms saving as usual
    harness.backend.clear_get_config_failure();
    harness.send_key(KeyCode::F(1), KeyModifiers::NONE).unwrap();
    let back = harness
        .wait_for_async(|h| h.shell.router().current_name() == Some("downloader"), 2000)
        .unwrap();
    assert!(back);
    harness.advance(Duration::from_millis(200)).unwrap();
    open_settings(&mut harness);
    for _ in 0..3 {
        harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    }
    harness
        .send_key(KeyCode::Char(' '), KeyModifiers::NONE)
        .unwrap();
    let saved = harness
        .wait_for_async(|h| !saved_configs(h).is_empty(), 2000)
        .unwrap();
    assert!(saved, "save stayed detached after a good load");
}
