// Select widgets: keyboard and mouse interaction on the downloader form

use crate::common::harness::ShellTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use windlass::view::page::PageControl;

fn open_select(harness: &ShellTestHarness) -> Option<String> {
    harness.shell.router().view().unwrap().open_select()
}

fn select_value(harness: &ShellTestHarness, id: &str) -> String {
    harness
        .shell
        .router()
        .view()
        .unwrap()
        .select_value(id)
        .unwrap()
        .to_string()
}

#[test]
fn test_keyboard_opens_picks_and_commits() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    // Focus starts on the URL input; two tabs reach the format select
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    let view = harness.shell.router().view().unwrap();
    assert_eq!(view.focused.as_deref(), Some("video_format"));

    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();
    assert_eq!(open_select(&harness).as_deref(), Some("video_format"));
    harness.assert_screen_contains("webm");

    harness.send_key(KeyCode::Down, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();

    assert_eq!(open_select(&harness), None);
    assert_eq!(select_value(&harness, "video_format"), "mkv");
    harness.assert_screen_contains("[mkv");
}

#[test]
fn test_escape_closes_the_list_without_committing() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();
    harness.assert_screen_contains("webm");

    harness.send_key(KeyCode::Down, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Esc, KeyModifiers::NONE).unwrap();

    assert_eq!(open_select(&harness), None);
    assert_eq!(select_value(&harness, "video_format"), "mp4");
    harness.assert_screen_not_contains("webm");
}

/// Only one list may be open; opening the next select closes the first
#[test]
fn test_open_lists_are_exclusive() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();
    assert_eq!(open_select(&harness).as_deref(), Some("video_format"));

    // Tab moves on and closes the list, Enter opens the next one
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();

    assert_eq!(open_select(&harness).as_deref(), Some("video_quality"));
    harness.assert_screen_not_contains("webm");
    harness.assert_screen_contains("720p");
}

#[test]
fn test_click_away_closes_the_open_list() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();
    assert_eq!(open_select(&harness).as_deref(), Some("video_format"));

    // Bottom right of the page content is bare
    harness.mouse_click(78, 21).unwrap();

    assert_eq!(open_select(&harness), None);
    assert_eq!(select_value(&harness, "video_format"), "mp4");
}

#[test]
fn test_mouse_toggles_and_picks_an_option() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    let (col, row) = harness
        .screen_position_of("[mp4")
        .expect("format select not on screen");
    harness.mouse_click(col, row).unwrap();
    assert_eq!(open_select(&harness).as_deref(), Some("video_format"));

    // Option rows open directly under the button: mp4, mkv, webm
    harness.mouse_click(col + 2, row + 3).unwrap();

    assert_eq!(open_select(&harness), None);
    assert_eq!(select_value(&harness, "video_format"), "webm");
    harness.assert_screen_contains("[webm");

    // A second press on the button opens, a third closes
    let (col, row) = harness.screen_position_of("[webm").unwrap();
    harness.mouse_click(col, row).unwrap();
    assert_eq!(open_select(&harness).as_deref(), Some("video_format"));
    harness.mouse_click(col, row).unwrap();
    assert_eq!(open_select(&harness), None);
}

/// The wheel moves the highlight while a list is open
#[test]
fn test_scroll_wheel_moves_the_highlight() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    let (col, row) = harness.screen_position_of("[mp4").unwrap();
    harness.mouse_click(col, row).unwrap();

    harness.mouse_scroll(col, row, 1).unwrap();
    harness.mouse_scroll(col, row, 1).unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();

    assert_eq!(select_value(&harness, "video_format"), "webm");
}

fn select_enabled(harness: &ShellTestHarness, id: &str) -> bool {
    match harness.shell.router().view().unwrap().control(id) {
        Some(PageControl::Select { model, .. }) => model.enabled,
        other => panic!("{} is not a select: {:?}", id, other),
    }
}

/// Audio only swaps which pair of format selects is live
#[test]
fn test_audio_only_swaps_the_enabled_selects() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    // The audio pair starts greyed out
    assert!(select_enabled(&harness, "video_format"));
    assert!(!select_enabled(&harness, "audio_format"));
    assert!(!select_enabled(&harness, "audio_quality"));

    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.focused.as_deref(), Some("audio_only"));
    }
    harness
        .send_key(KeyCode::Char(' '), KeyModifiers::NONE)
        .unwrap();

    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.checkbox_checked("audio_only"), Some(true));
    }
    assert!(!select_enabled(&harness, "video_format"));
    assert!(!select_enabled(&harness, "video_quality"));
    assert!(select_enabled(&harness, "audio_format"));

    // Tab lands on the audio format select, skipping both video selects
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.focused.as_deref(), Some("audio_format"));
    }

    // A click on the disabled video select does not open it
    let (col, row) = harness.screen_position_of("[mp4 ").unwrap();
    harness.mouse_click(col, row).unwrap();
    assert_eq!(open_select(&harness), None);

    // Unchecking puts the form back
    harness
        .send_key(KeyCode::BackTab, KeyModifiers::NONE)
        .unwrap();
    harness
        .send_key(KeyCode::Char(' '), KeyModifiers::NONE)
        .unwrap();
    assert!(select_enabled(&harness, "video_format"));
    assert!(!select_enabled(&harness, "audio_format"));
}

/// Subtitle and live chat embeds exclude each other; checking one
/// unchecks the other, and the language field follows subtitles
#[test]
fn test_subtitles_and_live_chat_exclude_each_other() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    // Reach the advanced toggle and unfold the section
    for _ in 0..4 {
        harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    }
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.focused.as_deref(), Some("advanced_toggle"));
    }
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();
    harness.assert_screen_contains("Embed subtitles");

    // The language field is dormant until subtitles are on
    {
        let view = harness.shell.router().view().unwrap();
        match view.control("sub_lang") {
            Some(PageControl::Input { disabled, .. }) => assert!(*disabled),
            other => panic!("sub_lang is not an input: {:?}", other),
        }
    }

    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness
        .send_key(KeyCode::Char(' '), KeyModifiers::NONE)
        .unwrap();
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.checkbox_checked("embed_subs"), Some(true));
    }

    // Tab now reaches the language field; type a code into it
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.focused.as_deref(), Some("sub_lang"));
    }
    harness.type_text("en").unwrap();
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.input_value("sub_lang"), Some("en"));
    }

    // Checking live chat kicks subtitles back off
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.focused.as_deref(), Some("live_chat"));
    }
    harness
        .send_key(KeyCode::Char(' '), KeyModifiers::NONE)
        .unwrap();

    let view = harness.shell.router().view().unwrap();
    assert_eq!(view.checkbox_checked("live_chat"), Some(true));
    assert_eq!(view.checkbox_checked("embed_subs"), Some(false));
    match view.control("sub_lang") {
        Some(PageControl::Input { disabled, .. }) => assert!(*disabled),
        other => panic!("sub_lang is not an input: {:?}", other),
    }
}
