// Page navigation: function keys, nav clicks, slides, stale loads

use crate::common::harness::ShellTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Duration;

#[test]
fn test_boot_lands_on_downloader() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    assert_eq!(harness.shell.router().current_name(), Some("downloader"));
    harness.assert_screen_contains("Downloader");
    harness.assert_screen_contains("URL");
    harness.assert_screen_contains("[ Download ]");
    harness.assert_screen_contains("F1 Downloader  F2 Console  F3 Settings");
}

#[test]
fn test_function_keys_switch_pages() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    harness.send_key(KeyCode::F(2), KeyModifiers::NONE).unwrap();
    let loaded = harness
        .wait_for_async(|h| h.shell.router().current_name() == Some("console"), 2000)
        .unwrap();
    assert!(loaded);
    harness.advance(Duration::from_millis(200)).unwrap();
    harness.assert_screen_contains("Console Output");
    harness.assert_screen_contains("[ Clear ]");

    harness.send_key(KeyCode::F(3), KeyModifiers::NONE).unwrap();
    let loaded = harness
        .wait_for_async(|h| h.shell.router().current_name() == Some("settings"), 2000)
        .unwrap();
    assert!(loaded);
    harness.advance(Duration::from_millis(200)).unwrap();
    harness.assert_screen_contains("Theme");
}

#[test]
fn test_nav_bar_click_navigates() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    let (col, row) = harness
        .screen_position_of("Console")
        .expect("nav tab not on screen");
    harness.mouse_click(col, row).unwrap();

    let loaded = harness
        .wait_for_async(|h| h.shell.router().current_name() == Some("console"), 2000)
        .unwrap();
    assert!(loaded);
}

/// A quick second navigation outruns the first; the slower load must be
/// dropped instead of clobbering the newer page.
#[test]
fn test_fast_switch_drops_the_stale_load() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    harness.shell.handle_key(KeyCode::F(2), KeyModifiers::NONE).unwrap();
    harness.shell.handle_key(KeyCode::F(3), KeyModifiers::NONE).unwrap();

    let settled = harness
        .wait_for_async(
            |h| h.shell.router().current_name() == Some("settings") && !h.shell.router().is_loading(),
            2000,
        )
        .unwrap();
    assert!(settled);

    // The console load finished too, but its ticket was stale
    harness.advance(Duration::from_millis(200)).unwrap();
    harness.assert_screen_contains("Theme");
    harness.assert_screen_not_contains("Console Output");
}

#[test]
fn test_navigating_to_the_current_page_is_a_noop() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    harness.send_key(KeyCode::F(1), KeyModifiers::NONE).unwrap();
    assert!(!harness.shell.router().is_transitioning());
    assert!(!harness.shell.router().is_loading());
    assert_eq!(harness.shell.router().current_name(), Some("downloader"));
}

/// Mid-slide the incoming page is drawn inset from the edge it enters on
#[test]
fn test_slide_moves_the_page_across_the_frame() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    harness.send_key(KeyCode::F(2), KeyModifiers::NONE).unwrap();
    let loaded = harness
        .wait_for_async(|h| h.shell.router().current_name() == Some("console"), 2000)
        .unwrap();
    assert!(loaded);

    // Halfway through a rightward slide the title sits at mid-screen
    harness.advance(Duration::from_millis(100)).unwrap();
    let (col, _) = harness
        .screen_position_of("Console Output")
        .expect("page title not on screen");
    assert_eq!(col, 40);
    assert!(harness.shell.router().is_transitioning());

    harness.advance(Duration::from_millis(100)).unwrap();
    let (col, _) = harness
        .screen_position_of("Console Output")
        .expect("page title not on screen");
    assert_eq!(col, 0);
    assert!(!harness.shell.router().is_transitioning());
}
