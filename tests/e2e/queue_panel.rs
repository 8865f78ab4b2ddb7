// Queue side panel: slide animation, content lifecycle, button wiring

use crate::common::harness::{layout, ShellTestHarness};
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyModifiers};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use windlass::services::backend::RecordingBackend;
use windlass::services::fragments::{AssetFragments, BuiltinFragments, FragmentSource};

fn toggle_panel(harness: &mut ShellTestHarness) {
    harness
        .send_key(KeyCode::Char('b'), KeyModifiers::CONTROL)
        .unwrap();
}

#[test]
fn test_panel_slides_open_over_the_page() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    toggle_panel(&mut harness);
    assert!(harness.shell.queue().is_open());
    assert_eq!(harness.shell.queue().width(80), 0);

    let loaded = harness
        .wait_for_async(|h| h.shell.queue().view().is_some(), 2000)
        .unwrap();
    assert!(loaded, "queue content never loaded");

    harness.advance(Duration::from_millis(125)).unwrap();
    assert_eq!(harness.shell.queue().width(80), 13);

    harness.advance(Duration::from_millis(125)).unwrap();
    assert_eq!(harness.shell.queue().width(80), 26);
    assert!(!harness.shell.queue().is_animating());

    harness.assert_screen_contains("[ Start all ]");
    harness.assert_screen_contains("[ Stop all ]");
    harness.assert_screen_contains("Queue is empty.");
}

/// Closing mid-open resumes from the current position, no jump
#[test]
fn test_reversal_mid_slide_is_continuous() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    toggle_panel(&mut harness);
    harness.advance(Duration::from_millis(125)).unwrap();
    assert_eq!(harness.shell.queue().width(80), 13);

    toggle_panel(&mut harness);
    assert!(!harness.shell.queue().is_open());
    assert_eq!(harness.shell.queue().width(80), 13);

    // Half the close animation finishes the remaining half slide
    harness.advance(Duration::from_millis(100)).unwrap();
    assert!(!harness.shell.queue().is_visible());
    assert_eq!(harness.shell.queue().width(80), 0);
}

#[test]
fn test_escape_closes_the_panel() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    toggle_panel(&mut harness);
    let loaded = harness
        .wait_for_async(|h| h.shell.queue().view().is_some(), 2000)
        .unwrap();
    assert!(loaded);
    harness.advance(Duration::from_millis(250)).unwrap();
    harness.assert_screen_contains("[ Start all ]");

    harness.send_key(KeyCode::Esc, KeyModifiers::NONE).unwrap();
    assert!(!harness.shell.queue().is_open());

    harness.advance(Duration::from_millis(200)).unwrap();
    assert!(!harness.shell.queue().is_visible());
    harness.assert_screen_not_contains("[ Start all ]");
}

/// A failed content fetch shows a notice and is retried on the next open
#[test]
fn test_failed_content_is_retried_on_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let pages = temp_dir.path().join("pages");
    std::fs::create_dir_all(&pages).unwrap();
    std::fs::write(
        pages.join("downloader.json"),
        r#"{"title": "Downloader", "sections": [{"controls": [
            {"type": "input", "id": "url", "label": "URL"},
            {"type": "button", "id": "download", "label": "Download"}
        ]}]}"#,
    )
    .unwrap();

    let mut harness = ShellTestHarness::with_sources(
        80,
        24,
        RecordingBackend::default(),
        Arc::new(AssetFragments::new(temp_dir.path())),
    )
    .unwrap();
    harness.boot_to_downloader().unwrap();

    // No queue.json yet, so the first open fails
    toggle_panel(&mut harness);
    let failed = harness
        .wait_for_async(
            |h| h.shell.status_message() == Some("Failed to load queue"),
            2000,
        )
        .unwrap();
    assert!(failed, "queue load failure never surfaced");

    harness.advance(Duration::from_millis(250)).unwrap();
    harness.assert_screen_contains("Queue unavailable");

    std::fs::write(
        pages.join("queue.json"),
        r#"{"title": "Queue", "sections": [{"controls": [
            {"type": "button", "id": "start_all", "label": "Start all"},
            {"type": "label", "text": "Queue is empty."}
        ]}]}"#,
    )
    .unwrap();

    // Close and reopen; the failed state triggers a fresh fetch
    toggle_panel(&mut harness);
    harness.advance(Duration::from_millis(200)).unwrap();
    toggle_panel(&mut harness);

    let loaded = harness
        .wait_for_async(|h| h.shell.queue().view().is_some(), 2000)
        .unwrap();
    assert!(loaded, "queue content not retried");

    harness.advance(Duration::from_millis(250)).unwrap();
    harness.assert_screen_contains("[ Start all ]");
    harness.assert_screen_not_contains("Queue unavailable");
}

/// The nav bar queue toggle appears after the first queued download and
/// opens and closes the panel by mouse
#[test]
fn test_nav_queue_toggle_reveals_and_drives_the_panel() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    // Before anything is queued the only "Queue" on screen is the
    // status bar hint
    assert_eq!(
        harness.screen_row_of(" Queue "),
        Some(layout::status_bar_row(24))
    );

    harness.type_text("https://example.com/watch?v=t1").unwrap();
    harness
        .send_key(KeyCode::Enter, KeyModifiers::NONE)
        .unwrap();
    assert_eq!(
        harness.screen_row_of(" Queue "),
        Some(layout::NAV_BAR_ROW)
    );

    // Click the toggle to slide the panel in
    let (col, row) = harness
        .screen_position_of(" Queue ")
        .expect("queue toggle not on screen");
    harness.mouse_click(col + 1, row).unwrap();
    assert!(harness.shell.queue().is_open());

    let loaded = harness
        .wait_for_async(|h| h.shell.queue().view().is_some(), 2000)
        .unwrap();
    assert!(loaded, "queue content never loaded");
    harness.advance(Duration::from_millis(250)).unwrap();
    harness.assert_screen_contains("[ Start all ]");

    // A second press slides it back out
    harness.mouse_click(col + 1, row).unwrap();
    assert!(!harness.shell.queue().is_open());
    harness.advance(Duration::from_millis(200)).unwrap();
    assert!(!harness.shell.queue().is_visible());
    harness.assert_screen_not_contains("[ Start all ]");
}

/// Panel buttons run queue commands; the echo lands on the console page
#[test]
fn test_queue_buttons_reach_the_console() {
    let mut harness = ShellTestHarness::new(80, 24).unwrap();
    harness.boot_to_downloader().unwrap();

    toggle_panel(&mut harness);
    let loaded = harness
        .wait_for_async(|h| h.shell.queue().view().is_some(), 2000)
        .unwrap();
    assert!(loaded);
    harness.advance(Duration::from_millis(250)).unwrap();

    // Keyboard: focus the first button and press it
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    {
        let view = harness.shell.queue().view().unwrap();
        assert_eq!(view.focused.as_deref(), Some("start_all"));
    }
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();

    // Mouse: the stop button by its on-screen position
    let (col, row) = harness
        .screen_position_of("[ Stop all ]")
        .expect("stop button not on screen");
    harness.mouse_click(col, row).unwrap();

    harness.send_key(KeyCode::Esc, KeyModifiers::NONE).unwrap();
    harness.advance(Duration::from_millis(200)).unwrap();

    harness.send_key(KeyCode::F(2), KeyModifiers::NONE).unwrap();
    let on_console = harness
        .wait_for_async(|h| h.shell.router().current_name() == Some("console"), 2000)
        .unwrap();
    assert!(on_console);
    harness.advance(Duration::from_millis(200)).unwrap();

    harness.assert_screen_contains("queue: start all requested");
    harness.assert_screen_contains("queue: stop all requested");
}

/// Toggling the panel by key dismisses the page's open option list, so
/// at most one list is open across both surfaces
#[test]
fn test_key_toggle_closes_the_page_list_before_the_panel_opens() {
    let temp_dir = tempfile::tempdir().unwrap();
    let pages = temp_dir.path().join("pages");
    std::fs::create_dir_all(&pages).unwrap();
    std::fs::write(
        pages.join("downloader.json"),
        r#"{"title": "Downloader", "sections": [{"controls": [
            {"type": "select", "id": "video_format", "label": "Format",
             "options": [{"label": "mp4"}, {"label": "mkv"}]}
        ]}]}"#,
    )
    .unwrap();
    std::fs::write(
        pages.join("queue.json"),
        r#"{"title": "Queue", "sections": [{"controls": [
            {"type": "select", "id": "sort_order", "label": "Sort",
             "options": [{"label": "Added"}, {"label": "Name"}]}
        ]}]}"#,
    )
    .unwrap();

    let mut harness = ShellTestHarness::with_sources(
        80,
        24,
        RecordingBackend::default(),
        Arc::new(AssetFragments::new(temp_dir.path())),
    )
    .unwrap();
    harness.boot_to_downloader().unwrap();

    // Focus starts on the page select; Enter opens its list
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.open_select().as_deref(), Some("video_format"));
    }

    toggle_panel(&mut harness);
    {
        let view = harness.shell.router().view().unwrap();
        assert_eq!(view.open_select(), None);
    }

    let loaded = harness
        .wait_for_async(|h| h.shell.queue().view().is_some(), 2000)
        .unwrap();
    assert!(loaded, "queue content never loaded");
    harness.advance(Duration::from_millis(250)).unwrap();

    // Open a list inside the panel; the page list stays closed
    harness.send_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
    harness.send_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();

    assert_eq!(
        harness.shell.queue().view().unwrap().open_select().as_deref(),
        Some("sort_order")
    );
    assert_eq!(harness.shell.router().view().unwrap().open_select(), None);

    // Closing the panel by key also drops its open list
    toggle_panel(&mut harness);
    assert_eq!(harness.shell.queue().view().unwrap().open_select(), None);
}

/// Counts queue fragment fetches while serving the builtin content
#[derive(Default)]
struct CountingFragments {
    queue_fetches: AtomicUsize,
}

#[async_trait]
impl FragmentSource for CountingFragments {
    async fn fetch(&self, name: &str) -> io::Result<String> {
        if name == "queue" {
            self.queue_fetches.fetch_add(1, Ordering::SeqCst);
        }
        BuiltinFragments.fetch(name).await
    }
}

/// Successful queue content is fetched once for the whole session;
/// reopening serves the cached view
#[test]
fn test_queue_content_fetches_once_across_toggles() {
    let fragments = Arc::new(CountingFragments::default());
    let mut harness = ShellTestHarness::with_sources(
        80,
        24,
        RecordingBackend::default(),
        fragments.clone(),
    )
    .unwrap();
    harness.boot_to_downloader().unwrap();

    toggle_panel(&mut harness);
    let loaded = harness
        .wait_for_async(|h| h.shell.queue().view().is_some(), 2000)
        .unwrap();
    assert!(loaded, "queue content never loaded");
    harness.advance(Duration::from_millis(250)).unwrap();
    harness.assert_screen_contains("[ Start all ]");

    toggle_panel(&mut harness);
    harness.advance(Duration::from_millis(200)).unwrap();
    assert!(!harness.shell.queue().is_visible());

    toggle_panel(&mut harness);
    harness.advance(Duration::from_millis(250)).unwrap();
    harness.assert_screen_contains("[ Start all ]");

    assert_eq!(fragments.queue_fetches.load(Ordering::SeqCst), 1);
}
