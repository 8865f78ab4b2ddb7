//! Per-page setup and control event routing
//!
//! After a page is installed its init hook runs first, then select
//! widgets are bound, then focus lands on the first control. The init
//! hook works on the declarative models, so widgets come up already
//! showing the right values.
//!
//! Control events drained from the live surfaces are routed here by page
//! name; settings events continue on to `settings_actions`.

use crate::view::page::{ControlEvent, PageControl, PageView};
use crate::view::virtualizer;

use super::Shell;

impl Shell {
    /// Post-swap setup for the page the router just installed
    pub(super) fn run_page_init(&mut self) {
        let Some(name) = self.router.current_name().map(str::to_string) else {
            return;
        };
        match name.as_str() {
            "downloader" => self.init_downloader_page(),
            "settings" => self.init_settings_page(),
            _ => {}
        }
        if let Some(view) = self.router.view_mut() {
            virtualizer::initialize(view);
            view.focus_first();
        }
    }

    fn init_downloader_page(&mut self) {
        if let Some(view) = self.router.view_mut() {
            apply_downloader_rules(view);
        }
    }

    /// Route queued control events to their page handlers
    pub(super) fn dispatch_control_events(&mut self) {
        let page = self
            .router
            .view_mut()
            .map(|view| (view.name.clone(), view.drain_events()));
        if let Some((name, events)) = page {
            for event in events {
                match name.as_str() {
                    "downloader" => self.on_downloader_event(event),
                    "console" => self.on_console_event(event),
                    "settings" => self.on_settings_event(event),
                    other => tracing::debug!("event from unhandled page '{}'", other),
                }
            }
        }

        let queue_events = self
            .queue
            .view_mut()
            .map(|view| view.drain_events())
            .unwrap_or_default();
        for event in queue_events {
            self.on_queue_event(event);
        }
    }

    fn on_downloader_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Changed { id, value }
                if matches!(id.as_str(), "audio_only" | "embed_subs" | "live_chat") =>
            {
                let Some(view) = self.router.view_mut() else {
                    return;
                };
                // Only one embed can be on; checking one clears the other
                let turned_on = value.as_bool().unwrap_or(false);
                if turned_on && id == "embed_subs" {
                    set_checkbox(view, "live_chat", false);
                } else if turned_on && id == "live_chat" {
                    set_checkbox(view, "embed_subs", false);
                }
                apply_downloader_rules(view);
            }
            ControlEvent::Changed { .. } => {}
            ControlEvent::Activated { id } => match id.as_str() {
                "advanced_toggle" => self.toggle_advanced_section(),
                "download" => self.start_download(),
                other => tracing::debug!("unhandled downloader button '{}'", other),
            },
            ControlEvent::Submitted { id, .. } if id == "url" => self.start_download(),
            ControlEvent::Submitted { .. } => {}
        }
    }

    fn on_console_event(&mut self, event: ControlEvent) {
        if let ControlEvent::Activated { id } = event {
            if id == "clear_console" {
                self.console.clear();
                self.set_status_message("Console cleared");
            }
        }
    }

    fn on_queue_event(&mut self, event: ControlEvent) {
        if let ControlEvent::Activated { id } = event {
            match id.as_str() {
                "start_all" => self.console.push("queue: start all requested"),
                "stop_all" => self.console.push("queue: stop all requested"),
                "clear_queue" => self.console.push("queue: cleared"),
                other => tracing::debug!("unhandled queue button '{}'", other),
            }
        }
    }

    fn toggle_advanced_section(&mut self) {
        let Some(view) = self.router.view_mut() else {
            return;
        };
        let Some(section) = view.section_mut("advanced") else {
            return;
        };
        section.hidden = !section.hidden;
        let label = if section.hidden {
            "Advanced Settings ▼"
        } else {
            "Advanced Settings ▲"
        };
        if let Some(PageControl::Button { state, .. }) = view.control_mut("advanced_toggle") {
            state.set_label(label);
        }
    }

    /// Hand the current form off to the queue
    ///
    /// The download engine lives in the daemon; the shell's part is the
    /// form handling, the console echo and revealing the queue toggle.
    fn start_download(&mut self) {
        let Some(view) = self.router.view_mut() else {
            return;
        };
        let url = view
            .input_value("url")
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if url.is_empty() {
            self.set_status_message("Enter a URL first");
            return;
        }

        let audio_only = view.checkbox_checked("audio_only").unwrap_or(false);
        let (format, quality) = if audio_only {
            (
                view.select_value("audio_format").unwrap_or("mp3").to_string(),
                view.select_value("audio_quality").unwrap_or("128kbps").to_string(),
            )
        } else {
            (
                view.select_value("video_format").unwrap_or("mp4").to_string(),
                view.select_value("video_quality").unwrap_or("1080p").to_string(),
            )
        };
        self.queue_toggle_revealed = true;

        self.console
            .push(format!("queued {} [{} {}]", url, format, quality));
        self.set_status_message("Added to queue");
    }
}

/// Enforce the downloader form's enable rules from its current values
///
/// Audio only swaps which pair of format selects is live, and the
/// subtitle language field follows the subtitle checkbox.
fn apply_downloader_rules(view: &mut PageView) {
    let audio_only = view.checkbox_checked("audio_only").unwrap_or(false);
    view.set_enabled("video_format", !audio_only);
    view.set_enabled("video_quality", !audio_only);
    view.set_enabled("audio_format", audio_only);
    view.set_enabled("audio_quality", audio_only);

    let subs = view.checkbox_checked("embed_subs").unwrap_or(false);
    view.set_enabled("sub_lang", subs);
}

/// Programmatic check state change; emits no control event
fn set_checkbox(view: &mut PageView, id: &str, checked: bool) {
    if let Some(PageControl::Checkbox { state, .. }) = view.control_mut(id) {
        state.set_checked(checked);
    }
}
