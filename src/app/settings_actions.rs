//! Settings page operations for the Shell.
//!
//! This module keeps the settings page and the daemon's settings store in
//! step:
//! - Every settings page visit fetches a fresh snapshot from the daemon
//! - Fetched values are applied to the page's control models; programmatic
//!   writes queue no change events, so applying never triggers a save
//! - A user change reads every mapped control into a fresh map and saves
//!   it wholesale; the save never depends on the fetched snapshot
//! - Saves arm only once the snapshot has been applied; a failed fetch
//!   leaves the page inert rather than overwriting the daemon's store
//!
//! Control ids on the settings page equal daemon setting keys. The
//! participation list below decides which controls take part in the sync;
//! anything else on the page is left alone.

use crate::config::{default_daemon_config, ConfigMap, SettingValue};
use crate::services::async_bridge::ShellMessage;
use crate::view::page::{ControlEvent, PageControl};

use super::Shell;

/// Daemon setting keys with a control on the settings page
pub(super) const SETTING_KEYS: [&str; 12] = [
    "theme",
    "language",
    "close_behavior",
    "update_app",
    "update_ytdlp",
    "update_ffmpeg",
    "cookies_browser",
    "geo_bypass",
    "video_format",
    "video_quality",
    "audio_format",
    "audio_quality",
];

impl Shell {
    /// Settings page init hook; starts the snapshot fetch
    ///
    /// Change events stay detached until the fetched snapshot has been
    /// applied, so edits made before (or after a failed fetch) never save.
    pub(super) fn init_settings_page(&mut self) {
        self.settings_attached = false;
        self.spawn_config_load();
    }

    fn spawn_config_load(&mut self) {
        let Some(backend) = self.backend.clone() else {
            self.console.push("settings load skipped: daemon unavailable");
            self.set_status_message("Daemon unavailable");
            return;
        };
        let tx = self.async_bridge.sender();
        self.spawn(async move {
            let message = match backend.get_config().await {
                Ok(config) => ShellMessage::ConfigLoaded { config },
                Err(error) => ShellMessage::ConfigLoadFailed { error },
            };
            let _ = tx.send(message);
        });
    }

    /// Write fetched values into the settings page's control models
    ///
    /// Unknown keys and values that match no option are skipped; the
    /// control keeps what it had.
    pub(super) fn apply_config_to_settings_page(&mut self, config: &ConfigMap) {
        let Some(view) = self.router.view_mut() else {
            return;
        };
        if view.name != "settings" {
            return;
        }
        for (key, value) in config {
            match view.control_mut(key) {
                Some(PageControl::Select { model, .. }) => {
                    if let Some(text) = value.as_text() {
                        if !model.set_value(text) && model.value != text {
                            tracing::debug!("setting '{}': no option {:?}", key, text);
                        }
                    }
                }
                Some(PageControl::Checkbox { state, .. }) => {
                    if let Some(checked) = value.as_bool() {
                        state.set_checked(checked);
                    }
                }
                Some(PageControl::Radio { state, .. }) => {
                    if let Some(text) = value.as_text() {
                        if !state.set_value(text) {
                            tracing::debug!("setting '{}': no option {:?}", key, text);
                        }
                    }
                }
                Some(_) => {
                    tracing::debug!("setting '{}' maps to a non-value control", key);
                }
                None => {
                    tracing::debug!("no control for daemon setting '{}'", key);
                }
            }
        }
    }

    /// A user changed a settings control: read every participating
    /// control into a fresh map and save it wholesale to the daemon
    pub(super) fn on_settings_event(&mut self, event: ControlEvent) {
        let ControlEvent::Changed { id, .. } = event else {
            return;
        };
        if !SETTING_KEYS.contains(&id.as_str()) {
            tracing::debug!("change on non-setting control '{}'", id);
            return;
        }
        if !self.settings_attached {
            tracing::debug!("settings change before the snapshot applied, not saving");
            return;
        }

        let config = self.collect_settings_page();
        self.daemon_config = Some(config.clone());
        self.spawn_config_save(config);
    }

    /// Current value of every participating control. A key whose control
    /// is missing or holds no selection keeps its canonical default.
    fn collect_settings_page(&self) -> ConfigMap {
        let mut config = default_daemon_config();
        let Some(view) = self.router.view() else {
            return config;
        };
        for key in SETTING_KEYS {
            let value = match view.control(key) {
                Some(PageControl::Select { model, .. }) => {
                    Some(SettingValue::Text(model.value.clone()))
                }
                Some(PageControl::Checkbox { state, .. }) => {
                    Some(SettingValue::Bool(state.checked))
                }
                Some(PageControl::Radio { state, .. }) => state
                    .selected_value()
                    .map(|value| SettingValue::Text(value.to_string())),
                Some(PageControl::Input { state, .. }) => {
                    Some(SettingValue::Text(state.value.clone()))
                }
                _ => None,
            };
            if let Some(value) = value {
                config.insert(key.to_string(), value);
            }
        }
        config
    }

    fn spawn_config_save(&mut self, config: ConfigMap) {
        let Some(backend) = self.backend.clone() else {
            self.set_status_message("Daemon unavailable, settings not saved");
            return;
        };
        let tx = self.async_bridge.sender();
        self.spawn(async move {
            let message = match backend.save_config(config).await {
                Ok(()) => ShellMessage::ConfigSaved,
                Err(error) => ShellMessage::ConfigSaveFailed { error },
            };
            let _ = tx.send(message);
        });
    }
}
