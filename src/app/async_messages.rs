//! Async message handlers for the Shell
//!
//! This module contains handlers for ShellMessage variants, grouped by domain:
//! - Page and queue content loads
//! - Splash events from the daemon's startup checks
//! - Daemon settings round trips
//! - Daemon process output and exit

use crate::config::ConfigMap;
use crate::view::page::PageTemplate;

use super::Shell;

// =============================================================================
// Page Load Handlers
// =============================================================================

impl Shell {
    /// Install a fetched page, then run its setup sequence
    pub(super) fn handle_page_loaded(
        &mut self,
        ticket: u64,
        name: String,
        index: usize,
        template: PageTemplate,
    ) {
        tracing::debug!("page '{}' (index {}) loaded, ticket {}", name, index, ticket);
        if self.router.complete_load(ticket, &template).is_none() {
            return;
        }
        self.run_page_init();
    }

    pub(super) fn handle_page_load_failed(&mut self, ticket: u64, name: String, error: String) {
        if self.router.fail_load(ticket) {
            tracing::warn!("page '{}' failed to load: {}", name, error);
            self.console.push(format!("page '{}' failed: {}", name, error));
            self.set_status_message(format!("Failed to load {}", name));
        } else {
            tracing::debug!("ignoring stale load failure for '{}'", name);
        }
    }

    pub(super) fn handle_queue_content_loaded(&mut self, template: PageTemplate) {
        self.queue.content_loaded(&template);
    }

    pub(super) fn handle_queue_content_failed(&mut self, error: String) {
        tracing::warn!("queue content failed to load: {}", error);
        self.queue.content_failed();
        self.set_status_message("Failed to load queue");
    }
}

// =============================================================================
// Splash Handlers
// =============================================================================

impl Shell {
    pub(super) fn handle_splash_status(
        &mut self,
        text: String,
        can_skip: bool,
        is_downloading: bool,
    ) {
        self.splash.on_status(text, can_skip, is_downloading);
    }

    pub(super) fn handle_splash_progress(&mut self, text: String) {
        self.splash.on_progress(text);
    }

    pub(super) fn handle_splash_finished(&mut self) {
        if self.splash.on_finished() {
            self.after_splash();
        }
    }

    pub(super) fn handle_startup_checks_failed(&mut self, error: String) {
        self.console.push(format!("startup checks failed: {}", error));
        if self.splash.on_checks_failed(error) {
            self.after_splash();
        }
    }
}

// =============================================================================
// Daemon Settings Handlers
// =============================================================================

impl Shell {
    /// Store the fetched settings and apply them to the settings page
    ///
    /// The apply only touches the settings page; fetched values are kept
    /// either way so a later save starts from the daemon's snapshot.
    pub(super) fn handle_config_loaded(&mut self, config: ConfigMap) {
        tracing::debug!("daemon settings loaded ({} keys)", config.len());
        self.daemon_config = Some(config.clone());
        if self.router.current_name() == Some("settings") {
            self.apply_config_to_settings_page(&config);
            self.settings_attached = true;
        }
    }

    pub(super) fn handle_config_load_failed(&mut self, error: String) {
        tracing::warn!("settings load failed: {}", error);
        self.console.push(format!("settings load failed: {}", error));
        self.set_status_message("Failed to load settings");
    }

    pub(super) fn handle_config_saved(&mut self) {
        self.set_status_message("Settings saved");
    }

    pub(super) fn handle_config_save_failed(&mut self, error: String) {
        tracing::warn!("settings save failed: {}", error);
        self.console.push(format!("settings save failed: {}", error));
        self.set_status_message("Failed to save settings");
    }
}

// =============================================================================
// Daemon Process Handlers
// =============================================================================

impl Shell {
    pub(super) fn handle_backend_log(&mut self, line: String) {
        self.console.push(line);
    }

    /// The daemon died; during the splash this counts as a failed startup
    pub(super) fn handle_backend_exited(&mut self, code: Option<i32>) {
        let line = match code {
            Some(code) => format!("daemon exited with code {}", code),
            None => "daemon terminated by signal".to_string(),
        };
        tracing::error!("{}", line);
        self.console.push(line.clone());
        self.set_status_message(line.clone());
        if self.splash.is_active() && self.splash.on_checks_failed(line) {
            self.after_splash();
        }
    }
}
