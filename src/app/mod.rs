//! The shell application
//!
//! [`Shell`] owns every piece of runtime state: the page router, the
//! splash sequencer, the queue panel, the daemon connection and the async
//! bridge that carries daemon traffic back into the sync main loop. The
//! update cycle is poll, handle input, drain async messages, tick, draw.
//!
//! Handlers are grouped by domain:
//! - `input` keyboard dispatch
//! - `mouse_input` mouse dispatch and hit testing
//! - `async_messages` bridge message handlers
//! - `page_init` per-page setup hooks and control event routing
//! - `settings_actions` settings fetch, apply and save
//! - `render` frame layout

mod async_messages;
mod input;
mod mouse_input;
mod page_init;
mod render;
mod settings_actions;
mod types;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigMap, ShellConfig};
use crate::router::ViewRouter;
use crate::services::async_bridge::{AsyncBridge, ShellMessage};
use crate::services::backend::{BackendClient, ProcessBackend};
use crate::services::fragments::{AssetFragments, BuiltinFragments, FragmentSource};
use crate::services::time_source::{RealTimeSource, SharedTimeSource};
use crate::splash::StartupSequencer;
use crate::view::queue_panel::QueuePanel;
use crate::view::theme::Theme;
use crate::view::virtualizer;

use anyhow::Result as AnyhowResult;

use self::types::{CachedLayout, ConsoleBuffer};

/// The main shell struct, wires pages, panels and the daemon together
pub struct Shell {
    /// Configuration
    config: ShellConfig,

    /// Active theme
    theme: Theme,

    /// Page navigation and the current page view
    router: ViewRouter,

    /// Splash screen state, covers the shell until startup checks settle
    splash: StartupSequencer,

    /// Sliding queue side panel
    queue: QueuePanel,

    /// The nav bar queue toggle appears after the first download is queued
    queue_toggle_revealed: bool,

    /// Daemon connection; None when the spawn failed
    backend: Option<Arc<dyn BackendClient>>,

    /// Page fragment source
    fragments: Arc<dyn FragmentSource>,

    /// Bridge for async messages from tokio tasks to the main loop
    async_bridge: AsyncBridge,

    /// Tokio runtime for async I/O tasks
    tokio_runtime: Option<tokio::runtime::Runtime>,

    /// Last daemon settings snapshot
    daemon_config: Option<ConfigMap>,

    /// Set once the snapshot has been applied to the settings page;
    /// change events on that page save only while this holds
    settings_attached: bool,

    /// Output shown on the console page
    console: ConsoleBuffer,

    /// Status message (shown in the status bar)
    status_message: Option<String>,

    /// Should the shell quit?
    should_quit: bool,

    /// Screen areas from the last render, for mouse hit testing
    cached_layout: CachedLayout,

    /// Clock used for all animations and deadlines
    clock: SharedTimeSource,

    /// Terminal dimensions
    terminal_width: u16,
    terminal_height: u16,
}

impl Shell {
    /// Create a shell connected to a real daemon process
    pub fn new(config: ShellConfig, width: u16, height: u16) -> AnyhowResult<Self> {
        let clock = RealTimeSource::shared();
        let runtime = tokio::runtime::Runtime::new()?;
        let bridge = AsyncBridge::new();

        let backend: Option<Arc<dyn BackendClient>> = {
            let _guard = runtime.enter();
            match ProcessBackend::spawn(&config.backend, bridge.sender()) {
                Ok(process) => Some(Arc::new(process)),
                Err(e) => {
                    tracing::error!("failed to spawn daemon: {}", e);
                    None
                }
            }
        };

        let fragments: Arc<dyn FragmentSource> = match &config.assets_dir {
            Some(dir) => Arc::new(AssetFragments::new(dir.clone())),
            None => Arc::new(BuiltinFragments),
        };

        Ok(Self::assemble(
            config,
            width,
            height,
            backend,
            fragments,
            bridge,
            Some(runtime),
            clock,
        ))
    }

    /// Create a shell for testing with injected backend, fragments and clock
    pub fn for_test(
        config: ShellConfig,
        width: u16,
        height: u16,
        backend: Arc<dyn BackendClient>,
        fragments: Arc<dyn FragmentSource>,
        clock: SharedTimeSource,
    ) -> AnyhowResult<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let bridge = AsyncBridge::new();
        Ok(Self::assemble(
            config,
            width,
            height,
            Some(backend),
            fragments,
            bridge,
            Some(runtime),
            clock,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        config: ShellConfig,
        width: u16,
        height: u16,
        backend: Option<Arc<dyn BackendClient>>,
        fragments: Arc<dyn FragmentSource>,
        async_bridge: AsyncBridge,
        tokio_runtime: Option<tokio::runtime::Runtime>,
        clock: SharedTimeSource,
    ) -> Self {
        let theme = Theme::from_name(&config.theme);
        let fallback = Duration::from_secs(config.splash.fallback_secs);
        Self {
            router: ViewRouter::new(clock.clone()),
            splash: StartupSequencer::new(clock.clone(), fallback),
            queue: QueuePanel::new(clock.clone()),
            queue_toggle_revealed: false,
            backend,
            fragments,
            async_bridge,
            tokio_runtime,
            daemon_config: None,
            settings_attached: false,
            console: ConsoleBuffer::default(),
            status_message: None,
            should_quit: false,
            cached_layout: CachedLayout::default(),
            clock,
            terminal_width: width,
            terminal_height: height,
            config,
            theme,
        }
    }

    /// Kick off the startup sequence
    ///
    /// Spawns the daemon's startup checks. When no daemon connection
    /// exists, event delivery is impossible, so the splash fallback timer
    /// is armed instead.
    pub fn startup(&mut self) {
        match self.backend.clone() {
            Some(backend) => {
                let tx = self.async_bridge.sender();
                self.spawn(async move {
                    if let Err(error) = backend.run_startup_checks().await {
                        let _ = tx.send(ShellMessage::StartupChecksFailed { error });
                    }
                });
            }
            None => {
                self.console.push("daemon unavailable, continuing without it");
                self.splash.arm_fallback();
            }
        }
    }

    /// Spawn a task on the shell's runtime
    fn spawn<F>(&self, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        match &self.tokio_runtime {
            Some(runtime) => {
                runtime.spawn(future);
            }
            None => tracing::warn!("no runtime, dropping async task"),
        }
    }

    /// Process pending async messages from the async bridge
    ///
    /// Called each frame in the main loop. Returns true when anything
    /// was handled and the screen should be redrawn.
    pub fn process_async_messages(&mut self) -> bool {
        let messages = self.async_bridge.try_recv_all();
        let needs_render = !messages.is_empty();

        for message in messages {
            match message {
                ShellMessage::PageLoaded {
                    ticket,
                    name,
                    index,
                    template,
                } => self.handle_page_loaded(ticket, name, index, template),
                ShellMessage::PageLoadFailed {
                    ticket,
                    name,
                    error,
                } => self.handle_page_load_failed(ticket, name, error),
                ShellMessage::QueueContentLoaded { template } => {
                    self.handle_queue_content_loaded(template)
                }
                ShellMessage::QueueContentFailed { error } => {
                    self.handle_queue_content_failed(error)
                }
                ShellMessage::SplashStatus {
                    text,
                    can_skip,
                    is_downloading,
                } => self.handle_splash_status(text, can_skip, is_downloading),
                ShellMessage::SplashProgress { text } => self.handle_splash_progress(text),
                ShellMessage::SplashFinished => self.handle_splash_finished(),
                ShellMessage::StartupChecksFailed { error } => {
                    self.handle_startup_checks_failed(error)
                }
                ShellMessage::ConfigLoaded { config } => self.handle_config_loaded(config),
                ShellMessage::ConfigLoadFailed { error } => self.handle_config_load_failed(error),
                ShellMessage::ConfigSaved => self.handle_config_saved(),
                ShellMessage::ConfigSaveFailed { error } => self.handle_config_save_failed(error),
                ShellMessage::BackendLog { line } => self.handle_backend_log(line),
                ShellMessage::BackendExited { code } => self.handle_backend_exited(code),
            }
        }

        needs_render
    }

    /// Advance animations and deadlines
    pub fn tick(&mut self) {
        if self.splash.tick() {
            self.after_splash();
        }
        self.router.tick();
        self.queue.tick();

        if let Some(view) = self.router.view_mut() {
            virtualizer::sync(view);
        }
        if let Some(view) = self.queue.view_mut() {
            virtualizer::sync(view);
        }
        self.dispatch_control_events();
    }

    /// First navigation once the splash is gone
    fn after_splash(&mut self) {
        if let Some(req) = self.router.navigate("downloader") {
            self.spawn_page_load(req);
        }
    }

    /// Start the fetch for a navigation
    fn spawn_page_load(&mut self, req: crate::router::LoadRequest) {
        let fragments = self.fragments.clone();
        let tx = self.async_bridge.sender();
        self.spawn(async move {
            let outcome = match fragments.fetch(&req.name).await {
                Ok(text) => crate::view::page::PageTemplate::parse(&text)
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let message = match outcome {
                Ok(template) => ShellMessage::PageLoaded {
                    ticket: req.ticket,
                    name: req.name,
                    index: req.index,
                    template,
                },
                Err(error) => ShellMessage::PageLoadFailed {
                    ticket: req.ticket,
                    name: req.name,
                    error,
                },
            };
            let _ = tx.send(message);
        });
    }

    /// Start the queue panel content fetch
    fn spawn_queue_content_load(&mut self) {
        self.queue.begin_loading();
        let fragments = self.fragments.clone();
        let tx = self.async_bridge.sender();
        self.spawn(async move {
            let outcome = match fragments.fetch("queue").await {
                Ok(text) => crate::view::page::PageTemplate::parse(&text)
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let message = match outcome {
                Ok(template) => ShellMessage::QueueContentLoaded { template },
                Err(error) => ShellMessage::QueueContentFailed { error },
            };
            let _ = tx.send(message);
        });
    }

    /// Open or close the queue panel, fetching content on first open
    ///
    /// At most one option list may be open across the whole shell, so the
    /// toggle dismisses any open list on either surface first.
    fn toggle_queue(&mut self) {
        if let Some(view) = self.router.view_mut() {
            virtualizer::close_all(view);
        }
        if let Some(view) = self.queue.view_mut() {
            virtualizer::close_all(view);
        }
        self.queue.toggle();
        if self.queue.is_open() && self.queue.needs_content() {
            self.spawn_queue_content_load();
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// True while any surface is animating and wants another frame
    pub fn is_animating(&self) -> bool {
        self.splash.is_active() || self.router.is_transitioning() || self.queue.is_animating()
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_width = width;
        self.terminal_height = height;
    }

    // Accessors used by integration tests

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn splash(&self) -> &StartupSequencer {
        &self.splash
    }

    pub fn queue(&self) -> &QueuePanel {
        &self.queue
    }

    pub fn daemon_config(&self) -> Option<&ConfigMap> {
        self.daemon_config.as_ref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn async_bridge(&self) -> &AsyncBridge {
        &self.async_bridge
    }
}
