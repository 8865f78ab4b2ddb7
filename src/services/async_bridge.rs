//! Async Bridge: Communication between async Tokio runtime and sync main loop
//!
//! - Tokio runtime handles I/O tasks (daemon stdio, fragment reads)
//! - Main UI loop stays synchronous (rendering, input, state updates)
//! - std::sync::mpsc channels bridge the two worlds
//!
//! Philosophy:
//! - I/O should be async (daemon protocol, filesystem)
//! - Computation should be sync (layout, rendering)
//! - Main loop remains responsive and simple

use crate::config::ConfigMap;
use crate::view::page::PageTemplate;
use std::sync::mpsc;

/// Messages sent from async tasks to the synchronous main loop
#[derive(Debug)]
pub enum ShellMessage {
    /// A page fragment finished loading and parsing
    PageLoaded {
        /// Generation ticket issued by the router; stale tickets are dropped
        ticket: u64,
        name: String,
        index: usize,
        template: PageTemplate,
    },

    /// A page fragment failed to load or parse
    PageLoadFailed {
        ticket: u64,
        name: String,
        error: String,
    },

    /// The queue panel fragment finished loading
    QueueContentLoaded { template: PageTemplate },

    /// The queue panel fragment failed to load
    QueueContentFailed { error: String },

    /// Splash status update from the daemon
    SplashStatus {
        text: String,
        can_skip: bool,
        is_downloading: bool,
    },

    /// Splash progress line from the daemon
    SplashProgress { text: String },

    /// Startup checks completed; the splash may close
    SplashFinished,

    /// Startup checks could not even be fired (daemon unreachable)
    StartupChecksFailed { error: String },

    /// Full settings map fetched from the daemon
    ConfigLoaded { config: ConfigMap },

    /// Settings fetch failed
    ConfigLoadFailed { error: String },

    /// Daemon acknowledged a settings save
    ConfigSaved,

    /// Settings save failed
    ConfigSaveFailed { error: String },

    /// A console output line from the daemon
    BackendLog { line: String },

    /// The daemon process exited
    BackendExited { code: Option<i32> },
}

/// Bridge between async Tokio runtime and sync main loop
///
/// Design:
/// - Lightweight, cloneable sender that can be passed to async tasks
/// - Non-blocking receiver checked each frame in main loop
/// - No locks needed in main loop (channel handles synchronization)
#[derive(Clone)]
pub struct AsyncBridge {
    sender: mpsc::Sender<ShellMessage>,
    // Receiver wrapped in Arc<Mutex<>> to allow cloning
    receiver: std::sync::Arc<std::sync::Mutex<mpsc::Receiver<ShellMessage>>>,
}

impl AsyncBridge {
    /// Create a new async bridge with an unbounded channel
    ///
    /// Unbounded is appropriate here because the main loop drains every
    /// frame and daemon traffic is a handful of messages per second.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: std::sync::Arc::new(std::sync::Mutex::new(receiver)),
        }
    }

    /// Get a cloneable sender for async tasks
    pub fn sender(&self) -> mpsc::Sender<ShellMessage> {
        self.sender.clone()
    }

    /// Try to receive pending messages (non-blocking)
    ///
    /// Called each frame in the main loop. Returns all pending messages in
    /// send order without blocking.
    pub fn try_recv_all(&self) -> Vec<ShellMessage> {
        let mut messages = Vec::new();

        if let Ok(receiver) = self.receiver.lock() {
            while let Ok(msg) = receiver.try_recv() {
                messages.push(msg);
            }
        }

        messages
    }
}

impl Default for AsyncBridge {
    fn default() -> Self {
        Self::new()
    }
}
