//! Terminal front-end for the windlass download daemon.
//!
//! The shell talks to the daemon over a line-delimited JSON pipe and
//! renders JSON page templates as terminal forms. Modules:
//!
//! - [`app`] the shell itself: input, async message handling, drawing
//! - [`router`] page navigation with slide transitions
//! - [`splash`] the startup sequencer shown while the daemon comes up
//! - [`view`] page views, form controls and the queue side panel
//! - [`services`] daemon process, async bridge, template sources
//! - [`config`] shell configuration and the daemon settings map

pub mod app;
pub mod config;
pub mod router;
pub mod services;
pub mod splash;
pub mod view;
