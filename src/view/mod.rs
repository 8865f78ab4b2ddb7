//! View and UI layer
//!
//! This module contains all presentation and rendering components.

pub mod controls;
pub mod page;
pub mod queue_panel;
pub mod theme;
pub mod virtualizer;
