//! Startup splash sequencing
//!
//! The splash screen covers the shell while the daemon runs its startup
//! checks. It leaves the screen on the first of these triggers and never
//! comes back:
//!
//! - the daemon reports the checks finished
//! - the checks fail (the error is kept for display on the console page)
//! - the user skips, once the daemon has said skipping is allowed
//! - a fallback deadline expires; the deadline is armed only when event
//!   delivery could not be set up, so a slow but healthy daemon is never
//!   cut short
//!
//! All triggers funnel through one latch, so double finishes (say a
//! finished event racing the fallback timer) cannot dismiss twice.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::services::time_source::SharedTimeSource;
use crate::view::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplashPhase {
    Active,
    Finished,
}

pub struct StartupSequencer {
    phase: SplashPhase,
    status: String,
    progress: Option<String>,
    is_downloading: bool,
    can_skip: bool,
    error: Option<String>,
    fallback: Duration,
    fallback_deadline: Option<Instant>,
    clock: SharedTimeSource,
}

impl StartupSequencer {
    pub fn new(clock: SharedTimeSource, fallback: Duration) -> Self {
        Self {
            phase: SplashPhase::Active,
            status: "Starting...".to_string(),
            progress: None,
            is_downloading: false,
            can_skip: false,
            error: None,
            fallback,
            fallback_deadline: None,
            clock,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == SplashPhase::Active
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Arm the dead man's timer
    ///
    /// Called when the daemon could not be spawned into event delivery,
    /// meaning no finished event will ever arrive.
    pub fn arm_fallback(&mut self) {
        let deadline = self.clock.now() + self.fallback;
        self.fallback_deadline = Some(deadline);
        tracing::warn!(
            "splash fallback armed for {:?} from now",
            self.fallback
        );
    }

    pub fn on_status(&mut self, text: String, can_skip: bool, is_downloading: bool) {
        self.status = text;
        self.can_skip = can_skip;
        self.is_downloading = is_downloading;
        if !is_downloading {
            self.progress = None;
        }
    }

    pub fn on_progress(&mut self, text: String) {
        self.progress = Some(text);
    }

    /// The daemon finished its checks; returns true on the first call
    pub fn on_finished(&mut self) -> bool {
        self.finish()
    }

    /// The checks failed; dismiss immediately and keep the error
    pub fn on_checks_failed(&mut self, error: String) -> bool {
        tracing::error!("startup checks failed: {}", error);
        self.error = Some(error);
        self.finish()
    }

    /// User asked to skip; honored only when the daemon allowed it
    pub fn skip(&mut self) -> bool {
        if self.can_skip {
            self.finish()
        } else {
            false
        }
    }

    /// Fire the fallback if armed and expired; returns true on dismissal
    pub fn tick(&mut self) -> bool {
        match self.fallback_deadline {
            Some(deadline) if self.clock.now() >= deadline => {
                tracing::warn!("splash fallback expired, dismissing");
                self.finish()
            }
            _ => false,
        }
    }

    fn finish(&mut self) -> bool {
        if self.phase == SplashPhase::Finished {
            return false;
        }
        self.phase = SplashPhase::Finished;
        self.fallback_deadline = None;
        true
    }

    /// Render the fullscreen splash
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::NONE)
            .style(Style::default().bg(theme.base_bg));
        frame.render_widget(block, area);

        if area.height < 6 || area.width < 20 {
            return;
        }

        let mut lines = vec![
            Line::from(Span::styled(
                "Windlass",
                Style::default()
                    .fg(theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                self.status.clone(),
                Style::default().fg(theme.base_fg),
            )),
        ];
        if self.is_downloading {
            let progress = self.progress.clone().unwrap_or_default();
            lines.push(Line::from(Span::styled(
                progress,
                Style::default().fg(theme.muted_fg),
            )));
        }
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme.error_fg),
            )));
        }
        if self.can_skip {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "Press Space to skip",
                Style::default().fg(theme.muted_fg),
            )));
        }

        let height = lines.len() as u16;
        let top = area.y + (area.height.saturating_sub(height)) / 2;
        let body = Rect::new(area.x, top, area.width, height.min(area.height));
        frame.render_widget(
            Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
            body,
        );
    }
}
