//! Sliding queue side panel
//!
//! The panel slides in from the right edge over the page content. Opening
//! takes 250ms, closing 200ms, and a close started mid-open resumes from
//! the current position instead of jumping. The panel stays visible while
//! the close animation runs.
//!
//! Panel content is a page fragment fetched on first open. A successful
//! fetch is kept for the lifetime of the shell; a failed fetch is retried
//! the next time the panel opens.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::services::time_source::SharedTimeSource;
use crate::view::page::{render_page, PageLayout, PageTemplate, PageView};
use crate::view::theme::Theme;
use crate::view::virtualizer;

pub const OPEN_ANIM: Duration = Duration::from_millis(250);
pub const CLOSE_ANIM: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy)]
enum PanelMotion {
    Closed,
    Opening { since: Instant },
    Open,
    Closing { since: Instant },
}

/// Lifecycle of the panel's content fragment
#[derive(Debug)]
pub enum QueueContent {
    NotLoaded,
    Loading,
    Ready(PageView),
    Failed,
}

pub struct QueuePanel {
    motion: PanelMotion,
    content: QueueContent,
    clock: SharedTimeSource,
}

impl QueuePanel {
    pub fn new(clock: SharedTimeSource) -> Self {
        Self {
            motion: PanelMotion::Closed,
            content: QueueContent::NotLoaded,
            clock,
        }
    }

    /// Whether the panel occupies screen space
    pub fn is_visible(&self) -> bool {
        !matches!(self.motion, PanelMotion::Closed)
    }

    /// Whether the panel is open or on its way open
    pub fn is_open(&self) -> bool {
        matches!(self.motion, PanelMotion::Open | PanelMotion::Opening { .. })
    }

    /// Whether the panel is mid-slide and wants more frames
    pub fn is_animating(&self) -> bool {
        matches!(
            self.motion,
            PanelMotion::Opening { .. } | PanelMotion::Closing { .. }
        )
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        let now = self.clock.now();
        let p = self.progress(now);
        self.motion = PanelMotion::Opening {
            since: now - OPEN_ANIM.mul_f64(p),
        };
    }

    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        let now = self.clock.now();
        let p = self.progress(now);
        self.motion = PanelMotion::Closing {
            since: now - CLOSE_ANIM.mul_f64(1.0 - p),
        };
    }

    /// Settle finished animations
    pub fn tick(&mut self) {
        let now = self.clock.now();
        match self.motion {
            PanelMotion::Opening { since } if now.duration_since(since) >= OPEN_ANIM => {
                self.motion = PanelMotion::Open;
            }
            PanelMotion::Closing { since } if now.duration_since(since) >= CLOSE_ANIM => {
                self.motion = PanelMotion::Closed;
            }
            _ => {}
        }
    }

    /// Fraction of the slide completed, 0 closed to 1 open
    fn progress(&self, now: Instant) -> f64 {
        match self.motion {
            PanelMotion::Closed => 0.0,
            PanelMotion::Open => 1.0,
            PanelMotion::Opening { since } => {
                (now.duration_since(since).as_secs_f64() / OPEN_ANIM.as_secs_f64()).min(1.0)
            }
            PanelMotion::Closing { since } => {
                1.0 - (now.duration_since(since).as_secs_f64() / CLOSE_ANIM.as_secs_f64()).min(1.0)
            }
        }
    }

    /// Columns the panel currently covers out of `total`
    pub fn width(&self, total: u16) -> u16 {
        let target = Self::target_width(total);
        let w = (target as f64 * self.progress(self.clock.now())).round() as u16;
        w.min(total)
    }

    fn target_width(total: u16) -> u16 {
        ((total / 3).clamp(24, 40)).min(total)
    }

    /// Whether a content fetch should be started
    pub fn needs_content(&self) -> bool {
        matches!(self.content, QueueContent::NotLoaded | QueueContent::Failed)
    }

    pub fn begin_loading(&mut self) {
        self.content = QueueContent::Loading;
    }

    /// Install fetched content and bind its widgets
    pub fn content_loaded(&mut self, template: &PageTemplate) {
        let mut view = PageView::from_template("queue", template);
        virtualizer::initialize(&mut view);
        self.content = QueueContent::Ready(view);
    }

    pub fn content_failed(&mut self) {
        self.content = QueueContent::Failed;
        tracing::warn!("queue panel content failed to load");
    }

    pub fn view(&self) -> Option<&PageView> {
        match &self.content {
            QueueContent::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn view_mut(&mut self) -> Option<&mut PageView> {
        match &mut self.content {
            QueueContent::Ready(view) => Some(view),
            _ => None,
        }
    }

    /// Render the panel over the right edge of `area`
    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) -> PageLayout {
        if !self.is_visible() {
            return PageLayout::default();
        }
        let w = self.width(area.width);
        if w < 4 || area.height < 3 {
            return PageLayout::default();
        }

        let panel = Rect::new(area.x + area.width - w, area.y, w, area.height);
        frame.render_widget(Clear, panel);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_fg))
            .title(Span::styled("Queue", Style::default().fg(theme.title_fg)))
            .style(Style::default().bg(theme.panel_bg));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        match &mut self.content {
            QueueContent::Ready(view) => render_page(frame, inner, view, theme),
            QueueContent::Loading | QueueContent::NotLoaded => {
                let line = Line::from(Span::styled(
                    "Loading queue...",
                    Style::default().fg(theme.muted_fg),
                ));
                frame.render_widget(Paragraph::new(line), inner);
                PageLayout::default()
            }
            QueueContent::Failed => {
                let line = Line::from(Span::styled(
                    "Queue unavailable",
                    Style::default().fg(theme.error_fg),
                ));
                frame.render_widget(Paragraph::new(line), inner);
                PageLayout::default()
            }
        }
    }
}
