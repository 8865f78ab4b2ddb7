use chrono::Local;
use ratatui::layout::Rect;
use std::collections::VecDeque;

use crate::view::page::PageLayout;

/// Console scrollback cap; older lines are dropped
pub(super) const CONSOLE_CAPACITY: usize = 500;

/// Rolling log shown on the console page
#[derive(Debug, Default)]
pub(super) struct ConsoleBuffer {
    lines: VecDeque<String>,
}

impl ConsoleBuffer {
    /// Append a line, stamped with the wall-clock time
    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == CONSOLE_CAPACITY {
            self.lines.pop_front();
        }
        self.lines
            .push_back(format!("{} {}", Local::now().format("%H:%M:%S"), line.into()));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The last `count` lines, oldest first
    pub fn tail(&self, count: usize) -> impl Iterator<Item = &str> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).map(String::as_str)
    }
}

/// Screen areas captured during render, for mouse hit testing
#[derive(Debug, Clone, Default)]
pub(super) struct CachedLayout {
    /// Navigation tab hit areas, one per page
    pub nav_tab_areas: Vec<(usize, Rect)>,
    /// Queue toggle hit area; None until the toggle is revealed
    pub queue_toggle_area: Option<Rect>,
    /// Area the current page was drawn into
    pub page_area: Rect,
    /// Control hit areas of the current page
    pub page_layout: PageLayout,
    /// Whole queue panel rect when visible; clicks inside stay in the panel
    pub queue_area: Option<Rect>,
    /// Control hit areas of the queue panel content
    pub queue_layout: PageLayout,
}
