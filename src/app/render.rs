//! Frame layout and drawing.
//!
//! Every pass rebuilds [`CachedLayout`] so mouse hit testing always
//! matches what is on screen. The queue panel draws last and overlays
//! the page content.

use super::types::{CachedLayout, ConsoleBuffer};
use super::Shell;
use crate::router::PAGES;
use crate::view::page::{render_page, PageLayout};
use crate::view::theme::Theme;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

impl Shell {
    /// Render the whole shell to the terminal
    pub fn render(&mut self, frame: &mut Frame) {
        let _span = tracing::trace_span!("render").entered();
        let size = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.base_bg)),
            size,
        );

        // The splash owns the whole screen until startup settles
        if self.splash.is_active() {
            self.splash.render(frame, size, &self.theme);
            self.cached_layout = CachedLayout::default();
            return;
        }

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Nav bar
                Constraint::Min(0),    // Page content
                Constraint::Length(1), // Status bar
            ])
            .split(size);

        self.render_nav_bar(frame, main_chunks[0]);
        self.render_page_content(frame, main_chunks[1]);
        self.render_status_bar(frame, main_chunks[2]);

        // Queue panel last so it sits on top of the page
        if self.queue.is_visible() {
            let content = main_chunks[1];
            let width = self.queue.width(content.width);
            if width > 0 {
                let panel = Rect::new(
                    content.x + content.width - width,
                    content.y,
                    width,
                    content.height,
                );
                self.cached_layout.queue_layout = self.queue.render(frame, panel, &self.theme);
                self.cached_layout.queue_area = Some(panel);
                return;
            }
        }
        self.cached_layout.queue_area = None;
        self.cached_layout.queue_layout = PageLayout::default();
    }

    fn render_nav_bar(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        let mut tab_areas = Vec::new();
        let mut x = area.x;

        for (index, name) in PAGES.iter().enumerate() {
            let is_current = index == self.router.current_index();
            let style = if is_current {
                Style::default()
                    .fg(self.theme.accent_fg)
                    .bg(self.theme.panel_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .fg(self.theme.muted_fg)
                    .bg(self.theme.panel_bg)
            };

            let text = format!(" {} ", page_label(name));
            let width = text.len() as u16;
            tab_areas.push((index, Rect::new(x, area.y, width, 1)));
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
            x += width + 1;
        }

        let paragraph =
            Paragraph::new(Line::from(spans)).style(Style::default().bg(self.theme.panel_bg));
        frame.render_widget(paragraph, area);
        self.cached_layout.nav_tab_areas = tab_areas;
        self.cached_layout.queue_toggle_area = None;

        // The queue toggle sits at the right edge once revealed
        if self.queue_toggle_revealed {
            let text = " Queue ";
            let width = text.len() as u16;
            if area.width >= (x - area.x) + width {
                let toggle = Rect::new(area.x + area.width - width, area.y, width, 1);
                let style = if self.queue.is_open() {
                    Style::default()
                        .fg(self.theme.accent_fg)
                        .bg(self.theme.panel_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(self.theme.muted_fg)
                        .bg(self.theme.panel_bg)
                };
                frame.render_widget(Paragraph::new(Span::styled(text, style)), toggle);
                self.cached_layout.queue_toggle_area = Some(toggle);
            }
        }
    }

    fn render_page_content(&mut self, frame: &mut Frame, area: Rect) {
        let animated = self.router.animated_area(area);
        self.cached_layout.page_area = animated;

        let is_console = self.router.current_name() == Some("console");
        match self.router.view_mut() {
            Some(view) if is_console => {
                // Console keeps its controls on top and fills the rest
                // with the log tail
                let controls_height = view.content_height().min(animated.height);
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(controls_height), Constraint::Min(0)])
                    .split(animated);
                self.cached_layout.page_layout = render_page(frame, chunks[0], view, &self.theme);
                render_console_log(frame, chunks[1], &self.console, &self.theme);
            }
            Some(view) => {
                self.cached_layout.page_layout = render_page(frame, animated, view, &self.theme);
            }
            None => {
                // First page load still in flight
                let paragraph = Paragraph::new("Loading...")
                    .style(Style::default().fg(self.theme.muted_fg))
                    .alignment(Alignment::Center);
                frame.render_widget(paragraph, centered_line(animated));
                self.cached_layout.page_layout = PageLayout::default();
            }
        }
    }

    fn render_status_bar(&mut self, frame: &mut Frame, area: Rect) {
        let (text, fg) = if let Some(message) = &self.status_message {
            (message.clone(), self.theme.base_fg)
        } else if self.router.is_loading() {
            ("Loading...".to_string(), self.theme.muted_fg)
        } else {
            (
                "F1 Downloader  F2 Console  F3 Settings  Ctrl+B Queue  Ctrl+Q Quit".to_string(),
                self.theme.muted_fg,
            )
        };
        let paragraph =
            Paragraph::new(text).style(Style::default().fg(fg).bg(self.theme.panel_bg));
        frame.render_widget(paragraph, area);
    }
}

fn page_label(name: &str) -> &str {
    match name {
        "downloader" => "Downloader",
        "console" => "Console",
        "settings" => "Settings",
        other => other,
    }
}

/// The middle row of an area, for one-line placeholder text
fn centered_line(area: Rect) -> Rect {
    if area.height <= 1 {
        return area;
    }
    Rect::new(area.x, area.y + area.height / 2, area.width, 1)
}

fn render_console_log(frame: &mut Frame, area: Rect, console: &ConsoleBuffer, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_fg))
        .title("Log");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if console.len() == 0 {
        let paragraph = Paragraph::new("No output yet.")
            .style(Style::default().fg(theme.muted_fg));
        frame.render_widget(paragraph, inner);
        return;
    }

    let lines: Vec<Line> = console
        .tail(inner.height as usize)
        .map(|line| Line::from(line.to_string()))
        .collect();
    let paragraph = Paragraph::new(lines).style(Style::default().fg(theme.base_fg));
    frame.render_widget(paragraph, inner);
}
