//! Radio group control for one-of-N choices
//!
//! Renders as: `Label: (•) First   ( ) Second`

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::FocusState;

/// State for a radio group control
#[derive(Debug, Clone)]
pub struct RadioGroupState {
    /// Currently selected index
    pub selected: usize,
    /// Display names for options
    pub options: Vec<String>,
    /// Wire values for options
    pub values: Vec<String>,
    /// Label displayed before the group
    pub label: String,
    /// Focus state
    pub focus: FocusState,
}

impl RadioGroupState {
    pub fn new(options: Vec<String>, values: Vec<String>, label: impl Into<String>) -> Self {
        debug_assert_eq!(options.len(), values.len());
        Self {
            selected: 0,
            options,
            values,
            label: label.into(),
            focus: FocusState::Normal,
        }
    }

    /// Set the initially selected index
    pub fn with_selected(mut self, index: usize) -> Self {
        if index < self.options.len() {
            self.selected = index;
        }
        self
    }

    /// Set the focus state
    pub fn with_focus(mut self, focus: FocusState) -> Self {
        self.focus = focus;
        self
    }

    /// Get the selected wire value
    pub fn selected_value(&self) -> Option<&str> {
        self.values.get(self.selected).map(|s| s.as_str())
    }

    /// Select an option by index
    ///
    /// Returns true if the index was valid and the control interactive.
    pub fn select(&mut self, index: usize) -> bool {
        if self.focus.interactive() && index < self.options.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Move the selection to the next option, wrapping
    pub fn select_next(&mut self) {
        if self.focus.interactive() && !self.options.is_empty() {
            self.selected = (self.selected + 1) % self.options.len();
        }
    }

    /// Set the selection by wire value, used when applying fetched settings
    pub fn set_value(&mut self, value: &str) -> bool {
        match self.values.iter().position(|v| v == value) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }
}

/// Colors for the radio group control
#[derive(Debug, Clone, Copy)]
pub struct RadioGroupColors {
    /// Label color
    pub label: Color,
    /// Option text color
    pub option: Color,
    /// Selected dot color
    pub dot: Color,
    /// Focused highlight color
    pub focused: Color,
    /// Disabled color
    pub disabled: Color,
}

impl Default for RadioGroupColors {
    fn default() -> Self {
        Self {
            label: Color::White,
            option: Color::White,
            dot: Color::Cyan,
            focused: Color::Cyan,
            disabled: Color::DarkGray,
        }
    }
}

impl RadioGroupColors {
    /// Create colors from theme
    pub fn from_theme(theme: &crate::view::theme::Theme) -> Self {
        Self {
            label: theme.base_fg,
            option: theme.base_fg,
            dot: theme.accent_fg,
            focused: theme.accent_fg,
            disabled: theme.muted_fg,
        }
    }
}

/// Layout information returned after rendering for hit testing
#[derive(Debug, Clone)]
pub struct RadioGroupLayout {
    /// Areas for each option
    pub option_areas: Vec<Rect>,
    /// The full control area
    pub full_area: Rect,
}

impl RadioGroupLayout {
    /// Get the option index at a point, if any
    pub fn option_at(&self, x: u16, y: u16) -> Option<usize> {
        for (i, area) in self.option_areas.iter().enumerate() {
            if x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height {
                return Some(i);
            }
        }
        None
    }
}

/// Render a radio group control
pub fn render_radio_group(
    frame: &mut Frame,
    area: Rect,
    state: &RadioGroupState,
    colors: &RadioGroupColors,
) -> RadioGroupLayout {
    if area.height == 0 || area.width < 8 {
        return RadioGroupLayout {
            option_areas: Vec::new(),
            full_area: area,
        };
    }

    let (label_color, option_color, dot_color) = match state.focus {
        FocusState::Normal => (colors.label, colors.option, colors.dot),
        FocusState::Focused | FocusState::Hovered => {
            (colors.focused, colors.option, colors.dot)
        }
        FocusState::Disabled => (colors.disabled, colors.disabled, colors.disabled),
    };

    let mut spans = vec![
        Span::styled(state.label.clone(), Style::default().fg(label_color)),
        Span::styled(": ", Style::default().fg(label_color)),
    ];

    let mut option_areas = Vec::new();
    let mut x = area.x + state.label.len() as u16 + 2;

    for (i, option) in state.options.iter().enumerate() {
        let dot = if i == state.selected { "(•)" } else { "( )" };
        let width = 3 + 1 + option.len() as u16;

        spans.push(Span::styled(dot, Style::default().fg(dot_color)));
        spans.push(Span::styled(" ", Style::default()));
        spans.push(Span::styled(
            option.clone(),
            Style::default().fg(option_color),
        ));
        if i + 1 < state.options.len() {
            spans.push(Span::styled("   ", Style::default()));
        }

        option_areas.push(Rect::new(x, area.y, width, 1));
        x += width + 3;
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let full_width = (x.saturating_sub(3).saturating_sub(area.x)).min(area.width);
    RadioGroupLayout {
        option_areas,
        full_area: Rect::new(area.x, area.y, full_width, 1),
    }
}
