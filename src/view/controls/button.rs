//! Clickable action button
//!
//! Renders as: `[ Label ]`

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::FocusState;

/// State for a button control
#[derive(Debug, Clone)]
pub struct ButtonState {
    /// Button label
    pub label: String,
    /// Focus state
    pub focus: FocusState,
}

impl ButtonState {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            focus: FocusState::Normal,
        }
    }

    /// Set the focus state
    pub fn with_focus(mut self, focus: FocusState) -> Self {
        self.focus = focus;
        self
    }

    /// Replace the label, used for buttons whose text reflects state
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

/// Colors for the button control
#[derive(Debug, Clone, Copy)]
pub struct ButtonColors {
    /// Label text color
    pub label: Color,
    /// Bracket color
    pub bracket: Color,
    /// Background when focused or hovered
    pub active_bg: Color,
    /// Focused text color
    pub focused: Color,
    /// Disabled color
    pub disabled: Color,
}

impl Default for ButtonColors {
    fn default() -> Self {
        Self {
            label: Color::White,
            bracket: Color::Gray,
            active_bg: Color::DarkGray,
            focused: Color::Cyan,
            disabled: Color::DarkGray,
        }
    }
}

impl ButtonColors {
    /// Create colors from theme
    pub fn from_theme(theme: &crate::view::theme::Theme) -> Self {
        Self {
            label: theme.base_fg,
            bracket: theme.border_fg,
            active_bg: theme.selection_bg,
            focused: theme.accent_fg,
            disabled: theme.muted_fg,
        }
    }
}

/// Layout information returned after rendering for hit testing
#[derive(Debug, Clone, Copy)]
pub struct ButtonLayout {
    /// The full clickable area
    pub area: Rect,
}

impl ButtonLayout {
    /// Check if a point is within the button
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.area.x
            && x < self.area.x + self.area.width
            && y >= self.area.y
            && y < self.area.y + self.area.height
    }
}

/// Render a button control
pub fn render_button(
    frame: &mut Frame,
    area: Rect,
    state: &ButtonState,
    colors: &ButtonColors,
) -> ButtonLayout {
    if area.height == 0 || area.width < 4 {
        return ButtonLayout {
            area: Rect::default(),
        };
    }

    let (label_color, bracket_color, bg) = match state.focus {
        FocusState::Normal => (colors.label, colors.bracket, Color::Reset),
        FocusState::Focused | FocusState::Hovered => {
            (colors.focused, colors.focused, colors.active_bg)
        }
        FocusState::Disabled => (colors.disabled, colors.disabled, Color::Reset),
    };

    let line = Line::from(vec![
        Span::styled("[ ", Style::default().fg(bracket_color).bg(bg)),
        Span::styled(
            state.label.clone(),
            Style::default().fg(label_color).bg(bg),
        ),
        Span::styled(" ]", Style::default().fg(bracket_color).bg(bg)),
    ]);

    frame.render_widget(Paragraph::new(line), area);

    let width = (state.label.len() as u16 + 4).min(area.width);
    ButtonLayout {
        area: Rect::new(area.x, area.y, width, 1),
    }
}
