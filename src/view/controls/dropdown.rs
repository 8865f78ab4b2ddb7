//! Dropdown selection control
//!
//! Renders as: `Label: [Selected Option ▼]`, with an option list below
//! while open. Committed selection and keyboard highlight are tracked
//! separately: moving the highlight never changes the committed value,
//! only an explicit select does.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::FocusState;

/// State for a dropdown control
#[derive(Debug, Clone)]
pub struct DropdownState {
    /// Committed selection, shown in the head
    pub selected: usize,
    /// Keyboard cursor while the list is open
    pub highlighted: usize,
    /// Display names for options (shown in UI)
    pub options: Vec<String>,
    /// Wire values for options (stored in the settings map)
    /// If empty, options double as values
    pub values: Vec<String>,
    /// Label displayed before the dropdown
    pub label: String,
    /// Whether the option list is currently open
    pub open: bool,
    /// Focus state
    pub focus: FocusState,
}

impl DropdownState {
    /// Create a new dropdown state where display names equal values
    pub fn new(options: Vec<String>, label: impl Into<String>) -> Self {
        Self {
            selected: 0,
            highlighted: 0,
            options,
            values: Vec::new(),
            label: label.into(),
            open: false,
            focus: FocusState::Normal,
        }
    }

    /// Create a dropdown with separate display names and values
    pub fn with_values(
        options: Vec<String>,
        values: Vec<String>,
        label: impl Into<String>,
    ) -> Self {
        debug_assert_eq!(options.len(), values.len());
        Self {
            selected: 0,
            highlighted: 0,
            options,
            values,
            label: label.into(),
            open: false,
            focus: FocusState::Normal,
        }
    }

    /// Set the initially selected index
    pub fn with_selected(mut self, index: usize) -> Self {
        if index < self.options.len() {
            self.selected = index;
            self.highlighted = index;
        }
        self
    }

    /// Set the focus state
    pub fn with_focus(mut self, focus: FocusState) -> Self {
        self.focus = focus;
        self
    }

    /// Get the committed value (for storing in the settings map)
    pub fn selected_value(&self) -> Option<&str> {
        if self.values.is_empty() {
            self.options.get(self.selected).map(|s| s.as_str())
        } else {
            self.values.get(self.selected).map(|s| s.as_str())
        }
    }

    /// Get the committed display name (for UI)
    pub fn selected_option(&self) -> Option<&str> {
        self.options.get(self.selected).map(|s| s.as_str())
    }

    /// Find the index of a value
    pub fn index_of_value(&self, value: &str) -> Option<usize> {
        if self.values.is_empty() {
            self.options.iter().position(|o| o == value)
        } else {
            self.values.iter().position(|v| v == value)
        }
    }

    /// Open the list with the highlight on the committed selection
    pub fn open(&mut self) {
        if self.focus.interactive() {
            self.highlighted = self.selected;
            self.open = true;
        }
    }

    /// Close the list, leaving the committed selection untouched
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Toggle the list open/closed
    pub fn toggle_open(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Move the highlight to the next option
    pub fn highlight_next(&mut self) {
        if self.focus.interactive() && !self.options.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.options.len();
        }
    }

    /// Move the highlight to the previous option
    pub fn highlight_prev(&mut self) {
        if self.focus.interactive() && !self.options.is_empty() {
            self.highlighted = if self.highlighted == 0 {
                self.options.len() - 1
            } else {
                self.highlighted - 1
            };
        }
    }

    /// Commit an option by index and close the list
    ///
    /// Returns true if the index was valid and the control interactive.
    pub fn select(&mut self, index: usize) -> bool {
        if self.focus.interactive() && index < self.options.len() {
            self.selected = index;
            self.highlighted = index;
            self.open = false;
            true
        } else {
            false
        }
    }

    /// Commit the highlighted option and close the list
    pub fn select_highlighted(&mut self) -> bool {
        self.select(self.highlighted)
    }

    /// Set the committed selection by wire value, without opening or closing
    ///
    /// Used when applying fetched settings. Returns false when the value
    /// is not among the options.
    pub fn set_value(&mut self, value: &str) -> bool {
        match self.index_of_value(value) {
            Some(index) => {
                self.selected = index;
                self.highlighted = index;
                true
            }
            None => false,
        }
    }
}

/// Colors for the dropdown control
#[derive(Debug, Clone, Copy)]
pub struct DropdownColors {
    /// Label color
    pub label: Color,
    /// Committed option text color
    pub selected: Color,
    /// Border/bracket color
    pub border: Color,
    /// Arrow indicator color
    pub arrow: Color,
    /// Option text in the open list
    pub option: Color,
    /// Open list background
    pub menu_bg: Color,
    /// Highlighted option background
    pub highlight_bg: Color,
    /// Focused highlight color
    pub focused: Color,
    /// Disabled color
    pub disabled: Color,
}

impl Default for DropdownColors {
    fn default() -> Self {
        Self {
            label: Color::White,
            selected: Color::Cyan,
            border: Color::Gray,
            arrow: Color::DarkGray,
            option: Color::White,
            menu_bg: Color::Black,
            highlight_bg: Color::DarkGray,
            focused: Color::Cyan,
            disabled: Color::DarkGray,
        }
    }
}

impl DropdownColors {
    /// Create colors from theme
    pub fn from_theme(theme: &crate::view::theme::Theme) -> Self {
        Self {
            label: theme.base_fg,
            selected: theme.accent_fg,
            border: theme.border_fg,
            arrow: theme.muted_fg,
            option: theme.base_fg,
            menu_bg: theme.panel_bg,
            highlight_bg: theme.selection_bg,
            focused: theme.accent_fg,
            disabled: theme.muted_fg,
        }
    }
}

/// Layout information returned after rendering for hit testing
#[derive(Debug, Clone)]
pub struct DropdownLayout {
    /// The main dropdown button area
    pub button_area: Rect,
    /// Areas for each option when open (empty if closed)
    pub option_areas: Vec<Rect>,
    /// The full control area
    pub full_area: Rect,
}

impl DropdownLayout {
    /// Check if a point is on the dropdown button
    pub fn is_button(&self, x: u16, y: u16) -> bool {
        x >= self.button_area.x
            && x < self.button_area.x + self.button_area.width
            && y >= self.button_area.y
            && y < self.button_area.y + self.button_area.height
    }

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

/// Render a dropdown control
pub fn render_dropdown(
    frame: &mut Frame,
    area: Rect,
    state: &DropdownState,
    colors: &DropdownColors,
) -> DropdownLayout {
    render_dropdown_aligned(frame, area, state, colors, None)
}

/// Render a dropdown control with optional label width alignment
///
/// When the list is open the caller must provide enough area height for
/// the options; rows below the control are expected to have been pushed
/// down by the page layout.
pub fn render_dropdown_aligned(
    frame: &mut Frame,
    area: Rect,
    state: &DropdownState,
    colors: &DropdownColors,
    label_width: Option<u16>,
) -> DropdownLayout {
    let empty_layout = DropdownLayout {
        button_area: Rect::default(),
        option_areas: Vec::new(),
        full_area: area,
    };

    if area.height == 0 || area.width < 10 {
        return empty_layout;
    }

    let (label_color, selected_color, border_color, arrow_color) = match state.focus {
        FocusState::Normal => (colors.label, colors.selected, colors.border, colors.arrow),
        FocusState::Focused | FocusState::Hovered => (
            colors.focused,
            colors.selected,
            colors.focused,
            colors.focused,
        ),
        FocusState::Disabled => (
            colors.disabled,
            colors.disabled,
            colors.disabled,
            colors.disabled,
        ),
    };

    let selected_text = state.selected_option().unwrap_or("");
    let max_option_len = state.options.iter().map(|s| s.len()).max().unwrap_or(10);
    let display_width = max_option_len.max(selected_text.len()).min(24);
    let padded = format!("{:width$}", selected_text, width = display_width);

    let arrow = if state.open { "▲" } else { "▼" };

    let actual_label_width = label_width.unwrap_or(state.label.len() as u16);
    let padded_label = format!("{:width$}", state.label, width = actual_label_width as usize);

    let line = Line::from(vec![
        Span::styled(padded_label, Style::default().fg(label_color)),
        Span::styled(": ", Style::default().fg(label_color)),
        Span::styled("[", Style::default().fg(border_color)),
        Span::styled(padded, Style::default().fg(selected_color)),
        Span::styled(" ", Style::default()),
        Span::styled(arrow, Style::default().fg(arrow_color)),
        Span::styled("]", Style::default().fg(border_color)),
    ]);

    frame.render_widget(Paragraph::new(line), area);

    let final_label_width = actual_label_width + 2; // label + ": "
    let button_start = area.x + final_label_width;
    let button_width = display_width as u16 + 4; // "[" + text + " " + arrow + "]"

    let mut option_areas = Vec::new();

    if state.open && area.height > 1 {
        let menu_y = area.y + 1;
        let available_height = area.height.saturating_sub(1) as usize;
        let options_to_show = state.options.len().min(available_height);

        for (i, option) in state.options.iter().take(options_to_show).enumerate() {
            let option_area = Rect::new(button_start, menu_y + i as u16, button_width, 1);
            option_areas.push(option_area);

            let is_committed = i == state.selected;
            let is_highlighted = i == state.highlighted;

            let bg = if is_highlighted {
                colors.highlight_bg
            } else {
                colors.menu_bg
            };
            let fg = if is_committed {
                colors.selected
            } else {
                colors.option
            };
            let marker = if is_committed { "•" } else { " " };

            let padded_option = format!("{} {:width$} ", marker, option, width = display_width);
            let option_line = Line::from(vec![Span::styled(
                padded_option,
                Style::default().fg(fg).bg(bg),
            )]);

            frame.render_widget(Paragraph::new(option_line), option_area);
        }
    }

    DropdownLayout {
        button_area: Rect::new(button_start, area.y, button_width, 1),
        option_areas,
        full_area: Rect::new(area.x, area.y, button_start - area.x + button_width, 1),
    }
}
