//! Page templates and live page state
//!
//! A page starts life as a JSON fragment ([`PageTemplate`]) fetched through
//! a [`crate::services::fragments::FragmentSource`]. Instantiating the
//! template produces a [`PageView`]: live control state, a focus cursor and
//! a queue of control events for the update loop to drain.
//!
//! Select controls are two-layered. The [`SelectModel`] is the durable,
//! declarative side parsed from the fragment; the [`DropdownState`] widget
//! is bound to it later by the virtualizer. Until a widget is bound the
//! select renders as a plain `Label: value` line.

use serde::{Deserialize, Serialize};

use crate::config::SettingValue;
use crate::view::controls::{
    render_button, render_dropdown_aligned, render_radio_group, render_text_input_aligned,
    render_toggle, ButtonColors, ButtonLayout, ButtonState, DropdownColors, DropdownLayout,
    DropdownState, FocusState, RadioGroupColors, RadioGroupLayout, RadioGroupState,
    TextInputColors, TextInputLayout, TextInputState, ToggleColors, ToggleLayout, ToggleState,
};
use crate::view::theme::Theme;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// One option of a select or radio control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSpec {
    pub label: String,
    /// Wire value; defaults to the label
    #[serde(default)]
    pub value: Option<String>,
}

impl OptionSpec {
    pub fn wire_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.label)
    }
}

/// A control as described by a page fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlSpec {
    Select {
        id: String,
        label: String,
        options: Vec<OptionSpec>,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        disabled: bool,
    },
    Checkbox {
        id: String,
        label: String,
        #[serde(default)]
        checked: bool,
    },
    Radio {
        id: String,
        label: String,
        options: Vec<OptionSpec>,
        #[serde(default)]
        value: Option<String>,
    },
    Input {
        id: String,
        label: String,
        #[serde(default)]
        placeholder: String,
    },
    Button {
        id: String,
        label: String,
    },
    Label {
        text: String,
    },
}

/// A titled group of controls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    pub controls: Vec<ControlSpec>,
}

/// A parsed page fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTemplate {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

impl PageTemplate {
    /// Parse a fragment's JSON text
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Declarative state of a select control
///
/// This is the side the settings code and page hooks talk to. Every
/// mutation bumps `revision`; the virtualizer uses the revision to know
/// when a bound widget is stale.
#[derive(Debug, Clone)]
pub struct SelectModel {
    pub id: String,
    pub label: String,
    pub options: Vec<String>,
    pub values: Vec<String>,
    pub value: String,
    pub enabled: bool,
    pub revision: u64,
}

impl SelectModel {
    fn from_spec(
        id: String,
        label: String,
        options: Vec<OptionSpec>,
        value: Option<String>,
        disabled: bool,
    ) -> Self {
        let labels: Vec<String> = options.iter().map(|o| o.label.clone()).collect();
        let values: Vec<String> = options.iter().map(|o| o.wire_value().to_string()).collect();
        let value = value
            .filter(|v| values.iter().any(|w| w == v))
            .or_else(|| values.first().cloned())
            .unwrap_or_default();
        Self {
            id,
            label,
            options: labels,
            values,
            value,
            enabled: !disabled,
            revision: 0,
        }
    }

    /// Set the current wire value
    ///
    /// Unknown values are ignored. Returns true when the model changed.
    pub fn set_value(&mut self, value: &str) -> bool {
        if self.value != value && self.values.iter().any(|v| v == value) {
            self.value = value.to_string();
            self.revision += 1;
            true
        } else {
            false
        }
    }

    /// Enable or disable the control
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.revision += 1;
        }
    }

    /// Display label of the current value
    pub fn value_label(&self) -> &str {
        self.values
            .iter()
            .position(|v| *v == self.value)
            .and_then(|i| self.options.get(i))
            .map(|s| s.as_str())
            .unwrap_or(&self.value)
    }
}

/// A live control on a page
#[derive(Debug, Clone)]
pub enum PageControl {
    Select {
        model: SelectModel,
        /// Bound by the virtualizer; None until then
        widget: Option<DropdownState>,
        /// Model revision last copied into the widget
        synced_revision: u64,
    },
    Checkbox {
        id: String,
        state: ToggleState,
        disabled: bool,
    },
    Radio {
        id: String,
        state: RadioGroupState,
    },
    Input {
        id: String,
        state: TextInputState,
        disabled: bool,
    },
    Button {
        id: String,
        state: ButtonState,
    },
    Label {
        text: String,
    },
}

impl PageControl {
    fn from_spec(spec: &ControlSpec) -> Self {
        match spec {
            ControlSpec::Select {
                id,
                label,
                options,
                value,
                disabled,
            } => PageControl::Select {
                model: SelectModel::from_spec(
                    id.clone(),
                    label.clone(),
                    options.clone(),
                    value.clone(),
                    *disabled,
                ),
                widget: None,
                synced_revision: 0,
            },
            ControlSpec::Checkbox { id, label, checked } => PageControl::Checkbox {
                id: id.clone(),
                state: ToggleState::new(*checked, label.clone()),
                disabled: false,
            },
            ControlSpec::Radio {
                id,
                label,
                options,
                value,
            } => {
                let labels: Vec<String> = options.iter().map(|o| o.label.clone()).collect();
                let values: Vec<String> =
                    options.iter().map(|o| o.wire_value().to_string()).collect();
                let mut state = RadioGroupState::new(labels, values, label.clone());
                if let Some(v) = value {
                    state.set_value(v);
                }
                PageControl::Radio {
                    id: id.clone(),
                    state,
                }
            }
            ControlSpec::Input {
                id,
                label,
                placeholder,
            } => PageControl::Input {
                id: id.clone(),
                state: TextInputState::new(label.clone()).with_placeholder(placeholder.clone()),
                disabled: false,
            },
            ControlSpec::Button { id, label } => PageControl::Button {
                id: id.clone(),
                state: ButtonState::new(label.clone()),
            },
            ControlSpec::Label { text } => PageControl::Label { text: text.clone() },
        }
    }

    /// The control's id; labels have none
    pub fn id(&self) -> Option<&str> {
        match self {
            PageControl::Select { model, .. } => Some(&model.id),
            PageControl::Checkbox { id, .. } => Some(id),
            PageControl::Radio { id, .. } => Some(id),
            PageControl::Input { id, .. } => Some(id),
            PageControl::Button { id, .. } => Some(id),
            PageControl::Label { .. } => None,
        }
    }

    /// Whether the control can take focus
    pub fn focusable(&self) -> bool {
        match self {
            PageControl::Select { model, .. } => model.enabled,
            PageControl::Checkbox { disabled, .. } => !disabled,
            PageControl::Radio { .. } => true,
            PageControl::Input { disabled, .. } => !disabled,
            PageControl::Button { .. } => true,
            PageControl::Label { .. } => false,
        }
    }

    /// Rows this control occupies when rendered
    pub fn height(&self) -> u16 {
        match self {
            PageControl::Select { widget, .. } => match widget {
                Some(w) if w.open => 1 + w.options.len().min(8) as u16,
                _ => 1,
            },
            _ => 1,
        }
    }
}

/// Events produced by user interaction with controls
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// A value-bearing control changed through user interaction
    Changed { id: String, value: SettingValue },
    /// A button was pressed
    Activated { id: String },
    /// Text was submitted from an input
    Submitted { id: String, text: String },
}

/// A live section of a page
#[derive(Debug, Clone)]
pub struct Section {
    pub id: Option<String>,
    pub title: Option<String>,
    pub hidden: bool,
    pub controls: Vec<PageControl>,
}

/// A fully instantiated page
#[derive(Debug, Clone)]
pub struct PageView {
    pub name: String,
    pub title: String,
    pub sections: Vec<Section>,
    /// Focused control id
    pub focused: Option<String>,
    /// Hovered control id (from mouse movement)
    pub hovered: Option<String>,
    /// First visible row when content overflows
    pub scroll: u16,
    events: Vec<ControlEvent>,
}

impl PageView {
    /// Instantiate a template; widgets are left unbound
    pub fn from_template(name: impl Into<String>, template: &PageTemplate) -> Self {
        let sections = template
            .sections
            .iter()
            .map(|s| Section {
                id: s.id.clone(),
                title: s.title.clone(),
                hidden: s.hidden,
                controls: s.controls.iter().map(PageControl::from_spec).collect(),
            })
            .collect();
        Self {
            name: name.into(),
            title: template.title.clone(),
            sections,
            focused: None,
            hovered: None,
            scroll: 0,
            events: Vec::new(),
        }
    }

    /// Iterate controls in visible sections
    pub fn visible_controls(&self) -> impl Iterator<Item = &PageControl> {
        self.sections
            .iter()
            .filter(|s| !s.hidden)
            .flat_map(|s| s.controls.iter())
    }

    /// Ids of controls that can take focus, in page order
    pub fn focusables(&self) -> Vec<String> {
        self.visible_controls()
            .filter(|c| c.focusable())
            .filter_map(|c| c.id().map(str::to_string))
            .collect()
    }

    /// Look up a control by id
    pub fn control(&self, id: &str) -> Option<&PageControl> {
        self.sections
            .iter()
            .flat_map(|s| s.controls.iter())
            .find(|c| c.id() == Some(id))
    }

    /// Look up a control by id, mutably
    pub fn control_mut(&mut self, id: &str) -> Option<&mut PageControl> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.controls.iter_mut())
            .find(|c| c.id() == Some(id))
    }

    /// Look up a section by id
    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections
            .iter_mut()
            .find(|s| s.id.as_deref() == Some(id))
    }

    /// Move focus to the first focusable control
    pub fn focus_first(&mut self) {
        self.focused = self.focusables().first().cloned();
    }

    /// Move focus forward
    pub fn focus_next(&mut self) {
        self.focus_step(1);
    }

    /// Move focus backward
    pub fn focus_prev(&mut self) {
        self.focus_step(-1);
    }

    fn focus_step(&mut self, dir: isize) {
        let order = self.focusables();
        if order.is_empty() {
            self.focused = None;
            return;
        }
        let current = self
            .focused
            .as_ref()
            .and_then(|id| order.iter().position(|o| o == id));
        let next = match current {
            Some(i) => {
                let len = order.len() as isize;
                ((i as isize + dir).rem_euclid(len)) as usize
            }
            None => {
                if dir >= 0 {
                    0
                } else {
                    order.len() - 1
                }
            }
        };
        self.focused = Some(order[next].clone());
    }

    /// The id of the currently open select, if any
    pub fn open_select(&self) -> Option<String> {
        self.visible_controls()
            .find_map(|c| match c {
                PageControl::Select { model, widget, .. } => match widget {
                    Some(w) if w.open => Some(model.id.clone()),
                    _ => None,
                },
                _ => None,
            })
    }

    /// Height of every rendered row at the current state, in lines.
    /// Matches the row layout [`render_page`] produces.
    pub fn content_height(&self) -> u16 {
        let mut height = 2u16;
        for section in &self.sections {
            if section.hidden {
                continue;
            }
            if section.title.is_some() {
                height += 1;
            }
            for control in &section.controls {
                height += control.height();
            }
            height += 1;
        }
        height
    }

    /// Enable or disable a control by id
    pub fn set_enabled(&mut self, id: &str, enabled: bool) {
        match self.control_mut(id) {
            Some(PageControl::Select { model, .. }) => model.set_enabled(enabled),
            Some(PageControl::Checkbox { disabled, .. }) => *disabled = !enabled,
            Some(PageControl::Input { disabled, .. }) => *disabled = !enabled,
            Some(_) => {
                tracing::debug!("set_enabled on non-disableable control {:?}", id);
            }
            None => {
                tracing::debug!("set_enabled on unknown control {:?}", id);
            }
        }
        if !enabled && self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
    }

    /// Current wire value of a select
    pub fn select_value(&self, id: &str) -> Option<&str> {
        match self.control(id) {
            Some(PageControl::Select { model, .. }) => Some(model.value.as_str()),
            _ => None,
        }
    }

    /// Current checked state of a checkbox
    pub fn checkbox_checked(&self, id: &str) -> Option<bool> {
        match self.control(id) {
            Some(PageControl::Checkbox { state, .. }) => Some(state.checked),
            _ => None,
        }
    }

    /// Current text of an input
    pub fn input_value(&self, id: &str) -> Option<&str> {
        match self.control(id) {
            Some(PageControl::Input { state, .. }) => Some(state.value.as_str()),
            _ => None,
        }
    }

    /// Current wire value of a radio group
    pub fn radio_value(&self, id: &str) -> Option<&str> {
        match self.control(id) {
            Some(PageControl::Radio { state, .. }) => state.selected_value(),
            _ => None,
        }
    }

    /// Queue a control event for the update loop
    pub fn push_event(&mut self, event: ControlEvent) {
        self.events.push(event);
    }

    /// Take all queued control events
    pub fn drain_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }

    /// Copy focus and hover into each control's widget state
    fn sync_focus_states(&mut self) {
        let focused = self.focused.clone();
        let hovered = self.hovered.clone();
        for section in &mut self.sections {
            for control in &mut section.controls {
                let id = control.id().map(str::to_string);
                let fs = |disabled: bool| {
                    if disabled {
                        FocusState::Disabled
                    } else if id.is_some() && id == focused {
                        FocusState::Focused
                    } else if id.is_some() && id == hovered {
                        FocusState::Hovered
                    } else {
                        FocusState::Normal
                    }
                };
                match control {
                    PageControl::Select { model, widget, .. } => {
                        if let Some(w) = widget {
                            w.focus = fs(!model.enabled);
                        }
                    }
                    PageControl::Checkbox {
                        state, disabled, ..
                    } => {
                        state.focus = fs(*disabled);
                    }
                    PageControl::Radio { state, .. } => {
                        state.focus = fs(false);
                    }
                    PageControl::Input {
                        state, disabled, ..
                    } => {
                        state.focus = fs(*disabled);
                    }
                    PageControl::Button { state, .. } => {
                        state.focus = fs(false);
                    }
                    PageControl::Label { .. } => {}
                }
            }
        }
    }
}

/// Hit areas of one rendered control
#[derive(Debug, Clone)]
pub enum ControlHit {
    Select(DropdownLayout),
    Checkbox(ToggleLayout),
    Radio(RadioGroupLayout),
    Input(TextInputLayout),
    Button(ButtonLayout),
}

/// Layout of a rendered page, for mouse hit testing
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub hits: Vec<(String, ControlHit)>,
}

impl PageLayout {
    /// Find the control and hit record at a point
    pub fn hit_at(&self, x: u16, y: u16) -> Option<(&str, &ControlHit)> {
        // Walk in reverse so overlays (open select menus) win
        for (id, hit) in self.hits.iter().rev() {
            let matched = match hit {
                ControlHit::Select(l) => l.is_button(x, y) || l.option_at(x, y).is_some(),
                ControlHit::Checkbox(l) => l.contains(x, y),
                ControlHit::Radio(l) => l.option_at(x, y).is_some(),
                ControlHit::Input(l) => l.is_input(x, y),
                ControlHit::Button(l) => l.contains(x, y),
            };
            if matched {
                return Some((id.as_str(), hit));
            }
        }
        None
    }
}

/// Render a page into the given area
pub fn render_page(
    frame: &mut Frame,
    area: Rect,
    view: &mut PageView,
    theme: &Theme,
) -> PageLayout {
    view.sync_focus_states();

    let mut layout = PageLayout::default();
    if area.height < 2 || area.width < 10 {
        return layout;
    }

    // Virtual rows: title, blank, then sections
    let mut rows: Vec<RowKind> = vec![RowKind::Title, RowKind::Blank];
    for (si, section) in view.sections.iter().enumerate() {
        if section.hidden {
            continue;
        }
        if section.title.is_some() {
            rows.push(RowKind::SectionTitle(si));
        }
        for (ci, control) in section.controls.iter().enumerate() {
            rows.push(RowKind::Control(si, ci, control.height()));
        }
        rows.push(RowKind::Blank);
    }

    // Clamp the scroll range, then keep the focused control on screen
    let total_height: u16 = rows.iter().map(|r| r.height()).sum();
    if total_height <= area.height {
        view.scroll = 0;
    } else if view.scroll > total_height - area.height {
        view.scroll = total_height - area.height;
    }
    if total_height > area.height {
        if let Some(focused) = view.focused.clone() {
            let mut y = 0u16;
            for row in &rows {
                let h = row.height();
                if let RowKind::Control(si, ci, _) = row {
                    let is_focused =
                        view.sections[*si].controls[*ci].id() == Some(focused.as_str());
                    if is_focused {
                        if y < view.scroll {
                            view.scroll = y;
                        } else if y + h > view.scroll + area.height {
                            view.scroll = y + h - area.height;
                        }
                        break;
                    }
                }
                y += h;
            }
        }
    }

    let mut y = 0u16;
    for row in &rows {
        let h = row.height();
        let on_screen = y + h > view.scroll && y < view.scroll + area.height;
        if on_screen {
            let screen_y = area.y + y - view.scroll;
            let row_area = Rect::new(area.x, screen_y, area.width, h.min(area.height));
            match row {
                RowKind::Title => {
                    let line = Line::from(Span::styled(
                        view.title.clone(),
                        Style::default().fg(theme.title_fg),
                    ));
                    frame.render_widget(Paragraph::new(line), row_area);
                }
                RowKind::SectionTitle(si) => {
                    if let Some(title) = &view.sections[*si].title {
                        let line = Line::from(Span::styled(
                            format!("─ {} ─", title),
                            Style::default().fg(theme.muted_fg),
                        ));
                        frame.render_widget(Paragraph::new(line), row_area);
                    }
                }
                RowKind::Control(si, ci, _) => {
                    let indent = Rect::new(
                        row_area.x + 2,
                        row_area.y,
                        row_area.width.saturating_sub(2),
                        row_area.height,
                    );
                    let control = &view.sections[*si].controls[*ci];
                    if let Some((id, hit)) = render_control(frame, indent, control, theme) {
                        layout.hits.push((id, hit));
                    }
                }
                RowKind::Blank => {}
            }
        }
        y += h;
        if y >= view.scroll + area.height {
            break;
        }
    }

    layout
}

enum RowKind {
    Title,
    SectionTitle(usize),
    Control(usize, usize, u16),
    Blank,
}

impl RowKind {
    fn height(&self) -> u16 {
        match self {
            RowKind::Control(_, _, h) => *h,
            _ => 1,
        }
    }
}

fn render_control(
    frame: &mut Frame,
    area: Rect,
    control: &PageControl,
    theme: &Theme,
) -> Option<(String, ControlHit)> {
    match control {
        PageControl::Select {
            model,
            widget: Some(widget),
            ..
        } => {
            let colors = DropdownColors::from_theme(theme);
            let layout = render_dropdown_aligned(frame, area, widget, &colors, None);
            Some((model.id.clone(), ControlHit::Select(layout)))
        }
        PageControl::Select { model, .. } => {
            // Unbound select renders as a plain value line
            let fg = if model.enabled {
                theme.base_fg
            } else {
                theme.muted_fg
            };
            let line = Line::from(vec![
                Span::styled(
                    format!("{}: ", model.label),
                    Style::default().fg(theme.base_fg),
                ),
                Span::styled(model.value_label().to_string(), Style::default().fg(fg)),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            None
        }
        PageControl::Checkbox { id, state, .. } => {
            let colors = ToggleColors::from_theme(theme);
            let layout = render_toggle(frame, area, state, &colors);
            Some((id.clone(), ControlHit::Checkbox(layout)))
        }
        PageControl::Radio { id, state } => {
            let colors = RadioGroupColors::from_theme(theme);
            let layout = render_radio_group(frame, area, state, &colors);
            Some((id.clone(), ControlHit::Radio(layout)))
        }
        PageControl::Input { id, state, .. } => {
            let colors = TextInputColors::from_theme(theme);
            let field_width = area.width.saturating_sub(state.label.len() as u16 + 6);
            let layout =
                render_text_input_aligned(frame, area, state, &colors, field_width, None);
            Some((id.clone(), ControlHit::Input(layout)))
        }
        PageControl::Button { id, state } => {
            let colors = ButtonColors::from_theme(theme);
            let layout = render_button(frame, area, state, &colors);
            Some((id.clone(), ControlHit::Button(layout)))
        }
        PageControl::Label { text } => {
            let line = Line::from(Span::styled(
                text.clone(),
                Style::default().fg(theme.muted_fg),
            ));
            frame.render_widget(Paragraph::new(line), area);
            None
        }
    }
}
