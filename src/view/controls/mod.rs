//! Reusable form controls for the shell's pages
//!
//! Pages are built from a small set of interactive controls that mirror
//! the form elements of the page fragments: selects, checkboxes, radio
//! groups, text entry and action buttons.
//!
//! ## Pattern
//! Each control follows a consistent pattern:
//! - `*State` struct containing the control's data
//! - `*Colors` struct for theming
//! - `render_*` function that renders to a frame and returns hit areas

pub mod button;
pub mod dropdown;
pub mod radio_group;
pub mod text_input;
pub mod toggle;

pub use button::{render_button, ButtonColors, ButtonLayout, ButtonState};
pub use dropdown::{
    render_dropdown, render_dropdown_aligned, DropdownColors, DropdownLayout, DropdownState,
};
pub use radio_group::{render_radio_group, RadioGroupColors, RadioGroupLayout, RadioGroupState};
pub use text_input::{
    render_text_input, render_text_input_aligned, TextInputColors, TextInputLayout, TextInputState,
};
pub use toggle::{render_toggle, ToggleColors, ToggleLayout, ToggleState};

/// Focus state for controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Normal,
    Focused,
    Hovered,
    Disabled,
}

impl FocusState {
    /// Whether the control accepts interaction
    pub fn interactive(&self) -> bool {
        *self != FocusState::Disabled
    }
}
