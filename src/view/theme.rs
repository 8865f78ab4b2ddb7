//! Color themes for the shell

use ratatui::style::Color;

/// Colors used across the shell's views
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Base background
    pub base_bg: Color,
    /// Base text
    pub base_fg: Color,
    /// Section and page titles
    pub title_fg: Color,
    /// Labels, placeholders, disabled text
    pub muted_fg: Color,
    /// Active values, focused markers, active nav entry
    pub accent_fg: Color,
    /// Focus and hover bars, dropdown highlight
    pub selection_bg: Color,
    /// Separators, brackets, panel borders
    pub border_fg: Color,
    /// Queue panel and open menu background
    pub panel_bg: Color,
    /// Failure text
    pub error_fg: Color,
    /// Completed and success text
    pub success_fg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            base_bg: Color::Rgb(0x12, 0x12, 0x12),
            base_fg: Color::Rgb(0xe0, 0xe0, 0xe0),
            title_fg: Color::Rgb(0xff, 0xff, 0xff),
            muted_fg: Color::Rgb(0xaa, 0xaa, 0xaa),
            accent_fg: Color::Rgb(0x7c, 0x4d, 0xff),
            selection_bg: Color::Rgb(0x3d, 0x3d, 0x3d),
            border_fg: Color::Rgb(0x3d, 0x3d, 0x3d),
            panel_bg: Color::Rgb(0x25, 0x25, 0x25),
            error_fg: Color::Rgb(0xe5, 0x73, 0x73),
            success_fg: Color::Rgb(0x00, 0xe6, 0x76),
        }
    }

    pub fn light() -> Self {
        Self {
            base_bg: Color::Rgb(0xfa, 0xfa, 0xfa),
            base_fg: Color::Rgb(0x21, 0x21, 0x21),
            title_fg: Color::Rgb(0x00, 0x00, 0x00),
            muted_fg: Color::Rgb(0x75, 0x75, 0x75),
            accent_fg: Color::Rgb(0x62, 0x00, 0xea),
            selection_bg: Color::Rgb(0xd8, 0xd8, 0xd8),
            border_fg: Color::Rgb(0xcc, 0xcc, 0xcc),
            panel_bg: Color::Rgb(0xee, 0xee, 0xee),
            error_fg: Color::Rgb(0xd3, 0x2f, 0x2f),
            success_fg: Color::Rgb(0x28, 0xa7, 0x45),
        }
    }

    /// Resolve a theme by name, defaulting to dark
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            other => {
                tracing::debug!("Unknown theme {:?}, using dark", other);
                Self::dark()
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
