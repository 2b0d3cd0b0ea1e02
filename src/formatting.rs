use yansi::Paint;

use crate::error::ToolOutcome;

/// Color palette for consistent theming
pub struct ColorPalette {
    pub success: (u8, u8, u8), // Confirmations
    pub failure: (u8, u8, u8), // Errors
    pub muted: (u8, u8, u8),   // Paths, secondary text
}

impl ColorPalette {
    pub const CATPPUCCIN: Self = Self {
        success: (166, 227, 161), // Green
        failure: (243, 139, 168), // Pink
        muted: (108, 112, 134),   // Gray
    };
}

/// Formatting context for CLI output
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self { use_color, palette: ColorPalette::CATPPUCCIN }
    }

    pub fn from_env() -> Self {
        let use_color = std::env::var("NO_COLOR").is_err();
        Self::new(use_color)
    }

    pub fn format_outcome(&self, outcome: &ToolOutcome) -> String {
        if !self.use_color {
            return outcome.message.clone();
        }
        let (r, g, b) = if outcome.success {
            self.palette.success
        } else {
            self.palette.failure
        };
        Paint::rgb(&outcome.message, r, g, b).bold().to_string()
    }

    pub fn format_muted(&self, text: &str) -> String {
        if self.use_color {
            let (r, g, b) = self.palette.muted;
            Paint::rgb(text, r, g, b).to_string()
        } else {
            text.to_string()
        }
    }
}
