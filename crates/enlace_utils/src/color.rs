use colored::{Color, Colorize};

// enlace palette
const BRAND: Color = Color::TrueColor {
    r: 31,
    g: 122,
    b: 140,
};
const SUCCESS: Color = Color::TrueColor {
    r: 46,
    g: 160,
    b: 67,
};
const ALERT: Color = Color::TrueColor { r: 214, g: 40, b: 40 };

/// Colors for startup messages and error context
pub struct LogColors;

impl LogColors {
    /// Brand color, used for startup failure context
    pub fn brand(text: &str) -> String {
        text.color(BRAND).to_string()
    }

    pub fn green(text: &str) -> String {
        text.color(SUCCESS).to_string()
    }

    pub fn alert(text: &str) -> String {
        text.color(ALERT).bold().to_string()
    }
}
