//! The fixed LCARS palette and spacing constants.

use display::Color;
use lcars_shared::Severity;

pub const ORANGE: Color = Color::rgb(255, 157, 0);
pub const PURPLE_LIGHT: Color = Color::rgb(204, 153, 255);
pub const BLUE: Color = Color::rgb(155, 162, 255);
pub const YELLOW: Color = Color::rgb(255, 203, 95);
pub const RED_DARK: Color = Color::rgb(212, 112, 101);
pub const CYAN: Color = Color::rgb(102, 204, 255);
pub const BLACK: Color = Color::rgb(0, 0, 0);

pub const DEBUG_ELEMENT: Color = Color::rgb(0, 255, 0);
pub const DEBUG_COLUMN: Color = Color::rgb(255, 0, 255);
pub const DEBUG_WRAP: Color = Color::rgb(0, 0, 255);
pub const DEBUG_TOUCH: Color = Color::rgb(255, 0, 255);

pub const PADDING: f64 = 5.0;
pub const BUTTON_PADDING_X: f64 = 10.0;

pub const TITLE_FONT_SIZE: f64 = 34.0;
pub const BODY_FONT_SIZE: f64 = 28.0;

pub fn severity_color(severity: Severity) -> &'static Color {
    match severity {
        Severity::Info => &PURPLE_LIGHT,
        Severity::Control => &CYAN,
        Severity::Warning => &YELLOW,
        Severity::Error => &RED_DARK,
    }
}
