mod draw;
mod fbpanel;
mod input;
pub mod pill;
mod svgb;
pub mod touch;

pub use crate::{
    fbpanel::FbPanel,
    svgb::CairoSvg,
    touch::{AxisRange, Rotation, TouchTransform},
};

/// Rendering and input surface of the panel. One frame is bracketed by
/// `start()`/`finish()`; all drawing happens in logical (post-rotation)
/// coordinates.
pub trait Display {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn start(&mut self) -> Result<(), Error>;
    fn started(&self) -> bool;
    fn finish(&mut self);
    fn clear(&mut self, color: &Color) -> Result<(), Error>;
    fn set_color(&mut self, color: &Color);
    fn set_font(&mut self, name: &str) -> Result<(), Error>;
    fn set_font_size(&mut self, size: f64);
    fn text_size(&self, what: &str) -> Result<TextSize, Error>;
    fn font_extents(&self) -> Result<FontExtents, Error>;
    /// Draws `what` with its baseline starting at `where`.
    fn render_text(&mut self, r#where: &Point, what: &str) -> Result<(), Error>;
    fn fill_rect(&mut self, rect: &Rect) -> Result<(), Error>;
    fn stroke_rect(&mut self, rect: &Rect) -> Result<(), Error>;
    fn stroke_line(&mut self, from: &Point, to: &Point) -> Result<(), Error>;
    fn fill_pill(&mut self, shape: &pill::PillShape) -> Result<(), Error>;
    fn init_events(&mut self);
    /// Drains all currently available touch samples; never blocks.
    fn poll_touch(&mut self) -> Vec<TouchSample>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Boundary-inclusive containment, used for touch hit-testing.
    pub fn contains(&self, pt: &Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.w && pt.y >= self.y && pt.y <= self.y + self.h
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f64 / 255.0,
            green: green as f64 / 255.0,
            blue: blue as f64 / 255.0,
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FontExtents {
    pub ascent: f64,
    pub descent: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
}

/// One assembled touch sample in raw sensor coordinates.
#[derive(Debug, Clone, Copy)]
pub struct TouchSample {
    pub x: f64,
    pub y: f64,
    pub phase: TouchPhase,
}

#[derive(Debug)]
pub enum Error {
    FramebufferIssue,
    Cairo(String),
}

impl From<linuxfb::Error> for Error {
    fn from(_err: linuxfb::Error) -> Self {
        Error::FramebufferIssue
    }
}

impl From<cairo::Error> for Error {
    fn from(err: cairo::Error) -> Self {
        Error::Cairo(format!("{}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_boundary_inclusive() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(r.contains(&Point { x: 10.0, y: 20.0 }));
        assert!(r.contains(&Point { x: 40.0, y: 60.0 }));
        assert!(r.contains(&Point { x: 25.0, y: 30.0 }));
        assert!(!r.contains(&Point { x: 9.9, y: 30.0 }));
        assert!(!r.contains(&Point { x: 40.1, y: 30.0 }));
    }
}
