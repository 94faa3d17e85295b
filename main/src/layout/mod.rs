//! The layout engine. Everything here is pure over the [`Measure`] trait
//! so it can be exercised without a real cairo surface.

pub mod bars;
pub mod columns;
pub mod fit;

use display::{Color, Display, FontExtents, Rect, TextSize};

use crate::theme;

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
}

impl FontSpec {
    pub fn new(family: &str, size: f64) -> Self {
        Self {
            family: family.to_owned(),
            size,
        }
    }
}

/// Text measurement seam between layout math and the drawing backend.
pub trait Measure {
    fn text_size(&mut self, font: &FontSpec, text: &str) -> TextSize;
    fn font_extents(&mut self, font: &FontSpec) -> FontExtents;
}

impl<T: Display> Measure for T {
    fn text_size(&mut self, font: &FontSpec, text: &str) -> TextSize {
        if self.set_font(&font.family).is_err() {
            return TextSize::default();
        }
        self.set_font_size(font.size);
        Display::text_size(self, text).unwrap_or_default()
    }

    fn font_extents(&mut self, font: &FontSpec) -> FontExtents {
        if self.set_font(&font.family).is_err() {
            return FontExtents::default();
        }
        self.set_font_size(font.size);
        Display::font_extents(self).unwrap_or_default()
    }
}

/// Frame-stable geometry derived once from the screen and the title font.
#[derive(Debug, Clone)]
pub struct PanelMetrics {
    pub width: f64,
    pub height: f64,
    pub title_font: FontSpec,
    pub body_font: FontSpec,
    /// Pixel height of a capital M in the title font.
    pub bar_height: f64,
    pub corner_radius: f64,
    pub line_height: f64,
}

impl PanelMetrics {
    pub fn compute(measure: &mut dyn Measure, width: usize, height: usize, family: &str) -> Self {
        let title_font = FontSpec::new(family, theme::TITLE_FONT_SIZE);
        let body_font = FontSpec::new(family, theme::BODY_FONT_SIZE);

        let mut bar_height = measure.text_size(&title_font, "M").height.ceil();
        if bar_height <= 0.0 {
            // Measurement unavailable; the point size is a usable stand-in.
            bar_height = theme::TITLE_FONT_SIZE;
        }

        Self {
            width: width as f64,
            height: height as f64,
            title_font,
            body_font,
            bar_height,
            corner_radius: bar_height / 2.0,
            line_height: theme::BODY_FONT_SIZE + 4.0,
        }
    }

    /// Content area between the two bars, padded on all sides.
    pub fn viewport(&self) -> Rect {
        let top = theme::PADDING + self.bar_height + theme::PADDING;
        let bottom = self.height - theme::PADDING - self.bar_height - theme::PADDING;
        Rect::new(
            theme::PADDING,
            top,
            self.width - 2.0 * theme::PADDING,
            (bottom - top).max(0.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Vertical anchoring for text inside a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAnchor {
    /// Baseline at `rect.y + (rect.h + ascent) / 2`; ascenders centred,
    /// descenders allowed below the box.
    CenterAscent,
    /// Baseline on the rectangle's bottom edge.
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    pub rect: Rect,
    pub radius: f64,
    pub color: Color,
    pub round_left: bool,
    pub round_right: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub font: FontSpec,
    pub rect: Rect,
    pub color: Color,
    pub align: Align,
    pub anchor: VAnchor,
    pub padding: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Clear,
    Relative,
    Mode,
}

/// What a caller wants on the bottom bar.
#[derive(Debug, Clone)]
pub struct ButtonSpec {
    pub id: ButtonId,
    pub text: String,
    pub color: Color,
}

/// A packed button with its final hit-region. Valid for one frame only.
#[derive(Debug, Clone)]
pub struct ButtonDescriptor {
    pub id: ButtonId,
    pub text: String,
    pub color: Color,
    pub rect: Rect,
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// Deterministic measurer: every glyph is `0.6 × size` wide and a
    /// string is `size` tall.
    pub struct FakeMeasure;

    impl Measure for FakeMeasure {
        fn text_size(&mut self, font: &FontSpec, text: &str) -> TextSize {
            TextSize {
                width: text.chars().count() as f64 * font.size * 0.6,
                height: if text.is_empty() { 0.0 } else { font.size },
            }
        }

        fn font_extents(&mut self, font: &FontSpec) -> FontExtents {
            FontExtents {
                ascent: font.size * 0.8,
                descent: font.size * 0.2,
                height: font.size,
            }
        }
    }
}
