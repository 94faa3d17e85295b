//! Frame renderers over the [`Display`] trait.

pub mod clock;
pub mod event_log;

use display::pill::PillShape;
use display::{Display, Error, Point, Rect};

use crate::layout::bars::BarLayout;
use crate::layout::{Align, BarSegment, TextSpan, VAnchor};
use crate::theme;

pub fn draw_segment<D: Display>(display: &mut D, seg: &BarSegment) -> Result<(), Error> {
    display.set_color(&seg.color);
    let shape = PillShape::new(
        seg.rect.x,
        seg.rect.y,
        seg.rect.w,
        seg.rect.h,
        seg.radius,
        seg.round_left,
        seg.round_right,
    );
    display.fill_pill(&shape)
}

/// Places a string inside a rectangle. The horizontal anchor follows the
/// alignment with the span's inner padding; vertically either the
/// ascender-centred baseline rule or the rectangle's bottom edge. Empty
/// text or a degenerate rectangle is a no-op.
pub fn draw_text_span<D: Display>(display: &mut D, span: &TextSpan) -> Result<(), Error> {
    if span.text.is_empty() || span.rect.w <= 0.0 || span.rect.h <= 0.0 {
        return Ok(());
    }

    display.set_font(&span.font.family)?;
    display.set_font_size(span.font.size);
    display.set_color(&span.color);

    let size = display.text_size(&span.text)?;
    let extents = display.font_extents()?;

    let x = match span.align {
        Align::Left => span.rect.x + span.padding,
        Align::Center => span.rect.x + (span.rect.w - size.width) / 2.0,
        Align::Right => span.rect.x + span.rect.w - span.padding - size.width,
    };
    let y = match span.anchor {
        VAnchor::CenterAscent => span.rect.y + (span.rect.h + extents.ascent) / 2.0,
        VAnchor::Bottom => span.rect.y + span.rect.h,
    };

    display.render_text(&Point { x, y }, &span.text)
}

pub fn draw_bar<D: Display>(display: &mut D, bar: &BarLayout) -> Result<(), Error> {
    for seg in &bar.segments {
        draw_segment(display, seg)?;
    }
    for span in &bar.spans {
        draw_text_span(display, span)?;
    }
    Ok(())
}

/// Layout-bounds overlay for one bar; purely additive, never moves
/// anything.
pub fn draw_bar_debug<D: Display>(display: &mut D, bar: &BarLayout) -> Result<(), Error> {
    display.set_color(&theme::DEBUG_ELEMENT);
    for seg in &bar.segments {
        display.stroke_rect(&seg.rect)?;
    }
    for button in &bar.buttons {
        display.stroke_rect(&button.rect)?;
    }
    Ok(())
}

pub fn draw_touch_cross<D: Display>(display: &mut D, pt: &Point) -> Result<(), Error> {
    const ARM: f64 = 6.0;
    display.set_color(&theme::DEBUG_TOUCH);
    display.stroke_line(
        &Point { x: pt.x - ARM, y: pt.y },
        &Point { x: pt.x + ARM, y: pt.y },
    )?;
    display.stroke_line(
        &Point { x: pt.x, y: pt.y - ARM },
        &Point { x: pt.x, y: pt.y + ARM },
    )
}

pub(crate) fn stroke_column<D: Display>(
    display: &mut D,
    x: f64,
    w: f64,
    viewport: &Rect,
) -> Result<(), Error> {
    display.stroke_rect(&Rect::new(x, viewport.y, w, viewport.h))
}
