//! Cairo path construction shared by the framebuffer and SVG backends.

use crate::pill::{EndCap, PillShape};

/// Fills a resolved pill shape. Caps are drawn as half-ellipses by arcing
/// a unit circle under a scaled transform; the transform is restored
/// before filling so nothing else is distorted.
pub(crate) fn fill_pill(context: &cairo::Context, shape: &PillShape) -> Result<(), cairo::Error> {
    match shape {
        PillShape::Empty => Ok(()),
        PillShape::Rect(r) => {
            context.rectangle(r.x, r.y, r.w, r.h);
            context.fill()
        }
        PillShape::Ellipse { cx, cy, rx, ry } => {
            context.save()?;
            context.translate(*cx, *cy);
            context.scale(*rx, *ry);
            context.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
            context.restore()?;
            context.fill()
        }
        PillShape::Capped { body, left, right } => {
            context.rectangle(body.x, body.y, body.w, body.h);
            context.fill()?;
            if let Some(cap) = left {
                fill_cap(context, cap)?;
            }
            if let Some(cap) = right {
                fill_cap(context, cap)?;
            }
            Ok(())
        }
    }
}

fn fill_cap(context: &cairo::Context, cap: &EndCap) -> Result<(), cairo::Error> {
    use std::f64::consts::FRAC_PI_2;

    context.save()?;
    context.translate(cap.cx, cap.cy);
    context.scale(cap.rx, cap.ry);
    if cap.left {
        context.arc(0.0, 0.0, 1.0, FRAC_PI_2, 3.0 * FRAC_PI_2);
    } else {
        context.arc(0.0, 0.0, 1.0, -FRAC_PI_2, FRAC_PI_2);
    }
    context.close_path();
    context.restore()?;
    context.fill()
}
