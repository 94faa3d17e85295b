//! Pure geometry of the themed "pill" bar segment: a rectangle whose left
//! and/or right end is replaced by a half-ellipse cap. All inputs are
//! clamped to something drawable; there is no error path.

use crate::Rect;

/// A cap bulging out of the flat edge at `cx`, vertically centred on `cy`.
/// `rx`/`ry` are the half-axes; `left` selects which way it bulges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndCap {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub left: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PillShape {
    Empty,
    Rect(Rect),
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Capped {
        body: Rect,
        left: Option<EndCap>,
        right: Option<EndCap>,
    },
}

impl PillShape {
    /// Resolves the requested pill into drawable parts.
    ///
    /// The radius is clamped to `min(w/2, h/2)` when both ends are rounded
    /// and to `h/2` otherwise; non-positive dimensions yield `Empty`; a
    /// double-rounded pill too narrow for a connecting body collapses to an
    /// ellipse; a single-rounded one falls back to a plain rectangle.
    pub fn new(
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        round_left: bool,
        round_right: bool,
    ) -> PillShape {
        if w <= 0.0 || h <= 0.0 {
            return PillShape::Empty;
        }

        let full = Rect::new(x, y, w, h);
        if !round_left && !round_right {
            return PillShape::Rect(full);
        }

        let mut radius = radius.max(0.0);
        if round_left && round_right {
            radius = radius.min(w / 2.0).min(h / 2.0);
        } else {
            radius = radius.min(h / 2.0);
        }
        if radius == 0.0 {
            return PillShape::Rect(full);
        }

        let cy = y + h / 2.0;
        if round_left && round_right {
            if w <= 2.0 * radius {
                return PillShape::Ellipse {
                    cx: x + w / 2.0,
                    cy,
                    rx: w / 2.0,
                    ry: h / 2.0,
                };
            }
            return PillShape::Capped {
                body: Rect::new(x + radius, y, w - 2.0 * radius, h),
                left: Some(EndCap {
                    cx: x + radius,
                    cy,
                    rx: radius,
                    ry: h / 2.0,
                    left: true,
                }),
                right: Some(EndCap {
                    cx: x + w - radius,
                    cy,
                    rx: radius,
                    ry: h / 2.0,
                    left: false,
                }),
            };
        }

        // Single rounded end; not enough width for a cap plus body degrades
        // to the plain rectangle.
        if w <= radius {
            return PillShape::Rect(full);
        }
        if round_left {
            PillShape::Capped {
                body: Rect::new(x + radius, y, w - radius, h),
                left: Some(EndCap {
                    cx: x + radius,
                    cy,
                    rx: radius,
                    ry: h / 2.0,
                    left: true,
                }),
                right: None,
            }
        } else {
            PillShape::Capped {
                body: Rect::new(x, y, w - radius, h),
                left: None,
                right: Some(EndCap {
                    cx: x + w - radius,
                    cy,
                    rx: radius,
                    ry: h / 2.0,
                    left: false,
                }),
            }
        }
    }

    /// Bounding box of the resolved shape, `None` for `Empty`.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            PillShape::Empty => None,
            PillShape::Rect(r) => Some(*r),
            PillShape::Ellipse { cx, cy, rx, ry } => {
                Some(Rect::new(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry))
            }
            PillShape::Capped { body, left, right } => {
                let mut x0 = body.x;
                let mut x1 = body.x + body.w;
                if let Some(cap) = left {
                    x0 = x0.min(cap.cx - cap.rx);
                }
                if let Some(cap) = right {
                    x1 = x1.max(cap.cx + cap.rx);
                }
                Some(Rect::new(x0, body.y, x1 - x0, body.h))
            }
        }
    }
}
