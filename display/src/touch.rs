//! Raw touch sample to logical screen coordinate transform.
//!
//! Two independent steps: a table-driven axis remap for the configured
//! display rotation, then a per-axis linear calibration that models sensor
//! extremes sitting a fixed number of pixels inside the true screen edges.

use crate::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_degrees(deg: u32) -> Option<Rotation> {
        match deg {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    pub fn inverse(self) -> Rotation {
        match self {
            Rotation::Deg0 => Rotation::Deg0,
            Rotation::Deg90 => Rotation::Deg270,
            Rotation::Deg180 => Rotation::Deg180,
            Rotation::Deg270 => Rotation::Deg90,
        }
    }
}

/// Maps normalized sensor-axis fractions onto logical-axis fractions for
/// the given rotation. The table is fixed per angle; sensor orientation
/// and display rotation are independently configured hardware facts, so
/// nothing here is inferred.
pub fn remap(rotation: Rotation, fx: f64, fy: f64) -> (f64, f64) {
    match rotation {
        Rotation::Deg0 => (fx, fy),
        Rotation::Deg90 => (fy, 1.0 - fx),
        Rotation::Deg180 => (1.0 - fx, 1.0 - fy),
        Rotation::Deg270 => (1.0 - fy, fx),
    }
}

/// Inverse of [`remap`]: logical fractions back to sensor fractions.
pub fn remap_inverse(rotation: Rotation, lx: f64, ly: f64) -> (f64, f64) {
    match rotation {
        Rotation::Deg0 => (lx, ly),
        Rotation::Deg90 => (1.0 - ly, lx),
        Rotation::Deg180 => (1.0 - lx, 1.0 - ly),
        Rotation::Deg270 => (ly, 1.0 - lx),
    }
}

/// Reported raw range of one sensor axis. Fixed per deployment.
#[derive(Debug, Clone, Copy)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn fraction(&self, raw: f64) -> Option<f64> {
        let span = self.max - self.min;
        if span == 0.0 {
            None
        } else {
            Some((raw - self.min) / span)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TouchTransform {
    rotation: Rotation,
    raw_x: AxisRange,
    raw_y: AxisRange,
    width: f64,
    height: f64,
    // Modeled edge error per logical axis, in pixels.
    error_x: f64,
    error_y: f64,
}

impl TouchTransform {
    pub fn new(
        rotation: Rotation,
        width: usize,
        height: usize,
        raw_x: AxisRange,
        raw_y: AxisRange,
        error_x: f64,
        error_y: f64,
    ) -> Self {
        Self {
            rotation,
            raw_x,
            raw_y,
            width: width as f64,
            height: height as f64,
            error_x,
            error_y,
        }
    }

    /// Transforms one raw sensor sample into logical screen coordinates.
    ///
    /// A sensor axis reporting an identical min and max cannot be scaled;
    /// its raw value passes through unscaled, unreflected and
    /// uncalibrated (logged). The other axis is transformed normally.
    pub fn to_logical(&self, raw_x: f64, raw_y: f64) -> Point {
        let fx = self.raw_x.fraction(raw_x);
        let fy = self.raw_y.fraction(raw_y);
        if fx.is_none() || fy.is_none() {
            log::warn!(
                "Degenerate sensor range ({:?}/{:?}), passing raw axis through",
                self.raw_x,
                self.raw_y
            );
        }

        // Same sensor-to-logical wiring as `remap`, tracked per axis so a
        // passthrough axis skips its reflection and calibration while the
        // healthy axis still gets both.
        let x_axis = (fx, raw_x);
        let y_axis = (fy, raw_y);
        let (for_lx, reflect_lx, for_ly, reflect_ly) = match self.rotation {
            Rotation::Deg0 => (x_axis, false, y_axis, false),
            Rotation::Deg90 => (y_axis, false, x_axis, true),
            Rotation::Deg180 => (x_axis, true, y_axis, true),
            Rotation::Deg270 => (y_axis, true, x_axis, false),
        };

        Point {
            x: logical_axis(for_lx, reflect_lx, self.width - 1.0, self.error_x),
            y: logical_axis(for_ly, reflect_ly, self.height - 1.0, self.error_y),
        }
    }
}

fn logical_axis(axis: (Option<f64>, f64), reflect: bool, d: f64, e: f64) -> f64 {
    match axis {
        (Some(fraction), _) => {
            let fraction = if reflect { 1.0 - fraction } else { fraction };
            correct(fraction, d, e)
        }
        (None, raw) => raw,
    }
}

/// Maps a normalized fraction into `[0, d]` pixels, compensating a sensor
/// whose reported extremes sit `e` pixels inside the true edges: the
/// output range becomes `[-e*d/(d-2e), d*(d-e)/(d-2e)]` so that fractions
/// `e/d` and `1 - e/d` land exactly on the edges. When `d - 2e <= 0` the
/// error model is degenerate for this screen and plain scaling is used.
fn correct(fraction: f64, d: f64, e: f64) -> f64 {
    if d <= 0.0 {
        return 0.0;
    }
    let usable = d - 2.0 * e;
    if usable <= 0.0 {
        log::warn!(
            "Calibration error {}px degenerate for {}px span, scaling uncalibrated",
            e,
            d
        );
        return fraction * d;
    }
    let out_min = -e * d / usable;
    let out_span = d * d / usable;
    out_min + fraction * out_span
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn remap_composed_with_inverse_is_identity() {
        for &rot in &[
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270,
        ] {
            for &(fx, fy) in &[(0.0, 0.0), (1.0, 0.0), (0.25, 0.75), (1.0, 1.0)] {
                let (lx, ly) = remap(rot, fx, fy);
                let (bx, by) = remap_inverse(rot, lx, ly);
                assert!((bx - fx).abs() < EPS && (by - fy).abs() < EPS, "{:?}", rot);
            }
        }
    }

    #[test]
    fn quarter_turn_swaps_and_reflects() {
        // Sensor X becomes screen Y, reflected.
        let (lx, ly) = remap(Rotation::Deg90, 0.25, 0.75);
        assert!((lx - 0.75).abs() < EPS);
        assert!((ly - 0.75).abs() < EPS);
    }

    #[test]
    fn correction_hits_edges_at_modeled_fractions() {
        let d = 319.0;
        let e = 10.0;
        assert!(correct(e / d, d, e).abs() < 1e-6);
        assert!((correct(1.0 - e / d, d, e) - d).abs() < 1e-6);
    }

    #[test]
    fn correction_is_strictly_monotonic() {
        let d = 479.0;
        let e = 12.5;
        let mut last = correct(-0.1, d, e);
        let mut f = -0.08;
        while f <= 1.1 {
            let v = correct(f, d, e);
            assert!(v > last);
            last = v;
            f += 0.02;
        }
    }

    #[test]
    fn degenerate_error_model_scales_plainly() {
        // e >= d/2 leaves no usable span; must not divide by it.
        assert!((correct(0.5, 20.0, 10.0) - 10.0).abs() < EPS);
        assert!((correct(0.5, 20.0, 40.0) - 10.0).abs() < EPS);
    }

    #[test]
    fn identical_min_max_passes_raw_through() {
        let tr = TouchTransform::new(
            Rotation::Deg0,
            320,
            240,
            AxisRange::new(5.0, 5.0),
            AxisRange::new(5.0, 5.0),
            0.0,
            0.0,
        );
        let pt = tr.to_logical(123.0, 45.0);
        assert!((pt.x - 123.0).abs() < EPS);
        assert!((pt.y - 45.0).abs() < EPS);
    }

    #[test]
    fn single_degenerate_axis_passes_only_that_axis_through() {
        // Healthy x axis, collapsed y axis. X still scales onto the
        // screen; y comes back as the raw sensor value.
        let tr = TouchTransform::new(
            Rotation::Deg0,
            320,
            240,
            AxisRange::new(0.0, 4095.0),
            AxisRange::new(7.0, 7.0),
            0.0,
            0.0,
        );
        let pt = tr.to_logical(2048.0, 2000.0);
        assert!((pt.x - 2048.0 / 4095.0 * 319.0).abs() < EPS);
        assert!((pt.y - 2000.0).abs() < EPS);
    }

    #[test]
    fn degenerate_axis_skips_the_remap_reflection() {
        // Quarter turn feeds sensor y into logical x and reflects sensor
        // x into logical y. The collapsed y axis must land raw on x, not
        // as 1-raw or a pixel-scaled fraction; the healthy x axis is
        // still reflected and scaled.
        let tr = TouchTransform::new(
            Rotation::Deg90,
            320,
            240,
            AxisRange::new(0.0, 100.0),
            AxisRange::new(7.0, 7.0),
            0.0,
            0.0,
        );
        let pt = tr.to_logical(100.0, 42.0);
        assert!((pt.x - 42.0).abs() < EPS);
        assert!(pt.y.abs() < EPS);

        // Half turn reflects both axes; passthrough stays raw anyway.
        let tr = TouchTransform::new(
            Rotation::Deg180,
            320,
            240,
            AxisRange::new(7.0, 7.0),
            AxisRange::new(7.0, 7.0),
            0.0,
            0.0,
        );
        let pt = tr.to_logical(123.0, 45.0);
        assert!((pt.x - 123.0).abs() < EPS);
        assert!((pt.y - 45.0).abs() < EPS);
    }

    #[test]
    fn uncalibrated_transform_maps_corners() {
        let tr = TouchTransform::new(
            Rotation::Deg0,
            320,
            240,
            AxisRange::new(0.0, 4095.0),
            AxisRange::new(0.0, 4095.0),
            0.0,
            0.0,
        );
        let pt = tr.to_logical(4095.0, 0.0);
        assert!((pt.x - 319.0).abs() < EPS);
        assert!(pt.y.abs() < EPS);
    }

    #[test]
    fn rotated_transform_lands_in_rotated_frame() {
        // 240x320 panel rotated a quarter turn; sensor max-x maps to y=0.
        let tr = TouchTransform::new(
            Rotation::Deg90,
            320,
            240,
            AxisRange::new(0.0, 100.0),
            AxisRange::new(0.0, 100.0),
            0.0,
            0.0,
        );
        let pt = tr.to_logical(100.0, 100.0);
        assert!((pt.x - 319.0).abs() < EPS);
        assert!(pt.y.abs() < EPS);
    }

    #[test]
    fn inverted_raw_range_is_handled_by_signed_span() {
        let tr = TouchTransform::new(
            Rotation::Deg0,
            320,
            240,
            AxisRange::new(4000.0, 200.0),
            AxisRange::new(0.0, 100.0),
            0.0,
            0.0,
        );
        let pt = tr.to_logical(4000.0, 0.0);
        assert!(pt.x.abs() < EPS);
    }
}
