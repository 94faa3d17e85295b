use crate::layout::{FontSpec, Measure};

pub const MIN_SIZE: f64 = 10.0;
pub const STEP: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FittedFont {
    pub font: FontSpec,
    pub width: f64,
    pub height: f64,
}

/// Descends from `start_size` in steps of [`STEP`] and accepts the first
/// size whose measured box fits both bounds. First-fit on purpose, not a
/// search for the true maximum; do not replace with an exhaustive scan.
/// When nothing in range fits, the smallest tested size is returned with
/// its own measured box.
pub fn fit_font(
    measure: &mut dyn Measure,
    text: &str,
    family: &str,
    max_height: f64,
    max_width: f64,
    start_size: f64,
) -> FittedFont {
    let mut size = start_size.max(MIN_SIZE);
    loop {
        let font = FontSpec::new(family, size);
        let ts = measure.text_size(&font, text);
        let fits = ts.height <= max_height && ts.width <= max_width;
        if fits || size <= MIN_SIZE {
            return FittedFont {
                font,
                width: ts.width,
                height: ts.height,
            };
        }
        size = (size - STEP).max(MIN_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::testutil::FakeMeasure;

    #[test]
    fn generous_box_accepts_the_start_size() {
        let f = fit_font(&mut FakeMeasure, "HI", "Fake", 100.0, 500.0, 40.0);
        assert_eq!(f.font.size, 40.0);
        assert!(f.width <= 500.0 && f.height <= 100.0);
    }

    #[test]
    fn returned_box_never_exceeds_bounds_when_any_size_fits() {
        // 10 glyphs, width budget 150px: fits at 150 / (10 * 0.6) = 25.
        let f = fit_font(&mut FakeMeasure, "0123456789", "Fake", 100.0, 150.0, 40.0);
        assert!(f.width <= 150.0);
        assert!(f.height <= 100.0);
        assert_eq!(f.font.size, 24.0);
    }

    #[test]
    fn first_fit_stops_at_the_first_passing_size() {
        // Both 30 and 28 would fit; descent from 34 must stop at 30.
        let f = fit_font(&mut FakeMeasure, "AB", "Fake", 30.0, 1000.0, 34.0);
        assert_eq!(f.font.size, 30.0);
    }

    #[test]
    fn impossible_box_returns_the_minimum_size() {
        let f = fit_font(&mut FakeMeasure, "TOO WIDE FOR SURE", "Fake", 5.0, 10.0, 40.0);
        assert_eq!(f.font.size, MIN_SIZE);
        // The degraded result still reports its real measured box.
        assert!(f.width > 10.0);
    }

    #[test]
    fn start_below_minimum_is_raised_to_minimum() {
        let f = fit_font(&mut FakeMeasure, "X", "Fake", 100.0, 100.0, 4.0);
        assert_eq!(f.font.size, MIN_SIZE);
    }
}
