//! Top and bottom bar packers. Both produce draw-ready segments and text
//! spans; the bottom bar also yields the frame's touch hit-regions.

use display::Rect;

use crate::layout::{
    Align, BarSegment, ButtonDescriptor, ButtonSpec, Measure, PanelMetrics, TextSpan, VAnchor,
};
use crate::theme;

#[derive(Debug, Clone, Default)]
pub struct BarLayout {
    pub segments: Vec<BarSegment>,
    pub spans: Vec<TextSpan>,
    pub buttons: Vec<ButtonDescriptor>,
}

impl Default for BarSegment {
    fn default() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            radius: 0.0,
            color: theme::ORANGE,
            round_left: false,
            round_right: false,
        }
    }
}

fn terminator(metrics: &PanelMetrics, x: f64, y: f64, left: bool) -> BarSegment {
    BarSegment {
        rect: Rect::new(x, y, metrics.bar_height, metrics.bar_height),
        radius: metrics.corner_radius,
        round_left: left,
        round_right: !left,
        ..Default::default()
    }
}

/// Top bar: rounded-left terminator, square filler, right-anchored title
/// with its baseline on the bar's bottom edge, rounded-right terminator.
/// The filler is omitted when the title leaves no room for it.
pub fn layout_top_bar(measure: &mut dyn Measure, metrics: &PanelMetrics, title: &str) -> BarLayout {
    let y = theme::PADDING;
    let term_w = metrics.bar_height;
    let x0 = theme::PADDING + term_w;
    let x1 = metrics.width - theme::PADDING - term_w;

    let mut layout = BarLayout::default();
    layout.segments.push(terminator(metrics, theme::PADDING, y, true));

    let title_w = measure.text_size(&metrics.title_font, title).width;
    let filler_w = (x1 - x0) - title_w - 2.0 * theme::PADDING;
    if filler_w > 0.0 {
        layout.segments.push(BarSegment {
            rect: Rect::new(x0 + theme::PADDING, y, filler_w, metrics.bar_height),
            ..Default::default()
        });
    }

    layout.spans.push(TextSpan {
        text: title.to_owned(),
        font: metrics.title_font.clone(),
        rect: Rect::new(x0, y, x1 - x0, metrics.bar_height),
        color: theme::ORANGE,
        align: Align::Right,
        anchor: VAnchor::Bottom,
        padding: theme::PADDING,
    });

    layout.segments.push(terminator(metrics, x1, y, false));
    layout
}

/// Bottom bar: rounded-left terminator, left-anchored label, filler, a
/// right-packed button group, rounded-right terminator. The group start is
/// solved right to left; when it would overlap the label the whole group
/// is dropped for this frame and the descriptor list comes back empty.
pub fn layout_bottom_bar(
    measure: &mut dyn Measure,
    metrics: &PanelMetrics,
    label: &str,
    buttons: &[ButtonSpec],
) -> BarLayout {
    let y = metrics.height - theme::PADDING - metrics.bar_height;
    let term_w = metrics.bar_height;
    let x0 = theme::PADDING + term_w;
    let x1 = metrics.width - theme::PADDING - term_w;

    let mut layout = BarLayout::default();
    layout.segments.push(terminator(metrics, theme::PADDING, y, true));

    let label_w = measure.text_size(&metrics.title_font, label).width;
    let label_end = x0 + theme::PADDING + label_w;
    layout.spans.push(TextSpan {
        text: label.to_owned(),
        font: metrics.title_font.clone(),
        rect: Rect::new(x0, y, x1 - x0, metrics.bar_height),
        color: theme::ORANGE,
        align: Align::Left,
        anchor: VAnchor::Bottom,
        padding: theme::PADDING,
    });

    let widths: Vec<f64> = buttons
        .iter()
        .map(|b| measure.text_size(&metrics.body_font, &b.text).width + 2.0 * theme::BUTTON_PADDING_X)
        .collect();
    let total_buttons_w: f64 = widths.iter().sum::<f64>()
        + theme::PADDING * widths.len().saturating_sub(1) as f64;
    let group_start =
        metrics.width - theme::PADDING - term_w - theme::PADDING - total_buttons_w;

    let group_fits = !buttons.is_empty() && group_start >= label_end;
    let filler_end = if group_fits { group_start } else { x1 };
    let filler_x = label_end + theme::PADDING;
    let filler_w = filler_end - theme::PADDING - filler_x;
    if filler_w > 0.0 {
        layout.segments.push(BarSegment {
            rect: Rect::new(filler_x, y, filler_w, metrics.bar_height),
            ..Default::default()
        });
    }

    if group_fits {
        let mut x = group_start;
        for (spec, w) in buttons.iter().zip(widths) {
            let rect = Rect::new(x, y, w, metrics.bar_height);
            layout.segments.push(BarSegment {
                rect,
                radius: metrics.corner_radius,
                color: spec.color.clone(),
                round_left: true,
                round_right: true,
            });
            layout.spans.push(TextSpan {
                text: spec.text.clone(),
                font: metrics.body_font.clone(),
                rect,
                color: theme::BLACK,
                align: Align::Right,
                anchor: VAnchor::CenterAscent,
                padding: theme::BUTTON_PADDING_X,
            });
            layout.buttons.push(ButtonDescriptor {
                id: spec.id,
                text: spec.text.clone(),
                color: spec.color.clone(),
                rect,
            });
            x += w + theme::PADDING;
        }
    } else if !buttons.is_empty() {
        log::debug!("No room for the button group, skipping it this frame");
    }

    layout.segments.push(terminator(metrics, x1, y, false));
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::testutil::FakeMeasure;
    use crate::layout::ButtonId;

    fn metrics(width: usize, height: usize) -> PanelMetrics {
        PanelMetrics::compute(&mut FakeMeasure, width, height, "Fake")
    }

    fn specs() -> Vec<ButtonSpec> {
        vec![
            ButtonSpec {
                id: ButtonId::Clear,
                text: "CLEAR".to_owned(),
                color: theme::RED_DARK,
            },
            ButtonSpec {
                id: ButtonId::Mode,
                text: "CLOCK".to_owned(),
                color: theme::YELLOW,
            },
        ]
    }

    #[test]
    fn top_bar_places_terminators_at_the_edges() {
        let m = metrics(800, 480);
        let top = layout_top_bar(&mut FakeMeasure, &m, "EVENT LOG");

        let first = &top.segments[0];
        assert!(first.round_left && !first.round_right);
        assert_eq!(first.rect, Rect::new(5.0, 5.0, 34.0, 34.0));

        let last = top.segments.last().unwrap();
        assert!(last.round_right && !last.round_left);
        assert_eq!(last.rect, Rect::new(800.0 - 5.0 - 34.0, 5.0, 34.0, 34.0));
        // terminator, filler, terminator
        assert_eq!(top.segments.len(), 3);
    }

    #[test]
    fn top_bar_filler_is_omitted_when_the_title_is_too_wide() {
        let m = metrics(260, 480);
        let top = layout_top_bar(&mut FakeMeasure, &m, "A VERY LONG TITLE");
        assert_eq!(top.segments.len(), 2);
        assert_eq!(top.spans[0].text, "A VERY LONG TITLE");
    }

    #[test]
    fn bottom_bar_packs_buttons_right_to_left() {
        let m = metrics(800, 480);
        let bar = layout_bottom_bar(&mut FakeMeasure, &m, "MQTT STREAM", &specs());

        // 5 glyphs at 16.8px + 2x10 inset = 104 per button.
        assert_eq!(bar.buttons.len(), 2);
        let group_start = 800.0 - 5.0 - 34.0 - 5.0 - (104.0 + 5.0 + 104.0);
        assert_eq!(bar.buttons[0].rect, Rect::new(group_start, 441.0, 104.0, 34.0));
        assert_eq!(
            bar.buttons[1].rect,
            Rect::new(group_start + 104.0 + 5.0, 441.0, 104.0, 34.0)
        );
        // Last button ends PADDING left of the right terminator.
        let right_term = bar.segments.last().unwrap();
        let last = &bar.buttons[1].rect;
        assert!((last.x + last.w + 5.0 - right_term.rect.x).abs() < 1e-9);
    }

    #[test]
    fn narrow_screen_yields_an_empty_button_list() {
        let m = metrics(300, 480);
        let bar = layout_bottom_bar(&mut FakeMeasure, &m, "MQTT STREAM", &specs());
        assert!(bar.buttons.is_empty());
        // Label and both terminators still render.
        assert_eq!(bar.spans[0].text, "MQTT STREAM");
        assert!(bar.segments.len() >= 2);
    }

    #[test]
    fn no_buttons_requested_means_full_width_filler() {
        let m = metrics(800, 480);
        let bar = layout_bottom_bar(&mut FakeMeasure, &m, "TZ", &[]);
        assert!(bar.buttons.is_empty());
        let filler = &bar.segments[1];
        assert!(!filler.round_left && !filler.round_right);
        let x1 = 800.0 - 5.0 - 34.0;
        assert!((filler.rect.x + filler.rect.w + 5.0 - x1).abs() < 1e-9);
    }
}
