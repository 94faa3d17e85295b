use chrono::{DateTime, Local};
use display::{Display, Error, Point, Rect};
use engine::PanelSnapshot;

use crate::layout::{
    bars, columns, Align, ButtonDescriptor, ButtonId, ButtonSpec, PanelMetrics, TextSpan, VAnchor,
};
use crate::render;
use crate::theme;

pub fn buttons() -> Vec<ButtonSpec> {
    vec![
        ButtonSpec {
            id: ButtonId::Clear,
            text: "CLEAR".to_owned(),
            color: theme::RED_DARK,
        },
        ButtonSpec {
            id: ButtonId::Relative,
            text: "RELATIVE".to_owned(),
            color: theme::BLUE,
        },
        ButtonSpec {
            id: ButtonId::Mode,
            text: "CLOCK".to_owned(),
            color: theme::YELLOW,
        },
    ]
}

/// Renders the event log frame and returns this frame's hit-regions.
pub fn render<D: Display>(
    display: &mut D,
    metrics: &PanelMetrics,
    snapshot: &PanelSnapshot,
    title: &str,
    now: DateTime<Local>,
) -> Result<Vec<ButtonDescriptor>, Error> {
    display.clear(&theme::BLACK)?;

    let top = bars::layout_top_bar(display, metrics, title);
    let bottom = bars::layout_bottom_bar(display, metrics, "MQTT STREAM", &buttons());
    render::draw_bar(display, &top)?;
    render::draw_bar(display, &bottom)?;

    let viewport = metrics.viewport();
    let cols = columns::compute_columns(display, metrics);
    let lines = columns::visible_lines(
        &snapshot.messages,
        &cols,
        viewport.h,
        metrics.line_height,
        snapshot.relative_time,
        now,
    );

    for (i, line) in lines.iter().enumerate() {
        let y = viewport.y + i as f64 * metrics.line_height;
        if y + metrics.line_height > viewport.y + viewport.h {
            break;
        }
        let color = theme::severity_color(line.severity).clone();

        if let Some(source) = &line.source {
            render::draw_text_span(
                display,
                &TextSpan {
                    text: source.clone(),
                    font: metrics.body_font.clone(),
                    rect: Rect::new(cols.source_x, y, cols.source_w, metrics.line_height),
                    color: color.clone(),
                    align: Align::Left,
                    anchor: VAnchor::CenterAscent,
                    padding: 0.0,
                },
            )?;
        }
        render::draw_text_span(
            display,
            &TextSpan {
                text: line.fragment.clone(),
                font: metrics.body_font.clone(),
                rect: Rect::new(cols.message_x, y, cols.message_w, metrics.line_height),
                color: color.clone(),
                align: Align::Left,
                anchor: VAnchor::CenterAscent,
                padding: 0.0,
            },
        )?;
        if let Some(time) = &line.time {
            render::draw_text_span(
                display,
                &TextSpan {
                    text: time.clone(),
                    font: metrics.body_font.clone(),
                    rect: Rect::new(cols.time_x, y, cols.time_w, metrics.line_height),
                    color,
                    align: Align::Right,
                    anchor: VAnchor::CenterAscent,
                    padding: 0.0,
                },
            )?;
        }
    }

    if snapshot.debug.layout {
        render::draw_bar_debug(display, &top)?;
        render::draw_bar_debug(display, &bottom)?;

        display.set_color(&theme::DEBUG_COLUMN);
        render::stroke_column(display, cols.source_x, cols.source_w, &viewport)?;
        render::stroke_column(display, cols.message_x, cols.message_w, &viewport)?;
        render::stroke_column(display, cols.time_x, cols.time_w, &viewport)?;

        display.set_color(&theme::DEBUG_WRAP);
        display.stroke_line(
            &Point { x: cols.message_x + cols.message_w, y: viewport.y },
            &Point {
                x: cols.message_x + cols.message_w,
                y: viewport.y + viewport.h,
            },
        )?;
    }

    Ok(bottom.buttons)
}
