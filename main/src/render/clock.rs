use chrono::{DateTime, Local};
use display::{Display, Error, Rect};
use engine::PanelSnapshot;

use crate::layout::{fit, Align, ButtonDescriptor, ButtonId, ButtonSpec, PanelMetrics, TextSpan, VAnchor};
use crate::render;
use crate::theme;

pub fn buttons() -> Vec<ButtonSpec> {
    vec![ButtonSpec {
        id: ButtonId::Mode,
        text: "EVENTS".to_owned(),
        color: theme::YELLOW,
    }]
}

/// Full-screen clock: the time fills the upper part of the content area
/// with a fitted font, the date sits below it, the bottom bar names the
/// timezone.
pub fn render<D: Display>(
    display: &mut D,
    metrics: &PanelMetrics,
    snapshot: &PanelSnapshot,
    now: DateTime<Local>,
) -> Result<Vec<ButtonDescriptor>, Error> {
    display.clear(&theme::BLACK)?;

    let top = crate::layout::bars::layout_top_bar(display, metrics, "CLOCK");
    let tz = timezone_label(&now);
    let bottom = crate::layout::bars::layout_bottom_bar(display, metrics, &tz, &buttons());
    render::draw_bar(display, &top)?;
    render::draw_bar(display, &bottom)?;

    let viewport = metrics.viewport();
    let time_rect = Rect::new(viewport.x, viewport.y, viewport.w, viewport.h * 0.6);
    let date_rect = Rect::new(
        viewport.x,
        viewport.y + time_rect.h,
        viewport.w,
        viewport.h - time_rect.h,
    );

    let time_text = now.format("%H:%M:%S").to_string();
    let fitted = fit::fit_font(
        display,
        &time_text,
        &metrics.title_font.family,
        time_rect.h,
        time_rect.w,
        (0.8 * time_rect.h).max(100.0),
    );
    render::draw_text_span(
        display,
        &TextSpan {
            text: time_text,
            font: fitted.font,
            rect: time_rect,
            color: theme::ORANGE,
            align: Align::Center,
            anchor: VAnchor::CenterAscent,
            padding: 0.0,
        },
    )?;

    let date_text = now.format("%Y-%m-%d - %A").to_string();
    let fitted = fit::fit_font(
        display,
        &date_text,
        &metrics.body_font.family,
        date_rect.h,
        date_rect.w,
        (0.8 * date_rect.h).max(fit::MIN_SIZE),
    );
    render::draw_text_span(
        display,
        &TextSpan {
            text: date_text,
            font: fitted.font,
            rect: date_rect,
            color: theme::PURPLE_LIGHT,
            align: Align::Center,
            anchor: VAnchor::CenterAscent,
            padding: 0.0,
        },
    )?;

    if snapshot.debug.layout {
        render::draw_bar_debug(display, &top)?;
        render::draw_bar_debug(display, &bottom)?;
        display.set_color(&theme::DEBUG_COLUMN);
        display.stroke_rect(&time_rect)?;
        display.stroke_rect(&date_rect)?;
    }

    Ok(bottom.buttons)
}

/// IANA zone name for the bottom-bar label; chrono's `%Z` on `Local`
/// only yields the numeric offset, which stays as the fallback.
fn timezone_label(now: &DateTime<Local>) -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| now.format("%Z").to_string())
}
