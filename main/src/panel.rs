//! The coordination loop: the single owner of the display, the touch
//! transform and the per-frame hit-regions. All shared state lives in the
//! panel engine and is read here as snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use display::pill::PillShape;
use display::touch::{AxisRange, Rotation, TouchTransform};
use display::{Display, Error, Point, Rect, TouchPhase};
use engine::{DisplayMode, PanelCmdData, PanelHandle, PanelSnapshot};

use crate::config::Config;
use crate::layout::{ButtonDescriptor, ButtonId, PanelMetrics};
use crate::render::{self, clock, event_log};
use crate::theme;

const IDLE_QUANTUM: Duration = Duration::from_millis(30);
const MIN_SLEEP: Duration = Duration::from_millis(10);

pub struct Panel<D: Display> {
    display: D,
    metrics: PanelMetrics,
    transform: TouchTransform,
    handle: PanelHandle,
    title: String,
    buttons: Vec<ButtonDescriptor>,
    last_rev: Option<u64>,
    last_second: Option<i64>,
    blanked: bool,
}

impl<D: Display> Panel<D> {
    pub fn new(
        mut display: D,
        handle: PanelHandle,
        config: &Config,
        rotation: Rotation,
    ) -> Result<Self, Error> {
        display.init_events();

        // One throwaway frame to measure fonts against the real backend.
        display.start()?;
        let width = display.width();
        let height = display.height();
        let metrics = PanelMetrics::compute(&mut display, width, height, &config.panel.font);
        display.finish();
        log::debug!("Panel metrics: {:?}", &metrics);

        let transform = TouchTransform::new(
            rotation,
            width,
            height,
            AxisRange::new(config.touch.min_x, config.touch.max_x),
            AxisRange::new(config.touch.min_y, config.touch.max_y),
            config.touch.error_x * metrics.bar_height,
            config.touch.error_y * metrics.bar_height,
        );

        Ok(Self {
            display,
            metrics,
            transform,
            handle,
            title: config.panel.title.clone(),
            buttons: Vec::new(),
            last_rev: None,
            last_second: None,
            blanked: false,
        })
    }

    /// Renders a single frame from the current engine state.
    pub async fn render_frame(&mut self) -> Result<(), Error> {
        let snapshot = self.handle.snapshot().await;
        self.render_snapshot(&snapshot, &[])
    }

    fn render_snapshot(&mut self, snapshot: &PanelSnapshot, touches: &[Point]) -> Result<(), Error> {
        self.display.start()?;
        // Hit-regions are rebuilt from scratch every frame; nothing stale
        // survives a layout change.
        self.buttons.clear();

        let now = Local::now();
        let result = match snapshot.mode {
            DisplayMode::EventLog => {
                event_log::render(&mut self.display, &self.metrics, snapshot, &self.title, now)
            }
            DisplayMode::Clock => clock::render(&mut self.display, &self.metrics, snapshot, now),
        }
        .and_then(|buttons| -> Result<(), Error> {
            self.buttons = buttons;
            if snapshot.debug.touch {
                for pt in touches {
                    render::draw_touch_cross(&mut self.display, pt)?;
                }
            }
            Ok(())
        });
        self.display.finish();
        result?;

        self.last_rev = Some(snapshot.rev);
        self.last_second = Some(now.timestamp());
        Ok(())
    }

    pub async fn run(&mut self, shutdown: Arc<AtomicBool>) -> Result<(), Error> {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            let mut snapshot = self.handle.snapshot().await;

            let mut touches = Vec::new();
            let mut dispatched = false;
            for sample in self.display.poll_touch() {
                if sample.phase != TouchPhase::Down {
                    continue;
                }
                let pt = self.transform.to_logical(sample.x, sample.y);
                log::debug!("Touch down at ({:.0}, {:.0})", pt.x, pt.y);
                touches.push(pt);
                if let Some(button) = hit_button(&self.buttons, &pt) {
                    log::info!("Button {:?} tapped", button.id);
                    dispatch(&self.handle, button.id, snapshot.mode).await;
                    dispatched = true;
                }
            }
            if dispatched {
                // Pick up the state change now instead of next iteration.
                snapshot = self.handle.snapshot().await;
            }

            let redraw = needs_redraw(
                &snapshot,
                self.last_rev,
                self.last_second,
                Local::now().timestamp(),
                snapshot.debug.touch && !touches.is_empty(),
            );
            if redraw {
                self.render_snapshot(&snapshot, &touches)?;
            }

            let sleep = match snapshot.mode {
                DisplayMode::Clock => until_next_second(),
                DisplayMode::EventLog => IDLE_QUANTUM,
            };
            tokio::time::sleep(sleep).await;
        }

        self.blank()
    }

    /// Blanks the display; only the first call draws, so a duplicate
    /// shutdown path cannot double-tear-down.
    pub fn blank(&mut self) -> Result<(), Error> {
        if self.blanked {
            return Ok(());
        }
        self.blanked = true;
        log::info!("Blanking the display");
        self.display.start()?;
        self.display.clear(&theme::BLACK)?;
        self.display.finish();
        Ok(())
    }
}

/// The clock redraws every wake-up; the event log only when something
/// visible changed: a state revision, the relative-time column crossing
/// into a new second, or a requested touch overlay.
fn needs_redraw(
    snapshot: &PanelSnapshot,
    last_rev: Option<u64>,
    last_second: Option<i64>,
    now_second: i64,
    touch_overlay: bool,
) -> bool {
    match snapshot.mode {
        DisplayMode::Clock => true,
        DisplayMode::EventLog => {
            last_rev != Some(snapshot.rev)
                || (snapshot.relative_time && last_second != Some(now_second))
                || touch_overlay
        }
    }
}

fn hit_button<'a>(buttons: &'a [ButtonDescriptor], pt: &Point) -> Option<&'a ButtonDescriptor> {
    buttons.iter().find(|b| b.rect.contains(pt))
}

async fn dispatch(handle: &PanelHandle, id: ButtonId, mode: DisplayMode) {
    match id {
        ButtonId::Clear => handle.send(PanelCmdData::ClearHistory).await,
        ButtonId::Relative => handle.send(PanelCmdData::ToggleRelative).await,
        ButtonId::Mode => {
            let next = match mode {
                DisplayMode::EventLog => DisplayMode::Clock,
                DisplayMode::Clock => DisplayMode::EventLog,
            };
            handle.send(PanelCmdData::SetMode(next)).await
        }
    }
}

/// Time until the top of the next wall-clock second, floored so the loop
/// always yields.
fn until_next_second() -> Duration {
    let nanos = Local::now().timestamp_subsec_nanos() as u64;
    Duration::from_nanos(1_000_000_000u64.saturating_sub(nanos)).max(MIN_SLEEP)
}

/// Draws a centred calibration shape covering 75% of the smaller screen
/// dimension.
pub fn render_probe<D: Display>(display: &mut D, shape: &str, fill: bool) -> Result<(), Error> {
    display.start()?;
    display.clear(&theme::BLACK)?;
    display.set_color(&theme::DEBUG_TOUCH);

    let w = display.width() as f64;
    let h = display.height() as f64;
    let side = 0.75 * w.min(h);
    let rect = Rect::new((w - side) / 2.0, (h - side) / 2.0, side, side);

    match shape {
        "circle" => {
            if !fill {
                log::warn!("Circle outline is not supported, filling instead");
            }
            let pill = PillShape::new(rect.x, rect.y, side, side, side / 2.0, true, true);
            display.fill_pill(&pill)?;
        }
        other => {
            if other != "square" {
                log::warn!("Unknown probe shape {:?}, drawing a square", other);
            }
            if fill {
                display.fill_rect(&rect)?;
            } else {
                display.stroke_rect(&rect)?;
            }
        }
    }

    display.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(id: ButtonId, rect: Rect) -> ButtonDescriptor {
        ButtonDescriptor {
            id,
            text: String::new(),
            color: theme::YELLOW,
            rect,
        }
    }

    #[test]
    fn boundary_tap_hits_exactly_one_button() {
        let buttons = vec![
            desc(ButtonId::Clear, Rect::new(10.0, 10.0, 50.0, 20.0)),
            desc(ButtonId::Mode, Rect::new(65.0, 10.0, 50.0, 20.0)),
        ];
        // Bottom-right corner of the first button, inclusive.
        let pt = Point { x: 60.0, y: 30.0 };
        let hits = buttons.iter().filter(|b| b.rect.contains(&pt)).count();
        assert_eq!(hits, 1);
        assert_eq!(hit_button(&buttons, &pt).map(|b| b.id), Some(ButtonId::Clear));
    }

    #[test]
    fn miss_returns_no_button() {
        let buttons = vec![desc(ButtonId::Clear, Rect::new(10.0, 10.0, 50.0, 20.0))];
        assert!(hit_button(&buttons, &Point { x: 61.0, y: 30.0 }).is_none());
        assert!(hit_button(&[], &Point { x: 20.0, y: 20.0 }).is_none());
    }

    fn snap(mode: DisplayMode, rev: u64, relative_time: bool) -> PanelSnapshot {
        PanelSnapshot {
            rev,
            mode,
            debug: Default::default(),
            relative_time,
            messages: Vec::new(),
        }
    }

    #[test]
    fn event_log_redraws_only_on_revision_change() {
        let s = snap(DisplayMode::EventLog, 7, false);
        assert!(needs_redraw(&s, None, None, 100, false));
        assert!(needs_redraw(&s, Some(6), Some(100), 100, false));
        assert!(!needs_redraw(&s, Some(7), Some(100), 100, false));
        assert!(!needs_redraw(&s, Some(7), Some(100), 101, false));
    }

    #[test]
    fn relative_time_keeps_the_event_log_ticking() {
        let s = snap(DisplayMode::EventLog, 7, true);
        // Same second: nothing to update yet.
        assert!(!needs_redraw(&s, Some(7), Some(100), 100, false));
        // The elapsed column changes every second even without messages.
        assert!(needs_redraw(&s, Some(7), Some(100), 101, false));
    }

    #[test]
    fn clock_always_redraws() {
        let s = snap(DisplayMode::Clock, 7, false);
        assert!(needs_redraw(&s, Some(7), Some(100), 100, false));
    }

    #[test]
    fn clock_sleep_is_bounded() {
        let d = until_next_second();
        assert!(d >= MIN_SLEEP);
        assert!(d <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn mode_button_flips_the_mode() {
        let handle = PanelHandle::new(10);
        dispatch(&handle, ButtonId::Mode, DisplayMode::EventLog).await;
        let snap = handle.snapshot().await;
        assert_eq!(snap.mode, DisplayMode::Clock);

        dispatch(&handle, ButtonId::Mode, snap.mode).await;
        assert_eq!(handle.snapshot().await.mode, DisplayMode::EventLog);
    }
}
