//! Decoding of raw evdev events into assembled touch samples.

use crate::{TouchPhase, TouchSample};

const EV_SYN: u16 = 0x00;
const EV_KEY: u16 = 0x01;
const EV_ABS: u16 = 0x03;

const ABS_X: u16 = 0x00;
const ABS_Y: u16 = 0x01;
const BTN_TOUCH: u16 = 0x14a;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EvKind {
    Sync,
    Touch { pressed: bool },
    AbsX(i32),
    AbsY(i32),
    Other,
}

#[derive(Debug)]
pub(crate) struct Event {
    pub useconds: i64,
    pub kind: EvKind,
}

impl From<evdev::raw::input_event> for Event {
    fn from(ie: evdev::raw::input_event) -> Self {
        let kind = match (ie._type, ie.code) {
            (EV_SYN, _) => EvKind::Sync,
            (EV_KEY, BTN_TOUCH) => EvKind::Touch {
                pressed: ie.value != 0,
            },
            (EV_ABS, ABS_X) => EvKind::AbsX(ie.value),
            (EV_ABS, ABS_Y) => EvKind::AbsY(ie.value),
            _ => EvKind::Other,
        };

        Event {
            useconds: ie.time.tv_sec as i64 * 1_000_000 + ie.time.tv_usec as i64,
            kind,
        }
    }
}

/// Folds the per-axis event stream into whole samples. Coordinates and the
/// contact state arrive as separate events within one sync frame, so a
/// sample is only emitted when the frame closes.
#[derive(Debug, Default)]
pub(crate) struct TouchAssembler {
    x: Option<i32>,
    y: Option<i32>,
    down: bool,
    edge: Option<bool>,
    moved: bool,
}

impl TouchAssembler {
    pub(crate) fn feed(&mut self, event: &Event, out: &mut Vec<TouchSample>) {
        match event.kind {
            EvKind::AbsX(v) => {
                self.x = Some(v);
                self.moved = true;
            }
            EvKind::AbsY(v) => {
                self.y = Some(v);
                self.moved = true;
            }
            EvKind::Touch { pressed } => self.edge = Some(pressed),
            EvKind::Sync => self.close_frame(out),
            EvKind::Other => (),
        }
    }

    fn close_frame(&mut self, out: &mut Vec<TouchSample>) {
        let edge = self.edge.take();
        let moved = self.moved;
        self.moved = false;

        let pos = match (self.x, self.y) {
            (Some(x), Some(y)) => Some((x as f64, y as f64)),
            _ => None,
        };

        match edge {
            Some(true) => {
                self.down = true;
                if let Some((x, y)) = pos {
                    out.push(TouchSample {
                        x,
                        y,
                        phase: TouchPhase::Down,
                    });
                }
            }
            Some(false) => {
                self.down = false;
                if let Some((x, y)) = pos {
                    out.push(TouchSample {
                        x,
                        y,
                        phase: TouchPhase::Up,
                    });
                }
            }
            None => {
                if self.down && moved {
                    if let Some((x, y)) = pos {
                        out.push(TouchSample {
                            x,
                            y,
                            phase: TouchPhase::Move,
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: EvKind) -> Event {
        Event { useconds: 0, kind }
    }

    fn feed_all(events: &[EvKind]) -> Vec<TouchSample> {
        let mut asm = TouchAssembler::default();
        let mut out = Vec::new();
        for &k in events {
            asm.feed(&ev(k), &mut out);
        }
        out
    }

    #[test]
    fn down_move_up_sequence() {
        let out = feed_all(&[
            EvKind::AbsX(100),
            EvKind::AbsY(200),
            EvKind::Touch { pressed: true },
            EvKind::Sync,
            EvKind::AbsX(110),
            EvKind::Sync,
            EvKind::Touch { pressed: false },
            EvKind::Sync,
        ]);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].phase, TouchPhase::Down);
        assert_eq!((out[0].x, out[0].y), (100.0, 200.0));
        assert_eq!(out[1].phase, TouchPhase::Move);
        assert_eq!((out[1].x, out[1].y), (110.0, 200.0));
        assert_eq!(out[2].phase, TouchPhase::Up);
    }

    #[test]
    fn down_is_emitted_exactly_once_per_contact() {
        let out = feed_all(&[
            EvKind::AbsX(10),
            EvKind::AbsY(20),
            EvKind::Touch { pressed: true },
            EvKind::Sync,
            EvKind::AbsX(10),
            EvKind::AbsY(20),
            EvKind::Sync,
        ]);

        let downs = out
            .iter()
            .filter(|s| s.phase == TouchPhase::Down)
            .count();
        assert_eq!(downs, 1);
    }

    #[test]
    fn frames_without_coordinates_emit_nothing() {
        let out = feed_all(&[EvKind::Touch { pressed: true }, EvKind::Sync, EvKind::Sync]);
        assert!(out.is_empty());
    }
}
