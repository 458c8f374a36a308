use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use embedded_graphics::prelude::Point;
use heapless::Vec;
use log::{debug, warn};

use super::{TouchEvent, TouchKind};

/// A contact shorter than this, that moved less than
/// [`TAP_MAX_DISTANCE`], is a tap.
pub const TAP_MAX_DURATION_MS: u64 = 500;
pub const TAP_MAX_DISTANCE: i32 = 5;
/// Minimum travel for a swipe.
pub const SWIPE_MIN_DISTANCE: i32 = 10;

/// One sample read from the touch controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTouch {
    pub pressed: bool,
    pub point: Point,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Clear,
    Pressed {
        first: Point,
        last: Point,
        start_ms: u64,
    },
}

/// Turns the raw contact stream into press/release/tap/swipe events.
#[derive(Debug)]
pub struct GestureRecognizer {
    state: State,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRecognizer {
    pub const fn new() -> Self {
        Self {
            state: State::Clear,
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, State::Pressed { .. })
    }

    /// Feed one sample, returning the events it completes (at most two: a
    /// release followed by a tap or a swipe).
    pub fn feed(&mut self, sample: RawTouch) -> Vec<TouchEvent, 2> {
        let mut events = Vec::new();
        match (self.state, sample.pressed) {
            (State::Clear, true) => {
                self.state = State::Pressed {
                    first: sample.point,
                    last: sample.point,
                    start_ms: sample.timestamp_ms,
                };
                let _ = events.push(TouchEvent::new(TouchKind::Press, sample.point));
            }
            (State::Pressed { first, start_ms, .. }, true) => {
                self.state = State::Pressed {
                    first,
                    last: sample.point,
                    start_ms,
                };
            }
            (
                State::Pressed {
                    first,
                    last,
                    start_ms,
                },
                false,
            ) => {
                self.state = State::Clear;
                let _ = events.push(TouchEvent::new(TouchKind::Release, last));
                if let Some(gesture) =
                    classify(first, last, sample.timestamp_ms.saturating_sub(start_ms))
                {
                    let _ = events.push(gesture);
                }
            }
            (State::Clear, false) => {}
        }
        events
    }

    /// Feed one sample and queue the resulting events without waiting.
    /// Events that do not fit in the queue are dropped.
    pub fn feed_into<M: RawMutex, const N: usize>(
        &mut self,
        sample: RawTouch,
        sender: &Sender<'_, M, TouchEvent, N>,
    ) {
        for event in self.feed(sample) {
            if sender.try_send(event).is_err() {
                warn!("touch queue full, dropping {:?}", event.kind);
            }
        }
    }
}

fn classify(first: Point, last: Point, duration_ms: u64) -> Option<TouchEvent> {
    let delta = last - first;
    let distance = int_distance(delta.x, delta.y);
    let velocity = (distance * 100 / duration_ms.max(1) as i64) as i32;

    if duration_ms < TAP_MAX_DURATION_MS && distance < TAP_MAX_DISTANCE as i64 {
        debug!("tap at {},{}", first.x, first.y);
        return Some(TouchEvent::new(TouchKind::Tap, first));
    }
    if distance < SWIPE_MIN_DISTANCE as i64 {
        return None;
    }

    let kind = if delta.x.abs() > delta.y.abs() {
        if delta.x > 0 {
            TouchKind::SwipeRight
        } else {
            TouchKind::SwipeLeft
        }
    } else if delta.y.abs() > delta.x.abs() {
        if delta.y > 0 {
            TouchKind::SwipeDown
        } else {
            TouchKind::SwipeUp
        }
    } else {
        // Perfect diagonal, no dominant axis
        return None;
    };
    debug!("{:?}, velocity {}", kind, velocity);
    Some(TouchEvent::swipe(kind, first, velocity))
}

/// Integer Euclidean distance, truncated.
fn int_distance(dx: i32, dy: i32) -> i64 {
    let squared = (dx as i64) * (dx as i64) + (dy as i64) * (dy as i64);
    if squared < 2 {
        return squared;
    }
    let mut x = squared;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + squared / x) / 2;
    }
    x
}
