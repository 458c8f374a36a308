//! Touch input
//!
//! Raw controller samples go through a [`GestureRecognizer`] which emits
//! discrete [`TouchEvent`]s into a bounded channel. The UI controller drains
//! at most one event per tick through the
//! [`TouchSource`](crate::peripherals::TouchSource) trait, implemented for
//! the channel receiver.

mod gesture;

pub use gesture::{
    GestureRecognizer, RawTouch, SWIPE_MIN_DISTANCE, TAP_MAX_DISTANCE, TAP_MAX_DURATION_MS,
};

use embassy_sync::channel::Channel;
use embedded_graphics::prelude::Point;

/// Capacity of the touch event queue.
pub const TOUCH_QUEUE_DEPTH: usize = 10;

/// Bounded queue between the touch producer and the UI controller.
pub type TouchChannel<M> = Channel<M, TouchEvent, TOUCH_QUEUE_DEPTH>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchKind {
    Press,
    Release,
    Tap,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
}

impl TouchKind {
    pub fn is_swipe(self) -> bool {
        matches!(
            self,
            TouchKind::SwipeLeft | TouchKind::SwipeRight | TouchKind::SwipeUp | TouchKind::SwipeDown
        )
    }
}

/// Discrete gesture produced by the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub kind: TouchKind,
    /// Screen coordinates; swipes carry the point where the finger landed
    pub point: Point,
    /// Swipe speed in pixels per 100 ms, 0 for other events
    pub velocity: i32,
}

impl TouchEvent {
    pub const fn new(kind: TouchKind, point: Point) -> Self {
        Self {
            kind,
            point,
            velocity: 0,
        }
    }

    pub const fn swipe(kind: TouchKind, point: Point, velocity: i32) -> Self {
        Self {
            kind,
            point,
            velocity,
        }
    }
}
