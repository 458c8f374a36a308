// src/ui/widgets/listbox.rs
//! Scrollable vertical list
//!
//! A listbox stacks its children top to bottom inside a viewport and scrolls
//! them with a momentum ("fling") model:
//!
//! - a vertical swipe starts `Moving` with the swipe velocity as speed
//! - every drawn frame decays the speed by [`FLING_DECAY`] and moves the
//!   content by a quarter of it, clamped to the scrollable range
//! - hitting either end of the range or dropping below [`FLING_STOP_SPEED`]
//!   ends the fling
//! - touching down during a fling stops it; the tap produced by that touch
//!   is swallowed so it does not select anything
//!
//! Child routing and selection bookkeeping that needs the widget arena is
//! done by the controller, driven by [`Listbox::route`].

use alloc::vec::Vec;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::scrollbar::{Orientation, Scrollbar};
use crate::graphics::{Canvas, Color};
use crate::ui::event::{WidgetEvent, WidgetId};
use crate::ui::style::WidgetStyle;

pub const SCROLLBAR_WIDTH: i32 = 8;
/// Gap between the viewport edge and the stacked children.
pub const ITEM_MARGIN: i32 = 2;
pub const FLING_DECAY: f32 = 0.98;
pub const FLING_STOP_SPEED: f32 = 0.5;

const SCROLLBAR_STYLE: WidgetStyle = WidgetStyle::new(Color::BLACK, Color::GRAY, Color::WHITE);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollState {
    #[default]
    Idle,
    /// Fling started, first frame not drawn yet
    Moving,
    MovingFree,
    /// Fling halted by a touch that has not been lifted yet
    Stopped,
}

/// How the controller should route an event the listbox received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListRoute {
    /// Handled by the listbox itself
    Consumed,
    /// Not for this listbox
    Ignored,
    /// Deliver to the child under the point
    Forward,
    /// Deliver to every child
    Broadcast,
    /// Select the child under the point
    Select,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Listbox {
    children: Vec<WidgetId>,
    selected: Option<WidgetId>,
    state: ScrollState,
    speed: f32,
    offset: f32,
    content_height: i32,
    swallow_tap: bool,
    scrollbar: Scrollbar,
}

impl Listbox {
    pub fn new() -> Self {
        Self {
            scrollbar: Scrollbar::new(Orientation::Vertical),
            content_height: ITEM_MARGIN,
            ..Self::default()
        }
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn selected(&self) -> Option<WidgetId> {
        self.selected
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Current scroll offset, zero or negative.
    pub fn offset(&self) -> i32 {
        self.offset as i32
    }

    pub fn content_height(&self) -> i32 {
        self.content_height
    }

    /// Area children are drawn in, relative to the listbox.
    pub fn viewport(size: Size) -> Rectangle {
        Rectangle::new(
            Point::new(1, 1),
            Size::new(
                (size.width as i32 - 2 - SCROLLBAR_WIDTH).max(0) as u32,
                size.height.saturating_sub(2),
            ),
        )
    }

    fn scrollbar_area(size: Size) -> Rectangle {
        Rectangle::new(
            Point::new(size.width as i32 - 1 - SCROLLBAR_WIDTH, 1),
            Size::new(SCROLLBAR_WIDTH as u32, size.height.saturating_sub(2)),
        )
    }

    /// Lowest valid offset for a viewport of `viewport_height` pixels.
    fn min_offset(&self, viewport_height: i32) -> f32 {
        -((self.content_height - viewport_height).max(0) as f32)
    }

    // ------------------------------------------------------------------
    // Children bookkeeping
    // ------------------------------------------------------------------

    /// Append a child of `height` pixels; returns its box relative to the
    /// viewport.
    pub(crate) fn push(&mut self, child: WidgetId, size: Size, height: u32) -> Rectangle {
        let width = (Self::viewport(size).size.width as i32 - 2 * ITEM_MARGIN).max(0) as u32;
        let slot = Rectangle::new(
            Point::new(ITEM_MARGIN, self.content_height),
            Size::new(width, height),
        );
        self.children.push(child);
        self.content_height += height as i32;
        slot
    }

    /// Drop a child; the caller restacks the remaining ones.
    pub(crate) fn remove(&mut self, child: WidgetId) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != child);
        if self.selected == Some(child) {
            self.selected = None;
        }
        before != self.children.len()
    }

    /// Restart the stacking cursor; the caller re-pushes heights with
    /// [`restack_next`](Self::restack_next).
    pub(crate) fn restack_begin(&mut self) {
        self.content_height = ITEM_MARGIN;
    }

    pub(crate) fn restack_next(&mut self, height: u32) -> i32 {
        let y = self.content_height;
        self.content_height += height as i32;
        y
    }

    /// Record `child` as selected, returning the previous selection if it
    /// has to be deselected.
    pub(crate) fn select(&mut self, child: WidgetId) -> Option<WidgetId> {
        let previous = self.selected.replace(child);
        previous.filter(|&p| p != child)
    }

    // ------------------------------------------------------------------
    // Fling
    // ------------------------------------------------------------------

    /// Start a fling; positive speed scrolls the content up.
    pub fn fling(&mut self, speed: f32) {
        self.speed = speed;
        self.state = ScrollState::Moving;
    }

    /// Advance the fling by one frame.
    pub fn animate(&mut self, viewport_height: i32) {
        let min = self.min_offset(viewport_height);
        match self.state {
            ScrollState::Moving | ScrollState::MovingFree => {
                self.state = ScrollState::MovingFree;
                self.speed *= FLING_DECAY;
                self.offset -= self.speed / 4.0;

                if self.offset <= min {
                    self.offset = min;
                    self.stop();
                } else if self.offset >= 0.0 {
                    self.offset = 0.0;
                    self.stop();
                } else if self.speed.abs() < FLING_STOP_SPEED {
                    self.stop();
                }
            }
            ScrollState::Idle | ScrollState::Stopped => {
                // Content may have shrunk since the last frame
                self.offset = self.offset.clamp(min, 0.0);
            }
        }
    }

    fn stop(&mut self) {
        self.speed = 0.0;
        self.state = ScrollState::Idle;
    }

    /// Decide how `event` is handled. Scroll state changes happen here.
    pub(crate) fn route(&mut self, event: WidgetEvent, velocity: i32) -> ListRoute {
        match event {
            WidgetEvent::SwipeUp => {
                self.fling(velocity as f32);
                ListRoute::Consumed
            }
            WidgetEvent::SwipeDown => {
                self.fling(-(velocity as f32));
                ListRoute::Consumed
            }
            WidgetEvent::Press => {
                self.swallow_tap = false;
                match self.state {
                    ScrollState::Moving | ScrollState::MovingFree => {
                        self.speed = 0.0;
                        self.state = ScrollState::Stopped;
                        ListRoute::Consumed
                    }
                    _ => ListRoute::Forward,
                }
            }
            WidgetEvent::Release => {
                if self.state == ScrollState::Stopped {
                    self.state = ScrollState::Idle;
                    self.swallow_tap = true;
                }
                ListRoute::Broadcast
            }
            WidgetEvent::Tap => {
                if core::mem::take(&mut self.swallow_tap) {
                    ListRoute::Consumed
                } else {
                    ListRoute::Select
                }
            }
            WidgetEvent::SwipeLeft
            | WidgetEvent::SwipeRight
            | WidgetEvent::Select
            | WidgetEvent::Deselect => ListRoute::Ignored,
        }
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Advance the fling and sync the scrollbar; called once per frame
    /// before the children are drawn.
    pub(crate) fn prepare_frame(&mut self, size: Size) {
        let viewport = Self::viewport(size).size.height as i32;
        self.animate(viewport);
        self.scrollbar.set_viewport(viewport);
        self.scrollbar
            .configure(0, (self.content_height - viewport).max(0), -self.offset());
    }

    pub(crate) fn draw_background(&self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        canvas.fill_region(1, 1, size.width as i32 - 2, size.height as i32 - 2, style.background);
    }

    pub(crate) fn draw_chrome(&self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        let area = Self::scrollbar_area(size);
        let origin = canvas.origin() + area.top_left;
        let mut bar = Canvas::new(canvas.surface(), origin);
        self.scrollbar.draw(&mut bar, area.size, &SCROLLBAR_STYLE);
        canvas.draw_border(size.width as i32, size.height as i32, style.border);
    }
}
