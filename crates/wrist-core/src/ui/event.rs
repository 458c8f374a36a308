// src/ui/event.rs
//! Handles, events and notifications shared by tiles, widgets and the
//! controller.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

use crate::input::TouchKind;
use crate::ui::widgets::SwitchState;

/// Handle to a tile owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub(crate) usize);

impl TileId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a widget owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub(crate) usize);

impl WidgetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a widget asks for when its handler fires.
///
/// Navigation actions are carried out by the controller; every action is
/// also reported to the application as a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Application-defined, only reported.
    Custom(u16),
    /// Make the tile current without animation.
    SelectTile(TileId),
    /// Slide back to the default tile.
    GoHome,
    /// Dismiss the modal tile.
    CloseModal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    Press,
    Release,
    Tap,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    /// Sent by a listbox to the child being selected.
    Select,
    /// Sent by a listbox to the previously selected child.
    Deselect,
}

impl From<TouchKind> for WidgetEvent {
    fn from(kind: TouchKind) -> Self {
        match kind {
            TouchKind::Press => WidgetEvent::Press,
            TouchKind::Release => WidgetEvent::Release,
            TouchKind::Tap => WidgetEvent::Tap,
            TouchKind::SwipeLeft => WidgetEvent::SwipeLeft,
            TouchKind::SwipeRight => WidgetEvent::SwipeRight,
            TouchKind::SwipeUp => WidgetEvent::SwipeUp,
            TouchKind::SwipeDown => WidgetEvent::SwipeDown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEvent {
    /// The tile became current.
    Enter,
    /// The tile stopped being current.
    Exit,
    /// Side button pressed while the tile is current.
    UserButton,
    /// The modal tile is being dismissed.
    ModalClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Tapped,
    Switched(SwitchState),
    ValueChanged(i32),
    Selected(WidgetId),
}

/// A widget handler firing, queued for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub widget: WidgetId,
    pub action: Action,
    pub kind: NotificationKind,
}

/// Upper bound on handler firings produced by a single event.
pub(crate) const PENDING_DEPTH: usize = 8;

pub(crate) type Pending = Vec<Notification, PENDING_DEPTH>;

/// What a widget gets to see while handling one event.
pub struct EventContext<'a> {
    widget: WidgetId,
    bounds: Rectangle,
    velocity: i32,
    handler: Option<Action>,
    pending: &'a mut Pending,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(
        widget: WidgetId,
        bounds: Rectangle,
        velocity: i32,
        handler: Option<Action>,
        pending: &'a mut Pending,
    ) -> Self {
        Self {
            widget,
            bounds,
            velocity,
            handler,
            pending,
        }
    }

    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    /// Absolute box of the widget on screen.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    /// Widget-relative position of a screen point.
    pub fn local(&self, point: Point) -> Point {
        point - self.bounds.top_left
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Fire the widget's handler, if any.
    pub fn notify(&mut self, kind: NotificationKind) {
        if let Some(action) = self.handler {
            let notification = Notification {
                widget: self.widget,
                action,
                kind,
            };
            if self.pending.push(notification).is_err() {
                log::warn!("dropping notification from widget {}", self.widget.0);
            }
        }
    }
}
