//! Tile and widget UI
//!
//! The [`UiController`] owns every tile and widget in two arenas and hands
//! out [`TileId`] / [`WidgetId`] handles. Tiles are full-screen pages linked
//! into a horizontal ring of main tiles with optional vertical stacks of
//! secondary tiles; widgets belong to a tile, to a container widget, or to
//! nothing at all.
//!
//! Each call to [`UiController::process_events`] consumes at most one touch
//! event, advances any page transition, redraws the frame and commits it to
//! the display.

pub mod controller;
pub mod event;
pub mod style;
pub mod tile;
pub mod widget;
pub mod widgets;

pub use controller::{NavState, ScreenMode, UiController};
pub use event::{
    Action, EventContext, Notification, NotificationKind, TileEvent, TileId, WidgetEvent,
    WidgetId,
};
pub use style::WidgetStyle;
pub use tile::{Tile, TileHandler, TileKind, TileLinks};
pub use widget::{Owner, Widget, WidgetKind};
