// src/ui/tile.rs
//! Tiles
//!
//! A tile is a page of the UI. Main tiles are linked left/right into a
//! ring; secondary tiles hang below a main tile through top/bottom links.
//! Linking always sets both ends of the edge.

use alloc::boxed::Box;
use alloc::vec::Vec;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::EventResult;
use crate::graphics::{Canvas, Color};
use crate::ui::event::{TileEvent, TileId, WidgetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileKind {
    #[default]
    Main,
    Secondary,
}

/// Directional neighbors of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileLinks {
    pub left: Option<TileId>,
    pub right: Option<TileId>,
    pub top: Option<TileId>,
    pub bottom: Option<TileId>,
}

/// Application hooks attached to a tile.
pub trait TileHandler {
    /// Lifecycle and button notifications.
    fn on_event(&mut self, _event: TileEvent) -> EventResult {
        EventResult::Unprocessed
    }

    /// Custom drawing, after the background fill and before the widgets.
    fn draw(&mut self, _canvas: &mut Canvas<'_>) {}
}

pub struct Tile {
    pub(crate) offset: Point,
    size: Size,
    background: Color,
    kind: TileKind,
    pub(crate) links: TileLinks,
    /// Modal tiles are framed with this color
    pub(crate) frame: Option<Color>,
    /// Top-level widgets in drawing order
    pub(crate) widgets: Vec<WidgetId>,
    pub(crate) handler: Option<Box<dyn TileHandler>>,
}

impl Default for Tile {
    fn default() -> Self {
        Self::new()
    }
}

impl Tile {
    /// Full-screen main tile with a black background.
    pub fn new() -> Self {
        Self {
            offset: Point::zero(),
            size: Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            background: Color::BLACK,
            kind: TileKind::Main,
            links: TileLinks::default(),
            frame: None,
            widgets: Vec::new(),
            handler: None,
        }
    }

    /// Bordered dialog tile placed at `(x, y)` on screen.
    pub fn modal(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            offset: Point::new(x, y),
            size: Size::new(width, height),
            frame: Some(Color::WHITE),
            ..Self::new()
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_handler(mut self, handler: impl TileHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn set_handler(&mut self, handler: impl TileHandler + 'static) {
        self.handler = Some(Box::new(handler));
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn links(&self) -> TileLinks {
        self.links
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_modal(&self) -> bool {
        self.frame.is_some()
    }

    /// Screen area covered at the current offset.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.offset, self.size)
    }

    pub fn widgets(&self) -> &[WidgetId] {
        &self.widgets
    }

    pub(crate) fn send_event(&mut self, event: TileEvent) -> EventResult {
        match self.handler.as_mut() {
            Some(handler) => handler.on_event(event),
            None => EventResult::Unprocessed,
        }
    }

    /// Fill, frame, then the handler's own drawing. Widgets are drawn by
    /// the controller afterwards.
    pub(crate) fn draw_base(&mut self, canvas: &mut Canvas<'_>) {
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        canvas.fill_region(0, 0, w, h, self.background);
        if let Some(frame) = self.frame {
            canvas.draw_border(w, h, frame);
        }
        if let Some(handler) = self.handler.as_mut() {
            handler.draw(canvas);
        }
    }
}

// ----------------------------------------------------------------------
// Linking
// ----------------------------------------------------------------------

/// Link `b` to the right of `a`.
pub(crate) fn link_right(tiles: &mut [Tile], a: TileId, b: TileId) {
    tiles[a.0].links.right = Some(b);
    tiles[b.0].links.left = Some(a);
}

/// Link `b` to the left of `a`.
pub(crate) fn link_left(tiles: &mut [Tile], a: TileId, b: TileId) {
    link_right(tiles, b, a);
}

/// Hang `b` below `a`; `b` becomes secondary.
pub(crate) fn link_bottom(tiles: &mut [Tile], a: TileId, b: TileId) {
    tiles[a.0].links.bottom = Some(b);
    tiles[b.0].links.top = Some(a);
    tiles[b.0].kind = TileKind::Secondary;
}

/// Put `b` above `a`; `a` becomes secondary.
pub(crate) fn link_top(tiles: &mut [Tile], a: TileId, b: TileId) {
    link_bottom(tiles, b, a);
}

/// Main tile owning `tile`, following top links through secondary tiles.
pub(crate) fn main_tile_of(tiles: &[Tile], tile: TileId) -> TileId {
    let mut current = tile;
    // Bounded in case links form a cycle
    for _ in 0..tiles.len() {
        let t = &tiles[current.0];
        match (t.kind, t.links.top) {
            (TileKind::Secondary, Some(top)) => current = top,
            _ => break,
        }
    }
    current
}
