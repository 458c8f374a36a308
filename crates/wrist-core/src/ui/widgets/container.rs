use alloc::vec::Vec;

use embedded_graphics::prelude::*;

use crate::graphics::Canvas;
use crate::ui::event::WidgetId;
use crate::ui::style::WidgetStyle;

/// Groups child widgets; children are positioned relative to the
/// container's top-left corner shifted by its scroll offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    children: Vec<WidgetId>,
    scroll: Point,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    pub(crate) fn push(&mut self, child: WidgetId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove(&mut self, child: WidgetId) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != child);
        before != self.children.len()
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        canvas.fill_region(0, 0, size.width as i32, size.height as i32, style.background);
    }
}
