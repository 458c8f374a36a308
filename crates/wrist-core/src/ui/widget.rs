// src/ui/widget.rs
//! Widget base
//!
//! A [`Widget`] is a box, a style, an optional handler [`Action`] and one of
//! the variants in [`WidgetKind`]. Widgets are stored in the controller's
//! arena; the box is relative to whatever owns the widget (see [`Owner`]).

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::error::EventResult;
use crate::graphics::{Canvas, Color, Image};
use crate::ui::event::{Action, EventContext, TileId, WidgetEvent, WidgetId};
use crate::ui::style::{BUTTON_TEXT, WidgetStyle};
use crate::ui::widgets::{
    Button, Container, Frame, ImageView, Label, Listbox, Orientation, Progress, Scrollbar, Slider,
    Spinner, Switch,
};

/// Where a widget's box is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// Absolute screen coordinates
    Floating,
    /// Relative to the tile's current offset
    Tile(TileId),
    /// Relative to a container or listbox content area
    Parent(WidgetId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Button(Button),
    Switch(Switch),
    Slider(Slider),
    Label(Label),
    Progress(Progress),
    Spinner(Spinner),
    Frame(Frame),
    Image(ImageView),
    Container(Container),
    Listbox(Listbox),
    Scrollbar(Scrollbar),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub(crate) owner: Owner,
    bounds: Rectangle,
    style: WidgetStyle,
    handler: Option<Action>,
    kind: WidgetKind,
}

impl Widget {
    pub fn new(bounds: Rectangle, kind: WidgetKind) -> Self {
        let style = match kind {
            WidgetKind::Button(_) => WidgetStyle {
                front: BUTTON_TEXT,
                ..WidgetStyle::default()
            },
            _ => WidgetStyle::default(),
        };
        Self {
            owner: Owner::Floating,
            bounds,
            style,
            handler: None,
            kind,
        }
    }

    pub fn button(bounds: Rectangle, text: &str) -> Self {
        Self::new(bounds, WidgetKind::Button(Button::new(text)))
    }

    pub fn switch(bounds: Rectangle) -> Self {
        Self::new(bounds, WidgetKind::Switch(Switch::new()))
    }

    pub fn slider(bounds: Rectangle) -> Self {
        Self::new(bounds, WidgetKind::Slider(Slider::new()))
    }

    pub fn label(bounds: Rectangle, text: &str) -> Self {
        Self::new(bounds, WidgetKind::Label(Label::new(text)))
    }

    pub fn progress(bounds: Rectangle) -> Self {
        Self::new(bounds, WidgetKind::Progress(Progress::new()))
    }

    pub fn spinner(bounds: Rectangle) -> Self {
        Self::new(bounds, WidgetKind::Spinner(Spinner::new()))
    }

    pub fn frame(bounds: Rectangle) -> Self {
        Self::new(bounds, WidgetKind::Frame(Frame))
    }

    pub fn image(bounds: Rectangle, image: Image<'static>) -> Self {
        Self::new(bounds, WidgetKind::Image(ImageView::new(image)))
    }

    pub fn container(bounds: Rectangle) -> Self {
        Self::new(bounds, WidgetKind::Container(Container::new()))
    }

    pub fn listbox(bounds: Rectangle) -> Self {
        Self::new(bounds, WidgetKind::Listbox(Listbox::new()))
    }

    pub fn scrollbar(bounds: Rectangle, orientation: Orientation) -> Self {
        Self::new(bounds, WidgetKind::Scrollbar(Scrollbar::new(orientation)))
    }

    pub fn with_handler(mut self, action: Action) -> Self {
        self.handler = Some(action);
        self
    }

    pub fn with_style(mut self, style: WidgetStyle) -> Self {
        self.style = style;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Box relative to the owner.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rectangle) {
        self.bounds = bounds;
    }

    pub fn style(&self) -> &WidgetStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: WidgetStyle) {
        self.style = style;
    }

    pub fn set_bg_color(&mut self, color: Color) {
        self.style.background = color;
    }

    pub fn set_border_color(&mut self, color: Color) {
        self.style.border = color;
    }

    pub fn set_front_color(&mut self, color: Color) {
        self.style.front = color;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.style.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.style.visible
    }

    pub fn handler(&self) -> Option<Action> {
        self.handler
    }

    pub fn set_handler(&mut self, action: Option<Action>) {
        self.handler = action;
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut WidgetKind {
        &mut self.kind
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match &mut self.kind {
            WidgetKind::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_switch_mut(&mut self) -> Option<&mut Switch> {
        match &mut self.kind {
            WidgetKind::Switch(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_slider_mut(&mut self) -> Option<&mut Slider> {
        match &mut self.kind {
            WidgetKind::Slider(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_label_mut(&mut self) -> Option<&mut Label> {
        match &mut self.kind {
            WidgetKind::Label(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_progress_mut(&mut self) -> Option<&mut Progress> {
        match &mut self.kind {
            WidgetKind::Progress(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_scrollbar_mut(&mut self) -> Option<&mut Scrollbar> {
        match &mut self.kind {
            WidgetKind::Scrollbar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageView> {
        match &mut self.kind {
            WidgetKind::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_listbox(&self) -> Option<&Listbox> {
        match &self.kind {
            WidgetKind::Listbox(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match &self.kind {
            WidgetKind::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.kind {
            WidgetKind::Container(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn as_listbox_mut(&mut self) -> Option<&mut Listbox> {
        match &mut self.kind {
            WidgetKind::Listbox(l) => Some(l),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Draw the widget's own content in local coordinates. Children of
    /// containers and listboxes are drawn by the controller.
    pub(crate) fn draw(&mut self, canvas: &mut Canvas<'_>) {
        let size = self.bounds.size;
        let style = &self.style;
        match &mut self.kind {
            WidgetKind::Button(b) => b.draw(canvas, size, style),
            WidgetKind::Switch(s) => s.draw(canvas, size, style),
            WidgetKind::Slider(s) => s.draw(canvas, size, style),
            WidgetKind::Label(l) => l.draw(canvas, size, style),
            WidgetKind::Progress(p) => p.draw(canvas, size, style),
            WidgetKind::Spinner(s) => s.draw(canvas, size, style),
            WidgetKind::Frame(f) => f.draw(canvas, size, style),
            WidgetKind::Image(i) => i.draw(canvas, size),
            WidgetKind::Container(c) => c.draw(canvas, size, style),
            WidgetKind::Listbox(l) => l.draw_background(canvas, size, style),
            WidgetKind::Scrollbar(s) => s.draw(canvas, size, style),
        }
    }

    /// Deliver an event to a leaf widget. Containers and listboxes report
    /// `Unprocessed` here; their routing needs the arena.
    pub(crate) fn handle_event(
        &mut self,
        event: WidgetEvent,
        point: Point,
        ctx: &mut EventContext<'_>,
    ) -> EventResult {
        match &mut self.kind {
            WidgetKind::Button(b) => b.handle_event(event, ctx),
            WidgetKind::Switch(s) => s.handle_event(event, ctx),
            WidgetKind::Slider(s) => s.handle_event(event, point, ctx),
            WidgetKind::Label(l) => l.handle_event(event),
            WidgetKind::Progress(_)
            | WidgetKind::Spinner(_)
            | WidgetKind::Frame(_)
            | WidgetKind::Image(_)
            | WidgetKind::Scrollbar(_)
            | WidgetKind::Container(_)
            | WidgetKind::Listbox(_) => EventResult::Unprocessed,
        }
    }
}
