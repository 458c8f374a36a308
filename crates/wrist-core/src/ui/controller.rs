// src/ui/controller.rs
//! UI controller
//!
//! Owns the framebuffer, the tile and widget arenas and the navigation state
//! machine. The driving loop calls [`UiController::process_events`] once per
//! tick; each tick:
//!
//! 1. runs the eco-mode timers (dim, then deep sleep)
//! 2. handles a side button press
//! 3. consumes at most one touch event
//! 4. advances the page transition, if any
//! 5. redraws and commits the frame
//!
//! # Navigation
//!
//! | gesture     | state         | target                                   |
//! |-------------|---------------|------------------------------------------|
//! | swipe right | `MovingLeft`  | left neighbor of the current main tile   |
//! | swipe left  | `MovingRight` | right neighbor of the current main tile  |
//! | swipe down  | `MovingUp`    | top neighbor of the current tile         |
//! | swipe up    | `MovingDown`  | bottom neighbor of the current tile      |
//!
//! Swipes are offered to widgets first and only start a transition when
//! nothing claims them, the controller is idle and no modal is shown.
//! Press, release and tap are forwarded to widgets even mid-transition.

use alloc::vec::Vec;

use embassy_time::Instant;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Deque;
use log::{debug, info, warn};

use crate::config::UiConfig;
use crate::error::{EventResult, UiError, UiResult};
use crate::graphics::{Canvas, PixelSurface};
use crate::input::{TouchEvent, TouchKind};
use crate::peripherals::{Board, DisplaySink, SleepControl};
use crate::ui::event::{
    Action, EventContext, Notification, NotificationKind, Pending, TileEvent, TileId,
    WidgetEvent, WidgetId,
};
use crate::ui::tile::{self, Tile, TileKind};
use crate::ui::widget::{Owner, Widget, WidgetKind};
use crate::ui::widgets::{ListRoute, Listbox};

/// Notifications kept for the application before the oldest is dropped.
pub const NOTIFICATION_QUEUE_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Idle,
    MovingLeft,
    MovingRight,
    MovingUp,
    MovingDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenMode {
    #[default]
    Normal,
    Dimmed,
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: TileId,
    to: TileId,
}

#[derive(Debug, Default)]
struct EcoState {
    enabled: bool,
    mode: ScreenMode,
    deadline: Option<Instant>,
    usb_plugged: bool,
}

pub struct UiController {
    config: UiConfig,
    surface: PixelSurface,
    tiles: Vec<Tile>,
    widgets: Vec<Widget>,
    current: Option<TileId>,
    default: Option<TileId>,
    modal: Option<TileId>,
    state: NavState,
    transition: Option<Transition>,
    eco: EcoState,
    sleeping: bool,
    outbox: Deque<Notification, NOTIFICATION_QUEUE_DEPTH>,
}

impl UiController {
    pub fn new(config: UiConfig) -> Self {
        let surface = PixelSurface::from_config(&config);
        let eco = EcoState {
            enabled: config.eco_mode,
            ..EcoState::default()
        };
        Self {
            config,
            surface,
            tiles: Vec::new(),
            widgets: Vec::new(),
            current: None,
            default: None,
            modal: None,
            state: NavState::Idle,
            transition: None,
            eco,
            sleeping: false,
            outbox: Deque::new(),
        }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut PixelSurface {
        &mut self.surface
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    // ------------------------------------------------------------------
    // Tiles
    // ------------------------------------------------------------------

    pub fn add_tile(&mut self, tile: Tile) -> TileId {
        self.tiles.push(tile);
        TileId(self.tiles.len() - 1)
    }

    fn check_tile(&self, id: TileId) -> UiResult<()> {
        if id.0 < self.tiles.len() {
            Ok(())
        } else {
            Err(UiError::UnknownTile(id.0))
        }
    }

    pub fn tile(&self, id: TileId) -> UiResult<&Tile> {
        self.tiles.get(id.0).ok_or(UiError::UnknownTile(id.0))
    }

    pub fn tile_mut(&mut self, id: TileId) -> UiResult<&mut Tile> {
        self.tiles.get_mut(id.0).ok_or(UiError::UnknownTile(id.0))
    }

    fn check_pair(&self, a: TileId, b: TileId) -> UiResult<()> {
        self.check_tile(a)?;
        self.check_tile(b)?;
        if a == b {
            return Err(UiError::InvalidArgument("cannot link a tile to itself"));
        }
        Ok(())
    }

    /// `b` becomes the right neighbor of `a`.
    pub fn link_right(&mut self, a: TileId, b: TileId) -> UiResult<()> {
        self.check_pair(a, b)?;
        tile::link_right(&mut self.tiles, a, b);
        Ok(())
    }

    /// `b` becomes the left neighbor of `a`.
    pub fn link_left(&mut self, a: TileId, b: TileId) -> UiResult<()> {
        self.check_pair(a, b)?;
        tile::link_left(&mut self.tiles, a, b);
        Ok(())
    }

    /// `b` hangs below `a` and becomes secondary.
    pub fn link_bottom(&mut self, a: TileId, b: TileId) -> UiResult<()> {
        self.check_pair(a, b)?;
        tile::link_bottom(&mut self.tiles, a, b);
        Ok(())
    }

    /// `b` sits above `a`; `a` becomes secondary.
    pub fn link_top(&mut self, a: TileId, b: TileId) -> UiResult<()> {
        self.check_pair(a, b)?;
        tile::link_top(&mut self.tiles, a, b);
        Ok(())
    }

    pub fn current_tile(&self) -> Option<TileId> {
        self.current
    }

    pub fn default_tile(&self) -> Option<TileId> {
        self.default
    }

    pub fn set_default_tile(&mut self, id: TileId) -> UiResult<()> {
        self.check_tile(id)?;
        self.default = Some(id);
        Ok(())
    }

    /// Make `id` current immediately. A running transition is abandoned.
    pub fn select_tile(&mut self, id: TileId) -> UiResult<()> {
        self.check_tile(id)?;
        if let Some(t) = self.transition.take() {
            self.tiles[t.from.0].offset = Point::zero();
            self.tiles[t.to.0].offset = Point::zero();
            self.state = NavState::Idle;
        }
        self.tiles[id.0].offset = Point::zero();

        if self.current == Some(id) {
            return Ok(());
        }
        if let Some(old) = self.current {
            self.send_tile_event(old, TileEvent::Exit)?;
        }
        self.current = Some(id);
        self.send_tile_event(id, TileEvent::Enter)?;
        debug!("tile {} selected", id.0);
        Ok(())
    }

    pub fn send_tile_event(&mut self, id: TileId, event: TileEvent) -> UiResult<EventResult> {
        self.check_tile(id)?;
        Ok(self.tiles[id.0].send_event(event))
    }

    // ------------------------------------------------------------------
    // Modal
    // ------------------------------------------------------------------

    pub fn modal(&self) -> Option<TileId> {
        self.modal
    }

    /// Show `id` above the current tile. It receives all touch input until
    /// [`unset_modal`](Self::unset_modal).
    pub fn set_modal(&mut self, id: TileId) -> UiResult<()> {
        self.check_tile(id)?;
        if self.modal == Some(id) {
            return Ok(());
        }
        self.unset_modal();
        self.modal = Some(id);
        self.tiles[id.0].send_event(TileEvent::Enter);
        info!("modal {} shown", id.0);
        Ok(())
    }

    pub fn unset_modal(&mut self) {
        if let Some(id) = self.modal {
            self.tiles[id.0].send_event(TileEvent::ModalClose);
            self.modal = None;
            info!("modal {} closed", id.0);
        }
    }

    // ------------------------------------------------------------------
    // Widgets
    // ------------------------------------------------------------------

    /// Register a widget, owned by `tile` or floating when `None`.
    pub fn add_widget(&mut self, tile: Option<TileId>, mut widget: Widget) -> UiResult<WidgetId> {
        let id = WidgetId(self.widgets.len());
        widget.owner = match tile {
            Some(t) => {
                self.check_tile(t)?;
                self.tiles[t.0].widgets.push(id);
                Owner::Tile(t)
            }
            None => Owner::Floating,
        };
        self.widgets.push(widget);
        Ok(id)
    }

    fn check_widget(&self, id: WidgetId) -> UiResult<()> {
        if id.0 < self.widgets.len() {
            Ok(())
        } else {
            Err(UiError::UnknownWidget(id.0))
        }
    }

    pub fn widget(&self, id: WidgetId) -> UiResult<&Widget> {
        self.widgets.get(id.0).ok_or(UiError::UnknownWidget(id.0))
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> UiResult<&mut Widget> {
        self.widgets.get_mut(id.0).ok_or(UiError::UnknownWidget(id.0))
    }

    /// Absolute screen box of a widget, following its owners.
    pub fn absolute_bounds(&self, id: WidgetId) -> UiResult<Rectangle> {
        self.check_widget(id)?;
        Ok(self.abs_bounds(id))
    }

    fn abs_bounds(&self, id: WidgetId) -> Rectangle {
        let widget = &self.widgets[id.0];
        let origin = match widget.owner {
            Owner::Floating => Point::zero(),
            Owner::Tile(t) => self.tiles[t.0].offset,
            Owner::Parent(p) => self.content_origin(p),
        };
        Rectangle::new(origin + widget.bounds().top_left, widget.bounds().size)
    }

    /// Screen position of the `(0, 0)` used by children of `parent`.
    fn content_origin(&self, parent: WidgetId) -> Point {
        let bounds = self.abs_bounds(parent);
        match self.widgets[parent.0].kind() {
            WidgetKind::Container(c) => bounds.top_left + c.scroll(),
            WidgetKind::Listbox(l) => {
                let viewport = Listbox::viewport(bounds.size);
                bounds.top_left + viewport.top_left + Point::new(0, l.offset())
            }
            _ => bounds.top_left,
        }
    }

    /// True if `ancestor` is `id` or one of its owners.
    fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut cursor = Some(id);
        for _ in 0..=self.widgets.len() {
            match cursor {
                Some(w) if w == ancestor => return true,
                Some(w) => {
                    cursor = match self.widgets[w.0].owner {
                        Owner::Parent(p) => Some(p),
                        _ => None,
                    }
                }
                None => return false,
            }
        }
        false
    }

    /// Prepare `child` to be adopted by `parent`.
    fn check_adoption(&self, parent: WidgetId, child: WidgetId) -> UiResult<()> {
        self.check_widget(parent)?;
        self.check_widget(child)?;
        if self.is_ancestor(child, parent) {
            return Err(UiError::InvalidArgument("widget cannot contain itself"));
        }
        Ok(())
    }

    /// Remove `child` from whatever list currently references it.
    fn detach(&mut self, child: WidgetId) {
        match self.widgets[child.0].owner {
            Owner::Floating => {}
            Owner::Tile(t) => self.tiles[t.0].widgets.retain(|&w| w != child),
            Owner::Parent(p) => match self.widgets[p.0].kind_mut() {
                WidgetKind::Container(c) => {
                    c.remove(child);
                }
                WidgetKind::Listbox(l) => {
                    if l.remove(child) {
                        self.restack(p);
                    }
                }
                _ => {}
            },
        }
        self.widgets[child.0].owner = Owner::Floating;
    }

    /// Move `child` into `container`, keeping its box as a relative box.
    pub fn container_add(&mut self, container: WidgetId, child: WidgetId) -> UiResult<()> {
        self.check_adoption(container, child)?;
        if self.widgets[container.0].as_container().is_none() {
            return Err(UiError::Unsupported("widget is not a container"));
        }
        self.detach(child);
        if let Some(c) = self.widgets[container.0].as_container_mut() {
            c.push(child);
        }
        self.widgets[child.0].owner = Owner::Parent(container);
        Ok(())
    }

    /// Take `child` out of `container`; it becomes floating. Returns
    /// whether it was a child.
    pub fn container_remove(&mut self, container: WidgetId, child: WidgetId) -> UiResult<bool> {
        self.check_widget(container)?;
        self.check_widget(child)?;
        let removed = match self.widgets[container.0].as_container_mut() {
            Some(c) => c.remove(child),
            None => return Err(UiError::Unsupported("widget is not a container")),
        };
        if removed {
            self.widgets[child.0].owner = Owner::Floating;
        }
        Ok(removed)
    }

    /// Append `child` to the list, stacked below the previous item and
    /// stretched to the viewport width. Its height is kept.
    pub fn listbox_add(&mut self, listbox: WidgetId, child: WidgetId) -> UiResult<()> {
        self.check_adoption(listbox, child)?;
        if self.widgets[listbox.0].as_listbox().is_none() {
            return Err(UiError::Unsupported("widget is not a listbox"));
        }
        self.detach(child);
        let size = self.widgets[listbox.0].bounds().size;
        let height = self.widgets[child.0].bounds().size.height;
        let slot = match self.widgets[listbox.0].as_listbox_mut() {
            Some(l) => l.push(child, size, height),
            None => return Err(UiError::Unsupported("widget is not a listbox")),
        };
        let widget = &mut self.widgets[child.0];
        widget.set_bounds(slot);
        widget.owner = Owner::Parent(listbox);
        Ok(())
    }

    pub fn listbox_remove(&mut self, listbox: WidgetId, child: WidgetId) -> UiResult<bool> {
        self.check_widget(listbox)?;
        self.check_widget(child)?;
        let removed = match self.widgets[listbox.0].as_listbox_mut() {
            Some(l) => l.remove(child),
            None => return Err(UiError::Unsupported("widget is not a listbox")),
        };
        if removed {
            self.widgets[child.0].owner = Owner::Floating;
            self.restack(listbox);
        }
        Ok(removed)
    }

    pub fn listbox_selected(&self, listbox: WidgetId) -> UiResult<Option<WidgetId>> {
        self.widget(listbox)?
            .as_listbox()
            .map(|l| l.selected())
            .ok_or(UiError::Unsupported("widget is not a listbox"))
    }

    /// Lay the remaining list items out again from the top.
    fn restack(&mut self, listbox: WidgetId) {
        let children = match self.widgets[listbox.0].as_listbox_mut() {
            Some(l) => {
                l.restack_begin();
                l.children().to_vec()
            }
            None => return,
        };
        for child in children {
            let bounds = self.widgets[child.0].bounds();
            let y = match self.widgets[listbox.0].as_listbox_mut() {
                Some(l) => l.restack_next(bounds.size.height),
                None => return,
            };
            self.widgets[child.0].set_bounds(Rectangle::new(
                Point::new(bounds.top_left.x, y),
                bounds.size,
            ));
        }
    }

    // ------------------------------------------------------------------
    // Event routing
    // ------------------------------------------------------------------

    /// Deliver an event straight to a widget, bypassing hit-testing.
    /// Handler notifications are queued as usual.
    pub fn send_widget_event(
        &mut self,
        id: WidgetId,
        event: WidgetEvent,
        point: Point,
        velocity: i32,
    ) -> UiResult<EventResult> {
        self.check_widget(id)?;
        let mut pending = Pending::new();
        let result = self.dispatch(id, event, point, velocity, &mut pending);
        self.deliver(pending);
        Ok(result)
    }

    /// Route one touch event to the modal or current tile, falling back to
    /// page navigation for unclaimed swipes.
    pub fn handle_touch(&mut self, event: TouchEvent) -> EventResult {
        let Some(target) = self.modal.or(self.current) else {
            return EventResult::Unprocessed;
        };
        let widget_event = WidgetEvent::from(event.kind);
        let candidates = self.tiles[target.0].widgets.clone();
        let mut pending = Pending::new();

        let mut result = if event.kind == TouchKind::Release {
            // Everybody gets to clear their pressed state
            let mut any = false;
            for id in candidates {
                if self.widgets[id.0].is_visible() {
                    any |= self
                        .dispatch(id, widget_event, event.point, event.velocity, &mut pending)
                        .is_processed();
                }
            }
            EventResult::from_bool(any)
        } else {
            match self.hit_test(&candidates, event.point) {
                Some(id) => {
                    self.dispatch(id, widget_event, event.point, event.velocity, &mut pending)
                }
                None => EventResult::Unprocessed,
            }
        };

        if event.kind.is_swipe() && !result.is_processed() {
            if self.modal.is_some() {
                debug!("swipe swallowed by modal");
                result = EventResult::Processed;
            } else if self.state == NavState::Idle {
                result = EventResult::from_bool(self.navigate(event.kind));
            }
        }

        self.deliver(pending);
        result
    }

    fn navigate(&mut self, kind: TouchKind) -> bool {
        match kind {
            TouchKind::SwipeLeft => self.swipe_left(),
            TouchKind::SwipeRight => self.swipe_right(),
            TouchKind::SwipeUp => self.swipe_up(),
            TouchKind::SwipeDown => self.swipe_down(),
            _ => false,
        }
    }

    /// Topmost visible widget containing `point`.
    fn hit_test(&self, candidates: &[WidgetId], point: Point) -> Option<WidgetId> {
        candidates
            .iter()
            .rev()
            .copied()
            .find(|&id| self.widgets[id.0].is_visible() && self.abs_bounds(id).contains(point))
    }

    fn dispatch(
        &mut self,
        id: WidgetId,
        event: WidgetEvent,
        point: Point,
        velocity: i32,
        pending: &mut Pending,
    ) -> EventResult {
        let bounds = self.abs_bounds(id);
        let routing = match self.widgets[id.0].kind_mut() {
            WidgetKind::Container(c) => Some((None, c.children().to_vec())),
            WidgetKind::Listbox(l) => Some((Some(l.route(event, velocity)), l.children().to_vec())),
            _ => None,
        };
        match routing {
            Some((None, children)) => {
                self.route_container(&children, event, point, velocity, pending)
            }
            Some((Some(route), children)) => {
                self.route_listbox(id, bounds, route, &children, event, point, velocity, pending)
            }
            None => {
                let widget = &mut self.widgets[id.0];
                let mut ctx = EventContext::new(id, bounds, velocity, widget.handler(), pending);
                widget.handle_event(event, point, &mut ctx)
            }
        }
    }

    fn route_container(
        &mut self,
        children: &[WidgetId],
        event: WidgetEvent,
        point: Point,
        velocity: i32,
        pending: &mut Pending,
    ) -> EventResult {
        if event == WidgetEvent::Release {
            let mut any = false;
            for &child in children {
                if self.widgets[child.0].is_visible() {
                    any |= self
                        .dispatch(child, event, point, velocity, pending)
                        .is_processed();
                }
            }
            return EventResult::from_bool(any);
        }

        for &child in children {
            if self.widgets[child.0].is_visible()
                && self.abs_bounds(child).contains(point)
                && self
                    .dispatch(child, event, point, velocity, pending)
                    .is_processed()
            {
                return EventResult::Processed;
            }
        }
        EventResult::Unprocessed
    }

    #[allow(clippy::too_many_arguments)]
    fn route_listbox(
        &mut self,
        listbox: WidgetId,
        bounds: Rectangle,
        route: ListRoute,
        children: &[WidgetId],
        event: WidgetEvent,
        point: Point,
        velocity: i32,
        pending: &mut Pending,
    ) -> EventResult {
        match route {
            ListRoute::Consumed => EventResult::Processed,
            ListRoute::Ignored => EventResult::Unprocessed,
            ListRoute::Broadcast => {
                for &child in children {
                    self.dispatch(child, event, point, velocity, pending);
                }
                EventResult::Processed
            }
            ListRoute::Forward => {
                if let Some(child) = self.listbox_child_at(bounds, children, point) {
                    self.dispatch(child, event, point, velocity, pending);
                }
                EventResult::Processed
            }
            ListRoute::Select => {
                let Some(child) = self.listbox_child_at(bounds, children, point) else {
                    return EventResult::Processed;
                };
                let previous = self.widgets[listbox.0]
                    .as_listbox_mut()
                    .and_then(|l| l.select(child));
                if let Some(previous) = previous {
                    self.dispatch(previous, WidgetEvent::Deselect, point, 0, pending);
                }
                self.dispatch(child, WidgetEvent::Select, point, 0, pending);
                self.dispatch(child, WidgetEvent::Tap, point, 0, pending);

                let handler = self.widgets[listbox.0].handler();
                let mut ctx = EventContext::new(listbox, bounds, 0, handler, pending);
                ctx.notify(NotificationKind::Selected(child));
                EventResult::Processed
            }
        }
    }

    fn listbox_child_at(
        &self,
        bounds: Rectangle,
        children: &[WidgetId],
        point: Point,
    ) -> Option<WidgetId> {
        let viewport = Listbox::viewport(bounds.size).translate(bounds.top_left);
        if !viewport.contains(point) {
            return None;
        }
        children
            .iter()
            .copied()
            .find(|&c| self.widgets[c.0].is_visible() && self.abs_bounds(c).contains(point))
    }

    /// Queue notifications for the application and carry out navigation
    /// actions.
    fn deliver(&mut self, pending: Pending) {
        for notification in pending {
            if self.outbox.is_full() {
                warn!("notification queue full, dropping oldest");
                self.outbox.pop_front();
            }
            let _ = self.outbox.push_back(notification);

            match notification.action {
                Action::Custom(_) => {}
                Action::SelectTile(tile) => {
                    if let Err(e) = self.select_tile(tile) {
                        warn!("widget {} selected a bad tile: {}", notification.widget.0, e);
                    }
                }
                Action::GoHome => {
                    self.go_home();
                }
                Action::CloseModal => self.unset_modal(),
            }
        }
    }

    /// Next handler notification, oldest first.
    pub fn poll_notification(&mut self) -> Option<Notification> {
        self.outbox.pop_front()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Slide to the right neighbor of the current main tile.
    pub fn swipe_left(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let main = tile::main_tile_of(&self.tiles, current);
        match self.tiles[main.0].links.right {
            Some(target) => self.start_transition(NavState::MovingRight, target),
            None => false,
        }
    }

    /// Slide to the left neighbor of the current main tile.
    pub fn swipe_right(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let main = tile::main_tile_of(&self.tiles, current);
        match self.tiles[main.0].links.left {
            Some(target) => self.start_transition(NavState::MovingLeft, target),
            None => false,
        }
    }

    /// Slide to the tile below the current one.
    pub fn swipe_up(&mut self) -> bool {
        match self.current.and_then(|c| self.tiles[c.0].links.bottom) {
            Some(target) => self.start_transition(NavState::MovingDown, target),
            None => false,
        }
    }

    /// Slide to the tile above the current one.
    pub fn swipe_down(&mut self) -> bool {
        match self.current.and_then(|c| self.tiles[c.0].links.top) {
            Some(target) => self.start_transition(NavState::MovingUp, target),
            None => false,
        }
    }

    /// Slide back to the default tile.
    pub fn go_home(&mut self) -> bool {
        match self.default {
            Some(home) if self.current != Some(home) => {
                self.start_transition(NavState::MovingLeft, home)
            }
            _ => false,
        }
    }

    /// Slide up from a secondary tile to its main tile.
    pub fn go_to_main(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let main = tile::main_tile_of(&self.tiles, current);
        main != current && self.start_transition(NavState::MovingUp, main)
    }

    fn start_transition(&mut self, state: NavState, to: TileId) -> bool {
        let Some(from) = self.current else {
            return false;
        };
        if self.state != NavState::Idle || from == to {
            return false;
        }
        let (w, h) = (
            self.config.screen_width as i32,
            self.config.screen_height as i32,
        );
        self.tiles[to.0].offset = match state {
            NavState::MovingLeft => Point::new(-w, 0),
            NavState::MovingRight => Point::new(w, 0),
            NavState::MovingUp => Point::new(0, -h),
            NavState::MovingDown => Point::new(0, h),
            NavState::Idle => return false,
        };
        self.tiles[from.0].offset = Point::zero();
        self.state = state;
        self.transition = Some(Transition { from, to });
        debug!("transition {:?}: tile {} -> tile {}", state, from.0, to.0);
        true
    }

    /// Move both tiles one animation step, never overshooting the target.
    fn advance_transition(&mut self) {
        let Some(Transition { from, to }) = self.transition else {
            return;
        };
        let remaining = self.tiles[to.0].offset;
        let step = self.config.anim_step();
        let delta = match self.state {
            NavState::MovingLeft => Point::new(step.min(-remaining.x), 0),
            NavState::MovingRight => Point::new(-step.min(remaining.x), 0),
            NavState::MovingUp => Point::new(0, step.min(-remaining.y)),
            NavState::MovingDown => Point::new(0, -step.min(remaining.y)),
            NavState::Idle => return,
        };
        self.tiles[to.0].offset += delta;
        self.tiles[from.0].offset += delta;
    }

    fn finish_transition_if_done(&mut self) {
        let Some(Transition { from, to }) = self.transition else {
            return;
        };
        if self.tiles[to.0].offset != Point::zero() {
            return;
        }
        self.transition = None;
        self.state = NavState::Idle;
        self.tiles[from.0].offset = Point::zero();

        self.tiles[from.0].send_event(TileEvent::Exit);
        self.current = Some(to);
        self.tiles[to.0].send_event(TileEvent::Enter);
        info!("tile {} is now current", to.0);
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Redraw the frame and hand it to the display.
    pub fn render<S: DisplaySink>(&mut self, sink: &mut S) {
        self.surface.blank();
        self.surface.reset_drawing_window();

        match self.transition {
            Some(Transition { from, to }) => {
                self.draw_tile(from);
                self.draw_tile(to);
            }
            None => {
                if let Some(current) = self.current {
                    self.draw_tile(current);
                }
            }
        }
        if let Some(modal) = self.modal {
            self.draw_tile(modal);
        }

        if let Err(e) = self.surface.commit(sink) {
            warn!("display commit failed: {:?}", e);
        }
    }

    fn draw_tile(&mut self, id: TileId) {
        let bounds = self.tiles[id.0].bounds();
        let saved = self.surface.clip_to(&bounds);
        if !self.surface.drawing_window().is_empty() {
            let mut canvas = Canvas::new(&mut self.surface, bounds.top_left);
            self.tiles[id.0].draw_base(&mut canvas);
            let widgets = self.tiles[id.0].widgets.clone();
            for widget in widgets {
                self.draw_widget(widget);
            }
        }
        self.surface.restore_drawing_window(saved);
    }

    fn draw_widget(&mut self, id: WidgetId) {
        if !self.widgets[id.0].is_visible() {
            return;
        }
        let bounds = self.abs_bounds(id);
        let saved = self.surface.clip_to(&bounds);
        if self.surface.drawing_window().is_empty() {
            self.surface.restore_drawing_window(saved);
            return;
        }

        if let Some(list) = self.widgets[id.0].as_listbox_mut() {
            list.prepare_frame(bounds.size);
        }
        self.widgets[id.0].draw(&mut Canvas::new(&mut self.surface, bounds.top_left));

        match self.widgets[id.0].kind() {
            WidgetKind::Container(c) => {
                for child in c.children().to_vec() {
                    self.draw_widget(child);
                }
            }
            WidgetKind::Listbox(l) => {
                let children = l.children().to_vec();
                let viewport = Listbox::viewport(bounds.size).translate(bounds.top_left);
                let outer = self.surface.clip_to(&viewport);
                for child in children {
                    self.draw_widget(child);
                }
                self.surface.restore_drawing_window(outer);

                let widget = &self.widgets[id.0];
                if let Some(list) = widget.as_listbox() {
                    let mut canvas = Canvas::new(&mut self.surface, bounds.top_left);
                    list.draw_chrome(&mut canvas, bounds.size, widget.style());
                }
            }
            _ => {}
        }
        self.surface.restore_drawing_window(saved);
    }

    // ------------------------------------------------------------------
    // Power
    // ------------------------------------------------------------------

    pub fn enable_eco_mode(&mut self, now: Instant) {
        self.eco.enabled = true;
        self.eco.deadline = Some(now + self.config.inactivity_timeout());
        info!("eco mode enabled");
    }

    pub fn disable_eco_mode<S: DisplaySink>(&mut self, sink: &mut S) {
        self.eco.enabled = false;
        self.eco.deadline = None;
        if self.eco.mode == ScreenMode::Dimmed {
            sink.set_backlight(self.config.backlight_default);
            self.eco.mode = ScreenMode::Normal;
        }
        info!("eco mode disabled");
    }

    pub fn is_eco_mode(&self) -> bool {
        self.eco.enabled
    }

    pub fn screen_mode(&self) -> ScreenMode {
        self.eco.mode
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Restore the backlight and restart the inactivity timer.
    pub fn wake<S: DisplaySink>(&mut self, sink: &mut S, now: Instant) {
        if self.eco.mode == ScreenMode::Dimmed || self.sleeping {
            sink.set_backlight(self.config.backlight_default);
            self.eco.mode = ScreenMode::Normal;
            debug!("screen woken up");
        }
        self.sleeping = false;
        self.eco.deadline = self
            .eco
            .enabled
            .then(|| now + self.config.inactivity_timeout());
    }

    /// Returns true when the device was put to sleep.
    fn update_eco<B: Board>(&mut self, board: &mut B, now: Instant) -> bool {
        if !self.eco.enabled {
            return false;
        }
        let plugged = board.is_usb_plugged();
        if plugged != self.eco.usb_plugged {
            self.eco.usb_plugged = plugged;
            debug!("usb {}", if plugged { "plugged" } else { "unplugged" });
        }
        if plugged {
            self.wake(board, now);
            return false;
        }

        let deadline = *self
            .eco
            .deadline
            .get_or_insert(now + self.config.inactivity_timeout());
        if now < deadline {
            return false;
        }
        match self.eco.mode {
            ScreenMode::Normal => {
                board.set_backlight(self.config.backlight_dimmed);
                self.eco.mode = ScreenMode::Dimmed;
                self.eco.deadline = Some(now + self.config.deepsleep_timeout());
                info!("inactive, screen dimmed");
                false
            }
            ScreenMode::Dimmed => {
                self.enter_deep_sleep(board);
                true
            }
        }
    }

    fn enter_deep_sleep<B: DisplaySink + SleepControl>(&mut self, board: &mut B) {
        info!("entering deep sleep");
        self.surface.blank();
        if let Err(e) = self.surface.commit(board) {
            warn!("display commit failed: {:?}", e);
        }
        board.set_backlight(0);
        self.sleeping = true;
        board.enter_deep_sleep();
    }

    /// Side button policy: close the modal, sleep from the home tile, climb
    /// from a secondary tile to its main tile, otherwise go home.
    pub fn handle_user_button<B: DisplaySink + SleepControl>(&mut self, board: &mut B) {
        if self.modal.is_some() {
            self.unset_modal();
            return;
        }
        let Some(current) = self.current else {
            return;
        };
        if self.tiles[current.0]
            .send_event(TileEvent::UserButton)
            .is_processed()
        {
            return;
        }
        if self.default == Some(current) {
            self.enter_deep_sleep(board);
        } else if self.tiles[current.0].kind() == TileKind::Secondary {
            self.go_to_main();
        } else {
            self.go_home();
        }
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Run one controller tick. Fails only when no tile was ever selected.
    pub fn process_events<B: Board>(&mut self, board: &mut B, now: Instant) -> UiResult<()> {
        if self.current.is_none() {
            return Err(UiError::NotInitialized);
        }
        if self.sleeping {
            return Ok(());
        }
        if self.update_eco(board, now) {
            return Ok(());
        }

        if board.is_pressed() {
            self.wake(board, now);
            self.handle_user_button(board);
            if self.sleeping {
                return Ok(());
            }
        }

        if let Some(event) = board.next_event() {
            self.wake(board, now);
            self.handle_touch(event);
        }

        self.advance_transition();
        self.render(board);
        self.finish_transition_if_done();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embassy_time::Duration;

    use crate::graphics::Color;
    use crate::peripherals::{PowerMonitor, SideButton, TouchSource};
    use crate::ui::tile::TileHandler;
    use crate::ui::widgets::{ButtonState, SwitchState};

    // ------------------------------------------------------------------
    // Fakes
    // ------------------------------------------------------------------

    #[derive(Default)]
    struct FakeBoard {
        touches: Vec<TouchEvent>,
        button: bool,
        usb: bool,
        backlight: Option<u16>,
        frames: usize,
        slept: bool,
    }

    impl DisplaySink for FakeBoard {
        type Error = Infallible;
        fn commit(&mut self, _frame: &[u8]) -> Result<(), Infallible> {
            self.frames += 1;
            Ok(())
        }
        fn set_backlight(&mut self, level: u16) {
            self.backlight = Some(level);
        }
    }

    impl TouchSource for FakeBoard {
        fn next_event(&mut self) -> Option<TouchEvent> {
            if self.touches.is_empty() {
                None
            } else {
                Some(self.touches.remove(0))
            }
        }
    }

    impl SideButton for FakeBoard {
        fn is_pressed(&mut self) -> bool {
            core::mem::take(&mut self.button)
        }
    }

    impl PowerMonitor for FakeBoard {
        fn battery_percent(&mut self) -> u8 {
            80
        }
        fn is_usb_plugged(&mut self) -> bool {
            self.usb
        }
    }

    impl SleepControl for FakeBoard {
        fn enter_deep_sleep(&mut self) {
            self.slept = true;
        }
    }

    type Log = Rc<RefCell<Vec<(usize, TileEvent)>>>;

    struct Recorder {
        tile: usize,
        log: Log,
        claim_button: bool,
    }

    impl TileHandler for Recorder {
        fn on_event(&mut self, event: TileEvent) -> EventResult {
            self.log.borrow_mut().push((self.tile, event));
            EventResult::from_bool(self.claim_button && event == TileEvent::UserButton)
        }
    }

    fn recorded_tile(ui: &mut UiController, log: &Log) -> TileId {
        let index = ui.tiles.len();
        ui.add_tile(Tile::new().with_handler(Recorder {
            tile: index,
            log: log.clone(),
            claim_button: false,
        }))
    }

    fn t0() -> Instant {
        Instant::from_secs(100)
    }

    fn touch(kind: TouchKind, x: i32, y: i32) -> TouchEvent {
        TouchEvent::swipe(kind, Point::new(x, y), 50)
    }

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    /// Two main tiles, a secondary tile under the first, a third main tile.
    fn navigation_setup(log: &Log) -> (UiController, [TileId; 4]) {
        let mut ui = UiController::new(UiConfig::default());
        let home = recorded_tile(&mut ui, log);
        let right = recorded_tile(&mut ui, log);
        let below = recorded_tile(&mut ui, log);
        let left = recorded_tile(&mut ui, log);
        ui.link_right(home, right).unwrap();
        ui.link_left(home, left).unwrap();
        ui.link_bottom(home, below).unwrap();
        ui.select_tile(home).unwrap();
        ui.set_default_tile(home).unwrap();
        log.borrow_mut().clear();
        (ui, [home, right, below, left])
    }

    fn run_until_idle(ui: &mut UiController, board: &mut FakeBoard) -> usize {
        let mut ticks = 0;
        loop {
            ui.process_events(board, t0()).unwrap();
            ticks += 1;
            if ui.state() == NavState::Idle {
                return ticks;
            }
            assert!(ticks < 100);
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    #[test]
    fn test_process_events_requires_current_tile() {
        let mut ui = UiController::new(UiConfig::default());
        let mut board = FakeBoard::default();
        assert_eq!(
            ui.process_events(&mut board, t0()),
            Err(UiError::NotInitialized)
        );
    }

    #[test]
    fn test_swipe_left_pages_right() {
        let log = Log::default();
        let (mut ui, [home, right, ..]) = navigation_setup(&log);
        let mut board = FakeBoard {
            touches: alloc::vec![touch(TouchKind::SwipeLeft, 120, 120)],
            ..FakeBoard::default()
        };

        ui.process_events(&mut board, t0()).unwrap();
        assert_eq!(ui.state(), NavState::MovingRight);
        assert_eq!(ui.tile(right).unwrap().offset(), Point::new(200, 0));
        assert_eq!(ui.tile(home).unwrap().offset(), Point::new(-40, 0));

        let ticks = run_until_idle(&mut ui, &mut board);
        assert_eq!(ticks, 5);
        assert_eq!(ui.current_tile(), Some(right));
        assert_eq!(ui.tile(home).unwrap().offset(), Point::zero());
        assert_eq!(
            *log.borrow(),
            alloc::vec![(home.0, TileEvent::Exit), (right.0, TileEvent::Enter)]
        );
        assert_eq!(board.frames, 6);
    }

    #[test]
    fn test_swipe_without_neighbor_is_noop() {
        let log = Log::default();
        let (mut ui, [_, right, ..]) = navigation_setup(&log);
        ui.select_tile(right).unwrap();
        assert!(!ui.swipe_left());
        assert!(!ui.swipe_up());
        assert_eq!(ui.state(), NavState::Idle);
    }

    #[test]
    fn test_horizontal_swipe_from_secondary_uses_main_links() {
        let log = Log::default();
        let (mut ui, [_, right, below, _]) = navigation_setup(&log);
        ui.select_tile(below).unwrap();
        assert!(ui.swipe_left());
        assert_eq!(ui.state(), NavState::MovingRight);
        let mut board = FakeBoard::default();
        run_until_idle(&mut ui, &mut board);
        assert_eq!(ui.current_tile(), Some(right));
    }

    #[test]
    fn test_vertical_navigation() {
        let log = Log::default();
        let (mut ui, [home, _, below, _]) = navigation_setup(&log);
        let mut board = FakeBoard {
            touches: alloc::vec![touch(TouchKind::SwipeUp, 120, 200)],
            ..FakeBoard::default()
        };
        ui.process_events(&mut board, t0()).unwrap();
        assert_eq!(ui.state(), NavState::MovingDown);
        assert_eq!(ui.tile(below).unwrap().offset(), Point::new(0, 200));
        run_until_idle(&mut ui, &mut board);
        assert_eq!(ui.current_tile(), Some(below));

        board.touches.push(touch(TouchKind::SwipeDown, 120, 20));
        ui.process_events(&mut board, t0()).unwrap();
        assert_eq!(ui.state(), NavState::MovingUp);
        run_until_idle(&mut ui, &mut board);
        assert_eq!(ui.current_tile(), Some(home));
    }

    #[test]
    fn test_swipe_ignored_during_transition() {
        let log = Log::default();
        let (mut ui, [_, right, ..]) = navigation_setup(&log);
        assert!(ui.swipe_left());
        assert!(!ui.swipe_right());
        let mut board = FakeBoard {
            touches: alloc::vec![touch(TouchKind::SwipeRight, 100, 100)],
            ..FakeBoard::default()
        };
        run_until_idle(&mut ui, &mut board);
        assert_eq!(ui.current_tile(), Some(right));
    }

    #[test]
    fn test_odd_animation_delta_lands_exactly() {
        let log = Log::default();
        let (mut ui, [_, right, ..]) = navigation_setup(&log);
        ui.config.anim_delta = 70;
        ui.swipe_left();
        let mut board = FakeBoard::default();
        assert_eq!(run_until_idle(&mut ui, &mut board), 4);
        assert_eq!(ui.current_tile(), Some(right));
    }

    // ------------------------------------------------------------------
    // Modal
    // ------------------------------------------------------------------

    #[test]
    fn test_modal_swallows_swipes() {
        let log = Log::default();
        let (mut ui, [home, ..]) = navigation_setup(&log);
        let modal = ui.add_tile(Tile::modal(20, 60, 200, 120));
        ui.set_modal(modal).unwrap();

        for kind in [
            TouchKind::SwipeLeft,
            TouchKind::SwipeRight,
            TouchKind::SwipeUp,
            TouchKind::SwipeDown,
        ] {
            assert!(ui.handle_touch(touch(kind, 5, 5)).is_processed());
            assert_eq!(ui.state(), NavState::Idle);
        }
        assert_eq!(ui.current_tile(), Some(home));
    }

    #[test]
    fn test_modal_gets_touch_input() {
        let log = Log::default();
        let (mut ui, [home, ..]) = navigation_setup(&log);
        let behind = ui
            .add_widget(Some(home), Widget::button(rect(0, 0, 240, 240), "behind"))
            .unwrap();
        let modal = ui.add_tile(Tile::modal(20, 60, 200, 120));
        let ok = ui
            .add_widget(
                Some(modal),
                Widget::button(rect(50, 70, 100, 40), "OK").with_handler(Action::CloseModal),
            )
            .unwrap();
        ui.set_modal(modal).unwrap();

        // Modal widgets are relative to the modal's offset
        assert_eq!(ui.absolute_bounds(ok).unwrap(), rect(70, 130, 100, 40));

        ui.handle_touch(TouchEvent::new(TouchKind::Press, Point::new(30, 20)));
        let behind_state = ui.widget_mut(behind).unwrap().as_button_mut().unwrap().state();
        assert_eq!(behind_state, ButtonState::Released);

        ui.handle_touch(TouchEvent::new(TouchKind::Tap, Point::new(100, 150)));
        assert_eq!(ui.modal(), None);
        assert_eq!(ui.poll_notification().unwrap().action, Action::CloseModal);
    }

    #[test]
    fn test_unset_modal_sends_modal_close() {
        let log = Log::default();
        let (mut ui, _) = navigation_setup(&log);
        let modal = recorded_tile(&mut ui, &log);
        ui.set_modal(modal).unwrap();
        ui.unset_modal();
        assert_eq!(
            *log.borrow(),
            alloc::vec![(modal.0, TileEvent::Enter), (modal.0, TileEvent::ModalClose)]
        );
    }

    // ------------------------------------------------------------------
    // Side button
    // ------------------------------------------------------------------

    #[test]
    fn test_button_closes_modal_first() {
        let log = Log::default();
        let (mut ui, [home, ..]) = navigation_setup(&log);
        let modal = ui.add_tile(Tile::modal(20, 60, 200, 120));
        ui.set_modal(modal).unwrap();
        let mut board = FakeBoard {
            button: true,
            ..FakeBoard::default()
        };
        ui.process_events(&mut board, t0()).unwrap();
        assert_eq!(ui.modal(), None);
        assert!(!board.slept);
        assert_eq!(ui.current_tile(), Some(home));
    }

    #[test]
    fn test_button_on_home_sleeps() {
        let log = Log::default();
        let (mut ui, _) = navigation_setup(&log);
        let mut board = FakeBoard {
            button: true,
            ..FakeBoard::default()
        };
        ui.process_events(&mut board, t0()).unwrap();
        assert!(board.slept);
        assert!(ui.is_sleeping());
        assert_eq!(board.backlight, Some(0));

        // Ticks are ignored until woken
        let frames = board.frames;
        ui.process_events(&mut board, t0()).unwrap();
        assert_eq!(board.frames, frames);
        ui.wake(&mut board, t0());
        assert_eq!(board.backlight, Some(1000));
        ui.process_events(&mut board, t0()).unwrap();
        assert_eq!(board.frames, frames + 1);
    }

    #[test]
    fn test_button_from_secondary_goes_to_main() {
        let log = Log::default();
        let (mut ui, [home, _, below, _]) = navigation_setup(&log);
        ui.select_tile(below).unwrap();
        let mut board = FakeBoard {
            button: true,
            ..FakeBoard::default()
        };
        ui.process_events(&mut board, t0()).unwrap();
        assert_eq!(ui.state(), NavState::MovingUp);
        run_until_idle(&mut ui, &mut board);
        assert_eq!(ui.current_tile(), Some(home));
    }

    #[test]
    fn test_button_from_main_goes_home() {
        let log = Log::default();
        let (mut ui, [home, right, ..]) = navigation_setup(&log);
        ui.select_tile(right).unwrap();
        let mut board = FakeBoard {
            button: true,
            ..FakeBoard::default()
        };
        ui.process_events(&mut board, t0()).unwrap();
        assert_eq!(ui.state(), NavState::MovingLeft);
        run_until_idle(&mut ui, &mut board);
        assert_eq!(ui.current_tile(), Some(home));
    }

    #[test]
    fn test_tile_can_claim_button() {
        let log = Log::default();
        let mut ui = UiController::new(UiConfig::default());
        let home = ui.add_tile(Tile::new().with_handler(Recorder {
            tile: 0,
            log: log.clone(),
            claim_button: true,
        }));
        ui.select_tile(home).unwrap();
        ui.set_default_tile(home).unwrap();
        let mut board = FakeBoard {
            button: true,
            ..FakeBoard::default()
        };
        ui.process_events(&mut board, t0()).unwrap();
        assert!(!board.slept);
        assert!(log.borrow().contains(&(0, TileEvent::UserButton)));
    }

    // ------------------------------------------------------------------
    // Eco mode
    // ------------------------------------------------------------------

    #[test]
    fn test_eco_dims_then_sleeps() {
        let log = Log::default();
        let (mut ui, _) = navigation_setup(&log);
        let mut board = FakeBoard::default();
        ui.enable_eco_mode(t0());

        ui.process_events(&mut board, t0() + Duration::from_secs(9)).unwrap();
        assert_eq!(ui.screen_mode(), ScreenMode::Normal);

        ui.process_events(&mut board, t0() + Duration::from_secs(10)).unwrap();
        assert_eq!(ui.screen_mode(), ScreenMode::Dimmed);
        assert_eq!(board.backlight, Some(100));

        ui.process_events(&mut board, t0() + Duration::from_secs(29)).unwrap();
        assert!(!board.slept);
        ui.process_events(&mut board, t0() + Duration::from_secs(30)).unwrap();
        assert!(board.slept);
        assert_eq!(board.backlight, Some(0));
    }

    #[test]
    fn test_touch_restores_backlight_and_restarts_timer() {
        let log = Log::default();
        let (mut ui, _) = navigation_setup(&log);
        let mut board = FakeBoard::default();
        ui.enable_eco_mode(t0());
        ui.process_events(&mut board, t0() + Duration::from_secs(10)).unwrap();
        assert_eq!(ui.screen_mode(), ScreenMode::Dimmed);

        board
            .touches
            .push(TouchEvent::new(TouchKind::Press, Point::new(1, 1)));
        let later = t0() + Duration::from_secs(15);
        ui.process_events(&mut board, later).unwrap();
        assert_eq!(ui.screen_mode(), ScreenMode::Normal);
        assert_eq!(board.backlight, Some(1000));

        ui.process_events(&mut board, later + Duration::from_secs(9)).unwrap();
        assert_eq!(ui.screen_mode(), ScreenMode::Normal);
        ui.process_events(&mut board, later + Duration::from_secs(10)).unwrap();
        assert_eq!(ui.screen_mode(), ScreenMode::Dimmed);
    }

    #[test]
    fn test_usb_power_holds_off_eco() {
        let log = Log::default();
        let (mut ui, _) = navigation_setup(&log);
        let mut board = FakeBoard {
            usb: true,
            ..FakeBoard::default()
        };
        ui.enable_eco_mode(t0());
        ui.process_events(&mut board, t0() + Duration::from_secs(60)).unwrap();
        assert_eq!(ui.screen_mode(), ScreenMode::Normal);
        assert!(!board.slept);

        ui.disable_eco_mode(&mut board);
        assert!(!ui.is_eco_mode());
    }

    // ------------------------------------------------------------------
    // Widget routing
    // ------------------------------------------------------------------

    #[test]
    fn test_topmost_widget_wins() {
        let mut ui = UiController::new(UiConfig::default());
        let home = ui.add_tile(Tile::new());
        ui.select_tile(home).unwrap();
        let below = ui
            .add_widget(Some(home), Widget::button(rect(0, 0, 100, 100), "A"))
            .unwrap();
        let above = ui
            .add_widget(Some(home), Widget::button(rect(50, 50, 100, 100), "B"))
            .unwrap();

        ui.handle_touch(TouchEvent::new(TouchKind::Press, Point::new(60, 60)));
        let state = |ui: &mut UiController, id| {
            ui.widget_mut(id).unwrap().as_button_mut().unwrap().state()
        };
        assert_eq!(state(&mut ui, above), ButtonState::Pressed);
        assert_eq!(state(&mut ui, below), ButtonState::Released);

        // Hidden widgets are skipped
        ui.widget_mut(above).unwrap().set_visible(false);
        ui.handle_touch(TouchEvent::new(TouchKind::Press, Point::new(60, 60)));
        assert_eq!(state(&mut ui, below), ButtonState::Pressed);
    }

    #[test]
    fn test_release_is_broadcast() {
        let mut ui = UiController::new(UiConfig::default());
        let home = ui.add_tile(Tile::new());
        ui.select_tile(home).unwrap();
        let a = ui
            .add_widget(Some(home), Widget::button(rect(0, 0, 50, 50), "A"))
            .unwrap();
        ui.handle_touch(TouchEvent::new(TouchKind::Press, Point::new(10, 10)));
        ui.handle_touch(TouchEvent::new(TouchKind::Release, Point::new(200, 200)));
        let state = ui.widget_mut(a).unwrap().as_button_mut().unwrap().state();
        assert_eq!(state, ButtonState::Released);
    }

    #[test]
    fn test_slider_blocks_paging() {
        let log = Log::default();
        let (mut ui, [home, ..]) = navigation_setup(&log);
        ui.add_widget(Some(home), Widget::slider(rect(10, 100, 220, 30)))
            .unwrap();
        assert!(ui.handle_touch(touch(TouchKind::SwipeLeft, 50, 110)).is_processed());
        assert_eq!(ui.state(), NavState::Idle);
        // Outside the slider the swipe pages
        ui.handle_touch(touch(TouchKind::SwipeLeft, 50, 10));
        assert_eq!(ui.state(), NavState::MovingRight);
    }

    #[test]
    fn test_container_routing() {
        let mut ui = UiController::new(UiConfig::default());
        let home = ui.add_tile(Tile::new());
        ui.select_tile(home).unwrap();
        let container = ui
            .add_widget(Some(home), Widget::container(rect(20, 20, 200, 200)))
            .unwrap();
        let a = ui
            .add_widget(
                None,
                Widget::button(rect(0, 0, 50, 50), "A").with_handler(Action::Custom(1)),
            )
            .unwrap();
        let b = ui
            .add_widget(
                None,
                Widget::button(rect(100, 0, 50, 50), "B").with_handler(Action::Custom(2)),
            )
            .unwrap();
        ui.container_add(container, a).unwrap();
        ui.container_add(container, b).unwrap();
        assert_eq!(ui.absolute_bounds(b).unwrap(), rect(120, 20, 50, 50));

        ui.handle_touch(TouchEvent::new(TouchKind::Press, Point::new(25, 25)));
        ui.handle_touch(TouchEvent::new(TouchKind::Press, Point::new(125, 25)));
        ui.handle_touch(TouchEvent::new(TouchKind::Release, Point::new(210, 210)));
        for id in [a, b] {
            let state = ui.widget_mut(id).unwrap().as_button_mut().unwrap().state();
            assert_eq!(state, ButtonState::Released);
        }

        ui.handle_touch(TouchEvent::new(TouchKind::Tap, Point::new(125, 25)));
        let n = ui.poll_notification().unwrap();
        assert_eq!((n.widget, n.action), (b, Action::Custom(2)));
        assert_eq!(ui.poll_notification(), None);

        // Scrolling the container moves its children
        ui.widget_mut(container)
            .unwrap()
            .as_container_mut()
            .unwrap()
            .set_scroll(Point::new(0, -10));
        assert_eq!(ui.absolute_bounds(a).unwrap(), rect(20, 10, 50, 50));

        assert!(ui.container_remove(container, a).unwrap());
        assert_eq!(ui.widget(a).unwrap().owner(), Owner::Floating);
        assert_eq!(ui.container_add(a, b), Err(UiError::Unsupported("widget is not a container")));
        assert_eq!(
            ui.container_add(container, container),
            Err(UiError::InvalidArgument("widget cannot contain itself"))
        );
    }

    #[test]
    fn test_container_tap_stops_at_first_claiming_child() {
        let mut ui = UiController::new(UiConfig::default());
        let home = ui.add_tile(Tile::new());
        ui.select_tile(home).unwrap();
        let container = ui
            .add_widget(Some(home), Widget::container(rect(20, 20, 200, 200)))
            .unwrap();
        let first = ui
            .add_widget(
                None,
                Widget::button(rect(0, 0, 80, 50), "1").with_handler(Action::Custom(1)),
            )
            .unwrap();
        let second = ui
            .add_widget(
                None,
                Widget::button(rect(40, 0, 80, 50), "2").with_handler(Action::Custom(2)),
            )
            .unwrap();
        ui.container_add(container, first).unwrap();
        ui.container_add(container, second).unwrap();

        // (80, 30) lies inside both children
        ui.handle_touch(TouchEvent::new(TouchKind::Tap, Point::new(80, 30)));
        let n = ui.poll_notification().unwrap();
        assert_eq!((n.widget, n.action), (first, Action::Custom(1)));
        assert_eq!(ui.poll_notification(), None);

        // Outside the overlap the second child still gets its taps
        ui.handle_touch(TouchEvent::new(TouchKind::Tap, Point::new(130, 30)));
        let n = ui.poll_notification().unwrap();
        assert_eq!((n.widget, n.action), (second, Action::Custom(2)));
    }

    #[test]
    fn test_listbox_selection() {
        let mut ui = UiController::new(UiConfig::default());
        let home = ui.add_tile(Tile::new());
        ui.select_tile(home).unwrap();
        let list = ui
            .add_widget(
                Some(home),
                Widget::listbox(rect(10, 10, 200, 100)).with_handler(Action::Custom(9)),
            )
            .unwrap();
        let items: Vec<WidgetId> = ["one", "two", "three"]
            .iter()
            .map(|text| {
                let id = ui.add_widget(None, Widget::label(rect(0, 0, 0, 30), text)).unwrap();
                ui.listbox_add(list, id).unwrap();
                id
            })
            .collect();
        // Viewport starts at (11, 11), items at y = 2, 32, 62 inside it
        assert_eq!(ui.absolute_bounds(items[1]).unwrap(), rect(13, 43, 186, 30));

        let tap = |ui: &mut UiController, y| {
            ui.handle_touch(TouchEvent::new(TouchKind::Tap, Point::new(50, y)))
        };
        tap(&mut ui, 20);
        assert_eq!(ui.listbox_selected(list).unwrap(), Some(items[0]));
        tap(&mut ui, 50);
        assert_eq!(ui.listbox_selected(list).unwrap(), Some(items[1]));

        let selected = |ui: &UiController, id| match ui.widget(id).unwrap().kind() {
            WidgetKind::Label(l) => l.is_selected(),
            _ => false,
        };
        assert!(!selected(&ui, items[0]));
        assert!(selected(&ui, items[1]));

        let kinds: Vec<NotificationKind> = core::iter::from_fn(|| ui.poll_notification())
            .map(|n| n.kind)
            .collect();
        assert_eq!(
            kinds,
            alloc::vec![
                NotificationKind::Selected(items[0]),
                NotificationKind::Selected(items[1])
            ]
        );

        ui.listbox_remove(list, items[0]).unwrap();
        assert_eq!(ui.absolute_bounds(items[1]).unwrap(), rect(13, 13, 186, 30));
        assert_eq!(ui.listbox_selected(list).unwrap(), Some(items[1]));
    }

    #[test]
    fn test_listbox_swipe_scrolls_instead_of_paging() {
        let log = Log::default();
        let (mut ui, [home, ..]) = navigation_setup(&log);
        let list = ui
            .add_widget(Some(home), Widget::listbox(rect(10, 10, 200, 100)))
            .unwrap();
        for _ in 0..10 {
            let id = ui.add_widget(None, Widget::label(rect(0, 0, 0, 30), "item")).unwrap();
            ui.listbox_add(list, id).unwrap();
        }
        let mut board = FakeBoard {
            touches: alloc::vec![TouchEvent::swipe(TouchKind::SwipeUp, Point::new(50, 50), 40)],
            ..FakeBoard::default()
        };
        ui.process_events(&mut board, t0()).unwrap();
        assert_eq!(ui.state(), NavState::Idle);
        assert_eq!(ui.current_tile(), Some(home));
        let offset = ui.widget(list).unwrap().as_listbox().unwrap().offset();
        assert!(offset < 0);
    }

    #[test]
    fn test_select_tile_action() {
        let log = Log::default();
        let (mut ui, [home, right, ..]) = navigation_setup(&log);
        ui.add_widget(
            Some(home),
            Widget::button(rect(0, 0, 100, 100), "Go").with_handler(Action::SelectTile(right)),
        )
        .unwrap();
        ui.handle_touch(TouchEvent::new(TouchKind::Tap, Point::new(10, 10)));
        assert_eq!(ui.current_tile(), Some(right));
        assert_eq!(
            *log.borrow(),
            alloc::vec![(home.0, TileEvent::Exit), (right.0, TileEvent::Enter)]
        );
    }

    #[test]
    fn test_switch_notification() {
        let mut ui = UiController::new(UiConfig::default());
        let home = ui.add_tile(Tile::new());
        ui.select_tile(home).unwrap();
        let sw = ui
            .add_widget(
                Some(home),
                Widget::switch(rect(0, 0, 100, 40)).with_handler(Action::Custom(4)),
            )
            .unwrap();
        let result = ui
            .send_widget_event(sw, WidgetEvent::Tap, Point::new(5, 5), 0)
            .unwrap();
        assert!(result.is_processed());
        assert_eq!(
            ui.poll_notification().unwrap().kind,
            NotificationKind::Switched(SwitchState::On)
        );
    }

    #[test]
    fn test_bad_handles() {
        let mut ui = UiController::new(UiConfig::default());
        assert_eq!(ui.select_tile(TileId(3)).err(), Some(UiError::UnknownTile(3)));
        assert!(matches!(ui.widget(WidgetId(1)), Err(UiError::UnknownWidget(1))));
        let a = ui.add_tile(Tile::new());
        assert!(ui.link_right(a, a).is_err());
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    #[test]
    fn test_widgets_are_clipped_to_their_box() {
        let mut ui = UiController::new(UiConfig::default());
        let home = ui.add_tile(Tile::new().with_background(Color::BLUE));
        ui.select_tile(home).unwrap();
        // The label text is far wider than its box
        ui.add_widget(
            Some(home),
            Widget::label(rect(10, 10, 20, 20), "clipped label text"),
        )
        .unwrap();
        let mut board = FakeBoard::default();
        ui.render(&mut board);

        let surface = ui.surface();
        for y in 0..240 {
            for x in 0..240 {
                let inside = (10..30).contains(&x) && (10..30).contains(&y);
                if !inside {
                    assert_eq!(surface.get_pixel(x, y), Color::BLUE, "leak at {x},{y}");
                }
            }
        }
    }

    #[test]
    fn test_transition_draws_both_tiles() {
        let mut ui = UiController::new(UiConfig::default());
        let a = ui.add_tile(Tile::new().with_background(Color::RED));
        let b = ui.add_tile(Tile::new().with_background(Color::GREEN));
        ui.link_right(a, b).unwrap();
        ui.select_tile(a).unwrap();
        ui.swipe_left();
        let mut board = FakeBoard::default();
        ui.process_events(&mut board, t0()).unwrap();
        assert_eq!(ui.surface().get_pixel(0, 0), Color::RED);
        assert_eq!(ui.surface().get_pixel(199, 0), Color::RED);
        assert_eq!(ui.surface().get_pixel(200, 0), Color::GREEN);
    }

    #[test]
    fn test_modal_drawn_on_top() {
        let mut ui = UiController::new(UiConfig::default());
        let home = ui.add_tile(Tile::new().with_background(Color::RED));
        ui.select_tile(home).unwrap();
        let modal = ui.add_tile(Tile::modal(20, 20, 100, 100).with_background(Color::GREEN));
        ui.set_modal(modal).unwrap();
        let mut board = FakeBoard::default();
        ui.render(&mut board);
        assert_eq!(ui.surface().get_pixel(10, 10), Color::RED);
        assert_eq!(ui.surface().get_pixel(21, 20), Color::WHITE);
        assert_eq!(ui.surface().get_pixel(60, 60), Color::GREEN);
    }
}
