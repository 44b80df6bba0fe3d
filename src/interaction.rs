//! Pointer and keyboard handling.
//!
//! The current gesture is a single [`InteractionState`] value. Each input
//! method on [`FlowEngine`] is a transition: it inspects the state, mutates
//! the store or viewport, and emits at most the events the gesture commits.
//!
//! All pointer positions are in screen coordinates of the host surface.

use crate::config::ConnectionMode;
use crate::engine::FlowEngine;
use crate::events::ChangeEvent;
use crate::geometry::{Point, Rect, Viewport};
use crate::graph::{EdgePayload, HandleId, NodeId, NodePayload, Side};
use crate::hit_test::{edges_in_box, find_edge_at, find_handle_at, find_node_at, nodes_in_box};
use crate::minimap;
use crate::selection::{self, SelectTarget};
use crate::validation::ConnectionRequest;
use slint::platform;
use slint::SharedString;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, meta: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false, meta: false };
    pub const CTRL: Modifiers = Modifiers { shift: false, ctrl: true, meta: false };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Character(char),
}

impl Key {
    /// Map a Slint special key. Keys the engine has no binding for give `None`.
    pub fn from_platform(key: platform::Key) -> Option<Key> {
        match key {
            platform::Key::Escape => Some(Key::Escape),
            platform::Key::Delete => Some(Key::Delete),
            platform::Key::Backspace => Some(Key::Backspace),
            _ => None,
        }
    }

    /// Map the text of a Slint `KeyEvent` to a key.
    pub fn from_text(text: &str) -> Option<Key> {
        let special = [platform::Key::Escape, platform::Key::Delete, platform::Key::Backspace]
            .into_iter()
            .find(|&key| SharedString::from(key).as_str() == text);
        if let Some(key) = special {
            return Key::from_platform(key);
        }
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Key::Character(c)),
            _ => None,
        }
    }
}

/// The gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    DraggingNode {
        node: NodeId,
        /// Pointer world position minus the node's top-left corner at press.
        grab_offset: Point,
        /// Position of `node` at press time.
        origin: Point,
        /// Other selected nodes moving along, with their press-time positions.
        followers: Vec<(NodeId, Point)>,
        /// Screen position of the press, for the drag threshold.
        press: Point,
        moved: bool,
    },
    DrawingConnection {
        source: NodeId,
        source_handle: HandleId,
        /// World anchor of the source handle and the side it sits on.
        anchor: Point,
        side: Side,
        pointer_world: Point,
        /// Screen position of the press; a release within the drag
        /// threshold is a click, not a connection.
        press: Point,
    },
    Panning {
        start_pointer: Point,
        start_viewport: Viewport,
        moved: bool,
        /// A click without movement clears the selection.
        clears_selection: bool,
    },
    BoxSelecting {
        start_world: Point,
        current_world: Point,
        additive: bool,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub(crate) fn transient_edge(&self) -> Option<(Point, Side, Point)> {
        match self {
            InteractionState::DrawingConnection { anchor, side, pointer_world, .. } => {
                Some((*anchor, *side, *pointer_world))
            }
            _ => None,
        }
    }

    pub(crate) fn selection_box(&self) -> Option<Rect> {
        match self {
            InteractionState::BoxSelecting { start_world, current_world, .. } => {
                Some(Rect::from_points(*start_world, *current_world))
            }
            _ => None,
        }
    }
}

/// Keeps only the most recent pointer move until it is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerCoalescer {
    pending: Option<Point>,
    last: Point,
}

impl PointerCoalescer {
    pub fn record(&mut self, position: Point) {
        self.pending = Some(position);
        self.last = position;
    }

    pub fn take(&mut self) -> Option<Point> {
        self.pending.take()
    }

    /// Last known pointer position, applied or not.
    pub fn last(&self) -> Point {
        self.last
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl<N: NodePayload, E: EdgePayload + Default> FlowEngine<N, E> {
    pub fn pointer_down(&mut self, position: Point, button: PointerButton, modifiers: Modifiers) {
        if !self.state.is_idle() {
            // A missed release; finish the old gesture where it was
            let last = self.pointer.last();
            self.pointer_up(last);
        }
        self.pointer.record(position);
        self.pointer.clear();

        match button {
            PointerButton::Secondary => return,
            PointerButton::Middle => {
                self.start_panning(position, false);
                return;
            }
            PointerButton::Primary => {}
        }

        if let Some(control) = self.controls().hit(position) {
            self.apply_control(control);
            return;
        }

        if let Some(map) = minimap::project(&self.store, &self.viewport, self.surface, &self.config.minimap) {
            if map.contains(position) {
                let world = map.panel_to_world(position);
                debug!(x = world.x, y = world.y, "minimap pan");
                self.center_on(world);
                return;
            }
        }

        if !self.interactive {
            self.start_panning(position, false);
            return;
        }

        let world = self.viewport.screen_to_world(position);
        let scale = self.viewport.scale;

        if let Some(hit) = find_handle_at(&self.store, world, self.config.handle_radius / scale) {
            let side = self
                .store
                .node(&hit.node)
                .and_then(|n| n.handle(&hit.handle))
                .map_or(Side::Bottom, |h| h.side);
            debug!(node = %hit.node, handle = %hit.handle, "connection started");
            self.last_rejection = None;
            self.state = InteractionState::DrawingConnection {
                source: hit.node,
                source_handle: hit.handle,
                anchor: hit.anchor,
                side,
                pointer_world: world,
                press: position,
            };
            return;
        }

        if let Some(id) = find_node_at(&self.store, world) {
            let before = self.selection();
            selection::click_select(&mut self.store, &SelectTarget::Node(id.clone()), modifiers.shift);
            self.emit_selection_if_changed(before);

            let Some(node) = self.store.node(&id) else {
                return;
            };
            if !node.draggable || !node.selected {
                return;
            }
            let origin = node.position;
            let followers = self
                .store
                .nodes()
                .filter(|n| n.selected && n.draggable && n.id != id)
                .map(|n| (n.id.clone(), n.position))
                .collect();
            debug!(node = %id, "drag started");
            self.state = InteractionState::DraggingNode {
                node: id,
                grab_offset: world - origin,
                origin,
                followers,
                press: position,
                moved: false,
            };
            return;
        }

        let edge_tolerance = self.config.edge_hit_distance / scale;
        if let Some(id) = find_edge_at(&self.store, world, edge_tolerance, self.config.bezier_min_offset) {
            let before = self.selection();
            selection::click_select(&mut self.store, &SelectTarget::Edge(id), modifiers.shift);
            self.emit_selection_if_changed(before);
            return;
        }

        if modifiers.shift || self.config.selection_on_drag {
            self.state = InteractionState::BoxSelecting {
                start_world: world,
                current_world: world,
                additive: modifiers.shift,
            };
        } else {
            self.start_panning(position, true);
        }
    }

    fn start_panning(&mut self, position: Point, clears_selection: bool) {
        self.state = InteractionState::Panning {
            start_pointer: position,
            start_viewport: self.viewport,
            moved: false,
            clears_selection,
        };
    }

    /// Record a pointer move. Only the latest move is applied, on the next
    /// [`frame`](FlowEngine::frame) or release.
    pub fn pointer_move(&mut self, position: Point) {
        self.pointer.record(position);
    }

    /// Apply the latest recorded pointer move, if any.
    pub fn flush_pointer(&mut self) {
        if let Some(position) = self.pointer.take() {
            self.apply_move(position);
        }
    }

    fn apply_move(&mut self, position: Point) {
        let world = self.viewport.screen_to_world(position);
        let threshold = self.config.drag_threshold;
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::DraggingNode { node, grab_offset, origin, followers, press, moved } => {
                if !*moved && press.distance(position) < threshold {
                    return;
                }
                *moved = true;
                let target = world - *grab_offset;
                let delta = target - *origin;
                trace!(node = %node, x = target.x, y = target.y, "drag");
                let moves: Vec<(NodeId, Point)> = std::iter::once((node.clone(), target))
                    .chain(followers.iter().map(|(id, start)| (id.clone(), *start + delta)))
                    .collect();
                for (id, pos) in moves {
                    if let Err(err) = self.store.update_node_position(&id, pos) {
                        debug!(%err, "drag update skipped");
                    }
                }
            }
            InteractionState::DrawingConnection { pointer_world, .. } => {
                *pointer_world = world;
            }
            InteractionState::Panning { start_pointer, start_viewport, moved, .. } => {
                let delta = position - *start_pointer;
                if delta != Point::ZERO {
                    *moved = true;
                }
                self.viewport = start_viewport.pan_by(delta);
            }
            InteractionState::BoxSelecting { current_world, .. } => {
                *current_world = world;
            }
        }
    }

    pub fn pointer_up(&mut self, position: Point) {
        self.pointer.record(position);
        self.flush_pointer();

        match std::mem::take(&mut self.state) {
            InteractionState::Idle => {}
            InteractionState::DraggingNode { node, followers, moved, .. } => {
                if !moved {
                    return;
                }
                let positions: Vec<(NodeId, Point)> = std::iter::once(node)
                    .chain(followers.into_iter().map(|(id, _)| id))
                    .filter_map(|id| self.store.node(&id).map(|n| (id, n.position)))
                    .collect();
                debug!(count = positions.len(), "drag finished");
                self.emit(ChangeEvent::NodesChanged(positions));
            }
            InteractionState::DrawingConnection { source, source_handle, press, .. } => {
                if press.distance(position) < self.config.drag_threshold {
                    debug!(source = %source, "connection discarded without drag");
                    return;
                }
                self.finish_connection(source, source_handle, position);
            }
            InteractionState::Panning { start_viewport, moved, clears_selection, .. } => {
                if moved {
                    if self.viewport != start_viewport {
                        let viewport = self.viewport;
                        self.emit(ChangeEvent::ViewportChanged(viewport));
                    }
                } else if clears_selection {
                    self.clear_selection();
                }
            }
            InteractionState::BoxSelecting { start_world, current_world, additive } => {
                let area = Rect::from_points(start_world, current_world);
                let nodes = nodes_in_box(&self.store, &area);
                let edges = edges_in_box(&self.store, &area);
                debug!(nodes = nodes.len(), edges = edges.len(), "box selection");
                self.select(&nodes, &edges, additive);
            }
        }
    }

    fn finish_connection(&mut self, source: NodeId, source_handle: HandleId, position: Point) {
        let world = self.viewport.screen_to_world(position);
        let radius = self.config.handle_radius / self.viewport.scale;

        let target = match find_handle_at(&self.store, world, radius) {
            Some(hit) if hit.node == source && hit.handle == source_handle => {
                debug!(source = %source, "connection released on its own handle");
                return;
            }
            Some(hit) => Some((hit.node, Some(hit.handle))),
            None if self.config.connection_mode == ConnectionMode::Loose => {
                find_node_at(&self.store, world).map(|id| (id, None))
            }
            None => None,
        };
        let Some((target, target_handle)) = target else {
            debug!(source = %source, "connection dropped on empty canvas");
            return;
        };

        let request = ConnectionRequest {
            source,
            source_handle: Some(source_handle),
            target,
            target_handle,
        };
        // A rejection is recorded in `last_rejection`
        let _ = self.connect(request);
    }

    /// The pointer left the surface: release at the last known position.
    pub fn pointer_leave(&mut self) {
        if !self.state.is_idle() {
            let last = self.pointer.last();
            self.pointer_up(last);
        }
    }

    /// Abort the current gesture without committing anything. Dragged nodes
    /// and a panned viewport return to where they started. Returns false when
    /// there was nothing to cancel.
    pub fn cancel(&mut self) -> bool {
        self.pointer.clear();
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => return false,
            InteractionState::DraggingNode { node, origin, followers, .. } => {
                for (id, pos) in std::iter::once((node, origin)).chain(followers) {
                    if let Err(err) = self.store.update_node_position(&id, pos) {
                        debug!(%err, "drag revert skipped");
                    }
                }
            }
            InteractionState::Panning { start_viewport, .. } => {
                self.viewport = start_viewport;
            }
            InteractionState::DrawingConnection { .. } | InteractionState::BoxSelecting { .. } => {}
        }
        debug!("gesture cancelled");
        true
    }

    /// Returns true when the key was handled.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match key {
            Key::Escape => self.cancel(),
            Key::Delete | Key::Backspace => {
                if !self.interactive || !self.state.is_idle() {
                    return false;
                }
                !self.delete_selected().is_empty()
            }
            Key::Character(c) if modifiers.command() && c.eq_ignore_ascii_case(&'a') => {
                if !self.interactive || !self.state.is_idle() {
                    return false;
                }
                self.select_all();
                true
            }
            Key::Character(_) => false,
        }
    }

    /// Zoom around the pointer. Positive `delta_y` (scrolling down) zooms out.
    pub fn wheel(&mut self, position: Point, delta_y: f32) {
        if matches!(self.state, InteractionState::Panning { .. }) {
            return;
        }
        self.zoom_at(position, -delta_y * self.config.wheel_sensitivity);
    }
}
