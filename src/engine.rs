//! The engine facade.
//!
//! [`FlowEngine`] owns the graph store, the viewport and the interaction
//! state. Every committed mutation goes through it so that exactly one change
//! notification is emitted per operation.
//!
//! # Example
//!
//! ```ignore
//! use slint_flow_canvas::{EngineConfig, FlowEngine, Node, Edge, Point};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let engine = FlowEngine::new(
//!     EngineConfig::default(),
//!     vec![Node::new("a", Point::new(0.0, 0.0)), Node::new("b", Point::new(200.0, 0.0))],
//!     vec![Edge::new("a-b", "a", "b")],
//! )?;
//! let engine = Rc::new(RefCell::new(engine));
//!
//! // Events are delivered synchronously; do not borrow the engine inside.
//! engine.borrow_mut().subscribe(|event| println!("{event:?}"));
//!
//! window.on_pointer_down({
//!     let engine = engine.clone();
//!     move |x, y| engine.borrow_mut().pointer_down(Point::new(x, y), PointerButton::Primary, Modifiers::default())
//! });
//! ```

use crate::config::EngineConfig;
use crate::controls::{Control, ControlsOverlay};
use crate::error::{GraphError, MalformedGraphError};
use crate::events::{ChangeEvent, ChangeNotifier, Granularity, SubscriptionId};
use crate::geometry::{Point, Size, Viewport};
use crate::graph::{Edge, EdgeId, EdgePayload, EdgeSummary, Node, NodeId, NodePayload, NodeRole};
use crate::interaction::{InteractionState, PointerCoalescer};
use crate::minimap;
use crate::render::{Frame, Overlay, RenderStyle, Renderer};
use crate::selection::{self, Selection};
use crate::store::{GraphStore, Removal};
use crate::validation::{ConnectionRequest, ConnectionValidator, DefaultValidator, RejectReason, ValidationResult};
use std::sync::mpsc;
use tracing::debug;

/// Interactive diagram engine over node payload `N` and edge payload `E`.
pub struct FlowEngine<N = (), E = ()> {
    pub(crate) config: EngineConfig,
    pub(crate) store: GraphStore<N, E>,
    pub(crate) viewport: Viewport,
    pub(crate) surface: Size,
    pub(crate) state: InteractionState,
    pub(crate) pointer: PointerCoalescer,
    pub(crate) interactive: bool,
    pub(crate) last_rejection: Option<RejectReason>,
    renderer: Renderer,
    validator: Box<dyn ConnectionValidator<N, E>>,
    notifier: ChangeNotifier,
}

impl<N: NodePayload, E: EdgePayload + Default> FlowEngine<N, E> {
    /// Build an engine from an initial dataset.
    ///
    /// Every violation in the dataset is reported at once. With
    /// `fit_view_on_init` the viewport is fitted to the nodes; no events are
    /// emitted during construction.
    pub fn new(config: EngineConfig, nodes: Vec<Node<N>>, edges: Vec<Edge<E>>) -> Result<Self, MalformedGraphError> {
        let store = GraphStore::from_parts(nodes, edges)?;
        let mut engine = Self {
            surface: config.initial_viewport_size,
            renderer: Renderer::new(&config),
            validator: Box::new(DefaultValidator::from_config(&config)),
            notifier: ChangeNotifier::new(config.granularity),
            config,
            store,
            viewport: Viewport::default(),
            state: InteractionState::Idle,
            pointer: PointerCoalescer::default(),
            interactive: true,
            last_rejection: None,
        };
        if engine.config.fit_view_on_init {
            if let Some(fitted) = engine.fitted_viewport() {
                engine.viewport = fitted;
            }
        }
        debug!(
            nodes = engine.store.node_count(),
            edges = engine.store.edge_count(),
            scale = engine.viewport.scale,
            "engine created"
        );
        Ok(engine)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn store(&self) -> &GraphStore<N, E> {
        &self.store
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn viewport_size(&self) -> Size {
        self.surface
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node<N>> {
        self.store.nodes()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge<E>> {
        self.store.edges()
    }

    /// Reason the most recent connection attempt was refused, if it was.
    pub fn last_rejection(&self) -> Option<&RejectReason> {
        self.last_rejection.as_ref()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Lock or unlock node dragging, connecting and selecting. Locking
    /// cancels a gesture in progress.
    pub fn set_interactive(&mut self, interactive: bool) {
        if self.interactive != interactive {
            if !interactive {
                self.cancel();
            }
            self.interactive = interactive;
            debug!(interactive, "interactivity changed");
        }
    }

    pub fn set_style(&mut self, style: RenderStyle) {
        self.renderer.style = style;
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn subscribe_channel(&mut self) -> mpsc::Receiver<ChangeEvent> {
        self.notifier.subscribe_channel()
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.config.granularity = granularity;
        self.notifier.set_granularity(granularity);
    }

    /// Replace the connection policy.
    pub fn set_validator<V>(&mut self, validator: V)
    where
        V: ConnectionValidator<N, E> + 'static,
    {
        self.validator = Box::new(validator);
    }

    pub(crate) fn emit(&mut self, event: ChangeEvent) {
        self.notifier.emit(event);
    }

    // ========================================================================
    // Graph mutations
    // ========================================================================

    pub fn add_node(&mut self, node: Node<N>) -> Result<NodeId, GraphError> {
        let id = self.store.add_node(node)?;
        debug!(node = %id, "node added");
        self.emit(ChangeEvent::NodesAdded(vec![id.clone()]));
        Ok(id)
    }

    /// Add a node with the configured default size and its role's handles.
    pub fn add_node_at(
        &mut self,
        id: impl Into<NodeId>,
        position: Point,
        role: NodeRole,
        payload: N,
    ) -> Result<NodeId, GraphError> {
        let size = self.config.default_node_size;
        let node = Node::new(id, position)
            .with_role(role)
            .with_size(size.width, size.height)
            .with_payload(payload);
        self.add_node(node)
    }

    /// Add several nodes; nothing is added if any of them is invalid.
    pub fn add_nodes(&mut self, nodes: Vec<Node<N>>) -> Result<Vec<NodeId>, GraphError> {
        let ids = self.store.add_nodes(nodes)?;
        debug!(count = ids.len(), "nodes added");
        self.emit(ChangeEvent::NodesAdded(ids.clone()));
        Ok(ids)
    }

    pub fn add_edge(&mut self, edge: Edge<E>) -> Result<EdgeId, GraphError> {
        let summary = edge.summary();
        let id = self.store.add_edge(edge)?;
        debug!(edge = %id, "edge added");
        self.emit(ChangeEvent::EdgesChanged { added: vec![summary], removed: Vec::new() });
        Ok(id)
    }

    /// Add several edges; nothing is added if any of them is invalid.
    pub fn add_edges(&mut self, edges: Vec<Edge<E>>) -> Result<Vec<EdgeId>, GraphError> {
        let summaries: Vec<EdgeSummary> = edges.iter().map(Edge::summary).collect();
        let ids = self.store.add_edges(edges)?;
        debug!(count = ids.len(), "edges added");
        self.emit(ChangeEvent::EdgesChanged { added: summaries, removed: Vec::new() });
        Ok(ids)
    }

    /// Remove a node and every edge attached to it.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Removal<N, E>, GraphError> {
        let before = self.selection();
        let removal = self.store.remove_node(id)?;
        self.emit_removal(&removal, before);
        Ok(removal)
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Result<Edge<E>, GraphError> {
        let before = self.selection();
        let edge = self.store.remove_edge(id)?;
        debug!(edge = %id, "edge removed");
        self.emit(ChangeEvent::EdgesChanged { added: Vec::new(), removed: vec![edge.summary()] });
        self.emit_selection_if_changed(before);
        Ok(edge)
    }

    /// Delete every selected node and edge. Returns what was removed.
    pub fn delete_selected(&mut self) -> Removal<N, E> {
        let before = self.selection();
        if before.is_empty() {
            return Removal::default();
        }
        let removal = self.store.remove_many(&before.nodes, &before.edges);
        self.emit_removal(&removal, before);
        removal
    }

    /// Edges first, then nodes, then the selection: the store is already
    /// consistent when the first event is delivered.
    fn emit_removal(&mut self, removal: &Removal<N, E>, before: Selection) {
        if removal.is_empty() {
            return;
        }
        debug!(nodes = removal.nodes.len(), edges = removal.edges.len(), "removed");
        self.emit(ChangeEvent::EdgesChanged {
            added: Vec::new(),
            removed: removal.edges.iter().map(Edge::summary).collect(),
        });
        self.emit(ChangeEvent::NodesRemoved(removal.node_ids()));
        self.emit_selection_if_changed(before);
    }

    /// Move a node to `position` (world coordinates, top-left corner).
    pub fn update_node_position(&mut self, id: &NodeId, position: Point) -> Result<(), GraphError> {
        let previous = self.store.update_node_position(id, position)?;
        if previous != position {
            self.emit(ChangeEvent::NodesChanged(vec![(id.clone(), position)]));
        }
        Ok(())
    }

    /// Report a node's measured size. Geometry only; emits nothing.
    pub fn resize_node(&mut self, id: &NodeId, size: Size) -> Result<(), GraphError> {
        self.store.resize_node(id, size)?;
        Ok(())
    }

    /// Validate a connection and commit it as a new edge.
    ///
    /// The stored edge follows the validator's orientation and gets a fresh
    /// id and a default payload.
    pub fn connect(&mut self, request: ConnectionRequest) -> Result<EdgeId, RejectReason> {
        let conn = match self.validator.validate(&request, &self.store) {
            ValidationResult::Accept(conn) => conn,
            ValidationResult::Reject(reason) => {
                debug!(source = %request.source, target = %request.target, %reason, "connection rejected");
                self.last_rejection = Some(reason.clone());
                return Err(reason);
            }
        };

        let id = self.store.next_edge_id(
            &conn.source,
            conn.source_handle.as_ref(),
            &conn.target,
            conn.target_handle.as_ref(),
        );
        let edge = Edge::new(id, conn.source, conn.target)
            .with_handles(conn.source_handle, conn.target_handle)
            .with_payload(E::default());
        match self.add_edge(edge) {
            Ok(id) => {
                self.last_rejection = None;
                Ok(id)
            }
            Err(err) => {
                let reason = RejectReason::Custom(err.to_string());
                self.last_rejection = Some(reason.clone());
                Err(reason)
            }
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selection(&self) -> Selection {
        Selection::from_store(&self.store)
    }

    /// Select the given ids. With `additive` the current selection is kept.
    pub fn select(&mut self, nodes: &[NodeId], edges: &[EdgeId], additive: bool) {
        let before = self.selection();
        if additive {
            selection::extend_selection(&mut self.store, nodes, edges);
        } else {
            selection::replace_selection(&mut self.store, nodes, edges);
        }
        self.emit_selection_if_changed(before);
    }

    pub fn select_all(&mut self) {
        let before = self.selection();
        selection::select_all(&mut self.store);
        self.emit_selection_if_changed(before);
    }

    pub fn clear_selection(&mut self) {
        let before = self.selection();
        self.store.clear_selection();
        self.emit_selection_if_changed(before);
    }

    pub(crate) fn emit_selection_if_changed(&mut self, before: Selection) {
        let after = self.selection();
        if after != before {
            debug!(nodes = after.nodes.len(), edges = after.edges.len(), "selection changed");
            self.emit(ChangeEvent::SelectionChanged { nodes: after.nodes, edges: after.edges });
        }
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    /// Replace the viewport; the scale is clamped to the zoom range.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        let clamped = Viewport { scale: self.config.zoom_range.clamp(viewport.scale), ..viewport };
        self.commit_viewport(clamped);
    }

    pub(crate) fn commit_viewport(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport || !(viewport.x.is_finite() && viewport.y.is_finite()) {
            return false;
        }
        self.viewport = viewport;
        debug!(x = viewport.x, y = viewport.y, scale = viewport.scale, "viewport changed");
        self.emit(ChangeEvent::ViewportChanged(viewport));
        true
    }

    /// Zoom by `2^delta` around a screen point.
    pub fn zoom_at(&mut self, anchor: Point, delta: f32) {
        let next = self.viewport.zoom_at(anchor, delta, &self.config.zoom_range);
        self.commit_viewport(next);
    }

    /// Zoom in by `zoom_step` around the surface center.
    pub fn zoom_in(&mut self) {
        self.zoom_around_center(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_around_center(1.0 / self.config.zoom_step);
    }

    fn zoom_around_center(&mut self, factor: f32) {
        let center = Point::new(self.surface.width * 0.5, self.surface.height * 0.5);
        let next = self.viewport.zoom_by_factor(center, factor, &self.config.zoom_range);
        self.commit_viewport(next);
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        let next = self.viewport.pan_by(delta);
        self.commit_viewport(next);
    }

    /// Fit every node into the surface. Does nothing on an empty graph.
    pub fn fit_view(&mut self) {
        if let Some(fitted) = self.fitted_viewport() {
            self.commit_viewport(fitted);
        }
    }

    fn fitted_viewport(&self) -> Option<Viewport> {
        let bounds = self.store.bounds()?;
        Some(Viewport::fit_to_bounds(
            &bounds,
            self.surface,
            self.config.fit_view_padding,
            &self.config.zoom_range,
        ))
    }

    /// Keep the scale and put `world` in the middle of the surface.
    pub fn center_on(&mut self, world: Point) {
        let next = self.viewport.center_on(world, self.surface);
        self.commit_viewport(next);
    }

    /// Report the host surface size. Invalid sizes are ignored.
    pub fn set_viewport_size(&mut self, size: Size) {
        if size.is_valid() {
            self.surface = size;
        }
    }

    // ========================================================================
    // Controls & rendering
    // ========================================================================

    pub fn controls(&self) -> ControlsOverlay {
        ControlsOverlay::layout(self.surface, &self.config.controls)
    }

    pub fn apply_control(&mut self, control: Control) {
        debug!(?control, "control pressed");
        match control {
            Control::ZoomIn => self.zoom_in(),
            Control::ZoomOut => self.zoom_out(),
            Control::FitView => self.fit_view(),
            Control::ToggleInteractivity => self.set_interactive(!self.interactive),
        }
    }

    /// Produce the next frame. Applies the latest coalesced pointer move
    /// first. `time` is in seconds and animates dashed flows.
    pub fn frame(&mut self, time: f32) -> Frame {
        self.flush_pointer();
        let overlay = Overlay {
            transient_edge: self.state.transient_edge(),
            selection_box: self.state.selection_box(),
            controls: self.config.controls.visible.then(|| self.controls()),
            interactive: self.interactive,
        };
        Frame {
            viewport: self.viewport,
            surface: self.surface,
            commands: self.renderer.render(&self.store, &self.viewport, self.surface, &overlay, time),
            minimap: minimap::project(&self.store, &self.viewport, self.surface, &self.config.minimap),
        }
    }
}

impl<N, E> std::fmt::Debug for FlowEngine<N, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowEngine")
            .field("nodes", &self.store.node_count())
            .field("edges", &self.store.edge_count())
            .field("viewport", &self.viewport)
            .field("state", &self.state)
            .field("interactive", &self.interactive)
            .field("notifier", &self.notifier)
            .finish()
    }
}
