//! Authoritative, insertion-ordered collection of nodes and edges.
//!
//! Every mutation either succeeds completely or leaves the store untouched.
//! Edges never outlive their endpoints: removing a node removes its edges.

use crate::error::{DuplicateIdError, GraphError, MalformedGraphError};
use crate::geometry::{Point, Rect, Size};
use crate::graph::{Edge, EdgeId, HandleId, HandleKind, Node, NodeId, Side};
use indexmap::{IndexMap, IndexSet};

/// Everything removed by a single delete, in removal order.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal<N, E> {
    pub nodes: Vec<Node<N>>,
    pub edges: Vec<Edge<E>>,
}

impl<N, E> Default for Removal<N, E> {
    fn default() -> Self {
        Self { nodes: Vec::new(), edges: Vec::new() }
    }
}

impl<N, E> Removal<N, E> {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }
}

/// World-space anchor points of both ends of an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAnchors {
    pub source: Point,
    pub source_side: Side,
    pub target: Point,
    pub target_side: Side,
}

/// Graph storage. Node order is paint order: later nodes are on top.
#[derive(Debug, Clone)]
pub struct GraphStore<N = (), E = ()> {
    nodes: IndexMap<NodeId, Node<N>>,
    edges: IndexMap<EdgeId, Edge<E>>,
}

impl<N, E> Default for GraphStore<N, E> {
    fn default() -> Self {
        Self { nodes: IndexMap::new(), edges: IndexMap::new() }
    }
}

impl<N, E> GraphStore<N, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an initial dataset, collecting every violation.
    pub fn from_parts(nodes: Vec<Node<N>>, edges: Vec<Edge<E>>) -> Result<Self, MalformedGraphError> {
        let mut store = Self::new();
        let mut violations = Vec::new();

        for node in nodes {
            if let Err(e) = Self::check_node(&node) {
                violations.push(e);
            }
            if store.nodes.contains_key(&node.id) {
                violations.push(DuplicateIdError::node(&node.id).into());
                continue;
            }
            store.nodes.insert(node.id.clone(), node);
        }

        for edge in edges {
            if store.edges.contains_key(&edge.id) {
                violations.push(DuplicateIdError::edge(&edge.id).into());
                continue;
            }
            let before = violations.len();
            violations.extend(store.edge_violations(&edge));
            if violations.len() == before {
                store.edges.insert(edge.id.clone(), edge);
            }
        }

        if violations.is_empty() {
            Ok(store)
        } else {
            Err(MalformedGraphError { violations })
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn check_node(node: &Node<N>) -> Result<(), GraphError> {
        if !node.position.is_finite() {
            return Err(GraphError::NonFinitePosition(node.id.clone()));
        }
        if !node.size.is_valid() {
            return Err(GraphError::InvalidSize {
                node: node.id.clone(),
                width: node.size.width,
                height: node.size.height,
            });
        }
        Ok(())
    }

    fn edge_violations(&self, edge: &Edge<E>) -> Vec<GraphError> {
        let mut out = Vec::new();
        let ends = [(&edge.source, &edge.source_handle), (&edge.target, &edge.target_handle)];
        for (node_id, handle) in ends {
            match self.nodes.get(node_id) {
                None => out.push(GraphError::DanglingEdge { edge: edge.id.clone(), node: node_id.clone() }),
                Some(node) => {
                    if let Some(handle) = handle {
                        if node.handle(handle).is_none() {
                            out.push(GraphError::UnknownHandle {
                                node: node_id.clone(),
                                handle: handle.clone(),
                            });
                        }
                    }
                }
            }
        }
        out
    }

    fn check_edge(&self, edge: &Edge<E>) -> Result<(), GraphError> {
        match self.edge_violations(edge).into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Re-check every invariant. Empty when the store is consistent.
    pub fn check_invariants(&self) -> Vec<GraphError> {
        let mut out: Vec<GraphError> = self
            .nodes
            .values()
            .filter_map(|n| Self::check_node(n).err())
            .collect();
        for edge in self.edges.values() {
            out.extend(self.edge_violations(edge));
        }
        out
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    pub fn add_node(&mut self, node: Node<N>) -> Result<NodeId, GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(DuplicateIdError::node(&node.id).into());
        }
        Self::check_node(&node)?;
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Add several nodes. The whole batch is validated before any is inserted.
    pub fn add_nodes(&mut self, nodes: Vec<Node<N>>) -> Result<Vec<NodeId>, GraphError> {
        let mut seen = IndexSet::new();
        for node in &nodes {
            if self.nodes.contains_key(&node.id) || !seen.insert(&node.id) {
                return Err(DuplicateIdError::node(&node.id).into());
            }
            Self::check_node(node)?;
        }
        let ids = nodes.iter().map(|n| n.id.clone()).collect();
        self.nodes.extend(nodes.into_iter().map(|n| (n.id.clone(), n)));
        Ok(ids)
    }

    pub fn add_edge(&mut self, edge: Edge<E>) -> Result<EdgeId, GraphError> {
        if self.edges.contains_key(&edge.id) {
            return Err(DuplicateIdError::edge(&edge.id).into());
        }
        self.check_edge(&edge)?;
        let id = edge.id.clone();
        self.edges.insert(id.clone(), edge);
        Ok(id)
    }

    /// Add several edges, all-or-nothing.
    pub fn add_edges(&mut self, edges: Vec<Edge<E>>) -> Result<Vec<EdgeId>, GraphError> {
        let mut seen = IndexSet::new();
        for edge in &edges {
            if self.edges.contains_key(&edge.id) || !seen.insert(&edge.id) {
                return Err(DuplicateIdError::edge(&edge.id).into());
            }
            self.check_edge(edge)?;
        }
        let ids = edges.iter().map(|e| e.id.clone()).collect();
        self.edges.extend(edges.into_iter().map(|e| (e.id.clone(), e)));
        Ok(ids)
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Removal<N, E>, GraphError> {
        if !self.nodes.contains_key(id) {
            return Err(GraphError::NodeNotFound(id.clone()));
        }
        Ok(self.remove_many(std::slice::from_ref(id), &[]))
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Result<Edge<E>, GraphError> {
        self.edges
            .shift_remove(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))
    }

    /// Remove the given nodes (with their edges) and edges in one step.
    ///
    /// Unknown ids are skipped. Edges are listed once even when both an
    /// endpoint and the edge itself were requested.
    pub fn remove_many(&mut self, nodes: &[NodeId], edges: &[EdgeId]) -> Removal<N, E> {
        let doomed_nodes: IndexSet<&NodeId> = nodes.iter().filter(|id| self.nodes.contains_key(*id)).collect();
        let doomed_edges: Vec<EdgeId> = self
            .edges
            .values()
            .filter(|e| {
                edges.contains(&e.id)
                    || doomed_nodes.contains(&e.source)
                    || doomed_nodes.contains(&e.target)
            })
            .map(|e| e.id.clone())
            .collect();

        let mut removal = Removal::default();
        for id in &doomed_edges {
            if let Some(edge) = self.edges.shift_remove(id) {
                removal.edges.push(edge);
            }
        }
        for id in doomed_nodes {
            if let Some(node) = self.nodes.shift_remove(id) {
                removal.nodes.push(node);
            }
        }
        removal
    }

    // ========================================================================
    // In-place mutation
    // ========================================================================

    /// Move a node. Returns the previous position.
    pub fn update_node_position(&mut self, id: &NodeId, position: Point) -> Result<Point, GraphError> {
        if !position.is_finite() {
            return Err(GraphError::NonFinitePosition(id.clone()));
        }
        let node = self.nodes.get_mut(id).ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        Ok(std::mem::replace(&mut node.position, position))
    }

    /// Replace a node's size, e.g. with a host-measured intrinsic size.
    pub fn resize_node(&mut self, id: &NodeId, size: Size) -> Result<Size, GraphError> {
        if !size.is_valid() {
            return Err(GraphError::InvalidSize { node: id.clone(), width: size.width, height: size.height });
        }
        let node = self.nodes.get_mut(id).ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        Ok(std::mem::replace(&mut node.size, size))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn node(&self, id: &NodeId) -> Option<&Node<N>> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge<E>> {
        self.edges.get(id)
    }

    /// Nodes in paint order (bottom first).
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node<N>> + ExactSizeIterator {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl DoubleEndedIterator<Item = &Edge<E>> + ExactSizeIterator {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    pub fn edges_for_node<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge<E>> + 'a {
        self.edges.values().filter(move |e| e.involves_node(id))
    }

    /// Union of all node rectangles, `None` when the store has no nodes.
    pub fn bounds(&self) -> Option<Rect> {
        Rect::union_all(self.nodes.values().map(Node::rect))
    }

    /// Anchor points of both ends of `edge`, `None` if an endpoint is missing.
    pub fn edge_anchors(&self, edge: &Edge<E>) -> Option<EdgeAnchors> {
        let source = self.nodes.get(&edge.source)?;
        let target = self.nodes.get(&edge.target)?;
        let (source_point, source_side) = source.anchor(edge.source_handle.as_ref(), HandleKind::Source);
        let (target_point, target_side) = target.anchor(edge.target_handle.as_ref(), HandleKind::Target);
        Some(EdgeAnchors { source: source_point, source_side, target: target_point, target_side })
    }

    /// True when an edge already connects exactly these endpoints and handles.
    pub fn has_connection(
        &self,
        source: &NodeId,
        source_handle: Option<&HandleId>,
        target: &NodeId,
        target_handle: Option<&HandleId>,
    ) -> bool {
        self.edges.values().any(|e| {
            &e.source == source
                && &e.target == target
                && e.source_handle.as_ref() == source_handle
                && e.target_handle.as_ref() == target_handle
        })
    }

    /// A fresh edge id derived from the endpoints, suffixed when taken.
    pub fn next_edge_id(
        &self,
        source: &NodeId,
        source_handle: Option<&HandleId>,
        target: &NodeId,
        target_handle: Option<&HandleId>,
    ) -> EdgeId {
        let handle = |h: Option<&HandleId>| h.map(HandleId::as_str).unwrap_or_default().to_owned();
        let base = format!("edge-{}{}-{}{}", source, handle(source_handle), target, handle(target_handle));
        let mut candidate = EdgeId::new(base.clone());
        let mut n = 1;
        while self.edges.contains_key(&candidate) {
            candidate = EdgeId::new(format!("{base}-{n}"));
            n += 1;
        }
        candidate
    }

    // ========================================================================
    // Selection flags
    // ========================================================================

    /// Returns true if the flag changed.
    pub fn set_node_selected(&mut self, id: &NodeId, selected: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.selected != selected => {
                node.selected = selected;
                true
            }
            _ => false,
        }
    }

    /// Returns true if the flag changed.
    pub fn set_edge_selected(&mut self, id: &EdgeId, selected: bool) -> bool {
        match self.edges.get_mut(id) {
            Some(edge) if edge.selected != selected => {
                edge.selected = selected;
                true
            }
            _ => false,
        }
    }

    /// Clear every selection flag. Returns true if anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        let mut changed = false;
        for node in self.nodes.values_mut() {
            changed |= std::mem::replace(&mut node.selected, false);
        }
        for edge in self.edges.values_mut() {
            changed |= std::mem::replace(&mut edge.selected, false);
        }
        changed
    }

    pub fn selected_node_ids(&self) -> Vec<NodeId> {
        self.nodes.values().filter(|n| n.selected).map(|n| n.id.clone()).collect()
    }

    pub fn selected_edge_ids(&self) -> Vec<EdgeId> {
        self.edges.values().filter(|e| e.selected).map(|e| e.id.clone()).collect()
    }
}
