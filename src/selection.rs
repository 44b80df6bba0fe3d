use crate::graph::{EdgeId, NodeId};
use crate::store::GraphStore;
use slint::{SharedString, VecModel};

/// Something a click can select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectTarget {
    Node(NodeId),
    Edge(EdgeId),
}

/// Snapshot of the selected ids, derived from the store's selection flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Selection {
    pub fn from_store<N, E>(store: &GraphStore<N, E>) -> Self {
        Self { nodes: store.selected_node_ids(), edges: store.selected_edge_ids() }
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    /// Sync the selected ids into Slint VecModels, replacing their contents
    pub fn sync_to_model(&self, nodes: &VecModel<SharedString>, edges: &VecModel<SharedString>) {
        nodes.set_vec(self.nodes.iter().map(|id| SharedString::from(id.as_str())).collect::<Vec<_>>());
        edges.set_vec(self.edges.iter().map(|id| SharedString::from(id.as_str())).collect::<Vec<_>>());
    }
}

fn is_selected<N, E>(store: &GraphStore<N, E>, target: &SelectTarget) -> bool {
    match target {
        SelectTarget::Node(id) => store.node(id).map_or(false, |n| n.selected),
        SelectTarget::Edge(id) => store.edge(id).map_or(false, |e| e.selected),
    }
}

fn set_selected<N, E>(store: &mut GraphStore<N, E>, target: &SelectTarget, selected: bool) -> bool {
    match target {
        SelectTarget::Node(id) => store.set_node_selected(id, selected),
        SelectTarget::Edge(id) => store.set_edge_selected(id, selected),
    }
}

/// Apply click selection to the store's flags. Returns true if anything changed.
///
/// Shift toggles the target and keeps the rest. A plain click selects only the
/// target, unless it already is the sole selection. A plain click on a target
/// that is part of a larger selection keeps the selection intact so the group
/// can be dragged.
pub fn click_select<N, E>(store: &mut GraphStore<N, E>, target: &SelectTarget, shift_held: bool) -> bool {
    let currently = is_selected(store, target);
    if shift_held {
        return set_selected(store, target, !currently);
    }
    if currently {
        return false;
    }
    let mut changed = store.clear_selection();
    changed |= set_selected(store, target, true);
    changed
}

/// Replace the selection with exactly the given ids. Returns true if anything changed.
pub fn replace_selection<N, E>(store: &mut GraphStore<N, E>, nodes: &[NodeId], edges: &[EdgeId]) -> bool {
    let before = Selection::from_store(store);
    store.clear_selection();
    for id in nodes {
        store.set_node_selected(id, true);
    }
    for id in edges {
        store.set_edge_selected(id, true);
    }
    Selection::from_store(store) != before
}

/// Add the given ids to the selection. Returns true if anything changed.
pub fn extend_selection<N, E>(store: &mut GraphStore<N, E>, nodes: &[NodeId], edges: &[EdgeId]) -> bool {
    let mut changed = false;
    for id in nodes {
        changed |= store.set_node_selected(id, true);
    }
    for id in edges {
        changed |= store.set_edge_selected(id, true);
    }
    changed
}

/// Select every node and edge. Returns true if anything changed.
pub fn select_all<N, E>(store: &mut GraphStore<N, E>) -> bool {
    let nodes: Vec<NodeId> = store.nodes().map(|n| n.id.clone()).collect();
    let edges: Vec<EdgeId> = store.edges().map(|e| e.id.clone()).collect();
    extend_selection(store, &nodes, &edges)
}
