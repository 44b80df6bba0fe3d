//! Level 4: Selection Tests
//!
//! Tests single selection, multi-selection with Shift, edge selection, box
//! selection, selection clearing and mirroring into Slint models.

mod common;

use common::harness::{plain_config, FlowHarness};
use slint::{Model, SharedString, VecModel};
use slint_flow_canvas::{ChangeEvent, EdgeId, Modifiers, NodeId, Point};

fn ids(nodes: &[&str]) -> Vec<NodeId> {
    nodes.iter().map(|id| NodeId::from(*id)).collect()
}

/// A point on the a-b edge, away from both nodes.
fn on_edge(harness: &FlowHarness) -> Point {
    let store = harness.engine.store();
    let edge = store.edge(&EdgeId::from("a-b")).unwrap();
    let anchors = store.edge_anchors(edge).unwrap();
    let curve = slint_flow_canvas::CubicBezier::between(
        anchors.source,
        anchors.source_side,
        anchors.target,
        anchors.target_side,
        1.0,
        harness.engine.config().bezier_min_offset,
    );
    harness.screen(curve.midpoint())
}

// ============================================================================
// Single Selection Tests
// ============================================================================

#[test]
fn test_single_click_selects_node() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(110.0, 110.0));

    assert_eq!(harness.engine.selection().nodes, ids(&["a"]));
    assert_eq!(
        harness.events.all(),
        vec![ChangeEvent::SelectionChanged { nodes: ids(&["a"]), edges: vec![] }]
    );
}

#[test]
fn test_click_replaces_selection() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(110.0, 110.0));
    harness.click(Point::new(410.0, 310.0));
    assert_eq!(harness.engine.selection().nodes, ids(&["b"]));
    assert_eq!(harness.events.selection_changes(), 2);
}

#[test]
fn test_click_on_selected_node_is_silent() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(110.0, 110.0));
    harness.click(Point::new(120.0, 120.0));
    assert_eq!(harness.events.selection_changes(), 1);
}

#[test]
fn test_topmost_node_wins() {
    let mut harness = FlowHarness::new(
        plain_config(),
        vec![
            common::harness::node("under", 0.0, 0.0, slint_flow_canvas::NodeRole::Default),
            common::harness::node("over", 50.0, 10.0, slint_flow_canvas::NodeRole::Default),
        ],
        vec![],
    );
    harness.click(Point::new(60.0, 20.0));
    assert_eq!(harness.engine.selection().nodes, ids(&["over"]));
}

// ============================================================================
// Multi-selection Tests
// ============================================================================

#[test]
fn test_shift_click_adds_and_toggles() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(110.0, 110.0));
    harness.click_with(Point::new(410.0, 310.0), Modifiers::SHIFT);
    assert_eq!(harness.engine.selection().nodes, ids(&["a", "b"]));

    harness.click_with(Point::new(110.0, 110.0), Modifiers::SHIFT);
    assert_eq!(harness.engine.selection().nodes, ids(&["b"]));
    assert_eq!(harness.events.selection_changes(), 3);
}

// ============================================================================
// Edge Selection Tests
// ============================================================================

#[test]
fn test_click_on_edge_selects_it() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(110.0, 110.0));
    let at = on_edge(&harness);
    harness.click(at);

    let selection = harness.engine.selection();
    assert!(selection.nodes.is_empty());
    assert_eq!(selection.edges, vec![EdgeId::from("a-b")]);
    assert!(harness.engine.state().is_idle(), "edge click does not start a gesture");
}

#[test]
fn test_shift_click_on_edge_extends() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(110.0, 110.0));
    let at = on_edge(&harness);
    harness.click_with(at, Modifiers::SHIFT);
    let selection = harness.engine.selection();
    assert_eq!(selection.len(), 2);
}

// ============================================================================
// Clearing
// ============================================================================

#[test]
fn test_click_on_empty_canvas_clears() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(110.0, 110.0));
    harness.click(Point::new(700.0, 50.0));
    assert!(harness.engine.selection().is_empty());
    assert_eq!(harness.events.selection_changes(), 2);
}

#[test]
fn test_pan_on_empty_canvas_keeps_selection() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(110.0, 110.0));
    harness.drag(Point::new(700.0, 50.0), Point::new(650.0, 80.0), 3);
    assert_eq!(harness.engine.selection().nodes, ids(&["a"]));
}

// ============================================================================
// Box Selection Tests
// ============================================================================

#[test]
fn test_shift_drag_box_selects_nodes_and_edges() {
    let mut harness = FlowHarness::simple();
    harness.drag_with(Point::new(50.0, 50.0), Point::new(600.0, 400.0), 4, Modifiers::SHIFT);

    let selection = harness.engine.selection();
    assert_eq!(selection.nodes, ids(&["a", "b"]));
    assert_eq!(selection.edges, vec![EdgeId::from("a-b")]);
    assert_eq!(harness.events.selection_changes(), 1);
}

#[test]
fn test_box_partially_covering_node_selects_it() {
    let mut harness = FlowHarness::simple();
    harness.drag_with(Point::new(50.0, 50.0), Point::new(120.0, 120.0), 2, Modifiers::SHIFT);
    let selection = harness.engine.selection();
    assert_eq!(selection.nodes, ids(&["a"]));
    assert!(selection.edges.is_empty());
}

#[test]
fn test_box_select_is_additive_with_shift() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(410.0, 310.0));
    harness.drag_with(Point::new(50.0, 50.0), Point::new(120.0, 120.0), 2, Modifiers::SHIFT);
    assert_eq!(harness.engine.selection().nodes, ids(&["a", "b"]));
}

#[test]
fn test_selection_on_drag_replaces_without_shift() {
    let mut harness = FlowHarness::new(
        plain_config().with_selection_on_drag(true),
        vec![
            common::harness::node("a", 100.0, 100.0, slint_flow_canvas::NodeRole::Default),
            common::harness::node("b", 400.0, 300.0, slint_flow_canvas::NodeRole::Default),
        ],
        vec![],
    );
    harness.click(Point::new(410.0, 310.0));
    harness.drag(Point::new(50.0, 50.0), Point::new(120.0, 120.0), 2);
    assert_eq!(harness.engine.selection().nodes, ids(&["a"]));
    assert_eq!(harness.engine.viewport().pan(), Point::ZERO, "no panning");
}

// ============================================================================
// Model sync
// ============================================================================

#[test]
fn test_selection_syncs_to_models() {
    let mut harness = FlowHarness::simple();
    harness.engine.select_all();

    let nodes = VecModel::<SharedString>::default();
    let edges = VecModel::<SharedString>::default();
    harness.engine.selection().sync_to_model(&nodes, &edges);
    assert_eq!(nodes.row_count(), 2);
    assert_eq!(edges.row_data(0), Some(SharedString::from("a-b")));

    harness.engine.clear_selection();
    harness.engine.selection().sync_to_model(&nodes, &edges);
    assert_eq!(nodes.row_count(), 0);
    assert_eq!(edges.row_count(), 0);
}
