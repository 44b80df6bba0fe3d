//! Level 5: Keyboard Input Tests
//!
//! Tests Delete/Backspace for removing selected items, Escape for cancelling
//! gestures and Ctrl/Cmd+A for select-all.

mod common;

use common::harness::FlowHarness;
use slint::platform::Key;
use slint_flow_canvas::{ChangeEvent, HandleKind, Modifiers, NodeId, Point};

// ============================================================================
// Delete Key Tests
// ============================================================================

#[test]
fn test_delete_removes_selected_node_and_its_edges() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(110.0, 110.0));
    harness.events.clear();

    assert!(harness.key_tap(Key::Delete));
    assert_eq!(harness.engine.store().node_count(), 1);
    assert_eq!(harness.engine.store().edge_count(), 0);

    let events = harness.events.all();
    assert_eq!(events.len(), 3, "{events:?}");
    assert!(matches!(&events[0], ChangeEvent::EdgesChanged { removed, .. } if removed.len() == 1));
    assert_eq!(events[1], ChangeEvent::NodesRemoved(vec![NodeId::from("a")]));
    assert!(matches!(&events[2], ChangeEvent::SelectionChanged { nodes, edges } if nodes.is_empty() && edges.is_empty()));
}

#[test]
fn test_backspace_deletes_selected_edge_only() {
    let mut harness = FlowHarness::simple();
    harness.engine.select(&[], &["a-b".into()], false);
    harness.events.clear();

    assert!(harness.key_tap(Key::Backspace));
    assert_eq!(harness.engine.store().node_count(), 2);
    assert_eq!(harness.engine.store().edge_count(), 0);
    assert_eq!(harness.events.edges_changed().len(), 1);
    assert_eq!(harness.events.count(|e| matches!(e, ChangeEvent::NodesRemoved(_))), 0);
}

#[test]
fn test_delete_with_empty_selection_is_noop() {
    let mut harness = FlowHarness::simple();
    assert!(!harness.key_tap(Key::Delete));
    assert!(harness.events.is_empty());
}

#[test]
fn test_delete_ignored_while_locked() {
    let mut harness = FlowHarness::simple();
    harness.engine.select_all();
    harness.engine.set_interactive(false);
    assert!(!harness.key_tap(Key::Delete));
    assert_eq!(harness.engine.store().node_count(), 2);
}

#[test]
fn test_delete_ignored_mid_gesture() {
    let mut harness = FlowHarness::simple();
    harness.click(Point::new(110.0, 110.0));
    harness.press(Point::new(110.0, 110.0), Modifiers::NONE);
    harness.move_to(Point::new(110.0, 110.0), Point::new(150.0, 150.0), 2);
    assert!(!harness.key_tap(Key::Delete));
    assert_eq!(harness.engine.store().node_count(), 2);
}

// ============================================================================
// Escape Key Tests
// ============================================================================

#[test]
fn test_escape_cancels_connection_silently() {
    let mut harness = FlowHarness::simple();
    let from = harness.handle_screen("a", HandleKind::Source);
    let to = harness.handle_screen("b", HandleKind::Target);
    harness.press(from, Modifiers::NONE);
    harness.move_to(from, to, 4);

    assert!(harness.key_tap(Key::Escape));
    harness.release(to);

    assert_eq!(harness.engine.store().edge_count(), 1, "only the preexisting edge");
    assert!(harness.events.is_empty());
}

#[test]
fn test_escape_restores_viewport_after_pan() {
    let mut harness = FlowHarness::simple();
    let before = harness.engine.viewport();
    harness.press(Point::new(700.0, 50.0), Modifiers::NONE);
    harness.move_to(Point::new(700.0, 50.0), Point::new(600.0, 150.0), 3);
    assert_ne!(harness.engine.viewport(), before);

    assert!(harness.key_tap(Key::Escape));
    assert_eq!(harness.engine.viewport(), before);
    assert_eq!(harness.events.viewport_changes(), 0);
}

#[test]
fn test_escape_discards_selection_box() {
    let mut harness = FlowHarness::simple();
    harness.press(Point::new(50.0, 50.0), Modifiers::SHIFT);
    harness.move_to(Point::new(50.0, 50.0), Point::new(600.0, 400.0), 3);
    harness.key_tap(Key::Escape);
    harness.release(Point::new(600.0, 400.0));

    assert!(harness.engine.selection().is_empty());
    assert!(harness.events.is_empty());
}

#[test]
fn test_escape_when_idle_is_unhandled() {
    let mut harness = FlowHarness::simple();
    assert!(!harness.key_tap(Key::Escape));
}

// ============================================================================
// Select All
// ============================================================================

#[test]
fn test_ctrl_a_selects_everything() {
    let mut harness = FlowHarness::simple();
    assert!(harness.key_text("a", Modifiers::CTRL));
    let selection = harness.engine.selection();
    assert_eq!(selection.nodes.len(), 2);
    assert_eq!(selection.edges.len(), 1);
    assert_eq!(harness.events.selection_changes(), 1);
}

#[test]
fn test_cmd_a_on_macos() {
    let mut harness = FlowHarness::simple();
    let cmd = Modifiers { meta: true, ..Modifiers::NONE };
    assert!(harness.key_text("A", cmd));
    assert_eq!(harness.engine.selection().len(), 3);
}

#[test]
fn test_plain_a_is_not_a_shortcut() {
    let mut harness = FlowHarness::simple();
    assert!(!harness.key_text("a", Modifiers::NONE));
    assert!(harness.engine.selection().is_empty());
}

// ============================================================================
// Key Mapping
// ============================================================================

#[test]
fn test_unbound_special_keys_are_unhandled() {
    let mut harness = FlowHarness::simple();
    harness.engine.select_all();
    harness.events.clear();

    assert!(!harness.key_tap(Key::Tab));
    assert!(!harness.key_tap(Key::Return));
    assert_eq!(slint_flow_canvas::Key::from_platform(Key::Tab), None);
    assert_eq!(harness.engine.store().node_count(), 2);
    assert!(harness.events.is_empty());
}

#[test]
fn test_multi_character_text_is_unhandled() {
    let mut harness = FlowHarness::simple();
    assert!(!harness.key_text("ab", Modifiers::CTRL));
    assert!(!harness.key_text("", Modifiers::NONE));
    assert!(harness.engine.selection().is_empty());
}
