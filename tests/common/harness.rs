//! Test harness: an engine plus an event recorder and helpers that simulate
//! user gestures the way a host forwards them (one frame between moves).

#![allow(dead_code)]

use super::EventRecorder;
use slint::platform::Key;
use slint::SharedString;
use slint_flow_canvas::{
    Edge, EdgeStyle, EngineConfig, FlowEngine, HandleId, HandleKind, Modifiers, Node, NodeId, NodeRole,
    NodeStyle, Point, PointerButton,
};

pub type Engine = FlowEngine<NodeStyle, EdgeStyle>;

pub struct FlowHarness {
    pub engine: Engine,
    pub events: EventRecorder,
    /// Seconds fed to `frame`, advanced one 60 Hz tick per simulated frame.
    pub time: f32,
}

impl FlowHarness {
    pub fn new(config: EngineConfig, nodes: Vec<Node<NodeStyle>>, edges: Vec<Edge<EdgeStyle>>) -> Self {
        let mut engine = FlowEngine::new(config, nodes, edges).expect("valid test graph");
        let events = EventRecorder::attach(&mut engine);
        Self { engine, events, time: 0.0 }
    }

    /// Two default nodes and an edge, no fit, no overlays: world == screen.
    pub fn simple() -> Self {
        Self::new(
            plain_config(),
            vec![node("a", 100.0, 100.0, NodeRole::Default), node("b", 400.0, 300.0, NodeRole::Default)],
            vec![edge("a-b", "a", "b")],
        )
    }

    pub fn screen(&self, world: Point) -> Point {
        self.engine.viewport().world_to_screen(world)
    }

    /// Screen position of a node's first handle of `kind`.
    pub fn handle_screen(&self, node: &str, kind: HandleKind) -> Point {
        let node = self.engine.store().node(&NodeId::from(node)).expect("node exists");
        let (anchor, _) = node.anchor(None, kind);
        self.screen(anchor)
    }

    pub fn handle_id(&self, node: &str, kind: HandleKind) -> HandleId {
        let node = self.engine.store().node(&NodeId::from(node)).expect("node exists");
        node.default_handle(kind).expect("handle exists").id.clone()
    }

    pub fn node_center_screen(&self, node: &str) -> Point {
        let node = self.engine.store().node(&NodeId::from(node)).expect("node exists");
        self.screen(node.rect().center())
    }

    pub fn position(&self, node: &str) -> Point {
        self.engine.store().node(&NodeId::from(node)).expect("node exists").position
    }

    pub fn frame(&mut self) {
        self.time += 1.0 / 60.0;
        self.engine.frame(self.time);
    }

    pub fn press(&mut self, at: Point, modifiers: Modifiers) {
        self.engine.pointer_down(at, PointerButton::Primary, modifiers);
    }

    /// Move in `steps` equal increments, rendering a frame after each.
    pub fn move_to(&mut self, from: Point, to: Point, steps: usize) {
        for i in 1..=steps {
            self.engine.pointer_move(from.lerp(to, i as f32 / steps as f32));
            self.frame();
        }
    }

    pub fn release(&mut self, at: Point) {
        self.engine.pointer_up(at);
    }

    pub fn click(&mut self, at: Point) {
        self.click_with(at, Modifiers::NONE);
    }

    pub fn click_with(&mut self, at: Point, modifiers: Modifiers) {
        self.press(at, modifiers);
        self.release(at);
    }

    /// Press a special key the way a Slint `KeyEvent` delivers it.
    pub fn key_tap(&mut self, key: Key) -> bool {
        self.key_text(&SharedString::from(key), Modifiers::NONE)
    }

    /// Forward the text of a key event; unmapped text is unhandled.
    pub fn key_text(&mut self, text: &str, modifiers: Modifiers) -> bool {
        match slint_flow_canvas::Key::from_text(text) {
            Some(key) => self.engine.key_down(key, modifiers),
            None => false,
        }
    }

    pub fn drag(&mut self, from: Point, to: Point, steps: usize) {
        self.drag_with(from, to, steps, Modifiers::NONE);
    }

    pub fn drag_with(&mut self, from: Point, to: Point, steps: usize, modifiers: Modifiers) {
        self.press(from, modifiers);
        self.move_to(from, to, steps);
        self.release(to);
    }
}

/// Defaults without fit-on-init, minimap or controls.
pub fn plain_config() -> EngineConfig {
    EngineConfig::default().with_fit_view_on_init(false).with_minimap(false).with_controls(false)
}

pub fn node(id: &str, x: f32, y: f32, role: NodeRole) -> Node<NodeStyle> {
    Node::new(id, Point::new(x, y)).with_role(role).with_payload(NodeStyle::new(id.to_uppercase()))
}

pub fn edge(id: &str, source: &str, target: &str) -> Edge<EdgeStyle> {
    Edge::new(id, source, target).with_payload(EdgeStyle::new())
}
