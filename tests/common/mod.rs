//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_flow_canvas::{ChangeEvent, EdgeSummary, FlowEngine, NodeId, Point};
use std::cell::RefCell;
use std::rc::Rc;

/// Records every change event an engine emits.
#[derive(Default, Clone)]
pub struct EventRecorder {
    pub events: Rc<RefCell<Vec<ChangeEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a new recorder to `engine`.
    pub fn attach<N, E>(engine: &mut FlowEngine<N, E>) -> Self
    where
        N: slint_flow_canvas::NodePayload,
        E: slint_flow_canvas::EdgePayload + Default,
    {
        let recorder = Self::new();
        let sink = recorder.events.clone();
        engine.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        recorder
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn all(&self) -> Vec<ChangeEvent> {
        self.events.borrow().clone()
    }

    /// Payloads of every `NodesChanged` event.
    pub fn nodes_changed(&self) -> Vec<Vec<(NodeId, Point)>> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ChangeEvent::NodesChanged(moves) => Some(moves.clone()),
                _ => None,
            })
            .collect()
    }

    /// (added, removed) of every `EdgesChanged` event.
    pub fn edges_changed(&self) -> Vec<(Vec<EdgeSummary>, Vec<EdgeSummary>)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ChangeEvent::EdgesChanged { added, removed } => Some((added.clone(), removed.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn selection_changes(&self) -> usize {
        self.count(|e| matches!(e, ChangeEvent::SelectionChanged { .. }))
    }

    pub fn viewport_changes(&self) -> usize {
        self.count(|e| matches!(e, ChangeEvent::ViewportChanged(_)))
    }

    pub fn count(&self, pred: impl Fn(&ChangeEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
}

/// Float comparison with a fixed tolerance.
pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

pub fn approx_point(a: Point, b: Point) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}
