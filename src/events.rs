//! Change notification.
//!
//! The engine emits a [`ChangeEvent`] after every committed mutation. Hosts
//! subscribe with a callback or take a channel receiver. Callbacks run
//! synchronously inside the engine call that caused the change, so they must
//! not call back into the engine; use a channel to defer such work.

use crate::geometry::{Point, Viewport};
use crate::graph::{EdgeId, EdgeSummary, NodeId};
use serde::Deserialize;
use std::sync::mpsc;
use tracing::trace;

/// A committed change, as seen by the application layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    NodesAdded(Vec<NodeId>),
    /// Final positions of moved nodes.
    NodesChanged(Vec<(NodeId, Point)>),
    NodesRemoved(Vec<NodeId>),
    EdgesChanged { added: Vec<EdgeSummary>, removed: Vec<EdgeSummary> },
    SelectionChanged { nodes: Vec<NodeId>, edges: Vec<EdgeId> },
    ViewportChanged(Viewport),
}

impl ChangeEvent {
    /// True for events that carry no change at all.
    fn is_empty(&self) -> bool {
        match self {
            ChangeEvent::NodesAdded(v) | ChangeEvent::NodesRemoved(v) => v.is_empty(),
            ChangeEvent::NodesChanged(v) => v.is_empty(),
            ChangeEvent::EdgesChanged { added, removed } => added.is_empty() && removed.is_empty(),
            ChangeEvent::SelectionChanged { .. } | ChangeEvent::ViewportChanged(_) => false,
        }
    }

    /// Split into one event per entity.
    fn split(self) -> Vec<ChangeEvent> {
        match self {
            ChangeEvent::NodesAdded(ids) => ids.into_iter().map(|id| ChangeEvent::NodesAdded(vec![id])).collect(),
            ChangeEvent::NodesRemoved(ids) => {
                ids.into_iter().map(|id| ChangeEvent::NodesRemoved(vec![id])).collect()
            }
            ChangeEvent::NodesChanged(moves) => {
                moves.into_iter().map(|m| ChangeEvent::NodesChanged(vec![m])).collect()
            }
            ChangeEvent::EdgesChanged { added, removed } => {
                let added = added
                    .into_iter()
                    .map(|e| ChangeEvent::EdgesChanged { added: vec![e], removed: Vec::new() });
                let removed = removed
                    .into_iter()
                    .map(|e| ChangeEvent::EdgesChanged { added: Vec::new(), removed: vec![e] });
                added.chain(removed).collect()
            }
            other => vec![other],
        }
    }
}

/// How multi-entity changes are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Granularity {
    /// One event per operation, listing every affected entity.
    #[default]
    Batched,
    /// One event per affected entity.
    PerEntity,
}

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&ChangeEvent)>;

/// Fan-out of change events to callbacks and channels.
pub struct ChangeNotifier {
    granularity: Granularity,
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
    channels: Vec<mpsc::Sender<ChangeEvent>>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(Granularity::default())
    }
}

impl ChangeNotifier {
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity, next_id: 0, callbacks: Vec::new(), channels: Vec::new() }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sid, _)| *sid != id);
        self.callbacks.len() != before
    }

    /// Receive events through a channel. Dropping the receiver unsubscribes.
    pub fn subscribe_channel(&mut self) -> mpsc::Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel();
        self.channels.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len() + self.channels.len()
    }

    /// Deliver an event to every subscriber. Empty events are dropped.
    pub fn emit(&mut self, event: ChangeEvent) {
        if event.is_empty() {
            return;
        }
        let events = match self.granularity {
            Granularity::Batched => vec![event],
            Granularity::PerEntity => event.split(),
        };
        for event in &events {
            trace!(?event, "emit");
            for (_, callback) in &mut self.callbacks {
                callback(event);
            }
            self.channels.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("granularity", &self.granularity)
            .field("callbacks", &self.callbacks.len())
            .field("channels", &self.channels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(notifier: &mut ChangeNotifier) -> Rc<RefCell<Vec<ChangeEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        notifier.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    #[test]
    fn test_batched_delivers_single_event() {
        let mut notifier = ChangeNotifier::default();
        let log = recorder(&mut notifier);
        notifier.emit(ChangeEvent::NodesRemoved(vec![NodeId::from("a"), NodeId::from("b")]));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_per_entity_splits_edges() {
        let mut notifier = ChangeNotifier::new(Granularity::PerEntity);
        let log = recorder(&mut notifier);
        notifier.emit(ChangeEvent::EdgesChanged {
            added: vec![Edge::new("e1", "a", "b").summary()],
            removed: vec![Edge::new("e2", "a", "c").summary(), Edge::new("e3", "b", "c").summary()],
        });
        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert!(matches!(&log[0], ChangeEvent::EdgesChanged { added, removed } if added.len() == 1 && removed.is_empty()));
    }

    #[test]
    fn test_empty_events_are_dropped() {
        let mut notifier = ChangeNotifier::default();
        let log = recorder(&mut notifier);
        notifier.emit(ChangeEvent::NodesChanged(Vec::new()));
        notifier.emit(ChangeEvent::EdgesChanged { added: Vec::new(), removed: Vec::new() });
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut notifier = ChangeNotifier::default();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let id = notifier.subscribe(move |_| *c.borrow_mut() += 1);
        notifier.emit(ChangeEvent::ViewportChanged(Viewport::default()));
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.emit(ChangeEvent::ViewportChanged(Viewport::default()));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_channel_subscription_and_drop() {
        let mut notifier = ChangeNotifier::default();
        let rx = notifier.subscribe_channel();
        notifier.emit(ChangeEvent::NodesAdded(vec![NodeId::from("a")]));
        assert_eq!(rx.try_recv().unwrap(), ChangeEvent::NodesAdded(vec![NodeId::from("a")]));

        drop(rx);
        notifier.emit(ChangeEvent::NodesAdded(vec![NodeId::from("b")]));
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
