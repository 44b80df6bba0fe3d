// ============================================================================
// Connection Validation Framework
// ============================================================================
//
// A connection gesture produces a `ConnectionRequest` (origin end first). A
// validator either accepts it, possibly with the direction normalized so the
// edge always points from producer to consumer, or rejects it with a reason.

use crate::config::{ConnectionMode, EngineConfig};
use crate::graph::{HandleId, HandleKind, Node, NodeId};
use crate::store::GraphStore;

/// A proposed edge, as drawn by the user: `source` is where the gesture started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub source: NodeId,
    pub source_handle: Option<HandleId>,
    pub target: NodeId,
    pub target_handle: Option<HandleId>,
}

impl ConnectionRequest {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self { source: source.into(), source_handle: None, target: target.into(), target_handle: None }
    }

    pub fn with_handles(mut self, source: Option<&str>, target: Option<&str>) -> Self {
        self.source_handle = source.map(HandleId::from);
        self.target_handle = target.map(HandleId::from);
        self
    }

    fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            source_handle: self.target_handle.clone(),
            target: self.source.clone(),
            target_handle: self.source_handle.clone(),
        }
    }
}

/// An accepted connection, oriented from producer to consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedConnection {
    pub source: NodeId,
    pub source_handle: Option<HandleId>,
    pub target: NodeId,
    pub target_handle: Option<HandleId>,
    /// True when the direction was swapped relative to the gesture.
    pub reversed: bool,
}

impl NormalizedConnection {
    /// Accept a request as drawn.
    pub fn as_drawn(request: &ConnectionRequest) -> Self {
        Self {
            source: request.source.clone(),
            source_handle: request.source_handle.clone(),
            target: request.target.clone(),
            target_handle: request.target_handle.clone(),
            reversed: false,
        }
    }

    fn from_request(request: ConnectionRequest, reversed: bool) -> Self {
        Self {
            source: request.source,
            source_handle: request.source_handle,
            target: request.target,
            target_handle: request.target_handle,
            reversed,
        }
    }

    pub fn as_request(&self) -> ConnectionRequest {
        ConnectionRequest {
            source: self.source.clone(),
            source_handle: self.source_handle.clone(),
            target: self.target.clone(),
            target_handle: self.target_handle.clone(),
        }
    }
}

/// Why a connection was refused. Not an error: the gesture simply ends without an edge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("node {0} not found")]
    UnknownNode(NodeId),
    #[error("node {node} has no handle {handle}")]
    UnknownHandle { node: NodeId, handle: HandleId },
    #[error("connection must end on a handle")]
    MissingTargetHandle,
    #[error("cannot connect node {0} to itself")]
    SelfLoop(NodeId),
    #[error("handle {handle} on node {node} only accepts incoming edges")]
    InputOnlySource { node: NodeId, handle: HandleId },
    #[error("node {0} cannot originate edges")]
    SinkCannotOriginate(NodeId),
    #[error("node {0} cannot receive edges")]
    ProducerCannotReceive(NodeId),
    #[error("handle {handle} on node {node} cannot receive edges")]
    HandleDirection { node: NodeId, handle: HandleId },
    #[error("an identical edge already exists")]
    DuplicateEdge,
    #[error("{0}")]
    Custom(String),
}

/// Result of connection validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accept(NormalizedConnection),
    Reject(RejectReason),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accept(_))
    }

    /// Chain another check on an accepted connection; rejections short-circuit.
    pub fn and_then<F>(self, f: F) -> ValidationResult
    where
        F: FnOnce(NormalizedConnection) -> ValidationResult,
    {
        match self {
            ValidationResult::Accept(conn) => {
                let reversed = conn.reversed;
                match f(conn) {
                    // Keep the orientation flag relative to the user gesture
                    ValidationResult::Accept(mut next) => {
                        next.reversed ^= reversed;
                        ValidationResult::Accept(next)
                    }
                    rejected => rejected,
                }
            }
            rejected => rejected,
        }
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            ValidationResult::Accept(_) => None,
            ValidationResult::Reject(reason) => Some(reason),
        }
    }
}

/// Trait for connection validation logic.
///
/// Closures `Fn(&ConnectionRequest, &GraphStore<N, E>) -> ValidationResult`
/// implement it too.
///
/// # Example
///
/// ```ignore
/// let only_from_a = |req: &ConnectionRequest, _: &GraphStore| {
///     if req.source.as_str() == "a" {
///         ValidationResult::Accept(NormalizedConnection::as_drawn(req))
///     } else {
///         ValidationResult::Reject(RejectReason::Custom("only a".into()))
///     }
/// };
/// engine.set_validator(CompositeValidator::new().add(DefaultValidator::default()).add(only_from_a));
/// ```
pub trait ConnectionValidator<N = (), E = ()> {
    fn validate(&self, request: &ConnectionRequest, store: &GraphStore<N, E>) -> ValidationResult;
}

impl<N, E, F> ConnectionValidator<N, E> for F
where
    F: Fn(&ConnectionRequest, &GraphStore<N, E>) -> ValidationResult,
{
    fn validate(&self, request: &ConnectionRequest, store: &GraphStore<N, E>) -> ValidationResult {
        self(request, store)
    }
}

/// The standard connection policy.
///
/// 1. Both nodes and any named handles must exist
/// 2. Strict mode requires the gesture to end on a handle
/// 3. Self-loops need `allow_self_loops`
/// 4. Edges go from a source handle to a target handle, and from a node that
///    may originate to one that may receive. Loose mode tries the reverse
///    orientation before rejecting.
/// 5. With `deduplicate_edges`, an identical edge must not exist
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefaultValidator {
    pub mode: ConnectionMode,
    pub allow_self_loops: bool,
    pub deduplicate_edges: bool,
}

impl Default for DefaultValidator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl DefaultValidator {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            mode: config.connection_mode,
            allow_self_loops: config.allow_self_loops,
            deduplicate_edges: config.deduplicate_edges,
        }
    }

    /// Check one orientation against handle kinds and node roles.
    fn check_orientation<N>(
        request: &ConnectionRequest,
        source: &Node<N>,
        target: &Node<N>,
    ) -> Result<(), RejectReason> {
        if let Some(id) = &request.source_handle {
            if source.handle(id).map(|h| h.kind) == Some(HandleKind::Target) {
                return Err(RejectReason::InputOnlySource { node: source.id.clone(), handle: id.clone() });
            }
        }
        if let Some(id) = &request.target_handle {
            if target.handle(id).map(|h| h.kind) == Some(HandleKind::Source) {
                return Err(RejectReason::HandleDirection { node: target.id.clone(), handle: id.clone() });
            }
        }
        if !source.role.can_originate() {
            return Err(RejectReason::SinkCannotOriginate(source.id.clone()));
        }
        if !target.role.can_receive() {
            return Err(RejectReason::ProducerCannotReceive(target.id.clone()));
        }
        Ok(())
    }
}

impl<N, E> ConnectionValidator<N, E> for DefaultValidator {
    fn validate(&self, request: &ConnectionRequest, store: &GraphStore<N, E>) -> ValidationResult {
        let Some(source) = store.node(&request.source) else {
            return ValidationResult::Reject(RejectReason::UnknownNode(request.source.clone()));
        };
        let Some(target) = store.node(&request.target) else {
            return ValidationResult::Reject(RejectReason::UnknownNode(request.target.clone()));
        };

        for (node, handle) in [(source, &request.source_handle), (target, &request.target_handle)] {
            if let Some(id) = handle {
                if node.handle(id).is_none() {
                    return ValidationResult::Reject(RejectReason::UnknownHandle {
                        node: node.id.clone(),
                        handle: id.clone(),
                    });
                }
            }
        }

        if self.mode == ConnectionMode::Strict && request.target_handle.is_none() {
            return ValidationResult::Reject(RejectReason::MissingTargetHandle);
        }

        if request.source == request.target && !self.allow_self_loops {
            return ValidationResult::Reject(RejectReason::SelfLoop(request.source.clone()));
        }

        let normalized = match Self::check_orientation(request, source, target) {
            Ok(()) => NormalizedConnection::as_drawn(request),
            Err(forward) => {
                if self.mode == ConnectionMode::Strict {
                    return ValidationResult::Reject(forward);
                }
                let reversed = request.reversed();
                match Self::check_orientation(&reversed, target, source) {
                    Ok(()) => NormalizedConnection::from_request(reversed, true),
                    Err(_) => return ValidationResult::Reject(forward),
                }
            }
        };

        if self.deduplicate_edges && is_duplicate(&normalized, store) {
            return ValidationResult::Reject(RejectReason::DuplicateEdge);
        }

        ValidationResult::Accept(normalized)
    }
}

fn is_duplicate<N, E>(conn: &NormalizedConnection, store: &GraphStore<N, E>) -> bool {
    store.has_connection(
        &conn.source,
        conn.source_handle.as_ref(),
        &conn.target,
        conn.target_handle.as_ref(),
    )
}

/// Validator that prevents duplicate edges (same endpoints and handles, same direction)
#[derive(Clone, Debug, Default)]
pub struct NoDuplicatesValidator;

impl<N, E> ConnectionValidator<N, E> for NoDuplicatesValidator {
    fn validate(&self, request: &ConnectionRequest, store: &GraphStore<N, E>) -> ValidationResult {
        let conn = NormalizedConnection::as_drawn(request);
        if is_duplicate(&conn, store) {
            ValidationResult::Reject(RejectReason::DuplicateEdge)
        } else {
            ValidationResult::Accept(conn)
        }
    }
}

/// Composite validator that combines multiple validators
///
/// Validators run in the order they were added. Each one sees the connection
/// as normalized by the previous one; the first rejection wins.
pub struct CompositeValidator<N = (), E = ()> {
    validators: Vec<Box<dyn ConnectionValidator<N, E>>>,
}

impl<N, E> Default for CompositeValidator<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> CompositeValidator<N, E> {
    pub fn new() -> Self {
        Self { validators: Vec::new() }
    }

    pub fn add<V: ConnectionValidator<N, E> + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl<N, E> ConnectionValidator<N, E> for CompositeValidator<N, E> {
    fn validate(&self, request: &ConnectionRequest, store: &GraphStore<N, E>) -> ValidationResult {
        self.validators.iter().fold(
            ValidationResult::Accept(NormalizedConnection::as_drawn(request)),
            |result, v| result.and_then(|conn| v.validate(&conn.as_request(), store)),
        )
    }
}

/// Convenience function to validate a connection with any validator
pub fn validate_connection<V, N, E>(
    request: &ConnectionRequest,
    store: &GraphStore<N, E>,
    validator: &V,
) -> ValidationResult
where
    V: ConnectionValidator<N, E> + ?Sized,
{
    validator.validate(request, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::graph::{Edge, NodeRole, DEFAULT_SOURCE_HANDLE, DEFAULT_TARGET_HANDLE};

    const S: Option<&str> = Some(DEFAULT_SOURCE_HANDLE);
    const T: Option<&str> = Some(DEFAULT_TARGET_HANDLE);

    fn setup_store() -> GraphStore {
        let mut store = GraphStore::new();
        store
            .add_nodes(vec![
                Node::new("in", Point::new(0.0, 0.0)).with_role(NodeRole::Input),
                Node::new("in2", Point::new(200.0, 0.0)).with_role(NodeRole::Input),
                Node::new("mid", Point::new(0.0, 100.0)),
                Node::new("mid2", Point::new(200.0, 100.0)),
                Node::new("out", Point::new(0.0, 200.0)).with_role(NodeRole::Output),
            ])
            .unwrap();
        store
    }

    fn strict() -> DefaultValidator {
        DefaultValidator::default()
    }

    fn loose() -> DefaultValidator {
        DefaultValidator { mode: ConnectionMode::Loose, ..DefaultValidator::default() }
    }

    fn accepted(result: ValidationResult) -> NormalizedConnection {
        match result {
            ValidationResult::Accept(conn) => conn,
            ValidationResult::Reject(reason) => panic!("rejected: {reason}"),
        }
    }

    fn rejected(result: ValidationResult) -> RejectReason {
        match result {
            ValidationResult::Accept(conn) => panic!("accepted: {conn:?}"),
            ValidationResult::Reject(reason) => reason,
        }
    }

    // ========================================================================
    // DefaultValidator - strict mode
    // ========================================================================

    #[test]
    fn test_strict_accepts_source_to_target() {
        let store = setup_store();
        let req = ConnectionRequest::new("in", "mid").with_handles(S, T);
        let conn = accepted(strict().validate(&req, &store));
        assert_eq!(conn.source, NodeId::from("in"));
        assert!(!conn.reversed);
    }

    #[test]
    fn test_strict_requires_target_handle() {
        let store = setup_store();
        let req = ConnectionRequest::new("in", "mid").with_handles(S, None);
        assert_eq!(rejected(strict().validate(&req, &store)), RejectReason::MissingTargetHandle);
    }

    #[test]
    fn test_strict_rejects_input_only_origin() {
        let store = setup_store();
        let req = ConnectionRequest::new("mid", "in").with_handles(T, S);
        assert!(matches!(
            rejected(strict().validate(&req, &store)),
            RejectReason::InputOnlySource { .. }
        ));
    }

    #[test]
    fn test_rejects_unknown_node_and_handle() {
        let store = setup_store();
        let req = ConnectionRequest::new("in", "ghost").with_handles(S, T);
        assert_eq!(rejected(strict().validate(&req, &store)), RejectReason::UnknownNode(NodeId::from("ghost")));

        let req = ConnectionRequest::new("in", "mid").with_handles(Some("nope"), T);
        assert!(matches!(rejected(strict().validate(&req, &store)), RejectReason::UnknownHandle { .. }));
    }

    #[test]
    fn test_self_loop_policy() {
        let store = setup_store();
        let req = ConnectionRequest::new("mid", "mid").with_handles(S, T);
        assert_eq!(rejected(strict().validate(&req, &store)), RejectReason::SelfLoop(NodeId::from("mid")));

        let permissive = DefaultValidator { allow_self_loops: true, ..strict() };
        assert!(permissive.validate(&req, &store).is_accepted());
    }

    #[test]
    fn test_rejects_duplicate_when_deduplicating() {
        let mut store = setup_store();
        store
            .add_edge(Edge::new("e", "in", "mid").with_handles(S.map(Into::into), T.map(Into::into)))
            .unwrap();
        let req = ConnectionRequest::new("in", "mid").with_handles(S, T);
        assert_eq!(rejected(strict().validate(&req, &store)), RejectReason::DuplicateEdge);

        let parallel = DefaultValidator { deduplicate_edges: false, ..strict() };
        assert!(parallel.validate(&req, &store).is_accepted());
    }

    // ========================================================================
    // DefaultValidator - loose mode normalization
    // ========================================================================

    #[test]
    fn test_loose_swaps_gesture_started_on_target_handle() {
        let store = setup_store();
        // Dragged from mid's target handle back to in's source handle
        let req = ConnectionRequest::new("mid", "in").with_handles(T, S);
        let conn = accepted(loose().validate(&req, &store));
        assert!(conn.reversed);
        assert_eq!(conn.source, NodeId::from("in"));
        assert_eq!(conn.target, NodeId::from("mid"));
        assert_eq!(conn.source_handle.as_ref().map(HandleId::as_str), S);
    }

    #[test]
    fn test_loose_accepts_drop_on_node_body() {
        let store = setup_store();
        let req = ConnectionRequest::new("mid", "out").with_handles(S, None);
        let conn = accepted(loose().validate(&req, &store));
        assert_eq!(conn.target_handle, None);
    }

    #[test]
    fn test_loose_rejects_when_no_orientation_fits() {
        let store = setup_store();
        // Two producers: neither direction has a node that can receive
        let req = ConnectionRequest::new("in", "in2");
        assert_eq!(
            rejected(loose().validate(&req, &store)),
            RejectReason::ProducerCannotReceive(NodeId::from("in2"))
        );
    }

    // ========================================================================
    // Composition
    // ========================================================================

    #[test]
    fn test_composite_short_circuits_on_first_rejection() {
        let store = setup_store();
        let deny = |_: &ConnectionRequest, _: &GraphStore| ValidationResult::Reject(RejectReason::Custom("no".into()));
        let validator = CompositeValidator::new().add(strict()).add(deny);
        let req = ConnectionRequest::new("in", "mid").with_handles(S, T);
        assert_eq!(rejected(validator.validate(&req, &store)), RejectReason::Custom("no".into()));

        let bad = ConnectionRequest::new("in", "mid").with_handles(S, None);
        assert_eq!(rejected(validator.validate(&bad, &store)), RejectReason::MissingTargetHandle);
    }

    #[test]
    fn test_composite_passes_normalized_connection_along() {
        let store = setup_store();
        let seen_source = |req: &ConnectionRequest, _: &GraphStore| {
            if req.source.as_str() == "in" {
                ValidationResult::Accept(NormalizedConnection::as_drawn(req))
            } else {
                ValidationResult::Reject(RejectReason::Custom("not normalized".into()))
            }
        };
        let validator = CompositeValidator::new().add(loose()).add(NoDuplicatesValidator).add(seen_source);
        let req = ConnectionRequest::new("mid", "in").with_handles(T, S);
        let conn = accepted(validate_connection(&req, &store, &validator));
        assert!(conn.reversed);
    }

    #[test]
    fn test_empty_composite_accepts_as_drawn() {
        let store = setup_store();
        let validator: CompositeValidator = CompositeValidator::new();
        assert!(validator.is_empty());
        let req = ConnectionRequest::new("out", "in");
        assert_eq!(accepted(validator.validate(&req, &store)), NormalizedConnection::as_drawn(&req));
    }
}
