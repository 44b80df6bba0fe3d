//! Node and edge data model.
//!
//! Nodes and edges carry an opaque payload the engine never interprets except
//! through the presentation hooks of [`NodePayload`] and [`EdgePayload`].
//! `()` works as a payload, and [`NodeStyle`] / [`EdgeStyle`] cover the usual
//! label-and-color case.
//!
//! # Example
//!
//! ```ignore
//! use slint_flow_canvas::{Edge, Node, NodeRole, NodeStyle, Point};
//!
//! let a = Node::new("ai-training", Point::new(50.0, 50.0))
//!     .with_role(NodeRole::Input)
//!     .with_payload(NodeStyle::new("AI Training").with_background_hex("#ff6b6b"));
//! let e = Edge::new("e1", "ai-training", "workload-interface").with_animated(true);
//! ```

use crate::geometry::{Point, Rect, Size};
use slint::Color;
use std::fmt;

/// Size given to nodes that are created without an explicit one.
pub const DEFAULT_NODE_SIZE: Size = Size::new(150.0, 40.0);

/// Id of the source handle created by [`NodeRole::default_handles`].
pub const DEFAULT_SOURCE_HANDLE: &str = "source";

/// Id of the target handle created by [`NodeRole::default_handles`].
pub const DEFAULT_TARGET_HANDLE: &str = "target";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Unique, immutable node identifier.
    NodeId
);
string_id!(
    /// Unique, immutable edge identifier.
    EdgeId
);
string_id!(
    /// Identifier of a handle, unique within its node.
    HandleId
);

/// Connection role of a node.
///
/// `Input` nodes are producers: they only expose a source handle and never
/// receive edges. `Output` nodes are consumers and never originate edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeRole {
    Input,
    #[default]
    Default,
    Output,
}

impl NodeRole {
    pub fn can_originate(self) -> bool {
        !matches!(self, NodeRole::Output)
    }

    pub fn can_receive(self) -> bool {
        !matches!(self, NodeRole::Input)
    }

    /// Handles a node of this role gets unless the host supplies its own.
    pub fn default_handles(self) -> Vec<Handle> {
        let target = Handle::target(DEFAULT_TARGET_HANDLE, Side::Top);
        let source = Handle::source(DEFAULT_SOURCE_HANDLE, Side::Bottom);
        match self {
            NodeRole::Input => vec![source],
            NodeRole::Default => vec![target, source],
            NodeRole::Output => vec![target],
        }
    }
}

/// Whether edges leave (`Source`) or arrive (`Target`) at a handle.
///
/// A `Target` handle is input-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Source,
    Target,
}

/// Side of the node boundary a handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Outward unit normal.
    pub fn normal(self) -> Point {
        match self {
            Side::Top => Point::new(0.0, -1.0),
            Side::Right => Point::new(1.0, 0.0),
            Side::Bottom => Point::new(0.0, 1.0),
            Side::Left => Point::new(-1.0, 0.0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// Point on `rect`'s boundary, `offset` (0..1) along this side.
    pub fn point_on(self, rect: &Rect, offset: f32) -> Point {
        let t = offset.clamp(0.0, 1.0);
        match self {
            Side::Top => Point::new(rect.x + rect.width * t, rect.y),
            Side::Bottom => Point::new(rect.x + rect.width * t, rect.bottom()),
            Side::Left => Point::new(rect.x, rect.y + rect.height * t),
            Side::Right => Point::new(rect.right(), rect.y + rect.height * t),
        }
    }
}

/// A named connection point on a node's boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    pub id: HandleId,
    pub kind: HandleKind,
    pub side: Side,
    /// Position along the side, 0.0 = start, 1.0 = end.
    pub offset: f32,
}

impl Handle {
    pub fn source(id: impl Into<HandleId>, side: Side) -> Self {
        Self { id: id.into(), kind: HandleKind::Source, side, offset: 0.5 }
    }

    pub fn target(id: impl Into<HandleId>, side: Side) -> Self {
        Self { id: id.into(), kind: HandleKind::Target, side, offset: 0.5 }
    }

    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    /// World-space anchor of this handle on a node occupying `rect`.
    pub fn anchor(&self, rect: &Rect) -> Point {
        self.side.point_on(rect, self.offset)
    }
}

// ============================================================================
// Payload hooks
// ============================================================================

/// Presentation hooks for node payloads. Every method has a neutral default.
pub trait NodePayload {
    fn label(&self) -> Option<&str> {
        None
    }
    fn fill_color(&self) -> Option<Color> {
        None
    }
    fn text_color(&self) -> Option<Color> {
        None
    }
}

impl NodePayload for () {}

/// Presentation hooks for edge payloads. Every method has a neutral default.
pub trait EdgePayload {
    fn stroke_color(&self) -> Option<Color> {
        None
    }
    fn stroke_width(&self) -> Option<f32> {
        None
    }
    /// Dash and gap lengths in screen pixels.
    fn dash_pattern(&self) -> Option<(f32, f32)> {
        None
    }
    fn label(&self) -> Option<&str> {
        None
    }
}

impl EdgePayload for () {}

/// Ready-made node payload: a label plus optional colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStyle {
    pub label: String,
    pub background: Option<Color>,
    pub color: Option<Color>,
}

impl NodeStyle {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Self::default() }
    }

    /// Set the background from a CSS hex color; invalid input leaves it unset.
    pub fn with_background_hex(mut self, hex: &str) -> Self {
        self.background = parse_hex_color(hex);
        self
    }

    pub fn with_text_hex(mut self, hex: &str) -> Self {
        self.color = parse_hex_color(hex);
        self
    }
}

impl NodePayload for NodeStyle {
    fn label(&self) -> Option<&str> {
        Some(&self.label)
    }
    fn fill_color(&self) -> Option<Color> {
        self.background
    }
    fn text_color(&self) -> Option<Color> {
        self.color
    }
}

/// Ready-made edge payload: stroke color, width, dash pattern and label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeStyle {
    pub stroke: Option<Color>,
    pub stroke_width: Option<f32>,
    pub dash: Option<(f32, f32)>,
    pub label: Option<String>,
}

impl EdgeStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stroke_hex(mut self, hex: &str) -> Self {
        self.stroke = parse_hex_color(hex);
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Set the dash pattern from an SVG `stroke-dasharray` value such as `"5,5"`.
    pub fn with_dash_array(mut self, dash_array: &str) -> Self {
        self.dash = parse_dash_array(dash_array);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl EdgePayload for EdgeStyle {
    fn stroke_color(&self) -> Option<Color> {
        self.stroke
    }
    fn stroke_width(&self) -> Option<f32> {
        self.stroke_width
    }
    fn dash_pattern(&self) -> Option<(f32, f32)> {
        self.dash
    }
    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let mut it = digits.chars().map(|c| c.to_digit(16).map(|v| (v * 17) as u8));
            Some(Color::from_rgb_u8(it.next()??, it.next()??, it.next()??))
        }
        6 => Some(Color::from_rgb_u8(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        8 => Some(Color::from_argb_u8(
            channel(&digits[6..8])?,
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => None,
    }
}

/// Parse a two-value SVG dash array (`"5,5"`, `"3 3"`). A single value is used for both.
pub fn parse_dash_array(dash_array: &str) -> Option<(f32, f32)> {
    let mut values = dash_array
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse::<f32>);
    let dash = values.next()?.ok()?;
    let gap = match values.next() {
        Some(v) => v.ok()?,
        None => dash,
    };
    (dash > 0.0 && gap >= 0.0).then_some((dash, gap))
}

// ============================================================================
// Node & Edge
// ============================================================================

/// A positioned graph vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<N = ()> {
    pub id: NodeId,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub size: Size,
    pub role: NodeRole,
    pub handles: Vec<Handle>,
    pub payload: N,
    pub selected: bool,
    pub draggable: bool,
}

impl Node<()> {
    /// A `Default`-role node with the default size, handles and an empty payload.
    pub fn new(id: impl Into<NodeId>, position: Point) -> Self {
        Self {
            id: id.into(),
            position,
            size: DEFAULT_NODE_SIZE,
            role: NodeRole::Default,
            handles: NodeRole::Default.default_handles(),
            payload: (),
            selected: false,
            draggable: true,
        }
    }
}

impl<N> Node<N> {
    pub fn with_payload<M>(self, payload: M) -> Node<M> {
        Node {
            id: self.id,
            position: self.position,
            size: self.size,
            role: self.role,
            handles: self.handles,
            payload,
            selected: self.selected,
            draggable: self.draggable,
        }
    }

    /// Set the role and replace the handles with that role's defaults.
    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = role;
        self.handles = role.default_handles();
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn with_handles(mut self, handles: Vec<Handle>) -> Self {
        self.handles = handles;
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn handle(&self, id: &HandleId) -> Option<&Handle> {
        self.handles.iter().find(|h| &h.id == id)
    }

    /// First handle of the given kind.
    pub fn default_handle(&self, kind: HandleKind) -> Option<&Handle> {
        self.handles.iter().find(|h| h.kind == kind)
    }

    /// Anchor point and side where an edge end of `kind` attaches.
    ///
    /// Falls back to the first handle of that kind, then to the middle of the
    /// bottom (source) or top (target) side.
    pub fn anchor(&self, handle: Option<&HandleId>, kind: HandleKind) -> (Point, Side) {
        let rect = self.rect();
        let chosen = handle
            .and_then(|id| self.handle(id))
            .or_else(|| self.default_handle(kind));
        match chosen {
            Some(h) => (h.anchor(&rect), h.side),
            None => {
                let side = match kind {
                    HandleKind::Source => Side::Bottom,
                    HandleKind::Target => Side::Top,
                };
                (side.point_on(&rect, 0.5), side)
            }
        }
    }
}

/// A directed relation between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<E = ()> {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<HandleId>,
    pub target_handle: Option<HandleId>,
    /// Marks an active flow; rendered with a moving dash.
    pub animated: bool,
    pub selected: bool,
    pub payload: E,
}

impl Edge<()> {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            animated: false,
            selected: false,
            payload: (),
        }
    }
}

impl<E> Edge<E> {
    pub fn with_payload<F>(self, payload: F) -> Edge<F> {
        Edge {
            id: self.id,
            source: self.source,
            target: self.target,
            source_handle: self.source_handle,
            target_handle: self.target_handle,
            animated: self.animated,
            selected: self.selected,
            payload,
        }
    }

    pub fn with_handles(mut self, source: Option<HandleId>, target: Option<HandleId>) -> Self {
        self.source_handle = source;
        self.target_handle = target;
        self
    }

    pub fn with_animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn involves_node(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    /// True when both edges connect the same handles in the same direction.
    pub fn same_connection<F>(&self, other: &Edge<F>) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.source_handle == other.source_handle
            && self.target_handle == other.target_handle
    }

    pub fn summary(&self) -> EdgeSummary {
        EdgeSummary {
            id: self.id.clone(),
            source: self.source.clone(),
            target: self.target.clone(),
            source_handle: self.source_handle.clone(),
            target_handle: self.target_handle.clone(),
        }
    }
}

/// Payload-free description of an edge, as reported in change events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSummary {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<HandleId>,
    pub target_handle: Option<HandleId>,
}
