//! Overview projection of the whole graph into a small fixed panel.

use crate::config::MinimapConfig;
use crate::geometry::{Point, Rect, Size, Viewport};
use crate::graph::{parse_hex_color, NodeId, NodePayload};
use crate::store::GraphStore;
use slint::Color;

/// One node as drawn in the minimap: panel coordinates and fill only.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapNode {
    pub id: NodeId,
    pub rect: Rect,
    pub color: Color,
    pub selected: bool,
}

/// A projected minimap, in screen coordinates of the host surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapFrame {
    /// Panel rectangle on the host surface.
    pub panel: Rect,
    /// World region shown by the panel (nodes plus the visible area).
    pub world_bounds: Rect,
    /// Panel pixels per world unit.
    pub scale: f32,
    pub nodes: Vec<MinimapNode>,
    /// The main view's visible area, projected into the panel.
    pub viewport_rect: Rect,
}

impl MinimapFrame {
    pub fn world_to_panel(&self, p: Point) -> Point {
        let world_mid = self.world_bounds.center();
        let panel_mid = self.panel.center();
        Point::new(
            (p.x - world_mid.x) * self.scale + panel_mid.x,
            (p.y - world_mid.y) * self.scale + panel_mid.y,
        )
    }

    /// Inverse of [`world_to_panel`](Self::world_to_panel); used for click-to-pan.
    pub fn panel_to_world(&self, p: Point) -> Point {
        let world_mid = self.world_bounds.center();
        let panel_mid = self.panel.center();
        Point::new(
            (p.x - panel_mid.x) / self.scale + world_mid.x,
            (p.y - panel_mid.y) / self.scale + world_mid.y,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        self.panel.contains(p)
    }

    fn project_rect(&self, r: &Rect) -> Rect {
        Rect::from_points(self.world_to_panel(r.min()), self.world_to_panel(r.max()))
    }
}

/// Project the store into the minimap panel. `None` when the minimap is hidden
/// or the panel has no area.
pub fn project<N: NodePayload, E>(
    store: &GraphStore<N, E>,
    viewport: &Viewport,
    surface: Size,
    config: &MinimapConfig,
) -> Option<MinimapFrame> {
    if !config.visible || !config.size.is_valid() {
        return None;
    }
    let panel = config.corner.place(surface, config.size, config.margin);
    let visible = viewport.visible_world_rect(surface);
    let world_bounds = store.bounds().map_or(visible, |b| b.union(&visible));
    if !(world_bounds.width > 0.0 && world_bounds.height > 0.0) {
        return None;
    }

    let scale = (panel.width / world_bounds.width).min(panel.height / world_bounds.height);
    let fallback = parse_hex_color(&config.node_color).unwrap_or(Color::from_rgb_u8(0xe2, 0xe8, 0xf0));

    let mut frame = MinimapFrame { panel, world_bounds, scale, nodes: Vec::new(), viewport_rect: Rect::default() };
    frame.viewport_rect = frame.project_rect(&visible);
    frame.nodes = store
        .nodes()
        .map(|node| MinimapNode {
            id: node.id.clone(),
            rect: frame.project_rect(&node.rect()),
            color: node.payload.fill_color().unwrap_or(fallback),
            selected: node.selected,
        })
        .collect();
    Some(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, NodeStyle};

    fn store() -> GraphStore<NodeStyle> {
        let mut store = GraphStore::new();
        store
            .add_node(Node::new("a", Point::new(0.0, 0.0)).with_size(100.0, 100.0).with_payload(NodeStyle::new("A")))
            .unwrap();
        store
            .add_node(
                Node::new("b", Point::new(1900.0, 1400.0))
                    .with_size(100.0, 100.0)
                    .with_payload(NodeStyle::new("B").with_background_hex("#ff6b6b")),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_project_places_panel_top_right() {
        let frame = project(&store(), &Viewport::default(), Size::new(800.0, 600.0), &MinimapConfig::default()).unwrap();
        assert_eq!(frame.panel, Rect::new(590.0, 10.0, 200.0, 150.0));
        // World bounds 2000x1500 into 200x150
        assert!((frame.scale - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_nodes_and_viewport_inside_panel() {
        let frame = project(&store(), &Viewport::default(), Size::new(800.0, 600.0), &MinimapConfig::default()).unwrap();
        for node in &frame.nodes {
            assert!(frame.panel.contains_rect(&node.rect, 1e-3));
        }
        assert!(frame.panel.contains_rect(&frame.viewport_rect, 1e-3));
        let vr = frame.viewport_rect;
        for (got, want) in [(vr.x, 590.0), (vr.y, 10.0), (vr.width, 80.0), (vr.height, 60.0)] {
            assert!((got - want).abs() < 1e-3, "{vr:?}");
        }
    }

    #[test]
    fn test_node_colors_with_fallback() {
        let frame = project(&store(), &Viewport::default(), Size::new(800.0, 600.0), &MinimapConfig::default()).unwrap();
        assert_eq!(frame.nodes[0].color, Color::from_rgb_u8(0xe2, 0xe8, 0xf0));
        assert_eq!(frame.nodes[1].color, Color::from_rgb_u8(0xff, 0x6b, 0x6b));
    }

    #[test]
    fn test_panel_to_world_inverts_projection() {
        let frame = project(&store(), &Viewport::new(-30.0, 12.0, 1.5), Size::new(800.0, 600.0), &MinimapConfig::default())
            .unwrap();
        let world = Point::new(432.0, 987.0);
        let back = frame.panel_to_world(frame.world_to_panel(world));
        assert!((back.x - world.x).abs() < 1e-2 && (back.y - world.y).abs() < 1e-2);
    }

    #[test]
    fn test_hidden_minimap() {
        let config = MinimapConfig { visible: false, ..MinimapConfig::default() };
        assert!(project(&store(), &Viewport::default(), Size::new(800.0, 600.0), &config).is_none());
    }
}
