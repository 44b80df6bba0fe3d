//! Pure projection of the graph and viewport into screen-space draw commands.
//!
//! The renderer reads the store and never mutates it. Commands come out in
//! paint order, so a host can draw them front to back as listed.

use crate::config::{EngineConfig, GridConfig};
use crate::controls::{Control, ControlsOverlay};
use crate::geometry::{Point, Rect, Size, Viewport};
use crate::graph::{EdgeId, EdgePayload, HandleId, HandleKind, NodeId, NodePayload, Side};
use crate::grid::{generate_grid_commands, visible_grid, GridPrimitive, GridVariant};
use crate::minimap::MinimapFrame;
use crate::path::CubicBezier;
use crate::store::GraphStore;
use slint::Color;

/// Colors and sizes used when a payload does not override them.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub grid_color: Color,
    pub edge_color: Color,
    pub edge_selected_color: Color,
    pub edge_width: f32,
    /// Dash used for animated edges without their own pattern.
    pub animated_dash: (f32, f32),
    /// Screen pixels per second the dash of an animated edge travels.
    pub dash_speed: f32,
    pub connection_line_color: Color,
    pub node_fill: Color,
    pub node_border: Color,
    pub node_text: Color,
    pub selection_outline: Color,
    pub handle_fill: Color,
    /// Handle dot radius in screen pixels.
    pub handle_radius: f32,
    pub selection_box_fill: Color,
    pub selection_box_stroke: Color,
    pub control_fill: Color,
    pub control_active_fill: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            grid_color: Color::from_rgb_u8(0x91, 0x91, 0x9a),
            edge_color: Color::from_rgb_u8(0xb1, 0xb1, 0xb7),
            edge_selected_color: Color::from_rgb_u8(0x55, 0x55, 0x55),
            edge_width: 1.0,
            animated_dash: (5.0, 5.0),
            dash_speed: 20.0,
            connection_line_color: Color::from_rgb_u8(0xb1, 0xb1, 0xb7),
            node_fill: Color::from_rgb_u8(0xff, 0xff, 0xff),
            node_border: Color::from_rgb_u8(0x1a, 0x19, 0x2b),
            node_text: Color::from_rgb_u8(0x22, 0x22, 0x22),
            selection_outline: Color::from_rgb_u8(0x1a, 0x19, 0x2b),
            handle_fill: Color::from_rgb_u8(0x1a, 0x19, 0x2b),
            handle_radius: 3.0,
            selection_box_fill: Color::from_argb_u8(20, 0x00, 0x59, 0xdc),
            selection_box_stroke: Color::from_argb_u8(204, 0x00, 0x59, 0xdc),
            control_fill: Color::from_rgb_u8(0xfe, 0xfe, 0xfe),
            control_active_fill: Color::from_rgb_u8(0xf4, 0xf4, 0xf4),
        }
    }
}

/// A drawn edge, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePrimitive {
    pub id: EdgeId,
    pub curve: CubicBezier,
    pub path: String,
    pub color: Color,
    pub width: f32,
    pub dash: Option<(f32, f32)>,
    pub dash_offset: f32,
    pub animated: bool,
    pub selected: bool,
    pub label: Option<String>,
    pub label_position: Point,
}

/// A drawn node box, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePrimitive {
    pub id: NodeId,
    pub rect: Rect,
    pub fill: Color,
    pub border: Color,
    pub text_color: Color,
    pub label: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Grid { variant: GridVariant, path: String, color: Color },
    Edge(EdgePrimitive),
    /// The in-progress connection of a drawing gesture.
    TransientEdge { path: String, color: Color },
    Node(NodePrimitive),
    Handle { node: NodeId, handle: HandleId, kind: HandleKind, center: Point, radius: f32, color: Color },
    SelectionOutline { rect: Rect, color: Color },
    SelectionBox { rect: Rect, fill: Color, stroke: Color },
    ControlButton { control: Control, rect: Rect, glyph: &'static str, fill: Color },
}

/// Transient, non-graph state the renderer draws on top of the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// World-space start anchor, its side, and the current pointer position.
    pub transient_edge: Option<(Point, Side, Point)>,
    /// World-space selection rectangle.
    pub selection_box: Option<Rect>,
    pub controls: Option<ControlsOverlay>,
    pub interactive: bool,
}

/// Everything the host needs to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    pub surface: Size,
    pub commands: Vec<DrawCommand>,
    pub minimap: Option<MinimapFrame>,
}

impl Frame {
    pub fn edges(&self) -> impl Iterator<Item = &EdgePrimitive> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Edge(e) => Some(e),
            _ => None,
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodePrimitive> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Node(n) => Some(n),
            _ => None,
        })
    }

    /// SVG commands of the background grid, empty when no grid is drawn.
    pub fn grid_commands(&self) -> &str {
        self.commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Grid { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Stateless command generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    pub style: RenderStyle,
    pub grid: GridConfig,
    pub bezier_min_offset: f32,
}

impl Renderer {
    pub fn new(config: &EngineConfig) -> Self {
        Self { style: RenderStyle::default(), grid: config.grid, bezier_min_offset: config.bezier_min_offset }
    }

    /// Produce draw commands in paint order. `time` is in seconds and only
    /// drives the dash offset of animated edges.
    pub fn render<N: NodePayload, E: EdgePayload>(
        &self,
        store: &GraphStore<N, E>,
        viewport: &Viewport,
        surface: Size,
        overlay: &Overlay,
        time: f32,
    ) -> Vec<DrawCommand> {
        let style = &self.style;
        let screen = Rect::new(0.0, 0.0, surface.width, surface.height);
        let margin = style.handle_radius * 2.0;
        let mut commands = Vec::with_capacity(store.node_count() * 4 + store.edge_count() + 8);

        if self.grid.visible {
            let primitives: Vec<GridPrimitive> =
                visible_grid(viewport, surface, self.grid.gap, self.grid.variant, self.grid.dot_radius);
            if !primitives.is_empty() {
                commands.push(DrawCommand::Grid {
                    variant: self.grid.variant,
                    path: generate_grid_commands(&primitives),
                    color: style.grid_color,
                });
            }
        }

        for edge in store.edges() {
            let Some(a) = store.edge_anchors(edge) else {
                continue;
            };
            let curve = CubicBezier::between(
                viewport.world_to_screen(a.source),
                a.source_side,
                viewport.world_to_screen(a.target),
                a.target_side,
                viewport.scale,
                self.bezier_min_offset,
            );
            if !hull(&curve).expand(margin).intersects(&screen) {
                continue;
            }

            let dash = edge
                .payload
                .dash_pattern()
                .or(edge.animated.then_some(style.animated_dash));
            let dash_offset = match dash {
                Some((on, off)) if edge.animated && on + off > 0.0 => {
                    let period = on + off;
                    period - (time * style.dash_speed).rem_euclid(period)
                }
                _ => 0.0,
            };
            let color = if edge.selected {
                style.edge_selected_color
            } else {
                edge.payload.stroke_color().unwrap_or(style.edge_color)
            };

            commands.push(DrawCommand::Edge(EdgePrimitive {
                id: edge.id.clone(),
                path: curve.to_svg_commands(),
                curve,
                color,
                width: edge.payload.stroke_width().unwrap_or(style.edge_width),
                dash,
                dash_offset,
                animated: edge.animated,
                selected: edge.selected,
                label: edge.payload.label().map(str::to_owned),
                label_position: curve.midpoint(),
            }));
        }

        if let Some((start, side, pointer)) = overlay.transient_edge {
            let end = viewport.world_to_screen(pointer);
            let start = viewport.world_to_screen(start);
            let end_side = facing_side(start, end);
            let curve = CubicBezier::between(start, side, end, end_side, viewport.scale, self.bezier_min_offset);
            commands.push(DrawCommand::TransientEdge { path: curve.to_svg_commands(), color: style.connection_line_color });
        }

        let mut outlines = Vec::new();
        // Handles follow their own node so a node on top covers them
        for node in store.nodes() {
            let rect = viewport.world_rect_to_screen(&node.rect());
            if !rect.expand(margin).intersects(&screen) {
                continue;
            }
            commands.push(DrawCommand::Node(NodePrimitive {
                id: node.id.clone(),
                rect,
                fill: node.payload.fill_color().unwrap_or(style.node_fill),
                border: style.node_border,
                text_color: node.payload.text_color().unwrap_or(style.node_text),
                label: node.payload.label().map(str::to_owned),
                selected: node.selected,
            }));
            for handle in &node.handles {
                commands.push(DrawCommand::Handle {
                    node: node.id.clone(),
                    handle: handle.id.clone(),
                    kind: handle.kind,
                    center: handle.anchor(&rect),
                    radius: style.handle_radius,
                    color: style.handle_fill,
                });
            }
            if node.selected {
                outlines.push(DrawCommand::SelectionOutline { rect: rect.expand(1.0), color: style.selection_outline });
            }
        }
        commands.extend(outlines);

        if let Some(area) = overlay.selection_box {
            commands.push(DrawCommand::SelectionBox {
                rect: viewport.world_rect_to_screen(&area),
                fill: style.selection_box_fill,
                stroke: style.selection_box_stroke,
            });
        }

        if let Some(controls) = &overlay.controls {
            for &(control, rect) in &controls.buttons {
                let active = control == Control::ToggleInteractivity && !overlay.interactive;
                commands.push(DrawCommand::ControlButton {
                    control,
                    rect,
                    glyph: control.glyph(overlay.interactive),
                    fill: if active { style.control_active_fill } else { style.control_fill },
                });
            }
        }

        commands
    }
}

/// Bounding box of the control polygon, which contains the curve.
fn hull(curve: &CubicBezier) -> Rect {
    let a = Rect::from_points(curve.p0, curve.p1);
    let b = Rect::from_points(curve.p2, curve.p3);
    a.union(&b)
}

/// Side a free-floating end should enter from, given where the curve comes from.
fn facing_side(from: Point, to: Point) -> Side {
    let d = to - from;
    if d.y.abs() >= d.x.abs() {
        if d.y >= 0.0 {
            Side::Top
        } else {
            Side::Bottom
        }
    } else if d.x >= 0.0 {
        Side::Left
    } else {
        Side::Right
    }
}
