//! Headless walk-through of the PSWD architecture diagram.
//!
//! Builds the engine, plays a short scripted session (drag, connect, delete)
//! and mirrors every frame into Slint models the way a window would.
//!
//! Run with `RUST_LOG=debug cargo run -p pswd [config.ron]` to see the
//! engine's own diagnostics.

mod data;

use slint::{Color, Model, SharedString, VecModel};
use slint_flow_canvas::{
    ConnectionMode, EdgePathSync, EngineConfig, FlowEngine, HandleKind, Key, Modifiers, NodeBoxSync, NodeId,
    Point, PointerButton, Rect,
};
use std::error::Error;
use std::rc::Rc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type Engine = FlowEngine<slint_flow_canvas::NodeStyle, slint_flow_canvas::EdgeStyle>;

#[derive(Clone, Debug, PartialEq)]
struct EdgeRow {
    id: SharedString,
    path: SharedString,
    color: Color,
    width: f32,
}

#[derive(Clone, Debug, PartialEq)]
struct NodeRow {
    id: SharedString,
    rect: Rect,
    label: SharedString,
    selected: bool,
}

fn load_config() -> Result<EngineConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading config");
            Ok(EngineConfig::from_ron(&std::fs::read_to_string(path)?)?)
        }
        None => Ok(EngineConfig::default().with_connection_mode(ConnectionMode::Loose)),
    }
}

fn handle_screen(engine: &Engine, node: &str, kind: HandleKind) -> Option<Point> {
    let node = engine.store().node(&NodeId::from(node))?;
    let (anchor, _) = node.anchor(None, kind);
    Some(engine.viewport().world_to_screen(anchor))
}

fn node_center_screen(engine: &Engine, node: &str) -> Option<Point> {
    let node = engine.store().node(&NodeId::from(node))?;
    Some(engine.viewport().world_to_screen(node.rect().center()))
}

/// Press at `from`, move in `steps` frames, release at `to`.
fn gesture(engine: &mut Engine, from: Point, to: Point, steps: usize, clock: &mut f32) {
    engine.pointer_down(from, PointerButton::Primary, Modifiers::NONE);
    for i in 1..=steps {
        engine.pointer_move(from.lerp(to, i as f32 / steps as f32));
        *clock += 1.0 / 60.0;
        engine.frame(*clock);
    }
    engine.pointer_up(to);
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    let default_height = config.default_node_size.height;
    let mut engine: Engine = FlowEngine::new(config, data::nodes(default_height), data::edges())?;
    info!(
        nodes = engine.store().node_count(),
        edges = engine.store().edge_count(),
        scale = engine.viewport().scale,
        "diagram loaded"
    );

    let events = engine.subscribe_channel();

    let edge_sync = EdgePathSync::new(Rc::new(VecModel::default()), |id, path, color, width| EdgeRow {
        id,
        path,
        color,
        width,
    });
    let node_sync = NodeBoxSync::new(Rc::new(VecModel::default()), |id, rect, _fill, label, selected| NodeRow {
        id,
        rect,
        label,
        selected,
    });

    let mut clock = 0.0;

    // Move the UPS box a little to the right
    if let Some(from) = node_center_screen(&engine, "ups-systems") {
        gesture(&mut engine, from, from + Point::new(40.0, 0.0), 12, &mut clock);
    }

    // Wire the UPS into the power meters
    match (
        handle_screen(&engine, "ups-systems", HandleKind::Source),
        handle_screen(&engine, "power-meters", HandleKind::Target),
    ) {
        (Some(from), Some(to)) => gesture(&mut engine, from, to, 20, &mut clock),
        _ => warn!("connection endpoints missing"),
    }
    if let Some(reason) = engine.last_rejection() {
        warn!(%reason, "connection rejected");
    }

    // Select the time sync node and delete it with its two edges
    if let Some(at) = node_center_screen(&engine, "time-sync") {
        engine.pointer_down(at, PointerButton::Primary, Modifiers::NONE);
        engine.pointer_up(at);
        engine.key_down(Key::Delete, Modifiers::NONE);
    }

    // One second of animation
    for _ in 0..60 {
        clock += 1.0 / 60.0;
        let frame = engine.frame(clock);
        edge_sync.sync(&frame);
        node_sync.sync(&frame);
    }

    for event in events.try_iter() {
        info!(?event, "change");
    }

    let frame = engine.frame(clock);
    let edge_rows = edge_sync.model();
    let node_rows = node_sync.model();
    info!(
        commands = frame.commands.len(),
        edges = edge_rows.row_count(),
        nodes = node_rows.row_count(),
        minimap_nodes = frame.minimap.as_ref().map_or(0, |m| m.nodes.len()),
        "final frame"
    );
    if let Some(row) = edge_rows.iter().find(|row| row.id.as_str().starts_with("edge-")) {
        info!(id = %row.id, width = row.width, color = ?row.color, path = %row.path, "new connection drawn");
    }
    for row in node_rows.iter().filter(|row| row.selected) {
        info!(id = %row.id, label = %row.label, x = row.rect.x, y = row.rect.y, "selected");
    }

    Ok(())
}
