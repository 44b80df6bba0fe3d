//! Power Source to Workload Dynamics architecture: workloads at the top,
//! control layers in the middle, hardware at the bottom and the utility
//! side on the right.

use slint_flow_canvas::{Edge, EdgeStyle, Node, NodeRole, NodeStyle, Point};

const WHITE: &str = "#ffffff";

struct NodeEntry {
    id: &'static str,
    label: &'static str,
    x: f32,
    y: f32,
    width: f32,
    height: Option<f32>,
    background: &'static str,
    role: NodeRole,
}

const fn entry(
    id: &'static str,
    label: &'static str,
    (x, y): (f32, f32),
    (width, height): (f32, Option<f32>),
    background: &'static str,
) -> NodeEntry {
    NodeEntry { id, label, x, y, width, height, background, role: NodeRole::Default }
}

const fn workload(id: &'static str, label: &'static str, x: f32) -> NodeEntry {
    NodeEntry {
        id,
        label,
        x,
        y: 50.0,
        width: 120.0,
        height: None,
        background: "#ff6b6b",
        role: NodeRole::Input,
    }
}

const NODES: &[NodeEntry] = &[
    workload("ai-training", "AI Training\nWorkloads", 50.0),
    workload("ai-inference", "AI Inference\nWorkloads", 200.0),
    workload("hpc", "HPC\nApplications", 350.0),
    workload("traditional", "Traditional\nCompute", 500.0),
    entry(
        "workload-interface",
        "Workload Interface Layer\n• Event-driven messaging\n• Power profiling (100ms)\n• Predictive signaling\n• Flexibility parameters",
        (200.0, 180.0),
        (280.0, Some(80.0)),
        "#4ecdc4",
    ),
    entry(
        "infrastructure-control",
        "Infrastructure Control Layer\n• Real-time optimization\n• Battery coordination\n• Cooling orchestration\n• Multi-system coordination",
        (200.0, 320.0),
        (280.0, Some(80.0)),
        "#45b7d1",
    ),
    entry("power-distribution", "Power Distribution\nSystems", (50.0, 460.0), (120.0, None), "#f39c12"),
    entry("battery-storage", "Battery Energy\nStorage (250ms)", (200.0, 460.0), (120.0, None), "#e74c3c"),
    entry("ups-systems", "UPS Systems", (350.0, 460.0), (120.0, None), "#9b59b6"),
    entry("air-cooling", "Air-based\nCooling", (50.0, 580.0), (120.0, None), "#1abc9c"),
    entry("liquid-cooling", "Liquid Cooling\n(Single/Two-phase)", (200.0, 580.0), (120.0, None), "#16a085"),
    entry("heat-recovery", "Heat Recovery\nSystems", (350.0, 580.0), (120.0, None), "#27ae60"),
    entry(
        "bmc-systems",
        "BMC Systems\n• PSWD API endpoints\n• Sub-second monitoring\n• Sensor aggregation",
        (50.0, 720.0),
        (150.0, Some(80.0)),
        "#34495e",
    ),
    entry(
        "sensors",
        "Sensors\n• Temperature (±0.1°C)\n• Flow (±1%)\n• Pressure (±0.25%)",
        (250.0, 720.0),
        (150.0, Some(80.0)),
        "#2c3e50",
    ),
    entry(
        "power-meters",
        "Power Meters\n• 100ms resolution\n• ±0.5% accuracy\n• THD monitoring",
        (450.0, 720.0),
        (150.0, Some(80.0)),
        "#7f8c8d",
    ),
    entry(
        "external-integration",
        "External Integration Layer\n• Grid operator communication\n• Municipal utility integration\n• Renewable energy coordination",
        (650.0, 320.0),
        (280.0, Some(80.0)),
        "#8e44ad",
    ),
    entry(
        "grid-operator",
        "Grid Operator\n• IEC 61850-90-4\n• Demand response\n• Load forecasting",
        (650.0, 180.0),
        (140.0, Some(80.0)),
        "#d35400",
    ),
    entry(
        "renewable-energy",
        "Renewable Energy\n• Carbon intensity\n• Availability signals",
        (820.0, 180.0),
        (140.0, Some(80.0)),
        "#27ae60",
    ),
    entry("municipal-heat", "Municipal Heat\nNetwork (70-90°C)", (650.0, 460.0), (140.0, None), "#e67e22"),
    entry("district-heating", "District Heating\nSystems", (820.0, 460.0), (140.0, None), "#d68910"),
    entry(
        "security-layer",
        "Security Framework\n• IEC 62443-3-3\n• X.509 certificates\n• TLS 1.3+\n• Network segmentation",
        (650.0, 580.0),
        (180.0, Some(100.0)),
        "#c0392b",
    ),
    entry("time-sync", "Time Sync\n±1ms accuracy\nNTP/PTP", (500.0, 320.0), (120.0, Some(60.0)), "#6c5ce7"),
];

/// (id, source, target, animated, stroke, stroke width, dash array)
type EdgeEntry = (&'static str, &'static str, &'static str, bool, Option<&'static str>, Option<f32>, Option<&'static str>);

const EDGES: &[EdgeEntry] = &[
    ("e1", "ai-training", "workload-interface", true, Some("#ff6b6b"), None, None),
    ("e2", "ai-inference", "workload-interface", true, Some("#ff6b6b"), None, None),
    ("e3", "hpc", "workload-interface", true, Some("#ff6b6b"), None, None),
    ("e4", "traditional", "workload-interface", true, Some("#ff6b6b"), None, None),
    ("e5", "workload-interface", "infrastructure-control", true, Some("#4ecdc4"), Some(3.0), None),
    ("e6", "infrastructure-control", "power-distribution", true, None, None, None),
    ("e7", "infrastructure-control", "battery-storage", true, None, None, None),
    ("e8", "infrastructure-control", "ups-systems", true, None, None, None),
    ("e9", "infrastructure-control", "air-cooling", true, None, None, None),
    ("e10", "infrastructure-control", "liquid-cooling", true, None, None, None),
    ("e11", "infrastructure-control", "heat-recovery", true, None, None, None),
    ("e12", "power-distribution", "bmc-systems", false, None, None, Some("5,5")),
    ("e13", "battery-storage", "power-meters", false, None, None, Some("5,5")),
    ("e14", "liquid-cooling", "sensors", false, None, None, Some("5,5")),
    ("e15", "air-cooling", "sensors", false, None, None, Some("5,5")),
    ("e16", "infrastructure-control", "external-integration", true, Some("#45b7d1"), Some(3.0), None),
    ("e17", "external-integration", "grid-operator", true, None, None, None),
    ("e18", "external-integration", "renewable-energy", true, None, None, None),
    ("e19", "external-integration", "municipal-heat", true, None, None, None),
    ("e20", "municipal-heat", "district-heating", true, None, None, None),
    ("e21", "heat-recovery", "municipal-heat", true, Some("#27ae60"), None, None),
    ("e22", "time-sync", "infrastructure-control", false, Some("#6c5ce7"), None, Some("3,3")),
    ("e23", "time-sync", "external-integration", false, Some("#6c5ce7"), None, Some("3,3")),
    ("e24", "security-layer", "external-integration", false, Some("#c0392b"), None, Some("2,2")),
    ("e25", "security-layer", "infrastructure-control", false, Some("#c0392b"), None, Some("2,2")),
];

pub fn nodes(default_height: f32) -> Vec<Node<NodeStyle>> {
    NODES
        .iter()
        .map(|n| {
            Node::new(n.id, Point::new(n.x, n.y))
                .with_role(n.role)
                .with_size(n.width, n.height.unwrap_or(default_height))
                .with_payload(NodeStyle::new(n.label).with_background_hex(n.background).with_text_hex(WHITE))
        })
        .collect()
}

pub fn edges() -> Vec<Edge<EdgeStyle>> {
    EDGES
        .iter()
        .map(|&(id, source, target, animated, stroke, width, dash)| {
            let mut style = EdgeStyle::new();
            if let Some(stroke) = stroke {
                style = style.with_stroke_hex(stroke);
            }
            if let Some(width) = width {
                style = style.with_stroke_width(width);
            }
            if let Some(dash) = dash {
                style = style.with_dash_array(dash);
            }
            Edge::new(id, source, target).with_animated(animated).with_payload(style)
        })
        .collect()
}
