//! Engine configuration.
//!
//! Every field has a default, so a RON document only needs the values it
//! changes:
//!
//! ```ignore
//! let config = EngineConfig::from_ron("(connection_mode: Loose, zoom_range: (min: 0.25, max: 4.0))")?;
//! ```

use crate::error::ConfigError;
use crate::events::Granularity;
use crate::geometry::{Corner, Size, ZoomRange};
use crate::graph::DEFAULT_NODE_SIZE;
use crate::grid::GridVariant;
use crate::path::DEFAULT_MIN_OFFSET;
use serde::Deserialize;

/// How strictly connection gestures are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ConnectionMode {
    /// Gestures must start on a source handle and end on a target handle.
    #[default]
    Strict,
    /// Any handle may start a gesture, a node body counts as a drop target,
    /// and the direction is normalized.
    Loose,
}

/// Background grid settings. `gap` and `dot_radius` are in world units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub visible: bool,
    pub variant: GridVariant,
    pub gap: f32,
    pub dot_radius: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { visible: true, variant: GridVariant::Dots, gap: 20.0, dot_radius: 1.0 }
    }
}

/// Overview panel settings. Sizes are in screen pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    pub visible: bool,
    pub size: Size,
    pub corner: Corner,
    pub margin: f32,
    /// Fill for nodes whose payload has no color, as a CSS hex string.
    pub node_color: String,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            visible: true,
            size: Size::new(200.0, 150.0),
            corner: Corner::TopRight,
            margin: 10.0,
            node_color: "#e2e8f0".to_owned(),
        }
    }
}

/// Controls overlay settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub visible: bool,
    pub corner: Corner,
    pub margin: f32,
    /// Edge length of each square button, in screen pixels.
    pub button_size: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self { visible: true, corner: Corner::BottomLeft, margin: 10.0, button_size: 26.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub zoom_range: ZoomRange,
    pub connection_mode: ConnectionMode,
    pub allow_self_loops: bool,
    pub deduplicate_edges: bool,

    /// Fraction of the surface kept free on each side by fit-view.
    pub fit_view_padding: f32,
    pub fit_view_on_init: bool,
    /// Surface size assumed until the host reports one.
    pub initial_viewport_size: Size,

    pub grid: GridConfig,
    pub minimap: MinimapConfig,
    pub controls: ControlsConfig,

    /// Handle hit radius, in screen pixels.
    pub handle_radius: f32,
    /// Maximum pointer distance to an edge curve for a hit, in screen pixels.
    pub edge_hit_distance: f32,
    pub bezier_min_offset: f32,
    pub default_node_size: Size,
    /// Pointer travel (screen pixels) before a press on a node becomes a drag.
    pub drag_threshold: f32,

    /// Dragging on empty canvas draws a selection box instead of panning.
    pub selection_on_drag: bool,
    pub granularity: Granularity,

    /// Scale factor applied by the zoom-in / zoom-out controls.
    pub zoom_step: f32,
    /// Zoom delta (power of two) per wheel unit.
    pub wheel_sensitivity: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zoom_range: ZoomRange::default(),
            connection_mode: ConnectionMode::Strict,
            allow_self_loops: false,
            deduplicate_edges: true,
            fit_view_padding: 0.1,
            fit_view_on_init: true,
            initial_viewport_size: Size::new(800.0, 600.0),
            grid: GridConfig::default(),
            minimap: MinimapConfig::default(),
            controls: ControlsConfig::default(),
            handle_radius: 8.0,
            edge_hit_distance: 6.0,
            bezier_min_offset: DEFAULT_MIN_OFFSET,
            default_node_size: DEFAULT_NODE_SIZE,
            drag_threshold: 1.0,
            selection_on_drag: false,
            granularity: Granularity::Batched,
            zoom_step: 1.2,
            wheel_sensitivity: 1.0 / 500.0,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a RON document. Missing fields keep their defaults.
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Parse(format!("{name} must be positive, got {v}")))
            }
        };
        positive("zoom_step", self.zoom_step)?;
        positive("grid.gap", self.grid.gap)?;
        positive("handle_radius", self.handle_radius)?;
        if !self.default_node_size.is_valid() {
            return Err(ConfigError::Parse("default_node_size must be positive".to_owned()));
        }
        Ok(())
    }

    pub fn with_zoom_range(mut self, range: ZoomRange) -> Self {
        self.zoom_range = range;
        self
    }

    pub fn with_connection_mode(mut self, mode: ConnectionMode) -> Self {
        self.connection_mode = mode;
        self
    }

    pub fn with_self_loops(mut self, allow: bool) -> Self {
        self.allow_self_loops = allow;
        self
    }

    pub fn with_deduplication(mut self, deduplicate: bool) -> Self {
        self.deduplicate_edges = deduplicate;
        self
    }

    pub fn with_fit_view_padding(mut self, padding: f32) -> Self {
        self.fit_view_padding = padding;
        self
    }

    pub fn with_fit_view_on_init(mut self, fit: bool) -> Self {
        self.fit_view_on_init = fit;
        self
    }

    pub fn with_viewport_size(mut self, size: Size) -> Self {
        self.initial_viewport_size = size;
        self
    }

    pub fn with_grid(mut self, variant: GridVariant, gap: f32) -> Self {
        self.grid.variant = variant;
        self.grid.gap = gap;
        self
    }

    pub fn with_selection_on_drag(mut self, enabled: bool) -> Self {
        self.selection_on_drag = enabled;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_minimap(mut self, visible: bool) -> Self {
        self.minimap.visible = visible;
        self
    }

    pub fn with_controls(mut self, visible: bool) -> Self {
        self.controls.visible = visible;
        self
    }

    pub fn with_drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }
}
