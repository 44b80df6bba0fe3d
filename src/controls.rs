//! Zoom / fit / lock button column drawn over the canvas.

use crate::config::ControlsConfig;
use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ZoomIn,
    ZoomOut,
    FitView,
    /// Lock or unlock node dragging, connecting and selecting.
    ToggleInteractivity,
}

impl Control {
    pub const ALL: [Control; 4] =
        [Control::ZoomIn, Control::ZoomOut, Control::FitView, Control::ToggleInteractivity];

    /// Short glyph hosts can draw on the button.
    pub fn glyph(self, interactive: bool) -> &'static str {
        match self {
            Control::ZoomIn => "+",
            Control::ZoomOut => "-",
            Control::FitView => "[ ]",
            Control::ToggleInteractivity if interactive => "unlocked",
            Control::ToggleInteractivity => "locked",
        }
    }
}

/// Screen-space placement of the control buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsOverlay {
    pub buttons: Vec<(Control, Rect)>,
}

impl ControlsOverlay {
    /// Stack the buttons vertically in the configured corner of `surface`.
    pub fn layout(surface: Size, config: &ControlsConfig) -> Self {
        if !config.visible {
            return Self { buttons: Vec::new() };
        }
        let side = config.button_size;
        let panel = Size::new(side, side * Control::ALL.len() as f32);
        let origin = config.corner.place(surface, panel, config.margin).min();
        let buttons = Control::ALL
            .iter()
            .enumerate()
            .map(|(i, &control)| (control, Rect::new(origin.x, origin.y + side * i as f32, side, side)))
            .collect();
        Self { buttons }
    }

    pub fn hit(&self, point: Point) -> Option<Control> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(control, _)| *control)
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::union_all(self.buttons.iter().map(|(_, r)| *r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_bottom_left_column() {
        let overlay = ControlsOverlay::layout(Size::new(800.0, 600.0), &ControlsConfig::default());
        assert_eq!(overlay.buttons.len(), 4);
        assert_eq!(overlay.bounds(), Some(Rect::new(10.0, 486.0, 26.0, 104.0)));
        assert_eq!(overlay.buttons[0], (Control::ZoomIn, Rect::new(10.0, 486.0, 26.0, 26.0)));
    }

    #[test]
    fn test_hit() {
        let overlay = ControlsOverlay::layout(Size::new(800.0, 600.0), &ControlsConfig::default());
        assert_eq!(overlay.hit(Point::new(20.0, 520.0)), Some(Control::ZoomOut));
        assert_eq!(overlay.hit(Point::new(400.0, 300.0)), None);
    }

    #[test]
    fn test_hidden_overlay_has_no_buttons() {
        let config = ControlsConfig { visible: false, ..ControlsConfig::default() };
        let overlay = ControlsOverlay::layout(Size::new(800.0, 600.0), &config);
        assert!(overlay.hit(Point::new(20.0, 520.0)).is_none());
        assert_eq!(overlay.bounds(), None);
    }
}
