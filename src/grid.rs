//! Infinite background grid, clipped to the host surface.

use crate::geometry::{Point, Size, Viewport};
use serde::Deserialize;
use std::fmt::Write;

/// Below this on-screen gap (pixels) the grid is not drawn.
pub const MIN_VISIBLE_GAP: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum GridVariant {
    Lines,
    #[default]
    Dots,
}

/// One visible grid element, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridPrimitive {
    Line { from: Point, to: Point },
    Dot { center: Point, radius: f32 },
}

/// Compute the grid elements visible on a surface of `size`.
///
/// `gap` is the world-space spacing. The pattern is anchored at the world
/// origin, so panning by exactly one on-screen gap yields the same output.
pub fn visible_grid(
    viewport: &Viewport,
    size: Size,
    gap: f32,
    variant: GridVariant,
    dot_radius: f32,
) -> Vec<GridPrimitive> {
    let effective_gap = gap * viewport.scale;

    // Skip if spacing is too small to be visible
    if !effective_gap.is_finite() || effective_gap < MIN_VISIBLE_GAP {
        return Vec::new();
    }

    // Pan modulo gap gives the first on-screen grid coordinate
    let offset_x = viewport.x.rem_euclid(effective_gap);
    let offset_y = viewport.y.rem_euclid(effective_gap);

    let xs = steps(offset_x, size.width, effective_gap);
    let ys = steps(offset_y, size.height, effective_gap);

    match variant {
        GridVariant::Lines => {
            let vertical = xs.iter().map(|&x| GridPrimitive::Line {
                from: Point::new(x, 0.0),
                to: Point::new(x, size.height),
            });
            let horizontal = ys.iter().map(|&y| GridPrimitive::Line {
                from: Point::new(0.0, y),
                to: Point::new(size.width, y),
            });
            vertical.chain(horizontal).collect()
        }
        GridVariant::Dots => {
            let radius = (dot_radius * viewport.scale).max(0.5);
            ys.iter()
                .flat_map(|&y| {
                    xs.iter().map(move |&x| GridPrimitive::Dot { center: Point::new(x, y), radius })
                })
                .collect()
        }
    }
}

fn steps(start: f32, limit: f32, step: f32) -> Vec<f32> {
    let mut out = Vec::new();
    let mut v = start;
    while v <= limit {
        out.push(v);
        v += step;
    }
    out
}

/// Generate SVG path commands for grid primitives
///
/// Lines become `M x y L x y`; dots become two half-circle arcs.
pub fn generate_grid_commands(primitives: &[GridPrimitive]) -> String {
    let mut commands = String::with_capacity(primitives.len() * 24);
    for primitive in primitives {
        if !commands.is_empty() {
            commands.push(' ');
        }
        let _ = match *primitive {
            GridPrimitive::Line { from, to } => {
                write!(commands, "M {} {} L {} {}", from.x, from.y, to.x, to.y)
            }
            GridPrimitive::Dot { center, radius } => write!(
                commands,
                "M {} {} A {r} {r} 0 1 0 {} {} A {r} {r} 0 1 0 {} {}",
                center.x - radius,
                center.y,
                center.x + radius,
                center.y,
                center.x - radius,
                center.y,
                r = radius
            ),
        };
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(vp: Viewport, w: f32, h: f32, gap: f32) -> Vec<GridPrimitive> {
        visible_grid(&vp, Size::new(w, h), gap, GridVariant::Lines, 1.0)
    }

    // ========================================================================
    // Lines variant
    // ========================================================================

    #[test]
    fn test_grid_lines() {
        let commands = generate_grid_commands(&lines(Viewport::default(), 100.0, 100.0, 25.0));
        assert!(commands.contains("M 0 0 L 0 100")); // First vertical
        assert!(commands.contains("M 25 0 L 25 100")); // Second vertical
        assert!(commands.contains("M 0 25 L 100 25")); // Second horizontal
    }

    #[test]
    fn test_grid_lines_are_clipped_to_surface() {
        for primitive in lines(Viewport::new(-7.0, 13.0, 1.3), 120.0, 80.0, 20.0) {
            let GridPrimitive::Line { from, to } = primitive else {
                panic!("expected lines");
            };
            for p in [from, to] {
                assert!(p.x >= 0.0 && p.x <= 120.0);
                assert!(p.y >= 0.0 && p.y <= 80.0);
            }
        }
    }

    // ========================================================================
    // Zoom Behavior
    // ========================================================================

    #[test]
    fn test_grid_zoom_affects_spacing() {
        let count1 = lines(Viewport::new(0.0, 0.0, 1.0), 100.0, 100.0, 20.0).len();
        let count2 = lines(Viewport::new(0.0, 0.0, 2.0), 100.0, 100.0, 20.0).len();
        assert!(count1 > count2);
    }

    #[test]
    fn test_grid_skipped_below_threshold() {
        // Effective gap = 20 * 0.1 = 2.0 < 4.0
        assert!(lines(Viewport::new(0.0, 0.0, 0.1), 100.0, 100.0, 20.0).is_empty());
        // Exactly at threshold renders
        assert!(!lines(Viewport::default(), 100.0, 100.0, 4.0).is_empty());
        assert!(lines(Viewport::default(), 100.0, 100.0, 3.9).is_empty());
    }

    // ========================================================================
    // Pan Behavior
    // ========================================================================

    #[test]
    fn test_grid_pan_offsets_lines() {
        let a = lines(Viewport::default(), 100.0, 100.0, 20.0);
        let b = lines(Viewport::new(10.0, 0.0, 1.0), 100.0, 100.0, 20.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_grid_pan_wraps_with_modulo() {
        let a = lines(Viewport::default(), 100.0, 100.0, 20.0);
        let b = lines(Viewport::new(20.0, -40.0, 1.0), 100.0, 100.0, 20.0);
        assert_eq!(a, b);
    }

    // ========================================================================
    // Dots variant
    // ========================================================================

    #[test]
    fn test_grid_dots_cover_intersections() {
        let dots = visible_grid(&Viewport::default(), Size::new(40.0, 20.0), 20.0, GridVariant::Dots, 1.0);
        // x in {0, 20, 40}, y in {0, 20}
        assert_eq!(dots.len(), 6);
        assert!(dots.contains(&GridPrimitive::Dot { center: Point::new(40.0, 20.0), radius: 1.0 }));
    }

    #[test]
    fn test_grid_dot_commands_use_arcs() {
        let commands = generate_grid_commands(&[GridPrimitive::Dot { center: Point::new(10.0, 10.0), radius: 1.0 }]);
        assert_eq!(commands, "M 9 10 A 1 1 0 1 0 11 10 A 1 1 0 1 0 9 10");
    }

    #[test]
    fn test_grid_commands_no_trailing_space() {
        let commands = generate_grid_commands(&lines(Viewport::default(), 100.0, 100.0, 25.0));
        assert!(!commands.ends_with(' '));
        assert!(generate_grid_commands(&[]).is_empty());
    }
}
