//! Connector path rendering utilities
//!
//! Turns a routed polyline into path segments with rounded corners and
//! serializes them as an SVG path `d` attribute.

use crate::layout::Point;

/// Relative tolerance for treating a joint as a right angle
const RIGHT_ANGLE_TOLERANCE: f64 = 1e-6;

/// A segment in a resolved path
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Move to starting point
    MoveTo(Point),
    /// Straight line to point
    LineTo(Point),
    /// Quadratic Bezier curve
    QuadraticTo { control: Point, end: Point },
}

/// A resolved path ready for SVG rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedPath {
    pub segments: Vec<PathSegment>,
}

impl ResolvedPath {
    /// Convert to SVG path `d` attribute string
    pub fn to_svg_d(&self) -> String {
        if self.segments.is_empty() {
            return String::new();
        }

        let mut d = String::new();

        for seg in &self.segments {
            if !d.is_empty() {
                d.push(' ');
            }
            match seg {
                PathSegment::MoveTo(p) => {
                    d.push_str(&format!("M{:.2} {:.2}", p.x, p.y));
                }
                PathSegment::LineTo(p) => {
                    d.push_str(&format!("L{:.2} {:.2}", p.x, p.y));
                }
                PathSegment::QuadraticTo { control, end } => {
                    // SVG Q command: Q cx cy ex ey (quadratic Bezier)
                    d.push_str(&format!(
                        "Q{:.2} {:.2} {:.2} {:.2}",
                        control.x, control.y, end.x, end.y
                    ));
                }
            }
        }

        d
    }
}

/// Round the right-angle corners of a polyline.
///
/// At every interior vertex where the path turns 90 degrees, the corner is cut
/// back by `min(corner_radius, shorter adjacent segment / 2)` on both sides
/// and replaced by a quadratic curve whose control point is the vertex. Any
/// other joint, including zero-length and straight-through ones, is kept as a
/// sharp line through the vertex.
pub fn build_rounded_path(points: &[Point], corner_radius: f64) -> ResolvedPath {
    let Some((&first, rest)) = points.split_first() else {
        return ResolvedPath::default();
    };

    let mut segments = vec![PathSegment::MoveTo(first)];

    for window in points.windows(3) {
        let (prev, vertex, next) = (window[0], window[1], window[2]);
        segments.extend(round_corner(prev, vertex, next, corner_radius));
    }

    if let Some(&last) = rest.last() {
        segments.push(PathSegment::LineTo(last));
    }

    ResolvedPath { segments }
}

fn round_corner(prev: Point, vertex: Point, next: Point, corner_radius: f64) -> Vec<PathSegment> {
    let (in_x, in_y) = (vertex.x - prev.x, vertex.y - prev.y);
    let (out_x, out_y) = (next.x - vertex.x, next.y - vertex.y);
    let len_in = in_x.hypot(in_y);
    let len_out = out_x.hypot(out_y);

    let sharp = vec![PathSegment::LineTo(vertex)];
    if len_in <= f64::EPSILON || len_out <= f64::EPSILON {
        return sharp;
    }

    let dot = in_x * out_x + in_y * out_y;
    if dot.abs() > RIGHT_ANGLE_TOLERANCE * len_in * len_out {
        return sharp;
    }

    let radius = corner_radius.min(len_in / 2.0).min(len_out / 2.0);
    if radius <= 0.0 {
        return sharp;
    }

    let before = Point::new(
        vertex.x - in_x / len_in * radius,
        vertex.y - in_y / len_in * radius,
    );
    let after = Point::new(
        vertex.x + out_x / len_out * radius,
        vertex.y + out_y / len_out * radius,
    );

    vec![
        PathSegment::LineTo(before),
        PathSegment::QuadraticTo {
            control: vertex,
            end: after,
        },
    ]
}
