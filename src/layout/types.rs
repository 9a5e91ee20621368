//! Core geometric types for the layout engine

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A 2D point in board coordinates (un-zoomed, un-panned)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by `distance` along a unit direction
    pub fn offset(self, (dx, dy): (f64, f64), distance: f64) -> Point {
        Point::new(self.x + dx * distance, self.y + dy * distance)
    }

    /// Manhattan distance to another point
    pub fn manhattan(self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// An axis-aligned rectangle
///
/// Width and height must be strictly positive; every operation in this crate
/// relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this rectangle contains a point (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Grow the rectangle by `margin` on every side
    pub fn inflate(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Expand this rectangle to include a point
    pub fn expand_to_include(&self, point: Point) -> Rect {
        let x = self.x.min(point.x);
        let y = self.y.min(point.y);
        let right = self.right().max(point.x);
        let bottom = self.bottom().max(point.y);
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Whether the rectangle satisfies the positive-size precondition
    pub fn is_well_formed(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Standard AABB overlap test.
///
/// Rectangles that merely touch along an edge do not overlap.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// One of the four docking sides of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Every side, in the order ties are broken
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Top <-> Bottom, Left <-> Right
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Outward unit normal (y grows downward)
    pub fn normal(self) -> (f64, f64) {
        match self {
            Side::Top => (0.0, -1.0),
            Side::Right => (1.0, 0.0),
            Side::Bottom => (0.0, 1.0),
            Side::Left => (-1.0, 0.0),
        }
    }

    /// Left and right sides leave horizontally
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Midpoint of the given side of a rectangle
pub fn port_position(rect: &Rect, side: Side) -> Point {
    match side {
        Side::Top => Point::new(rect.x + rect.width / 2.0, rect.y),
        Side::Right => Point::new(rect.right(), rect.y + rect.height / 2.0),
        Side::Bottom => Point::new(rect.x + rect.width / 2.0, rect.bottom()),
        Side::Left => Point::new(rect.x, rect.y + rect.height / 2.0),
    }
}

/// A card on the board: geometry plus an opaque payload the engine never reads
#[derive(Debug, Clone, PartialEq)]
pub struct Card<P = ()> {
    pub rect: Rect,
    pub z_index: i32,
    pub payload: P,
}

impl<P> Card<P> {
    pub fn new(rect: Rect, payload: P) -> Self {
        Self {
            rect,
            z_index: 0,
            payload,
        }
    }

    /// Set the stacking order
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

impl Card<()> {
    /// Card without a payload
    pub fn bare(rect: Rect) -> Self {
        Self::new(rect, ())
    }
}

/// Snapshot of every card on the board, keyed by card id
pub type LayoutMap<P = ()> = HashMap<String, Card<P>>;

/// A card viewed as something a connector must route around
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle<'a> {
    pub id: &'a str,
    pub bounds: Rect,
}

impl<'a> Obstacle<'a> {
    pub fn new(id: &'a str, bounds: Rect) -> Self {
        Self { id, bounds }
    }
}

/// Borrow every card of a layout as an obstacle
pub fn obstacles<P>(layout: &LayoutMap<P>) -> Vec<Obstacle<'_>> {
    layout
        .iter()
        .map(|(id, card)| Obstacle::new(id.as_str(), card.rect))
        .collect()
}

/// A logical edge between two cards
///
/// Sides left as `None` are chosen by the port selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_side: Option<Side>,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_side: Option<Side>,
}

impl Connector {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            from_side: None,
            to: to.into(),
            to_side: None,
        }
    }

    /// Pin both docking sides
    pub fn with_sides(mut self, from_side: Side, to_side: Side) -> Self {
        self.from_side = Some(from_side);
        self.to_side = Some(to_side);
        self
    }
}

/// Drawable geometry for one connector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorGeometry {
    pub from: String,
    pub to: String,
    pub from_side: Side,
    pub to_side: Side,
    /// Routed polyline in board coordinates
    pub points: Vec<Point>,
    /// Viewport covering the path, stroke and arrowheads
    pub bounds: Rect,
    /// `points` relative to the top-left of `bounds`
    pub local_points: Vec<Point>,
    /// SVG path data for `local_points` with rounded corners
    pub d: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_position_each_side() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(port_position(&rect, Side::Top), Point::new(60.0, 20.0));
        assert_eq!(port_position(&rect, Side::Right), Point::new(110.0, 45.0));
        assert_eq!(port_position(&rect, Side::Bottom), Point::new(60.0, 70.0));
        assert_eq!(port_position(&rect, Side::Left), Point::new(10.0, 45.0));
    }

    #[test]
    fn test_opposite_side_is_involution() {
        for side in Side::ALL {
            assert_ne!(side.opposite(), side);
            assert_eq!(side.opposite().opposite(), side);
        }
        assert_eq!(Side::Top.opposite(), Side::Bottom);
        assert_eq!(Side::Left.opposite(), Side::Right);
    }

    #[test]
    fn test_normal_points_away_from_card() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        for side in Side::ALL {
            let outside = port_position(&rect, side).offset(side.normal(), 1.0);
            assert!(!rect.contains(outside), "{side:?} normal points inward");
        }
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(100.0, 0.0, 100.0, 100.0);
        let c = Rect::new(0.0, 100.0, 100.0, 100.0);
        assert!(!rects_overlap(&a, &b));
        assert!(!rects_overlap(&a, &c));
    }

    #[test]
    fn test_overlapping_rects() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(99.0, 99.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &b));
        assert!(rects_overlap(&b, &a));
    }

    #[test]
    fn test_inflate_and_union() {
        let a = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(a.inflate(5.0), Rect::new(5.0, 5.0, 30.0, 30.0));

        let b = Rect::new(50.0, 0.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(10.0, 0.0, 50.0, 30.0));
    }

    #[test]
    fn test_well_formed() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_well_formed());
        assert!(!Rect::new(0.0, 0.0, 0.0, 1.0).is_well_formed());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 1.0).is_well_formed());
    }

    #[test]
    fn test_side_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            side: Side,
        }
        let w: Wrapper = toml::from_str(r#"side = "bottom""#).unwrap();
        assert_eq!(w.side, Side::Bottom);
    }
}
