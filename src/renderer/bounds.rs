//! Viewport bounds for connector geometry

use crate::layout::{Point, Rect};

/// Margin added around a connector so the stroke and arrowheads are not clipped
pub const CONNECTOR_BOUNDS_MARGIN: f64 = 10.0;

/// Bounding box of a routed connector, padded by [`CONNECTOR_BOUNDS_MARGIN`].
///
/// `from` and `to` are included even if the caller passes a path that does
/// not start or end on them.
pub fn connector_bounds(from: Point, to: Point, path: &[Point]) -> Rect {
    let tight = path
        .iter()
        .fold(Rect::new(from.x, from.y, 0.0, 0.0), |bounds, point| {
            bounds.expand_to_include(*point)
        })
        .expand_to_include(to);
    tight.inflate(CONNECTOR_BOUNDS_MARGIN)
}

/// Translate a path into the local coordinate system of `bounds`
pub fn localize(path: &[Point], bounds: &Rect) -> Vec<Point> {
    path.iter()
        .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_straight_connector_bounds() {
        let from = Point::new(100.0, 50.0);
        let to = Point::new(300.0, 50.0);
        let bounds = connector_bounds(from, to, &[from, to]);
        assert_eq!(bounds, Rect::new(90.0, 40.0, 220.0, 20.0));
    }

    #[test]
    fn test_bounds_cover_detour() {
        let from = Point::new(100.0, 50.0);
        let to = Point::new(300.0, 50.0);
        let path = [
            from,
            Point::new(124.0, 50.0),
            Point::new(124.0, -32.0),
            Point::new(276.0, -32.0),
            Point::new(276.0, 50.0),
            to,
        ];
        let bounds = connector_bounds(from, to, &path);
        assert_eq!(bounds, Rect::new(90.0, -42.0, 220.0, 102.0));
        for point in path {
            assert!(bounds.contains(point));
        }
    }

    #[test]
    fn test_localize_moves_origin_to_bounds() {
        let bounds = Rect::new(90.0, 40.0, 220.0, 20.0);
        let local = localize(&[Point::new(100.0, 50.0), Point::new(300.0, 50.0)], &bounds);
        assert_eq!(local, vec![Point::new(10.0, 10.0), Point::new(210.0, 10.0)]);
    }
}
