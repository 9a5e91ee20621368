//! Choosing which sides two cards connect through

use serde::Serialize;

use super::types::{Rect, Side};

/// Docking sides for both ends of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortPair {
    pub from_side: Side,
    pub to_side: Side,
}

/// Pick the pair of facing sides a person would draw by hand.
///
/// Cards separated mostly along x connect left/right, cards separated mostly
/// along y connect top/bottom; `|dx| == |dy|` counts as horizontal. The two
/// sides are always mutual opposites. Coincident centers fall back to
/// right -> left.
pub fn find_optimal_ports(from: &Rect, to: &Rect) -> PortPair {
    let dx = to.center().x - from.center().x;
    let dy = to.center().y - from.center().y;

    let from_side = if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            Side::Right
        } else {
            Side::Left
        }
    } else if dy >= 0.0 {
        Side::Bottom
    } else {
        Side::Top
    };

    PortPair {
        from_side,
        to_side: from_side.opposite(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(from_side: Side, to_side: Side) -> PortPair {
        PortPair { from_side, to_side }
    }

    #[test]
    fn test_horizontal_neighbours() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(200.0, 0.0, 50.0, 50.0);
        assert_eq!(find_optimal_ports(&a, &b), pair(Side::Right, Side::Left));
        assert_eq!(find_optimal_ports(&b, &a), pair(Side::Left, Side::Right));
    }

    #[test]
    fn test_vertical_neighbours() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(0.0, 200.0, 50.0, 50.0);
        assert_eq!(find_optimal_ports(&a, &b), pair(Side::Bottom, Side::Top));
        assert_eq!(find_optimal_ports(&b, &a), pair(Side::Top, Side::Bottom));
    }

    #[test]
    fn test_diagonal_tie_is_horizontal() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(100.0, -100.0, 50.0, 50.0);
        assert_eq!(find_optimal_ports(&a, &b), pair(Side::Right, Side::Left));
    }

    #[test]
    fn test_mostly_vertical_offset() {
        let a = Rect::new(0.0, 0.0, 100.0, 40.0);
        let b = Rect::new(60.0, -300.0, 100.0, 40.0);
        assert_eq!(find_optimal_ports(&a, &b), pair(Side::Top, Side::Bottom));
    }

    #[test]
    fn test_coincident_centers_default() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(25.0, 25.0, 50.0, 50.0);
        assert_eq!(find_optimal_ports(&a, &b), pair(Side::Right, Side::Left));
        assert_eq!(find_optimal_ports(&a, &a), pair(Side::Right, Side::Left));
    }
}
