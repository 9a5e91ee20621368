//! Orthogonal connector routing around obstacle cards
//!
//! Routes are built by a short ladder of strategies, each cheaper than the
//! next: a straight line, a three-segment route with exit stubs, then a
//! five-segment detour around the nearest blocking card. The first strategy
//! that yields a clear route wins; the detour always produces something.

use std::cmp::Ordering;

use super::config::RoutingConfig;
use super::types::{Obstacle, Point, Rect, Side};

/// Tolerance for treating two coordinates as aligned
const EPSILON: f64 = 1e-6;

/// Whether the segment `a -> b` passes through the open interior of `rect`.
///
/// Exact for horizontal and vertical segments; anything else is tested by its
/// bounding box. Running along an edge does not count as crossing.
pub fn segment_blocked(a: Point, b: Point, rect: &Rect) -> bool {
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
    min_x < rect.right() && max_x > rect.x && min_y < rect.bottom() && max_y > rect.y
}

/// Number of rects crossed by at least one segment of `path`
pub fn path_blocked_by(path: &[Point], rects: &[Rect]) -> usize {
    rects
        .iter()
        .filter(|rect| {
            path.windows(2)
                .any(|seg| segment_blocked(seg[0], seg[1], rect))
        })
        .count()
}

/// Total length of an orthogonal polyline
fn path_length(path: &[Point]) -> f64 {
    path.windows(2).map(|seg| seg[0].manhattan(seg[1])).sum()
}

/// Distance from a point to the closest point of a rect (0 inside)
fn distance_to_rect(point: Point, rect: &Rect) -> f64 {
    let dx = (rect.x - point.x).max(0.0).max(point.x - rect.right());
    let dy = (rect.y - point.y).max(0.0).max(point.y - rect.bottom());
    dx.hypot(dy)
}

fn compare_obstacles(a: &Obstacle<'_>, b: &Obstacle<'_>) -> Ordering {
    a.id.cmp(b.id)
        .then(a.bounds.x.total_cmp(&b.bounds.x))
        .then(a.bounds.y.total_cmp(&b.bounds.y))
        .then(a.bounds.width.total_cmp(&b.bounds.width))
        .then(a.bounds.height.total_cmp(&b.bounds.height))
}

/// One routing request with its obstacle field already prepared
struct Router {
    from: Point,
    to: Point,
    from_side: Side,
    to_side: Side,
    stub: f64,
    clearance: f64,
    /// Inflated obstacle bounds in a fixed order
    blockers: Vec<Rect>,
    /// Bounds of the excluded cards, normally the two endpoints
    own_cards: Vec<Rect>,
}

impl Router {
    fn new(
        from: Point,
        to: Point,
        obstacles: &[Obstacle<'_>],
        exclude_ids: &[&str],
        from_side: Side,
        to_side: Side,
        config: &RoutingConfig,
    ) -> Self {
        let (mut own, mut kept): (Vec<Obstacle<'_>>, Vec<Obstacle<'_>>) = obstacles
            .iter()
            .copied()
            .partition(|o| exclude_ids.contains(&o.id));
        own.sort_by(compare_obstacles);
        kept.sort_by(compare_obstacles);

        Self {
            from,
            to,
            from_side,
            to_side,
            stub: config.stub_length,
            clearance: config.clearance,
            blockers: kept
                .iter()
                .map(|o| o.bounds.inflate(config.clearance))
                .collect(),
            own_cards: own.iter().map(|o| o.bounds).collect(),
        }
    }

    fn is_clear(&self, path: &[Point]) -> bool {
        path_blocked_by(path, &self.blockers) == 0
    }

    /// Clear of obstacles and never cutting through an endpoint card
    fn is_clean(&self, path: &[Point]) -> bool {
        self.is_clear(path) && path_blocked_by(path, &self.own_cards) == 0
    }

    /// Straight line, only when it leaves and enters perpendicular to both sides
    fn direct(&self) -> Option<Vec<Point>> {
        let (nx, ny) = self.from_side.normal();
        if self.to_side.normal() != (-nx, -ny) {
            return None;
        }

        let dx = self.to.x - self.from.x;
        let dy = self.to.y - self.from.y;
        let along = dx * nx + dy * ny;
        let across = dx * ny - dy * nx;
        if along <= EPSILON || across.abs() > EPSILON {
            return None;
        }

        let path = vec![self.from, self.to];
        self.is_clear(&path).then_some(path)
    }

    /// Three segments: exit stub, connecting segment, entry stub.
    ///
    /// Returns `None` when no such route can keep both stubs at least
    /// `stub` long. Obstacles are not consulted here.
    fn stubbed(&self) -> Option<Vec<Point>> {
        let (from, to, stub) = (self.from, self.to, self.stub);
        let from_normal = self.from_side.normal();
        let to_normal = self.to_side.normal();

        if self.from_side.is_horizontal() == self.to_side.is_horizontal() {
            // Parallel stubs: the middle segment crosses both stub lines at `m`
            let horizontal = self.from_side.is_horizontal();
            let ends = if horizontal {
                [(from.x, from_normal.0), (to.x, to_normal.0)]
            } else {
                [(from.y, from_normal.1), (to.y, to_normal.1)]
            };

            let mut lo = f64::NEG_INFINITY;
            let mut hi = f64::INFINITY;
            for (origin, normal) in ends {
                if normal > 0.0 {
                    lo = lo.max(origin + stub);
                } else {
                    hi = hi.min(origin - stub);
                }
            }
            if lo > hi + EPSILON {
                return None;
            }

            let m = if lo.is_finite() && hi.is_finite() {
                (lo + hi) / 2.0
            } else if lo.is_finite() {
                lo
            } else {
                hi
            };

            let (p1, p2) = if horizontal {
                (Point::new(m, from.y), Point::new(m, to.y))
            } else {
                (Point::new(from.x, m), Point::new(to.x, m))
            };
            return Some(vec![from, p1, p2, to]);
        }

        // Perpendicular stubs: an L whose long leg is split at the stub
        let corner = if self.from_side.is_horizontal() {
            Point::new(to.x, from.y)
        } else {
            Point::new(from.x, to.y)
        };
        let lead = (corner.x - from.x) * from_normal.0 + (corner.y - from.y) * from_normal.1;
        let tail = (corner.x - to.x) * to_normal.0 + (corner.y - to.y) * to_normal.1;
        if lead < stub - EPSILON || tail < stub - EPSILON {
            return None;
        }

        if self.from_side.is_horizontal() {
            Some(vec![from, from.offset(from_normal, stub), corner, to])
        } else {
            Some(vec![from, corner, to.offset(to_normal, stub), to])
        }
    }

    /// The blocking rect closest to the start of the route
    fn nearest_blocker(&self, path: &[Point]) -> Option<Rect> {
        let mut best: Option<(f64, Rect)> = None;
        for rect in &self.blockers {
            let crossed = path
                .windows(2)
                .any(|seg| segment_blocked(seg[0], seg[1], rect));
            if !crossed {
                continue;
            }
            let distance = distance_to_rect(self.from, rect);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, *rect));
            }
        }
        best.map(|(_, rect)| rect)
    }

    /// Five segments between the exit stubs; always returns a route
    fn detour(&self) -> Vec<Point> {
        let exit_from = self.from.offset(self.from_side.normal(), self.stub);
        let exit_to = self.to.offset(self.to_side.normal(), self.stub);

        let via_x = |x: f64| {
            vec![
                self.from,
                exit_from,
                Point::new(x, exit_from.y),
                Point::new(x, exit_to.y),
                exit_to,
                self.to,
            ]
        };
        let via_y = |y: f64| {
            vec![
                self.from,
                exit_from,
                Point::new(exit_from.x, y),
                Point::new(exit_to.x, y),
                exit_to,
                self.to,
            ]
        };

        let around = |rect: Rect| {
            Side::ALL.map(|side| match side {
                Side::Top => via_y(rect.y),
                Side::Right => via_x(rect.right()),
                Side::Bottom => via_y(rect.bottom()),
                Side::Left => via_x(rect.x),
            })
        };

        let mut candidates = Vec::with_capacity(6 + 4 * self.own_cards.len());

        let reference = self
            .stubbed()
            .unwrap_or_else(|| vec![self.from, self.to]);
        if let Some(blocker) = self.nearest_blocker(&reference) {
            candidates.extend(around(blocker));
        }
        for card in &self.own_cards {
            candidates.extend(around(card.inflate(self.clearance)));
        }

        // Midlines, turning off the exit stub first
        let mid_x = via_x((exit_from.x + exit_to.x) / 2.0);
        let mid_y = via_y((exit_from.y + exit_to.y) / 2.0);
        if self.from_side.is_horizontal() {
            candidates.push(mid_y);
            candidates.push(mid_x);
        } else {
            candidates.push(mid_x);
            candidates.push(mid_y);
        }

        // Ranked by obstacles crossed, then endpoint cards crossed, then length
        let mut best: Option<(usize, usize, f64, Vec<Point>)> = None;
        for path in candidates {
            let crossed = path_blocked_by(&path, &self.blockers);
            let own = path_blocked_by(&path, &self.own_cards);
            let length = path_length(&path);
            let better = match &best {
                None => true,
                Some((c, o, l, _)) => {
                    let rank = (crossed, own);
                    rank < (*c, *o) || (rank == (*c, *o) && length < *l - EPSILON)
                }
            };
            if better {
                best = Some((crossed, own, length, path));
            }
        }

        match best {
            Some((crossed, _, _, path)) => {
                if crossed > 0 {
                    log::debug!(
                        target: "routing",
                        "no clear detour, best effort still crosses {} obstacle(s)",
                        crossed
                    );
                }
                path
            }
            // Candidates always include both midlines
            None => via_x((exit_from.x + exit_to.x) / 2.0),
        }
    }
}

/// Route an orthogonal connector from `from` to `to`.
///
/// The route leaves `from` perpendicular to `from_side` and arrives at `to`
/// perpendicular to `to_side`. Obstacles listed in `exclude_ids` (normally the
/// two endpoint cards) never count as blocking, but a detour avoids cutting
/// through them when it can; the rest are inflated by `config.clearance`. The result has 2, 4 or 6 points, starts exactly at
/// `from` and ends exactly at `to`, and only contains horizontal and vertical
/// segments. Dense obstacle fields may yield a 6-point route that still
/// crosses an obstacle.
pub fn find_path_avoiding_obstacles(
    from: Point,
    to: Point,
    obstacles: &[Obstacle<'_>],
    exclude_ids: &[&str],
    from_side: Side,
    to_side: Side,
    config: &RoutingConfig,
) -> Vec<Point> {
    let router = Router::new(from, to, obstacles, exclude_ids, from_side, to_side, config);

    if let Some(path) = router.direct() {
        log::debug!(target: "routing", "direct route");
        return path;
    }
    if let Some(path) = router.stubbed().filter(|p| router.is_clean(p)) {
        log::debug!(target: "routing", "stubbed route");
        return path;
    }
    log::debug!(target: "routing", "detour route");
    router.detour()
}
