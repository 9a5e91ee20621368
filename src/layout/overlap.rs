//! Overlap resolution after a card moves or is created
//!
//! The anchor card (the one the user just touched) stays put; every other
//! card that collides with it, or with a card displaced on its behalf, is
//! pushed out of the way along its axis of least overlap.
//!
//! Passes sweep every pair and split the move between two non-anchor cards.
//! Split moves can fight each other, so once a sweep stops reducing the
//! number of collisions (or the last pass of the budget comes up) the pass
//! settles cards outward from the anchor instead: each card in turn is
//! pushed clear of every card already settled, which leaves no overlap.

use super::config::OverlapConfig;
use super::types::{LayoutMap, Rect};

/// Overlap at or below this is treated as touching
const OVERLAP_TOLERANCE: f64 = 1e-9;

/// Axis a pair of cards is separated along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Minimum translation needed to pull two cards apart
#[derive(Debug, Clone, Copy, PartialEq)]
struct Separation {
    axis: Axis,
    amount: f64,
}

/// The last push a card received in a sweep
#[derive(Debug, Clone, Copy)]
struct Push {
    axis: Axis,
    sign: f64,
    partner: usize,
}

/// Overlap of two rects once each is inflated by `padding / 2`.
///
/// Returns `None` when the inflated rects do not overlap (touching included).
/// Equal overlap on both axes resolves horizontally.
fn separation(a: &Rect, b: &Rect, padding: f64) -> Option<Separation> {
    let overlap_x = a.right().min(b.right()) - a.x.max(b.x) + padding;
    let overlap_y = a.bottom().min(b.bottom()) - a.y.max(b.y) + padding;

    if overlap_x <= OVERLAP_TOLERANCE || overlap_y <= OVERLAP_TOLERANCE {
        return None;
    }

    if overlap_x <= overlap_y {
        Some(Separation {
            axis: Axis::Horizontal,
            amount: overlap_x,
        })
    } else {
        Some(Separation {
            axis: Axis::Vertical,
            amount: overlap_y,
        })
    }
}

/// Direction `mover` travels to get away from `partner` along `axis`.
///
/// Coincident centers send the lower-sorted card negative.
fn push_sign(rects: &[Rect], mover: usize, partner: usize, axis: Axis) -> f64 {
    let (m, p) = (rects[mover].center(), rects[partner].center());
    let (m, p) = match axis {
        Axis::Horizontal => (m.x, p.x),
        Axis::Vertical => (m.y, p.y),
    };
    if m > p || (m == p && mover > partner) {
        1.0
    } else {
        -1.0
    }
}

/// Distance `mover` has to travel in direction `sign` to clear `fixed`
fn clearance_shift(mover: &Rect, fixed: &Rect, axis: Axis, sign: f64, padding: f64) -> f64 {
    let needed = match (axis, sign > 0.0) {
        (Axis::Horizontal, true) => fixed.right() + padding - mover.x,
        (Axis::Horizontal, false) => mover.right() - (fixed.x - padding),
        (Axis::Vertical, true) => fixed.bottom() + padding - mover.y,
        (Axis::Vertical, false) => mover.bottom() - (fixed.y - padding),
    };
    needed.max(0.0)
}

fn shift(rect: &mut Rect, axis: Axis, delta: f64) {
    match axis {
        Axis::Horizontal => rect.x += delta,
        Axis::Vertical => rect.y += delta,
    }
}

fn snap(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

/// Snap towards `sign`, so a pushed card never slides back
fn snap_forward(value: f64, grid: f64, sign: f64) -> f64 {
    if sign > 0.0 {
        (value / grid).ceil() * grid
    } else {
        (value / grid).floor() * grid
    }
}

fn snap_axis(rect: &mut Rect, axis: Axis, grid: f64, sign: f64) {
    match axis {
        Axis::Horizontal => rect.x = snap_forward(rect.x, grid, sign),
        Axis::Vertical => rect.y = snap_forward(rect.y, grid, sign),
    }
}

fn sorted_ids<P>(layout: &LayoutMap<P>) -> Vec<&str> {
    let mut ids: Vec<&str> = layout.keys().map(String::as_str).collect();
    ids.sort_unstable();
    ids
}

/// One Gauss-Seidel sweep over every pair; returns the number of collisions.
///
/// Displaced cards are snapped to the nearest grid point afterwards, unless
/// that would put them back inside the card that pushed them, in which case
/// the push axis is rounded onwards instead.
fn sweep(rects: &mut [Rect], anchor: usize, config: &OverlapConfig) -> usize {
    let padding = config.padding;
    let mut pushes: Vec<Option<Push>> = vec![None; rects.len()];
    let mut collisions = 0;

    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            let Some(sep) = separation(&rects[i], &rects[j], padding) else {
                continue;
            };
            collisions += 1;

            let sign_i = push_sign(rects, i, j, sep.axis);
            let sign_j = push_sign(rects, j, i, sep.axis);
            let (move_i, move_j) = if i == anchor {
                (0.0, sep.amount)
            } else if j == anchor {
                (sep.amount, 0.0)
            } else {
                (sep.amount / 2.0, sep.amount / 2.0)
            };

            if move_i > 0.0 {
                shift(&mut rects[i], sep.axis, sign_i * move_i);
                pushes[i] = Some(Push {
                    axis: sep.axis,
                    sign: sign_i,
                    partner: j,
                });
            }
            if move_j > 0.0 {
                shift(&mut rects[j], sep.axis, sign_j * move_j);
                pushes[j] = Some(Push {
                    axis: sep.axis,
                    sign: sign_j,
                    partner: i,
                });
            }
        }
    }

    let grid = config.snap_to_grid;
    if grid > 0.0 {
        for index in 0..rects.len() {
            let Some(push) = pushes[index] else {
                continue;
            };
            let mut snapped = rects[index];
            snapped.x = snap(snapped.x, grid);
            snapped.y = snap(snapped.y, grid);
            if separation(&snapped, &rects[push.partner], padding).is_some() {
                match push.axis {
                    Axis::Horizontal => snapped.x = rects[index].x,
                    Axis::Vertical => snapped.y = rects[index].y,
                }
                snap_axis(&mut snapped, push.axis, grid, push.sign);
            }
            rects[index] = snapped;
        }
    }

    collisions
}

/// Settle every card outward from the anchor; returns the number of pushes.
///
/// Cards are taken closest to the anchor first. Each one keeps the heading
/// of its first push and travels along it until it is clear of every card
/// settled before it, so no settled pair overlaps afterwards.
fn settle(rects: &mut [Rect], anchor: usize, config: &OverlapConfig) -> usize {
    let padding = config.padding;
    let grid = config.snap_to_grid;
    let origin = rects[anchor].center();

    let mut order: Vec<usize> = (0..rects.len()).filter(|&i| i != anchor).collect();
    order.sort_by(|&a, &b| {
        let da = rects[a].center().manhattan(origin);
        let db = rects[b].center().manhattan(origin);
        da.total_cmp(&db).then(a.cmp(&b))
    });

    let mut settled = vec![anchor];
    let mut pushes = 0;

    for mover in order {
        let mut heading: Option<(Axis, f64)> = None;
        let mut aligned = grid <= 0.0;

        // Each settled card is cleared at most once along a fixed heading
        for _ in 0..settled.len() + 2 {
            let hit = settled.iter().find_map(|&fixed| {
                separation(&rects[mover], &rects[fixed], padding).map(|sep| (fixed, sep))
            });
            let Some((fixed, sep)) = hit else {
                break;
            };

            if !aligned {
                // Snapping only happens before the first push
                rects[mover].x = snap(rects[mover].x, grid);
                rects[mover].y = snap(rects[mover].y, grid);
                aligned = true;
                continue;
            }

            let (axis, sign) = *heading
                .get_or_insert_with(|| (sep.axis, push_sign(rects, mover, fixed, sep.axis)));
            let distance = clearance_shift(&rects[mover], &rects[fixed], axis, sign, padding);
            shift(&mut rects[mover], axis, sign * distance);
            if grid > 0.0 {
                snap_axis(&mut rects[mover], axis, grid, sign);
            }
            pushes += 1;
        }

        settled.push(mover);
    }

    pushes
}

/// Push apart every card that overlaps the anchor or another card.
///
/// The caller's map is never touched; a new snapshot is returned in which the
/// anchor's rect is bit-identical to the input. Pairs are visited in sorted
/// id order so the result is reproducible. When `anchor_id` is not in the
/// layout the snapshot comes back unchanged.
///
/// Resolution stops after the first pass that finds no overlap, or after
/// `max_iterations` passes. With a budget of at least one pass the result has
/// no overlap left.
pub fn resolve_overlaps<P: Clone>(
    layout: &LayoutMap<P>,
    anchor_id: &str,
    config: &OverlapConfig,
) -> LayoutMap<P> {
    let mut result = layout.clone();

    let ids = sorted_ids(layout);
    let Some(anchor) = ids.iter().position(|id| *id == anchor_id) else {
        log::debug!(target: "overlap", "anchor '{}' not in layout, nothing to resolve", anchor_id);
        return result;
    };

    let mut rects: Vec<Rect> = ids.iter().map(|id| layout[*id].rect).collect();
    for (id, rect) in ids.iter().zip(&rects) {
        debug_assert!(rect.is_well_formed(), "card '{}' has degenerate bounds {:?}", id, rect);
    }

    let mut passes = 0;
    let mut converged = false;
    let mut fewest = usize::MAX;
    let mut stalled = false;

    while passes < config.max_iterations {
        passes += 1;

        if stalled || passes == config.max_iterations {
            let moved = settle(&mut rects, anchor, config);
            log::debug!(target: "overlap", "pass {}: settled with {} push(es)", passes, moved);
            if moved == 0 {
                converged = true;
                break;
            }
            stalled = false;
            fewest = usize::MAX;
            continue;
        }

        let collisions = sweep(&mut rects, anchor, config);
        if collisions == 0 {
            converged = true;
            break;
        }
        log::debug!(target: "overlap", "pass {}: separated {} pair(s)", passes, collisions);

        if collisions >= fewest {
            stalled = true;
        } else {
            fewest = collisions;
        }
    }

    for (id, rect) in ids.iter().zip(rects) {
        if let Some(card) = result.get_mut(*id) {
            card.rect = rect;
        }
    }

    let residual = if converged {
        0
    } else {
        overlapping_pairs(&result, config.padding).len()
    };
    if residual == 0 {
        log::debug!(target: "overlap", "resolved around '{}' in {} pass(es)", anchor_id, passes);
    } else {
        log::warn!(
            target: "overlap",
            "gave up around '{}' after {} pass(es), {} pair(s) still overlap",
            anchor_id,
            passes,
            residual
        );
    }

    result
}

/// Every pair of cards closer than `padding`, in sorted id order
pub fn overlapping_pairs<P>(layout: &LayoutMap<P>, padding: f64) -> Vec<(String, String)> {
    let ids = sorted_ids(layout);
    let mut pairs = Vec::new();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            if separation(&layout[*a].rect, &layout[*b].rect, padding).is_some() {
                pairs.push((a.to_string(), b.to_string()));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::Card;
    use pretty_assertions::assert_eq;

    fn layout(cards: &[(&str, Rect)]) -> LayoutMap {
        cards
            .iter()
            .map(|(id, rect)| (id.to_string(), Card::bare(*rect)))
            .collect()
    }

    fn rect_of(layout: &LayoutMap, id: &str) -> Rect {
        layout[id].rect
    }

    fn no_snap() -> OverlapConfig {
        OverlapConfig::default().with_snap_to_grid(0.0)
    }

    #[test]
    fn test_missing_anchor_is_noop() {
        let input = layout(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(10.0, 10.0, 100.0, 100.0)),
        ]);
        let output = resolve_overlaps(&input, "ghost", &OverlapConfig::default());
        assert_eq!(output, input);
    }

    #[test]
    fn test_separation_prefers_smaller_axis() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(90.0, 50.0, 100.0, 100.0);
        let sep = separation(&a, &b, 0.0).unwrap();
        assert_eq!(sep.axis, Axis::Horizontal);
        assert_eq!(sep.amount, 10.0);

        let c = Rect::new(50.0, 95.0, 100.0, 100.0);
        let sep = separation(&a, &c, 0.0).unwrap();
        assert_eq!(sep.axis, Axis::Vertical);
        assert_eq!(sep.amount, 5.0);
    }

    #[test]
    fn test_separation_tie_is_horizontal() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        let sep = separation(&a, &b, 0.0).unwrap();
        assert_eq!(sep.axis, Axis::Horizontal);
    }

    #[test]
    fn test_padding_gap_is_enforced() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(130.0, 0.0, 100.0, 100.0);
        assert!(separation(&a, &b, 0.0).is_none());
        assert_eq!(separation(&a, &b, 50.0).unwrap().amount, 20.0);
        // Exactly `padding` apart counts as clear
        assert!(separation(&a, &b, 30.0).is_none());
    }

    #[test]
    fn test_anchor_pushes_neighbour_right() {
        let input = layout(&[
            ("anchor", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("other", Rect::new(80.0, 10.0, 100.0, 100.0)),
        ]);
        let output = resolve_overlaps(&input, "anchor", &no_snap());
        assert_eq!(rect_of(&output, "anchor"), rect_of(&input, "anchor"));
        assert_eq!(rect_of(&output, "other"), Rect::new(150.0, 10.0, 100.0, 100.0));
    }

    #[test]
    fn test_anchor_pushes_neighbour_left_when_behind() {
        let input = layout(&[
            ("b", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("a", Rect::new(-60.0, 20.0, 100.0, 100.0)),
        ]);
        let output = resolve_overlaps(&input, "b", &no_snap());
        assert_eq!(rect_of(&output, "a"), Rect::new(-150.0, 20.0, 100.0, 100.0));
    }

    #[test]
    fn test_equal_overlap_moves_horizontally() {
        let input = layout(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(50.0, 50.0, 100.0, 100.0)),
        ]);
        let config = no_snap().with_padding(0.0);
        let output = resolve_overlaps(&input, "a", &config);
        assert_eq!(rect_of(&output, "b"), Rect::new(100.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_non_anchor_pair_splits_the_move() {
        let input = layout(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(60.0, 0.0, 100.0, 100.0)),
            ("z", Rect::new(1000.0, 1000.0, 10.0, 10.0)),
        ]);
        let config = no_snap().with_padding(0.0);
        let output = resolve_overlaps(&input, "z", &config);
        assert_eq!(rect_of(&output, "a").x, -20.0);
        assert_eq!(rect_of(&output, "b").x, 80.0);
        assert_eq!(rect_of(&output, "z"), rect_of(&input, "z"));
    }

    #[test]
    fn test_coincident_cards_split_deterministically() {
        let input = layout(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("z", Rect::new(1000.0, 1000.0, 10.0, 10.0)),
        ]);
        let config = no_snap().with_padding(0.0);
        let output = resolve_overlaps(&input, "z", &config);
        assert_eq!(rect_of(&output, "a").x, -50.0);
        assert_eq!(rect_of(&output, "b").x, 50.0);
    }

    #[test]
    fn test_cluster_resolves_with_secondary_collision() {
        let input = layout(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(80.0, 10.0, 100.0, 100.0)),
            ("c", Rect::new(10.0, 80.0, 100.0, 100.0)),
        ]);
        let output = resolve_overlaps(&input, "a", &no_snap());

        assert_eq!(rect_of(&output, "a"), rect_of(&input, "a"));
        assert_eq!(rect_of(&output, "b"), Rect::new(155.0, 10.0, 100.0, 100.0));
        assert_eq!(rect_of(&output, "c"), Rect::new(5.0, 150.0, 100.0, 100.0));
        assert!(overlapping_pairs(&output, 50.0).is_empty());
    }

    #[test]
    fn test_cluster_resolves_on_grid() {
        let input = layout(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(80.0, 10.0, 100.0, 100.0)),
            ("c", Rect::new(10.0, 80.0, 100.0, 100.0)),
        ]);
        let output = resolve_overlaps(&input, "a", &OverlapConfig::default());

        assert_eq!(rect_of(&output, "b"), Rect::new(160.0, 10.0, 100.0, 100.0));
        assert_eq!(rect_of(&output, "c"), Rect::new(10.0, 150.0, 100.0, 100.0));
        assert!(overlapping_pairs(&output, 50.0).is_empty());
    }

    #[test]
    fn test_grid_snap_rounds_to_nearest_multiple() {
        // The anchor pushes `b` left to x = 123.4; the snap brings it to 120
        let input = layout(&[
            ("a", Rect::new(273.4, 0.0, 100.0, 100.0)),
            ("b", Rect::new(150.0, 0.0, 100.0, 100.0)),
        ]);
        let output = resolve_overlaps(&input, "a", &OverlapConfig::default());
        assert_eq!(rect_of(&output, "b"), Rect::new(120.0, 0.0, 100.0, 100.0));
        assert!(overlapping_pairs(&output, 50.0).is_empty());
    }

    #[test]
    fn test_grid_snap_never_slides_back_into_off_grid_anchor() {
        // Nearest rounding would put `b` at 150, 3px inside the gap
        let input = layout(&[
            ("a", Rect::new(3.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(120.0, 0.0, 100.0, 100.0)),
        ]);
        let output = resolve_overlaps(&input, "a", &OverlapConfig::default());
        assert_eq!(rect_of(&output, "a"), rect_of(&input, "a"));
        assert_eq!(rect_of(&output, "b"), Rect::new(160.0, 0.0, 100.0, 100.0));
        assert!(overlapping_pairs(&output, 50.0).is_empty());
    }

    #[test]
    fn test_chain_settles_when_split_moves_stall() {
        // `a` pushes `b` into `c` and the split move pushes it straight back
        let input = layout(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(80.0, 0.0, 100.0, 100.0)),
            ("c", Rect::new(160.0, 0.0, 100.0, 100.0)),
        ]);
        let config = no_snap().with_padding(0.0);
        let output = resolve_overlaps(&input, "a", &config);
        assert_eq!(rect_of(&output, "b").x, 100.0);
        assert_eq!(rect_of(&output, "c").x, 200.0);
        assert!(overlapping_pairs(&output, 0.0).is_empty());
    }

    #[test]
    fn test_settle_keeps_heading_past_several_cards() {
        let mut rects = vec![
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(60.0, 0.0, 100.0, 100.0),
            Rect::new(170.0, 0.0, 40.0, 100.0),
            Rect::new(40.0, 5.0, 30.0, 30.0),
        ];
        let config = no_snap().with_padding(0.0);
        let pushes = settle(&mut rects, 0, &config);

        // Closest first: the small card clears the anchor, card 1 then has
        // to clear both of them, and card 2 goes past card 1
        assert_eq!(rects[3].x, 100.0);
        assert_eq!(rects[1].x, 130.0);
        assert_eq!(rects[2].x, 230.0);
        assert_eq!(pushes, 4);
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                assert!(separation(&rects[i], &rects[j], 0.0).is_none());
            }
        }
    }

    #[test]
    fn test_already_resolved_layout_is_unchanged() {
        let input = layout(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(200.0, 0.0, 100.0, 100.0)),
            ("c", Rect::new(0.0, 173.3, 37.1, 12.9)),
        ]);
        let output = resolve_overlaps(&input, "a", &OverlapConfig::default());
        assert_eq!(output, input);
    }

    #[test]
    fn test_zero_iterations_returns_input() {
        let input = layout(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(10.0, 10.0, 100.0, 100.0)),
        ]);
        let config = OverlapConfig::default().with_max_iterations(0);
        assert_eq!(resolve_overlaps(&input, "a", &config), input);
    }

    #[test]
    fn test_pile_is_cleared_within_any_budget() {
        let mut cards = Vec::new();
        for i in 0..12 {
            cards.push((format!("card{i:02}"), Rect::new(i as f64 * 3.0, 0.0, 100.0, 100.0)));
        }
        let input: LayoutMap = cards
            .iter()
            .map(|(id, rect)| (id.clone(), Card::bare(*rect)))
            .collect();
        for budget in [1, 2, OverlapConfig::default().max_iterations] {
            let config = OverlapConfig::default().with_max_iterations(budget);
            let output = resolve_overlaps(&input, "card05", &config);
            assert_eq!(output.len(), input.len());
            assert_eq!(rect_of(&output, "card05"), rect_of(&input, "card05"));
            assert!(overlapping_pairs(&output, config.padding).is_empty());
        }
    }

    #[test]
    fn test_payload_and_z_index_untouched() {
        let mut input: LayoutMap<&str> = std::collections::HashMap::new();
        input.insert(
            "a".into(),
            Card::new(Rect::new(0.0, 0.0, 100.0, 100.0), "anchor").with_z_index(3),
        );
        input.insert(
            "b".into(),
            Card::new(Rect::new(20.0, 0.0, 100.0, 100.0), "moved").with_z_index(7),
        );
        let output = resolve_overlaps(&input, "a", &no_snap());
        assert_eq!(output["b"].payload, "moved");
        assert_eq!(output["b"].z_index, 7);
        assert_ne!(output["b"].rect, input["b"].rect);
    }
}
