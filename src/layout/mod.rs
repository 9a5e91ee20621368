//! Layout engine: overlap resolution, port selection and connector routing
//!
//! Every function here is pure. Callers pass a snapshot of the board and get
//! a new snapshot (or plain geometry) back.

pub mod config;
pub mod error;
pub mod overlap;
pub mod ports;
pub mod routing;
pub mod types;

pub use config::{OverlapConfig, RoutingConfig};
pub use error::LayoutError;
pub use overlap::{overlapping_pairs, resolve_overlaps};
pub use ports::{find_optimal_ports, PortPair};
pub use routing::{find_path_avoiding_obstacles, path_blocked_by, segment_blocked};
pub use types::*;

/// Check that every connector endpoint names a card in the layout.
pub fn validate_connectors<P>(
    layout: &LayoutMap<P>,
    connectors: &[Connector],
) -> Result<(), LayoutError> {
    for connector in connectors {
        for id in [&connector.from, &connector.to] {
            if !layout.contains_key(id) {
                return Err(unknown_card(layout, id));
            }
        }
    }
    Ok(())
}

/// Build an unknown-card error, suggesting ids that are a typo away
pub(crate) fn unknown_card<P>(layout: &LayoutMap<P>, id: &str) -> LayoutError {
    LayoutError::unknown_card(id, find_similar(layout.keys().map(String::as_str), id, 2))
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    if a_chars.is_empty() {
        return n;
    }
    if n == 0 {
        return a_chars.len();
    }

    // Single rolling row
    let mut row: Vec<usize> = (0..=n).collect();
    for (i, ca) in a_chars.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[n]
}

/// Find similar identifiers within a maximum edit distance
fn find_similar<'a>(
    defined: impl Iterator<Item = &'a str>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let mut candidates: Vec<(&str, usize)> = defined
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then_some((name, dist))
        })
        .collect();

    candidates.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
    candidates
        .into_iter()
        .map(|(name, _)| name.to_string())
        .take(3)
        .collect()
}
