//! Prism Layout - spatial layout and connector routing for card boards
//!
//! This library keeps cards on a whiteboard from overlapping, picks the sides
//! connectors dock to, routes orthogonal connectors around other cards and
//! turns the routes into drawable geometry. Every operation is a pure
//! function over a snapshot supplied by the caller.
//!
//! # Example
//!
//! ```rust
//! use prism_layout::{route_connector, BoardConfig, Card, Connector, LayoutMap, Rect};
//!
//! let mut layout = LayoutMap::new();
//! layout.insert("a".to_string(), Card::bare(Rect::new(0.0, 0.0, 100.0, 100.0)));
//! layout.insert("b".to_string(), Card::bare(Rect::new(300.0, 0.0, 100.0, 100.0)));
//!
//! let geometry = route_connector(&layout, &Connector::new("a", "b"), &BoardConfig::default()).unwrap();
//! assert_eq!(geometry.points.len(), 2);
//! assert!(geometry.d.starts_with('M'));
//! ```

pub mod board;
pub mod error;
pub mod layout;
pub mod renderer;

pub use board::{Board, BoardReport, CardPayload};
pub use error::BoardError;
pub use layout::{
    find_optimal_ports, find_path_avoiding_obstacles, port_position, rects_overlap,
    resolve_overlaps, Card, Connector, ConnectorGeometry, LayoutError, LayoutMap, Obstacle,
    OverlapConfig, Point, PortPair, Rect, RoutingConfig, Side,
};
pub use renderer::{build_rounded_path, connector_bounds, RenderConfig};

use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while processing a board snapshot
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Error reading or writing the snapshot
    #[error("board error: {0}")]
    Board(#[from] BoardError),

    /// Error resolving connectors against the layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Configuration for the complete layout pipeline
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Overlap resolution options
    pub overlap: OverlapConfig,
    /// Connector routing options
    pub routing: RoutingConfig,
    /// Rounded path options
    pub render: RenderConfig,
}

impl BoardConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overlap resolution configuration
    pub fn with_overlap(mut self, config: OverlapConfig) -> Self {
        self.overlap = config;
        self
    }

    /// Set the routing configuration
    pub fn with_routing(mut self, config: RoutingConfig) -> Self {
        self.routing = config;
        self
    }

    /// Set the render configuration
    pub fn with_render(mut self, config: RenderConfig) -> Self {
        self.render = config;
        self
    }
}

/// Compute the drawable geometry of one connector.
///
/// Sides the connector leaves open are chosen with [`find_optimal_ports`];
/// a single pinned side is paired with its opposite. Every card except the
/// two endpoints is treated as an obstacle.
pub fn route_connector<P>(
    layout: &LayoutMap<P>,
    connector: &Connector,
    config: &BoardConfig,
) -> Result<ConnectorGeometry, LayoutError> {
    let from_card = layout
        .get(&connector.from)
        .ok_or_else(|| layout::unknown_card(layout, &connector.from))?;
    let to_card = layout
        .get(&connector.to)
        .ok_or_else(|| layout::unknown_card(layout, &connector.to))?;

    let (from_side, to_side) = match (connector.from_side, connector.to_side) {
        (Some(from_side), Some(to_side)) => (from_side, to_side),
        (Some(from_side), None) => (from_side, from_side.opposite()),
        (None, Some(to_side)) => (to_side.opposite(), to_side),
        (None, None) => {
            let ports = find_optimal_ports(&from_card.rect, &to_card.rect);
            (ports.from_side, ports.to_side)
        }
    };

    let from = port_position(&from_card.rect, from_side);
    let to = port_position(&to_card.rect, to_side);
    let obstacles = layout::obstacles(layout);
    let points = find_path_avoiding_obstacles(
        from,
        to,
        &obstacles,
        &[connector.from.as_str(), connector.to.as_str()],
        from_side,
        to_side,
        &config.routing,
    );

    let bounds = connector_bounds(from, to, &points);
    let local_points = renderer::localize(&points, &bounds);
    let d = build_rounded_path(&local_points, config.render.corner_radius).to_svg_d();

    Ok(ConnectorGeometry {
        from: connector.from.clone(),
        to: connector.to.clone(),
        from_side,
        to_side,
        points,
        bounds,
        local_points,
        d,
    })
}

/// Route many connectors in parallel; output order matches `connectors`
pub fn route_connectors<P: Sync>(
    layout: &LayoutMap<P>,
    connectors: &[Connector],
    config: &BoardConfig,
) -> Result<Vec<ConnectorGeometry>, LayoutError> {
    layout::validate_connectors(layout, connectors)?;
    connectors
        .par_iter()
        .map(|connector| route_connector(layout, connector, config))
        .collect()
}

/// Run the whole pipeline over a board snapshot.
///
/// Overlaps are resolved around the board's anchor when it has one; the
/// connectors are then routed against the resolved layout.
pub fn process_board(board: &Board) -> Result<BoardReport, LayoutError> {
    let layout = match &board.anchor {
        Some(anchor) => resolve_overlaps(&board.layout, anchor, &board.config.overlap),
        None => board.layout.clone(),
    };
    let connectors = route_connectors(&layout, &board.connectors, &board.config)?;
    Ok(BoardReport::new(board.anchor.clone(), &layout, connectors))
}

/// Parse a TOML board, run the pipeline and serialize the report as TOML
///
/// # Example
///
/// ```rust
/// let report = prism_layout::process_str(r#"
///     [[cards]]
///     id = "a"
///     x = 0.0
///     y = 0.0
///     width = 100.0
///     height = 100.0
/// "#).unwrap();
/// assert!(report.contains("id = \"a\""));
/// ```
pub fn process_str(source: &str) -> Result<String, ProcessError> {
    let board: Board = source.parse()?;
    let report = process_board(&board)?;
    Ok(report.to_toml()?)
}
