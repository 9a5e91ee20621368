//! Board snapshots on disk
//!
//! A board file is the TOML form of what the editor hands the engine: every
//! card's geometry, the connectors between them, the card that just moved and
//! optional tuning. This is the trust boundary, so geometry is validated here
//! rather than in the engine.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::layout::{Card, Connector, ConnectorGeometry, LayoutMap, Rect};
use crate::BoardConfig;

/// Opaque per-card data carried through the engine untouched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardPayload {
    pub label: Option<String>,
}

/// A board snapshot: cards, connectors and the card that just changed
#[derive(Debug, Clone)]
pub struct Board {
    /// Card that moved or was created; overlap resolution keeps it fixed
    pub anchor: Option<String>,
    pub config: BoardConfig,
    pub layout: LayoutMap<CardPayload>,
    pub connectors: Vec<Connector>,
}

/// TOML structure for deserializing boards
#[derive(Deserialize)]
struct TomlBoard {
    anchor: Option<String>,
    #[serde(default)]
    config: BoardConfig,
    #[serde(default)]
    cards: Vec<TomlCard>,
    #[serde(default)]
    connectors: Vec<Connector>,
}

#[derive(Deserialize)]
struct TomlCard {
    id: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    z_index: i32,
    label: Option<String>,
}

impl Board {
    /// Load a board from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, BoardError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let parsed: TomlBoard = toml::from_str(content)?;

        let mut layout = HashMap::with_capacity(parsed.cards.len());
        for card in parsed.cards {
            let rect = Rect::new(card.x, card.y, card.width, card.height);
            if !rect.is_well_formed() {
                return Err(BoardError::DegenerateCard {
                    id: card.id,
                    x: card.x,
                    y: card.y,
                    width: card.width,
                    height: card.height,
                });
            }
            if layout.contains_key(&card.id) {
                return Err(BoardError::DuplicateCard { id: card.id });
            }
            let payload = CardPayload { label: card.label };
            layout.insert(card.id, Card::new(rect, payload).with_z_index(card.z_index));
        }

        log::debug!(
            target: "board",
            "loaded {} card(s), {} connector(s)",
            layout.len(),
            parsed.connectors.len()
        );

        Ok(Board {
            anchor: parsed.anchor,
            config: parsed.config,
            layout,
            connectors: parsed.connectors,
        })
    }
}

/// A card as written back out after layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardReport {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Result of running the pipeline over a board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    pub cards: Vec<CardReport>,
    pub connectors: Vec<ConnectorGeometry>,
}

impl BoardReport {
    /// Build a report from a layout; cards are listed in id order
    pub fn new(
        anchor: Option<String>,
        layout: &LayoutMap<CardPayload>,
        connectors: Vec<ConnectorGeometry>,
    ) -> Self {
        let mut cards: Vec<CardReport> = layout
            .iter()
            .map(|(id, card)| CardReport {
                id: id.clone(),
                x: card.rect.x,
                y: card.rect.y,
                width: card.rect.width,
                height: card.rect.height,
                z_index: card.z_index,
                label: card.payload.label.clone(),
            })
            .collect();
        cards.sort_by(|a, b| a.id.cmp(&b.id));

        Self {
            anchor,
            cards,
            connectors,
        }
    }

    /// Serialize the report as TOML
    pub fn to_toml(&self) -> Result<String, BoardError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
