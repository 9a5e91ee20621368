//! Error types for the layout pipeline

use thiserror::Error;

/// Errors raised while resolving connectors against a layout snapshot
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A connector references a card that is not in the snapshot
    #[error("unknown card '{id}'{}", format_suggestions(.suggestions))]
    UnknownCard { id: String, suggestions: Vec<String> },
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}

impl LayoutError {
    /// Create an unknown card error with suggestions
    pub fn unknown_card(id: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::UnknownCard {
            id: id.into(),
            suggestions,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UnknownCard { suggestions, .. } => Some(suggestions),
        }
    }
}
