//! Configuration for connector rendering

use serde::Deserialize;

/// Options for turning routes into drawable paths
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Radius of the rounded corners on routed connectors
    pub corner_radius: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            corner_radius: 12.0,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the corner radius
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }
}
