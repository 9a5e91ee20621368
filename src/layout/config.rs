//! Configuration for the layout engine

use serde::Deserialize;

/// Options for overlap resolution
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlapConfig {
    /// Upper bound on resolution passes
    pub max_iterations: usize,

    /// Grid pitch displaced cards snap to; 0 disables snapping
    pub snap_to_grid: f64,

    /// Minimum gap kept between the edges of any two cards
    pub padding: f64,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            max_iterations: 16,
            snap_to_grid: 10.0,
            padding: 50.0,
        }
    }
}

impl OverlapConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration budget
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the grid pitch (0 disables snapping)
    pub fn with_snap_to_grid(mut self, snap: f64) -> Self {
        self.snap_to_grid = snap;
        self
    }

    /// Set the minimum gap between cards
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}

/// Options for connector routing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Margin obstacles are inflated by before collision tests
    pub clearance: f64,

    /// Minimum length of the perpendicular segment leaving or entering a card
    pub stub_length: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            clearance: 12.0,
            stub_length: 24.0,
        }
    }
}

impl RoutingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the obstacle clearance
    pub fn with_clearance(mut self, clearance: f64) -> Self {
        self.clearance = clearance;
        self
    }

    /// Set the exit stub length
    pub fn with_stub_length(mut self, stub_length: f64) -> Self {
        self.stub_length = stub_length;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let overlap = OverlapConfig::default();
        assert_eq!(overlap.max_iterations, 16);
        assert_eq!(overlap.snap_to_grid, 10.0);
        assert_eq!(overlap.padding, 50.0);

        let routing = RoutingConfig::default();
        assert_eq!(routing.clearance, 12.0);
        assert_eq!(routing.stub_length, 24.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = OverlapConfig::new()
            .with_max_iterations(4)
            .with_snap_to_grid(0.0)
            .with_padding(8.0);

        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.snap_to_grid, 0.0);
        assert_eq!(config.padding, 8.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: OverlapConfig = toml::from_str("padding = 20.0").unwrap();
        assert_eq!(config.padding, 20.0);
        assert_eq!(config.max_iterations, 16);
    }
}
