//! Render helpers: connector bounds and rounded path descriptions
//!
//! Nothing here paints; the output is plain geometry for the render layer.

pub mod bounds;
pub mod config;
pub mod path;

pub use bounds::{connector_bounds, localize, CONNECTOR_BOUNDS_MARGIN};
pub use config::RenderConfig;
pub use path::{build_rounded_path, PathSegment, ResolvedPath};
