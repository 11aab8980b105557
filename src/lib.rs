//! Render pre-laid-out Escher metabolic maps into drawable primitives.
//!
//! The pipeline decodes a map document, resolves per-metabolite and per-reaction styling, samples
//! reaction segments into polylines with directional arrow heads, and returns a [`PrimitiveSet`]
//! that any [`RenderBackend`] can draw. A Cairo backend writing PNG and SVG is included.

pub mod annotations;
pub mod backend;
pub mod cairo_backend;
pub mod config;
pub mod error;
pub mod geometry;
pub mod map;
pub mod nodes;
pub mod plot;
pub mod reactions;
pub mod style;

pub use backend::{render_primitives, RenderBackend};
pub use config::{Direction, PlotConfig, ReactionDirection, StyleOverrides};
pub use error::{MapError, Result};
pub use geometry::Point;
pub use map::{MapDocument, Resolution};
pub use plot::{
    plot_map, recompute_with_overrides, Arrow, MapCache, Marker, Polyline, PrimitiveSet,
    TextBlock, TextItem, TextKind,
};
pub use reactions::LineStyle;
pub use style::Color;
