pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::{Diagnostic, ErrorKind, ErrorReporter, Stage, TourError};
pub use ir::{Edge, Graph, NodeId, Tour, build_cycle_graph};
pub use layout::{Point, Positions, compute_layout};
pub use parser::parse_tour;
pub use pipeline::{Outcome, PipelineOptions, RenderSummary, run_pipeline, visualize};
pub use render::{Scene, Surface, SvgSurface, TextSurface, render, render_svg};
pub use theme::Theme;
