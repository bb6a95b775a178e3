use crate::config::Config;
use crate::error::{Diagnostic, ErrorReporter, TourError};
use crate::ir::build_cycle_graph;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_tour;
use crate::render::{Surface, render};
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub stops: usize,
    pub nodes: usize,
    pub edges: usize,
}

/// How one invocation ended: a drawing, or one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Rendered(RenderSummary),
    Reported(Diagnostic),
}

impl Outcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

/// Options that sit outside the drawing config.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions<'a> {
    pub dump_layout: Option<&'a Path>,
}

/// Parses, builds, lays out and renders one tour.
pub fn visualize<S, F>(
    input: &str,
    config: &Config,
    options: PipelineOptions<'_>,
    open: F,
) -> Result<RenderSummary, TourError>
where
    S: Surface,
    F: FnOnce() -> io::Result<S>,
{
    let tour = parse_tour(input)?;
    let graph = build_cycle_graph(&tour);
    let positions = compute_layout(&graph, &config.layout)?;
    if let Some(path) = options.dump_layout {
        // Layout dumps are an inspection aid; a failed write does not stop the render.
        if let Err(err) = write_layout_dump(path, &graph, &positions) {
            tracing::warn!(path = %path.display(), "failed to write layout dump: {err:#}");
        }
    }
    render(&graph, &positions, config, open)?;
    Ok(RenderSummary {
        stops: tour.len(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
    })
}

/// Runs [`visualize`] and routes any failure through `reporter`.
pub fn run_pipeline<S, F, W>(
    input: Option<&str>,
    config: &Config,
    options: PipelineOptions<'_>,
    open: F,
    reporter: &mut ErrorReporter<W>,
) -> Outcome
where
    S: Surface,
    F: FnOnce() -> io::Result<S>,
    W: Write,
{
    let result = match input {
        Some(input) => visualize(input, config, options, open),
        None => Err(TourError::missing_input()),
    };
    match result {
        Ok(summary) => {
            tracing::info!(
                stops = summary.stops,
                nodes = summary.nodes,
                edges = summary.edges,
                "rendered tour"
            );
            Outcome::Rendered(summary)
        }
        Err(err) => Outcome::Reported(reporter.report(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, Stage};
    use crate::render::SvgSurface;

    fn run(input: Option<&str>) -> (Outcome, String, String) {
        let mut out = Vec::new();
        let mut reporter = ErrorReporter::new(Vec::new());
        let outcome = run_pipeline(
            input,
            &Config::default(),
            PipelineOptions::default(),
            || Ok(SvgSurface::new(&mut out)),
            &mut reporter,
        );
        let report = String::from_utf8(reporter.into_inner()).unwrap();
        (outcome, String::from_utf8(out).unwrap(), report)
    }

    #[test]
    fn renders_triangle() {
        let (outcome, svg, report) = run(Some("1,2,3"));
        assert_eq!(
            outcome,
            Outcome::Rendered(RenderSummary {
                stops: 3,
                nodes: 3,
                edges: 3
            })
        );
        assert!(svg.contains("<svg"));
        assert!(report.is_empty());
    }

    #[test]
    fn single_stop_renders() {
        let (outcome, svg, _) = run(Some("5"));
        assert!(outcome.is_rendered());
        assert!(svg.contains(">5</text>"));
        assert_eq!(svg.matches("<line ").count(), 0);
    }

    #[test]
    fn malformed_entry_is_reported_not_rendered() {
        let (outcome, svg, report) = run(Some("1,a,3"));
        let Outcome::Reported(diagnostic) = outcome else {
            panic!("expected a diagnostic");
        };
        assert_eq!(diagnostic.kind, ErrorKind::ParseError);
        assert_eq!(diagnostic.fragment.as_deref(), Some("a"));
        assert!(svg.is_empty());
        assert!(report.contains("ParseError"));
    }

    #[test]
    fn empty_input_is_validation_error() {
        let (outcome, _, report) = run(Some(""));
        match outcome {
            Outcome::Reported(diagnostic) => {
                assert_eq!(diagnostic.kind, ErrorKind::ValidationError)
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(report.contains("tour is empty"));
    }

    #[test]
    fn missing_input_is_reported() {
        let (outcome, svg, report) = run(None);
        assert!(!outcome.is_rendered());
        assert!(svg.is_empty());
        assert!(report.contains("no tour provided"));
    }

    #[test]
    fn surface_failure_is_a_render_diagnostic() {
        let mut reporter = ErrorReporter::new(Vec::new());
        let outcome = run_pipeline(
            Some("1,2"),
            &Config::default(),
            PipelineOptions::default(),
            || Err::<SvgSurface<Vec<u8>>, _>(io::Error::other("no display")),
            &mut reporter,
        );
        match outcome {
            Outcome::Reported(diagnostic) => {
                assert_eq!(diagnostic.kind, ErrorKind::RenderError);
                assert_eq!(diagnostic.stage, Stage::Render);
                assert!(diagnostic.message.contains("no display"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn writes_layout_dump_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        let summary = visualize(
            "3,1,2",
            &Config::default(),
            PipelineOptions {
                dump_layout: Some(&path),
            },
            || Ok(SvgSurface::new(Vec::new())),
        )
        .unwrap();
        assert_eq!(summary.nodes, 3);
        assert!(path.exists());
    }
}
