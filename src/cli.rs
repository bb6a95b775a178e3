use crate::config::load_config;
use crate::error::ErrorReporter;
use crate::pipeline::{Outcome, PipelineOptions, run_pipeline};
use crate::render::{SvgSurface, TerminalSurface, TextSurface};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Size of the text canvas when stdout is not a terminal.
const TEXT_COLUMNS: usize = 80;
const TEXT_ROWS: usize = 24;

#[derive(Parser, Debug)]
#[command(name = "tourviz", version, about = "Render a closed tour as a cycle graph")]
pub struct Args {
    /// Comma-separated tour, e.g. 1,2,3,4
    pub tour: Option<String>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "terminal")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, layout and render overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width (SVG output)
    #[arg(short = 'w', long = "width", default_value_t = 800.0)]
    pub width: f32,

    /// Height (SVG output)
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Title drawn above the graph
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    /// Plain ASCII glyphs for terminal and text output
    #[arg(long = "ascii")]
    pub ascii: bool,

    /// Write node positions and edges as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Log progress (info level)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Log everything (debug level)
    #[arg(long = "debug")]
    pub debug: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Interactive full-screen view
    Terminal,
    /// Character drawing on stdout
    Text,
    /// SVG document on stdout
    Svg,
}

pub fn init_tracing(verbose: bool, debug: bool) {
    let default_level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .try_init();
}

pub fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose, args.debug);

    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;
    if args.title.is_some() {
        config.render.title = args.title.clone();
    }
    if args.ascii {
        config.render.ascii = true;
    }

    let options = PipelineOptions {
        dump_layout: args.dump_layout.as_deref(),
    };
    let mut reporter = ErrorReporter::stderr();
    let input = args.tour.as_deref();

    let format = match args.output_format {
        OutputFormat::Terminal if !std::io::stdout().is_terminal() => {
            tracing::info!("stdout is not a terminal; falling back to text output");
            OutputFormat::Text
        }
        other => other,
    };

    let outcome = match format {
        OutputFormat::Terminal => {
            run_pipeline(input, &config, options, TerminalSurface::open, &mut reporter)
        }
        OutputFormat::Text => run_pipeline(
            input,
            &config,
            options,
            || TextSurface::stdout(TEXT_COLUMNS, TEXT_ROWS),
            &mut reporter,
        ),
        OutputFormat::Svg => run_pipeline(input, &config, options, SvgSurface::stdout, &mut reporter),
    };

    Ok(match outcome {
        Outcome::Rendered(_) => ExitCode::SUCCESS,
        Outcome::Reported(_) => ExitCode::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn tour_is_optional() {
        let args = Args::try_parse_from(["tourviz"]).unwrap();
        assert!(args.tour.is_none());
        assert_eq!(args.output_format, OutputFormat::Terminal);
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "tourviz",
            "-e",
            "svg",
            "--title",
            "Best route",
            "--ascii",
            "4,2,7",
        ])
        .unwrap();
        assert_eq!(args.tour.as_deref(), Some("4,2,7"));
        assert_eq!(args.output_format, OutputFormat::Svg);
        assert_eq!(args.title.as_deref(), Some("Best route"));
        assert!(args.ascii);
    }

    #[test]
    fn negative_first_stop_needs_separator() {
        let args = Args::try_parse_from(["tourviz", "--", "-3,1,2"]).unwrap();
        assert_eq!(args.tour.as_deref(), Some("-3,1,2"));
    }
}
