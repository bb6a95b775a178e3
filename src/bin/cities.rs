use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tourviz::dataset::{self, DatasetSpec};

#[derive(Parser, Debug)]
#[command(
    name = "tourviz-cities",
    version,
    about = "Write a synthetic city dataset, one `<id> <x> <y>` line per city"
)]
struct Args {
    /// Output file
    #[arg(short = 'o', long = "output", default_value = dataset::DEFAULT_FILE_NAME)]
    output: PathBuf,

    /// Number of cities
    #[arg(short = 'n', long = "count", default_value_t = dataset::DEFAULT_NUM_CITIES)]
    count: usize,

    /// Seed for a reproducible dataset
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Log progress (info level)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tourviz::cli::init_tracing(args.verbose, false);

    let spec = DatasetSpec {
        num_cities: args.count,
        seed: args.seed,
        ..Default::default()
    };
    match dataset::write_dataset(&args.output, &spec) {
        Ok(count) => {
            println!(
                "Successfully created large city data file: {} with {} cities.",
                args.output.display(),
                count
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error generating large city data file: {err}");
            ExitCode::FAILURE
        }
    }
}
