use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pp_reformat::bootstrap::{self, RunPlan};
use pp_reformat::config::AppConfig;
use pp_reformat::hub::HubSource;
use pp_reformat::{logging, pipeline};

#[derive(Parser)]
#[command(
    name = "pp-reformat",
    about = "Reformat chat datasets into chosen/rejected preference pairs"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Optional TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory that receives the Parquet shards.
    #[arg(long = "output-dir", alias = "output_dir", global = true)]
    output_dir: Option<PathBuf>,

    /// Hub id of the source dataset.
    #[arg(long, global = true)]
    data: Option<String>,

    /// Shuffle seed for holdout splits.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of records held out as test for holdout splits.
    #[arg(long = "test-size", global = true)]
    test_size: Option<usize>,

    /// Keep the intermediate JSON files.
    #[arg(long = "keep-json", global = true)]
    keep_json: bool,

    /// Tracing filter directive, e.g. `debug` or `pp_reformat=trace`.
    #[arg(long = "log-level", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate configuration and arguments, print the resolved plan, and exit.
    Validate,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(data) = &self.data {
            config.data = data.clone();
        }
        if let Some(seed) = self.seed {
            config.split.seed = Some(seed);
        }
        if let Some(test_size) = self.test_size {
            config.split.test_size = test_size;
        }
        if self.keep_json {
            config.keep_json = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let plan = match resolve_plan(&cli) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Config invalid: {e:#}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Command::Validate) => print_plan(&plan),
        None => {
            if let Err(e) = run(&plan) {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

fn resolve_plan(cli: &Cli) -> Result<RunPlan, anyhow::Error> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    cli.apply_overrides(&mut config);
    bootstrap::into_plan(config)
}

fn run(plan: &RunPlan) -> Result<(), anyhow::Error> {
    logging::init(&plan.log_level, plan.log_format)?;
    tracing::info!(
        dataset = %plan.dataset,
        output_dir = %plan.layout.dir().display(),
        seed = plan.seed,
        "starting conversion"
    );

    let source = HubSource::new(&plan.hub)?;
    let summary = pipeline::run(plan, &source)?;

    println!(
        "Wrote {} train and {} test pairs to {}",
        summary.train.rows,
        summary.test.rows,
        plan.layout.dir().display()
    );
    Ok(())
}

fn print_plan(plan: &RunPlan) {
    println!("dataset:    {}", plan.dataset);
    println!("output dir: {}", plan.layout.dir().display());
    println!("seed:       {} ({:?})", plan.seed, plan.seed_source);
    println!("test size:  {}", plan.test_size);
    println!("keep json:  {}", plan.keep_json);
    println!("hub:        {}@{}", plan.hub.config_name, plan.hub.revision);
}
