use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use flowcast_core::{Scenario, project};

mod loader;
mod logging;
mod report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "flowcast")]
#[command(about = "Project a household's cash flows, balances and loans year by year")]
struct Args {
    /// Scenario file (.yaml, .yml or .json)
    scenario: PathBuf,

    /// Recorded cash flows to use instead of estimates up to the scenario's cut-off
    #[arg(long)]
    history: Option<PathBuf>,

    /// Only report this calendar year
    #[arg(short, long)]
    year: Option<i16>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    logging::init_logging(&args.log_level, args.log_file.as_deref())?;

    let config = loader::load_scenario(&args.scenario)?;
    let history = match &args.history {
        Some(path) => loader::load_history(path)?,
        None => Vec::new(),
    };

    let scenario = Scenario::link(&config)
        .wrap_err_with(|| format!("failed to link scenario {:?}", config.name))?;
    let calendar = project(&scenario, &scenario.prices, history)
        .wrap_err_with(|| format!("failed to project scenario {:?}", scenario.name))?;

    let report = report::build_report(&scenario.name, &calendar, args.year);
    match args.format {
        OutputFormat::Text => print!("{}", report::render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    tracing::info!(
        scenario = %scenario.name,
        instances = calendar.cash_flows().len(),
        "projection reported"
    );
    Ok(())
}
