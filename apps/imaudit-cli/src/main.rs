//! imaudit - Evidence synthesis audit report
//!
//! Counts duplicated primary studies across systematic reviews and checks
//! whether pooled estimates survive a sensitivity re-analysis.

mod analysis;
mod report;

use clap::{Parser, ValueEnum};
use imaudit_core::AuditConfig;
use tracing_subscriber::EnvFilter;

use analysis::AuditRequest;

#[derive(Debug, Parser)]
#[command(author, version, about = "Primary study overlap and sensitivity audit")]
struct Cli {
    #[arg(
        long,
        default_value = "extracted_Rerun_Analyses.csv",
        help = "Overlap table (Study ID, Effect Size, Outcome, Review ID)"
    )]
    overlap: String,

    #[arg(
        long,
        default_value = "Heterogeneity_Sensitivity_Report.csv",
        help = "Sensitivity table (Group, Orig_/New_ OR, bounds and I2)"
    )]
    sensitivity: String,

    #[arg(
        long,
        help = "TOML file with the domain table and significance settings"
    )]
    config: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[arg(long, help = "Skip the overlap analysis")]
    skip_overlap: bool,

    #[arg(long, help = "Skip the sensitivity analysis")]
    skip_sensitivity: bool,

    #[arg(long, help = "List every duplicated study in the text report")]
    list_groups: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => AuditConfig::load(path)?,
        None => AuditConfig::default(),
    };

    let request = AuditRequest {
        overlap_path: (!cli.skip_overlap).then(|| cli.overlap.clone()),
        sensitivity_path: (!cli.skip_sensitivity).then(|| cli.sensitivity.clone()),
    };
    let outcome = analysis::run(&request, &config);

    match cli.format {
        OutputFormat::Text => print!("{}", report::render_text(&outcome, cli.list_groups)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&outcome.to_json_report())?
        ),
    }

    if outcome.all_failed() {
        return Err("no analysis completed".into());
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
