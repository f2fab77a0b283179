use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wxlog_cli::RecordInputs;
use wxlog_config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "wxlog", version, about = "Weather observation log and trends")]
struct Cli {
    /// Config file (defaults to $WXLOG_CONFIG, then wxlog.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize fetched provider responses and append one record
    Record {
        /// Current-weather response (JSON)
        #[arg(long)]
        weather: PathBuf,
        /// UV-index response (JSON)
        #[arg(long)]
        uv: PathBuf,
        /// Air-pollution response (JSON)
        #[arg(long)]
        air: PathBuf,
    },
    /// Print plot-ready series, night intervals and summary as JSON
    Trends {
        #[arg(long)]
        pretty: bool,
    },
    /// Print the latest conditions
    Summary,
}

fn main() -> Result<()> {
    wxlog_obs::init("wxlog");

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    match cli.command {
        Command::Record { weather, uv, air } => {
            let obs = wxlog_cli::run_record(&cfg, &RecordInputs { weather, uv, air })?;
            tracing::info!(timestamp = %obs.timestamp(), "recorded");
        }
        Command::Trends { pretty } => {
            let dashboard = wxlog_cli::run_trends(&cfg)?;
            println!("{}", wxlog_cli::dashboard_json(&dashboard, pretty)?);
        }
        Command::Summary => match wxlog_cli::run_trends(&cfg)?.summary {
            Some(summary) => println!("{}", summary),
            None => println!("No observations logged yet"),
        },
    }

    Ok(())
}
