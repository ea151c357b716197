//! rowledger - Entry Point

use clap::Parser;
use rowledger::model::AppError;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// rowledger - map table rows to offsets on a scanned page
#[derive(Parser, Debug)]
#[command(name = "rowledger")]
#[command(version)]
#[command(about = "Row-height ledger driven by focus and correction commands")]
pub struct Args {
    /// Path to a command script (reads from stdin if not provided)
    pub script: Option<PathBuf>,

    /// Manifest preset to start with
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// Initial per-row height in page pixels
    #[arg(long)]
    pub default_height: Option<f64>,

    /// Offset of the top of row 0 in page pixels
    #[arg(long)]
    pub margin_top: Option<f64>,

    /// Print known manifest presets and exit
    #[arg(long)]
    pub list_manifests: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    run(args)?;
    Ok(())
}

fn run(args: Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = rowledger::config::load_config_with_precedence(args.config.clone())?;
        let merged = rowledger::config::merge_config(config_file)?;
        let with_env = rowledger::config::apply_env_overrides(merged)?;

        rowledger::config::apply_cli_overrides(
            with_env,
            rowledger::config::CliOverrides {
                manifest: args.manifest.clone(),
                default_height: args.default_height,
                margin_top: args.margin_top,
            },
        )?
    };

    if args.list_manifests {
        let mut stdout = std::io::stdout().lock();
        for (name, preset) in &config.manifests {
            writeln!(
                stdout,
                "{name}\t{}\t{}",
                preset.label,
                preset.url.as_deref().unwrap_or("-")
            )
            .map_err(AppError::Output)?;
        }
        return Ok(());
    }

    rowledger::logging::init(&config.log_file_path, &config.log_level)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let source = rowledger::source::detect_script_source(args.script.clone())?;
    info!(source = %source.describe(), "Reading commands");

    let mut session = rowledger::script::Session::new(config);
    let mut stdout = std::io::stdout().lock();
    let summary = rowledger::script::run(&mut session, source.into_reader(), &mut stdout)?;

    info!(
        commands = summary.commands,
        errors = summary.errors,
        ranges = session.ledger().ranges().len(),
        "Run complete"
    );

    Ok(())
}
