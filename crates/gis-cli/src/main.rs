#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("gis error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    let project_root = match &cli.command {
        cli::Commands::Init(_) => explicit_or_current_dir(flags.project.as_deref())?,
        _ => resolve_project_root(flags.project.as_deref())?,
    };
    let config = bootstrap::load_config(&project_root)?;

    if let cli::Commands::Init(args) = &cli.command {
        return commands::init::handle(args, &project_root, &config, &flags).await;
    }

    let ctx = context::AppContext::init(project_root, config, &flags)
        .await
        .context("failed to initialize gis application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GIS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn explicit_or_current_dir(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    match project_override {
        Some(path) => Ok(strip_project_dir(PathBuf::from(path))),
        None => std::env::current_dir().context("failed to read current directory"),
    }
}

fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = strip_project_dir(PathBuf::from(path));
        if explicit.join(gis_config::PROJECT_DIR).is_dir() {
            return Ok(explicit);
        }
        anyhow::bail!(
            "invalid --project '{}': no {} directory (run 'gis init' there first)",
            explicit.display(),
            gis_config::PROJECT_DIR
        );
    }

    let start = std::env::current_dir().context("failed to read current directory")?;
    context::find_project_root(&start)
        .context("not a gis project (no .gis directory found). Run 'gis init' first.")
}

/// Accept both the project root and its `.gis` directory.
fn strip_project_dir(path: PathBuf) -> PathBuf {
    let is_state_dir = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == gis_config::PROJECT_DIR);
    if is_state_dir {
        path.parent().map_or(path.clone(), std::path::Path::to_path_buf)
    } else {
        path
    }
}
