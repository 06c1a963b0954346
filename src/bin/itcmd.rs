// src/bin/itcmd.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use itcmd::{
    cli::{Cli, dispatcher},
    core::{catalog, settings, store},
    models::{ColorMode, Settings},
    state::AppState,
};

/// Sets up logging, runs the CLI, and turns any error into a message and exit code 1.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let settings = settings::load_settings().unwrap_or_else(|e| {
        log::warn!("Could not load settings, using defaults: {}", e);
        Settings::default()
    });
    apply_color_mode(settings.color);

    let catalog_path = settings::catalog_path(&settings)?;
    let catalog = catalog::load(catalog_path.as_deref()).map_err(|e| match &catalog_path {
        Some(path) => anyhow!(format!(
            itcmd::t!("main.error.catalog_file"),
            path = path.display(),
            error = e
        )),
        None => anyhow!(format!(itcmd::t!("main.error.catalog_builtin"), error = e)),
    })?;

    let mut app = AppState::open(catalog, store::open_default_store());
    dispatcher::dispatch(cli.args, &mut app)
}

fn apply_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Auto => {}
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
    }
}
