use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::{
    cli::handlers::commons::Palette,
    core::{catalog::Catalog, paths},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Summarizes the loaded catalog, or validates a catalog file."
)]
struct CatalogArgs {
    /// Validate this catalog file instead of describing the loaded one.
    #[arg(long, value_name = "PATH")]
    check: Option<String>,
}

/// Prints a summary of the loaded catalog, or validates the file given with `--check`.
pub fn handle(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let catalog_args = CatalogArgs::try_parse_from(&args)?;
    let palette = Palette::for_session(app.session());

    match catalog_args.check {
        Some(raw_path) => {
            let path: PathBuf = paths::expand_user_path(&raw_path)?;
            let checked = Catalog::load_from_path(&path).map_err(|e| {
                anyhow!(format!(
                    t!("catalog.error.check_failed"),
                    path = path.display(),
                    error = e
                ))
            })?;
            println!(
                "{}",
                format!(t!("catalog.info.check_ok"), path = path.display()).green()
            );
            print_summary(&checked, &palette);
        }
        None => print_summary(app.catalog(), &palette),
    }

    Ok(())
}

fn print_summary(catalog: &Catalog, palette: &Palette) {
    println!(
        "\n{} {}",
        palette.heading(t!("catalog.header.summary")),
        format!(
            "({}, v{}, {})",
            catalog.source(),
            catalog.version(),
            catalog.fingerprint()
        )
        .dimmed()
    );

    for os in catalog.entries() {
        let admin_steps: usize = os
            .categories
            .iter()
            .flat_map(|c| &c.tasks)
            .map(|t| t.steps.iter().filter(|s| s.admin).count())
            .sum();
        println!(
            "  {:<10} {}",
            os.label,
            format!(
                t!("catalog.label.os_counts"),
                categories = os.categories.len(),
                tasks = catalog.task_count(os.id),
                admin = admin_steps
            )
        );
    }

    let missing = catalog.missing_templates();
    if !missing.is_empty() {
        println!(
            "\n{}",
            format!(t!("catalog.warning.missing_templates"), count = missing.len()).yellow()
        );
        for entry in &missing {
            println!("  - {}", entry);
        }
    }
}
