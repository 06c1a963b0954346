use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::commons::{self, Palette},
    core::paths,
    state::AppState,
    system::appearance,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Displays the session, the loaded catalog and where files are kept."
)]
struct StatusArgs {}

/// Prints the session, settings and file locations.
pub fn handle(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let _status_args = StatusArgs::try_parse_from(&args)?;
    let palette = Palette::for_session(app.session());
    let session = app.session();
    let os = commons::current_os(app)?;

    println!("\n--- {} ---", palette.heading(t!("status.header.session")));
    println!("  {:<12} {}", t!("status.label.os").blue(), os.label);
    if let Some(shell) = commons::shell_display(os, session) {
        println!("  {:<12} {}", t!("status.label.shell").blue(), shell);
    }
    println!("  {:<12} {}", t!("status.label.category").blue(), session.category);
    println!("  {:<12} {}", t!("status.label.task").blue(), session.task);
    if session.is_searching() {
        println!("  {:<12} {}", t!("status.label.search").blue(), session.search);
    }
    println!("  {:<12} {}", t!("status.label.admin").blue(), on_off(session.admin));
    println!("  {:<12} {}", t!("status.label.redact").blue(), on_off(session.redact));

    let effective = appearance::effective_theme(session.theme);
    let theme = match session.theme {
        Some(_) => effective.as_str().to_string(),
        None => format!("{} ({})", effective.as_str(), t!("status.info.theme_detected")),
    };
    println!("  {:<12} {}", t!("status.label.theme").blue(), theme);

    let catalog = app.catalog();
    println!("\n--- {} ---", palette.heading(t!("status.header.catalog")));
    println!("  {:<12} {}", t!("status.label.source").blue(), catalog.source());
    println!("  {:<12} {}", t!("status.label.version").blue(), catalog.version());
    println!("  {:<12} {}", t!("status.label.fingerprint").blue(), catalog.fingerprint());

    println!("\n--- {} ---", palette.heading(t!("status.header.files")));
    print_path(t!("status.label.settings"), paths::get_settings_path());
    print_path(t!("status.label.session_file"), paths::get_session_path());

    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value { t!("status.value.on") } else { t!("status.value.off") }
}

fn print_path(label: &str, path: Result<std::path::PathBuf, paths::PathError>) {
    match path {
        Ok(p) => println!("  {:<12} {}", label.blue(), p.display()),
        Err(e) => println!("  {:<12} {}", label.blue(), e.to_string().red()),
    }
}
