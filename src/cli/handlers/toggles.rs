//! # Handlers for `admin`, `redact` and `theme`
//!
//! Mode switches. None of them moves the selection.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;

use crate::{
    cli::handlers::commons::Switch,
    core::session::Event,
    models::Theme,
    state::AppState,
    system::appearance,
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Shows or hides steps that need administrator/root rights."
)]
struct AdminArgs {
    /// Defaults to `toggle`.
    #[arg(value_enum, default_value_t = Switch::Toggle)]
    switch: Switch,
}

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Adds or removes the redaction reminder at the end of ticket notes."
)]
struct RedactArgs {
    /// Defaults to `toggle`.
    #[arg(value_enum, default_value_t = Switch::Toggle)]
    switch: Switch,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Switches between the light and dark palette.")]
struct ThemeArgs {
    /// Defaults to `toggle`.
    #[arg(value_enum, default_value_t = ThemeChoice::Toggle)]
    choice: ThemeChoice,
}

/// Turns admin mode on, off, or flips it.
pub fn handle_admin(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let admin_args = AdminArgs::try_parse_from(&args)?;
    let admin = admin_args.switch.apply_to(app.session().admin);
    app.apply(Event::SetAdmin(admin));

    let status = if admin {
        t!("toggles.info.admin_on")
    } else {
        t!("toggles.info.admin_off")
    };
    println!("{}", status.green());
    Ok(())
}

/// Turns redaction mode on, off, or flips it.
pub fn handle_redact(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let redact_args = RedactArgs::try_parse_from(&args)?;
    let redact = redact_args.switch.apply_to(app.session().redact);
    app.apply(Event::SetRedact(redact));

    let status = if redact {
        t!("toggles.info.redact_on")
    } else {
        t!("toggles.info.redact_off")
    };
    println!("{}", status.green());
    Ok(())
}

/// Sets or flips the color theme.
pub fn handle_theme(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let theme_args = ThemeArgs::try_parse_from(&args)?;
    let theme = match theme_args.choice {
        ThemeChoice::Light => Theme::Light,
        ThemeChoice::Dark => Theme::Dark,
        // Toggling from "no preference" flips whatever the terminal currently looks like.
        ThemeChoice::Toggle => appearance::effective_theme(app.session().theme).flipped(),
    };
    app.apply(Event::SetTheme(theme));

    println!(
        "{}",
        format!(t!("toggles.info.theme"), theme = theme.as_str()).green()
    );
    Ok(())
}
