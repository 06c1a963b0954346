use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::{cli::handlers::commons, core::session::Event, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Forgets the stored session and goes back to the defaults."
)]
struct ResetArgs {
    /// Do not ask for confirmation.
    #[arg(long, short)]
    yes: bool,
}

/// Restores the default session after confirmation.
pub fn handle(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let reset_args = ResetArgs::try_parse_from(&args)?;

    if !reset_args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("reset.prompt.confirm"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", t!("reset.info.cancelled").dimmed());
            return Ok(());
        }
    }

    app.apply(Event::Reset);
    println!("{} {}", t!("reset.info.done").green(), commons::context_line(app)?);
    Ok(())
}
