//! # Handlers for `ticket` and `commands`
//!
//! Both print plain text without colors so the output can be piped into a
//! clipboard tool or a file as-is.

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::state::AppState;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints a ticket note for the selected task, ready to paste."
)]
struct TicketArgs {}

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints every visible command of the selected task, separated by blank lines."
)]
struct CommandsArgs {}

/// Prints the ticket note for the current task.
pub fn handle_ticket(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let _ticket_args = TicketArgs::try_parse_from(&args)?;
    let note = app.ticket().ok_or_else(|| no_task_error(app))?;
    println!("{}", note);
    Ok(())
}

/// Prints the visible commands of the current task, one per line.
pub fn handle_commands(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let _commands_args = CommandsArgs::try_parse_from(&args)?;
    let text = app.copy_all().ok_or_else(|| no_task_error(app))?;
    if text.is_empty() {
        log::info!("No visible commands for '{}'", app.session().task);
        return Ok(());
    }
    println!("{}", text);
    Ok(())
}

fn no_task_error(app: &AppState) -> anyhow::Error {
    anyhow!(format!(
        t!("common.error.missing_task"),
        category = app.session().category,
        task = app.session().task
    ))
}
