use anyhow::Result;
use clap::Parser;

use crate::{cli::handlers::commons, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows the selected task with its commands for the current shell."
)]
struct ShowArgs {
    /// Hide the per-step explanations.
    #[arg(long, short)]
    brief: bool,
}

/// Shows the current task.
pub fn handle(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    commons::print_selection(app, !show_args.brief)
}
