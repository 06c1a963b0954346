use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dialoguer::{Select, theme::ColorfulTheme};

use crate::{
    cli::handlers::commons,
    core::session::Event,
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Picks a task interactively from the current search results."
)]
struct PickArgs {
    /// Search text to apply before listing, replacing the stored one.
    #[arg(num_args = 0..)]
    text: Vec<String>,
}

/// Picks a task interactively from the search results.
pub fn handle(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let pick_args = PickArgs::try_parse_from(&args)?;
    if !pick_args.text.is_empty() {
        app.apply(Event::ChangeSearch(pick_args.text.join(" ")));
    }

    // Collect owned ids first; the hits borrow the catalog and `apply` needs `app` mutably.
    let (items, pairs, current) = {
        let session = app.session();
        let hits = app.results();
        let items: Vec<String> = hits
            .iter()
            .map(|hit| format!("{}  ({})", hit.task.name, hit.category_name))
            .collect();
        let pairs: Vec<(String, String)> = hits
            .iter()
            .map(|hit| (hit.category_id.to_string(), hit.task.id.clone()))
            .collect();
        let current = hits
            .iter()
            .position(|hit| hit.is(&session.category, &session.task))
            .unwrap_or(0);
        (items, pairs, current)
    };

    if items.is_empty() {
        println!("{}", t!("search.info.no_results").yellow());
        return Ok(());
    }

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("pick.prompt"))
        .items(&items)
        .default(current)
        .interact_opt()?;

    let Some((category, task)) = selection.and_then(|idx| pairs.get(idx).cloned()) else {
        println!("{}", t!("pick.info.cancelled").dimmed());
        return Ok(());
    };

    app.apply(Event::SelectSearchResult { category, task });
    commons::print_selection(app, true)
}
