use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::commons::{self, Palette},
    core::session::Event,
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Filters tasks by name, description or category. Matching is case-insensitive."
)]
struct SearchArgs {
    /// The text to look for. Several words are searched as one phrase.
    #[arg(num_args = 0..)]
    text: Vec<String>,

    /// Clear the search and list every task again.
    #[arg(long, short, conflicts_with = "text")]
    clear: bool,
}

/// Sets the search text and lists the matching tasks.
pub fn handle(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let search_args = SearchArgs::try_parse_from(&args)?;

    if search_args.clear {
        app.apply(Event::ChangeSearch(String::new()));
    } else if !search_args.text.is_empty() {
        app.apply(Event::ChangeSearch(search_args.text.join(" ")));
    }

    print_results(app)
}

/// Lists the tasks matching the stored search text and marks the selected one.
fn print_results(app: &AppState) -> Result<()> {
    let palette = Palette::for_session(app.session());
    let session = app.session();
    let hits = app.results();

    let header = if session.is_searching() {
        format!(t!("search.header.results"), text = session.search.trim())
    } else {
        t!("search.header.all_tasks").to_string()
    };
    println!("\n{}", palette.heading(&header));

    if hits.is_empty() {
        println!("  {}", t!("search.info.no_results").yellow());
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        let selected = hit.is(&session.category, &session.task);
        let marker = if selected {
            palette.marker("*").to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {} {:>2}. {:<40} {}",
            marker,
            i + 1,
            hit.task.name,
            format!("{}:{}", hit.category_id, hit.task.id).dimmed()
        );
    }

    println!("\n{}", commons::context_line(app)?.dimmed());
    Ok(())
}
