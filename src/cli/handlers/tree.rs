use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::commons::{self, Palette},
    models::{OsEntry, OsId, SessionState},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Displays the catalog as a tree of categories and tasks."
)]
struct TreeArgs {
    /// The OS to display. Defaults to the selected one.
    os: Option<OsId>,

    /// Show every OS instead of the selected one.
    #[arg(long, short, conflicts_with = "os")]
    all: bool,

    /// Show how many steps each task has and how many need admin rights.
    #[arg(long, short)]
    steps: bool,
}

/// Prints the catalog as a tree.
pub fn handle(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let tree_args = TreeArgs::try_parse_from(&args)?;
    let session = app.session();
    let palette = Palette::for_session(session);

    if tree_args.all {
        for os in app.catalog().entries() {
            print_os_tree(os, session, &palette, tree_args.steps);
        }
    } else {
        let os = match tree_args.os {
            Some(id) => app
                .catalog()
                .os(id)
                .ok_or_else(|| anyhow!(format!(t!("common.error.missing_os"), os = id)))?,
            None => commons::current_os(app)?,
        };
        print_os_tree(os, session, &palette, tree_args.steps);
    }

    Ok(())
}

fn print_os_tree(os: &OsEntry, session: &SessionState, palette: &Palette, show_steps: bool) {
    println!("\n{} {}", palette.heading(&os.label), format!("({})", os.id).dimmed());

    let category_count = os.categories.len();
    for (i, category) in os.categories.iter().enumerate() {
        let is_last_category = i + 1 == category_count;
        let connector = if is_last_category { "└─" } else { "├─" };
        println!("{}{} {}", connector, category.name, format!("[{}]", category.id).dimmed());

        let child_prefix = if is_last_category { "   " } else { "│  " };
        let task_count = category.tasks.len();
        for (j, task) in category.tasks.iter().enumerate() {
            let task_connector = if j + 1 == task_count { "└─" } else { "├─" };
            let selected = session.os == os.id
                && session.category == category.id
                && session.task == task.id;
            let marker = if selected {
                format!(" {}", palette.marker("(*)"))
            } else {
                String::new()
            };
            let counts = if show_steps {
                let admin_steps = task.steps.iter().filter(|s| s.admin).count();
                format!(
                    " {}",
                    format!(
                        t!("tree.label.step_counts"),
                        steps = task.steps.len(),
                        admin = admin_steps
                    )
                    .dimmed()
                )
            } else {
                String::new()
            };

            println!(
                "{}{} {} {}{}{}",
                child_prefix,
                task_connector,
                task.name,
                format!("[{}]", task.id).dimmed(),
                counts,
                marker
            );
        }
    }
}
