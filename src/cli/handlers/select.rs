//! # Handlers for `os`, `shell`, `category` and `task`
//!
//! Each one turns its argument into a session [`Event`] and prints where the
//! selection landed. Without an argument they list the available choices and
//! mark the current one.

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::commons::{self, Palette},
    core::session::Event,
    models::{OsId, ShellId},
    state::AppState,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Selects the operating system.")]
struct OsArgs {
    /// `windows` or `linux`. Omit to list them.
    os: Option<OsId>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Selects the shell (Windows only).")]
struct ShellArgs {
    /// `powershell` or `cmd`. Omit to list the shells of the current OS.
    shell: Option<ShellId>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Selects a category and its first task.")]
struct CategoryArgs {
    /// Category id, e.g. `network`. Omit to list categories.
    category: Option<String>,
}

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Selects a task, either in the current category or as `category:task`."
)]
struct TaskArgs {
    /// Task id (e.g. `open_ports`) or `category:task`. Omit to list tasks.
    task: Option<String>,
}

/// Selects an OS, or lists them.
pub fn handle_os(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let os_args = OsArgs::try_parse_from(&args)?;

    let Some(os) = os_args.os else {
        let palette = Palette::for_session(app.session());
        println!("\n{}", palette.heading(t!("select.header.os")));
        for entry in app.catalog().entries() {
            print_choice(&palette, entry.id == app.session().os, entry.id.as_str(), &entry.label);
        }
        return Ok(());
    };

    if app.catalog().os(os).is_none() {
        return Err(anyhow!(format!(t!("common.error.missing_os"), os = os)));
    }

    app.apply(Event::ChangeOs(os));
    print_landed(app)
}

/// Selects a shell of the current OS, or lists them.
pub fn handle_shell(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let shell_args = ShellArgs::try_parse_from(&args)?;
    let os = commons::current_os(app)?;

    if !os.id.has_shell_choice() {
        return Err(anyhow!(format!(t!("select.error.no_shell_choice"), os = os.label)));
    }

    let Some(shell) = shell_args.shell else {
        let palette = Palette::for_session(app.session());
        println!("\n{}", palette.heading(t!("select.header.shell")));
        for entry in &os.shells {
            print_choice(&palette, entry.id == app.session().shell, entry.id.as_str(), &entry.label);
        }
        return Ok(());
    };

    if os.shell(shell).is_none() {
        return Err(anyhow!(format!(
            t!("select.error.unknown_shell"),
            shell = shell,
            os = os.label
        )));
    }

    app.apply(Event::ChangeShell(shell));
    print_landed(app)
}

/// Selects a category, or lists those of the current OS.
pub fn handle_category(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let category_args = CategoryArgs::try_parse_from(&args)?;
    let os = app.session().os;

    let Some(category) = category_args.category else {
        let palette = Palette::for_session(app.session());
        println!("\n{}", palette.heading(t!("select.header.category")));
        for entry in app.catalog().categories_of(os) {
            print_choice(&palette, entry.id == app.session().category, &entry.id, &entry.name);
        }
        return Ok(());
    };

    if app.catalog().find_category(os, &category).is_none() {
        return Err(anyhow!(format!(
            t!("select.error.unknown_category"),
            category = category,
            available = category_ids(app)
        )));
    }

    app.apply(Event::ChangeCategory(category));
    print_landed(app)
}

/// Selects a task, or lists those of the current category.
pub fn handle_task(args: Vec<String>, app: &mut AppState) -> Result<()> {
    let task_args = TaskArgs::try_parse_from(&args)?;
    let os = app.session().os;

    let Some(raw) = task_args.task else {
        let palette = Palette::for_session(app.session());
        let session = app.session();
        println!("\n{}", palette.heading(t!("select.header.task")));
        for task in app.catalog().tasks_of(os, &session.category) {
            print_choice(&palette, task.id == session.task, &task.id, &task.name);
        }
        return Ok(());
    };

    let event = match raw.split_once(':') {
        Some((category, task)) => {
            if app.catalog().find_task(os, category, task).is_none() {
                return Err(anyhow!(format!(
                    t!("select.error.unknown_task"),
                    task = raw,
                    category = category
                )));
            }
            Event::SelectSearchResult {
                category: category.to_string(),
                task: task.to_string(),
            }
        }
        None => {
            let category = app.session().category.clone();
            if app.catalog().find_task(os, &category, &raw).is_none() {
                return Err(anyhow!(format!(
                    t!("select.error.unknown_task"),
                    task = raw,
                    category = category
                )));
            }
            Event::SelectTask(raw)
        }
    };

    app.apply(event);
    print_landed(app)
}

fn print_choice(palette: &Palette, current: bool, id: &str, label: &str) {
    let marker = if current {
        palette.marker("*").to_string()
    } else {
        " ".to_string()
    };
    println!("  {} {:<14} {}", marker, id, label.dimmed());
}

fn print_landed(app: &AppState) -> Result<()> {
    println!("{} {}", t!("select.info.now_on").green(), commons::context_line(app)?);
    Ok(())
}

fn category_ids(app: &AppState) -> String {
    app.catalog()
        .categories_of(app.session().os)
        .iter()
        .map(|c| c.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
