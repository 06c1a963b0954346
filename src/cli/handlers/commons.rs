// src/cli/handlers/commons.rs

// Rendering helpers shared by several handlers.

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use colored::{ColoredString, Colorize};

use crate::{
    constants::REDACTION_NOTICE,
    core::resolver,
    models::{OsEntry, SessionState, Theme},
    state::AppState,
    system::appearance,
};

/// An on/off switch argument, as taken by `admin`, `redact` and friends.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    /// Turn it on.
    On,
    /// Turn it off.
    Off,
    /// Flip the current value.
    Toggle,
}

impl Switch {
    /// The new value of a flag currently set to `current`.
    pub fn apply_to(self, current: bool) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Toggle => !current,
        }
    }
}

/// Colors for the active theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    theme: Theme,
}

impl Palette {
    /// The palette for the session's effective theme.
    pub fn for_session(session: &SessionState) -> Self {
        Self {
            theme: appearance::effective_theme(session.theme),
        }
    }

    /// Section and task titles.
    pub fn heading(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Dark => text.bright_yellow().bold(),
            Theme::Light => text.blue().bold(),
        }
    }

    /// Resolved command text.
    pub fn command(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Dark => text.bright_cyan(),
            Theme::Light => text.cyan(),
        }
    }

    /// Admin markers and warnings.
    pub fn warning(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Dark => text.bright_red(),
            Theme::Light => text.red(),
        }
    }

    /// The current-choice marker in lists.
    pub fn marker(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Dark => text.bright_green().bold(),
            Theme::Light => text.green().bold(),
        }
    }
}

/// The display label of the selected shell, or `None` on single-shell systems.
pub fn shell_display<'a>(os: &'a OsEntry, session: &SessionState) -> Option<&'a str> {
    if !os.id.has_shell_choice() {
        return None;
    }
    os.shell(session.shell).map(|s| s.label.as_str())
}

/// One line summarizing where the session stands: OS, shell, category, task and modes.
pub fn context_line(app: &AppState) -> Result<String> {
    let session = app.session();
    let os = current_os(app)?;

    let mut parts = vec![os.label.clone()];
    if let Some(shell) = shell_display(os, session) {
        parts.push(shell.to_string());
    }
    if let Some(category) = app.catalog().find_category(session.os, &session.category) {
        parts.push(category.name.clone());
    }
    if let Some(task) = app.current_task() {
        parts.push(task.name.clone());
    }

    let mut line = parts.join(" / ");
    if session.admin {
        line.push_str(&format!(" [{}]", t!("common.label.admin")));
    }
    if session.redact {
        line.push_str(&format!(" [{}]", t!("common.label.redact")));
    }
    Ok(line)
}

/// The selected OS section, or an error if the catalog lacks it.
pub fn current_os(app: &AppState) -> Result<&OsEntry> {
    app.current_os().ok_or_else(|| {
        anyhow!(format!(
            t!("common.error.missing_os"),
            os = app.session().os
        ))
    })
}

/// Prints the selected task: its steps resolved for the current shell, then what the results mean.
pub fn print_selection(app: &AppState, with_meaning: bool) -> Result<()> {
    let palette = Palette::for_session(app.session());
    let session = app.session();
    let os = current_os(app)?;
    let task = app.current_task().ok_or_else(|| {
        anyhow!(format!(
            t!("common.error.missing_task"),
            category = session.category,
            task = session.task
        ))
    })?;

    println!("\n{}", context_line(app)?.dimmed());
    println!("\n{}", palette.heading(&task.name));
    if !task.description.is_empty() {
        println!("{}", task.description);
    }
    if let Some(hint) = &os.hint {
        println!("{}", hint.dimmed());
    }

    let steps = app.visible_steps();
    let mut placeholders: Vec<String> = Vec::new();

    for resolved in &steps {
        let admin_tag = if resolved.step.admin {
            format!(" {}", palette.warning(&format!("[{}]", t!("common.label.admin"))))
        } else {
            String::new()
        };
        println!("\n  {}. {}{}", resolved.position, resolved.step.label.bold(), admin_tag);

        if resolved.command.is_empty() {
            println!("     {}", t!("show.info.no_command").dimmed());
        } else {
            println!("     {}", palette.command(&resolved.command));
        }
        let run_as = if resolved.step.admin {
            t!("show.label.admin_recommended")
        } else {
            t!("show.label.standard")
        };
        println!("     {}", run_as.dimmed());

        if with_meaning && !resolved.step.meaning.is_empty() {
            println!("     {}", t!("show.label.what_to_look_for"));
            for line in &resolved.step.meaning {
                println!("     - {}", line.dimmed());
            }
        }

        for token in resolver::placeholders(&resolved.command) {
            if !placeholders.contains(&token) {
                placeholders.push(token);
            }
        }
    }

    if steps.is_empty() {
        println!("\n  {}", t!("show.info.no_visible_steps").yellow());
    }

    let hidden = task.steps.len().saturating_sub(steps.len());
    if hidden > 0 {
        println!(
            "\n  {}",
            format!(t!("show.info.hidden_admin_steps"), count = hidden).dimmed()
        );
    }

    if !placeholders.is_empty() {
        println!(
            "\n{} {}",
            t!("show.label.placeholders").yellow(),
            placeholders.join(", ")
        );
    }

    if !task.result_meaning.is_empty() {
        println!("\n{}", palette.heading(t!("show.label.result_meaning")));
        for line in &task.result_meaning {
            println!("  - {}", line);
        }
    }

    if session.redact {
        println!("\n{}", REDACTION_NOTICE.yellow());
    }

    Ok(())
}
