//! # Session transitions and reconciliation
//!
//! User actions are modeled as [`Event`]s applied by the pure function
//! [`transition`]. After every transition the state goes through
//! [`reconcile`], which restores the selection invariants:
//!
//! - `category` names a category under `os`;
//! - `task` names a task under `category`;
//! - on an OS with a shell choice, `shell` is one the OS offers.
//!
//! Stale ids are never an error; they are replaced by the first entry in
//! declaration order.

use crate::{
    core::{catalog::Catalog, search},
    models::{OsId, SessionState, ShellId, StoredSession, Theme},
};
use log::debug;

/// A user-driven change to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Switch OS. Clears the search and selects the OS's first category and task.
    ChangeOs(OsId),
    /// Switch shell. Nothing else changes.
    ChangeShell(ShellId),
    /// Switch category and select its first task.
    ChangeCategory(String),
    /// Select a task of the current category.
    SelectTask(String),
    /// Select a search result. Results span categories, so both ids travel together.
    SelectSearchResult { category: String, task: String },
    /// Replace the search text.
    ChangeSearch(String),
    SetAdmin(bool),
    SetRedact(bool),
    SetTheme(Theme),
    /// Go back to the default session.
    Reset,
}

/// Applies `event` to `state`. The result still needs [`reconcile`].
pub fn transition(state: &SessionState, event: Event, catalog: &Catalog) -> SessionState {
    let mut next = state.clone();

    match event {
        Event::ChangeOs(os) => {
            next.os = os;
            next.search.clear();
            let (category, task) = first_pair(catalog, os);
            next.category = category;
            next.task = task;
        }
        Event::ChangeShell(shell) => {
            next.shell = shell;
        }
        Event::ChangeCategory(category) => {
            next.task = first_task(catalog, next.os, &category);
            next.category = category;
        }
        Event::SelectTask(task) => {
            next.task = task;
        }
        Event::SelectSearchResult { category, task } => {
            next.category = category;
            next.task = task;
        }
        Event::ChangeSearch(text) => {
            next.search = text;
            let hits = search::search(catalog, next.os, &next.search);
            let selection_listed = hits.iter().any(|hit| hit.is(&next.category, &next.task));
            match hits.first() {
                Some(first) if !selection_listed => {
                    next.category = first.category_id.to_string();
                    next.task = first.task.id.clone();
                }
                Some(_) => {}
                None => debug!(
                    "Search '{}' matched nothing; keeping {}/{}",
                    next.search, next.category, next.task
                ),
            }
        }
        Event::SetAdmin(admin) => next.admin = admin,
        Event::SetRedact(redact) => next.redact = redact,
        Event::SetTheme(theme) => next.theme = Some(theme),
        Event::Reset => next = SessionState::default(),
    }

    next
}

/// Repairs any selection that does not exist in `catalog`.
///
/// Idempotent: reconciling an already reconciled state returns it unchanged.
pub fn reconcile(state: &SessionState, catalog: &Catalog) -> SessionState {
    let mut fixed = state.clone();

    if let Some(entry) = catalog.os(fixed.os) {
        if fixed.os.has_shell_choice() && entry.shell(fixed.shell).is_none() {
            if let Some(first) = entry.shells.first() {
                debug!(
                    "Shell '{}' is not offered on {}; using '{}'",
                    fixed.shell, fixed.os, first.id
                );
                fixed.shell = first.id;
            }
        }
    }

    if catalog.find_category(fixed.os, &fixed.category).is_none() {
        if let Some(first) = catalog.categories_of(fixed.os).first() {
            debug!(
                "Category '{}' not found under {}; using '{}'",
                fixed.category, fixed.os, first.id
            );
            fixed.category = first.id.clone();
        }
    }

    if catalog
        .find_task(fixed.os, &fixed.category, &fixed.task)
        .is_none()
    {
        if let Some(first) = catalog.tasks_of(fixed.os, &fixed.category).first() {
            debug!(
                "Task '{}' not found under {}/{}; using '{}'",
                fixed.task, fixed.os, fixed.category, first.id
            );
            fixed.task = first.id.clone();
        }
    }

    fixed
}

/// Builds a session from a persisted record, taking defaults for missing or unreadable fields.
pub fn from_stored(stored: &StoredSession) -> SessionState {
    let defaults = SessionState::default();

    SessionState {
        os: parse_or(stored.os.as_deref(), defaults.os),
        shell: parse_or(stored.shell.as_deref(), defaults.shell),
        category: stored.category.clone().unwrap_or(defaults.category),
        task: stored.task.clone().unwrap_or(defaults.task),
        search: stored.search.clone().unwrap_or(defaults.search),
        admin: stored.admin.unwrap_or(defaults.admin),
        redact: stored.redact.unwrap_or(defaults.redact),
        theme: stored
            .theme
            .as_deref()
            .and_then(|raw| raw.parse::<Theme>().ok()),
    }
}

/// The persisted shape of a session.
pub fn to_stored(state: &SessionState) -> StoredSession {
    StoredSession {
        os: Some(state.os.as_str().to_string()),
        shell: Some(state.shell.as_str().to_string()),
        category: Some(state.category.clone()),
        task: Some(state.task.clone()),
        search: Some(state.search.clone()),
        admin: Some(state.admin),
        redact: Some(state.redact),
        theme: state.theme.map(|t| t.as_str().to_string()),
    }
}

fn parse_or<T: std::str::FromStr + Copy>(raw: Option<&str>, default: T) -> T {
    match raw.map(str::parse::<T>) {
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            debug!("Ignoring unreadable stored value {:?}", raw);
            default
        }
        None => default,
    }
}

fn first_pair(catalog: &Catalog, os: OsId) -> (String, String) {
    let category = catalog
        .categories_of(os)
        .first()
        .map(|c| c.id.clone())
        .unwrap_or_default();
    let task = first_task(catalog, os, &category);
    (category, task)
}

fn first_task(catalog: &Catalog, os: OsId, category: &str) -> String {
    catalog
        .tasks_of(os, category)
        .first()
        .map(|t| t.id.clone())
        .unwrap_or_default()
}
