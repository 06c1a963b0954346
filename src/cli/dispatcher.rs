use anyhow::{Result, anyhow};

use crate::{cli::handlers, state::AppState};

/// Defines a command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut AppState) -> Result<()>,
}

/// Every command the CLI understands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "show",
        aliases: &[],
        handler: handlers::show::handle,
    },
    CommandDefinition {
        name: "tree",
        aliases: &["ls"],
        handler: handlers::tree::handle,
    },
    CommandDefinition {
        name: "os",
        aliases: &[],
        handler: handlers::select::handle_os,
    },
    CommandDefinition {
        name: "shell",
        aliases: &[],
        handler: handlers::select::handle_shell,
    },
    CommandDefinition {
        name: "category",
        aliases: &["cat"],
        handler: handlers::select::handle_category,
    },
    CommandDefinition {
        name: "task",
        aliases: &[],
        handler: handlers::select::handle_task,
    },
    CommandDefinition {
        name: "search",
        aliases: &["find"],
        handler: handlers::search::handle,
    },
    CommandDefinition {
        name: "pick",
        aliases: &[],
        handler: handlers::pick::handle,
    },
    CommandDefinition {
        name: "admin",
        aliases: &[],
        handler: handlers::toggles::handle_admin,
    },
    CommandDefinition {
        name: "redact",
        aliases: &[],
        handler: handlers::toggles::handle_redact,
    },
    CommandDefinition {
        name: "theme",
        aliases: &[],
        handler: handlers::toggles::handle_theme,
    },
    CommandDefinition {
        name: "ticket",
        aliases: &["note"],
        handler: handlers::ticket::handle_ticket,
    },
    CommandDefinition {
        name: "commands",
        aliases: &["copy"],
        handler: handlers::ticket::handle_commands,
    },
    CommandDefinition {
        name: "status",
        aliases: &[],
        handler: handlers::status::handle,
    },
    CommandDefinition {
        name: "reset",
        aliases: &[],
        handler: handlers::reset::handle,
    },
    CommandDefinition {
        name: "catalog",
        aliases: &[],
        handler: handlers::catalog::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `itcmd <command> [args...]` to its handler. No command means `show`.
pub fn dispatch(all_args: Vec<String>, app: &mut AppState) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(name) = args.next() else {
        return handlers::show::handle(Vec::new(), app);
    };

    let command = find_command(&name)
        .ok_or_else(|| anyhow!(format!(t!("dispatch.error.unknown_command"), name = name)))?;
    (command.handler)(args.collect(), app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{catalog::Catalog, store::MemorySessionStore},
        models::{OsId, ShellId},
    };
    use std::collections::HashSet;

    fn app() -> AppState {
        AppState::open(
            Catalog::builtin().unwrap(),
            Box::new(MemorySessionStore::new()),
        )
    }

    fn run(app: &mut AppState, args: &[&str]) -> Result<()> {
        dispatch(args.iter().map(|a| a.to_string()).collect(), app)
    }

    #[test]
    fn test_find_command_by_name_and_alias() {
        assert_eq!(find_command("tree").map(|c| c.name), Some("tree"));
        assert_eq!(find_command("ls").map(|c| c.name), Some("tree"));
        assert_eq!(find_command("cat").map(|c| c.name), Some("category"));
        assert_eq!(find_command("copy").map(|c| c.name), Some("commands"));
        assert!(find_command("frobnicate").is_none());
    }

    #[test]
    fn test_names_and_aliases_are_unique() {
        let mut seen = HashSet::new();
        for cmd in COMMAND_REGISTRY {
            assert!(seen.insert(cmd.name), "duplicate name {}", cmd.name);
            for alias in cmd.aliases {
                assert!(seen.insert(*alias), "duplicate alias {}", alias);
            }
        }
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let mut app = app();
        assert!(run(&mut app, &["frobnicate"]).is_err());
    }

    #[test]
    fn test_no_arguments_shows_selection() {
        let mut app = app();
        run(&mut app, &[]).unwrap();
    }

    #[test]
    fn test_selection_commands_drive_the_session() {
        let mut app = app();

        run(&mut app, &["shell", "cmd"]).unwrap();
        assert_eq!(app.session().shell, ShellId::Cmd);

        run(&mut app, &["task", "disk:check_disk"]).unwrap();
        assert_eq!(app.session().category, "disk");
        assert_eq!(app.session().task, "check_disk");

        run(&mut app, &["os", "linux"]).unwrap();
        assert_eq!(app.session().os, OsId::Linux);
        assert_eq!(app.session().task, "dns_check");

        run(&mut app, &["cat", "services"]).unwrap();
        assert_eq!(app.session().task, "service_status");
    }

    #[test]
    fn test_invalid_selections_are_rejected_without_changes() {
        let mut app = app();
        let before = app.session().clone();

        assert!(run(&mut app, &["category", "printers"]).is_err());
        assert!(run(&mut app, &["task", "disk_space"]).is_err());
        assert!(run(&mut app, &["os", "macos"]).is_err());
        assert_eq!(app.session(), &before);

        run(&mut app, &["os", "linux"]).unwrap();
        assert!(run(&mut app, &["shell", "powershell"]).is_err());
    }

    #[test]
    fn test_toggles_and_search() {
        let mut app = app();

        run(&mut app, &["admin"]).unwrap();
        assert!(app.session().admin);
        run(&mut app, &["admin", "off"]).unwrap();
        assert!(!app.session().admin);
        run(&mut app, &["redact", "off"]).unwrap();
        assert!(!app.session().redact);
        run(&mut app, &["theme", "dark"]).unwrap();
        assert_eq!(app.session().theme, Some(crate::models::Theme::Dark));

        run(&mut app, &["search", "disk", "space"]).unwrap();
        assert_eq!(app.session().search, "disk space");
        assert_eq!(app.session().task, "disk_space");
        run(&mut app, &["search", "--clear"]).unwrap();
        assert_eq!(app.session().search, "");

        run(&mut app, &["reset", "--yes"]).unwrap();
        assert_eq!(app.session(), &crate::models::SessionState::default());
    }

    #[test]
    fn test_output_commands_succeed() {
        let mut app = app();
        for cmd in ["ticket", "commands", "status", "catalog", "tree", "show"] {
            run(&mut app, &[cmd]).unwrap();
        }
        run(&mut app, &["tree", "--all", "--steps"]).unwrap();
        assert!(run(&mut app, &["catalog", "--check", "/nonexistent/catalog.toml"]).is_err());
    }

    #[test]
    fn test_catalog_check_error_names_path_and_cause_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "version = ").unwrap();

        let mut app = app();
        let err = run(&mut app, &["catalog", "--check", path.to_str().unwrap()]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("broken.toml"));
        assert_eq!(message.matches("Malformed catalog").count(), 1);
    }
}
