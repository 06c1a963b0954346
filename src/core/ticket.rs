//! # Ticket note composer
//!
//! Builds the text block a technician pastes into a ticketing system:
//!
//! ```text
//! Task: DNS check
//! OS: Windows
//! Shell: PowerShell
//!
//! Run order and outputs:
//! 1. Check IP and DNS
//! Get-NetIPConfiguration | Format-List
//!
//! Notes:
//! - Resolution succeeds: DNS is working for that domain.
//!
//! Redact before sharing: ...
//! ```
//!
//! The layout is line-exact and never localized.

use crate::{
    constants::{IMPLICIT_SHELL_LABEL, REDACTION_NOTICE},
    core::resolver,
    models::{OsEntry, ShellId, Task},
};

/// The `Shell:` label for a ticket: the shell's short label, its display
/// label, or the implicit-shell label on single-shell systems.
pub fn shell_label(os: &OsEntry, shell: ShellId) -> &str {
    if !os.id.has_shell_choice() {
        return IMPLICIT_SHELL_LABEL;
    }
    os.shell(shell)
        .map(|entry| entry.short_label.as_deref().unwrap_or(&entry.label))
        .unwrap_or(IMPLICIT_SHELL_LABEL)
}

/// Composes the shareable ticket note for `task`.
pub fn compose_ticket(
    task: &Task,
    os: &OsEntry,
    shell: ShellId,
    admin_mode: bool,
    redact_mode: bool,
) -> String {
    let mut lines: Vec<String> = vec![
        format!("Task: {}", task.name),
        format!("OS: {}", os.label),
        format!("Shell: {}", shell_label(os, shell)),
        String::new(),
        "Run order and outputs:".to_string(),
    ];

    for resolved in resolver::visible_steps(task, os.id, shell, admin_mode) {
        lines.push(format!("{}. {}", resolved.position, resolved.step.label));
        lines.push(resolved.command);
        lines.push(String::new());
    }

    lines.push("Notes:".to_string());
    lines.extend(task.result_meaning.iter().map(|m| format!("- {}", m)));

    if redact_mode {
        lines.push(String::new());
        lines.push(REDACTION_NOTICE.to_string());
    }

    lines.join("\n")
}
