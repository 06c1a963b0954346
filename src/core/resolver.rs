//! # Command Resolver
//!
//! Maps a step and the current OS/shell selection to a concrete command
//! string. Resolution never fails: a step without a template for the
//! selected shell resolves to an empty string.
//!
//! Admin gating is a visibility rule, not a resolution rule. Every consumer
//! (step list, command list, ticket note, "copy all") goes through
//! [`visible_steps`], which filters first and resolves second, keeping the
//! declared step order.

use crate::models::{OsEntry, OsId, ShellId, Step, Task, TemplateKey};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"<([A-Za-z][A-Za-z0-9_]*)>").expect("placeholder pattern is valid");
}

/// A visible step together with its resolved command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStep<'a> {
    /// 1-based position of the step in the task's declared order.
    pub position: usize,
    /// The catalog step.
    pub step: &'a Step,
    /// The resolved command. Empty when the step has no template for the shell.
    pub command: String,
}

/// Selects which template of a step applies to an OS/shell pair.
///
/// On Linux the shell selection is ignored.
pub fn template_key(os: OsId, shell: ShellId) -> TemplateKey {
    match os {
        OsId::Linux => TemplateKey::Linux,
        OsId::Windows => match shell {
            ShellId::PowerShell => TemplateKey::PowerShell,
            ShellId::Cmd => TemplateKey::Cmd,
        },
    }
}

/// The template keys every step under `entry` is expected to carry.
pub(crate) fn template_keys_for(entry: &OsEntry) -> Vec<TemplateKey> {
    if entry.id.has_shell_choice() {
        entry
            .shells
            .iter()
            .map(|shell| template_key(entry.id, shell.id))
            .collect()
    } else {
        vec![template_key(entry.id, ShellId::PowerShell)]
    }
}

/// `true` unless the step is admin-gated and admin mode is off.
pub fn is_visible(step: &Step, admin_mode: bool) -> bool {
    admin_mode || !step.admin
}

/// Resolves a single step to its command text.
pub fn resolve(step: &Step, os: OsId, shell: ShellId) -> String {
    step.cmd
        .get(&template_key(os, shell))
        .cloned()
        .unwrap_or_default()
}

/// The visible steps of a task, resolved, in declared order.
pub fn visible_steps(
    task: &Task,
    os: OsId,
    shell: ShellId,
    admin_mode: bool,
) -> Vec<ResolvedStep<'_>> {
    task.steps
        .iter()
        .enumerate()
        .filter(|(_, step)| is_visible(step, admin_mode))
        .map(|(i, step)| ResolvedStep {
            position: i + 1,
            step,
            command: resolve(step, os, shell),
        })
        .collect()
}

/// The "copy all" text: every non-empty visible command, separated by a blank line.
pub fn copy_all(task: &Task, os: OsId, shell: ShellId, admin_mode: bool) -> String {
    visible_steps(task, os, shell, admin_mode)
        .into_iter()
        .map(|resolved| resolved.command)
        .filter(|command| !command.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The `<Token>` placeholders in a command, in order of first appearance.
pub fn placeholders(command: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in PLACEHOLDER_RE.find_iter(command) {
        let token = m.as_str();
        if !found.iter().any(|t| t == token) {
            found.push(token.to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use std::collections::BTreeMap;

    fn step(admin: bool, templates: &[(TemplateKey, &str)]) -> Step {
        Step {
            label: "step".to_string(),
            admin,
            cmd: templates
                .iter()
                .map(|(k, v)| (*k, v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            meaning: Vec::new(),
        }
    }

    fn task(steps: Vec<Step>) -> Task {
        Task {
            id: "t".to_string(),
            name: "T".to_string(),
            description: String::new(),
            steps,
            result_meaning: Vec::new(),
        }
    }

    #[test]
    fn test_visibility() {
        let gated = step(true, &[]);
        let open = step(false, &[]);
        assert!(!is_visible(&gated, false));
        assert!(is_visible(&gated, true));
        assert!(is_visible(&open, false));
        assert!(is_visible(&open, true));
    }

    #[test]
    fn test_resolve_picks_shell_variant() {
        let s = step(
            false,
            &[(TemplateKey::PowerShell, "Get-Thing"), (TemplateKey::Cmd, "thing")],
        );
        assert_eq!(resolve(&s, OsId::Windows, ShellId::PowerShell), "Get-Thing");
        assert_eq!(resolve(&s, OsId::Windows, ShellId::Cmd), "thing");
    }

    #[test]
    fn test_linux_ignores_shell() {
        let s = step(false, &[(TemplateKey::Linux, "df -h")]);
        assert_eq!(resolve(&s, OsId::Linux, ShellId::PowerShell), "df -h");
        assert_eq!(resolve(&s, OsId::Linux, ShellId::Cmd), "df -h");
    }

    #[test]
    fn test_missing_template_resolves_to_empty() {
        let s = step(false, &[(TemplateKey::PowerShell, "Get-Thing")]);
        assert_eq!(resolve(&s, OsId::Windows, ShellId::Cmd), "");
        assert_eq!(resolve(&s, OsId::Linux, ShellId::PowerShell), "");
    }

    #[test]
    fn test_visible_steps_keep_declared_positions() {
        let t = task(vec![
            step(false, &[(TemplateKey::Linux, "a")]),
            step(true, &[(TemplateKey::Linux, "b")]),
            step(false, &[(TemplateKey::Linux, "c")]),
        ]);

        let hidden: Vec<(usize, String)> = visible_steps(&t, OsId::Linux, ShellId::Cmd, false)
            .into_iter()
            .map(|r| (r.position, r.command))
            .collect();
        assert_eq!(hidden, [(1, "a".to_string()), (3, "c".to_string())]);

        let shown = visible_steps(&t, OsId::Linux, ShellId::Cmd, true);
        assert_eq!(shown.len(), 3);
        assert_eq!(shown[1].command, "b");
    }

    #[test]
    fn test_copy_all_skips_empty_commands() {
        let t = task(vec![
            step(false, &[(TemplateKey::Cmd, "one")]),
            step(false, &[(TemplateKey::PowerShell, "only-ps")]),
            step(false, &[(TemplateKey::Cmd, "two")]),
            step(true, &[(TemplateKey::Cmd, "elevated")]),
        ]);
        assert_eq!(copy_all(&t, OsId::Windows, ShellId::Cmd, false), "one\n\ntwo");
        assert_eq!(
            copy_all(&t, OsId::Windows, ShellId::Cmd, true),
            "one\n\ntwo\n\nelevated"
        );
    }

    #[test]
    fn test_copy_all_on_builtin_dns_check() {
        let catalog = Catalog::builtin().unwrap();
        let dns = catalog
            .find_task(OsId::Windows, "network", "dns_check")
            .unwrap();
        assert_eq!(
            copy_all(dns, OsId::Windows, ShellId::Cmd, false),
            "ipconfig /all\n\nnslookup google.com"
        );
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            placeholders(r#"net stop "<ServiceName>" && net start "<ServiceName>""#),
            ["<ServiceName>"]
        );
        assert_eq!(placeholders("tasklist /FI \"PID eq <PID>\""), ["<PID>"]);
        assert!(placeholders("curl -I http://127.0.0.1:80 2>/dev/null | head -n 5").is_empty());
        assert_eq!(placeholders("cp <src> <dst>"), ["<src>", "<dst>"]);
    }

    #[test]
    fn test_template_keys_for_builtin_oses() {
        let catalog = Catalog::builtin().unwrap();
        let windows = catalog.os(OsId::Windows).unwrap();
        let linux = catalog.os(OsId::Linux).unwrap();
        assert_eq!(
            template_keys_for(windows),
            [TemplateKey::PowerShell, TemplateKey::Cmd]
        );
        assert_eq!(template_keys_for(linux), [TemplateKey::Linux]);
    }
}
