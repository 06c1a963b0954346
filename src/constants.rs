// src/constants.rs

/// The name of the directory (under the system config dir) holding itcmd's files.
pub const APP_DIR: &str = "itcmd";

/// The name of the user settings file (inside the app dir).
pub const SETTINGS_FILENAME: &str = "config.toml";

/// The name of the persisted session file (inside the app dir).
pub const SESSION_FILENAME: &str = "session.json";

/// Environment variable that points at an external catalog asset.
pub const CATALOG_ENV_VAR: &str = "ITCMD_CATALOG";

/// The only catalog schema version this build understands.
pub const CATALOG_SCHEMA_VERSION: u32 = 1;

/// Category selected in a fresh session.
pub const DEFAULT_CATEGORY: &str = "network";
/// Task selected in a fresh session.
pub const DEFAULT_TASK: &str = "dns_check";
/// Admin mode starts off.
pub const DEFAULT_ADMIN: bool = false;
/// Redaction mode starts on.
pub const DEFAULT_REDACT: bool = true;

/// Shell label used in ticket notes when the OS has a single implicit shell.
pub const IMPLICIT_SHELL_LABEL: &str = "Shell";

/// Last line of a ticket note when redaction mode is on.
pub const REDACTION_NOTICE: &str =
    "Redact before sharing: usernames, hostnames, IPs, serial numbers, file paths, and emails.";
