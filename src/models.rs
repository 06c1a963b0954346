// src/models.rs

//! Data types shared by the engine and the CLI: the catalog schema (what is
//! read from the catalog asset), the session record and its persisted shape,
//! and the user settings file.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_ADMIN, DEFAULT_CATEGORY, DEFAULT_REDACT, DEFAULT_TASK,
};

// --- CLOSED ENUMERATIONS ---

/// The operating systems the catalog covers.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum OsId {
    /// Windows, with PowerShell and Command Prompt variants.
    Windows,
    /// Linux, with a single implicit shell.
    Linux,
}

impl OsId {
    /// Every OS, in the order the catalog is expected to declare them.
    pub const ALL: [Self; 2] = [Self::Windows, Self::Linux];

    /// The identifier used in the catalog asset and the session file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }

    /// Whether the user picks between several shells on this OS.
    pub fn has_shell_choice(self) -> bool {
        match self {
            Self::Windows => true,
            Self::Linux => false,
        }
    }
}

impl fmt::Display for OsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "windows" | "win" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            other => Err(format!("Unknown OS '{}'. Expected 'windows' or 'linux'.", other)),
        }
    }
}

/// A shell the user can choose on an OS that offers more than one.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ShellId {
    /// Windows PowerShell.
    PowerShell,
    /// Windows Command Prompt (`cmd.exe`).
    Cmd,
}

impl ShellId {
    /// The identifier used in the catalog asset and the session file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PowerShell => "powershell",
            Self::Cmd => "cmd",
        }
    }
}

impl fmt::Display for ShellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShellId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "powershell" | "pwsh" | "ps" => Ok(Self::PowerShell),
            "cmd" => Ok(Self::Cmd),
            other => Err(format!(
                "Unknown shell '{}'. Expected 'powershell' or 'cmd'.",
                other
            )),
        }
    }
}

/// Key of a command template inside a step's `cmd` table.
///
/// Every `(OsId, ShellId)` pair maps to exactly one key; see
/// [`crate::core::resolver::template_key`].
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKey {
    /// Template run from PowerShell.
    PowerShell,
    /// Template run from Command Prompt.
    Cmd,
    /// The single Linux template.
    Linux,
}

impl TemplateKey {
    /// The OS a template of this kind belongs to.
    pub fn os(self) -> OsId {
        match self {
            Self::PowerShell | Self::Cmd => OsId::Windows,
            Self::Linux => OsId::Linux,
        }
    }
}

/// Appearance preference.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on a light background.
    Light,
    /// Light text on a dark background.
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// The identifier used in the session file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("Unknown theme '{}'. Expected 'light' or 'dark'.", other)),
        }
    }
}

// --- CATALOG MODELS (What is read from the catalog asset) ---

/// One command of a task, in the order it must be run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Human-readable label, e.g. "Flush DNS cache".
    pub label: String,
    /// Elevated privileges are recommended for this step.
    #[serde(default)]
    pub admin: bool,
    /// Command template per shell variant. Templates may contain `<Token>` placeholders.
    #[serde(default)]
    pub cmd: BTreeMap<TemplateKey, String>,
    /// "What to look for" lines for this step's output.
    #[serde(default)]
    pub meaning: Vec<String>,
}

/// A diagnostic task such as "DNS check".
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Task {
    /// Identifier, unique within its category.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Steps in required execution order.
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Interpretation notes for the task as a whole.
    #[serde(default)]
    pub result_meaning: Vec<String>,
}

/// A group of related tasks.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Category {
    /// Identifier, unique within its OS.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Tasks in declaration order.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// A selectable shell on an OS.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ShellEntry {
    /// Which shell this is.
    pub id: ShellId,
    /// Display label, e.g. "Command Prompt".
    pub label: String,
    /// Shorter label for ticket notes, e.g. "CMD".
    #[serde(default)]
    pub short_label: Option<String>,
}

/// Everything the catalog knows about one OS.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OsEntry {
    /// Which OS this is.
    pub id: OsId,
    /// Display label, e.g. "Windows".
    pub label: String,
    /// A usage tip shown under the command list.
    #[serde(default)]
    pub hint: Option<String>,
    /// Selectable shells. Empty means a single implicit shell.
    #[serde(default)]
    pub shells: Vec<ShellEntry>,
    /// Categories in declaration order.
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl OsEntry {
    /// Finds a shell entry by id.
    pub fn shell(&self, shell: ShellId) -> Option<&ShellEntry> {
        self.shells.iter().find(|s| s.id == shell)
    }
}

/// The top-level document of a catalog asset.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct CatalogDocument {
    pub(crate) version: u32,
    #[serde(default)]
    pub(crate) os: Vec<OsEntry>,
}

// --- SESSION MODELS ---

/// The user's current selection and preferences.
///
/// This is the only mutable entity of the engine. It is changed through
/// [`crate::core::session::transition`] and always repaired with
/// [`crate::core::session::reconcile`] afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Selected OS.
    pub os: OsId,
    /// Selected shell. Only meaningful when the OS offers a choice.
    pub shell: ShellId,
    /// Selected category id under `os`.
    pub category: String,
    /// Selected task id under `category`.
    pub task: String,
    /// Current search text. Blank means no filtering.
    pub search: String,
    /// Show admin-gated steps.
    pub admin: bool,
    /// Append the redaction notice to ticket notes.
    pub redact: bool,
    /// Appearance. `None` follows the platform preference.
    pub theme: Option<Theme>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            os: OsId::Windows,
            shell: ShellId::PowerShell,
            category: DEFAULT_CATEGORY.to_string(),
            task: DEFAULT_TASK.to_string(),
            search: String::new(),
            admin: DEFAULT_ADMIN,
            redact: DEFAULT_REDACT,
            theme: None,
        }
    }
}

impl SessionState {
    /// Whether the search text filters the task list.
    pub fn is_searching(&self) -> bool {
        !self.search.trim().is_empty()
    }
}

/// The persisted shape of a [`SessionState`]: a flat record where every field is optional.
///
/// Fields are read one by one: a field holding a value of the wrong type is
/// dropped on its own and the rest of the record is kept.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSession {
    /// OS id, e.g. `"windows"`.
    #[serde(default, deserialize_with = "lenient_field", skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// Shell id, e.g. `"powershell"`.
    #[serde(default, deserialize_with = "lenient_field", skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    /// Selected category id.
    #[serde(default, deserialize_with = "lenient_field", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Selected task id.
    #[serde(default, deserialize_with = "lenient_field", skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    /// Raw search text.
    #[serde(default, deserialize_with = "lenient_field", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Admin mode.
    #[serde(default, deserialize_with = "lenient_field", skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    /// Redaction mode.
    #[serde(default, deserialize_with = "lenient_field", skip_serializing_if = "Option::is_none")]
    pub redact: Option<bool>,
    /// `"light"` or `"dark"`; absent until the user picks one.
    #[serde(default, deserialize_with = "lenient_field", skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Reads a field of any JSON shape and keeps it only if it has the expected type.
fn lenient_field<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|entry| serde_json::from_value(entry).ok()))
}

// --- SETTINGS MODELS (`config.toml`) ---

/// When to emit ANSI colors.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Follow the terminal.
    #[default]
    Auto,
    /// Always colorize.
    Always,
    /// Never colorize.
    Never,
}

/// User settings read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Path to an external catalog asset. `~` and environment variables are expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Color output mode.
    #[serde(default)]
    pub color: ColorMode,
}
