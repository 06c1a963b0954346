//! # Catalog Store
//!
//! The immutable OS -> Category -> Task -> Step dataset. A catalog is loaded
//! once at startup, either from the asset embedded in the binary or from an
//! external TOML file, and is validated as a whole: a malformed asset fails
//! the load instead of producing a partial catalog.

use crate::{
    constants::CATALOG_SCHEMA_VERSION,
    core::resolver,
    models::{Category, CatalogDocument, OsEntry, OsId, ShellId, Task, TemplateKey},
};
use log::{debug, warn};
use std::{
    collections::HashSet,
    fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// The catalog shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.toml");

const FINGERPRINT_LENGTH: usize = 8; // 8 bytes = 16 hex characters

/// Why a catalog could not be loaded.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Could not read catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Unsupported catalog version {found} (this build reads version {expected}).")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Catalog has no section for OS '{os}'.")]
    MissingOs { os: OsId },
    #[error("Catalog declares OS '{os}' more than once.")]
    DuplicateOs { os: OsId },
    #[error("OS '{os}' offers a shell choice but declares no shells.")]
    MissingShells { os: OsId },
    #[error("OS '{os}' has a single implicit shell and cannot declare shells.")]
    UnexpectedShells { os: OsId },
    #[error("OS '{os}' declares shell '{shell}' more than once.")]
    DuplicateShell { os: OsId, shell: ShellId },
    #[error("OS '{os}' has no categories.")]
    EmptyOs { os: OsId },
    #[error("Category '{category}' under '{os}' has no tasks.")]
    EmptyCategory { os: OsId, category: String },
    #[error("Category id '{category}' is declared more than once under '{os}'.")]
    DuplicateCategory { os: OsId, category: String },
    #[error("Task id '{task}' is declared more than once in category '{category}' under '{os}'.")]
    DuplicateTask {
        os: OsId,
        category: String,
        task: String,
    },
    #[error("Step '{step}' of task '{task}' has a {key:?} template, which does not belong to '{os}'.")]
    ForeignTemplate {
        os: OsId,
        task: String,
        step: String,
        key: TemplateKey,
    },
}

type CatalogResult<T> = Result<T, CatalogError>;

/// Where a catalog was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The asset embedded in the binary.
    Builtin,
    /// An external file.
    File(PathBuf),
    /// A string handed to [`Catalog::from_toml_str`].
    Inline,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("built-in"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline => f.write_str("inline"),
        }
    }
}

/// A validated, read-only catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: u32,
    entries: Vec<OsEntry>,
    fingerprint: String,
    source: CatalogSource,
}

/// Loads the catalog from `path`, or the built-in one when no path is given.
pub fn load(path: Option<&Path>) -> CatalogResult<Catalog> {
    match path {
        Some(p) => Catalog::load_from_path(p),
        None => Catalog::builtin(),
    }
}

impl Catalog {
    /// Loads the catalog embedded in the binary.
    pub fn builtin() -> CatalogResult<Self> {
        Self::parse(BUILTIN_CATALOG, CatalogSource::Builtin)
    }

    /// Loads and validates an external catalog file.
    pub fn load_from_path(path: &Path) -> CatalogResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, CatalogSource::File(path.to_path_buf()))
    }

    /// Parses and validates a catalog from TOML text.
    pub fn from_toml_str(content: &str) -> CatalogResult<Self> {
        Self::parse(content, CatalogSource::Inline)
    }

    fn parse(content: &str, source: CatalogSource) -> CatalogResult<Self> {
        let document: CatalogDocument = toml::from_str(content)?;
        validate(&document)?;

        let fingerprint = fingerprint_of(content);
        debug!(
            "Loaded catalog from {} (version {}, fingerprint {})",
            source, document.version, fingerprint
        );

        Ok(Self {
            version: document.version,
            entries: document.os,
            fingerprint,
            source,
        })
    }

    /// Schema version declared by the asset.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Where the catalog was loaded from.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Short content hash of the asset this catalog was parsed from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// OS sections in declaration order.
    pub fn entries(&self) -> &[OsEntry] {
        &self.entries
    }

    /// The section for `os`, if declared.
    pub fn os(&self, os: OsId) -> Option<&OsEntry> {
        self.entries.iter().find(|entry| entry.id == os)
    }

    /// Categories of `os` in declaration order.
    pub fn categories_of(&self, os: OsId) -> &[Category] {
        self.os(os)
            .map(|entry| entry.categories.as_slice())
            .unwrap_or_default()
    }

    /// A category of `os` by id.
    pub fn find_category(&self, os: OsId, category_id: &str) -> Option<&Category> {
        self.categories_of(os).iter().find(|c| c.id == category_id)
    }

    /// Tasks of a category in declaration order. Empty if the category is unknown.
    pub fn tasks_of(&self, os: OsId, category_id: &str) -> &[Task] {
        self.find_category(os, category_id)
            .map(|c| c.tasks.as_slice())
            .unwrap_or_default()
    }

    /// A task by OS, category id and task id.
    pub fn find_task(&self, os: OsId, category_id: &str, task_id: &str) -> Option<&Task> {
        self.tasks_of(os, category_id)
            .iter()
            .find(|t| t.id == task_id)
    }

    /// Total number of tasks under `os`.
    pub fn task_count(&self, os: OsId) -> usize {
        self.categories_of(os).iter().map(|c| c.tasks.len()).sum()
    }

    /// Steps that lack a template for one of their OS's shells. These resolve to empty commands.
    pub fn missing_templates(&self) -> Vec<MissingTemplate> {
        self.entries.iter().flat_map(missing_templates_of).collect()
    }
}

/// A step without a template for one of the shells its OS offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTemplate {
    /// OS the step belongs to.
    pub os: OsId,
    /// Category id.
    pub category: String,
    /// Task id.
    pub task: String,
    /// Step label.
    pub step: String,
    /// The template the step lacks.
    pub key: TemplateKey,
}

impl fmt::Display for MissingTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step '{}' of task '{}/{}' ({}) has no {:?} template.",
            self.step, self.category, self.task, self.os, self.key
        )
    }
}

fn fingerprint_of(content: &str) -> String {
    let hash = blake3::hash(content.as_bytes());
    let truncated: Vec<u8> = hash
        .as_bytes()
        .iter()
        .take(FINGERPRINT_LENGTH)
        .copied()
        .collect();
    hex::encode(truncated)
}

/// Checks the structural invariants of a parsed document.
///
/// Missing shell templates are reported with a warning only; the resolver
/// turns them into empty commands.
fn validate(document: &CatalogDocument) -> CatalogResult<()> {
    if document.version != CATALOG_SCHEMA_VERSION {
        return Err(CatalogError::UnsupportedVersion {
            found: document.version,
            expected: CATALOG_SCHEMA_VERSION,
        });
    }

    let mut seen_os = HashSet::new();
    for entry in &document.os {
        if !seen_os.insert(entry.id) {
            return Err(CatalogError::DuplicateOs { os: entry.id });
        }
        validate_os(entry)?;
    }

    for os in OsId::ALL {
        if !seen_os.contains(&os) {
            return Err(CatalogError::MissingOs { os });
        }
    }
    Ok(())
}

fn validate_os(entry: &OsEntry) -> CatalogResult<()> {
    let os = entry.id;

    match (os.has_shell_choice(), entry.shells.is_empty()) {
        (true, true) => return Err(CatalogError::MissingShells { os }),
        (false, false) => return Err(CatalogError::UnexpectedShells { os }),
        _ => {}
    }
    let mut seen_shells = HashSet::new();
    for shell in &entry.shells {
        if !seen_shells.insert(shell.id) {
            return Err(CatalogError::DuplicateShell { os, shell: shell.id });
        }
    }

    if entry.categories.is_empty() {
        return Err(CatalogError::EmptyOs { os });
    }

    let mut seen_categories = HashSet::new();
    for category in &entry.categories {
        if !seen_categories.insert(category.id.as_str()) {
            return Err(CatalogError::DuplicateCategory {
                os,
                category: category.id.clone(),
            });
        }
        if category.tasks.is_empty() {
            return Err(CatalogError::EmptyCategory {
                os,
                category: category.id.clone(),
            });
        }

        let mut seen_tasks = HashSet::new();
        for task in &category.tasks {
            if !seen_tasks.insert(task.id.as_str()) {
                return Err(CatalogError::DuplicateTask {
                    os,
                    category: category.id.clone(),
                    task: task.id.clone(),
                });
            }
            for step in &task.steps {
                if let Some(key) = step.cmd.keys().find(|key| key.os() != os) {
                    return Err(CatalogError::ForeignTemplate {
                        os,
                        task: task.id.clone(),
                        step: step.label.clone(),
                        key: *key,
                    });
                }
            }
        }
    }

    for missing in missing_templates_of(entry) {
        warn!("{}", missing);
    }
    Ok(())
}

fn missing_templates_of(entry: &OsEntry) -> Vec<MissingTemplate> {
    let required_keys = resolver::template_keys_for(entry);
    let mut missing = Vec::new();

    for category in &entry.categories {
        for task in &category.tasks {
            for step in &task.steps {
                for key in &required_keys {
                    if !step.cmd.contains_key(key) {
                        missing.push(MissingTemplate {
                            os: entry.id,
                            category: category.id.clone(),
                            task: task.id.clone(),
                            step: step.label.clone(),
                            key: *key,
                        });
                    }
                }
            }
        }
    }
    missing
}
