//! Catalogue of typing rules available to the engine.
//!
//! Each rule is a directory `<rules_dir>/<name>/` holding a `metadata.json`
//! with a human-readable `name` (shown as the label) and a `description`.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

/// System-wide rule directory.
pub const SYSTEM_RULES_DIR: &str = "/usr/share/libskk/rules";

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct MetadataFile {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMetadata {
    /// Identifier stored in the settings (the directory name).
    pub name: String,
    pub label: String,
    pub description: String,
    pub location: PathBuf,
}

/// Read `<rule_dir>/metadata.json`.
pub fn load_metadata(rule_dir: &Path) -> Result<RuleMetadata, RuleError> {
    let content = fs::read_to_string(rule_dir.join("metadata.json"))?;
    let meta: MetadataFile = serde_json::from_str(&content)?;
    let name = rule_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(RuleMetadata {
        name,
        label: meta.name,
        description: meta.description,
        location: rule_dir.to_path_buf(),
    })
}

/// Per-user rule directory followed by the system one; user rules shadow
/// system rules of the same name.
pub fn default_rule_dirs() -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(config) = dirs::config_dir() {
        out.push(config.join("libskk").join("rules"));
    }
    out.push(PathBuf::from(SYSTEM_RULES_DIR));
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleList {
    rules: Vec<RuleMetadata>,
}

impl RuleList {
    pub fn from_rules(rules: Vec<RuleMetadata>) -> Self {
        Self { rules }
    }

    /// Collect rules from `roots`, earlier directories winning on name clashes.
    /// Missing directories and unreadable metadata are skipped.
    pub fn scan(roots: &[PathBuf]) -> Self {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();
        for dir in roots {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            let mut subdirs: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect();
            subdirs.sort();
            for subdir in subdirs {
                match load_metadata(&subdir) {
                    Ok(meta) => {
                        if seen.insert(meta.name.clone()) {
                            rules.push(meta);
                        }
                    }
                    Err(e) => debug!(dir = %subdir.display(), "skipping rule: {e}"),
                }
            }
        }
        rules.sort_by(|a, b| a.name.cmp(&b.name));
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RuleMetadata> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleMetadata> {
        self.rules.iter()
    }

    /// Index of the rule with identifier `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name == name)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.get(index).map(|r| r.label.as_str())
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.get(index).map(|r| r.name.as_str())
    }
}
