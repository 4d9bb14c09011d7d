use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    DEFAULT_CONFIG_FILE,
};

/// The contents of `.gh-releasegen.json`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub labels: LabelsConfig,
    pub separate_project_label: SeparateProjectLabelConfig,
}

/// Which labels sort pull requests into the bug fix and maintenance sections
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelsConfig {
    #[serde(rename = "bug")]
    pub bug_labels: IndexSet<String>,
    #[serde(rename = "maintenance")]
    pub maintenance_labels: IndexSet<String>,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        LabelsConfig {
            bug_labels: ["bug", "bug fix", "bugfix"]
                .into_iter()
                .map(String::from)
                .collect(),
            maintenance_labels: ["maintenance"].into_iter().map(String::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeparateProjectLabelConfig {
    /// Split changes and bug fixes into one subsection per project label
    pub enable: bool,
    pub project_labels: Vec<ProjectLabel>,
}

/// A project subsection: `name` is the heading, `label` the GitHub label
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectLabel {
    pub name: String,
    pub label: String,
}

impl LabelsConfig {
    pub fn is_bug(&self, label: &str) -> bool { self.bug_labels.contains(label) }

    pub fn is_maintenance(&self, label: &str) -> bool { self.maintenance_labels.contains(label) }
}

impl SeparateProjectLabelConfig {
    /// Whether `label` is the label value of any configured project
    pub fn is_project_label(&self, label: &str) -> bool {
        self.project_labels.iter().any(|p| p.label == label)
    }
}

impl Config {
    /// The config file location for a repository root
    pub fn path_in<P: AsRef<Path>>(repo_root: P) -> PathBuf {
        repo_root.as_ref().join(DEFAULT_CONFIG_FILE)
    }

    /// Loads `.gh-releasegen.json` from the repository root, falling back to
    /// the defaults when there is no such file.
    ///
    /// # Errors
    ///
    /// `Error::ConfigParse` when the file exists but isn't valid, and
    /// `Error::Io` when it can't be read.
    pub fn from_repo<P: AsRef<Path>>(repo_root: P) -> Result<Self> {
        let cfg_file = Config::path_in(repo_root);
        if !cfg_file.is_file() {
            debug!("No config file at {:?}, using defaults", cfg_file);
            return Ok(Config::default());
        }
        Config::from_file(cfg_file)
    }

    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        debug!("Using config file: {:?}", file.as_ref());
        let raw = fs::read_to_string(file.as_ref())?;
        serde_json::from_str(&raw).map_err(|source| Error::ConfigParse {
            path: file.as_ref().to_path_buf(),
            source,
        })
    }

    /// Writes the default configuration to the repository root and returns
    /// where it went.
    ///
    /// # Errors
    ///
    /// `Error::ConfigExists` when a config file is already there and `force`
    /// is not set.
    pub fn init<P: AsRef<Path>>(repo_root: P, force: bool) -> Result<PathBuf> {
        let cfg_file = Config::path_in(repo_root);
        if cfg_file.exists() && !force {
            return Err(Error::ConfigExists(cfg_file));
        }
        debug!("Writing default config to {:?}", cfg_file);
        fs::write(&cfg_file, Config::default().to_json())?;
        Ok(cfg_file)
    }

    pub fn to_json(&self) -> String {
        // A struct of strings, bools and sequences always serializes
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
