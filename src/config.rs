//! Shim configuration
//!
//! Read by `build.rs` (which compiles this file directly) and by the CLI.
//! Looked up as `guile-shim.toml`, with environment overrides applied last.

use crate::error::{Result, ShimError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "guile-shim.toml";

pub const ENV_GUILE_VERSION: &str = "GUILE_SHIM_GUILE_VERSION";
pub const ENV_INCLUDE_DIRS: &str = "GUILE_SHIM_INCLUDE_DIRS";
pub const ENV_LIB: &str = "GUILE_SHIM_LIB";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShimConfig {
    #[serde(default)]
    pub guile: GuileConfig,

    #[serde(default)]
    pub codegen: CodegenConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuileConfig {
    /// Effective version, e.g. "3.0"; selects default header and library names
    #[serde(default = "default_version")]
    pub version: String,

    /// Header search path; empty means the conventional install locations
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,

    /// Library to link; defaults to `guile-<version>`
    #[serde(default)]
    pub lib_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodegenConfig {
    #[serde(default = "default_source_name")]
    pub source_name: String,

    #[serde(default = "default_header_name")]
    pub header_name: String,

    #[serde(default = "default_true")]
    pub emit_header: bool,
}

impl Default for GuileConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            include_dirs: Vec::new(),
            lib_name: None,
        }
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            source_name: default_source_name(),
            header_name: default_header_name(),
            emit_header: true,
        }
    }
}

fn default_version() -> String { "3.0".to_string() }
fn default_source_name() -> String { "guile_shim.c".to_string() }
fn default_header_name() -> String { "guile_shim.h".to_string() }
fn default_true() -> bool { true }

impl GuileConfig {
    pub fn library(&self) -> String {
        self.lib_name
            .clone()
            .unwrap_or_else(|| format!("guile-{}", self.version))
    }

    /// Directories handed to the C compiler.
    pub fn include_search(&self) -> Vec<PathBuf> {
        if !self.include_dirs.is_empty() {
            return self.include_dirs.clone();
        }
        ["/usr/include", "/usr/local/include"]
            .iter()
            .map(|prefix| Path::new(prefix).join("guile").join(&self.version))
            .collect()
    }
}

impl ShimConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ShimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Find `guile-shim.toml` in `start` or its parents.
    ///
    /// Returns the defaults when no file exists; a file that exists but does
    /// not parse is an error.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut current = Some(start);

        while let Some(dir) = current {
            let path = dir.join(CONFIG_FILE);
            if path.is_file() {
                return Self::load(&path);
            }
            current = dir.parent();
        }

        Ok(Self::default())
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Takes the lookup as a function so `build.rs` and tests can use the
    /// same code path without touching the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(version) = lookup(ENV_GUILE_VERSION) {
            self.guile.version = version;
        }
        if let Some(dirs) = lookup(ENV_INCLUDE_DIRS) {
            self.guile.include_dirs = std::env::split_paths(&dirs).collect();
        }
        if let Some(lib) = lookup(ENV_LIB) {
            self.guile.lib_name = Some(lib);
        }
    }

    /// Discover from `start`, then apply the process environment.
    pub fn from_env(start: &Path) -> Result<Self> {
        let mut config = Self::discover(start)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }
}
