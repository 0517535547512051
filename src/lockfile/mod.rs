use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockfileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no root package found in {0}")]
    MissingRoot(PathBuf),
}

pub type Result<T> = std::result::Result<T, LockfileError>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackageLock {
    pub name: String,
    pub version: String,
    #[serde(rename = "lockfileVersion")]
    pub lockfile_version: u32,
    pub requires: bool,
    pub packages: BTreeMap<String, PackageInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackageInfo {
    pub version: String,
    pub resolved: String,
    pub integrity: String,
    pub dev: bool,
    pub optional: bool,
    pub dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    pub engines: BTreeMap<String, String>,
    pub funding: serde_json::Value,
    pub license: String,
}

impl PackageLock {
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn root(&self) -> Option<&PackageInfo> {
        self.packages.get("")
    }

    pub fn package(&self, name: &str) -> Option<&PackageInfo> {
        self.packages.get(&format!("node_modules/{name}"))
    }

    pub fn root_name(&self) -> &str {
        if self.name.is_empty() {
            "root"
        } else {
            &self.name
        }
    }
}

pub fn load(path: &Path) -> Result<PackageLock> {
    let content = fs::read_to_string(path).map_err(|source| LockfileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let lock = PackageLock::parse(&content).map_err(|source| LockfileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if lock.root().is_none() {
        return Err(LockfileError::MissingRoot(path.to_path_buf()));
    }
    Ok(lock)
}
