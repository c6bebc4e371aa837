// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::path::NsPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// URI of the filesystem a client serves
pub const DEFAULT_FS_KEY: &str = "fs.defaultFS";
pub const DEFAULT_FS: &str = "mem://default";

/// Initial working location of a client
pub const WORKING_DIR_KEY: &str = "fs.working.dir";

/// Host directory mapped to `/` by the host client
pub const HOST_ROOT_KEY: &str = "fs.host.root";

pub const BUFFER_SIZE_KEY: &str = "io.file.buffer.size";
pub const BUFFER_SIZE_DEFAULT: usize = 4096;

pub const REPLICATION_KEY: &str = "dfs.replication";
pub const REPLICATION_DEFAULT: u16 = 3;

pub const BLOCK_SIZE_KEY: &str = "dfs.blocksize";
pub const BLOCK_SIZE_DEFAULT: u64 = 128 * 1024 * 1024;

/// Key/value configuration that locates (or rebuilds) a client.
///
/// This is what a `DfsPath` carries across a serialization boundary in
/// place of the live client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientConfig {
    entries: BTreeMap<String, String>,
}

impl ClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration naming the given filesystem URI
    #[must_use]
    pub fn with_default_fs(uri: &str) -> Self {
        let mut config = Self::new();
        config.set(DEFAULT_FS_KEY, uri);
        config
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        _ = self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn get_parsed<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| {
                Error::Config(format!("{key} must be a non-negative integer, got '{raw}'"))
            }),
        }
    }

    pub fn get_usize(&self, key: &str, default: usize) -> Result<usize> {
        self.get_parsed(key, default)
    }

    pub fn get_u64(&self, key: &str, default: u64) -> Result<u64> {
        self.get_parsed(key, default)
    }

    pub fn get_u16(&self, key: &str, default: u16) -> Result<u16> {
        self.get_parsed(key, default)
    }

    /// The filesystem URI, always qualified
    pub fn default_fs(&self) -> Result<NsPath> {
        let raw = self.get(DEFAULT_FS_KEY).unwrap_or(DEFAULT_FS);
        let uri = NsPath::parse(raw)?;
        if !uri.is_qualified() {
            return Err(Error::Config(format!(
                "{DEFAULT_FS_KEY} must carry a scheme, got '{raw}'"
            )));
        }
        Ok(uri)
    }

    /// The initial working directory, absolute and unqualified
    pub fn working_dir(&self) -> Result<NsPath> {
        let raw = self.get(WORKING_DIR_KEY).unwrap_or("/");
        let dir = NsPath::parse(raw)?;
        if !dir.is_absolute() {
            return Err(Error::Config(format!(
                "{WORKING_DIR_KEY} must be absolute, got '{raw}'"
            )));
        }
        Ok(dir.unqualified())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
