// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::path::NsPath;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Metadata for one namespace entry, as returned by `stat` and `list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    /// Qualified absolute path of the entry
    pub path: NsPath,
    /// Length in bytes; always 0 for directories
    pub len: u64,
    pub is_dir: bool,
    pub replication: u16,
    pub block_size: u64,
    /// Milliseconds since the Unix epoch
    pub modification_time: i64,
}

impl FileStatus {
    #[must_use]
    pub fn directory(path: NsPath, modification_time: i64) -> Self {
        Self {
            path,
            len: 0,
            is_dir: true,
            replication: 0,
            block_size: 0,
            modification_time,
        }
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }
}

/// Current time in milliseconds since the Unix epoch
#[must_use]
pub fn now_millis() -> i64 {
    millis_since_epoch(SystemTime::now())
}

#[must_use]
pub fn millis_since_epoch(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
