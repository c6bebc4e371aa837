// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use dfsclient::{ClientConfig, DEFAULT_FS_KEY, FilesystemClient, HOST_ROOT_KEY};
use dfspath::DfsPath;
use diagnostics::log_debug;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable naming a YAML client configuration file
pub const CONFIG_ENV: &str = "DFSPATH_CONFIG";

/// Connection settings shared by every subcommand
pub struct CliContext {
    client: Arc<dyn FilesystemClient>,
}

impl CliContext {
    /// Build the client from an optional config file plus command-line
    /// overrides. Without `--config`, `DFSPATH_CONFIG` is consulted.
    pub fn from_args(
        config_path: Option<PathBuf>,
        fs: Option<String>,
        root: Option<PathBuf>,
    ) -> Result<Self> {
        let config_path = config_path.or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from));
        let mut config = match config_path {
            Some(path) => load_config(&path)?,
            None => ClientConfig::new(),
        };

        if let Some(fs) = fs {
            config.set(DEFAULT_FS_KEY, fs);
        }
        if let Some(root) = root {
            config.set(HOST_ROOT_KEY, root.to_string_lossy());
        }

        Self::from_config(&config)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = dfsclient::connect(config)
            .with_context(|| format!("Failed to connect to {}", describe_fs(config)))?;
        log_debug!("Connected to {uri}", uri: client.uri().to_string());
        Ok(Self { client })
    }

    /// A handle on `path` in the configured filesystem
    pub fn path(&self, path: &str) -> Result<DfsPath> {
        DfsPath::parse(self.client.clone(), path).with_context(|| format!("Invalid path '{path}'"))
    }
}

fn describe_fs(config: &ClientConfig) -> String {
    config
        .get(DEFAULT_FS_KEY)
        .unwrap_or(dfsclient::DEFAULT_FS)
        .to_string()
}

/// Read a YAML client configuration, a flat map of string keys to string values
pub fn load_config(path: &Path) -> Result<ClientConfig> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    ClientConfig::from_yaml_str(&yaml)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Render a byte count the way `ls` output shows it
pub fn format_file_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{size} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::CliContext;
    use dfsclient::ClientConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT: AtomicUsize = AtomicUsize::new(0);

    /// A context over a memory namespace no other test touches
    pub(crate) fn memory_context() -> CliContext {
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        CliContext::from_config(&ClientConfig::with_default_fs(&format!("mem://cmd-test-{n}")))
            .unwrap()
    }
}
