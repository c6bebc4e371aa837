// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Client lookup by configuration

use crate::client::FilesystemClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::hostmount::{self, HostClient};
use crate::memory::{self, MemoryClient};
use diagnostics::log_debug;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

/// Memory namespaces live as long as the process, one per authority
static MEMORY_CLIENTS: LazyLock<Mutex<HashMap<String, Arc<MemoryClient>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Find or build the client named by `fs.defaultFS`.
///
/// `mem://` URIs return the process-wide instance for their authority, so
/// handles rebuilt from the same configuration see the same namespace.
/// `host://` URIs build a fresh client over the configured host root.
pub fn connect(config: &ClientConfig) -> Result<Arc<dyn FilesystemClient>> {
    let uri = config.default_fs()?;
    match uri.scheme() {
        Some(memory::SCHEME) => Ok(connect_memory(config)?),
        Some(hostmount::SCHEME) => {
            log_debug!("Connecting host client at {uri}", uri: uri.to_string());
            Ok(Arc::new(HostClient::new(config.clone())?))
        }
        other => Err(Error::UnknownScheme(other.unwrap_or_default().to_string())),
    }
}

/// The shared memory client for the authority in `config`
pub fn connect_memory(config: &ClientConfig) -> Result<Arc<MemoryClient>> {
    let uri = config.default_fs()?;
    let key = uri.authority().unwrap_or_default().to_string();

    let mut clients = MEMORY_CLIENTS
        .lock()
        .map_err(|_| Error::Internal("memory client registry poisoned".to_string()))?;
    if let Some(client) = clients.get(&key) {
        return Ok(client.clone());
    }

    log_debug!("Creating memory namespace {uri}", uri: uri.to_string());
    let client = Arc::new(MemoryClient::new(config.clone())?);
    _ = clients.insert(key, client.clone());
    Ok(client)
}
