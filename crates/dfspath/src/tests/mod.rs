// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

mod rename;

use crate::DfsPath;
use dfsclient::{ClientConfig, FilesystemClient, MemoryClient, WORKING_DIR_KEY};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

static NEXT_NAMESPACE: AtomicUsize = AtomicUsize::new(0);

/// Configuration for a memory namespace no other test uses
pub(crate) fn fresh_config() -> ClientConfig {
    let n = NEXT_NAMESPACE.fetch_add(1, Ordering::Relaxed);
    ClientConfig::with_default_fs(&format!("mem://dfspath-test-{n}"))
}

pub(crate) fn memory_client() -> Arc<dyn FilesystemClient> {
    Arc::new(MemoryClient::new(fresh_config()).unwrap())
}

/// Memory client whose working directory starts at `dir`
pub(crate) fn memory_client_in(dir: &str) -> Arc<dyn FilesystemClient> {
    let mut config = fresh_config();
    config.set(WORKING_DIR_KEY, dir);
    Arc::new(MemoryClient::new(config).unwrap())
}

pub(crate) fn handle(client: &Arc<dyn FilesystemClient>, path: &str) -> DfsPath {
    DfsPath::parse(client.clone(), path).unwrap()
}

pub(crate) async fn write(path: &DfsPath, content: &[u8]) {
    let mut writer = path.create(true).await.unwrap();
    writer.write_all(content).await.unwrap();
    writer.shutdown().await.unwrap();
}

pub(crate) async fn read(path: &DfsPath) -> Vec<u8> {
    let mut reader = path.open().await.unwrap();
    let mut content = Vec::new();
    _ = reader.read_to_end(&mut content).await.unwrap();
    content
}
