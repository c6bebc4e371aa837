// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Clients for remote hierarchical filesystems
//!
//! `FilesystemClient` is the contract every client implements: metadata,
//! listing, streaming reads and writes, and the namespace mutations
//! (delete, mkdirs, rename). Two implementations ship here:
//!
//! - `MemoryClient` serves `mem://<authority>/` from process memory
//! - `HostClient` serves `host:///` from a directory on the local host
//!
//! `connect` picks one from a `ClientConfig`.

mod client;
mod config;
mod error;
mod hostmount;
mod memory;
mod path;
mod registry;
mod status;

pub use client::{AsyncReadSeek, CreateOptions, FilesystemClient, ReadStream, WriteStream};
pub use config::{
    BLOCK_SIZE_DEFAULT, BLOCK_SIZE_KEY, BUFFER_SIZE_DEFAULT, BUFFER_SIZE_KEY, ClientConfig,
    DEFAULT_FS, DEFAULT_FS_KEY, HOST_ROOT_KEY, REPLICATION_DEFAULT, REPLICATION_KEY,
    WORKING_DIR_KEY,
};
pub use error::{Error, Result};
pub use hostmount::HostClient;
pub use memory::MemoryClient;
pub use path::{NsPath, SEPARATOR};
pub use registry::{connect, connect_memory};
pub use status::FileStatus;
