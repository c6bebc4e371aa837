// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Hostmount -- a host directory served as a `host:///` namespace
//!
//! The namespace root `/` maps to the directory named by `fs.host.root`.
//! Every operation goes straight to the host through `tokio::fs`; nothing is
//! cached between calls. Files report a replication of 1.

mod client;


pub use client::HostClient;

pub const SCHEME: &str = "host";
