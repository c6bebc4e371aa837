// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::namespace::FileData;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

/// Appends written bytes straight into a memory file's shared buffer.
///
/// The buffer travels with the entry across renames; if the entry is
/// deleted or overwritten the writer keeps filling a detached buffer.
pub(super) struct MemoryWriter {
    data: FileData,
    path: String,
}

impl MemoryWriter {
    pub(super) fn new(data: FileData, path: String) -> Self {
        Self { data, path }
    }
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, std::io::Error>> {
        let this = self.get_mut();
        let mut data = this.data.lock().map_err(|_| {
            std::io::Error::other(format!("memory file {} is poisoned", this.path))
        })?;
        data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), std::io::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<(), std::io::Error>> {
        Poll::Ready(Ok(()))
    }
}
