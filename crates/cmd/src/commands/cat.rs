// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::CliContext;
use anyhow::Result;
use diagnostics::log_debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Stream a file's bytes to `out`
pub async fn cat_command<W>(ctx: &CliContext, path: &str, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let file = ctx.path(path)?;
    let mut reader = file.open().await?;
    let copied = tokio::io::copy(&mut reader, out).await?;
    out.flush().await?;
    log_debug!("Read {copied} bytes from {path}", copied: copied, path: file.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::append_command;

    #[tokio::test]
    async fn test_cat_after_append() {
        let ctx = crate::common::test_support::memory_context();
        append_command(&ctx, "/log", &mut &b"first\n"[..], |_| {})
            .await
            .unwrap();
        append_command(&ctx, "/log", &mut &b"second\n"[..], |_| {})
            .await
            .unwrap();

        let mut out = Vec::new();
        cat_command(&ctx, "/log", &mut out).await.unwrap();
        assert_eq!(out, b"first\nsecond\n");
    }

    #[tokio::test]
    async fn test_cat_directory_fails() {
        let ctx = crate::common::test_support::memory_context();
        let mut out = Vec::new();
        assert!(cat_command(&ctx, "/", &mut out).await.is_err());
    }
}
