// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::CliContext;
use anyhow::{Context, Result};
use diagnostics::log_info;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Copy a host file into the filesystem, creating missing parents.
///
/// With `block_size` the file is created with that block size, the
/// configured buffer size and the client's default replication.
pub async fn put_command<F>(
    ctx: &CliContext,
    source: &Path,
    dest: &str,
    block_size: Option<u64>,
    overwrite: bool,
    mut handler: F,
) -> Result<()>
where
    F: FnMut(&str),
{
    let mut input = tokio::fs::File::open(source)
        .await
        .with_context(|| format!("Failed to open {}", source.display()))?;

    let dest = ctx.path(dest)?;
    let mut writer = match block_size {
        Some(block_size) => dest.create_with_block_size(overwrite, block_size).await?,
        None => dest.create(overwrite).await?,
    };
    let copied = tokio::io::copy(&mut input, &mut writer).await?;
    writer.shutdown().await?;

    log_info!("Copied {from} to {to}",
        from: source.display().to_string(),
        to: dest.to_string());
    handler(&format!("Copied {copied} bytes to {dest}"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::memory_context;

    #[tokio::test]
    async fn test_put_with_block_size() {
        let ctx = memory_context();
        let host = tempfile::tempdir().unwrap();
        let source = host.path().join("in.bin");
        std::fs::write(&source, vec![7u8; 3000]).unwrap();

        let mut lines = Vec::new();
        put_command(&ctx, &source, "/x/y/in.bin", Some(2048), false, |l| {
            lines.push(l.to_string())
        })
        .await
        .unwrap();
        assert_eq!(lines, vec!["Copied 3000 bytes to /x/y/in.bin"]);

        let status = ctx.path("/x/y/in.bin").unwrap().status().await.unwrap();
        assert_eq!(status.len, 3000);
        assert_eq!(status.block_size, 2048);
    }

    #[tokio::test]
    async fn test_put_refuses_overwrite() {
        let ctx = memory_context();
        let host = tempfile::tempdir().unwrap();
        let source = host.path().join("in.txt");
        std::fs::write(&source, b"x").unwrap();

        put_command(&ctx, &source, "/f", None, false, |_| {})
            .await
            .unwrap();
        assert!(
            put_command(&ctx, &source, "/f", None, false, |_| {})
                .await
                .is_err()
        );
        put_command(&ctx, &source, "/f", None, true, |_| {})
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_missing_source() {
        let ctx = memory_context();
        let result = put_command(&ctx, Path::new("/nonexistent/in"), "/f", None, false, |_| {}).await;
        assert!(result.is_err());
        assert!(!ctx.path("/f").unwrap().exists().await);
    }
}
