// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::CliContext;
use anyhow::Result;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Append everything read from `input` to a file, creating it if missing
pub async fn append_command<R, F>(
    ctx: &CliContext,
    dest: &str,
    input: &mut R,
    mut handler: F,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let dest = ctx.path(dest)?;
    let mut writer = if dest.exists().await {
        dest.append().await?
    } else {
        dest.create(false).await?
    };
    let copied = tokio::io::copy(input, &mut writer).await?;
    writer.shutdown().await?;
    handler(&format!("Appended {copied} bytes to {dest}"));
    Ok(())
}
