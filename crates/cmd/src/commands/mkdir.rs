// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::CliContext;
use anyhow::Result;
use diagnostics::log_info;

/// Create a directory and any missing parents
pub async fn mkdir_command<F>(ctx: &CliContext, path: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let dir = ctx.path(path)?;
    if dir.mkdirs().await? {
        log_info!("Directory created: {path}", path: dir.to_string());
        handler(&format!("Created {dir}"));
    } else if dir.is_directory().await? {
        handler(&format!("{dir} already exists"));
    } else {
        anyhow::bail!("{dir} exists and is not a directory");
    }
    Ok(())
}
