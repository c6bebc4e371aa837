// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::CliContext;
use anyhow::Result;

/// Print the metadata of one entry as YAML
pub async fn stat_command<F>(ctx: &CliContext, path: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let status = ctx.path(path)?.status().await?;
    handler(&serde_yaml_ng::to_string(&status)?);
    Ok(())
}
