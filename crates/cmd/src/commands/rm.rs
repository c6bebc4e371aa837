// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::CliContext;
use anyhow::{Result, bail};

/// Remove an entry and everything below it
pub async fn rm_command<F>(ctx: &CliContext, path: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let target = ctx.path(path)?;
    if !target.exists().await {
        handler(&format!("{target} does not exist"));
        return Ok(());
    }
    if !target.delete().await {
        bail!("Failed to delete {target}");
    }
    handler(&format!("Deleted {target}"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::memory_context;
    use crate::commands::mkdir_command;

    #[tokio::test]
    async fn test_rm_tree() {
        let ctx = memory_context();
        mkdir_command(&ctx, "/t/a/b", |_| {}).await.unwrap();

        let mut lines = Vec::new();
        rm_command(&ctx, "/t", |l| lines.push(l.to_string()))
            .await
            .unwrap();
        rm_command(&ctx, "/t", |l| lines.push(l.to_string()))
            .await
            .unwrap();
        assert_eq!(lines, vec!["Deleted /t", "/t does not exist"]);
    }

    #[tokio::test]
    async fn test_rm_root_fails() {
        let ctx = memory_context();
        assert!(rm_command(&ctx, "/", |_| {}).await.is_err());
    }
}
