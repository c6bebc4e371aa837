// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{CliContext, format_file_size};
use anyhow::Result;
use diagnostics::log_debug;
use futures::StreamExt;

/// List the children of a directory, one line each.
///
/// Entries whose names mark them as temporary or hidden (`_x`, `.x`) are
/// skipped unless `show_all` is set.
pub async fn list_command<F>(ctx: &CliContext, path: &str, show_all: bool, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let dir = ctx.path(path)?;
    log_debug!("Listing {path}", path: dir.to_string());

    let mut children = dir.children().await?;
    while let Some(child) = children.next().await {
        if !show_all && !child.is_regular() {
            continue;
        }
        let status = child.status().await?;
        let kind = if status.is_dir { 'd' } else { '-' };
        let size = if status.is_dir {
            String::new()
        } else {
            format_file_size(status.len)
        };
        handler(&format!("{kind} {size:>10} {}", child.path()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::memory_context;
    use crate::commands::{mkdir_command, put_command};

    #[tokio::test]
    async fn test_list_hides_marker_files() {
        let ctx = memory_context();
        let host = tempfile::tempdir().unwrap();
        let source = host.path().join("data.csv");
        std::fs::write(&source, b"a,b\n1,2\n").unwrap();

        mkdir_command(&ctx, "/out/sub", |_| {}).await.unwrap();
        put_command(&ctx, &source, "/out/part-0000", None, false, |_| {})
            .await
            .unwrap();
        put_command(&ctx, &source, "/out/_SUCCESS", None, false, |_| {})
            .await
            .unwrap();

        let mut lines = Vec::new();
        list_command(&ctx, "/out", false, |line| lines.push(line.to_string()))
            .await
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('-'));
        assert!(lines[0].ends_with("/out/part-0000"));
        assert!(lines[0].contains("8 B"));
        assert!(lines[1].starts_with('d'));

        let mut all = Vec::new();
        list_command(&ctx, "/out", true, |line| all.push(line.to_string()))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let ctx = memory_context();
        assert!(list_command(&ctx, "/nope", false, |_| {}).await.is_err());
    }
}
