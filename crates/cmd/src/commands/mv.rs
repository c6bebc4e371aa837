// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::CliContext;
use anyhow::Result;

/// Move `src` to `dst`.
///
/// An existing `dst` is replaced unless `no_clobber` is set, in which case
/// the move fails and nothing changes.
pub async fn mv_command<F>(
    ctx: &CliContext,
    src: &str,
    dst: &str,
    no_clobber: bool,
    mut handler: F,
) -> Result<()>
where
    F: FnMut(&str),
{
    let src = ctx.path(src)?;
    let dst = ctx.path(dst)?;
    src.rename_to(&dst, no_clobber).await?;
    handler(&format!("Moved {src} to {dst}"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::memory_context;
    use crate::commands::{append_command, cat_command};

    async fn write(ctx: &CliContext, path: &str, content: &[u8]) {
        append_command(ctx, path, &mut &content[..], |_| {})
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mv_replaces_and_cleans_up() {
        let ctx = memory_context();
        write(&ctx, "/staging/run/out", b"new").await;
        write(&ctx, "/final/out", b"old").await;

        mv_command(&ctx, "/staging/run/out", "/final/out", false, |_| {})
            .await
            .unwrap();

        let mut out = Vec::new();
        cat_command(&ctx, "/final/out", &mut out).await.unwrap();
        assert_eq!(out, b"new");
        assert!(!ctx.path("/staging").unwrap().exists().await);
    }

    #[tokio::test]
    async fn test_mv_no_clobber() {
        let ctx = memory_context();
        write(&ctx, "/a", b"a").await;
        write(&ctx, "/b", b"b").await;

        let err = mv_command(&ctx, "/a", "/b", true, |_| {}).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(ctx.path("/a").unwrap().exists().await);
    }
}
