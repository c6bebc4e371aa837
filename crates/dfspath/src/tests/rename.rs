// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::faulty::FaultyClient;
use super::{handle, memory_client, memory_client_in, read, write};
use crate::{Error, FilePath};
use dfsclient::FilesystemClient;
use std::sync::Arc;

#[tokio::test]
async fn test_rename_moves_content() {
    let client = memory_client();
    let src = handle(&client, "/in/part-0000");
    write(&src, b"payload").await;
    _ = handle(&client, "/out").mkdirs().await.unwrap();

    let dst = handle(&client, "/out/result");
    src.rename_to(&dst, false).await.unwrap();

    assert!(!src.exists().await);
    assert!(dst.exists().await);
    assert_eq!(dst.len().await.unwrap(), 7);
    assert_eq!(read(&dst).await, b"payload");
}

#[tokio::test]
async fn test_rename_removes_emptied_source_ancestors() {
    let client = memory_client();
    write(&handle(&client, "/keep/sibling"), b"stay").await;
    let src = handle(&client, "/keep/staging/attempt/f");
    write(&src, b"x").await;

    src.rename_to(&handle(&client, "/final/f"), false)
        .await
        .unwrap();

    assert!(!handle(&client, "/keep/staging/attempt").exists().await);
    assert!(!handle(&client, "/keep/staging").exists().await);
    assert!(handle(&client, "/keep").exists().await);
    assert!(handle(&client, "/keep/sibling").exists().await);
}

#[tokio::test]
async fn test_rename_cleanup_stops_at_root() {
    let client = memory_client();
    let src = handle(&client, "/only/f");
    write(&src, b"x").await;

    src.rename_to(&handle(&client, "/moved"), false)
        .await
        .unwrap();

    assert!(!handle(&client, "/only").exists().await);
    assert!(handle(&client, "/").exists().await);
}

#[tokio::test]
async fn test_rename_creates_destination_parents() {
    let client = memory_client();
    let src = handle(&client, "/f");
    write(&src, b"x").await;

    let dst = handle(&client, "/new/deep/f");
    src.rename_to(&dst, false).await.unwrap();
    assert!(handle(&client, "/new/deep").is_directory().await.unwrap());
    assert_eq!(read(&dst).await, b"x");
}

#[tokio::test]
async fn test_rename_replace_existing_true_refuses() {
    let client = memory_client();
    let src = handle(&client, "/src");
    let dst = handle(&client, "/dst");
    write(&src, b"new").await;
    write(&dst, b"old").await;

    let err = src.rename_to(&dst, true).await.unwrap_err();
    assert!(matches!(err, Error::DestinationExists(_)));
    assert_eq!(read(&src).await, b"new");
    assert_eq!(read(&dst).await, b"old");
}

#[tokio::test]
async fn test_rename_replace_existing_false_overwrites() {
    let client = memory_client();
    let src = handle(&client, "/src");
    let dst = handle(&client, "/dst");
    write(&src, b"new").await;
    write(&dst, b"old").await;

    src.rename_to(&dst, false).await.unwrap();
    assert!(!src.exists().await);
    assert_eq!(read(&dst).await, b"new");
}

#[tokio::test]
async fn test_rename_missing_source() {
    let client = memory_client();
    let err = handle(&client, "/nothing")
        .rename_to(&handle(&client, "/dst"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SourceNotFound(_)));
    assert!(!handle(&client, "/dst").exists().await);
}

#[tokio::test]
async fn test_rename_parent_is_file() {
    let client = memory_client();
    let src = handle(&client, "/src");
    write(&src, b"x").await;
    write(&handle(&client, "/blocker"), b"file").await;

    let err = src
        .rename_to(&handle(&client, "/blocker/dst"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ParentNotDirectory(_)));
    assert!(src.exists().await);
}

#[tokio::test]
async fn test_rename_to_other_filesystem() {
    let here = memory_client();
    let there = memory_client();
    let src = handle(&here, "/src");
    write(&src, b"x").await;

    let err = src
        .rename_to(&handle(&there, "/dst"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::IncompatibleDestination(_)));
    assert!(src.exists().await);
}

#[tokio::test]
async fn test_rename_refused_by_client() {
    let client = memory_client();
    let src = handle(&client, "/tree");
    _ = handle(&client, "/tree/inner").mkdirs().await.unwrap();

    let err = src
        .rename_to(&handle(&client, "/tree/inner/tree"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RenameFailed { .. }));
    assert!(handle(&client, "/tree/inner").exists().await);
}

#[tokio::test]
async fn test_rename_onto_itself_keeps_the_entry() {
    let client = memory_client();
    let src = handle(&client, "/keep/f");
    write(&src, b"still here").await;

    src.rename_to(&handle(&client, "/keep/f"), false)
        .await
        .unwrap();
    assert_eq!(read(&src).await, b"still here");
}

#[tokio::test]
async fn test_rename_relative_handle_onto_its_absolute_form() {
    let client = memory_client_in("/keep");
    let relative = handle(&client, "f");
    write(&relative, b"still here").await;

    relative
        .rename_to(&handle(&client, "/keep/f"), false)
        .await
        .unwrap();
    assert_eq!(read(&handle(&client, "/keep/f")).await, b"still here");
}

#[tokio::test]
async fn test_rename_onto_ancestor_is_refused() {
    let client = memory_client();
    let src = handle(&client, "/d/g");
    write(&src, b"x").await;
    write(&handle(&client, "/d/other"), b"y").await;

    let err = src
        .rename_to(&handle(&client, "/d"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RenameFailed { .. }));
    assert_eq!(read(&src).await, b"x");
    assert!(handle(&client, "/d/other").exists().await);
}

#[tokio::test]
async fn test_rename_into_own_subtree_leaves_it_alone() {
    let client = memory_client();
    let src = handle(&client, "/tree");
    write(&handle(&client, "/tree/inner/leaf"), b"x").await;

    let err = src
        .rename_to(&handle(&client, "/tree/inner"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RenameFailed { .. }));
    assert!(handle(&client, "/tree/inner/leaf").exists().await);
}

#[tokio::test]
async fn test_rename_relative_handles() {
    let client = memory_client_in("/work");
    let src = handle(&client, "a/f");
    write(&src, b"rel").await;

    src.rename_to(&handle(&client, "b/f"), false).await.unwrap();
    assert_eq!(read(&handle(&client, "/work/b/f")).await, b"rel");
    assert!(!handle(&client, "/work/a").exists().await);
    assert!(handle(&client, "/work").exists().await);
}

#[tokio::test]
async fn test_rename_survives_cleanup_failure() {
    let faulty = Arc::new(FaultyClient::new());
    let client: Arc<dyn FilesystemClient> = faulty.clone();
    let src = handle(&client, "/dir/f");
    write(&src, b"x").await;

    faulty.fail("list");
    src.rename_to(&handle(&client, "/g"), false).await.unwrap();

    assert!(handle(&client, "/g").exists().await);
    assert!(handle(&client, "/dir").exists().await);
}

#[tokio::test]
async fn test_rename_through_trait_objects() {
    let client = memory_client();
    let src: Box<dyn FilePath> = Box::new(handle(&client, "/a"));
    let dst: Box<dyn FilePath> = Box::new(handle(&client, "/b"));
    let mut writer = src.create(false).await.unwrap();
    tokio::io::AsyncWriteExt::shutdown(&mut writer).await.unwrap();

    src.rename_to(dst.as_ref(), true).await.unwrap();
    assert!(!src.exists().await);
    assert!(dst.exists().await);
}

#[tokio::test]
async fn test_delete_if_empty_directory() {
    let client = memory_client();
    _ = handle(&client, "/p/q/r").mkdirs().await.unwrap();
    write(&handle(&client, "/p/file"), b"x").await;

    let removed = handle(&client, "/p/q/r")
        .delete_if_empty_directory()
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert!(handle(&client, "/p").exists().await);

    let file = handle(&client, "/p/file");
    assert_eq!(file.delete_if_empty_directory().await.unwrap(), 0);
    assert!(file.exists().await);
}
