// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::client::EntryKind;
use crate::path::{NsPath, SEPARATOR};
use crate::status::now_millis;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// File bytes, shared with any open writers
pub(super) type FileData = Arc<Mutex<Vec<u8>>>;

#[derive(Clone)]
pub(super) enum Node {
    Directory {
        modification_time: i64,
    },
    File {
        data: FileData,
        replication: u16,
        block_size: u64,
        modification_time: i64,
    },
}

impl Node {
    fn kind(&self) -> EntryKind {
        match self {
            Node::Directory { .. } => EntryKind::Directory,
            Node::File { .. } => EntryKind::File,
        }
    }
}

/// Every entry of one in-memory filesystem, keyed by absolute path.
///
/// Keys are unqualified, normalized absolute path strings, so a directory's
/// descendants form a contiguous key range.
pub(super) struct Namespace {
    entries: BTreeMap<String, Node>,
}

impl Namespace {
    pub(super) fn new() -> Self {
        let mut entries = BTreeMap::new();
        _ = entries.insert(
            NsPath::root().path_str().to_string(),
            Node::Directory {
                modification_time: now_millis(),
            },
        );
        Self { entries }
    }

    pub(super) fn get(&self, path: &NsPath) -> Option<&Node> {
        self.entries.get(path.path_str())
    }

    pub(super) fn get_mut(&mut self, path: &NsPath) -> Option<&mut Node> {
        self.entries.get_mut(path.path_str())
    }

    pub(super) fn kind(&self, path: &NsPath) -> Option<EntryKind> {
        self.get(path).map(Node::kind)
    }

    pub(super) fn insert(&mut self, path: &NsPath, node: Node) {
        _ = self.entries.insert(path.path_str().to_string(), node);
    }

    fn prefix_of(dir: &NsPath) -> String {
        if dir.is_root() {
            dir.path_str().to_string()
        } else {
            format!("{}{SEPARATOR}", dir.path_str())
        }
    }

    /// Immediate children of `dir` in name order
    pub(super) fn children(&self, dir: &NsPath) -> Vec<(NsPath, &Node)> {
        let prefix = Self::prefix_of(dir);
        self.entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| {
                let rest = &key[prefix.len()..];
                !rest.is_empty() && !rest.contains(SEPARATOR)
            })
            .map(|(key, node)| (dir.child(&key[prefix.len()..]), node))
            .collect()
    }

    pub(super) fn has_children(&self, dir: &NsPath) -> bool {
        let prefix = Self::prefix_of(dir);
        self.entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .any(|(key, _)| key.len() > prefix.len())
    }

    /// Keys of `path` and everything below it
    fn subtree_keys(&self, path: &NsPath) -> Vec<String> {
        let prefix = Self::prefix_of(path);
        let mut keys: Vec<String> = self
            .entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, _)| key.clone())
            .collect();
        if !path.is_root() && self.entries.contains_key(path.path_str()) {
            keys.push(path.path_str().to_string());
        }
        keys
    }

    /// Create every missing level of `path`.
    ///
    /// Fails with the first level that is a file; levels above it may
    /// already have been created.
    pub(super) fn mkdirs(&mut self, path: &NsPath) -> std::result::Result<(), NsPath> {
        let mut current = NsPath::root();
        let mut levels = vec![current.clone()];
        for segment in path.segments() {
            current = current.child(segment);
            levels.push(current.clone());
        }

        for level in levels {
            match self.get(&level) {
                Some(Node::Directory { .. }) => {}
                Some(Node::File { .. }) => return Err(level),
                None => self.insert(
                    &level,
                    Node::Directory {
                        modification_time: now_millis(),
                    },
                ),
            }
        }
        Ok(())
    }

    pub(super) fn remove_subtree(&mut self, path: &NsPath) {
        for key in self.subtree_keys(path) {
            _ = self.entries.remove(&key);
        }
    }

    /// Re-key `src` and its descendants under `dst`
    pub(super) fn move_subtree(&mut self, src: &NsPath, dst: &NsPath) {
        let src_key = src.path_str();
        let moved: Vec<(String, Node)> = self
            .subtree_keys(src)
            .into_iter()
            .filter_map(|key| self.entries.remove(&key).map(|node| (key, node)))
            .collect();

        for (key, node) in moved {
            let new_key = format!("{}{}", dst.path_str(), &key[src_key.len()..]);
            _ = self.entries.insert(new_key, node);
        }
    }
}
