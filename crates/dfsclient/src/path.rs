// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Namespace paths
//!
//! An `NsPath` names an entry in a remote hierarchical namespace. It is an
//! optional `scheme://authority` qualifier followed by a `/`-separated path.
//! Paths are normalized when parsed, so equality is structural.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SEPARATOR: char = '/';

const ROOT: &str = "/";
const CUR_DIR: &str = ".";
const PARENT_DIR: &str = "..";

/// A normalized namespace path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NsPath {
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
}

impl NsPath {
    /// Parse and normalize a path string.
    ///
    /// Accepts `scheme://authority/path`, `scheme:/path`, and plain absolute
    /// or relative paths. A qualified path must be absolute.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::invalid_path("cannot create a path from an empty string"));
        }

        let (scheme, rest) = split_scheme(s);
        let (authority, raw) = match scheme {
            Some(_) => split_authority(rest),
            None => (None, rest),
        };

        let raw = if scheme.is_some() && raw.is_empty() {
            ROOT
        } else {
            raw
        };
        if scheme.is_some() && !raw.starts_with(SEPARATOR) {
            return Err(Error::invalid_path(format!(
                "qualified path must be absolute: {s}"
            )));
        }

        Ok(Self {
            scheme,
            authority,
            path: normalize(raw),
        })
    }

    /// The unqualified root `/`
    #[must_use]
    pub fn root() -> Self {
        Self {
            scheme: None,
            authority: None,
            path: ROOT.to_string(),
        }
    }

    /// The relative path `.`, naming the working location
    #[must_use]
    pub fn cur_dir() -> Self {
        Self {
            scheme: None,
            authority: None,
            path: CUR_DIR.to_string(),
        }
    }

    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    #[must_use]
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// The path part without scheme or authority
    #[must_use]
    pub fn path_str(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.path.starts_with(SEPARATOR)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path == ROOT
    }

    #[must_use]
    pub fn is_cur_dir(&self) -> bool {
        self.path == CUR_DIR
    }

    /// True when the path carries a scheme (and possibly an authority)
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.scheme.is_some()
    }

    /// The final segment; empty for the root
    #[must_use]
    pub fn name(&self) -> &str {
        if self.is_root() {
            return "";
        }
        self.path.rsplit(SEPARATOR).next().unwrap_or_default()
    }

    /// Non-empty segments from the top down
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// The enclosing path, or `None` for the root, `.`, and paths whose last
    /// segment is `..`
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() || self.is_cur_dir() || self.name() == PARENT_DIR {
            return None;
        }

        let parent = match self.path.rfind(SEPARATOR) {
            Some(0) => ROOT.to_string(),
            Some(idx) => self.path[..idx].to_string(),
            None => CUR_DIR.to_string(),
        };

        Some(Self {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            path: parent,
        })
    }

    /// Append `name` below this path.
    ///
    /// The joined path is normalized, so leading separators in `name` are
    /// ignored and `.` or `..` segments apply as usual: `child("..")` is the
    /// parent, not an entry below `self`.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        Self {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            path: normalize(&format!("{}{SEPARATOR}{name}", self.path)),
        }
    }

    /// Resolve this path against `base`.
    ///
    /// Relative paths are appended to `base`. Unqualified paths take the
    /// scheme and authority of `base`.
    #[must_use]
    pub fn resolve_against(&self, base: &NsPath) -> Self {
        let path = if self.is_absolute() {
            self.path.clone()
        } else {
            normalize(&format!("{}{SEPARATOR}{}", base.path, self.path))
        };

        let (scheme, authority) = if self.is_qualified() {
            (self.scheme.clone(), self.authority.clone())
        } else {
            (base.scheme.clone(), base.authority.clone())
        };

        Self {
            scheme,
            authority,
            path,
        }
    }

    /// Same path with the qualifier replaced
    #[must_use]
    pub fn with_qualifier(&self, scheme: Option<&str>, authority: Option<&str>) -> Self {
        Self {
            scheme: scheme.map(str::to_ascii_lowercase),
            authority: authority.filter(|a| !a.is_empty()).map(str::to_string),
            path: self.path.clone(),
        }
    }

    /// Same path with no scheme or authority
    #[must_use]
    pub fn unqualified(&self) -> Self {
        self.with_qualifier(None, None)
    }

    /// True when both paths carry the same scheme and authority
    #[must_use]
    pub fn same_qualifier(&self, other: &NsPath) -> bool {
        self.scheme == other.scheme && self.authority == other.authority
    }

    /// True when `self` lies strictly below `ancestor` (paths only)
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: &NsPath) -> bool {
        if self.path == ancestor.path {
            return false;
        }
        if ancestor.is_root() {
            return self.is_absolute();
        }
        self.path
            .strip_prefix(&ancestor.path)
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }
}

/// Split off a URI scheme (`scheme:`) if the text before the first `:` is one
/// and no separator precedes it.
fn split_scheme(s: &str) -> (Option<String>, &str) {
    if let Some(colon) = s.find(':') {
        let candidate = &s[..colon];
        let before_separator = s.find(SEPARATOR).is_none_or(|slash| colon < slash);
        if before_separator && is_scheme(candidate) {
            return (Some(candidate.to_ascii_lowercase()), &s[colon + 1..]);
        }
    }
    (None, s)
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn split_authority(rest: &str) -> (Option<String>, &str) {
    match rest.strip_prefix("//") {
        Some(after) => {
            let end = after.find(SEPARATOR).unwrap_or(after.len());
            let authority = &after[..end];
            let authority = (!authority.is_empty()).then(|| authority.to_string());
            (authority, &after[end..])
        }
        None => (None, rest),
    }
}

fn normalize(raw: &str) -> String {
    let absolute = raw.starts_with(SEPARATOR);
    let mut segments: Vec<&str> = Vec::new();

    for segment in raw.split(SEPARATOR) {
        match segment {
            "" | CUR_DIR => {}
            PARENT_DIR => match segments.last() {
                Some(&last) if last != PARENT_DIR => {
                    _ = segments.pop();
                }
                // Nothing to climb above the root
                _ if absolute => {}
                _ => segments.push(PARENT_DIR),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("{SEPARATOR}{joined}")
    } else if joined.is_empty() {
        CUR_DIR.to_string()
    } else {
        joined
    }
}

impl fmt::Display for NsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scheme {
            Some(scheme) => write!(
                f,
                "{scheme}://{}{}",
                self.authority.as_deref().unwrap_or_default(),
                self.path
            ),
            None => f.write_str(&self.path),
        }
    }
}

impl FromStr for NsPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NsPath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<NsPath> for String {
    fn from(path: NsPath) -> String {
        path.to_string()
    }
}
