//! Lexical normalization of archive entry paths

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Where an archive entry lands relative to the extraction root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPath {
    /// The entry normalizes to the extraction root itself (`.`, `./`, `a/..`).
    Root,
    /// A relative path that stays inside the extraction root.
    Inside(PathBuf),
    /// The normalized path still starts with `..` segments.
    Escapes(PathBuf),
}

impl EntryPath {
    /// Whether the entry would be written outside the extraction root.
    pub fn escapes(&self) -> bool {
        matches!(self, Self::Escapes(_))
    }
}

/// Normalize an archive entry path without touching the filesystem.
///
/// `.` segments are dropped and `name/..` pairs collapse. A root or drive
/// prefix is stripped, so `/etc/passwd` lands at `etc/passwd` under the
/// destination and `..` directly under the root collapses to the root, the
/// same way POSIX path cleaning treats rooted paths. Only a relative path
/// with surplus `..` segments escapes.
pub fn normalize_entry_path(raw: &Path) -> EntryPath {
    let mut rooted = false;
    let mut leading_parents = 0usize;
    let mut parts: Vec<&OsStr> = Vec::new();

    for component in raw.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => rooted = true,
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() && !rooted {
                    leading_parents += 1;
                }
            }
            Component::Normal(part) => parts.push(part),
        }
    }

    if leading_parents > 0 {
        let mut escaped: PathBuf =
            std::iter::repeat_n(Component::ParentDir.as_os_str(), leading_parents).collect();
        escaped.extend(parts);
        return EntryPath::Escapes(escaped);
    }

    if parts.is_empty() {
        return EntryPath::Root;
    }

    EntryPath::Inside(parts.into_iter().collect())
}
