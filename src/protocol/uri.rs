/*!
 * Path classification and local path resolution
 */

use std::path::{Component, Path, PathBuf};

use super::{StorageDomain, S3_SCHEME, TURINGDB_SCHEME};
use crate::error::Result;

/// Classify a path string by its scheme prefix.
///
/// Anything without a recognised leading scheme is a local path, including
/// the empty string and strings that only contain a scheme further in.
pub fn classify(path: &str) -> StorageDomain {
    if path.starts_with(S3_SCHEME) {
        StorageDomain::ObjectStore
    } else if path.starts_with(TURINGDB_SCHEME) {
        StorageDomain::Remote
    } else {
        StorageDomain::Local
    }
}

/// Resolve a local path to an absolute one.
///
/// Expands a leading `~`, anchors relative paths at the current directory and
/// removes `.`/`..` lexically. The path does not need to exist.
pub fn resolve_local_path(path: &str) -> Result<PathBuf> {
    let expanded = expand_home(path);

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };

    Ok(normalize(&absolute))
}

fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
