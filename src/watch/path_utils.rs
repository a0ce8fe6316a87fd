// src/watch/path_utils.rs

//! Path normalization for change-event matching.

use std::path::{Component, Path, PathBuf};

/// Normalize a path into the canonical form used for watched-set membership.
///
/// Change events must be matched by exact path equality, but watchers report
/// paths in whatever form the platform hands them out (symlinked prefixes on
/// macOS, `.`/`..` segments, mixed separators). So:
///
/// - First try `canonicalize`, which resolves symlinks and relative segments.
/// - If that fails (typically because the file no longer exists), fall back
///   to an absolute lexical cleanup so the comparison still has a chance.
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canon) = path.canonicalize() {
        return canon;
    }

    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    lexical_normalize(&abs)
}

/// Remove `.` segments and resolve `..` against the preceding component,
/// without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping at the root is a no-op, which is the right
                // behaviour for `/..`.
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lexical_normalize_resolves_dot_segments() {
        assert_eq!(
            lexical_normalize(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
    }

    #[test]
    fn lexical_normalize_stops_at_root() {
        assert_eq!(
            lexical_normalize(Path::new("/../../a")),
            PathBuf::from("/a")
        );
    }

    #[test]
    fn existing_file_and_dotted_alias_normalize_equal() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("asset.css");
        fs::write(&file, "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let alias = dir.path().join("sub/../asset.css");
        assert_eq!(normalize_path(&file), normalize_path(&alias));
    }

    #[test]
    fn missing_file_still_normalizes_to_absolute() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope/../gone.txt");
        let normalized = normalize_path(&missing);
        assert!(normalized.is_absolute());
        assert_eq!(normalized.file_name().unwrap(), "gone.txt");
    }
}
