//! Content file discovery

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ContentError;

lazy_static! {
    static ref MARKUP_EXT: Regex = Regex::new(r"\.mdx?$").unwrap();
}

/// Markup extensions in lookup priority order
pub const MARKUP_EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// How far below the root discovery descends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Immediate children only
    Flat,
    /// All subdirectories
    Recursive,
}

/// Find all `.md`/`.mdx` files under `root`.
///
/// Fails only when the root itself cannot be read. Unreadable entries below
/// it are logged and skipped, keeping whatever was collected from siblings.
/// The result is in file-name order per directory, which callers must not
/// rely on for presentation.
pub fn find_markup_files(root: &Path, depth: Depth) -> Result<Vec<PathBuf>, ContentError> {
    fs::read_dir(root).map_err(|source| ContentError::DirectoryUnavailable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if depth == Depth::Flat {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_markup_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Error reading {:?} during discovery, skipping: {}",
                    e.path().unwrap_or(root),
                    e
                );
            }
        }
    }

    Ok(files)
}

/// Check if a file is a markdown or MDX file
pub fn is_markup_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| MARKUP_EXT.is_match(n))
        .unwrap_or(false)
}

/// Slug from filename: the name with its markup extension removed, nothing else
pub fn slug_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if !MARKUP_EXT.is_match(name) {
        return None;
    }
    Some(MARKUP_EXT.replace(name, "").into_owned())
}

/// Slugs and page names are single path components
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_recursive_and_flat() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "a.md");
        touch(root, "b.mdx");
        touch(root, "notes.txt");
        touch(root, "README.markdown");
        touch(root, "networking/c.md");
        touch(root, "networking/deep/d.mdx");

        let all = find_markup_files(root, Depth::Recursive).unwrap();
        assert_eq!(
            names(root, &all),
            vec!["a.md", "b.mdx", "networking/c.md", "networking/deep/d.mdx"]
        );

        let flat = find_markup_files(root, Depth::Flat).unwrap();
        assert_eq!(names(root, &flat), vec!["a.md", "b.mdx"]);
    }

    #[test]
    fn test_directory_named_like_markup_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("drafts.md")).unwrap();
        touch(dir.path(), "drafts.md/inner.md");

        let flat = find_markup_files(dir.path(), Depth::Flat).unwrap();
        assert!(flat.is_empty());
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = find_markup_files(&dir.path().join("nope"), Depth::Recursive).unwrap_err();
        assert!(matches!(err, ContentError::DirectoryUnavailable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_entries_keep_siblings() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "a.md");
        touch(root, "sub/z.md");
        // Dangling link and a link back to the root both fail mid-walk
        symlink(root.join("nowhere.md"), root.join("bad.md")).unwrap();
        symlink(root, root.join("sub/loop")).unwrap();

        let files = find_markup_files(root, Depth::Recursive).unwrap();
        assert_eq!(names(root, &files), vec!["a.md", "sub/z.md"]);

        let flat = find_markup_files(root, Depth::Flat).unwrap();
        assert_eq!(names(root, &flat), vec!["a.md"]);
    }

    #[test]
    fn test_slug_from_path() {
        assert_eq!(slug_from_path(Path::new("posts/x/hello.md")).as_deref(), Some("hello"));
        assert_eq!(slug_from_path(Path::new("hello.world.mdx")).as_deref(), Some("hello.world"));
        assert_eq!(slug_from_path(Path::new("Mixed Case.md")).as_deref(), Some("Mixed Case"));
        assert_eq!(slug_from_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn test_is_safe_slug() {
        assert!(is_safe_slug("hello-world"));
        assert!(!is_safe_slug("../secret"));
        assert!(!is_safe_slug(".."));
        assert!(!is_safe_slug(""));
    }
}
