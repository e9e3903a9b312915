//! Glob-based content discovery.

use std::path::{Component, Path, PathBuf};

use blogsmith_core::{GlobPattern, LoaderConfig};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;

/// Finds files matching a glob pattern under a base directory.
#[derive(Debug, Clone)]
pub struct GlobLoader {
    pattern: GlobPattern,
    base: PathBuf,
}

impl GlobLoader {
    /// Create a loader for `pattern` under `base` (relative to the project root).
    pub fn new(pattern: &str, base: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            pattern: GlobPattern::new(pattern)?,
            base: normalize(base.as_ref()),
        })
    }

    /// Build a loader from its configuration.
    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        Self::new(&config.pattern, &config.base)
    }

    pub fn pattern(&self) -> &GlobPattern {
        &self.pattern
    }

    /// Base directory relative to the project root.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Absolute (or root-joined) base directory.
    pub fn base_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.base)
    }

    /// Discover matching files, returned sorted and relative to the base.
    ///
    /// Hidden entries and files starting with `_` are skipped, symlinks are
    /// not followed, and a missing base directory yields nothing.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let base_dir = self.base_dir(root);
        if !base_dir.is_dir() {
            warn!(base = %base_dir.display(), "loader base directory does not exist");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&base_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() || is_partial(&entry) {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&base_dir) else {
                continue;
            };

            if self.pattern.is_match(relative) {
                files.push(relative.to_path_buf());
            } else {
                debug!(path = %relative.display(), pattern = %self.pattern, "not matched");
            }
        }

        files.sort();
        Ok(files)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_partial(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('_')
}

/// Drop `.` components so `./src/content/post` and `src/content/post` agree.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, "---\ntitle: x\n---\n").expect("write");
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("create temp dir");
        touch(dir.path(), "src/content/post/b.md");
        touch(dir.path(), "src/content/post/a.md");
        touch(dir.path(), "src/content/post/2024/c.md");
        touch(dir.path(), "src/content/post/cover.png");
        touch(dir.path(), "src/content/post/_partial.md");
        touch(dir.path(), "src/content/post/.hidden/d.md");
        touch(dir.path(), "src/pages/post/legacy.md");
        touch(dir.path(), "src/content/outside.md");
        dir
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = site();
        let loader = GlobLoader::new("**/*.md", "./src/content/post").expect("loader");
        let files = loader.discover(dir.path()).expect("discover");

        assert_eq!(
            files,
            vec![
                PathBuf::from("2024/c.md"),
                PathBuf::from("a.md"),
                PathBuf::from("b.md"),
            ]
        );
    }

    #[test]
    fn test_base_directory_decides_discovery() {
        let dir = site();
        let content = GlobLoader::new("**/*.md", "src/content/post").expect("loader");
        let pages = GlobLoader::new("**/*.md", "src/pages/post").expect("loader");

        let from_content = content.discover(dir.path()).expect("discover");
        let from_pages = pages.discover(dir.path()).expect("discover");

        assert_eq!(from_pages, vec![PathBuf::from("legacy.md")]);
        assert!(!from_content.contains(&PathBuf::from("legacy.md")));
        // Sibling of the base is never picked up.
        assert!(
            from_content
                .iter()
                .all(|p| !p.to_string_lossy().contains("outside"))
        );
    }

    #[test]
    fn test_top_level_only_pattern() {
        let dir = site();
        let loader = GlobLoader::new("*.md", "src/content/post").expect("loader");
        let files = loader.discover(dir.path()).expect("discover");
        assert_eq!(files, vec![PathBuf::from("a.md"), PathBuf::from("b.md")]);
    }

    #[test]
    fn test_missing_base_is_empty() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let loader = GlobLoader::new("**/*.md", "nope").expect("loader");
        assert!(loader.discover(dir.path()).expect("discover").is_empty());
    }

    #[test]
    fn test_base_is_normalized() {
        let loader = GlobLoader::new("**/*.md", "./src/./content/post").expect("loader");
        assert_eq!(loader.base(), Path::new("src/content/post"));
    }
}
