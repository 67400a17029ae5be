// src/io/locate.rs

use std::fs;
use std::path::{Path, PathBuf};

/// How a companion file of a run should be found.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FileHint {
    /// Caller does not want this file
    Skip,
    /// Take the first file in the directory with a matching extension
    #[default]
    Search,
    /// File name relative to the run directory
    Path(PathBuf),
}

/// Resolves a companion file inside `dir`. `None` means absent, never an error.
pub fn locate(dir: &Path, hint: &FileHint, extension: &str) -> Option<PathBuf> {
    match hint {
        FileHint::Skip => None,
        FileHint::Path(name) if name.to_string_lossy().contains(extension) => Some(dir.join(name)),
        // A name without the extension falls back to searching, like a bare "yes"
        FileHint::Path(_) | FileHint::Search => {
            let found = search(dir, extension);
            if found.is_none() {
                log::warn!("no file ending in {} found in {}", extension, dir.display());
            }
            found
        }
    }
}

fn search(dir: &Path, extension: &str) -> Option<PathBuf> {
    let needle = extension.to_lowercase();
    let mut names: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    names.sort();

    names.into_iter().find(|path| {
        path.file_name()
            .map(|n| n.to_string_lossy().to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ccmp_locate_{}_{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_skip_is_absent() {
        let dir = scratch("skip");
        fs::write(dir.join("run.MDE"), "1 2\n").unwrap();
        assert_eq!(locate(&dir, &FileHint::Skip, ".MDE"), None);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let dir = scratch("search");
        fs::write(dir.join("b.fdf"), "").unwrap();
        fs::write(dir.join("a.FDF"), "").unwrap();
        assert_eq!(locate(&dir, &FileHint::Search, ".fdf"), Some(dir.join("a.FDF")));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_explicit_name_is_joined_without_search() {
        let dir = scratch("explicit");
        assert_eq!(
            locate(&dir, &FileHint::Path("water.ANI".into()), ".ANI"),
            Some(dir.join("water.ANI"))
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = scratch("missing");
        assert_eq!(locate(&dir, &FileHint::Search, ".ANI"), None);
        assert_eq!(locate(&dir, &FileHint::Path("notes.txt".into()), ".ANI"), None);
        fs::remove_dir_all(&dir).unwrap();
    }
}
