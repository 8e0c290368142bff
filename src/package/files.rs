// src/package/files.rs

//! Per-package file lists grouped by directory

use std::collections::{HashMap, HashSet};

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    pub basename: String,
    pub is_dir: bool,
}

/// All entries a package installs below one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDir {
    pub dirname: String,
    pub entries: Vec<FileEntry>,
}

/// A package's file list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    dirs: Vec<FileDir>,
    /// dirname -> position in `dirs`
    dir_pos: HashMap<String, usize>,
    seen: HashSet<(usize, FileEntry)>,
}

/// Split an absolute path into (directory, basename)
///
/// A trailing `/` is ignored; the parent of a top-level entry is `/`.
pub fn split_path(path: &str) -> (&str, &str) {
    let trimmed = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };
    match trimmed.rsplit_once('/') {
        Some(("", base)) => ("/", base),
        Some((dir, base)) => (dir, base),
        None => ("", trimmed),
    }
}

/// Normalize a directory path: no trailing slash except for the root
pub fn normalize_dir(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

impl FileList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path. Paths ending in `/` are recorded as directory entries.
    pub fn add(&mut self, path: &str) {
        let is_dir = path.len() > 1 && path.ends_with('/');
        let (dir, base) = split_path(path);
        if base.is_empty() {
            return;
        }

        let pos = match self.dir_pos.get(dir) {
            Some(&pos) => pos,
            None => {
                self.dirs.push(FileDir {
                    dirname: dir.to_string(),
                    entries: Vec::new(),
                });
                self.dir_pos.insert(dir.to_string(), self.dirs.len() - 1);
                self.dirs.len() - 1
            }
        };

        let entry = FileEntry {
            basename: base.to_string(),
            is_dir,
        };
        if self.seen.insert((pos, entry.clone())) {
            self.dirs[pos].entries.push(entry);
        }
    }

    pub fn dirs(&self) -> &[FileDir] {
        &self.dirs
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Number of entries across all directories
    pub fn len(&self) -> usize {
        self.seen.len()
    }
}
