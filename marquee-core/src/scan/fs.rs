use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{MediaError, Result};

/// One immediate child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl FsEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }

    /// Final path component, lossily converted.
    pub fn name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Minimal, async-capable filesystem abstraction used by scanners.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// List the immediate children of `path`. Never recurses.
    async fn read_dir(&self, path: &Path) -> Result<Vec<FsEntry>>;
}

/// Real filesystem implementation backed by tokio::fs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for RealFs {
    async fn read_dir(&self, path: &Path) -> Result<Vec<FsEntry>> {
        let mut dir = tokio::fs::read_dir(path).await.map_err(|e| {
            MediaError::Io(std::io::Error::other(format!(
                "Failed to read directory {}: {}",
                path.display(),
                e
            )))
        })?;

        let mut entries = Vec::new();
        while let Some(entry_res) = dir.next_entry().await.transpose() {
            let entry = match entry_res {
                Ok(ent) => ent,
                Err(e) => {
                    tracing::warn!(target: "scan::fs", path = %path.display(), error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            // file_type() does not follow symlinks, metadata() does
            let is_dir = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => metadata.is_dir(),
                Err(e) => {
                    tracing::warn!(target: "scan::fs", entry = %entry.path().display(), error = %e, "skipping entry due to metadata error");
                    continue;
                }
            };

            entries.push(FsEntry {
                path: entry.path(),
                is_dir,
            });
        }

        Ok(entries)
    }
}

/// In-memory filesystem for tests.
/// Note: Paths are treated literally; callers should use consistent absolute
/// paths. Children are listed in insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFs {
    nodes: HashMap<PathBuf, Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Dir { children: Vec<PathBuf> },
    File,
}

impl InMemoryFs {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Adds a directory with no children yet, e.g. an empty extras folder.
    /// Existing entries at `path` are left as they are.
    pub fn add_dir<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        self.ensure_parent_link(&path);
        self.nodes.entry(path).or_insert_with(|| Node::Dir {
            children: Vec::new(),
        });
    }

    pub fn add_file<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        self.ensure_parent_link(&path);
        self.nodes.insert(path, Node::File);
    }

    /// Remove `path` and everything below it.
    pub fn remove<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        self.nodes.retain(|candidate, _| !candidate.starts_with(path));
        if let Some(parent) = path.parent()
            && let Some(Node::Dir { children }) = self.nodes.get_mut(parent)
        {
            children.retain(|child| child.as_path() != path);
        }
    }

    fn ensure_parent_link(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            if parent.as_os_str().is_empty() {
                return;
            }
            // Ensure parent directory exists
            if !self.nodes.contains_key(parent) {
                self.nodes.insert(
                    parent.to_path_buf(),
                    Node::Dir {
                        children: Vec::new(),
                    },
                );
                self.ensure_parent_link(parent);
            }
            if let Some(Node::Dir { children }) = self.nodes.get_mut(parent)
                && !children.iter().any(|p| p.as_path() == path)
            {
                children.push(path.to_path_buf());
            }
        }
    }
}

#[async_trait]
impl FileSystem for InMemoryFs {
    async fn read_dir(&self, path: &Path) -> Result<Vec<FsEntry>> {
        match self.nodes.get(path) {
            Some(Node::Dir { children }) => Ok(children
                .iter()
                .map(|child| FsEntry {
                    path: child.clone(),
                    is_dir: matches!(
                        self.nodes.get(child),
                        Some(Node::Dir { .. })
                    ),
                })
                .collect()),
            Some(Node::File) => Err(MediaError::Io(std::io::Error::other(
                format!("read_dir on file: {}", path.display()),
            ))),
            None => Err(MediaError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("read_dir on missing path: {}", path.display()),
            ))),
        }
    }
}
