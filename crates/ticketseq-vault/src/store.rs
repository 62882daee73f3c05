//! Access to the posts directory.
//!
//! The directory is the only source of truth; nothing is cached between
//! calls. Every read opens, reads, and closes the file. [`Staged`] layers
//! not-yet-written contents over a [`PostsDir`] so a dry run can be verified
//! exactly as if it had been committed.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use ticketseq_core::{LayoutConfig, Result, TicketError};

/// Read-only view of a set of documents.
pub trait DocumentSource {
    /// Primary-variant documents, sorted by path.
    fn primaries(&self) -> Result<Vec<PathBuf>>;

    /// Whole-file contents, or `None` if the file does not exist.
    fn read(&self, path: &Path) -> Result<Option<String>>;
}

/// The on-disk posts directory for one layout.
#[derive(Debug, Clone)]
pub struct PostsDir {
    dir: PathBuf,
    pattern: String,
    config: LayoutConfig,
}

impl PostsDir {
    /// Resolve the layout's posts directory under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Pattern`] if the directory path is not UTF-8
    /// and so cannot be turned into a file pattern.
    pub fn open(root: &Path, config: &LayoutConfig) -> Result<Self> {
        let dir = config.posts_dir_in(root);
        let dir_str = dir.to_str().ok_or_else(|| {
            TicketError::Pattern(format!("posts directory {} is not UTF-8", dir.display()))
        })?;
        let pattern = format!(
            "{}/{}-*.{}",
            glob::Pattern::escape(dir_str),
            glob::Pattern::escape(&config.file_stem),
            glob::Pattern::escape(&config.extension),
        );

        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "posts directory does not exist");
        }

        Ok(Self {
            dir,
            pattern,
            config: config.clone(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Overlay `pending` writes on this directory without touching disk.
    pub fn staged(&self, pending: impl IntoIterator<Item = (PathBuf, String)>) -> Staged<'_> {
        Staged {
            base: self,
            pending: pending.into_iter().collect(),
        }
    }
}

impl DocumentSource for PostsDir {
    fn primaries(&self) -> Result<Vec<PathBuf>> {
        let entries =
            glob::glob(&self.pattern).map_err(|e| TicketError::Pattern(e.to_string()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                TicketError::io(path, e.into())
            })?;
            if !path.is_file() {
                continue;
            }
            let translated = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| self.config.is_translated(name));
            if translated {
                continue;
            }
            paths.push(path);
        }
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &Path) -> Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TicketError::io(path, e)),
        }
    }
}

/// A [`PostsDir`] with pending contents layered on top.
#[derive(Debug)]
pub struct Staged<'a> {
    base: &'a PostsDir,
    pending: HashMap<PathBuf, String>,
}

impl DocumentSource for Staged<'_> {
    fn primaries(&self) -> Result<Vec<PathBuf>> {
        self.base.primaries()
    }

    fn read(&self, path: &Path) -> Result<Option<String>> {
        match self.pending.get(path) {
            Some(content) => Ok(Some(content.clone())),
            None => self.base.read(path),
        }
    }
}

/// Replace `path` with `contents` via a temp file in the same directory and
/// a rename, so readers never observe a half-written file. The original
/// file's permissions are kept.
///
/// # Errors
///
/// Returns [`TicketError::Io`] if any step fails; `path` is then unchanged.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| TicketError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| TicketError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| TicketError::io(tmp.path(), e))?;

    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| TicketError::io(tmp.path(), e))?;
    }

    tmp.persist(path).map_err(|e| TicketError::io(path, e.error))?;
    Ok(())
}
