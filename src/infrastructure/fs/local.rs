//! Local Host File System
//!
//! Implements the HostFs port with `std::fs`, for hosts configured as
//! `local` and for tests against a temporary deployment root.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::domain::ports::{DirInfo, FsError, FsResult, HostFs, SyncSpec, TransferStats};
use crate::infrastructure::sync::sync_tree;

#[derive(Debug, Clone)]
pub struct LocalHostFs {
    host: String,
}

impl LocalHostFs {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl Default for LocalHostFs {
    fn default() -> Self {
        Self::new("local")
    }
}

/// Sibling name for a link being swapped in
pub(crate) fn temp_link_name(link: &Path) -> PathBuf {
    let name = link
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "link".to_string());
    let nonce = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    link.with_file_name(format!(".{}.tmp-{}-{}", name, std::process::id(), nonce))
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

impl HostFs for LocalHostFs {
    fn host(&self) -> &str {
        &self.host
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        fs::create_dir_all(path).map_err(|e| FsError::io(path, e))
    }

    fn create_dir_exclusive(&self, path: &Path) -> FsResult<bool> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        match fs::create_dir(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(FsError::io(path, e)),
        }
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> FsResult<()> {
        sync_tree(src, dst, &SyncSpec::overlay())?;
        Ok(())
    }

    fn sync_tree(&self, src: &Path, dst: &Path, spec: &SyncSpec) -> FsResult<TransferStats> {
        Ok(sync_tree(src, dst, spec)?)
    }

    fn list_dirs(&self, path: &Path) -> FsResult<Vec<DirInfo>> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(FsError::io(path, e)),
        };

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::io(path, e))?;
            let meta = fs::symlink_metadata(entry.path()).map_err(|e| FsError::io(&entry.path(), e))?;
            if !meta.is_dir() {
                continue;
            }
            let modified = meta.modified().map_err(|e| FsError::io(&entry.path(), e))?;
            dirs.push(DirInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                modified,
            });
        }
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(dirs)
    }

    fn remove_dir_all(&self, path: &Path) -> FsResult<()> {
        fs::remove_dir_all(path).map_err(|e| FsError::io(path, e))
    }

    fn remove_file(&self, path: &Path) -> FsResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FsError::io(path, e)),
        }
    }

    fn read_link(&self, path: &Path) -> FsResult<Option<PathBuf>> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                fs::read_link(path).map(Some).map_err(|e| FsError::io(path, e))
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FsError::io(path, e)),
        }
    }

    fn replace_symlink(&self, target: &Path, link: &Path) -> FsResult<()> {
        if let Some(parent) = link.parent() {
            self.create_dir_all(parent)?;
        }
        let tmp = temp_link_name(link);
        make_symlink(target, &tmp).map_err(|e| FsError::io(&tmp, e))?;
        // rename(2) over an existing link is atomic
        if let Err(e) = fs::rename(&tmp, link) {
            let _ = fs::remove_file(&tmp);
            return Err(FsError::io(link, e));
        }
        Ok(())
    }

    fn remove_dangling_links(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(FsError::io(dir, e)),
        };

        let mut removed = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::io(dir, e))?;
            let path = entry.path();
            let is_link = fs::symlink_metadata(&path)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(false);
            if is_link && fs::metadata(&path).is_err() {
                fs::remove_file(&path).map_err(|e| FsError::io(&path, e))?;
                removed.push(path);
            }
        }
        removed.sort();
        Ok(removed)
    }

    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        fs::read_to_string(path).map_err(|e| FsError::io(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        let parent = path
            .parent()
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))?;
        self.create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| FsError::io(parent, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| FsError::io(path, e))?;
        tmp.persist(path).map_err(|e| FsError::io(path, e.error))?;
        Ok(())
    }

    fn append(&self, path: &Path, content: &str) -> FsResult<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| FsError::io(path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| FsError::io(path, e))
    }

    fn modified(&self, path: &Path) -> FsResult<SystemTime> {
        fs::symlink_metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| FsError::io(path, e))
    }
}
