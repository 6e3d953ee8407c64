//! In-process tree synchronization
//!
//! The rsync subset the engine relies on, implemented on `std::fs`:
//! recursive copy, checksum or size+mtime comparison, delete-after with
//! protect filters. Used by `LocalTransfer` and `LocalHostFs`.
//!
//! Symlinks in the source are skipped (rsync `-r` without `-l`). Symlinks in
//! the destination are never followed; they are deleted like files unless a
//! protect pattern matches them.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::domain::ports::{DeleteMode, SyncSpec, TransferError, TransferStats};
use crate::domain::value_objects::ContentHash;

/// Synchronize the contents of `src` into `dst`
pub fn sync_tree(src: &Path, dst: &Path, spec: &SyncSpec) -> Result<TransferStats, TransferError> {
    if !src.is_dir() {
        return Err(TransferError::MissingSource(src.to_path_buf()));
    }
    let protect = build_protect(dst, &spec.protect)?;

    fs::create_dir_all(dst).map_err(|e| TransferError::io(dst, e))?;

    let mut stats = TransferStats::default();
    let mut seen = HashSet::new();
    copy_dir(src, dst, Path::new(""), spec, &mut seen, &mut stats)?;

    if spec.delete == DeleteMode::DeleteAfter {
        delete_extraneous(dst, Path::new(""), &seen, &protect, &mut stats)?;
    }

    tracing::trace!(
        src = %src.display(),
        dst = %dst.display(),
        transferred = stats.transferred.len(),
        deleted = stats.deleted.len(),
        unchanged = stats.unchanged,
        "tree synced"
    );
    Ok(stats)
}

fn build_protect(root: &Path, patterns: &[String]) -> Result<Gitignore, TransferError> {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        builder
            .add_line(None, pattern)
            .map_err(|e| TransferError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
    }
    builder.build().map_err(|e| TransferError::InvalidPattern {
        pattern: patterns.join(" "),
        message: e.to_string(),
    })
}

fn copy_dir(
    src_root: &Path,
    dst_root: &Path,
    rel: &Path,
    spec: &SyncSpec,
    seen: &mut HashSet<PathBuf>,
    stats: &mut TransferStats,
) -> Result<(), TransferError> {
    let src_dir = src_root.join(rel);
    let mut entries: Vec<_> = fs::read_dir(&src_dir)
        .map_err(|e| TransferError::io(&src_dir, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| TransferError::io(&src_dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let rel_path = rel.join(entry.file_name());
        let src_path = src_root.join(&rel_path);
        let dst_path = dst_root.join(&rel_path);
        let file_type = entry
            .file_type()
            .map_err(|e| TransferError::io(&src_path, e))?;

        if file_type.is_symlink() {
            tracing::trace!(path = %src_path.display(), "skipping symlink");
            continue;
        }

        seen.insert(rel_path.clone());

        if file_type.is_dir() {
            let existing = fs::symlink_metadata(&dst_path).ok();
            match existing {
                Some(meta) if meta.is_dir() => {}
                Some(_) => {
                    fs::remove_file(&dst_path).map_err(|e| TransferError::io(&dst_path, e))?;
                    fs::create_dir(&dst_path).map_err(|e| TransferError::io(&dst_path, e))?;
                }
                None => {
                    fs::create_dir(&dst_path).map_err(|e| TransferError::io(&dst_path, e))?;
                }
            }
            copy_dir(src_root, dst_root, &rel_path, spec, seen, stats)?;
        } else if needs_copy(&src_path, &dst_path, spec.checksum)? {
            copy_file(&src_path, &dst_path, spec.checksum)?;
            stats.transferred.push(rel_path);
        } else {
            stats.unchanged += 1;
        }
    }
    Ok(())
}

fn needs_copy(src: &Path, dst: &Path, checksum: bool) -> Result<bool, TransferError> {
    let dst_meta = match fs::symlink_metadata(dst) {
        Ok(meta) => meta,
        Err(_) => return Ok(true),
    };
    if !dst_meta.is_file() {
        return Ok(true);
    }
    let src_meta = fs::metadata(src).map_err(|e| TransferError::io(src, e))?;
    if src_meta.len() != dst_meta.len() {
        return Ok(true);
    }
    if checksum {
        let a = ContentHash::from_file(src).map_err(|e| TransferError::io(src, e))?;
        let b = ContentHash::from_file(dst).map_err(|e| TransferError::io(dst, e))?;
        return Ok(a != b);
    }
    Ok(src_meta.modified().ok() != dst_meta.modified().ok())
}

/// Copy one file through a temp file in the destination directory, then rename
fn copy_file(src: &Path, dst: &Path, verify: bool) -> Result<(), TransferError> {
    let parent = dst
        .parent()
        .ok_or_else(|| TransferError::MissingSource(dst.to_path_buf()))?;

    if fs::symlink_metadata(dst).map(|m| m.is_dir()).unwrap_or(false) {
        fs::remove_dir_all(dst).map_err(|e| TransferError::io(dst, e))?;
    }

    let src_meta = fs::metadata(src).map_err(|e| TransferError::io(src, e))?;
    let mut input = fs::File::open(src).map_err(|e| TransferError::io(src, e))?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| TransferError::io(parent, e))?;
    std::io::copy(&mut input, &mut tmp).map_err(|e| TransferError::io(dst, e))?;
    tmp.flush().map_err(|e| TransferError::io(dst, e))?;

    let file = tmp.as_file();
    file.set_permissions(src_meta.permissions())
        .map_err(|e| TransferError::io(dst, e))?;
    if let Ok(modified) = src_meta.modified() {
        file.set_modified(modified)
            .map_err(|e| TransferError::io(dst, e))?;
    }

    tmp.persist(dst)
        .map_err(|e| TransferError::io(dst, e.error))?;

    if verify {
        let expected = ContentHash::from_file(src).map_err(|e| TransferError::io(src, e))?;
        let actual = ContentHash::from_file(dst).map_err(|e| TransferError::io(dst, e))?;
        if expected != actual {
            return Err(TransferError::ChecksumMismatch(dst.to_path_buf()));
        }
    }
    Ok(())
}

fn delete_extraneous(
    dst_root: &Path,
    rel: &Path,
    seen: &HashSet<PathBuf>,
    protect: &Gitignore,
    stats: &mut TransferStats,
) -> Result<(), TransferError> {
    let dir = dst_root.join(rel);
    let mut entries: Vec<_> = fs::read_dir(&dir)
        .map_err(|e| TransferError::io(&dir, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| TransferError::io(&dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let rel_path = rel.join(entry.file_name());
        let path = dst_root.join(&rel_path);
        let meta = fs::symlink_metadata(&path).map_err(|e| TransferError::io(&path, e))?;
        let is_dir = meta.is_dir();

        if protect
            .matched_path_or_any_parents(&rel_path, is_dir)
            .is_ignore()
        {
            continue;
        }

        if seen.contains(&rel_path) {
            if is_dir {
                delete_extraneous(dst_root, &rel_path, seen, protect, stats)?;
            }
            continue;
        }

        if is_dir {
            fs::remove_dir_all(&path).map_err(|e| TransferError::io(&path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| TransferError::io(&path, e))?;
        }
        stats.deleted.push(rel_path);
    }
    Ok(())
}
