use {
    crate::{error::ReleaseError, Result},
    std::{
        fs,
        io::{self, Write},
        path::{Path, PathBuf},
    },
    tempfile::{Builder, NamedTempFile},
    walkdir::{DirEntry, WalkDir},
};

#[cfg(unix)]
fn new_file_builder() -> Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    // 0o666 minus the process umask, like a plain create
    let mut builder = Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn new_file_builder() -> Builder<'static, 'static> {
    Builder::new()
}

/// A temp file in `dir` carrying the permissions `target` has now.
fn temp_for(dir: &Path, target: &Path) -> io::Result<NamedTempFile> {
    match fs::metadata(target) {
        Ok(meta) => {
            let temp = NamedTempFile::new_in(dir)?;
            temp.as_file().set_permissions(meta.permissions())?;
            Ok(temp)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => new_file_builder().tempfile_in(dir),
        Err(e) => Err(e),
    }
}

/// Replaces `path` with `contents` in one step: the data is written to a
/// temporary file in the same directory and renamed over the target, so readers
/// see either the old file or the complete new one. An existing file keeps its
/// permissions.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = temp_for(dir, path).map_err(|e| ReleaseError::io(dir, e))?;
    temp.write_all(contents.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| ReleaseError::io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| ReleaseError::io(path, e.error))?;
    Ok(())
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "node_modules" || name.starts_with('.')
}

/// Every directory below `root` (excluding `root` itself), as paths relative to
/// `root`, in a stable file-name order. `node_modules` and hidden directories are
/// not descended into.
pub fn find_candidate_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut results = vec![];
    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_ignored_dir(entry))
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ReleaseError::io(path, e.into())
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            results.push(relative.to_path_buf());
        }
    }
    Ok(results)
}
