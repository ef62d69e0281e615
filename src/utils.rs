use crate::errors::ConcatError;
use std::path::{Component, Path, PathBuf};
use tokio::fs as async_fs;

/// Lexically normalizes a path: drops `.` components and folds `name/..`
/// pairs without touching the file system. An empty result becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` above the root is the root.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Directory containing `path`; empty for a bare file name.
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Moves `levels` directories up from `dir`.
pub fn ascend(dir: &Path, levels: usize) -> PathBuf {
    let mut current = dir.to_path_buf();
    for _ in 0..levels {
        current.push("..");
    }
    normalize_path(&current)
}

/// Forward-slash rendering used for pattern matching.
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

pub async fn read_file_content(path: &Path) -> Result<String, ConcatError> {
    async_fs::read_to_string(path)
        .await
        .map_err(|err| ConcatError::file_read(path, err))
}
