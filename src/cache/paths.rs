// Cache path utilities.
// Maps (namespace, item) store keys onto files under the cache root.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// File extension used for every stored item.
const ITEM_EXTENSION: &str = "json";

/// Get the base cache directory (~/.cache/devflags on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "devflags").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to a namespace's directory.
fn namespace_dir(root: &Path, namespace: &str) -> PathBuf {
    root.join(sanitize_name(namespace))
}

/// Path to a stored item's file.
pub fn item_path(root: &Path, namespace: &str, item: &str) -> PathBuf {
    namespace_dir(root, namespace).join(format!("{}.{}", sanitize_name(item), ITEM_EXTENSION))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    if name.is_empty() || name == "." || name == ".." {
        return "_".to_string();
    }

    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
