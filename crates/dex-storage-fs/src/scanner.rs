//! Text document discovery by filesystem walking.

use std::fs;
use std::path::Path;

/// Collect `/`-separated paths of all `.md` files under `root`.
///
/// Hidden files and directories are skipped. Returns an empty list if the
/// root doesn't exist. Output is sorted for deterministic manifest lookup.
pub(crate) fn scan_markdown(root: &Path) -> Vec<String> {
    let mut paths = Vec::new();
    if root.is_dir() {
        scan_directory(root, "", &mut paths);
    }
    paths.sort();
    paths
}

fn scan_directory(dir: &Path, prefix: &str, paths: &mut Vec<String>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "Failed to read directory, skipping");
            return;
        }
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let rel = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };

        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        if is_dir {
            scan_directory(&entry.path(), &rel, paths);
        } else if Path::new(&name).extension().is_some_and(|e| e == "md") {
            paths.push(rel);
        }
    }
}
