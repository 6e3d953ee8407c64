//! Custom assertion macros for scenario tests.
//!
//! These macros provide descriptive failure messages to aid debugging.

use std::path::Path;

/// List all entries in a directory recursively (for debugging)
pub fn list_all_files(dir: &Path) -> Vec<String> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let is_link = std::fs::symlink_metadata(&path)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(false);
            if path.is_dir() && !is_link {
                files.extend(list_all_files(&path));
            } else {
                files.push(path.display().to_string());
            }
        }
    }
    files
}

/// Assert that the deployment root's active link points at a release.
///
/// # Example
/// ```ignore
/// assert_active!(env, "a1b2c3d");
/// ```
#[macro_export]
macro_rules! assert_active {
    ($env:expr, $revision:expr) => {
        let link = $env.base_path("active");
        let target = std::fs::read_link(&link).ok();
        assert_eq!(
            target,
            Some(std::path::Path::new("code").join($revision)),
            "Expected active -> code/{}.\nDeployment root:\n  {}",
            $revision,
            $crate::common::list_all_files($env.deploy_root.path()).join("\n  ")
        );
    };
}

/// Assert that command output contains a string.
///
/// # Example
/// ```ignore
/// assert_output_contains!(result, "is active");
/// ```
#[macro_export]
macro_rules! assert_output_contains {
    ($result:expr, $needle:expr) => {
        let combined = $result.combined_output();
        assert!(
            combined.contains($needle),
            "Expected output to contain '{}'.\nOutput:\n{}",
            $needle,
            combined
        );
    };
}
