//! Test utilities for zitilab
//!
//! This crate provides shared testing utilities used across the zitilab workspace.

pub mod env;
pub mod fixtures;
pub mod mock;

pub use env::{ENV_LOCK, with_isolated_env};
pub use fixtures::{
    FAKE_EXECUTABLE, release_json, tar_gz_with_member, tar_gz_with_raw_member, tar_xz_with_member,
    zip_with_member,
};
pub use mock::get_shared_mock_server;

use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// All test temporary files end up in a single gitignored location that is
/// easy to clean up by hand.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` cannot be
/// created.
///
/// # Examples
///
/// ```rust
/// use zitilab_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("test.txt");
/// std::fs::write(&file_path, "test data").unwrap();
/// // Cleanup happens automatically when temp is dropped
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Counts the entries directly inside `dir` (0 if it does not exist)
pub fn count_entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}
