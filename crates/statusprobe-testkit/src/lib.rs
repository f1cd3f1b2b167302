//! Test utilities for statusprobe
//!
//! This crate provides shared testing utilities used across the statusprobe workspace:
//! scripted TCP peers, a shared HTTP mock server and workspace-local temp dirs.

pub mod mock;
pub mod tcp;

pub use mock::{get_shared_mock_server, shared_mock_url};
pub use tcp::{ScriptedPeer, refused_port};

use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// # Panics
///
/// Panics if:
/// - Unable to determine current directory
/// - Unable to create `.tmp/` directory
/// - Unable to create temporary subdirectory
///
/// # Examples
///
/// ```rust
/// use statusprobe_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("statusprobe.toml");
/// std::fs::write(&file_path, "").unwrap();
/// // Cleanup happens automatically when temp is dropped
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    let workspace_root = std::env::current_dir().expect("Failed to get current directory");

    let tmp_base = workspace_root.join(".tmp");

    // Ensure .tmp/ exists
    std::fs::create_dir_all(&tmp_base).expect("Failed to create .tmp directory");

    // Create unique subdirectory within .tmp/
    TempDir::new_in(&tmp_base).expect("Failed to create temporary directory in .tmp/")
}
