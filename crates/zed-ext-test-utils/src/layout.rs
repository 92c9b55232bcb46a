//! [`TestExtensionsDir`], a temporary extensions base directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::extension::ExtensionFixture;

/// A temporary `<base>` with the `installed/` + `index.json` layout.
///
/// # Example
///
/// ```rust
/// use zed_ext_test_utils::extension::ExtensionFixture;
/// use zed_ext_test_utils::layout::TestExtensionsDir;
///
/// let dir = TestExtensionsDir::new();
/// dir.install(&ExtensionFixture::new("foo", "1.0.0"));
/// dir.assert_exists("installed/foo/extension.toml");
/// ```
pub struct TestExtensionsDir {
    temp_dir: TempDir,
}

impl Default for TestExtensionsDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestExtensionsDir {
    /// Create an empty base directory (no `installed/`, no index).
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn installed(&self) -> PathBuf {
        self.base().join("installed")
    }

    pub fn index_path(&self) -> PathBuf {
        self.base().join("index.json")
    }

    /// Write a fixture into `installed/<id>` as if it had been extracted.
    pub fn install(&self, fixture: &ExtensionFixture) -> PathBuf {
        let dir = self.installed().join(&fixture.id);
        fixture.write_to(&dir);
        dir
    }

    /// Write raw content to `index.json`.
    pub fn write_index(&self, content: &str) {
        fs::write(self.index_path(), content).unwrap();
    }

    /// Read `index.json` as text.
    ///
    /// # Panics
    /// Panics if the file is missing.
    pub fn read_index(&self) -> String {
        fs::read_to_string(self.index_path()).unwrap_or_else(|e| panic!("read index.json: {e}"))
    }

    /// Assert that `path` (relative to the base) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, path: &str) {
        let full_path = self.base().join(path);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the base) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_exists(&self, path: &str) {
        let full_path = self.base().join(path);
        assert!(
            !full_path.exists(),
            "Expected path NOT to exist: {}",
            full_path.display()
        );
    }
}
