//! [`TarGzBuilder`] for gzip-compressed tar fixtures.
//!
//! `tar::Builder` refuses to write `..` segments and strips `./` prefixes,
//! so the `raw_*` methods write header names byte-for-byte. That is how
//! tests produce the archives real registries ship (`./extension.toml`)
//! and the ones an attacker would (`../evil`).

use std::fs;
use std::io;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{Builder, EntryType, Header};

/// In-memory `.tar.gz` builder.
///
/// # Example
///
/// ```rust
/// use zed_ext_test_utils::archive::TarGzBuilder;
///
/// let bytes = TarGzBuilder::new()
///     .raw_dir("./themes/")
///     .raw_file("./themes/dark.json", b"{}")
///     .finish();
/// assert!(!bytes.is_empty());
/// ```
pub struct TarGzBuilder {
    builder: Builder<GzEncoder<Vec<u8>>>,
}

impl Default for TarGzBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TarGzBuilder {
    pub fn new() -> Self {
        Self {
            builder: Builder::new(GzEncoder::new(Vec::new(), Compression::default())),
        }
    }

    /// Append a directory entry through the validating `tar` API.
    pub fn dir(mut self, path: &str) -> Self {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_mode(0o755);
        header.set_size(0);
        self.builder
            .append_data(&mut header, path, io::empty())
            .unwrap_or_else(|e| panic!("TarGzBuilder::dir({path}): {e}"));
        self
    }

    /// Append a regular file with mode `0644`.
    pub fn file(self, path: &str, contents: &[u8]) -> Self {
        self.file_with_mode(path, contents, 0o644)
    }

    /// Append a regular file with an explicit mode.
    pub fn file_with_mode(mut self, path: &str, contents: &[u8], mode: u32) -> Self {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(mode);
        header.set_size(contents.len() as u64);
        self.builder
            .append_data(&mut header, path, contents)
            .unwrap_or_else(|e| panic!("TarGzBuilder::file({path}): {e}"));
        self
    }

    /// Append a symlink entry.
    pub fn symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Symlink);
        header.set_mode(0o777);
        header.set_size(0);
        header
            .set_link_name(target)
            .unwrap_or_else(|e| panic!("TarGzBuilder::symlink({path}): {e}"));
        self.builder
            .append_data(&mut header, path, io::empty())
            .unwrap_or_else(|e| panic!("TarGzBuilder::symlink({path}): {e}"));
        self
    }

    /// Append a directory entry whose name is written verbatim.
    pub fn raw_dir(self, raw_path: &str) -> Self {
        self.raw_entry(raw_path, EntryType::Directory, &[], 0o755)
    }

    /// Append a regular file whose name is written verbatim.
    pub fn raw_file(self, raw_path: &str, contents: &[u8]) -> Self {
        self.raw_entry(raw_path, EntryType::Regular, contents, 0o644)
    }

    /// Append any entry with a verbatim name (must fit the 100-byte field).
    pub fn raw_entry(
        mut self,
        raw_path: &str,
        kind: EntryType,
        contents: &[u8],
        mode: u32,
    ) -> Self {
        let name = raw_path.as_bytes();
        assert!(
            name.len() < 100,
            "raw tar entry names must fit the legacy name field: {raw_path}"
        );

        let mut header = Header::new_gnu();
        header.as_old_mut().name[..name.len()].copy_from_slice(name);
        header.set_entry_type(kind);
        header.set_mode(mode);
        header.set_size(contents.len() as u64);
        header.set_cksum();
        self.builder
            .append(&header, contents)
            .unwrap_or_else(|e| panic!("TarGzBuilder::raw_entry({raw_path}): {e}"));
        self
    }

    /// Finish the archive and return the compressed bytes.
    pub fn finish(self) -> Vec<u8> {
        self.builder
            .into_inner()
            .and_then(|encoder| encoder.finish())
            .unwrap_or_else(|e| panic!("TarGzBuilder::finish: {e}"))
    }

    /// Finish the archive and write it to `path`.
    pub fn write_to(self, path: &Path) {
        let bytes = self.finish();
        fs::write(path, bytes)
            .unwrap_or_else(|e| panic!("TarGzBuilder::write_to({}): {e}", path.display()));
    }
}
