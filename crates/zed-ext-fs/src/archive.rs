//! Streaming extraction of `.tar.gz` extension archives.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::path::{EntryPath, normalize_entry_path};
use crate::{Error, Result};

/// Counts of what an extraction wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
    /// Root entries and non-regular entries (symlinks, devices, ...).
    pub skipped: usize,
}

/// Extract a gzip-compressed tarball into `dest`.
///
/// Entries are processed in archive order. An entry whose normalized path
/// climbs out of `dest` aborts the extraction before anything is written
/// for it; entries already extracted stay on disk for the caller to clean
/// up. Only directories and regular files are materialized.
pub fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<ExtractSummary> {
    let file = File::open(archive_path).map_err(|e| Error::io(archive_path, e))?;
    let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));
    let entries = archive
        .entries()
        .map_err(|e| Error::archive(archive_path, e))?;

    let mut summary = ExtractSummary::default();

    for entry in entries {
        let mut entry = entry.map_err(|e| Error::archive(archive_path, e))?;
        let raw = entry
            .path()
            .map_err(|e| Error::archive(archive_path, e))?
            .into_owned();

        let relative = match normalize_entry_path(&raw) {
            EntryPath::Root => {
                summary.skipped += 1;
                continue;
            }
            EntryPath::Escapes(_) => return Err(Error::UnsafeArchivePath { entry: raw }),
            EntryPath::Inside(relative) => relative,
        };
        let target = dest.join(&relative);
        let kind = entry.header().entry_type();

        if kind.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            summary.directories += 1;
        } else if kind.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            let mode = entry.header().mode().unwrap_or(0o644);
            let mut out = create_truncated(&target, mode)?;
            io::copy(&mut entry, &mut out).map_err(|e| Error::archive(&target, e))?;
            summary.files += 1;
        } else {
            tracing::debug!(entry = %raw.display(), ?kind, "Skipping non-regular archive entry");
            summary.skipped += 1;
        }
    }

    tracing::debug!(
        files = summary.files,
        directories = summary.directories,
        skipped = summary.skipped,
        "Extracted archive"
    );
    Ok(summary)
}

fn create_truncated(path: &Path, mode: u32) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode & 0o7777);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(path).map_err(|e| Error::io(path, e))
}
