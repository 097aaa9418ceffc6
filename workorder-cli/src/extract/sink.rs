//! Destinations for rendered extract files
//!
//! - [`FolderSink`] writes into a fresh `Extracted*` directory on disk
//! - [`ZipSink`] collects everything into one in-memory zip archive

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Base name of the output directory created beside the input file
pub const OUTPUT_DIR_NAME: &str = "Extracted";

/// Download name of the archive produced in archive mode
pub const ARCHIVE_FILE_NAME: &str = "Extracted_Files.zip";

/// Receives each rendered extract file
pub trait OutputSink {
    /// Store one file; returns the name it was stored under
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<String>;
}

/// Writes extracts into a directory, never overwriting existing files
#[derive(Debug)]
pub struct FolderSink {
    dir: PathBuf,
}

impl FolderSink {
    /// Use an existing directory as-is
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create `Extracted` (or `Extracted1`, `Extracted2`, ...) beside `input`
    pub fn create_beside(input: &Path) -> Result<Self> {
        let parent = match input.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dir = create_unique_dir(&parent, OUTPUT_DIR_NAME)?;
        log::info!("Writing extracts to {}", dir.display());
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputSink for FolderSink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<String> {
        let path = next_free_file(&self.dir, name);
        if path.file_name().and_then(|n| n.to_str()) != Some(name) {
            log::debug!("{} already exists, writing {} instead", name, path.display());
        }

        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write extract file: {}", path.display()))?;

        Ok(path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string()))
    }
}

/// Create `{parent}/{base}`, or the first free `{base}1`, `{base}2`, ...
///
/// Directory creation is the claim: a name that already exists (file or
/// directory) is skipped.
pub fn create_unique_dir(parent: &Path, base: &str) -> Result<PathBuf> {
    let mut suffix = 0usize;
    loop {
        let name = if suffix == 0 {
            base.to_string()
        } else {
            format!("{}{}", base, suffix)
        };
        let candidate = parent.join(name);

        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to create output directory: {}", candidate.display())
                });
            }
        }
    }
}

/// First path in `dir` for `name` that does not exist yet
///
/// `report.xlsx` -> `report.xlsx`, `report_1.xlsx`, `report_2.xlsx`, ...
pub fn next_free_file(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    (1usize..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{}_{}.{}", stem, n, ext)),
            None => dir.join(format!("{}_{}", stem, n)),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Collects extracts into an in-memory zip archive
pub struct ZipSink {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl ZipSink {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entries: 0,
        }
    }

    /// Finalize the archive and return its bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        log::debug!("Finalizing zip archive with {} entries", self.entries);
        let cursor = self.writer.finish().context("Failed to finalize zip archive")?;
        Ok(cursor.into_inner())
    }
}

impl Default for ZipSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for ZipSink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<String> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        self.writer
            .start_file(name, options)
            .with_context(|| format!("Failed to add {} to zip archive", name))?;
        self.writer
            .write_all(bytes)
            .with_context(|| format!("Failed to write {} to zip archive", name))?;

        self.entries += 1;
        Ok(name.to_string())
    }
}
