//! In-memory staging for generated patch files.
//!
//! Patch text and binary payloads are accumulated in memory and only ever
//! touch the filesystem at teardown: if the keep flag for the buffer's
//! origin is set the content is written to the real path, otherwise any
//! stale file from a previous run is deleted. The patch engine consumes a
//! finalized snapshot (buffer + path) without the file ever existing.

use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use log::warn;

/// Which tool stage produced a staged patch. Selects which keep flag
/// governs whether the file survives teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOrigin {
    Inserter,
    Remapper,
}

/// Keep flags for intermediate patch files. Plain configuration fixed at
/// startup; every staging buffer captures its own flag at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct StagingConfig {
    pub keep_inserter: bool,
    pub keep_remapper: bool,
}

impl StagingConfig {
    fn keeps(&self, origin: PatchOrigin) -> bool {
        match origin {
            PatchOrigin::Inserter => self.keep_inserter,
            PatchOrigin::Remapper => self.keep_remapper,
        }
    }
}

/// Text or binary output. The accumulator is byte-exact either way; the
/// mode only records how the file was meant to be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Text,
    Binary,
}

/// Read-only view of a finalized patch, handed to the patch engine. The
/// path is the lowercased form, which is what the engine classifies by
/// extension.
pub struct PatchSnapshot<'a> {
    pub buffer: &'a [u8],
    pub path: &'a str,
}

/// A staged patch file. Append with `write!`/`writeln!` (formatted text)
/// and [`PatchFile::write_bytes`] (raw payloads), then [`PatchFile::finalize`]
/// before taking a snapshot.
pub struct PatchFile {
    fs_path: PathBuf,
    path_lower: String,
    data: Vec<u8>,
    finalized: bool,
    mode: OpenMode,
    origin: PatchOrigin,
    keep: bool,
}

impl PatchFile {
    pub fn new<P: AsRef<Path>>(
        path: P,
        mode: OpenMode,
        origin: PatchOrigin,
        config: &StagingConfig,
    ) -> PatchFile {
        let fs_path = path.as_ref().to_path_buf();
        let path_lower = fs_path.to_string_lossy().to_lowercase();
        PatchFile {
            fs_path,
            path_lower,
            data: Vec::new(),
            finalized: false,
            mode,
            origin,
            keep: config.keeps(origin),
        }
    }

    /// Append raw bytes verbatim. Used for binary payloads interleaved
    /// with formatted text.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.finalized = false;
        self.data.extend_from_slice(bytes);
    }

    /// Mark the accumulated content complete so a snapshot can be taken.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// View of the finalized content. `None` until `finalize` runs, and
    /// again after any later append invalidates it. Because this is a
    /// borrow resolved against the current buffer, moving the `PatchFile`
    /// cannot leave a snapshot dangling.
    pub fn snapshot(&self) -> Option<PatchSnapshot<'_>> {
        if !self.finalized {
            return None;
        }
        Some(PatchSnapshot {
            buffer: &self.data,
            path: &self.path_lower,
        })
    }

    /// Clear accumulated content for reuse across logical outputs.
    pub fn reset(&mut self) {
        self.data.clear();
        self.finalized = false;
    }

    /// Target path with its original casing.
    pub fn path(&self) -> &Path {
        &self.fs_path
    }

    /// Lowercased target path, for extension-based classification.
    pub fn path_lower(&self) -> &str {
        &self.path_lower
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn origin(&self) -> PatchOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Write for PatchFile {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.finalized = false;
        self.data.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl Drop for PatchFile {
    fn drop(&mut self) {
        if self.keep {
            if let Err(e) = fs::write(&self.fs_path, &self.data) {
                warn!(
                    "Failed to keep patch file {}: {}",
                    self.fs_path.display(),
                    e
                );
            }
        } else if self.fs_path.exists() {
            if let Err(e) = fs::remove_file(&self.fs_path) {
                warn!(
                    "Failed to remove stale patch file {}: {}",
                    self.fs_path.display(),
                    e
                );
            }
        }
    }
}
