//! Seams to the host application: where the state files live, how archive
//! byte streams are opened, and the "operation in progress" side-channel.

use std::fs::{self, File};
use std::io::{Read, Seek, Write};
use std::path::PathBuf;

/// Resolves where the application state files live on disk.
///
/// Restore and create resolve destination/source paths exclusively through
/// this trait; archive entry names are matched against the base file names
/// of the returned paths.
pub trait FileLocations {
    /// The structured database file.
    fn database_file(&self) -> PathBuf;

    /// The preferences/settings file.
    fn settings_file(&self) -> PathBuf;

    /// Default directory offered for storing archives.
    fn backup_folder(&self) -> PathBuf;
}

/// Opens a readable byte stream for an archive location.
pub trait ArchiveSource {
    type Stream: Read + Seek;

    fn open_readable(&self) -> std::io::Result<Self::Stream>;
}

/// Opens a writable byte stream for an archive location.
pub trait ArchiveSink {
    type Stream: Write + Seek;

    fn open_writable(&self) -> std::io::Result<Self::Stream>;
}

impl ArchiveSource for PathBuf {
    type Stream = File;

    fn open_readable(&self) -> std::io::Result<File> {
        File::open(self)
    }
}

impl ArchiveSink for PathBuf {
    type Stream = File;

    fn open_writable(&self) -> std::io::Result<File> {
        File::create(self)
    }
}

/// Host side-channel noting that a backup or restore is underway, used to
/// suppress conflicting activity for the duration.
pub trait OperationFlag {
    fn set_in_progress(&self, active: bool);
}

/// Raises the flag for as long as it lives.
///
/// Dropping clears the flag on every exit path, normal return and unwind
/// alike, so no failure can leave the host believing an operation is still
/// running.
pub struct OperationGuard<'a> {
    flag: &'a dyn OperationFlag,
}

impl<'a> OperationGuard<'a> {
    pub fn raise(flag: &'a dyn OperationFlag) -> OperationGuard<'a> {
        flag.set_in_progress(true);
        OperationGuard { flag }
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.flag.set_in_progress(false);
    }
}

/// The default storage folder for archives, created if absent.
pub fn ensure_backup_folder(locations: &dyn FileLocations) -> std::io::Result<PathBuf> {
    let folder = locations.backup_folder();
    if !folder.exists() {
        fs::create_dir_all(&folder)?;
    }
    Ok(folder)
}
