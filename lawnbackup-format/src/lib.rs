//! Herein lies the brains of the Lawnchair backup archive format.
//!
//! An archive is an ordinary zip file whose first entry, named
//! [`META_ENTRY_NAME`], is a small positional-JSON record describing the
//! backup; the remaining entries carry the raw bytes of the application
//! files that were selected at backup time.
//!
//! Use [`Backup`] to inspect or restore an existing archive, [`create`] to
//! author a new one, and [`MetaLoader`] to read metadata off the calling
//! thread.

mod backup;
mod contents;
mod error;
mod host;
mod loader;
mod meta;
pub mod zip;

pub use backup::{create, try_create, Backup};
pub use contents::Contents;
pub use error::{Error, Result};
pub use host::{
    ensure_backup_folder, ArchiveSink, ArchiveSource, FileLocations, OperationFlag, OperationGuard,
};
pub use loader::{LoadState, MetaLoader};
pub use meta::{Meta, META_VERSION};

/// Reserved name of the metadata entry, always written first.
pub const META_ENTRY_NAME: &str = "meta";

/// File extension for backup archives.
pub const EXTENSION: &str = "lawnchairbackup";

/// Advertised media type of a backup archive.
pub const MIME_TYPE: &str = "application/vnd.lawnchair.backup";

/// Media types accepted when picking an archive, most specific first.
pub const EXTRA_MIME_TYPES: [&str; 3] =
    [MIME_TYPE, "application/x-zip", "application/octet-stream"];

/// Size of the intermediate buffer used when streaming entry bytes.
/// Tunable; not format-relevant.
pub(crate) const COPY_BUFFER: usize = 8 * 1024;
