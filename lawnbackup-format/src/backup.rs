use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;

use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::host::{ArchiveSink, ArchiveSource, FileLocations, OperationFlag, OperationGuard};
use crate::meta::Meta;
use crate::zip::{ZipReader, ZipWriter};
use crate::{Contents, META_ENTRY_NAME};

/// One backup archive at a host-provided location.
///
/// Metadata is read lazily and at most once per instance; restore opens
/// its own stream and may run any number of times.
pub struct Backup<S> {
    source: S,
    meta: OnceLock<Option<Meta>>,
}

impl<S: ArchiveSource> Backup<S> {
    pub fn new(source: S) -> Backup<S> {
        Backup {
            source,
            meta: OnceLock::new(),
        }
    }

    /// The host-provided archive location this backup reads from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The archive's metadata record, or `None` for a foreign, corrupted
    /// or metadata-less archive — an expected outcome, not a failure.
    /// Computed once and cached for the lifetime of this instance.
    pub fn meta(&self) -> Option<&Meta> {
        self.meta
            .get_or_init(|| match self.try_read_meta() {
                Ok(meta) => Some(meta),
                Err(err) => {
                    error!("unable to read meta: {err}");
                    None
                }
            })
            .as_ref()
    }

    /// Scan the archive in stored order for the reserved metadata entry
    /// and decode it, stopping at the first match.
    ///
    /// Unlike [`meta`](Backup::meta) this neither caches nor collapses the
    /// failure reason.
    pub fn try_read_meta(&self) -> Result<Meta> {
        let stream = self.source.open_readable()?;
        let mut reader = ZipReader::open(stream)?;
        let index = reader
            .entries()
            .iter()
            .position(|entry| entry.name() == META_ENTRY_NAME)
            .ok_or(Error::MetaEntryAbsent)?;

        let mut bytes = Vec::new();
        reader.copy_entry(index, &mut bytes)?;
        let text = std::str::from_utf8(&bytes).map_err(|_| Error::MetaNotUtf8)?;
        Meta::from_json(text)
    }

    /// Overwrite destination files from matching archive entries.
    ///
    /// Returns `false` on any failure. Files already rewritten stay on
    /// disk — restore is not transactional across the two destinations,
    /// so a failed call can leave application state inconsistent and the
    /// host must warn accordingly.
    pub fn restore(&self, locations: &dyn FileLocations, contents: Contents) -> bool {
        match self.try_restore(locations, contents) {
            Ok(()) => true,
            Err(err) => {
                error!("failed to restore: {err}");
                false
            }
        }
    }

    /// Structured-error form of [`restore`](Backup::restore).
    pub fn try_restore(&self, locations: &dyn FileLocations, contents: Contents) -> Result<()> {
        let database_file = locations.database_file();
        let settings_file = locations.settings_file();

        let stream = self.source.open_readable()?;
        let mut reader = ZipReader::open(stream)?;
        for index in 0..reader.entries().len() {
            let name = reader.entries()[index].name().to_string();
            debug!(name = %name, "found entry");

            let dest = if matches_base_name(&name, &database_file) {
                if !contents.contains(Contents::HOMESCREEN) {
                    continue;
                }
                &database_file
            } else if matches_base_name(&name, &settings_file) {
                if !contents.contains(Contents::SETTINGS) {
                    continue;
                }
                &settings_file
            } else {
                // Unrecognized entries are skipped, never an error.
                continue;
            };

            debug!(name = %name, dest = %dest.display(), "restoring entry");
            let mut out = BufWriter::new(File::create(dest)?);
            reader.copy_entry(index, &mut out)?;
            out.flush()?;
        }
        Ok(())
    }
}

/// Author a new archive at `target`: the metadata entry first, then one
/// entry per selected application file.
///
/// Returns `false` on any failure; bytes already flushed to the target are
/// not rolled back, so the caller must treat a failed create as "discard
/// the output location".
pub fn create<K: ArchiveSink>(
    target: &K,
    name: &str,
    contents: Contents,
    locations: &dyn FileLocations,
    flag: &dyn OperationFlag,
) -> bool {
    match try_create(target, name, contents, locations, flag) {
        Ok(()) => true,
        Err(err) => {
            error!("failed to create backup: {err}");
            false
        }
    }
}

/// Structured-error form of [`create`].
pub fn try_create<K: ArchiveSink>(
    target: &K,
    name: &str,
    contents: Contents,
    locations: &dyn FileLocations,
    flag: &dyn OperationFlag,
) -> Result<()> {
    let mut files = Vec::new();
    if contents.contains(Contents::HOMESCREEN) {
        files.push(locations.database_file());
    }
    if contents.contains(Contents::SETTINGS) {
        files.push(locations.settings_file());
    }

    let _guard = OperationGuard::raise(flag);

    let stream = target.open_writable()?;
    let mut writer = ZipWriter::new(stream);

    let meta = Meta::now(name, contents);
    let meta_json = meta.to_json();
    writer.append(META_ENTRY_NAME, &mut meta_json.as_bytes())?;

    for file in &files {
        let entry_name = base_name(file)?;
        debug!(name = entry_name, source = %file.display(), "adding entry");
        let mut input = BufReader::new(File::open(file)?);
        writer.append(entry_name, &mut input)?;
    }

    writer.finish()?;
    Ok(())
}

fn matches_base_name(entry_name: &str, path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == entry_name)
}

fn base_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::Io(std::io::Error::other("source file has no base name")))
}
