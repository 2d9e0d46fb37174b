//! The CLI's rendition of the host application: launcher state rooted at a
//! profile directory, with a marker file as the operation side-channel.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lawnbackup_format::{FileLocations, OperationFlag};
use tracing::warn;

pub const DATABASE_FILE: &str = "launcher.db";
pub const SETTINGS_FILE: &str = "preferences.xml";
const BACKUP_DIR: &str = "backups";
const MARKER_FILE: &str = ".backup-in-progress";

/// Launcher state rooted at a profile directory.
pub struct Profile {
    root: PathBuf,
}

impl Profile {
    pub fn new(root: PathBuf) -> Profile {
        Profile { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileLocations for Profile {
    fn database_file(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    fn backup_folder(&self) -> PathBuf {
        self.root.join(BACKUP_DIR)
    }
}

/// Marker file standing in for the launcher's "operation in progress"
/// preference while a CLI run owns the profile.
pub struct MarkerFlag {
    path: PathBuf,
}

impl MarkerFlag {
    pub fn new(root: &Path) -> MarkerFlag {
        MarkerFlag {
            path: root.join(MARKER_FILE),
        }
    }
}

impl OperationFlag for MarkerFlag {
    fn set_in_progress(&self, active: bool) {
        let result = if active {
            fs::write(&self.path, b"")
        } else {
            match fs::remove_file(&self.path) {
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                other => other,
            }
        };
        if let Err(err) = result {
            warn!("cannot update {}: {err}", self.path.display());
        }
    }
}
