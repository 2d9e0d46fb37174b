//! End-to-end archive behavior over real files.

use std::fs::{self, File};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tempfile::TempDir;

use lawnbackup_format::zip::{ZipReader, ZipWriter};
use lawnbackup_format::{
    create, try_create, ArchiveSource, Backup, Contents, Error, FileLocations, Meta, OperationFlag,
    EXTENSION, META_ENTRY_NAME,
};

const DATABASE_FILE: &str = "launcher.db";
const SETTINGS_FILE: &str = "preferences.xml";

struct TestProfile {
    root: TempDir,
}

impl TestProfile {
    fn new() -> TestProfile {
        TestProfile {
            root: TempDir::new().unwrap(),
        }
    }

    fn seed(database: &[u8], settings: &[u8]) -> TestProfile {
        let profile = TestProfile::new();
        fs::write(profile.database_file(), database).unwrap();
        fs::write(profile.settings_file(), settings).unwrap();
        profile
    }

    fn archive_path(&self, name: &str) -> PathBuf {
        self.root.path().join(format!("{}.{}", name, EXTENSION))
    }
}

impl FileLocations for TestProfile {
    fn database_file(&self) -> PathBuf {
        self.root.path().join(DATABASE_FILE)
    }

    fn settings_file(&self) -> PathBuf {
        self.root.path().join(SETTINGS_FILE)
    }

    fn backup_folder(&self) -> PathBuf {
        self.root.path().join("backups")
    }
}

#[derive(Default)]
struct RecordingFlag {
    transitions: Mutex<Vec<bool>>,
}

impl OperationFlag for RecordingFlag {
    fn set_in_progress(&self, active: bool) {
        self.transitions.lock().unwrap().push(active);
    }
}

/// Counts how often the archive stream is opened.
struct CountingSource {
    path: PathBuf,
    opens: AtomicUsize,
}

impl CountingSource {
    fn new(path: PathBuf) -> CountingSource {
        CountingSource {
            path,
            opens: AtomicUsize::new(0),
        }
    }
}

impl ArchiveSource for CountingSource {
    type Stream = File;

    fn open_readable(&self) -> std::io::Result<File> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        File::open(&self.path)
    }
}

fn create_archive(profile: &TestProfile, name: &str, contents: Contents) -> PathBuf {
    let path = profile.archive_path(name);
    let flag = RecordingFlag::default();
    assert!(create(&path, name, contents, profile, &flag));
    path
}

#[test]
fn daily_scenario_round_trips() {
    let profile = TestProfile::seed(b"0123456789", b"hello");
    let archive = create_archive(&profile, "Daily", Contents::HOMESCREEN | Contents::SETTINGS);

    // Exactly three entries, metadata first.
    let mut reader = ZipReader::open(File::open(&archive).unwrap()).unwrap();
    let names: Vec<_> = reader
        .entries()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, [META_ENTRY_NAME, DATABASE_FILE, SETTINGS_FILE]);

    let mut db = Vec::new();
    reader.copy_entry(1, &mut db).unwrap();
    assert_eq!(db, b"0123456789");

    let backup = Backup::new(archive);
    let meta = backup.meta().expect("meta must be present");
    assert_eq!(meta.name(), "Daily");
    assert_eq!(meta.contents().bits(), 3);
    chrono::NaiveDateTime::parse_from_str(meta.timestamp(), "%d-%m-%Y %I:%M:%S")
        .expect("timestamp must match the fixed pattern");

    // Restore only the database into a fresh profile.
    let target = TestProfile::seed(b"old db", b"old settings");
    assert!(backup.restore(&target, Contents::HOMESCREEN));
    assert_eq!(fs::read(target.database_file()).unwrap(), b"0123456789");
    assert_eq!(fs::read(target.settings_file()).unwrap(), b"old settings");
}

#[test]
fn selective_restore_intersects_masks() {
    let profile = TestProfile::seed(b"db bytes", b"settings bytes");

    // Archive carries only the settings category.
    let archive = create_archive(&profile, "SettingsOnly", Contents::SETTINGS);
    let backup = Backup::new(archive);

    // Asking for everything restores only what the archive contains.
    let target = TestProfile::seed(b"db before", b"settings before");
    assert!(backup.restore(&target, Contents::HOMESCREEN | Contents::SETTINGS));
    assert_eq!(fs::read(target.database_file()).unwrap(), b"db before");
    assert_eq!(fs::read(target.settings_file()).unwrap(), b"settings bytes");

    // Asking for a category the archive has, but the caller masked out.
    let target = TestProfile::seed(b"db before", b"settings before");
    assert!(backup.restore(&target, Contents::HOMESCREEN));
    assert_eq!(fs::read(target.settings_file()).unwrap(), b"settings before");
}

#[test]
fn empty_mask_restores_nothing_and_succeeds() {
    let profile = TestProfile::seed(b"db", b"settings");
    let archive = create_archive(&profile, "Full", Contents::HOMESCREEN | Contents::SETTINGS);

    let target = TestProfile::seed(b"db before", b"settings before");
    assert!(Backup::new(archive).restore(&target, Contents::empty()));
    assert_eq!(fs::read(target.database_file()).unwrap(), b"db before");
    assert_eq!(fs::read(target.settings_file()).unwrap(), b"settings before");
}

#[test]
fn wallpaper_bit_is_ignored_by_writer() {
    let profile = TestProfile::seed(b"db", b"settings");
    let archive = create_archive(&profile, "Wallpaper", Contents::WALLPAPER);

    let mut reader = ZipReader::open(File::open(&archive).unwrap()).unwrap();
    let names: Vec<_> = reader
        .entries()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    // The reserved bit selects no files; only the metadata entry exists.
    assert_eq!(names, [META_ENTRY_NAME]);
    drop(reader);

    let meta = Backup::new(archive).try_read_meta().unwrap();
    assert_eq!(meta.contents(), Contents::WALLPAPER);
}

#[test]
fn meta_is_read_once_and_cached() {
    let profile = TestProfile::seed(b"db", b"settings");
    let archive = create_archive(&profile, "Cached", Contents::HOMESCREEN);

    let backup = Backup::new(CountingSource::new(archive));
    let first = backup.meta().cloned();
    let second = backup.meta().cloned();
    assert_eq!(first, second);
    assert!(first.is_some());
    assert_eq!(backup.source().opens.load(Ordering::SeqCst), 1);
}

#[test]
fn corrupt_input_is_absent_not_a_crash() {
    let profile = TestProfile::new();
    let bogus = profile.root.path().join("bogus.bin");
    fs::write(&bogus, b"this is not an archive, just bytes").unwrap();

    let backup = Backup::new(bogus);
    assert!(backup.meta().is_none());
    assert!(matches!(
        backup.try_read_meta(),
        Err(Error::MissingEndOfCentralDirectory)
    ));

    let target = TestProfile::seed(b"db", b"settings");
    assert!(!backup.restore(&target, Contents::HOMESCREEN | Contents::SETTINGS));
    assert_eq!(fs::read(target.database_file()).unwrap(), b"db");
}

#[test]
fn missing_archive_is_absent() {
    let profile = TestProfile::new();
    let backup = Backup::new(profile.root.path().join("nope.lawnchairbackup"));
    assert!(backup.meta().is_none());
    assert!(!backup.restore(&profile, Contents::SETTINGS));
}

#[test]
fn payload_without_meta_restores_but_reads_absent() {
    let profile = TestProfile::new();
    let archive = profile.root.path().join("no-meta.zip");

    let mut writer = ZipWriter::new(File::create(&archive).unwrap());
    writer
        .append(SETTINGS_FILE, &mut &b"settings payload"[..])
        .unwrap();
    writer.finish().unwrap();

    let backup = Backup::new(archive);
    assert!(backup.meta().is_none());
    assert!(matches!(backup.try_read_meta(), Err(Error::MetaEntryAbsent)));

    let target = TestProfile::seed(b"db", b"old settings");
    assert!(backup.restore(&target, Contents::SETTINGS));
    assert_eq!(fs::read(target.settings_file()).unwrap(), b"settings payload");
}

#[test]
fn unknown_entries_leave_no_trace() {
    let profile = TestProfile::new();
    let archive = profile.root.path().join("extra.lawnchairbackup");

    let meta = Meta::new("Extra".to_string(), Contents::SETTINGS, "t".to_string());
    let mut writer = ZipWriter::new(File::create(&archive).unwrap());
    writer
        .append(META_ENTRY_NAME, &mut meta.to_json().as_bytes())
        .unwrap();
    writer
        .append(SETTINGS_FILE, &mut &b"wanted"[..])
        .unwrap();
    writer
        .append("random.txt", &mut &b"should never land on disk"[..])
        .unwrap();
    writer.finish().unwrap();

    let target = TestProfile::seed(b"db", b"old");
    assert!(Backup::new(archive).restore(&target, Contents::SETTINGS));
    assert_eq!(fs::read(target.settings_file()).unwrap(), b"wanted");
    assert!(!target.root.path().join("random.txt").exists());
}

#[test]
fn decode_failure_collapses_to_absent() {
    let profile = TestProfile::new();
    let archive = profile.root.path().join("bad-meta.lawnchairbackup");

    let mut writer = ZipWriter::new(File::create(&archive).unwrap());
    writer
        .append(META_ENTRY_NAME, &mut &b"[\"not\",\"versioned\"]"[..])
        .unwrap();
    writer.finish().unwrap();

    let backup = Backup::new(archive);
    assert!(backup.meta().is_none());
    assert!(matches!(
        backup.try_read_meta(),
        Err(Error::MetaField { index: 0 })
    ));
}

#[test]
fn create_fails_cleanly_when_source_missing() {
    // Settings selected but the file does not exist.
    let profile = TestProfile::new();
    fs::write(profile.database_file(), b"db").unwrap();

    let flag = RecordingFlag::default();
    let path = profile.archive_path("Broken");
    let result = try_create(
        &path,
        "Broken",
        Contents::HOMESCREEN | Contents::SETTINGS,
        &profile,
        &flag,
    );
    assert!(matches!(result, Err(Error::Io(_))));
    // Flag raised, then cleared despite the failure.
    assert_eq!(*flag.transitions.lock().unwrap(), [true, false]);
}

#[test]
fn create_signals_operation_flag() {
    let profile = TestProfile::seed(b"db", b"settings");
    let flag = RecordingFlag::default();
    let path = profile.archive_path("Flagged");
    assert!(create(&path, "Flagged", Contents::HOMESCREEN, &profile, &flag));
    assert_eq!(*flag.transitions.lock().unwrap(), [true, false]);
}

#[test]
fn restore_mask_is_independent_of_create_mask() {
    // Archive authored with everything; restored with each single bit.
    let profile = TestProfile::seed(b"the database", b"the settings");
    let archive = create_archive(&profile, "Both", Contents::HOMESCREEN | Contents::SETTINGS);
    let backup = Backup::new(archive);

    for (mask, db_expected, settings_expected) in [
        (Contents::HOMESCREEN, &b"the database"[..], &b"before"[..]),
        (Contents::SETTINGS, &b"before"[..], &b"the settings"[..]),
    ] {
        let target = TestProfile::seed(b"before", b"before");
        assert!(backup.restore(&target, mask));
        assert_eq!(fs::read(target.database_file()).unwrap(), db_expected);
        assert_eq!(fs::read(target.settings_file()).unwrap(), settings_expected);
    }
}

#[test]
fn foreign_zip_payload_restores() {
    // An archive assembled in memory by our writer but written through a
    // plain byte buffer, then dumped to disk as a foreign tool would.
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .append(DATABASE_FILE, &mut &b"imported db"[..])
        .unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let profile = TestProfile::new();
    let archive = profile.root.path().join("foreign.zip");
    fs::write(&archive, bytes).unwrap();

    let target = TestProfile::seed(b"db", b"settings");
    assert!(Backup::new(archive).restore(&target, Contents::HOMESCREEN));
    assert_eq!(fs::read(target.database_file()).unwrap(), b"imported db");
}
