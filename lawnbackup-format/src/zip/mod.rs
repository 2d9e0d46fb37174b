//! Minimal zip container support: the subset the backup format needs.
//!
//! Entries are written with the deflate method and enumerated through the
//! central directory, so archives interoperate with ordinary zip tools in
//! both directions. No zip64, no encryption, no comments — an archive here
//! holds a handful of small application files.

mod reader;
mod writer;

pub use reader::ZipReader;
pub use writer::ZipWriter;

pub(crate) const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
pub(crate) const CENTRAL_HEADER_SIG: u32 = 0x0201_4b50;
pub(crate) const END_OF_CENTRAL_DIR_SIG: u32 = 0x0605_4b50;

/// Version needed to extract: 2.0 covers deflate plus plain file entries.
pub(crate) const VERSION_NEEDED: u16 = 20;

pub(crate) const METHOD_STORED: u16 = 0;
pub(crate) const METHOD_DEFLATED: u16 = 8;

/// One named byte blob inside the archive, as recorded in the central
/// directory.
#[derive(Clone, Debug)]
pub struct ZipEntry {
    pub(crate) name: String,
    pub(crate) method: u16,
    pub(crate) crc32: u32,
    pub(crate) compressed_size: u32,
    pub(crate) uncompressed_size: u32,
    pub(crate) header_offset: u32,
    pub(crate) dos_time: u16,
    pub(crate) dos_date: u16,
}

impl ZipEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compressed_size(&self) -> u64 {
        u64::from(self.compressed_size)
    }

    pub fn uncompressed_size(&self) -> u64 {
        u64::from(self.uncompressed_size)
    }

    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    pub fn method_name(&self) -> &'static str {
        match self.method {
            METHOD_STORED => "stored",
            METHOD_DEFLATED => "deflate",
            _ => "unknown",
        }
    }
}

/// Pack a local timestamp into the MS-DOS date/time fields carried by
/// every zip record. Two-second resolution; years clamp to the DOS range.
pub(crate) fn dos_date_time(now: chrono::DateTime<chrono::Local>) -> (u16, u16) {
    use chrono::{Datelike, Timelike};

    let time =
        ((now.hour() as u16) << 11) | ((now.minute() as u16) << 5) | (now.second() as u16 / 2);
    let year = now.year().clamp(1980, 2107) as u16 - 1980;
    let date = (year << 9) | ((now.month() as u16) << 5) | now.day() as u16;
    (time, date)
}
