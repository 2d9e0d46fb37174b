use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::Local;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use tracing::debug;

use super::{
    dos_date_time, ZipEntry, CENTRAL_HEADER_SIG, END_OF_CENTRAL_DIR_SIG, LOCAL_HEADER_SIG,
    METHOD_DEFLATED, VERSION_NEEDED,
};
use crate::error::{Error, Result};
use crate::COPY_BUFFER;

/// Streaming zip writer.
///
/// Each entry's local header is written with zeroed size and checksum
/// fields, the body is streamed through a bounded buffer, and the real
/// values are patched in by seeking back — the same finish-time patching
/// the rest of the format applies to its trailer. The central directory
/// and end record are emitted by [`finish`](ZipWriter::finish); a writer
/// dropped without `finish` leaves a truncated archive the caller must
/// discard.
pub struct ZipWriter<W: Write + Seek> {
    inner: W,
    entries: Vec<ZipEntry>,
}

impl<W: Write + Seek> ZipWriter<W> {
    pub fn new(inner: W) -> ZipWriter<W> {
        ZipWriter {
            inner,
            entries: Vec::new(),
        }
    }

    /// Append one deflated entry, streaming `source` until EOF.
    pub fn append<R: Read>(&mut self, name: &str, source: &mut R) -> Result<()> {
        if self.entries.iter().any(|e| e.name == name) {
            return Err(Error::DuplicateEntry(name.to_string()));
        }

        let header_offset = self.inner.stream_position()?;
        if header_offset > u64::from(u32::MAX) {
            return Err(Error::EntryTooLarge(name.to_string()));
        }
        let (dos_time, dos_date) = dos_date_time(Local::now());

        let w = &mut self.inner;
        w.write_u32::<LittleEndian>(LOCAL_HEADER_SIG)?;
        w.write_u16::<LittleEndian>(VERSION_NEEDED)?;
        w.write_u16::<LittleEndian>(0)?; // general purpose flags
        w.write_u16::<LittleEndian>(METHOD_DEFLATED)?;
        w.write_u16::<LittleEndian>(dos_time)?;
        w.write_u16::<LittleEndian>(dos_date)?;
        w.write_u32::<LittleEndian>(0)?; // crc-32, patched below
        w.write_u32::<LittleEndian>(0)?; // compressed size, patched below
        w.write_u32::<LittleEndian>(0)?; // uncompressed size, patched below
        w.write_u16::<LittleEndian>(name.len() as u16)?;
        w.write_u16::<LittleEndian>(0)?; // extra field length
        w.write_all(name.as_bytes())?;

        let data_start = self.inner.stream_position()?;
        let mut crc = crc32fast::Hasher::new();
        let mut uncompressed: u64 = 0;
        let mut encoder = DeflateEncoder::new(&mut self.inner, Compression::default());
        let mut buf = [0u8; COPY_BUFFER];
        loop {
            let n = source.read(&mut buf)?;
            if n == 0 {
                break;
            }
            crc.update(&buf[..n]);
            encoder.write_all(&buf[..n])?;
            uncompressed += n as u64;
        }
        let w = encoder.finish()?;
        let data_end = w.stream_position()?;
        let compressed = data_end - data_start;
        if uncompressed > u64::from(u32::MAX) || compressed > u64::from(u32::MAX) {
            return Err(Error::EntryTooLarge(name.to_string()));
        }
        let crc32 = crc.finalize();

        // Patch the sizes and checksum into the local header.
        w.seek(SeekFrom::Start(header_offset + 14))?;
        w.write_u32::<LittleEndian>(crc32)?;
        w.write_u32::<LittleEndian>(compressed as u32)?;
        w.write_u32::<LittleEndian>(uncompressed as u32)?;
        w.seek(SeekFrom::Start(data_end))?;

        debug!(name, compressed, uncompressed, "wrote entry");

        self.entries.push(ZipEntry {
            name: name.to_string(),
            method: METHOD_DEFLATED,
            crc32,
            compressed_size: compressed as u32,
            uncompressed_size: uncompressed as u32,
            header_offset: header_offset as u32,
            dos_time,
            dos_date,
        });
        Ok(())
    }

    /// Write the central directory and end record, flush, and hand the
    /// underlying stream back.
    pub fn finish(mut self) -> Result<W> {
        let cd_offset = self.inner.stream_position()?;
        if cd_offset > u64::from(u32::MAX) {
            return Err(Error::EntryTooLarge("central directory".to_string()));
        }

        for entry in &self.entries {
            let w = &mut self.inner;
            w.write_u32::<LittleEndian>(CENTRAL_HEADER_SIG)?;
            w.write_u16::<LittleEndian>(VERSION_NEEDED)?; // version made by
            w.write_u16::<LittleEndian>(VERSION_NEEDED)?; // version needed
            w.write_u16::<LittleEndian>(0)?; // general purpose flags
            w.write_u16::<LittleEndian>(entry.method)?;
            w.write_u16::<LittleEndian>(entry.dos_time)?;
            w.write_u16::<LittleEndian>(entry.dos_date)?;
            w.write_u32::<LittleEndian>(entry.crc32)?;
            w.write_u32::<LittleEndian>(entry.compressed_size)?;
            w.write_u32::<LittleEndian>(entry.uncompressed_size)?;
            w.write_u16::<LittleEndian>(entry.name.len() as u16)?;
            w.write_u16::<LittleEndian>(0)?; // extra field length
            w.write_u16::<LittleEndian>(0)?; // comment length
            w.write_u16::<LittleEndian>(0)?; // disk number start
            w.write_u16::<LittleEndian>(0)?; // internal attributes
            w.write_u32::<LittleEndian>(0)?; // external attributes
            w.write_u32::<LittleEndian>(entry.header_offset)?;
            w.write_all(entry.name.as_bytes())?;
        }

        let cd_end = self.inner.stream_position()?;
        let count = self.entries.len() as u16;
        let w = &mut self.inner;
        w.write_u32::<LittleEndian>(END_OF_CENTRAL_DIR_SIG)?;
        w.write_u16::<LittleEndian>(0)?; // this disk
        w.write_u16::<LittleEndian>(0)?; // central directory disk
        w.write_u16::<LittleEndian>(count)?;
        w.write_u16::<LittleEndian>(count)?;
        w.write_u32::<LittleEndian>((cd_end - cd_offset) as u32)?;
        w.write_u32::<LittleEndian>(cd_offset as u32)?;
        w.write_u16::<LittleEndian>(0)?; // comment length
        w.flush()?;

        debug!(entries = self.entries.len(), "finished archive");
        Ok(self.inner)
    }
}
