use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::DeflateDecoder;
use tracing::debug;

use super::{
    ZipEntry, CENTRAL_HEADER_SIG, END_OF_CENTRAL_DIR_SIG, LOCAL_HEADER_SIG, METHOD_DEFLATED,
    METHOD_STORED,
};
use crate::error::{Error, Result};
use crate::COPY_BUFFER;

/// Fixed size of the end-of-central-directory record.
const EOCD_LEN: u64 = 22;

/// How far from the end of the stream the end record can sit: its fixed
/// fields plus the longest possible archive comment.
const EOCD_SEARCH_MAX: u64 = EOCD_LEN + u16::MAX as u64;

/// Zip archive reader.
///
/// Opening scans the central directory into an ordered entry table;
/// entry bytes are streamed on demand through a bounded buffer and
/// checked against their recorded CRC-32.
#[derive(Debug)]
pub struct ZipReader<R: Read + Seek> {
    inner: R,
    entries: Vec<ZipEntry>,
}

impl<R: Read + Seek> ZipReader<R> {
    /// Open a stream as a zip archive. Fails on anything that does not end
    /// in a parseable central directory — a truncated, foreign or
    /// plain-garbage stream is an error here, not a panic.
    pub fn open(mut inner: R) -> Result<ZipReader<R>> {
        let len = inner.seek(SeekFrom::End(0))?;
        let eocd_offset = find_end_of_central_directory(&mut inner, len)?;

        inner.seek(SeekFrom::Start(eocd_offset + 10))?;
        let count = inner.read_u16::<LittleEndian>()?;
        let _cd_size = inner.read_u32::<LittleEndian>()?;
        let cd_offset = inner.read_u32::<LittleEndian>()?;

        inner.seek(SeekFrom::Start(u64::from(cd_offset)))?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push(read_central_entry(&mut inner)?);
        }

        debug!(entries = entries.len(), "opened archive");
        Ok(ZipReader { inner, entries })
    }

    /// Entries in stored (central directory) order.
    pub fn entries(&self) -> &[ZipEntry] {
        &self.entries
    }

    /// Stream one entry's decompressed bytes into `dest`, returning the
    /// byte count. The bytes are CRC-checked against the directory record.
    pub fn copy_entry<W: Write>(&mut self, index: usize, dest: &mut W) -> Result<u64> {
        let entry = self
            .entries
            .get(index)
            .cloned()
            .ok_or(Error::EntryIndexOutOfRange(index, self.entries.len()))?;

        self.inner
            .seek(SeekFrom::Start(u64::from(entry.header_offset)))?;
        let sig = self.inner.read_u32::<LittleEndian>()?;
        if sig != LOCAL_HEADER_SIG {
            return Err(Error::InvalidSignature {
                expected: LOCAL_HEADER_SIG,
                actual: sig,
            });
        }

        // Skip the rest of the fixed local header; the central directory
        // values are authoritative (local copies may be zeroed by writers
        // that stream with data descriptors).
        self.inner.seek(SeekFrom::Current(22))?;
        let name_len = self.inner.read_u16::<LittleEndian>()?;
        let extra_len = self.inner.read_u16::<LittleEndian>()?;
        self.inner
            .seek(SeekFrom::Current(i64::from(name_len) + i64::from(extra_len)))?;

        let mut crc = crc32fast::Hasher::new();
        let data = (&mut self.inner).take(u64::from(entry.compressed_size));
        let written = match entry.method {
            METHOD_STORED => copy_with_crc(data, dest, &mut crc)?,
            METHOD_DEFLATED => copy_with_crc(DeflateDecoder::new(data), dest, &mut crc)?,
            other => return Err(Error::UnsupportedMethod(other)),
        };

        let actual = crc.finalize();
        if actual != entry.crc32 {
            return Err(Error::ChecksumMismatch {
                name: entry.name,
                expected: entry.crc32,
                actual,
            });
        }

        debug!(name = %entry.name, bytes = written, "read entry");
        Ok(written)
    }
}

fn copy_with_crc<R: Read, W: Write>(
    mut source: R,
    dest: &mut W,
    crc: &mut crc32fast::Hasher,
) -> Result<u64> {
    let mut buf = [0u8; COPY_BUFFER];
    let mut total = 0u64;
    loop {
        let n = source.read(&mut buf)?;
        if n == 0 {
            break;
        }
        crc.update(&buf[..n]);
        dest.write_all(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}

/// Scan backwards over the stream tail for the end-of-central-directory
/// signature.
fn find_end_of_central_directory<R: Read + Seek>(inner: &mut R, len: u64) -> Result<u64> {
    if len < EOCD_LEN {
        return Err(Error::MissingEndOfCentralDirectory);
    }

    let search = EOCD_SEARCH_MAX.min(len);
    let start = len - search;
    inner.seek(SeekFrom::Start(start))?;
    let mut tail = vec![0u8; search as usize];
    inner.read_exact(&mut tail)?;

    let sig = END_OF_CENTRAL_DIR_SIG.to_le_bytes();
    for pos in (0..=(tail.len() - EOCD_LEN as usize)).rev() {
        if tail[pos..pos + 4] == sig {
            return Ok(start + pos as u64);
        }
    }
    Err(Error::MissingEndOfCentralDirectory)
}

fn read_central_entry<R: Read + Seek>(inner: &mut R) -> Result<ZipEntry> {
    let sig = inner.read_u32::<LittleEndian>()?;
    if sig != CENTRAL_HEADER_SIG {
        return Err(Error::InvalidSignature {
            expected: CENTRAL_HEADER_SIG,
            actual: sig,
        });
    }

    let _version_made_by = inner.read_u16::<LittleEndian>()?;
    let _version_needed = inner.read_u16::<LittleEndian>()?;
    let _flags = inner.read_u16::<LittleEndian>()?;
    let method = inner.read_u16::<LittleEndian>()?;
    let dos_time = inner.read_u16::<LittleEndian>()?;
    let dos_date = inner.read_u16::<LittleEndian>()?;
    let crc32 = inner.read_u32::<LittleEndian>()?;
    let compressed_size = inner.read_u32::<LittleEndian>()?;
    let uncompressed_size = inner.read_u32::<LittleEndian>()?;
    let name_len = inner.read_u16::<LittleEndian>()?;
    let extra_len = inner.read_u16::<LittleEndian>()?;
    let comment_len = inner.read_u16::<LittleEndian>()?;
    let _disk_number_start = inner.read_u16::<LittleEndian>()?;
    let _internal_attrs = inner.read_u16::<LittleEndian>()?;
    let _external_attrs = inner.read_u32::<LittleEndian>()?;
    let header_offset = inner.read_u32::<LittleEndian>()?;

    let mut name = vec![0u8; name_len as usize];
    inner.read_exact(&mut name)?;
    inner.seek(SeekFrom::Current(i64::from(extra_len) + i64::from(comment_len)))?;

    Ok(ZipEntry {
        name: String::from_utf8_lossy(&name).into_owned(),
        method,
        crc32,
        compressed_size,
        uncompressed_size,
        header_offset,
        dos_time,
        dos_date,
    })
}
