//! Binary file format for [`BloomFilter`].
//!
//! Every file starts with a 12-byte header, all integers big-endian:
//!
//! | Offset | Length | Field                                   |
//! |--------|--------|-----------------------------------------|
//! | 0      | 4      | magic, `CCBF` or `CCBP`                 |
//! | 4      | 2      | format version (`u16`)                  |
//! | 6      | 2      | hash count (`u16`)                      |
//! | 8      | 4      | size in bits (`u32`)                    |
//!
//! `CCBF` files follow the header with `size` bytes, one per bit, each `0x00`
//! or `0x01`. `CCBP` files follow it with `ceil(size / 8)` bytes holding bit
//! `i` in byte `i / 8` at position `i % 8`.
//!
//! The version field is not interpreted here. Callers choose which version
//! they accept and [`load`] rejects anything else.

use super::{BloomError, BloomFilter, BloomFilterStats, BloomResult};
use bitvec::{order::Lsb0, vec::BitVec};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const MAGIC_BYTE_PER_BIT: [u8; 4] = *b"CCBF";
pub const MAGIC_PACKED: [u8; 4] = *b"CCBP";
pub const HEADER_LEN: usize = 12;

/// Body encoding of the bit array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One byte per bit, magic `CCBF`.
    #[default]
    BytePerBit,
    /// Eight bits per byte, LSB first, magic `CCBP`.
    Packed,
}

impl Layout {
    pub fn magic(self) -> [u8; 4] {
        match self {
            Layout::BytePerBit => MAGIC_BYTE_PER_BIT,
            Layout::Packed => MAGIC_PACKED,
        }
    }

    fn from_magic(magic: [u8; 4]) -> Option<Self> {
        match magic {
            MAGIC_BYTE_PER_BIT => Some(Layout::BytePerBit),
            MAGIC_PACKED => Some(Layout::Packed),
            _ => None,
        }
    }

    /// Number of body bytes for a filter of `size` bits.
    pub fn body_len(self, size: usize) -> usize {
        match self {
            Layout::BytePerBit => size,
            Layout::Packed => size.div_ceil(8),
        }
    }
}

/// Writes `filter` in the byte-per-bit layout.
pub fn save<W: Write>(
    filter: &BloomFilter,
    writer: W,
    version: u16,
) -> BloomResult<()> {
    save_with_layout(filter, writer, version, Layout::BytePerBit)
}

pub fn save_with_layout<W: Write>(
    filter: &BloomFilter,
    mut writer: W,
    version: u16,
    layout: Layout,
) -> BloomResult<()> {
    let hash_count = u16::try_from(filter.hash_count()).map_err(|_| {
        BloomError::InvalidHeader(format!(
            "hash count {} does not fit in 16 bits",
            filter.hash_count()
        ))
    })?;
    let size = u32::try_from(filter.size()).map_err(|_| {
        BloomError::InvalidHeader(format!(
            "size {} does not fit in 32 bits",
            filter.size()
        ))
    })?;

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(&layout.magic());
    header[4..6].copy_from_slice(&version.to_be_bytes());
    header[6..8].copy_from_slice(&hash_count.to_be_bytes());
    header[8..12].copy_from_slice(&size.to_be_bytes());
    writer.write_all(&header)?;

    let bits = filter.bits();
    match layout {
        Layout::BytePerBit => {
            let body: Vec<u8> = bits.iter().map(|bit| u8::from(*bit)).collect();
            writer.write_all(&body)?;
        }
        Layout::Packed => {
            let mut body = vec![0u8; layout.body_len(bits.len())];
            for idx in bits.iter_ones() {
                body[idx / 8] |= 1 << (idx % 8);
            }
            writer.write_all(&body)?;
        }
    }
    writer.flush()?;

    debug!(?layout, version, size, hash_count, "saved bloom filter");
    Ok(())
}

/// Reads a filter written by [`save`] or [`save_with_layout`].
///
/// Checks run in order: magic, then version, then body length. The returned
/// filter has no planning config; see [`BloomFilter::config`].
pub fn load<R: Read>(reader: R, expected_version: u16) -> BloomResult<BloomFilter> {
    decode(reader, expected_version).map(|(filter, _)| filter)
}

fn decode<R: Read>(
    mut reader: R,
    expected_version: u16,
) -> BloomResult<(BloomFilter, Layout)> {
    let mut header = [0u8; HEADER_LEN];
    let read = read_fully(&mut reader, &mut header)?;
    let truncated_header = || BloomError::Truncated {
        expected: HEADER_LEN,
        actual: read,
    };

    if read < 4 {
        return Err(truncated_header());
    }
    let magic = [header[0], header[1], header[2], header[3]];
    let layout =
        Layout::from_magic(magic).ok_or(BloomError::InvalidMagic { found: magic })?;

    if read < 6 {
        return Err(truncated_header());
    }
    let version = u16::from_be_bytes([header[4], header[5]]);
    if version != expected_version {
        return Err(BloomError::VersionMismatch {
            expected: expected_version,
            found: version,
        });
    }

    if read < HEADER_LEN {
        return Err(truncated_header());
    }
    let hash_count = u16::from_be_bytes([header[6], header[7]]) as usize;
    let size =
        u32::from_be_bytes([header[8], header[9], header[10], header[11]]) as usize;

    let body_len = layout.body_len(size);
    let mut body = Vec::new();
    reader.take(body_len as u64).read_to_end(&mut body)?;
    if body.len() < body_len {
        return Err(BloomError::Truncated {
            expected: HEADER_LEN + body_len,
            actual: HEADER_LEN + body.len(),
        });
    }

    let bits: BitVec<usize, Lsb0> = match layout {
        Layout::BytePerBit => body.iter().map(|byte| *byte != 0).collect(),
        Layout::Packed => (0..size)
            .map(|idx| body[idx / 8] & (1 << (idx % 8)) != 0)
            .collect(),
    };

    debug!(?layout, version, size, hash_count, "loaded bloom filter");
    let filter = BloomFilter::from_parts(size, hash_count, bits)?;
    Ok((filter, layout))
}

/// Saves to `path` through a sibling temporary file and a rename, so readers
/// never see a half-written filter.
pub fn save_to_path(
    filter: &BloomFilter,
    path: &Path,
    version: u16,
    layout: Layout,
) -> BloomResult<()> {
    let tmp_path = temp_path_for(path);
    let result = write_and_rename(filter, &tmp_path, path, version, layout);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_and_rename(
    filter: &BloomFilter,
    tmp_path: &Path,
    path: &Path,
    version: u16,
    layout: Layout,
) -> BloomResult<()> {
    let mut writer = BufWriter::new(File::create(tmp_path)?);
    save_with_layout(filter, &mut writer, version, layout)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    fs::rename(tmp_path, path)?;
    Ok(())
}

pub fn load_from_path(path: &Path, expected_version: u16) -> BloomResult<BloomFilter> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let (filter, layout) = decode(BufReader::new(file), expected_version)?;

    let expected_len = (HEADER_LEN + layout.body_len(filter.size())) as u64;
    if file_len > expected_len {
        warn!(
            path = %path.display(),
            file_len,
            expected_len,
            "ignoring trailing bytes after bloom filter body"
        );
    }
    Ok(filter)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Like `read_exact`, but reports how many bytes were read instead of failing
/// on a short input.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> BloomResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

impl BloomFilter {
    /// See [`save`].
    pub fn save<W: Write>(&self, writer: W, version: u16) -> BloomResult<()> {
        save(self, writer, version)
    }

    /// See [`save_to_path`].
    pub fn save_to_path(
        &self,
        path: impl AsRef<Path>,
        version: u16,
        layout: Layout,
    ) -> BloomResult<()> {
        save_to_path(self, path.as_ref(), version, layout)
    }

    /// See [`load`].
    pub fn load<R: Read>(reader: R, expected_version: u16) -> BloomResult<Self> {
        load(reader, expected_version)
    }

    /// See [`load_from_path`].
    pub fn load_from_path(
        path: impl AsRef<Path>,
        expected_version: u16,
    ) -> BloomResult<Self> {
        load_from_path(path.as_ref(), expected_version)
    }
}
