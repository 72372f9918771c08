//! Snapshot codec
//!
//! Turns a persisted value into a self-describing binary file and back.
//!
//! File layout (all integers little-endian):
//!
//! ```text
//! [0..4]   magic "RSSV"
//! [4..8]   codec format version (u32)
//! [8..10]  type tag length (u16), followed by the tag bytes
//!          schema version of the tagged type (u32)
//!          payload length (u32)
//!          payload checksum (u32)
//!          payload: gzip-compressed JSON
//! ```
//!
//! Decoding rejects anything whose magic, format version, tag, schema
//! version, length or checksum does not match. Encoding happens entirely in
//! memory before the destination is touched, and the file is replaced with
//! a temp-then-rename write.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::SaveError;

/// Save file magic bytes
pub const SAVE_MAGIC: &[u8; 4] = b"RSSV";

/// Layout version of the codec itself
pub const CODEC_FORMAT_VERSION: u32 = 1;

/// A value with its own type tag and schema version
pub trait Snapshot: Serialize + DeserializeOwned {
    /// Identifies the stored type, e.g. "campaign"
    const TYPE_TAG: &'static str;
    /// Bumped whenever the serialized shape changes
    const SCHEMA_VERSION: u32;
}

/// Parsed file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub format_version: u32,
    pub type_tag: String,
    pub schema_version: u32,
    pub payload_len: u32,
    pub checksum: u32,
}

/// Calculate a simple checksum for data integrity
pub fn calculate_checksum(data: &[u8]) -> u32 {
    let mut sum: u32 = 0;
    for (i, &byte) in data.iter().enumerate() {
        sum = sum.wrapping_add((byte as u32).wrapping_mul((i as u32).wrapping_add(1)));
    }
    sum
}

/// Reject paths that cannot name a file before doing any I/O
pub fn validate_path(path: &Path) -> Result<(), SaveError> {
    let text = path.to_string_lossy();
    if text.is_empty() {
        return Err(SaveError::InvalidPath("empty path".to_string()));
    }
    if text.contains('\0') {
        return Err(SaveError::InvalidPath(format!("null byte in '{}'", text)));
    }
    if text.ends_with('/') || text.ends_with(std::path::MAIN_SEPARATOR) {
        return Err(SaveError::InvalidPath(format!("'{}' names a directory", text)));
    }
    Ok(())
}

/// Encode a value into file bytes
pub fn encode<T: Snapshot>(value: &T) -> Result<Vec<u8>, SaveError> {
    let json = serde_json::to_vec(value).map_err(|e| SaveError::Encode(e.to_string()))?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| SaveError::Encode(e.to_string()))?;
    let payload = encoder
        .finish()
        .map_err(|e| SaveError::Encode(e.to_string()))?;

    let tag = T::TYPE_TAG.as_bytes();
    let tag_len = u16::try_from(tag.len())
        .map_err(|_| SaveError::Encode(format!("type tag '{}' too long", T::TYPE_TAG)))?;
    let payload_len = u32::try_from(payload.len())
        .map_err(|_| SaveError::Encode(format!("payload of {} bytes too large", payload.len())))?;

    let mut out = Vec::with_capacity(22 + tag.len() + payload.len());
    out.extend_from_slice(SAVE_MAGIC);
    out.extend_from_slice(&CODEC_FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&tag_len.to_le_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(&T::SCHEMA_VERSION.to_le_bytes());
    out.extend_from_slice(&payload_len.to_le_bytes());
    out.extend_from_slice(&calculate_checksum(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

fn read_exact_or_truncated<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), SaveError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => SaveError::Truncated,
        _ => SaveError::Io(e),
    })
}

fn read_u16<R: Read>(reader: &mut R) -> Result<u16, SaveError> {
    let mut buf = [0u8; 2];
    read_exact_or_truncated(reader, &mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, SaveError> {
    let mut buf = [0u8; 4];
    read_exact_or_truncated(reader, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read and check the header, leaving the reader at the payload
pub fn read_header<R: Read>(reader: &mut R) -> Result<SnapshotHeader, SaveError> {
    let mut magic = [0u8; 4];
    read_exact_or_truncated(reader, &mut magic)?;
    if &magic != SAVE_MAGIC {
        return Err(SaveError::InvalidMagic);
    }

    let format_version = read_u32(reader)?;
    if format_version != CODEC_FORMAT_VERSION {
        return Err(SaveError::UnsupportedFormat {
            expected: CODEC_FORMAT_VERSION,
            found: format_version,
        });
    }

    let tag_len = read_u16(reader)? as usize;
    let mut tag = vec![0u8; tag_len];
    read_exact_or_truncated(reader, &mut tag)?;
    let type_tag = String::from_utf8(tag).map_err(|_| SaveError::InvalidMagic)?;

    Ok(SnapshotHeader {
        format_version,
        type_tag,
        schema_version: read_u32(reader)?,
        payload_len: read_u32(reader)?,
        checksum: read_u32(reader)?,
    })
}

/// Decode file bytes into a value of the expected type
pub fn decode<T: Snapshot>(bytes: &[u8]) -> Result<T, SaveError> {
    let mut reader = bytes;
    let header = read_header(&mut reader)?;

    if header.type_tag != T::TYPE_TAG {
        return Err(SaveError::TypeMismatch {
            expected: T::TYPE_TAG.to_string(),
            found: header.type_tag,
        });
    }
    if header.schema_version != T::SCHEMA_VERSION {
        return Err(SaveError::IncompatibleVersion {
            expected: T::SCHEMA_VERSION,
            found: header.schema_version,
        });
    }

    let payload = reader;
    let expected_len = header.payload_len as usize;
    if payload.len() < expected_len {
        return Err(SaveError::Truncated);
    }
    if payload.len() > expected_len {
        return Err(SaveError::Decode(format!(
            "{} trailing bytes after payload",
            payload.len() - expected_len
        )));
    }

    let found = calculate_checksum(payload);
    if found != header.checksum {
        return Err(SaveError::ChecksumMismatch {
            expected: header.checksum,
            found,
        });
    }

    let mut json = Vec::new();
    GzDecoder::new(payload)
        .read_to_end(&mut json)
        .map_err(|e| SaveError::Decode(e.to_string()))?;
    serde_json::from_slice(&json).map_err(|e| SaveError::Decode(e.to_string()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Write `data` to `{path}.tmp`, flush it to disk, then rename over `path`.
///
/// A failure at any step leaves the existing file untouched.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<(), SaveError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let result = (|| -> io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if let Err(e) = result {
        fs::remove_file(&tmp).ok();
        return Err(SaveError::Io(e));
    }
    Ok(())
}

/// Save a value to a file
pub fn save<T: Snapshot>(value: &T, path: &Path) -> Result<(), SaveError> {
    validate_path(path)?;
    info!("saving {} to {}", T::TYPE_TAG, path.display());

    let result = encode(value).and_then(|bytes| {
        debug!("{} encoded to {} bytes", T::TYPE_TAG, bytes.len());
        atomic_write(path, &bytes)
    });
    match &result {
        Ok(()) => info!("saved {} to {}", T::TYPE_TAG, path.display()),
        Err(e) => warn!("failed to save {} to {}: {}", T::TYPE_TAG, path.display(), e),
    }
    result
}

/// Load a value from a file
pub fn load<T: Snapshot>(path: &Path) -> Result<T, SaveError> {
    validate_path(path)?;
    info!("loading {} from {}", T::TYPE_TAG, path.display());

    let result = fs::read(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SaveError::NotFound(path.to_path_buf()),
            _ => SaveError::Io(e),
        })
        .and_then(|bytes| decode::<T>(&bytes));
    match &result {
        Ok(_) => info!("loaded {} from {}", T::TYPE_TAG, path.display()),
        Err(e) => warn!("failed to load {} from {}: {}", T::TYPE_TAG, path.display(), e),
    }
    result
}

/// Read only the header of a save file
pub fn peek_header(path: &Path) -> Result<SnapshotHeader, SaveError> {
    validate_path(path)?;
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SaveError::NotFound(path.to_path_buf()),
        _ => SaveError::Io(e),
    })?;
    read_header(&mut BufReader::new(file))
}
