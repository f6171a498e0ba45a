//! Binary framing for artifact files.
//!
//! ```text
//! +-----------+-------------+----------------+-----------+-----------+
//! | magic [8] | version u32 | payload_len u64| payload   | crc32 u32 |
//! +-----------+-------------+----------------+-----------+-----------+
//! ```
//!
//! All integers are little-endian. The checksum covers the payload only.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{CredenceError, Result};

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

/// What an artifact file holds. Each kind has its own magic bytes so the two
/// files of a pair cannot be swapped unnoticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Vectorizer,
}

impl ArtifactKind {
    pub fn magic(self) -> &'static [u8; 8] {
        match self {
            ArtifactKind::Classifier => b"CRDNCLSF",
            ArtifactKind::Vectorizer => b"CRDNTFID",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::Vectorizer => "vectorizer",
        }
    }

    fn from_magic(magic: &[u8; 8]) -> Option<Self> {
        [ArtifactKind::Classifier, ArtifactKind::Vectorizer]
            .into_iter()
            .find(|kind| kind.magic() == magic)
    }
}

/// Write `payload` wrapped in a frame of the given kind.
pub fn write_frame<W: Write>(writer: &mut W, kind: ArtifactKind, payload: &[u8]) -> Result<()> {
    writer.write_all(kind.magic())?;
    writer.write_u32::<LittleEndian>(FORMAT_VERSION)?;
    writer.write_u64::<LittleEndian>(payload.len() as u64)?;
    writer.write_all(payload)?;
    writer.write_u32::<LittleEndian>(crc32fast::hash(payload))?;
    Ok(())
}

/// Read a frame of the expected kind and return its verified payload.
///
/// Truncated input, a foreign or swapped magic, an unknown version, a
/// checksum mismatch and trailing bytes are all load errors.
pub fn read_frame<R: Read>(reader: &mut R, kind: ArtifactKind) -> Result<Vec<u8>> {
    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic).map_err(|e| truncated(kind, e))?;
    if &magic != kind.magic() {
        return Err(match ArtifactKind::from_magic(&magic) {
            Some(found) => CredenceError::load(format!(
                "expected a {} artifact but found a {} artifact",
                kind.name(),
                found.name()
            )),
            None => CredenceError::load(format!("not a {} artifact", kind.name())),
        });
    }

    let version = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| truncated(kind, e))?;
    if version != FORMAT_VERSION {
        return Err(CredenceError::load(format!(
            "unsupported {} artifact version {version} (expected {FORMAT_VERSION})",
            kind.name()
        )));
    }

    let len = reader
        .read_u64::<LittleEndian>()
        .map_err(|e| truncated(kind, e))?;
    let mut payload = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut payload)?;
    if payload.len() as u64 != len {
        return Err(CredenceError::load(format!(
            "{} artifact is truncated: payload has {} of {len} bytes",
            kind.name(),
            payload.len()
        )));
    }

    let stored = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| truncated(kind, e))?;
    let actual = crc32fast::hash(&payload);
    if stored != actual {
        return Err(CredenceError::load(format!(
            "{} artifact checksum mismatch: stored {stored:08x}, computed {actual:08x}",
            kind.name()
        )));
    }

    let mut rest = [0u8; 1];
    if reader.read(&mut rest)? != 0 {
        return Err(CredenceError::load(format!(
            "{} artifact has trailing data",
            kind.name()
        )));
    }

    Ok(payload)
}

fn truncated(kind: ArtifactKind, err: io::Error) -> CredenceError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        CredenceError::load(format!("{} artifact is truncated", kind.name()))
    } else {
        CredenceError::Io(err)
    }
}
