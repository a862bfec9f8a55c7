use super::Session;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

/// ## Session snapshots
///
/// Artifact layout: `MAGIC`, CRC-32 of the payload (u32 LE), then the
/// zlib compressed bincode encoding of a [`Session`]. The format is
/// only meant to be read back by the same build.

const MAGIC: &[u8; 4] = b"BSS\x01";

/// Explicit snapshot encoding for a resource whose live form cannot be
/// stored, such as an OS handle.
pub trait Persist: Sized {
    type Image: Serialize + DeserializeOwned;

    fn externalize(&self) -> Self::Image;
    fn internalize(image: Self::Image) -> Self;
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no state file configured")]
    NoLocation,
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Encoding(#[from] bincode::Error),
    #[error("not a session snapshot")]
    BadMagic,
    #[error("checksum mismatch")]
    Checksum,
}

/// The saved session could not be used. Callers start fresh.
#[derive(Debug, Error)]
#[error("Could not resume session: {0}")]
pub struct ResumeFailed(#[from] pub SnapshotError);

pub fn to_bytes(session: &Session) -> Result<Vec<u8>, SnapshotError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    bincode::serialize_into(&mut encoder, session)?;
    let payload = encoder.finish()?;
    let mut bytes = Vec::with_capacity(payload.len() + 8);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&crc::crc32::checksum_ieee(&payload).to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

pub fn from_bytes(bytes: &[u8]) -> Result<Session, SnapshotError> {
    if bytes.len() < 8 || &bytes[..4] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }
    let crc = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let payload = &bytes[8..];
    if crc::crc32::checksum_ieee(payload) != crc {
        return Err(SnapshotError::Checksum);
    }
    let mut decoded = vec![];
    ZlibDecoder::new(payload).read_to_end(&mut decoded)?;
    Ok(bincode::deserialize(&decoded)?)
}

/// Write the session to `path`. Without a path this does nothing;
/// failures are logged and otherwise ignored.
pub fn save(session: &Session, path: Option<&Path>) {
    let path = match path {
        Some(path) => path,
        None => return,
    };
    match write_atomic(session, path) {
        Ok(()) => debug!("Saved session to {}", path.display()),
        Err(e) => warn!("Could not save session to {}: {}", path.display(), e),
    }
}

fn write_atomic(session: &Session, path: &Path) -> Result<(), SnapshotError> {
    let bytes = to_bytes(session)?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn load(path: Option<&Path>) -> Result<Session, ResumeFailed> {
    let path = path.ok_or(SnapshotError::NoLocation)?;
    let bytes = fs::read(path).map_err(SnapshotError::from)?;
    let session = from_bytes(&bytes).map_err(|e| {
        if !matches!(e, SnapshotError::Io(_)) {
            warn!("Discarding saved session {}: {}", path.display(), e);
        }
        e
    })?;
    debug!("Resumed session from {}", path.display());
    Ok(session)
}

/// Remove a saved session, if there is one.
pub fn delete(path: Option<&Path>) {
    if let Some(path) = path {
        match fs::remove_file(path) {
            Ok(()) => debug!("Deleted session {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not delete session {}: {}", path.display(), e),
        }
    }
}
