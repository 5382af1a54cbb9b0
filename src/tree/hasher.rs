//! Content fingerprinting using BLAKE3

use crate::error::{FsOperation, SyncError};
use crate::fs::FileSystem;
use crate::types::Fingerprint;
use blake3::Hasher;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Read buffer size for streaming digests
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the fingerprint of a file by streaming its content through BLAKE3.
///
/// Memory use is bounded by [`CHUNK_SIZE`] regardless of file size. Fails with
/// an I/O error if the file cannot be opened or is not read to the end.
pub fn fingerprint_file(fs: &dyn FileSystem, path: &Path) -> Result<Fingerprint, SyncError> {
    let mut reader = fs.open_read(path)?;
    let mut hasher = Hasher::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SyncError::io(path, FsOperation::Read, e)),
        };
        hasher.update(&buf[..n]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Compute the fingerprint of an in-memory buffer
pub fn compute_content_hash(content: &[u8]) -> Fingerprint {
    let mut hasher = Hasher::new();
    hasher.update(content);
    *hasher.finalize().as_bytes()
}

/// Lowercase hex rendering for logs
pub fn to_hex(fingerprint: &Fingerprint) -> String {
    hex::encode(fingerprint)
}
