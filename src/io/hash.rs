//! Content hashing for cache keys.
//!
//! Files are identified by the SHA-256 of their bytes, so renamed or copied
//! captures share one cached parse.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Read chunk size for hashing. Matches the capture tooling's block size;
/// any value works, this just bounds memory.
const CHUNK_SIZE: usize = 4096;

/// Lowercase-hex SHA-256 digest of a file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileDigest(String);

impl FileDigest {
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Shortened prefix for terminal output.
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the SHA-256 digest of a file, reading in fixed-size chunks.
pub fn hash_file(path: &Path) -> Result<FileDigest, AppError> {
    let mut file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open '{}': {e}", path.display())))?;

    let mut hasher = Sha256::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let read = file
            .read(&mut chunk)
            .map_err(|e| AppError::input(format!("Failed to read '{}': {e}", path.display())))?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }

    let hex: String = hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    Ok(FileDigest(hex))
}
