//! Streaming content digests using BLAKE3

use blake3::Hasher;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Content digest of a monitored file (32-byte BLAKE3 output)
pub type Digest = [u8; 32];

/// Chunk size for streaming reads (8 KiB)
const CHUNK_SIZE: usize = 8192;

/// Compute the content digest of a file
///
/// Reads the file in fixed-size chunks and folds each chunk into the running
/// hash state, so memory use is bounded regardless of file size. Returns an
/// error when the file does not exist or becomes unreadable mid-read; callers
/// sampling a live tree are expected to handle both.
pub fn hash_file(path: &Path) -> std::io::Result<Digest> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Hex encoding of a digest for log output
pub fn digest_hex(digest: &Digest) -> String {
    hex::encode(digest)
}
