// ============================================================
// ENCODING DETECTION
// ============================================================
// Decode government exports that may be UTF-8, UTF-16 or Windows-1252

use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::debug;

use crate::domain::error::Result;

/// Read a file and decode it to text.
///
/// BOM wins, then strict UTF-8, then Windows-1252. Malformed sequences are
/// replaced; only I/O failures are errors.
pub fn read_decoded(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let (text, encoding) = decode_bytes(&bytes);
    debug!(path = %path.display(), encoding = encoding.name(), "Decoded data file");
    Ok(text)
}

pub fn decode_bytes(bytes: &[u8]) -> (String, &'static Encoding) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (text.into_owned(), encoding);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), UTF_8),
        Err(_) => {
            let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text.into_owned(), WINDOWS_1252)
        }
    }
}
