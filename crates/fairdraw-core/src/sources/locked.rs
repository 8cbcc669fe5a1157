//! Mutex wrapper that turns an exclusive reader into a shareable source.

use std::io::{self, Read};
use std::sync::Mutex;

use crate::source::{EntropySource, SourceInfo, SourceKind};

static LOCKED_INFO: SourceInfo = SourceInfo {
    name: "locked",
    description: "Mutex-serialized std::io::Read",
    kind: SourceKind::Locked,
    secret_safe: false,
};

/// Serializes access to any `Read` so it can back a shared generator.
///
/// Reads use `read_exact`, so a short read from the inner reader surfaces as
/// `UnexpectedEof` rather than a partially filled buffer.
///
/// ```
/// use fairdraw_core::{EntropySource, sources::LockedSource};
///
/// let src = LockedSource::new(std::io::repeat(0xAB));
/// let mut buf = [0u8; 4];
/// src.fill(&mut buf).unwrap();
/// assert_eq!(buf, [0xAB; 4]);
/// ```
pub struct LockedSource<R> {
    reader: Mutex<R>,
}

impl<R: Read + Send> LockedSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }

    /// Unwrap the inner reader.
    pub fn into_inner(self) -> R {
        self.reader.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<R> std::fmt::Debug for LockedSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockedSource").finish_non_exhaustive()
    }
}

impl<R: Read + Send> EntropySource for LockedSource<R> {
    fn info(&self) -> &SourceInfo {
        &LOCKED_INFO
    }

    fn fill(&self, buf: &mut [u8]) -> io::Result<()> {
        let mut reader = self.reader.lock().unwrap_or_else(|e| e.into_inner());
        reader.read_exact(buf)
    }
}
