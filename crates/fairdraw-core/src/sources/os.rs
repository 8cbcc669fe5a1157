//! Operating system CSPRNG source.

use std::io;

use crate::source::{EntropySource, SourceInfo, SourceKind};

static OS_INFO: SourceInfo = SourceInfo {
    name: "os",
    description: "Platform CSPRNG via the getrandom crate",
    kind: SourceKind::Os,
    secret_safe: true,
};

/// Secure default source backed by the OS random number generator.
///
/// Works cross-platform (Unix, Windows, WASM, etc.) without manual file I/O.
/// Stateless, so concurrent reads need no locking.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSource;

impl OsSource {
    pub fn new() -> Self {
        Self
    }
}

impl EntropySource for OsSource {
    fn info(&self) -> &SourceInfo {
        &OS_INFO
    }

    fn fill(&self, buf: &mut [u8]) -> io::Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        getrandom::fill(buf).map_err(|e| io::Error::other(format!("OS CSPRNG failed: {e}")))
    }
}
