//! Abstract entropy source trait and source metadata.
//!
//! Every entropy source implements the [`EntropySource`] trait, which provides
//! metadata via [`SourceInfo`] and fills caller-owned buffers. A source either
//! fills the whole buffer or fails; partial fills are never reported as success.

use std::io;

/// Kind of entropy source based on where its bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Operating system CSPRNG.
    Os,
    /// Seeded keystream, reproducible from seed and label.
    Deterministic,
    /// Mutex-serialized wrapper around an exclusive reader.
    Locked,
    /// Fixed byte script replayed for tests.
    Replay,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Os => write!(f, "os"),
            Self::Deterministic => write!(f, "deterministic"),
            Self::Locked => write!(f, "locked"),
            Self::Replay => write!(f, "replay"),
        }
    }
}

/// Metadata about an entropy source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Unique identifier (e.g. `"os"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    /// Source kind for classification.
    pub kind: SourceKind,
    /// Whether output from this source may be used for keys, tokens and other secrets.
    ///
    /// Deterministic and replay sources are predictable by construction and
    /// always report `false`. A locked wrapper cannot know what it wraps and
    /// reports `false` as well.
    pub secret_safe: bool,
}

/// Trait that every entropy source must implement.
///
/// Sources are shared between threads through `Arc<dyn EntropySource>`, so
/// implementations that cannot serve concurrent reads must serialize
/// internally (see [`crate::sources::LockedSource`]).
pub trait EntropySource: Send + Sync {
    /// Source metadata.
    fn info(&self) -> &SourceInfo;

    /// Fill `buf` completely with entropy, or fail.
    fn fill(&self, buf: &mut [u8]) -> io::Result<()>;

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }
}

impl<S: EntropySource + ?Sized> EntropySource for std::sync::Arc<S> {
    fn info(&self) -> &SourceInfo {
        (**self).info()
    }

    fn fill(&self, buf: &mut [u8]) -> io::Result<()> {
        (**self).fill(buf)
    }
}

impl<S: EntropySource + ?Sized> EntropySource for Box<S> {
    fn info(&self) -> &SourceInfo {
        (**self).info()
    }

    fn fill(&self, buf: &mut [u8]) -> io::Result<()> {
        (**self).fill(buf)
    }
}
