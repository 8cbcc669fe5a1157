//! Fixed byte script source for tests.

use std::io;
use std::sync::Mutex;

use crate::source::{EntropySource, SourceInfo, SourceKind};

static REPLAY_INFO: SourceInfo = SourceInfo {
    name: "replay",
    description: "Replays a fixed byte script, then repeats its last byte",
    kind: SourceKind::Replay,
    secret_safe: false,
};

/// Feeds a scripted byte sequence, so tests can force exact draws.
///
/// Once the script is exhausted every further byte equals the final scripted
/// byte, so callers never see end-of-stream. An empty script yields zeros.
pub struct ReplaySource {
    data: Vec<u8>,
    pos: Mutex<usize>,
}

impl ReplaySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            pos: Mutex::new(0),
        }
    }

    /// Script made of little-endian `u64` words, matching how the generator reads integers.
    pub fn from_u64s(words: &[u64]) -> Self {
        Self::new(words.iter().flat_map(|w| w.to_le_bytes()).collect())
    }

    /// Bytes consumed so far (saturates at the script length).
    pub fn consumed(&self) -> usize {
        *self.pos.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for ReplaySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplaySource")
            .field("len", &self.data.len())
            .field("consumed", &self.consumed())
            .finish()
    }
}

impl EntropySource for ReplaySource {
    fn info(&self) -> &SourceInfo {
        &REPLAY_INFO
    }

    fn fill(&self, buf: &mut [u8]) -> io::Result<()> {
        let Some(&last) = self.data.last() else {
            buf.fill(0);
            return Ok(());
        };
        let mut pos = self.pos.lock().unwrap_or_else(|e| e.into_inner());
        for b in buf.iter_mut() {
            if *pos < self.data.len() {
                *b = self.data[*pos];
                *pos += 1;
            } else {
                *b = last;
            }
        }
        Ok(())
    }
}
