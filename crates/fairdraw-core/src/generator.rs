//! Bias-free generator over a pluggable entropy source.
//!
//! Architecture:
//! 1. Read raw bytes from one [`EntropySource`]
//! 2. Turn them into uniform `u64`s (little-endian)
//! 3. Reject the biased tail for bounded draws (no modulo bias)
//! 4. Build unit-interval floats from the top 53 bits
//! 5. Every distribution sampler in the crate draws through these primitives
//!
//! A generator is `Send + Sync`. The only mutable state it owns is the
//! single-slot Normal spare, guarded by its own mutex.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::source::EntropySource;
use crate::sources::OsSource;

/// `2^53`, the number of distinct values produced by [`Generator::uniform_f64`].
const F64_SCALE: f64 = (1u64 << 53) as f64;

/// Thread-safe bias-free generator.
pub struct Generator {
    source: Arc<dyn EntropySource>,
    pub(crate) spare: Mutex<Option<f64>>,
    cache_spare: bool,
    clock: fn() -> SystemTime,
}

impl Generator {
    /// Create a generator that owns `source`.
    pub fn new(source: impl EntropySource + 'static) -> Self {
        Self::from_shared(Arc::new(source))
    }

    /// Create a generator over a source shared with other generators.
    pub fn from_shared(source: Arc<dyn EntropySource>) -> Self {
        GeneratorBuilder::new().shared_source(source).build()
    }

    /// Generator over the OS CSPRNG.
    pub fn os() -> Self {
        Self::new(OsSource)
    }

    /// Start configuring a generator.
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    /// The underlying entropy source.
    pub fn source(&self) -> &Arc<dyn EntropySource> {
        &self.source
    }

    /// Current time from the generator's clock.
    pub fn now(&self) -> SystemTime {
        (self.clock)()
    }

    pub(crate) fn caches_spare(&self) -> bool {
        self.cache_spare
    }

    // -----------------------------------------------------------------------
    // Raw bytes
    // -----------------------------------------------------------------------

    /// Fill `buf` from the source.
    ///
    /// On failure the buffer is zeroed before the error is returned, so a
    /// half-written secret never leaks.
    pub fn fill(&self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.source.fill(buf) {
            buf.fill(0);
            log::warn!("entropy source {} failed: {}", self.source.name(), e);
            return Err(Error::EntropySource(e));
        }
        Ok(())
    }

    /// `n` fresh bytes. `n == 0` returns an empty vec without touching the source.
    pub fn bytes(&self, n: usize) -> Result<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; n];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    // -----------------------------------------------------------------------
    // Integers
    // -----------------------------------------------------------------------

    /// Uniform `u64` from 8 little-endian bytes.
    pub fn uniform_u64(&self) -> Result<u64> {
        let mut b = [0u8; 8];
        self.fill(&mut b)?;
        Ok(u64::from_le_bytes(b))
    }

    /// Uniform integer in `[0, n)` by rejection sampling.
    ///
    /// Draws at or above `limit = u64::MAX - (u64::MAX % n)` are discarded, so
    /// every residue class has exactly the same number of accepted draws. The
    /// rejection probability is below one half for every `n`.
    pub fn uniform_u64_below(&self, n: u64) -> Result<u64> {
        if n == 0 {
            return Err(Error::InvalidBound);
        }
        let limit = u64::MAX - (u64::MAX % n);
        let mut redraws = 0u32;
        loop {
            let u = self.uniform_u64()?;
            if u < limit {
                if redraws > 0 {
                    log::trace!("uniform_u64_below({n}) accepted after {redraws} redraws");
                }
                return Ok(u % n);
            }
            redraws += 1;
        }
    }

    /// Uniform `usize` in `[0, n)`.
    pub fn usize_below(&self, n: usize) -> Result<usize> {
        let bound = u64::try_from(n).map_err(|_| Error::ResultOutOfRange)?;
        let u = self.uniform_u64_below(bound)?;
        usize::try_from(u).map_err(|_| Error::ResultOutOfRange)
    }

    /// Uniform `i64` in `[0, n)`; `n` must be positive.
    pub fn i64_below(&self, n: i64) -> Result<i64> {
        if n <= 0 {
            return Err(Error::InvalidBound);
        }
        let u = self.uniform_u64_below(n as u64)?;
        Ok(u as i64)
    }

    /// Uniform `i64` in the inclusive range `[min, max]`.
    ///
    /// The span is computed in wrapping two's-complement arithmetic, so
    /// `i64::MIN..=i64::MAX` works: its span of `2^64` wraps to zero and is
    /// served by a single raw draw.
    pub fn int_in_range(&self, min: i64, max: i64) -> Result<i64> {
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }
        let span = (max as u64).wrapping_sub(min as u64).wrapping_add(1);
        if span == 0 {
            return Ok(self.uniform_u64()? as i64);
        }
        let offset = self.uniform_u64_below(span)?;
        Ok((min as u64).wrapping_add(offset) as i64)
    }

    /// Uniform `i32` in `[min, max]`.
    pub fn i32_in_range(&self, min: i32, max: i32) -> Result<i32> {
        let v = self.int_in_range(i64::from(min), i64::from(max))?;
        i32::try_from(v).map_err(|_| Error::ResultOutOfRange)
    }

    /// Uniform `isize` in `[min, max]`.
    pub fn isize_in_range(&self, min: isize, max: isize) -> Result<isize> {
        let lo = i64::try_from(min).map_err(|_| Error::ResultOutOfRange)?;
        let hi = i64::try_from(max).map_err(|_| Error::ResultOutOfRange)?;
        let v = self.int_in_range(lo, hi)?;
        isize::try_from(v).map_err(|_| Error::ResultOutOfRange)
    }

    /// Any `i32`, uniform over the whole domain.
    pub fn any_i32(&self) -> Result<i32> {
        self.i32_in_range(i32::MIN, i32::MAX)
    }

    /// Any `i64`, uniform over the whole domain.
    pub fn any_i64(&self) -> Result<i64> {
        self.int_in_range(i64::MIN, i64::MAX)
    }

    /// Uniform in `[1, i32::MAX]`.
    pub fn positive_i32(&self) -> Result<i32> {
        self.i32_in_range(1, i32::MAX)
    }

    /// Uniform in `[1, i64::MAX]`.
    pub fn positive_i64(&self) -> Result<i64> {
        self.int_in_range(1, i64::MAX)
    }

    /// Uniform in `[i32::MIN, -1]`.
    pub fn negative_i32(&self) -> Result<i32> {
        self.i32_in_range(i32::MIN, -1)
    }

    /// Uniform in `[i64::MIN, -1]`.
    pub fn negative_i64(&self) -> Result<i64> {
        self.int_in_range(i64::MIN, -1)
    }

    // -----------------------------------------------------------------------
    // Floats and bools
    // -----------------------------------------------------------------------

    /// Uniform `f64` in `[0, 1)` with full 53-bit mantissa precision.
    ///
    /// The low 11 bits of a `u64` draw are discarded and the rest divided by
    /// `2^53`; the largest possible result is `1 - 2^-53`.
    pub fn uniform_f64(&self) -> Result<f64> {
        let u = self.uniform_u64()? >> 11;
        Ok(u as f64 / F64_SCALE)
    }

    /// Fair coin from the lowest bit of one `u64` draw.
    pub fn uniform_bool(&self) -> Result<bool> {
        Ok(self.uniform_u64()? & 1 == 1)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::os()
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("source", &self.source.name())
            .field("cache_spare", &self.cache_spare)
            .finish_non_exhaustive()
    }
}

/// Lets a generator stand in wherever an entropy reader is expected.
impl io::Read for &Generator {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.fill(buf) {
            Ok(()) => Ok(buf.len()),
            Err(Error::EntropySource(e)) => Err(e),
            Err(e) => Err(io::Error::other(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// In-code configuration for a [`Generator`].
///
/// Defaults: OS source, `SystemTime::now` clock, Normal spare caching on.
pub struct GeneratorBuilder {
    source: Option<Arc<dyn EntropySource>>,
    clock: fn() -> SystemTime,
    cache_spare: bool,
}

impl GeneratorBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            clock: SystemTime::now,
            cache_spare: true,
        }
    }

    /// Use `source` as the generator's only entropy source.
    pub fn source(self, source: impl EntropySource + 'static) -> Self {
        self.shared_source(Arc::new(source))
    }

    /// Use a source that other generators may also hold.
    pub fn shared_source(mut self, source: Arc<dyn EntropySource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace the clock used by time-dependent samplers.
    pub fn clock(mut self, clock: fn() -> SystemTime) -> Self {
        self.clock = clock;
        self
    }

    /// Keep the second Box-Muller deviate for the next Normal draw.
    ///
    /// When off, every Normal draw consumes two fresh uniforms and discards
    /// the second deviate.
    pub fn cache_normal_spare(mut self, enabled: bool) -> Self {
        self.cache_spare = enabled;
        self
    }

    pub fn build(self) -> Generator {
        let source = self.source.unwrap_or_else(|| Arc::new(OsSource));
        log::debug!(
            "generator built (source={}, cache_spare={})",
            source.name(),
            self.cache_spare
        );
        Generator {
            source,
            spare: Mutex::new(None),
            cache_spare: self.cache_spare,
            clock: self.clock,
        }
    }
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
