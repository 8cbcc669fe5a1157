//! # fairdraw-core
//!
//! **Bias-free random draws over a pluggable entropy source.**
//!
//! `fairdraw-core` turns raw bytes from any [`EntropySource`] into exactly
//! uniform integers and floats, and builds the common distributions on top:
//! Bernoulli, categorical, exponential, uniform, Normal, Poisson, Gamma and
//! Zipf, plus weighted selection and slice helpers.
//!
//! ## Quick Start
//!
//! ```
//! use fairdraw_core::Generator;
//!
//! // OS CSPRNG by default
//! let rng = Generator::os();
//!
//! let die = rng.int_in_range(1, 6).unwrap();
//! assert!((1..=6).contains(&die));
//!
//! let x = rng.normal(10.0, 2.0).unwrap();
//! assert!(x.is_finite());
//! ```
//!
//! ## Architecture
//!
//! Source → Generator (rejection sampling) → Samplers / Weighted / Collection
//!
//! Four sources ship with the crate:
//! - **Os** (default): the platform CSPRNG via `getrandom`.
//! - **Deterministic**: ChaCha20 keystream keyed from a seed and optional
//!   label. Reproducible, never secret-safe.
//! - **Locked**: serializes any exclusive `std::io::Read` behind a mutex.
//! - **Replay**: replays a fixed byte script, for exact test fixtures.
//!
//! Every operation returns [`Result`]; invalid parameters are rejected before
//! any entropy is read. [`Generator::must`] gives a panicking view.

pub mod collection;
mod derive;
pub mod distributions;
pub mod error;
pub mod generator;
pub mod must;
pub mod source;
pub mod sources;
pub mod weighted;
pub mod zipf;

pub use distributions::POISSON_PTRS_THRESHOLD;
pub use error::{Error, Result};
pub use generator::{Generator, GeneratorBuilder};
pub use must::Must;
pub use source::{EntropySource, SourceInfo, SourceKind};
pub use sources::{DeterministicSource, LockedSource, OsSource, ReplaySource};
pub use zipf::Zipf;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
