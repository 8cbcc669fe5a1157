//! Entropy source implementations.
//!
//! - [`OsSource`]: platform CSPRNG, the secure default.
//! - [`DeterministicSource`]: seeded ChaCha20 keystream for tests and simulations.
//! - [`LockedSource`]: serializes an exclusive `std::io::Read`.
//! - [`ReplaySource`]: replays a fixed byte script.

pub mod deterministic;
pub mod locked;
pub mod os;
pub mod replay;

pub use deterministic::DeterministicSource;
pub use locked::LockedSource;
pub use os::OsSource;
pub use replay::ReplaySource;
