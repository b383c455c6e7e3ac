//! Engine integration tests.

mod support;

#[cfg(feature = "http")]
mod remote;
#[cfg(feature = "http")]
mod server;
#[cfg(feature = "http")]
mod equivalence;
