//! Capability provider contract
//!
//! The facade never talks to a host AI engine directly. It consumes an
//! injected [`CapabilityProvider`], which makes the core usable against any
//! conforming backend and deterministic under test with fakes.

mod provider;
mod session;

pub use provider::*;
pub use session::*;
