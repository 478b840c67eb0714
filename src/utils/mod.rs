//! Utility modules for ondevice-ai
//!
//! This module contains various utility functions and types used throughout the library.

pub mod cancel;
pub mod text;

pub use cancel::AbortHandle;
pub use text::*;
