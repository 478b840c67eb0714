//! Data model shared by every operation kind.

pub mod capability;
pub mod config;
pub mod request;
pub mod results;

pub use capability::*;
pub use config::*;
pub use request::*;
pub use results::*;
