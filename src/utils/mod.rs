//! Utils Module - Helper Functions & Shared Utilities
//!
//! Constants, the CSV codec and password digests shared across the crate.

pub mod constants;
pub mod credentials;
pub mod csv;

pub use constants::*;
pub use credentials::*;
