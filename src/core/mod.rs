//! Core Module - Business Logic
//!
//! The food truck domain and its CSV persistence.

pub mod store;
pub mod truck;

pub use store::*;
pub use truck::*;
