//! Truckshift Library
//!
//! Back office for a campus food truck:
//! - Staff registry persisted to `data/users.csv`
//! - Shift booking with per-staff slot conflict detection, persisted to `data/schedules.csv`
//! - In-memory customer list
//! - Deployment diagnostics for the hosting platform

pub mod api;
pub mod core;
pub mod diagnostics;
pub mod models;
pub mod utils;

pub use crate::core::{CsvStore, FoodTruck};
pub use api::{create_router, AppState};
pub use diagnostics::{CheckStatus, Report};
pub use models::{AppConfig, AppError, AppResult, ErrorCode};
