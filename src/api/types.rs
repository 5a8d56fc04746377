//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::models::{Schedule, StaffMember};

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// ============================================
// Staff
// ============================================

#[derive(Debug, Serialize)]
pub struct StaffListData {
    pub count: usize,
    pub staff: Vec<StaffMember>,
}

/// One entry of the booking form's staff dropdown
#[derive(Debug, Serialize)]
pub struct StaffOption {
    pub email: String,
    pub name: String,
}

/// One input of the registration form
#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationFormData {
    pub fields: Vec<FormField>,
}

#[derive(Debug, Serialize)]
pub struct BookingOptionsData {
    pub staff: Vec<StaffOption>,
}

// ============================================
// Schedules
// ============================================

/// Optional filters for the schedule listing
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub staff_email: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleListData {
    pub count: usize,
    pub schedules: Vec<Schedule>,
}

// ============================================
// Customers
// ============================================

#[derive(Debug, Deserialize)]
pub struct NewCustomer {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerListData {
    pub count: usize,
    pub customers: Vec<String>,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
