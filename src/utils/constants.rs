//! Constants Module - Single Source of Truth
//!
//! File names, CSV headers, environment variable names and defaults.
//! Other modules refer to these instead of repeating literals.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "Truckshift";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default truck name
pub const DEFAULT_TRUCK_NAME: &str = "CS120 Food Truck";

/// Default truck location
pub const DEFAULT_TRUCK_LOCATION: &str = "GSU Campus";

// ============================================
// STORAGE
// ============================================

/// Default data directory (relative to the working directory)
pub const DEFAULT_DATA_DIR: &str = "data";

/// Staff registry file name
pub const STAFF_FILE: &str = "users.csv";

/// Shift schedule file name
pub const SCHEDULE_FILE: &str = "schedules.csv";

/// Staff CSV header, in write order
pub const STAFF_HEADER: [&str; 8] = [
    "Email",
    "Password",
    "First_Name",
    "Last_Name",
    "Mobile_Number",
    "Address",
    "DOB",
    "Sex",
];

/// Schedule CSV header, in write order
pub const SCHEDULE_HEADER: [&str; 6] = [
    "Manager",
    "Date",
    "Time",
    "staff_Email",
    "staff_Name",
    "work_Time",
];

// ============================================
// DATE / TIME FORMATS
// ============================================

/// Canonical shift date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical shift time format
pub const TIME_FORMAT: &str = "%H:%M";

/// Accepted alternative time format (HTML time inputs with seconds)
pub const TIME_FORMAT_SECONDS: &str = "%H:%M:%S";

// ============================================
// SERVER
// ============================================

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default port when neither PORT nor TRUCKSHIFT_PORT is set
pub const DEFAULT_PORT: u16 = 8080;

/// Default SMTP submission port
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Minimum SECRET_KEY length in production
pub const MIN_SECRET_KEY_LEN: usize = 32;

/// SECRET_KEY used in development when none is set
pub const DEV_SECRET_KEY: &str = "dev-insecure-secret-key-change-me";

/// Requests per client per minute
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 100;

/// Rate limiter cleanup interval (seconds)
pub const RATE_LIMIT_CLEANUP_SECS: u64 = 60;

// ============================================
// ENVIRONMENT VARIABLES
// ============================================

pub const ENV_SECRET_KEY: &str = "SECRET_KEY";
pub const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub const ENV_SMTP_USERNAME: &str = "SMTP_USERNAME";
pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
pub const ENV_FROM_EMAIL: &str = "FROM_EMAIL";
pub const ENV_ADMIN_EMAILS: &str = "ADMIN_EMAILS";
pub const ENV_FLASK_ENV: &str = "FLASK_ENV";
pub const ENV_APP_ENV: &str = "APP_ENV";
pub const ENV_PORT: &str = "PORT";
pub const ENV_LOCAL_PORT: &str = "TRUCKSHIFT_PORT";
pub const ENV_HOST: &str = "TRUCKSHIFT_HOST";
pub const ENV_DATA_DIR: &str = "DATA_DIR";
pub const ENV_TRUCK_NAME: &str = "TRUCK_NAME";
pub const ENV_TRUCK_LOCATION: &str = "TRUCK_LOCATION";
pub const ENV_RATE_LIMIT: &str = "RATE_LIMIT_PER_MINUTE";

/// Every variable the service reads, for documentation checks
pub const ALL_ENV_VARS: [&str; 16] = [
    ENV_SECRET_KEY,
    ENV_SMTP_SERVER,
    ENV_SMTP_PORT,
    ENV_SMTP_USERNAME,
    ENV_SMTP_PASSWORD,
    ENV_FROM_EMAIL,
    ENV_ADMIN_EMAILS,
    ENV_FLASK_ENV,
    ENV_APP_ENV,
    ENV_PORT,
    ENV_LOCAL_PORT,
    ENV_HOST,
    ENV_DATA_DIR,
    ENV_TRUCK_NAME,
    ENV_TRUCK_LOCATION,
    ENV_RATE_LIMIT,
];

/// Variables pre-populated by render.yaml (PORT belongs to the platform)
pub const RENDER_ENV_VARS: [&str; 12] = [
    ENV_SECRET_KEY,
    ENV_SMTP_SERVER,
    ENV_SMTP_PORT,
    ENV_SMTP_USERNAME,
    ENV_SMTP_PASSWORD,
    ENV_FROM_EMAIL,
    ENV_ADMIN_EMAILS,
    ENV_FLASK_ENV,
    ENV_DATA_DIR,
    ENV_TRUCK_NAME,
    ENV_TRUCK_LOCATION,
    ENV_RATE_LIMIT,
];
