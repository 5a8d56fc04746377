//! API Request Handlers

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, QueryRejection},
        Form, Json, Query, State,
    },
    http::{StatusCode, Uri},
    response::Redirect,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::info;

use super::middleware::RateLimiter;
use super::types::*;
use crate::core::{CsvStore, FoodTruck};
use crate::models::{
    AppConfig, AppError, AppResult, BookingRequest, NewStaff, Schedule, StaffMember, TruckInfo,
};
use crate::utils::constants::APP_VERSION;

/// Shared application state
pub struct AppState {
    pub truck: Mutex<FoodTruck>,
    pub store: CsvStore,
    pub rate_limiter: Arc<RateLimiter>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(truck: FoodTruck, store: CsvStore, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            truck: Mutex::new(truck),
            store,
            rate_limiter,
            start_time: Instant::now(),
        }
    }

    /// Prepare the data directory, load both files and build the state
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let store = CsvStore::new(&config.data_dir);
        store.ensure_layout()?;

        let mut truck = FoodTruck::new(&config.truck_name, &config.truck_location)
            .with_pepper(&config.secret_key);
        truck.load_staff_from_store(&store)?;
        truck.load_schedules_from_store(&store)?;
        info!(
            staff = truck.list_staff().len(),
            schedules = truck.list_schedules().len(),
            "🚚 {}",
            truck.intro()
        );

        let limiter = Arc::new(RateLimiter::per_minute(config.rate_limit_per_minute));
        Ok(Self::new(truck, store, limiter))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Truck
// ============================================

pub async fn truck_info(State(state): State<Arc<AppState>>) -> Json<ApiResponse<TruckInfo>> {
    let start = Instant::now();
    let truck = state.truck.lock().await;
    Json(ApiResponse::success(truck.info(), elapsed_ms(start)))
}

// ============================================
// Staff
// ============================================

pub async fn list_staff(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<StaffListData>>> {
    let start = Instant::now();
    let mut truck = state.truck.lock().await;
    truck.load_staff_from_store(&state.store)?;

    let staff = truck.list_staff().to_vec();
    let data = StaffListData {
        count: staff.len(),
        staff,
    };
    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

async fn register_staff(state: &AppState, input: &NewStaff) -> AppResult<StaffMember> {
    let mut truck = state.truck.lock().await;
    // Pick up rows written by other processes before the duplicate check
    truck.load_staff_from_store(&state.store)?;
    truck.add_staff(&state.store, input)
}

pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewStaff>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<StaffMember>>)> {
    let start = Instant::now();
    let Json(input) = payload?;
    let member = register_staff(&state, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(member, elapsed_ms(start))),
    ))
}

/// Form post from the add-staff page; redirects to the staff list
pub async fn add_staff_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Form<NewStaff>, FormRejection>,
) -> AppResult<Redirect> {
    let Form(input) = payload?;
    register_staff(&state, &input).await?;
    Ok(Redirect::to("/staff"))
}

/// Inputs of the add-staff page, in form order
pub async fn registration_form() -> Json<ApiResponse<RegistrationFormData>> {
    let start = Instant::now();
    let field = |name, required, format| FormField {
        name,
        required,
        format,
    };
    let fields = vec![
        field("email", true, Some("email")),
        field("password", true, None),
        field("first", true, None),
        field("last", true, None),
        field("phone", false, None),
        field("address", false, None),
        field("dob", false, Some("YYYY-MM-DD")),
        field("sex", false, None),
    ];
    Json(ApiResponse::success(
        RegistrationFormData { fields },
        elapsed_ms(start),
    ))
}

// ============================================
// Schedules
// ============================================

pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<ScheduleListData>>> {
    let start = Instant::now();
    let Query(query) = query?;

    let mut truck = state.truck.lock().await;
    truck.load_schedules_from_store(&state.store)?;

    let mut schedules: Vec<&Schedule> = match &query.date {
        Some(date) => truck.schedules_on(date),
        None => truck.list_schedules().iter().collect(),
    };
    if let Some(email) = &query.staff_email {
        let email = email.trim();
        schedules.retain(|s| s.staff_email.eq_ignore_ascii_case(email));
    }

    let schedules: Vec<Schedule> = schedules.into_iter().cloned().collect();
    let data = ScheduleListData {
        count: schedules.len(),
        schedules,
    };
    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

/// Staff dropdown for the booking form
pub async fn booking_options(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<BookingOptionsData>>> {
    let start = Instant::now();
    let mut truck = state.truck.lock().await;
    truck.load_staff_from_store(&state.store)?;

    let staff = truck
        .list_staff()
        .iter()
        .map(|s| StaffOption {
            email: s.email.clone(),
            name: s.full_name(),
        })
        .collect();
    Ok(Json(ApiResponse::success(
        BookingOptionsData { staff },
        elapsed_ms(start),
    )))
}

/// Reload both files, then check-and-append under one lock
async fn book(state: &AppState, request: &BookingRequest) -> AppResult<Schedule> {
    let mut truck = state.truck.lock().await;
    truck.load_staff_from_store(&state.store)?;
    truck.load_schedules_from_store(&state.store)?;
    truck.book_schedule(&state.store, request)
}

pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Schedule>>)> {
    let start = Instant::now();
    let Json(request) = payload?;
    let shift = book(&state, &request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(shift, elapsed_ms(start))),
    ))
}

/// Form post from the booking page; redirects to the schedule list
pub async fn book_schedule_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Form<BookingRequest>, FormRejection>,
) -> AppResult<Redirect> {
    let Form(request) = payload?;
    book(&state, &request).await?;
    Ok(Redirect::to("/schedules"))
}

// ============================================
// Customers
// ============================================

pub async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<CustomerListData>> {
    let start = Instant::now();
    let truck = state.truck.lock().await;
    let customers = truck.list_customers().to_vec();
    Json(ApiResponse::success(
        CustomerListData {
            count: customers.len(),
            customers,
        },
        elapsed_ms(start),
    ))
}

pub async fn add_customer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<CustomerListData>>)> {
    let start = Instant::now();
    let Json(input) = payload?;

    let mut truck = state.truck.lock().await;
    truck.add_customer(&input.name)?;
    let customers = truck.list_customers().to_vec();
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            CustomerListData {
                count: customers.len(),
                customers,
            },
            elapsed_ms(start),
        )),
    ))
}

// ============================================
// Fallback
// ============================================

pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(uri.path())
}
