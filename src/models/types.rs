//! Core domain types: staff members and shift schedules

use chrono::{NaiveDate, NaiveTime};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::{AppError, AppResult};
use crate::utils::constants::{DATE_FORMAT, TIME_FORMAT, TIME_FORMAT_SECONDS};

/// A registered staff member (one row of users.csv)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffMember {
    pub email: String,
    /// Stored digest; never serialized
    #[serde(skip_serializing)]
    pub password: String,
    pub first: String,
    pub last: String,
    pub phone: String,
    pub address: String,
    pub dob: String,
    pub sex: String,
}

impl StaffMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    /// Case-insensitive email match
    #[inline]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Fields in users.csv column order
    pub fn to_record(&self) -> [&str; 8] {
        [
            self.email.as_str(),
            self.password.as_str(),
            self.first.as_str(),
            self.last.as_str(),
            self.phone.as_str(),
            self.address.as_str(),
            self.dob.as_str(),
            self.sex.as_str(),
        ]
    }
}

/// Staff registration input (form or JSON)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStaff {
    pub email: String,
    pub password: String,
    pub first: String,
    pub last: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub sex: String,
}

impl NewStaff {
    /// Check required fields and formats, returning a trimmed copy
    pub fn validated(&self) -> AppResult<NewStaff> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(AppError::invalid_input("email", "is required"));
        }
        EmailAddress::from_str(email).map_err(|e| AppError::invalid_input("email", e))?;

        if self.password.is_empty() {
            return Err(AppError::invalid_input("password", "is required"));
        }
        let first = required("first", &self.first)?;
        let last = required("last", &self.last)?;

        let dob = self.dob.trim();
        let dob = if dob.is_empty() {
            String::new()
        } else {
            normalize_date(dob).map_err(|_| AppError::invalid_input("dob", "expected YYYY-MM-DD"))?
        };

        Ok(NewStaff {
            email: email.to_string(),
            password: self.password.clone(),
            first,
            last,
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            dob,
            sex: self.sex.trim().to_string(),
        })
    }
}

/// One booked shift (one row of schedules.csv)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub manager: String,
    pub date: String,
    pub time: String,
    pub staff_email: String,
    pub staff_name: String,
    pub work_time: String,
}

impl Schedule {
    /// Whether this shift occupies the given (already normalized) slot
    pub fn occupies(&self, staff_email: &str, date: &str, time: &str) -> bool {
        self.staff_email.eq_ignore_ascii_case(staff_email)
            && slot_key(&self.date, normalize_date) == date
            && slot_key(&self.time, normalize_time) == time
    }

    /// Fields in schedules.csv column order
    pub fn to_record(&self) -> [&str; 6] {
        [
            self.manager.as_str(),
            self.date.as_str(),
            self.time.as_str(),
            self.staff_email.as_str(),
            self.staff_name.as_str(),
            self.work_time.as_str(),
        ]
    }
}

/// Rows loaded from disk may predate normalization; compare them raw if unparsable
fn slot_key(raw: &str, normalize: fn(&str) -> AppResult<String>) -> String {
    normalize(raw).unwrap_or_else(|_| raw.trim().to_string())
}

/// Booking input (form or JSON)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    pub manager: String,
    pub date: String,
    pub time: String,
    pub staff_email: String,
    pub work_time: String,
}

impl BookingRequest {
    /// Check required fields and normalize date/time
    pub fn validated(&self) -> AppResult<BookingRequest> {
        Ok(BookingRequest {
            manager: required("manager", &self.manager)?,
            date: normalize_date(&self.date)?,
            time: normalize_time(&self.time)?,
            staff_email: required("staff_email", &self.staff_email)?,
            work_time: required("work_time", &self.work_time)?,
        })
    }
}

/// Truck summary shown on the landing route
#[derive(Debug, Clone, Serialize)]
pub struct TruckInfo {
    pub name: String,
    pub location: String,
    pub intro: String,
    pub staff_count: usize,
    pub schedule_count: usize,
    pub customer_count: usize,
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::invalid_input(field, "is required"))
    } else {
        Ok(value.to_string())
    }
}

/// Normalize a shift date to YYYY-MM-DD
pub fn normalize_date(raw: &str) -> AppResult<String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .map_err(|_| AppError::invalid_input("date", format!("'{}' is not YYYY-MM-DD", raw.trim())))
}

/// Normalize a shift time to HH:MM (seconds are dropped)
pub fn normalize_time(raw: &str) -> AppResult<String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, TIME_FORMAT_SECONDS))
        .map(|t| t.format(TIME_FORMAT).to_string())
        .map_err(|_| AppError::invalid_input("time", format!("'{}' is not HH:MM", raw)))
}
