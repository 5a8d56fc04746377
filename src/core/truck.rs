//! FoodTruck - staff registry, customers and shift booking
//!
//! The truck owns the in-memory view of both data files. Mutating
//! operations write through the [`CsvStore`] first and only update
//! memory once the row is on disk.

use tracing::{info, warn};

use super::store::CsvStore;
use crate::models::{
    normalize_date, AppError, AppResult, BookingRequest, NewStaff, Schedule, StaffMember,
    TruckInfo,
};
use crate::utils::credentials::digest_password;

pub struct FoodTruck {
    pub name: String,
    pub location: String,
    staff: Vec<StaffMember>,
    customers: Vec<String>,
    schedules: Vec<Schedule>,
    /// SECRET_KEY, used to pepper password digests
    pepper: String,
}

impl FoodTruck {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            staff: Vec::new(),
            customers: Vec::new(),
            schedules: Vec::new(),
            pepper: String::new(),
        }
    }

    pub fn with_pepper(mut self, pepper: impl Into<String>) -> Self {
        self.pepper = pepper.into();
        self
    }

    /// Short description of this food truck
    pub fn intro(&self) -> String {
        format!("{} is serving food at {}!", self.name, self.location)
    }

    pub fn info(&self) -> TruckInfo {
        TruckInfo {
            name: self.name.clone(),
            location: self.location.clone(),
            intro: self.intro(),
            staff_count: self.staff.len(),
            schedule_count: self.schedules.len(),
            customer_count: self.customers.len(),
        }
    }

    // ============================================
    // Customers
    // ============================================

    pub fn add_customer(&mut self, name: &str) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("name", "is required"));
        }
        self.customers.push(name.to_string());
        Ok(())
    }

    pub fn list_customers(&self) -> &[String] {
        &self.customers
    }

    // ============================================
    // Staff
    // ============================================

    pub fn list_staff(&self) -> &[StaffMember] {
        &self.staff
    }

    pub fn find_staff(&self, email: &str) -> Option<&StaffMember> {
        self.staff.iter().find(|s| s.has_email(email))
    }

    /// Replace the in-memory staff list with the file contents
    pub fn load_staff_from_store(&mut self, store: &CsvStore) -> AppResult<()> {
        self.staff = store.load_staff()?;
        Ok(())
    }

    /// Validate, digest the password, append to users.csv, then remember
    pub fn add_staff(&mut self, store: &CsvStore, input: &NewStaff) -> AppResult<StaffMember> {
        let input = input.validated()?;
        if self.find_staff(&input.email).is_some() {
            return Err(AppError::staff_duplicate(&input.email));
        }

        let member = StaffMember {
            password: digest_password(&self.pepper, &input.password),
            email: input.email,
            first: input.first,
            last: input.last,
            phone: input.phone,
            address: input.address,
            dob: input.dob,
            sex: input.sex,
        };
        store.append_staff(&member)?;
        self.staff.push(member.clone());
        Ok(member)
    }

    // ============================================
    // Schedules
    // ============================================

    pub fn list_schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Replace the in-memory schedule list with the file contents
    pub fn load_schedules_from_store(&mut self, store: &CsvStore) -> AppResult<()> {
        self.schedules = store.load_schedules()?;
        Ok(())
    }

    /// True when the staff member has no shift at this date/time.
    /// Callers pass normalized date and time.
    pub fn is_time_slot_available(&self, staff_email: &str, date: &str, time: &str) -> bool {
        !self
            .schedules
            .iter()
            .any(|s| s.occupies(staff_email.trim(), date, time))
    }

    /// Book a shift only if the slot is free; the staff name comes from the registry
    pub fn book_schedule(&mut self, store: &CsvStore, request: &BookingRequest) -> AppResult<Schedule> {
        let request = request.validated()?;

        let staff = self
            .find_staff(&request.staff_email)
            .ok_or_else(|| AppError::staff_not_found(&request.staff_email))?;
        let staff_email = staff.email.clone();
        let staff_name = staff.full_name();

        if !self.is_time_slot_available(&staff_email, &request.date, &request.time) {
            warn!(
                staff = %staff_name,
                date = %request.date,
                time = %request.time,
                "Cannot book: slot already taken"
            );
            return Err(AppError::schedule_conflict(&staff_name, &request.date, &request.time));
        }

        let shift = Schedule {
            manager: request.manager,
            date: request.date,
            time: request.time,
            staff_email,
            staff_name,
            work_time: request.work_time,
        };
        store.append_schedule(&shift)?;
        info!(staff = %shift.staff_name, date = %shift.date, time = %shift.time, "Booked shift");

        self.schedules.push(shift.clone());
        Ok(shift)
    }

    pub fn schedules_for_staff(&self, email: &str) -> Vec<&Schedule> {
        let email = email.trim();
        self.schedules
            .iter()
            .filter(|s| s.staff_email.eq_ignore_ascii_case(email))
            .collect()
    }

    /// Shifts on a date; an unparsable date falls back to a raw match
    pub fn schedules_on(&self, date: &str) -> Vec<&Schedule> {
        let wanted = normalize_date(date).unwrap_or_else(|_| date.trim().to_string());
        self.schedules
            .iter()
            .filter(|s| normalize_date(&s.date).map_or(s.date.trim() == wanted, |d| d == wanted))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::utils::credentials::verify_password;
    use tempfile::TempDir;

    fn setup() -> (TempDir, CsvStore, FoodTruck) {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        store.ensure_layout().unwrap();
        let truck = FoodTruck::new("CS120 Food Truck", "GSU Campus").with_pepper("pepper");
        (dir, store, truck)
    }

    fn ana() -> NewStaff {
        NewStaff {
            email: "ana@truck.io".into(),
            password: "pw".into(),
            first: "Ana".into(),
            last: "Lopez".into(),
            ..Default::default()
        }
    }

    fn booking(email: &str, date: &str, time: &str) -> BookingRequest {
        BookingRequest {
            manager: "Sam".into(),
            date: date.into(),
            time: time.into(),
            staff_email: email.into(),
            work_time: "4h".into(),
        }
    }

    #[test]
    fn test_intro() {
        let truck = FoodTruck::new("Taco Bus", "Pier 9");
        assert_eq!(truck.intro(), "Taco Bus is serving food at Pier 9!");
    }

    #[test]
    fn test_customers() {
        let mut truck = FoodTruck::new("T", "L");
        truck.add_customer("Jordan").unwrap();
        truck.add_customer(" Riley ").unwrap();
        assert!(truck.add_customer("  ").is_err());
        assert_eq!(truck.list_customers(), ["Jordan", "Riley"]);
        assert_eq!(truck.info().customer_count, 2);
    }

    #[test]
    fn test_add_staff_digests_and_persists() {
        let (_dir, store, mut truck) = setup();
        let member = truck.add_staff(&store, &ana()).unwrap();
        assert_ne!(member.password, "pw");
        assert!(verify_password("pepper", &member.password, "pw"));

        let mut reloaded = FoodTruck::new("T", "L");
        reloaded.load_staff_from_store(&store).unwrap();
        assert_eq!(reloaded.list_staff(), [member]);
    }

    #[test]
    fn test_add_staff_after_hand_edited_file() {
        let (_dir, store, mut truck) = setup();
        std::fs::write(
            store.staff_path(),
            "Email,Password,First_Name,Last_Name,Mobile_Number,Address,DOB,Sex\nzoe@truck.io,sha256:x,Zoe,Kim,,,,F",
        )
        .unwrap();
        truck.load_staff_from_store(&store).unwrap();
        truck.add_staff(&store, &ana()).unwrap();

        let mut reloaded = FoodTruck::new("T", "L");
        reloaded.load_staff_from_store(&store).unwrap();
        assert_eq!(reloaded.list_staff(), truck.list_staff());
        assert_eq!(reloaded.find_staff("zoe@truck.io").map(|s| s.sex.as_str()), Some("F"));
        assert!(reloaded.find_staff("ana@truck.io").is_some());
    }

    #[test]
    fn test_duplicate_staff_rejected_case_insensitive() {
        let (_dir, store, mut truck) = setup();
        truck.add_staff(&store, &ana()).unwrap();

        let mut again = ana();
        again.email = "ANA@truck.io".into();
        let err = truck.add_staff(&store, &again).unwrap_err();
        assert_eq!(err.code, ErrorCode::StaffDuplicate);
        assert_eq!(store.load_staff().unwrap().len(), 1);
    }

    #[test]
    fn test_booking_conflict() {
        let (_dir, store, mut truck) = setup();
        truck.add_staff(&store, &ana()).unwrap();

        let shift = truck
            .book_schedule(&store, &booking("ana@truck.io", "2025-03-07", "09:00"))
            .unwrap();
        assert_eq!(shift.staff_name, "Ana Lopez");

        // Same slot, different spelling of the time
        let err = truck
            .book_schedule(&store, &booking("ANA@truck.io", "2025-03-07", "9:00"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ScheduleConflict);

        // Different time is fine
        truck
            .book_schedule(&store, &booking("ana@truck.io", "2025-03-07", "13:00"))
            .unwrap();
        assert_eq!(store.load_schedules().unwrap().len(), 2);
    }

    #[test]
    fn test_other_staff_same_slot_ok() {
        let (_dir, store, mut truck) = setup();
        truck.add_staff(&store, &ana()).unwrap();
        let mut ben = ana();
        ben.email = "ben@truck.io".into();
        ben.first = "Ben".into();
        truck.add_staff(&store, &ben).unwrap();

        truck
            .book_schedule(&store, &booking("ana@truck.io", "2025-03-07", "09:00"))
            .unwrap();
        truck
            .book_schedule(&store, &booking("ben@truck.io", "2025-03-07", "09:00"))
            .unwrap();
        assert_eq!(truck.schedules_on("2025-03-07").len(), 2);
        assert_eq!(truck.schedules_for_staff("BEN@truck.io").len(), 1);
    }

    #[test]
    fn test_unknown_staff_writes_nothing() {
        let (_dir, store, mut truck) = setup();
        let err = truck
            .book_schedule(&store, &booking("ghost@truck.io", "2025-03-07", "09:00"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StaffNotFound);
        assert!(store.load_schedules().unwrap().is_empty());
        assert!(truck.list_schedules().is_empty());
    }

    #[test]
    fn test_invalid_booking_input() {
        let (_dir, store, mut truck) = setup();
        truck.add_staff(&store, &ana()).unwrap();
        let err = truck
            .book_schedule(&store, &booking("ana@truck.io", "next friday", "09:00"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InputInvalid);
    }

    #[test]
    fn test_availability_sees_reloaded_rows() {
        let (_dir, store, mut truck) = setup();
        truck.add_staff(&store, &ana()).unwrap();
        truck
            .book_schedule(&store, &booking("ana@truck.io", "2025-03-07", "09:00"))
            .unwrap();

        let mut other = FoodTruck::new("T", "L");
        other.load_schedules_from_store(&store).unwrap();
        assert!(!other.is_time_slot_available("ana@truck.io", "2025-03-07", "09:00"));
        assert!(other.is_time_slot_available("ana@truck.io", "2025-03-08", "09:00"));
    }
}
