//! CSV-backed persistence for staff and schedules
//!
//! Files live under the configured data directory. Rows are only ever
//! appended; a file created here always starts with its header row.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::models::{AppError, AppResult, Schedule, StaffMember};
use crate::utils::constants::{SCHEDULE_FILE, SCHEDULE_HEADER, STAFF_FILE, STAFF_HEADER};
use crate::utils::csv::{encode_row, parse_document, HeaderIndex};

/// Handle to the data directory
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn staff_path(&self) -> PathBuf {
        self.data_dir.join(STAFF_FILE)
    }

    pub fn schedules_path(&self) -> PathBuf {
        self.data_dir.join(SCHEDULE_FILE)
    }

    /// Create the data directory and both files (header only) when missing
    pub fn ensure_layout(&self) -> AppResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            AppError::store_io(format!("create {}", self.data_dir.display()), e)
        })?;
        self.ensure_header(&self.staff_path(), &STAFF_HEADER)?;
        self.ensure_header(&self.schedules_path(), &SCHEDULE_HEADER)?;
        Ok(())
    }

    /// Probe that the data directory accepts writes
    pub fn check_writable(&self) -> AppResult<()> {
        let probe = self.data_dir.join(".write-probe");
        fs::write(&probe, b"ok")
            .and_then(|_| fs::remove_file(&probe))
            .map_err(|e| AppError::store_io(format!("write to {}", self.data_dir.display()), e))
    }

    // ============================================
    // Staff
    // ============================================

    /// Load every staff row. A missing file loads as empty.
    pub fn load_staff(&self) -> AppResult<Vec<StaffMember>> {
        let path = self.staff_path();
        let Some((index, rows)) = self.read_table(&path, &STAFF_HEADER[..])? else {
            return Ok(Vec::new());
        };

        let mut staff = Vec::with_capacity(rows.len());
        for (line, row) in rows.iter().enumerate() {
            let field = |name: &str| index.get(row, name).map(|v| v.to_string());
            let (Some(email), Some(password), Some(first), Some(last)) = (
                field("Email"),
                field("Password"),
                field("First_Name"),
                field("Last_Name"),
            ) else {
                warn!(file = STAFF_FILE, row = line + 2, "Skipping short staff row");
                continue;
            };
            staff.push(StaffMember {
                email,
                password,
                first,
                last,
                phone: field("Mobile_Number").unwrap_or_default(),
                address: field("Address").unwrap_or_default(),
                dob: field("DOB").unwrap_or_default(),
                sex: field("Sex").unwrap_or_default(),
            });
        }

        debug!(count = staff.len(), "Loaded staff from {}", STAFF_FILE);
        Ok(staff)
    }

    pub fn append_staff(&self, member: &StaffMember) -> AppResult<()> {
        self.append_row(&self.staff_path(), &STAFF_HEADER, &member.to_record())?;
        info!(email = %member.email, "Saved {} to {}", member.full_name(), STAFF_FILE);
        Ok(())
    }

    // ============================================
    // Schedules
    // ============================================

    /// Load every schedule row. A missing file loads as empty.
    pub fn load_schedules(&self) -> AppResult<Vec<Schedule>> {
        let path = self.schedules_path();
        let Some((index, rows)) = self.read_table(&path, &SCHEDULE_HEADER[..])? else {
            return Ok(Vec::new());
        };

        let mut schedules = Vec::with_capacity(rows.len());
        for (line, row) in rows.iter().enumerate() {
            let field = |name: &str| index.get(row, name).map(|v| v.to_string());
            let (
                Some(manager),
                Some(date),
                Some(time),
                Some(staff_email),
                Some(staff_name),
                Some(work_time),
            ) = (
                field("Manager"),
                field("Date"),
                field("Time"),
                field("staff_Email"),
                field("staff_Name"),
                field("work_Time"),
            )
            else {
                warn!(file = SCHEDULE_FILE, row = line + 2, "Skipping short schedule row");
                continue;
            };
            schedules.push(Schedule {
                manager,
                date,
                time,
                staff_email,
                staff_name,
                work_time,
            });
        }

        debug!(count = schedules.len(), "Loaded schedules from {}", SCHEDULE_FILE);
        Ok(schedules)
    }

    pub fn append_schedule(&self, shift: &Schedule) -> AppResult<()> {
        self.append_row(&self.schedules_path(), &SCHEDULE_HEADER, &shift.to_record())?;
        info!(
            staff = %shift.staff_name,
            date = %shift.date,
            time = %shift.time,
            "Saved schedule to {}",
            SCHEDULE_FILE
        );
        Ok(())
    }

    // ============================================
    // Internals
    // ============================================

    /// Read a file into (header index, data rows). `None` when the file does not exist.
    fn read_table(
        &self,
        path: &Path,
        required: &[&str],
    ) -> AppResult<Option<(HeaderIndex, Vec<Vec<String>>)>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("{} not found, skipping load", path.display());
                return Ok(None);
            }
            Err(e) => return Err(AppError::store_io(format!("read {}", path.display()), e)),
        };

        let mut records = parse_document(&text).into_iter();
        let Some(header) = records.next() else {
            return Ok(None);
        };

        let index = HeaderIndex::new(&header);
        let missing = index.missing(required);
        if !missing.is_empty() {
            return Err(AppError::data_corrupt(&path.display().to_string(), &missing));
        }

        Ok(Some((index, records.collect())))
    }

    fn ensure_header(&self, path: &Path, header: &[&str]) -> AppResult<()> {
        let is_empty = match fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(AppError::store_io(format!("stat {}", path.display()), e)),
        };
        if is_empty {
            fs::write(path, encode_row(header))
                .map_err(|e| AppError::store_io(format!("create {}", path.display()), e))?;
            info!("Created {}", path.display());
        }
        Ok(())
    }

    fn append_row(&self, path: &Path, header: &[&str], record: &[&str]) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::store_io(format!("create {}", parent.display()), e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::store_io(format!("open {}", path.display()), e))?;

        let mut payload = String::new();
        let len = file.metadata()?.len();
        if len == 0 {
            // Write header if new file
            payload.push_str(&encode_row(header));
        } else if !ends_with_newline(&mut file, len)
            .map_err(|e| AppError::store_io(format!("read {}", path.display()), e))?
        {
            // Last row was written without a line ending
            warn!(file = %path.display(), "Last row has no line ending, terminating it");
            payload.push('\n');
        }
        payload.push_str(&encode_row(record));

        file.write_all(payload.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| AppError::store_io(format!("append {}", path.display()), e))
    }
}

fn ends_with_newline(file: &mut fs::File, len: u64) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
