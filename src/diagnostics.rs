//! Deployment diagnostics
//!
//! Runs the operator troubleshooting table as checks: each check guards
//! against one symptom and reports the likely cause when it trips.

use serde::Serialize;
use std::fmt;

use crate::core::CsvStore;
use crate::models::AppConfig;
use crate::utils::constants::{DEV_SECRET_KEY, ENV_ADMIN_EMAILS, ENV_SECRET_KEY, ENV_SMTP_PASSWORD};
use crate::utils::credentials::is_digest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
        }
    }
}

/// Operator-facing symptoms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Symptom {
    AppCrashesOnStart,
    EmailNotSending,
    DataNotPersisting,
}

impl Symptom {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppCrashesOnStart => "App crashes on start",
            Self::EmailNotSending => "Email not sending",
            Self::DataNotPersisting => "Data not persisting",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub symptom: Symptom,
    pub message: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, symptom: Symptom, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            symptom,
            message: message.into(),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:<10} {} ({})",
            self.status.label(),
            self.name,
            self.message,
            self.symptom.as_str()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub checks: Vec<CheckResult>,
}

impl Report {
    /// Worst status across all checks
    pub fn overall(&self) -> CheckStatus {
        self.checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(CheckStatus::Pass)
    }

    pub fn has_failures(&self) -> bool {
        self.overall() == CheckStatus::Fail
    }
}

/// Run every check. A config load failure is itself the first check.
pub fn run(config: Result<&AppConfig, String>) -> Report {
    let config = match config {
        Ok(config) => config,
        Err(reason) => {
            return Report {
                checks: vec![CheckResult::new(
                    "config",
                    CheckStatus::Fail,
                    Symptom::AppCrashesOnStart,
                    format!("missing/incorrect environment variables: {}", reason),
                )],
            };
        }
    };

    let store = CsvStore::new(&config.data_dir);
    let mut checks = vec![check_config(config), check_smtp(config), check_data_dir(&store)];
    checks.extend(check_data_files(&store));
    Report { checks }
}

fn check_config(config: &AppConfig) -> CheckResult {
    let symptom = Symptom::AppCrashesOnStart;
    if !config.is_production() {
        return CheckResult::new(
            "config",
            CheckStatus::Warn,
            symptom,
            "running in development mode; set FLASK_ENV=production on the host",
        );
    }
    // Long enough to pass the loader, but public
    if config.secret_key == DEV_SECRET_KEY {
        return CheckResult::new(
            "config",
            CheckStatus::Fail,
            symptom,
            format!("{} still holds the development placeholder", ENV_SECRET_KEY),
        );
    }
    CheckResult::new("config", CheckStatus::Pass, symptom, "environment variables valid")
}

fn check_smtp(config: &AppConfig) -> CheckResult {
    let symptom = Symptom::EmailNotSending;
    let missing = config.smtp.missing_fields();
    if !missing.is_empty() {
        return CheckResult::new(
            "smtp",
            CheckStatus::Warn,
            symptom,
            format!("SMTP misconfiguration, unset: {}", missing.join(", ")),
        );
    }
    // Gmail app passwords are 16 letters, often pasted with spaces
    if let Some(password) = &config.smtp.password {
        if password.contains(' ') {
            return CheckResult::new(
                "smtp",
                CheckStatus::Warn,
                symptom,
                format!("{} contains spaces; paste the app password without them", ENV_SMTP_PASSWORD),
            );
        }
    }
    if config.admin_emails.is_empty() {
        return CheckResult::new(
            "smtp",
            CheckStatus::Warn,
            symptom,
            format!("{} is empty; nobody receives admin mail", ENV_ADMIN_EMAILS),
        );
    }
    CheckResult::new("smtp", CheckStatus::Pass, symptom, "mail settings complete")
}

fn check_data_dir(store: &CsvStore) -> CheckResult {
    let symptom = Symptom::DataNotPersisting;
    let dir = store.data_dir().display().to_string();
    if !store.data_dir().is_dir() {
        return CheckResult::new(
            "data_dir",
            CheckStatus::Warn,
            symptom,
            format!("{} does not exist yet; the server creates it on start", dir),
        );
    }
    match store.check_writable() {
        Ok(()) => CheckResult::new("data_dir", CheckStatus::Pass, symptom, format!("{} is writable", dir)),
        Err(e) => CheckResult::new(
            "data_dir",
            CheckStatus::Fail,
            symptom,
            format!("data directory not writable: {}", e),
        ),
    }
}

fn check_data_files(store: &CsvStore) -> Vec<CheckResult> {
    let symptom = Symptom::DataNotPersisting;
    let mut results = Vec::new();

    match store.load_staff() {
        Ok(staff) => {
            let plaintext = staff.iter().filter(|s| !is_digest(&s.password)).count();
            if plaintext > 0 {
                results.push(CheckResult::new(
                    "staff",
                    CheckStatus::Warn,
                    symptom,
                    format!("{} staff rows hold plaintext or unsalted passwords", plaintext),
                ));
            } else {
                results.push(CheckResult::new(
                    "staff",
                    CheckStatus::Pass,
                    symptom,
                    format!("{} staff rows readable", staff.len()),
                ));
            }
        }
        Err(e) => results.push(CheckResult::new("staff", CheckStatus::Fail, symptom, e.to_string())),
    }

    match store.load_schedules() {
        Ok(schedules) => results.push(CheckResult::new(
            "schedules",
            CheckStatus::Pass,
            symptom,
            format!("{} schedule rows readable", schedules.len()),
        )),
        Err(e) => results.push(CheckResult::new("schedules", CheckStatus::Fail, symptom, e.to_string())),
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn config(dir: &TempDir, extra: &[(&str, &str)]) -> AppConfig {
        let mut vars: HashMap<String, String> = extra
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        vars.insert("DATA_DIR".into(), dir.path().display().to_string());
        AppConfig::from_lookup(|k| vars.get(k).cloned()).unwrap()
    }

    fn find<'a>(report: &'a Report, name: &str) -> &'a CheckResult {
        report.checks.iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn test_config_error_short_circuits() {
        let report = run(Err("[CFG_MISSING_ENV] SECRET_KEY".into()));
        assert_eq!(report.checks.len(), 1);
        assert!(report.has_failures());
        assert_eq!(report.checks[0].symptom, Symptom::AppCrashesOnStart);
    }

    #[test]
    fn test_production_ready() {
        let dir = TempDir::new().unwrap();
        let key = "k".repeat(40);
        let cfg = config(
            &dir,
            &[
                ("FLASK_ENV", "production"),
                ("SECRET_KEY", &key),
                ("SMTP_SERVER", "smtp.gmail.com"),
                ("SMTP_USERNAME", "truck@gmail.com"),
                ("SMTP_PASSWORD", "abcdabcdabcdabcd"),
                ("FROM_EMAIL", "truck@gmail.com"),
                ("ADMIN_EMAILS", "boss@truck.io"),
            ],
        );
        let report = run(Ok(&cfg));
        assert_eq!(report.overall(), CheckStatus::Pass, "{:?}", report);
    }

    #[test]
    fn test_placeholder_secret_in_production_fails() {
        let dir = TempDir::new().unwrap();
        let cfg = config(
            &dir,
            &[("FLASK_ENV", "production"), ("SECRET_KEY", DEV_SECRET_KEY)],
        );
        let report = run(Ok(&cfg));
        assert_eq!(find(&report, "config").status, CheckStatus::Fail);
        assert!(find(&report, "config").message.contains("placeholder"));
    }

    #[test]
    fn test_smtp_spaces_warned() {
        let dir = TempDir::new().unwrap();
        let cfg = config(
            &dir,
            &[
                ("SMTP_SERVER", "smtp.gmail.com"),
                ("SMTP_USERNAME", "truck@gmail.com"),
                ("SMTP_PASSWORD", "abcd abcd abcd abcd"),
                ("FROM_EMAIL", "truck@gmail.com"),
            ],
        );
        let report = run(Ok(&cfg));
        assert_eq!(find(&report, "smtp").status, CheckStatus::Warn);
        assert!(find(&report, "smtp").message.contains("spaces"));
    }

    #[test]
    fn test_corrupt_staff_file_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("users.csv"), "garbage\n").unwrap();
        let report = run(Ok(&config(&dir, &[])));
        assert_eq!(find(&report, "staff").status, CheckStatus::Fail);
        assert!(report.has_failures());
    }

    #[test]
    fn test_plaintext_rows_warned() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("users.csv"),
            "Email,Password,First_Name,Last_Name,Mobile_Number,Address,DOB,Sex\na@b.io,hunter2,A,B,,,,\n",
        )
        .unwrap();
        let report = run(Ok(&config(&dir, &[])));
        assert_eq!(find(&report, "staff").status, CheckStatus::Warn);
    }

    #[test]
    fn test_missing_data_dir_is_warning() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(&dir, &[]);
        cfg.data_dir = dir.path().join("not-yet");
        let report = run(Ok(&cfg));
        assert_eq!(find(&report, "data_dir").status, CheckStatus::Warn);
    }
}
