//! Job domain types for tracked applications.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for a tracked job, assigned by the job store.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    /// Parse a job ID from a string.
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<u64> for JobId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an application in the pipeline.
///
/// Any status may move to any other; the order only drives display.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Bookmarked,
    Applying,
    Applied,
    Interviewing,
    Negotiating,
    Accepted,
    Declined,
}

impl JobStatus {
    /// Every status in pipeline order.
    pub const ALL: [JobStatus; 7] = [
        JobStatus::Bookmarked,
        JobStatus::Applying,
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Negotiating,
        JobStatus::Accepted,
        JobStatus::Declined,
    ];

    /// Wire name, as stored and displayed.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Bookmarked => "BOOKMARKED",
            JobStatus::Applying => "APPLYING",
            JobStatus::Applied => "APPLIED",
            JobStatus::Interviewing => "INTERVIEWING",
            JobStatus::Negotiating => "NEGOTIATING",
            JobStatus::Accepted => "ACCEPTED",
            JobStatus::Declined => "DECLINED",
        }
    }

    /// Parse a wire name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
    }

    /// Whether the application is in a live conversation with the employer.
    pub fn is_active_pipeline(self) -> bool {
        matches!(self, JobStatus::Interviewing | JobStatus::Negotiating)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interest level on a 1 to 5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Interest(u8);

impl Interest {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self, InterestOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(InterestOutOfRange(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Interest {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Interest {
    type Error = InterestOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Interest> for u8 {
    fn from(value: Interest) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("interest must be between 1 and 5, got {0}")]
pub struct InterestOutOfRange(pub u8);

/// Placeholder used for interview and follow-up notes that are not set.
pub const NOT_APPLICABLE: &str = "N/A";
pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_SALARY: &str = "Not specified";

/// A tracked job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub position: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub status: JobStatus,
    /// Serialized as `YYYY-MM-DD`.
    pub date_applied: NaiveDate,
    pub interview: String,
    pub follow_up: String,
    pub interest: Interest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Set when the job came back from the remote create path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Attach an id to client-supplied fields.
    pub fn from_new(id: JobId, new: NewJob) -> Self {
        Self {
            id,
            position: new.position,
            company: new.company,
            location: new.location,
            salary: new.salary,
            status: new.status,
            date_applied: new.date_applied,
            interview: new.interview,
            follow_up: new.follow_up,
            interest: new.interest,
            notes: new.notes,
            created_at: new.created_at,
        }
    }

    /// Set the status for this job.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }
}

/// Client-supplied fields for a job that has no id yet.
///
/// Defaults for empty fields are resolved by the caller through
/// [`NewJob::resolve_defaults`]; the store appends what it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub position: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub status: JobStatus,
    pub date_applied: NaiveDate,
    #[serde(default = "not_applicable")]
    pub interview: String,
    #[serde(default = "not_applicable")]
    pub follow_up: String,
    #[serde(default)]
    pub interest: Interest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn not_applicable() -> String {
    NOT_APPLICABLE.to_string()
}

impl NewJob {
    /// Create an entry applied today with every optional field defaulted.
    pub fn new(position: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            company: company.into(),
            location: DEFAULT_LOCATION.to_string(),
            salary: DEFAULT_SALARY.to_string(),
            status: JobStatus::default(),
            date_applied: Utc::now().date_naive(),
            interview: not_applicable(),
            follow_up: not_applicable(),
            interest: Interest::default(),
            notes: None,
            created_at: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = salary.into();
        self
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_date_applied(mut self, date: NaiveDate) -> Self {
        self.date_applied = date;
        self
    }

    pub fn with_interest(mut self, interest: Interest) -> Self {
        self.interest = interest;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        self
    }

    /// Fill blank text fields with their display defaults.
    pub fn resolve_defaults(mut self) -> Self {
        if self.location.trim().is_empty() {
            self.location = DEFAULT_LOCATION.to_string();
        }
        if self.salary.trim().is_empty() {
            self.salary = DEFAULT_SALARY.to_string();
        }
        if self.interview.trim().is_empty() {
            self.interview = not_applicable();
        }
        if self.follow_up.trim().is_empty() {
            self.follow_up = not_applicable();
        }
        self
    }

    /// Check the fields a form must collect before submitting.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.position.trim().is_empty() {
            return Err(ValidationError::MissingPosition);
        }
        if self.company.trim().is_empty() {
            return Err(ValidationError::MissingCompany);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please enter a job position")]
    MissingPosition,

    #[error("please enter a company name")]
    MissingCompany,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_round_trip() {
        for status in JobStatus::ALL {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(JobStatus::parse(" interviewing "), Some(JobStatus::Interviewing));
        assert_eq!(JobStatus::parse("HIRED"), None);
    }

    #[test]
    fn interest_rejects_out_of_range() {
        assert!(Interest::new(0).is_err());
        assert!(Interest::new(6).is_err());
        assert_eq!(Interest::new(5).map(Interest::get), Ok(5));
        assert!(serde_json::from_str::<Interest>("9").is_err());
    }

    #[test]
    fn job_uses_camel_case_fields() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let job = Job::from_new(JobId(7), NewJob::new("Engineer", "Acme").with_date_applied(date));
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["dateApplied"], "2025-04-01");
        assert_eq!(value["followUp"], "N/A");
        assert_eq!(value["status"], "BOOKMARKED");
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn resolve_defaults_fills_blank_fields() {
        let mut new = NewJob::new("Engineer", "Acme");
        new.location = "  ".to_string();
        new.salary = String::new();
        new.interview = String::new();
        let new = new.resolve_defaults();
        assert_eq!(new.location, DEFAULT_LOCATION);
        assert_eq!(new.salary, DEFAULT_SALARY);
        assert_eq!(new.interview, NOT_APPLICABLE);
    }

    #[test]
    fn validate_requires_position_and_company() {
        assert_eq!(
            NewJob::new("", "Acme").validate(),
            Err(ValidationError::MissingPosition)
        );
        assert_eq!(
            NewJob::new("Engineer", " ").validate(),
            Err(ValidationError::MissingCompany)
        );
        assert!(NewJob::new("Engineer", "Acme").validate().is_ok());
    }
}
