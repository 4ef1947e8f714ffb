use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::engine::ScheduleError;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time of day with minute granularity, stored as minute-of-day.
///
/// Parses the 24h strings the API sends (`"9:30"`, `"09:30"`, `"09:30:00"`;
/// seconds are dropped). `Display` yields the grid key form `"9:30"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ScheduleError> {
        if hour >= 24 || minute >= 60 {
            return Err(ScheduleError::InvalidTime(format!("{hour}:{minute:02}")));
        }
        Ok(Self(hour as u16 * 60 + minute as u16))
    }

    pub fn from_minutes(minutes: u16) -> Result<Self, ScheduleError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidTime(format!("minute-of-day {minutes}")));
        }
        Ok(Self(minutes))
    }

    pub fn parse(s: &str) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::InvalidTime(s.to_string());
        let (hours, rest) = s.trim().split_once(':').ok_or_else(invalid)?;
        // Optional trailing seconds.
        let minutes = match rest.split_once(':') {
            Some((m, secs)) if secs.len() == 2 && is_digits(secs, 2) => m,
            Some(_) => return Err(invalid()),
            None => rest,
        };
        if !is_digits(hours, 1) || hours.len() > 2 || !is_digits(minutes, 2) || minutes.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = hours.parse().map_err(|_| invalid())?;
        let minute: u8 = minutes.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.0 % 60) as u8
    }

    /// `hour + minute / 60`, the unit the dashboard does its arithmetic in.
    pub fn decimal_hours(&self) -> f64 {
        self.0 as f64 / 60.0
    }

    /// 12-hour display label, e.g. `"1:30 PM"`. Hours 0 and 12 both show as 12.
    pub fn label_12h(&self) -> String {
        let hour = self.hour();
        let suffix = if hour >= 12 { "PM" } else { "AM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{display_hour}:{:02} {suffix}", self.minute())
    }
}

fn is_digits(s: &str, min_len: usize) -> bool {
    s.len() >= min_len && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour(), self.minute())
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(t: NaiveTime) -> Self {
        Self((t.hour() * 60 + t.minute()) as u16)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ScheduleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> Self {
        format!("{:02}:{:02}", t.hour(), t.minute())
    }
}

/// Half-open minute interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u16,
    pub end: u16,
}

impl TimeRange {
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_minute(&self, t: u16) -> bool {
        self.start <= t && t < self.end
    }
}

// ── Identifiers ─────────────────────────────────────────────────

pub type TaskId = u64;

/// Staff identifier. The API hands these out as integers on some endpoints
/// and strings on others; both normalise to the same textual id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct StaffId(String);

impl StaffId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for StaffId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for StaffId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<StaffId> for String {
    fn from(id: StaffId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl From<RawId> for StaffId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => n.into(),
            RawId::Text(s) => Self(s),
        }
    }
}

// ── Tasks ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        })
    }
}

/// A scheduled assignment of one staff member on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub staff_id: StaffId,
    pub title: String,
    /// Older records call this `type`.
    #[serde(default, alias = "type")]
    pub category: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Task {
    /// `start < end`. Malformed tasks are tolerated in snapshots but never
    /// occupy slots or count towards workload.
    pub fn is_well_formed(&self) -> bool {
        self.start_time < self.end_time
    }

    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time.minutes(),
            end: self.end_time.minutes(),
        }
    }

    pub fn duration_hours(&self) -> f64 {
        if !self.is_well_formed() {
            return 0.0;
        }
        (self.end_time.minutes() - self.start_time.minutes()) as f64 / 60.0
    }

    pub fn belongs_to(&self, staff_id: &StaffId, date: NaiveDate) -> bool {
        &self.staff_id == staff_id && self.date == date
    }
}

// ── Staff ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffStatus {
    Active,
    #[serde(rename = "On Leave")]
    OnLeave,
    Remote,
    Terminated,
}

impl fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StaffStatus::Active => "Active",
            StaffStatus::OnLeave => "On Leave",
            StaffStatus::Remote => "Remote",
            StaffStatus::Terminated => "Terminated",
        })
    }
}

/// Role plus the fields that only make sense for that role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffProfile {
    Doctor { patient_load: Option<u32> },
    Nurse { patient_load: Option<u32> },
    Technician { equipment_expertise: Vec<String> },
    Janitor { areas: Vec<String> },
    Administrator { responsibilities: Vec<String> },
    Other { role: String },
}

impl StaffProfile {
    pub fn role(&self) -> &str {
        match self {
            StaffProfile::Doctor { .. } => "Doctor",
            StaffProfile::Nurse { .. } => "Nurse",
            StaffProfile::Technician { .. } => "Technician",
            StaffProfile::Janitor { .. } => "Janitor",
            StaffProfile::Administrator { .. } => "Administrator",
            StaffProfile::Other { role } => role,
        }
    }

    pub fn task_categories(&self) -> &'static [&'static str] {
        task_categories(self.role())
    }
}

/// Task categories offered when assigning work to a given role.
pub fn task_categories(role: &str) -> &'static [&'static str] {
    match role {
        "Doctor" => &[
            "Patient Consultation",
            "Medical Procedure",
            "Diagnostic Review",
            "Treatment Planning",
            "Medical Documentation",
        ],
        "Nurse" => &[
            "Patient Care",
            "Medication Administration",
            "Vital Sign Monitoring",
            "Patient Education",
            "Care Coordination",
        ],
        "Technician" => &["Diagnostic Testing", "Equipment Maintenance"],
        "Janitor" => &[
            "Cleaning and Disinfection",
            "Waste Disposal",
            "Inventory Management",
            "Safety Inspections",
        ],
        _ => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StaffRecord", into = "StaffRecord")]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub department: String,
    pub status: StaffStatus,
    pub profile: StaffProfile,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub join_date: Option<String>,
    pub schedule_hours: Option<String>,
    pub education: Option<String>,
    pub certifications: Vec<String>,
    /// Contracted hours per week; workload falls back to a default when absent.
    pub weekly_capacity_hours: Option<f64>,
}

impl StaffMember {
    pub fn role(&self) -> &str {
        self.profile.role()
    }

    /// Contracted weekly hours, if present and usable as a capacity.
    pub fn weekly_capacity(&self) -> Option<f64> {
        self.weekly_capacity_hours.filter(|h| *h > 0.0 && h.is_finite())
    }
}

/// Flat wire shape of a staff record: a role string plus every
/// role-conditional field as optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaffRecord {
    id: StaffId,
    name: String,
    role: String,
    #[serde(default)]
    department: String,
    status: StaffStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    join_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schedule_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    education: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    certifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    patient_load: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    equipment_expertise: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    areas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    responsibilities: Option<Vec<String>>,
    #[serde(default, rename = "capacity", skip_serializing_if = "Option::is_none")]
    weekly_capacity_hours: Option<f64>,
}

impl From<StaffRecord> for StaffMember {
    fn from(r: StaffRecord) -> Self {
        let profile = match r.role.as_str() {
            "Doctor" => StaffProfile::Doctor { patient_load: r.patient_load },
            "Nurse" => StaffProfile::Nurse { patient_load: r.patient_load },
            "Technician" => StaffProfile::Technician {
                equipment_expertise: r.equipment_expertise.unwrap_or_default(),
            },
            "Janitor" => StaffProfile::Janitor {
                areas: r.areas.unwrap_or_default(),
            },
            "Administrator" => StaffProfile::Administrator {
                responsibilities: r.responsibilities.unwrap_or_default(),
            },
            _ => StaffProfile::Other { role: r.role },
        };
        Self {
            id: r.id,
            name: r.name,
            department: r.department,
            status: r.status,
            profile,
            specialty: r.specialty,
            email: r.email,
            phone: r.phone,
            join_date: r.join_date,
            schedule_hours: r.schedule_hours,
            education: r.education,
            certifications: r.certifications,
            weekly_capacity_hours: r.weekly_capacity_hours,
        }
    }
}

impl From<StaffMember> for StaffRecord {
    fn from(m: StaffMember) -> Self {
        let role = m.role().to_string();
        let mut record = StaffRecord {
            id: m.id,
            name: m.name,
            role,
            department: m.department,
            status: m.status,
            specialty: m.specialty,
            email: m.email,
            phone: m.phone,
            join_date: m.join_date,
            schedule_hours: m.schedule_hours,
            education: m.education,
            certifications: m.certifications,
            patient_load: None,
            equipment_expertise: None,
            areas: None,
            responsibilities: None,
            weekly_capacity_hours: m.weekly_capacity_hours,
        };
        match m.profile {
            StaffProfile::Doctor { patient_load } | StaffProfile::Nurse { patient_load } => {
                record.patient_load = patient_load;
            }
            StaffProfile::Technician { equipment_expertise } => {
                record.equipment_expertise = Some(equipment_expertise);
            }
            StaffProfile::Janitor { areas } => record.areas = Some(areas),
            StaffProfile::Administrator { responsibilities } => {
                record.responsibilities = Some(responsibilities);
            }
            StaffProfile::Other { .. } => {}
        }
        record
    }
}
