use crate::model::StaffId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Slot grid or aggregation parameters that cannot produce a result.
    Configuration(String),
    InvalidTime(String),
    UnknownStaff(StaffId),
    InvalidDraft(&'static str),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            ScheduleError::InvalidTime(s) => write!(f, "invalid time of day: {s:?}"),
            ScheduleError::UnknownStaff(id) => write!(f, "unknown staff member: {id}"),
            ScheduleError::InvalidDraft(msg) => write!(f, "invalid task: {msg}"),
        }
    }
}

impl std::error::Error for ScheduleError {}
