use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Weekday};

use crate::model::*;

use super::ScheduleError;

pub const DEFAULT_DAILY_CAPACITY_HOURS: f64 = 8.0;
pub const DEFAULT_WEEKLY_CAPACITY_HOURS: f64 = 40.0;

/// Reporting window for workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadPeriod {
    Day(NaiveDate),
    /// Monday through Sunday of the week containing the date.
    Week(NaiveDate),
}

impl WorkloadPeriod {
    /// Inclusive `(first, last)` dates.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        match *self {
            WorkloadPeriod::Day(date) => (date, date),
            WorkloadPeriod::Week(date) => {
                let week = date.week(Weekday::Mon);
                (week.first_day(), week.last_day())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    pub total_hours: f64,
    pub task_count: usize,
    /// Percentage of capacity, capped at 100.
    pub utilization: f64,
    pub by_category: BTreeMap<String, usize>,
    pub by_status: BTreeMap<TaskStatus, usize>,
    /// Inverted tasks left out of every figure above.
    pub skipped: Vec<TaskId>,
}

/// Sum the well-formed tasks of `staff_id` dated within
/// `[period_start, period_end]` against `capacity_hours`.
pub fn aggregate_workload(
    staff_id: &StaffId,
    tasks: &[Task],
    period_start: NaiveDate,
    period_end: NaiveDate,
    capacity_hours: f64,
) -> Result<Workload, ScheduleError> {
    if !(capacity_hours > 0.0 && capacity_hours.is_finite()) {
        return Err(ScheduleError::Configuration(format!(
            "capacity must be a positive number of hours, got {capacity_hours}"
        )));
    }
    if period_end < period_start {
        return Err(ScheduleError::Configuration(format!(
            "period ends {period_end} before it starts {period_start}"
        )));
    }

    let mut total_hours = 0.0;
    let mut task_count = 0;
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_status: BTreeMap<TaskStatus, usize> = BTreeMap::new();
    let mut skipped = Vec::new();

    let in_period = tasks
        .iter()
        .filter(|t| &t.staff_id == staff_id && t.date >= period_start && t.date <= period_end);
    for task in in_period {
        if !task.is_well_formed() {
            skipped.push(task.id);
            continue;
        }
        total_hours += task.duration_hours();
        task_count += 1;
        *by_category.entry(task.category.clone()).or_default() += 1;
        *by_status.entry(task.status).or_default() += 1;
    }

    let utilization = (total_hours / capacity_hours * 100.0).min(100.0);

    Ok(Workload {
        total_hours,
        task_count,
        utilization,
        by_category,
        by_status,
        skipped,
    })
}

/// Hours and task counts attributed to one department.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentWorkload {
    pub department: String,
    pub total_hours: f64,
    pub task_count: usize,
    pub staff_count: usize,
}

/// Hospital-wide figures for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSummary {
    /// Mean utilization of the staff asked about; 0 when there are none.
    pub average_utilization: f64,
    pub active_staff: usize,
    pub total_staff: usize,
    /// Hours of every well-formed task dated in the period.
    pub total_hours: f64,
}

/// One entry per name in `departments`, in that order. Staff count towards
/// their own department only when it is listed. A task counts towards its
/// owner's department; tasks with an unknown owner, an unlisted department,
/// or inverted times are left out.
pub fn department_workload(
    departments: &[&str],
    staff: &[StaffMember],
    tasks: &[Task],
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Vec<DepartmentWorkload> {
    let mut totals: Vec<DepartmentWorkload> = departments
        .iter()
        .map(|name| DepartmentWorkload {
            department: name.to_string(),
            total_hours: 0.0,
            task_count: 0,
            staff_count: 0,
        })
        .collect();
    let column = |department: &str| departments.iter().position(|d| *d == department);

    for member in staff {
        if let Some(i) = column(member.department.as_str()) {
            totals[i].staff_count += 1;
        }
    }

    let owners: HashMap<&StaffId, &str> = staff.iter().map(|m| (&m.id, m.department.as_str())).collect();
    let in_period = tasks
        .iter()
        .filter(|t| t.date >= period_start && t.date <= period_end && t.is_well_formed());
    for task in in_period {
        let Some(i) = owners.get(&task.staff_id).and_then(|d| column(*d)) else {
            continue;
        };
        totals[i].total_hours += task.duration_hours();
        totals[i].task_count += 1;
    }
    totals
}
