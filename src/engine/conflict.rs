use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

use crate::grid::TimeSlot;
use crate::model::*;

use super::span::{touches, SlotRender};

/// A record the board tolerates but cannot draw faithfully. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataInconsistency {
    /// `start >= end`; the task is skipped for occupancy and workload.
    InvertedTimes {
        task: TaskId,
        start: ClockTime,
        end: ClockTime,
    },
    /// The task's owner is not in the staff snapshot.
    UnknownStaff { task: TaskId, staff: StaffId },
    /// Contracted weekly hours are zero, negative or not a number; the
    /// default week is used instead.
    InvalidCapacity { staff: StaffId },
}

impl DataInconsistency {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DataInconsistency::InvertedTimes { .. } => "inverted_times",
            DataInconsistency::UnknownStaff { .. } => "unknown_staff",
            DataInconsistency::InvalidCapacity { .. } => "invalid_capacity",
        }
    }

    /// The offending task, for task records.
    pub fn task(&self) -> Option<TaskId> {
        match self {
            DataInconsistency::InvertedTimes { task, .. } | DataInconsistency::UnknownStaff { task, .. } => Some(*task),
            DataInconsistency::InvalidCapacity { .. } => None,
        }
    }
}

impl fmt::Display for DataInconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataInconsistency::InvertedTimes { task, start, end } => {
                write!(f, "task {task} ends at {end}, not after its start {start}")
            }
            DataInconsistency::UnknownStaff { task, staff } => {
                write!(f, "task {task} is assigned to unknown staff member {staff}")
            }
            DataInconsistency::InvalidCapacity { staff } => {
                write!(f, "staff member {staff} has an unusable weekly capacity, using the default week")
            }
        }
    }
}

/// A double-booked task that the row could not draw: `shown` took the
/// column where `hidden` would have started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub hidden: TaskId,
    pub shown: TaskId,
    pub slot_index: usize,
}

pub fn inverted_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<DataInconsistency> {
    tasks
        .into_iter()
        .filter(|t| !t.is_well_formed())
        .map(|t| DataInconsistency::InvertedTimes {
            task: t.id,
            start: t.start_time,
            end: t.end_time,
        })
        .collect()
}

/// Every inconsistency in a snapshot: staff records first, then tasks in
/// snapshot order.
pub fn audit(staff: &[StaffMember], tasks: &[Task]) -> Vec<DataInconsistency> {
    let known: HashSet<&StaffId> = staff.iter().map(|m| &m.id).collect();
    let mut found: Vec<DataInconsistency> = staff
        .iter()
        .filter(|m| m.weekly_capacity_hours.is_some() && m.weekly_capacity().is_none())
        .map(|m| DataInconsistency::InvalidCapacity { staff: m.id.clone() })
        .collect();
    for task in tasks {
        if !known.contains(&task.staff_id) {
            found.push(DataInconsistency::UnknownStaff {
                task: task.id,
                staff: task.staff_id.clone(),
            });
        }
        found.extend(inverted_tasks([task]));
    }
    found
}

/// Well-formed tasks that touch the grid but never received a `SpanStart`
/// in `cells`. Each is paired with the task that won its first column.
pub fn hidden_tasks(grid: &[TimeSlot], tasks: &[&Task], cells: &[SlotRender<'_>]) -> Vec<Conflict> {
    let drawn: Vec<&Task> = cells
        .iter()
        .filter_map(|cell| match cell {
            SlotRender::SpanStart { task, .. } => Some(*task),
            _ => None,
        })
        .collect();
    let valid: Vec<&Task> = tasks.iter().copied().filter(|t| t.is_well_formed()).collect();

    let mut conflicts = Vec::new();
    for task in &valid {
        if drawn.iter().any(|d| std::ptr::eq(*d, *task)) {
            continue;
        }
        let Some(slot) = grid.iter().find(|slot| touches(task, slot)) else {
            continue; // outside the visible window
        };
        if let Some(winner) = valid.iter().find(|t| touches(t, slot)) {
            conflicts.push(Conflict {
                hidden: task.id,
                shown: winner.id,
                slot_index: slot.index,
            });
        }
    }
    conflicts
}

/// Tasks of `staff_id` on `date` whose time range overlaps `range`.
pub fn overlapping_tasks<'a>(
    tasks: &'a [Task],
    staff_id: &StaffId,
    date: NaiveDate,
    range: &TimeRange,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.belongs_to(staff_id, date) && t.is_well_formed())
        .filter(|t| t.range().overlaps(range))
        .collect()
}
