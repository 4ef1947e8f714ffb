mod availability;
mod conflict;
mod error;
mod span;
mod workload;
#[cfg(test)]
mod tests;

pub use availability::{available_at, is_free, next_slot_boundary};
pub use conflict::{audit, hidden_tasks, inverted_tasks, overlapping_tasks, Conflict, DataInconsistency};
pub use error::ScheduleError;
pub use span::{resolve_row, resolve_slot, SlotRender};
pub use workload::{
    aggregate_workload, department_workload, DepartmentWorkload, TeamSummary, Workload, WorkloadPeriod,
    DEFAULT_DAILY_CAPACITY_HOURS, DEFAULT_WEEKLY_CAPACITY_HOURS,
};

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::grid::{build_slots, GridConfig, TimeSlot};
use crate::model::*;
use crate::observability;
use crate::snapshot::{Snapshot, TaskDraft};

/// One staff member's resolved day on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRow<'a> {
    pub staff: &'a StaffMember,
    pub date: NaiveDate,
    /// One entry per grid slot.
    pub cells: Vec<SlotRender<'a>>,
    pub warnings: Vec<DataInconsistency>,
    pub conflicts: Vec<Conflict>,
}

impl DayRow<'_> {
    /// Tasks drawn in this row, in column order.
    pub fn drawn_tasks(&self) -> impl Iterator<Item = (&Task, usize)> {
        self.cells.iter().filter_map(|cell| match cell {
            SlotRender::SpanStart { task, slots } => Some((*task, *slots)),
            _ => None,
        })
    }
}

/// Read-only scheduling queries over a snapshot. Everything is recomputed
/// per call; nothing derived is cached between calls.
pub struct Scheduler {
    snapshot: Arc<Snapshot>,
    grid: Vec<TimeSlot>,
    daily_capacity_hours: f64,
}

impl Scheduler {
    pub fn new(snapshot: Arc<Snapshot>, config: &GridConfig) -> Result<Self, ScheduleError> {
        let grid = build_slots(config)?;
        Ok(Self {
            snapshot,
            grid,
            daily_capacity_hours: DEFAULT_DAILY_CAPACITY_HOURS,
        })
    }

    pub fn with_daily_capacity(mut self, hours: f64) -> Result<Self, ScheduleError> {
        if !(hours > 0.0 && hours.is_finite()) {
            return Err(ScheduleError::Configuration(format!(
                "daily capacity must be a positive number of hours, got {hours}"
            )));
        }
        self.daily_capacity_hours = hours;
        Ok(self)
    }

    pub fn grid(&self) -> &[TimeSlot] {
        &self.grid
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn member(&self, staff_id: &StaffId) -> Result<&StaffMember, ScheduleError> {
        self.snapshot
            .staff_member(staff_id)
            .ok_or_else(|| ScheduleError::UnknownStaff(staff_id.clone()))
    }

    // ── Board ───────────────────────────────────────────

    pub fn day_row(&self, staff_id: &StaffId, date: NaiveDate) -> Result<DayRow<'_>, ScheduleError> {
        let member = self.member(staff_id)?;
        Ok(self.resolve_member_row(member, date))
    }

    /// Rows for `staff` in the given order. Members must come from this
    /// scheduler's snapshot.
    pub fn day_board<'a>(&'a self, date: NaiveDate, staff: &[&'a StaffMember]) -> Vec<DayRow<'a>> {
        staff.iter().map(|&member| self.resolve_member_row(member, date)).collect()
    }

    fn resolve_member_row<'a>(&'a self, member: &'a StaffMember, date: NaiveDate) -> DayRow<'a> {
        let tasks = self.snapshot.tasks_for(&member.id, date);
        let cells = resolve_row(&self.grid, &tasks);
        let warnings = inverted_tasks(tasks.iter().copied());
        let conflicts = hidden_tasks(&self.grid, &tasks, &cells);

        for w in &warnings {
            warn!(staff = %member.id, %date, "skipping task: {w}");
            metrics::counter!(observability::DATA_INCONSISTENCIES_TOTAL, "kind" => w.kind()).increment(1);
        }
        for c in &conflicts {
            warn!(
                staff = %member.id,
                %date,
                slot = %self.grid[c.slot_index],
                "task {} hidden behind task {}",
                c.hidden,
                c.shown
            );
        }
        if !conflicts.is_empty() {
            metrics::counter!(observability::HIDDEN_TASKS_TOTAL).increment(conflicts.len() as u64);
        }
        metrics::counter!(observability::ROWS_RESOLVED_TOTAL).increment(1);
        debug!(staff = %member.id, %date, tasks = tasks.len(), "resolved day row");

        DayRow {
            staff: member,
            date,
            cells,
            warnings,
            conflicts,
        }
    }

    // ── Availability ────────────────────────────────────

    pub fn is_free(&self, staff_id: &StaffId, date: NaiveDate, slot: ClockTime) -> bool {
        is_free(staff_id, date, slot, &self.snapshot.tasks)
    }

    /// The subset of `staff` free at the slot boundary following `now`.
    pub fn available_at<'a>(&self, staff: &[&'a StaffMember], now: NaiveDateTime) -> Vec<&'a StaffMember> {
        available_at(staff.iter().copied(), &self.snapshot.tasks, now)
    }

    // ── Workload ────────────────────────────────────────

    /// Daily figures use the scheduler's daily capacity; weekly figures use
    /// the member's contracted hours, or the default week when those are
    /// absent or unusable.
    pub fn workload(&self, staff_id: &StaffId, period: WorkloadPeriod) -> Result<Workload, ScheduleError> {
        let member = self.member(staff_id)?;
        self.member_workload(member, period)
    }

    fn member_workload(&self, member: &StaffMember, period: WorkloadPeriod) -> Result<Workload, ScheduleError> {
        let capacity = match period {
            WorkloadPeriod::Day(_) => self.daily_capacity_hours,
            WorkloadPeriod::Week(_) => member.weekly_capacity().unwrap_or(DEFAULT_WEEKLY_CAPACITY_HOURS),
        };
        let (first, last) = period.bounds();
        aggregate_workload(&member.id, &self.snapshot.tasks, first, last, capacity)
    }

    /// Workload of every staff member, in snapshot order.
    pub fn team_workload(&self, period: WorkloadPeriod) -> Result<Vec<(&StaffMember, Workload)>, ScheduleError> {
        self.snapshot
            .staff
            .iter()
            .map(|member| Ok((member, self.member_workload(member, period)?)))
            .collect()
    }

    /// Totals per department of the snapshot's department list.
    pub fn department_workload(&self, period: WorkloadPeriod) -> Vec<DepartmentWorkload> {
        let (first, last) = period.bounds();
        let snapshot = &self.snapshot;
        department_workload(&snapshot.departments(), &snapshot.staff, &snapshot.tasks, first, last)
    }

    /// Utilization is averaged over `staff`; headcounts and hours cover the
    /// whole snapshot.
    pub fn team_summary(&self, period: WorkloadPeriod, staff: &[&StaffMember]) -> Result<TeamSummary, ScheduleError> {
        let mut utilization = 0.0;
        for member in staff {
            utilization += self.member_workload(member, period)?.utilization;
        }
        let average_utilization = if staff.is_empty() {
            0.0
        } else {
            utilization / staff.len() as f64
        };

        let (first, last) = period.bounds();
        let total_hours = self
            .snapshot
            .tasks
            .iter()
            .filter(|t| t.date >= first && t.date <= last)
            .map(Task::duration_hours)
            .sum();

        Ok(TeamSummary {
            average_utilization,
            active_staff: self
                .snapshot
                .staff
                .iter()
                .filter(|m| m.status == StaffStatus::Active)
                .count(),
            total_staff: self.snapshot.staff.len(),
            total_hours,
        })
    }

    // ── Assignment ──────────────────────────────────────

    /// Check a task before it is posted. Returns the staff member's existing
    /// tasks that the draft would overlap; overlaps are reported, not refused.
    pub fn check_draft(&self, draft: &TaskDraft) -> Result<Vec<&Task>, ScheduleError> {
        let staff_id = draft
            .staff_id
            .as_ref()
            .ok_or(ScheduleError::InvalidDraft("no staff member selected"))?;
        if draft.title.trim().is_empty() {
            return Err(ScheduleError::InvalidDraft("title is required"));
        }
        let date = draft.date.ok_or(ScheduleError::InvalidDraft("date is required"))?;
        let start = draft
            .start_time
            .ok_or(ScheduleError::InvalidDraft("start time is required"))?;
        let end = draft.end_time.ok_or(ScheduleError::InvalidDraft("end time is required"))?;
        if start >= end {
            return Err(ScheduleError::InvalidDraft("end time must be after start time"));
        }
        self.member(staff_id)?;

        let range = TimeRange {
            start: start.minutes(),
            end: end.minutes(),
        };
        let overlapping = overlapping_tasks(&self.snapshot.tasks, staff_id, date, &range);
        if !overlapping.is_empty() {
            debug!(staff = %staff_id, %date, overlapping = overlapping.len(), "draft overlaps existing tasks");
        }
        Ok(overlapping)
    }

    /// Every inconsistency in the snapshot, logged once each.
    pub fn audit(&self) -> Vec<DataInconsistency> {
        let found = audit(&self.snapshot.staff, &self.snapshot.tasks);
        for inconsistency in &found {
            warn!("{inconsistency}");
            metrics::counter!(observability::DATA_INCONSISTENCIES_TOTAL, "kind" => inconsistency.kind())
                .increment(1);
        }
        found
    }
}
