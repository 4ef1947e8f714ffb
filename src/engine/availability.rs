use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::model::*;

// ── Point occupancy ───────────────────────────────────────────────

/// True iff no task of `staff_id` on `date` covers `slot` under half-open
/// `[start, end)` semantics. A task ending exactly on the slot boundary
/// leaves that slot free; inverted tasks cover nothing.
pub fn is_free(staff_id: &StaffId, date: NaiveDate, slot: ClockTime, tasks: &[Task]) -> bool {
    !tasks
        .iter()
        .filter(|task| task.belongs_to(staff_id, date))
        .any(|task| task.range().contains_minute(slot.minutes()))
}

/// The slot the "available now" filter checks: minutes before :30 round to
/// :30 of the same hour, anything else rolls to the next full hour (and to
/// the next day after 23:30).
pub fn next_slot_boundary(now: NaiveDateTime) -> NaiveDateTime {
    let into_hour = Duration::seconds(now.minute() as i64 * 60 + now.second() as i64)
        + Duration::nanoseconds(now.nanosecond() as i64);
    let hour_start = now - into_hour;
    let advance = if now.minute() < 30 { 30 } else { 60 };
    hour_start + Duration::minutes(advance)
}

/// Staff members free at the next slot boundary after `now`, in input order.
pub fn available_at<'a>(
    staff: impl IntoIterator<Item = &'a StaffMember>,
    tasks: &[Task],
    now: NaiveDateTime,
) -> Vec<&'a StaffMember> {
    let boundary = next_slot_boundary(now);
    let slot = ClockTime::from(boundary.time());
    staff
        .into_iter()
        .filter(|member| is_free(&member.id, boundary.date(), slot, tasks))
        .collect()
}
