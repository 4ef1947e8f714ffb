use chrono::NaiveDate;

use crate::grid::TimeSlot;
use crate::model::*;

/// What the board draws for one slot of one staff row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotRender<'a> {
    Free,
    /// First slot of `task`; the cell covers `slots` columns (at least 1).
    SpanStart { task: &'a Task, slots: usize },
    /// Covered by an earlier `SpanStart`; draw no cell of its own.
    Suppressed,
}

impl SlotRender<'_> {
    pub fn is_free(&self) -> bool {
        matches!(self, SlotRender::Free)
    }
}

// ── Span Algorithm ────────────────────────────────────────────────

/// Wide overlap test used for rendering: the task starts inside
/// `[slot, next)`, ends inside `(slot, next]`, or covers the whole slot.
/// Unlike point occupancy this catches tasks that cross slot boundaries at
/// every slot they touch.
pub(crate) fn touches(task: &Task, slot: &TimeSlot) -> bool {
    let (slot_start, next) = (slot.minutes(), slot.end_minutes());
    let (start, end) = (task.start_time.minutes(), task.end_time.minutes());
    (start >= slot_start && start < next)
        || (end > slot_start && end <= next)
        || (start <= slot_start && end >= next)
}

/// The task starts inside this slot, or it began before the visible window
/// and this is the first column.
fn is_start_slot(task: &Task, grid: &[TimeSlot], index: usize) -> bool {
    let slot = &grid[index];
    let start = task.start_time.minutes();
    (start >= slot.minutes() && start < slot.end_minutes())
        || (index == 0 && start < slot.minutes())
}

/// Columns from `index` up to the first slot at or after the task's end;
/// a task running past the grid takes the remaining columns.
fn slots_spanned(task: &Task, grid: &[TimeSlot], index: usize) -> usize {
    let end = task.end_time.minutes();
    let spanned = match grid.iter().position(|slot| slot.minutes() >= end) {
        Some(end_index) => end_index.saturating_sub(index),
        None => grid.len() - index,
    };
    spanned.max(1)
}

/// Resolve one column. `tasks` must already be restricted to one staff
/// member, one date, and well-formed tasks. The first task in list order
/// that touches the slot decides the cell.
pub(crate) fn resolve_cell<'a>(grid: &[TimeSlot], index: usize, tasks: &[&'a Task]) -> SlotRender<'a> {
    let slot = &grid[index];
    let Some(task) = tasks.iter().copied().find(|task| touches(task, slot)) else {
        return SlotRender::Free;
    };
    if is_start_slot(task, grid, index) {
        SlotRender::SpanStart {
            task,
            slots: slots_spanned(task, grid, index),
        }
    } else {
        SlotRender::Suppressed
    }
}

/// Resolve every column of one staff row. `tasks` are that staff member's
/// tasks for the day in list order; inverted tasks are skipped.
pub fn resolve_row<'a>(grid: &[TimeSlot], tasks: &[&'a Task]) -> Vec<SlotRender<'a>> {
    let valid: Vec<&Task> = tasks.iter().copied().filter(|t| t.is_well_formed()).collect();
    (0..grid.len())
        .map(|index| resolve_cell(grid, index, &valid))
        .collect()
}

/// Single-column form: filters `tasks` to `staff_id` on `date` itself.
/// Returns `None` when `index` is outside the grid.
pub fn resolve_slot<'a>(
    staff_id: &StaffId,
    date: NaiveDate,
    grid: &[TimeSlot],
    index: usize,
    tasks: &'a [Task],
) -> Option<SlotRender<'a>> {
    if index >= grid.len() {
        return None;
    }
    let relevant: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.belongs_to(staff_id, date) && t.is_well_formed())
        .collect();
    Some(resolve_cell(grid, index, &relevant))
}
