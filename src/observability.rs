// ── Counters (recorded through the `metrics` facade) ────────────
//
// The library never installs a recorder; embedders that want these
// exported install one before building a `Scheduler`.

/// Counter: staff rows resolved onto a day board.
pub const ROWS_RESOLVED_TOTAL: &str = "wardgrid_rows_resolved_total";

/// Counter: malformed records seen. Labels: kind.
pub const DATA_INCONSISTENCIES_TOTAL: &str = "wardgrid_data_inconsistencies_total";

/// Counter: double-booked tasks that lost their column to an earlier task.
pub const HIDDEN_TASKS_TOTAL: &str = "wardgrid_hidden_tasks_total";
