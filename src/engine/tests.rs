use super::*;
use crate::snapshot::Snapshot;

// ── Fixtures ─────────────────────────────────────────────

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn t(s: &str) -> ClockTime {
    ClockTime::parse(s).unwrap()
}

fn member(id: u64, name: &str, profile: StaffProfile, capacity: Option<f64>) -> StaffMember {
    StaffMember {
        id: id.into(),
        name: name.into(),
        department: "Cardiology".into(),
        status: StaffStatus::Active,
        profile,
        specialty: None,
        email: None,
        phone: None,
        join_date: None,
        schedule_hours: None,
        education: None,
        certifications: vec![],
        weekly_capacity_hours: capacity,
    }
}

fn task(id: TaskId, staff: u64, date: &str, start: &str, end: &str) -> Task {
    Task {
        id,
        staff_id: staff.into(),
        title: format!("task {id}"),
        category: "Rounds".into(),
        date: day(date),
        start_time: t(start),
        end_time: t(end),
        status: TaskStatus::Pending,
        description: None,
        department: None,
    }
}

fn scheduler(tasks: Vec<Task>) -> Scheduler {
    let staff = vec![
        member(1, "Dr. A", StaffProfile::Doctor { patient_load: Some(8) }, Some(48.0)),
        member(2, "Nurse B", StaffProfile::Nurse { patient_load: None }, None),
    ];
    let snapshot = Snapshot::new(staff, tasks, vec![], vec![]);
    Scheduler::new(Arc::new(snapshot), &GridConfig::default()).unwrap()
}

fn cell_at<'a>(s: &Scheduler, row: &DayRow<'a>, key: &str) -> SlotRender<'a> {
    let index = s.grid().iter().position(|slot| slot.key() == key).unwrap();
    row.cells[index]
}

// ── Board scenarios ──────────────────────────────────────

#[test]
fn two_tasks_on_a_day() {
    let s = scheduler(vec![
        task(1, 1, "2025-04-14", "10:30", "11:30"),
        task(2, 1, "2025-04-14", "13:00", "13:45"),
        task(3, 1, "2025-04-15", "08:00", "09:00"),
    ]);
    let row = s.day_row(&StaffId::from(1), day("2025-04-14")).unwrap();

    assert_eq!(row.cells.len(), 32);
    let drawn: Vec<_> = row.drawn_tasks().map(|(task, slots)| (task.id, slots)).collect();
    assert_eq!(drawn, vec![(1, 2), (2, 2)]);
    assert_eq!(cell_at(&s, &row, "11:00"), SlotRender::Suppressed);
    assert_eq!(cell_at(&s, &row, "13:30"), SlotRender::Suppressed);
    assert_eq!(cell_at(&s, &row, "11:30"), SlotRender::Free);
    assert_eq!(cell_at(&s, &row, "14:00"), SlotRender::Free);
    assert_eq!(row.cells.iter().filter(|c| c.is_free()).count(), 28);
    assert!(row.warnings.is_empty());
    assert!(row.conflicts.is_empty());
}

#[test]
fn row_recomputed_identically() {
    let s = scheduler(vec![
        task(1, 1, "2025-04-14", "08:30", "10:30"),
        task(2, 1, "2025-04-14", "09:00", "09:30"),
    ]);
    let a = s.day_row(&StaffId::from(1), day("2025-04-14")).unwrap();
    let b = s.day_row(&StaffId::from(1), day("2025-04-14")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn row_reports_inverted_and_hidden_tasks() {
    let s = scheduler(vec![
        task(1, 1, "2025-04-14", "09:00", "10:00"),
        task(2, 1, "2025-04-14", "09:30", "11:00"),
        task(3, 1, "2025-04-14", "15:00", "14:00"),
    ]);
    let row = s.day_row(&StaffId::from(1), day("2025-04-14")).unwrap();
    assert_eq!(row.warnings.len(), 1);
    assert_eq!(row.warnings[0].task(), Some(3));
    assert_eq!(row.conflicts.len(), 1);
    assert_eq!(row.conflicts[0].hidden, 2);
    assert_eq!(cell_at(&s, &row, "14:00"), SlotRender::Free);
}

#[test]
fn board_keeps_requested_order() {
    let s = scheduler(vec![task(1, 2, "2025-04-14", "06:00", "07:00")]);
    let snapshot = s.snapshot();
    let staff: Vec<&StaffMember> = snapshot.staff.iter().rev().collect();
    let rows = s.day_board(day("2025-04-14"), &staff);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].staff.name, "Nurse B");
    assert!(matches!(rows[0].cells[0], SlotRender::SpanStart { slots: 2, .. }));
    assert!(rows[1].cells.iter().all(|c| c.is_free()));
}

#[test]
fn unknown_staff_row_is_an_error() {
    let s = scheduler(vec![]);
    assert_eq!(
        s.day_row(&StaffId::from(42), day("2025-04-14")),
        Err(ScheduleError::UnknownStaff(StaffId::from(42)))
    );
}

#[test]
fn invalid_grid_rejected_at_construction() {
    let config = GridConfig {
        start_hour: 6,
        end_hour: 22,
        step_minutes: 40,
    };
    assert!(matches!(
        Scheduler::new(Arc::new(Snapshot::default()), &config),
        Err(ScheduleError::Configuration(_))
    ));
}

#[test]
fn quarter_hour_grid_spans() {
    let snapshot = Snapshot::new(
        vec![member(1, "Dr. A", StaffProfile::Doctor { patient_load: None }, None)],
        vec![task(1, 1, "2025-04-14", "08:15", "09:00")],
        vec![],
        vec![],
    );
    let config = GridConfig {
        start_hour: 8,
        end_hour: 10,
        step_minutes: 15,
    };
    let s = Scheduler::new(Arc::new(snapshot), &config).unwrap();
    let row = s.day_row(&StaffId::from(1), day("2025-04-14")).unwrap();
    assert_eq!(row.cells[0], SlotRender::Free);
    assert!(matches!(row.cells[1], SlotRender::SpanStart { slots: 3, .. }));
    assert_eq!(row.cells[4], SlotRender::Free);
}

// ── Availability ─────────────────────────────────────────

#[test]
fn scheduler_point_queries() {
    let s = scheduler(vec![task(1, 1, "2025-04-14", "08:00", "09:00")]);
    let staff = StaffId::from(1);
    assert!(!s.is_free(&staff, day("2025-04-14"), t("8:00")));
    assert!(s.is_free(&staff, day("2025-04-14"), t("9:00")));
}

#[test]
fn available_now_uses_next_boundary() {
    let s = scheduler(vec![task(1, 1, "2025-04-14", "10:30", "11:30")]);
    let snapshot = s.snapshot();
    let everyone: Vec<&StaffMember> = snapshot.staff.iter().collect();
    let now = day("2025-04-14").and_hms_opt(10, 12, 0).unwrap();
    let free = s.available_at(&everyone, now);
    assert_eq!(free.len(), 1);
    assert_eq!(free[0].name, "Nurse B");
}

// ── Workload ─────────────────────────────────────────────

#[test]
fn daily_and_weekly_capacity() {
    let s = scheduler(vec![
        task(1, 1, "2025-04-14", "09:00", "14:00"),
        task(2, 1, "2025-04-14", "15:00", "17:00"),
        task(3, 1, "2025-04-16", "08:00", "20:00"),
        task(4, 2, "2025-04-14", "08:00", "12:00"),
    ]);
    let dr = StaffId::from(1);
    let daily = s.workload(&dr, WorkloadPeriod::Day(day("2025-04-14"))).unwrap();
    assert_eq!(daily.total_hours, 7.0);
    assert_eq!(daily.utilization, 87.5);

    // 19h against a 48h contract.
    let weekly = s.workload(&dr, WorkloadPeriod::Week(day("2025-04-14"))).unwrap();
    assert_eq!(weekly.task_count, 3);
    assert!((weekly.utilization - 19.0 / 48.0 * 100.0).abs() < 1e-9);

    // Nurse B has no contract and falls back to 40h.
    let nurse = s.workload(&StaffId::from(2), WorkloadPeriod::Week(day("2025-04-14"))).unwrap();
    assert_eq!(nurse.utilization, 10.0);
}

#[test]
fn over_capacity_day_caps() {
    let s = scheduler(vec![task(1, 1, "2025-04-16", "08:00", "20:00")]);
    let w = s.workload(&StaffId::from(1), WorkloadPeriod::Day(day("2025-04-16"))).unwrap();
    assert_eq!(w.total_hours, 12.0);
    assert_eq!(w.utilization, 100.0);
}

#[test]
fn team_workload_covers_everyone() {
    let s = scheduler(vec![task(1, 2, "2025-04-14", "08:00", "10:00")])
        .with_daily_capacity(4.0)
        .unwrap();
    let team = s.team_workload(WorkloadPeriod::Day(day("2025-04-14"))).unwrap();
    let summary: Vec<_> = team.iter().map(|(m, w)| (m.name.as_str(), w.utilization)).collect();
    assert_eq!(summary, vec![("Dr. A", 0.0), ("Nurse B", 50.0)]);
}

#[test]
fn unusable_contract_falls_back_to_default_week() {
    let dr = member(1, "Dr. A", StaffProfile::Doctor { patient_load: None }, Some(0.0));
    let nurse = member(2, "Nurse B", StaffProfile::Nurse { patient_load: None }, Some(-5.0));
    let tasks = vec![
        task(1, 1, "2025-04-14", "08:00", "12:00"),
        task(2, 2, "2025-04-15", "08:00", "10:00"),
    ];
    let s = Scheduler::new(
        Arc::new(Snapshot::new(vec![dr, nurse], tasks, vec![], vec![])),
        &GridConfig::default(),
    )
    .unwrap();

    let team = s.team_workload(WorkloadPeriod::Week(day("2025-04-14"))).unwrap();
    let summary: Vec<_> = team.iter().map(|(m, w)| (m.name.as_str(), w.utilization)).collect();
    assert_eq!(summary, vec![("Dr. A", 10.0), ("Nurse B", 5.0)]);

    let kinds: Vec<_> = s.audit().iter().map(|f| f.kind()).collect();
    assert_eq!(kinds, vec!["invalid_capacity", "invalid_capacity"]);
}

#[test]
fn daily_capacity_must_be_positive() {
    assert!(matches!(
        scheduler(vec![]).with_daily_capacity(0.0),
        Err(ScheduleError::Configuration(_))
    ));
}

fn hospital() -> Scheduler {
    let dr = member(1, "Dr. A", StaffProfile::Doctor { patient_load: None }, None);
    let mut nurse = member(2, "Nurse B", StaffProfile::Nurse { patient_load: None }, None);
    nurse.department = "Emergency".into();
    nurse.status = StaffStatus::OnLeave;
    let tasks = vec![
        task(1, 1, "2025-04-14", "09:00", "12:00"),
        task(2, 2, "2025-04-14", "08:00", "10:00"),
        task(3, 9, "2025-04-14", "08:00", "09:00"),
        task(4, 1, "2025-04-14", "15:00", "14:00"),
        task(5, 1, "2025-04-15", "08:00", "16:00"),
    ];
    Scheduler::new(
        Arc::new(Snapshot::new(vec![dr, nurse], tasks, vec![], vec![])),
        &GridConfig::default(),
    )
    .unwrap()
}

#[test]
fn department_workload_skips_unknown_owners() {
    let s = hospital();
    let totals = s.department_workload(WorkloadPeriod::Day(day("2025-04-14")));
    let summary: Vec<_> = totals
        .iter()
        .map(|d| (d.department.as_str(), d.total_hours, d.task_count, d.staff_count))
        .collect();
    assert_eq!(summary, vec![("Cardiology", 3.0, 1, 1), ("Emergency", 2.0, 1, 1)]);
}

#[test]
fn team_summary_figures() {
    let s = hospital();
    let snapshot = s.snapshot();
    let everyone: Vec<&StaffMember> = snapshot.staff.iter().collect();
    let summary = s.team_summary(WorkloadPeriod::Day(day("2025-04-14")), &everyone).unwrap();
    // 3/8 and 2/8.
    assert_eq!(summary.average_utilization, 31.25);
    assert_eq!(summary.active_staff, 1);
    assert_eq!(summary.total_staff, 2);
    // Every well-formed task of the day, including the unowned one.
    assert_eq!(summary.total_hours, 6.0);

    let nobody = s.team_summary(WorkloadPeriod::Day(day("2025-04-14")), &[]).unwrap();
    assert_eq!(nobody.average_utilization, 0.0);
}

// ── Drafts ───────────────────────────────────────────────

fn draft(staff: u64, start: &str, end: &str) -> TaskDraft {
    TaskDraft {
        staff_id: Some(staff.into()),
        title: "Medication round".into(),
        category: "Medication Administration".into(),
        date: Some(day("2025-04-14")),
        start_time: Some(t(start)),
        end_time: Some(t(end)),
        description: None,
    }
}

#[test]
fn draft_overlaps_are_reported_not_refused() {
    let s = scheduler(vec![
        task(1, 2, "2025-04-14", "09:00", "10:00"),
        task(2, 2, "2025-04-14", "10:00", "11:00"),
    ]);
    let overlapping = s.check_draft(&draft(2, "09:30", "10:00")).unwrap();
    let ids: Vec<_> = overlapping.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1]);

    assert!(s.check_draft(&draft(2, "11:00", "12:00")).unwrap().is_empty());
}

#[test]
fn draft_validation() {
    let s = scheduler(vec![]);

    let mut no_staff = draft(2, "09:00", "10:00");
    no_staff.staff_id = None;
    assert_eq!(
        s.check_draft(&no_staff),
        Err(ScheduleError::InvalidDraft("no staff member selected"))
    );

    let mut blank = draft(2, "09:00", "10:00");
    blank.title = "  ".into();
    assert_eq!(s.check_draft(&blank), Err(ScheduleError::InvalidDraft("title is required")));

    assert_eq!(
        s.check_draft(&draft(2, "10:00", "10:00")),
        Err(ScheduleError::InvalidDraft("end time must be after start time"))
    );

    assert_eq!(
        s.check_draft(&draft(7, "09:00", "10:00")),
        Err(ScheduleError::UnknownStaff(StaffId::from(7)))
    );
}

// ── Audit ────────────────────────────────────────────────

#[test]
fn audit_whole_snapshot() {
    let s = scheduler(vec![
        task(1, 1, "2025-04-14", "09:00", "10:00"),
        task(2, 5, "2025-04-14", "09:00", "10:00"),
        task(3, 2, "2025-04-15", "12:00", "11:00"),
    ]);
    let found = s.audit();
    let kinds: Vec<_> = found.iter().map(|f| (f.task(), f.kind())).collect();
    assert_eq!(kinds, vec![(Some(2), "unknown_staff"), (Some(3), "inverted_times")]);
}
