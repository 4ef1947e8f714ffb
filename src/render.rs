use crate::engine::{DayRow, DepartmentWorkload, SlotRender, TeamSummary, Workload};
use crate::grid::TimeSlot;
use crate::model::StaffMember;

const CELL_WIDTH: usize = 4;
const NAME_WIDTH: usize = 22;

/// Fixed-width text board: one column block per slot, one line per staff row,
/// followed by a legend of the drawn tasks and anything that could not be drawn.
/// Rows are drawn against `grid`; columns past its end are dropped.
pub fn render_board(grid: &[TimeSlot], rows: &[DayRow<'_>]) -> String {
    let mut out = String::new();
    out.push_str(&header(grid));
    out.push('\n');

    for row in rows {
        let name = truncate(&row.staff.name, NAME_WIDTH);
        out.push_str(&format!("{name:<NAME_WIDTH$} "));
        out.push_str(&row_line(grid, &row.cells));
        out.push('\n');

        for (task, _) in row.drawn_tasks() {
            out.push_str(&format!(
                "{:NAME_WIDTH$}   {} - {}  {} ({})\n",
                "",
                task.start_time.label_12h(),
                task.end_time.label_12h(),
                task.title,
                task.status
            ));
        }
        for conflict in &row.conflicts {
            let Some(slot) = grid.get(conflict.slot_index) else {
                continue;
            };
            out.push_str(&format!(
                "{:NAME_WIDTH$} ! task {} hidden behind task {} at {}\n",
                "",
                conflict.hidden,
                conflict.shown,
                slot.label()
            ));
        }
        for warning in &row.warnings {
            out.push_str(&format!("{:NAME_WIDTH$} ? {warning}\n", ""));
        }
    }
    out
}

/// Hour labels over the first column of each hour.
fn header(grid: &[TimeSlot]) -> String {
    let mut line = vec![' '; grid.len() * CELL_WIDTH];
    for slot in grid.iter().filter(|s| s.time.minute() == 0) {
        let hour = slot.time.hour();
        let label = format!(
            "{}{}",
            match hour % 12 {
                0 => 12,
                h => h,
            },
            if hour >= 12 { "p" } else { "a" }
        );
        let at = slot.index * CELL_WIDTH;
        for (offset, c) in label.chars().enumerate() {
            if let Some(cell) = line.get_mut(at + offset) {
                *cell = c;
            }
        }
    }
    format!("{:NAME_WIDTH$} {}", "", line.into_iter().collect::<String>().trim_end())
}

fn row_line(grid: &[TimeSlot], cells: &[SlotRender<'_>]) -> String {
    let width = grid.len() * CELL_WIDTH;
    let mut line = vec![' '; width];
    let mut covered_until = 0;

    for (index, cell) in cells.iter().enumerate().take(grid.len()) {
        let at = index * CELL_WIDTH;
        match cell {
            SlotRender::Free => line[at] = '.',
            SlotRender::Suppressed if index >= covered_until => line[at] = '!',
            SlotRender::Suppressed => {}
            SlotRender::SpanStart { task, slots } => {
                let end = ((index + slots) * CELL_WIDTH).min(width);
                paint_block(&mut line[at..end], &task.title);
                covered_until = covered_until.max(index + slots);
            }
        }
    }
    line.into_iter().collect::<String>().trim_end().to_string()
}

/// `[title----]` filling the whole block.
fn paint_block(block: &mut [char], title: &str) {
    if block.len() < 3 {
        block.fill('#');
        return;
    }
    let inner = block.len() - 2;
    block[0] = '[';
    let mut chars = title.chars();
    for cell in &mut block[1..1 + inner] {
        *cell = chars.next().unwrap_or('-');
    }
    block[1 + inner] = ']';
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

/// Hospital-wide figures followed by the per-department table.
pub fn render_insights(summary: &TeamSummary, departments: &[DepartmentWorkload]) -> String {
    let mut out = format!(
        "staff utilization {:>5.0}% average\nactive staff      {:>6} of {}\nassigned hours    {:>6.2}\n\n",
        summary.average_utilization, summary.active_staff, summary.total_staff, summary.total_hours
    );
    out.push_str(&format!(
        "{:<NAME_WIDTH$} {:>7} {:>6} {:>6}\n",
        "department", "hours", "tasks", "staff"
    ));
    for d in departments {
        out.push_str(&format!(
            "{:<NAME_WIDTH$} {:>7.2} {:>6} {:>6}\n",
            truncate(&d.department, NAME_WIDTH),
            d.total_hours,
            d.task_count,
            d.staff_count
        ));
    }
    out
}

/// Hours, task count, and utilisation per staff member.
pub fn render_workload(rows: &[(&StaffMember, Workload)]) -> String {
    let mut out = format!("{:<NAME_WIDTH$} {:>7} {:>6} {:>6}\n", "staff", "hours", "tasks", "util");
    for (member, workload) in rows {
        out.push_str(&format!(
            "{:<NAME_WIDTH$} {:>7.2} {:>6} {:>5.0}%\n",
            truncate(&member.name, NAME_WIDTH),
            workload.total_hours,
            workload.task_count,
            workload.utilization
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{build_slots, GridConfig};

    fn grid() -> Vec<TimeSlot> {
        build_slots(&GridConfig {
            start_hour: 8,
            end_hour: 11,
            step_minutes: 30,
        })
        .unwrap()
    }

    #[test]
    fn header_marks_hours() {
        let header = header(&grid());
        let body = &header[NAME_WIDTH + 1..];
        assert!(body.starts_with("8a      9a      10a"));
    }

    #[test]
    fn block_fills_span() {
        let mut block = vec![' '; 8];
        paint_block(&mut block, "Rounds");
        assert_eq!(block.into_iter().collect::<String>(), "[Rounds]");

        let mut block = vec![' '; 12];
        paint_block(&mut block, "MRI");
        assert_eq!(block.into_iter().collect::<String>(), "[MRI-------]");

        let mut block = vec![' '; 4];
        paint_block(&mut block, "Surgery");
        assert_eq!(block.into_iter().collect::<String>(), "[Su]");
    }

    #[test]
    fn uncovered_suppressed_is_flagged() {
        let g = grid();
        let cells = vec![
            SlotRender::Free,
            SlotRender::Suppressed,
            SlotRender::Free,
            SlotRender::Free,
            SlotRender::Free,
            SlotRender::Free,
        ];
        assert_eq!(row_line(&g, &cells), ".   !   .   .   .   .");
    }

    #[test]
    fn truncates_long_names() {
        assert_eq!(truncate("Dr. Sarah Johnson", 8), "Dr. Sar~");
        assert_eq!(truncate("Pat", 8), "Pat");
    }

    fn nurse() -> StaffMember {
        StaffMember {
            id: 3u64.into(),
            name: "Rebecca Torres".into(),
            department: "Emergency".into(),
            status: crate::model::StaffStatus::Active,
            profile: crate::model::StaffProfile::Nurse { patient_load: None },
            specialty: None,
            email: None,
            phone: None,
            join_date: None,
            schedule_hours: None,
            education: None,
            certifications: vec![],
            weekly_capacity_hours: None,
        }
    }

    #[test]
    fn rows_from_a_wider_grid_are_clipped() {
        let member = nurse();
        let row = DayRow {
            staff: &member,
            date: chrono::NaiveDate::from_ymd_opt(2025, 4, 14).unwrap(),
            cells: vec![SlotRender::Free; 12],
            warnings: vec![],
            conflicts: vec![crate::engine::Conflict {
                hidden: 2,
                shown: 1,
                slot_index: 10,
            }],
        };
        let board = render_board(&grid(), &[row]);
        let line = board.lines().nth(1).unwrap();
        assert_eq!(&line[NAME_WIDTH + 1..], ".   .   .   .   .   .");
        assert!(!board.contains("hidden behind"));
    }

    #[test]
    fn insights_table() {
        let summary = TeamSummary {
            average_utilization: 31.25,
            active_staff: 1,
            total_staff: 2,
            total_hours: 6.0,
        };
        let departments = vec![DepartmentWorkload {
            department: "Cardiology".into(),
            total_hours: 3.0,
            task_count: 1,
            staff_count: 1,
        }];
        let out = render_insights(&summary, &departments);
        assert!(out.starts_with("staff utilization    31% average\n"));
        assert!(out.contains("1 of 2\n"));
        assert!(out.contains("  6.00\n"));
        assert!(out.contains(&format!("{:<NAME_WIDTH$}    3.00      1      1\n", "Cardiology")));
    }
}
