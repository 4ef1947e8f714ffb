use std::sync::Arc;

use chrono::Local;
use tracing::info;

use wardgrid::config::Config;
use wardgrid::engine::{Scheduler, WorkloadPeriod};
use wardgrid::render::{render_board, render_insights, render_workload};
use wardgrid::snapshot::{load_snapshot, JsonDirSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    info!("wardgrid board for {}", config.date);
    info!("  data_dir: {}", config.data_dir.display());
    info!(
        "  grid: {}:00-{}:00 every {} min",
        config.grid.start_hour, config.grid.end_hour, config.grid.step_minutes
    );

    let source = JsonDirSource::new(&config.data_dir);
    let snapshot = Arc::new(load_snapshot(&source).await?);
    let scheduler = Scheduler::new(snapshot.clone(), &config.grid)?.with_daily_capacity(config.daily_capacity_hours)?;

    let inconsistencies = scheduler.audit();
    if !inconsistencies.is_empty() {
        tracing::warn!("{} inconsistent records in snapshot", inconsistencies.len());
    }

    let mut staff = config.filter.apply(&snapshot.staff);
    if config.available_only {
        staff = scheduler.available_at(&staff, Local::now().naive_local());
        info!("  available now: {}", staff.len());
    }
    info!("  departments: {}", snapshot.departments().join(", "));

    let rows = scheduler.day_board(config.date, &staff);
    println!("{}", render_board(scheduler.grid(), &rows));

    let workloads = staff
        .iter()
        .map(|member| Ok((*member, scheduler.workload(&member.id, WorkloadPeriod::Day(config.date))?)))
        .collect::<Result<Vec<_>, wardgrid::engine::ScheduleError>>()?;
    println!("{}", render_workload(&workloads));

    let period = WorkloadPeriod::Day(config.date);
    let summary = scheduler.team_summary(period, &staff)?;
    println!("{}", render_insights(&summary, &scheduler.department_workload(period)));

    Ok(())
}
