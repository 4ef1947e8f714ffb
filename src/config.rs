use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::directory::StaffFilter;
use crate::engine::DEFAULT_DAILY_CAPACITY_HOURS;
use crate::grid::GridConfig;

/// Settings for the `wardgrid` binary, read from `WARDGRID_*` variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub date: NaiveDate,
    pub grid: GridConfig,
    pub filter: StaffFilter,
    pub available_only: bool,
    pub daily_capacity_hours: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
            lookup(key).and_then(|s| s.trim().parse().ok())
        }
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let defaults = GridConfig::default();
        let grid = GridConfig {
            start_hour: parsed(&lookup, "WARDGRID_START_HOUR").unwrap_or(defaults.start_hour),
            end_hour: parsed(&lookup, "WARDGRID_END_HOUR").unwrap_or(defaults.end_hour),
            step_minutes: parsed(&lookup, "WARDGRID_STEP_MINUTES").unwrap_or(defaults.step_minutes),
        };

        let date = lookup("WARDGRID_DATE")
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            .unwrap_or_else(|| Local::now().date_naive());

        Self {
            data_dir: PathBuf::from(lookup("WARDGRID_DATA_DIR").unwrap_or_else(|| "./data".into())),
            date,
            grid,
            filter: StaffFilter {
                search: non_empty("WARDGRID_SEARCH"),
                department: non_empty("WARDGRID_DEPARTMENT"),
                role: non_empty("WARDGRID_ROLE"),
                status: None,
            },
            available_only: parsed(&lookup, "WARDGRID_AVAILABLE_ONLY").unwrap_or(false),
            daily_capacity_hours: parsed(&lookup, "WARDGRID_DAILY_CAPACITY").unwrap_or(DEFAULT_DAILY_CAPACITY_HOURS),
        }
    }
}
