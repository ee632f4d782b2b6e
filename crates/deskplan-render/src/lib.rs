//! # deskplan-render
//!
//! Rendering backends for deskplan roster reports.
//!
//! This crate provides:
//! - [`TextRenderer`]: plain text for terminals and logs
//! - [`HtmlRenderer`]: static HTML with by-location and by-time views
//!
//! Both implement [`deskplan_core::Renderer`] over a configuration and a
//! [`deskplan_core::RosterReport`].

pub mod html;
pub mod text;

pub use html::HtmlRenderer;
pub use text::TextRenderer;

#[cfg(test)]
pub(crate) mod test_fixtures {
    use chrono::NaiveDate;
    use deskplan_core::{
        AssignmentGrid, Diagnostic, DiagnosticCode, Location, RosterReport, ScheduleConfig,
        SolveStats, SolveStatus, Worker, WorkerSummary,
    };

    /// 2 days x 2 shifts x 1 location; Tuesday's second shift is the
    /// excluded grid edge, leaving 3 open slots.
    pub fn config_fixture() -> ScheduleConfig {
        ScheduleConfig::builder()
            .days(["Monday", "Tuesday"])
            .hourly_shifts(8, 2)
            .location(Location::new("Front desk").open_all_days(0, 1))
            .worker(Worker::new("Ada").sector("search").category("80"))
            .worker(Worker::new("Grace").sector("cado").category("80"))
            .quota("80", 3, 2, 4)
            .available_everywhere("Ada")
            .available_everywhere("Grace")
            .build()
    }

    /// Ada on Monday 08:00 and Tuesday 08:00, Grace on Monday 09:00.
    pub fn report_fixture(config: &ScheduleConfig) -> RosterReport {
        let dims = config.dimensions();
        let mut data = vec![false; dims.cardinality()];
        let index = |w: usize, d: usize, s: usize| ((w * dims.days + d) * dims.shifts + s);
        data[index(0, 0, 0)] = true;
        data[index(0, 1, 0)] = true;
        data[index(1, 0, 1)] = true;

        let worker_summaries = config
            .workers
            .iter()
            .enumerate()
            .map(|(worker, profile)| WorkerSummary {
                worker,
                name: profile.name.clone(),
                active_units: if worker == 0 { 2 } else { 1 },
                reserve_units: 0,
                days_on_duty: if worker == 0 { 2 } else { 1 },
                quota: *config.quota_for(profile).unwrap(),
            })
            .collect();

        RosterReport {
            title: "Duty roster".to_string(),
            generated_at: NaiveDate::from_ymd_opt(2026, 8, 24)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            diagnostics: vec![Diagnostic::warning(
                DiagnosticCode::P003MissingAvailability,
                "sample warning",
            )],
            stats: SolveStats {
                status: SolveStatus::Optimal,
                objective: 2,
                max_objective: 3,
                conditions: 42,
                wall_time_ms: 12,
                solution_count: None,
            },
            assignments: AssignmentGrid::new(dims, data),
            worker_summaries,
            sector_summaries: Vec::new(),
            notes: Vec::new(),
        }
    }
}
