//! Plain-text roster renderer, for terminals and log archives.
//!
//! ## Example Output
//!
//! ```text
//! Duty roster
//! generated 2026-08-24 09:00, optimal, score 5/5, 42 conditions, 12 ms
//!
//! Monday
//!   08:00-09:00  Front desk: Ada
//!   09:00-10:00  Front desk: Grace
//! ```

use deskplan_core::{RenderError, Renderer, RosterReport, ScheduleConfig};

/// Text renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Whether to append the diagnostics block
    pub show_diagnostics: bool,
    /// Whether to append per-worker and per-sector summaries
    pub show_summaries: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            show_diagnostics: true,
            show_summaries: true,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid only, no diagnostics block
    pub fn no_diagnostics(mut self) -> Self {
        self.show_diagnostics = false;
        self
    }

    /// Grid only, no summary tables
    pub fn no_summaries(mut self) -> Self {
        self.show_summaries = false;
        self
    }

    fn status_line(report: &RosterReport) -> String {
        let status = match report.stats.status {
            deskplan_core::SolveStatus::Optimal => "optimal",
            deskplan_core::SolveStatus::Feasible => "feasible",
        };
        let mut line = format!(
            "generated {}, {status}, score {}/{}, {} conditions, {} ms",
            report.generated_at.format("%Y-%m-%d %H:%M"),
            report.stats.objective,
            report.stats.max_objective,
            report.stats.conditions,
            report.stats.wall_time_ms
        );
        if let Some(count) = report.stats.solution_count {
            line.push_str(&format!(", {count} roster(s) admissible"));
        }
        line
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(
        &self,
        config: &ScheduleConfig,
        report: &RosterReport,
    ) -> Result<String, RenderError> {
        let dims = report.assignments.dims();
        if dims != config.dimensions() {
            return Err(RenderError::Format(
                "report and configuration dimensions differ".into(),
            ));
        }

        let mut out = String::new();
        out.push_str(&report.title);
        out.push('\n');
        out.push_str(&Self::status_line(report));
        out.push_str("\n\n");

        for (day, label) in config.days.iter().enumerate() {
            out.push_str(label);
            out.push('\n');
            for (shift, window) in config.shifts.iter().enumerate() {
                let mut cells = Vec::new();
                for (location, site) in config.locations.iter().enumerate() {
                    if !config.open_slot(day, shift, location) {
                        continue;
                    }
                    let name = report
                        .assignments
                        .worker_at(day, shift, location)
                        .map_or("(unfilled)", |w| config.workers[w].name.as_str());
                    cells.push(format!("{}: {name}", site.name));
                }
                if !cells.is_empty() {
                    out.push_str(&format!("  {}  {}\n", window.label(), cells.join(" | ")));
                }
            }
            out.push('\n');
        }

        if self.show_summaries && !report.worker_summaries.is_empty() {
            out.push_str("workers\n");
            for summary in &report.worker_summaries {
                out.push_str(&format!(
                    "  {}: {} active, {} reserve, {} day(s) on duty (quota {}/{}/{})\n",
                    summary.name,
                    summary.active_units,
                    summary.reserve_units,
                    summary.days_on_duty,
                    summary.quota.max_active,
                    summary.quota.max_reserve,
                    summary.quota.max_days
                ));
            }
            out.push('\n');
        }

        if self.show_diagnostics && !report.diagnostics.is_empty() {
            out.push_str("diagnostics\n");
            for diagnostic in &report.diagnostics {
                out.push_str(&format!("  {diagnostic}\n"));
            }
        }

        Ok(out)
    }
}
