//! HTML roster renderer.
//!
//! Produces the two classic views of the same roster: one table keyed by
//! location (who sits where, hour by hour) and one keyed by time (who is
//! in at a given hour, location by location), plus the diagnostics and
//! summary blocks. Static markup only.

use deskplan_core::{RenderError, Renderer, RosterReport, ScheduleConfig, Severity};

/// HTML renderer
#[derive(Clone, Debug)]
pub struct HtmlRenderer {
    /// Emit a complete document with inline styling; otherwise a fragment
    pub standalone: bool,
    /// Whether to append the diagnostics block
    pub show_diagnostics: bool,
    /// Whether to append per-worker and per-sector summaries
    pub show_summaries: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            standalone: true,
            show_diagnostics: true,
            show_summaries: true,
        }
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit only the body fragment, for embedding
    pub fn fragment(mut self) -> Self {
        self.standalone = false;
        self
    }

    pub fn no_diagnostics(mut self) -> Self {
        self.show_diagnostics = false;
        self
    }

    pub fn no_summaries(mut self) -> Self {
        self.show_summaries = false;
        self
    }

    fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    fn cell(config: &ScheduleConfig, report: &RosterReport, day: usize, shift: usize, location: usize) -> String {
        if !config.open_slot(day, shift, location) {
            return "<td class=\"closed\"></td>".to_string();
        }
        match report.assignments.worker_at(day, shift, location) {
            Some(worker) => format!("<td>{}</td>", Self::escape(&config.workers[worker].name)),
            None => "<td class=\"unfilled\"></td>".to_string(),
        }
    }

    /// Rows are locations; columns are every (day, shift) pair.
    fn by_location_table(config: &ScheduleConfig, report: &RosterReport) -> String {
        let mut out = String::from("<table class=\"by-location\">\n<tr><th>Location</th>");
        for label in &config.days {
            for shift in &config.shifts {
                out.push_str(&format!(
                    "<th>{} {}</th>",
                    Self::escape(label),
                    shift.label()
                ));
            }
        }
        out.push_str("</tr>\n");
        for (location, site) in config.locations.iter().enumerate() {
            out.push_str(&format!("<tr><th>{}</th>", Self::escape(&site.name)));
            for day in 0..config.days.len() {
                for shift in 0..config.shifts.len() {
                    out.push_str(&Self::cell(config, report, day, shift, location));
                }
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</table>\n");
        out
    }

    /// Rows are (day, shift) pairs; columns are locations.
    fn by_time_table(config: &ScheduleConfig, report: &RosterReport) -> String {
        let mut out = String::from("<table class=\"by-time\">\n<tr><th>Time</th>");
        for site in &config.locations {
            out.push_str(&format!("<th>{}</th>", Self::escape(&site.name)));
        }
        out.push_str("</tr>\n");
        for (day, label) in config.days.iter().enumerate() {
            for (shift, window) in config.shifts.iter().enumerate() {
                out.push_str(&format!(
                    "<tr><th>{} {}</th>",
                    Self::escape(label),
                    window.label()
                ));
                for location in 0..config.locations.len() {
                    out.push_str(&Self::cell(config, report, day, shift, location));
                }
                out.push_str("</tr>\n");
            }
        }
        out.push_str("</table>\n");
        out
    }

    fn diagnostics_block(report: &RosterReport) -> String {
        let mut out = String::from("<ul class=\"diagnostics\">\n");
        for diagnostic in &report.diagnostics {
            let class = match diagnostic.severity {
                Severity::Info => "info",
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            out.push_str(&format!(
                "<li class=\"{class}\">[{}] {}</li>\n",
                diagnostic.code.as_str(),
                Self::escape(&diagnostic.message)
            ));
        }
        out.push_str("</ul>\n");
        out
    }

    fn summaries_block(report: &RosterReport) -> String {
        let mut out = String::from(
            "<table class=\"workers\">\n<tr><th>Worker</th><th>Active</th>\
             <th>Reserve</th><th>Days</th><th>Quota</th></tr>\n",
        );
        for summary in &report.worker_summaries {
            out.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}/{}/{}</td></tr>\n",
                Self::escape(&summary.name),
                summary.active_units,
                summary.reserve_units,
                summary.days_on_duty,
                summary.quota.max_active,
                summary.quota.max_reserve,
                summary.quota.max_days
            ));
        }
        out.push_str("</table>\n");
        out
    }
}

const STYLE: &str = "table{border-collapse:collapse;margin-bottom:1em}\
td,th{border:1px solid #999;padding:2px 8px}\
td.closed{background:#ddd}td.unfilled{background:#fdd}\
li.warning{color:#a60}li.error{color:#a00}";

impl Renderer for HtmlRenderer {
    type Output = String;

    fn render(
        &self,
        config: &ScheduleConfig,
        report: &RosterReport,
    ) -> Result<String, RenderError> {
        if report.assignments.dims() != config.dimensions() {
            return Err(RenderError::Format(
                "report and configuration dimensions differ".into(),
            ));
        }

        let mut body = String::new();
        body.push_str(&format!("<h1>{}</h1>\n", Self::escape(&report.title)));
        body.push_str(&format!(
            "<p>generated {}, score {} of {}</p>\n",
            report.generated_at.format("%Y-%m-%d %H:%M"),
            report.stats.objective,
            report.stats.max_objective
        ));
        body.push_str("<h2>By location</h2>\n");
        body.push_str(&Self::by_location_table(config, report));
        body.push_str("<h2>By time</h2>\n");
        body.push_str(&Self::by_time_table(config, report));
        if self.show_summaries && !report.worker_summaries.is_empty() {
            body.push_str("<h2>Workers</h2>\n");
            body.push_str(&Self::summaries_block(report));
        }
        if self.show_diagnostics && !report.diagnostics.is_empty() {
            body.push_str("<h2>Diagnostics</h2>\n");
            body.push_str(&Self::diagnostics_block(report));
        }

        if !self.standalone {
            return Ok(body);
        }
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
            Self::escape(&report.title)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{config_fixture, report_fixture};

    #[test]
    fn renderer_defaults() {
        let renderer = HtmlRenderer::new();
        assert!(renderer.standalone);
        assert!(renderer.show_diagnostics);
    }

    #[test]
    fn standalone_output_is_a_document() {
        let config = config_fixture();
        let report = report_fixture(&config);
        let output = HtmlRenderer::new().render(&config, &report).unwrap();
        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.contains("<title>Duty roster</title>"));
        assert!(output.ends_with("</html>\n"));
    }

    #[test]
    fn fragment_mode_skips_the_document_shell() {
        let config = config_fixture();
        let report = report_fixture(&config);
        let output = HtmlRenderer::new()
            .fragment()
            .render(&config, &report)
            .unwrap();
        assert!(output.starts_with("<h1>"));
        assert!(!output.contains("<html>"));
    }

    #[test]
    fn both_views_are_rendered() {
        let config = config_fixture();
        let report = report_fixture(&config);
        let output = HtmlRenderer::new().render(&config, &report).unwrap();
        assert!(output.contains("class=\"by-location\""));
        assert!(output.contains("class=\"by-time\""));
        // Ada appears in both tables.
        assert!(output.matches(">Ada<").count() >= 2);
    }

    #[test]
    fn closed_cells_are_marked() {
        let config = config_fixture();
        let report = report_fixture(&config);
        let output = HtmlRenderer::new().render(&config, &report).unwrap();
        // The grid edge (Tuesday's second shift) renders as a closed cell.
        assert!(output.contains("class=\"closed\""));
    }

    #[test]
    fn names_are_escaped() {
        let mut config = config_fixture();
        config.workers[0].name = "Ada <dev>".to_string();
        let report = report_fixture(&config);
        let output = HtmlRenderer::new().render(&config, &report).unwrap();
        assert!(output.contains("Ada &lt;dev&gt;"));
        assert!(!output.contains("Ada <dev>"));
    }
}
