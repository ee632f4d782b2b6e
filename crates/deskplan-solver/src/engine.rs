//! The solve orchestrator: validation, rule emission, model assembly,
//! solving, and report assembly, in that order.

use std::time::Duration;

use chrono::Local;
use rayon::prelude::*;
use tracing::{debug, info, info_span};

use deskplan_core::{
    preflight, validate, AssignmentGrid, Diagnostic, DiagnosticCode, RosterReport, ScheduleConfig,
    SolveStats, SolveStatus,
};

use crate::rules::{self, Model};
use crate::space::DecisionSpace;
use crate::{analyzer, backend, objective, SolveError};

/// Knobs of one engine run. The rule sheet itself lives in the
/// configuration; these only govern how hard the engine tries.
#[derive(Clone, Debug)]
pub struct SolveOptions {
    /// Report title.
    pub title: String,
    /// Budget for each solver pass (optimize, diagnose, enumerate).
    pub time_budget: Duration,
    /// Cap for the solution-counting diagnostic mode.
    pub solution_limit: u64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            title: "Duty roster".to_string(),
            time_budget: Duration::from_secs(30),
            solution_limit: 1_000,
        }
    }
}

/// Builds the constraint model from a configuration and drives the solver.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    pub options: SolveOptions,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SolveOptions) -> Self {
        Self { options }
    }

    /// Produce a roster for the configuration, or a [`SolveError`] that
    /// names what went wrong. Infeasible rule sheets come back as
    /// [`SolveError::Unsatisfiable`] with the conflicting rules; this
    /// never returns a partial roster.
    pub fn solve(&self, config: &ScheduleConfig) -> Result<RosterReport, SolveError> {
        validate(config)?;
        let dims = config.dimensions();
        let span = info_span!("solve", %dims);
        let _guard = span.enter();

        let mut diagnostics = preflight(config);
        for label in rules::disabled_labels(&config.rules) {
            diagnostics.push(Diagnostic::info(
                DiagnosticCode::R001RuleDisabled,
                format!("rule off: {label}"),
            ));
        }

        let space = DecisionSpace::new(dims);
        let enabled = rules::enabled_rules(&config.rules);
        debug!(rules = enabled.len(), "emitting constraints");
        let emissions: Vec<_> = enabled
            .par_iter()
            .map(|rule| rule.emit(config, &space))
            .collect();
        let (model, mut notes) = Model::assemble(emissions);
        diagnostics.append(&mut notes);
        let conditions = model.constraint_count();
        let objective = objective::fulfilled_preferences(config, &space);
        info!(
            conditions,
            variables = space.len() + model.aux.len(),
            max_score = objective.max_score,
            "model built"
        );

        let outcome = backend::solve(&space, &model, &objective, self.options.time_budget)?;
        let quality = format!("score {} of {}", outcome.objective, objective.max_score);
        diagnostics.push(match outcome.status {
            SolveStatus::Optimal => Diagnostic::info(
                DiagnosticCode::S001OptimalSolution,
                format!("optimal roster found, {quality}"),
            ),
            SolveStatus::Feasible => Diagnostic::info(
                DiagnosticCode::S002FeasibleSolution,
                format!("roster found, optimality not proven in time, {quality}"),
            ),
        });

        let solution_count = if config.rules.search_for_all_solutions {
            let count = backend::count_solutions(
                &space,
                &model,
                self.options.time_budget,
                self.options.solution_limit,
            );
            let suffix = if count >= self.options.solution_limit {
                " (limit reached)"
            } else {
                ""
            };
            diagnostics.push(Diagnostic::info(
                DiagnosticCode::S004SolutionCount,
                format!("{count} distinct roster(s){suffix}"),
            ));
            Some(count)
        } else {
            None
        };

        let grid = AssignmentGrid::new(dims, outcome.assignments);
        let worker_summaries = analyzer::worker_summaries(config, &grid);
        let sector_summaries = analyzer::sector_summaries(config, &grid);
        let assignment_notes = analyzer::assignment_notes(config, &grid);
        info!(status = ?outcome.status, wall_time_ms = outcome.wall_time_ms, "solve finished");

        Ok(RosterReport {
            title: self.options.title.clone(),
            generated_at: Local::now().naive_local(),
            diagnostics,
            stats: SolveStats {
                status: outcome.status,
                objective: outcome.objective,
                max_objective: objective.max_score,
                conditions,
                wall_time_ms: outcome.wall_time_ms,
                solution_count,
            },
            assignments: grid,
            worker_summaries,
            sector_summaries,
            notes: assignment_notes,
        })
    }
}
