//! # deskplan-solver
//!
//! Constraint model builder and solve orchestrator for the deskplan
//! rostering engine.
//!
//! This crate provides:
//! - The decision space over (worker, day, shift, location) tuples
//! - The rule registry and per-rule constraint emission
//! - A solver-independent constraint representation
//! - Translation to the Pumpkin CP-SAT solver, with optimizing,
//!   infeasibility-diagnosing and solution-counting solve strategies
//! - Post-solve analysis feeding the report
//!
//! ## Example
//!
//! ```rust,ignore
//! use deskplan_core::{RuleToggles, ScheduleConfig};
//! use deskplan_solver::Engine;
//!
//! let config: ScheduleConfig = load_config()?;
//! let report = Engine::new().solve(&config)?;
//! println!("{} assignments", report.assignments.dims().cardinality());
//! ```

use thiserror::Error;

use deskplan_core::ConfigurationError;

pub mod analyzer;
pub mod backend;
pub mod engine;
pub mod model;
pub mod objective;
pub mod rules;
pub mod space;

pub use backend::SolveOutcome;
pub use engine::{Engine, SolveOptions};
pub use rules::{enabled_rules, Model, Rule, RuleEmission};
pub use space::{DecisionSpace, SlotId};

/// A failed solve. A roster either comes back whole or not at all.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The configuration failed index validation.
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    /// The enabled rules admit no roster; `rules` is the extracted
    /// conflict core (empty when the solver gave no core).
    #[error("{}", unsatisfiable_message(.rules))]
    Unsatisfiable { rules: Vec<Rule> },

    /// The solver ran out of budget with no verdict either way.
    #[error("the solver reached its time budget without a verdict")]
    Inconclusive,
}

fn unsatisfiable_message(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "no roster satisfies the enabled rules".to_string();
    }
    let named: Vec<String> = rules.iter().map(ToString::to_string).collect();
    format!(
        "no roster satisfies the enabled rules; conflicting: {}",
        named.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsatisfiable_error_names_the_core() {
        let err = SolveError::Unsatisfiable {
            rules: vec![Rule::Coverage, Rule::DayCap],
        };
        assert_eq!(
            err.to_string(),
            "no roster satisfies the enabled rules; conflicting: coverage, days on duty cap"
        );
    }

    #[test]
    fn empty_core_still_reads_well() {
        let err = SolveError::Unsatisfiable { rules: Vec::new() };
        assert_eq!(err.to_string(), "no roster satisfies the enabled rules");
    }
}
