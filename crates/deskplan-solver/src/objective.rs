//! Objective composition: maximize fulfilled preferences.
//!
//! One point per assignment a worker asked for. The reported ceiling is
//! the open slot count, so the achieved/ceiling ratio is a direct quality
//! measure of the roster.

use deskplan_core::ScheduleConfig;

use crate::model::Term;
use crate::space::DecisionSpace;

/// The linear objective of one solve, always maximized.
#[derive(Clone, Debug)]
pub struct Objective {
    pub terms: Vec<Term>,
    /// Score with every open slot preference-staffed.
    pub max_score: i64,
}

/// One term per slot a worker declared available for, open or not. Closed
/// slots only stay unrewarded when a rule (coverage) forces them empty;
/// the `max_score` ceiling still counts open slots only.
pub fn fulfilled_preferences(config: &ScheduleConfig, space: &DecisionSpace) -> Objective {
    let dims = space.dims();
    let mut terms = Vec::new();
    for worker in 0..dims.workers {
        for day in 0..dims.days {
            for shift in 0..dims.shifts {
                for location in 0..dims.locations {
                    let weight = config.availability.weight(worker, day, shift, location);
                    if weight > 0 {
                        terms.push(Term::assignment(
                            weight,
                            space.index(worker, day, shift, location),
                        ));
                    }
                }
            }
        }
    }
    Objective {
        terms,
        max_score: config.max_objective(),
    }
}
