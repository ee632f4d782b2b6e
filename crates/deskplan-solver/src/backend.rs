//! Translation of the constraint model to the Pumpkin CP-SAT solver, and
//! the solve strategies on top of it.
//!
//! Every constraint is half-reified by a gate literal owned by its rule.
//! The optimizing build pins all gates true and maximizes the preference
//! score. When that build is infeasible, a second, fresh build passes the
//! gates as assumptions instead, so the solver can return an unsatisfiable
//! core naming the conflicting rules.

use std::time::{Duration, Instant};

use pumpkin_solver::constraints as cp;
use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::predicate;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution, SatisfactionResult};
use pumpkin_solver::results::SatisfactionResultUnderAssumptions;
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::variables::{AffineView, DomainId, Literal, TransformableVariable};
use pumpkin_solver::Solver;
use tracing::debug;

use deskplan_core::SolveStatus;

use crate::model::{CmpOp, ConstraintExpr, Term, VarRef};
use crate::objective::Objective;
use crate::rules::{Model, Rule};
use crate::space::DecisionSpace;
use crate::SolveError;

/// Result of a successful optimizing solve.
#[derive(Clone, Debug)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub objective: i64,
    /// Valuation of the decision space in flat index order.
    pub assignments: Vec<bool>,
    pub wall_time_ms: u64,
}

/// Solver-side variables of one build.
struct Instance {
    assignment: Vec<DomainId>,
    aux: Vec<DomainId>,
    gates: Vec<(Rule, Literal)>,
}

impl Instance {
    fn domain(&self, var: VarRef) -> DomainId {
        match var {
            VarRef::Assignment(index) => self.assignment[index],
            VarRef::Aux(index) => self.aux[index],
        }
    }

    fn affine(&self, term: &Term) -> AffineView<DomainId> {
        self.domain(term.var).scaled(term.coeff as i32)
    }
}

/// Create all variables and post every rule's constraints, gated by that
/// rule's literal. Decision and aux variables are bounded integers so all
/// linear constraints stay over one variable type.
fn build_instance(solver: &mut Solver, space: &DecisionSpace, model: &Model) -> Instance {
    let assignment = (0..space.len())
        .map(|_| solver.new_bounded_integer(0, 1))
        .collect();
    let aux = model
        .aux
        .iter()
        .map(|domain| solver.new_bounded_integer(domain.lb, domain.ub))
        .collect();
    let mut instance = Instance {
        assignment,
        aux,
        gates: Vec::with_capacity(model.groups.len()),
    };

    let tag = solver.new_constraint_tag();
    for group in &model.groups {
        let gate = solver.new_literal();
        for constraint in &group.constraints {
            match constraint {
                ConstraintExpr::Linear { terms, op, rhs } => {
                    let vars: Vec<_> = terms.iter().map(|t| instance.affine(t)).collect();
                    let rhs = *rhs as i32;
                    let _ = match op {
                        CmpOp::Eq => solver
                            .add_constraint(cp::equals(vars, rhs, tag))
                            .implied_by(gate),
                        CmpOp::Le => solver
                            .add_constraint(cp::less_than_or_equals(vars, rhs, tag))
                            .implied_by(gate),
                        CmpOp::Ge => solver
                            .add_constraint(cp::greater_than_or_equals(vars, rhs, tag))
                            .implied_by(gate),
                    };
                }
                ConstraintExpr::AbsEquality { value, magnitude } => {
                    let _ = solver
                        .add_constraint(cp::absolute(
                            instance.domain(*value),
                            instance.domain(*magnitude),
                            tag,
                        ))
                        .implied_by(gate);
                }
                ConstraintExpr::MaxEquality { over, result } => {
                    let array: Vec<_> = over.iter().map(|&v| instance.domain(v)).collect();
                    let _ = solver
                        .add_constraint(cp::maximum(array, instance.domain(*result), tag))
                        .implied_by(gate);
                }
            }
        }
        instance.gates.push((group.rule, gate));
    }
    instance
}

fn noop_callback<B>(_: &Solver, _: pumpkin_solver::results::SolutionReference, _: &B) {}

/// Run the optimizing solve. On infeasibility, re-solves under assumptions
/// and reports the conflicting rules instead of a roster.
pub fn solve(
    space: &DecisionSpace,
    model: &Model,
    objective: &Objective,
    budget: Duration,
) -> Result<SolveOutcome, SolveError> {
    let started = Instant::now();
    let mut solver = Solver::default();
    let instance = build_instance(&mut solver, space, model);

    // All variables must exist before the first clause propagates: pinning
    // an infeasible rule sheet makes the solver refuse further variables.
    let ceiling: i64 = objective.terms.iter().map(|t| t.coeff).sum();
    let score = solver.new_bounded_integer(0, ceiling.max(0) as i32);
    let tag = solver.new_constraint_tag();
    let mut terms: Vec<_> = objective.terms.iter().map(|t| instance.affine(t)).collect();
    terms.push(score.scaled(-1));
    let _ = solver.add_constraint(cp::equals(terms, 0, tag)).post();

    // Pin every rule on; this build is for optimizing, not diagnosing.
    for (_, gate) in &instance.gates {
        let _ = solver.add_clause([gate.get_true_predicate()], tag);
    }

    let mut brancher = solver.default_brancher();
    let mut termination = TimeBudget::starting_now(budget);
    let result = solver.optimise(
        &mut brancher,
        &mut termination,
        LinearSatUnsat::new(OptimisationDirection::Maximise, score, noop_callback),
    );

    let (status, solution) = match result {
        OptimisationResult::Optimal(solution) => (SolveStatus::Optimal, solution),
        OptimisationResult::Satisfiable(solution) => (SolveStatus::Feasible, solution),
        OptimisationResult::Unsatisfiable => {
            debug!("optimizing build infeasible, rebuilding under assumptions");
            return Err(diagnose(space, model, budget));
        }
        OptimisationResult::Unknown => return Err(SolveError::Inconclusive),
    };

    let assignments = instance
        .assignment
        .iter()
        .map(|&var| solution.get_integer_value(var) != 0)
        .collect();
    Ok(SolveOutcome {
        status,
        objective: i64::from(solution.get_integer_value(score)),
        assignments,
        wall_time_ms: started.elapsed().as_millis() as u64,
    })
}

/// Fresh build with the gates as assumptions; the extracted core names the
/// rules that cannot hold together.
fn diagnose(space: &DecisionSpace, model: &Model, budget: Duration) -> SolveError {
    let mut solver = Solver::default();
    let instance = build_instance(&mut solver, space, model);
    let assumptions: Vec<_> = instance
        .gates
        .iter()
        .map(|(_, gate)| gate.get_true_predicate())
        .collect();

    let mut brancher = solver.default_brancher();
    let mut termination = TimeBudget::starting_now(budget);
    let result = solver.satisfy_under_assumptions(&mut brancher, &mut termination, &assumptions);
    match result {
        SatisfactionResultUnderAssumptions::UnsatisfiableUnderAssumptions(mut unsat) => {
            let core = unsat.extract_core();
            let rules = instance
                .gates
                .iter()
                .filter(|(_, gate)| core.iter().any(|p| *p == gate.get_true_predicate()))
                .map(|(rule, _)| *rule)
                .collect();
            SolveError::Unsatisfiable { rules }
        }
        // All constraints are gated, so the ungated model itself cannot be
        // infeasible; a bare Unsatisfiable still names no rule.
        SatisfactionResultUnderAssumptions::Unsatisfiable(..) => {
            SolveError::Unsatisfiable { rules: Vec::new() }
        }
        _ => SolveError::Inconclusive,
    }
}

/// Count distinct rosters by repeated solving with blocking clauses, up to
/// `limit`. A diagnostic tool: the count says how constrained (or how loose)
/// the rule sheet leaves the period.
pub fn count_solutions(
    space: &DecisionSpace,
    model: &Model,
    budget: Duration,
    limit: u64,
) -> u64 {
    let mut solver = Solver::default();
    let instance = build_instance(&mut solver, space, model);
    let tag = solver.new_constraint_tag();
    for (_, gate) in &instance.gates {
        let _ = solver.add_clause([gate.get_true_predicate()], tag);
    }

    let mut brancher = solver.default_brancher();
    let mut termination = TimeBudget::starting_now(budget);
    let mut count = 0u64;
    while count < limit {
        let blocking = {
            let result = solver.satisfy(&mut brancher, &mut termination);
            match result {
                SatisfactionResult::Satisfiable(satisfiable) => {
                    count += 1;
                    let solution = satisfiable.solution();
                    instance
                        .assignment
                        .iter()
                        .map(|&var| {
                            let value = solution.get_integer_value(var);
                            predicate![var != value]
                        })
                        .collect::<Vec<_>>()
                }
                SatisfactionResult::Unsatisfiable(..) | SatisfactionResult::Unknown(..) => break,
            }
        };
        if solver.add_clause(blocking, tag).is_err() {
            break;
        }
    }
    count
}
