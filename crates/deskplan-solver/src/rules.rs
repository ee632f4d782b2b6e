//! The rule registry: every scheduling rule, and how each one lowers to
//! constraints over the decision space.
//!
//! A rule emission is pure: it reads the configuration and the index
//! bijection and produces constraints plus any per-worker notes. Emissions
//! for distinct rules are independent and run in parallel.

use deskplan_core::config::BASE_PERIOD_DAYS;
use deskplan_core::{Diagnostic, DiagnosticCode, LocationRole, RuleToggles, ScheduleConfig};

use crate::model::{AuxDomain, CmpOp, ConstraintExpr, Term, VarRef};
use crate::space::DecisionSpace;

// ============================================================================
// Registry
// ============================================================================

/// One enabled scheduling rule. Every constraint in the model belongs to
/// exactly one rule, which is what makes infeasibility cores reportable in
/// the operator's vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Every open slot staffed by exactly one worker; closed slots empty.
    Coverage,
    /// A worker sits at no more than one location per shift.
    SingleSeat,
    /// At most `limit` shifts per worker per day.
    DailyShiftCap { limit: u32 },
    /// At least one shift per worker per full week of the period.
    WeeklyFloor,
    /// Shifts on one day come in runs of the worker's preferred length.
    PreferredRunLength,
    /// At most one closing shift per worker over the period.
    LateShiftCap,
    /// Never the last two shifts of a day back to back.
    ClosingPairExclusion,
    /// Never both shifts straddling the midday break.
    MiddayPairExclusion,
    /// Distinct days on duty capped by the worker's quota.
    DayCap,
    /// No assignment outside stated availability or during a meeting.
    OutOfPreferenceCap,
    /// Active units at least half the active quota.
    ActiveFloor,
    /// Active units at most the active quota.
    ActiveCeiling,
    /// Reserve units at least the reserve quota less one.
    ReserveFloor,
    /// Reserve units at most the reserve quota.
    ReserveCeiling,
    /// Holiday-period floor on active units.
    HolidayFloor,
}

impl Rule {
    pub fn label(&self) -> &'static str {
        match self {
            Rule::Coverage => "coverage",
            Rule::SingleSeat => "single seat",
            Rule::DailyShiftCap { .. } => "daily shift cap",
            Rule::WeeklyFloor => "weekly floor",
            Rule::PreferredRunLength => "preferred run length",
            Rule::LateShiftCap => "late shift cap",
            Rule::ClosingPairExclusion => "closing pair exclusion",
            Rule::MiddayPairExclusion => "midday pair exclusion",
            Rule::DayCap => "days on duty cap",
            Rule::OutOfPreferenceCap => "out-of-preference exclusion",
            Rule::ActiveFloor => "active floor",
            Rule::ActiveCeiling => "active ceiling",
            Rule::ReserveFloor => "reserve floor",
            Rule::ReserveCeiling => "reserve ceiling",
            Rule::HolidayFloor => "holiday floor",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::DailyShiftCap { limit } => write!(f, "daily shift cap ({limit})"),
            other => f.write_str(other.label()),
        }
    }
}

/// The rules selected by a toggle sheet. When both daily caps are on, the
/// stricter one wins.
pub fn enabled_rules(toggles: &RuleToggles) -> Vec<Rule> {
    let mut rules = Vec::new();
    if toggles.coverage {
        rules.push(Rule::Coverage);
    }
    if toggles.single_seat {
        rules.push(Rule::SingleSeat);
    }
    if toggles.max_one_shift_per_day {
        rules.push(Rule::DailyShiftCap { limit: 1 });
    } else if toggles.max_two_shifts_per_day {
        rules.push(Rule::DailyShiftCap { limit: 2 });
    }
    if toggles.weekly_floor {
        rules.push(Rule::WeeklyFloor);
    }
    if toggles.preferred_run_length {
        rules.push(Rule::PreferredRunLength);
    }
    if toggles.late_shift_cap {
        rules.push(Rule::LateShiftCap);
    }
    if toggles.no_closing_pair {
        rules.push(Rule::ClosingPairExclusion);
    }
    if toggles.no_midday_pair {
        rules.push(Rule::MiddayPairExclusion);
    }
    if toggles.max_days_on_duty {
        rules.push(Rule::DayCap);
    }
    if toggles.no_out_of_preference {
        rules.push(Rule::OutOfPreferenceCap);
    }
    if toggles.min_active {
        rules.push(Rule::ActiveFloor);
    }
    if toggles.max_active {
        rules.push(Rule::ActiveCeiling);
    }
    if toggles.min_reserve {
        rules.push(Rule::ReserveFloor);
    }
    if toggles.max_reserve {
        rules.push(Rule::ReserveCeiling);
    }
    if toggles.holiday_quota {
        rules.push(Rule::HolidayFloor);
    }
    rules
}

/// Toggle names that are off, for the rule-sheet echo in the report.
pub fn disabled_labels(toggles: &RuleToggles) -> Vec<&'static str> {
    let sheet = [
        ("coverage", toggles.coverage),
        ("single seat", toggles.single_seat),
        (
            "daily shift cap",
            toggles.max_one_shift_per_day || toggles.max_two_shifts_per_day,
        ),
        ("weekly floor", toggles.weekly_floor),
        ("preferred run length", toggles.preferred_run_length),
        ("late shift cap", toggles.late_shift_cap),
        ("closing pair exclusion", toggles.no_closing_pair),
        ("midday pair exclusion", toggles.no_midday_pair),
        ("days on duty cap", toggles.max_days_on_duty),
        ("out-of-preference exclusion", toggles.no_out_of_preference),
        ("active floor", toggles.min_active),
        ("active ceiling", toggles.max_active),
        ("reserve floor", toggles.min_reserve),
        ("reserve ceiling", toggles.max_reserve),
        ("holiday floor", toggles.holiday_quota),
    ];
    sheet
        .into_iter()
        .filter_map(|(label, on)| (!on).then_some(label))
        .collect()
}

// ============================================================================
// Emission
// ============================================================================

/// Constraints produced by one rule, with aux indices local to the emission.
#[derive(Clone, Debug)]
pub struct RuleEmission {
    pub rule: Rule,
    pub aux: Vec<AuxDomain>,
    pub constraints: Vec<ConstraintExpr>,
    pub notes: Vec<Diagnostic>,
}

impl RuleEmission {
    fn new(rule: Rule) -> Self {
        Self {
            rule,
            aux: Vec::new(),
            constraints: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn new_aux(&mut self, lb: i32, ub: i32) -> VarRef {
        self.aux.push(AuxDomain { lb, ub });
        VarRef::Aux(self.aux.len() - 1)
    }

    fn push(&mut self, terms: Vec<Term>, op: CmpOp, rhs: i64) {
        self.constraints.push(ConstraintExpr::sum(terms, op, rhs));
    }
}

impl Rule {
    /// Lower this rule to constraints. Runs after [`deskplan_core::validate`],
    /// so quota lookups cannot fail.
    pub fn emit(&self, config: &ScheduleConfig, space: &DecisionSpace) -> RuleEmission {
        let mut out = RuleEmission::new(*self);
        match *self {
            Rule::Coverage => emit_coverage(config, space, &mut out),
            Rule::SingleSeat => emit_single_seat(space, &mut out),
            Rule::DailyShiftCap { limit } => emit_daily_cap(space, limit, &mut out),
            Rule::WeeklyFloor => emit_weekly_floor(config, space, &mut out),
            Rule::PreferredRunLength => emit_run_length(config, space, &mut out),
            Rule::LateShiftCap => emit_late_shift_cap(space, &mut out),
            Rule::ClosingPairExclusion => emit_closing_pair(space, &mut out),
            Rule::MiddayPairExclusion => emit_midday_pair(config, space, &mut out),
            Rule::DayCap => emit_day_cap(config, space, &mut out),
            Rule::OutOfPreferenceCap => emit_out_of_preference(config, space, &mut out),
            Rule::ActiveFloor => emit_unit_band(config, space, Band::ActiveFloor, &mut out),
            Rule::ActiveCeiling => emit_unit_band(config, space, Band::ActiveCeiling, &mut out),
            Rule::ReserveFloor => emit_unit_band(config, space, Band::ReserveFloor, &mut out),
            Rule::ReserveCeiling => emit_unit_band(config, space, Band::ReserveCeiling, &mut out),
            Rule::HolidayFloor => emit_unit_band(config, space, Band::HolidayFloor, &mut out),
        }
        out
    }
}

fn emit_coverage(config: &ScheduleConfig, space: &DecisionSpace, out: &mut RuleEmission) {
    let dims = space.dims();
    for day in 0..dims.days {
        for shift in 0..dims.shifts {
            for location in 0..dims.locations {
                let terms = (0..dims.workers)
                    .map(|w| Term::assignment(1, space.index(w, day, shift, location)))
                    .collect();
                let rhs = i64::from(config.open_slot(day, shift, location));
                out.push(terms, CmpOp::Eq, rhs);
            }
        }
    }
}

fn emit_single_seat(space: &DecisionSpace, out: &mut RuleEmission) {
    let dims = space.dims();
    for worker in 0..dims.workers {
        for day in 0..dims.days {
            for shift in 0..dims.shifts {
                let terms = (0..dims.locations)
                    .map(|l| Term::assignment(1, space.index(worker, day, shift, l)))
                    .collect();
                out.push(terms, CmpOp::Le, 1);
            }
        }
    }
}

fn emit_daily_cap(space: &DecisionSpace, limit: u32, out: &mut RuleEmission) {
    let dims = space.dims();
    for worker in 0..dims.workers {
        for day in 0..dims.days {
            let mut terms = Vec::with_capacity(dims.shifts * dims.locations);
            for shift in 0..dims.shifts {
                for location in 0..dims.locations {
                    terms.push(Term::assignment(1, space.index(worker, day, shift, location)));
                }
            }
            out.push(terms, CmpOp::Le, i64::from(limit));
        }
    }
}

fn emit_weekly_floor(config: &ScheduleConfig, space: &DecisionSpace, out: &mut RuleEmission) {
    let dims = space.dims();
    let floor = (dims.days / BASE_PERIOD_DAYS) as i64;
    if floor == 0 {
        // Shorter than one base period: nothing to enforce.
        return;
    }
    for (worker, profile) in config.workers.iter().enumerate() {
        let Some(quota) = config.quota_for(profile) else {
            continue;
        };
        if quota.max_active == 0 {
            out.notes.push(Diagnostic::info(
                DiagnosticCode::R002QuotaFloorExemption,
                format!("{} is exempt from the weekly floor (zero active quota)", profile.name),
            ));
            continue;
        }
        let mut terms = Vec::new();
        for day in 0..dims.days {
            for shift in 0..dims.shifts {
                for location in 0..dims.locations {
                    terms.push(Term::assignment(1, space.index(worker, day, shift, location)));
                }
            }
        }
        out.push(terms, CmpOp::Ge, floor);
    }
}

/// Run-length lowering: per day, per interior shift boundary, an auxiliary
/// delta in [-1, 1] equals the worked difference across the boundary, and
/// its magnitude counts a run edge. `run_len * edges <= 2 * worked` then
/// forbids runs shorter than the preferred length.
fn emit_run_length(config: &ScheduleConfig, space: &DecisionSpace, out: &mut RuleEmission) {
    let dims = space.dims();
    for (worker, profile) in config.workers.iter().enumerate() {
        let run_len = i64::from(profile.preferred_run_length);
        if run_len <= 1 {
            continue;
        }
        for day in 0..dims.days {
            let mut day_terms: Vec<Term> = Vec::new();
            for shift in 0..dims.shifts.saturating_sub(1) {
                let delta = out.new_aux(-1, 1);
                let magnitude = out.new_aux(0, 1);
                let mut terms = Vec::with_capacity(2 * dims.locations + 1);
                for location in 0..dims.locations {
                    terms.push(Term::assignment(1, space.index(worker, day, shift + 1, location)));
                    terms.push(Term::assignment(-1, space.index(worker, day, shift, location)));
                }
                terms.push(Term {
                    coeff: -1,
                    var: delta,
                });
                out.push(terms, CmpOp::Eq, 0);
                out.constraints.push(ConstraintExpr::AbsEquality {
                    value: delta,
                    magnitude,
                });
                day_terms.push(Term {
                    coeff: run_len,
                    var: magnitude,
                });
            }
            for shift in 0..dims.shifts {
                for location in 0..dims.locations {
                    // Only preferred assignments count toward the run budget.
                    let weight = config.availability.weight(worker, day, shift, location);
                    if weight > 0 {
                        day_terms.push(Term::assignment(
                            -2 * weight,
                            space.index(worker, day, shift, location),
                        ));
                    }
                }
            }
            out.push(day_terms, CmpOp::Le, 0);
        }
    }
}

fn emit_late_shift_cap(space: &DecisionSpace, out: &mut RuleEmission) {
    let dims = space.dims();
    let last = dims.shifts - 1;
    for worker in 0..dims.workers {
        let mut terms = Vec::with_capacity(dims.days * dims.locations);
        for day in 0..dims.days {
            for location in 0..dims.locations {
                terms.push(Term::assignment(1, space.index(worker, day, last, location)));
            }
        }
        out.push(terms, CmpOp::Le, 1);
    }
}

fn emit_closing_pair(space: &DecisionSpace, out: &mut RuleEmission) {
    let dims = space.dims();
    if dims.shifts < 2 {
        return;
    }
    let last = dims.shifts - 1;
    for worker in 0..dims.workers {
        for day in 0..dims.days {
            let mut terms = Vec::with_capacity(2 * dims.locations);
            for location in 0..dims.locations {
                terms.push(Term::assignment(1, space.index(worker, day, last - 1, location)));
                terms.push(Term::assignment(1, space.index(worker, day, last, location)));
            }
            out.push(terms, CmpOp::Le, 1);
        }
    }
}

fn emit_midday_pair(config: &ScheduleConfig, space: &DecisionSpace, out: &mut RuleEmission) {
    let dims = space.dims();
    let Some((before, after)) = config.midday_pair() else {
        out.notes.push(Diagnostic::info(
            DiagnosticCode::R001RuleDisabled,
            "midday pair exclusion has no effect: no shift pair straddles midday",
        ));
        return;
    };
    for worker in 0..dims.workers {
        for day in 0..dims.days {
            let mut terms = Vec::with_capacity(2 * dims.locations);
            for location in 0..dims.locations {
                terms.push(Term::assignment(1, space.index(worker, day, before, location)));
                terms.push(Term::assignment(1, space.index(worker, day, after, location)));
            }
            out.push(terms, CmpOp::Le, 1);
        }
    }
}

fn emit_day_cap(config: &ScheduleConfig, space: &DecisionSpace, out: &mut RuleEmission) {
    let dims = space.dims();
    for (worker, profile) in config.workers.iter().enumerate() {
        let Some(quota) = config.quota_for(profile) else {
            continue;
        };
        let mut day_vars = Vec::with_capacity(dims.days);
        for day in 0..dims.days {
            let on_duty = out.new_aux(0, 1);
            let over = (0..dims.shifts)
                .flat_map(|s| {
                    (0..dims.locations)
                        .map(move |l| (s, l))
                })
                .map(|(s, l)| VarRef::Assignment(space.index(worker, day, s, l)))
                .collect();
            out.constraints.push(ConstraintExpr::MaxEquality {
                over,
                result: on_duty,
            });
            day_vars.push(Term {
                coeff: 1,
                var: on_duty,
            });
        }
        out.push(day_vars, CmpOp::Le, i64::from(quota.max_days));
    }
}

/// Out-of-preference assignments and meeting-blackout assignments both count
/// against a hard zero. A slot can count twice (unavailable and in a
/// blackout); with a zero bound the double weight changes nothing.
fn emit_out_of_preference(config: &ScheduleConfig, space: &DecisionSpace, out: &mut RuleEmission) {
    let dims = space.dims();
    for (worker, profile) in config.workers.iter().enumerate() {
        let mut terms = Vec::new();
        for day in 0..dims.days {
            for shift in 0..dims.shifts {
                let blackout = config.in_blackout(profile, day, shift);
                for location in 0..dims.locations {
                    let mut coeff = 0;
                    if !config.availability.is_available(worker, day, shift, location) {
                        coeff += 1;
                    }
                    if blackout {
                        coeff += 1;
                    }
                    if coeff > 0 {
                        terms.push(Term::assignment(
                            coeff,
                            space.index(worker, day, shift, location),
                        ));
                    }
                }
            }
        }
        if !terms.is_empty() {
            out.push(terms, CmpOp::Le, 0);
        }
    }
}

#[derive(Clone, Copy)]
enum Band {
    ActiveFloor,
    ActiveCeiling,
    ReserveFloor,
    ReserveCeiling,
    HolidayFloor,
}

/// Quota band rules share one lowering: a unit-weighted sum over the
/// worker's assignments at primary or reserve locations, compared against
/// a bound derived from the quota table.
fn emit_unit_band(
    config: &ScheduleConfig,
    space: &DecisionSpace,
    band: Band,
    out: &mut RuleEmission,
) {
    let dims = space.dims();
    let role = match band {
        Band::ReserveFloor | Band::ReserveCeiling => LocationRole::Reserve,
        _ => LocationRole::Primary,
    };
    for (worker, profile) in config.workers.iter().enumerate() {
        let Some(quota) = config.quota_for(profile) else {
            continue;
        };
        let mut terms = Vec::new();
        for day in 0..dims.days {
            for shift in 0..dims.shifts {
                let weight = config.unit_weight(shift);
                for (location, site) in config.locations.iter().enumerate() {
                    if site.role == role {
                        terms.push(Term::assignment(
                            weight,
                            space.index(worker, day, shift, location),
                        ));
                    }
                }
            }
        }
        if terms.is_empty() {
            continue;
        }
        let active = i64::from(quota.max_active);
        let reserve = i64::from(quota.max_reserve);
        let (op, rhs) = match band {
            // At least half the active quota, rounded up.
            Band::ActiveFloor => (CmpOp::Ge, active - active / 2),
            Band::ActiveCeiling => (CmpOp::Le, active),
            Band::ReserveFloor => (CmpOp::Ge, (reserve - 1).max(0)),
            Band::ReserveCeiling => (CmpOp::Le, reserve),
            Band::HolidayFloor => (
                CmpOp::Ge,
                i64::from(quota.max_days / config.quota_scale.max(1)),
            ),
        };
        out.push(terms, op, rhs);
    }
}

// ============================================================================
// Model assembly
// ============================================================================

/// All constraints of one solve, grouped by owning rule, with a single
/// model-wide aux table.
#[derive(Clone, Debug)]
pub struct Model {
    pub aux: Vec<AuxDomain>,
    pub groups: Vec<ConstraintGroup>,
}

#[derive(Clone, Debug)]
pub struct ConstraintGroup {
    pub rule: Rule,
    pub constraints: Vec<ConstraintExpr>,
}

impl Model {
    /// Merge per-rule emissions, rebasing each emission's aux indices into
    /// the shared table. Returns the collected per-rule notes alongside.
    pub fn assemble(emissions: Vec<RuleEmission>) -> (Self, Vec<Diagnostic>) {
        let mut aux = Vec::new();
        let mut groups = Vec::new();
        let mut notes = Vec::new();
        for mut emission in emissions {
            let offset = aux.len();
            for constraint in &mut emission.constraints {
                constraint.rebase_aux(offset);
            }
            aux.extend(emission.aux);
            notes.append(&mut emission.notes);
            groups.push(ConstraintGroup {
                rule: emission.rule,
                constraints: emission.constraints,
            });
        }
        (Self { aux, groups }, notes)
    }

    pub fn constraint_count(&self) -> usize {
        self.groups.iter().map(|g| g.constraints.len()).sum()
    }
}
