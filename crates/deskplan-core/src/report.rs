//! Diagnostics and the report structure.
//!
//! Both the success and the failure path accumulate everything into a
//! [`RosterReport`] instead of printing ad hoc, so one coherent artifact can
//! be rendered, logged or archived afterwards.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Dimensions, Quota, ScheduleConfig};

// ============================================================================
// Diagnostics
// ============================================================================

/// Severity of a diagnostic line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Stable diagnostic codes: P = preflight/partial data, R = rule
/// configuration, S = solve outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// An open slot has no available worker at all.
    P001UnstaffableSlot,
    /// Quota ceilings/floors cannot bracket the number of open slots.
    P002QuotaImbalance,
    /// A worker declared no availability anywhere in the period.
    P003MissingAvailability,
    /// Absence data missing or out of range for a worker.
    P004MissingAbsenceRecord,
    /// A sector has a meeting but no workers, or vice versa.
    P005SectorMismatch,
    /// A rule is disabled and will emit no constraints.
    R001RuleDisabled,
    /// A worker is exempt from the weekly floor (zero active quota).
    R002QuotaFloorExemption,
    /// The optimizing solve proved optimality.
    S001OptimalSolution,
    /// A solution was found but optimality was not proven in time.
    S002FeasibleSolution,
    /// Rules implicated by the infeasibility core.
    S003InfeasibleCore,
    /// Result of the diagnostic solution count.
    S004SolutionCount,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::P001UnstaffableSlot => "P001",
            DiagnosticCode::P002QuotaImbalance => "P002",
            DiagnosticCode::P003MissingAvailability => "P003",
            DiagnosticCode::P004MissingAbsenceRecord => "P004",
            DiagnosticCode::P005SectorMismatch => "P005",
            DiagnosticCode::R001RuleDisabled => "R001",
            DiagnosticCode::R002QuotaFloorExemption => "R002",
            DiagnosticCode::S001OptimalSolution => "S001",
            DiagnosticCode::S002FeasibleSolution => "S002",
            DiagnosticCode::S003InfeasibleCore => "S003",
            DiagnosticCode::S004SolutionCount => "S004",
        }
    }
}

/// One structured diagnostic line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.code.as_str(), self.message)
    }
}

// ============================================================================
// Solved assignments
// ============================================================================

/// Immutable valuation of the decision space after a successful solve:
/// one boolean per (worker, day, shift, location) tuple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentGrid {
    dims: Dimensions,
    data: Vec<bool>,
}

impl AssignmentGrid {
    pub fn new(dims: Dimensions, data: Vec<bool>) -> Self {
        assert_eq!(data.len(), dims.cardinality());
        Self { dims, data }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    fn index(&self, worker: usize, day: usize, shift: usize, location: usize) -> usize {
        ((worker * self.dims.days + day) * self.dims.shifts + shift) * self.dims.locations
            + location
    }

    pub fn assigned(&self, worker: usize, day: usize, shift: usize, location: usize) -> bool {
        self.data[self.index(worker, day, shift, location)]
    }

    /// The worker staffing a slot, if any. Coverage guarantees uniqueness
    /// when enabled; without it the lowest index wins.
    pub fn worker_at(&self, day: usize, shift: usize, location: usize) -> Option<usize> {
        (0..self.dims.workers).find(|&w| self.assigned(w, day, shift, location))
    }

    /// Total number of assignments for one worker.
    pub fn assignments_for(&self, worker: usize) -> usize {
        let mut count = 0;
        for day in 0..self.dims.days {
            for shift in 0..self.dims.shifts {
                for location in 0..self.dims.locations {
                    if self.assigned(worker, day, shift, location) {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}

// ============================================================================
// Analyzer summaries
// ============================================================================

/// Per-worker workload summary against the quota bands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub worker: usize,
    pub name: String,
    /// Units (shifts or hours, per `QuotaUnit`) worked at primary locations.
    pub active_units: i64,
    /// Units in reserve.
    pub reserve_units: i64,
    pub days_on_duty: usize,
    pub quota: Quota,
}

/// Per-sector, per-day coverage summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorDaySummary {
    pub sector: String,
    pub day: usize,
    /// Minutes of coverage contributed by the sector that day.
    pub worked_minutes: i64,
    pub distinct_workers: usize,
    pub morning_workers: usize,
    pub afternoon_workers: usize,
}

/// Flags attached to a single assignment for the detail report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentNote {
    pub worker: usize,
    pub day: usize,
    pub shift: usize,
    pub location: usize,
    /// Assigned against the worker's stated availability.
    pub out_of_preference: bool,
    /// Assigned during a mandatory meeting.
    pub meeting_conflict: bool,
}

// ============================================================================
// Solve statistics
// ============================================================================

/// Outcome class of the optimizing solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Feasible but optimality not proven within the time budget.
    Feasible,
}

/// Numbers describing one solve run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveStats {
    pub status: SolveStatus,
    /// Achieved objective value (fulfilled preference count).
    pub objective: i64,
    /// Maximum achievable objective (open slot count).
    pub max_objective: i64,
    /// Number of constraints emitted across all enabled rules.
    pub conditions: usize,
    pub wall_time_ms: u64,
    /// Populated by the diagnostic enumeration mode, capped at its limit.
    pub solution_count: Option<u64>,
}

// ============================================================================
// Report
// ============================================================================

/// The single artifact produced by a run: diagnostics from every phase,
/// the solved assignment table, and the analyzer summaries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RosterReport {
    pub title: String,
    pub generated_at: NaiveDateTime,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: SolveStats,
    pub assignments: AssignmentGrid,
    pub worker_summaries: Vec<WorkerSummary>,
    pub sector_summaries: Vec<SectorDaySummary>,
    pub notes: Vec<AssignmentNote>,
}

impl RosterReport {
    /// Objective value over the maximum achievable score, in [0, 1].
    pub fn quality_ratio(&self) -> f64 {
        if self.stats.max_objective == 0 {
            return 0.0;
        }
        self.stats.objective as f64 / self.stats.max_objective as f64
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Rendering error.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

/// Output rendering. The core is agnostic to the concrete format; the
/// render crate provides text and HTML implementations.
pub trait Renderer {
    type Output;

    fn render(
        &self,
        config: &ScheduleConfig,
        report: &RosterReport,
    ) -> Result<Self::Output, RenderError>;
}
