//! Normalized schedule configuration.
//!
//! All types here are plain data produced by an external ingestion
//! collaborator (or the builder, for tests) and consumed read-only by the
//! solver. Index consistency between the arrays is the single most fragile
//! invariant of the whole model; [`crate::validate`] checks it eagerly so
//! index drift never reaches the solver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::report::{Diagnostic, DiagnosticCode};

/// Minutes from midnight marking the morning/afternoon boundary.
pub const MIDDAY_MINUTES: u16 = 12 * 60;

/// Upper bound of the midday exclusion zone (see `Rule::MiddayPairExclusion`).
pub const EARLY_AFTERNOON_MINUTES: u16 = 14 * 60;

/// Base scheduling period, in days, that quotas are expressed against.
pub const BASE_PERIOD_DAYS: usize = 5;

// ============================================================================
// Shifts
// ============================================================================

/// A fixed time slot shared by all locations for a given index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Start, in minutes from midnight.
    pub start: u16,
    /// Duration in minutes.
    pub duration: u16,
}

impl Shift {
    pub fn new(start: u16, duration: u16) -> Self {
        Self { start, duration }
    }

    /// Start a builder-friendly shift at the given clock time.
    pub fn starting_at(hour: u16, minute: u16) -> Self {
        Self {
            start: hour * 60 + minute,
            duration: 60,
        }
    }

    pub fn lasting_minutes(mut self, duration: u16) -> Self {
        self.duration = duration;
        self
    }

    /// End of the shift, in minutes from midnight.
    pub fn end(&self) -> u16 {
        self.start + self.duration
    }

    /// Display label such as `08:00-09:00`.
    pub fn label(&self) -> String {
        format!(
            "{:02}:{:02}-{:02}:{:02}",
            self.start / 60,
            self.start % 60,
            self.end() / 60,
            self.end() % 60
        )
    }
}

// ============================================================================
// Locations
// ============================================================================

/// Whether a location is a staffed service point or a reserve/backup post.
///
/// The distinction used to be inferred from a name substring; it is an
/// explicit attribute here because quota rules depend on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationRole {
    #[default]
    Primary,
    Reserve,
}

/// Inclusive range of shift indices during which a location is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingWindow {
    pub first_shift: usize,
    pub last_shift: usize,
}

impl OperatingWindow {
    pub fn new(first_shift: usize, last_shift: usize) -> Self {
        Self {
            first_shift,
            last_shift,
        }
    }

    pub fn contains(&self, shift: usize) -> bool {
        shift >= self.first_shift && shift <= self.last_shift
    }
}

/// Per-day operating hours of a location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationHours {
    /// Same inclusive shift range every day.
    Uniform(OperatingWindow),
    /// Explicit per-day windows; `None` means closed that day.
    /// Must have exactly one entry per configured day.
    PerDay(Vec<Option<OperatingWindow>>),
}

/// A physical duty post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub role: LocationRole,
    pub hours: LocationHours,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: LocationRole::Primary,
            hours: LocationHours::PerDay(Vec::new()),
        }
    }

    pub fn reserve(mut self) -> Self {
        self.role = LocationRole::Reserve;
        self
    }

    /// Open with the same shift range every day.
    pub fn open_all_days(mut self, first_shift: usize, last_shift: usize) -> Self {
        self.hours = LocationHours::Uniform(OperatingWindow::new(first_shift, last_shift));
        self
    }

    /// Open on a specific day; days not mentioned stay closed. Switching
    /// from uniform hours to per-day hours discards the uniform window:
    /// the caller is taking explicit control of every day.
    pub fn open_on(mut self, day: usize, first_shift: usize, last_shift: usize) -> Self {
        if matches!(self.hours, LocationHours::Uniform(_)) {
            self.hours = LocationHours::PerDay(Vec::new());
        }
        if let LocationHours::PerDay(per_day) = &mut self.hours {
            if per_day.len() <= day {
                per_day.resize(day + 1, None);
            }
            per_day[day] = Some(OperatingWindow::new(first_shift, last_shift));
        }
        self
    }

    /// Operating window for a given day, `None` if closed.
    pub fn window(&self, day: usize) -> Option<OperatingWindow> {
        match &self.hours {
            LocationHours::Uniform(w) => Some(*w),
            LocationHours::PerDay(v) => v.get(day).copied().flatten(),
        }
    }

    pub fn is_reserve(&self) -> bool {
        self.role == LocationRole::Reserve
    }
}

// ============================================================================
// Workers
// ============================================================================

/// A person who can be assigned to shifts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub name: String,
    /// Group used for sector metrics and sector meeting blackouts.
    pub sector: String,
    /// Key into the quota table.
    pub category: String,
    /// Preferred contiguous run length; values > 1 activate the run-length
    /// preference rule for this worker.
    pub preferred_run_length: u32,
    /// Attends the directorate meeting in addition to the sector one.
    pub directorate: bool,
}

impl Worker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sector: String::new(),
            category: String::new(),
            preferred_run_length: 1,
            directorate: false,
        }
    }

    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = sector.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn run_length(mut self, preferred: u32) -> Self {
        self.preferred_run_length = preferred;
        self
    }

    pub fn directorate(mut self) -> Self {
        self.directorate = true;
        self
    }
}

// ============================================================================
// Quotas
// ============================================================================

/// Unit in which the active/reserve quota bands are expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaUnit {
    /// One unit per assigned shift, regardless of its length.
    #[default]
    Shifts,
    /// One unit per whole hour of assigned shift time.
    Hours,
}

/// Per-category workload bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    /// Ceiling on units worked at primary locations.
    pub max_active: u32,
    /// Ceiling on units in reserve.
    pub max_reserve: u32,
    /// Ceiling on distinct days with at least one assignment.
    pub max_days: u32,
}

impl Quota {
    pub fn new(max_active: u32, max_reserve: u32, max_days: u32) -> Self {
        Self {
            max_active,
            max_reserve,
            max_days,
        }
    }

    pub fn scaled(&self, factor: u32) -> Self {
        Self {
            max_active: self.max_active * factor,
            max_reserve: self.max_reserve * factor,
            max_days: self.max_days * factor,
        }
    }
}

// ============================================================================
// Meeting blackouts
// ============================================================================

/// Who a recurring meeting applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingAudience {
    /// Everyone in the named sector.
    Sector(String),
    /// Workers flagged as directorate members, across sectors.
    Directorate,
}

/// A recurring blackout window during which affected workers cannot be
/// scheduled (enforced by the out-of-preference rule).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingBlackout {
    pub audience: MeetingAudience,
    pub day: usize,
    /// First blocked shift index (inclusive).
    pub first_shift: usize,
    /// Last blocked shift index (inclusive).
    pub last_shift: usize,
}

impl MeetingBlackout {
    pub fn sector(sector: impl Into<String>, day: usize, first: usize, last: usize) -> Self {
        Self {
            audience: MeetingAudience::Sector(sector.into()),
            day,
            first_shift: first,
            last_shift: last,
        }
    }

    pub fn directorate(day: usize, first: usize, last: usize) -> Self {
        Self {
            audience: MeetingAudience::Directorate,
            day,
            first_shift: first,
            last_shift: last,
        }
    }

    pub fn applies_to(&self, worker: &Worker) -> bool {
        match &self.audience {
            MeetingAudience::Sector(sector) => worker.sector == *sector,
            MeetingAudience::Directorate => worker.directorate,
        }
    }

    pub fn blocks(&self, day: usize, shift: usize) -> bool {
        day == self.day && shift >= self.first_shift && shift <= self.last_shift
    }
}

// ============================================================================
// Availability
// ============================================================================

/// Dimensions of the decision space and of every per-slot array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub workers: usize,
    pub days: usize,
    pub shifts: usize,
    pub locations: usize,
}

impl Dimensions {
    /// Total number of (worker, day, shift, location) tuples.
    pub fn cardinality(&self) -> usize {
        self.workers * self.days * self.shifts * self.locations
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}w x {}d x {}s x {}l",
            self.workers, self.days, self.shifts, self.locations
        )
    }
}

/// Dense binary preference array over (worker, day, shift, location).
///
/// Weight 1 means the worker declared themselves available for that slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    dims: Dimensions,
    data: Vec<u8>,
}

impl Availability {
    /// All-zero availability for the given dimensions.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            data: vec![0; dims.cardinality()],
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    fn index(&self, worker: usize, day: usize, shift: usize, location: usize) -> usize {
        debug_assert!(worker < self.dims.workers);
        debug_assert!(day < self.dims.days);
        debug_assert!(shift < self.dims.shifts);
        debug_assert!(location < self.dims.locations);
        ((worker * self.dims.days + day) * self.dims.shifts + shift) * self.dims.locations
            + location
    }

    pub fn set(&mut self, worker: usize, day: usize, shift: usize, location: usize, value: bool) {
        let idx = self.index(worker, day, shift, location);
        self.data[idx] = u8::from(value);
    }

    pub fn is_available(&self, worker: usize, day: usize, shift: usize, location: usize) -> bool {
        self.data[self.index(worker, day, shift, location)] != 0
    }

    /// Preference weight as an objective coefficient.
    pub fn weight(&self, worker: usize, day: usize, shift: usize, location: usize) -> i64 {
        i64::from(self.data[self.index(worker, day, shift, location)])
    }

    /// True if the worker has no preferred slot anywhere in the period.
    pub fn is_blank_for(&self, worker: usize) -> bool {
        let per_worker = self.dims.days * self.dims.shifts * self.dims.locations;
        let start = worker * per_worker;
        self.data[start..start + per_worker].iter().all(|&v| v == 0)
    }

    /// Zero out a whole day for one worker (used for absences).
    pub fn clear_day(&mut self, worker: usize, day: usize) {
        for shift in 0..self.dims.shifts {
            for location in 0..self.dims.locations {
                self.set(worker, day, shift, location, false);
            }
        }
    }
}

// ============================================================================
// Rule toggles
// ============================================================================

/// Enabled-state of every named rule, 1:1 with `Rule` variants in the
/// solver crate. Serde defaults keep absent keys disabled: a rule not
/// mentioned in the configuration is off.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleToggles {
    pub coverage: bool,
    pub single_seat: bool,
    pub max_two_shifts_per_day: bool,
    pub max_one_shift_per_day: bool,
    pub weekly_floor: bool,
    pub preferred_run_length: bool,
    pub late_shift_cap: bool,
    pub no_closing_pair: bool,
    pub no_midday_pair: bool,
    pub max_days_on_duty: bool,
    pub no_out_of_preference: bool,
    pub min_active: bool,
    pub max_active: bool,
    pub min_reserve: bool,
    pub max_reserve: bool,
    pub holiday_quota: bool,
    /// Config-time behavior: scale quotas by `days / 5` before solving.
    pub scale_quotas: bool,
    /// Diagnostic mode: count solutions on a separate, non-optimizing build.
    pub search_for_all_solutions: bool,
}

impl RuleToggles {
    /// The rule set used for a regular business week.
    pub fn standard() -> Self {
        Self {
            coverage: true,
            single_seat: true,
            max_two_shifts_per_day: true,
            weekly_floor: true,
            late_shift_cap: true,
            no_closing_pair: true,
            max_days_on_duty: true,
            no_out_of_preference: true,
            min_active: true,
            max_active: true,
            min_reserve: true,
            max_reserve: true,
            ..Self::default()
        }
    }
}

// ============================================================================
// Absences
// ============================================================================

/// Days a worker is away, keyed by worker name as entered by a human.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerAbsence {
    pub worker: String,
    pub days: Vec<usize>,
}

// ============================================================================
// Schedule configuration
// ============================================================================

/// The complete, normalized input to one solve.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Weekday display labels; index is the day ordinal.
    pub days: Vec<String>,
    /// Shifts ordered by start time.
    pub shifts: Vec<Shift>,
    pub locations: Vec<Location>,
    pub workers: Vec<Worker>,
    /// Quota table keyed by worker category.
    pub quotas: BTreeMap<String, Quota>,
    pub meetings: Vec<MeetingBlackout>,
    pub availability: Availability,
    pub rules: RuleToggles,
    pub quota_unit: QuotaUnit,
    /// Scaling factor already applied to the quota table (1 = unscaled).
    pub quota_scale: u32,
}

impl ScheduleConfig {
    pub fn builder() -> ScheduleConfigBuilder {
        ScheduleConfigBuilder::default()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            workers: self.workers.len(),
            days: self.days.len(),
            shifts: self.shifts.len(),
            locations: self.locations.len(),
        }
    }

    pub fn quota_for(&self, worker: &Worker) -> Option<&Quota> {
        self.quotas.get(&worker.category)
    }

    /// Coefficient of one assignment at shift `s` in quota units.
    pub fn unit_weight(&self, shift: usize) -> i64 {
        match self.quota_unit {
            QuotaUnit::Shifts => 1,
            QuotaUnit::Hours => i64::from(self.shifts[shift].duration / 60),
        }
    }

    /// True if the slot must be staffed: inside the location's operating
    /// window and not the deliberately excluded final cell of the grid
    /// (last shift of the last day).
    pub fn open_slot(&self, day: usize, shift: usize, location: usize) -> bool {
        let inside = self.locations[location]
            .window(day)
            .is_some_and(|w| w.contains(shift));
        let grid_edge = day + 1 == self.days.len() && shift + 1 == self.shifts.len();
        inside && !grid_edge
    }

    /// Whether the slot falls in a mandatory meeting for this worker.
    pub fn in_blackout(&self, worker: &Worker, day: usize, shift: usize) -> bool {
        self.meetings
            .iter()
            .any(|m| m.applies_to(worker) && m.blocks(day, shift))
    }

    /// Index of the first shift starting after midday, if any.
    pub fn first_afternoon_shift(&self) -> Option<usize> {
        self.shifts.iter().position(|s| s.start > MIDDAY_MINUTES)
    }

    /// The two shift indices straddling the midday exclusion zone: the
    /// latest shift starting at or before 12:00 and the earliest starting
    /// at or after 14:00.
    pub fn midday_pair(&self) -> Option<(usize, usize)> {
        let before = self
            .shifts
            .iter()
            .rposition(|s| s.start <= MIDDAY_MINUTES)?;
        let after = self
            .shifts
            .iter()
            .position(|s| s.start >= EARLY_AFTERNOON_MINUTES)?;
        Some((before, after))
    }

    /// Maximum achievable objective value: one point per open slot.
    pub fn max_objective(&self) -> i64 {
        let dims = self.dimensions();
        let mut score = 0;
        for day in 0..dims.days {
            for shift in 0..dims.shifts {
                for location in 0..dims.locations {
                    if self.open_slot(day, shift, location) {
                        score += 1;
                    }
                }
            }
        }
        score
    }

    /// Scale the quota table by `days / 5` if the toggle asks for it.
    /// Returns the factor that was applied.
    pub fn apply_quota_scaling(&mut self) -> u32 {
        if !self.rules.scale_quotas {
            return 1;
        }
        let factor = ((self.days.len() / BASE_PERIOD_DAYS) as u32).max(1);
        if factor > 1 {
            for quota in self.quotas.values_mut() {
                *quota = quota.scaled(factor);
            }
        }
        self.quota_scale = factor;
        factor
    }

    /// Fold absence data into the availability array. Every absent day is
    /// zeroed for the matching worker; workers without an absence record
    /// get a warning diagnostic so name mismatches surface in the report.
    pub fn apply_absences(&mut self, absences: &[WorkerAbsence]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (idx, worker) in self.workers.iter().enumerate() {
            match absences.iter().find(|a| a.worker == worker.name) {
                Some(record) => {
                    for &day in &record.days {
                        if day < self.days.len() {
                            self.availability.clear_day(idx, day);
                        } else {
                            diagnostics.push(Diagnostic::warning(
                                DiagnosticCode::P004MissingAbsenceRecord,
                                format!(
                                    "absence day {} for {} is outside the period",
                                    day, worker.name
                                ),
                            ));
                        }
                    }
                }
                None => diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::P004MissingAbsenceRecord,
                    format!(
                        "{} has no absence record, check for a possible name mismatch",
                        worker.name
                    ),
                )),
            }
        }
        diagnostics
    }
}

// ============================================================================
// Builder
// ============================================================================

enum AvailabilityMark {
    Everywhere(String),
    Range {
        worker: String,
        day: usize,
        first_shift: usize,
        last_shift: usize,
    },
}

/// Fluent construction of a [`ScheduleConfig`], mainly for tests and
/// fixtures. File-based sources build the struct directly.
#[derive(Default)]
pub struct ScheduleConfigBuilder {
    days: Vec<String>,
    shifts: Vec<Shift>,
    locations: Vec<Location>,
    workers: Vec<Worker>,
    quotas: BTreeMap<String, Quota>,
    meetings: Vec<MeetingBlackout>,
    rules: Option<RuleToggles>,
    quota_unit: QuotaUnit,
    marks: Vec<AvailabilityMark>,
}

impl ScheduleConfigBuilder {
    pub fn days<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.days = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn shift(mut self, shift: Shift) -> Self {
        self.shifts.push(shift);
        self
    }

    /// `count` back-to-back one-hour shifts starting at the given hour.
    pub fn hourly_shifts(mut self, start_hour: u16, count: usize) -> Self {
        for i in 0..count {
            self.shifts
                .push(Shift::starting_at(start_hour + i as u16, 0));
        }
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn worker(mut self, worker: Worker) -> Self {
        self.workers.push(worker);
        self
    }

    pub fn quota(
        mut self,
        category: impl Into<String>,
        max_active: u32,
        max_reserve: u32,
        max_days: u32,
    ) -> Self {
        self.quotas
            .insert(category.into(), Quota::new(max_active, max_reserve, max_days));
        self
    }

    pub fn meeting(mut self, meeting: MeetingBlackout) -> Self {
        self.meetings.push(meeting);
        self
    }

    pub fn rules(mut self, rules: RuleToggles) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn quota_unit(mut self, unit: QuotaUnit) -> Self {
        self.quota_unit = unit;
        self
    }

    /// Mark the named worker available for every slot of the period.
    pub fn available_everywhere(mut self, worker: impl Into<String>) -> Self {
        self.marks.push(AvailabilityMark::Everywhere(worker.into()));
        self
    }

    /// Mark the named worker available for a shift range on one day, at
    /// every location.
    pub fn available(
        mut self,
        worker: impl Into<String>,
        day: usize,
        first_shift: usize,
        last_shift: usize,
    ) -> Self {
        self.marks.push(AvailabilityMark::Range {
            worker: worker.into(),
            day,
            first_shift,
            last_shift,
        });
        self
    }

    pub fn build(self) -> ScheduleConfig {
        let dims = Dimensions {
            workers: self.workers.len(),
            days: self.days.len(),
            shifts: self.shifts.len(),
            locations: self.locations.len(),
        };
        let mut availability = Availability::new(dims);
        let worker_index = |name: &str| self.workers.iter().position(|w| w.name == name);
        for mark in &self.marks {
            match mark {
                AvailabilityMark::Everywhere(name) => {
                    if let Some(w) = worker_index(name) {
                        for d in 0..dims.days {
                            for s in 0..dims.shifts {
                                for l in 0..dims.locations {
                                    availability.set(w, d, s, l, true);
                                }
                            }
                        }
                    }
                }
                AvailabilityMark::Range {
                    worker,
                    day,
                    first_shift,
                    last_shift,
                } => {
                    if let Some(w) = worker_index(worker) {
                        for s in *first_shift..=(*last_shift).min(dims.shifts.saturating_sub(1)) {
                            for l in 0..dims.locations {
                                availability.set(w, *day, s, l, true);
                            }
                        }
                    }
                }
            }
        }
        ScheduleConfig {
            days: self.days,
            shifts: self.shifts,
            locations: self.locations,
            workers: self.workers,
            quotas: self.quotas,
            meetings: self.meetings,
            availability,
            rules: self.rules.unwrap_or_default(),
            quota_unit: self.quota_unit,
            quota_scale: 1,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_day_config() -> ScheduleConfig {
        ScheduleConfig::builder()
            .days(["Monday", "Tuesday"])
            .hourly_shifts(8, 3)
            .location(Location::new("Front desk").open_all_days(0, 2))
            .location(Location::new("Backup").reserve().open_on(0, 1, 2))
            .worker(Worker::new("Ada").sector("search").category("80"))
            .worker(Worker::new("Grace").sector("cado").category("60").run_length(2))
            .quota("80", 5, 3, 4)
            .quota("60", 4, 3, 3)
            .available_everywhere("Ada")
            .available("Grace", 0, 0, 1)
            .build()
    }

    #[test]
    fn availability_indexing_roundtrip() {
        let dims = Dimensions {
            workers: 3,
            days: 2,
            shifts: 4,
            locations: 2,
        };
        let mut availability = Availability::new(dims);
        availability.set(2, 1, 3, 1, true);
        availability.set(0, 0, 0, 0, true);
        assert!(availability.is_available(2, 1, 3, 1));
        assert!(availability.is_available(0, 0, 0, 0));
        assert!(!availability.is_available(1, 0, 2, 1));
        assert_eq!(availability.weight(2, 1, 3, 1), 1);
        assert_eq!(availability.weight(1, 1, 3, 1), 0);
    }

    #[test]
    fn builder_marks_availability() {
        let config = two_day_config();
        assert!(config.availability.is_available(0, 1, 2, 1));
        assert!(config.availability.is_available(1, 0, 1, 0));
        assert!(!config.availability.is_available(1, 1, 0, 0));
        assert!(!config.availability.is_blank_for(1));
    }

    #[test]
    fn open_slot_respects_window_and_grid_edge() {
        let config = two_day_config();
        // Front desk open all shifts, but the last shift of the last day
        // is excluded.
        assert!(config.open_slot(0, 2, 0));
        assert!(!config.open_slot(1, 2, 0));
        // Backup only open on Monday, shifts 1..=2.
        assert!(!config.open_slot(0, 0, 1));
        assert!(config.open_slot(0, 1, 1));
        assert!(!config.open_slot(1, 1, 1));
    }

    #[test]
    fn max_objective_counts_open_slots() {
        let config = two_day_config();
        // Front desk: 3 (day 0) + 2 (day 1, grid edge excluded) = 5.
        // Backup: 2 (day 0 only).
        assert_eq!(config.max_objective(), 7);
    }

    #[test]
    fn blackout_matches_sector_and_directorate() {
        let config = ScheduleConfig::builder()
            .days(["Monday"])
            .hourly_shifts(8, 4)
            .location(Location::new("Desk").open_all_days(0, 3))
            .worker(Worker::new("Ada").sector("search").category("80"))
            .worker(Worker::new("Dir").sector("cado").category("dir").directorate())
            .quota("80", 5, 3, 4)
            .quota("dir", 2, 0, 2)
            .meeting(MeetingBlackout::sector("search", 0, 1, 2))
            .meeting(MeetingBlackout::directorate(0, 3, 3))
            .build();
        let ada = &config.workers[0];
        let dir = &config.workers[1];
        assert!(config.in_blackout(ada, 0, 1));
        assert!(config.in_blackout(ada, 0, 2));
        assert!(!config.in_blackout(ada, 0, 3));
        assert!(config.in_blackout(dir, 0, 3));
        assert!(!config.in_blackout(dir, 0, 1));
    }

    #[test]
    fn midday_pair_straddles_lunch() {
        // Shifts at 8..=17 hourly: latest start <= 12:00 is 12:00 (index 4),
        // earliest start >= 14:00 is 14:00 (index 6).
        let config = ScheduleConfig::builder()
            .days(["Monday"])
            .hourly_shifts(8, 10)
            .location(Location::new("Desk").open_all_days(0, 9))
            .worker(Worker::new("Ada").sector("search").category("80"))
            .quota("80", 5, 3, 4)
            .build();
        assert_eq!(config.midday_pair(), Some((4, 6)));
        assert_eq!(config.first_afternoon_shift(), Some(5));
    }

    #[test]
    fn quota_scaling_applies_integer_factor() {
        let mut config = ScheduleConfig::builder()
            .days((0..10).map(|d| format!("Day {d}")))
            .hourly_shifts(8, 2)
            .location(Location::new("Desk").open_all_days(0, 1))
            .worker(Worker::new("Ada").sector("search").category("80"))
            .quota("80", 5, 3, 4)
            .build();
        config.rules.scale_quotas = true;
        let factor = config.apply_quota_scaling();
        assert_eq!(factor, 2);
        assert_eq!(config.quota_scale, 2);
        assert_eq!(config.quotas["80"], Quota::new(10, 6, 8));
    }

    #[test]
    fn quota_scaling_never_zeroes_short_periods() {
        let mut config = ScheduleConfig::builder()
            .days(["Monday", "Tuesday"])
            .hourly_shifts(8, 2)
            .location(Location::new("Desk").open_all_days(0, 1))
            .worker(Worker::new("Ada").sector("search").category("80"))
            .quota("80", 5, 3, 4)
            .build();
        config.rules.scale_quotas = true;
        assert_eq!(config.apply_quota_scaling(), 1);
        assert_eq!(config.quotas["80"], Quota::new(5, 3, 4));
    }

    #[test]
    fn absences_clear_days_and_flag_missing_records() {
        let mut config = two_day_config();
        let absences = vec![WorkerAbsence {
            worker: "Ada".into(),
            days: vec![1],
        }];
        let diagnostics = config.apply_absences(&absences);
        // Ada's Tuesday is gone, Monday untouched.
        assert!(!config.availability.is_available(0, 1, 0, 0));
        assert!(config.availability.is_available(0, 0, 0, 0));
        // Grace has no record.
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Grace"));
    }

    #[test]
    fn unit_weight_follows_quota_unit() {
        let mut config = two_day_config();
        assert_eq!(config.unit_weight(0), 1);
        config.quota_unit = QuotaUnit::Hours;
        assert_eq!(config.unit_weight(0), 1);
        config.shifts[0].duration = 120;
        assert_eq!(config.unit_weight(0), 2);
    }
}
