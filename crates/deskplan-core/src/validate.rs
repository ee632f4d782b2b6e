//! Eager configuration validation and preflight data checks.
//!
//! Validation enforces the hard index invariants (fatal, before any model
//! building); preflight looks for human-data problems that make a poor but
//! not impossible schedule likely, and reports them as warnings.

use thiserror::Error;

use crate::config::{Dimensions, MeetingAudience, ScheduleConfig};
use crate::report::{Diagnostic, DiagnosticCode};

/// Malformed or index-inconsistent input data. Never silently coerced.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("configuration has no {0}")]
    EmptyDimension(&'static str),

    #[error("shift {index} starts at {start} min, not after the previous shift")]
    UnsortedShifts { index: usize, start: u16 },

    #[error("shift {index} has zero duration")]
    ZeroDurationShift { index: usize },

    #[error("location '{location}' lists hours for {found} day(s), expected {expected}")]
    WindowCountMismatch {
        location: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "location '{location}' day {day}: window [{first}, {last}] is outside \
         the {shifts} configured shifts"
    )]
    WindowOutOfRange {
        location: String,
        day: usize,
        first: usize,
        last: usize,
        shifts: usize,
    },

    #[error("worker '{worker}' has category '{category}' with no quota entry")]
    UnknownCategory { worker: String, category: String },

    #[error("worker '{worker}' has a preferred run length of zero")]
    ZeroRunLength { worker: String },

    #[error("meeting for {audience} is out of range (day {day}, shifts {first}..={last})")]
    MeetingOutOfRange {
        audience: String,
        day: usize,
        first: usize,
        last: usize,
    },

    #[error("availability array is {found}, configuration is {expected}")]
    AvailabilityMismatch {
        expected: Dimensions,
        found: Dimensions,
    },
}

/// Check every index invariant of the configuration. Must pass before a
/// decision space is built; violations here are the classic silent-drift
/// bugs the solver would otherwise absorb into a wrong schedule.
pub fn validate(config: &ScheduleConfig) -> Result<(), ConfigurationError> {
    if config.days.is_empty() {
        return Err(ConfigurationError::EmptyDimension("days"));
    }
    if config.shifts.is_empty() {
        return Err(ConfigurationError::EmptyDimension("shifts"));
    }
    if config.locations.is_empty() {
        return Err(ConfigurationError::EmptyDimension("locations"));
    }
    if config.workers.is_empty() {
        return Err(ConfigurationError::EmptyDimension("workers"));
    }

    for (index, pair) in config.shifts.windows(2).enumerate() {
        if pair[1].start <= pair[0].start {
            return Err(ConfigurationError::UnsortedShifts {
                index: index + 1,
                start: pair[1].start,
            });
        }
    }
    for (index, shift) in config.shifts.iter().enumerate() {
        if shift.duration == 0 {
            return Err(ConfigurationError::ZeroDurationShift { index });
        }
    }

    let num_shifts = config.shifts.len();
    for location in &config.locations {
        if let crate::config::LocationHours::PerDay(per_day) = &location.hours {
            if per_day.len() > config.days.len() {
                return Err(ConfigurationError::WindowCountMismatch {
                    location: location.name.clone(),
                    expected: config.days.len(),
                    found: per_day.len(),
                });
            }
        }
        for day in 0..config.days.len() {
            if let Some(window) = location.window(day) {
                if window.first_shift > window.last_shift || window.last_shift >= num_shifts {
                    return Err(ConfigurationError::WindowOutOfRange {
                        location: location.name.clone(),
                        day,
                        first: window.first_shift,
                        last: window.last_shift,
                        shifts: num_shifts,
                    });
                }
            }
        }
    }

    for worker in &config.workers {
        if config.quota_for(worker).is_none() {
            return Err(ConfigurationError::UnknownCategory {
                worker: worker.name.clone(),
                category: worker.category.clone(),
            });
        }
        if worker.preferred_run_length == 0 {
            return Err(ConfigurationError::ZeroRunLength {
                worker: worker.name.clone(),
            });
        }
    }

    for meeting in &config.meetings {
        if meeting.day >= config.days.len()
            || meeting.first_shift > meeting.last_shift
            || meeting.last_shift >= num_shifts
        {
            let audience = match &meeting.audience {
                MeetingAudience::Sector(s) => format!("sector '{s}'"),
                MeetingAudience::Directorate => "the directorate".to_string(),
            };
            return Err(ConfigurationError::MeetingOutOfRange {
                audience,
                day: meeting.day,
                first: meeting.first_shift,
                last: meeting.last_shift,
            });
        }
    }

    let expected = config.dimensions();
    let found = config.availability.dims();
    if expected != found {
        return Err(ConfigurationError::AvailabilityMismatch { expected, found });
    }

    Ok(())
}

/// Non-fatal data checks, run after [`validate`]. The schedule may still
/// solve (possibly with empty or out-of-preference slots); the warnings
/// make sure that shows up in the report rather than surprising the
/// operator.
pub fn preflight(config: &ScheduleConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let dims = config.dimensions();

    // Open slots with no available worker at all.
    for day in 0..dims.days {
        for shift in 0..dims.shifts {
            for location in 0..dims.locations {
                if !config.open_slot(day, shift, location) {
                    continue;
                }
                let eligible = (0..dims.workers)
                    .filter(|&w| config.availability.is_available(w, day, shift, location))
                    .count();
                if eligible == 0 {
                    diagnostics.push(Diagnostic::warning(
                        DiagnosticCode::P001UnstaffableSlot,
                        format!(
                            "no available staff for {} {} at {}",
                            config.days[day],
                            config.shifts[shift].label(),
                            config.locations[location].name
                        ),
                    ));
                }
            }
        }
    }

    // Compare the quota bracket against the number of slots to fill.
    let mut min_units: i64 = 0;
    let mut max_units: i64 = 0;
    for worker in &config.workers {
        if let Some(quota) = config.quota_for(worker) {
            min_units += i64::from(quota.max_reserve);
            max_units += i64::from(quota.max_active) + i64::from(quota.max_reserve);
        }
    }
    let open_slots = config.max_objective();
    if open_slots < min_units || open_slots > max_units {
        diagnostics.push(Diagnostic::warning(
            DiagnosticCode::P002QuotaImbalance,
            format!(
                "{open_slots} open slot(s) against a quota bracket of \
                 [{min_units}, {max_units}]; consider relaxing quota rules"
            ),
        ));
    }

    // Workers who never declared any availability.
    for (idx, worker) in config.workers.iter().enumerate() {
        if config.availability.is_blank_for(idx) {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::P003MissingAvailability,
                format!("{} declared no availability for the whole period", worker.name),
            ));
        }
    }

    // Sectors with a meeting but no workers drift easily when data is
    // hand-entered; flag rather than fail.
    for meeting in &config.meetings {
        if let MeetingAudience::Sector(sector) = &meeting.audience {
            if !config.workers.iter().any(|w| &w.sector == sector) {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::P005SectorMismatch,
                    format!("meeting for sector '{sector}' matches no worker"),
                ));
            }
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Location, MeetingBlackout, ScheduleConfig, Shift, Worker};

    fn valid_config() -> ScheduleConfig {
        ScheduleConfig::builder()
            .days(["Monday", "Tuesday"])
            .hourly_shifts(8, 3)
            .location(Location::new("Desk").open_all_days(0, 2))
            .worker(Worker::new("Ada").sector("search").category("80"))
            .quota("80", 5, 3, 4)
            .available_everywhere("Ada")
            .build()
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_unsorted_shifts() {
        let mut config = valid_config();
        config.shifts[2] = Shift::starting_at(8, 30);
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnsortedShifts { index: 2, .. }));
    }

    #[test]
    fn rejects_unknown_category() {
        let mut config = valid_config();
        config.workers[0].category = "coord80".into();
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownCategory { .. }));
    }

    #[test]
    fn rejects_window_out_of_range() {
        let mut config = valid_config();
        config.locations[0] = Location::new("Desk").open_all_days(0, 9);
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigurationError::WindowOutOfRange { .. }));
    }

    #[test]
    fn rejects_meeting_out_of_range() {
        let mut config = valid_config();
        config.meetings.push(MeetingBlackout::sector("search", 5, 0, 1));
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigurationError::MeetingOutOfRange { .. }));
    }

    #[test]
    fn rejects_availability_dimension_drift() {
        let mut config = valid_config();
        config.workers.push(Worker::new("Grace").sector("cado").category("80"));
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigurationError::AvailabilityMismatch { .. }));
    }

    #[test]
    fn preflight_flags_unstaffable_slots() {
        let config = ScheduleConfig::builder()
            .days(["Monday"])
            .hourly_shifts(8, 2)
            .location(Location::new("Desk").open_all_days(0, 1))
            .worker(Worker::new("Ada").sector("search").category("80"))
            .quota("80", 5, 3, 4)
            .build();
        let diagnostics = preflight(&config);
        assert!(diagnostics
            .iter()
            .any(|d| d.code == DiagnosticCode::P001UnstaffableSlot));
        assert!(diagnostics
            .iter()
            .any(|d| d.code == DiagnosticCode::P003MissingAvailability));
    }

    #[test]
    fn preflight_flags_sector_mismatch() {
        let mut config = valid_config();
        config.meetings.push(MeetingBlackout::sector("spi", 0, 0, 1));
        let diagnostics = preflight(&config);
        assert!(diagnostics
            .iter()
            .any(|d| d.code == DiagnosticCode::P005SectorMismatch));
    }

    #[test]
    fn preflight_quiet_on_balanced_config() {
        // One worker, quota bracket [3, 8], 5 open slots (6 cells minus
        // the excluded grid edge).
        let diagnostics = preflight(&valid_config());
        assert!(diagnostics
            .iter()
            .all(|d| d.code != DiagnosticCode::P002QuotaImbalance));
    }
}
