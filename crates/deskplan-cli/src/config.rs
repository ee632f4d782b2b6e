//! TOML configuration files: the on-disk schema and its normalization
//! into a [`ScheduleConfig`].
//!
//! The file mirrors how the planning sheet is maintained by hand: days,
//! shifts, locations, workers, a quota table keyed by category, meetings,
//! availability marks, absences and the rule sheet. Loading normalizes
//! everything (quota scaling, absence folding) but leaves validation to
//! the engine.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use deskplan_core::{
    ConfigSource, Diagnostic, Location, MeetingBlackout, QuotaUnit, RuleToggles, ScheduleConfig,
    Shift, Worker, WorkerAbsence,
};

/// A configuration file that could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{0}")]
    Schema(String),
}

// ============================================================================
// On-disk schema
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSchema {
    days: Vec<String>,
    shifts: Vec<ShiftEntry>,
    locations: Vec<LocationEntry>,
    workers: Vec<WorkerEntry>,
    #[serde(default)]
    quotas: std::collections::BTreeMap<String, QuotaEntry>,
    #[serde(default)]
    meetings: Vec<MeetingEntry>,
    #[serde(default)]
    availability: Vec<AvailabilityEntry>,
    #[serde(default)]
    available_everywhere: Vec<String>,
    #[serde(default)]
    absences: Vec<AbsenceEntry>,
    #[serde(default)]
    rules: RuleToggles,
    #[serde(default)]
    quota_unit: UnitEntry,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShiftEntry {
    /// "HH:MM"
    start: String,
    #[serde(default = "default_shift_minutes")]
    duration_minutes: u16,
}

fn default_shift_minutes() -> u16 {
    60
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocationEntry {
    name: String,
    #[serde(default)]
    reserve: bool,
    /// Uniform hours: inclusive shift index range, every day.
    first_shift: Option<usize>,
    last_shift: Option<usize>,
    /// Per-day hours; days not listed are closed.
    #[serde(default)]
    open: Vec<WindowEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowEntry {
    day: usize,
    first_shift: usize,
    last_shift: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorkerEntry {
    name: String,
    sector: String,
    category: String,
    #[serde(default = "default_run_length")]
    run_length: u32,
    #[serde(default)]
    directorate: bool,
}

fn default_run_length() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuotaEntry {
    max_active: u32,
    max_reserve: u32,
    max_days: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MeetingEntry {
    /// Sector name, or absent for a directorate meeting.
    sector: Option<String>,
    #[serde(default)]
    directorate: bool,
    day: usize,
    first_shift: usize,
    last_shift: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AvailabilityEntry {
    worker: String,
    day: usize,
    first_shift: usize,
    last_shift: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AbsenceEntry {
    worker: String,
    days: Vec<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum UnitEntry {
    #[default]
    Shifts,
    Hours,
}

fn parse_hhmm(text: &str) -> Result<(u16, u16), LoadError> {
    let (hours, minutes) = text
        .split_once(':')
        .ok_or_else(|| LoadError::Schema(format!("bad time '{text}', expected HH:MM")))?;
    let parse = |part: &str| {
        part.parse::<u16>()
            .map_err(|_| LoadError::Schema(format!("bad time '{text}', expected HH:MM")))
    };
    let (hours, minutes) = (parse(hours)?, parse(minutes)?);
    if hours >= 24 || minutes >= 60 {
        return Err(LoadError::Schema(format!("time '{text}' out of range")));
    }
    Ok((hours, minutes))
}

// ============================================================================
// Source
// ============================================================================

/// A schedule configuration stored in a TOML file.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and normalize, returning the normalization notes (absence
    /// mismatches and the like) alongside the configuration.
    pub fn load_with_notes(&self) -> Result<(ScheduleConfig, Vec<Diagnostic>), LoadError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        let schema: FileSchema = toml::from_str(&text).map_err(|source| LoadError::Parse {
            path: self.path.clone(),
            source,
        })?;
        build(schema)
    }
}

impl ConfigSource for FileSource {
    type Error = LoadError;

    fn load(&self) -> Result<ScheduleConfig, LoadError> {
        self.load_with_notes().map(|(config, _)| config)
    }
}

fn build(schema: FileSchema) -> Result<(ScheduleConfig, Vec<Diagnostic>), LoadError> {
    let mut builder = ScheduleConfig::builder().days(schema.days.iter().map(String::as_str));

    for entry in &schema.shifts {
        let (hours, minutes) = parse_hhmm(&entry.start)?;
        builder = builder.shift(
            Shift::starting_at(hours, minutes).lasting_minutes(entry.duration_minutes),
        );
    }

    for entry in schema.locations {
        let mut location = Location::new(entry.name);
        if entry.reserve {
            location = location.reserve();
        }
        match (entry.first_shift, entry.last_shift, entry.open.is_empty()) {
            (Some(first), Some(last), true) => {
                location = location.open_all_days(first, last);
            }
            (None, None, false) => {
                for window in entry.open {
                    location = location.open_on(window.day, window.first_shift, window.last_shift);
                }
            }
            _ => {
                return Err(LoadError::Schema(format!(
                    "location '{}' needs either first_shift/last_shift or an open list",
                    location.name
                )));
            }
        }
        builder = builder.location(location);
    }

    for entry in schema.workers {
        let mut worker = Worker::new(entry.name)
            .sector(entry.sector)
            .category(entry.category)
            .run_length(entry.run_length);
        if entry.directorate {
            worker = worker.directorate();
        }
        builder = builder.worker(worker);
    }

    for (category, quota) in schema.quotas {
        builder = builder.quota(category, quota.max_active, quota.max_reserve, quota.max_days);
    }

    for entry in schema.meetings {
        let meeting = match (entry.sector, entry.directorate) {
            (Some(sector), false) => {
                MeetingBlackout::sector(sector, entry.day, entry.first_shift, entry.last_shift)
            }
            (None, true) => {
                MeetingBlackout::directorate(entry.day, entry.first_shift, entry.last_shift)
            }
            _ => {
                return Err(LoadError::Schema(
                    "a meeting needs either a sector or directorate = true".into(),
                ));
            }
        };
        builder = builder.meeting(meeting);
    }

    for name in schema.available_everywhere {
        builder = builder.available_everywhere(name);
    }
    for entry in schema.availability {
        builder = builder.available(entry.worker, entry.day, entry.first_shift, entry.last_shift);
    }
    builder = builder.rules(schema.rules).quota_unit(match schema.quota_unit {
        UnitEntry::Shifts => QuotaUnit::Shifts,
        UnitEntry::Hours => QuotaUnit::Hours,
    });

    let mut config = builder.build();
    config.apply_quota_scaling();
    let mut notes = Vec::new();
    if !schema.absences.is_empty() {
        let absences: Vec<WorkerAbsence> = schema
            .absences
            .into_iter()
            .map(|entry| WorkerAbsence {
                worker: entry.worker,
                days: entry.days,
            })
            .collect();
        notes = config.apply_absences(&absences);
    }
    Ok((config, notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
days = ["Monday", "Tuesday"]
available_everywhere = ["Ada"]

[[shifts]]
start = "08:00"

[[shifts]]
start = "09:00"
duration_minutes = 90

[[locations]]
name = "Front desk"
first_shift = 0
last_shift = 1

[[locations]]
name = "Backup"
reserve = true
open = [{ day = 0, first_shift = 0, last_shift = 1 }]

[[workers]]
name = "Ada"
sector = "search"
category = "80"
run_length = 2

[[workers]]
name = "Grace"
sector = "cado"
category = "80"
directorate = true

[quotas.80]
max_active = 3
max_reserve = 2
max_days = 4

[[meetings]]
sector = "search"
day = 0
first_shift = 0
last_shift = 0

[[availability]]
worker = "Grace"
day = 1
first_shift = 0
last_shift = 1

[rules]
coverage = true
single_seat = true
"#;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn sample_file_loads_and_validates() {
        let file = write_file(SAMPLE);
        let (config, notes) = FileSource::new(file.path()).load_with_notes().unwrap();

        assert!(deskplan_core::validate(&config).is_ok());
        assert_eq!(config.days.len(), 2);
        assert_eq!(config.shifts[1].duration, 90);
        assert!(config.locations[1].is_reserve());
        assert_eq!(config.workers[0].preferred_run_length, 2);
        assert!(config.workers[1].directorate);
        assert!(config.rules.coverage);
        assert!(!config.rules.weekly_floor);
        assert!(notes.is_empty());
        // Ada everywhere; Grace only Tuesday.
        assert!(config.availability.is_available(0, 0, 0, 0));
        assert!(!config.availability.is_available(1, 0, 0, 0));
        assert!(config.availability.is_available(1, 1, 0, 0));
    }

    #[test]
    fn absences_zero_days_and_note_mismatches() {
        let with_absence = format!("{SAMPLE}\n[[absences]]\nworker = \"Ada\"\ndays = [1]\n");
        let file = write_file(&with_absence);
        let (config, notes) = FileSource::new(file.path()).load_with_notes().unwrap();

        assert!(!config.availability.is_available(0, 1, 0, 0));
        // Grace has no absence record, which is worth a warning.
        assert!(notes.iter().any(|n| n.message.contains("Grace")));
    }

    #[test]
    fn bad_time_is_a_schema_error() {
        let file = write_file(&SAMPLE.replace("\"08:00\"", "\"8am\""));
        let err = FileSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, LoadError::Schema(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_file(&format!("{SAMPLE}\n[extras]\nkey = 1\n"));
        let err = FileSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn meeting_without_audience_is_rejected() {
        let broken = SAMPLE.replace("sector = \"search\"\nday = 0", "day = 0");
        let file = write_file(&broken);
        let err = FileSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, LoadError::Schema(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = FileSource::new("/nonexistent/roster.toml").load().unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
