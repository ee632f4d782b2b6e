//! # deskplan-core
//!
//! Core domain model and traits for the deskplan rostering engine.
//!
//! This crate provides:
//! - Domain types: [`ScheduleConfig`], [`Shift`], [`Location`], [`Worker`],
//!   [`Quota`], [`MeetingBlackout`], [`Availability`], [`RuleToggles`]
//! - Eager configuration validation ([`validate`]) and preflight data checks
//! - Diagnostics and report types consumed by renderers
//! - The [`Renderer`] and [`ConfigSource`] traits
//!
//! The configuration is treated as an immutable value: an external source
//! (file loader, test fixture) builds it, [`validate`] checks the index
//! invariants once, and everything downstream only reads it.
//!
//! ## Example
//!
//! ```rust
//! use deskplan_core::{Location, ScheduleConfig, Shift, Worker};
//!
//! let config = ScheduleConfig::builder()
//!     .days(["Monday", "Tuesday"])
//!     .shift(Shift::starting_at(8, 0).lasting_minutes(60))
//!     .shift(Shift::starting_at(9, 0).lasting_minutes(60))
//!     .location(Location::new("Front desk").open_all_days(0, 1))
//!     .worker(Worker::new("Ada").sector("search").category("80"))
//!     .quota("80", 5, 3, 4)
//!     .available_everywhere("Ada")
//!     .build();
//! assert!(deskplan_core::validate(&config).is_ok());
//! ```

pub mod config;
pub mod report;
pub mod validate;

pub use config::{
    Availability, Dimensions, Location, LocationRole, MeetingAudience, MeetingBlackout,
    OperatingWindow, Quota, QuotaUnit, RuleToggles, ScheduleConfig, ScheduleConfigBuilder, Shift,
    Worker, WorkerAbsence,
};
pub use report::{
    AssignmentGrid, AssignmentNote, Diagnostic, DiagnosticCode, RenderError, Renderer,
    RosterReport, SectorDaySummary, Severity, SolveStats, SolveStatus, WorkerSummary,
};
pub use validate::{preflight, validate, ConfigurationError};

/// Abstract producer of a normalized schedule configuration.
///
/// Concrete sources (TOML files, test fixtures, spreadsheet adapters living
/// outside this workspace) implement this; the engine only ever sees the
/// already-normalized [`ScheduleConfig`] value.
pub trait ConfigSource {
    type Error;

    /// Produce a configuration, already normalized (quota scaling and
    /// absences applied) but not necessarily validated.
    fn load(&self) -> Result<ScheduleConfig, Self::Error>;
}
