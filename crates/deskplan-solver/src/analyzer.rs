//! Post-solve analysis: pure functions from a solved assignment grid to the
//! report summaries. Nothing here talks to the solver.

use deskplan_core::{
    AssignmentGrid, AssignmentNote, LocationRole, ScheduleConfig, SectorDaySummary, WorkerSummary,
};

/// Per-worker workload against the quota bands.
pub fn worker_summaries(config: &ScheduleConfig, grid: &AssignmentGrid) -> Vec<WorkerSummary> {
    let dims = grid.dims();
    let mut summaries = Vec::with_capacity(dims.workers);
    for (worker, profile) in config.workers.iter().enumerate() {
        let Some(quota) = config.quota_for(profile) else {
            continue;
        };
        let mut active_units = 0;
        let mut reserve_units = 0;
        let mut days_on_duty = 0;
        for day in 0..dims.days {
            let mut on_duty = false;
            for shift in 0..dims.shifts {
                for (location, site) in config.locations.iter().enumerate() {
                    if !grid.assigned(worker, day, shift, location) {
                        continue;
                    }
                    on_duty = true;
                    match site.role {
                        LocationRole::Primary => active_units += config.unit_weight(shift),
                        LocationRole::Reserve => reserve_units += config.unit_weight(shift),
                    }
                }
            }
            if on_duty {
                days_on_duty += 1;
            }
        }
        summaries.push(WorkerSummary {
            worker,
            name: profile.name.clone(),
            active_units,
            reserve_units,
            days_on_duty,
            quota: *quota,
        });
    }
    summaries
}

/// Per-sector, per-day coverage: minutes worked, head count, and the
/// morning/afternoon split.
pub fn sector_summaries(config: &ScheduleConfig, grid: &AssignmentGrid) -> Vec<SectorDaySummary> {
    let dims = grid.dims();
    let afternoon_start = config.first_afternoon_shift().unwrap_or(dims.shifts);

    let mut sectors: Vec<&str> = config.workers.iter().map(|w| w.sector.as_str()).collect();
    sectors.sort_unstable();
    sectors.dedup();

    let mut summaries = Vec::new();
    for sector in sectors {
        for day in 0..dims.days {
            let mut worked_minutes = 0;
            let mut distinct_workers = 0;
            let mut morning_workers = 0;
            let mut afternoon_workers = 0;
            for (worker, profile) in config.workers.iter().enumerate() {
                if profile.sector != sector {
                    continue;
                }
                let mut any = false;
                let mut morning = false;
                let mut afternoon = false;
                for shift in 0..dims.shifts {
                    for location in 0..dims.locations {
                        if grid.assigned(worker, day, shift, location) {
                            any = true;
                            worked_minutes += i64::from(config.shifts[shift].duration);
                            if shift < afternoon_start {
                                morning = true;
                            } else {
                                afternoon = true;
                            }
                        }
                    }
                }
                if any {
                    distinct_workers += 1;
                }
                if morning {
                    morning_workers += 1;
                }
                if afternoon {
                    afternoon_workers += 1;
                }
            }
            summaries.push(SectorDaySummary {
                sector: sector.to_string(),
                day,
                worked_minutes,
                distinct_workers,
                morning_workers,
                afternoon_workers,
            });
        }
    }
    summaries
}

/// Flag assignments that went against a preference or into a meeting
/// window. Empty under the standard rule sheet; populated when the
/// out-of-preference rule is toggled off.
pub fn assignment_notes(config: &ScheduleConfig, grid: &AssignmentGrid) -> Vec<AssignmentNote> {
    let dims = grid.dims();
    let mut notes = Vec::new();
    for (worker, profile) in config.workers.iter().enumerate() {
        for day in 0..dims.days {
            for shift in 0..dims.shifts {
                for location in 0..dims.locations {
                    if !grid.assigned(worker, day, shift, location) {
                        continue;
                    }
                    let out_of_preference =
                        !config.availability.is_available(worker, day, shift, location);
                    let meeting_conflict = config.in_blackout(profile, day, shift);
                    if out_of_preference || meeting_conflict {
                        notes.push(AssignmentNote {
                            worker,
                            day,
                            shift,
                            location,
                            out_of_preference,
                            meeting_conflict,
                        });
                    }
                }
            }
        }
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskplan_core::{Location, MeetingBlackout, Worker};
    use pretty_assertions::assert_eq;

    fn fixture() -> ScheduleConfig {
        ScheduleConfig::builder()
            .days(["Monday", "Tuesday"])
            .hourly_shifts(11, 4) // 11:00..15:00, straddles midday
            .location(Location::new("Desk").open_all_days(0, 3))
            .location(Location::new("Backup").reserve().open_all_days(0, 3))
            .worker(Worker::new("Ada").sector("search").category("80"))
            .worker(Worker::new("Grace").sector("cado").category("80"))
            .quota("80", 5, 3, 4)
            .available_everywhere("Ada")
            .available_everywhere("Grace")
            .build()
    }

    fn grid_with(config: &ScheduleConfig, cells: &[(usize, usize, usize, usize)]) -> AssignmentGrid {
        let dims = config.dimensions();
        let mut data = vec![false; dims.cardinality()];
        for &(w, d, s, l) in cells {
            data[((w * dims.days + d) * dims.shifts + s) * dims.locations + l] = true;
        }
        AssignmentGrid::new(dims, data)
    }

    #[test]
    fn worker_summary_splits_active_and_reserve() {
        let config = fixture();
        // Ada: two primary shifts Monday, one reserve shift Tuesday.
        let grid = grid_with(&config, &[(0, 0, 0, 0), (0, 0, 1, 0), (0, 1, 0, 1)]);
        let summaries = worker_summaries(&config, &grid);
        assert_eq!(summaries[0].active_units, 2);
        assert_eq!(summaries[0].reserve_units, 1);
        assert_eq!(summaries[0].days_on_duty, 2);
        assert_eq!(summaries[1].active_units, 0);
    }

    #[test]
    fn sector_summary_splits_morning_and_afternoon() {
        let config = fixture();
        // Shifts start 11:00, 12:00, 13:00, 14:00; afternoon begins at
        // index 2 (13:00 is the first start past midday).
        let grid = grid_with(&config, &[(0, 0, 0, 0), (0, 0, 2, 0), (1, 0, 1, 0)]);
        let summaries = sector_summaries(&config, &grid);
        let search_monday = summaries
            .iter()
            .find(|s| s.sector == "search" && s.day == 0)
            .unwrap();
        assert_eq!(search_monday.distinct_workers, 1);
        assert_eq!(search_monday.morning_workers, 1);
        assert_eq!(search_monday.afternoon_workers, 1);
        assert_eq!(search_monday.worked_minutes, 120);
        let cado_monday = summaries
            .iter()
            .find(|s| s.sector == "cado" && s.day == 0)
            .unwrap();
        assert_eq!(cado_monday.afternoon_workers, 0);
    }

    #[test]
    fn notes_flag_blackout_and_preference_violations() {
        let mut config = fixture();
        config
            .meetings
            .push(MeetingBlackout::sector("search", 0, 0, 1));
        // Grace loses her Tuesday availability at the desk.
        config.availability.set(1, 1, 0, 0, false);
        let grid = grid_with(&config, &[(0, 0, 0, 0), (1, 1, 0, 0), (1, 0, 2, 0)]);
        let notes = assignment_notes(&config, &grid);
        assert_eq!(notes.len(), 2);
        assert!(notes
            .iter()
            .any(|n| n.worker == 0 && n.meeting_conflict && !n.out_of_preference));
        assert!(notes
            .iter()
            .any(|n| n.worker == 1 && n.out_of_preference && !n.meeting_conflict));
    }
}
