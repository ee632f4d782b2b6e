//! Active and reserve quota bands over a mixed primary/reserve site pair.

use deskplan_core::{Location, RuleToggles, ScheduleConfig, Worker};
use deskplan_solver::Engine;

fn desk_and_backup() -> ScheduleConfig {
    ScheduleConfig::builder()
        .days(["Monday", "Tuesday"])
        .hourly_shifts(8, 2)
        .location(Location::new("Front desk").open_all_days(0, 1))
        .location(Location::new("Backup").reserve().open_all_days(0, 1))
        .worker(Worker::new("Ada").sector("search").category("80"))
        .worker(Worker::new("Grace").sector("cado").category("80"))
        .quota("80", 2, 2, 4)
        .available_everywhere("Ada")
        .available_everywhere("Grace")
        .rules(RuleToggles {
            coverage: true,
            single_seat: true,
            max_two_shifts_per_day: true,
            min_active: true,
            max_active: true,
            min_reserve: true,
            max_reserve: true,
            ..RuleToggles::default()
        })
        .build()
}

#[test]
fn solved_roster_sits_inside_the_bands() {
    let config = desk_and_backup();
    let report = Engine::new().solve(&config).unwrap();

    for summary in &report.worker_summaries {
        assert!(
            summary.active_units >= 1 && summary.active_units <= 2,
            "{}: {} active units",
            summary.name,
            summary.active_units
        );
        assert!(
            summary.reserve_units >= 1 && summary.reserve_units <= 2,
            "{}: {} reserve units",
            summary.name,
            summary.reserve_units
        );
    }
}

#[test]
fn both_sites_are_fully_covered() {
    let config = desk_and_backup();
    let report = Engine::new().solve(&config).unwrap();
    // 6 open slots across the two sites, all preference-staffed.
    assert_eq!(report.stats.max_objective, 6);
    assert_eq!(report.stats.objective, 6);
}

#[test]
fn nobody_sits_at_two_sites_in_one_shift() {
    let config = desk_and_backup();
    let report = Engine::new().solve(&config).unwrap();
    let dims = config.dimensions();
    for worker in 0..dims.workers {
        for day in 0..dims.days {
            for shift in 0..dims.shifts {
                let seats = (0..dims.locations)
                    .filter(|&l| report.assignments.assigned(worker, day, shift, l))
                    .count();
                assert!(seats <= 1);
            }
        }
    }
}
