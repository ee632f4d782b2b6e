//! The rule sheet is data: toggles change what the model enforces, and
//! disabled rules are echoed in the diagnostics.

use deskplan_core::{DiagnosticCode, Location, RuleToggles, ScheduleConfig, Worker};
use deskplan_solver::Engine;

fn config_with(toggles: RuleToggles) -> ScheduleConfig {
    ScheduleConfig::builder()
        .days(["Monday", "Tuesday"])
        .hourly_shifts(8, 3)
        .location(Location::new("Front desk").open_all_days(0, 2))
        .worker(Worker::new("Ada").sector("search").category("80"))
        .worker(Worker::new("Grace").sector("cado").category("80"))
        .quota("80", 3, 2, 4)
        .available_everywhere("Ada")
        .available_everywhere("Grace")
        .rules(toggles)
        .build()
}

#[test]
fn coverage_alone_still_staffs_every_open_slot() {
    let toggles = RuleToggles {
        coverage: true,
        ..RuleToggles::default()
    };
    let config = config_with(toggles);
    let report = Engine::new().solve(&config).unwrap();

    let dims = config.dimensions();
    for day in 0..dims.days {
        for shift in 0..dims.shifts {
            let staffed = (0..dims.workers)
                .filter(|&w| report.assignments.assigned(w, day, shift, 0))
                .count();
            assert_eq!(staffed, usize::from(config.open_slot(day, shift, 0)));
        }
    }
}

#[test]
fn no_rules_means_no_conditions_and_a_free_for_all() {
    let config = config_with(RuleToggles::default());
    let report = Engine::new().solve(&config).unwrap();

    assert_eq!(report.stats.conditions, 0);
    // Nothing forces closed slots empty, so every declared preference is
    // collected: 2 workers x 2 days x 3 shifts, past the open-slot ceiling.
    assert_eq!(report.stats.objective, 12);
    assert!(report.stats.objective > report.stats.max_objective);
}

#[test]
fn one_shift_per_day_cap_is_enforced() {
    let toggles = RuleToggles {
        coverage: true,
        max_one_shift_per_day: true,
        ..RuleToggles::default()
    };
    let config = config_with(toggles);
    // Day 0 has three open slots; two workers at one shift each cannot
    // cover them.
    assert!(Engine::new().solve(&config).is_err());
}

#[test]
fn disabled_rules_are_echoed_in_the_report() {
    let config = config_with(RuleToggles::standard());
    let report = Engine::new().solve(&config).unwrap();

    let echoed: Vec<&str> = report
        .diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::R001RuleDisabled)
        .map(|d| d.message.as_str())
        .collect();
    assert!(echoed.iter().any(|m| m.contains("midday pair")));
    assert!(echoed.iter().any(|m| m.contains("preferred run length")));
    assert!(echoed.iter().any(|m| m.contains("holiday floor")));
}
