//! Meeting blackouts steer assignments away from attendees, and the
//! diagnostic counting mode reports how many rosters the sheet admits.

use deskplan_core::{DiagnosticCode, Location, MeetingBlackout, RuleToggles, ScheduleConfig, Worker};
use deskplan_solver::Engine;

fn monday_with_meeting() -> ScheduleConfig {
    ScheduleConfig::builder()
        .days(["Monday"])
        .hourly_shifts(8, 3)
        .location(Location::new("Front desk").open_all_days(0, 2))
        .worker(Worker::new("Ada").sector("search").category("80"))
        .worker(Worker::new("Grace").sector("cado").category("80"))
        .quota("80", 5, 3, 4)
        .available_everywhere("Ada")
        .available_everywhere("Grace")
        // The search sector meets during the first shift.
        .meeting(MeetingBlackout::sector("search", 0, 0, 0))
        .rules(RuleToggles {
            coverage: true,
            single_seat: true,
            no_out_of_preference: true,
            ..RuleToggles::default()
        })
        .build()
}

#[test]
fn meeting_attendee_is_kept_out_of_the_blackout() {
    let config = monday_with_meeting();
    let report = Engine::new().solve(&config).unwrap();

    // Ada (search) cannot take shift 0, so Grace does.
    assert_eq!(report.assignments.worker_at(0, 0, 0), Some(1));
    // No assignment violated a preference or a meeting window.
    assert!(report.notes.is_empty());
}

#[test]
fn counting_mode_enumerates_the_admissible_rosters() {
    let mut config = monday_with_meeting();
    config.rules.search_for_all_solutions = true;
    let report = Engine::new().solve(&config).unwrap();

    // Shift 0 is pinned to Grace; shift 1 can go to either worker; shift 2
    // is the excluded grid edge.
    assert_eq!(report.stats.solution_count, Some(2));
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::S004SolutionCount));
}

#[test]
fn directorate_meetings_reach_flagged_workers_in_any_sector() {
    let config = ScheduleConfig::builder()
        .days(["Monday"])
        .hourly_shifts(8, 2)
        .location(Location::new("Front desk").open_all_days(0, 1))
        .worker(Worker::new("Ada").sector("search").category("80").directorate())
        .worker(Worker::new("Grace").sector("cado").category("80"))
        .quota("80", 5, 3, 4)
        .available_everywhere("Ada")
        .available_everywhere("Grace")
        .meeting(MeetingBlackout::directorate(0, 0, 0))
        .rules(RuleToggles {
            coverage: true,
            no_out_of_preference: true,
            ..RuleToggles::default()
        })
        .build();
    let report = Engine::new().solve(&config).unwrap();
    // Only the open first shift exists (the second is the grid edge), and
    // the directorate member cannot take it.
    assert_eq!(report.assignments.worker_at(0, 0, 0), Some(1));
}
