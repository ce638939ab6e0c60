//! End-to-end solves through the public `solve`/`solve_to_response` entry
//! points, using small hand-built rosters whose feasible (and, where
//! claimed, optimal) solution can be reasoned about without running a
//! solver by hand.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use scheduling_service::domain::entities::{
    ContractKind, CoverageMode, DayStaffing, Employee, ExplicitAssignment, LeaveRequest, RawField,
    RosterRequest, Shop, ShiftType, SpecialRequest, StaffingConfig, SundayConfig,
};
use scheduling_service::{solve, solve_to_response};
use shared::SolverSettings;

fn week_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
}

fn settings() -> SolverSettings {
    SolverSettings {
        time_limit_seconds: 10,
        ..SolverSettings::default()
    }
}

fn employee(id: u32, name: &str, contract: ContractKind, target: u32, primary: u32) -> Employee {
    Employee {
        id,
        name: name.to_string(),
        company: "ACME".to_string(),
        contract,
        weekly_hour_target: target,
        active: true,
        am_only: false,
        primary_shop: Some(primary),
        secondary_shops: vec![],
    }
}

fn base_shop(id: u32, name: &str, open: &str, close: &str) -> Shop {
    Shop {
        id,
        name: name.to_string(),
        company: "ACME".to_string(),
        open: open.to_string(),
        close: close.to_string(),
        active: true,
        can_be_solo: false,
        min_staff_at_close: 1,
        day_in_day_out: false,
        staffing: RawField::Absent,
        sunday: RawField::Absent,
        trimming: RawField::Absent,
    }
}

fn day(min_am: u32, min_pm: u32) -> DayStaffing {
    DayStaffing {
        min_am,
        min_pm,
        target_am: min_am,
        target_pm: min_pm,
        max_staff: 10,
        is_mandatory: false,
    }
}

fn empty_request(shops: Vec<Shop>, employees: Vec<Employee>) -> RosterRequest {
    RosterRequest {
        week_start: week_start(),
        employees,
        shops,
        assignments: vec![],
        leave_requests: vec![],
        fixed_days_off: HashMap::new(),
        special_requests: vec![],
        previous_week_sunday_shifts: vec![],
        excluded_employee_ids: HashSet::new(),
        am_only_employee_names: HashSet::new(),
        time_limit_seconds: None,
    }
}

#[test]
fn two_employees_cover_a_weekday_only_shop_with_no_weekend_shifts() {
    // minAM=1/minPM=1 Mon-Fri, Saturday demand zeroed out, Sunday closed by
    // default: the only way to cover a day is for someone to work it, and
    // the only way two people with a weekly cap of 6 can avoid ever
    // stacking FULL shifts back to back is to alternate days between them.
    let mut staffing = StaffingConfig::default();
    staffing.days[5] = Some(day(0, 0)); // Saturday: nothing required.
    let mut shop = base_shop(1, "Birkirkara", "08:00", "16:00");
    shop.staffing = RawField::Structured(staffing);

    let employees = vec![
        employee(1, "Alice", ContractKind::FullTime, 24, 1),
        employee(2, "Bob", ContractKind::FullTime, 16, 1),
    ];
    let request = empty_request(vec![shop], employees);

    let response = solve(&request, &settings()).expect("feasible roster");
    assert!(response.success);

    use chrono::Datelike;
    for s in &response.shifts {
        assert_ne!(s.date.weekday(), chrono::Weekday::Sun);
    }
    // Every weekday (Mon-Fri) has at least one covering shift.
    for offset in 0..5i64 {
        let expected_date = week_start().checked_add_days(chrono::Days::new(offset as u64)).unwrap();
        assert!(
            response.shifts.iter().any(|s| s.date == expected_date),
            "weekday {offset} has no covering shift"
        );
    }
    // Nobody works Saturday, since demand there was zeroed.
    let saturday = week_start().checked_add_days(chrono::Days::new(5)).unwrap();
    assert!(response.shifts.iter().all(|s| s.date != saturday));
}

#[test]
fn single_day_of_demand_forces_a_single_full_shift() {
    // Only Monday carries demand; with one eligible employee the only way
    // to satisfy both the AM and PM minimum at once is a single FULL
    // shift, since the same employee cannot cover two shifts that day.
    let mut staffing = StaffingConfig::default();
    for d in 1..7 {
        staffing.days[d] = Some(day(0, 0));
    }
    let mut shop = base_shop(1, "Sliema Kiosk", "08:00", "16:00");
    shop.staffing = RawField::Structured(staffing);

    let employees = vec![employee(1, "Carla", ContractKind::FullTime, 8, 1)];
    let request = empty_request(vec![shop], employees);

    let response = solve(&request, &settings()).expect("feasible roster");
    assert!(response.success);
    assert_eq!(response.shifts.len(), 1);

    let shift = &response.shifts[0];
    assert_eq!(shift.shift_type, ShiftType::Full.as_str());
    assert_eq!(shift.date, week_start());
    assert_eq!(shift.hours, 8.0);
    assert_eq!(response.employee_hours.get(&1), Some(&8.0));
}

#[test]
fn student_hours_never_exceed_the_weekly_cap_even_with_full_time_backup() {
    // A student and two full-timers share a week-long shop; the student's
    // hard 20h cap must hold in the optimal solution regardless of how the
    // solver chooses to split the remaining coverage.
    let mut shop = base_shop(1, "Mosta", "08:00", "16:00");
    shop.sunday = RawField::Structured(SundayConfig {
        closed: false,
        max_staff: None,
        custom_open: None,
        custom_close: None,
    });

    let employees = vec![
        employee(1, "Student Sam", ContractKind::Student, 20, 1),
        employee(2, "Dana", ContractKind::FullTime, 40, 1),
        employee(3, "Eve", ContractKind::FullTime, 40, 1),
    ];
    let request = empty_request(vec![shop], employees);

    let response = solve(&request, &settings()).expect("feasible roster");
    assert!(response.success);
    let student_hours = *response.employee_hours.get(&1).unwrap_or(&0.0);
    assert!(student_hours <= 20.0, "student worked {student_hours}h");
}

#[test]
fn mandatory_special_request_is_honored_or_the_result_says_infeasible() {
    // The employee's only eligible slot anywhere is the requested one, via
    // an explicit (non-primary) assignment; a cheaper feasible alternative
    // to honouring it does not exist, so the optimal solve must include it.
    let mut staffing = StaffingConfig::default();
    for d in 0..7 {
        if d != 1 {
            staffing.days[d] = Some(day(0, 0));
        }
    }
    staffing.days[1] = Some(day(0, 1)); // Tuesday: PM only.
    let mut shop = base_shop(10, "Qormi", "08:00", "16:00");
    shop.staffing = RawField::Structured(staffing);

    let mut employee = employee(5, "Frank", ContractKind::PartTime, 4, 999);
    employee.primary_shop = None;

    let mut request = empty_request(vec![shop], vec![employee]);
    request.assignments = vec![ExplicitAssignment {
        employee_id: 5,
        shop_id: 10,
        is_primary: false,
    }];
    request.special_requests = vec![SpecialRequest {
        employee_id: 5,
        shop_id: 10,
        day: 1,
        shift_type: ShiftType::Pm,
        explicit_start: None,
        explicit_end: None,
    }];

    let response = solve_to_response(&request, &settings()).expect("no invalid input");
    if response.success {
        let tuesday = week_start().checked_add_days(chrono::Days::new(1)).unwrap();
        assert!(response.shifts.iter().any(|s| s.employee_id == 5
            && s.shop_id == 10
            && s.date == tuesday
            && s.shift_type == ShiftType::Pm.as_str()));
    } else {
        assert_eq!(response.status, "INFEASIBLE");
    }
}

#[test]
fn approved_leave_day_never_produces_a_shift_on_that_day() {
    // Only Monday carries demand, and Grace is on approved leave that day,
    // so the eligibility gate excludes her (employee, template) pairs for
    // it entirely: no assignment for her on Monday is even representable,
    // regardless of what the solver picks. Henry is the only one left to
    // cover it.
    let mut staffing = StaffingConfig::default();
    for d in 1..7 {
        staffing.days[d] = Some(day(0, 0));
    }
    let mut shop = base_shop(1, "Naxxar", "08:00", "16:00");
    shop.staffing = RawField::Structured(staffing);

    let employees = vec![
        employee(1, "Grace", ContractKind::FullTime, 16, 1),
        employee(2, "Henry", ContractKind::FullTime, 8, 1),
    ];
    let mut request = empty_request(vec![shop], employees);
    let monday = week_start();
    request.leave_requests = vec![LeaveRequest {
        employee_id: 1,
        start_date: monday,
        end_date: monday,
        approved: true,
    }];

    let response = solve(&request, &settings()).expect("feasible roster");
    assert!(response.success);
    assert!(response.shifts.iter().all(|s| !(s.employee_id == 1 && s.date == monday)));
    assert!(response.shifts.iter().any(|s| s.employee_id == 2 && s.date == monday));
}

#[test]
fn coverage_mode_split_never_emits_a_full_shift() {
    // Split coverage never offers a FULL template at all, so three people
    // sharing the five weekday AM/PM pairs (Saturday demand zeroed out to
    // stay under the Mon-Fri shift cap) is enough to keep this feasible.
    let mut staffing = StaffingConfig {
        coverage_mode: CoverageMode::Split,
        days: Default::default(),
    };
    staffing.days[5] = Some(day(0, 0));
    let mut shop = base_shop(1, "Gzira", "08:00", "20:00");
    shop.staffing = RawField::Structured(staffing);

    let employees = vec![
        employee(1, "Hana", ContractKind::FullTime, 40, 1),
        employee(2, "Ivan", ContractKind::FullTime, 40, 1),
        employee(3, "Jana", ContractKind::PartTime, 20, 1),
    ];
    let request = empty_request(vec![shop], employees);

    let response = solve(&request, &settings()).expect("feasible roster");
    assert!(response.success);
    assert!(response
        .shifts
        .iter()
        .all(|s| s.shift_type != ShiftType::Full.as_str()));
}

#[test]
fn large_shop_sunday_never_gets_a_full_shift_even_with_flexible_coverage() {
    // Hamrun is a named large shop; the Sunday business override disallows
    // FULL shifts outright rather than just penalizing them, even though
    // the shop's own staffing config is the default Flexible mode that
    // would otherwise offer FULL templates every other day.
    let mut staffing = StaffingConfig::default();
    for d in 0..6 {
        staffing.days[d] = Some(day(0, 0));
    }
    let mut shop = base_shop(1, "Hamrun", "08:00", "20:00");
    shop.staffing = RawField::Structured(staffing);
    shop.sunday = RawField::Structured(SundayConfig {
        closed: false,
        max_staff: None,
        custom_open: None,
        custom_close: None,
    });

    let employees = vec![
        employee(1, "Karl", ContractKind::FullTime, 8, 1),
        employee(2, "Lara", ContractKind::FullTime, 8, 1),
        employee(3, "Moira", ContractKind::FullTime, 8, 1),
        employee(4, "Neil", ContractKind::FullTime, 8, 1),
    ];
    let request = empty_request(vec![shop], employees);

    let response = solve(&request, &settings()).expect("feasible roster");
    assert!(response.success);
    assert!(response
        .shifts
        .iter()
        .all(|s| s.shift_type != ShiftType::Full.as_str()));
}

#[test]
fn special_request_explicit_times_override_the_standard_shift_window() {
    // Frank's only eligible slot is Tuesday PM, same as the mandatory
    // special-request scenario above, but this time the request also pins
    // an explicit start/end narrower than the template's standard window.
    let mut staffing = StaffingConfig::default();
    for d in 0..7 {
        if d != 1 {
            staffing.days[d] = Some(day(0, 0));
        }
    }
    staffing.days[1] = Some(day(0, 1));
    let mut shop = base_shop(10, "Qormi", "08:00", "16:00");
    shop.staffing = RawField::Structured(staffing);

    let mut employee = employee(5, "Frank", ContractKind::PartTime, 4, 999);
    employee.primary_shop = None;

    let mut request = empty_request(vec![shop], vec![employee]);
    request.assignments = vec![ExplicitAssignment {
        employee_id: 5,
        shop_id: 10,
        is_primary: false,
    }];
    request.special_requests = vec![SpecialRequest {
        employee_id: 5,
        shop_id: 10,
        day: 1,
        shift_type: ShiftType::Pm,
        explicit_start: Some("13:00".to_string()),
        explicit_end: Some("15:00".to_string()),
    }];

    let response = solve_to_response(&request, &settings()).expect("no invalid input");
    if response.success {
        let shift = response
            .shifts
            .iter()
            .find(|s| s.employee_id == 5 && s.shop_id == 10)
            .expect("Frank's shift is present");
        assert_eq!(shift.start_time, "13:00");
        assert_eq!(shift.end_time, "15:00");
        assert_eq!(shift.hours, 2.0);
    } else {
        assert_eq!(response.status, "INFEASIBLE");
    }
}

#[test]
fn invalid_input_without_employees_is_rejected_before_any_solve() {
    let shop = base_shop(1, "Birkirkara", "08:00", "16:00");
    let request = empty_request(vec![shop], vec![]);
    let err = solve(&request, &settings()).unwrap_err();
    assert!(matches!(err, shared::RosterError::InvalidInput(_)));
}
