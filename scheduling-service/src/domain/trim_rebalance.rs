//! Deterministic post-solve trim-and-rebalance pass: §4.6. Two sub-passes,
//! both strictly preserving the coverage minima the CP solve already
//! guaranteed:
//!
//! - Sub-pass A shortens shifts at overstaffed (shop, day) pairs, picking
//!   the most-overtime employees first, without ever dropping the number
//!   of *assigned* people below `minAM`/`minPM`/`minStaffAtClose`, since
//!   trimming only shortens a shift and never removes the assignment, that
//!   headcount bound is met by construction; what both sub-passes must get
//!   right is choosing *how many* and *which* shifts to shorten so the
//!   pass is idempotent when re-applied to its own output.
//! - Sub-pass B tops up under-target employees by lengthening their
//!   existing non-Sunday shifts at extension-eligible shops.

use std::collections::HashMap;

use shared::time::{duration_tenths, parse_hhmm};

use super::config_loader::NormalizedShop;
use super::entities::{DemandEntry, Employee, EmployeeId, ShiftType, ShopId, SpecialRequest};
use super::solver_driver::{RawShift, SolveOutcome};

#[derive(Debug, Clone, Copy)]
pub struct WorkingShift {
    pub employee_id: EmployeeId,
    pub shop_id: ShopId,
    pub day: u8,
    pub shift_type: ShiftType,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub is_trimmed: bool,
}

impl WorkingShift {
    pub fn duration_tenths(&self) -> u32 {
        duration_tenths(self.start_minutes, self.end_minutes)
    }

    fn from_raw(raw: &RawShift) -> Self {
        Self {
            employee_id: raw.employee_id,
            shop_id: raw.template.shop_id,
            day: raw.template.day,
            shift_type: raw.template.shift_type,
            start_minutes: raw.template.start_minutes,
            end_minutes: raw.template.end_minutes,
            is_trimmed: false,
        }
    }
}

pub struct TrimRebalanceResult {
    pub shifts: Vec<WorkingShift>,
    pub employee_hours_tenths: HashMap<EmployeeId, i64>,
}

/// Runs both sub-passes against a fresh solve outcome.
pub fn run(
    outcome: &SolveOutcome,
    employees: &[Employee],
    shops: &[NormalizedShop],
    demands: &[DemandEntry],
    special_requests: &[SpecialRequest],
) -> TrimRebalanceResult {
    let mut shifts: Vec<WorkingShift> = outcome.shifts.iter().map(WorkingShift::from_raw).collect();
    apply_explicit_request_times(&mut shifts, special_requests);
    apply_to_shifts(shifts, employees, shops, demands)
}

/// A special request may pin an explicit start/end (spec §3); when a given
/// endpoint parses and the resulting window is non-empty, the matching
/// shift adopts it in place of the template's standard window. A request
/// naming only one endpoint overrides just that one. A malformed time or
/// an inverted window is ignored and the template window stands.
fn apply_explicit_request_times(shifts: &mut [WorkingShift], special_requests: &[SpecialRequest]) {
    for request in special_requests {
        let Some(shift) = shifts.iter_mut().find(|s| {
            s.employee_id == request.employee_id
                && s.shop_id == request.shop_id
                && s.day == request.day
                && s.shift_type == request.shift_type
        }) else {
            continue;
        };

        let start = request
            .explicit_start
            .as_deref()
            .and_then(|v| parse_hhmm(v).ok())
            .unwrap_or(shift.start_minutes);
        let end = request
            .explicit_end
            .as_deref()
            .and_then(|v| parse_hhmm(v).ok())
            .unwrap_or(shift.end_minutes);

        if start < end {
            shift.start_minutes = start;
            shift.end_minutes = end;
        }
    }
}

/// Re-applies both sub-passes to an already-processed shift set. Used both
/// by the pipeline's single pass and by idempotence tests, which call this
/// twice and assert the second call is a no-op.
pub fn apply_to_shifts(
    shifts: Vec<WorkingShift>,
    employees: &[Employee],
    shops: &[NormalizedShop],
    demands: &[DemandEntry],
) -> TrimRebalanceResult {
    let mut shifts = shifts;
    let mut hours = recompute_hours(&shifts, employees);

    trim_pass(&mut shifts, &mut hours, employees, shops, demands);
    rebalance_pass(&mut shifts, &mut hours, employees, shops);

    TrimRebalanceResult {
        shifts,
        employee_hours_tenths: hours,
    }
}

fn recompute_hours(
    shifts: &[WorkingShift],
    employees: &[Employee],
) -> HashMap<EmployeeId, i64> {
    let mut hours: HashMap<EmployeeId, i64> = employees.iter().map(|e| (e.id, 0)).collect();
    for shift in shifts {
        *hours.entry(shift.employee_id).or_insert(0) += shift.duration_tenths() as i64;
    }
    hours
}

// ---------------------------------------------------------------------
// Sub-pass A: per-shop trimming.
// ---------------------------------------------------------------------

fn trim_pass(
    shifts: &mut [WorkingShift],
    hours: &mut HashMap<EmployeeId, i64>,
    employees: &[Employee],
    shops: &[NormalizedShop],
    demands: &[DemandEntry],
) {
    let targets: HashMap<EmployeeId, i64> = employees
        .iter()
        .map(|e| (e.id, e.weekly_target_tenths()))
        .collect();
    let demand_by_shop_day: HashMap<(ShopId, u8), &DemandEntry> =
        demands.iter().map(|d| ((d.shop_id, d.day), d)).collect();

    for shop in shops {
        if !shop.trimming.enabled {
            continue;
        }
        for day in 0..6u8 {
            // Sunday (day 6) is never trimmed.
            let Some(demand) = demand_by_shop_day.get(&(shop.shop.id, day)) else {
                continue;
            };
            if demand.is_solo {
                continue;
            }

            let indices_this_day: Vec<usize> = shifts
                .iter()
                .enumerate()
                .filter(|(_, s)| s.shop_id == shop.shop.id && s.day == day)
                .map(|(i, _)| i)
                .collect();
            if indices_this_day.len() <= 2 {
                continue;
            }

            if shop.trimming.trim_am {
                trim_half(
                    shifts,
                    hours,
                    &targets,
                    &indices_this_day,
                    shop,
                    demand,
                    HalfDay::Am,
                );
            }
            if shop.trimming.trim_pm {
                trim_half(
                    shifts,
                    hours,
                    &targets,
                    &indices_this_day,
                    shop,
                    demand,
                    HalfDay::Pm,
                );
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum HalfDay {
    Am,
    Pm,
}

fn covers_half(shift_type: ShiftType, half: HalfDay) -> bool {
    match half {
        HalfDay::Am => matches!(shift_type, ShiftType::Am | ShiftType::Full),
        HalfDay::Pm => matches!(shift_type, ShiftType::Pm | ShiftType::Full),
    }
}

#[allow(clippy::too_many_arguments)]
fn trim_half(
    shifts: &mut [WorkingShift],
    hours: &mut HashMap<EmployeeId, i64>,
    targets: &HashMap<EmployeeId, i64>,
    indices_this_day: &[usize],
    shop: &NormalizedShop,
    demand: &DemandEntry,
    half: HalfDay,
) {
    let covering: Vec<usize> = indices_this_day
        .iter()
        .copied()
        .filter(|&i| covers_half(shifts[i].shift_type, half))
        .collect();
    let headcount = covering.len() as u32;
    if headcount <= shop.trimming.trim_when_more_than {
        return;
    }

    let min_for_half = match half {
        HalfDay::Am => demand.min_am,
        HalfDay::Pm => demand.min_pm,
    };
    // Cap at close applies to PM trimming only: never drop the number of
    // people still present at closing time below `min_staff_at_close`.
    let close_floor = match half {
        HalfDay::Am => 0,
        HalfDay::Pm => shop.shop.min_staff_at_close,
    };
    let floor = min_for_half.max(close_floor);

    let already_trimmed = covering
        .iter()
        .filter(|&&i| shifts[i].is_trimmed)
        .count() as u32;
    let target_trim_count = (headcount.saturating_sub(shop.trimming.trim_when_more_than))
        .min(headcount.saturating_sub(floor));
    if target_trim_count <= already_trimmed {
        return;
    }
    let to_trim_now = target_trim_count - already_trimmed;

    // Rank untrimmed candidates by overtime (worked - target) descending,
    // then by employee id for a stable tie-break; only untrimmed shifts
    // are eligible so a second pass over already-trimmed output is a
    // no-op once `target_trim_count` has been reached.
    let mut candidates: Vec<usize> = covering
        .iter()
        .copied()
        .filter(|&i| !shifts[i].is_trimmed)
        .collect();
    candidates.sort_by(|&a, &b| {
        let emp_a = shifts[a].employee_id;
        let emp_b = shifts[b].employee_id;
        let overtime_a = hours.get(&emp_a).copied().unwrap_or(0) - targets.get(&emp_a).copied().unwrap_or(0);
        let overtime_b = hours.get(&emp_b).copied().unwrap_or(0) - targets.get(&emp_b).copied().unwrap_or(0);
        overtime_b.cmp(&overtime_a).then(emp_a.cmp(&emp_b))
    });

    let large_am_policy = shop.is_large && half == HalfDay::Am && headcount >= 3;

    for &i in candidates.iter().take(to_trim_now as usize) {
        let before = shifts[i].duration_tenths() as i64;
        if large_am_policy {
            apply_large_shop_am_anchor_trim(&mut shifts[i]);
        } else {
            match half {
                HalfDay::Am => apply_uniform_start_trim(&mut shifts[i], shop.trimming.trim_from_start_hours),
                HalfDay::Pm => apply_uniform_end_trim(&mut shifts[i], shop.trimming.trim_from_end_hours),
            }
        }
        shifts[i].is_trimmed = true;
        let after = shifts[i].duration_tenths() as i64;
        *hours.entry(shifts[i].employee_id).or_insert(0) -= before - after;
    }
}

/// Uniform policy: delay the start by `hours`, never crossing the shift's
/// own end (a pathological `hours` large enough to invert the interval is
/// clamped to a 1-hour slice instead of going negative).
fn apply_uniform_start_trim(shift: &mut WorkingShift, hours: u32) {
    let delay = hours * 60;
    let new_start = (shift.start_minutes + delay).min(shift.end_minutes.saturating_sub(60));
    shift.start_minutes = new_start.max(shift.start_minutes);
}

/// Uniform policy: bring the end forward by `hours`, symmetric to the
/// start-trim above.
fn apply_uniform_end_trim(shift: &mut WorkingShift, hours: u32) {
    let pull_in = hours * 60;
    let new_end = shift.end_minutes.saturating_sub(pull_in).max(shift.start_minutes + 60);
    shift.end_minutes = new_end.min(shift.end_minutes);
}

/// Large-shop AM anchor policy: compress the shift into a one-hour-either-
/// side slice around its own midpoint rather than just delaying the start,
/// per the spec's "two anchors kept full length, one trimmed to a short
/// mid-day slice" rule.
fn apply_large_shop_am_anchor_trim(shift: &mut WorkingShift) {
    let mid = (shift.start_minutes + shift.end_minutes) / 2;
    let new_start = mid.saturating_sub(60).max(shift.start_minutes);
    let new_end = (mid + 60).min(shift.end_minutes);
    shift.start_minutes = new_start;
    shift.end_minutes = new_end.max(new_start + 60);
}

// ---------------------------------------------------------------------
// Sub-pass B: extend under-hour employees.
// ---------------------------------------------------------------------

const MAX_SHIFT_HOURS_TENTHS: i64 = 80;

fn rebalance_pass(
    shifts: &mut [WorkingShift],
    hours: &mut HashMap<EmployeeId, i64>,
    employees: &[Employee],
    shops: &[NormalizedShop],
) {
    let extension_eligible: HashMap<ShopId, bool> = shops
        .iter()
        .map(|s| (s.shop.id, s.trimming.extension_eligible))
        .collect();

    let mut shortfalls: Vec<(EmployeeId, i64)> = employees
        .iter()
        .map(|e| {
            let worked = hours.get(&e.id).copied().unwrap_or(0);
            (e.id, e.weekly_target_tenths() - worked)
        })
        .filter(|&(_, shortfall)| shortfall > 0)
        .collect();
    shortfalls.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    for (employee_id, shortfall_tenths) in shortfalls {
        let whole_hours_needed = (shortfall_tenths + 9) / 10; // round up to whole hours
        if whole_hours_needed <= 0 {
            continue;
        }
        let mut budget_tenths = whole_hours_needed * 10;

        let mut candidate_indices: Vec<usize> = shifts
            .iter()
            .enumerate()
            .filter(|(_, s)| {
                s.employee_id == employee_id
                    && s.day != 6
                    && extension_eligible.get(&s.shop_id).copied().unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect();
        candidate_indices.sort_by_key(|&i| shifts[i].day);

        if candidate_indices.is_empty() {
            continue;
        }

        // Round-robin one-hour increments across eligible shifts until the
        // budget is spent or every shift has hit the per-shift cap.
        let mut progressed = true;
        while budget_tenths > 0 && progressed {
            progressed = false;
            for &i in &candidate_indices {
                if budget_tenths <= 0 {
                    break;
                }
                let current = shifts[i].duration_tenths() as i64;
                if current >= MAX_SHIFT_HOURS_TENTHS {
                    continue;
                }
                let step = 10i64.min(MAX_SHIFT_HOURS_TENTHS - current).min(budget_tenths);
                if step <= 0 {
                    continue;
                }
                shifts[i].end_minutes += (step * 6) as u32; // tenths -> minutes: *60/10
                budget_tenths -= step;
                *hours.entry(employee_id).or_insert(0) += step;
                progressed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ContractKind, RawField, Shop, StaffingConfig, SundayConfig, TrimmingConfig};

    fn employee(id: EmployeeId, target: u32) -> Employee {
        Employee {
            id,
            name: format!("Employee {id}"),
            company: "ACME".to_string(),
            contract: ContractKind::FullTime,
            weekly_hour_target: target,
            active: true,
            am_only: false,
            primary_shop: Some(1),
            secondary_shops: vec![],
        }
    }

    fn large_shop() -> NormalizedShop {
        NormalizedShop {
            shop: Shop {
                id: 1,
                name: "Hamrun".to_string(),
                company: "ACME".to_string(),
                open: "08:00".to_string(),
                close: "20:00".to_string(),
                active: true,
                can_be_solo: false,
                min_staff_at_close: 1,
                day_in_day_out: false,
                staffing: RawField::Absent,
                sunday: RawField::Absent,
                trimming: RawField::Absent,
            },
            staffing: StaffingConfig::default(),
            sunday: SundayConfig::default(),
            trimming: TrimmingConfig {
                enabled: true,
                trim_am: true,
                trim_pm: false,
                trim_from_start_hours: 2,
                trim_from_end_hours: 0,
                trim_when_more_than: 2,
                extension_eligible: true,
            },
            is_large: true,
        }
    }

    fn am_shift(employee_id: EmployeeId) -> WorkingShift {
        WorkingShift {
            employee_id,
            shop_id: 1,
            day: 1,
            shift_type: ShiftType::Am,
            start_minutes: 480,
            end_minutes: 840,
            is_trimmed: false,
        }
    }

    fn demand_for(shop: &NormalizedShop) -> DemandEntry {
        DemandEntry {
            shop_id: shop.shop.id,
            day: 1,
            min_am: 2,
            min_pm: 2,
            target_am: 4,
            target_pm: 2,
            max_staff: 10,
            is_mandatory: false,
            is_solo: false,
            coverage_mode: crate::domain::entities::CoverageMode::Flexible,
        }
    }

    fn special_request(
        employee_id: EmployeeId,
        shift_type: ShiftType,
        start: Option<&str>,
        end: Option<&str>,
    ) -> SpecialRequest {
        SpecialRequest {
            employee_id,
            shop_id: 1,
            day: 1,
            shift_type,
            explicit_start: start.map(str::to_string),
            explicit_end: end.map(str::to_string),
        }
    }

    #[test]
    fn explicit_request_times_override_the_matching_shift_window() {
        let mut shifts = vec![am_shift(1)];
        let requests = vec![special_request(1, ShiftType::Am, Some("09:00"), Some("13:30"))];

        apply_explicit_request_times(&mut shifts, &requests);

        assert_eq!(shifts[0].start_minutes, 540);
        assert_eq!(shifts[0].end_minutes, 810);
    }

    #[test]
    fn explicit_request_with_only_one_endpoint_overrides_just_that_one() {
        let mut shifts = vec![am_shift(1)];
        let requests = vec![special_request(1, ShiftType::Am, Some("09:00"), None)];

        apply_explicit_request_times(&mut shifts, &requests);

        assert_eq!(shifts[0].start_minutes, 540);
        assert_eq!(shifts[0].end_minutes, 840);
    }

    #[test]
    fn malformed_explicit_time_leaves_the_template_window_untouched() {
        let mut shifts = vec![am_shift(1)];
        let requests = vec![special_request(1, ShiftType::Am, Some("not-a-time"), Some("13:00"))];

        apply_explicit_request_times(&mut shifts, &requests);

        assert_eq!(shifts[0].start_minutes, 480);
        assert_eq!(shifts[0].end_minutes, 840);
    }

    #[test]
    fn inverted_explicit_window_leaves_the_template_window_untouched() {
        let mut shifts = vec![am_shift(1)];
        let requests = vec![special_request(1, ShiftType::Am, Some("15:00"), Some("09:00"))];

        apply_explicit_request_times(&mut shifts, &requests);

        assert_eq!(shifts[0].start_minutes, 480);
        assert_eq!(shifts[0].end_minutes, 840);
    }

    #[test]
    fn overstaffed_large_shop_trims_down_to_two_anchors() {
        let shop = large_shop();
        let employees: Vec<Employee> = (1..=4).map(|id| employee(id, 40)).collect();
        let shifts: Vec<WorkingShift> = (1..=4).map(am_shift).collect();
        let demands = vec![demand_for(&shop)];

        let result = apply_to_shifts(shifts, &employees, &[shop], &demands);
        let trimmed = result.shifts.iter().filter(|s| s.is_trimmed).count();
        let untrimmed = result.shifts.iter().filter(|s| !s.is_trimmed).count();
        assert_eq!(trimmed, 2);
        assert_eq!(untrimmed, 2);
        // AM headcount (by assignment, not hours) is unaffected.
        assert_eq!(result.shifts.len(), 4);
    }

    #[test]
    fn trim_pass_is_idempotent() {
        let shop = large_shop();
        let employees: Vec<Employee> = (1..=4).map(|id| employee(id, 40)).collect();
        let shifts: Vec<WorkingShift> = (1..=4).map(am_shift).collect();
        let demands = vec![demand_for(&shop)];

        let once = apply_to_shifts(shifts, &employees, &[shop.clone()], &demands);
        let twice = apply_to_shifts(once.shifts.clone(), &employees, &[shop], &demands);

        for (a, b) in once.shifts.iter().zip(twice.shifts.iter()) {
            assert_eq!(a.start_minutes, b.start_minutes);
            assert_eq!(a.end_minutes, b.end_minutes);
            assert_eq!(a.is_trimmed, b.is_trimmed);
        }
        assert_eq!(once.employee_hours_tenths, twice.employee_hours_tenths);
    }

    #[test]
    fn rebalance_tops_up_under_target_employee_without_exceeding_shift_cap() {
        let mut shop = large_shop();
        shop.trimming.enabled = false; // isolate sub-pass B
        let employees = vec![employee(1, 40)];
        let shifts: Vec<WorkingShift> = vec![
            WorkingShift {
                employee_id: 1,
                shop_id: 1,
                day: 0,
                shift_type: ShiftType::Am,
                start_minutes: 480,
                end_minutes: 780, // 5h
                is_trimmed: false,
            },
            WorkingShift {
                employee_id: 1,
                shop_id: 1,
                day: 1,
                shift_type: ShiftType::Am,
                start_minutes: 480,
                end_minutes: 780, // 5h
                is_trimmed: false,
            },
        ];
        let demands = vec![demand_for(&shop)];

        let result = apply_to_shifts(shifts, &employees, &[shop], &demands);
        let total: i64 = *result.employee_hours_tenths.get(&1).unwrap();
        assert_eq!(total, 400); // 40h target reached exactly
        for shift in &result.shifts {
            assert!(shift.duration_tenths() <= 80);
        }
    }

    #[test]
    fn rebalance_never_decreases_other_shifts() {
        let mut shop = large_shop();
        shop.trimming.enabled = false;
        let employees = vec![employee(1, 40)];
        let original = vec![WorkingShift {
            employee_id: 1,
            shop_id: 1,
            day: 0,
            shift_type: ShiftType::Full,
            start_minutes: 480,
            end_minutes: 960,
            is_trimmed: false,
        }];
        let demands = vec![demand_for(&shop)];
        let result = apply_to_shifts(original.clone(), &employees, &[shop], &demands);
        assert_eq!(result.shifts[0].duration_tenths(), original[0].duration_tenths());
    }
}
