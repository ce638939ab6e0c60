//! Final assignment list plus hours summary, in the output contract shape
//! from spec §6. §4.7.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};
use serde::Serialize;

use shared::time::{format_hhmm, tenths_to_decimal_hours};

use super::entities::{Assignment, Employee, EmployeeId, ShiftType, ShopId};
use super::trim_rebalance::{TrimRebalanceResult, WorkingShift};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputShift {
    pub date: NaiveDate,
    pub shop_id: ShopId,
    pub shop_name: String,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub start_time: String,
    pub end_time: String,
    pub hours: f64,
    pub shift_type: &'static str,
    pub is_trimmed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub success: bool,
    pub status: String,
    pub shifts: Vec<OutputShift>,
    pub employee_hours: HashMap<EmployeeId, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct NameLookup<'a> {
    pub shop_names: HashMap<ShopId, &'a str>,
    pub employee_names: HashMap<EmployeeId, &'a str>,
}

impl<'a> NameLookup<'a> {
    pub fn build(employees: &'a [Employee], shops: &'a [super::config_loader::NormalizedShop]) -> Self {
        Self {
            shop_names: shops.iter().map(|s| (s.shop.id, s.shop.name.as_str())).collect(),
            employee_names: employees.iter().map(|e| (e.id, e.name.as_str())).collect(),
        }
    }
}

/// Builds the success-path response: every shift dated against `week_start`
/// plus a hours summary covering every known employee (including those
/// with zero assigned hours, so the caller never has to guess a default).
pub fn format_success(
    week_start: NaiveDate,
    result: &TrimRebalanceResult,
    employees: &[Employee],
    names: &NameLookup<'_>,
    status: &str,
) -> RosterResponse {
    let mut shifts: Vec<OutputShift> = result
        .shifts
        .iter()
        .map(|shift| to_assignment(week_start, shift, names))
        .map(|assignment| to_output_shift(&assignment))
        .collect();
    shifts.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.shop_id.cmp(&b.shop_id))
            .then(a.employee_id.cmp(&b.employee_id))
    });

    let mut employee_hours: HashMap<EmployeeId, f64> = employees
        .iter()
        .map(|e| (e.id, 0.0))
        .collect();
    for (&id, &tenths) in &result.employee_hours_tenths {
        employee_hours.insert(id, tenths_to_decimal_hours(tenths));
    }

    RosterResponse {
        success: true,
        status: status.to_string(),
        shifts,
        employee_hours,
        message: None,
    }
}

pub fn format_failure(status: &str, message: String) -> RosterResponse {
    RosterResponse {
        success: false,
        status: status.to_string(),
        shifts: Vec::new(),
        employee_hours: HashMap::new(),
        message: Some(message),
    }
}

/// Builds the §3 `Assignment` domain entity from a post-trim working
/// shift, resolving the human-readable shop/employee names the output
/// contract wants alongside the ids.
fn to_assignment(week_start: NaiveDate, shift: &WorkingShift, names: &NameLookup<'_>) -> Assignment {
    let date = week_start
        .checked_add_days(Days::new(shift.day as u64))
        .unwrap_or(week_start);
    Assignment {
        shop_id: shift.shop_id,
        shop_name: names
            .shop_names
            .get(&shift.shop_id)
            .copied()
            .unwrap_or("unknown shop")
            .to_string(),
        employee_id: shift.employee_id,
        employee_name: names
            .employee_names
            .get(&shift.employee_id)
            .copied()
            .unwrap_or("unknown employee")
            .to_string(),
        date,
        day: shift.day,
        start_minutes: shift.start_minutes,
        end_minutes: shift.end_minutes,
        duration_tenths: shift.duration_tenths(),
        shift_type: shift.shift_type,
        is_trimmed: shift.is_trimmed,
    }
}

/// Reshapes an `Assignment` into the wire-facing output contract shape
/// from spec §6: `HH:MM` time strings and a decimal hours figure instead
/// of the internal minute/tenths integer encoding.
fn to_output_shift(assignment: &Assignment) -> OutputShift {
    OutputShift {
        date: assignment.date,
        shop_id: assignment.shop_id,
        shop_name: assignment.shop_name.clone(),
        employee_id: assignment.employee_id,
        employee_name: assignment.employee_name.clone(),
        start_time: format_hhmm(assignment.start_minutes),
        end_time: format_hhmm(assignment.end_minutes),
        hours: tenths_to_decimal_hours(assignment.duration_tenths as i64),
        shift_type: shift_type_str(assignment.shift_type),
        is_trimmed: assignment.is_trimmed,
    }
}

fn shift_type_str(shift_type: ShiftType) -> &'static str {
    shift_type.as_str()
}

/// Distinct (shop, day) identities actually present in the output, used
/// by property tests to cross-check the coverage invariant against the
/// demand entries the pipeline derived.
pub fn shop_days_covered(result: &TrimRebalanceResult) -> HashSet<(ShopId, u8)> {
    result.shifts.iter().map(|s| (s.shop_id, s.day)).collect()
}
