//! Invokes the constraint solver with a wall-clock budget, walks the
//! decision variables of a successful solve, and materialises the chosen
//! shifts plus per-employee hour totals. §4.5.

use std::collections::HashMap;

use selen::prelude::*;
use shared::{RosterError, RosterResult};

use super::config_loader::NormalizedShop;
use super::entities::{Employee, EmployeeId, ShiftTemplate};
use super::model_assembler::AssembledModel;

/// One chosen (employee, template) pair, before trim-and-rebalance.
#[derive(Debug, Clone)]
pub struct RawShift {
    pub employee_id: EmployeeId,
    pub template: ShiftTemplate,
}

pub struct SolveOutcome {
    pub shifts: Vec<RawShift>,
    pub employee_hours_tenths: HashMap<EmployeeId, i64>,
}

/// Runs the solver over an assembled model and materialises the result.
///
/// Success requires both a feasible CP solution *and* zero slack on the
/// two families that the spec treats as "fulfilled or infeasible, never
/// silent": coverage minima and mandatory special requests. A solution
/// that only relieves those via slack is reported the same way a proven
/// infeasibility would be, since from the caller's perspective it is
/// exactly that, no roster exists that honours the hard guarantees.
pub fn solve(
    assembled: AssembledModel,
    templates: &[ShiftTemplate],
    employees: &[Employee],
    time_limit_seconds: u64,
) -> RosterResult<SolveOutcome> {
    let AssembledModel {
        model,
        vars,
        objective,
        coverage_slacks,
        special_request_slacks,
    } = assembled;

    tracing::debug!(
        variables = vars.entries.len(),
        time_limit_seconds,
        "invoking solver"
    );

    let solution = model.minimize(objective).map_err(|err| {
        RosterError::NoFeasibleSolution {
            status: "UNKNOWN".to_string(),
            message: format!("solver did not return a result within budget: {err}"),
        }
    })?;

    let unmet_coverage: Vec<_> = coverage_slacks
        .iter()
        .filter(|s| solution.get_int(s.under_min_am) > 0 || solution.get_int(s.under_min_pm) > 0)
        .collect();
    let missed_requests: Vec<_> = special_request_slacks
        .iter()
        .filter(|s| solution.get_int(s.missed) > 0)
        .collect();

    if !unmet_coverage.is_empty() || !missed_requests.is_empty() {
        return Err(RosterError::NoFeasibleSolution {
            status: "INFEASIBLE".to_string(),
            message: format!(
                "{} shop/day pairs below coverage minima, {} mandatory special requests unmet",
                unmet_coverage.len(),
                missed_requests.len()
            ),
        });
    }

    let mut shifts = Vec::new();
    let mut employee_hours_tenths: HashMap<EmployeeId, i64> =
        employees.iter().map(|e| (e.id, 0)).collect();

    for entry in &vars.entries {
        if solution.get_int(entry.var_id) != 1 {
            continue;
        }
        let template = templates[entry.template_index];
        *employee_hours_tenths.entry(entry.employee_id).or_insert(0) +=
            template.duration_tenths as i64;
        shifts.push(RawShift {
            employee_id: entry.employee_id,
            template,
        });
    }

    tracing::info!(shifts = shifts.len(), "solve produced a feasible roster");

    Ok(SolveOutcome {
        shifts,
        employee_hours_tenths,
    })
}

/// Shop lookup helper used by later pipeline stages; kept here since it is
/// solver-output-shaped (by shop id) rather than config-shaped.
pub fn shops_by_id(shops: &[NormalizedShop]) -> HashMap<u32, &NormalizedShop> {
    shops.iter().map(|s| (s.shop.id, s)).collect()
}
