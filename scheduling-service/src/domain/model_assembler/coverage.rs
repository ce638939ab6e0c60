//! Coverage hard constraints: §4.4 bullet 6. Enforced with bounded slack
//! variables rather than bare lower bounds, so a shop that cannot possibly
//! be covered does not make the whole model infeasible, it shows up as a
//! heavily penalised (but representable) slack in the objective instead.
//! `objective.rs` reads the slack handles this module returns back out and
//! weights them.

use selen::prelude::*;

use crate::domain::entities::{CoverageMode, DemandEntry, ShiftTemplate, ShiftType, ShopId};

use super::variables::VarIndex;

/// One pair of coverage slacks per (shop, day): how far AM/PM coverage
/// falls short of the hard-ish minimum, and how far it falls short of the
/// (softer) target on top of that.
#[derive(Debug, Clone, Copy)]
pub struct CoverageSlack {
    pub shop_id: ShopId,
    pub day: u8,
    pub under_min_am: VarId,
    pub under_min_pm: VarId,
    pub under_target_am: VarId,
    pub under_target_pm: VarId,
    pub over_coverage: VarId,
}

pub fn apply(
    model: &mut Model,
    demands: &[DemandEntry],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
    full_day_counts_as_both: bool,
) -> Vec<CoverageSlack> {
    let mut slacks = Vec::with_capacity(demands.len());

    for demand in demands {
        let Some(indices) = vars.by_shop_day.get(&(demand.shop_id, demand.day)) else {
            continue;
        };

        let (am_ids, pm_ids, full_ids, all_ids) =
            partition_by_type(indices, templates, vars, full_day_counts_as_both);

        let effective_min_am = if demand.is_mandatory {
            demand.target_am
        } else {
            demand.min_am
        };
        let effective_min_pm = if demand.is_mandatory {
            demand.target_pm
        } else {
            demand.min_pm
        };

        let under_min_am = bound_below(model, &am_ids, effective_min_am as i32);
        let under_min_pm = bound_below(model, &pm_ids, effective_min_pm as i32);
        let under_target_am = bound_below(model, &am_ids, demand.target_am as i32);
        let under_target_pm = bound_below(model, &pm_ids, demand.target_pm as i32);

        // Coverage-mode hard disallow: a demand entry whose coverage mode
        // forbids FULL (e.g. the large-shop Sunday override) zeroes out
        // every FULL variable for this (shop, day) instead of just letting
        // the soft FULL-shift penalty discourage it.
        if !coverage_mode_allows(demand.coverage_mode, ShiftType::Full) {
            for &full_var in &full_ids {
                model.int_lin_le(&[1], &[full_var], 0);
            }
        }

        // FULL-only cap at non-solo shops: at most two FULL shifts a day.
        if !demand.is_solo {
            if !full_ids.is_empty() {
                let coeffs = vec![1; full_ids.len()];
                model.int_lin_le(&coeffs, &full_ids, 2);
            }
        } else {
            // Solo-day exclusivity: choosing a FULL shift forbids any AM/PM
            // that day, and headcount across the day caps at 2.
            if !full_ids.is_empty() {
                let full_chosen = model.bool_or(&full_ids);
                let big_m_am = am_ids.len().max(1) as i32;
                let big_m_pm = pm_ids.len().max(1) as i32;
                if !am_ids.is_empty() {
                    let mut coeffs = vec![1; am_ids.len()];
                    let mut ids = am_ids.clone();
                    coeffs.push(big_m_am);
                    ids.push(full_chosen);
                    model.int_lin_le(&coeffs, &ids, big_m_am);
                }
                if !pm_ids.is_empty() {
                    let mut coeffs = vec![1; pm_ids.len()];
                    let mut ids = pm_ids.clone();
                    coeffs.push(big_m_pm);
                    ids.push(full_chosen);
                    model.int_lin_le(&coeffs, &ids, big_m_pm);
                }
            }
            if !all_ids.is_empty() {
                let coeffs = vec![1; all_ids.len()];
                model.int_lin_le(&coeffs, &all_ids, 2);
            }
        }

        // Unique headcount at the shop that day, capped at maxStaff, with a
        // slack for the soft "over-coverage per extra body" penalty above
        // whichever of the two halves wants more people.
        let desired = demand.target_am.max(demand.target_pm);
        let over_coverage = if all_ids.is_empty() {
            model.int(0, 0)
        } else {
            let headcount_cap = demand.max_staff.max(desired);
            let over = model.int(0, headcount_cap as i32);
            let mut coeffs = vec![1; all_ids.len()];
            let mut ids = all_ids.clone();
            coeffs.push(-1);
            ids.push(over);
            model.int_lin_le(&coeffs, &ids, desired as i32);

            let cap_coeffs = vec![1; all_ids.len()];
            model.int_lin_le(&cap_coeffs, &all_ids, demand.max_staff as i32);
            over
        };

        slacks.push(CoverageSlack {
            shop_id: demand.shop_id,
            day: demand.day,
            under_min_am,
            under_min_pm,
            under_target_am,
            under_target_pm,
            over_coverage,
        });
    }

    slacks
}

/// Posts `sum(ids) + slack >= bound` (as `-sum(ids) - slack <= -bound`) and
/// returns the slack variable, bounded so it can never exceed `bound`.
fn bound_below(model: &mut Model, ids: &[VarId], bound: i32) -> VarId {
    let bound = bound.max(0);
    let slack = model.int(0, bound);
    if ids.is_empty() {
        // No eligible coverage at all: the slack absorbs the full shortfall.
        let coeffs = vec![-1];
        let vars = vec![slack];
        model.int_lin_le(&coeffs, &vars, -bound);
        return slack;
    }
    let mut coeffs = vec![-1; ids.len()];
    let mut vars = ids.to_vec();
    coeffs.push(-1);
    vars.push(slack);
    model.int_lin_le(&coeffs, &vars, -bound);
    slack
}

pub(crate) type Partitioned = (Vec<VarId>, Vec<VarId>, Vec<VarId>, Vec<VarId>);

pub(crate) fn partition_by_type(
    indices: &[usize],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
    full_day_counts_as_both: bool,
) -> Partitioned {
    let mut am = Vec::new();
    let mut pm = Vec::new();
    let mut full = Vec::new();
    let mut all = Vec::new();

    for &i in indices {
        let entry = &vars.entries[i];
        all.push(entry.var_id);
        match templates[entry.template_index].shift_type {
            ShiftType::Am => am.push(entry.var_id),
            ShiftType::Pm => pm.push(entry.var_id),
            ShiftType::Full => {
                full.push(entry.var_id);
                if full_day_counts_as_both {
                    am.push(entry.var_id);
                    pm.push(entry.var_id);
                }
            }
        }
    }

    (am, pm, full, all)
}

pub fn coverage_mode_allows(mode: CoverageMode, shift_type: ShiftType) -> bool {
    match mode {
        CoverageMode::Split => shift_type != ShiftType::Full,
        CoverageMode::FullDayOnly => shift_type == ShiftType::Full,
        CoverageMode::Flexible => true,
    }
}
