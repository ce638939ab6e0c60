//! Soft objective: §4.4 "Soft objective" table. Every term is a weighted,
//! non-negative slack or penalty variable; the assembled objective is their
//! weighted sum, handed to `solver_driver` for minimisation.

use std::collections::HashMap;

use selen::prelude::*;

use crate::domain::config_loader::NormalizedShop;
use crate::domain::entities::{ContractKind, Employee, ShiftTemplate, ShiftType, ShopId};
use crate::domain::weights::{
    self, AM_PM_IMBALANCE_LARGE_SHOP, CROSS_SHOP_PENALTY, FULL_SHIFT_LARGE_SHOP,
    FULL_SHIFT_SMALL_SHOP, MISSED_SPECIAL_REQUEST, OVER_COVERAGE_PER_BODY,
    OVERTIME_TIER_1_HOURS, OVERTIME_TIER_2_HOURS, OVERTIME_TIER_3_HOURS,
    PM_EXCEEDS_AM_LARGE_SHOP, UNDER_MINIMUM_COVERAGE, UNDER_TARGET_COVERAGE,
    UNDER_WEEKLY_TARGET_PER_HOUR,
};

use super::coverage::{partition_by_type, CoverageSlack};
use super::special_requests::SpecialRequestSlack;
use super::variables::VarIndex;

/// Weighted terms accumulated while the objective is built. Each `(weight,
/// var)` pair is turned into a scaled variable via `Model::mul` right
/// before the final `Model::sum`, since `int_lin_le`/`int_lin_eq` only
/// constrain a linear combination against a constant and don't hand back a
/// variable representing the combination itself.
struct Terms {
    weight: Vec<i32>,
    var: Vec<VarId>,
}

impl Terms {
    fn new() -> Self {
        Self {
            weight: Vec::new(),
            var: Vec::new(),
        }
    }

    fn push(&mut self, weight: i32, var: VarId) {
        if weight == 0 {
            return;
        }
        self.weight.push(weight);
        self.var.push(var);
    }
}

/// Builds the weighted objective expression and returns its `VarId`.
/// `solver_driver` is the one that actually calls `Model::minimize` on it,
/// since that call consumes the model.
pub fn build(
    model: &mut Model,
    employees: &[Employee],
    shops: &[NormalizedShop],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
    coverage_slacks: &[CoverageSlack],
    special_request_slacks: &[SpecialRequestSlack],
    full_day_counts_as_both: bool,
) -> VarId {
    let mut terms = Terms::new();

    for slack in coverage_slacks {
        terms.push(UNDER_MINIMUM_COVERAGE, slack.under_min_am);
        terms.push(UNDER_MINIMUM_COVERAGE, slack.under_min_pm);
        terms.push(UNDER_TARGET_COVERAGE, slack.under_target_am);
        terms.push(UNDER_TARGET_COVERAGE, slack.under_target_pm);
        terms.push(OVER_COVERAGE_PER_BODY, slack.over_coverage);
    }

    for slack in special_request_slacks {
        terms.push(MISSED_SPECIAL_REQUEST, slack.missed);
    }

    add_weekly_hours_terms(model, employees, templates, vars, &mut terms);
    add_shape_terms(employees, templates, vars, &mut terms);
    add_full_shift_terms(shops, templates, vars, &mut terms);
    add_large_shop_balance_terms(
        model,
        shops,
        templates,
        vars,
        full_day_counts_as_both,
        &mut terms,
    );

    if terms.var.is_empty() {
        return model.int(0, 0);
    }
    let scaled: Vec<VarId> = terms
        .weight
        .iter()
        .zip(terms.var.iter())
        .map(|(&w, &v)| model.mul(v, Val::int(w)))
        .collect();
    model.sum(&scaled)
}

/// Per-employee weekly-hours terms: hours under target (excluding Sunday)
/// and progressive overtime tiers above it.
fn add_weekly_hours_terms(
    model: &mut Model,
    employees: &[Employee],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
    terms: &mut Terms,
) {
    for employee in employees {
        let Some(indices) = vars.by_employee.get(&employee.id) else {
            continue;
        };
        let weekday_indices: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| templates[vars.entries[i].template_index].day != 6)
            .collect();
        if weekday_indices.is_empty() {
            continue;
        }

        let ids: Vec<VarId> = weekday_indices
            .iter()
            .map(|&i| vars.entries[i].var_id)
            .collect();
        let durations: Vec<i32> = weekday_indices
            .iter()
            .map(|&i| templates[vars.entries[i].template_index].duration_tenths as i32)
            .collect();
        let max_possible: i32 = durations.iter().sum();
        let target = employee.weekly_target_tenths() as i32;

        // Under target: target - worked <= under_slack.
        let under = model.int(0, target.max(0));
        let mut coeffs = durations.clone();
        coeffs.push(1);
        let mut under_ids = ids.clone();
        under_ids.push(under);
        model.int_lin_le(&coeffs, &under_ids, target);
        // Restated the other direction below is unnecessary: minimisation
        // alone pushes `under` down to `max(0, target - worked)`.
        let _ = &coeffs;
        terms.push(UNDER_WEEKLY_TARGET_PER_HOUR, under);

        if max_possible <= target {
            continue;
        }

        let tier1_hours = OVERTIME_TIER_1_HOURS * 10;
        let tier2_hours = (OVERTIME_TIER_2_HOURS - OVERTIME_TIER_1_HOURS) * 10;
        let tier3_hours = (OVERTIME_TIER_3_HOURS - OVERTIME_TIER_2_HOURS) * 10;
        let overtime_cap = max_possible - target;
        let tier4_cap = (overtime_cap - tier1_hours - tier2_hours - tier3_hours).max(0);

        let tier1 = model.int(0, tier1_hours.min(overtime_cap).max(0));
        let tier2 = model.int(0, tier2_hours.max(0));
        let tier3 = model.int(0, tier3_hours.max(0));
        let tier4 = model.int(0, tier4_cap);

        // worked - tier1 - tier2 - tier3 - tier4 <= target.
        let mut over_coeffs = durations;
        over_coeffs.extend([-1, -1, -1, -1]);
        let mut over_ids = ids;
        over_ids.extend([tier1, tier2, tier3, tier4]);
        model.int_lin_le(&over_coeffs, &over_ids, target);

        terms.push(weights::overtime_tier_weight(1), tier1);
        terms.push(weights::overtime_tier_weight(2), tier2);
        terms.push(weights::overtime_tier_weight(3), tier3);
        terms.push(weights::overtime_tier_weight(4), tier4);
    }
}

/// Per-shift shape penalties: cross-shop work and FULL-day shifts,
/// weighted directly against the boolean decision variable itself (no
/// slack needed since these are unconditional linear costs).
fn add_shape_terms(
    employees: &[Employee],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
    terms: &mut Terms,
) {
    for employee in employees {
        let Some(indices) = vars.by_employee.get(&employee.id) else {
            continue;
        };
        for &i in indices {
            let entry = &vars.entries[i];
            let template = &templates[entry.template_index];

            if employee.contract != ContractKind::Student {
                // Cross-shop penalty applies to anyone with a declared
                // primary shop working somewhere else; employees with no
                // declared primary float freely across their company.
                if let Some(primary) = employee.primary_shop {
                    if template.shop_id != primary {
                        terms.push(CROSS_SHOP_PENALTY, entry.var_id);
                    }
                }
            }
        }
    }
}

/// Large-shop AM/PM balance penalties: symmetric imbalance and the
/// asymmetric PM-exceeds-AM excess, both linearised with `>=`-pairs that
/// the minimiser pulls down to their tight value.
fn add_large_shop_balance_terms(
    model: &mut Model,
    shops: &[NormalizedShop],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
    full_day_counts_as_both: bool,
    terms: &mut Terms,
) {
    let large_shop_ids: Vec<ShopId> = shops
        .iter()
        .filter(|s| s.is_large)
        .map(|s| s.shop.id)
        .collect();

    for &shop_id in &large_shop_ids {
        for day in 0..7u8 {
            let Some(indices) = vars.by_shop_day.get(&(shop_id, day)) else {
                continue;
            };
            let (am_ids, pm_ids, _full_ids, _all_ids) =
                partition_by_type(indices, templates, vars, full_day_counts_as_both);
            if am_ids.is_empty() && pm_ids.is_empty() {
                continue;
            }
            let cap = (am_ids.len() + pm_ids.len()) as i32;

            let imbalance = model.int(0, cap);
            post_abs_diff(model, &am_ids, &pm_ids, imbalance, cap);
            terms.push(AM_PM_IMBALANCE_LARGE_SHOP, imbalance);

            let pm_excess = model.int(0, cap);
            post_one_sided_excess(model, &pm_ids, &am_ids, pm_excess, cap);
            terms.push(PM_EXCEEDS_AM_LARGE_SHOP, pm_excess);
        }
    }
}

/// Posts `diff >= sum(a) - sum(b)` and `diff >= sum(b) - sum(a)`, the usual
/// two-sided linearisation of `diff >= |sum(a) - sum(b)|`.
fn post_abs_diff(model: &mut Model, a: &[VarId], b: &[VarId], diff: VarId, _cap: i32) {
    post_one_sided_excess(model, a, b, diff, _cap);
    post_one_sided_excess(model, b, a, diff, _cap);
}

/// Posts `excess >= sum(a) - sum(b)`, i.e.
/// `sum(a) - sum(b) - excess <= 0`.
fn post_one_sided_excess(model: &mut Model, a: &[VarId], b: &[VarId], excess: VarId, _cap: i32) {
    let mut coeffs = vec![1; a.len()];
    coeffs.extend(vec![-1; b.len()]);
    coeffs.push(-1);
    let mut ids = a.to_vec();
    ids.extend(b.iter().copied());
    ids.push(excess);
    model.int_lin_le(&coeffs, &ids, 0);
}

/// FULL-shift shape penalties, split out so large/small shops can be
/// weighted independently of the AM/PM balance pass above.
fn add_full_shift_terms(
    shops: &[NormalizedShop],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
    terms: &mut Terms,
) {
    let is_large: HashMap<ShopId, bool> =
        shops.iter().map(|s| (s.shop.id, s.is_large)).collect();

    for entry in &vars.entries {
        let template = &templates[entry.template_index];
        if template.shift_type != ShiftType::Full {
            continue;
        }
        let weight = if is_large.get(&template.shop_id).copied().unwrap_or(false) {
            FULL_SHIFT_LARGE_SHOP
        } else {
            FULL_SHIFT_SMALL_SHOP
        };
        terms.push(weight, entry.var_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_skip_zero_weight_pushes() {
        let mut model = Model::default();
        let v = model.bool();
        let mut terms = Terms::new();
        terms.push(0, v);
        assert!(terms.var.is_empty());
        terms.push(5, v);
        assert_eq!(terms.var.len(), 1);
    }
}
