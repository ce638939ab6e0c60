//! Mandatory special requests: §4.4 bullet 7. Modelled the same way as
//! coverage minima: a bounded `missed` slack rather than a bare hard
//! constraint, so one infeasible request doesn't blow up the whole model.
//! `solver_driver` inspects these slacks after solving and reports
//! `NoFeasibleSolution` rather than silently dropping a request, matching
//! the "fulfilled or infeasible, never silent" contract.

use selen::prelude::*;

use crate::domain::entities::{EmployeeId, ShiftTemplate, ShopId, SpecialRequest};

use super::variables::VarIndex;

#[derive(Debug, Clone, Copy)]
pub struct SpecialRequestSlack {
    pub employee_id: EmployeeId,
    pub shop_id: ShopId,
    pub day: u8,
    pub missed: VarId,
}

pub fn apply(
    model: &mut Model,
    requests: &[SpecialRequest],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
) -> Vec<SpecialRequestSlack> {
    let mut slacks = Vec::with_capacity(requests.len());

    for request in requests {
        let matching_ids: Vec<VarId> = vars
            .by_employee_shop_day
            .get(&(request.employee_id, request.shop_id, request.day))
            .map(|indices| {
                indices
                    .iter()
                    .filter(|&&i| {
                        templates[vars.entries[i].template_index].shift_type == request.shift_type
                    })
                    .map(|&i| vars.entries[i].var_id)
                    .collect()
            })
            .unwrap_or_default();

        let missed = if matching_ids.is_empty() {
            // No eligible template at all: the request can only ever be
            // missed, so fix the slack rather than post a useless sum.
            model.int(1, 1)
        } else {
            let slack = model.int(0, 1);
            let mut coeffs = vec![-1; matching_ids.len()];
            let mut ids = matching_ids;
            coeffs.push(-1);
            ids.push(slack);
            model.int_lin_le(&coeffs, &ids, -1);
            slack
        };

        slacks.push(SpecialRequestSlack {
            employee_id: request.employee_id,
            shop_id: request.shop_id,
            day: request.day,
            missed,
        });
    }

    slacks
}
