//! Sparse decision-variable table. Stored as a flat `Vec` of
//! `(employee_id, template_index, var_id)` triples, indexed by hash maps
//! for the constraint-generation passes, replacing the quadratic scans a
//! naive implementation would do per constraint family.

use std::collections::HashMap;

use selen::prelude::*;

use crate::domain::entities::{Employee, EmployeeId, ShiftTemplate, ShopId};

use super::eligibility::EligibilityContext;

#[derive(Debug, Clone, Copy)]
pub struct VarEntry {
    pub employee_id: EmployeeId,
    pub template_index: usize,
    pub var_id: VarId,
}

pub struct VarIndex {
    pub entries: Vec<VarEntry>,
    pub by_employee: HashMap<EmployeeId, Vec<usize>>,
    pub by_employee_day: HashMap<(EmployeeId, u8), Vec<usize>>,
    pub by_shop_day: HashMap<(ShopId, u8), Vec<usize>>,
    pub by_employee_shop_day: HashMap<(EmployeeId, ShopId, u8), Vec<usize>>,
}

impl VarIndex {
    pub fn var_ids_for(&self, indices: &[usize]) -> Vec<VarId> {
        indices.iter().map(|&i| self.entries[i].var_id).collect()
    }
}

pub fn build_variables(
    model: &mut Model,
    employees: &[Employee],
    templates: &[ShiftTemplate],
    ctx: &EligibilityContext,
) -> VarIndex {
    let mut entries = Vec::new();
    let mut by_employee: HashMap<EmployeeId, Vec<usize>> = HashMap::new();
    let mut by_employee_day: HashMap<(EmployeeId, u8), Vec<usize>> = HashMap::new();
    let mut by_shop_day: HashMap<(ShopId, u8), Vec<usize>> = HashMap::new();
    let mut by_employee_shop_day: HashMap<(EmployeeId, ShopId, u8), Vec<usize>> = HashMap::new();

    for employee in employees {
        for (template_index, template) in templates.iter().enumerate() {
            if !ctx.is_eligible(employee, template) {
                continue;
            }
            let var_id = model.bool();
            let index = entries.len();
            entries.push(VarEntry {
                employee_id: employee.id,
                template_index,
                var_id,
            });
            by_employee.entry(employee.id).or_default().push(index);
            by_employee_day
                .entry((employee.id, template.day))
                .or_default()
                .push(index);
            by_shop_day
                .entry((template.shop_id, template.day))
                .or_default()
                .push(index);
            by_employee_shop_day
                .entry((employee.id, template.shop_id, template.day))
                .or_default()
                .push(index);
        }
    }

    VarIndex {
        entries,
        by_employee,
        by_employee_day,
        by_shop_day,
        by_employee_shop_day,
    }
}
