//! Per-employee hard caps: at most one shift a day, weekly and weekday
//! shift caps, no back-to-back FULL days, and the student hour cap.

use selen::prelude::*;

use crate::domain::entities::{ContractKind, Employee, ShiftType, ShiftTemplate};

use super::variables::VarIndex;

pub fn apply(
    model: &mut Model,
    employees: &[Employee],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
    weekday_cap_enabled: bool,
) {
    at_most_one_per_day(model, employees, vars);
    weekly_shift_cap(model, employees, vars);
    if weekday_cap_enabled {
        weekday_shift_cap(model, employees, vars);
    }
    no_consecutive_full_days(model, employees, templates, vars);
    student_hour_cap(model, employees, templates, vars);
}

fn at_most_one_per_day(model: &mut Model, employees: &[Employee], vars: &VarIndex) {
    for employee in employees {
        for day in 0..7u8 {
            let Some(indices) = vars.by_employee_day.get(&(employee.id, day)) else {
                continue;
            };
            let ids = vars.var_ids_for(indices);
            let coeffs = vec![1; ids.len()];
            model.int_lin_le(&coeffs, &ids, 1);
        }
    }
}

fn weekly_shift_cap(model: &mut Model, employees: &[Employee], vars: &VarIndex) {
    for employee in employees {
        let Some(indices) = vars.by_employee.get(&employee.id) else {
            continue;
        };
        let ids = vars.var_ids_for(indices);
        let coeffs = vec![1; ids.len()];
        model.int_lin_le(&coeffs, &ids, 6);
    }
}

fn weekday_shift_cap(model: &mut Model, employees: &[Employee], vars: &VarIndex) {
    for employee in employees {
        let mut ids = Vec::new();
        for day in 0..5u8 {
            if let Some(indices) = vars.by_employee_day.get(&(employee.id, day)) {
                ids.extend(vars.var_ids_for(indices));
            }
        }
        if ids.is_empty() {
            continue;
        }
        let coeffs = vec![1; ids.len()];
        model.int_lin_le(&coeffs, &ids, 4);
    }
}

fn no_consecutive_full_days(
    model: &mut Model,
    employees: &[Employee],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
) {
    for employee in employees {
        for day in 0..6u8 {
            let today_full = full_vars_on_day(employee.id, day, templates, vars);
            let tomorrow_full = full_vars_on_day(employee.id, day + 1, templates, vars);
            let mut ids = today_full;
            ids.extend(tomorrow_full);
            if ids.is_empty() {
                continue;
            }
            let coeffs = vec![1; ids.len()];
            model.int_lin_le(&coeffs, &ids, 1);
        }
    }
}

fn full_vars_on_day(
    employee_id: u32,
    day: u8,
    templates: &[ShiftTemplate],
    vars: &VarIndex,
) -> Vec<VarId> {
    let Some(indices) = vars.by_employee_day.get(&(employee_id, day)) else {
        return Vec::new();
    };
    indices
        .iter()
        .filter(|&&i| templates[vars.entries[i].template_index].shift_type == ShiftType::Full)
        .map(|&i| vars.entries[i].var_id)
        .collect()
}

fn student_hour_cap(
    model: &mut Model,
    employees: &[Employee],
    templates: &[ShiftTemplate],
    vars: &VarIndex,
) {
    for employee in employees {
        if employee.contract != ContractKind::Student {
            continue;
        }
        let Some(indices) = vars.by_employee.get(&employee.id) else {
            continue;
        };
        let ids = vars.var_ids_for(indices);
        let coeffs: Vec<i32> = indices
            .iter()
            .map(|&i| templates[vars.entries[i].template_index].duration_tenths as i32)
            .collect();
        // 20 hours * 10 tenths/hour.
        model.int_lin_le(&coeffs, &ids, 200);
    }
}
