//! CP model assembler: §4.4. Ties the sparse variable table, the
//! eligibility predicate, the hard-constraint families and the soft
//! objective into one `Model` ready for `solver_driver` to solve.

pub mod caps;
pub mod coverage;
pub mod eligibility;
pub mod objective;
pub mod special_requests;
pub mod variables;

use selen::prelude::*;

use crate::domain::config_loader::NormalizedShop;
use crate::domain::entities::{DemandEntry, Employee, ShiftTemplate, SpecialRequest};

use eligibility::EligibilityContext;
use variables::VarIndex;

/// Everything `solver_driver` needs after the model is assembled but
/// before it is handed to `Model::minimize`.
pub struct AssembledModel {
    pub model: Model,
    pub vars: VarIndex,
    pub objective: VarId,
    pub coverage_slacks: Vec<coverage::CoverageSlack>,
    pub special_request_slacks: Vec<special_requests::SpecialRequestSlack>,
}

pub struct AssembleInput<'a> {
    pub employees: &'a [Employee],
    pub shops: &'a [NormalizedShop],
    pub templates: &'a [ShiftTemplate],
    pub demands: &'a [DemandEntry],
    pub special_requests: &'a [SpecialRequest],
    pub eligibility: &'a EligibilityContext<'a>,
    pub weekday_shift_cap_enabled: bool,
    pub full_day_counts_as_both: bool,
    pub time_limit_seconds: u64,
}

pub fn assemble(input: AssembleInput<'_>) -> AssembledModel {
    let config = SolverConfig::new().with_timeout_seconds(input.time_limit_seconds);
    let mut model = Model::with_config(config);

    let vars = variables::build_variables(
        &mut model,
        input.employees,
        input.templates,
        input.eligibility,
    );

    caps::apply(
        &mut model,
        input.employees,
        input.templates,
        &vars,
        input.weekday_shift_cap_enabled,
    );

    let coverage_slacks = coverage::apply(
        &mut model,
        input.demands,
        input.templates,
        &vars,
        input.full_day_counts_as_both,
    );

    let special_request_slacks = special_requests::apply(
        &mut model,
        input.special_requests,
        input.templates,
        &vars,
    );

    let objective = objective::build(
        &mut model,
        input.employees,
        input.shops,
        input.templates,
        &vars,
        &coverage_slacks,
        &special_request_slacks,
        input.full_day_counts_as_both,
    );

    AssembledModel {
        model,
        vars,
        objective,
        coverage_slacks,
        special_request_slacks,
    }
}
