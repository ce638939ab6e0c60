//! Domain layer for the weekly roster solve: config loading, template and
//! demand derivation, CP model assembly, the solver driver, the
//! trim-and-rebalance pass, and result formatting. `solve` is the single
//! entry point the rest of the crate (and the CLI harness) calls.

pub mod config_loader;
pub mod demand_builder;
pub mod entities;
pub mod model_assembler;
pub mod result_formatter;
pub mod solver_driver;
pub mod template_builder;
pub mod trim_rebalance;
pub mod weights;

use shared::{RosterError, RosterResult, SolverSettings};

use entities::RosterRequest;
use model_assembler::eligibility::EligibilityContext;
use result_formatter::{NameLookup, RosterResponse};

/// Runs one full solve: load -> build templates/demands -> assemble model
/// -> solve -> trim & rebalance -> format. Mirrors the data flow in the
/// system overview exactly; each phase is traced so a deployment gets the
/// same operational visibility the teacher's services have without an
/// HTTP layer to hang the spans off of.
pub fn solve(request: &RosterRequest, settings: &SolverSettings) -> RosterResult<RosterResponse> {
    let loaded = tracing::info_span!("load_config").in_scope(|| config_loader::load(request))?;
    tracing::info!(
        employees = loaded.employees.len(),
        shops = loaded.shops.len(),
        "config loaded"
    );

    let templates = tracing::info_span!("build_templates")
        .in_scope(|| template_builder::build_templates(&loaded.shops))?;
    let demands = tracing::info_span!("build_demands")
        .in_scope(|| demand_builder::build_demands(&loaded.shops));
    tracing::info!(
        templates = templates.len(),
        demands = demands.len(),
        "templates and demands derived"
    );

    let explicit_assignments: Vec<(entities::EmployeeId, entities::ShopId, bool)> = request
        .assignments
        .iter()
        .map(|a| (a.employee_id, a.shop_id, a.is_primary))
        .collect();

    let eligibility = EligibilityContext::build(
        request.week_start,
        &loaded.shops,
        &request.leave_requests,
        loaded.fixed_days_off.clone(),
        explicit_assignments,
        request.excluded_employee_ids.clone(),
        request
            .am_only_employee_names
            .iter()
            .map(|n| n.trim().to_lowercase())
            .collect(),
        &request.previous_week_sunday_shifts,
    );

    let time_limit = request
        .time_limit_seconds
        .unwrap_or(settings.time_limit_seconds);

    let assembled = tracing::info_span!("assemble_model").in_scope(|| {
        model_assembler::assemble(model_assembler::AssembleInput {
            employees: &loaded.employees,
            shops: &loaded.shops,
            templates: &templates,
            demands: &demands,
            special_requests: &request.special_requests,
            eligibility: &eligibility,
            weekday_shift_cap_enabled: settings.weekday_shift_cap_enabled,
            full_day_counts_as_both: true,
            time_limit_seconds: time_limit,
        })
    });
    tracing::info!(variables = assembled.vars.entries.len(), "model assembled");

    let outcome = tracing::info_span!("solve_model")
        .in_scope(|| solver_driver::solve(assembled, &templates, &loaded.employees, time_limit))?;

    let trimmed = tracing::info_span!("trim_rebalance").in_scope(|| {
        trim_rebalance::run(
            &outcome,
            &loaded.employees,
            &loaded.shops,
            &demands,
            &request.special_requests,
        )
    });
    tracing::info!(shifts = trimmed.shifts.len(), "trim & rebalance complete");

    let names = NameLookup::build(&loaded.employees, &loaded.shops);
    let response = result_formatter::format_success(
        request.week_start,
        &trimmed,
        &loaded.employees,
        &names,
        "OPTIMAL",
    );

    Ok(response)
}

/// Runs a solve and always returns a `RosterResponse`, even on failure,
/// matching the boundary contract in spec §6/§7: `InvalidInput` aborts
/// with an error the caller must surface as HTTP 400-equivalent;
/// `NoFeasibleSolution` is folded into a `success=false` response instead
/// of a hard error, since `status=INFEASIBLE`/`UNKNOWN` is itself valid
/// output, not a failure of the core.
pub fn solve_to_response(request: &RosterRequest, settings: &SolverSettings) -> RosterResult<RosterResponse> {
    match solve(request, settings) {
        Ok(response) => Ok(response),
        Err(RosterError::NoFeasibleSolution { status, message }) => {
            tracing::warn!(%status, %message, "solve produced no feasible roster");
            Ok(result_formatter::format_failure(&status, message))
        }
        Err(other) => Err(other),
    }
}
