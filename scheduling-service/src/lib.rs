//! Weekly staff roster engine: builds a feasible, near-optimal weekly
//! shift roster for a multi-shop retail chain from typed employee, shop,
//! leave and special-request input. The crate is pure and stateless;
//! HTTP, persistence and auth are external collaborators, left to a
//! caller such as the CLI harness in `bin/roster_cli.rs`.

pub mod domain;

pub use domain::entities::{
    Assignment, Employee, EmployeeId, ExplicitAssignment, LeaveRequest,
    PreviousWeekSundayShift, RosterRequest, Shop, ShopId, ShiftType, SpecialRequest,
};
pub use domain::result_formatter::{OutputShift, RosterResponse};
pub use domain::{solve, solve_to_response};
