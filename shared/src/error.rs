use thiserror::Error;

/// Error taxonomy for the roster engine, mirroring the three boundary error
/// kinds from the scheduling contract: caller-fixable input problems, a
/// proven-or-timed-out absence of a feasible roster, and anything else.
#[derive(Error, Debug)]
pub enum RosterError {
    /// A required field was missing, a date was malformed, or a structural
    /// invariant was violated. Caller-fixable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The solver proved no feasible roster exists under the hard
    /// constraints, or exhausted its time budget without an incumbent.
    /// `status` carries the engine's status name (`INFEASIBLE` or
    /// `UNKNOWN`) for the caller to surface verbatim.
    #[error("no feasible solution ({status}): {message}")]
    NoFeasibleSolution { status: String, message: String },

    /// Unexpected internal condition.
    #[error("internal error: {0}")]
    InternalError(String),
}

pub type RosterResult<T> = Result<T, RosterError>;
