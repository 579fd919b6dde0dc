use crate::allocation::Attribute;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// User input failed local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An allocation session broke one of its invariants.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// An attribute name could not be parsed.
    #[error("unknown attribute: \"{0}\"")]
    UnknownAttribute(String),
}

/// Input rejected before anything is sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was left empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Password does not meet the strength rule.
    #[error(
        "password must be at least 8 characters and include upper and lower case letters, a digit, and a special character"
    )]
    WeakPassword,

    /// Email address is not plausibly formed.
    #[error("invalid email address: \"{0}\"")]
    InvalidEmail(String),
}

/// A broken allocation invariant. Never produced by the public operations
/// of [`AllocationSession`](crate::AllocationSession); reported by its
/// self-check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// A working value dropped below its baseline.
    #[error("{attribute} is {working}, below its baseline of {baseline}")]
    BelowBaseline {
        /// The offending attribute.
        attribute: Attribute,
        /// Current working value.
        working: i32,
        /// Baseline value.
        baseline: i32,
    },

    /// Spent and remaining points no longer add up to the initial budget.
    #[error("{spent} spent + {budget} remaining != {initial} initial points")]
    PointsNotConserved {
        /// Points spent across all attributes.
        spent: i64,
        /// Remaining budget.
        budget: u32,
        /// Budget the session started with.
        initial: u32,
    },
}
