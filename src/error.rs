use thiserror::Error;

/// Failures surfaced by the enumeration, operation and filtering stages.
///
/// Incompatibility of a topology with an operation is *not* an error; the
/// oracle reports it as a normal return value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An operation was applied to the wrong number of operands.
    #[error("expected {expected} operands, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// An operand tuple mixed points and subsets.
    #[error("operands must be all points or all subsets")]
    InvalidOperandKind,

    /// Operations take at least one operand.
    #[error("operation arity must be positive")]
    InvalidArity,

    /// A point does not fit the subset encoding.
    #[error("point {point} lies outside the representable base set")]
    PointOutOfRange { point: usize },

    /// The requested work exceeds the configured or representable limits.
    #[error("aborted: {reason}")]
    ResourceExhausted { reason: String },

    /// The worker pool could not be started.
    #[error("worker pool: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, Error>;
