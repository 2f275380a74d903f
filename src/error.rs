//! Error types for the ptrlogic crate.

use thiserror::Error;

/// Errors surfaced by this crate.
///
/// The grammar's constructors statically forbid ill-typed nesting, so the
/// AST and both folds over it are total: rendering, star counting, and
/// elaboration define no error kinds. What remains is the checked
/// construction path and the resource results of a satisfiability backend,
/// which are surfaced unchanged to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A checked constructor was handed a tree shape the grammar forbids.
    ///
    /// **Triggered by:** [`crate::Term::try_addr_of`] on anything but a
    /// variable (`&` only ever wraps a variable).
    #[error("invalid shape: expected {expected}, got `{got}`")]
    InvalidShape {
        /// What the grammar admits at this position
        expected: String,
        /// Rendering of the offending operand
        got: String,
    },

    /// The satisfiability backend exceeded its wall-clock deadline.
    #[error("solver timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// The satisfiability backend exceeded its search budget.
    #[error("solver search limit exceeded (max: {limit})")]
    SearchLimitExceeded {
        /// Maximum allowed search steps
        limit: usize,
    },
}

/// Result type for ptrlogic operations.
pub type Result<T> = std::result::Result<T, Error>;
