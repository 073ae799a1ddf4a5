//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::EmployeeId;

/// Domain errors represent rejected operations and broken invariants.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot move or target the root: {0}")]
    RootInvolved(EmployeeId),

    #[error("unknown employee: {0}")]
    UnknownEmployee(EmployeeId),

    #[error("moving {employee} under {supervisor} would create a cycle")]
    WouldCreateCycle {
        employee: EmployeeId,
        supervisor: EmployeeId,
    },

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("duplicate employee id: {0}")]
    DuplicateEmployee(EmployeeId),

    #[error("employee {employee} reports to unknown supervisor {supervisor}")]
    OrphanedEmployee {
        employee: EmployeeId,
        supervisor: EmployeeId,
    },

    #[error("cycle detected in hierarchy at employee: {0}")]
    CycleDetected(EmployeeId),

    #[error("internal consistency failure: {0}")]
    Inconsistent(String),
}

impl DomainError {
    /// Recoverable rejections: state is unchanged and the caller may go on.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DomainError::RootInvolved(_)
                | DomainError::UnknownEmployee(_)
                | DomainError::WouldCreateCycle { .. }
                | DomainError::NothingToUndo
                | DomainError::NothingToRedo
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
