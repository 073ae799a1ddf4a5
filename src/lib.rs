//! Organization chart engine: reparent employees under new supervisors with
//! cycle checks and a linear undo/redo history.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{DomainError, Employee, MoveRecord, Operation, OrgBuilder, OrgEngine, RedoPolicy};
