//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod engine;
pub mod entities;
pub mod error;

pub use arena::{EmployeeData, OrgArena, TreeNode};
pub use builder::OrgBuilder;
pub use engine::OrgEngine;
pub use entities::*;
pub use error::{DomainError, DomainResult};
