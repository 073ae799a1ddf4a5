//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique employee identifier.
pub type EmployeeId = i64;

/// Employee with its subordinates, nested down to the leaves.
///
/// Used to hand a whole tree to the engine and to read its current
/// shape back out (`OrgEngine::snapshot`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub subordinates: Vec<Employee>,
}

impl Employee {
    pub fn new(id: EmployeeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            subordinates: Vec::new(),
        }
    }

    /// Builder-style helper for prepopulated trees.
    pub fn with_subordinates(mut self, subordinates: Vec<Employee>) -> Self {
        self.subordinates = subordinates;
        self
    }
}

/// One applied reparenting: `employee` went from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub employee: EmployeeId,
    pub from: EmployeeId,
    pub to: EmployeeId,
    /// Index the employee held in `from`'s subordinate list; undo puts it back there.
    pub position: usize,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.employee, self.from, self.to)
    }
}

/// What happens to pending redo entries when a new move is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedoPolicy {
    /// A new move clears the redo stack.
    #[default]
    Discard,
    /// Redo entries survive new moves and are re-validated on redo.
    Retain,
}

impl fmt::Display for RedoPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedoPolicy::Discard => write!(f, "discard"),
            RedoPolicy::Retain => write!(f, "retain"),
        }
    }
}

impl FromStr for RedoPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard" => Ok(RedoPolicy::Discard),
            "retain" => Ok(RedoPolicy::Retain),
            other => Err(format!(
                "unknown redo policy '{other}' (expected 'discard' or 'retain')"
            )),
        }
    }
}

/// A single engine operation as written in scripts and on the command line.
///
/// Syntax: `move:<employee>:<supervisor>`, `undo`, `redo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Move {
        employee: EmployeeId,
        supervisor: EmployeeId,
    },
    Undo,
    Redo,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Move {
                employee,
                supervisor,
            } => write!(f, "move:{employee}:{supervisor}"),
            Operation::Undo => write!(f, "undo"),
            Operation::Redo => write!(f, "redo"),
        }
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "undo" => return Ok(Operation::Undo),
            "redo" => return Ok(Operation::Redo),
            _ => {}
        }

        let mut parts = trimmed.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(cmd), Some(e), Some(s), None) if cmd.eq_ignore_ascii_case("move") => {
                let employee = e
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid employee id '{e}' in '{trimmed}'"))?;
                let supervisor = s
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid supervisor id '{s}' in '{trimmed}'"))?;
                Ok(Operation::Move {
                    employee,
                    supervisor,
                })
            }
            _ => Err(format!(
                "invalid operation '{trimmed}' (expected move:<employee>:<supervisor>, undo or redo)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operations() {
        assert_eq!(
            "move:2:3".parse::<Operation>().unwrap(),
            Operation::Move {
                employee: 2,
                supervisor: 3
            }
        );
        assert_eq!(" UNDO ".parse::<Operation>().unwrap(), Operation::Undo);
        assert_eq!("redo".parse::<Operation>().unwrap(), Operation::Redo);
    }

    #[test]
    fn test_parse_invalid_operations() {
        assert!("move:2".parse::<Operation>().is_err());
        assert!("move:a:3".parse::<Operation>().is_err());
        assert!("move:2:3:4".parse::<Operation>().is_err());
        assert!("jump:2:3".parse::<Operation>().is_err());
    }

    #[test]
    fn test_operation_display_parses_back() {
        let op = Operation::Move {
            employee: 7,
            supervisor: 1,
        };
        assert_eq!(op.to_string().parse::<Operation>().unwrap(), op);
    }

    #[test]
    fn test_redo_policy_from_str() {
        assert_eq!("Retain".parse::<RedoPolicy>().unwrap(), RedoPolicy::Retain);
        assert_eq!("discard".parse::<RedoPolicy>().unwrap(), RedoPolicy::Discard);
        assert!("keep".parse::<RedoPolicy>().is_err());
    }
}
