//! Org builder: assembles an engine from flat `(id, name, supervisor)` records.

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{EmployeeData, OrgArena};
use crate::domain::engine::OrgEngine;
use crate::domain::entities::{EmployeeId, RedoPolicy};
use crate::domain::error::{DomainError, DomainResult};

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

#[derive(Debug, Clone)]
struct Record {
    id: EmployeeId,
    name: String,
    supervisor: EmployeeId,
}

/// Constructs an organization tree from records in any order.
///
/// Subordinates keep the order in which their records were added.
#[derive(Debug)]
pub struct OrgBuilder {
    root: EmployeeData,
    records: Vec<Record>,
    policy: RedoPolicy,
}

impl OrgBuilder {
    pub fn new(root_id: EmployeeId, root_name: impl Into<String>) -> Self {
        Self {
            root: EmployeeData {
                id: root_id,
                name: root_name.into(),
            },
            records: Vec::new(),
            policy: RedoPolicy::default(),
        }
    }

    pub fn employee(
        mut self,
        id: EmployeeId,
        name: impl Into<String>,
        supervisor: EmployeeId,
    ) -> Self {
        self.add_employee(id, name, supervisor);
        self
    }

    pub fn add_employee(&mut self, id: EmployeeId, name: impl Into<String>, supervisor: EmployeeId) {
        self.records.push(Record {
            id,
            name: name.into(),
            supervisor,
        });
    }

    pub fn policy(mut self, policy: RedoPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the engine.
    ///
    /// Fails on duplicate ids, on supervisors that do not exist, and on
    /// records whose supervisor chain never reaches the root.
    #[instrument(level = "debug", skip(self), fields(root = self.root.id, records = self.records.len()))]
    pub fn build(self) -> TreeResult<OrgEngine> {
        let relationships = self.relationships()?;
        let tree = self.build_tree(&relationships)?;

        if tree.len() <= self.records.len() {
            // Anything left over hangs off a supervisor loop
            let placed: HashSet<EmployeeId> = tree.iter().map(|(_, n, _)| n.data.id).collect();
            if let Some(r) = self.records.iter().find(|r| !placed.contains(&r.id)) {
                return Err(DomainError::CycleDetected(r.id));
            }
        }
        debug!("built tree with {} employees", tree.len());

        Ok(OrgEngine::from_arena(tree)?.with_policy(self.policy))
    }

    /// supervisor -> subordinate record positions, in insertion order.
    fn relationships(&self) -> TreeResult<HashMap<EmployeeId, Vec<usize>>> {
        let mut known: HashSet<EmployeeId> = HashSet::from([self.root.id]);
        for r in &self.records {
            if !known.insert(r.id) {
                return Err(DomainError::DuplicateEmployee(r.id));
            }
        }

        let mut relationships: HashMap<EmployeeId, Vec<usize>> = HashMap::new();
        for (pos, r) in self.records.iter().enumerate() {
            if r.supervisor == r.id {
                return Err(DomainError::CycleDetected(r.id));
            }
            if !known.contains(&r.supervisor) {
                return Err(DomainError::OrphanedEmployee {
                    employee: r.id,
                    supervisor: r.supervisor,
                });
            }
            relationships.entry(r.supervisor).or_default().push(pos);
        }
        Ok(relationships)
    }

    fn build_tree(&self, relationships: &HashMap<EmployeeId, Vec<usize>>) -> TreeResult<OrgArena> {
        let mut tree = OrgArena::new();
        let root_idx = tree.insert_node(self.root.clone(), None)?;
        let mut stack: Vec<(EmployeeId, Index)> = vec![(self.root.id, root_idx)];

        while let Some((current, current_idx)) = stack.pop() {
            let Some(children) = relationships.get(&current) else {
                continue;
            };
            for &pos in children {
                let r = &self.records[pos];
                let idx = tree.insert_node(
                    EmployeeData {
                        id: r.id,
                        name: r.name.clone(),
                    },
                    Some(current_idx),
                )?;
                stack.push((r.id, idx));
            }
        }

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_keeps_record_order() {
        let engine = OrgBuilder::new(1, "CEO")
            .employee(4, "D", 2)
            .employee(2, "B", 1)
            .employee(3, "C", 1)
            .employee(5, "E", 2)
            .build()
            .unwrap();
        assert_eq!(engine.subordinates(1), Some(vec![2, 3]));
        assert_eq!(engine.subordinates(2), Some(vec![4, 5]));
        assert_eq!(engine.supervisor_of(5), Some(2));
        engine.check_invariants().unwrap();
    }

    #[test]
    fn test_build_root_only() {
        let engine = OrgBuilder::new(1, "CEO").build().unwrap();
        assert_eq!(engine.len(), 1);
        assert!(engine.supervisor_index().is_empty());
    }

    #[test]
    fn test_build_rejects_loops() {
        let err = OrgBuilder::new(1, "CEO")
            .employee(2, "B", 1)
            .employee(3, "C", 4)
            .employee(4, "D", 3)
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::CycleDetected(3));
    }

    #[test]
    fn test_build_rejects_self_supervision() {
        let err = OrgBuilder::new(1, "CEO")
            .employee(2, "B", 2)
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::CycleDetected(2));
    }
}
