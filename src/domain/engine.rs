//! Reparenting engine with linear undo/redo.
//!
//! The arena's edges are authoritative. The supervisor index is a cache
//! patched together with the edges in `reparent`, which every mutating
//! operation funnels through.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{EmployeeData, OrgArena};
use crate::domain::entities::{Employee, EmployeeId, MoveRecord, RedoPolicy};
use crate::domain::error::{DomainError, DomainResult};

/// Owns one organization tree, its supervisor index and move history.
#[derive(Debug)]
pub struct OrgEngine {
    tree: OrgArena,
    root_id: EmployeeId,
    /// employee -> supervisor, root excluded
    supervisors: HashMap<EmployeeId, EmployeeId>,
    history: Vec<MoveRecord>,
    redo: Vec<MoveRecord>,
    policy: RedoPolicy,
}

impl OrgEngine {
    /// Build an engine from a nested root employee.
    ///
    /// Fails with `DuplicateEmployee` if an id occurs twice in the tree.
    #[instrument(level = "debug", skip(root), fields(root_id = root.id))]
    pub fn new(root: Employee) -> DomainResult<Self> {
        let mut tree = OrgArena::new();
        let mut stack: Vec<(Employee, Option<Index>)> = vec![(root, None)];

        while let Some((employee, parent)) = stack.pop() {
            let Employee {
                id,
                name,
                subordinates,
            } = employee;
            let idx = tree.insert_node(EmployeeData { id, name }, parent)?;
            // Reverse so the first subordinate is inserted first
            for sub in subordinates.into_iter().rev() {
                stack.push((sub, Some(idx)));
            }
        }

        Self::from_arena(tree)
    }

    /// Wrap an already built tree, deriving the supervisor index from its edges.
    pub fn from_arena(tree: OrgArena) -> DomainResult<Self> {
        let root = tree
            .root()
            .and_then(|idx| tree.get_node(idx))
            .ok_or_else(|| DomainError::Inconsistent("organization has no root".into()))?;
        let root_id = root.data.id;

        let mut supervisors = HashMap::new();
        for (idx, node, _) in tree.iter() {
            if let Some(parent_id) = tree.parent_id(idx) {
                supervisors.insert(node.data.id, parent_id);
            }
        }
        debug!(
            "engine ready: root={}, employees={}",
            root_id,
            tree.len()
        );

        Ok(Self {
            tree,
            root_id,
            supervisors,
            history: Vec::new(),
            redo: Vec::new(),
            policy: RedoPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: RedoPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RedoPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: RedoPolicy) {
        self.policy = policy;
    }

    /// Make `employee` a direct subordinate of `supervisor`.
    ///
    /// Rejections leave the engine untouched:
    /// - `RootInvolved` if either id is the root
    /// - `UnknownEmployee` if either id is not in the tree
    /// - `WouldCreateCycle` if `supervisor` is `employee` or one of its descendants
    #[instrument(level = "debug", skip(self))]
    pub fn move_employee(
        &mut self,
        employee: EmployeeId,
        supervisor: EmployeeId,
    ) -> DomainResult<MoveRecord> {
        if employee == self.root_id || supervisor == self.root_id {
            return Err(DomainError::RootInvolved(self.root_id));
        }
        let node = self.locate(employee)?;
        let target = self.locate(supervisor)?;
        if self.would_create_cycle(employee, supervisor)? {
            return Err(DomainError::WouldCreateCycle {
                employee,
                supervisor,
            });
        }

        let from = self.effective_supervisor(employee);
        let position = self.reparent(node, target, employee, supervisor, None)?;
        let record = MoveRecord {
            employee,
            from,
            to: supervisor,
            position,
        };
        self.history.push(record);

        if self.policy == RedoPolicy::Discard && !self.redo.is_empty() {
            debug!("discarding {} redo entries", self.redo.len());
            self.redo.clear();
        }
        debug!("moved {}", record);
        Ok(record)
    }

    /// Revert the most recent move. Returns the reverted record.
    #[instrument(level = "debug", skip(self))]
    pub fn undo(&mut self) -> DomainResult<MoveRecord> {
        let record = *self.history.last().ok_or(DomainError::NothingToUndo)?;
        self.reparent_by_id(record.employee, record.from, Some(record.position))?;
        self.history.pop();
        self.redo.push(record);
        debug!("undid {}", record);
        Ok(record)
    }

    /// Re-apply the most recently undone move. Returns the record pushed
    /// back onto the history.
    ///
    /// The entry may predate later moves (retained, or kept across a policy
    /// switch), so it is always re-checked for cycles and its `from` is taken
    /// from the current tree. A rejected entry stays on the redo stack.
    #[instrument(level = "debug", skip(self))]
    pub fn redo(&mut self) -> DomainResult<MoveRecord> {
        let pending = *self.redo.last().ok_or(DomainError::NothingToRedo)?;
        if self.would_create_cycle(pending.employee, pending.to)? {
            return Err(DomainError::WouldCreateCycle {
                employee: pending.employee,
                supervisor: pending.to,
            });
        }

        let from = self.effective_supervisor(pending.employee);
        let position = self.reparent_by_id(pending.employee, pending.to, None)?;
        let record = MoveRecord {
            from,
            position,
            ..pending
        };
        self.redo.pop();
        self.history.push(record);
        debug!("redid {}", record);
        Ok(record)
    }

    /// Breadth-first membership test from the root.
    pub fn employee_exists(&self, id: EmployeeId) -> bool {
        self.tree.find_bfs(id).is_some()
    }

    fn locate(&self, id: EmployeeId) -> DomainResult<Index> {
        self.tree
            .find_bfs(id)
            .ok_or(DomainError::UnknownEmployee(id))
    }

    /// Supervisor per the index, falling back to the root.
    fn effective_supervisor(&self, id: EmployeeId) -> EmployeeId {
        self.supervisors.get(&id).copied().unwrap_or(self.root_id)
    }

    /// Walk up from `supervisor` towards the root looking for `employee`.
    ///
    /// The walk is capped at the number of employees; running past the cap
    /// or onto an unknown id means the index is corrupt.
    fn would_create_cycle(
        &self,
        employee: EmployeeId,
        supervisor: EmployeeId,
    ) -> DomainResult<bool> {
        let mut current = supervisor;
        for _ in 0..=self.tree.len() {
            trace!("cycle walk at {}", current);
            if current == employee {
                return Ok(true);
            }
            if current == self.root_id {
                return Ok(false);
            }
            if self.tree.index_of(current).is_none() {
                return Err(DomainError::Inconsistent(format!(
                    "supervisor chain of {supervisor} reaches unknown employee {current}"
                )));
            }
            current = self.effective_supervisor(current);
        }
        Err(DomainError::Inconsistent(format!(
            "supervisor chain of {supervisor} does not reach the root"
        )))
    }

    fn reparent_by_id(
        &mut self,
        employee: EmployeeId,
        supervisor: EmployeeId,
        at: Option<usize>,
    ) -> DomainResult<usize> {
        let node = self.tree.index_of(employee).ok_or_else(|| {
            DomainError::Inconsistent(format!("history references unknown employee {employee}"))
        })?;
        let target = self.tree.index_of(supervisor).ok_or_else(|| {
            DomainError::Inconsistent(format!(
                "history references unknown supervisor {supervisor}"
            ))
        })?;
        self.reparent(node, target, employee, supervisor, at)
    }

    /// The single mutation point: tree edges and index change together.
    /// Returns the employee's position under its previous supervisor.
    fn reparent(
        &mut self,
        node: Index,
        target: Index,
        employee: EmployeeId,
        supervisor: EmployeeId,
        at: Option<usize>,
    ) -> DomainResult<usize> {
        let position = self.tree.relocate(node, target, at)?;
        self.supervisors.insert(employee, supervisor);
        Ok(position)
    }

    pub fn root_id(&self) -> EmployeeId {
        self.root_id
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Read access to the underlying tree, e.g. for rendering.
    pub fn tree(&self) -> &OrgArena {
        &self.tree
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&EmployeeData> {
        let idx = self.tree.index_of(id)?;
        self.tree.get_node(idx).map(|n| &n.data)
    }

    /// Direct subordinates of `id` in display order.
    pub fn subordinates(&self, id: EmployeeId) -> Option<Vec<EmployeeId>> {
        let node = self.tree.get_node(self.tree.index_of(id)?)?;
        Some(
            node.children
                .iter()
                .filter_map(|&c| self.tree.get_node(c))
                .map(|c| c.data.id)
                .collect(),
        )
    }

    /// Current supervisor from the index; None for the root and unknown ids.
    pub fn supervisor_of(&self, id: EmployeeId) -> Option<EmployeeId> {
        self.supervisors.get(&id).copied()
    }

    pub fn supervisor_index(&self) -> &HashMap<EmployeeId, EmployeeId> {
        &self.supervisors
    }

    /// Pre-order `(employee, depth)` pairs, root first at depth 0.
    pub fn iter(&self) -> impl Iterator<Item = (&EmployeeData, usize)> + '_ {
        self.tree.iter().map(|(_, node, depth)| (&node.data, depth))
    }

    /// Applied moves, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Undone moves, oldest first; `redo` takes the last one.
    pub fn redo_stack(&self) -> &[MoveRecord] {
        &self.redo
    }

    /// Nested copy of the current tree.
    pub fn snapshot(&self) -> DomainResult<Employee> {
        let mut built: HashMap<Index, Employee> = HashMap::new();
        for (idx, node) in self.tree.iter_postorder() {
            let subordinates = node
                .children
                .iter()
                .map(|c| {
                    built.remove(c).ok_or_else(|| {
                        DomainError::Inconsistent(format!(
                            "child of {} visited out of order",
                            node.data.id
                        ))
                    })
                })
                .collect::<DomainResult<Vec<_>>>()?;
            built.insert(
                idx,
                Employee {
                    id: node.data.id,
                    name: node.data.name.clone(),
                    subordinates,
                },
            );
        }
        self.tree
            .root()
            .and_then(|r| built.remove(&r))
            .ok_or_else(|| DomainError::Inconsistent("organization has no root".into()))
    }

    /// Verify that the tree is a single rooted tree and that the supervisor
    /// index agrees with its edges.
    #[instrument(level = "debug", skip(self))]
    pub fn check_invariants(&self) -> DomainResult<()> {
        if self.supervisors.contains_key(&self.root_id) {
            return Err(DomainError::Inconsistent(format!(
                "root {} has a supervisor entry",
                self.root_id
            )));
        }

        let mut reachable = 0;
        for (idx, node, _) in self.tree.iter().take(self.tree.len() + 1) {
            reachable += 1;
            let id = node.data.id;
            for &child in &node.children {
                let back = self.tree.get_node(child).and_then(|c| c.parent);
                if back != Some(idx) {
                    return Err(DomainError::Inconsistent(format!(
                        "child of {id} does not point back to it"
                    )));
                }
            }
            if id == self.root_id {
                continue;
            }
            let parent = self.tree.parent_id(idx);
            if parent != Some(self.effective_supervisor(id)) {
                return Err(DomainError::Inconsistent(format!(
                    "index says {id} reports to {}, tree says {:?}",
                    self.effective_supervisor(id),
                    parent
                )));
            }
        }
        if reachable != self.tree.len() {
            return Err(DomainError::Inconsistent(format!(
                "{} of {} employees reachable from the root",
                reachable,
                self.tree.len()
            )));
        }

        if let Some(stray) = self
            .supervisors
            .keys()
            .find(|id| self.tree.index_of(**id).is_none())
        {
            return Err(DomainError::Inconsistent(format!(
                "index entry for unknown employee {stray}"
            )));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn corrupt_index(&mut self, employee: EmployeeId, supervisor: EmployeeId) {
        self.supervisors.insert(employee, supervisor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> OrgEngine {
        let root = Employee::new(1, "CEO").with_subordinates(vec![
            Employee::new(2, "E1"),
            Employee::new(3, "E2"),
        ]);
        OrgEngine::new(root).unwrap()
    }

    #[test]
    fn test_index_derived_from_edges() {
        let engine = engine();
        assert_eq!(engine.supervisor_of(2), Some(1));
        assert_eq!(engine.supervisor_of(3), Some(1));
        assert_eq!(engine.supervisor_of(1), None);
        engine.check_invariants().unwrap();
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let root = Employee::new(1, "CEO").with_subordinates(vec![
            Employee::new(2, "E1"),
            Employee::new(2, "E1 again"),
        ]);
        assert_eq!(
            OrgEngine::new(root).unwrap_err(),
            DomainError::DuplicateEmployee(2)
        );
    }

    #[test]
    fn test_corrupted_index_loop_is_inconsistent() {
        let mut engine = engine();
        // 2 -> 3 -> 2 never reaches the root
        engine.corrupt_index(2, 3);
        engine.corrupt_index(3, 2);
        let err = engine.would_create_cycle(99, 2).unwrap_err();
        assert!(matches!(err, DomainError::Inconsistent(_)));
    }

    #[test]
    fn test_corrupted_index_unknown_id_is_inconsistent() {
        let mut engine = engine();
        engine.corrupt_index(3, 42);
        let err = engine.move_employee(2, 3).unwrap_err();
        assert!(matches!(err, DomainError::Inconsistent(_)));
        assert!(!err.is_rejection());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_check_invariants_detects_index_drift() {
        let mut engine = engine();
        engine.corrupt_index(2, 3);
        assert!(matches!(
            engine.check_invariants(),
            Err(DomainError::Inconsistent(_))
        ));
    }
}
