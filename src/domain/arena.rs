//! Arena-backed employee tree.
//!
//! Nodes carry both a parent link and an ordered child list. These edges
//! are the ground truth for the hierarchy; `relocate` is the only place
//! that rewires them.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::EmployeeId;
use crate::domain::error::{DomainError, DomainResult};

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeData {
    pub id: EmployeeId,
    pub name: String,
}

impl fmt::Display for EmployeeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: EmployeeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes, in insertion order
    pub children: Vec<Index>,
}

/// Arena-based tree structure for one organization.
///
/// Uses generational arena for memory-safe node references. Employee ids are
/// mapped to arena indices so a validated id resolves in O(1).
#[derive(Debug)]
pub struct OrgArena {
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
    ids: HashMap<EmployeeId, Index>,
}

impl Default for OrgArena {
    fn default() -> Self {
        Self::new()
    }
}

impl OrgArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            ids: HashMap::new(),
        }
    }

    /// Insert a node under `parent`, or as the root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: EmployeeData, parent: Option<Index>) -> DomainResult<Index> {
        if self.ids.contains_key(&data.id) {
            return Err(DomainError::DuplicateEmployee(data.id));
        }
        match parent {
            Some(parent_idx) if !self.arena.contains(parent_idx) => {
                return Err(DomainError::Inconsistent(format!(
                    "parent node for employee {} not in arena",
                    data.id
                )));
            }
            None if self.root.is_some() => {
                return Err(DomainError::Inconsistent(format!(
                    "second root inserted: employee {}",
                    data.id
                )));
            }
            _ => {}
        }

        let id = data.id;
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent,
            children: Vec::new(),
        });
        self.ids.insert(id, node_idx);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(node_idx),
            None => self.root = Some(node_idx),
        }

        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// O(1) id lookup via the id map.
    pub fn index_of(&self, id: EmployeeId) -> Option<Index> {
        self.ids.get(&id).copied()
    }

    /// Id of the node's parent, None for the root.
    pub fn parent_id(&self, idx: Index) -> Option<EmployeeId> {
        let parent = self.get_node(idx)?.parent?;
        self.get_node(parent).map(|n| n.data.id)
    }

    /// Breadth-first search from the root for `id`.
    ///
    /// Only finds employees actually reachable from the root.
    #[instrument(level = "trace", skip(self))]
    pub fn find_bfs(&self, id: EmployeeId) -> Option<Index> {
        let mut queue: VecDeque<Index> = self.root.into_iter().collect();
        while let Some(idx) = queue.pop_front() {
            let node = self.get_node(idx)?;
            if node.data.id == id {
                return Some(idx);
            }
            queue.extend(node.children.iter().copied());
        }
        None
    }

    /// Detach `node` from its parent's child list and insert it into
    /// `new_parent`'s list at `at` (clamped), or append when `at` is None.
    ///
    /// Returns the position the node held in its old parent's list. All
    /// lookups happen before any edge is touched, so a failure leaves the
    /// tree unchanged. Callers are responsible for ruling out cycles.
    #[instrument(level = "trace", skip(self))]
    pub fn relocate(&mut self, node: Index, new_parent: Index, at: Option<usize>) -> DomainResult<usize> {
        let old_parent = self
            .get_node(node)
            .ok_or_else(|| DomainError::Inconsistent("relocated node not in arena".into()))?
            .parent
            .ok_or_else(|| DomainError::Inconsistent("cannot relocate the root node".into()))?;
        if node == new_parent {
            return Err(DomainError::Inconsistent(
                "node cannot become its own parent".into(),
            ));
        }
        if !self.arena.contains(new_parent) {
            return Err(DomainError::Inconsistent("new parent not in arena".into()));
        }
        let old_pos = self
            .get_node(old_parent)
            .and_then(|p| p.children.iter().position(|&c| c == node))
            .ok_or_else(|| {
                DomainError::Inconsistent("node missing from its parent's child list".into())
            })?;

        if let Some(parent) = self.arena.get_mut(old_parent) {
            parent.children.remove(old_pos);
        }
        if let Some(parent) = self.arena.get_mut(new_parent) {
            let pos = at.map_or(parent.children.len(), |i| i.min(parent.children.len()));
            parent.children.insert(pos, node);
        }
        if let Some(moved) = self.arena.get_mut(node) {
            moved.parent = Some(new_parent);
        }
        Ok(old_pos)
    }

    /// Pre-order iterator yielding `(index, node, depth)`; the root has depth 0.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels in the tree; 0 when empty.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(_, _, d)| d + 1).max().unwrap_or(0)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a OrgArena,
    stack: Vec<(Index, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a OrgArena) -> Self {
        let stack = arena.root().map(|r| (r, 0)).into_iter().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (current_idx, depth) = self.stack.pop()?;
        let node = self.arena.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((current_idx, node, depth))
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a OrgArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a OrgArena) -> Self {
        let stack = arena.root().map(|r| (r, false)).into_iter().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
