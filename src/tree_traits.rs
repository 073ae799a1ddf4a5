//! Conversion of org trees into `termtree` for terminal display.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{EmployeeData, OrgArena};

pub trait TreeNodeConvert {
    fn to_tree_string(&self, show_ids: bool) -> Tree<String>;
}

fn label(data: &EmployeeData, show_ids: bool) -> String {
    if show_ids {
        format!("{} [{}]", data.name, data.id)
    } else {
        data.name.clone()
    }
}

impl TreeNodeConvert for OrgArena {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self, show_ids: bool) -> Tree<String> {
        fn build_tree(arena: &OrgArena, node_idx: Index, show_ids: bool) -> Tree<String> {
            match arena.get_node(node_idx) {
                Some(node) => {
                    let leaves = node
                        .children
                        .iter()
                        .map(|&child| build_tree(arena, child, show_ids));
                    Tree::new(label(&node.data, show_ids)).with_leaves(leaves)
                }
                None => Tree::new("?".to_string()),
            }
        }

        match self.root() {
            Some(root_idx) => build_tree(self, root_idx, show_ids),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
