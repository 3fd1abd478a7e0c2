//! Flattening blueprint books into a list of blueprints.

use crate::schema::{BlueprintData, BlueprintString, BookData};
use fbi_core::blueprint::Blueprint;
use tracing::debug;

/// A blueprint pulled out of a (possibly nested) book.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBlueprint {
    /// Position of each enclosing book slot, outermost first, counted in
    /// slot order from 0. Empty for a bare blueprint.
    pub path: Vec<usize>,
    pub label: Option<String>,
    pub blueprint: Blueprint,
}

impl LabeledBlueprint {
    /// The blueprint's own label, or `Blueprint <path>` numbered from 1.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => {
                let path: Vec<String> = self.path.iter().map(|i| (i + 1).to_string()).collect();
                format!("Blueprint {}", path.join("."))
            }
        }
    }
}

enum Node<'a> {
    Blueprint(&'a BlueprintData, Vec<usize>, Option<u64>),
    Book(&'a BookData, Vec<usize>, Option<u64>),
}

/// Every blueprint in `root`, depth first, each book's slots in index
/// order.
pub fn flatten(root: &BlueprintString) -> Vec<LabeledBlueprint> {
    let mut stack = vec![match root {
        BlueprintString::Blueprint(bp) => Node::Blueprint(bp, Vec::new(), None),
        BlueprintString::Book(book) => Node::Book(book, Vec::new(), None),
    }];
    let mut out = Vec::new();

    while let Some(node) = stack.pop() {
        match node {
            Node::Blueprint(bp, path, version) => out.push(LabeledBlueprint {
                path,
                label: bp.label.clone(),
                blueprint: bp.to_blueprint(version),
            }),
            Node::Book(book, path, version) => {
                let version = book.version.or(version);
                let mut entries: Vec<_> = book.blueprints.iter().collect();
                entries.sort_by_key(|e| e.index);

                let mut children = Vec::with_capacity(entries.len());
                for (pos, entry) in entries.into_iter().enumerate() {
                    let mut child_path = path.clone();
                    child_path.push(pos);
                    if let Some(bp) = &entry.blueprint {
                        children.push(Node::Blueprint(bp, child_path, version));
                    } else if let Some(nested) = &entry.blueprint_book {
                        children.push(Node::Book(nested, child_path, version));
                    } else {
                        debug!(index = entry.index, "skipping book slot without a blueprint");
                    }
                }
                // Reversed so the first slot is popped first.
                stack.extend(children.into_iter().rev());
            }
        }
    }
    out
}
