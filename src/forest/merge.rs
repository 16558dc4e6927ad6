//! Union of project forests coming from different decks.
//!
//! Keys match exactly here: every deck is expected to spell a project the same
//! way. The union is best-effort when shapes disagree and is not symmetric:
//!
//! - both nodes carry a payload: payloads are merged and the incoming node's
//!   children are dropped;
//! - otherwise the children are unioned recursively and whichever payload
//!   exists is kept.
//!
//! So merging a mixed node into a terminal one loses the mixed node's
//! children, while the reverse order keeps them.

use tracing::debug;

use crate::forest::node::{ProjectMap, ProjectNode};

pub fn merge_forest(mut base: ProjectMap, incoming: ProjectMap) -> ProjectMap {
    merge_into(&mut base, incoming);
    base
}

pub fn merge_into(base: &mut ProjectMap, incoming: ProjectMap) {
    for (name, node) in incoming {
        match base.get_mut(&name) {
            Some(existing) => {
                let current = std::mem::take(existing);
                *existing = merge_node(current, node);
            }
            None => {
                base.insert(name, node);
            }
        }
    }
}

pub fn merge_node(base: ProjectNode, incoming: ProjectNode) -> ProjectNode {
    let (base_status, mut base_children) = base.into_parts();
    let (incoming_status, incoming_children) = incoming.into_parts();

    match (base_status, incoming_status) {
        (Some(mut status), Some(other)) => {
            status.absorb(&other);
            if !incoming_children.is_empty() {
                debug!(
                    dropped = incoming_children.len(),
                    "both nodes carry a status, incoming children not merged"
                );
            }
            ProjectNode::from_parts(Some(status), base_children)
        }
        (base_status, incoming_status) => {
            merge_into(&mut base_children, incoming_children);
            ProjectNode::from_parts(base_status.or(incoming_status), base_children)
        }
    }
}
