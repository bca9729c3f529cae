//! Tableau tree: arena of bracket nodes for display/export.
//!
//! Nodes are indexed by integer id; parent/child relationships are stored as
//! id lists so the graph carries no ownership cycles. The tree is never
//! consulted for scheduling decisions.

use crate::models::bout::BoutId;
use crate::models::stage::Stage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One bracket node: wraps a bout and links to up to two source nodes
/// (previous round) and at most one destination node (next round).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableauNode {
    pub id: usize,
    pub bout: BoutId,
    pub stage: Stage,
    pub parents: Vec<usize>,
    pub child: Option<usize>,
}

/// Arena of tableau nodes, grown round by round as the bracket advances.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tableau {
    pub nodes: Vec<TableauNode>,
    /// Bout id -> node id.
    index: HashMap<BoutId, usize>,
}

impl Tableau {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node for `bout`, linking it as the child of its `parents`.
    /// A parent keeps its first-registered child (the third-place bout lists
    /// the semi-final nodes as parents without overwriting their final link).
    pub fn add_node(&mut self, bout: BoutId, stage: Stage, parents: Vec<usize>) -> usize {
        let id = self.nodes.len();
        for &parent in &parents {
            if let Some(p) = self.nodes.get_mut(parent) {
                if p.child.is_none() {
                    p.child = Some(id);
                }
            }
        }
        self.nodes.push(TableauNode {
            id,
            bout,
            stage,
            parents,
            child: None,
        });
        self.index.insert(bout, id);
        id
    }

    pub fn node_for_bout(&self, bout: BoutId) -> Option<&TableauNode> {
        self.index.get(&bout).map(|&id| &self.nodes[id])
    }

    pub fn nodes_for_stage(&self, stage: Stage) -> Vec<&TableauNode> {
        self.nodes.iter().filter(|n| n.stage == stage).collect()
    }

    /// All stages present in the tree, in insertion (round) order.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = Vec::new();
        for node in &self.nodes {
            if stages.last() != Some(&node.stage) && !stages.contains(&node.stage) {
                stages.push(node.stage);
            }
        }
        stages
    }
}
