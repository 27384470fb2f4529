//! UCT tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! The whole arena lives for one search and is dropped with it.

use engine_core::{GameState, PlayerId};

use crate::config::Attribution;
use crate::node::{NodeId, UctNode};
use crate::search::{ChildStats, SearchError};

/// UCT tree with arena-based node storage.
#[derive(Debug)]
pub struct UctTree<S: GameState> {
    /// Arena storing all nodes
    nodes: Vec<UctNode<S>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<S: GameState> UctTree<S> {
    /// Create a new tree rooted at `root_state`.
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![UctNode::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &UctNode<S> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut UctNode<S> {
        &mut self.nodes[id.0 as usize]
    }

    fn allocate(&mut self, node: UctNode<S>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[UctNode<S>] {
        &self.nodes
    }

    /// Expand `parent_id` with one of its untried actions.
    ///
    /// The child's state is computed from the parent's state, which is left
    /// untouched. The mover recorded on the child is the parent's player to
    /// move.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        action: S::Action,
    ) -> Result<NodeId, SearchError> {
        let parent = self.get(parent_id);
        let Some(slot) = parent.untried.iter().position(|a| *a == action) else {
            if self.tried_actions(parent_id).any(|a| *a == action) {
                return Err(SearchError::InvariantViolation(format!(
                    "node {} already has a child for action {:?}",
                    parent_id.0, action
                )));
            }
            return Err(SearchError::IllegalAction(format!(
                "{:?} is not a legal action at node {}",
                action, parent_id.0
            )));
        };

        let mover = parent.state.current_player();
        let state = parent.state.apply_action(&action);
        let child_id = self.allocate(UctNode::new_child(parent_id, action, mover, state));

        let parent = self.get_mut(parent_id);
        parent.untried.remove(slot);
        parent.children.push(child_id);

        Ok(child_id)
    }

    /// Undo the most recent `add_child` for a child that was never visited.
    ///
    /// The child's action goes back into the parent's untried list at `slot`,
    /// so the parent looks exactly as it did before the expansion.
    pub fn discard_leaf(&mut self, child_id: NodeId, slot: usize) -> Result<(), SearchError> {
        let last = NodeId(self.nodes.len() as u32 - 1);
        let child = self.get(child_id);
        if child_id != last || child.is_root() || child.visit_count != 0 {
            return Err(SearchError::InvariantViolation(format!(
                "node {} is not an unvisited newest leaf",
                child_id.0
            )));
        }

        let Some(node) = self.nodes.pop() else {
            return Err(SearchError::InvariantViolation("empty arena".to_string()));
        };
        let parent = self.get_mut(node.parent);
        if parent.children.pop() != Some(child_id) {
            return Err(SearchError::InvariantViolation(format!(
                "node {} is not the newest child of node {}",
                child_id.0, node.parent.0
            )));
        }
        if let Some(action) = node.action {
            let slot = slot.min(parent.untried.len());
            parent.untried.insert(slot, action);
        }
        Ok(())
    }

    /// Actions of the existing children of a node, in creation order.
    pub fn tried_actions(&self, node_id: NodeId) -> impl Iterator<Item = &S::Action> + '_ {
        self.get(node_id)
            .children
            .iter()
            .filter_map(move |&id| self.get(id).action.as_ref())
    }

    /// Select the child of `node_id` with the highest UCB1 score for
    /// exploration coefficient `c`. Ties go to the earliest-created child.
    ///
    /// Fails when the node has no children or when the node or any child has
    /// never been visited.
    pub fn best_child(&self, node_id: NodeId, c: f64) -> Result<NodeId, SearchError> {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return Err(SearchError::InvariantViolation(format!(
                "best child requested for node {} which has no children",
                node_id.0
            )));
        }
        if node.visit_count == 0 {
            return Err(SearchError::InvariantViolation(format!(
                "node {} scored as a parent before being visited",
                node_id.0
            )));
        }

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let score = self
                .get(child_id)
                .ucb1(node.visit_count, c)
                .ok_or_else(|| {
                    SearchError::InvariantViolation(format!(
                        "child {} of node {} scored before being visited",
                        child_id.0, node_id.0
                    ))
                })?;
            // Strict comparison keeps the first child on ties
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((child_id, score));
            }
        }

        best.map(|(id, _)| id).ok_or_else(|| {
            SearchError::InvariantViolation(format!("node {} has no scorable child", node_id.0))
        })
    }

    /// Child of `node_id` with the most visits. Ties go to the earliest-created
    /// child. Returns None if the node has no children.
    pub fn most_visited_child(&self, node_id: NodeId) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32)> = None;
        for &child_id in &self.get(node_id).children {
            let visits = self.get(child_id).visit_count;
            if best.map_or(true, |(_, top)| visits > top) {
                best = Some((child_id, visits));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Backpropagate a rollout reward from a leaf to the root inclusive.
    ///
    /// `delta` is the reward from `searcher`'s point of view; `attribution`
    /// decides what each node on the path is credited with.
    pub fn backpropagate(
        &mut self,
        leaf_id: NodeId,
        delta: f64,
        attribution: Attribution,
        searcher: PlayerId,
    ) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.total_reward += attribution.credit(delta, node.mover, searcher);
            current_id = node.parent;
        }
    }

    /// Per-child statistics of the root, in creation order.
    pub fn root_children_stats(&self) -> Vec<ChildStats<S::Action>> {
        self.get(self.root)
            .children
            .iter()
            .filter_map(|&id| {
                let child = self.get(id);
                child.action.clone().map(|action| ChildStats {
                    action,
                    visits: child.visit_count,
                    mean_reward: child.mean_reward(),
                })
            })
            .collect()
    }

    /// Get tree statistics for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_mean_reward: root.mean_reward(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> usize {
        fn depth_recursive<S: GameState>(tree: &UctTree<S>, node_id: NodeId, depth: usize) -> usize {
            let node = tree.get(node_id);
            node.children
                .iter()
                .map(|&child_id| depth_recursive(tree, child_id, depth + 1))
                .max()
                .unwrap_or(depth)
        }
        depth_recursive(self, self.root, 0)
    }
}

/// Statistics about the tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_mean_reward: f64,
    pub max_depth: usize,
}
