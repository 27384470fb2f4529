//! UCT tree node representation.
//!
//! Each node owns a snapshot of the game reached by taking `action` from the
//! parent's state. Nodes store the visit statistics used by UCB1 selection.

use engine_core::{GameState, PlayerId};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the UCT tree.
#[derive(Debug, Clone)]
pub struct UctNode<S: GameState> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Action that led to this node from parent (None for root)
    pub action: Option<S::Action>,

    /// Player who took `action` (None for root)
    pub mover: Option<PlayerId>,

    /// Game state at this node, never shared with another node
    pub state: S,

    /// Number of simulations that passed through this node
    pub visit_count: u32,

    /// Sum of attributed rewards.
    /// Mean reward = total_reward / visit_count
    pub total_reward: f64,

    /// Whether the state is game over or has no legal moves
    pub is_terminal: bool,

    /// Legal actions with no child yet, in the order the game listed them.
    pub untried: Vec<S::Action>,

    /// Children in creation order.
    pub children: Vec<NodeId>,
}

impl<S: GameState> UctNode<S> {
    /// Create a new root node.
    pub fn new_root(state: S) -> Self {
        Self::build(NodeId::NONE, None, None, state)
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, action: S::Action, mover: PlayerId, state: S) -> Self {
        Self::build(parent, Some(action), Some(mover), state)
    }

    fn build(
        parent: NodeId,
        action: Option<S::Action>,
        mover: Option<PlayerId>,
        state: S,
    ) -> Self {
        let untried = if state.is_game_over() {
            Vec::new()
        } else {
            distinct_moves(&state)
        };
        Self {
            parent,
            action,
            mover,
            is_terminal: untried.is_empty(),
            state,
            visit_count: 0,
            total_reward: 0.0,
            untried,
            children: Vec::new(),
        }
    }

    /// Check if this is the root node.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Calculate mean reward Q / N.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_reward(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_reward / self.visit_count as f64
        }
    }

    /// UCB1 score of this node as a child of a parent with `parent_visits`
    /// visits:
    ///
    /// Q/N + c * sqrt(2 * ln(N_parent) / N)
    ///
    /// Returns `None` when either count is zero, since the score is undefined.
    #[inline]
    pub fn ucb1(&self, parent_visits: u32, c: f64) -> Option<f64> {
        if self.visit_count == 0 || parent_visits == 0 {
            return None;
        }
        let n = self.visit_count as f64;
        let exploration = (2.0 * (parent_visits as f64).ln() / n).sqrt();
        Some(self.total_reward / n + c * exploration)
    }

    /// A node is fully expanded once every distinct legal action has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}

/// Legal moves of `state` with repeats removed, keeping first-seen order.
pub(crate) fn distinct_moves<S: GameState>(state: &S) -> Vec<S::Action> {
    let mut moves: Vec<S::Action> = Vec::new();
    for action in state.possible_moves() {
        if !moves.contains(&action) {
            moves.push(action);
        }
    }
    moves
}
