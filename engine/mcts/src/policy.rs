//! Action choosers used by expansion and rollout.
//!
//! The search asks a chooser to pick one candidate by index whenever it needs
//! to break symmetry between moves: which untried action to expand, and which
//! move to play next during a rollout. UCT's analysis assumes uniform random
//! choice, which is what [`UniformRandom`] provides; custom choosers can bias
//! rollouts with game knowledge.

use engine_core::GameState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Strategy for picking one of several candidate actions.
///
/// Implementations must return an index into `candidates`. The search never
/// calls a chooser with an empty slice; an out-of-range index is reported as
/// [`SearchError::InvalidChoice`](crate::SearchError::InvalidChoice).
///
/// Closures with the signature `FnMut(&S, &[S::Action]) -> usize` implement
/// this trait.
pub trait ActionChooser<S: GameState> {
    fn choose(&mut self, state: &S, candidates: &[S::Action]) -> usize;
}

impl<S, F> ActionChooser<S> for F
where
    S: GameState,
    F: FnMut(&S, &[S::Action]) -> usize,
{
    fn choose(&mut self, state: &S, candidates: &[S::Action]) -> usize {
        self(state, candidates)
    }
}

/// Uniform random choice driven by a seedable ChaCha20 generator.
#[derive(Debug, Clone)]
pub struct UniformRandom {
    rng: ChaCha20Rng,
}

impl UniformRandom {
    pub fn new(rng: ChaCha20Rng) -> Self {
        Self { rng }
    }

    /// Reproducible chooser from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha20Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha20Rng::from_entropy())
    }
}

impl<S: GameState> ActionChooser<S> for UniformRandom {
    fn choose(&mut self, _state: &S, candidates: &[S::Action]) -> usize {
        if candidates.len() <= 1 {
            return 0;
        }
        self.rng.gen_range(0..candidates.len())
    }
}
