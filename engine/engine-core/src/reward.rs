//! Terminal-state evaluation supplied by the caller of a search.

/// Evaluates a finished game from the searching player's perspective.
///
/// The result must lie in `[0, 1]`: `0.0` is the worst outcome for the
/// searcher and `1.0` the best. The engine only ever calls this on terminal
/// states, so implementations may return anything for unfinished games.
///
/// Any `Fn(&S) -> f64` closure is a reward function.
pub trait RewardFn<S> {
    /// Reward of `terminal` for the searching player.
    fn reward(&self, terminal: &S) -> f64;
}

impl<S, F> RewardFn<S> for F
where
    F: Fn(&S) -> f64,
{
    #[inline]
    fn reward(&self, terminal: &S) -> f64 {
        self(terminal)
    }
}
