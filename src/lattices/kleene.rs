use crate::lattices::lattice::JoinSemiLattice;

/// Ascending Kleene-style fixpoint iteration:
///
///   x_{n+1} = x_n ⊔ f(x_n)
///
/// Stops as soon as an iteration adds nothing, or after `max_iters` rounds.
/// Returns the final state together with whether it is a fixpoint, so callers
/// can tell a converged result apart from one that ran out of rounds.
pub fn fixpoint_increasing<L, F>(mut state: L, f: F, max_iters: usize) -> (L, bool)
where
    L: JoinSemiLattice + Clone + PartialEq,
    F: Fn(&L) -> L,
{
    for _ in 0..max_iters {
        let next = state.join(&f(&state));
        if next == state {
            return (state, true);
        }
        state = next;
    }
    (state, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattices::set::Set;

    #[test]
    fn reaches_fixpoint_of_successor_closure() {
        // Closure of {0} under x -> x + 1 capped at 5.
        let seed: Set<u8> = [0].into_iter().collect();
        let (closed, converged) =
            fixpoint_increasing(seed, |s| s.iter().map(|x| (x + 1).min(5)).collect(), 16);

        assert!(converged);
        let expected: Set<u8> = (0..=5).collect();
        assert_eq!(closed, expected);
    }

    #[test]
    fn reports_exhausted_rounds() {
        let seed: Set<u8> = [0].into_iter().collect();
        let (partial, converged) =
            fixpoint_increasing(seed, |s| s.iter().map(|x| x.saturating_add(1)).collect(), 3);

        assert!(!converged);
        assert_eq!(partial.len(), 4);
    }

    #[test]
    fn already_closed_state_is_returned_unchanged() {
        let seed: Set<u8> = [1, 2].into_iter().collect();
        let (closed, converged) = fixpoint_increasing(seed.clone(), |s| s.clone(), 1);
        assert!(converged);
        assert_eq!(closed, seed);
    }
}
