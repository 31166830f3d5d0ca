//! Episode trajectories and their discounted returns.
use std::{collections::HashSet, hash::Hash, iter::Rev, vec::IntoIter};

/// The `(key, reward)` pairs of an episode in the order they were experienced.
///
/// The key identifies what the return is credited to, a state or a state-action pair.
/// The reward is the one received after leaving that key.
#[derive(Clone, Debug)]
pub struct Trajectory<K> {
    steps: Vec<(K, f64)>,
}

impl<K> Default for Trajectory<K> {
    fn default() -> Self {
        Self { steps: vec![] }
    }
}

impl<K> Trajectory<K> {
    /// Creates an empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn push(&mut self, key: K, reward: f64) {
        self.steps.push((key, reward));
    }

    /// The number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no step was pushed.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Discards all steps.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Consumes the trajectory, yielding `(key, G)` from the last step backwards.
    pub fn into_returns(self, gamma: f64) -> DiscountedReturns<K> {
        DiscountedReturns {
            steps: self.steps.into_iter().rev(),
            gamma,
            g: 0.0,
        }
    }
}

impl<K: Clone + Eq + Hash> Trajectory<K> {
    /// The return following the first visit of every key, in order of first visit.
    ///
    /// The return of step `t` is `G_t = r_t + gamma * G_{t+1}`, accumulated backwards
    /// from zero after the last step.
    pub fn first_visit_returns(&self, gamma: f64) -> Vec<(K, f64)> {
        let returns: Vec<(K, f64)> = self.clone().into_returns(gamma).collect();
        let mut seen = HashSet::new();
        returns
            .into_iter()
            .rev()
            .filter(|(k, _)| seen.insert(k.clone()))
            .collect()
    }
}

/// Iterator over the discounted returns of a trajectory, last step first.
///
/// Created by [`Trajectory::into_returns`].
pub struct DiscountedReturns<K> {
    steps: Rev<IntoIter<(K, f64)>>,
    gamma: f64,
    g: f64,
}

impl<K> Iterator for DiscountedReturns<K> {
    type Item = (K, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, r) = self.steps.next()?;
        self.g = self.gamma * self.g + r;
        Some((key, self.g))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_discounted_returns() {
        let mut t = Trajectory::new();
        t.push("a", 1.0);
        t.push("b", 0.0);
        t.push("c", 2.0);
        let returns: Vec<_> = t.into_returns(0.5).collect();
        assert_eq!(returns, vec![("c", 2.0), ("b", 1.0), ("a", 1.5)]);
    }

    #[test]
    fn test_first_visit_uses_return_of_first_occurrence() {
        // s0 is visited at steps 1 and 3.
        let mut t = Trajectory::new();
        t.push("s0", 1.0);
        t.push("s1", 1.0);
        t.push("s0", 1.0);
        let returns = t.first_visit_returns(1.0);
        assert_eq!(returns, vec![("s0", 3.0), ("s1", 2.0)]);
    }

    #[test]
    fn test_empty_trajectory() {
        let t = Trajectory::<u8>::new();
        assert!(t.is_empty());
        assert!(t.first_visit_returns(0.9).is_empty());
    }
}
