//! Epsilon-greedy exploration.
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer with a linear decay of epsilon over episodes.
///
/// Epsilon starts at `eps_start` and each call of [`EpsilonGreedy::anneal`] lowers it by
/// `(eps_start - eps_final) / decay_episodes`, until it reaches `eps_final`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// The number of annealed episodes.
    pub n_episodes: usize,

    /// Epsilon at the first episode.
    pub eps_start: f64,

    /// Epsilon after decay.
    pub eps_final: f64,

    /// The number of episodes to decay from `eps_start` to `eps_final`.
    pub decay_episodes: usize,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            n_episodes: 0,
            eps_start: 1.0,
            eps_final: 0.0,
            decay_episodes: 1000,
        }
    }
}

impl EpsilonGreedy {
    /// Constructs an explorer decaying from 1 to 0 in `decay_episodes` episodes.
    pub fn with_decay_episodes(decay_episodes: usize) -> Self {
        Self {
            decay_episodes,
            ..Self::default()
        }
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }

    /// Set the epsilon value after decay.
    pub fn eps_final(mut self, v: f64) -> Self {
        self.eps_final = v;
        self
    }

    /// Current epsilon.
    pub fn eps(&self) -> f64 {
        let d = (self.eps_start - self.eps_final) / self.decay_episodes.max(1) as f64;
        (self.eps_start - d * self.n_episodes as f64).max(self.eps_final)
    }

    /// Lowers epsilon by one decay step.
    pub fn anneal(&mut self) {
        self.n_episodes += 1;
    }

    /// With probability epsilon takes a uniformly random action among `n_actions`,
    /// otherwise the one given by `greedy`.
    pub fn action<R: Rng + ?Sized>(
        &self,
        n_actions: usize,
        rng: &mut R,
        greedy: impl FnOnce(&mut R) -> usize,
    ) -> usize {
        if rng.gen::<f64>() < self.eps() {
            rng.gen_range(0..n_actions)
        } else {
            greedy(rng)
        }
    }

    /// Action probabilities of the epsilon-greedy policy on `values`.
    ///
    /// The greedy mass `1 - eps` is split evenly among the actions tied at the maximum.
    pub fn probs(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len() as f64;
        let eps = self.eps();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let n_best = values.iter().filter(|v| **v == max).count() as f64;

        values
            .iter()
            .map(|v| match *v == max {
                true => eps / n + (1.0 - eps) / n_best,
                false => eps / n,
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_linear_decay_to_zero() {
        let mut explorer = EpsilonGreedy::with_decay_episodes(4);
        let mut eps = vec![explorer.eps()];
        for _ in 0..6 {
            explorer.anneal();
            eps.push(explorer.eps());
        }
        assert_eq!(eps, vec![1.0, 0.75, 0.5, 0.25, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_decay_is_floored_at_final() {
        let mut explorer = EpsilonGreedy::with_decay_episodes(10)
            .eps_start(0.5)
            .eps_final(0.1);
        for _ in 0..100 {
            explorer.anneal();
        }
        assert_eq!(explorer.eps(), 0.1);
    }

    #[test]
    fn test_greedy_when_eps_is_zero() {
        let mut rng = SmallRng::seed_from_u64(42);
        let explorer = EpsilonGreedy::default().eps_start(0.0);
        for _ in 0..100 {
            assert_eq!(explorer.action(4, &mut rng, |_| 3), 3);
        }
    }

    #[test]
    fn test_random_when_eps_is_one() {
        let mut rng = SmallRng::seed_from_u64(42);
        let explorer = EpsilonGreedy::default();
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[explorer.action(3, &mut rng, |_| 0)] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_probs_split_ties() {
        let explorer = EpsilonGreedy::default().eps_start(0.4);
        let probs = explorer.probs(&[1.0, 2.0, 2.0, 0.0]);
        for (p, q) in probs.iter().zip([0.1, 0.4, 0.4, 0.1]) {
            assert!((p - q).abs() < 1e-12);
        }
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }
}
