//! Learning-rate schedule.
use serde::{Deserialize, Serialize};

/// Learning rate divided by a decay accumulator that grows every `interval` episodes.
///
/// The effective rate is `alpha / decay`. At the start of every episode whose index is a
/// multiple of `interval`, the first episode included, `decay` grows by `increment`.
/// An `interval` of zero keeps the rate constant.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LearningRate {
    /// Base learning rate.
    pub alpha: f64,

    /// Decay accumulator.
    pub decay: f64,

    /// Growth of the accumulator.
    pub increment: f64,

    /// Interval of growth in episodes.
    pub interval: usize,
}

impl Default for LearningRate {
    fn default() -> Self {
        Self::constant(0.1)
    }
}

impl LearningRate {
    /// A constant learning rate.
    pub fn constant(alpha: f64) -> Self {
        Self {
            alpha,
            decay: 1.0,
            increment: 0.0,
            interval: 0,
        }
    }

    /// Grows the decay accumulator by `increment` every `interval` episodes.
    pub fn decay(mut self, increment: f64, interval: usize) -> Self {
        self.increment = increment;
        self.interval = interval;
        self
    }

    /// The effective learning rate.
    pub fn rate(&self) -> f64 {
        self.alpha / self.decay
    }

    /// Called at the start of episode `episode`.
    pub fn on_episode(&mut self, episode: usize) {
        if self.interval > 0 && episode % self.interval == 0 {
            self.decay += self.increment;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decay_every_interval() {
        let mut lr = LearningRate::constant(1.0).decay(10.0, 100);
        lr.on_episode(0);
        assert_eq!(lr.rate(), 1.0 / 11.0);
        for i in 1..100 {
            lr.on_episode(i);
        }
        assert_eq!(lr.rate(), 1.0 / 11.0);
        lr.on_episode(100);
        assert_eq!(lr.rate(), 1.0 / 21.0);
    }

    #[test]
    fn test_constant() {
        let mut lr = LearningRate::constant(0.1);
        for i in 0..1000 {
            lr.on_episode(i);
        }
        assert_eq!(lr.rate(), 0.1);
    }
}
