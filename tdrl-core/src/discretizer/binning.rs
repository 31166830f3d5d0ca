//! Per-dimension binning.
use super::{digitize, linspace, Features, State};
use crate::error::TdrlError;
use serde::{Deserialize, Serialize};

/// Bin edges of a single observation dimension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinSpec {
    /// `n` evenly spaced edges over `[low, high]`.
    Uniform {
        /// First edge.
        low: f64,
        /// Last edge.
        high: f64,
        /// Number of edges.
        n: usize,
    },

    /// Explicit edges, strictly increasing.
    Edges(Vec<f64>),
}

impl BinSpec {
    /// Shorthand for [`BinSpec::Uniform`].
    pub fn uniform(low: f64, high: f64, n: usize) -> Self {
        Self::Uniform { low, high, n }
    }

    fn edges(&self, dim: usize) -> Result<Vec<f64>, TdrlError> {
        match self {
            Self::Uniform { low, high, n } => {
                if *n > 1 && low >= high {
                    return Err(TdrlError::Configuration(format!(
                        "dimension {}: low ({}) must be less than high ({})",
                        dim, low, high
                    )));
                }
                Ok(linspace(*low, *high, *n))
            }
            Self::Edges(edges) => Ok(edges.clone()),
        }
    }
}

/// Maps an observation to a [`State`] by binning each dimension.
///
/// For each dimension the bucket index is the number of edges less than or equal to the
/// value, so a dimension with `k` edges has buckets `0..=k`. Values outside the range of
/// the edges are not clamped: they land in the leading or trailing bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct Discretizer {
    edges: Vec<Vec<f64>>,
}

impl Discretizer {
    /// Constructs a discretizer from the edges of each dimension.
    ///
    /// Fails if there is no dimension, or if the edges of a dimension are empty,
    /// not finite or not strictly increasing.
    pub fn new(edges: Vec<Vec<f64>>) -> Result<Self, TdrlError> {
        if edges.is_empty() {
            return Err(TdrlError::Configuration(
                "discretizer needs at least one dimension".to_string(),
            ));
        }

        for (d, es) in edges.iter().enumerate() {
            if es.is_empty() {
                return Err(TdrlError::Configuration(format!(
                    "dimension {} has no bin edges",
                    d
                )));
            }
            if es.iter().any(|e| !e.is_finite()) {
                return Err(TdrlError::Configuration(format!(
                    "dimension {} has a non-finite bin edge",
                    d
                )));
            }
            if let Some(w) = es.windows(2).find(|w| w[0] >= w[1]) {
                return Err(TdrlError::Configuration(format!(
                    "bin edges of dimension {} are not increasing: {} >= {}",
                    d, w[0], w[1]
                )));
            }
        }

        Ok(Self { edges })
    }

    /// Constructs a discretizer from a spec for each dimension.
    pub fn build(specs: &[BinSpec]) -> Result<Self, TdrlError> {
        let edges = specs
            .iter()
            .enumerate()
            .map(|(d, spec)| spec.edges(d))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(edges)
    }

    /// The number of observation dimensions.
    pub fn dim(&self) -> usize {
        self.edges.len()
    }

    /// Bin edges of all dimensions.
    pub fn edges(&self) -> &[Vec<f64>] {
        &self.edges
    }

    /// The number of buckets of dimension `d`.
    pub fn n_buckets(&self, d: usize) -> usize {
        self.edges[d].len() + 1
    }

    /// The number of states enumerated by [`Discretizer::states`].
    pub fn n_states(&self) -> usize {
        (0..self.dim()).map(|d| self.n_buckets(d)).product()
    }

    /// Maps `obs` to its state.
    pub fn discretize(&self, obs: &[f64]) -> State {
        debug_assert_eq!(obs.len(), self.dim());
        State(
            obs.iter()
                .zip(self.edges.iter())
                .map(|(v, es)| digitize(*v, es))
                .collect(),
        )
    }

    /// Row-major index of `state` among all enumerated states.
    pub fn flat_index(&self, state: &State) -> usize {
        state
            .indices()
            .iter()
            .enumerate()
            .fold(0, |acc, (d, ix)| acc * self.n_buckets(d) + ix)
    }

    /// Inverse of [`Discretizer::flat_index`].
    pub fn state_at(&self, mut flat: usize) -> State {
        let mut ixs = vec![0; self.dim()];
        for d in (0..self.dim()).rev() {
            let n = self.n_buckets(d);
            ixs[d] = flat % n;
            flat /= n;
        }
        State(ixs)
    }

    /// Enumerates every state the discretizer can produce.
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        (0..self.n_states()).map(move |i| self.state_at(i))
    }

    /// Returns `true` if every index of `state` is a bucket of its dimension.
    pub fn contains(&self, state: &State) -> bool {
        state.dim() == self.dim()
            && state
                .indices()
                .iter()
                .enumerate()
                .all(|(d, ix)| *ix < self.n_buckets(d))
    }
}

/// One-hot encoding of the aggregated state.
impl Features for Discretizer {
    fn dim(&self) -> usize {
        self.edges.len()
    }

    fn n_features(&self) -> usize {
        self.n_states()
    }

    fn active(&self, obs: &[f64]) -> Vec<usize> {
        vec![self.flat_index(&self.discretize(obs))]
    }
}
