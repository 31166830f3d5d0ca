//! Mapping continuous observations to discrete states and binary features.
mod binning;
mod tile;
pub use binning::{BinSpec, Discretizer};
use serde::{Deserialize, Serialize};
pub use tile::TileCoder;

/// A discrete state: one bucket index per observation dimension.
///
/// Equality and hashing are structural over the indices.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State(pub Vec<usize>);

impl State {
    /// Returns the bucket indices.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// The number of dimensions.
    pub fn dim(&self) -> usize {
        self.0.len()
    }
}

/// A binary feature representation of observations.
pub trait Features {
    /// The number of observation dimensions the features read.
    fn dim(&self) -> usize;

    /// The length of feature vectors.
    fn n_features(&self) -> usize;

    /// Indices of the features equal to one for `obs`.
    fn active(&self, obs: &[f64]) -> Vec<usize>;

    /// The dense binary feature vector of `obs`.
    fn dense(&self, obs: &[f64]) -> Vec<f64> {
        let mut x = vec![0.0; self.n_features()];
        for i in self.active(obs) {
            x[i] = 1.0;
        }
        x
    }
}

/// `n` evenly spaced values over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// The number of edges less than or equal to `v`.
///
/// This is the index of the first edge strictly greater than `v`, i.e. numpy's `digitize`
/// for increasing edges. Values below the first edge fall into bucket 0 and values at or
/// above the last edge into bucket `edges.len()`.
pub(crate) fn digitize(v: f64, edges: &[f64]) -> usize {
    edges.partition_point(|e| *e <= v)
}
