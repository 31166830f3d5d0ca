//! Tile coding over two observation dimensions.
use super::{digitize, linspace, Features};
use crate::error::TdrlError;

/// Tile coding with several overlapping, offset layers of bins over a 2-dimensional
/// observation.
///
/// Each layer has `n_bins` edges per axis, hence `n_bins - 1` tiles per axis. An
/// observation activates one feature in a layer when it lies strictly inside the
/// layer on both axes. Layers are visited in order and the first layer that does not
/// cover the observation ends the evaluation: the remaining layers contribute nothing
/// even if they would cover it.
///
/// Within layer `l`, with `x` and `y` the bucket indices of the two values (both in
/// `1..n_bins`), the active feature is `x * y + l * (n_bins - 1)^2 - 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct TileCoder {
    layers: Vec<(Vec<f64>, Vec<f64>)>,
    n_bins: usize,
}

impl TileCoder {
    /// Constructs a tile coder from the `(x, y)` bin edges of each layer.
    ///
    /// All layers must have the same number of edges (at least 2) on both axes,
    /// finite and strictly increasing.
    pub fn new(layers: Vec<(Vec<f64>, Vec<f64>)>) -> Result<Self, TdrlError> {
        let n_bins = match layers.first() {
            Some((xs, _)) => xs.len(),
            None => {
                return Err(TdrlError::Configuration(
                    "tile coder needs at least one layer".to_string(),
                ))
            }
        };
        if n_bins < 2 {
            return Err(TdrlError::Configuration(format!(
                "tile coder needs at least 2 bins per axis, got {}",
                n_bins
            )));
        }

        for (l, (xs, ys)) in layers.iter().enumerate() {
            if xs.len() != n_bins || ys.len() != n_bins {
                return Err(TdrlError::Configuration(format!(
                    "layer {} does not have {} bins on both axes",
                    l, n_bins
                )));
            }
            if xs.iter().chain(ys.iter()).any(|e| !e.is_finite()) {
                return Err(TdrlError::Configuration(format!(
                    "layer {} has a non-finite bin edge",
                    l
                )));
            }
            let increasing = |es: &[f64]| es.windows(2).all(|w| w[0] < w[1]);
            if !increasing(xs) || !increasing(ys) {
                return Err(TdrlError::Configuration(format!(
                    "bin edges of layer {} are not increasing",
                    l
                )));
            }
        }

        Ok(Self { layers, n_bins })
    }

    /// The asymmetric tiling used for MountainCar (position, velocity).
    ///
    /// Layer `i` spans positions `[-1.2 + i*pw, 0.5 + i*pw/2]` and velocities
    /// `[-0.07 + 3*i*vw, 0.07 + 3*i*pw/2]` with `pw = 1.7 / n_bins / 2` and
    /// `vw = 0.14 / n_bins / 2`. The upper velocity bound is offset by the position
    /// width; the geometry is kept as is.
    pub fn mountain_car(n_bins: usize, n_layers: usize) -> Result<Self, TdrlError> {
        if n_bins < 2 || n_layers == 0 {
            return Err(TdrlError::Configuration(format!(
                "invalid tiling: {} bins, {} layers",
                n_bins, n_layers
            )));
        }
        let tiling_offset = 3.0;
        let pos_tile_width = (0.5 + 1.2) / n_bins as f64 * 0.5;
        let vel_tile_width = (0.07 + 0.07) / n_bins as f64 * 0.5;

        let layers = (0..n_layers)
            .map(|i| {
                let i = i as f64;
                let pos = linspace(
                    -1.2 + i * pos_tile_width,
                    0.5 + i * pos_tile_width / 2.0,
                    n_bins,
                );
                let vel = linspace(
                    -0.07 + tiling_offset * i * vel_tile_width,
                    0.07 + tiling_offset * i * pos_tile_width / 2.0,
                    n_bins,
                );
                (pos, vel)
            })
            .collect();

        Self::new(layers)
    }

    /// The number of tiles per axis in a layer.
    pub fn n_tiles(&self) -> usize {
        self.n_bins - 1
    }

    /// The number of layers.
    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }
}

impl Features for TileCoder {
    fn dim(&self) -> usize {
        2
    }

    fn n_features(&self) -> usize {
        self.n_tiles() * self.n_tiles() * self.n_layers()
    }

    fn active(&self, obs: &[f64]) -> Vec<usize> {
        let (x, y) = match obs {
            [x, y, ..] => (*x, *y),
            _ => return vec![],
        };
        let per_layer = self.n_tiles() * self.n_tiles();
        let last = self.n_bins - 1;
        let mut active = vec![];

        for (l, (xs, ys)) in self.layers.iter().enumerate() {
            let inside = x > xs[0] && x < xs[last] && y > ys[0] && y < ys[last];
            if !inside {
                break;
            }
            let ix = digitize(x, xs);
            let iy = digitize(y, ys);
            active.push(ix * iy + l * per_layer - 1);
        }

        active
    }
}
