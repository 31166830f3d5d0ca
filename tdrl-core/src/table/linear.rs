//! Linear value function over binary features.
use crate::error::TdrlError;
use anyhow::Result;
use log::info;
use std::{
    fs,
    io::{Read, Write},
    path::Path,
};

/// State values as a weighted sum of binary features.
///
/// With a binary feature vector `x`, the value is `w . x` and the gradient with respect
/// to `w` is `x` itself, so only the weights of active features are touched.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearValue {
    weights: Vec<f64>,
}

impl LinearValue {
    /// Zero weights for `n_features` features.
    pub fn new(n_features: usize) -> Self {
        Self {
            weights: vec![0.0; n_features],
        }
    }

    /// The number of features.
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// The weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Value of the feature vector whose active indices are `active`.
    pub fn value(&self, active: &[usize]) -> f64 {
        active.iter().map(|i| self.weights[*i]).sum()
    }

    /// Semi-gradient step towards `target`: `w_i += rate * (target - w . x)` for active `i`.
    ///
    /// Returns the error before the update.
    pub fn update(&mut self, active: &[usize], target: f64, rate: f64) -> f64 {
        let delta = target - self.value(active);
        for i in active {
            self.weights[*i] += rate * delta;
        }
        delta
    }

    /// Writes the weights to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let buf = bincode::serialize(&self.weights)?;
        let mut file = fs::File::create(path)?;
        file.write_all(&buf)?;
        info!("Saved {} weights to {:?}", self.n_features(), path);
        Ok(())
    }

    /// Reads weights written by [`LinearValue::save`], expecting `n_features` of them.
    pub fn load(path: impl AsRef<Path>, n_features: usize) -> Result<Self> {
        let mut file = fs::OpenOptions::new().read(true).open(path.as_ref())?;
        let mut buf = Vec::<u8>::new();
        file.read_to_end(&mut buf)?;
        let weights: Vec<f64> = bincode::deserialize(&buf[..])?;
        if weights.len() != n_features {
            return Err(TdrlError::StateSpaceMismatch(format!(
                "snapshot has {} features, expected {}",
                weights.len(),
                n_features
            ))
            .into());
        }
        Ok(Self { weights })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_update_touches_active_weights_only() {
        let mut v = LinearValue::new(4);
        let delta = v.update(&[0, 2], 1.0, 0.5);
        assert_eq!(delta, 1.0);
        assert_eq!(v.weights(), &[0.5, 0.0, 0.5, 0.0]);
        assert_eq!(v.value(&[0, 2]), 1.0);
    }

    #[test]
    fn test_chain_converges() {
        // Two states feeding each other with reward 1.
        let mut v = LinearValue::new(2);
        let g = 0.5;
        for _ in 0..2000 {
            let target = 1.0 + g * v.value(&[1]);
            v.update(&[0], target, 0.1);
            let target = 1.0 + g * v.value(&[0]);
            v.update(&[1], target, 0.1);
        }
        assert!((v.value(&[0]) - 2.0).abs() < 1e-3);
        assert!((v.value(&[1]) - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_save_and_load() -> anyhow::Result<()> {
        let mut v = LinearValue::new(3);
        v.update(&[1], -2.0, 0.3);

        let tmp_dir = TempDir::new("linear_value")?;
        let path = tmp_dir.path().join("weights.bin");
        v.save(&path)?;
        assert_eq!(LinearValue::load(&path, 3)?, v);

        let err = LinearValue::load(&path, 4).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TdrlError>(),
            Some(TdrlError::StateSpaceMismatch(_))
        ));
        Ok(())
    }
}
