//! Settings shared by the MountainCar prediction programs.
use tdrl_agent::FixedPolicy;
use tdrl_core::{BinSpec, Discretizer, VecObs};

/// Push left.
pub const BACKWARD: usize = 0;

/// Push right.
pub const FORWARD: usize = 2;

/// Learning rates compared by the prediction programs.
pub const LEARNING_RATES: [f64; 3] = [0.1, 0.01, 0.001];

/// Observations whose estimated values are tracked during training.
pub fn probes() -> Vec<(String, VecObs)> {
    vec![
        ("near_exit".to_string(), VecObs(vec![0.43, 0.054])),
        ("left_side".to_string(), VecObs(vec![-1.1, 0.001])),
    ]
}

/// Pushes in the direction of the velocity, right when the car is at rest.
pub fn follow_velocity() -> FixedPolicy {
    Box::new(|obs: &[f64]| if obs[1] < 0.0 { BACKWARD } else { FORWARD })
}

/// Eight aggregated positions and velocities.
pub fn aggregation_bins() -> Vec<BinSpec> {
    vec![
        BinSpec::uniform(-1.2, 0.5, 8),
        BinSpec::uniform(-0.07, 0.07, 8),
    ]
}

/// Pushes left when the aggregated velocity falls in one of the four lowest buckets.
pub fn follow_aggregated_velocity(discretizer: &Discretizer) -> FixedPolicy {
    let discretizer = discretizer.clone();
    Box::new(move |obs: &[f64]| match discretizer.discretize(obs).indices()[1] < 4 {
        true => BACKWARD,
        false => FORWARD,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_policies() -> Result<()> {
        let policy = follow_velocity();
        assert_eq!(policy(&[-0.5, -0.01]), BACKWARD);
        assert_eq!(policy(&[-0.5, 0.0]), FORWARD);

        // The fourth velocity edge is -0.01.
        let discretizer = Discretizer::build(&aggregation_bins())?;
        let policy = follow_aggregated_velocity(&discretizer);
        assert_eq!(policy(&[-0.5, -0.011]), BACKWARD);
        assert_eq!(policy(&[-0.5, -0.009]), FORWARD);
        assert_eq!(policy(&[-0.5, 0.0]), FORWARD);
        Ok(())
    }
}
