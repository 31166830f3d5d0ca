//! Value estimates.
mod linear;
mod q_table;
pub use linear::LinearValue;
pub use q_table::{QTable, Snapshot, StateAction, StateSpace};
use rand::Rng;

/// Index of the largest value, ties broken uniformly at random.
///
/// Ties are exact floating point equality. `values` must not be empty.
pub fn argmax_random_tie<R: Rng + ?Sized>(values: &[f64], rng: &mut R) -> usize {
    debug_assert!(!values.is_empty());
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ties: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == max)
        .map(|(i, _)| i)
        .collect();

    match ties.len() {
        0 => 0,
        1 => ties[0],
        n => ties[rng.gen_range(0..n)],
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_ties_are_broken_randomly() {
        let mut rng = SmallRng::seed_from_u64(42);
        let values = [1.0, 3.0, 3.0, 0.5];
        let mut counts = [0usize; 4];
        for _ in 0..1000 {
            counts[argmax_random_tie(&values, &mut rng)] += 1;
        }
        assert_eq!(counts[0], 0);
        assert_eq!(counts[3], 0);
        assert!(counts[1] > 0);
        assert!(counts[2] > 0);
    }

    #[test]
    fn test_unique_maximum() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(argmax_random_tie(&[0.0, -1.0, 2.0], &mut rng), 2);
        assert_eq!(argmax_random_tie(&[-3.0], &mut rng), 0);
    }
}
