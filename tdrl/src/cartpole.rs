//! Settings shared by the CartPole programs.
use tdrl_core::BinSpec;

/// Number of edges per observation dimension.
pub const N_BINS: usize = 10;

/// Number of actions, push left and push right.
pub const N_ACTIONS: usize = 2;

/// Bins of cart position, cart velocity, pole angle and pole angular velocity.
pub fn bins() -> Vec<BinSpec> {
    vec![
        BinSpec::uniform(-2.4, 2.4, N_BINS),
        BinSpec::uniform(-4.0, 4.0, N_BINS),
        BinSpec::uniform(-0.209, 0.209, N_BINS),
        BinSpec::uniform(-4.0, 4.0, N_BINS),
    ]
}
