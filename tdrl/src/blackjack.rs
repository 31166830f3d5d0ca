//! Settings shared by the Blackjack programs and greedy play statistics.
use anyhow::Result;
use tdrl_core::{error::TdrlError, Agent, BinSpec, Env};

/// Number of actions, stick and hit.
pub const N_ACTIONS: usize = 2;

/// One bucket per player sum from 4 to 21 (sums below 4 and busts share the end buckets),
/// one per dealer card and two for the usable ace flag.
pub fn bins() -> Vec<BinSpec> {
    vec![
        BinSpec::Edges((4..=21).map(|s| s as f64 - 0.5).collect()),
        BinSpec::Edges((2..=10).map(|c| c as f64 - 0.5).collect()),
        BinSpec::Edges(vec![0.5]),
    ]
}

/// Results of games played with a fixed agent.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outcomes {
    /// Games with a positive return.
    pub wins: usize,

    /// Games with a negative return.
    pub losses: usize,

    /// Games with zero return.
    pub draws: usize,
}

impl Outcomes {
    /// The number of games.
    pub fn n_games(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    fn rate(&self, n: usize) -> f64 {
        match self.n_games() {
            0 => 0.0,
            total => n as f64 / total as f64,
        }
    }

    /// Fraction of games won.
    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    /// Fraction of games lost.
    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }

    /// Fraction of games drawn.
    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }
}

/// Plays `n_games` games in evaluation mode and counts the outcomes.
pub fn play<E: Env, A: Agent<E>>(env: &mut E, agent: &mut A, n_games: usize) -> Result<Outcomes> {
    agent.eval();
    let mut outcomes = Outcomes::default();

    for _ in 0..n_games {
        let mut obs = env
            .reset()
            .map_err(|e| TdrlError::env_failure("reset", e))?;
        let mut ret = 0.0;
        loop {
            let act = agent.sample(&obs);
            let (step, _) = env
                .step(&act)
                .map_err(|e| TdrlError::env_failure("step", e))?;
            ret += step.reward;
            if step.is_done() {
                break;
            }
            obs = step.obs;
        }
        match ret {
            r if r > 0.0 => outcomes.wins += 1,
            r if r < 0.0 => outcomes.losses += 1,
            _ => outcomes.draws += 1,
        }
    }

    Ok(outcomes)
}
