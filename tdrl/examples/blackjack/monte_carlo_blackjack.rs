use anyhow::Result;
use clap::Parser;
use log::info;
use tdrl::{
    blackjack::{self, Outcomes},
    create_recorder,
};
use tdrl_agent::{EpsilonGreedy, MonteCarloConfig, MonteCarloControl, StepSize};
use tdrl_classic_env::{Blackjack, BlackjackConfig};
use tdrl_core::{Env as _, ProbeEvaluator, Trainer, TrainerConfig};

const EPS_START: f64 = 0.05;
const EPS_DECAY_EPISODES: usize = 500_000;
const DISCOUNT_FACTOR: f64 = 1.0;
const RECORD_INTERVAL: usize = 100_000;
const FLUSH_RECORD_INTERVAL: usize = 1000;
const N_TEST_GAMES: usize = 1000;
const MODEL_DIR: &str = "./tdrl/examples/blackjack/model/monte_carlo";

/// Train a first-visit Monte Carlo control agent in the blackjack environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of episodes
    #[arg(short, long)]
    episodes: usize,

    /// Directory of the Q table and TensorBoard records
    #[arg(short, long, default_value_t = MODEL_DIR.to_string())]
    model_dir: String,
}

fn create_agent_config() -> MonteCarloConfig {
    MonteCarloConfig::default()
        .bins(blackjack::bins())
        .n_actions(blackjack::N_ACTIONS)
        .discount_factor(DISCOUNT_FACTOR)
        .step_size(StepSize::SampleAverage)
        .explorer(EpsilonGreedy::with_decay_episodes(EPS_DECAY_EPISODES).eps_start(EPS_START))
}

fn train(n_episodes: usize, model_dir: &str, n_test_games: usize) -> Result<Outcomes> {
    let env_config = BlackjackConfig::default();
    let mut env = Blackjack::build(&env_config, 0)?;
    let mut agent = MonteCarloControl::<Blackjack>::build(create_agent_config())?;
    let mut evaluator = ProbeEvaluator::<Blackjack>::new(vec![]);
    let mut recorder = create_recorder(Some(model_dir));
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_episodes(n_episodes)
            .record_interval(RECORD_INTERVAL)
            .flush_record_interval(FLUSH_RECORD_INTERVAL)
            .model_dir(model_dir),
    );
    trainer.train(&mut env, &mut agent, &mut recorder, &mut evaluator)?;

    let outcomes = blackjack::play(&mut env, &mut agent, n_test_games)?;
    info!(
        "Greedy play over {} games: win rate {:.3}, loss rate {:.3}, draw rate {:.3}",
        outcomes.n_games(),
        outcomes.win_rate(),
        outcomes.loss_rate(),
        outcomes.draw_rate()
    );

    Ok(outcomes)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    train(args.episodes, &args.model_dir, N_TEST_GAMES)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::train;
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_monte_carlo_blackjack() -> Result<()> {
        let tmp_dir = TempDir::new("monte_carlo_blackjack")?;
        let model_dir = match tmp_dir.as_ref().to_str() {
            Some(s) => s,
            None => panic!("Failed to get string of temporary directory"),
        };
        let outcomes = train(2000, model_dir, 100)?;
        assert_eq!(outcomes.n_games(), 100);
        assert!(tmp_dir.path().join("q.bin").exists());
        Ok(())
    }
}
