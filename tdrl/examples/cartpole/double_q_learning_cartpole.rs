use anyhow::Result;
use clap::Parser;
use log::info;
use tdrl::{cartpole, create_recorder};
use tdrl_agent::{DoubleQLearning, EpsilonGreedy, LearningRate, TabularConfig};
use tdrl_classic_env::{CartPole, CartPoleConfig};
use tdrl_core::{DefaultEvaluator, Env as _, TrainSummary, Trainer, TrainerConfig};

const ALPHA: f64 = 0.1;
const DISCOUNT_FACTOR: f64 = 1.0;
const EVAL_INTERVAL: usize = 1000;
const N_EPISODES_PER_EVAL: usize = 10;
const RECORD_INTERVAL: usize = 5000;
const FLUSH_RECORD_INTERVAL: usize = 100;
const RUNNING_AVG_WINDOW: usize = 100;
const MODEL_DIR: &str = "./tdrl/examples/cartpole/model/double_q_learning";

/// Train a Double Q-learning agent in the cartpole environment
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

fn create_agent_config(n_episodes: usize) -> TabularConfig {
    TabularConfig::default()
        .bins(cartpole::bins())
        .n_actions(cartpole::N_ACTIONS)
        .discount_factor(DISCOUNT_FACTOR)
        .lr(LearningRate::constant(ALPHA))
        // Epsilon reaches zero at two thirds of the run.
        .explorer(EpsilonGreedy::with_decay_episodes(n_episodes * 2 / 3))
}

fn create_trainer_config(n_episodes: usize, model_dir: &str) -> TrainerConfig {
    TrainerConfig::default()
        .max_episodes(n_episodes)
        .eval_interval(EVAL_INTERVAL)
        .record_interval(RECORD_INTERVAL)
        .flush_record_interval(FLUSH_RECORD_INTERVAL)
        .running_avg_window(RUNNING_AVG_WINDOW)
        .model_dir(model_dir)
}

fn train(n_episodes: usize, model_dir: &str) -> Result<TrainSummary> {
    let env_config = CartPoleConfig::default();
    let mut env = CartPole::build(&env_config, 0)?;
    let mut agent = DoubleQLearning::<CartPole>::build(create_agent_config(n_episodes))?;
    let mut evaluator = DefaultEvaluator::<CartPole>::new(&env_config, 0, N_EPISODES_PER_EVAL)?;
    let mut recorder = create_recorder(Some(model_dir));
    let mut trainer = Trainer::build(create_trainer_config(n_episodes, model_dir));

    let summary = trainer.train(&mut env, &mut agent, &mut recorder, &mut evaluator)?;
    if let Some(avg) = summary.last_running_average(RUNNING_AVG_WINDOW) {
        info!("Running average of the last {} episodes: {}", RUNNING_AVG_WINDOW, avg);
    }

    Ok(summary)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    train(args.episodes, &args.model_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::train;
    use anyhow::Result;
    use std::path::Path;
    use tempdir::TempDir;

    #[test]
    fn test_double_q_learning_cartpole() -> Result<()> {
        let tmp_dir = TempDir::new("double_q_learning_cartpole")?;
        let model_dir = match tmp_dir.as_ref().to_str() {
            Some(s) => s,
            None => panic!("Failed to get string of temporary directory"),
        };
        let summary = train(200, model_dir)?;
        assert_eq!(summary.episode_returns.len(), 200);
        assert!(Path::new(model_dir).join("q1.bin").exists());
        assert!(Path::new(model_dir).join("q2.bin").exists());
        Ok(())
    }
}
