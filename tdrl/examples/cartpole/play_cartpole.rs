use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::Path;
use tdrl::cartpole;
use tdrl_agent::{DoubleQLearning, QLearning, TabularConfig};
use tdrl_classic_env::{CartPole, CartPoleConfig};
use tdrl_core::{Agent, DefaultEvaluator, Evaluator as _};

const MODEL_DIR: &str = "./tdrl/examples/cartpole/model/q_learning";

/// Play cartpole greedily with a saved Q table
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of episodes
    #[arg(short, long)]
    episodes: usize,

    /// Directory of the Q table(s)
    #[arg(short, long, default_value_t = MODEL_DIR.to_string())]
    model_dir: String,

    /// Load the pair of tables saved by Double Q-learning
    #[arg(short, long, default_value_t = false)]
    double: bool,
}

fn agent_config() -> TabularConfig {
    TabularConfig::default()
        .bins(cartpole::bins())
        .n_actions(cartpole::N_ACTIONS)
}

fn play_with<A: Agent<CartPole>>(mut agent: A, model_dir: &Path, n_episodes: usize) -> Result<f32> {
    agent.load_params(model_dir)?;
    agent.eval();
    let env_config = CartPoleConfig::default();
    let mut evaluator = DefaultEvaluator::<CartPole>::new(&env_config, 0, n_episodes)?;
    let record = evaluator.evaluate(&mut agent)?;
    Ok(record.get_scalar("episode_return")?)
}

fn play(n_episodes: usize, model_dir: &str, double: bool) -> Result<f32> {
    let model_dir = Path::new(model_dir);
    let avg = match double {
        true => {
            let agent = DoubleQLearning::<CartPole>::build(agent_config())?;
            play_with(agent, model_dir, n_episodes)?
        }
        false => {
            let agent = QLearning::<CartPole>::build(agent_config())?;
            play_with(agent, model_dir, n_episodes)?
        }
    };
    info!("Average return over {} episodes: {}", n_episodes, avg);
    Ok(avg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    play(args.episodes, &args.model_dir, args.double)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_play_cartpole() -> Result<()> {
        let tmp_dir = TempDir::new("play_cartpole")?;
        let model_dir = match tmp_dir.as_ref().to_str() {
            Some(s) => s,
            None => panic!("Failed to get string of temporary directory"),
        };

        // Untrained tables break ties at random, which still keeps the pole up for a while.
        QLearning::<CartPole>::build(agent_config())?.save_params(tmp_dir.path())?;
        let avg = play(3, model_dir, false)?;
        assert!(avg >= 1.0);

        DoubleQLearning::<CartPole>::build(agent_config())?.save_params(tmp_dir.path())?;
        let avg = play(3, model_dir, true)?;
        assert!(avg >= 1.0);

        // No table in an empty directory.
        let empty_dir = TempDir::new("play_cartpole_empty")?;
        assert!(play(1, empty_dir.path().to_str().unwrap(), false).is_err());
        Ok(())
    }
}
