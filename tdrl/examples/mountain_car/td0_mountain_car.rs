use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::Path;
use tdrl::{create_recorder, mountain_car};
use tdrl_agent::{LearningRate, PredictionConfig, TdPrediction};
use tdrl_classic_env::{MountainCar, MountainCarConfig};
use tdrl_core::{Env as _, ProbeEvaluator, TileCoder, Trainer, TrainerConfig};

const N_BINS: usize = 8;
const N_LAYERS: usize = 8;
const DISCOUNT_FACTOR: f64 = 1.0;
const LR_DECAY_INCREMENT: f64 = 10.0;
const LR_DECAY_INTERVAL: usize = 100;
const EVAL_INTERVAL: usize = 1000;
const MODEL_DIR: &str = "./tdrl/examples/mountain_car/model/td0";

/// Estimate the value function of a fixed policy in mountain car with semi-gradient TD(0)
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of episodes
    #[arg(short, long)]
    episodes: usize,

    /// Directory of the weights and TensorBoard records, one subdirectory per learning rate
    #[arg(short, long, default_value_t = MODEL_DIR.to_string())]
    model_dir: String,
}

/// Probe series of one learning rate.
struct Estimates {
    lr: f64,
    near_exit: Vec<f64>,
    left_side: Vec<f64>,
}

fn create_agent_config(lr: f64) -> PredictionConfig {
    PredictionConfig::default()
        .discount_factor(DISCOUNT_FACTOR)
        .lr(LearningRate::constant(lr).decay(LR_DECAY_INCREMENT, LR_DECAY_INTERVAL))
}

fn train_with_lr(
    lr: f64,
    n_episodes: usize,
    model_dir: &str,
    eval_interval: usize,
) -> Result<Estimates> {
    let env_config = MountainCarConfig::default();
    let mut env = MountainCar::build(&env_config, 0)?;
    let tiles = TileCoder::mountain_car(N_BINS, N_LAYERS)?;
    let mut agent = TdPrediction::<MountainCar, _>::build(
        create_agent_config(lr),
        tiles,
        mountain_car::follow_velocity(),
    );
    let mut evaluator = ProbeEvaluator::new(mountain_car::probes());
    let mut recorder = create_recorder(Some(model_dir));
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_episodes(n_episodes)
            .eval_interval(eval_interval)
            .record_interval(eval_interval)
            .flush_record_interval(eval_interval)
            .model_dir(model_dir),
    );
    trainer.train(&mut env, &mut agent, &mut recorder, &mut evaluator)?;

    let series = |name: &str| evaluator.series(name).unwrap_or_default().to_vec();
    Ok(Estimates {
        lr,
        near_exit: series("near_exit"),
        left_side: series("left_side"),
    })
}

fn train(n_episodes: usize, model_dir: &str, eval_interval: usize) -> Result<Vec<Estimates>> {
    let mut estimates = vec![];
    for lr in mountain_car::LEARNING_RATES {
        let model_dir = Path::new(model_dir).join(format!("lr_{}", lr));
        let model_dir = model_dir.to_str().unwrap_or(MODEL_DIR);
        info!("Learning rate {}", lr);
        estimates.push(train_with_lr(lr, n_episodes, model_dir, eval_interval)?);
    }

    for e in estimates.iter() {
        info!(
            "lr = {}: near exit {:?}, left side {:?}",
            e.lr,
            e.near_exit.last(),
            e.left_side.last()
        );
    }

    Ok(estimates)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    train(args.episodes, &args.model_dir, EVAL_INTERVAL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::train;
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_td0_mountain_car() -> Result<()> {
        let tmp_dir = TempDir::new("td0_mountain_car")?;
        let model_dir = match tmp_dir.as_ref().to_str() {
            Some(s) => s,
            None => panic!("Failed to get string of temporary directory"),
        };
        let estimates = train(40, model_dir, 10)?;
        assert_eq!(estimates.len(), 3);
        for e in estimates.iter() {
            assert_eq!(e.near_exit.len(), 4);
            assert_eq!(e.left_side.len(), 4);
            assert_eq!(e.near_exit[0], 0.0);
            // Every step costs -1.
            assert!(e.left_side[3] <= 0.0);
        }
        assert!(tmp_dir.path().join("lr_0.1").join("weights.bin").exists());
        Ok(())
    }
}
