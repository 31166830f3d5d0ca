mod common;
use anyhow::Result;
use common::TwoStates;
use std::collections::BTreeMap;
use tdrl_agent::{
    DoubleQLearning, EpsilonGreedy, ExpectedSarsa, LearningRate, MonteCarloConfig,
    MonteCarloControl, QLearning, StepSize, TabularConfig,
};
use tdrl_core::{
    error::TdrlError,
    record::{AggregateRecorder, BufferedRecorder, NullRecorder},
    Agent, BinSpec, DefaultEvaluator, Env, QTable, StateAction, Trainer, TrainerConfig, VecObs,
};
use tempdir::TempDir;

const N_EPISODES: usize = 500;
const DISCOUNT_FACTOR: f64 = 0.9;
const LR: f64 = 0.1;
const OPTIMAL_RETURN: f32 = 5.0;

fn tabular_config() -> TabularConfig {
    TabularConfig::default()
        .bins(vec![BinSpec::Edges(vec![0.5])])
        .n_actions(2)
        .discount_factor(DISCOUNT_FACTOR)
        .lr(LearningRate::constant(LR))
        .explorer(EpsilonGreedy::with_decay_episodes(N_EPISODES))
}

fn train<A: Agent<TwoStates>>(agent: &mut A, config: TrainerConfig) -> Result<f32> {
    let mut env = TwoStates::build(&(), 0)?;
    let mut recorder: Box<dyn AggregateRecorder> = Box::new(NullRecorder::new());
    let mut evaluator = DefaultEvaluator::<TwoStates>::new(&(), 0, 1)?;
    let mut trainer = Trainer::build(config);
    trainer.train(&mut env, agent, &mut recorder, &mut evaluator)?;

    agent.eval();
    let record = tdrl_core::Evaluator::evaluate(&mut evaluator, agent)?;
    Ok(record.get_scalar("episode_return")?)
}

fn greedy_actions<A: Agent<TwoStates>>(agent: &mut A) -> (usize, usize) {
    agent.eval();
    let a = agent.sample(&VecObs(vec![0.0])).0;
    let b = agent.sample(&VecObs(vec![1.0])).0;
    (a, b)
}

#[test]
fn test_q_learning_learns_optimal_policy() -> Result<()> {
    let mut agent = QLearning::<TwoStates>::build(tabular_config())?;
    let eval_return = train(&mut agent, TrainerConfig::default().max_episodes(N_EPISODES))?;

    assert_eq!(agent.epsilon(), 0.0);
    assert_eq!(greedy_actions(&mut agent), (1, 1));
    assert_eq!(eval_return, OPTIMAL_RETURN);
    Ok(())
}

#[test]
fn test_q_learning_snapshot_replays_policy() -> Result<()> {
    let tmp_dir = TempDir::new("q_learning")?;
    let model_dir = tmp_dir.path().join("model");
    let config = TrainerConfig::default()
        .max_episodes(N_EPISODES)
        .model_dir(model_dir.to_str().unwrap());

    let mut agent = QLearning::<TwoStates>::build(tabular_config())?;
    train(&mut agent, config)?;

    let mut agent_ = QLearning::<TwoStates>::build(tabular_config())?;
    agent_.load_params(&model_dir)?;
    for (k, v) in agent.q().iter() {
        assert_eq!(agent_.q().get(&k.state, k.action), *v);
    }
    assert_eq!(greedy_actions(&mut agent_), (1, 1));

    // A table of another shape is refused.
    let mut agent_ = QLearning::<TwoStates>::build(tabular_config().n_actions(3))?;
    let err = agent_.load_params(&model_dir).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TdrlError>(),
        Some(TdrlError::StateSpaceMismatch(_))
    ));
    Ok(())
}

#[test]
fn test_q_learning_records_episodes() -> Result<()> {
    let mut env = TwoStates::build(&(), 0)?;
    let mut agent = QLearning::<TwoStates>::build(tabular_config())?;
    let mut recorder: Box<dyn AggregateRecorder> = Box::new(BufferedRecorder::new());
    let mut evaluator = DefaultEvaluator::<TwoStates>::new(&(), 0, 1)?;
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_episodes(20)
            .flush_record_interval(10),
    );
    let summary = trainer.train(&mut env, &mut agent, &mut recorder, &mut evaluator)?;
    assert_eq!(summary.episode_returns.len(), 20);
    assert!(summary
        .episode_returns
        .iter()
        .all(|r| [0.0, 1.0, 5.0].contains(r)));
    Ok(())
}

#[test]
fn test_mismatched_discretizer_is_a_configuration_error() -> Result<()> {
    let config = tabular_config().bins(vec![BinSpec::Edges(vec![0.5]), BinSpec::Edges(vec![0.5])]);
    let mut agent = QLearning::<TwoStates>::build(config)?;
    let err = train(&mut agent, TrainerConfig::default().max_episodes(1)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TdrlError>(),
        Some(TdrlError::Configuration(_))
    ));
    Ok(())
}

#[test]
fn test_double_q_learning_learns_optimal_policy() -> Result<()> {
    let n_episodes = 2 * N_EPISODES;
    let config = tabular_config().explorer(EpsilonGreedy::with_decay_episodes(n_episodes));
    let mut agent = DoubleQLearning::<TwoStates>::build(config)?;
    let eval_return = train(&mut agent, TrainerConfig::default().max_episodes(n_episodes))?;

    assert_eq!(greedy_actions(&mut agent), (1, 1));
    assert_eq!(eval_return, OPTIMAL_RETURN);

    // Both tables learned.
    let (q1, q2) = agent.tables();
    assert!(q1.iter().any(|(_, v)| *v > 0.0));
    assert!(q2.iter().any(|(_, v)| *v > 0.0));
    Ok(())
}

#[test]
fn test_expected_sarsa_learns_optimal_policy() -> Result<()> {
    let mut agent = ExpectedSarsa::<TwoStates>::build(tabular_config())?;
    let eval_return = train(&mut agent, TrainerConfig::default().max_episodes(N_EPISODES))?;

    assert_eq!(greedy_actions(&mut agent), (1, 1));
    assert_eq!(eval_return, OPTIMAL_RETURN);
    Ok(())
}

#[test]
fn test_monte_carlo_control_learns_optimal_policy() -> Result<()> {
    let config = MonteCarloConfig::default()
        .bins(vec![BinSpec::Edges(vec![0.5])])
        .n_actions(2)
        .discount_factor(DISCOUNT_FACTOR)
        .step_size(StepSize::SampleAverage)
        .explorer(EpsilonGreedy::with_decay_episodes(N_EPISODES));
    let mut agent = MonteCarloControl::<TwoStates>::build(config)?;
    let eval_return = train(&mut agent, TrainerConfig::default().max_episodes(N_EPISODES))?;

    assert_eq!(greedy_actions(&mut agent), (1, 1));
    assert_eq!(eval_return, OPTIMAL_RETURN);

    // Sample averages of deterministic returns are exact.
    let s_b = agent.discretizer().discretize(&[1.0]);
    assert_eq!(agent.q().get(&s_b, 1), 5.0);
    assert_eq!(agent.q().get(&s_b, 0), 0.0);
    Ok(())
}

fn entries(q: &QTable) -> BTreeMap<StateAction, f64> {
    q.iter().map(|(k, v)| (k.clone(), *v)).collect()
}

#[test]
fn test_evaluation_leaves_training_unchanged() -> Result<()> {
    let n_episodes = 30;
    let config = tabular_config().explorer(EpsilonGreedy::with_decay_episodes(n_episodes));
    let trainer_config = |eval_interval: usize| {
        TrainerConfig::default()
            .max_episodes(n_episodes)
            .eval_interval(eval_interval)
    };

    let mut agent = QLearning::<TwoStates>::build(config.clone())?;
    train(&mut agent, trainer_config(0))?;
    let mut agent_ = QLearning::<TwoStates>::build(config.clone())?;
    train(&mut agent_, trainer_config(5))?;
    assert_eq!(entries(agent.q()), entries(agent_.q()));

    let mut agent = DoubleQLearning::<TwoStates>::build(config.clone())?;
    train(&mut agent, trainer_config(0))?;
    let mut agent_ = DoubleQLearning::<TwoStates>::build(config)?;
    train(&mut agent_, trainer_config(5))?;
    let (q1, q2) = agent.tables();
    let (q1_, q2_) = agent_.tables();
    assert_eq!(entries(q1), entries(q1_));
    assert_eq!(entries(q2), entries(q2_));
    Ok(())
}
