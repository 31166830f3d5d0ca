//! Train [`Agent`].
mod config;
use crate::{
    error::TdrlError,
    record::{AggregateRecorder, Record, RecordValue::Scalar},
    Agent, Env, Evaluator,
};
use anyhow::{Context, Result};
pub use config::TrainerConfig;
use log::{debug, info};
use std::{fs, path::Path};

/// Returns of the training episodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainSummary {
    /// Undiscounted return of each episode.
    pub episode_returns: Vec<f32>,
}

impl TrainSummary {
    /// Running average of returns: element `t` is the mean of the returns of episodes
    /// `max(0, t - window)..=t`.
    pub fn running_average(&self, window: usize) -> Vec<f32> {
        (0..self.episode_returns.len())
            .map(|t| running_mean(&self.episode_returns[..=t], window))
            .collect()
    }

    /// The last element of [`TrainSummary::running_average`].
    pub fn last_running_average(&self, window: usize) -> Option<f32> {
        match self.episode_returns.is_empty() {
            true => None,
            false => Some(running_mean(&self.episode_returns, window)),
        }
    }
}

/// Mean of the last `window + 1` values.
fn running_mean(returns: &[f32], window: usize) -> f32 {
    let t = returns.len() - 1;
    let xs = &returns[t.saturating_sub(window)..];
    xs.iter().sum::<f32>() / xs.len() as f32
}

enum Phase<O> {
    EpisodeStart,
    Stepping(O),
    EpisodeEnd,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// The loop is a state machine over the phases of an episode:
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> EpisodeStart
///     EpisodeStart --> Stepping: Env reset
///     Stepping --> Stepping: Agent observes a step
///     Stepping --> EpisodeEnd: step is done
///     EpisodeEnd --> EpisodeStart: episodes < max_episodes
///     EpisodeEnd --> [*]
/// ```
///
/// 1. `EpisodeStart`: if `episode % eval_interval == 0`, the agent is switched to
///    evaluation mode and passed to the [`Evaluator`]. Then [`Agent::begin_episode`] is
///    called and the environment is reset.
/// 2. `Stepping`: the agent samples an action, the environment does a step and the agent
///    observes the transition with [`Agent::observe`], applying step-wise updates. This
///    repeats until the step is terminated or truncated.
/// 3. `EpisodeEnd`: [`Agent::end_episode`] applies trajectory updates and anneals
///    exploration. The return of the episode, its length and the running average of
///    returns are stored in the recorder together with the records of the agent.
///
/// The loop finishes after `max_episodes` episodes. If `model_dir` is given, the
/// parameters of the agent are saved there; failing to save is an error.
///
/// Errors of [`Env::reset`] and [`Env::step`] are returned as
/// [`TdrlError::EnvironmentFailure`] and abort training.
pub struct Trainer {
    /// Where to save the trained model.
    model_dir: Option<String>,

    /// Interval of evaluation in episodes.
    eval_interval: usize,

    /// Interval of progress log lines in episodes.
    record_interval: usize,

    /// Interval of flushing records in episodes.
    flush_records_interval: usize,

    /// Window of the running average of returns.
    running_avg_window: usize,

    /// The number of training episodes.
    max_episodes: usize,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            model_dir: config.model_dir,
            eval_interval: config.eval_interval,
            record_interval: config.record_interval,
            flush_records_interval: config.flush_record_interval,
            running_avg_window: config.running_avg_window,
            max_episodes: config.max_episodes,
        }
    }

    fn save_model<E: Env, A: Agent<E>>(agent: &A, model_dir: &str) -> Result<()> {
        let path = Path::new(model_dir);
        fs::create_dir_all(path)
            .map_err(anyhow::Error::from)
            .and_then(|_| agent.save_params(path))
            .with_context(|| format!("Failed to save the model in {:?}", model_dir))?;
        info!("Saved the model in {:?}.", model_dir);
        Ok(())
    }

    fn is_interval(episode: usize, interval: usize) -> bool {
        interval > 0 && episode % interval == 0
    }

    /// Train the agent on `env`.
    pub fn train<E, A, D>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        recorder: &mut Box<dyn AggregateRecorder>,
        evaluator: &mut D,
    ) -> Result<TrainSummary>
    where
        E: Env,
        A: Agent<E>,
        D: Evaluator<E>,
    {
        agent.check_space(&env.observation_space(), env.action_space())?;
        agent.train();

        let mut summary = TrainSummary::default();
        let mut record = Record::empty();
        let mut episode = 0;
        let mut episode_return = 0f32;
        let mut episode_length = 0usize;
        let mut phase = Phase::EpisodeStart;

        loop {
            phase = match phase {
                Phase::EpisodeStart => {
                    if episode == self.max_episodes {
                        break;
                    }

                    if Self::is_interval(episode, self.eval_interval) {
                        agent.eval();
                        let eval_record = evaluator.evaluate(agent)?;
                        agent.train();
                        debug!("Evaluation before episode {}: {:?}", episode, eval_record);
                        record.merge_inplace(eval_record);
                    }

                    if Self::is_interval(episode, self.record_interval) {
                        info!("Starting episode {}", episode);
                    }

                    agent.begin_episode(episode);
                    let obs = env
                        .reset()
                        .map_err(|e| TdrlError::env_failure("reset", e))?;
                    Phase::Stepping(obs)
                }

                Phase::Stepping(obs) => {
                    let act = agent.sample(&obs);
                    let (step, _) = env
                        .step(&act)
                        .map_err(|e| TdrlError::env_failure("step", e))?;
                    episode_return += step.reward;
                    episode_length += 1;
                    record.merge_inplace(agent.observe(&obs, &step)?);

                    if step.is_done() {
                        Phase::EpisodeEnd
                    } else {
                        Phase::Stepping(step.obs)
                    }
                }

                Phase::EpisodeEnd => {
                    record.merge_inplace(agent.end_episode()?);
                    summary.episode_returns.push(episode_return);
                    let running_avg =
                        running_mean(&summary.episode_returns, self.running_avg_window);

                    record.insert("episode", Scalar(episode as _));
                    record.insert("episode_return", Scalar(episode_return));
                    record.insert("episode_length", Scalar(episode_length as _));
                    record.insert("running_avg_return", Scalar(running_avg));
                    recorder.store(std::mem::replace(&mut record, Record::empty()));

                    if Self::is_interval(episode + 1, self.flush_records_interval) {
                        recorder.flush(episode as _);
                    }
                    episode += 1;

                    episode_return = 0.0;
                    episode_length = 0;
                    Phase::EpisodeStart
                }
            };
        }

        if episode > 0 && !Self::is_interval(episode, self.flush_records_interval) {
            recorder.flush((episode - 1) as _);
        }

        if let Some(model_dir) = self.model_dir.as_ref() {
            Self::save_model(agent, model_dir)?;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        record::BufferedRecorder, DiscreteAct, ObservationSpace, Policy, ProbeEvaluator, Step,
        VecObs,
    };
    use anyhow::bail;
    use tempdir::TempDir;

    /// Walks from 0 to `len`, the reward is the action index.
    struct Walk {
        pos: usize,
        len: usize,
        fail_at: Option<usize>,
    }

    impl Env for Walk {
        type Config = (usize, Option<usize>);
        type Obs = VecObs;
        type Act = DiscreteAct;
        type Info = ();

        fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
            Ok(Self {
                pos: 0,
                len: config.0,
                fail_at: config.1,
            })
        }

        fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
            if self.fail_at == Some(self.pos) {
                bail!("broken at {}", self.pos);
            }
            self.pos += 1;
            let obs = VecObs(vec![self.pos as f64]);
            let step = Step::new(obs, *a, a.0 as f32, self.pos == self.len, false, ());
            Ok((step, Record::empty()))
        }

        fn reset(&mut self) -> Result<Self::Obs> {
            self.pos = 0;
            Ok(VecObs(vec![0.0]))
        }

        fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
            self.reset()
        }

        fn action_space(&self) -> usize {
            2
        }

        fn observation_space(&self) -> ObservationSpace {
            ObservationSpace::from_bounds(&[(0.0, self.len as f64)])
        }
    }

    #[derive(Default)]
    struct Counter {
        is_train: bool,
        begun: Vec<usize>,
        observed: usize,
        ended: usize,
    }

    impl Policy<Walk> for Counter {
        fn sample(&mut self, _obs: &VecObs) -> DiscreteAct {
            DiscreteAct(1)
        }
    }

    impl Agent<Walk> for Counter {
        fn train(&mut self) {
            self.is_train = true;
        }

        fn eval(&mut self) {
            self.is_train = false;
        }

        fn is_train(&self) -> bool {
            self.is_train
        }

        fn begin_episode(&mut self, episode: usize) {
            self.begun.push(episode);
        }

        fn observe(&mut self, _obs: &VecObs, _step: &Step<Walk>) -> Result<Record> {
            self.observed += 1;
            Ok(Record::empty())
        }

        fn end_episode(&mut self) -> Result<Record> {
            self.ended += 1;
            Ok(Record::from_scalar("epsilon", 0.5))
        }

        fn value(&self, obs: &VecObs) -> f64 {
            // NaN in training mode makes probing in the wrong mode visible.
            if self.is_train {
                f64::NAN
            } else {
                obs.0[0]
            }
        }

        fn save_params(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn load_params(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_episode_loop() -> Result<()> {
        let mut env = Walk::build(&(3, None), 0)?;
        let mut agent = Counter::default();
        let mut recorder: Box<dyn AggregateRecorder> = Box::new(BufferedRecorder::new());
        let mut evaluator = ProbeEvaluator::new(vec![("start".to_string(), VecObs(vec![2.0]))]);
        let mut trainer = Trainer::build(
            TrainerConfig::default()
                .max_episodes(5)
                .eval_interval(2)
                .record_interval(1),
        );

        let summary = trainer.train(&mut env, &mut agent, &mut recorder, &mut evaluator)?;

        assert_eq!(summary.episode_returns, vec![3.0; 5]);
        assert_eq!(agent.begun, vec![0, 1, 2, 3, 4]);
        assert_eq!(agent.observed, 15);
        assert_eq!(agent.ended, 5);
        assert!(agent.is_train());

        // Evaluated before episodes 0, 2 and 4.
        assert_eq!(evaluator.series("start"), Some(&[2.0, 2.0, 2.0][..]));
        Ok(())
    }

    #[test]
    fn test_env_failure_aborts_training() -> Result<()> {
        let mut env = Walk::build(&(3, Some(1)), 0)?;
        let mut agent = Counter::default();
        let mut recorder: Box<dyn AggregateRecorder> = Box::new(BufferedRecorder::new());
        let mut evaluator = ProbeEvaluator::<Walk>::new(vec![]);
        let mut trainer = Trainer::build(TrainerConfig::default().max_episodes(5));

        let err = trainer
            .train(&mut env, &mut agent, &mut recorder, &mut evaluator)
            .unwrap_err();
        match err.downcast_ref::<TdrlError>() {
            Some(TdrlError::EnvironmentFailure { phase, message }) => {
                assert_eq!(*phase, "step");
                assert!(message.contains("broken at 1"));
            }
            _ => panic!("unexpected error: {:?}", err),
        }
        assert_eq!(agent.ended, 0);
        Ok(())
    }

    #[test]
    fn test_failed_snapshot_is_an_error() -> Result<()> {
        let tmp_dir = TempDir::new("trainer")?;
        let file = tmp_dir.path().join("file");
        fs::write(&file, b"")?;
        let run = |model_dir: &Path| -> Result<TrainSummary> {
            let mut env = Walk::build(&(3, None), 0)?;
            let mut agent = Counter::default();
            let mut recorder: Box<dyn AggregateRecorder> = Box::new(BufferedRecorder::new());
            let mut evaluator = ProbeEvaluator::<Walk>::new(vec![]);
            let mut trainer = Trainer::build(
                TrainerConfig::default()
                    .max_episodes(2)
                    .model_dir(model_dir.to_string_lossy()),
            );
            trainer.train(&mut env, &mut agent, &mut recorder, &mut evaluator)
        };

        // A directory cannot be created under a regular file.
        assert!(run(&file.join("model")).is_err());

        let model_dir = tmp_dir.path().join("model");
        assert_eq!(run(&model_dir)?.episode_returns.len(), 2);
        assert!(model_dir.is_dir());
        Ok(())
    }

    #[test]
    fn test_running_average() {
        let summary = TrainSummary {
            episode_returns: vec![1.0, 3.0, 5.0, 7.0],
        };
        assert_eq!(summary.running_average(1), vec![1.0, 2.0, 4.0, 6.0]);
        assert_eq!(summary.running_average(100), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(summary.last_running_average(2), Some(5.0));
        assert_eq!(TrainSummary::default().last_running_average(2), None);
    }
}
