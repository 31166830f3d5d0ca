//! First-visit Monte Carlo control.
use crate::{util::check_space, EpsilonGreedy};
use anyhow::Result;
use log::info;
use rand::{rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Write},
    marker::PhantomData,
    path::Path,
};
use tdrl_core::{
    record::{Record, RecordValue},
    Act, Agent, BinSpec, Discretizer, Env, Obs, ObservationSpace, Policy, QTable, State,
    StateAction, Step, Trajectory,
};

/// Step size of Monte Carlo updates.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum StepSize {
    /// `1 / N(s, a)`, the incremental mean of all first-visit returns.
    SampleAverage,

    /// A constant step size.
    Constant(f64),
}

/// Configuration of [`MonteCarloControl`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct MonteCarloConfig {
    pub(crate) bins: Vec<BinSpec>,
    pub(crate) n_actions: usize,
    pub(crate) discount_factor: f64,
    pub(crate) step_size: StepSize,
    pub(crate) explorer: EpsilonGreedy,
    pub(crate) seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            bins: vec![],
            n_actions: 2,
            discount_factor: 1.0,
            step_size: StepSize::SampleAverage,
            explorer: EpsilonGreedy::default(),
            seed: 42,
        }
    }
}

impl MonteCarloConfig {
    /// Bins of each observation dimension.
    pub fn bins(mut self, v: Vec<BinSpec>) -> Self {
        self.bins = v;
        self
    }

    /// The number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Step size.
    pub fn step_size(mut self, v: StepSize) -> Self {
        self.step_size = v;
        self
    }

    /// Explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Random seed of the agent.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`MonteCarloConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of Monte Carlo agent from {}", path_.to_str().unwrap_or("?"));
        Ok(b)
    }

    /// Saves [`MonteCarloConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of Monte Carlo agent into {}", path_.to_str().unwrap_or("?"));
        Ok(())
    }
}

/// Applies first-visit updates of a finished episode, returns the number of updates.
fn update_first_visit(
    q: &mut QTable,
    counts: &mut HashMap<StateAction, usize>,
    trajectory: &Trajectory<StateAction>,
    discount_factor: f64,
    step_size: &StepSize,
) -> usize {
    let returns = trajectory.first_visit_returns(discount_factor);
    let n_updates = returns.len();

    for (key, g) in returns.into_iter() {
        let rate = match step_size {
            StepSize::SampleAverage => {
                let n = counts.entry(key.clone()).or_insert(0);
                *n += 1;
                1.0 / *n as f64
            }
            StepSize::Constant(alpha) => *alpha,
        };
        q.update(&key.state, key.action, g, rate);
    }

    n_updates
}

/// On-policy first-visit Monte Carlo control without exploring starts.
///
/// The `(s, a, r)` steps of an episode are recorded. When it ends, returns are
/// accumulated backwards with `G = gamma * G + r` and the first occurrence of every
/// state-action pair in the episode is moved towards its return. The behaviour policy is
/// epsilon-greedy on the table.
pub struct MonteCarloControl<E: Env> {
    discretizer: Discretizer,
    q: QTable,
    counts: HashMap<StateAction, usize>,
    trajectory: Trajectory<StateAction>,
    discount_factor: f64,
    step_size: StepSize,
    explorer: EpsilonGreedy,
    train: bool,
    rng: SmallRng,
    /// Breaks greedy ties in evaluation mode.
    eval_rng: SmallRng,
    phantom: PhantomData<E>,
}

impl<E: Env> MonteCarloControl<E> {
    /// Constructs the agent with a zero table.
    pub fn build(config: MonteCarloConfig) -> Result<Self> {
        let discretizer = Discretizer::build(&config.bins)?;
        let q = QTable::new(&discretizer, config.n_actions)?;

        Ok(Self {
            discretizer,
            q,
            counts: HashMap::new(),
            trajectory: Trajectory::new(),
            discount_factor: config.discount_factor,
            step_size: config.step_size,
            explorer: config.explorer,
            train: true,
            rng: SmallRng::seed_from_u64(config.seed),
            eval_rng: SmallRng::seed_from_u64(config.seed.wrapping_add(1)),
            phantom: PhantomData,
        })
    }

    /// The action-value table.
    pub fn q(&self) -> &QTable {
        &self.q
    }

    /// The discretizer.
    pub fn discretizer(&self) -> &Discretizer {
        &self.discretizer
    }

    fn state(&self, obs: &E::Obs) -> State {
        self.discretizer.discretize(obs.as_slice())
    }
}

impl<E: Env> Policy<E> for MonteCarloControl<E> {
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        let s = self.state(obs);
        let a = if self.train {
            self.explorer
                .action(self.q.n_actions(), &mut self.rng, |rng| {
                    self.q.best_action(&s, rng)
                })
        } else {
            self.q.best_action(&s, &mut self.eval_rng)
        };
        a.into()
    }
}

impl<E: Env> Agent<E> for MonteCarloControl<E> {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn check_space(&self, obs_space: &ObservationSpace, n_actions: usize) -> Result<()> {
        check_space(&self.discretizer, self.q.n_actions(), obs_space, n_actions)
    }

    fn begin_episode(&mut self, _episode: usize) {
        self.trajectory.clear();
    }

    fn observe(&mut self, obs: &E::Obs, step: &Step<E>) -> Result<Record> {
        if self.train {
            let key = StateAction::new(self.state(obs), step.act.index());
            self.trajectory.push(key, step.reward as f64);
        }
        Ok(Record::empty())
    }

    fn end_episode(&mut self) -> Result<Record> {
        if !self.train {
            return Ok(Record::empty());
        }

        let n_updates = update_first_visit(
            &mut self.q,
            &mut self.counts,
            &self.trajectory,
            self.discount_factor,
            &self.step_size,
        );
        self.trajectory.clear();

        let record = Record::from_slice(&[
            ("epsilon", RecordValue::Scalar(self.explorer.eps() as f32)),
            ("n_updates", RecordValue::Scalar(n_updates as f32)),
        ]);
        self.explorer.anneal();

        Ok(record)
    }

    fn value(&self, obs: &E::Obs) -> f64 {
        self.q.max_value(&self.state(obs))
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        self.q.save(path.join("q.bin"))
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.q = QTable::load(path.join("q.bin"), &self.discretizer, self.q.n_actions())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table() -> Result<QTable> {
        let d = Discretizer::new(vec![vec![0.5]])?;
        Ok(QTable::new(&d, 2)?)
    }

    #[test]
    fn test_first_visit_return_is_used() -> Result<()> {
        // s0 at steps 1 and 3, rewards [1, 1, 1], gamma = 1.
        let (s0, s1) = (State(vec![0]), State(vec![1]));
        let mut trajectory = Trajectory::new();
        trajectory.push(StateAction::new(s0.clone(), 0), 1.0);
        trajectory.push(StateAction::new(s1.clone(), 1), 1.0);
        trajectory.push(StateAction::new(s0.clone(), 0), 1.0);

        let mut q = table()?;
        let mut counts = HashMap::new();
        let n = update_first_visit(&mut q, &mut counts, &trajectory, 1.0, &StepSize::SampleAverage);

        assert_eq!(n, 2);
        assert_eq!(q.get(&s0, 0), 3.0);
        assert_eq!(q.get(&s1, 1), 2.0);
        assert_eq!(counts[&StateAction::new(s0, 0)], 1);
        Ok(())
    }

    #[test]
    fn test_sample_average_over_episodes() -> Result<()> {
        let s = State(vec![0]);
        let mut q = table()?;
        let mut counts = HashMap::new();

        for g in [1.0, 0.0, -1.0, 4.0] {
            let mut trajectory = Trajectory::new();
            trajectory.push(StateAction::new(s.clone(), 1), g);
            update_first_visit(&mut q, &mut counts, &trajectory, 1.0, &StepSize::SampleAverage);
        }
        assert_eq!(q.get(&s, 1), 1.0);
        Ok(())
    }

    #[test]
    fn test_constant_step_size() -> Result<()> {
        let s = State(vec![1]);
        let mut q = table()?;
        let mut counts = HashMap::new();
        let mut trajectory = Trajectory::new();
        trajectory.push(StateAction::new(s.clone(), 0), 2.0);
        update_first_visit(&mut q, &mut counts, &trajectory, 1.0, &StepSize::Constant(0.25));
        assert_eq!(q.get(&s, 0), 0.5);
        assert!(counts.is_empty());
        Ok(())
    }
}
