//! Expected SARSA.
use crate::{
    util::{check_space, TdErrorMean},
    EpsilonGreedy, LearningRate, TabularConfig,
};
use anyhow::Result;
use rand::{rngs::SmallRng, SeedableRng};
use std::{marker::PhantomData, path::Path};
use tdrl_core::{
    record::{Record, RecordValue},
    Act, Agent, Discretizer, Env, Obs, ObservationSpace, Policy, QTable, State, Step,
};

/// On-policy TD control bootstrapping on the expected value of the next state under the
/// current epsilon-greedy policy: `r + gamma * sum_a pi(a|s') Q(s', a)`.
pub struct ExpectedSarsa<E: Env> {
    discretizer: Discretizer,
    q: QTable,
    discount_factor: f64,
    lr: LearningRate,
    explorer: EpsilonGreedy,
    train: bool,
    td_error: TdErrorMean,
    rng: SmallRng,
    /// Breaks greedy ties in evaluation mode.
    eval_rng: SmallRng,
    phantom: PhantomData<E>,
}

impl<E: Env> ExpectedSarsa<E> {
    /// Constructs the agent with a zero table.
    pub fn build(config: TabularConfig) -> Result<Self> {
        let discretizer = Discretizer::build(&config.bins)?;
        let q = QTable::new(&discretizer, config.n_actions)?;

        Ok(Self {
            discretizer,
            q,
            discount_factor: config.discount_factor,
            lr: config.lr,
            explorer: config.explorer,
            train: true,
            td_error: TdErrorMean::default(),
            rng: SmallRng::seed_from_u64(config.seed),
            eval_rng: SmallRng::seed_from_u64(config.seed.wrapping_add(1)),
            phantom: PhantomData,
        })
    }

    /// The action-value table.
    pub fn q(&self) -> &QTable {
        &self.q
    }

    /// Expected action value in `s` under the epsilon-greedy policy.
    pub fn expected_value(&self, s: &State) -> f64 {
        let values = self.q.action_values(s);
        self.explorer
            .probs(&values)
            .iter()
            .zip(values.iter())
            .map(|(p, v)| p * v)
            .sum()
    }

    fn state(&self, obs: &E::Obs) -> State {
        self.discretizer.discretize(obs.as_slice())
    }
}

impl<E: Env> Policy<E> for ExpectedSarsa<E> {
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

impl<E: Env> Agent<E> for ExpectedSarsa<E> {
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

    fn begin_episode(&mut self, episode: usize) {
        if self.train {
            self.lr.on_episode(episode);
        }
    }

    fn observe(&mut self, obs: &E::Obs, step: &Step<E>) -> Result<Record> {
        if !self.train {
            return Ok(Record::empty());
        }

        let s = self.state(obs);
        let target = match step.is_terminated {
            true => step.reward as f64,
            false => {
                let s_ = self.state(&step.obs);
                step.reward as f64 + self.discount_factor * self.expected_value(&s_)
            }
        };
        let delta = self.q.update(&s, step.act.index(), target, self.lr.rate());
        self.td_error.push(delta);

        Ok(Record::empty())
    }

    fn end_episode(&mut self) -> Result<Record> {
        if !self.train {
            return Ok(Record::empty());
        }

        let mut record = Record::from_slice(&[
            ("epsilon", RecordValue::Scalar(self.explorer.eps() as f32)),
            ("lr", RecordValue::Scalar(self.lr.rate() as f32)),
        ]);
        if let Some(td_error) = self.td_error.take() {
            record.insert("td_error", RecordValue::Scalar(td_error));
        }
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
