//! Double Q-learning.
use crate::{
    util::{check_space, TdErrorMean},
    EpsilonGreedy, LearningRate, TabularConfig,
};
use anyhow::Result;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::{marker::PhantomData, path::Path};
use tdrl_core::{
    argmax_random_tie,
    record::{Record, RecordValue},
    Act, Agent, Discretizer, Env, Obs, ObservationSpace, Policy, QTable, State, Step,
};

/// Q-learning with two action-value tables.
///
/// The behaviour policy is epsilon-greedy on `Q1 + Q2`. After every step a fair coin
/// picks the table to update. The updated table chooses the greedy action in the next
/// state by its own values and the other table evaluates that action:
///
/// ```text
/// Q1(s, a) += lr * (r + gamma * Q2(s', argmax Q1(s', .)) - Q1(s, a))
/// ```
///
/// and symmetrically for `Q2`.
pub struct DoubleQLearning<E: Env> {
    discretizer: Discretizer,
    q1: QTable,
    q2: QTable,
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

/// Moves `q_upd(s, a)` towards the target evaluated with `q_eval`.
#[allow(clippy::too_many_arguments)]
fn cross_update<R: Rng>(
    q_upd: &mut QTable,
    q_eval: &QTable,
    s: &State,
    a: usize,
    r: f64,
    s_: Option<&State>,
    discount_factor: f64,
    rate: f64,
    rng: &mut R,
) -> f64 {
    let target = match s_ {
        None => r,
        Some(s_) => {
            let a_ = q_upd.best_action(s_, rng);
            r + discount_factor * q_eval.get(s_, a_)
        }
    };
    q_upd.update(s, a, target, rate)
}

impl<E: Env> DoubleQLearning<E> {
    /// Constructs the agent with two zero tables.
    pub fn build(config: TabularConfig) -> Result<Self> {
        let discretizer = Discretizer::build(&config.bins)?;
        let q1 = QTable::new(&discretizer, config.n_actions)?;
        let q2 = q1.clone();

        Ok(Self {
            discretizer,
            q1,
            q2,
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

    /// The two action-value tables.
    pub fn tables(&self) -> (&QTable, &QTable) {
        (&self.q1, &self.q2)
    }

    /// Current epsilon of the behaviour policy.
    pub fn epsilon(&self) -> f64 {
        self.explorer.eps()
    }

    /// `Q1(s, .) + Q2(s, .)`.
    pub fn summed_values(&self, s: &State) -> Vec<f64> {
        self.q1
            .action_values(s)
            .into_iter()
            .zip(self.q2.action_values(s))
            .map(|(v1, v2)| v1 + v2)
            .collect()
    }

    fn state(&self, obs: &E::Obs) -> State {
        self.discretizer.discretize(obs.as_slice())
    }

    fn n_actions(&self) -> usize {
        self.q1.n_actions()
    }
}

impl<E: Env> Policy<E> for DoubleQLearning<E> {
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        let s = self.state(obs);
        let values = self.summed_values(&s);
        let a = if self.train {
            self.explorer
                .action(self.n_actions(), &mut self.rng, |rng| {
                    argmax_random_tie(&values, rng)
                })
        } else {
            argmax_random_tie(&values, &mut self.eval_rng)
        };
        a.into()
    }
}

impl<E: Env> Agent<E> for DoubleQLearning<E> {
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
        check_space(&self.discretizer, self.n_actions(), obs_space, n_actions)
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
        let s_ = self.state(&step.obs);
        let s_ = match step.is_terminated {
            true => None,
            false => Some(&s_),
        };
        let (a, r, rate) = (step.act.index(), step.reward as f64, self.lr.rate());

        let delta = if self.rng.gen::<f64>() <= 0.5 {
            cross_update(
                &mut self.q1,
                &self.q2,
                &s,
                a,
                r,
                s_,
                self.discount_factor,
                rate,
                &mut self.rng,
            )
        } else {
            cross_update(
                &mut self.q2,
                &self.q1,
                &s,
                a,
                r,
                s_,
                self.discount_factor,
                rate,
                &mut self.rng,
            )
        };
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

    /// The largest summed action value.
    fn value(&self, obs: &E::Obs) -> f64 {
        self.summed_values(&self.state(obs))
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        self.q1.save(path.join("q1.bin"))?;
        self.q2.save(path.join("q2.bin"))?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let n_actions = self.n_actions();
        self.q1 = QTable::load(path.join("q1.bin"), &self.discretizer, n_actions)?;
        self.q2 = QTable::load(path.join("q2.bin"), &self.discretizer, n_actions)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_updated_table_is_evaluated_by_the_other() -> Result<()> {
        let d = Discretizer::new(vec![vec![0.5]])?;
        let mut q1 = QTable::new(&d, 2)?;
        let mut q2 = QTable::new(&d, 2)?;
        let (s, s_) = (State(vec![0]), State(vec![1]));

        // Q1 prefers action 0 in s', Q2 prefers action 1.
        q1.set(&s_, 0, 1.0);
        q2.set(&s_, 0, 10.0);
        q2.set(&s_, 1, 100.0);

        let mut rng = SmallRng::seed_from_u64(0);
        let delta = cross_update(&mut q1, &q2, &s, 1, 0.5, Some(&s_), 1.0, 1.0, &mut rng);

        // The target uses Q1's choice (action 0) valued by Q2.
        assert_eq!(delta, 10.5);
        assert_eq!(q1.get(&s, 1), 10.5);
        assert_eq!(q2.get(&s, 1), 0.0);
        Ok(())
    }

    #[test]
    fn test_terminal_step_does_not_bootstrap() -> Result<()> {
        let d = Discretizer::new(vec![vec![0.5]])?;
        let mut q1 = QTable::new(&d, 2)?;
        let mut q2 = QTable::new(&d, 2)?;
        q2.set(&State(vec![1]), 0, 100.0);

        let mut rng = SmallRng::seed_from_u64(0);
        cross_update(&mut q1, &q2, &State(vec![0]), 0, 1.0, None, 1.0, 0.5, &mut rng);
        assert_eq!(q1.get(&State(vec![0]), 0), 0.5);
        Ok(())
    }
}
