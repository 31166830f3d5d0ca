//! Value estimates at fixed diagnostic observations.
use super::Evaluator;
use crate::{
    record::{Record, RecordValue::Scalar},
    Agent, Env,
};
use anyhow::Result;
use std::collections::BTreeMap;

/// Reads [`Agent::value`] at a fixed set of named observations.
///
/// Each evaluation adds `"value/<name>"` to the returned record and appends the value to
/// the history of the probe, so that runs with different learning rates can be compared
/// after training. The environment is not touched.
pub struct ProbeEvaluator<E: Env> {
    probes: Vec<(String, E::Obs)>,
    history: BTreeMap<String, Vec<f64>>,
}

impl<E: Env> ProbeEvaluator<E> {
    /// Constructs an evaluator probing the given observations.
    pub fn new(probes: Vec<(String, E::Obs)>) -> Self {
        let history = probes.iter().map(|(name, _)| (name.clone(), vec![])).collect();
        Self { probes, history }
    }

    /// Values of the probe `name`, one per evaluation.
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.history.get(name).map(|vs| vs.as_slice())
    }

    /// Histories of all probes.
    pub fn history(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.history
    }
}

impl<E: Env> Evaluator<E> for ProbeEvaluator<E> {
    fn evaluate<A: Agent<E>>(&mut self, agent: &mut A) -> Result<Record> {
        let mut record = Record::empty();

        for (name, obs) in self.probes.iter() {
            let v = agent.value(obs);
            record.insert(format!("value/{}", name), Scalar(v as f32));
            if let Some(vs) = self.history.get_mut(name) {
                vs.push(v);
            }
        }

        Ok(record)
    }
}
