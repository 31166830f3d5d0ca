//! Tabular action values.
use super::argmax_random_tie;
use crate::{error::TdrlError, Discretizer, State};
use anyhow::Result;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::{Read, Write},
    path::Path,
};

/// Key of a table entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateAction {
    /// Discrete state.
    pub state: State,

    /// Action index.
    pub action: usize,
}

impl StateAction {
    /// Constructs a key.
    pub fn new(state: State, action: usize) -> Self {
        Self { state, action }
    }
}

/// Signature of the state space a table was built for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSpace {
    /// Bin edges of the discretizer.
    pub edges: Vec<Vec<f64>>,

    /// The number of actions.
    pub n_actions: usize,
}

/// Serialized form of a [`QTable`]: the state space signature and a flat mapping from
/// `(state, action)` to value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// State space of the table.
    pub space: StateSpace,

    /// Values keyed by `(state, action)`.
    pub entries: BTreeMap<StateAction, f64>,
}

/// Action values of discrete states.
///
/// The table is populated with zeros for every state of the discretizer and every
/// action when constructed. Entries not in the table read as zero.
#[derive(Clone, Debug)]
pub struct QTable {
    space: StateSpace,
    values: HashMap<StateAction, f64>,
}

impl QTable {
    /// Constructs a table over all states of `discretizer` and `n_actions` actions.
    pub fn new(discretizer: &Discretizer, n_actions: usize) -> Result<Self, TdrlError> {
        if n_actions == 0 {
            return Err(TdrlError::Configuration(
                "table needs at least one action".to_string(),
            ));
        }
        let values = discretizer
            .states()
            .flat_map(|s| (0..n_actions).map(move |a| (StateAction::new(s.clone(), a), 0.0)))
            .collect();
        let space = StateSpace {
            edges: discretizer.edges().to_vec(),
            n_actions,
        };

        Ok(Self { space, values })
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.space.n_actions
    }

    /// State space of the table.
    pub fn space(&self) -> &StateSpace {
        &self.space
    }

    /// Value of `action` in `state`, zero for unseen pairs.
    pub fn get(&self, state: &State, action: usize) -> f64 {
        self.values
            .get(&StateAction::new(state.clone(), action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Values of all actions in `state`.
    pub fn action_values(&self, state: &State) -> Vec<f64> {
        (0..self.n_actions()).map(|a| self.get(state, a)).collect()
    }

    /// The largest action value in `state`.
    pub fn max_value(&self, state: &State) -> f64 {
        self.action_values(state)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// The action with the largest value in `state`, ties broken uniformly at random.
    pub fn best_action<R: Rng + ?Sized>(&self, state: &State, rng: &mut R) -> usize {
        argmax_random_tie(&self.action_values(state), rng)
    }

    /// Moves the value of `(state, action)` towards `target`: `v += rate * (target - v)`.
    ///
    /// Returns the error `target - v` before the update.
    pub fn update(&mut self, state: &State, action: usize, target: f64, rate: f64) -> f64 {
        let v = self
            .values
            .entry(StateAction::new(state.clone(), action))
            .or_insert(0.0);
        let delta = target - *v;
        *v += rate * delta;
        delta
    }

    /// Overwrites the value of `(state, action)`.
    pub fn set(&mut self, state: &State, action: usize, value: f64) {
        self.values
            .insert(StateAction::new(state.clone(), action), value);
    }

    /// Iterates over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&StateAction, &f64)> {
        self.values.iter()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Takes a snapshot of the table.
    pub fn snapshot(&self) -> Snapshot {
        let entries = self.values.iter().map(|(k, v)| (k.clone(), *v)).collect();
        Snapshot {
            space: self.space.clone(),
            entries,
        }
    }

    /// Restores a table from a snapshot, checking it against the configured state space.
    pub fn from_snapshot(
        snapshot: Snapshot,
        discretizer: &Discretizer,
        n_actions: usize,
    ) -> Result<Self, TdrlError> {
        if snapshot.space.n_actions != n_actions {
            return Err(TdrlError::StateSpaceMismatch(format!(
                "snapshot has {} actions, expected {}",
                snapshot.space.n_actions, n_actions
            )));
        }
        if snapshot.space.edges.as_slice() != discretizer.edges() {
            return Err(TdrlError::StateSpaceMismatch(
                "snapshot was taken with different bin edges".to_string(),
            ));
        }

        let mut values = HashMap::with_capacity(snapshot.entries.len());
        for (key, v) in snapshot.entries.into_iter() {
            if !discretizer.contains(&key.state) || key.action >= n_actions {
                return Err(TdrlError::StateSpaceMismatch(format!(
                    "entry {:?} is outside of the state space",
                    key
                )));
            }
            values.insert(key, v);
        }

        Ok(Self {
            space: snapshot.space,
            values,
        })
    }

    /// Writes a snapshot of the table to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let buf = bincode::serialize(&self.snapshot())?;
        let mut file = fs::File::create(path)?;
        file.write_all(&buf)?;
        info!("Saved table with {} entries to {:?}", self.len(), path);
        Ok(())
    }

    /// Reads a table written by [`QTable::save`].
    ///
    /// Fails with [`TdrlError::StateSpaceMismatch`] if the snapshot does not fit
    /// `discretizer` and `n_actions`.
    pub fn load(path: impl AsRef<Path>, discretizer: &Discretizer, n_actions: usize) -> Result<Self> {
        let path = path.as_ref();
        let mut file = fs::OpenOptions::new().read(true).open(path)?;
        let mut buf = Vec::<u8>::new();
        file.read_to_end(&mut buf)?;
        let snapshot: Snapshot = bincode::deserialize(&buf[..])?;
        let table = Self::from_snapshot(snapshot, discretizer, n_actions)?;
        info!("Loaded table with {} entries from {:?}", table.len(), path);
        Ok(table)
    }
}
