//! Simplified blackjack.
use crate::util::{load_config, save_config};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tdrl_core::{record::Record, Act, DiscreteAct, Env, ObservationSpace, Step, VecObs};

/// Face cards count 10, aces are drawn as 1.
const DECK: [u32; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];

/// Configuration of [`Blackjack`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlackjackConfig {
    /// Pays 1.5 for a winning natural (ace and ten-card) hand.
    pub natural: bool,
}

impl BlackjackConfig {
    /// Sets the natural bonus.
    pub fn natural(mut self, v: bool) -> Self {
        self.natural = v;
        self
    }

    /// Constructs [`BlackjackConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_config(path, "Blackjack")
    }

    /// Saves [`BlackjackConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_config(self, path, "Blackjack")
    }
}

#[derive(Clone, Debug, Default)]
struct Hand(Vec<u32>);

impl Hand {
    fn draw(rng: &fastrand::Rng) -> u32 {
        DECK[rng.usize(..DECK.len())]
    }

    fn deal(rng: &fastrand::Rng) -> Self {
        Self(vec![Self::draw(rng), Self::draw(rng)])
    }

    fn usable_ace(&self) -> bool {
        self.0.contains(&1) && self.0.iter().sum::<u32>() + 10 <= 21
    }

    fn sum(&self) -> u32 {
        let sum = self.0.iter().sum::<u32>();
        match self.usable_ace() {
            true => sum + 10,
            false => sum,
        }
    }

    fn is_bust(&self) -> bool {
        self.sum() > 21
    }

    fn score(&self) -> u32 {
        match self.is_bust() {
            true => 0,
            false => self.sum(),
        }
    }

    fn is_natural(&self) -> bool {
        self.0.len() == 2 && self.0.contains(&1) && self.0.contains(&10)
    }
}

/// Blackjack-v0 against a dealer who hits below 17, with an infinite deck.
///
/// The observation is `(player_sum, dealer_showing, usable_ace)`, the last being 0 or 1.
/// Action 0 sticks and action 1 hits. The episode ends with reward 1 for a win, -1 for a
/// loss and 0 for a draw; hitting without going bust yields reward 0.
pub struct Blackjack {
    config: BlackjackConfig,
    player: Hand,
    dealer: Hand,
    done: bool,
    rng: fastrand::Rng,
}

impl Blackjack {
    fn obs(&self) -> VecObs {
        VecObs(vec![
            self.player.sum() as f64,
            self.dealer.0[0] as f64,
            self.player.usable_ace() as u8 as f64,
        ])
    }

    fn start(&mut self, dealer: Hand, player: Hand) -> VecObs {
        self.dealer = dealer;
        self.player = player;
        self.done = false;
        self.obs()
    }

    fn stick(&mut self) -> f32 {
        while self.dealer.sum() < 17 {
            self.dealer.0.push(Hand::draw(&self.rng));
        }
        let (player, dealer) = (self.player.score(), self.dealer.score());
        let reward = (player > dealer) as i32 - (player < dealer) as i32;
        match self.config.natural && reward == 1 && self.player.is_natural() {
            true => 1.5,
            false => reward as f32,
        }
    }
}

impl Env for Blackjack {
    type Config = BlackjackConfig;
    type Obs = VecObs;
    type Act = DiscreteAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            player: Hand::default(),
            dealer: Hand::default(),
            done: true,
            rng: fastrand::Rng::with_seed(seed as u64),
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        if self.done {
            bail!("Blackjack stepped after the end of a game; call reset first");
        }
        let (reward, is_terminated) = match a.index() {
            0 => (self.stick(), true),
            1 => {
                self.player.0.push(Hand::draw(&self.rng));
                match self.player.is_bust() {
                    true => (-1.0, true),
                    false => (0.0, false),
                }
            }
            ix => bail!("invalid Blackjack action {}", ix),
        };
        self.done = is_terminated;

        let step = Step::new(self.obs(), *a, reward, is_terminated, false, ());
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        let dealer = Hand::deal(&self.rng);
        let player = Hand::deal(&self.rng);
        Ok(self.start(dealer, player))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        let rng = fastrand::Rng::with_seed(ix as u64);
        Ok(self.start(Hand::deal(&rng), Hand::deal(&rng)))
    }

    fn action_space(&self) -> usize {
        2
    }

    fn observation_space(&self) -> ObservationSpace {
        ObservationSpace::from_bounds(&[(4.0, 31.0), (1.0, 10.0), (0.0, 1.0)])
    }
}
