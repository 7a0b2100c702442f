//! Small battle states shared by the integration tests.

#![allow(dead_code)]

use battle_mcts::core::GameRng;
use battle_mcts::rules::BattleState;

/// Fixed-depth ladder: each step picks one of `arms`; higher arms score more.
///
/// A hidden noise roll made in `resample` is added to the score, so leaves
/// are stochastic while the legal set stays fixed.
#[derive(Clone, Debug)]
pub struct Ladder {
    pub arms: u8,
    pub depth: u8,
    pub max_depth: u8,
    pub sum: u32,
    pub noise: f64,
}

impl Ladder {
    pub fn new(arms: u8, max_depth: u8) -> Self {
        Self { arms, depth: 0, max_depth, sum: 0, noise: 0.0 }
    }
}

impl BattleState for Ladder {
    type Action = u8;

    fn legal_actions(&self) -> Vec<u8> {
        if self.is_terminal() {
            vec![]
        } else {
            (0..self.arms).collect()
        }
    }

    fn apply(&mut self, action: &u8, _rng: &mut GameRng) {
        self.sum += *action as u32;
        self.depth += 1;
    }

    fn resample(&self, rng: &mut GameRng) -> Self {
        let mut sample = self.clone();
        sample.noise = rng.gen_f64() * 0.1;
        sample
    }

    fn is_terminal(&self) -> bool {
        self.depth >= self.max_depth
    }

    fn score(&self) -> f64 {
        let best = (self.arms.max(2) as u32 - 1) * self.max_depth.max(1) as u32;
        self.sum as f64 / best as f64 + self.noise
    }
}

/// Hand whose second card is hidden: each resample deals `Left` or `Right`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Card {
    Stay,
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct HiddenHand {
    pub second: Card,
    pub played: Option<Card>,
}

impl BattleState for HiddenHand {
    type Action = Card;

    fn legal_actions(&self) -> Vec<Card> {
        if self.played.is_some() {
            vec![]
        } else {
            vec![Card::Stay, self.second.clone()]
        }
    }

    fn apply(&mut self, action: &Card, _rng: &mut GameRng) {
        self.played = Some(action.clone());
    }

    fn resample(&self, rng: &mut GameRng) -> Self {
        let second = if rng.gen_range_usize(0..2) == 0 { Card::Left } else { Card::Right };
        Self { second, played: self.played.clone() }
    }

    fn is_terminal(&self) -> bool {
        self.played.is_some()
    }

    fn score(&self) -> f64 {
        match self.played {
            Some(Card::Right) => 1.0,
            Some(Card::Left) => 0.5,
            _ => 0.2,
        }
    }
}
