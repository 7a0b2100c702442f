//! Duel game implementation.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::GameRng;
use crate::rules::BattleState;

/// Card kinds. Identity of a play is the kind, never the copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardKind {
    /// 1 energy: 6 damage.
    Strike,
    /// 1 energy: 5 block.
    Defend,
    /// 2 energy: 10 damage.
    Bash,
    /// 0 energy: draw a card.
    Quickdraw,
}

impl CardKind {
    /// All kinds in enumeration order.
    pub const ALL: [CardKind; 4] = [
        CardKind::Strike,
        CardKind::Defend,
        CardKind::Bash,
        CardKind::Quickdraw,
    ];

    /// Energy needed to play the card.
    #[must_use]
    pub const fn cost(self) -> u8 {
        match self {
            CardKind::Strike | CardKind::Defend => 1,
            CardKind::Bash => 2,
            CardKind::Quickdraw => 0,
        }
    }
}

/// Duel actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuelAction {
    /// Play one card of this kind from hand.
    Play(CardKind),
    /// Discard the hand and let the enemy act.
    EndTurn,
}

/// A duel between the player and one enemy.
///
/// Card piles use persistent vectors, so the per-iteration clone made by the
/// search is O(1).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DuelState {
    player_health: i64,
    player_max_health: i64,
    block: i64,
    energy: u8,
    energy_per_turn: u8,
    hand_size: usize,

    enemy_health: i64,
    enemy_max_health: i64,
    enemy_damage: (i64, i64),

    draw_pile: Vector<CardKind>,
    hand: Vector<CardKind>,
    discard: Vector<CardKind>,

    turn: u32,
    max_turns: u32,
}

/// Builder for creating a DuelState.
pub struct DuelBuilder {
    player_health: i64,
    enemy_health: i64,
    enemy_damage: (i64, i64),
    energy_per_turn: u8,
    hand_size: usize,
    max_turns: u32,
    deck: Vec<CardKind>,
}

impl Default for DuelBuilder {
    fn default() -> Self {
        let mut deck = Vec::new();
        deck.extend([CardKind::Strike; 5]);
        deck.extend([CardKind::Defend; 4]);
        deck.push(CardKind::Bash);
        deck.extend([CardKind::Quickdraw; 2]);

        Self {
            player_health: 50,
            enemy_health: 40,
            enemy_damage: (4, 10),
            energy_per_turn: 3,
            hand_size: 5,
            max_turns: 20,
            deck,
        }
    }
}

impl DuelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_health(mut self, health: i64) -> Self {
        self.player_health = health;
        self
    }

    pub fn enemy_health(mut self, health: i64) -> Self {
        self.enemy_health = health;
        self
    }

    pub fn enemy_damage(mut self, min: i64, max: i64) -> Self {
        assert!(0 <= min && min <= max, "Enemy damage range must be 0 <= min <= max");
        self.enemy_damage = (min, max);
        self
    }

    pub fn energy_per_turn(mut self, energy: u8) -> Self {
        self.energy_per_turn = energy;
        self
    }

    pub fn hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    pub fn max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    pub fn deck(mut self, deck: Vec<CardKind>) -> Self {
        self.deck = deck;
        self
    }

    /// Build the initial state: shuffled deck, opening hand drawn.
    pub fn build(self, seed: u64) -> DuelState {
        let mut rng = GameRng::new(seed);
        let mut deck = self.deck;
        rng.shuffle(&mut deck);

        let mut state = DuelState {
            player_health: self.player_health,
            player_max_health: self.player_health.max(1),
            block: 0,
            energy: self.energy_per_turn,
            energy_per_turn: self.energy_per_turn,
            hand_size: self.hand_size,
            enemy_health: self.enemy_health,
            enemy_max_health: self.enemy_health.max(1),
            enemy_damage: self.enemy_damage,
            draw_pile: deck.into_iter().collect(),
            hand: Vector::new(),
            discard: Vector::new(),
            turn: 0,
            max_turns: self.max_turns,
        };

        for _ in 0..state.hand_size {
            state.draw(&mut rng);
        }
        state
    }
}

impl DuelState {
    pub fn player_health(&self) -> i64 {
        self.player_health
    }

    pub fn enemy_health(&self) -> i64 {
        self.enemy_health
    }

    pub fn block(&self) -> i64 {
        self.block
    }

    pub fn energy(&self) -> u8 {
        self.energy
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn hand(&self) -> &Vector<CardKind> {
        &self.hand
    }

    pub fn draw_pile(&self) -> &Vector<CardKind> {
        &self.draw_pile
    }

    pub fn discard(&self) -> &Vector<CardKind> {
        &self.discard
    }

    /// Check if the enemy has been defeated.
    pub fn is_won(&self) -> bool {
        self.enemy_health <= 0 && self.player_health > 0
    }

    /// Draw one card, reshuffling the discard into an empty draw pile.
    fn draw(&mut self, rng: &mut GameRng) {
        if self.draw_pile.is_empty() {
            if self.discard.is_empty() {
                return;
            }
            let mut cards: Vec<CardKind> = self.discard.iter().copied().collect();
            rng.shuffle(&mut cards);
            self.draw_pile = cards.into_iter().collect();
            self.discard.clear();
        }

        if let Some(card) = self.draw_pile.pop_front() {
            self.hand.push_back(card);
        }
    }

    fn play(&mut self, kind: CardKind, rng: &mut GameRng) {
        let Some(idx) = self.hand.iter().position(|c| *c == kind) else {
            return;
        };
        if kind.cost() > self.energy {
            return;
        }

        let card = self.hand.remove(idx);
        self.energy -= kind.cost();

        match kind {
            CardKind::Strike => self.enemy_health -= 6,
            CardKind::Defend => self.block += 5,
            CardKind::Bash => self.enemy_health -= 10,
            CardKind::Quickdraw => self.draw(rng),
        }

        self.discard.push_back(card);
    }

    fn end_turn(&mut self, rng: &mut GameRng) {
        self.discard.append(std::mem::take(&mut self.hand));

        let (min, max) = self.enemy_damage;
        let damage = rng.gen_range_inclusive(min..=max);
        let absorbed = damage.min(self.block);
        self.player_health -= damage - absorbed;
        self.block = 0;

        self.turn += 1;
        self.energy = self.energy_per_turn;
        for _ in 0..self.hand_size {
            self.draw(rng);
        }
    }
}

impl BattleState for DuelState {
    type Action = DuelAction;

    fn legal_actions(&self) -> Vec<DuelAction> {
        if self.is_terminal() {
            return vec![];
        }

        let mut actions: Vec<DuelAction> = CardKind::ALL
            .iter()
            .filter(|&&kind| kind.cost() <= self.energy && self.hand.contains(&kind))
            .map(|&kind| DuelAction::Play(kind))
            .collect();

        // Can always end the turn
        actions.push(DuelAction::EndTurn);
        actions
    }

    fn apply(&mut self, action: &DuelAction, rng: &mut GameRng) {
        match *action {
            DuelAction::Play(kind) => self.play(kind, rng),
            DuelAction::EndTurn => self.end_turn(rng),
        }
    }

    fn resample(&self, rng: &mut GameRng) -> Self {
        // The hand and discard are known; only the draw order is hidden.
        let mut sample = self.clone();
        let mut cards: Vec<CardKind> = sample.draw_pile.iter().copied().collect();
        rng.shuffle(&mut cards);
        sample.draw_pile = cards.into_iter().collect();
        sample
    }

    fn is_terminal(&self) -> bool {
        self.player_health <= 0 || self.enemy_health <= 0 || self.turn >= self.max_turns
    }

    fn score(&self) -> f64 {
        if self.is_won() {
            1.0 + self.player_health as f64 / self.player_max_health as f64
        } else {
            let removed = self.enemy_max_health - self.enemy_health.max(0);
            removed as f64 / self.enemy_max_health as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strikes_only() -> DuelBuilder {
        DuelBuilder::new().deck(vec![CardKind::Strike; 10])
    }

    #[test]
    fn test_duel_creation() {
        let state = DuelBuilder::new().build(42);

        assert_eq!(state.player_health(), 50);
        assert_eq!(state.enemy_health(), 40);
        assert_eq!(state.energy(), 3);
        assert_eq!(state.hand().len(), 5);
        assert_eq!(state.draw_pile().len(), 7);
        assert!(state.discard().is_empty());
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_build_is_seeded() {
        let a = DuelBuilder::new().build(7);
        let b = DuelBuilder::new().build(7);
        assert_eq!(a.hand(), b.hand());
        assert_eq!(a.draw_pile(), b.draw_pile());
    }

    #[test]
    fn test_legal_actions_dedup_by_kind() {
        let state = strikes_only().build(1);
        let actions = state.legal_actions();

        assert_eq!(actions, vec![DuelAction::Play(CardKind::Strike), DuelAction::EndTurn]);
    }

    #[test]
    fn test_play_strike() {
        let mut state = strikes_only().build(1);
        let mut rng = GameRng::new(0);

        state.apply(&DuelAction::Play(CardKind::Strike), &mut rng);

        assert_eq!(state.enemy_health(), 34);
        assert_eq!(state.energy(), 2);
        assert_eq!(state.hand().len(), 4);
        assert_eq!(state.discard().len(), 1);
    }

    #[test]
    fn test_energy_limits_plays() {
        let mut state = strikes_only().energy_per_turn(1).build(1);
        let mut rng = GameRng::new(0);

        state.apply(&DuelAction::Play(CardKind::Strike), &mut rng);

        assert_eq!(state.legal_actions(), vec![DuelAction::EndTurn]);
    }

    #[test]
    fn test_end_turn_enemy_attacks_through_block() {
        let mut state = DuelBuilder::new()
            .deck(vec![CardKind::Defend; 10])
            .enemy_damage(8, 8)
            .build(3);
        let mut rng = GameRng::new(0);

        state.apply(&DuelAction::Play(CardKind::Defend), &mut rng);
        assert_eq!(state.block(), 5);

        state.apply(&DuelAction::EndTurn, &mut rng);

        assert_eq!(state.player_health(), 47);
        assert_eq!(state.block(), 0);
        assert_eq!(state.turn(), 1);
        assert_eq!(state.energy(), 3);
        assert_eq!(state.hand().len(), 5);
    }

    #[test]
    fn test_reshuffle_when_draw_pile_empty() {
        let mut state = strikes_only().enemy_damage(0, 0).build(5);
        let mut rng = GameRng::new(0);

        state.apply(&DuelAction::EndTurn, &mut rng);
        state.apply(&DuelAction::EndTurn, &mut rng);

        assert_eq!(state.hand().len(), 5);
        assert_eq!(state.hand().len() + state.draw_pile().len() + state.discard().len(), 10);
    }

    #[test]
    fn test_resample_keeps_known_information() {
        let state = DuelBuilder::new().build(11);
        let mut rng = GameRng::new(99);

        let sample = state.resample(&mut rng);

        assert_eq!(sample.hand(), state.hand());
        assert_eq!(sample.player_health(), state.player_health());
        assert_eq!(sample.legal_actions(), state.legal_actions());

        let mut a: Vec<_> = sample.draw_pile().iter().copied().collect();
        let mut b: Vec<_> = state.draw_pile().iter().copied().collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_win_scores_above_one() {
        let mut state = strikes_only().enemy_health(6).build(1);
        let mut rng = GameRng::new(0);

        state.apply(&DuelAction::Play(CardKind::Strike), &mut rng);

        assert!(state.is_terminal());
        assert!(state.is_won());
        assert_eq!(state.score(), 2.0);
        assert!(state.legal_actions().is_empty());
    }

    #[test]
    fn test_loss_scores_damage_fraction() {
        let mut state = strikes_only()
            .player_health(5)
            .enemy_health(20)
            .enemy_damage(10, 10)
            .build(1);
        let mut rng = GameRng::new(0);

        state.apply(&DuelAction::Play(CardKind::Strike), &mut rng);
        state.apply(&DuelAction::EndTurn, &mut rng);

        assert!(state.is_terminal());
        assert!(!state.is_won());
        assert!((state.score() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_turn_limit_is_terminal() {
        let mut state = strikes_only().enemy_damage(0, 0).max_turns(2).build(1);
        let mut rng = GameRng::new(0);

        state.apply(&DuelAction::EndTurn, &mut rng);
        assert!(!state.is_terminal());
        state.apply(&DuelAction::EndTurn, &mut rng);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_quickdraw_draws() {
        let mut deck = vec![CardKind::Quickdraw];
        deck.extend([CardKind::Strike; 9]);
        let mut state = DuelBuilder::new().deck(deck).hand_size(10).build(2);
        let mut rng = GameRng::new(0);

        // Whole deck in hand: quickdraw has nothing left to draw
        state.apply(&DuelAction::Play(CardKind::Quickdraw), &mut rng);
        assert_eq!(state.hand().len(), 9);
        assert_eq!(state.energy(), 3);

        let mut deck = vec![CardKind::Quickdraw];
        deck.extend([CardKind::Strike; 9]);
        let mut state = DuelBuilder::new().deck(deck).hand_size(10).build(2);
        state.apply(&DuelAction::Play(CardKind::Strike), &mut rng);
        state.apply(&DuelAction::Play(CardKind::Quickdraw), &mut rng);
        // Draws back the played strike from the reshuffled discard
        assert_eq!(state.hand().len(), 9);
        assert_eq!(state.hand().iter().filter(|c| **c == CardKind::Strike).count(), 9);
    }

    #[test]
    fn test_serialization() {
        let state = DuelBuilder::new().build(4);
        let json = serde_json::to_string(&state).unwrap();
        let back: DuelState = serde_json::from_str(&json).unwrap();

        assert_eq!(back.hand(), state.hand());
        assert_eq!(back.enemy_health(), state.enemy_health());
    }
}
