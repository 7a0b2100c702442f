//! Sample battles implementing `BattleState`.

pub mod duel;
