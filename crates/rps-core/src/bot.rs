//! Opponent move selection.
//!
//! The engine asks an [`OpponentStrategy`] for the opponent's move each
//! round. Two strategies ship with the crate:
//! - `RandomOpponent`: the default policy, bomb with a fixed chance while it
//!   is still available, otherwise a uniform classic move
//! - `ScriptedOpponent`: plays a fixed sequence, for tests and replays

use crate::game::GameState;
use crate::moves::Move;
use rand::prelude::*;
use std::collections::VecDeque;

/// Supplies the opponent's move for the round about to be played
pub trait OpponentStrategy: Send + Sync {
    fn choose_move(&mut self, state: &GameState) -> Move;
}

impl<F> OpponentStrategy for F
where
    F: FnMut(&GameState) -> Move + Send + Sync,
{
    fn choose_move(&mut self, state: &GameState) -> Move {
        self(state)
    }
}

/// Default opponent policy
pub struct RandomOpponent {
    bomb_probability: f64,
    rng: StdRng,
}

impl RandomOpponent {
    /// `bomb_probability` is clamped to `[0, 1]`, NaN counts as never
    pub fn new(bomb_probability: f64) -> Self {
        Self {
            bomb_probability: clamp_probability(bomb_probability),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(bomb_probability: f64, seed: u64) -> Self {
        Self {
            bomb_probability: clamp_probability(bomb_probability),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn bomb_probability(&self) -> f64 {
        self.bomb_probability
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

impl OpponentStrategy for RandomOpponent {
    fn choose_move(&mut self, state: &GameState) -> Move {
        if !state.opponent_bomb_used && self.rng.gen_bool(self.bomb_probability) {
            return Move::Bomb;
        }
        Move::CLASSIC[self.rng.gen_range(0..Move::CLASSIC.len())]
    }
}

/// Plays a fixed list of moves in order, then `fallback` once it runs out
#[derive(Debug, Clone)]
pub struct ScriptedOpponent {
    moves: VecDeque<Move>,
    fallback: Move,
}

impl ScriptedOpponent {
    pub fn new(moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
            fallback: Move::Rock,
        }
    }

    /// Always plays the same move
    pub fn repeating(mv: Move) -> Self {
        Self {
            moves: VecDeque::new(),
            fallback: mv,
        }
    }

    pub fn with_fallback(mut self, fallback: Move) -> Self {
        self.fallback = fallback;
        self
    }

    /// Scripted moves not yet played
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl OpponentStrategy for ScriptedOpponent {
    fn choose_move(&mut self, _state: &GameState) -> Move {
        self.moves.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_opponent_plays_in_order() {
        let state = GameState::default();
        let mut bot = ScriptedOpponent::new([Move::Paper, Move::Bomb]).with_fallback(Move::Scissors);

        assert_eq!(bot.choose_move(&state), Move::Paper);
        assert_eq!(bot.choose_move(&state), Move::Bomb);
        assert_eq!(bot.remaining(), 0);
        assert_eq!(bot.choose_move(&state), Move::Scissors);
    }

    #[test]
    fn test_random_opponent_never_bombs_twice() {
        let mut state = GameState::default();
        state.opponent_bomb_used = true;
        let mut bot = RandomOpponent::with_seed(1.0, 42);

        for _ in 0..100 {
            assert_ne!(bot.choose_move(&state), Move::Bomb);
        }
    }

    #[test]
    fn test_random_opponent_bombs_when_certain() {
        let state = GameState::default();
        let mut bot = RandomOpponent::with_seed(1.0, 42);
        assert_eq!(bot.choose_move(&state), Move::Bomb);
    }

    #[test]
    fn test_out_of_range_probability_is_clamped() {
        let state = GameState::default();

        let mut always = RandomOpponent::with_seed(3.5, 1);
        assert_eq!(always.bomb_probability(), 1.0);
        assert_eq!(always.choose_move(&state), Move::Bomb);

        for p in [-0.5, f64::NAN] {
            let mut never = RandomOpponent::with_seed(p, 1);
            assert_eq!(never.bomb_probability(), 0.0);
            for _ in 0..50 {
                assert_ne!(never.choose_move(&state), Move::Bomb);
            }
        }
    }

    #[test]
    fn test_random_opponent_is_reproducible_from_seed() {
        let state = GameState::default();
        let mut a = RandomOpponent::with_seed(0.2, 7);
        let mut b = RandomOpponent::with_seed(0.2, 7);

        let first: Vec<Move> = (0..20).map(|_| a.choose_move(&state)).collect();
        let second: Vec<Move> = (0..20).map(|_| b.choose_move(&state)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_opponent_distribution() {
        let state = GameState::default();
        let mut bot = RandomOpponent::with_seed(0.2, 1234);
        let samples = 20_000;

        let mut counts = [0u32; 4];
        for _ in 0..samples {
            let idx = Move::ALL
                .iter()
                .position(|m| *m == bot.choose_move(&state))
                .unwrap();
            counts[idx] += 1;
        }

        // bomb 0.2, each classic move 0.8 / 3
        let bomb_share = counts[3] as f64 / samples as f64;
        assert!((bomb_share - 0.2).abs() < 0.02, "bomb share {}", bomb_share);
        for count in &counts[..3] {
            let share = *count as f64 / samples as f64;
            assert!((share - 0.8 / 3.0).abs() < 0.02, "classic share {}", share);
        }
    }

    #[test]
    fn test_closure_strategy() {
        let state = GameState::default();
        let mut strategy = |s: &GameState| {
            if s.current_round == 1 {
                Move::Paper
            } else {
                Move::Rock
            }
        };
        assert_eq!(OpponentStrategy::choose_move(&mut strategy, &state), Move::Paper);
    }
}
