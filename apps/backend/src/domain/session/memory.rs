//! Memory match: flip two cards at a time and find every pair.

use rand::seq::SliceRandom;

use super::{GameRules, SessionCtx};
use crate::domain::game_kind::{Difficulty, GameKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    pub card_count: [usize; 3],
    pub starting_score: u64,
    pub move_cost: u64,
    pub match_bonus: u64,
    pub resolve_delay_ms: u64,
    pub decay_every_ms: u64,
    pub decay_points: u64,
    pub time_bonus_max: u64,
    pub time_bonus_per_second: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            card_count: [12, 16, 20],
            starting_score: 10_000,
            move_cost: 50,
            match_bonus: 500,
            resolve_delay_ms: 800,
            decay_every_ms: 5_000,
            decay_points: 10,
            time_bonus_max: 1_000,
            time_bonus_per_second: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Hidden,
    Flipped,
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub face: u8,
    pub state: CardState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryInput {
    Flip(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPair {
    first: usize,
    second: usize,
    resolve_at_ms: u64,
}

#[derive(Debug, Default)]
pub struct Memory {
    config: MemoryConfig,
    cards: Vec<Card>,
    open: Option<usize>,
    pending: Option<PendingPair>,
    matched_pairs: usize,
    decay_steps: u64,
}

impl Memory {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn is_resolving(&self) -> bool {
        self.pending.is_some()
    }

    fn all_matched(&self) -> bool {
        !self.cards.is_empty() && self.matched_pairs * 2 == self.cards.len()
    }

    fn resolve(&mut self, pair: PendingPair, ctx: &mut SessionCtx) {
        if self.cards[pair.first].face == self.cards[pair.second].face {
            self.cards[pair.first].state = CardState::Matched;
            self.cards[pair.second].state = CardState::Matched;
            self.matched_pairs += 1;
            ctx.board.add(self.config.match_bonus);
            ctx.board.extend_streak();
        } else {
            self.cards[pair.first].state = CardState::Hidden;
            self.cards[pair.second].state = CardState::Hidden;
            ctx.board.break_streak();
        }
    }
}

fn multiply(score: u64, difficulty: Difficulty) -> u64 {
    match difficulty {
        Difficulty::Easy => score,
        Difficulty::Medium => score.saturating_mul(3) / 2,
        Difficulty::Hard => score.saturating_mul(2),
    }
}

impl GameRules for Memory {
    type Input = MemoryInput;

    fn kind(&self) -> GameKind {
        GameKind::Memory
    }

    fn start(&mut self, ctx: &mut SessionCtx) {
        let count = ctx.difficulty.pick(self.config.card_count);
        let mut faces: Vec<u8> = (0..count / 2).flat_map(|f| [f as u8, f as u8]).collect();
        faces.shuffle(&mut ctx.rng);
        self.cards = faces
            .into_iter()
            .map(|face| Card {
                face,
                state: CardState::Hidden,
            })
            .collect();
        self.open = None;
        self.pending = None;
        self.matched_pairs = 0;
        self.decay_steps = 0;
        ctx.board.score = self.config.starting_score;
    }

    fn advance(&mut self, ctx: &mut SessionCtx) -> bool {
        if let Some(pair) = self.pending {
            if ctx.now_ms >= pair.resolve_at_ms {
                self.pending = None;
                self.resolve(pair, ctx);
            }
        }

        let steps = ctx.elapsed_ms() / self.config.decay_every_ms.max(1);
        if steps > self.decay_steps {
            ctx.board
                .deduct((steps - self.decay_steps).saturating_mul(self.config.decay_points));
            self.decay_steps = steps;
        }

        self.all_matched()
    }

    fn apply(&mut self, input: MemoryInput, ctx: &mut SessionCtx) -> bool {
        let MemoryInput::Flip(idx) = input;
        if self.pending.is_some() {
            return false;
        }
        match self.cards.get(idx) {
            Some(card) if card.state == CardState::Hidden => {}
            _ => return false,
        }

        self.cards[idx].state = CardState::Flipped;
        match self.open.take() {
            None => self.open = Some(idx),
            Some(first) => {
                ctx.board.moves += 1;
                ctx.board.deduct(self.config.move_cost);
                self.pending = Some(PendingPair {
                    first,
                    second: idx,
                    resolve_at_ms: ctx.now_ms + self.config.resolve_delay_ms,
                });
            }
        }
        false
    }

    fn finish(&mut self, ctx: &mut SessionCtx) {
        if !self.all_matched() {
            return;
        }
        let elapsed_s = ctx.elapsed_ms() / 1000;
        let bonus = self
            .config
            .time_bonus_max
            .saturating_sub(elapsed_s.saturating_mul(self.config.time_bonus_per_second));
        ctx.board.add(bonus);
        ctx.board.score = multiply(ctx.board.score, ctx.difficulty);
    }
}
