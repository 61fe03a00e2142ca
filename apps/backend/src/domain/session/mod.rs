//! Generic play-session engine shared by every mini-game.
//!
//! A [`Session`] owns the clock, the score board and a seeded RNG; the game
//! specific behaviour sits behind [`GameRules`]. Lifecycle is
//! `Idle -> Active -> Ended` with no way back: a replay is a new `Session`.
//!
//! Time is supplied by the caller in milliseconds. The engine never reads a
//! wall clock, so the same seed and the same input timeline always produce the
//! same result.

pub mod color_rush;
pub mod memory;
pub mod tap_reaction;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

use crate::domain::game_kind::{Difficulty, GameKind};

pub use color_rush::{ColorRush, ColorRushInput};
pub use memory::{Memory, MemoryInput};
pub use tap_reaction::{TapInput, TapReaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session can only be started from Idle")]
    NotIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub moves: u32,
    pub best_streak: u32,
    pub misses: u32,
    pub level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lives_left: Option<u32>,
}

/// Terminal outcome of a finished session, produced exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_id: Ulid,
    pub game_kind: GameKind,
    pub score: u64,
    pub duration_seconds: u64,
    pub difficulty: Difficulty,
    pub metrics: SessionMetrics,
}

/// Running counters. Every decrement saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scoreboard {
    pub score: u64,
    pub misses: u32,
    pub moves: u32,
    pub streak: u32,
    pub best_streak: u32,
}

impl Scoreboard {
    pub fn add(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn deduct(&mut self, points: u64) {
        self.score = self.score.saturating_sub(points);
    }

    pub fn extend_streak(&mut self) -> u32 {
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
        self.streak
    }

    pub fn break_streak(&mut self) {
        self.streak = 0;
    }
}

/// Mutable state the engine lends to the rules on every call.
#[derive(Debug)]
pub struct SessionCtx {
    pub difficulty: Difficulty,
    pub rng: ChaCha8Rng,
    pub board: Scoreboard,
    pub started_at_ms: u64,
    pub now_ms: u64,
}

impl SessionCtx {
    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.started_at_ms)
    }
}

/// Per-game behaviour plugged into [`Session`].
pub trait GameRules {
    type Input;

    fn kind(&self) -> GameKind;

    /// Initialise the schedule for `ctx.difficulty`. The board is already zeroed.
    fn start(&mut self, ctx: &mut SessionCtx);

    /// Bring the game up to `ctx.now_ms`. Returns `true` when the session is over.
    fn advance(&mut self, ctx: &mut SessionCtx) -> bool;

    /// Handle one input at `ctx.now_ms`. Returns `true` when the session is over.
    fn apply(&mut self, input: Self::Input, ctx: &mut SessionCtx) -> bool;

    /// Final score adjustments, run once right before the result is built.
    fn finish(&mut self, _ctx: &mut SessionCtx) {}

    fn metrics(&self, board: &Scoreboard) -> SessionMetrics {
        SessionMetrics {
            moves: board.moves,
            best_streak: board.best_streak,
            misses: board.misses,
            level: 1,
            lives_left: None,
        }
    }
}

#[derive(Debug)]
pub struct Session<R: GameRules> {
    id: Ulid,
    rules: R,
    phase: Phase,
    ctx: SessionCtx,
    result: Option<SessionResult>,
}

impl<R: GameRules> Session<R> {
    pub fn new(rules: R, difficulty: Difficulty, seed: u64) -> Self {
        Self {
            id: Ulid::new(),
            rules,
            phase: Phase::Idle,
            ctx: SessionCtx {
                difficulty,
                rng: ChaCha8Rng::seed_from_u64(seed),
                board: Scoreboard::default(),
                started_at_ms: 0,
                now_ms: 0,
            },
            result: None,
        }
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.ctx.board.score
    }

    pub fn board(&self) -> &Scoreboard {
        &self.ctx.board
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn start(&mut self, now_ms: u64) -> Result<(), SessionError> {
        if self.phase != Phase::Idle {
            return Err(SessionError::NotIdle);
        }
        self.ctx.board = Scoreboard::default();
        self.ctx.started_at_ms = now_ms;
        self.ctx.now_ms = now_ms;
        self.rules.start(&mut self.ctx);
        self.phase = Phase::Active;
        Ok(())
    }

    /// Advance the clock. Returns the result on the tick that ends the session.
    pub fn tick(&mut self, now_ms: u64) -> Option<SessionResult> {
        if self.phase != Phase::Active {
            return None;
        }
        self.clock_to(now_ms);
        if self.rules.advance(&mut self.ctx) {
            return Some(self.end());
        }
        None
    }

    pub fn input(&mut self, input: R::Input, now_ms: u64) -> Option<SessionResult> {
        if self.phase != Phase::Active {
            return None;
        }
        self.clock_to(now_ms);
        if self.rules.advance(&mut self.ctx) || self.rules.apply(input, &mut self.ctx) {
            return Some(self.end());
        }
        None
    }

    /// Drop an unfinished session. No result is produced.
    pub fn abandon(&mut self) {
        if self.phase != Phase::Ended {
            tracing::debug!(session_id = %self.id, kind = %self.rules.kind(), "session abandoned");
            self.phase = Phase::Ended;
        }
    }

    fn clock_to(&mut self, now_ms: u64) {
        self.ctx.now_ms = self.ctx.now_ms.max(now_ms);
    }

    fn end(&mut self) -> SessionResult {
        self.rules.finish(&mut self.ctx);
        self.phase = Phase::Ended;
        let result = SessionResult {
            session_id: self.id,
            game_kind: self.rules.kind(),
            score: self.ctx.board.score,
            duration_seconds: self.ctx.elapsed_ms() / 1000,
            difficulty: self.ctx.difficulty,
            metrics: self.rules.metrics(&self.ctx.board),
        };
        self.result = Some(result.clone());
        result
    }
}
