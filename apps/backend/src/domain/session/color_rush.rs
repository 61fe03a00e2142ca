//! Color rush: a color word is printed in a (possibly different) ink; pick the word.

use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use super::{GameRules, Scoreboard, SessionCtx, SessionMetrics};
use crate::domain::game_kind::GameKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Cyan,
}

pub const PALETTE: [Color; 8] = [
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Purple,
    Color::Orange,
    Color::Pink,
    Color::Cyan,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRushConfig {
    pub option_count: [usize; 3],
    pub lives: u32,
    pub countdown_ms: u64,
    pub base_points: u64,
    pub streak_points: u64,
    pub level_points: u64,
    pub correct_bonus_ms: u64,
    pub level_every: u32,
    pub level_bonus_ms: u64,
}

impl Default for ColorRushConfig {
    fn default() -> Self {
        Self {
            option_count: [3, 4, 6],
            lives: 3,
            countdown_ms: 30_000,
            base_points: 100,
            streak_points: 10,
            level_points: 50,
            correct_bonus_ms: 2_000,
            level_every: 5,
            level_bonus_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub word: Color,
    pub ink: Color,
    pub options: Vec<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRushInput {
    Answer(Color),
}

#[derive(Debug, Default)]
pub struct ColorRush {
    config: ColorRushConfig,
    prompt: Option<Prompt>,
    lives: u32,
    level: u32,
    deadline_ms: u64,
}

impl ColorRush {
    pub fn new(config: ColorRushConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }

    fn next_prompt(&mut self, ctx: &mut SessionCtx) {
        let count = ctx.difficulty.pick(self.config.option_count).clamp(1, PALETTE.len());
        let mut options: Vec<Color> = PALETTE.choose_multiple(&mut ctx.rng, count).copied().collect();
        let word = options[0];
        options.shuffle(&mut ctx.rng);
        let ink = PALETTE.choose(&mut ctx.rng).copied().unwrap_or(word);
        self.prompt = Some(Prompt { word, ink, options });
    }
}

impl GameRules for ColorRush {
    type Input = ColorRushInput;

    fn kind(&self) -> GameKind {
        GameKind::ColorRush
    }

    fn start(&mut self, ctx: &mut SessionCtx) {
        self.lives = self.config.lives;
        self.level = 1;
        self.deadline_ms = ctx.now_ms + self.config.countdown_ms;
        self.next_prompt(ctx);
    }

    fn advance(&mut self, ctx: &mut SessionCtx) -> bool {
        ctx.now_ms >= self.deadline_ms
    }

    fn apply(&mut self, input: ColorRushInput, ctx: &mut SessionCtx) -> bool {
        let ColorRushInput::Answer(answer) = input;
        let Some(prompt) = self.prompt.as_ref() else {
            return false;
        };
        ctx.board.moves += 1;

        if answer == prompt.word {
            let streak = u64::from(ctx.board.extend_streak());
            ctx.board.add(
                self.config.base_points
                    + streak * self.config.streak_points
                    + u64::from(self.level) * self.config.level_points,
            );
            self.deadline_ms += self.config.correct_bonus_ms;
            if ctx.board.streak % self.config.level_every.max(1) == 0 {
                self.level += 1;
                self.deadline_ms += self.config.level_bonus_ms;
            }
        } else {
            self.lives = self.lives.saturating_sub(1);
            ctx.board.break_streak();
            ctx.board.misses += 1;
            if self.lives == 0 {
                return true;
            }
        }

        self.next_prompt(ctx);
        false
    }

    fn metrics(&self, board: &Scoreboard) -> SessionMetrics {
        SessionMetrics {
            moves: board.moves,
            best_streak: board.best_streak,
            misses: board.misses,
            level: self.level,
            lives_left: Some(self.lives),
        }
    }
}
