//! Tap reaction: targets pop up on an 800x600 field and fade out; tap them before they expire.

use rand::Rng;

use super::{GameRules, SessionCtx};
use crate::domain::game_kind::GameKind;

pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapReactionConfig {
    /// First spawn interval for easy, medium, hard
    pub spawn_interval_ms: [u64; 3],
    pub min_spawn_interval_ms: u64,
    pub interval_step_ms: u64,
    pub lifetime_ms: [u64; 3],
    pub max_misses: u32,
    pub max_points: u64,
}

impl Default for TapReactionConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: [1200, 1000, 800],
            min_spawn_interval_ms: 400,
            interval_step_ms: 10,
            lifetime_ms: [2400, 2000, 1600],
            max_misses: 10,
            max_points: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub spawned_at_ms: u64,
}

impl Target {
    fn contains(&self, x: f32, y: f32) -> bool {
        let (dx, dy) = (x - self.x, y - self.y);
        (dx * dx + dy * dy).sqrt() < self.radius
    }
}

/// A tap at field coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapInput {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Default)]
pub struct TapReaction {
    config: TapReactionConfig,
    targets: Vec<Target>,
    next_id: u32,
    spawn_interval_ms: u64,
    lifetime_ms: u64,
    last_spawn_ms: u64,
}

impl TapReaction {
    pub fn new(config: TapReactionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Live targets, oldest first.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn spawn_interval_ms(&self) -> u64 {
        self.spawn_interval_ms
    }

    pub fn lifetime_ms(&self) -> u64 {
        self.lifetime_ms
    }

    fn spawn(&mut self, at_ms: u64, ctx: &mut SessionCtx) {
        let radius = ctx.rng.random_range(30.0..50.0f32);
        let x = ctx.rng.random_range(radius..FIELD_WIDTH - radius);
        let y = ctx.rng.random_range(radius..FIELD_HEIGHT - radius);
        self.targets.push(Target {
            id: self.next_id,
            x,
            y,
            radius,
            spawned_at_ms: at_ms,
        });
        self.next_id += 1;

        if self.spawn_interval_ms > self.config.min_spawn_interval_ms {
            self.spawn_interval_ms = self
                .spawn_interval_ms
                .saturating_sub(self.config.interval_step_ms)
                .max(self.config.min_spawn_interval_ms)
                .max(1);
        }
    }

    /// `ceil(max_points * (1 - age / lifetime))` in integer arithmetic.
    fn points_for_age(&self, age_ms: u64) -> u64 {
        let lifetime = self.lifetime_ms.max(1);
        let left = lifetime.saturating_sub(age_ms);
        (self.config.max_points * left).div_ceil(lifetime)
    }
}

impl GameRules for TapReaction {
    type Input = TapInput;

    fn kind(&self) -> GameKind {
        GameKind::TapReaction
    }

    fn start(&mut self, ctx: &mut SessionCtx) {
        self.targets.clear();
        self.next_id = 0;
        self.spawn_interval_ms = ctx.difficulty.pick(self.config.spawn_interval_ms).max(1);
        self.lifetime_ms = ctx.difficulty.pick(self.config.lifetime_ms);
        self.last_spawn_ms = ctx.now_ms;
    }

    fn advance(&mut self, ctx: &mut SessionCtx) -> bool {
        // catch up on every spawn that fell due since the last call
        while ctx.now_ms.saturating_sub(self.last_spawn_ms) >= self.spawn_interval_ms {
            let at = self.last_spawn_ms + self.spawn_interval_ms;
            self.spawn(at, ctx);
            self.last_spawn_ms = at;
        }

        let now = ctx.now_ms;
        let lifetime = self.lifetime_ms;
        let before = self.targets.len();
        self.targets
            .retain(|t| now.saturating_sub(t.spawned_at_ms) <= lifetime);
        let expired = u32::try_from(before - self.targets.len()).unwrap_or(u32::MAX);
        if expired > 0 {
            ctx.board.misses = ctx.board.misses.saturating_add(expired);
            ctx.board.break_streak();
        }

        ctx.board.misses >= self.config.max_misses
    }

    fn apply(&mut self, input: TapInput, ctx: &mut SessionCtx) -> bool {
        ctx.board.moves += 1;
        // newest target is drawn on top
        let hit = self
            .targets
            .iter()
            .rposition(|t| t.contains(input.x, input.y));
        match hit {
            Some(idx) => {
                let target = self.targets.remove(idx);
                let points = self.points_for_age(ctx.now_ms.saturating_sub(target.spawned_at_ms));
                ctx.board.add(points);
                ctx.board.extend_streak();
            }
            None => ctx.board.break_streak(),
        }
        false
    }
}
