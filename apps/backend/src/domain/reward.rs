//! Server-side reward computation and the plausibility bound on submitted scores.

use std::collections::BTreeMap;

use crate::domain::game_kind::{Difficulty, GameKind};
use crate::errors::domain::{DomainError, ValidationKind};

/// Upper bound on a believable score: `grace_points + points_per_second * duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlausibilityBound {
    pub grace_points: u64,
    pub points_per_second: u64,
}

impl PlausibilityBound {
    pub const fn new(grace_points: u64, points_per_second: u64) -> Self {
        Self {
            grace_points,
            points_per_second,
        }
    }

    pub fn max_score(&self, duration_seconds: u64) -> u64 {
        self.grace_points
            .saturating_add(self.points_per_second.saturating_mul(duration_seconds))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardConfig {
    pub divisors: BTreeMap<GameKind, u64>,
    pub default_divisor: u64,
    /// easy, medium, hard in thousandths
    pub multipliers_per_mille: [u64; 3],
    pub min_reward: u32,
    pub max_reward: u32,
    pub max_duration_seconds: u64,
    pub plausibility: BTreeMap<GameKind, PlausibilityBound>,
    pub default_plausibility: PlausibilityBound,
}

impl Default for RewardConfig {
    fn default() -> Self {
        let divisors = BTreeMap::from([
            (GameKind::Memory, 2000),
            (GameKind::ColorRush, 1500),
            (GameKind::SharpShooter, 1000),
            (GameKind::StackGame, 800),
            (GameKind::TapReaction, 1000),
        ]);
        let plausibility = BTreeMap::from([
            (GameKind::Memory, PlausibilityBound::new(40_000, 0)),
            (GameKind::ColorRush, PlausibilityBound::new(2_000, 2_500)),
            (GameKind::TapReaction, PlausibilityBound::new(100, 30)),
        ]);
        Self {
            divisors,
            default_divisor: 1000,
            multipliers_per_mille: [800, 1000, 1200],
            min_reward: 1,
            max_reward: 5,
            max_duration_seconds: 3600,
            plausibility,
            default_plausibility: PlausibilityBound::new(2_000, 1_000),
        }
    }
}

impl RewardConfig {
    pub fn divisor(&self, kind: GameKind) -> u64 {
        self.divisors
            .get(&kind)
            .copied()
            .unwrap_or(self.default_divisor)
            .max(1)
    }

    pub fn bound(&self, kind: GameKind) -> PlausibilityBound {
        self.plausibility
            .get(&kind)
            .copied()
            .unwrap_or(self.default_plausibility)
    }

    /// `clamp(floor(floor(score / divisor) * multiplier), min_reward, max_reward)`
    pub fn reward(&self, score: u64, kind: GameKind, difficulty: Difficulty) -> u32 {
        let base = score / self.divisor(kind);
        let scaled = base.saturating_mul(difficulty.pick(self.multipliers_per_mille)) / 1000;
        let clamped = scaled.clamp(u64::from(self.min_reward), u64::from(self.max_reward));
        u32::try_from(clamped).unwrap_or(self.max_reward)
    }

    pub fn check_plausible(
        &self,
        score: u64,
        duration_seconds: u64,
        kind: GameKind,
    ) -> Result<(), DomainError> {
        if duration_seconds > self.max_duration_seconds {
            return Err(DomainError::validation(
                ValidationKind::InvalidScore,
                format!(
                    "duration_seconds {duration_seconds} exceeds the maximum of {}",
                    self.max_duration_seconds
                ),
            ));
        }
        let max = self.bound(kind).max_score(duration_seconds);
        if score > max {
            return Err(DomainError::validation(
                ValidationKind::ImplausibleScore,
                format!("score {score} is not reachable in {duration_seconds}s of {kind}"),
            ));
        }
        Ok(())
    }
}
