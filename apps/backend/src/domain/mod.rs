//! Domain layer: session engine, reward policy and quota rules. No I/O.

pub mod game_kind;
pub mod quota;
pub mod reward;
pub mod session;
pub mod streak;

pub use game_kind::{Difficulty, GameKind};
pub use quota::{DayRecord, Headroom, QuotaConfig, QuotaDenial};
pub use reward::{PlausibilityBound, RewardConfig};
pub use session::{GameRules, Phase, Session, SessionError, SessionMetrics, SessionResult};
