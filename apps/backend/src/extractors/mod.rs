pub mod current_player;
pub mod validated_json;

pub use current_player::{CurrentPlayer, REFERRAL_HEADER};
pub use validated_json::ValidatedJson;
