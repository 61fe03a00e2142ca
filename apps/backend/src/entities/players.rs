use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity-provider subject
    #[sea_orm(unique)]
    pub sub: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    #[sea_orm(unique)]
    pub referral_code: String,
    /// Player whose referral code was presented at sign-up
    pub invited_by: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::player_aggregates::Entity")]
    PlayerAggregates,
    #[sea_orm(has_many = "super::score_records::Entity")]
    ScoreRecords,
    #[sea_orm(has_many = "super::player_best_scores::Entity")]
    PlayerBestScores,
}

impl Related<super::player_aggregates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerAggregates.def()
    }
}

impl Related<super::score_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScoreRecords.def()
    }
}

impl Related<super::player_best_scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerBestScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
