use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Players {
    Table,
    Id,
    Sub,
    DisplayName,
    Email,
    WalletAddress,
    ReferralCode,
    InvitedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PlayerAggregates {
    Table,
    PlayerId,
    Balance,
    TotalEarned,
    GamesPlayed,
    DailyStreak,
    LastPlayedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ScoreRecords {
    Table,
    Id,
    PlayerId,
    GameKind,
    Difficulty,
    Score,
    DurationSeconds,
    RewardUnits,
    CalendarDate,
    SubmissionKey,
    NewBestScore,
    CreatedAt,
}

#[derive(Iden)]
enum PlayerBestScores {
    Table,
    Id,
    PlayerId,
    GameKind,
    BestScore,
    AchievedAt,
}

#[derive(Iden)]
enum LeaderboardEntries {
    Table,
    PlayerId,
    DisplayName,
    BestScore,
    BestScoreAt,
    TotalEarned,
    DailyStreak,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::Sub).string().not_null())
                    .col(ColumnDef::new(Players::DisplayName).string().null())
                    .col(ColumnDef::new(Players::Email).string().null())
                    .col(ColumnDef::new(Players::WalletAddress).string_len(64).null())
                    .col(ColumnDef::new(Players::ReferralCode).string_len(16).not_null())
                    .col(ColumnDef::new(Players::InvitedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Players::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_invited_by")
                            .from(Players::Table, Players::InvitedBy)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_players_sub")
                    .table(Players::Table)
                    .col(Players::Sub)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_players_referral_code")
                    .table(Players::Table)
                    .col(Players::ReferralCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // player_aggregates (1:1 with players)
        manager
            .create_table(
                Table::create()
                    .table(PlayerAggregates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerAggregates::PlayerId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlayerAggregates::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlayerAggregates::TotalEarned)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlayerAggregates::GamesPlayed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlayerAggregates::DailyStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlayerAggregates::LastPlayedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PlayerAggregates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_aggregates_player_id")
                            .from(PlayerAggregates::Table, PlayerAggregates::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // score_records (append-only)
        manager
            .create_table(
                Table::create()
                    .table(ScoreRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScoreRecords::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(ScoreRecords::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScoreRecords::GameKind)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScoreRecords::Difficulty)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScoreRecords::Score)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(ScoreRecords::Score).gte(0)),
                    )
                    .col(
                        ColumnDef::new(ScoreRecords::DurationSeconds)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(ScoreRecords::DurationSeconds).gte(0)),
                    )
                    .col(
                        ColumnDef::new(ScoreRecords::RewardUnits)
                            .integer()
                            .not_null()
                            .check(Expr::col(ScoreRecords::RewardUnits).gte(0)),
                    )
                    .col(
                        ColumnDef::new(ScoreRecords::CalendarDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScoreRecords::SubmissionKey)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScoreRecords::NewBestScore)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScoreRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_score_records_player_id")
                            .from(ScoreRecords::Table, ScoreRecords::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_score_records_player_submission")
                    .table(ScoreRecords::Table)
                    .col(ScoreRecords::PlayerId)
                    .col(ScoreRecords::SubmissionKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Quota reads: player + day (+ kind)
        manager
            .create_index(
                Index::create()
                    .name("ix_score_records_player_day_kind")
                    .table(ScoreRecords::Table)
                    .col(ScoreRecords::PlayerId)
                    .col(ScoreRecords::CalendarDate)
                    .col(ScoreRecords::GameKind)
                    .to_owned(),
            )
            .await?;

        // player_best_scores
        manager
            .create_table(
                Table::create()
                    .table(PlayerBestScores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerBestScores::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(PlayerBestScores::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerBestScores::GameKind)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlayerBestScores::BestScore)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlayerBestScores::AchievedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_best_scores_player_id")
                            .from(PlayerBestScores::Table, PlayerBestScores::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_player_best_scores_player_kind")
                    .table(PlayerBestScores::Table)
                    .col(PlayerBestScores::PlayerId)
                    .col(PlayerBestScores::GameKind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_player_best_scores_kind_score")
                    .table(PlayerBestScores::Table)
                    .col(PlayerBestScores::GameKind)
                    .col(PlayerBestScores::BestScore)
                    .to_owned(),
            )
            .await?;

        // leaderboard_entries (projection of player_aggregates + best scores)
        manager
            .create_table(
                Table::create()
                    .table(LeaderboardEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeaderboardEntries::PlayerId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LeaderboardEntries::DisplayName)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LeaderboardEntries::BestScore)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LeaderboardEntries::BestScoreAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LeaderboardEntries::TotalEarned)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LeaderboardEntries::DailyStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LeaderboardEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leaderboard_entries_player_id")
                            .from(LeaderboardEntries::Table, LeaderboardEntries::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_leaderboard_entries_best_score")
                    .table(LeaderboardEntries::Table)
                    .col(LeaderboardEntries::BestScore)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_index(
                Index::drop()
                    .name("ix_leaderboard_entries_best_score")
                    .table(LeaderboardEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(LeaderboardEntries::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_player_best_scores_kind_score")
                    .table(PlayerBestScores::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("ux_player_best_scores_player_kind")
                    .table(PlayerBestScores::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(PlayerBestScores::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_score_records_player_day_kind")
                    .table(ScoreRecords::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("ux_score_records_player_submission")
                    .table(ScoreRecords::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ScoreRecords::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PlayerAggregates::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_players_referral_code")
                    .table(Players::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("ux_players_sub")
                    .table(Players::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;

        Ok(())
    }
}
