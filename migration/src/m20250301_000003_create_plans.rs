use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_identity_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Plans::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Plans::OwnerId).string().not_null())
                    .col(ColumnDef::new(Plans::Title).string().not_null())
                    .col(ColumnDef::new(Plans::Description).text().null())
                    .col(ColumnDef::new(Plans::StartDate).date().null())
                    .col(ColumnDef::new(Plans::ExpectedCompletionDate).date().null())
                    .col(ColumnDef::new(Plans::ActualCompletionDate).date().null())
                    .col(ColumnDef::new(Plans::Status).string().not_null())
                    .col(ColumnDef::new(Plans::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Plans::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plans_owner_id")
                            .from(Plans::Table, Plans::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plans_owner_id")
                    .table(Plans::Table)
                    .col(Plans::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Goals::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Goals::PlanId).string().not_null())
                    .col(ColumnDef::new(Goals::Position).integer().not_null())
                    .col(ColumnDef::new(Goals::Description).text().not_null())
                    .col(ColumnDef::new(Goals::RequiredActions).text().null())
                    .col(ColumnDef::new(Goals::Deadline).date().null())
                    .col(ColumnDef::new(Goals::Completed).boolean().not_null().default(false))
                    .col(ColumnDef::new(Goals::RequiredResources).text().null())
                    .col(ColumnDef::new(Goals::GoalFeedback).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_goals_plan_id")
                            .from(Goals::Table, Goals::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_goals_plan_id")
                    .table(Goals::Table)
                    .col(Goals::PlanId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Plans {
    Table,
    Id,
    OwnerId,
    Title,
    Description,
    StartDate,
    ExpectedCompletionDate,
    ActualCompletionDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Goals {
    Table,
    Id,
    PlanId,
    Position,
    Description,
    RequiredActions,
    Deadline,
    Completed,
    RequiredResources,
    GoalFeedback,
}
