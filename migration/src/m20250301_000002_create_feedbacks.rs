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
                    .table(Feedbacks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feedbacks::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Feedbacks::AuthorId).string().not_null())
                    .col(ColumnDef::new(Feedbacks::RecipientId).string().not_null())
                    .col(ColumnDef::new(Feedbacks::Body).text().not_null())
                    .col(ColumnDef::new(Feedbacks::SkillsUsed).text().null())
                    .col(ColumnDef::new(Feedbacks::Difficulties).text().null())
                    .col(ColumnDef::new(Feedbacks::LearningInterests).text().null())
                    .col(ColumnDef::new(Feedbacks::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Feedbacks::Sentiment).string().null())
                    .col(ColumnDef::new(Feedbacks::DifficultyCategory).string().null())
                    .col(ColumnDef::new(Feedbacks::SuggestedGoal).text().null())
                    .col(ColumnDef::new(Feedbacks::RecommendedCourse).text().null())
                    .col(ColumnDef::new(Feedbacks::SuggestedMentor).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_author_id")
                            .from(Feedbacks::Table, Feedbacks::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_recipient_id")
                            .from(Feedbacks::Table, Feedbacks::RecipientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedbacks_recipient_id")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::RecipientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedbacks_author_id")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::AuthorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Feedbacks {
    Table,
    Id,
    AuthorId,
    RecipientId,
    Body,
    SkillsUsed,
    Difficulties,
    LearningInterests,
    CreatedAt,
    Sentiment,
    DifficultyCategory,
    SuggestedGoal,
    RecommendedCourse,
    SuggestedMentor,
}
