use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "feedbacks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub author_id: String,
    #[sea_orm(indexed)]
    pub recipient_id: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub skills_used: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub difficulties: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub learning_interests: Option<String>,
    pub created_at: i64,

    // Analysis annotations, all optional
    pub sentiment: Option<String>,
    pub difficulty_category: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub suggested_goal: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub recommended_course: Option<String>,
    pub suggested_mentor: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RecipientId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,
}

impl ActiveModelBehavior for ActiveModel {}
