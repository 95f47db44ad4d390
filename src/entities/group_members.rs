use sea_orm::entity::prelude::*;

/// Join relation between a user and a study group.
///
/// A user holds at most one row here at any time; the migration adds a
/// unique index on `user_id` so concurrent joins cannot slip past the
/// application-level check.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "group_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub group_id: i32,

    pub joined_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::study_groups::Entity",
        from = "Column::GroupId",
        to = "super::study_groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    StudyGroups,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::study_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
