use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "study_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub group_id: i32,

    /// RFC 3339 timestamp; defaults to creation time when the caller
    /// leaves it unset.
    pub scheduled_time: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::study_groups::Entity",
        from = "Column::GroupId",
        to = "super::study_groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    StudyGroups,
}

impl Related<super::study_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
