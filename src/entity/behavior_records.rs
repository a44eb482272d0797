use sea_orm::entity::prelude::*;

use crate::models::behaviors::entities::BehaviorRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "behavior_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub behavior_id: i64,
    pub student_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::behaviors::Entity",
        from = "Column::BehaviorId",
        to = "super::behaviors::Column::Id",
        on_delete = "Cascade"
    )]
    Behavior,
}

impl Related<super::behaviors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Behavior.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> BehaviorRecord {
        BehaviorRecord {
            id: self.id,
            behavior_id: self.behavior_id,
            student_id: self.student_id,
            rating: self.rating,
            comment: self.comment,
        }
    }
}
