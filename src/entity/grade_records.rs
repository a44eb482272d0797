use sea_orm::entity::prelude::*;

use crate::models::grades::entities::GradeRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub grade_id: i64,
    pub student_id: i64,
    pub value: Option<f64>,
    pub is_absent: bool,
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grades::Entity",
        from = "Column::GradeId",
        to = "super::grades::Column::Id",
        on_delete = "Cascade"
    )]
    Grade,
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> GradeRecord {
        GradeRecord {
            id: self.id,
            grade_id: self.grade_id,
            student_id: self.student_id,
            value: self.value,
            is_absent: self.is_absent,
            comment: self.comment,
        }
    }
}
