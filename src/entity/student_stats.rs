use sea_orm::entity::prelude::*;

use super::{parse_date, to_datetime};
use crate::models::stats::entities::StudentStats;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
    pub absences_count: i32,
    pub absences_rate: f64,
    pub behavior_average: f64,
    pub grade_average: Option<f64>,
    pub last_activity: Option<String>,
    pub last_update: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_stats(self) -> StudentStats {
        StudentStats {
            student_id: self.student_id,
            absences_count: self.absences_count,
            absences_rate: self.absences_rate,
            behavior_average: self.behavior_average,
            grade_average: self.grade_average,
            last_activity: self.last_activity.as_deref().map(parse_date),
            last_update: to_datetime(self.last_update),
        }
    }
}
