use sea_orm::entity::prelude::*;

use crate::models::attendances::entities::AttendanceRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attendance_id: i64,
    pub student_id: i64,
    pub is_present: bool,
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendances::Entity",
        from = "Column::AttendanceId",
        to = "super::attendances::Column::Id",
        on_delete = "Cascade"
    )]
    Attendance,
}

impl Related<super::attendances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> AttendanceRecord {
        AttendanceRecord {
            id: self.id,
            attendance_id: self.attendance_id,
            student_id: self.student_id,
            is_present: self.is_present,
            comment: self.comment,
        }
    }
}
