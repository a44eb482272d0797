//! 考勤表实体

use sea_orm::entity::prelude::*;

use super::{parse_date, to_datetime};
use crate::models::attendances::entities::Attendance;
use crate::utils::stats::SheetHeader;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    /// YYYY-MM-DD
    pub date: String,
    pub presence_rate: f64,
    pub total_students: i32,
    pub created_by: i64,
    pub is_active: bool,
    /// `session_id:date`，仅有效表非空
    pub active_key: Option<String>,
    pub deleted_at: Option<i64>,
    pub last_update: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_sessions::Entity",
        from = "Column::SessionId",
        to = "super::course_sessions::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
    #[sea_orm(has_many = "super::attendance_records::Entity")]
    Records,
}

impl Related<super::course_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::attendance_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn header(&self) -> SheetHeader {
        SheetHeader {
            id: self.id,
            session_id: self.session_id,
            date: parse_date(&self.date),
            last_update: to_datetime(self.last_update),
        }
    }

    pub fn into_attendance(self) -> Attendance {
        Attendance {
            id: self.id,
            session_id: self.session_id,
            date: parse_date(&self.date),
            presence_rate: self.presence_rate,
            total_students: self.total_students,
            created_by: self.created_by,
            is_active: self.is_active,
            deleted_at: self.deleted_at.map(to_datetime),
            last_update: to_datetime(self.last_update),
            created_at: to_datetime(self.created_at),
        }
    }
}
