//! 成绩表实体，统计值冗余存储在表头

use sea_orm::entity::prelude::*;

use super::{parse_date, to_datetime};
use crate::models::grades::entities::{Grade, GradeStats, GradeType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub date: String,
    pub grade_type: String,
    pub is_draft: bool,
    pub stats_average: f64,
    pub stats_highest: f64,
    pub stats_lowest: f64,
    pub stats_absent_count: i32,
    pub stats_total_students: i32,
    pub created_by: i64,
    pub is_active: bool,
    pub deleted_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
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
    #[sea_orm(has_many = "super::grade_records::Entity")]
    Records,
}

impl Related<super::course_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::grade_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn stats(&self) -> GradeStats {
        GradeStats {
            average: self.stats_average,
            highest: self.stats_highest,
            lowest: self.stats_lowest,
            absent_count: self.stats_absent_count,
            total_students: self.stats_total_students,
        }
    }

    pub fn into_grade(self) -> Grade {
        Grade {
            id: self.id,
            session_id: self.session_id,
            date: parse_date(&self.date),
            grade_type: self.grade_type.parse().unwrap_or(GradeType::Controle),
            is_draft: self.is_draft,
            stats: self.stats(),
            created_by: self.created_by,
            is_active: self.is_active,
            deleted_at: self.deleted_at.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
