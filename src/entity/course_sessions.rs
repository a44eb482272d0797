//! 课时实体（含滚动统计列）

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::courses::entities::{CourseSession, SessionStats, Subject, Timeslot};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub subject: String,
    pub level: String,
    pub stats_average_attendance: Option<f64>,
    pub stats_average_grade: Option<f64>,
    pub stats_average_behavior: Option<f64>,
    pub stats_last_updated: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(has_many = "super::session_timeslots::Entity")]
    Timeslots,
    #[sea_orm(has_many = "super::session_students::Entity")]
    Students,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::session_timeslots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Timeslots.def()
    }
}

impl Related<super::session_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn parsed_subject(&self) -> Subject {
        self.subject.parse().unwrap_or(Subject::Arabe)
    }

    pub fn into_session(self, timeslots: Vec<Timeslot>) -> CourseSession {
        CourseSession {
            id: self.id,
            course_id: self.course_id,
            subject: self.parsed_subject(),
            level: self.level,
            stats: SessionStats {
                average_attendance: self.stats_average_attendance,
                average_grade: self.stats_average_grade,
                average_behavior: self.stats_average_behavior,
                last_updated: self.stats_last_updated.map(to_datetime),
            },
            timeslots,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
