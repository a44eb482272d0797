use sea_orm::entity::prelude::*;

use crate::models::courses::entities::{TimeSlotDay, Timeslot};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "session_timeslots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub classroom: Option<String>,
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
}

impl Related<super::course_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn parsed_day(&self) -> TimeSlotDay {
        self.day.parse().unwrap_or(TimeSlotDay::SaturdayMorning)
    }

    pub fn into_timeslot(self) -> Timeslot {
        Timeslot {
            id: self.id,
            session_id: self.session_id,
            day: self.parsed_day(),
            start_time: self.start_time,
            end_time: self.end_time,
            classroom: self.classroom,
        }
    }
}
