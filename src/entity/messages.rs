//! 站内信实体

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::messages::entities::Message;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub sender_id: i64,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub parent_id: Option<i64>,
    /// 发件人从发件箱删除
    pub sender_deleted: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::message_recipients::Entity")]
    Recipients,
}

impl Related<super::message_recipients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_message(self) -> Message {
        Message {
            id: self.id,
            sender_id: self.sender_id,
            subject: self.subject,
            body: self.body,
            parent_id: self.parent_id,
            created_at: to_datetime(self.created_at),
        }
    }
}
