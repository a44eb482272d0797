use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::messages::entities::MessageRecipient;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "message_recipients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub message_id: i64,
    pub recipient_id: i64,
    pub is_read: bool,
    pub read_at: Option<i64>,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::messages::Entity",
        from = "Column::MessageId",
        to = "super::messages::Column::Id",
        on_delete = "Cascade"
    )]
    Message,
}

impl Related<super::messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Message.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_recipient(self) -> MessageRecipient {
        MessageRecipient {
            message_id: self.message_id,
            recipient_id: self.recipient_id,
            is_read: self.is_read,
            read_at: self.read_at.map(to_datetime),
            is_deleted: self.is_deleted,
        }
    }
}
