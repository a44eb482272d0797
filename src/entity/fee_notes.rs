use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::fees::entities::FeeNote;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_notes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub fee_id: i64,
    pub note_text: String,
    pub created_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fees::Entity",
        from = "Column::FeeId",
        to = "super::fees::Column::Id",
        on_delete = "Cascade"
    )]
    Fee,
}

impl Related<super::fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_note(self) -> FeeNote {
        FeeNote {
            id: self.id,
            fee_id: self.fee_id,
            note_text: self.note_text,
            created_by: self.created_by,
            created_at: to_datetime(self.created_at),
        }
    }
}
