use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::fees::entities::{FeePayment, PaymentMethod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub fee_id: i64,
    pub amount_paid: f64,
    pub method: String,
    pub paid_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
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
    pub fn into_payment(self) -> FeePayment {
        FeePayment {
            id: self.id,
            fee_id: self.fee_id,
            amount_paid: self.amount_paid,
            method: self.method.parse().unwrap_or(PaymentMethod::Liquide),
            paid_at: to_datetime(self.paid_at),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
