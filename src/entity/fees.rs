//! 缴费实体，归属于家庭邮箱

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::fees::entities::{Fee, FeeType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub family_email: String,
    pub student_id: Option<i64>,
    pub academic_year: String,
    pub fee_type: String,
    pub amount_due: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_payments::Entity")]
    Payments,
    #[sea_orm(has_many = "super::fee_notes::Entity")]
    Notes,
}

impl Related<super::fee_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::fee_notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee(self) -> Fee {
        Fee {
            id: self.id,
            family_email: self.family_email,
            student_id: self.student_id,
            academic_year: self.academic_year,
            fee_type: self.fee_type.parse().unwrap_or(FeeType::Registration),
            amount_due: self.amount_due,
            is_active: self.is_active,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
