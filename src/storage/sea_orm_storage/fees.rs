//! 缴费存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{fee_notes, fee_payments, fees};
use crate::errors::{Result, SchoolHubError};
use crate::models::fees::entities::{Fee, FeeDetail, FeeNote, FeePayment};
use crate::models::fees::requests::{
    CreateFeeRequest, CreatePaymentRequest, UpdateFeeRequest, UpdatePaymentRequest,
};
use crate::utils::fees::fee_detail;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 批量加载支付与备注，再组装明细
    async fn attach_fee_details(&self, models: Vec<fees::Model>) -> Result<Vec<FeeDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();

        let mut payments: HashMap<i64, Vec<FeePayment>> = HashMap::new();
        for payment in FeePayments::find()
            .filter(fee_payments::Column::FeeId.is_in(ids.clone()))
            .order_by_asc(fee_payments::Column::PaidAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询支付记录失败: {e}")))?
        {
            payments
                .entry(payment.fee_id)
                .or_default()
                .push(payment.into_payment());
        }

        let mut notes: HashMap<i64, Vec<FeeNote>> = HashMap::new();
        for note in FeeNotes::find()
            .filter(fee_notes::Column::FeeId.is_in(ids))
            .order_by_asc(fee_notes::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询缴费备注失败: {e}")))?
        {
            notes.entry(note.fee_id).or_default().push(note.into_note());
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let fee_payments = payments.remove(&m.id).unwrap_or_default();
                let fee_notes = notes.remove(&m.id).unwrap_or_default();
                fee_detail(m.into_fee(), fee_payments, fee_notes)
            })
            .collect())
    }

    pub async fn create_fee_impl(&self, req: CreateFeeRequest, academic_year: &str) -> Result<Fee> {
        let now = chrono::Utc::now().timestamp();
        let model = FeeActiveModel {
            family_email: Set(req.family_email.trim().to_lowercase()),
            student_id: Set(req.student_id),
            academic_year: Set(academic_year.to_string()),
            fee_type: Set(req.fee_type.to_string()),
            amount_due: Set(req.amount_due),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建缴费失败: {e}")))?;

        Ok(model.into_fee())
    }

    pub async fn get_fee_impl(&self, fee_id: i64) -> Result<Option<FeeDetail>> {
        let Some(model) = Fees::find_by_id(fee_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询缴费失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.attach_fee_details(vec![model]).await?.into_iter().next())
    }

    /// 家庭的有效缴费，新建的在前
    pub async fn list_family_fees_impl(
        &self,
        family_email: &str,
        student_id: Option<i64>,
        academic_year: Option<String>,
    ) -> Result<Vec<FeeDetail>> {
        let mut select = Fees::find()
            .filter(fees::Column::FamilyEmail.eq(family_email.trim().to_lowercase()))
            .filter(fees::Column::IsActive.eq(true));
        if let Some(student_id) = student_id {
            select = select.filter(fees::Column::StudentId.eq(student_id));
        }
        if let Some(year) = academic_year {
            select = select.filter(fees::Column::AcademicYear.eq(year));
        }

        let models = select
            .order_by_desc(fees::Column::CreatedAt)
            .order_by_desc(fees::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询缴费失败: {e}")))?;

        self.attach_fee_details(models).await
    }

    pub async fn update_fee_impl(&self, fee_id: i64, update: UpdateFeeRequest) -> Result<Option<Fee>> {
        let Some(existing) = Fees::find_by_id(fee_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询缴费失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: FeeActiveModel = existing.into();
        if let Some(amount_due) = update.amount_due {
            model.amount_due = Set(amount_due);
        }
        if let Some(fee_type) = update.fee_type {
            model.fee_type = Set(fee_type.to_string());
        }
        if let Some(year) = update.academic_year {
            model.academic_year = Set(year);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新缴费失败: {e}")))?;

        Ok(Some(updated.into_fee()))
    }

    pub async fn create_fee_payment_impl(
        &self,
        fee_id: i64,
        req: CreatePaymentRequest,
    ) -> Result<FeePayment> {
        let now = chrono::Utc::now().timestamp();
        let model = FeePaymentActiveModel {
            fee_id: Set(fee_id),
            amount_paid: Set(req.amount_paid),
            method: Set(req.method.to_string()),
            paid_at: Set(req.paid_at.map(|t| t.timestamp()).unwrap_or(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建支付记录失败: {e}")))?;

        Ok(model.into_payment())
    }

    pub async fn update_fee_payment_impl(
        &self,
        payment_id: i64,
        update: UpdatePaymentRequest,
    ) -> Result<Option<FeePayment>> {
        let Some(existing) = FeePayments::find_by_id(payment_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询支付记录失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: FeePaymentActiveModel = existing.into();
        if let Some(amount_paid) = update.amount_paid {
            model.amount_paid = Set(amount_paid);
        }
        if let Some(method) = update.method {
            model.method = Set(method.to_string());
        }
        if let Some(paid_at) = update.paid_at {
            model.paid_at = Set(paid_at.timestamp());
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新支付记录失败: {e}")))?;

        Ok(Some(updated.into_payment()))
    }

    pub async fn create_fee_note_impl(
        &self,
        fee_id: i64,
        note_text: &str,
        created_by: i64,
    ) -> Result<FeeNote> {
        let model = FeeNoteActiveModel {
            fee_id: Set(fee_id),
            note_text: Set(note_text.to_string()),
            created_by: Set(Some(created_by)),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建缴费备注失败: {e}")))?;

        Ok(model.into_note())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::entities::{FeeType, PaymentMethod, PaymentStatus};
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{insert_user, memory_storage};

    fn new_fee(email: &str, fee_type: FeeType, amount_due: f64) -> CreateFeeRequest {
        CreateFeeRequest {
            family_email: email.to_string(),
            student_id: None,
            academic_year: None,
            fee_type,
            amount_due,
        }
    }

    #[tokio::test]
    async fn test_family_fees_with_payments_and_notes() {
        let storage = memory_storage().await;
        let admin = insert_user(&storage, UserRole::Admin, "admin@localhost", "Admin").await;

        let registration = storage
            .create_fee_impl(
                new_fee(" Haddad@Example.com ", FeeType::Registration, 120.0),
                "2024-2025",
            )
            .await
            .unwrap();
        assert_eq!(registration.family_email, "haddad@example.com");
        let membership = storage
            .create_fee_impl(
                new_fee("haddad@example.com", FeeType::Membership, 30.0),
                "2024-2025",
            )
            .await
            .unwrap();
        storage
            .create_fee_impl(new_fee("autre@example.com", FeeType::Membership, 30.0), "2024-2025")
            .await
            .unwrap();

        for amount in [50.0, 20.0] {
            storage
                .create_fee_payment_impl(
                    registration.id,
                    CreatePaymentRequest {
                        amount_paid: amount,
                        method: PaymentMethod::Cheque,
                        paid_at: None,
                    },
                )
                .await
                .unwrap();
        }
        storage
            .create_fee_note_impl(registration.id, "Reste 50 € en janvier", admin)
            .await
            .unwrap();

        let fees = storage
            .list_family_fees_impl("haddad@example.com", None, None)
            .await
            .unwrap();
        assert_eq!(fees.len(), 2);
        let detail = fees.iter().find(|f| f.fee.id == registration.id).unwrap();
        assert_eq!(detail.paid_total, 70.0);
        assert_eq!(detail.payment_status, PaymentStatus::Partial);
        assert_eq!(detail.notes.len(), 1);
        let detail = fees.iter().find(|f| f.fee.id == membership.id).unwrap();
        assert_eq!(detail.payment_status, PaymentStatus::Unpaid);

        // 停用后不再出现在家庭列表
        storage
            .update_fee_impl(
                membership.id,
                UpdateFeeRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let fees = storage
            .list_family_fees_impl("haddad@example.com", None, Some("2024-2025".into()))
            .await
            .unwrap();
        assert_eq!(fees.len(), 1);
        assert!(storage.get_fee_impl(membership.id).await.unwrap().is_some());
    }
}
