use super::entities::{FeeType, PaymentMethod};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct CreateFeeRequest {
    pub family_email: String,
    pub student_id: Option<i64>,
    /// 缺省为当前学年
    pub academic_year: Option<String>,
    pub fee_type: FeeType,
    pub amount_due: f64,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct UpdateFeeRequest {
    pub amount_due: Option<f64>,
    pub fee_type: Option<FeeType>,
    pub academic_year: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct CreatePaymentRequest {
    pub amount_paid: f64,
    pub method: PaymentMethod,
    /// 缺省为当前时间
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct UpdatePaymentRequest {
    pub amount_paid: Option<f64>,
    pub method: Option<PaymentMethod>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct CreateFeeNoteRequest {
    pub note_text: String,
}

// 家庭账号只能查自己的邮箱，管理员必须指定
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeListQuery {
    pub email: Option<String>,
    pub student_id: Option<i64>,
    pub academic_year: Option<String>,
}
