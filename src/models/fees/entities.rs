use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 费用类型：注册费 / 会费
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum FeeType {
    Registration,
    Membership,
}

impl std::fmt::Display for FeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeType::Registration => write!(f, "registration"),
            FeeType::Membership => write!(f, "membership"),
        }
    }
}

impl std::str::FromStr for FeeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(FeeType::Registration),
            "membership" => Ok(FeeType::Membership),
            _ => Err(format!("Invalid fee type: {s}")),
        }
    }
}

// 支付方式，exoneration 表示减免
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum PaymentMethod {
    Cheque,
    Espece,
    Liquide,
    Cb,
    Helloasso,
    Exoneration,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentMethod::Cheque => "cheque",
            PaymentMethod::Espece => "espece",
            PaymentMethod::Liquide => "liquide",
            PaymentMethod::Cb => "cb",
            PaymentMethod::Helloasso => "helloasso",
            PaymentMethod::Exoneration => "exoneration",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cheque" => Ok(PaymentMethod::Cheque),
            "espece" => Ok(PaymentMethod::Espece),
            "liquide" => Ok(PaymentMethod::Liquide),
            "cb" => Ok(PaymentMethod::Cb),
            "helloasso" => Ok(PaymentMethod::Helloasso),
            "exoneration" => Ok(PaymentMethod::Exoneration),
            _ => Err(format!("Invalid payment method: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeePayment {
    pub id: i64,
    pub fee_id: i64,
    pub amount_paid: f64,
    pub method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeNote {
    pub id: i64,
    pub fee_id: i64,
    pub note_text: String,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct Fee {
    pub id: i64,
    pub family_email: String,
    pub student_id: Option<i64>,
    pub academic_year: String,
    pub fee_type: FeeType,
    pub amount_due: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 费用及其支付、备注；已付总额与状态由支付记录计算
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub fee: Fee,
    pub payments: Vec<FeePayment>,
    pub notes: Vec<FeeNote>,
    pub paid_total: f64,
    pub payment_status: PaymentStatus,
}
