//! 缴费汇总：已付总额与支付状态

use crate::models::fees::entities::{Fee, FeeDetail, FeeNote, FeePayment, PaymentStatus};
use crate::utils::stats::round2;

/// 一分钱以内视为付清
const PAID_EPSILON: f64 = 0.005;

pub fn payment_status(amount_due: f64, paid_total: f64) -> PaymentStatus {
    if paid_total <= 0.0 {
        // 应付为 0 的费用视为已结清
        if amount_due <= 0.0 {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        }
    } else if paid_total + PAID_EPSILON >= amount_due {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    }
}

pub fn fee_detail(fee: Fee, payments: Vec<FeePayment>, notes: Vec<FeeNote>) -> FeeDetail {
    let paid_total = round2(payments.iter().map(|p| p.amount_paid).sum());
    let payment_status = payment_status(fee.amount_due, paid_total);
    FeeDetail {
        fee,
        payments,
        notes,
        paid_total,
        payment_status,
    }
}

/// 金额须为有限的非负数
pub fn validate_amount(amount: f64) -> Result<(), String> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("Amount must be a non-negative number, got {amount}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::entities::{FeeType, PaymentMethod};
    use chrono::Utc;

    fn fee(amount_due: f64) -> Fee {
        Fee {
            id: 1,
            family_email: "famille@example.com".into(),
            student_id: None,
            academic_year: "2024-2025".into(),
            fee_type: FeeType::Registration,
            amount_due,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payment(id: i64, amount_paid: f64) -> FeePayment {
        FeePayment {
            id,
            fee_id: 1,
            amount_paid,
            method: PaymentMethod::Cheque,
            paid_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_payment_status() {
        assert_eq!(payment_status(120.0, 0.0), PaymentStatus::Unpaid);
        assert_eq!(payment_status(120.0, 40.0), PaymentStatus::Partial);
        assert_eq!(payment_status(120.0, 120.0), PaymentStatus::Paid);
        assert_eq!(payment_status(120.0, 150.0), PaymentStatus::Paid);
        assert_eq!(payment_status(0.0, 0.0), PaymentStatus::Paid);
    }

    #[test]
    fn test_fee_detail_sums_payments() {
        let detail = fee_detail(
            fee(100.0),
            vec![payment(1, 33.33), payment(2, 33.33), payment(3, 33.34)],
            vec![],
        );
        assert_eq!(detail.paid_total, 100.0);
        assert_eq!(detail.payment_status, PaymentStatus::Paid);

        let detail = fee_detail(fee(100.0), vec![payment(1, 30.0)], vec![]);
        assert_eq!(detail.paid_total, 30.0);
        assert_eq!(detail.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.0).is_ok());
        assert!(validate_amount(45.5).is_ok());
        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
    }
}
