use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::fees::entities::FeeDetail;
use crate::models::fees::requests::FeeListQuery;
use crate::models::fees::responses::FeeListResponse;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;
use crate::services::family::dashboard::target_email;
use crate::utils::stats::round2;

/// 家庭账号只能看到自己邮箱下的缴费
pub(super) fn can_view_fee(user: &User, family_email: &str) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Family => user.email.eq_ignore_ascii_case(family_email),
        _ => false,
    }
}

fn summarize(items: Vec<FeeDetail>) -> FeeListResponse {
    let amount_due_total = round2(items.iter().map(|f| f.fee.amount_due).sum());
    let paid_total = round2(items.iter().map(|f| f.paid_total).sum());
    FeeListResponse {
        items,
        amount_due_total,
        paid_total,
    }
}

pub async fn list_fees(
    service: &FeeService,
    request: &HttpRequest,
    query: FeeListQuery,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let Some(email) = target_email(&user, query.email) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Query parameter 'email' is required",
        )));
    };

    let storage = service.get_storage(request);
    match storage
        .list_family_fees(&email, query.student_id, query.academic_year)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summarize(items),
            "Fees retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get fees: {e}"),
            )),
        ),
    }
}

pub async fn get_fee(
    service: &FeeService,
    request: &HttpRequest,
    fee_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage.get_fee(fee_id).await {
        // 看不到的缴费按不存在处理
        Ok(Some(detail)) if can_view_fee(&user, &detail.fee.family_email) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(detail, "Fee retrieved successfully"))),
        Ok(_) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::FeeNotFound, "Fee not found"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get fee: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::entities::{Fee, FeeType, PaymentStatus};
    use chrono::Utc;

    fn user(role: UserRole, email: &str) -> User {
        User {
            id: 7,
            email: email.into(),
            password_hash: None,
            role,
            firstname: "Samira".into(),
            lastname: "Benali".into(),
            is_active: true,
            date_of_birth: None,
            gender: None,
            phone: None,
            secondary_email: None,
            school_year: None,
            subjects: vec![],
            last_login: None,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn detail(amount_due: f64, paid_total: f64) -> FeeDetail {
        FeeDetail {
            fee: Fee {
                id: 1,
                family_email: "benali@example.com".into(),
                student_id: None,
                academic_year: "2024-2025".into(),
                fee_type: FeeType::Membership,
                amount_due,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            payments: vec![],
            notes: vec![],
            paid_total,
            payment_status: PaymentStatus::Partial,
        }
    }

    #[test]
    fn test_fee_visibility() {
        assert!(can_view_fee(&user(UserRole::Admin, "admin@localhost"), "benali@example.com"));
        assert!(can_view_fee(&user(UserRole::Family, "Benali@Example.com"), "benali@example.com"));
        assert!(!can_view_fee(&user(UserRole::Family, "autre@example.com"), "benali@example.com"));
        assert!(!can_view_fee(&user(UserRole::Teacher, "benali@example.com"), "benali@example.com"));
    }

    #[test]
    fn test_summarize_totals() {
        let summary = summarize(vec![detail(120.0, 60.0), detail(30.5, 30.5)]);
        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.amount_due_total, 150.5);
        assert_eq!(summary.paid_total, 90.5);
    }
}
