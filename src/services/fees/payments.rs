use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::models::fees::requests::{CreatePaymentRequest, UpdatePaymentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::fees::validate_amount;

pub async fn create_payment(
    service: &FeeService,
    request: &HttpRequest,
    fee_id: i64,
    req: CreatePaymentRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_amount(req.amount_paid) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::FeeInvalid, msg)));
    }

    let storage = service.get_storage(request);
    // 已停用的费用不再接受支付
    match storage.get_fee(fee_id).await {
        Ok(Some(detail)) if detail.fee.is_active => {}
        Ok(_) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::FeeNotFound, "Fee not found")));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get fee: {e}"),
                )),
            );
        }
    }

    match storage.create_fee_payment(fee_id, req).await {
        Ok(payment) => {
            info!(
                "Payment {} of {:.2} ({}) recorded for fee {}",
                payment.id, payment.amount_paid, payment.method, fee_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(payment, "Payment recorded")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to record payment: {e}"),
            )),
        ),
    }
}

pub async fn update_payment(
    service: &FeeService,
    request: &HttpRequest,
    payment_id: i64,
    req: UpdatePaymentRequest,
) -> ActixResult<HttpResponse> {
    if let Some(amount) = req.amount_paid
        && let Err(msg) = validate_amount(amount)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::FeeInvalid, msg)));
    }

    let storage = service.get_storage(request);
    match storage.update_fee_payment(payment_id, req).await {
        Ok(Some(payment)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(payment, "Payment updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FeePaymentNotFound,
            "Payment not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update payment: {e}"),
            )),
        ),
    }
}
