use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::middlewares::RequireJWT;
use crate::models::fees::requests::{CreateFeeNoteRequest, CreateFeeRequest, UpdateFeeRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::create::resolve_academic_year;
use crate::storage::Storage;
use crate::utils::calendar::parse_academic_year;
use crate::utils::fees::validate_amount;
use crate::utils::validate::validate_email;

fn invalid(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::FeeInvalid, msg))
}

/// 关联的学生须存在且属于该家庭邮箱
async fn check_student(
    storage: &dyn Storage,
    student_id: i64,
    family_email: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(student_id).await {
        Ok(Some(student))
            if student.role == UserRole::Student
                && student.email.eq_ignore_ascii_case(family_email) =>
        {
            Ok(())
        }
        Ok(_) => Err(invalid(format!(
            "Student {student_id} does not belong to family {family_email}"
        ))),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to check student: {e}"),
            )),
        ),
    }
}

pub async fn create_fee(
    service: &FeeService,
    request: &HttpRequest,
    req: CreateFeeRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_email(req.family_email.trim()) {
        return Ok(invalid(msg));
    }
    if let Err(msg) = validate_amount(req.amount_due) {
        return Ok(invalid(msg));
    }
    let academic_year = match resolve_academic_year(req.academic_year.clone()) {
        Ok(year) => year,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    if let Some(student_id) = req.student_id
        && let Err(resp) = check_student(storage.as_ref(), student_id, req.family_email.trim()).await
    {
        return Ok(resp);
    }

    match storage.create_fee(req, &academic_year).await {
        Ok(fee) => {
            info!(
                "Fee {} ({}) created for {} in {}",
                fee.id, fee.fee_type, fee.family_email, fee.academic_year
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(fee, "Fee created")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create fee: {e}"),
            )),
        ),
    }
}

pub async fn update_fee(
    service: &FeeService,
    request: &HttpRequest,
    fee_id: i64,
    req: UpdateFeeRequest,
) -> ActixResult<HttpResponse> {
    if let Some(amount) = req.amount_due
        && let Err(msg) = validate_amount(amount)
    {
        return Ok(invalid(msg));
    }
    if let Some(year) = &req.academic_year
        && parse_academic_year(year).is_none()
    {
        return Ok(invalid(format!(
            "Invalid academic year '{year}', expected YYYY-YYYY"
        )));
    }

    let storage = service.get_storage(request);
    match storage.update_fee(fee_id, req).await {
        Ok(Some(fee)) => Ok(HttpResponse::Ok().json(ApiResponse::success(fee, "Fee updated"))),
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::FeeNotFound, "Fee not found"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update fee: {e}"),
            )),
        ),
    }
}

pub async fn add_note(
    service: &FeeService,
    request: &HttpRequest,
    fee_id: i64,
    req: CreateFeeNoteRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };
    let text = req.note_text.trim();
    if text.is_empty() {
        return Ok(invalid("Note text must not be empty"));
    }

    let storage = service.get_storage(request);
    match storage.get_fee(fee_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
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

    match storage.create_fee_note(fee_id, text, user_id).await {
        Ok(note) => Ok(HttpResponse::Created().json(ApiResponse::success(note, "Note added"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to add note: {e}"),
            )),
        ),
    }
}
