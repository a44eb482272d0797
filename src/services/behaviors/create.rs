use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::BehaviorService;
use crate::models::behaviors::entities::{MAX_RATING, MIN_RATING};
use crate::models::behaviors::requests::{BehaviorRecordInput, CreateBehaviorRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::attendances::create::first_duplicate_student;
use crate::services::courses::access::{current_user, ensure_session_access};
use crate::services::stats::refresh::{SheetKind, refresh_after_write};

pub(super) fn validate_records(records: &[BehaviorRecordInput]) -> Result<(), String> {
    if let Some(id) = first_duplicate_student(records.iter().map(|r| r.student_id)) {
        return Err(format!("Student {id} appears more than once"));
    }
    if let Some(record) = records
        .iter()
        .find(|r| !(MIN_RATING..=MAX_RATING).contains(&r.rating))
    {
        return Err(format!(
            "Rating of student {} must be between {MIN_RATING} and {MAX_RATING}",
            record.student_id
        ));
    }
    Ok(())
}

pub async fn create_behavior(
    service: &BehaviorService,
    request: &HttpRequest,
    session_id: i64,
    req: CreateBehaviorRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_session_access(storage.as_ref(), &user, session_id).await {
        return Ok(resp);
    }

    if let Err(msg) = validate_records(&req.records) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BehaviorInvalid,
            msg,
        )));
    }


    let student_ids = req.records.iter().map(|r| r.student_id).collect();
    match storage
        .create_behavior(session_id, user.id, req.date, req.records)
        .await
    {
        Ok(detail) => {
            info!(
                "Behavior {} created for session {} on {}",
                detail.behavior.id, session_id, detail.behavior.date
            );
            refresh_after_write(storage.as_ref(), session_id, SheetKind::Behavior, student_ids)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(detail, "Behavior created")))
        }
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::BehaviorAlreadyExists,
            "A behavior sheet already exists for this session and day",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create behavior: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(student_id: i64, rating: i32) -> BehaviorRecordInput {
        BehaviorRecordInput {
            student_id,
            rating,
            comment: None,
        }
    }

    #[test]
    fn test_ratings_in_range_accepted() {
        assert!(validate_records(&[record(1, 1), record(2, 5), record(3, 3)]).is_ok());
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let err = validate_records(&[record(1, 4), record(2, 6)]).unwrap_err();
        assert!(err.contains("student 2"));
        assert!(validate_records(&[record(1, 0)]).is_err());
    }

    #[test]
    fn test_duplicate_student_rejected() {
        assert!(validate_records(&[record(9, 2), record(9, 3)]).is_err());
    }
}
