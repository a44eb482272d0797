use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MessageService;
use crate::models::messages::requests::SendMessageRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;

pub(super) fn validate_content(req: &SendMessageRequest) -> Result<(), &'static str> {
    if req.subject.trim().is_empty() {
        return Err("Subject must not be empty");
    }
    if req.body.trim().is_empty() {
        return Err("Body must not be empty");
    }
    if req.recipient_ids.is_empty() {
        return Err("At least one recipient is required");
    }
    Ok(())
}

/// 家庭只能写给教师或管理员
pub(super) fn can_write_to(sender: &User, recipient: &User) -> bool {
    match sender.role {
        UserRole::Family => recipient.role.is_staff(),
        _ => true,
    }
}

pub async fn send_message(
    service: &MessageService,
    request: &HttpRequest,
    mut req: SendMessageRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(msg) = validate_content(&req) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::MessageInvalid,
            msg,
        )));
    }

    req.recipient_ids.sort_unstable();
    req.recipient_ids.dedup();

    let recipients = match storage.get_users_by_ids(&req.recipient_ids).await {
        Ok(users) => users,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get recipients: {e}"),
                )),
            );
        }
    };

    for id in &req.recipient_ids {
        let Some(recipient) = recipients.iter().find(|u| u.id == *id && u.is_available()) else {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::MessageRecipientInvalid,
                format!("Recipient {id} does not exist or is inactive"),
            )));
        };
        if !can_write_to(&user, recipient) {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::MessagePermissionDenied,
                "Families can only write to teachers and administrators",
            )));
        }
    }

    if let Some(parent_id) = req.parent_id {
        match storage.get_message(parent_id).await {
            Ok(Some(parent)) if parent.is_visible_to(user.id) => {}
            Ok(_) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::MessageNotFound,
                    "Parent message not found",
                )));
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Failed to get parent message: {e}"),
                    )),
                );
            }
        }
    }

    match storage.create_message(user.id, req).await {
        Ok(detail) => {
            info!(
                "Message {} sent by user {} to {} recipient(s)",
                detail.message.id,
                user.id,
                detail.recipients.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(detail, "Message sent")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to send message: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            email: format!("user{id}@ecole.test"),
            password_hash: None,
            role,
            firstname: "Amina".into(),
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

    fn request(subject: &str, body: &str, recipients: Vec<i64>) -> SendMessageRequest {
        SendMessageRequest {
            recipient_ids: recipients,
            subject: subject.into(),
            body: body.into(),
            parent_id: None,
        }
    }

    #[test]
    fn test_content_validation() {
        assert!(validate_content(&request("Absence", "Malade aujourd'hui", vec![2])).is_ok());
        assert!(validate_content(&request("  ", "x", vec![2])).is_err());
        assert!(validate_content(&request("x", "", vec![2])).is_err());
        assert!(validate_content(&request("x", "y", vec![])).is_err());
    }

    #[test]
    fn test_family_recipients_restricted_to_staff() {
        let family = user(1, UserRole::Family);
        assert!(can_write_to(&family, &user(2, UserRole::Teacher)));
        assert!(can_write_to(&family, &user(3, UserRole::Admin)));
        assert!(!can_write_to(&family, &user(4, UserRole::Family)));
        assert!(!can_write_to(&family, &user(5, UserRole::Student)));
    }

    #[test]
    fn test_staff_can_write_to_anyone() {
        let teacher = user(1, UserRole::Teacher);
        assert!(can_write_to(&teacher, &user(2, UserRole::Family)));
    }
}
