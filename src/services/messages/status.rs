use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MessageService;
use super::get::load_visible;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;

pub async fn mark_read(
    service: &MessageService,
    request: &HttpRequest,
    message_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let detail = match load_visible(storage.as_ref(), user.id, message_id).await {
        Ok(detail) => detail,
        Err(resp) => return Ok(resp),
    };
    if detail.recipient(user.id).is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Only recipients can mark a message as read",
        )));
    }

    // 已读的消息再次标记不算错误
    match storage.mark_message_read(message_id, user.id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Message marked as read"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to mark message as read: {e}"),
            )),
        ),
    }
}

pub async fn delete_message(
    service: &MessageService,
    request: &HttpRequest,
    message_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = load_visible(storage.as_ref(), user.id, message_id).await {
        return Ok(resp);
    }

    match storage.delete_message_for(message_id, user.id).await {
        Ok(true) => {
            info!("Message {} deleted for user {}", message_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Message deleted")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MessageNotFound,
            "Message not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete message: {e}"),
            )),
        ),
    }
}
