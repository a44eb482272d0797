use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::MessageService;
use crate::models::messages::entities::MessageDetail;
use crate::models::messages::responses::ThreadResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;
use crate::storage::Storage;

/// 只有发件人和收件人能看到消息，其余一律视为不存在
pub(super) async fn load_visible(
    storage: &dyn Storage,
    user_id: i64,
    message_id: i64,
) -> Result<MessageDetail, HttpResponse> {
    match storage.get_message(message_id).await {
        Ok(Some(detail)) if detail.is_visible_to(user_id) => Ok(detail),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MessageNotFound,
            "Message not found",
        ))),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get message: {e}"),
            )),
        ),
    }
}

pub async fn get_message(
    service: &MessageService,
    request: &HttpRequest,
    message_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let mut detail = match load_visible(storage.as_ref(), user.id, message_id).await {
        Ok(detail) => detail,
        Err(resp) => return Ok(resp),
    };

    if detail.recipient(user.id).is_some_and(|r| !r.is_read) {
        match storage.mark_message_read(message_id, user.id).await {
            Ok(_) => {
                let now = chrono::Utc::now();
                if let Some(entry) = detail
                    .recipients
                    .iter_mut()
                    .find(|r| r.recipient_id == user.id)
                {
                    entry.is_read = true;
                    entry.read_at = Some(now);
                }
            }
            Err(e) => warn!("Failed to mark message {} as read: {}", message_id, e),
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Message retrieved successfully")))
}

pub async fn get_thread(
    service: &MessageService,
    request: &HttpRequest,
    message_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let root = match load_visible(storage.as_ref(), user.id, message_id).await {
        Ok(detail) => detail,
        Err(resp) => return Ok(resp),
    };

    let replies = match storage.list_replies(message_id).await {
        Ok(replies) => replies,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to list replies: {e}"),
                )),
            );
        }
    };

    // 回复可能发给了其他人，只保留当前用户可见的
    let mut visible = Vec::with_capacity(replies.len());
    for reply in replies {
        match storage.get_message(reply.id).await {
            Ok(Some(detail)) if detail.is_visible_to(user.id) => visible.push(reply),
            Ok(_) => {}
            Err(e) => warn!("Failed to load reply {}: {}", reply.id, e),
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ThreadResponse {
            root,
            replies: visible,
        },
        "Thread retrieved successfully",
    )))
}
