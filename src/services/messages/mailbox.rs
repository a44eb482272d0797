use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MessageService;
use crate::models::messages::requests::MailboxQuery;
use crate::models::messages::responses::UnreadCountResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;

pub async fn list_inbox(
    service: &MessageService,
    request: &HttpRequest,
    query: MailboxQuery,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.list_inbox(user.id, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Inbox retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list inbox: {e}"),
            )),
        ),
    }
}

pub async fn list_sent(
    service: &MessageService,
    request: &HttpRequest,
    query: MailboxQuery,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.list_sent(user.id, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Sent messages retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list sent messages: {e}"),
            )),
        ),
    }
}

pub async fn unread_count(
    service: &MessageService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.count_unread_messages(user.id).await {
        Ok(unread) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse { unread },
            "Unread count retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to count unread messages: {e}"),
            )),
        ),
    }
}
