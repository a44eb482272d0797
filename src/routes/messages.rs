use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::messages::requests::{MailboxParams, SendMessageRequest};
use crate::models::users::entities::UserRole;
use crate::services::MessageService;
use crate::utils::SafeIDI64;

// 懒加载的全局 MessageService 实例
static MESSAGE_SERVICE: Lazy<MessageService> = Lazy::new(MessageService::new_lazy);

pub async fn send_message(
    req: HttpRequest,
    message_data: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE
        .send_message(&req, message_data.into_inner())
        .await
}

pub async fn list_inbox(
    req: HttpRequest,
    query: web::Query<MailboxParams>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE
        .list_inbox(&req, query.into_inner().into())
        .await
}

pub async fn list_sent(
    req: HttpRequest,
    query: web::Query<MailboxParams>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE
        .list_sent(&req, query.into_inner().into())
        .await
}

pub async fn unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.unread_count(&req).await
}

pub async fn get_message(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.get_message(&req, id.0).await
}

pub async fn get_thread(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.get_thread(&req, id.0).await
}

pub async fn mark_read(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.mark_read(&req, id.0).await
}

pub async fn delete_message(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.delete_message(&req, id.0).await
}

// 配置路由
pub fn configure_message_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/messages")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::login_roles()))
                    .route("", web::post().to(send_message))
                    .route("/inbox", web::get().to(list_inbox))
                    .route("/sent", web::get().to(list_sent))
                    .route("/unread-count", web::get().to(unread_count))
                    .route("/{id}", web::get().to(get_message))
                    .route("/{id}", web::delete().to(delete_message))
                    .route("/{id}/thread", web::get().to(get_thread))
                    .route("/{id}/read", web::post().to(mark_read)),
            ),
    );
}
