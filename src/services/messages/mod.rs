pub mod get;
pub mod mailbox;
pub mod send;
pub mod status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::messages::requests::{MailboxQuery, SendMessageRequest};
use crate::storage::Storage;

pub struct MessageService {
    storage: Option<Arc<dyn Storage>>,
}

impl MessageService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn send_message(
        &self,
        request: &HttpRequest,
        req: SendMessageRequest,
    ) -> ActixResult<HttpResponse> {
        send::send_message(self, request, req).await
    }

    pub async fn list_inbox(
        &self,
        request: &HttpRequest,
        query: MailboxQuery,
    ) -> ActixResult<HttpResponse> {
        mailbox::list_inbox(self, request, query).await
    }

    pub async fn list_sent(
        &self,
        request: &HttpRequest,
        query: MailboxQuery,
    ) -> ActixResult<HttpResponse> {
        mailbox::list_sent(self, request, query).await
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mailbox::unread_count(self, request).await
    }

    // 收件人查看时自动标记已读
    pub async fn get_message(
        &self,
        request: &HttpRequest,
        message_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_message(self, request, message_id).await
    }

    pub async fn get_thread(
        &self,
        request: &HttpRequest,
        message_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_thread(self, request, message_id).await
    }

    pub async fn mark_read(&self, request: &HttpRequest, message_id: i64) -> ActixResult<HttpResponse> {
        status::mark_read(self, request, message_id).await
    }

    pub async fn delete_message(
        &self,
        request: &HttpRequest,
        message_id: i64,
    ) -> ActixResult<HttpResponse> {
        status::delete_message(self, request, message_id).await
    }
}
