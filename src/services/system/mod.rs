pub mod connection_logs;
pub mod health;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::system::ConnectionLogParams;
use crate::storage::Storage;

pub struct SystemService {
    storage: Option<Arc<dyn Storage>>,
}

impl SystemService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        health::health(self, request).await
    }

    pub async fn list_connection_logs(
        &self,
        request: &HttpRequest,
        params: ConnectionLogParams,
    ) -> ActixResult<HttpResponse> {
        connection_logs::list_connection_logs(self, request, params).await
    }
}
