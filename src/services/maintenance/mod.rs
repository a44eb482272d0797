pub mod tasks;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::storage::Storage;

pub struct MaintenanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl MaintenanceService {
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

    pub async fn run_task(&self, request: &HttpRequest, task: &str) -> ActixResult<HttpResponse> {
        tasks::run_task(self, request, task).await
    }
}
