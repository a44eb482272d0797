pub mod dashboard;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::family::FamilyQuery;
use crate::storage::Storage;

pub struct FamilyService {
    storage: Option<Arc<dyn Storage>>,
}

impl FamilyService {
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

    pub async fn get_dashboard(
        &self,
        request: &HttpRequest,
        query: FamilyQuery,
    ) -> ActixResult<HttpResponse> {
        dashboard::get_dashboard(self, request, query).await
    }
}
