pub mod create;
pub mod delete;
pub mod get;
pub mod history;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::behaviors::requests::{
    BehaviorQuery, CreateBehaviorRequest, UpdateBehaviorRequest,
};
use crate::storage::Storage;

pub struct BehaviorService {
    storage: Option<Arc<dyn Storage>>,
}

impl BehaviorService {
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

    pub async fn create_behavior(
        &self,
        request: &HttpRequest,
        session_id: i64,
        req: CreateBehaviorRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_behavior(self, request, session_id, req).await
    }

    pub async fn list_behaviors(
        &self,
        request: &HttpRequest,
        session_id: i64,
        query: BehaviorQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_behaviors(self, request, session_id, query).await
    }

    pub async fn get_behavior(
        &self,
        request: &HttpRequest,
        behavior_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_behavior(self, request, behavior_id).await
    }

    pub async fn update_behavior(
        &self,
        request: &HttpRequest,
        behavior_id: i64,
        req: UpdateBehaviorRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_behavior(self, request, behavior_id, req).await
    }

    pub async fn delete_behavior(
        &self,
        request: &HttpRequest,
        behavior_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::set_active(self, request, behavior_id, false).await
    }

    pub async fn restore_behavior(
        &self,
        request: &HttpRequest,
        behavior_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::set_active(self, request, behavior_id, true).await
    }

    pub async fn get_student_history(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        history::get_student_history(self, request, student_id).await
    }
}
