pub mod list;
pub mod manage;
pub mod payments;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::fees::requests::{
    CreateFeeNoteRequest, CreateFeeRequest, CreatePaymentRequest, FeeListQuery, UpdateFeeRequest,
    UpdatePaymentRequest,
};
use crate::storage::Storage;

pub struct FeeService {
    storage: Option<Arc<dyn Storage>>,
}

impl FeeService {
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

    pub async fn list_fees(
        &self,
        request: &HttpRequest,
        query: FeeListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_fees(self, request, query).await
    }

    pub async fn get_fee(&self, request: &HttpRequest, fee_id: i64) -> ActixResult<HttpResponse> {
        list::get_fee(self, request, fee_id).await
    }

    pub async fn create_fee(
        &self,
        request: &HttpRequest,
        req: CreateFeeRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_fee(self, request, req).await
    }

    pub async fn update_fee(
        &self,
        request: &HttpRequest,
        fee_id: i64,
        req: UpdateFeeRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_fee(self, request, fee_id, req).await
    }

    pub async fn add_note(
        &self,
        request: &HttpRequest,
        fee_id: i64,
        req: CreateFeeNoteRequest,
    ) -> ActixResult<HttpResponse> {
        manage::add_note(self, request, fee_id, req).await
    }

    pub async fn create_payment(
        &self,
        request: &HttpRequest,
        fee_id: i64,
        req: CreatePaymentRequest,
    ) -> ActixResult<HttpResponse> {
        payments::create_payment(self, request, fee_id, req).await
    }

    pub async fn update_payment(
        &self,
        request: &HttpRequest,
        payment_id: i64,
        req: UpdatePaymentRequest,
    ) -> ActixResult<HttpResponse> {
        payments::update_payment(self, request, payment_id, req).await
    }
}
