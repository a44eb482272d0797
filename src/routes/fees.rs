use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::fees::requests::{
    CreateFeeNoteRequest, CreateFeeRequest, CreatePaymentRequest, FeeListQuery, UpdateFeeRequest,
    UpdatePaymentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::FeeService;
use crate::utils::SafeIDI64;

// 懒加载的全局 FeeService 实例
static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn list_fees(
    req: HttpRequest,
    query: web::Query<FeeListQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_fees(&req, query.into_inner()).await
}

pub async fn get_fee(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_fee(&req, id.0).await
}

pub async fn create_fee(
    req: HttpRequest,
    fee_data: web::Json<CreateFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_fee(&req, fee_data.into_inner()).await
}

pub async fn update_fee(
    req: HttpRequest,
    id: SafeIDI64,
    fee_data: web::Json<UpdateFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .update_fee(&req, id.0, fee_data.into_inner())
        .await
}

pub async fn add_note(
    req: HttpRequest,
    id: SafeIDI64,
    note_data: web::Json<CreateFeeNoteRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.add_note(&req, id.0, note_data.into_inner()).await
}

pub async fn create_payment(
    req: HttpRequest,
    id: SafeIDI64,
    payment_data: web::Json<CreatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .create_payment(&req, id.0, payment_data.into_inner())
        .await
}

pub async fn update_payment(
    req: HttpRequest,
    id: SafeIDI64,
    payment_data: web::Json<UpdatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .update_payment(&req, id.0, payment_data.into_inner())
        .await
}

// 配置路由
pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(middlewares::RequireJWT)
            // 家庭查看自己的缴费
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_fees)
                            .wrap(middlewares::RequireRole::new_any(UserRole::family_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_fee)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .route(
                "/payments/{id}",
                web::put()
                    .to(update_payment)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_fee)
                            .wrap(middlewares::RequireRole::new_any(UserRole::family_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_fee)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .route(
                "/{id}/payments",
                web::post()
                    .to(create_payment)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .route(
                "/{id}/notes",
                web::post()
                    .to(add_note)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
