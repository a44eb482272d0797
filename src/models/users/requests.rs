use super::entities::{Gender, UserRole};
use crate::models::common::PaginationQuery;
use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

// 用户创建请求，password 在服务层哈希后再交给存储层
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: Option<String>,
    pub role: UserRole,
    pub firstname: String,
    pub lastname: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub secondary_email: Option<String>,
    pub school_year: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

// 用户更新请求，所有字段可选
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub is_active: Option<bool>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub secondary_email: Option<String>,
    pub school_year: Option<String>,
    pub subjects: Option<Vec<String>>,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub search: Option<String>,
    pub include_inactive: bool,
}

impl From<UserListParams> for UserListQuery {
    fn from(params: UserListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            role: params.role,
            search: params.search,
            include_inactive: params.include_inactive,
        }
    }
}
