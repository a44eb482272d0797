use serde::Deserialize;
use ts_rs::TS;

// 登录请求，家庭账号与教师均使用邮箱登录
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

// 修改本人密码
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
