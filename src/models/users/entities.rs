use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,   // 管理员
    Teacher, // 教师
    Student, // 学生（不可登录）
    Family,  // 家庭账号，与子女共用邮箱
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";
    pub const FAMILY: &'static str = "family";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }
    pub fn family_roles() -> &'static [&'static UserRole] {
        &[&Self::Family, &Self::Admin]
    }
    pub fn login_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Teacher, &Self::Family]
    }

    /// 学生没有密码，不能登录
    pub fn can_login(&self) -> bool {
        !matches!(self, UserRole::Student)
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Teacher)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, teacher, student, family"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Family => write!(f, "{}", UserRole::FAMILY),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::FAMILY => Ok(UserRole::Family),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 性别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum Gender {
    Masculin,
    Feminin,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Masculin => write!(f, "masculin"),
            Gender::Feminin => write!(f, "feminin"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "masculin" => Ok(Gender::Masculin),
            "feminin" => Ok(Gender::Feminin),
            _ => Err(format!("Invalid gender: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub firstname: String,
    pub lastname: String,
    pub is_active: bool,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub secondary_email: Option<String>,
    pub school_year: Option<String>,
    /// 教师可授科目
    pub subjects: Vec<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 已启用且未被软删除
    pub fn is_available(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }

    /// 以 `today` 为基准的周岁
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.and_then(|dob| today.years_since(dob))
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.role.to_string(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(dob: Option<NaiveDate>) -> User {
        User {
            id: 7,
            email: "famille.haddad@example.com".into(),
            password_hash: None,
            role: UserRole::Student,
            firstname: "Yasmine".into(),
            lastname: "Haddad".into(),
            is_active: true,
            date_of_birth: dob,
            gender: Some(Gender::Feminin),
            phone: None,
            secondary_email: None,
            school_year: Some("2024-2025".into()),
            subjects: vec![],
            last_login: None,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_round_trip_strings() {
        for role in ["admin", "teacher", "student", "family"] {
            let parsed: UserRole = role.parse().unwrap();
            assert_eq!(parsed.to_string(), role);
        }
        assert!("parent".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_error_message() {
        let err = serde_json::from_str::<UserRole>(r#""guest""#).unwrap_err();
        assert!(err.to_string().contains("guest"));
    }

    #[test]
    fn test_students_cannot_login() {
        assert!(!UserRole::Student.can_login());
        assert!(UserRole::Family.can_login());
        assert!(UserRole::Teacher.is_staff());
        assert!(!UserRole::Family.is_staff());
    }

    #[test]
    fn test_age_on() {
        let user = student(NaiveDate::from_ymd_opt(2014, 5, 20));
        let before_birthday = NaiveDate::from_ymd_opt(2024, 5, 19).unwrap();
        let on_birthday = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        assert_eq!(user.age_on(before_birthday), Some(9));
        assert_eq!(user.age_on(on_birthday), Some(10));
        assert_eq!(student(None).age_on(on_birthday), None);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let mut user = student(None);
        user.password_hash = Some("$argon2id$secret".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"role\":\"student\""));
    }
}
