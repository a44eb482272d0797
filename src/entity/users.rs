//! 用户实体

use sea_orm::entity::prelude::*;

use super::{parse_date, to_datetime};
use crate::models::users::entities::{Gender, User, UserRole};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub firstname: String,
    pub lastname: String,
    pub is_active: bool,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub secondary_email: Option<String>,
    pub school_year: Option<String>,
    /// JSON 数组
    #[sea_orm(column_type = "Text")]
    pub subjects: String,
    pub last_login: Option<i64>,
    pub deleted_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_teachers::Entity")]
    CourseTeachers,
    #[sea_orm(has_many = "super::session_students::Entity")]
    SessionStudents,
}

impl Related<super::course_teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseTeachers.def()
    }
}

impl Related<super::session_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionStudents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            // 未知角色按学生处理，学生不能登录
            role: self.role.parse::<UserRole>().unwrap_or(UserRole::Student),
            firstname: self.firstname,
            lastname: self.lastname,
            is_active: self.is_active,
            date_of_birth: self.date_of_birth.as_deref().map(parse_date),
            gender: self.gender.and_then(|g| g.parse::<Gender>().ok()),
            phone: self.phone,
            secondary_email: self.secondary_email,
            school_year: self.school_year,
            subjects: serde_json::from_str(&self.subjects).unwrap_or_default(),
            last_login: self.last_login.map(to_datetime),
            deleted_at: self.deleted_at.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
