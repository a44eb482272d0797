use super::SeaOrmStorage;
use crate::entity::format_date;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

fn encode_subjects(subjects: &[String]) -> String {
    serde_json::to_string(subjects).unwrap_or_else(|_| "[]".to_string())
}

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            email: Set(req.email.trim().to_lowercase()),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            firstname: Set(req.firstname.trim().to_string()),
            lastname: Set(req.lastname.trim().to_string()),
            is_active: Set(true),
            date_of_birth: Set(req.date_of_birth.map(format_date)),
            gender: Set(req.gender.map(|g| g.to_string())),
            phone: Set(req.phone),
            secondary_email: Set(req.secondary_email),
            school_year: Set(req.school_year),
            subjects: Set(encode_subjects(&req.subjects)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let users = Users::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Lastname)
            .order_by_asc(Column::Firstname)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 登录账号：学生与家庭共用邮箱，因此要排除学生
    pub async fn get_login_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .filter(Column::Role.ne(UserRole::STUDENT))
            .filter(Column::IsActive.eq(true))
            .filter(Column::DeletedAt.is_null())
            .filter(Column::PasswordHash.is_not_null())
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn is_account_email_taken_impl(
        &self,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let mut select = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .filter(Column::Role.ne(UserRole::STUDENT))
            .filter(Column::DeletedAt.is_null());

        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询邮箱失败: {e}")))?;

        Ok(count > 0)
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Firstname.contains(&escaped))
                    .add(Column::Lastname.contains(&escaped))
                    .add(Column::Email.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if !query.include_inactive {
            select = select
                .filter(Column::IsActive.eq(true))
                .filter(Column::DeletedAt.is_null());
        }

        select = select
            .order_by_asc(Column::Lastname)
            .order_by_asc(Column::Firstname);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn list_active_users_by_role_impl(&self, role: UserRole) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .filter(Column::IsActive.eq(true))
            .filter(Column::DeletedAt.is_null())
            .order_by_asc(Column::Lastname)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 家庭的孩子：邮箱相同的已启用学生
    pub async fn list_students_by_email_impl(&self, email: &str) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .filter(Column::Role.eq(UserRole::STUDENT))
            .filter(Column::IsActive.eq(true))
            .filter(Column::DeletedAt.is_null())
            .order_by_asc(Column::Firstname)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                SchoolHubError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    pub async fn update_password_impl(&self, id: i64, password_hash: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(
                Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash.to_string()),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新密码失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email.trim().to_lowercase());
        }

        if let Some(password) = update.password {
            model.password_hash = Set(Some(password));
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(firstname) = update.firstname {
            model.firstname = Set(firstname.trim().to_string());
        }

        if let Some(lastname) = update.lastname {
            model.lastname = Set(lastname.trim().to_string());
        }

        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        if let Some(dob) = update.date_of_birth {
            model.date_of_birth = Set(Some(format_date(dob)));
        }

        if let Some(gender) = update.gender {
            model.gender = Set(Some(gender.to_string()));
        }

        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        if let Some(secondary_email) = update.secondary_email {
            model.secondary_email = Set(Some(secondary_email));
        }

        if let Some(school_year) = update.school_year {
            model.school_year = Set(Some(school_year));
        }

        if let Some(subjects) = update.subjects {
            model.subjects = Set(encode_subjects(&subjects));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 软删除用户
    pub async fn soft_delete_user_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn restore_user_impl(&self, id: i64) -> Result<Option<User>> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(true))
            .col_expr(
                Column::DeletedAt,
                sea_orm::sea_query::Expr::value(Option::<i64>::None),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("恢复用户失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_user_by_id_impl(id).await
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    pub async fn count_active_users_by_role_impl(&self, role: UserRole) -> Result<u64> {
        let count = Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .filter(Column::IsActive.eq(true))
            .filter(Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}
