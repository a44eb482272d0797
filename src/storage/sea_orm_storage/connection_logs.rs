use super::SeaOrmStorage;
use crate::entity::connection_logs::{ActiveModel, Column, Entity as ConnectionLogs};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo,
    system::{ConnectionLogListResponse, ConnectionLogParams, NewConnectionLog},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 记录一次登录尝试
    pub async fn create_connection_log_impl(&self, log: NewConnectionLog) -> Result<()> {
        ActiveModel {
            user_id: Set(log.user_id),
            email: Set(log.email),
            success: Set(log.success),
            ip_address: Set(log.ip_address),
            user_agent: Set(log.user_agent),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("写入登录日志失败: {e}")))?;
        Ok(())
    }

    pub async fn list_connection_logs_impl(
        &self,
        params: ConnectionLogParams,
    ) -> Result<ConnectionLogListResponse> {
        let (page, size) = params.pagination.normalized();

        let mut select = ConnectionLogs::find();
        if let Some(user_id) = params.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }
        if let Some(success) = params.success {
            select = select.filter(Column::Success.eq(success));
        }
        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询登录日志总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询登录日志页数失败: {e}")))?;
        let logs = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询登录日志失败: {e}")))?;

        Ok(ConnectionLogListResponse {
            items: logs.into_iter().map(|m| m.into_log()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}
