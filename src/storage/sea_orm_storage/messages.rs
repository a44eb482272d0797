//! 站内消息存储操作

use std::collections::{BTreeSet, HashMap};

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{message_recipients, messages, to_datetime};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    messages::{
        entities::{InboxItem, Message, MessageDetail, SentItem},
        requests::{MailboxQuery, SendMessageRequest},
        responses::{InboxResponse, SentResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_message_impl(
        &self,
        sender_id: i64,
        req: SendMessageRequest,
    ) -> Result<MessageDetail> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let message = MessageActiveModel {
            sender_id: Set(sender_id),
            subject: Set(req.subject.trim().to_string()),
            body: Set(req.body),
            parent_id: Set(req.parent_id),
            sender_deleted: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建消息失败: {e}")))?;

        let recipients: BTreeSet<i64> = req.recipient_ids.into_iter().collect();
        for recipient_id in recipients {
            MessageRecipientActiveModel {
                message_id: Set(message.id),
                recipient_id: Set(recipient_id),
                is_read: Set(false),
                is_deleted: Set(false),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("写入收件人失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_message_impl(message.id)
            .await?
            .ok_or_else(|| SchoolHubError::not_found("Message not found after creation"))
    }

    pub async fn get_message_impl(&self, message_id: i64) -> Result<Option<MessageDetail>> {
        let Some(message) = Messages::find_by_id(message_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询消息失败: {e}")))?
        else {
            return Ok(None);
        };

        let recipients = MessageRecipients::find()
            .filter(message_recipients::Column::MessageId.eq(message_id))
            .order_by_asc(message_recipients::Column::RecipientId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询收件人失败: {e}")))?;

        let sender_deleted = message.sender_deleted;
        Ok(Some(MessageDetail {
            message: message.into_message(),
            sender_deleted,
            recipients: recipients.into_iter().map(|r| r.into_recipient()).collect(),
        }))
    }

    /// 收件箱：按收件记录分页，排除已删除
    pub async fn list_inbox_impl(&self, user_id: i64, query: MailboxQuery) -> Result<InboxResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = MessageRecipients::find()
            .filter(message_recipients::Column::RecipientId.eq(user_id))
            .filter(message_recipients::Column::IsDeleted.eq(false));
        if query.unread_only {
            select = select.filter(message_recipients::Column::IsRead.eq(false));
        }
        select = select.order_by_desc(message_recipients::Column::MessageId);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询收件箱总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询收件箱页数失败: {e}")))?;
        let entries = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询收件箱失败: {e}")))?;

        let mut messages: HashMap<i64, Message> = if entries.is_empty() {
            HashMap::new()
        } else {
            Messages::find()
                .filter(messages::Column::Id.is_in(entries.iter().map(|e| e.message_id)))
                .all(&self.db)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("查询消息失败: {e}")))?
                .into_iter()
                .map(|m| (m.id, m.into_message()))
                .collect()
        };

        let items = entries
            .into_iter()
            .filter_map(|entry| {
                let message = messages.remove(&entry.message_id)?;
                Some(InboxItem {
                    message,
                    is_read: entry.is_read,
                    read_at: entry.read_at.map(to_datetime),
                })
            })
            .collect();

        Ok(InboxResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn list_sent_impl(&self, user_id: i64, query: MailboxQuery) -> Result<SentResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let paginator = Messages::find()
            .filter(messages::Column::SenderId.eq(user_id))
            .filter(messages::Column::SenderDeleted.eq(false))
            .order_by_desc(messages::Column::CreatedAt)
            .order_by_desc(messages::Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询发件箱总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询发件箱页数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询发件箱失败: {e}")))?;

        let mut recipients: HashMap<i64, Vec<i64>> = HashMap::new();
        if !models.is_empty() {
            let rows = MessageRecipients::find()
                .filter(message_recipients::Column::MessageId.is_in(models.iter().map(|m| m.id)))
                .all(&self.db)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("查询收件人失败: {e}")))?;
            for row in rows {
                recipients
                    .entry(row.message_id)
                    .or_default()
                    .push(row.recipient_id);
            }
        }

        let items = models
            .into_iter()
            .map(|m| {
                let recipient_ids = recipients.remove(&m.id).unwrap_or_default();
                SentItem {
                    message: m.into_message(),
                    recipient_ids,
                }
            })
            .collect();

        Ok(SentResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn mark_message_read_impl(&self, message_id: i64, user_id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = MessageRecipients::update_many()
            .col_expr(message_recipients::Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .col_expr(message_recipients::Column::ReadAt, sea_orm::sea_query::Expr::value(now))
            .filter(message_recipients::Column::MessageId.eq(message_id))
            .filter(message_recipients::Column::RecipientId.eq(user_id))
            .filter(message_recipients::Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("标记已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 发件人删除发件箱副本，收件人删除收件箱条目，互不影响
    pub async fn delete_message_for_impl(&self, message_id: i64, user_id: i64) -> Result<bool> {
        let sent = Messages::update_many()
            .col_expr(messages::Column::SenderDeleted, sea_orm::sea_query::Expr::value(true))
            .filter(messages::Column::Id.eq(message_id))
            .filter(messages::Column::SenderId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除消息失败: {e}")))?;

        let received = MessageRecipients::update_many()
            .col_expr(
                message_recipients::Column::IsDeleted,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(message_recipients::Column::MessageId.eq(message_id))
            .filter(message_recipients::Column::RecipientId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除消息失败: {e}")))?;

        Ok(sent.rows_affected + received.rows_affected > 0)
    }

    pub async fn count_unread_messages_impl(&self, user_id: i64) -> Result<i64> {
        let count = MessageRecipients::find()
            .filter(message_recipients::Column::RecipientId.eq(user_id))
            .filter(message_recipients::Column::IsRead.eq(false))
            .filter(message_recipients::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计未读消息失败: {e}")))?;

        Ok(count as i64)
    }

    pub async fn list_replies_impl(&self, message_id: i64) -> Result<Vec<Message>> {
        let models = Messages::find()
            .filter(messages::Column::ParentId.eq(message_id))
            .order_by_asc(messages::Column::CreatedAt)
            .order_by_asc(messages::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询回复失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_message()).collect())
    }
}
