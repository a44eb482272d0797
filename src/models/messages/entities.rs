use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub subject: String,
    pub body: String,
    /// 回复的原消息
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct MessageRecipient {
    pub message_id: i64,
    pub recipient_id: i64,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct MessageDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub message: Message,
    pub sender_deleted: bool,
    pub recipients: Vec<MessageRecipient>,
}

impl MessageDetail {
    pub fn recipient(&self, user_id: i64) -> Option<&MessageRecipient> {
        self.recipients.iter().find(|r| r.recipient_id == user_id)
    }

    /// 发件人或未删除该消息的收件人可见
    pub fn is_visible_to(&self, user_id: i64) -> bool {
        (self.message.sender_id == user_id && !self.sender_deleted)
            || self.recipient(user_id).is_some_and(|r| !r.is_deleted)
    }
}

// 收件箱条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct InboxItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub message: Message,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
}

// 发件箱条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct SentItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub message: Message,
    pub recipient_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(sender_deleted: bool, recipient_deleted: bool) -> MessageDetail {
        MessageDetail {
            message: Message {
                id: 1,
                sender_id: 10,
                subject: "Sortie scolaire".into(),
                body: "Merci de signer l'autorisation.".into(),
                parent_id: None,
                created_at: Utc::now(),
            },
            sender_deleted,
            recipients: vec![MessageRecipient {
                message_id: 1,
                recipient_id: 20,
                is_read: false,
                read_at: None,
                is_deleted: recipient_deleted,
            }],
        }
    }

    #[test]
    fn test_visibility_for_parties() {
        let msg = detail(false, false);
        assert!(msg.is_visible_to(10));
        assert!(msg.is_visible_to(20));
        assert!(!msg.is_visible_to(30));
    }

    #[test]
    fn test_visibility_after_per_party_delete() {
        let msg = detail(true, false);
        assert!(!msg.is_visible_to(10));
        assert!(msg.is_visible_to(20));

        let msg = detail(false, true);
        assert!(msg.is_visible_to(10));
        assert!(!msg.is_visible_to(20));
    }
}
