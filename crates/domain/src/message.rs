use serde::{Deserialize, Serialize};

use crate::value_objects::{ChatId, MessageBody, MessageId, Timestamp, UserId};

/// 已持久化的消息，创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub sender: UserId,
    pub body: MessageBody,
    /// 持久化时刻赋值
    pub created_at: Timestamp,
}

/// 待持久化的消息。
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub chat_id: ChatId,
    pub sender: UserId,
    pub body: MessageBody,
    pub created_at: Timestamp,
}

impl NewMessage {
    pub fn into_message(self, id: MessageId) -> Message {
        Message {
            id,
            chat_id: self.chat_id,
            sender: self.sender,
            body: self.body,
            created_at: self.created_at,
        }
    }
}
