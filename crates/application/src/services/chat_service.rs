use std::sync::Arc;

use domain::{DomainError, Identity, Message, MessageBody, NewMessage, RoomName};

use crate::{
    clock::Clock,
    error::ApplicationError,
    registry::{ChatEvent, RoomRegistry},
    repository::{ChatRepository, MessageRepository},
};

pub struct ChatServiceDependencies {
    pub chat_repository: Arc<dyn ChatRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub clock: Arc<dyn Clock>,
    pub registry: Arc<RoomRegistry>,
}

/// 消息发送流水线：先持久化，后扇出。
pub struct ChatService {
    deps: ChatServiceDependencies,
}

impl ChatService {
    pub fn new(deps: ChatServiceDependencies) -> Self {
        Self { deps }
    }

    /// 在指定房间发送一条消息。
    ///
    /// 房间在加入后可能已被移除，此处按发送时刻重新解析；不存在
    /// 则以 `RoomNotFound` 失败，既不持久化也不广播。广播一定发生
    /// 在持久化成功之后。
    pub async fn send_message(
        &self,
        room: &RoomName,
        sender: &Identity,
        body: MessageBody,
    ) -> Result<Message, ApplicationError> {
        let chat = self
            .deps
            .chat_repository
            .find_by_room(room)
            .await?
            .ok_or(DomainError::RoomNotFound)?;

        let message = self
            .deps
            .message_repository
            .create(NewMessage {
                chat_id: chat.id,
                sender: sender.user_id,
                body,
                created_at: self.deps.clock.now(),
            })
            .await?;

        let delivered = self
            .deps
            .registry
            .broadcast(room, ChatEvent::from_message(&message, sender))
            .await;
        tracing::debug!(
            room = %room,
            message_id = %message.id,
            delivered,
            "message persisted and broadcast"
        );

        Ok(message)
    }
}
