//! 消息 Repository 实现。

use application::MessageRepository;
use async_trait::async_trait;
use domain::{Message, MessageId, NewMessage, RepositoryError};

use super::map_sqlx_error;
use crate::db::DbPool;

pub struct PgMessageRepository {
    pool: DbPool,
}

impl PgMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message, RepositoryError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO messages (chat_id, sender_id, body, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(message.chat_id.0)
        .bind(message.sender.0)
        .bind(message.body.as_str())
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        tracing::debug!(message_id = id, chat_id = message.chat_id.0, "message stored");
        Ok(message.into_message(MessageId(id)))
    }
}
