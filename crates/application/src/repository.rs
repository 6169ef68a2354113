//! 存储端口。
//!
//! 持久化是外部协作方，这里只定义应用层消费的最小接口。

use async_trait::async_trait;
use domain::{Chat, Message, NewMessage, RepositoryError, RoomName};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// 查找房间，不存在则创建（仅客户端接入流程使用）。
    async fn get_or_create(&self, room: &RoomName) -> Result<Chat, RepositoryError>;

    async fn find_by_room(&self, room: &RoomName) -> Result<Option<Chat>, RepositoryError>;

    /// 房间是否存在（仅管理端接入流程使用）。
    async fn exists(&self, room: &RoomName) -> Result<bool, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 持久化一条消息。调用方保证所属 chat 记录存在。
    async fn create(&self, message: NewMessage) -> Result<Message, RepositoryError>;
}
