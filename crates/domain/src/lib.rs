//! 领域模型层。
//!
//! 定义支持聊天的核心类型：房间、消息、调用方身份，以及领域错误。
//! 这一层不依赖任何运行时或存储实现。

pub mod chat;
pub mod errors;
pub mod identity;
pub mod message;
pub mod value_objects;

pub use chat::Chat;
pub use errors::{DomainError, DomainResult, RepositoryError};
pub use identity::Identity;
pub use message::{Message, NewMessage};
pub use value_objects::{ChatId, MessageBody, MessageId, RoomName, Timestamp, UserId};
