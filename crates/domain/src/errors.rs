//! 领域错误定义。

use thiserror::Error;

/// 领域错误类型。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 去除空白后消息正文为空
    #[error("empty message body")]
    EmptyMessage,

    /// 引用的房间不存在
    #[error("room not found")]
    RoomNotFound,

    /// 房间名不合法
    #[error("invalid room name: {reason}")]
    InvalidRoomName { reason: String },
}

impl DomainError {
    pub fn invalid_room_name(reason: impl Into<String>) -> Self {
        Self::InvalidRoomName {
            reason: reason.into(),
        }
    }
}

/// 存储层错误类型，由各 repository 实现映射产生。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("conflicting record")]
    Conflict,

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
