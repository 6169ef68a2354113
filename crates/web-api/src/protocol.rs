//! 线协议帧。
//!
//! 上行：`{"message": <string>}`
//! 下行：`{"message", "user", "name", "is_admin", "time"}`（见
//! `application::ChatEvent`）
//! 错误帧：`{"error": <string>}`

use application::ApplicationError;
use domain::{DomainError, RepositoryError};
use serde::{Deserialize, Serialize};

/// 客户端上行帧。
#[derive(Debug, Deserialize)]
pub struct InboundFrame {
    pub message: String,
}

/// 错误帧。每条被拒绝的上行消息恰好产生一帧。
#[derive(Debug, Serialize)]
pub struct ErrorFrame {
    pub error: String,
}

impl ErrorFrame {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn malformed_payload() -> Self {
        Self::new("Invalid JSON format.")
    }

    pub fn empty_message() -> Self {
        Self::new("Empty messages are not allowed.")
    }

    pub fn to_json(&self) -> String {
        // 结构只有一个字符串字段，序列化不会失败
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_owned())
    }
}

/// 把发送流水线的失败映射为错误帧文案。
pub fn error_frame_for(err: &ApplicationError) -> ErrorFrame {
    match err {
        ApplicationError::Domain(DomainError::EmptyMessage) => ErrorFrame::empty_message(),
        ApplicationError::Domain(DomainError::RoomNotFound) => {
            ErrorFrame::new("Chat room no longer exists.")
        }
        ApplicationError::Domain(DomainError::InvalidRoomName { .. }) => {
            ErrorFrame::new("Chat room no longer exists.")
        }
        ApplicationError::Repository(RepositoryError::NotFound) => {
            ErrorFrame::new("Chat room no longer exists.")
        }
        ApplicationError::Repository(_) => ErrorFrame::new("Failed to store message."),
    }
}
