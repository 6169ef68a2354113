use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// 统一的时间戳类型。
pub type Timestamp = DateTime<Utc>;

/// 用户唯一标识。
///
/// 上游认证系统以整数主键标识用户，这里原样透传。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// 聊天会话（房间记录）唯一标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChatId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// 消息唯一标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MessageId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// 经过验证的房间名。
///
/// 房间名全局唯一且区分大小写，长度上限与存储列一致。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomName(String);

pub const ROOM_NAME_MAX_LEN: usize = 100;

impl RoomName {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::invalid_room_name("cannot be empty"));
        }
        if value.len() > ROOM_NAME_MAX_LEN {
            return Err(DomainError::invalid_room_name("too long"));
        }
        Ok(Self(value))
    }

    /// 某个用户的专属客服房间名。
    pub fn for_user(user_id: UserId) -> Self {
        Self(format!("chat_{}", user_id.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 非空的消息正文。
///
/// 仅用去除首尾空白后的结果做校验，原始文本原样保留。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::EmptyMessage);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_name_rejects_blank() {
        assert!(RoomName::parse("").is_err());
        assert!(RoomName::parse("   ").is_err());
    }

    #[test]
    fn room_name_rejects_overlong() {
        let long = "r".repeat(ROOM_NAME_MAX_LEN + 1);
        assert!(RoomName::parse(long).is_err());
    }

    #[test]
    fn room_name_is_case_sensitive() {
        let a = RoomName::parse("Support").unwrap();
        let b = RoomName::parse("support").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn room_name_for_user_is_stable() {
        let name = RoomName::for_user(UserId(42));
        assert_eq!(name.as_str(), "chat_42");
        assert_eq!(name, RoomName::for_user(UserId(42)));
    }

    #[test]
    fn message_body_rejects_whitespace_only() {
        assert_eq!(
            MessageBody::parse(" \t\n").unwrap_err(),
            DomainError::EmptyMessage
        );
    }

    #[test]
    fn message_body_keeps_original_text() {
        let body = MessageBody::parse("  hello  ").unwrap();
        assert_eq!(body.as_str(), "  hello  ");
    }
}
