use serde::{Deserialize, Serialize};

use crate::value_objects::{ChatId, RoomName};

/// 聊天会话记录，持有唯一房间名。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub room: RoomName,
}

impl Chat {
    pub fn new(id: ChatId, room: RoomName) -> Self {
        Self { id, room }
    }
}
