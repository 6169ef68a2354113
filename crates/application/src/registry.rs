//! 房间注册表。
//!
//! 进程内的 pub/sub 目录：维护每个房间当前在线连接的发送端，
//! 向调用时刻的成员快照扇出事件。注册表在服务启动时构造一次，
//! 放在应用状态里，而不是全局可变状态。

use std::collections::HashMap;
use std::sync::Arc;

use domain::{Identity, Message, RoomName, Timestamp, UserId};
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// 连接在注册表中的标识，每次握手成功时生成。
pub type ConnectionId = Uuid;

/// 扇出给房间成员的事件，序列化后即为下行线协议帧。
#[derive(Debug, Clone, Serialize)]
pub struct ChatEvent {
    pub message: String,
    pub user: UserId,
    pub name: String,
    pub is_admin: bool,
    pub time: Timestamp,
}

impl ChatEvent {
    /// 由已持久化的消息和发送方身份构造事件。
    ///
    /// 时间戳取持久化时刻，保证同一条消息对所有成员一致。
    pub fn from_message(message: &Message, sender: &Identity) -> Self {
        Self {
            message: message.body.as_str().to_owned(),
            user: message.sender,
            name: sender.display_name.clone(),
            is_admin: sender.is_admin,
            time: message.created_at,
        }
    }
}

type Members = Arc<RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<ChatEvent>>>>;

/// 并发安全的房间成员目录。
///
/// 外层映射只在查找/增删房间项时短暂加锁；成员集合按房间各自加锁，
/// 房间之间互不阻塞。广播先取成员快照再发送，发送不持有任何锁。
#[derive(Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomName, Members>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 将连接加入房间。按连接标识幂等，同一连接至多出现一次。
    pub async fn join(
        &self,
        room: &RoomName,
        id: ConnectionId,
        sender: mpsc::UnboundedSender<ChatEvent>,
    ) {
        let mut rooms = self.rooms.write().await;
        let members = rooms.entry(room.clone()).or_default().clone();
        members.write().await.insert(id, sender);
        tracing::debug!(connection_id = %id, room = %room, "connection joined room");
    }

    /// 将连接移出房间；连接不在房间内时为空操作。
    pub async fn leave(&self, room: &RoomName, id: ConnectionId) {
        let members = { self.rooms.read().await.get(room).cloned() };
        let Some(members) = members else {
            return;
        };
        members.write().await.remove(&id);
        tracing::debug!(connection_id = %id, room = %room, "connection left room");

        // 外层写锁下再次确认为空，避免与并发 join 竞争后丢成员
        let mut rooms = self.rooms.write().await;
        if let Some(members) = rooms.get(room) {
            if members.read().await.is_empty() {
                rooms.remove(room);
            }
        }
    }

    /// 向房间当前成员快照扇出事件，返回成功投递的连接数。
    ///
    /// 单个连接的发送失败只记日志，不影响其余成员，也不向上传播。
    pub async fn broadcast(&self, room: &RoomName, event: ChatEvent) -> usize {
        let members = { self.rooms.read().await.get(room).cloned() };
        let Some(members) = members else {
            return 0;
        };
        let snapshot: Vec<(ConnectionId, mpsc::UnboundedSender<ChatEvent>)> = members
            .read()
            .await
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut delivered = 0;
        for (id, tx) in snapshot {
            match tx.send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    tracing::warn!(
                        connection_id = %id,
                        room = %room,
                        "failed to deliver broadcast to closed connection"
                    );
                }
            }
        }
        delivered
    }

    /// 房间当前成员数，供诊断和测试使用。
    pub async fn member_count(&self, room: &RoomName) -> usize {
        match self.rooms.read().await.get(room) {
            Some(members) => members.read().await.len(),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(text: &str) -> ChatEvent {
        ChatEvent {
            message: text.to_owned(),
            user: UserId(1),
            name: "Test".to_owned(),
            is_admin: false,
            time: Utc::now(),
        }
    }

    fn room(name: &str) -> RoomName {
        RoomName::parse(name).unwrap()
    }

    #[tokio::test]
    async fn join_and_leave_track_membership() {
        let registry = RoomRegistry::new();
        let room = room("chat_1");
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();

        registry.join(&room, id, tx).await;
        assert_eq!(registry.member_count(&room).await, 1);

        registry.leave(&room, id).await;
        assert_eq!(registry.member_count(&room).await, 0);
    }

    #[tokio::test]
    async fn join_is_idempotent_per_connection() {
        let registry = RoomRegistry::new();
        let room = room("chat_1");
        let id = Uuid::new_v4();
        let (tx, _rx) = mpsc::unbounded_channel();

        registry.join(&room, id, tx.clone()).await;
        registry.join(&room, id, tx).await;
        assert_eq!(registry.member_count(&room).await, 1);
    }

    #[tokio::test]
    async fn leave_unknown_connection_is_noop() {
        let registry = RoomRegistry::new();
        let room = room("chat_1");
        registry.leave(&room, Uuid::new_v4()).await;
        assert_eq!(registry.member_count(&room).await, 0);
    }

    #[tokio::test]
    async fn concurrent_joins_each_appear_once() {
        let registry = Arc::new(RoomRegistry::new());
        let room = room("chat_busy");

        let joins = (0..32).map(|_| {
            let registry = registry.clone();
            let room = room.clone();
            tokio::spawn(async move {
                let (tx, rx) = mpsc::unbounded_channel();
                registry.join(&room, Uuid::new_v4(), tx).await;
                // 保持接收端存活到 join 完成
                drop(rx);
            })
        });
        futures::future::join_all(joins).await;

        assert_eq!(registry.member_count(&room).await, 32);
    }

    #[tokio::test]
    async fn broadcast_reaches_every_member_exactly_once() {
        let registry = RoomRegistry::new();
        let room = room("chat_1");
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        registry.join(&room, Uuid::new_v4(), tx_a).await;
        registry.join(&room, Uuid::new_v4(), tx_b).await;

        let delivered = registry.broadcast(&room, event("hi")).await;
        assert_eq!(delivered, 2);
        assert_eq!(rx_a.recv().await.unwrap().message, "hi");
        assert_eq!(rx_b.recv().await.unwrap().message, "hi");
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_is_room_isolated() {
        let registry = RoomRegistry::new();
        let r1 = room("chat_1");
        let r2 = room("chat_2");
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.join(&r2, Uuid::new_v4(), tx).await;

        let delivered = registry.broadcast(&r1, event("only r1")).await;
        assert_eq!(delivered, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn failed_send_does_not_block_other_members() {
        let registry = RoomRegistry::new();
        let room = room("chat_1");
        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        let (tx_live, mut rx_live) = mpsc::unbounded_channel();
        registry.join(&room, Uuid::new_v4(), tx_dead).await;
        registry.join(&room, Uuid::new_v4(), tx_live).await;
        drop(rx_dead);

        let delivered = registry.broadcast(&room, event("still here")).await;
        assert_eq!(delivered, 1);
        assert_eq!(rx_live.recv().await.unwrap().message, "still here");
    }

    #[tokio::test]
    async fn left_connection_receives_no_further_broadcasts() {
        let registry = RoomRegistry::new();
        let room = room("chat_1");
        let id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.join(&room, id, tx).await;
        registry.leave(&room, id).await;

        let delivered = registry.broadcast(&room, event("gone")).await;
        assert_eq!(delivered, 0);
        assert!(rx.try_recv().is_err());
    }
}
