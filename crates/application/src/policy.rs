//! 角色策略。
//!
//! 连接接入时由策略决定两件事：该连接归属哪个房间，以及该身份
//! 是否允许进入。客户端与管理端（客服）各有一套规则，网关本身
//! 对角色无感知。

use std::sync::Arc;

use async_trait::async_trait;
use domain::{Identity, RoomName};

use crate::{error::ApplicationError, repository::ChatRepository};

/// 连接请求上下文。管理端携带路径中的房间名，客户端为空。
#[derive(Debug, Clone, Default)]
pub struct ConnectContext {
    pub room_name: Option<String>,
}

impl ConnectContext {
    pub fn client() -> Self {
        Self::default()
    }

    pub fn admin(room_name: impl Into<String>) -> Self {
        Self {
            room_name: Some(room_name.into()),
        }
    }
}

/// 房间解析 + 准入判定的策略接口。
///
/// 解析先于准入执行，与上游系统保持一致；解析结果为 `None`
/// 表示无法确定房间，随后的准入必然失败。
#[async_trait]
pub trait RolePolicy: Send + Sync {
    async fn resolve(
        &self,
        identity: &Identity,
        ctx: &ConnectContext,
    ) -> Result<Option<RoomName>, ApplicationError>;

    fn authorize(&self, identity: &Identity, room: Option<&RoomName>) -> bool;
}

/// 普通用户策略：房间名由用户标识确定，不存在则创建。
/// 只放行已认证且非管理员的身份。
pub struct ClientPolicy {
    chats: Arc<dyn ChatRepository>,
}

impl ClientPolicy {
    pub fn new(chats: Arc<dyn ChatRepository>) -> Self {
        Self { chats }
    }
}

#[async_trait]
impl RolePolicy for ClientPolicy {
    async fn resolve(
        &self,
        identity: &Identity,
        _ctx: &ConnectContext,
    ) -> Result<Option<RoomName>, ApplicationError> {
        let room = RoomName::for_user(identity.user_id);
        self.chats.get_or_create(&room).await?;
        Ok(Some(room))
    }

    fn authorize(&self, identity: &Identity, room: Option<&RoomName>) -> bool {
        identity.authenticated && !identity.is_admin && room.is_some()
    }
}

/// 客服策略：房间名来自连接路径，且必须已存在；没有创建副作用。
/// 只放行已认证的管理员身份。
pub struct AdminPolicy {
    chats: Arc<dyn ChatRepository>,
}

impl AdminPolicy {
    pub fn new(chats: Arc<dyn ChatRepository>) -> Self {
        Self { chats }
    }
}

#[async_trait]
impl RolePolicy for AdminPolicy {
    async fn resolve(
        &self,
        _identity: &Identity,
        ctx: &ConnectContext,
    ) -> Result<Option<RoomName>, ApplicationError> {
        let Some(name) = ctx.room_name.as_deref() else {
            return Ok(None);
        };
        let Ok(room) = RoomName::parse(name) else {
            return Ok(None);
        };
        if self.chats.exists(&room).await? {
            Ok(Some(room))
        } else {
            Ok(None)
        }
    }

    fn authorize(&self, identity: &Identity, room: Option<&RoomName>) -> bool {
        identity.authenticated && identity.is_admin && room.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockChatRepository;
    use domain::{Chat, ChatId, UserId};
    use mockall::predicate::eq;

    fn client(id: i64) -> Identity {
        Identity::new(UserId(id), "Client", false)
    }

    fn admin(id: i64) -> Identity {
        Identity::new(UserId(id), "Agent", true)
    }

    #[tokio::test]
    async fn client_policy_derives_room_from_identity_and_creates_it() {
        let mut chats = MockChatRepository::new();
        let expected = RoomName::for_user(UserId(7));
        chats
            .expect_get_or_create()
            .with(eq(expected.clone()))
            .times(1)
            .returning(|room| Ok(Chat::new(ChatId(1), room.clone())));

        let policy = ClientPolicy::new(Arc::new(chats));
        let room = policy
            .resolve(&client(7), &ConnectContext::client())
            .await
            .unwrap();
        assert_eq!(room, Some(expected));
    }

    #[tokio::test]
    async fn client_policy_rejects_admin_identity() {
        let chats = MockChatRepository::new();
        let policy = ClientPolicy::new(Arc::new(chats));
        let room = RoomName::for_user(UserId(7));
        assert!(!policy.authorize(&admin(7), Some(&room)));
    }

    #[tokio::test]
    async fn client_policy_rejects_unauthenticated() {
        let chats = MockChatRepository::new();
        let policy = ClientPolicy::new(Arc::new(chats));
        let room = RoomName::for_user(UserId(0));
        assert!(!policy.authorize(&Identity::anonymous(), Some(&room)));
    }

    #[tokio::test]
    async fn admin_policy_resolves_existing_room() {
        let mut chats = MockChatRepository::new();
        chats.expect_exists().returning(|_| Ok(true));

        let policy = AdminPolicy::new(Arc::new(chats));
        let room = policy
            .resolve(&admin(1), &ConnectContext::admin("chat_7"))
            .await
            .unwrap();
        assert_eq!(room, Some(RoomName::parse("chat_7").unwrap()));
        assert!(policy.authorize(&admin(1), room.as_ref()));
    }

    #[tokio::test]
    async fn admin_policy_fails_resolution_for_missing_room() {
        let mut chats = MockChatRepository::new();
        chats.expect_exists().returning(|_| Ok(false));

        let policy = AdminPolicy::new(Arc::new(chats));
        let room = policy
            .resolve(&admin(1), &ConnectContext::admin("chat_404"))
            .await
            .unwrap();
        assert_eq!(room, None);
        assert!(!policy.authorize(&admin(1), room.as_ref()));
    }

    #[tokio::test]
    async fn admin_policy_rejects_ordinary_user() {
        let mut chats = MockChatRepository::new();
        chats.expect_exists().returning(|_| Ok(true));

        let policy = AdminPolicy::new(Arc::new(chats));
        let room = policy
            .resolve(&client(2), &ConnectContext::admin("chat_7"))
            .await
            .unwrap();
        assert!(!policy.authorize(&client(2), room.as_ref()));
    }
}
