//! WebSocket 接入端点。
//!
//! 客户端端点不带房间参数，房间由身份推导；客服端点在路径中
//! 显式携带房间名。两者共用同一个网关，差异全部封装在角色策略里。
//!
//! 接入失败（未认证、角色不符、房间无法解析）直接以 403 拒绝
//! 升级握手：不发送任何协议帧，也从不进入注册表。沿用上游系统的
//! 静默关闭行为。

use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use uuid::Uuid;

use application::{ConnectContext, RolePolicy};

use crate::{state::AppState, ws_connection::ChatConnection};

/// WebSocket 连接查询参数
#[derive(Debug, Deserialize)]
pub struct WebSocketQuery {
    /// JWT access token
    pub token: Option<String>,
}

/// 客户端接入：`GET /ws/chat?token=…`
pub async fn client_chat(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WebSocketQuery>,
) -> Result<Response, StatusCode> {
    upgrade(ws, state, query, ConnectContext::client(), Role::Client).await
}

/// 客服接入：`GET /ws/chat/{chat_name}?token=…`
pub async fn admin_chat(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(chat_name): Path<String>,
    Query(query): Query<WebSocketQuery>,
) -> Result<Response, StatusCode> {
    upgrade(ws, state, query, ConnectContext::admin(chat_name), Role::Admin).await
}

enum Role {
    Client,
    Admin,
}

async fn upgrade(
    ws: WebSocketUpgrade,
    state: AppState,
    query: WebSocketQuery,
    ctx: ConnectContext,
    role: Role,
) -> Result<Response, StatusCode> {
    let identity = state.jwt_service.identity_from_token(query.token.as_deref());
    let policy: &dyn RolePolicy = match role {
        Role::Client => state.client_policy.as_ref(),
        Role::Admin => state.admin_policy.as_ref(),
    };

    // 解析先于准入，与上游系统一致（客户端房间的惰性创建发生在这里）
    let room = policy.resolve(&identity, &ctx).await.map_err(|err| {
        tracing::error!(error = %err, "room resolution failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if !policy.authorize(&identity, room.as_ref()) {
        tracing::info!(
            user_id = %identity.user_id,
            authenticated = identity.authenticated,
            "rejecting websocket connection"
        );
        return Err(StatusCode::FORBIDDEN);
    }
    // authorize 通过即保证 room 已解析
    let room = room.ok_or(StatusCode::FORBIDDEN)?;

    let connection_id = Uuid::new_v4();
    tracing::info!(
        connection_id = %connection_id,
        user_id = %identity.user_id,
        room = %room,
        "accepting websocket connection"
    );

    Ok(ws.on_upgrade(move |socket| {
        ChatConnection::new(state, identity, room, connection_id).run(socket)
    }))
}
