//! 连接网关。
//!
//! 每个被接受的连接对应一个任务，生命周期为
//! Connecting → Open → Closed：加入注册表，双工循环里同时消费
//! 房间广播和对端上行帧，任何退出路径都先从注册表注销。
//!
//! 单条消息的失败（格式错误、空正文、房间消失、存储失败）只产生
//! 一个错误帧，连接保持打开；只有传输层失败或对端挂断才结束连接。

use axum::extract::ws::{Message as WsMessage, WebSocket};
use domain::{Identity, MessageBody, RoomName};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use application::{ChatEvent, ConnectionId};

use crate::{
    protocol::{error_frame_for, ErrorFrame, InboundFrame},
    state::AppState,
};

pub struct ChatConnection {
    state: AppState,
    identity: Identity,
    room: RoomName,
    id: ConnectionId,
}

impl ChatConnection {
    pub fn new(state: AppState, identity: Identity, room: RoomName, id: ConnectionId) -> Self {
        Self {
            state,
            identity,
            room,
            id,
        }
    }

    /// 连接主循环。
    ///
    /// 出站走每连接的无界 mpsc：本连接在存储上的慢调用不会阻塞
    /// 其他连接向本房间的广播，事件在通道里排队。
    pub async fn run(self, socket: WebSocket) {
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ChatEvent>();
        self.state.registry.join(&self.room, self.id, outbound_tx).await;

        let (mut sink, mut stream) = socket.split();

        loop {
            tokio::select! {
                event = outbound_rx.recv() => {
                    let Some(event) = event else { break };
                    let Ok(text) = serde_json::to_string(&event) else { continue };
                    if sink.send(WsMessage::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                inbound = stream.next() => {
                    match inbound {
                        Some(Ok(WsMessage::Text(text))) => {
                            if let Some(frame) = self.handle_text(text.as_str()).await {
                                if sink
                                    .send(WsMessage::Text(frame.to_json().into()))
                                    .await
                                    .is_err()
                                {
                                    break;
                                }
                            }
                        }
                        Some(Ok(WsMessage::Close(_))) | None => break,
                        // ping/pong 由 axum 自动应答，二进制帧忽略
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            tracing::debug!(
                                connection_id = %self.id,
                                error = %err,
                                "websocket transport error"
                            );
                            break;
                        }
                    }
                }
            }
        }

        self.state.registry.leave(&self.room, self.id).await;
        tracing::info!(
            connection_id = %self.id,
            user_id = %self.identity.user_id,
            room = %self.room,
            "websocket connection closed"
        );
    }

    /// 接收协议：解析 → 校验正文 → 持久化并广播。
    /// 返回 `Some` 表示需要回给对端的错误帧。
    async fn handle_text(&self, text: &str) -> Option<ErrorFrame> {
        let Ok(frame) = serde_json::from_str::<InboundFrame>(text) else {
            return Some(ErrorFrame::malformed_payload());
        };

        let body = match MessageBody::parse(frame.message) {
            Ok(body) => body,
            Err(_) => return Some(ErrorFrame::empty_message()),
        };

        match self
            .state
            .chat_service
            .send_message(&self.room, &self.identity, body)
            .await
        {
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(
                    connection_id = %self.id,
                    room = %self.room,
                    error = %err,
                    "inbound message rejected"
                );
                Some(error_frame_for(&err))
            }
        }
    }
}
