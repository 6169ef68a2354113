//! Web API 层。
//!
//! 提供两个 WebSocket 接入端点（客户端、客服端）和连接网关，
//! 把角色策略、房间注册表和消息流水线串起来。

pub mod auth;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod websocket;
pub mod ws_connection;

pub use auth::{Claims, JwtService};
pub use routes::router;
pub use state::AppState;
