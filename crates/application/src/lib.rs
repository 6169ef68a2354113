//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务：角色策略（房间解析与准入）、
//! 房间注册表（pub/sub 扇出）、消息发送流水线，以及对外部适配器
//! （存储、时钟）的抽象。

pub mod clock;
pub mod error;
pub mod memory;
pub mod policy;
pub mod registry;
pub mod repository;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use error::ApplicationError;
pub use memory::{MemoryChatRepository, MemoryMessageRepository};
pub use policy::{AdminPolicy, ClientPolicy, ConnectContext, RolePolicy};
pub use registry::{ChatEvent, ConnectionId, RoomRegistry};
pub use repository::{ChatRepository, MessageRepository};
pub use services::{ChatService, ChatServiceDependencies};
