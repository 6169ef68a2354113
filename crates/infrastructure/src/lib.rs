//! 基础设施层。
//!
//! 存储端口的 PostgreSQL 实现。

pub mod db;

pub use db::{
    create_pg_pool,
    repositories::{PgChatRepository, PgMessageRepository},
};
