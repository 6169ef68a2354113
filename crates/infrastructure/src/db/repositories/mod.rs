mod chat_repository_impl;
mod message_repository_impl;

pub use chat_repository_impl::PgChatRepository;
pub use message_repository_impl::PgMessageRepository;

use domain::RepositoryError;

/// 统一的 sqlx 错误映射。
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => RepositoryError::Conflict,
        other => RepositoryError::storage(other.to_string()),
    }
}
