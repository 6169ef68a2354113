use domain::{DomainError, RepositoryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ApplicationError {
    /// 房间在加入后到发送前之间消失时返回的错误。
    pub fn is_room_not_found(&self) -> bool {
        matches!(self, Self::Domain(DomainError::RoomNotFound))
    }
}
