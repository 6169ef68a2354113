use std::sync::Arc;

use application::{ChatService, RolePolicy, RoomRegistry};

use crate::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub registry: Arc<RoomRegistry>,
    pub client_policy: Arc<dyn RolePolicy>,
    pub admin_policy: Arc<dyn RolePolicy>,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    pub fn new(
        chat_service: Arc<ChatService>,
        registry: Arc<RoomRegistry>,
        client_policy: Arc<dyn RolePolicy>,
        admin_policy: Arc<dyn RolePolicy>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            chat_service,
            registry,
            client_policy,
            admin_policy,
            jwt_service,
        }
    }
}
