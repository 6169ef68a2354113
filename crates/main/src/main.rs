//! 主应用程序入口
//!
//! 启动支持聊天中继服务。

use std::sync::Arc;

use application::{
    AdminPolicy, ChatService, ChatServiceDependencies, ClientPolicy, RoomRegistry, SystemClock,
};
use config::AppConfig;
use infrastructure::{create_pg_pool, PgChatRepository, PgMessageRepository};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();

    tracing::info!(
        "连接数据库: {}",
        config.database.url.split('@').next_back().unwrap_or("unknown")
    );
    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    // 存储适配器
    let chat_repository: Arc<dyn application::ChatRepository> =
        Arc::new(PgChatRepository::new(pg_pool.clone()));
    let message_repository: Arc<dyn application::MessageRepository> =
        Arc::new(PgMessageRepository::new(pg_pool));

    // 注册表随服务启动构造一次，生命周期与进程一致
    let registry = Arc::new(RoomRegistry::new());
    let clock: Arc<dyn application::Clock> = Arc::new(SystemClock);

    let chat_service = Arc::new(ChatService::new(ChatServiceDependencies {
        chat_repository: chat_repository.clone(),
        message_repository,
        clock,
        registry: registry.clone(),
    }));

    // 角色策略
    let client_policy = Arc::new(ClientPolicy::new(chat_repository.clone()));
    let admin_policy = Arc::new(AdminPolicy::new(chat_repository));

    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

    let state = AppState::new(
        chat_service,
        registry,
        client_policy,
        admin_policy,
        jwt_service,
    );

    let app = router(state).layer(tower_http::trace::TraceLayer::new_for_http());
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("支持聊天服务器启动在 http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
