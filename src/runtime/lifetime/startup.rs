use crate::config::AppConfig;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 准备服务器启动的上下文
/// 包括 TLS 提供者、存储连接与数据库迁移
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    match AppConfig::get().export.archive_dir() {
        Some(dir) => info!("Grade exports will be archived to {}", dir),
        None => info!("Grade export archiving is disabled"),
    }

    StartupContext { storage }
}
