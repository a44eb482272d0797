use crate::cache::register::{get_object_cache_plugin, registered_object_cache_plugins};
use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::{generate_password, hash_password};
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";
const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let Some(constructor) = get_object_cache_plugin(name) else {
        warn!("Cache backend '{}' not found in registry", name);
        return None;
    };
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }
    if cache_type != FALLBACK_CACHE {
        warn!("Falling back to in-memory cache");
        if let Some(cache) = build_cache(FALLBACK_CACHE).await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 数据库为空时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用 ADMIN_PASSWORD，否则生成一次并打印
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password: Some(password_hash),
        role: UserRole::Admin,
        firstname: "Admin".to_string(),
        lastname: "School".to_string(),
        date_of_birth: None,
        gender: None,
        phone: None,
        secondary_email: None,
        school_year: None,
        subjects: vec![],
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, email: {})",
                user.id, user.email
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文：存储、默认管理员与缓存
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        debug!(
            "Registered cache backends: {:?}",
            registered_object_cache_plugins()
        );
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}
