use crate::error::AppError;
use crate::utils::config::AppConfig;
use log::{info, warn};
use std::sync::Arc;

pub async fn init() -> crate::error::Result<Arc<AppConfig>> {
    // 加载应用配置
    let config_path = AppConfig::resolve_path();
    let config = AppConfig::load(&config_path)
        .map_err(|detail| AppError::Config { path: config_path.clone(), detail })?;

    // 初始化日志系统
    log4rs::init_file(&config.server.log_config, Default::default()).map_err(|detail| {
        AppError::Logging { path: config.server.log_config.clone(), detail }
    })?;
    info!("应用配置加载完成: {}", config_path);

    info!(
        "中继端点: {}, 上游网关: {}, 模型: {}",
        config.relay.path, config.relay.gateway_url, config.relay.model
    );
    if config.relay.api_key().is_none() {
        warn!("环境变量 {} 未设置, 中继请求将返回配置错误", config.relay.api_key_env);
    }

    Ok(Arc::new(config))
}
