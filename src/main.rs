use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::time::Duration;

use support_relay::controller::not_found;
use support_relay::middleware::{error_handler, Cors, Logging};
use support_relay::routes;
use support_relay::service::relay::GatewayClient;
use support_relay::utils::init;
use support_relay::AppError;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 初始化应用配置和日志系统
    let config = init::init()
        .await
        .context("初始化应用程序失败")
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    // 网关客户端只创建一次, 所有 worker 共享
    let gateway = GatewayClient::from_config(&config.relay)
        .context("创建网关客户端失败")
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let gateway = web::Data::new(gateway);

    let cors = Cors::new(&config.cors).map_err(AppError::from)?;

    let host = config.server.host.clone();
    let port = config.server.port;
    let shutdown_timeout = config.server.shutdown_timeout;
    let request_timeout = Duration::from_secs(config.server.client_request_timeout_secs);
    let relay_path = config.relay.path.clone();

    log::info!("Support relay listening on {}:{}{}", host, port, relay_path);

    HttpServer::new(move || {
        let relay_path = relay_path.clone();
        App::new()
            .app_data(gateway.clone())
            .wrap(error_handler())
            .wrap(Logging)
            .wrap(cors.clone())
            .configure(|cfg| routes::configure(cfg, &relay_path))
            .default_service(web::to(not_found))
    })
    .client_request_timeout(request_timeout)
    .bind((host, port))?
    .shutdown_timeout(shutdown_timeout) // 优雅关闭等待时间
    .run()
    .await
}
