use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

mod api;
mod config;
mod db;
mod shutdown;
mod store;

use crate::api::{
    health::health_config, job::handlers::job_config, job::JobService, skill::skill_config,
    validation,
};
use crate::db::{
    job_repository::PgJobStore, party_repository::PgPartyDirectory,
    skill_repository::PgSkillCatalog,
};
use crate::shutdown::ShutdownCoordinator;
use crate::store::{JobStore, PartyDirectory, SkillCatalog};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config::Config {
        database_url,
        max_payload_size,
        max_db_connections,
        bind_addr,
        bind_port,
        log_dir,
    } = config::Config::from_env().expect("Failed to load configuration");

    std::fs::create_dir_all(&log_dir).expect("Failed to create logs directory");

    // File-based logging with daily rotation and level separation, plus a
    // console layer. Files land as logs/info.YYYY-MM-DD.log etc.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(&log_dir, "info.log");
    let error_file = tracing_appender::rolling::daily(&log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(&log_dir, "debug.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    info!("Starting gigmarket application");
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);

    let pool = db::connection::get_connection(&database_url, max_db_connections)
        .await
        .expect("Failed to connect to database");
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Store adapters are constructed once here and injected; no ambient
    // globals anywhere downstream.
    let job_store: Arc<dyn JobStore> = Arc::new(PgJobStore::new(pool.clone()));
    let parties: Arc<dyn PartyDirectory> = Arc::new(PgPartyDirectory::new(pool.clone()));
    let skills: Arc<dyn SkillCatalog> = Arc::new(PgSkillCatalog::new(pool.clone()));

    let job_service = web::Data::new(JobService::new(
        job_store,
        parties,
        skills.clone(),
    ));
    let skill_catalog = web::Data::new(skills);

    let server_pool = pool.clone();
    let server = HttpServer::new(move || {
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone())) // health checks
            .app_data(job_service.clone())
            .app_data(skill_catalog.clone())
            .app_data(payload_config)
            .app_data(validation::json_config())
            .configure(health_config)
            .configure(skill_config)
            .configure(job_config)
    });

    info!("Server starting on http://{}:{}", bind_addr, bind_port);

    let server = server.bind((bind_addr.as_str(), bind_port))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);
    coordinator.wait_for_shutdown().await
}
