use axum_helpers::server::{create_app, create_router};
use core_config::{
    FromEnv,
    tracing::{init_tracing, install_color_eyre},
};
use database::postgres::PostgresConfig;
use domain_users::{InMemoryUserRepository, PgUserRepository, UserRepository, UserService};
use eyre::WrapErr;
use std::{future::Future, time::Duration};
use tracing::info;

mod api;
mod config;
mod openapi;

use config::{Backend, Config};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    info!(
        service = %config.app.name,
        backend = %config.backend,
        "Starting users service"
    );

    match config.backend {
        Backend::Postgres => {
            let db = database::postgres::connect_from_config(PostgresConfig::from_env()?)
                .await
                .wrap_err("Failed to connect to PostgreSQL")?;
            let repository = PgUserRepository::new(db.clone());
            if config.init_schema {
                repository
                    .init_schema()
                    .await
                    .wrap_err("Failed to initialise users schema")?;
            }

            let cleanup = async move {
                match db.close().await {
                    Ok(()) => info!("PostgreSQL pool closed"),
                    Err(e) => tracing::error!("Error closing PostgreSQL pool: {}", e),
                }
            };
            serve(&config, UserService::new(repository), cleanup).await
        }
        Backend::Memory => {
            serve(&config, UserService::new(InMemoryUserRepository::new()), async {}).await
        }
    }
}

async fn serve<R, F>(config: &Config, service: UserService<R>, cleanup: F) -> eyre::Result<()>
where
    R: UserRepository + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let router = create_router::<openapi::ApiDoc>(api::routes(service, config.app.clone()))
        .wrap_err("Failed to create router")?;

    create_app(router, &config.server, Duration::from_secs(30), cleanup)
        .await
        .wrap_err("Server error")?;

    info!("Users service shut down");
    Ok(())
}
