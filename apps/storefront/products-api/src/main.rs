use axum_helpers::server::{create_app, create_router};
use core_config::{
    FromEnv,
    tracing::{init_tracing, install_color_eyre},
};
use database::{mongodb::MongoConfig, postgres::PostgresConfig};
use domain_products::{
    HttpUsersClient, InMemoryProductRepository, MongoProductRepository, PgProductRepository,
    ProductRepository, ProductService, UserCounter,
};
use eyre::WrapErr;
use std::{future::Future, sync::Arc, time::Duration};
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
        "Starting products service"
    );

    let users: Arc<dyn UserCounter> = Arc::new(
        HttpUsersClient::new(&config.users).wrap_err("Failed to build users client")?,
    );

    match config.backend {
        Backend::Postgres => {
            let db = database::postgres::connect_from_config(PostgresConfig::from_env()?)
                .await
                .wrap_err("Failed to connect to PostgreSQL")?;
            let repository = PgProductRepository::new(db.clone());
            if config.init_schema {
                repository
                    .init_schema()
                    .await
                    .wrap_err("Failed to initialise products schema")?;
            }

            let cleanup = async move {
                match db.close().await {
                    Ok(()) => info!("PostgreSQL pool closed"),
                    Err(e) => tracing::error!("Error closing PostgreSQL pool: {}", e),
                }
            };
            serve(&config, ProductService::new(repository, users), cleanup).await
        }
        Backend::Mongodb => {
            let mongo = MongoConfig::from_env()?.with_app_name(config.app.name.clone());
            let db = database::mongodb::connect_from_config(&mongo)
                .await
                .wrap_err("Failed to connect to MongoDB")?;
            let repository = MongoProductRepository::new(&db);
            serve(&config, ProductService::new(repository, users), async {}).await
        }
        Backend::Memory => {
            let repository = match &config.data_file {
                Some(path) => InMemoryProductRepository::open(path)
                    .await
                    .wrap_err_with(|| format!("Failed to load snapshot {}", path.display()))?,
                None => InMemoryProductRepository::new(),
            };
            serve(&config, ProductService::new(repository, users), async {}).await
        }
    }
}

async fn serve<R, F>(config: &Config, service: ProductService<R>, cleanup: F) -> eyre::Result<()>
where
    R: ProductRepository + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let router = create_router::<openapi::ApiDoc>(api::routes(service, config.app.clone()))
        .wrap_err("Failed to create router")?;

    create_app(router, &config.server, Duration::from_secs(30), cleanup)
        .await
        .wrap_err("Server error")?;

    info!("Products service shut down");
    Ok(())
}
