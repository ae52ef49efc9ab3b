use std::{process, sync::Arc};

use cinegate::{
    application::{catalog::CatalogService, error::AppError},
    cache::CacheStore,
    config,
    domain::{FILM_SEARCH, GENRE_SEARCH, PERSON_SEARCH},
    infra::{
        elastic::ElasticClient,
        error::InfraError,
        http::{self, GatewayState},
        redis::RedisStore,
        telemetry,
    },
    search::SearchEngineClient,
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    serve(settings).await
}

async fn serve(settings: config::Settings) -> Result<(), AppError> {
    let store: Arc<dyn CacheStore> = Arc::new(RedisStore::connect(&settings.cache.url).await?);
    let engine: Arc<dyn SearchEngineClient> = Arc::new(ElasticClient::new(
        &settings.engine.url,
        settings.engine.request_timeout,
    )?);

    let ttl = settings.cache.ttl;
    let state = GatewayState {
        films: Arc::new(CatalogService::new(
            FILM_SEARCH,
            store.clone(),
            engine.clone(),
            ttl,
        )),
        genres: Arc::new(CatalogService::new(
            GENRE_SEARCH,
            store.clone(),
            engine.clone(),
            ttl,
        )),
        persons: Arc::new(CatalogService::new(PERSON_SEARCH, store, engine, ttl)),
    };

    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target: "cinegate::server",
        addr = %settings.server.addr,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Server(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install shutdown handler");
        return;
    }
    info!(target: "cinegate::server", "shutdown signal received");
}
