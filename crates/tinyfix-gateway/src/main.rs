use std::sync::Arc;

use clap::Parser;
use tinyfix_core::KvStore;
use tinyfix_gateway::cli::{LogFormatArg, StorageBackendArg, CLI};
use tinyfix_gateway::{App, AppState};
use tinyfix_generator::{CodeLength, GeneratorSettings, RandomGenerator};
use tinyfix_shortener::ShortenerService;
use tinyfix_storage::{InMemoryStore, RedisStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        fqdn = %config.fqdn,
        storage_backend = %config.storage,
        "starting gateway server"
    );

    let generator = RandomGenerator::new(
        GeneratorSettings::builder()
            .length(CodeLength::Range {
                min: config.code_min_length,
                max: config.code_max_length,
            })
            .build(),
    )?;

    match config.storage {
        StorageBackendArg::InMemory => run_server(&config, InMemoryStore::new(), generator).await,
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .ok_or("redis url is required when storage backend is redis")?;
            let store = RedisStore::connect(redis_url, config.redis_key_prefix.as_str()).await?;
            run_server(&config, store, generator).await
        }
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormatArg::Pretty => builder.pretty().init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn run_server<S: KvStore>(
    config: &CLI,
    store: S,
    generator: RandomGenerator,
) -> Result<(), Box<dyn std::error::Error>> {
    let shortener = ShortenerService::new(store, generator);
    let state = AppState::new(Arc::new(shortener), &config.scheme, config.fqdn.as_str());

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state)).await?;
    Ok(())
}
