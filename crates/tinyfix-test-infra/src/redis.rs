use crate::error::{Result, TestInfraError};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const REDIS_PORT: u16 = 6379;

#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisConfig {
    #[builder(default = "redis".to_string())]
    image: String,
    #[builder(default = "8.6.0".to_string())]
    tag: String,
    /// How many times to PING before giving up on the server.
    #[builder(default = 20)]
    ready_attempts: u32,
}

/// Test fixture for a disposable, single-node Redis server.
///
/// The container is stopped when the fixture is dropped.
pub struct RedisServer {
    container: ContainerAsync<GenericImage>,
    config: RedisConfig,
}

impl RedisServer {
    /// Starts a Redis container and waits until it answers `PING`.
    pub async fn start(config: RedisConfig) -> Result<Self> {
        let container = GenericImage::new(config.image.as_str(), config.tag.as_str())
            .with_exposed_port(REDIS_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await?;

        let server = Self { container, config };
        server.wait_ready().await?;
        Ok(server)
    }

    pub async fn host(&self) -> Result<String> {
        let host = self.container.get_host().await?.to_string();
        Ok(match host.as_str() {
            "localhost" => String::from("127.0.0.1"),
            _ => host,
        })
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(REDIS_PORT).await?)
    }

    pub async fn redis_url(&self) -> Result<String> {
        Ok(format!("redis://{}:{}", self.host().await?, self.port().await?))
    }

    /// Opens a fresh multiplexed connection to the server.
    pub async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        let client = redis::Client::open(self.redis_url().await?)?;
        Ok(client.get_multiplexed_async_connection().await?)
    }

    async fn wait_ready(&self) -> Result<()> {
        let attempts = self.config.ready_attempts;
        for _ in 0..attempts {
            if let Ok(mut conn) = self.connection().await {
                let pong: redis::RedisResult<String> =
                    redis::cmd("PING").query_async(&mut conn).await;
                if pong.is_ok() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        Err(TestInfraError::NotReady { attempts })
    }
}
