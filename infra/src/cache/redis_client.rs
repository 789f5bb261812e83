//! Redis client implementation
//!
//! Wraps a multiplexed connection with a bounded number of in-flight commands,
//! a per-command timeout, and retry with exponential backoff for transient
//! failures.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use redis::{aio::MultiplexedConnection, Client, RedisError, RedisResult};
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::cache::RedisConfig;
use crate::errors::InfrastructureError;

/// Backoff cap between retries
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client with a bounded command pool and retry logic
///
/// Cloning is cheap: clones share the connection and the pool permits.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Permits bounding the commands in flight
    permits: Arc<Semaphore>,
    command_timeout: Duration,
    max_retries: u32,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect to Redis
    ///
    /// # Arguments
    /// * `config` - Redis configuration settings
    ///
    /// # Example
    /// ```no_run
    /// use sms_infra::cache::{RedisClient, RedisConfig};
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let client = RedisClient::new(&RedisConfig::new("redis://localhost:6379")).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: &RedisConfig) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            pool_size = config.pool_size,
            "Creating Redis client"
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(
            client,
            Duration::from_secs(config.connection_timeout),
            config.max_retries,
            config.retry_delay_ms,
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            permits: Arc::new(Semaphore::new(config.pool_size.max(1))),
            command_timeout: Duration::from_secs(config.command_timeout),
            max_retries: config.max_retries.max(1),
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        connect_timeout: Duration,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let outcome = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result.map_err(InfrastructureError::Cache),
                Err(_) => Err(InfrastructureError::Timeout(format!(
                    "connecting to Redis took longer than {:?}",
                    connect_timeout
                ))),
            };

            match outcome {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// Run an idempotent operation, retrying transient failures
    pub async fn execute_with_retry<F, T>(
        &self,
        name: &'static str,
        operation: F,
    ) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            match self.execute_once(name, &operation).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable(&e) => {
                    warn!(
                        command = name,
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(command = name, "Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// Run an operation exactly once
    ///
    /// Used for non-idempotent commands such as increments, where a retry
    /// after a lost reply would apply the command twice.
    pub async fn execute_once<F, T>(&self, name: &'static str, operation: F) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| InfrastructureError::Pool(e.to_string()))?;

        match timeout(self.command_timeout, operation(self.connection.clone())).await {
            Ok(result) => result.map_err(InfrastructureError::Cache),
            Err(_) => Err(InfrastructureError::Timeout(format!(
                "{} took longer than {:?}",
                name, self.command_timeout
            ))),
        }
    }

    /// Check if the Redis connection is healthy
    pub async fn health_check(&self) -> Result<(), InfrastructureError> {
        let response = self
            .execute_with_retry("PING", |mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(())
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Err(InfrastructureError::Config(format!(
                "unexpected PING reply: {}",
                response
            )))
        }
    }
}

fn is_retriable(error: &InfrastructureError) -> bool {
    match error {
        InfrastructureError::Cache(e) => is_retriable_error(e),
        InfrastructureError::Timeout(_) => true,
        _ => false,
    }
}

/// Check if a Redis error is transient and the operation should be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask the credentials of a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
