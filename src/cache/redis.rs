//! Redis cache store.
//!
//! Uses a lazily established `redis::aio::ConnectionManager`. Every round
//! trip, including the first connect, runs under the configured read
//! timeout so a hung or absent server turns into a connectivity error
//! instead of a stuck request.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{ErrorKind, RedisError, RedisResult};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::timeout;

use crate::cache::error::{CacheError, CacheResult};
use crate::cache::keys::CacheKey;
use crate::cache::store::CacheStore;

/// Redis-backed [`CacheStore`].
pub struct RedisStore {
    client: redis::Client,
    connection: OnceCell<ConnectionManager>,
    read_timeout: Duration,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("connected", &self.connection.initialized())
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

impl RedisStore {
    /// Create a store for `url`. No connection is made until the first call.
    pub fn new(url: &str, read_timeout: Duration) -> CacheResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::Backend(format!("invalid redis url '{}': {}", redact_url(url), e)))?;

        tracing::debug!(url = %redact_url(url), ?read_timeout, "Redis store configured");

        Ok(Self {
            client,
            connection: OnceCell::new(),
            read_timeout,
        })
    }

    async fn connection(&self) -> CacheResult<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                let manager = ConnectionManager::new(self.client.clone())
                    .await
                    .map_err(classify)?;
                tracing::info!("Connected to redis");
                Ok::<_, CacheError>(manager)
            })
            .await?;
        Ok(manager.clone())
    }

    async fn run<T, F, Fut>(&self, op: &'static str, f: F) -> CacheResult<T>
    where
        F: FnOnce(ConnectionManager) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        let work = async {
            let conn = self.connection().await?;
            f(conn).await.map_err(classify)
        };

        match timeout(self.read_timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Connectivity(format!(
                "redis {} timed out after {:?}",
                op, self.read_timeout
            ))),
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn hash_get_all(&self, key: &CacheKey) -> CacheResult<Option<HashMap<String, String>>> {
        let fields = self
            .run("HGETALL", |mut conn| async move {
                let fields: HashMap<String, String> = redis::cmd("HGETALL")
                    .arg(key.as_str())
                    .query_async(&mut conn)
                    .await?;
                Ok(fields)
            })
            .await?;

        // HGETALL answers an empty map for a missing key.
        Ok(if fields.is_empty() { None } else { Some(fields) })
    }

    async fn hash_set_all(
        &self,
        key: &CacheKey,
        fields: &[(String, String)],
        ttl: Duration,
    ) -> CacheResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        self.run("HSET", |mut conn| async move {
            let mut pipe = redis::pipe();
            pipe.atomic().cmd("HSET").arg(key.as_str());
            for (field, value) in fields {
                pipe.arg(field).arg(value);
            }
            pipe.ignore()
                .cmd("EXPIRE")
                .arg(key.as_str())
                .arg(ttl.as_secs().max(1))
                .ignore();
            let _: () = pipe.query_async(&mut conn).await?;
            Ok(())
        })
        .await
    }

    async fn set_add(&self, key: &CacheKey, members: &[String], ttl: Duration) -> CacheResult<()> {
        if members.is_empty() {
            return Ok(());
        }

        self.run("SADD", |mut conn| async move {
            let mut pipe = redis::pipe();
            pipe.atomic().cmd("SADD").arg(key.as_str());
            for member in members {
                pipe.arg(member);
            }
            pipe.ignore()
                .cmd("EXPIRE")
                .arg(key.as_str())
                .arg(ttl.as_secs().max(1))
                .ignore();
            let _: () = pipe.query_async(&mut conn).await?;
            Ok(())
        })
        .await
    }

    async fn set_random_member(&self, key: &CacheKey) -> CacheResult<Option<String>> {
        self.run("SRANDMEMBER", |mut conn| async move {
            let member: Option<String> = redis::cmd("SRANDMEMBER")
                .arg(key.as_str())
                .query_async(&mut conn)
                .await?;
            Ok(member)
        })
        .await
    }

    async fn get_bytes(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        self.run("GET", |mut conn| async move {
            let value: Option<Vec<u8>> = redis::cmd("GET")
                .arg(key.as_str())
                .query_async(&mut conn)
                .await?;
            Ok(value)
        })
        .await
    }

    async fn set_bytes(&self, key: &CacheKey, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        self.run("SET", |mut conn| async move {
            let mut cmd = redis::cmd("SET");
            cmd.arg(key.as_str()).arg(value);
            if let Some(ttl) = ttl {
                cmd.arg("EX").arg(ttl.as_secs().max(1));
            }
            let _: () = cmd.query_async(&mut conn).await?;
            Ok(())
        })
        .await
    }

    async fn ping(&self) -> CacheResult<()> {
        let pong: String = self
            .run("PING", |mut conn| async move {
                let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
                Ok(pong)
            })
            .await?;

        if pong == "PONG" {
            Ok(())
        } else {
            Err(CacheError::Backend(format!("unexpected PING reply: {}", pong)))
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

/// Sort a redis error into the cache error taxonomy.
fn classify(err: RedisError) -> CacheError {
    if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
        CacheError::Connectivity(err.to_string())
    } else if err.kind() == ErrorKind::TypeError {
        CacheError::Decode(err.to_string())
    } else {
        CacheError::Backend(err.to_string())
    }
}

/// Redact credentials from a Redis URL for logging
fn redact_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            return format!("{}***{}", &url[..=colon_pos], &url[at_pos..]);
        }
    }
    url.to_string()
}
