use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult};

use volara_core::{StoreError, SuggestionCache};

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    pub async fn get_string(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.get(key).await
    }

    pub async fn set_string_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex(key, value, ttl_seconds).await
    }

    /// Fixed-window counter. Returns false once the window's count passes
    /// the limit.
    pub async fn check_rate_limit(
        &self,
        key: &str,
        limit: i64,
        window_seconds: i64,
    ) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let (count,): (i64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .expire(key, window_seconds)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(count <= limit)
    }
}

#[async_trait]
impl SuggestionCache for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get_string(key)
            .await
            .map_err(|e| StoreError::Cache(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), StoreError> {
        self.set_string_ex(key, value, ttl_seconds)
            .await
            .map_err(|e| StoreError::Cache(e.to_string()))
    }
}
