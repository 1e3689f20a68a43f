use redis::AsyncCommands;

use crate::error::AppError;

const REVOKED_TOKEN_PREFIX: &str = "revoked_token:";

/// Revoked JWT ids, kept in redis until the token would have expired anyway.
#[derive(Clone)]
pub struct TokenBlacklist {
    redis_client: redis::Client,
}

impl TokenBlacklist {
    pub fn new(redis_client: redis::Client) -> Self {
        Self { redis_client }
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        Ok(self.redis_client.get_multiplexed_async_connection().await?)
    }

    pub fn key_for(jti: &str) -> String {
        format!("{}{}", REVOKED_TOKEN_PREFIX, jti)
    }

    /// Revokes `jti` for `ttl_secs`; a zero ttl means the token is already dead.
    pub async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<(), AppError> {
        if ttl_secs == 0 {
            return Ok(());
        }
        let mut conn = self.get_connection().await?;
        let _: () = conn.set_ex(Self::key_for(jti), 1u8, ttl_secs).await?;
        tracing::debug!(jti = %jti, ttl_secs, "Token revoked");
        Ok(())
    }

    pub async fn is_revoked(&self, jti: &str) -> Result<bool, AppError> {
        let mut conn = self.get_connection().await?;
        let exists: bool = conn.exists(Self::key_for(jti)).await?;
        Ok(exists)
    }

    pub async fn health_check(&self) -> Result<bool, AppError> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}
