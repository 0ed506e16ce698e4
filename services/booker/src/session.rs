//! Session management using Redis

use anyhow::Result;
use common::cache::RedisPool;
use rand::{Rng, distributions::Alphanumeric};
use tracing::info;

use crate::models::SessionUser;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "booker_session";

const TOKEN_LENGTH: usize = 48;

fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

/// Generate an unguessable session token
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Session manager for handling user sessions in Redis
#[derive(Clone)]
pub struct SessionManager {
    redis_pool: RedisPool,
    ttl_seconds: u64,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
        }
    }

    /// Create a new session for a user and return its token
    pub async fn create_session(&self, user: &SessionUser) -> Result<String> {
        info!("Creating session for user: {}", user.user_id);

        let token = generate_token();
        let value = serde_json::to_string(user)?;
        self.redis_pool
            .set(&session_key(&token), &value, Some(self.ttl_seconds))
            .await?;

        Ok(token)
    }

    /// Resolve a token to its user, extending the session on each use.
    ///
    /// Tokens that could never have been issued are answered without a
    /// round trip to Redis.
    pub async fn get_session(&self, token: &str) -> Result<Option<SessionUser>> {
        if token.len() != TOKEN_LENGTH || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(None);
        }

        let key = session_key(token);
        let Some(value) = self.redis_pool.get(&key).await? else {
            return Ok(None);
        };

        self.redis_pool.touch(&key, self.ttl_seconds).await?;
        Ok(Some(serde_json::from_str(&value)?))
    }

    /// Delete a session
    pub async fn delete_session(&self, token: &str) -> Result<()> {
        info!("Deleting session");
        self.redis_pool.delete(&session_key(token)).await
    }

    /// Get Redis health status
    pub async fn health_check(&self) -> Result<bool> {
        self.redis_pool.health_check().await
    }
}
