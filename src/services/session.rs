//! Access-token revocation backed by Redis.
//!
//! JWTs are stateless, so logout records the token digest in Redis until the
//! token would have expired anyway. Raw tokens are never stored.

use redis::AsyncCommands;
use sha2::{Digest, Sha256};

use crate::errors::AppError;

const KEY_PREFIX: &str = "oficina:revoked:";

/// Redis key under which a revoked token is remembered.
pub fn revocation_key(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{KEY_PREFIX}{}", hex::encode(hasher.finalize()))
}

/// Seconds until `exp`, at least one so the key is always written with a TTL.
pub fn remaining_ttl(exp: i64, now: i64) -> u64 {
    (exp - now).max(1) as u64
}

/// Mark a token as revoked for `ttl_secs`.
pub async fn revoke(client: &redis::Client, token: &str, ttl_secs: u64) -> Result<(), AppError> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let _: () = conn.set_ex(revocation_key(token), 1u8, ttl_secs).await?;
    Ok(())
}

/// Whether a token has been revoked by logout.
pub async fn is_revoked(client: &redis::Client, token: &str) -> Result<bool, AppError> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let exists: bool = conn.exists(revocation_key(token)).await?;
    Ok(exists)
}
