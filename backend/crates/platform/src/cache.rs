//! Cache-aside accessor
//!
//! A small key-value surface (get / set / delete / exists / increment /
//! expire / key scan) over either Redis (`deadpool-redis`) or an in-process
//! map with TTLs. Values are JSON encoded.
//!
//! Every operation reports an unreachable backend as [`CacheError::Unavailable`].
//! Workflows use the `try_*` helpers, which log and swallow failures so a
//! cache outage degrades to "always miss" instead of failing requests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use deadpool_redis::Pool;
use redis::AsyncCommands;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::RwLock;

/// Keys visited per SCAN round trip.
const SCAN_BATCH: usize = 100;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum CacheError {
    /// Backend unreachable or connection pool exhausted
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Backend rejected the command (e.g. INCR on a non-integer)
    #[error("Cache command failed: {0}")]
    Command(String),

    #[error("Cache value serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_refusal() || err.is_timeout() {
            CacheError::Unavailable(err.to_string())
        } else {
            CacheError::Command(err.to_string())
        }
    }
}

impl From<deadpool_redis::PoolError> for CacheError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

impl From<CacheError> for kernel::error::app_error::AppError {
    fn from(err: CacheError) -> Self {
        match &err {
            CacheError::Unavailable(_) => Self::service_unavailable("Cache unavailable"),
            _ => Self::internal("Cache operation failed"),
        }
        .with_source(err)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Redis connection settings
#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub url: String,
    pub pool_size: usize,
    /// Applied to pool wait, connection creation and recycling
    pub timeout: Duration,
}

impl RedisSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_size: 16,
            timeout: Duration::from_secs(2),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Cache handle, cheap to clone.
#[derive(Clone)]
pub enum CacheClient {
    Redis(Pool),
    Memory(MemoryCache),
}

impl std::fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheClient::Redis(_) => f.write_str("CacheClient::Redis"),
            CacheClient::Memory(_) => f.write_str("CacheClient::Memory"),
        }
    }
}

impl CacheClient {
    /// In-process backend.
    pub fn memory() -> Self {
        CacheClient::Memory(MemoryCache::default())
    }

    /// Redis backend. No connection is opened until the first command.
    pub fn redis(settings: &RedisSettings) -> CacheResult<Self> {
        let mut redis_config = deadpool_redis::Config::from_url(&settings.url);
        let mut pool_config = deadpool_redis::PoolConfig::new(settings.pool_size);
        pool_config.timeouts.wait = Some(settings.timeout);
        pool_config.timeouts.create = Some(settings.timeout);
        pool_config.timeouts.recycle = Some(settings.timeout);
        redis_config.pool = Some(pool_config);

        let pool = redis_config
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        Ok(CacheClient::Redis(pool))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            CacheClient::Redis(_) => "redis",
            CacheClient::Memory(_) => "memory",
        }
    }

    // ------------------------------------------------------------------------
    // Raw string operations
    // ------------------------------------------------------------------------

    pub async fn set_raw(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
        match self {
            CacheClient::Redis(pool) => {
                let mut conn = pool.get().await?;
                let _: () = match ttl {
                    Some(ttl) => conn.set_ex(key, value, ttl_secs(ttl)).await?,
                    None => conn.set(key, value).await?,
                };
                Ok(())
            }
            CacheClient::Memory(memory) => {
                memory.set(key, value, ttl).await;
                Ok(())
            }
        }
    }

    pub async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            CacheClient::Redis(pool) => {
                let mut conn = pool.get().await?;
                let value: Option<String> = conn.get(key).await?;
                Ok(value)
            }
            CacheClient::Memory(memory) => Ok(memory.get(key).await),
        }
    }

    // ------------------------------------------------------------------------
    // JSON operations
    // ------------------------------------------------------------------------

    /// Store `value` as JSON with an optional expiry.
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> CacheResult<()>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, json, ttl).await
    }

    /// Read and decode a JSON value. `Ok(None)` when absent.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Remove a single exact key. Returns whether it existed.
    pub async fn delete(&self, key: &str) -> CacheResult<bool> {
        match self {
            CacheClient::Redis(pool) => {
                let mut conn = pool.get().await?;
                let removed: i64 = conn.del(key).await?;
                Ok(removed > 0)
            }
            CacheClient::Memory(memory) => Ok(memory.delete(key).await),
        }
    }

    pub async fn exists(&self, key: &str) -> CacheResult<bool> {
        match self {
            CacheClient::Redis(pool) => {
                let mut conn = pool.get().await?;
                let exists: bool = conn.exists(key).await?;
                Ok(exists)
            }
            CacheClient::Memory(memory) => Ok(memory.get(key).await.is_some()),
        }
    }

    /// Atomically add one, creating the key at 0 first. Existing TTL is kept.
    pub async fn increment(&self, key: &str) -> CacheResult<i64> {
        match self {
            CacheClient::Redis(pool) => {
                let mut conn = pool.get().await?;
                let value: i64 = conn.incr(key, 1).await?;
                Ok(value)
            }
            CacheClient::Memory(memory) => memory.increment(key).await,
        }
    }

    /// Set a TTL on an existing key. Returns false when the key is absent.
    pub async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        match self {
            CacheClient::Redis(pool) => {
                let mut conn = pool.get().await?;
                let updated: i64 = redis::cmd("EXPIRE")
                    .arg(key)
                    .arg(ttl_secs(ttl))
                    .query_async(&mut conn)
                    .await?;
                Ok(updated == 1)
            }
            CacheClient::Memory(memory) => Ok(memory.expire(key, ttl).await),
        }
    }

    /// Keys matching a glob pattern (`*`, `?`). Uses SCAN on Redis.
    pub async fn keys_matching(&self, pattern: &str) -> CacheResult<Vec<String>> {
        match self {
            CacheClient::Redis(pool) => {
                let mut conn = pool.get().await?;
                let mut cursor: u64 = 0;
                let mut keys = Vec::new();
                loop {
                    let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn)
                        .await?;
                    keys.extend(batch);
                    if next == 0 {
                        break;
                    }
                    cursor = next;
                }
                keys.sort();
                keys.dedup();
                Ok(keys)
            }
            CacheClient::Memory(memory) => Ok(memory.keys_matching(pattern).await),
        }
    }

    /// Delete every key matching `pattern`. Returns the number removed.
    pub async fn delete_matching(&self, pattern: &str) -> CacheResult<u64> {
        let keys = self.keys_matching(pattern).await?;
        let mut removed = 0;
        for key in &keys {
            if self.delete(key).await? {
                removed += 1;
            }
        }
        tracing::debug!(pattern, removed, "Deleted matching cache keys");
        Ok(removed)
    }

    /// Round trip to the backend.
    pub async fn ping(&self) -> CacheResult<()> {
        match self {
            CacheClient::Redis(pool) => {
                let mut conn = pool.get().await?;
                let _: String = redis::cmd("PING").query_async(&mut conn).await?;
                Ok(())
            }
            CacheClient::Memory(_) => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Non-fatal helpers
    // ------------------------------------------------------------------------

    /// [`Self::get`] that treats any failure as a miss.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache read failed, falling back to store");
                None
            }
        }
    }

    /// [`Self::set`] that logs and swallows failures.
    pub async fn try_set<T>(&self, key: &str, value: &T, ttl: Option<Duration>)
    where
        T: Serialize + ?Sized,
    {
        if let Err(e) = self.set(key, value, ttl).await {
            tracing::warn!(key, error = %e, "Cache write failed");
        }
    }

    /// [`Self::delete`] that logs and swallows failures.
    pub async fn try_delete(&self, key: &str) {
        if let Err(e) = self.delete(key).await {
            tracing::warn!(key, error = %e, "Cache delete failed");
        }
    }
}

/// Redis expiries are whole seconds; never round down to "no expiry".
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

// ============================================================================
// In-process backend
// ============================================================================

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Map-backed cache, shared across clones. Expired entries are dropped
/// when read and swept from the whole map every [`SWEEP_EVERY`] writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, MemoryEntry>>>,
    writes: Arc<AtomicUsize>,
}

/// Writes between full expiry sweeps of the in-process map.
const SWEEP_EVERY: usize = 256;

impl MemoryCache {
    /// Counts one write and sweeps expired entries when the interval is reached.
    /// Callers hold the write lock.
    fn after_write(&self, entries: &mut HashMap<String, MemoryEntry>, now: Instant) {
        if self.writes.fetch_add(1, Ordering::Relaxed) + 1 >= SWEEP_EVERY {
            self.writes.store(0, Ordering::Relaxed);
            entries.retain(|_, entry| entry.is_live(now));
        }
    }

    #[cfg(test)]
    pub(crate) async fn stored_len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) {
        let now = Instant::now();
        let entry = MemoryEntry {
            value,
            expires_at: ttl.map(|ttl| now + ttl),
        };
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);
        self.after_write(&mut entries, now);
    }

    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
                None => return None,
                Some(_) => {}
            }
        }
        purge_expired(&mut *self.entries.write().await, key, Instant::now());
        None
    }

    async fn delete(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .write()
            .await
            .remove(key)
            .is_some_and(|entry| entry.is_live(now))
    }

    async fn increment(&self, key: &str) -> CacheResult<i64> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let (current, expires_at) = match entries.get(key) {
            Some(entry) if entry.is_live(now) => {
                let current: i64 = entry.value.parse().map_err(|_| {
                    CacheError::Command("value is not an integer or out of range".to_string())
                })?;
                (current, entry.expires_at)
            }
            _ => (0, None),
        };
        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::Command("increment would overflow".to_string()))?;
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: next.to_string(),
                expires_at,
            },
        );
        self.after_write(&mut entries, now);
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let updated = match entries.get_mut(key) {
            Some(entry) if entry.is_live(now) => {
                entry.expires_at = Some(now + ttl);
                true
            }
            _ => false,
        };
        self.after_write(&mut entries, now);
        updated
    }

    async fn keys_matching(&self, pattern: &str) -> Vec<String> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(key, entry)| entry.is_live(now) && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}

/// Removes `key` only if it is still expired; a concurrent `set` may have
/// replaced it since the read lock was released.
fn purge_expired(entries: &mut HashMap<String, MemoryEntry>, key: &str, now: Instant) {
    if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
        entries.remove(key);
    }
}

/// Redis-style glob subset: `*` any run, `?` any single char.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u32,
        name: String,
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = CacheClient::memory();
        let item = Item {
            id: 7,
            name: "widget".into(),
        };
        cache.set("item:7", &item, None).await.unwrap();

        let loaded: Option<Item> = cache.get("item:7").await.unwrap();
        assert_eq!(loaded, Some(item));

        let missing: Option<Item> = cache.get("item:8").await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = CacheClient::memory();
        cache
            .set("short", &1, Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(cache.exists("short").await.unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!cache.exists("short").await.unwrap());
        assert_eq!(cache.get::<i32>("short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let cache = CacheClient::memory();
        cache.set("k", "v", None).await.unwrap();
        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_and_expire() {
        let cache = CacheClient::memory();
        assert_eq!(cache.increment("counter").await.unwrap(), 1);
        assert_eq!(cache.increment("counter").await.unwrap(), 2);
        assert!(cache.expire("counter", Duration::from_secs(60)).await.unwrap());
        assert_eq!(cache.increment("counter").await.unwrap(), 3);
        assert!(!cache.expire("absent", Duration::from_secs(60)).await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_non_integer_fails() {
        let cache = CacheClient::memory();
        cache.set("word", "hello", None).await.unwrap();
        assert!(matches!(
            cache.increment("word").await,
            Err(CacheError::Command(_))
        ));
    }

    #[tokio::test]
    async fn test_pattern_delete() {
        let cache = CacheClient::memory();
        cache.set("products:v0:list:a", &1, None).await.unwrap();
        cache.set("products:v0:list:b", &2, None).await.unwrap();
        cache.set("product:1", &3, None).await.unwrap();

        let keys = cache.keys_matching("products:*").await.unwrap();
        assert_eq!(keys, vec!["products:v0:list:a", "products:v0:list:b"]);

        assert_eq!(cache.delete_matching("products:*").await.unwrap(), 2);
        assert!(cache.exists("product:1").await.unwrap());
    }

    #[tokio::test]
    async fn test_writes_sweep_expired_entries() {
        let memory = MemoryCache::default();
        for i in 0..1000 {
            memory
                .set(&format!("stale:{i}"), "1".into(), Some(Duration::from_millis(20)))
                .await;
        }
        tokio::time::sleep(Duration::from_millis(40)).await;

        for _ in 0..SWEEP_EVERY {
            memory.increment("fresh").await.unwrap();
        }
        assert_eq!(memory.stored_len().await, 1);
        assert_eq!(memory.get("fresh").await, Some(SWEEP_EVERY.to_string()));
    }

    #[tokio::test]
    async fn test_purge_keeps_replaced_entry() {
        let memory = MemoryCache::default();
        memory.set("k", "new".into(), Some(Duration::from_secs(60))).await;

        // Entry was rewritten between the expired read and the purge.
        purge_expired(&mut *memory.entries.write().await, "k", Instant::now());
        assert_eq!(memory.get("k").await, Some("new".to_string()));

        memory.set("gone", "old".into(), Some(Duration::from_millis(1))).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        purge_expired(&mut *memory.entries.write().await, "gone", Instant::now());
        assert_eq!(memory.stored_len().await, 1);
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("user:*", "user:42"));
        assert!(!glob_match("user:*", "product:42"));
        assert!(glob_match("a?c", "abc"));
        assert!(glob_match("a*c*e", "abcde"));
        assert!(!glob_match("a*c*e", "abcd"));
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_unavailable() {
        let mut settings = RedisSettings::new("redis://127.0.0.1:1");
        settings.timeout = Duration::from_millis(200);
        let cache = CacheClient::redis(&settings).unwrap();

        assert!(matches!(
            cache.get::<String>("k").await,
            Err(CacheError::Unavailable(_))
        ));
        assert!(cache.ping().await.is_err());

        // Non-fatal helpers degrade silently
        assert_eq!(cache.try_get::<String>("k").await, None);
        cache.try_set("k", "v", Some(Duration::from_secs(1))).await;
        cache.try_delete("k").await;
    }
}
