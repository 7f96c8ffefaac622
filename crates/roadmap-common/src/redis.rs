/// Namespaced Redis wrapper with graceful degradation.
///
/// Every key passed in is prefixed with the namespace given at construction,
/// so the API response cache and the client progress store can share one
/// Redis instance. On any Redis error the operation logs a warning and reports
/// absence (`None` / `false`); callers carry on without Redis.
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::warn;

#[derive(Clone)]
pub struct RedisCache {
    client: Option<redis::Client>,
    namespace: String,
}

impl RedisCache {
    /// A `None` URL or an unparsable one yields a cache that no-ops.
    pub fn new(url: Option<&str>, namespace: &str) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "failed to create redis client, cache disabled"))
                .ok()
        });
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }

    pub fn disabled(namespace: &str) -> Self {
        Self::new(None, namespace)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// PING round trip.
    pub async fn is_available(&self) -> bool {
        let Some(mut conn) = self.conn().await else {
            return false;
        };
        let result: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn().await?;
        let key = self.key(key);
        let value: Option<String> = conn
            .get(&key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis GET failed"))
            .ok()?;
        value
    }

    pub async fn set(&self, key: &str, value: &str) -> bool {
        let Some(mut conn) = self.conn().await else {
            return false;
        };
        let key = self.key(key);
        conn.set::<_, _, ()>(&key, value)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis SET failed"))
            .is_ok()
    }

    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> bool {
        let Some(mut conn) = self.conn().await else {
            return false;
        };
        let key = self.key(key);
        conn.set_ex::<_, _, ()>(&key, value, ttl_secs)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis SETEX failed"))
            .is_ok()
    }

    /// Delete every key in the namespace using SCAN (not KEYS, which blocks).
    pub async fn clear_namespace(&self) -> bool {
        let Some(mut conn) = self.conn().await else {
            return false;
        };

        let pattern = format!("{}*", self.namespace);
        let mut cursor: u64 = 0;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = match redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, pattern, "redis SCAN failed");
                    return false;
                }
            };

            if !keys.is_empty() {
                if let Err(e) = conn.del::<_, ()>(&keys).await {
                    warn!(error = %e, "redis batch DEL failed during namespace clear");
                    return false;
                }
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        true
    }

    fn key(&self, key: &str) -> String {
        format!("{}{key}", self.namespace)
    }

    async fn conn(&self) -> Option<MultiplexedConnection> {
        let client = self.client.as_ref()?;
        client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()
    }
}
