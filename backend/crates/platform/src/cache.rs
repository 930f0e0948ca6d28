//! Response Cache
//!
//! TTL-keyed in-memory store for expensive, deterministic responses.
//! Values are held as `serde_json::Value` so the store can later be swapped
//! for an external key/value service without changing callers.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clock::SharedClock;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub min_ttl_secs: u64,
    pub max_ttl_secs: u64,
    /// Fraction of writes that also sweep expired entries
    pub prune_sample_rate: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            min_ttl_secs: 60,
            max_ttl_secs: 24 * 60 * 60,
            prune_sample_rate: 0.01,
        }
    }
}

impl CacheConfig {
    /// Clamp a requested TTL into `[min_ttl_secs, max_ttl_secs]`.
    pub fn clamp_ttl(&self, ttl_secs: u64) -> u64 {
        ttl_secs.clamp(self.min_ttl_secs, self.max_ttl_secs.max(self.min_ttl_secs))
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at_ms: i64,
}

pub struct ResponseCache {
    config: CacheConfig,
    clock: SharedClock,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(config: CacheConfig, clock: SharedClock) -> Self {
        Self {
            config,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Raw cached value, `None` if absent or expired.
    ///
    /// An expired entry is removed on read.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let now_ms = self.clock.now_ms();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if now_ms < entry.expires_at_ms => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Typed read. A value of the wrong shape counts as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Cached value has unexpected shape");
                None
            }
        }
    }

    /// Store a value, replacing any previous entry.
    pub fn set_value(&self, key: impl Into<String>, value: Value, ttl_secs: u64) {
        let now_ms = self.clock.now_ms();
        let ttl_ms = self.config.clamp_ttl(ttl_secs) as i64 * 1000;
        let entry = CacheEntry {
            value,
            expires_at_ms: now_ms + ttl_ms,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);

        if self.config.prune_sample_rate > 0.0 && rand::random::<f64>() < self.config.prune_sample_rate
        {
            self.prune();
        }
    }

    /// Serialize and store a value.
    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: impl Into<String>,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.set_value(key, value, ttl_secs);
        Ok(())
    }

    pub fn delete(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    /// Drop every expired entry. Returns the number removed.
    pub fn prune(&self) -> usize {
        let now_ms = self.clock.now_ms();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| now_ms < entry.expires_at_ms);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "Pruned expired cache entries");
        }
        removed
    }

    /// Entries currently held, expired ones included until pruned.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a deterministic cache key from a parameter object
///
/// Null parameters are dropped and object keys are emitted in byte order at
/// every depth, so field order never changes the key. Returns `None` when
/// `params` does not serialize to a JSON object.
///
/// ```rust
/// use platform::cache::build_cache_key;
/// use serde_json::json;
///
/// let a = build_cache_key("security-check", &json!({"target": "example.com", "mode": null}));
/// assert_eq!(a.as_deref(), Some(r#"security-check:{"target":"example.com"}"#));
///
/// let b = build_cache_key("k", &json!({"b": 2, "a": 1}));
/// let c = build_cache_key("k", &json!({"a": 1, "b": 2}));
/// assert_eq!(b, c);
/// assert_eq!(build_cache_key("k", &json!([1, 2])), None);
/// ```
pub fn build_cache_key<P: Serialize + ?Sized>(prefix: &str, params: &P) -> Option<String> {
    let value = serde_json::to_value(params).ok()?;
    let Value::Object(map) = value else {
        return None;
    };

    let params: BTreeMap<&str, &Value> = map
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.as_str(), v))
        .collect();

    let mut key = format!("{prefix}:");
    write_object(&mut key, params.into_iter()).ok()?;
    Some(key)
}

fn write_object<'a>(
    out: &mut String,
    fields: impl Iterator<Item = (&'a str, &'a Value)>,
) -> Result<(), serde_json::Error> {
    out.push('{');
    for (i, (name, value)) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&serde_json::to_string(name)?);
        out.push(':');
        write_canonical(out, value)?;
    }
    out.push('}');
    Ok(())
}

fn write_canonical(out: &mut String, value: &Value) -> Result<(), serde_json::Error> {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&str, &Value> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
            write_object(out, sorted.into_iter())
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item)?;
            }
            out.push(']');
            Ok(())
        }
        scalar => {
            out.push_str(&serde_json::to_string(scalar)?);
            Ok(())
        }
    }
}
