//! Published signing keys (JWKS) of the identity provider.
//!
//! The provider rotates RSA keys under stable key ids; tokens name the key
//! that signed them via the `kid` header. `KeySetFetcher` is the seam between
//! the verifier and the network: production uses `HttpKeySetFetcher` against
//! `https://{domain}/.well-known/jwks.json`, tests use `StaticKeySet`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::services::auth::error::KeySetError;

/// One published public key. Only RSA signature keys are expected; `n`/`e`
/// are base64url as published.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    #[serde(rename = "use")]
    pub key_use: Option<String>,
    pub n: String,
    pub e: String,
    #[serde(default)]
    pub alg: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeySet {
    pub keys: Vec<Jwk>,
}

impl KeySet {
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid == kid)
    }
}

#[async_trait]
pub trait KeySetFetcher: Send + Sync {
    async fn fetch(&self) -> Result<KeySet, KeySetError>;
}

/// Fetches the JWKS over HTTPS with a bounded request timeout.
pub struct HttpKeySetFetcher {
    client: reqwest::Client,
    jwks_url: String,
}

impl HttpKeySetFetcher {
    pub fn new(domain: &str, timeout: Duration) -> Result<Self, KeySetError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            jwks_url: format!("https://{domain}/.well-known/jwks.json"),
        })
    }
}

#[async_trait]
impl KeySetFetcher for HttpKeySetFetcher {
    async fn fetch(&self) -> Result<KeySet, KeySetError> {
        let response = self.client.get(&self.jwks_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeySetError::Status(status));
        }

        let keys = response.json::<KeySet>().await?;
        Ok(keys)
    }
}

struct CachedKeySet {
    keys: KeySet,
    fetched_at: Instant,
}

/// Time-bounded cache in front of any `KeySetFetcher`.
///
/// Staleness is capped at `ttl`; an expired entry falls through to the inner
/// fetcher and a `ttl` of zero disables caching entirely. A failed refresh is
/// surfaced to the caller rather than served from an expired entry.
pub struct CachingKeySetFetcher {
    inner: Arc<dyn KeySetFetcher>,
    ttl: Duration,
    cache: RwLock<Option<CachedKeySet>>,
}

impl CachingKeySetFetcher {
    pub fn new(inner: Arc<dyn KeySetFetcher>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: RwLock::new(None),
        }
    }
}

#[async_trait]
impl KeySetFetcher for CachingKeySetFetcher {
    async fn fetch(&self) -> Result<KeySet, KeySetError> {
        if !self.ttl.is_zero() {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref()
                && cached.fetched_at.elapsed() < self.ttl
            {
                return Ok(cached.keys.clone());
            }
        }

        let keys = self.inner.fetch().await?;

        if !self.ttl.is_zero() {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedKeySet {
                keys: keys.clone(),
                fetched_at: Instant::now(),
            });
        }

        Ok(keys)
    }
}

/// Fixed in-memory key set. Used by tests and available for local
/// development against a known key pair.
pub struct StaticKeySet(pub KeySet);

#[async_trait]
impl KeySetFetcher for StaticKeySet {
    async fn fetch(&self) -> Result<KeySet, KeySetError> {
        Ok(self.0.clone())
    }
}
