//! Published key set of the token issuer, fetched over HTTP and cached.

use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::error::AuthError;
use crate::config::AuthConfig;

/// Where signing keys come from
pub enum KeySource {
    /// Issuer's JWKS endpoint
    Remote { url: String, client: reqwest::Client },
    /// Fixed key set, never refreshed
    Static(JwkSet),
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

pub struct JwksClient {
    source: KeySource,
    cache_ttl: Duration,
    min_refresh: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl JwksClient {
    /// Client for the key set published at the configured issuer
    pub fn from_config(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            source: KeySource::Remote { url: config.jwks_url(), client },
            cache_ttl: Duration::from_secs(config.jwks_cache_ttl_secs),
            min_refresh: Duration::from_secs(config.jwks_min_refresh_secs),
            cache: RwLock::new(None),
        })
    }

    pub fn fixed(keys: JwkSet) -> Self {
        Self {
            source: KeySource::Static(keys),
            cache_ttl: Duration::MAX,
            min_refresh: Duration::MAX,
            cache: RwLock::new(None),
        }
    }

    /// Find the key with id `kid`, refreshing the cached set when it is stale
    /// or does not know the key yet.
    pub async fn key_for(&self, kid: &str) -> Result<Jwk, AuthError> {
        let (url, client) = match &self.source {
            KeySource::Static(keys) => return keys.find(kid).cloned().ok_or(AuthError::UnknownKey),
            KeySource::Remote { url, client } => (url, client),
        };

        let stale_key = {
            let cache = self.cache.read().await;
            let cached = match cache.as_ref() {
                Some(cached) => {
                    let age = cached.fetched_at.elapsed();
                    match cached.keys.find(kid) {
                        Some(key) if age < self.cache_ttl => return Ok(key.clone()),
                        Some(key) => Some(key.clone()),
                        // Unknown kid: only hit the issuer again once the set has aged a little
                        None if age < self.min_refresh => return Err(AuthError::UnknownKey),
                        None => None,
                    }
                }
                None => None,
            };
            cached
        };

        match self.refresh(kid, url, client).await {
            Ok(keys) => keys.find(kid).cloned().ok_or(AuthError::UnknownKey),
            Err(e) => match stale_key {
                Some(key) => {
                    warn!("Serving stale signing key {} after refresh failure: {}", kid, e);
                    Ok(key)
                }
                None => Err(e),
            },
        }
    }

    /// Fetch the key set while holding the cache's write lock. Callers that
    /// queued behind another refresh reuse its result instead of fetching again.
    async fn refresh(
        &self,
        kid: &str,
        url: &str,
        client: &reqwest::Client,
    ) -> Result<JwkSet, AuthError> {
        let mut cache = self.cache.write().await;

        if let Some(cached) = cache.as_ref() {
            let age = cached.fetched_at.elapsed();
            let known = cached.keys.find(kid).is_some();
            if (known && age < self.cache_ttl) || (!known && age < self.min_refresh) {
                return Ok(cached.keys.clone());
            }
        }

        debug!("Fetching signing keys from {}", url);

        let keys = fetch_key_set(client, url).await.map_err(|e| {
            error!("Failed to fetch signing keys from {}: {}", url, e);
            AuthError::KeysUnavailable
        })?;

        info!("Loaded {} signing key(s) from {}", keys.keys.len(), url);

        *cache = Some(CachedKeys {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }
}

async fn fetch_key_set(client: &reqwest::Client, url: &str) -> Result<JwkSet, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.json::<JwkSet>().await
}
