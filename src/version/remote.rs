//! Remote published-version resolution.
//!
//! The download endpoints are redirect services: a HEAD request lands on the
//! concrete release artifact, whose URL carries the version in a
//! `/releases/<version>/` path segment. The probe follows redirects with a
//! short timeout and pattern-matches the final URL.
//!
//! "Cannot determine the remote version" is informationally distinct from
//! "no update available", so the public entry point returns an `Option`
//! rather than an error: every transport failure (timeout, DNS, non-2xx)
//! degrades to `None` with a warning in the log. The fallible probe is kept
//! separate so the degradation is a visible decision, not swallowed control
//! flow.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::constants::PROBE_TIMEOUT;
use crate::core::FxpmError;

/// Version token after a `/releases/` path segment, e.g.
/// `/pub/firefox/releases/131.0.1/...` or `/releases/133.0a1/`.
static RELEASE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/releases/([0-9]+\.[0-9]+[a-z0-9.]*)").expect("static regex"));

/// Extract the version token from a resolved release URL, if present.
pub fn extract_release_version(url: &str) -> Option<String> {
    RELEASE_VERSION_RE.captures(url).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

/// HTTP client wrapper for the remote version probe.
///
/// Reused across a sweep so that connection setup is paid once per host.
pub struct RemoteProbe {
    client: reqwest::Client,
}

impl Default for RemoteProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteProbe {
    /// Create a probe with redirect following enabled (the default policy).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// The fallible probe: HEAD with a 5 second timeout, following
    /// redirects, then version extraction from the final URL.
    ///
    /// # Errors
    ///
    /// Returns [`FxpmError::NetworkUnavailable`] on any transport failure or
    /// non-2xx status. A reachable endpoint whose final URL carries no
    /// version token is `Ok(None)`.
    pub async fn probe(&self, url: &str) -> Result<Option<String>, FxpmError> {
        let response = self.client.head(url).timeout(PROBE_TIMEOUT).send().await.map_err(|e| {
            FxpmError::NetworkUnavailable {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(FxpmError::NetworkUnavailable {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let final_url = response.url().as_str();
        debug!("probe for {url} resolved to {final_url}");
        Ok(extract_release_version(final_url))
    }

    /// Resolve the published version, degrading every failure to `None`.
    ///
    /// Connectivity absence is logged at warning level and is never
    /// surfaced to callers as an error — the status layer treats a `None`
    /// remote as "no evidence of a newer version".
    pub async fn resolve(&self, url: &str) -> Option<String> {
        match self.probe(url).await {
            Ok(version) => version,
            Err(err) => {
                warn!("remote version probe failed, assuming current: {err}");
                None
            }
        }
    }
}

/// One-shot convenience wrapper around [`RemoteProbe::resolve`].
pub async fn resolve_remote_version(url: &str) -> Option<String> {
    RemoteProbe::new().resolve(url).await
}
