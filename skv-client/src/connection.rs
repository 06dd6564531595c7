//! One backend connection: address plus optional shared secret.

use reqwest::header;
use reqwest::Method;

/// Address of one cache shard and the secret it expects, if any.
#[derive(Debug, Clone)]
pub struct Connection {
    base_url: String,
    secret: Option<String>,
}

impl Connection {
    pub fn new(base_url: impl Into<String>) -> Self {
        Connection {
            base_url: base_url.into(),
            secret: None,
        }
    }

    pub fn with_secret(base_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Connection {
            base_url: base_url.into(),
            secret: Some(secret.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Starts a request against this backend, attaching the secret as the
    /// Authorization header when one is configured.
    pub(crate) fn request(
        &self,
        http: &reqwest::Client,
        method: Method,
        path: &str,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let mut builder = http.request(method, url);
        if let Some(secret) = &self.secret {
            builder = builder.header(header::AUTHORIZATION, secret);
        }
        builder
    }
}
