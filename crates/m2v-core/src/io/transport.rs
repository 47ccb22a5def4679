//! HTTP transport used by the resolvers and the mirror.
//!
//! Every request carries the configured user agent. Text fetches never fail
//! hard: a non-success status becomes [`Fetch::Absent`] so a partially
//! available mirror can still be explored.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::Client;

use crate::error::{Fetch, TransportError};

/// Body chunks of a streamed download.
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Fetch operations the engine needs from the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a page or descriptor as text.
    async fn fetch_text(&self, url: &str) -> Fetch<String>;

    /// Size of a remote file from a header-only request, if advertised.
    async fn content_length(&self, url: &str) -> Option<u64>;

    /// GET a file as a stream of body chunks.
    async fn fetch_stream(&self, url: &str) -> Result<ByteStream, TransportError>;
}

/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self::with_client(Client::new(), user_agent)
    }

    pub fn with_client(client: Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_text(&self, url: &str) -> Fetch<String> {
        tracing::debug!("GET {url}");
        let response = match self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return Fetch::Failed(e.into()),
        };

        let status = response.status();
        tracing::debug!("GET {url} -> {status}");
        if !status.is_success() {
            return Fetch::Absent {
                status: status.as_u16(),
            };
        }

        match response.text().await {
            Ok(text) => Fetch::Fetched(text),
            Err(e) => Fetch::Failed(e.into()),
        }
    }

    async fn content_length(&self, url: &str) -> Option<u64> {
        let response = self
            .client
            .head(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        // Read the header directly; a HEAD body is always empty.
        response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)?
            .to_str()
            .ok()?
            .parse()
            .ok()
    }

    async fn fetch_stream(&self, url: &str) -> Result<ByteStream, TransportError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(TransportError::from))
            .boxed())
    }
}

/// In-memory transport that serves fixed pages and counts requests.
#[cfg(test)]
pub(crate) mod memory {
    use super::{ByteStream, Transport};
    use crate::error::{Fetch, TransportError};
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::StreamExt;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub(crate) struct MemoryTransport {
        pages: HashMap<String, String>,
        hits: Mutex<HashMap<String, usize>>,
    }

    impl MemoryTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub(crate) fn hits(&self, url: &str) -> usize {
            self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
        }

        fn record(&self, url: &str) {
            *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;
        }
    }

    #[async_trait]
    impl Transport for MemoryTransport {
        async fn fetch_text(&self, url: &str) -> Fetch<String> {
            self.record(url);
            match self.pages.get(url) {
                Some(body) => Fetch::Fetched(body.clone()),
                None => Fetch::Absent { status: 404 },
            }
        }

        async fn content_length(&self, url: &str) -> Option<u64> {
            self.pages.get(url).map(|body| body.len() as u64)
        }

        async fn fetch_stream(&self, url: &str) -> Result<ByteStream, TransportError> {
            self.record(url);
            let body = self.pages.get(url).ok_or_else(|| TransportError::Status {
                url: url.to_string(),
                status: 404,
            })?;
            let chunk = Bytes::from(body.clone().into_bytes());
            Ok(futures::stream::iter([Ok(chunk)]).boxed())
        }
    }
}
