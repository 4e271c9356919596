//! HTTP metadata lookup.

use std::time::Duration;

use crate::metadata::html::extract_metadata;
use crate::metadata::{Metadata, MetadataError, MetadataProvider, MetadataResult};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default `User-Agent` header sent with page requests.
pub const DEFAULT_USER_AGENT: &str = concat!("clippings/", env!("CARGO_PKG_VERSION"));

/// Downloads the source page and reads its metadata.
#[derive(Clone)]
pub struct HttpMetadataProvider {
    agent: ureq::Agent,
}

impl HttpMetadataProvider {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build();
        Self { agent }
    }

    fn download(&self, url: &str) -> MetadataResult<String> {
        let fetch_error = |message: String| MetadataError::Fetch {
            url: url.to_string(),
            message,
        };
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(fetch_error(format!("HTTP {code}"))),
            Err(ureq::Error::Transport(transport)) => {
                return Err(fetch_error(transport.to_string()));
            }
        };
        response.into_string().map_err(|e| fetch_error(e.to_string()))
    }
}

impl Default for HttpMetadataProvider {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT)
    }
}

impl std::fmt::Debug for HttpMetadataProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMetadataProvider").finish_non_exhaustive()
    }
}

impl MetadataProvider for HttpMetadataProvider {
    fn fetch(&self, provided_title: Option<&str>, provided_url: &str) -> MetadataResult<Metadata> {
        if !provided_url.starts_with("http://") && !provided_url.starts_with("https://") {
            return Err(MetadataError::Fetch {
                url: provided_url.to_string(),
                message: "URL must start with http:// or https://".into(),
            });
        }

        tracing::debug!(url = provided_url, "fetching page metadata");
        let html = self.download(provided_url)?;
        let metadata = extract_metadata(&html).resolve(provided_title, provided_url)?;
        tracing::info!(
            url = %metadata.url,
            title = %metadata.title,
            has_author = metadata.author.is_some(),
            "page metadata fetched"
        );
        Ok(metadata)
    }
}
