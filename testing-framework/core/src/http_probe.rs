use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

/// Failures while checking an HTTP endpoint's status code.
#[derive(Debug, Error)]
pub enum HttpProbeError {
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} answered {actual}, expected {expected}")]
    UnexpectedStatus {
        url: String,
        expected: u16,
        actual: u16,
    },
}

impl HttpProbeError {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Request { url, .. } | Self::UnexpectedStatus { url, .. } => url,
        }
    }
}

/// Join scheme, host and path into the URL an app is probed at.
#[must_use]
pub fn app_url(scheme: &str, host: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{scheme}://{host}{path}")
    } else {
        format!("{scheme}://{host}/{path}")
    }
}

/// Issue one GET against `url` and require `expected` as the status code.
pub async fn expect_status(client: &Client, url: &str, expected: u16) -> Result<(), HttpProbeError> {
    debug!(%url, expected, "probing HTTP endpoint");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HttpProbeError::Request {
            url: url.to_owned(),
            source,
        })?;

    let actual = response.status().as_u16();
    if actual != expected {
        return Err(HttpProbeError::UnexpectedStatus {
            url: url.to_owned(),
            expected,
            actual,
        });
    }

    info!(%url, status = actual, "HTTP endpoint answered as expected");
    Ok(())
}
