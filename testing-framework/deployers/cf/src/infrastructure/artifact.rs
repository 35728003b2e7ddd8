use std::{
    io,
    path::{Path, PathBuf},
};

use reqwest::Client;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt as _};
use tracing::{debug, info, warn};

/// Failures while fetching an application package.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to download {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download of {url} answered {status}")]
    Status { url: String, status: u16 },
    #[error("failed to write artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Download `url` into `dest`, reusing a non-empty file already at `dest`.
pub async fn download_package(client: &Client, url: &str, dest: &Path) -> Result<(), ArtifactError> {
    if let Ok(meta) = fs::metadata(dest).await
        && meta.len() > 0
    {
        info!(path = %dest.display(), bytes = meta.len(), "reusing downloaded package");
        return Ok(());
    }

    info!(url, path = %dest.display(), "downloading package");
    match fetch_to_file(client, url, dest).await {
        Ok(bytes) => {
            info!(url, bytes, "package downloaded");
            Ok(())
        }
        Err(err) => {
            if let Err(remove_err) = fs::remove_file(dest).await
                && remove_err.kind() != io::ErrorKind::NotFound
            {
                warn!(path = %dest.display(), error = ?remove_err, "failed to remove partial package");
            }
            Err(err)
        }
    }
}

async fn fetch_to_file(client: &Client, url: &str, dest: &Path) -> Result<u64, ArtifactError> {
    let request_error = |source| ArtifactError::Request {
        url: url.to_owned(),
        source,
    };
    let io_error = |source| ArtifactError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let mut response = client.get(url).send().await.map_err(request_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ArtifactError::Status {
            url: url.to_owned(),
            status: status.as_u16(),
        });
    }

    let mut file = fs::File::create(dest).await.map_err(io_error)?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(request_error)? {
        file.write_all(&chunk).await.map_err(io_error)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_error)?;
    debug!(url, written, "package stream finished");

    Ok(written)
}
