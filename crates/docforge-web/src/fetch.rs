//! Download a remote document into a temporary directory so the engine
//! can open it by path.

use std::path::PathBuf;
use std::time::Duration;

use docforge_core::EngineError;
use tempfile::TempDir;
use tracing::debug;

/// A downloaded document. The backing directory is removed when this is
/// dropped, so the path is only valid while the value is alive.
pub struct FetchedDocument {
    pub path: PathBuf,
    _temp_dir: TempDir,
}

pub async fn fetch_to_temp(url: &str, timeout: Duration) -> Result<FetchedDocument, EngineError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| fetch_err(url, e.to_string()))?;

    debug!(url, "downloading document");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_err(url, e.to_string()))?;

    if !response.status().is_success() {
        return Err(fetch_err(url, format!("HTTP {}", response.status())));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| fetch_err(url, e.to_string()))?;

    let temp_dir = tempfile::Builder::new().prefix("docforge-url-").tempdir()?;
    let filename = filename_from_url(url);
    let path = temp_dir.path().join(filename);
    tokio::fs::write(&path, &bytes).await?;

    debug!(url, size = bytes.len(), path = %path.display(), "document downloaded");

    Ok(FetchedDocument {
        path,
        _temp_dir: temp_dir,
    })
}

fn fetch_err(url: &str, reason: String) -> EngineError {
    EngineError::Fetch {
        url: url.to_string(),
        reason,
    }
}

/// Last path segment of the URL when it looks like a filename (has an
/// extension), otherwise a generic name the engine will sniff as PDF.
fn filename_from_url(url: &str) -> String {
    url.split('?')
        .next()
        .and_then(|base| base.rsplit('/').next())
        .filter(|seg| !seg.is_empty() && seg.contains('.'))
        .map(String::from)
        .unwrap_or_else(|| "downloaded.pdf".to_string())
}
