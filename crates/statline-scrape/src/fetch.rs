//! HTTP fetch layer for subject pages.

use std::time::Duration;

use tracing::{debug, info};

use crate::{Error, Result};

/// Fetches subject pages over HTTP.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct PageFetcher {
  client: reqwest::Client,
}

impl PageFetcher {
  pub fn new() -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/121.0 Safari/537.36",
      )
      .build()?;
    Ok(Self { client })
  }

  /// Fetch `url` and return page HTML ready for table extraction.
  pub async fn fetch(&self, url: &str) -> Result<String> {
    info!("fetching {url}");
    let response = self.client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(Error::Status { url: url.to_string(), status });
    }

    let html = response.text().await?;
    debug!("fetched {} bytes from {url}", html.len());
    Ok(unwrap_comments(&html))
  }
}

/// Strip HTML comment markers.
///
/// Sports-reference pages ship most stats tables inside `<!-- -->`
/// blocks and reveal them with client-side script; removing the markers
/// exposes the same DOM a rendered page would have.
pub(crate) fn unwrap_comments(html: &str) -> String {
  html.replace("<!--", "").replace("-->", "")
}
