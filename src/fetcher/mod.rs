//! Live favicon retrieval
//!
//! Fetches a site's landing page, discovers its declared favicon, and
//! normalizes the result to a 32x32 PNG. All failures here are
//! [`FetchError`]s that the orchestration layer absorbs; only a clean
//! "this site has no favicon" outcome is reported as `Ok(None)`.

use async_trait::async_trait;
use image::imageops::FilterType;
use image::ImageFormat;
use reqwest::{Client, Response, StatusCode};
use std::io::Cursor;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

use crate::config::FetchConfig;
use crate::errors::FetchError;
use crate::ICON_SIZE;

pub mod html;

pub use html::FaviconCandidate;

/// Source of live icons, the seam for substituting fakes in tests
///
/// `Ok(None)` means the site answered but has no discoverable favicon;
/// an `Err` is any transport, HTTP, or decode failure along the way.
#[async_trait]
pub trait IconFetcher: Send + Sync {
    async fn fetch(&self, domain: &str) -> Result<Option<Vec<u8>>, FetchError>;
}

/// Favicon fetcher backed by a shared reqwest client
pub struct FaviconFetcher {
    client: Client,
}

impl FaviconFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// GET the landing page over HTTPS, retrying once over plain HTTP on
    /// any transport failure. Redirects are followed, so the response URL
    /// is the base for resolving relative icon references.
    async fn fetch_landing_page(&self, domain: &str) -> Result<Response, FetchError> {
        let https_url = format!("https://{domain}");
        match self.client.get(&https_url).send().await {
            Ok(response) => Ok(response),
            Err(e) => {
                debug!("HTTPS fetch for {domain} failed ({e}), retrying over HTTP");
                let http_url = format!("http://{domain}");
                self.client
                    .get(&http_url)
                    .send()
                    .await
                    .map_err(|e| FetchError::transport(&http_url, e))
            }
        }
    }

    /// Download a discovered icon URL. Any non-success status is an error:
    /// the site declared this icon, so a missing file is a fetch failure
    /// rather than a "no favicon" outcome.
    async fn download_icon(&self, icon_url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(icon_url.clone())
            .send()
            .await
            .map_err(|e| FetchError::transport(icon_url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http(status.as_u16(), icon_url.as_str()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(icon_url.as_str(), e))?;
        Ok(bytes.to_vec())
    }

    /// Try the conventional `/favicon.ico` location. A non-200 answer is
    /// the normal "site has no favicon" outcome, not an error.
    async fn download_conventional(&self, url: &Url) -> Result<Option<Vec<u8>>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e))?;

        if response.status() != StatusCode::OK {
            info!("No favicon at {} (status {})", url, response.status());
            return Ok(None);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e))?;
        Ok(Some(bytes.to_vec()))
    }
}

#[async_trait]
impl IconFetcher for FaviconFetcher {
    async fn fetch(&self, domain: &str) -> Result<Option<Vec<u8>>, FetchError> {
        let start = Instant::now();

        debug!("Getting content from {domain}");
        let response = self.fetch_landing_page(domain).await?;
        let page_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(page_url.as_str(), e))?;
        debug!("Content received from {} in {:?}", domain, start.elapsed());

        let candidates = html::find_icon_links(&body);

        let raw_icon = match candidates.into_iter().next() {
            Some(candidate) => {
                let icon_url = resolve_icon_url(&page_url, &candidate.href)?;
                debug!(
                    "Icon link for {domain}: {icon_url} (rel={}, {:?})",
                    candidate.rel,
                    start.elapsed()
                );
                self.download_icon(&icon_url).await?
            }
            None => {
                let fallback = page_url
                    .join("favicon.ico")
                    .map_err(|e| FetchError::invalid_url("favicon.ico", e))?;
                debug!(
                    "No icon links for {domain}, defaulting to {fallback} ({:?})",
                    start.elapsed()
                );
                match self.download_conventional(&fallback).await? {
                    Some(bytes) => bytes,
                    None => return Ok(None),
                }
            }
        };

        let png = normalize_icon(&raw_icon)?;
        debug!("Icon for {} ready in {:?}", domain, start.elapsed());
        Ok(Some(png))
    }
}

/// Resolve a discovered `href` against the landing page's final URL,
/// unless it is already absolute.
fn resolve_icon_url(page_url: &Url, href: &str) -> Result<Url, FetchError> {
    if href.contains("://") {
        Url::parse(href).map_err(|e| FetchError::invalid_url(href, e))
    } else {
        page_url
            .join(href)
            .map_err(|e| FetchError::invalid_url(href, e))
    }
}

/// Decode arbitrary icon bytes and re-encode as a 32x32 PNG.
///
/// Bicubic (Catmull-Rom) interpolation keeps downscaled icons smooth.
pub fn normalize_icon(bytes: &[u8]) -> Result<Vec<u8>, FetchError> {
    let img = image::load_from_memory(bytes)?;
    let resized = img.resize_exact(ICON_SIZE, ICON_SIZE, FilterType::CatmullRom);

    let mut out = Vec::new();
    resized.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

    fn png_of_size(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 20, 30]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn normalize_resizes_to_icon_size() {
        let source = png_of_size(128, 64);
        let png = normalize_icon(&source).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.dimensions(), (ICON_SIZE, ICON_SIZE));
        assert_eq!(
            image::guess_format(&png).unwrap(),
            image::ImageFormat::Png
        );
    }

    #[test]
    fn normalize_rejects_non_image_bytes() {
        let result = normalize_icon(b"<html>not an image</html>");
        assert!(matches!(result, Err(FetchError::Image(_))));
    }

    #[test]
    fn relative_href_resolves_against_page_url() {
        let page = Url::parse("https://example.com/landing/index.html").unwrap();
        let resolved = resolve_icon_url(&page, "favicon32.png").unwrap();
        assert_eq!(
            resolved.as_str(),
            "https://example.com/landing/favicon32.png"
        );

        let rooted = resolve_icon_url(&page, "/static/icon.png").unwrap();
        assert_eq!(rooted.as_str(), "https://example.com/static/icon.png");
    }

    #[test]
    fn absolute_href_is_used_verbatim() {
        let page = Url::parse("https://example.com/").unwrap();
        let resolved = resolve_icon_url(&page, "https://cdn.example.net/icon.png").unwrap();
        assert_eq!(resolved.as_str(), "https://cdn.example.net/icon.png");
    }

    #[test]
    fn conventional_fallback_joins_on_final_url() {
        let page = Url::parse("https://www.example.com/").unwrap();
        assert_eq!(
            page.join("favicon.ico").unwrap().as_str(),
            "https://www.example.com/favicon.ico"
        );
    }
}
