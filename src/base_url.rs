use crate::constants::route::{GATEWAY_PREFIX, IMPORT_SCREEN, UPLOAD};
use crate::repository::DocumentRef;
use axum::http::HeaderMap;
use url::Url;

/// Supplies the externally visible root URL links are built from.
pub trait BaseUrlResolver: Send + Sync {
    fn base_url(&self, headers: &HeaderMap) -> Url;
}

/// Resolver returning one configured URL for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBaseUrl(Url);

impl FixedBaseUrl {
    /// Wraps `url`, appending a trailing `/` so that relative joins keep the
    /// last path segment.
    pub fn new(mut url: Url) -> Self {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Self(url)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl BaseUrlResolver for FixedBaseUrl {
    fn base_url(&self, _headers: &HeaderMap) -> Url {
        self.0.clone()
    }
}

pub fn connector_url(base: &Url) -> Result<Url, url::ParseError> {
    base.join(GATEWAY_PREFIX)
}

pub fn upload_url(base: &Url) -> Result<Url, url::ParseError> {
    base.join(&format!("{GATEWAY_PREFIX}/{UPLOAD}"))
}

/// `<base>site/scenari/importscreen/{repository}/{idref}` with both segments
/// percent-encoded.
pub fn import_screen_url(
    base: &Url,
    repository: &str,
    reference: &DocumentRef,
) -> Result<Url, url::ParseError> {
    base.join(&format!(
        "{GATEWAY_PREFIX}/{IMPORT_SCREEN}/{}/{}",
        urlencoding::encode(repository),
        urlencoding::encode(reference.as_str()),
    ))
}

#[cfg(test)]
#[path = "base_url_test.rs"]
mod base_url_test;
