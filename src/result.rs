use crate::constants::cors::VALUE_SEPARATOR;
use crate::constants::header;
use crate::headers::{HeaderCollection, Headers};
use thiserror::Error;

/// Per-request outcome of CORS negotiation.
///
/// Every field other than `allowed` is only populated when the origin check
/// passed, so a denied decision always renders to an empty header patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsDecision {
    pub allowed: bool,
    pub echoed_origin: Option<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Option<Vec<String>>,
    pub exposed_headers: Vec<String>,
}

impl CorsDecision {
    pub fn denied() -> Self {
        Self::default()
    }

    pub(crate) fn echo(origin: &str, exposed_headers: &[&str]) -> Self {
        Self {
            allowed: true,
            echoed_origin: Some(origin.to_string()),
            allowed_methods: Vec::new(),
            allowed_headers: None,
            exposed_headers: exposed_headers.iter().map(|h| h.to_string()).collect(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Renders the response headers this decision grants.
    pub fn headers(&self) -> Headers {
        if !self.allowed {
            return Headers::new();
        }

        let mut headers = HeaderCollection::new();
        if !self.exposed_headers.is_empty() {
            headers.push(
                header::ACCESS_CONTROL_EXPOSE_HEADERS,
                self.exposed_headers.join(VALUE_SEPARATOR),
            );
        }
        if let Some(origin) = &self.echoed_origin {
            headers.push(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        }
        if !self.allowed_methods.is_empty() {
            headers.push(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                self.allowed_methods.join(VALUE_SEPARATOR),
            );
        }
        if let Some(values) = &self.allowed_headers
            && !values.is_empty()
        {
            headers.push(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                values.join(VALUE_SEPARATOR),
            );
        }
        headers.into_headers()
    }
}

/// Errors that can be produced during CORS negotiation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorsError {
    /// The request carried more than one `Origin` header value.
    #[error("multiple 'Origin' header values {values:?} found in the request headers")]
    AmbiguousOrigin { values: Vec<String> },
    /// A configured allow-method entry was empty.
    #[error("allow methods MUST NOT be empty (entry {index})")]
    EmptyAllowedMethod { index: usize },
}

impl CorsError {
    /// `true` for errors caused by the client request rather than configuration.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, CorsError::AmbiguousOrigin { .. })
    }
}

#[cfg(test)]
#[path = "result_test.rs"]
mod result_test;
