use crate::allowed_methods::AllowedMethods;
use crate::constants::cors::EXPOSED_HEADERS;
use crate::context::RequestContext;
use crate::origin::AuthorizedOriginSet;
use crate::result::{CorsDecision, CorsError};
use std::sync::Arc;

/// Computes CORS response headers for the gateway's endpoints.
///
/// The origin check gates every other header: when it fails, neither entry
/// point emits anything.
#[derive(Debug, Clone)]
pub struct CorsComposer {
    origins: Arc<AuthorizedOriginSet>,
}

impl CorsComposer {
    pub fn new(origins: AuthorizedOriginSet) -> Self {
        Self {
            origins: Arc::new(origins),
        }
    }

    pub fn origins(&self) -> &AuthorizedOriginSet {
        &self.origins
    }

    /// Echoes an authorized `Origin` back and exposes `Location`.
    ///
    /// Returns a denied decision for an absent or unauthorized origin and
    /// [`CorsError::AmbiguousOrigin`] when more than one value is present.
    pub fn add_origin(&self, request: &RequestContext<'_>) -> Result<CorsDecision, CorsError> {
        let origin = match request.origin {
            [] => return Ok(CorsDecision::denied()),
            [origin] => *origin,
            values => {
                return Err(CorsError::AmbiguousOrigin {
                    values: values.iter().map(|value| value.to_string()).collect(),
                });
            }
        };

        if !self.origins.is_authorized(origin) {
            tracing::debug!(origin, "origin not authorized, CORS headers omitted");
            return Ok(CorsDecision::denied());
        }

        Ok(CorsDecision::echo(origin, EXPOSED_HEADERS))
    }

    /// Preflight negotiation: [`Self::add_origin`] plus allowed methods and
    /// the requested headers replayed verbatim.
    ///
    /// The origin gate runs first: an ambiguous origin fails before `methods`
    /// is looked at, and an absent or unauthorized one returns the denied
    /// decision untouched. `methods` is validated before any header is set.
    pub fn enable_cors<S: AsRef<str>>(
        &self,
        request: &RequestContext<'_>,
        methods: &[S],
    ) -> Result<CorsDecision, CorsError> {
        let mut decision = self.add_origin(request)?;
        if !decision.allowed {
            return Ok(decision);
        }

        let methods = AllowedMethods::list(methods.iter().map(|m| m.as_ref()))?;
        decision.allowed_methods = methods.effective();

        let requested: Vec<String> = request
            .access_control_request_headers
            .iter()
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
            .collect();
        if !requested.is_empty() {
            decision.allowed_headers = Some(requested);
        }

        Ok(decision)
    }
}

#[cfg(test)]
#[path = "composer_test.rs"]
mod composer_test;
