use scenari_connector_rs::{
    AuthorizedOriginSet, CorsComposer, CorsDecision, CorsError, RequestContext,
};

pub fn composer<I, S>(origins: I) -> CorsComposer
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    CorsComposer::new(AuthorizedOriginSet::new(origins))
}

/// Owns the header values a [`RequestContext`] borrows.
#[derive(Debug, Default, Clone)]
pub struct RequestBuilder {
    origin: Vec<String>,
    request_headers: Vec<String>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one `Origin` value; call twice for a repeated header.
    pub fn origin(mut self, value: impl Into<String>) -> Self {
        self.origin.push(value.into());
        self
    }

    pub fn request_headers(mut self, value: impl Into<String>) -> Self {
        self.request_headers.push(value.into());
        self
    }

    pub fn add_origin(&self, composer: &CorsComposer) -> Result<CorsDecision, CorsError> {
        self.with_context(|request| composer.add_origin(request))
    }

    pub fn enable_cors<S: AsRef<str>>(
        &self,
        composer: &CorsComposer,
        methods: &[S],
    ) -> Result<CorsDecision, CorsError> {
        self.with_context(|request| composer.enable_cors(request, methods))
    }

    fn with_context<T>(&self, f: impl FnOnce(&RequestContext<'_>) -> T) -> T {
        let origin: Vec<&str> = self.origin.iter().map(String::as_str).collect();
        let request_headers: Vec<&str> = self.request_headers.iter().map(String::as_str).collect();
        f(&RequestContext::new(&origin, &request_headers))
    }
}

pub fn request() -> RequestBuilder {
    RequestBuilder::new()
}

/// Methods argument for preflight calls that rely on the defaults.
pub const NO_METHODS: &[&str] = &[];
