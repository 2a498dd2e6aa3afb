//! HTTP surface of the connector.
//!
//! Every handler builds its own per-request values; [`GatewayState`] only
//! holds collaborators that are immutable after construction.

use crate::allowed_methods::AllowedMethods;
use crate::base_url::{self, BaseUrlResolver, FixedBaseUrl};
use crate::composer::CorsComposer;
use crate::config::GatewayConfig;
use crate::constants::document::DEFAULT_MIME_TYPE;
use crate::constants::header;
use crate::constants::route::{GATEWAY_PREFIX, IMPORT_SCREEN, UPLOAD};
use crate::context::RequestContext;
use crate::error::GatewayError;
use crate::headers::Headers;
use crate::import::{CompletedImport, ImportJob, ImportTask};
use crate::memory::InMemoryRepository;
use crate::origin::AuthorizedOriginSet;
use crate::repository::{
    Blob, DocumentRef, Principal, RepositoryError, RepositorySession, SessionProvider,
};
use crate::result::CorsDecision;
use crate::view::{DefaultViews, View, ViewRenderer};
use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header as http_header};
use axum::response::Response;
use axum::routing::{get, post};
use std::sync::Arc;

const XML_CONTENT_TYPE: &str = "application/xml";
const HTML_CONTENT_TYPE: &str = "text/html;charset=utf-8";

/// Collaborators shared by every request.
#[derive(Clone)]
pub struct GatewayState {
    pub cors: CorsComposer,
    pub allow_methods: Arc<AllowedMethods>,
    pub repository: Arc<str>,
    pub max_upload_bytes: usize,
    pub sessions: Arc<dyn SessionProvider>,
    pub views: Arc<dyn ViewRenderer>,
    pub base_url: Arc<dyn BaseUrlResolver>,
}

impl GatewayState {
    pub fn new(
        config: &GatewayConfig,
        sessions: Arc<dyn SessionProvider>,
        views: Arc<dyn ViewRenderer>,
        base_url: Arc<dyn BaseUrlResolver>,
    ) -> Self {
        let origins = AuthorizedOriginSet::new(config.allowed_origins.iter().cloned());
        Self {
            cors: CorsComposer::new(origins),
            allow_methods: Arc::new(config.allow_methods.clone()),
            repository: Arc::from(config.repository.as_str()),
            max_upload_bytes: config.max_upload_bytes,
            sessions,
            views,
            base_url,
        }
    }

    /// State backed by a fresh [`InMemoryRepository`], which is returned for
    /// inspection.
    pub fn in_memory(config: &GatewayConfig) -> (Self, InMemoryRepository) {
        let repository = InMemoryRepository::new(config.repository.clone()).with_principal_header(
            config.principal_header.clone(),
            config.anonymous_principal.clone().map(Principal::new),
        );
        let state = Self::new(
            config,
            Arc::new(repository.clone()),
            Arc::new(DefaultViews),
            Arc::new(FixedBaseUrl::new(config.base_url.clone())),
        );
        (state, repository)
    }
}

pub fn router(state: GatewayState) -> Router {
    let root = format!("/{GATEWAY_PREFIX}");
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route(&root, get(manifest).options(preflight))
        .route(&format!("{root}/"), get(manifest).options(preflight))
        .route(
            &format!("{root}/{UPLOAD}"),
            post(upload)
                .options(preflight)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            &format!("{root}/{IMPORT_SCREEN}/{{repository}}/{{idref}}"),
            get(import_screen),
        )
        .with_state(state)
}

/// `OPTIONS /` and `OPTIONS /upload`.
///
/// Always succeeds; a disallowed origin gets a bare 200.
pub async fn preflight(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let owned = OwnedRequestContext::from_headers(&headers);
    let decision = state
        .cors
        .enable_cors(&owned.as_request_context(), &state.allow_methods[..])?;
    tracing::debug!(allowed = decision.allowed, "preflight negotiated");

    respond(StatusCode::OK, Body::empty(), &decision)
}

/// `GET /`: connector manifest.
pub async fn manifest(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let owned = OwnedRequestContext::from_headers(&headers);
    let decision = state.cors.add_origin(&owned.as_request_context())?;

    let base = state.base_url.base_url(&headers);
    let connector_url = base_url::connector_url(&base).map_err(url_error)?;
    let upload_url = base_url::upload_url(&base).map_err(url_error)?;
    let body = state.views.render(View::Index {
        connector_url: &connector_url,
        upload_url: &upload_url,
    })?;

    let mut response = respond(StatusCode::OK, Body::from(body), &decision)?;
    set_content_type(&mut response, XML_CONTENT_TYPE);
    Ok(response)
}

/// `POST /upload`: imports the body and redirects to the import screen.
///
/// The CORS decision is taken before the import so that an ambiguous origin
/// never leaves a document behind.
pub async fn upload(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, GatewayError> {
    let owned = OwnedRequestContext::from_headers(&headers);
    let decision = state.cors.add_origin(&owned.as_request_context())?;

    let payload = body
        .map_err(|rejection| GatewayError::Request(format!("unreadable payload: {rejection}")))?;
    let mime_type = headers
        .get(http_header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();

    let session = open_session(state.sessions.as_ref(), &headers)?;
    let repository = session.repository_name().to_string();
    let task = ImportTask::new(ImportJob::new(
        session.principal().clone(),
        Blob::new(payload, mime_type),
    ));

    let completed = run_import(Arc::clone(&state.sessions), repository.clone(), task).await?;

    let base = state.base_url.base_url(&headers);
    let location = base_url::import_screen_url(&base, &repository, completed.document_ref())
        .map_err(url_error)?;
    let location_value = HeaderValue::from_str(location.as_str())
        .map_err(|err| GatewayError::Request(format!("invalid location '{location}': {err}")))?;
    tracing::info!(%location, "upload imported");

    let mut response = respond(StatusCode::CREATED, Body::empty(), &decision)?;
    response
        .headers_mut()
        .insert(http_header::LOCATION, location_value);
    Ok(response)
}

/// `GET /importscreen/{repository}/{idref}`.
pub async fn import_screen(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((repository, idref)): Path<(String, String)>,
) -> Result<Response, GatewayError> {
    if repository != *state.repository {
        return Err(GatewayError::NotFound(format!("{repository}/{idref}")));
    }

    let session = open_session(state.sessions.as_ref(), &headers)?;
    let reference = DocumentRef::new(idref);
    let document = tokio::task::spawn_blocking({
        let reference = reference.clone();
        move || session.get_document(&reference)
    })
    .await
    .map_err(|err| GatewayError::Internal(format!("document lookup aborted: {err}")))?
    .map_err(|err| match err {
        RepositoryError::NotFound(_) | RepositoryError::AccessDenied { .. } => {
            GatewayError::NotFound(reference.to_string())
        }
        other => GatewayError::Storage(other),
    })?;

    let base = state.base_url.base_url(&headers);
    let body = state.views.render(View::ImportScreen {
        base_url: &base,
        repository: &repository,
        document: &document,
    })?;

    let mut response = Response::new(Body::from(body));
    set_content_type(&mut response, HTML_CONTENT_TYPE);
    Ok(response)
}

/// Runs the import on the blocking pool. No retry on failure.
async fn run_import(
    sessions: Arc<dyn SessionProvider>,
    repository: String,
    task: ImportTask,
) -> Result<CompletedImport, GatewayError> {
    tokio::task::spawn_blocking(move || -> Result<CompletedImport, GatewayError> {
        let system = sessions.open_unrestricted(&repository)?;
        task.run(&system)
            .map_err(|failed| GatewayError::Import(failed.into_error()))
    })
    .await
    .map_err(|err| GatewayError::Internal(format!("import aborted: {err}")))?
}

fn open_session(
    sessions: &dyn SessionProvider,
    headers: &HeaderMap,
) -> Result<Arc<dyn RepositorySession>, GatewayError> {
    sessions.open_session(headers).map_err(|err| match err {
        RepositoryError::AccessDenied { action, .. } => GatewayError::Unauthorized(action),
        other => GatewayError::Storage(other),
    })
}

fn url_error(err: url::ParseError) -> GatewayError {
    GatewayError::Request(format!("unable to build URL: {err}"))
}

fn respond(
    status: StatusCode,
    body: Body,
    decision: &CorsDecision,
) -> Result<Response, GatewayError> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    apply_headers(response.headers_mut(), &decision.headers())?;
    Ok(response)
}

fn set_content_type(response: &mut Response, content_type: &'static str) {
    response.headers_mut().insert(
        http_header::CONTENT_TYPE,
        HeaderValue::from_static(content_type),
    );
}

/// Copies the CORS patch onto the response. A value that is not a legal
/// header value fails the request instead of being dropped.
fn apply_headers(map: &mut HeaderMap, headers: &Headers) -> Result<(), GatewayError> {
    for (name, value) in headers.iter() {
        let header_name = HeaderName::try_from(name.as_str())
            .map_err(|err| GatewayError::Internal(format!("invalid header name {name}: {err}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|err| GatewayError::Request(format!("invalid value for {name}: {err}")))?;
        map.insert(header_name, header_value);
    }
    Ok(())
}

/// Header values borrowed from the request, in arrival order.
struct OwnedRequestContext<'h> {
    origin: Vec<&'h str>,
    access_control_request_headers: Vec<&'h str>,
}

impl<'h> OwnedRequestContext<'h> {
    fn from_headers(headers: &'h HeaderMap) -> Self {
        Self {
            origin: header_values(headers, header::ORIGIN),
            access_control_request_headers: header_values(
                headers,
                header::ACCESS_CONTROL_REQUEST_HEADERS,
            ),
        }
    }

    fn as_request_context(&self) -> RequestContext<'_> {
        RequestContext::new(&self.origin, &self.access_control_request_headers)
    }
}

/// Every value of `name`. Values that are not visible ASCII count as empty
/// so they still take part in the single-`Origin` check.
fn header_values<'h>(headers: &'h HeaderMap, name: &str) -> Vec<&'h str> {
    headers
        .get_all(name)
        .iter()
        .map(|value| value.to_str().unwrap_or(""))
        .collect()
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;
