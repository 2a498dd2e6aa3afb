pub mod allowed_methods;
pub mod base_url;
pub mod composer;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod gateway;
mod headers;
pub mod import;
pub mod memory;
pub mod origin;
pub mod repository;
pub mod result;
pub mod view;

pub use allowed_methods::AllowedMethods;
pub use base_url::{BaseUrlResolver, FixedBaseUrl};
pub use composer::CorsComposer;
pub use config::{ConfigError, GatewayConfig};
pub use context::RequestContext;
pub use error::GatewayError;
pub use gateway::{GatewayState, router};
pub use headers::Headers;
pub use import::{
    CompletedImport, FailedImport, ImportError, ImportJob, ImportState, ImportStep, ImportTask,
};
pub use memory::InMemoryRepository;
pub use origin::{AuthorizedOriginSet, is_authorized};
pub use repository::{
    Blob, Document, DocumentRef, Principal, RepositoryError, RepositorySession, SessionProvider,
    UnrestrictedSession,
};
pub use result::{CorsDecision, CorsError};
pub use view::{DefaultViews, View, ViewError, ViewRenderer};
