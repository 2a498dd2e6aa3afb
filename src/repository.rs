//! Interfaces to the document repository the gateway imports into.
//!
//! Storage, access-control persistence and session resolution belong to the
//! host platform. The gateway only consumes the traits below.

use axum::http::HeaderMap;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Authenticated identity a session acts for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal(String);

impl Principal {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef(String);

impl DocumentRef {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binary content attached to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Bytes,
    pub mime_type: String,
}

impl Blob {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Unsaved document handed to [`RepositorySession::create_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentModel {
    pub doc_type: String,
    pub title: String,
    pub content: Option<Blob>,
}

impl DocumentModel {
    pub fn new(doc_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            title: title.into(),
            content: None,
        }
    }

    pub fn with_content(mut self, content: Blob) -> Self {
        self.content = Some(content);
        self
    }
}

/// Persisted document as returned by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub reference: DocumentRef,
    pub repository: String,
    pub doc_type: String,
    pub title: String,
    pub content: Option<Blob>,
}

pub mod permission {
    pub const READ: &str = "Read";
    pub const READ_WRITE: &str = "ReadWrite";
    pub const EVERYTHING: &str = "Everything";
}

/// Single access-control entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ace {
    pub principal: String,
    pub permission: String,
    pub granted: bool,
}

impl Ace {
    pub fn grant(principal: &Principal, permission: &str) -> Self {
        Self {
            principal: principal.name().to_string(),
            permission: permission.to_string(),
            granted: true,
        }
    }
}

/// Named, ordered list of ACEs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acl {
    pub name: String,
    pub aces: Vec<Ace>,
}

/// Access-control policy: the ordered ACLs attached to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acp {
    acls: Vec<Acl>,
}

impl Acp {
    pub const LOCAL_ACL: &'static str = "local";

    pub fn acls(&self) -> &[Acl] {
        &self.acls
    }

    /// Returns the local ACL, creating it first when absent.
    pub fn local_acl_mut(&mut self) -> &mut Acl {
        let index = match self.acls.iter().position(|acl| acl.name == Self::LOCAL_ACL) {
            Some(index) => index,
            None => {
                self.acls.push(Acl {
                    name: Self::LOCAL_ACL.to_string(),
                    aces: Vec::new(),
                });
                self.acls.len() - 1
            }
        };
        &mut self.acls[index]
    }

    /// Appends a granting ACE to the local ACL, leaving other entries intact.
    pub fn grant(&mut self, principal: &Principal, permission: &str) {
        self.local_acl_mut().aces.push(Ace::grant(principal, permission));
    }

    /// Merges `other` into `self`, appending ACEs ACL by ACL.
    pub fn merge(&mut self, other: Acp) {
        for acl in other.acls {
            match self.acls.iter_mut().find(|existing| existing.name == acl.name) {
                Some(existing) => existing.aces.extend(acl.aces),
                None => self.acls.push(acl),
            }
        }
    }

    /// `true` when the first ACE naming `principal` with one of `permissions`
    /// grants it.
    pub fn allows(&self, principal: &Principal, permissions: &[&str]) -> bool {
        self.acls
            .iter()
            .flat_map(|acl| acl.aces.iter())
            .find(|ace| {
                ace.principal == principal.name() && permissions.contains(&ace.permission.as_str())
            })
            .is_some_and(|ace| ace.granted)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("document not found: {0}")]
    NotFound(DocumentRef),
    #[error("principal '{principal}' is not allowed to {action}")]
    AccessDenied { principal: String, action: String },
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Repository session acting for one principal.
///
/// Calls are synchronous and may block on storage.
pub trait RepositorySession: Send + Sync {
    fn repository_name(&self) -> &str;

    fn principal(&self) -> &Principal;

    fn create_document(&self, model: DocumentModel) -> Result<Document, RepositoryError>;

    fn get_document(&self, reference: &DocumentRef) -> Result<Document, RepositoryError>;

    fn get_acp(&self, reference: &DocumentRef) -> Result<Acp, RepositoryError>;

    /// Replaces the document's ACP when `overwrite` is set, otherwise merges
    /// `acp` into the existing one.
    fn set_acp(
        &self,
        reference: &DocumentRef,
        acp: Acp,
        overwrite: bool,
    ) -> Result<(), RepositoryError>;

    /// Documents of `doc_type` whose title equals `title`.
    fn query(&self, doc_type: &str, title: &str) -> Result<Vec<Document>, RepositoryError>;
}

/// Capability to act beyond the caller's permissions.
///
/// Only a [`SessionProvider`] hands these out.
#[derive(Clone)]
pub struct UnrestrictedSession(Arc<dyn RepositorySession>);

impl UnrestrictedSession {
    pub fn new(session: Arc<dyn RepositorySession>) -> Self {
        Self(session)
    }

    pub fn session(&self) -> &dyn RepositorySession {
        self.0.as_ref()
    }
}

impl fmt::Debug for UnrestrictedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnrestrictedSession")
            .field("repository", &self.0.repository_name())
            .field("principal", self.0.principal())
            .finish()
    }
}

/// Resolves repository sessions for inbound requests.
pub trait SessionProvider: Send + Sync {
    /// Session of the caller identified by the request headers.
    fn open_session(
        &self,
        headers: &HeaderMap,
    ) -> Result<Arc<dyn RepositorySession>, RepositoryError>;

    /// Elevated session on `repository`, independent of any caller.
    fn open_unrestricted(&self, repository: &str) -> Result<UnrestrictedSession, RepositoryError>;
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod repository_test;
