//! Process-local repository used by the demo binary and the test suite.

use crate::repository::{
    Acp, Document, DocumentModel, DocumentRef, Principal, RepositoryError, RepositorySession,
    SessionProvider, UnrestrictedSession, permission,
};
use axum::http::HeaderMap;
use dashmap::DashMap;
use indexmap::IndexSet;
use std::sync::Arc;

/// Principal that unrestricted sessions act as.
pub const SYSTEM_PRINCIPAL: &str = "system";

pub const DEFAULT_PRINCIPAL_HEADER: &str = "X-Remote-User";

const READ_PERMISSIONS: &[&str] = &[
    permission::READ,
    permission::READ_WRITE,
    permission::EVERYTHING,
];
const WRITE_SECURITY_PERMISSIONS: &[&str] = &[permission::EVERYTHING];

#[derive(Debug, Clone)]
struct StoredDocument {
    document: Document,
    acp: Acp,
}

#[derive(Debug)]
struct Store {
    name: String,
    documents: DashMap<DocumentRef, StoredDocument>,
    administrators: IndexSet<String>,
    principal_header: String,
    anonymous: Option<Principal>,
}

/// Concurrent in-memory repository with ACL enforcement.
///
/// Restricted sessions may create documents only as administrators and read
/// only what an ACE grants them. Unrestricted sessions bypass every check.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    store: Arc<Store>,
}

impl InMemoryRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            store: Arc::new(Store {
                name: name.into(),
                documents: DashMap::new(),
                administrators: IndexSet::new(),
                principal_header: DEFAULT_PRINCIPAL_HEADER.to_string(),
                anonymous: None,
            }),
        }
    }

    /// Header naming the caller and the principal used when it is absent.
    ///
    /// Must be called before the repository is shared.
    pub fn with_principal_header(
        mut self,
        header: impl Into<String>,
        anonymous: Option<Principal>,
    ) -> Self {
        if let Some(store) = Arc::get_mut(&mut self.store) {
            store.principal_header = header.into();
            store.anonymous = anonymous;
        }
        self
    }

    /// Must be called before the repository is shared.
    pub fn with_administrators<I, S>(mut self, administrators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(store) = Arc::get_mut(&mut self.store) {
            store
                .administrators
                .extend(administrators.into_iter().map(Into::into));
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.store.name
    }

    pub fn len(&self) -> usize {
        self.store.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.documents.is_empty()
    }

    /// Restricted session acting for `principal`.
    pub fn session_for(&self, principal: Principal) -> Arc<dyn RepositorySession> {
        Arc::new(MemorySession {
            store: Arc::clone(&self.store),
            principal,
            unrestricted: false,
        })
    }

    pub fn unrestricted(&self) -> UnrestrictedSession {
        UnrestrictedSession::new(Arc::new(MemorySession {
            store: Arc::clone(&self.store),
            principal: Principal::new(SYSTEM_PRINCIPAL),
            unrestricted: true,
        }))
    }
}

impl SessionProvider for InMemoryRepository {
    fn open_session(
        &self,
        headers: &HeaderMap,
    ) -> Result<Arc<dyn RepositorySession>, RepositoryError> {
        let named = headers
            .get(self.store.principal_header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Principal::new);

        match named.or_else(|| self.store.anonymous.clone()) {
            Some(principal) => Ok(self.session_for(principal)),
            None => Err(RepositoryError::AccessDenied {
                principal: String::new(),
                action: "open a session without credentials".into(),
            }),
        }
    }

    fn open_unrestricted(&self, repository: &str) -> Result<UnrestrictedSession, RepositoryError> {
        if repository != self.store.name {
            return Err(RepositoryError::Storage(format!(
                "unknown repository '{repository}'"
            )));
        }
        Ok(self.unrestricted())
    }
}

struct MemorySession {
    store: Arc<Store>,
    principal: Principal,
    unrestricted: bool,
}

impl MemorySession {
    fn is_privileged(&self) -> bool {
        self.unrestricted || self.store.administrators.contains(self.principal.name())
    }

    fn can(&self, stored: &StoredDocument, permissions: &[&str]) -> bool {
        self.is_privileged() || stored.acp.allows(&self.principal, permissions)
    }

    fn denied(&self, action: impl Into<String>) -> RepositoryError {
        RepositoryError::AccessDenied {
            principal: self.principal.name().to_string(),
            action: action.into(),
        }
    }

    fn readable(&self, reference: &DocumentRef) -> Result<StoredDocument, RepositoryError> {
        let stored = self
            .store
            .documents
            .get(reference)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RepositoryError::NotFound(reference.clone()))?;

        if !self.can(&stored, READ_PERMISSIONS) {
            return Err(self.denied(format!("read {reference}")));
        }
        Ok(stored)
    }
}

impl RepositorySession for MemorySession {
    fn repository_name(&self) -> &str {
        &self.store.name
    }

    fn principal(&self) -> &Principal {
        &self.principal
    }

    fn create_document(&self, model: DocumentModel) -> Result<Document, RepositoryError> {
        if !self.is_privileged() {
            return Err(self.denied("create documents in the repository root"));
        }

        let reference = DocumentRef::new(uuid::Uuid::new_v4().to_string());
        let document = Document {
            reference: reference.clone(),
            repository: self.store.name.clone(),
            doc_type: model.doc_type,
            title: model.title,
            content: model.content,
        };
        self.store.documents.insert(
            reference,
            StoredDocument {
                document: document.clone(),
                acp: Acp::default(),
            },
        );
        Ok(document)
    }

    fn get_document(&self, reference: &DocumentRef) -> Result<Document, RepositoryError> {
        self.readable(reference).map(|stored| stored.document)
    }

    fn get_acp(&self, reference: &DocumentRef) -> Result<Acp, RepositoryError> {
        self.readable(reference).map(|stored| stored.acp)
    }

    fn set_acp(
        &self,
        reference: &DocumentRef,
        acp: Acp,
        overwrite: bool,
    ) -> Result<(), RepositoryError> {
        let mut entry = self
            .store
            .documents
            .get_mut(reference)
            .ok_or_else(|| RepositoryError::NotFound(reference.clone()))?;

        if !self.can(&entry, WRITE_SECURITY_PERMISSIONS) {
            return Err(self.denied(format!("change permissions of {reference}")));
        }

        if overwrite {
            entry.acp = acp;
        } else {
            entry.acp.merge(acp);
        }
        Ok(())
    }

    fn query(&self, doc_type: &str, title: &str) -> Result<Vec<Document>, RepositoryError> {
        Ok(self
            .store
            .documents
            .iter()
            .filter(|entry| entry.document.doc_type == doc_type && entry.document.title == title)
            .filter(|entry| self.can(entry.value(), READ_PERMISSIONS))
            .map(|entry| entry.document.clone())
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
