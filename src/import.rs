//! Single-shot import of an uploaded blob under an elevated session.
//!
//! The caller's identity is captured when the task is built. The task then
//! runs on an [`UnrestrictedSession`] and finishes by granting that identity
//! read-write access to what it created.

use crate::constants::document::{FILE_TYPE, IMPORTED_TITLE};
use crate::repository::{
    Blob, DocumentModel, DocumentRef, Principal, RepositoryError, UnrestrictedSession, permission,
};
use thiserror::Error;

/// Upload being imported, owned by the request that received it.
#[derive(Debug, Clone)]
pub struct ImportJob {
    payload: Blob,
    requesting_principal: Principal,
    created_document_ref: Option<DocumentRef>,
}

impl ImportJob {
    pub fn new(requesting_principal: Principal, payload: Blob) -> Self {
        Self {
            payload,
            requesting_principal,
            created_document_ref: None,
        }
    }

    pub fn payload(&self) -> &Blob {
        &self.payload
    }

    pub fn requesting_principal(&self) -> &Principal {
        &self.requesting_principal
    }

    pub fn created_document_ref(&self) -> Option<&DocumentRef> {
        self.created_document_ref.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Pending,
    Completed,
    Failed,
}

/// Step at which an import stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStep {
    CreateDocument,
    ReadPermissions,
    GrantPermissions,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("import failed while {step:?}: {source}")]
pub struct ImportError {
    pub step: ImportStep,
    #[source]
    pub source: RepositoryError,
}

/// Pending import. [`ImportTask::run`] consumes it, so it executes at most once.
#[derive(Debug)]
pub struct ImportTask {
    job: ImportJob,
}

impl ImportTask {
    pub fn new(job: ImportJob) -> Self {
        Self { job }
    }

    pub fn state(&self) -> ImportState {
        ImportState::Pending
    }

    pub fn job(&self) -> &ImportJob {
        &self.job
    }

    /// Creates the document, attaches the payload and grants the requesting
    /// principal `ReadWrite`.
    ///
    /// On failure no reference is recorded and nothing already written is
    /// undone.
    pub fn run(self, session: &UnrestrictedSession) -> Result<CompletedImport, FailedImport> {
        let span = tracing::info_span!(
            "privileged_import",
            repository = session.session().repository_name(),
            principal = %self.job.requesting_principal,
        );
        let _entered = span.enter();

        let mut job = self.job;
        match Self::execute(&job, session) {
            Ok(reference) => {
                tracing::info!(
                    document = %reference,
                    bytes = job.payload.len(),
                    "import completed"
                );
                job.created_document_ref = Some(reference.clone());
                Ok(CompletedImport { job, reference })
            }
            Err(error) => {
                tracing::warn!(%error, "import failed");
                Err(FailedImport { job, error })
            }
        }
    }

    fn execute(job: &ImportJob, session: &UnrestrictedSession) -> Result<DocumentRef, ImportError> {
        let session = session.session();
        let model =
            DocumentModel::new(FILE_TYPE, IMPORTED_TITLE).with_content(job.payload.clone());

        let document = session
            .create_document(model)
            .map_err(|source| ImportError {
                step: ImportStep::CreateDocument,
                source,
            })?;

        let mut acp = session
            .get_acp(&document.reference)
            .map_err(|source| ImportError {
                step: ImportStep::ReadPermissions,
                source,
            })?;
        acp.grant(&job.requesting_principal, permission::READ_WRITE);

        session
            .set_acp(&document.reference, acp, true)
            .map_err(|source| ImportError {
                step: ImportStep::GrantPermissions,
                source,
            })?;

        Ok(document.reference)
    }
}

/// Terminal success state. The reference is always present.
#[derive(Debug, Clone)]
pub struct CompletedImport {
    job: ImportJob,
    reference: DocumentRef,
}

impl CompletedImport {
    pub fn state(&self) -> ImportState {
        ImportState::Completed
    }

    pub fn document_ref(&self) -> &DocumentRef {
        &self.reference
    }

    pub fn job(&self) -> &ImportJob {
        &self.job
    }

    pub fn into_job(self) -> ImportJob {
        self.job
    }
}

/// Terminal failure state. The job never carries a reference.
#[derive(Debug, Clone)]
pub struct FailedImport {
    job: ImportJob,
    error: ImportError,
}

impl FailedImport {
    pub fn state(&self) -> ImportState {
        ImportState::Failed
    }

    pub fn job(&self) -> &ImportJob {
        &self.job
    }

    pub fn error(&self) -> &ImportError {
        &self.error
    }

    pub fn into_error(self) -> ImportError {
        self.error
    }
}

#[cfg(test)]
#[path = "import_test.rs"]
mod import_test;
