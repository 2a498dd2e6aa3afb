use scenari_connector_rs::constants::document::{FILE_TYPE, IMPORTED_TITLE};
use scenari_connector_rs::repository::{Acp, DocumentModel, permission};
use scenari_connector_rs::{
    Blob, Document, DocumentRef, ImportJob, ImportState, ImportStep, ImportTask,
    InMemoryRepository, Principal, RepositoryError, RepositorySession, UnrestrictedSession,
};
use std::sync::Arc;

fn job_for(principal: &str) -> ImportJob {
    ImportJob::new(
        Principal::new(principal),
        Blob::new("blob content", "application/zip"),
    )
}

/// Delegates to a real session but refuses permission changes.
struct ReadOnlySecurity {
    inner: UnrestrictedSession,
}

impl RepositorySession for ReadOnlySecurity {
    fn repository_name(&self) -> &str {
        self.inner.session().repository_name()
    }

    fn principal(&self) -> &Principal {
        self.inner.session().principal()
    }

    fn create_document(&self, model: DocumentModel) -> Result<Document, RepositoryError> {
        self.inner.session().create_document(model)
    }

    fn get_document(&self, reference: &DocumentRef) -> Result<Document, RepositoryError> {
        self.inner.session().get_document(reference)
    }

    fn get_acp(&self, reference: &DocumentRef) -> Result<Acp, RepositoryError> {
        self.inner.session().get_acp(reference)
    }

    fn set_acp(
        &self,
        _reference: &DocumentRef,
        _acp: Acp,
        _overwrite: bool,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Storage("security store is read-only".into()))
    }

    fn query(&self, doc_type: &str, title: &str) -> Result<Vec<Document>, RepositoryError> {
        self.inner.session().query(doc_type, title)
    }
}

#[test]
fn import_grants_read_write_to_a_caller_who_cannot_create() {
    let repository = InMemoryRepository::new("default");
    let caller = repository.session_for(Principal::new("alice"));
    assert!(matches!(
        caller.create_document(DocumentModel::new(FILE_TYPE, IMPORTED_TITLE)),
        Err(RepositoryError::AccessDenied { .. })
    ));

    let completed = ImportTask::new(job_for("alice"))
        .run(&repository.unrestricted())
        .unwrap();

    assert_eq!(completed.state(), ImportState::Completed);
    assert_eq!(
        completed.job().created_document_ref(),
        Some(completed.document_ref())
    );
    let document = caller.get_document(completed.document_ref()).unwrap();
    assert_eq!(document.doc_type, FILE_TYPE);
    assert_eq!(document.title, IMPORTED_TITLE);
    let acp = repository
        .unrestricted()
        .session()
        .get_acp(completed.document_ref())
        .unwrap();
    assert!(acp.allows(&Principal::new("alice"), &[permission::READ_WRITE]));
}

#[test]
fn imported_document_stays_invisible_to_other_principals() {
    let repository = InMemoryRepository::new("default");

    let completed = ImportTask::new(job_for("alice"))
        .run(&repository.unrestricted())
        .unwrap();

    let stranger = repository.session_for(Principal::new("mallory"));
    assert!(matches!(
        stranger.get_document(completed.document_ref()),
        Err(RepositoryError::AccessDenied { .. })
    ));
    assert!(
        stranger
            .query(FILE_TYPE, IMPORTED_TITLE)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn permission_failure_leaves_created_document_behind() {
    let repository = InMemoryRepository::new("default");
    let session = UnrestrictedSession::new(Arc::new(ReadOnlySecurity {
        inner: repository.unrestricted(),
    }));

    let failed = ImportTask::new(job_for("alice")).run(&session).unwrap_err();

    assert_eq!(failed.state(), ImportState::Failed);
    assert_eq!(failed.error().step, ImportStep::GrantPermissions);
    assert!(failed.job().created_document_ref().is_none());
    assert_eq!(repository.len(), 1);
    let caller = repository.session_for(Principal::new("alice"));
    assert!(
        caller
            .query(FILE_TYPE, IMPORTED_TITLE)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn each_run_creates_a_new_document() {
    let repository = InMemoryRepository::new("default");
    let system = repository.unrestricted();

    let first = ImportTask::new(job_for("alice")).run(&system).unwrap();
    let second = ImportTask::new(job_for("alice")).run(&system).unwrap();

    assert_ne!(first.document_ref(), second.document_ref());
    assert_eq!(
        system
            .session()
            .query(FILE_TYPE, IMPORTED_TITLE)
            .unwrap()
            .len(),
        2
    );
}
