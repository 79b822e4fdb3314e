use crate::error::ReportError;
use crate::models::{Note, Patient, SearchHit};
use async_trait::async_trait;

/// Narrow contract over the external patient directory.
#[async_trait]
pub trait PatientDirectory {
    async fn patient_by_id(&self, id: i32) -> Result<Option<Patient>, ReportError>;
}

/// Narrow contract over the external note store.
#[async_trait]
pub trait NoteStore {
    async fn notes_by_patient(&self, patient_id: i32) -> Result<Vec<Note>, ReportError>;
}

/// Full-text index over one patient's notes. Any engine offering
/// delete-by-filter, document indexing, refresh, and fuzzy multi-term
/// search with highlighting can implement this.
#[async_trait]
pub trait NoteIndex {
    /// Makes the index contents for `patient_id` exactly equal to `notes`:
    /// delete everything tagged with the patient, re-insert every non-blank
    /// note, and make the result visible to queries before returning.
    /// Backend failure is fatal to the report request.
    async fn sync(&self, patient_id: i32, notes: &[Note]) -> Result<(), ReportError>;

    /// One fuzzy should-match-any query over `terms`, restricted to
    /// `patient_id`, with per-note highlighted fragments. Zero hits is a
    /// normal outcome.
    async fn search(&self, patient_id: i32, terms: &[String]) -> Result<Vec<SearchHit>, ReportError>;
}
