use crate::error::ReportError;
use crate::models::{Note, Patient};
use crate::traits::{NoteStore, PatientDirectory};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use std::sync::Arc;

/// Patient directory behind the gateway REST API.
pub struct HttpPatientDirectory {
    client: Arc<Client>,
    base_url: String,
}

impl HttpPatientDirectory {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ReportError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)?;
        Ok(Self {
            client: Arc::new(Client::new()),
            base_url,
        })
    }
}

#[async_trait]
impl PatientDirectory for HttpPatientDirectory {
    async fn patient_by_id(&self, id: i32) -> Result<Option<Patient>, ReportError> {
        let response = self
            .client
            .get(format!("{}/patients/{}", self.base_url, id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ReportError::BackendResponse {
                backend: "patient-directory".to_string(),
                details: response.status().to_string(),
            });
        }

        Ok(Some(response.json::<Patient>().await?))
    }
}

/// Note store behind the gateway REST API. A patient without notes answers
/// 404 on this route; that maps to an empty list, not an error.
pub struct HttpNoteStore {
    client: Arc<Client>,
    base_url: String,
}

impl HttpNoteStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ReportError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)?;
        Ok(Self {
            client: Arc::new(Client::new()),
            base_url,
        })
    }
}

#[async_trait]
impl NoteStore for HttpNoteStore {
    async fn notes_by_patient(&self, patient_id: i32) -> Result<Vec<Note>, ReportError> {
        let response = self
            .client
            .get(format!("{}/notes/patientid/{}", self.base_url, patient_id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(ReportError::BackendResponse {
                backend: "note-store".to_string(),
                details: response.status().to_string(),
            });
        }

        Ok(response.json::<Vec<Note>>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_urls_are_validated_at_construction() {
        assert!(HttpPatientDirectory::new("http://gateway:5000").is_ok());
        assert!(HttpPatientDirectory::new("gateway").is_err());
        assert!(HttpNoteStore::new("http://gateway:5000").is_ok());
        assert!(HttpNoteStore::new("").is_err());
    }
}
