use crate::aggregate::aggregate_triggers;
use crate::catalog::TriggerCatalog;
use crate::classify::{age_on, risk_level};
use crate::error::ReportError;
use crate::models::{RiskLevel, RiskReport};
use crate::negation::NegationFilter;
use crate::traits::{NoteIndex, NoteStore, PatientDirectory};
use chrono::{NaiveDate, Utc};

/// Request-scoped risk-assessment pipeline over the three collaborator
/// seams. The catalog and negation filter are built once at construction.
///
/// Steps run strictly in order (sync index, query, filter, classify); each
/// depends on the previous step's visible effect. Requests for different
/// patients are independent, but callers must serialize concurrent requests
/// for the same patient: interleaved delete/insert/query sequences against
/// the shared index are not safe.
pub struct ReportPipeline<P, N, I>
where
    P: PatientDirectory,
    N: NoteStore,
    I: NoteIndex,
{
    patients: P,
    notes: N,
    index: I,
    catalog: TriggerCatalog,
    filter: NegationFilter,
}

impl<P, N, I> ReportPipeline<P, N, I>
where
    P: PatientDirectory + Send + Sync,
    N: NoteStore + Send + Sync,
    I: NoteIndex + Send + Sync,
{
    pub fn new(patients: P, notes: N, index: I) -> Self {
        Self {
            patients,
            notes,
            index,
            catalog: TriggerCatalog::standard(),
            filter: NegationFilter::new(),
        }
    }

    /// Builds the risk report for a patient, or `None` for an unknown
    /// patient id. A patient without notes gets a `RiskLevel::None` report
    /// with no triggers. Index or backend failures abort the whole request;
    /// a report is never built from a partially processed note set.
    pub async fn risk_report(&self, patient_id: i32) -> Result<Option<RiskReport>, ReportError> {
        self.risk_report_on(patient_id, Utc::now().date_naive())
            .await
    }

    /// Same as [`risk_report`](Self::risk_report) with an explicit
    /// reference date for the age calculation.
    pub async fn risk_report_on(
        &self,
        patient_id: i32,
        today: NaiveDate,
    ) -> Result<Option<RiskReport>, ReportError> {
        let Some(patient) = self.patients.patient_by_id(patient_id).await? else {
            return Ok(None);
        };

        let notes = self.notes.notes_by_patient(patient_id).await?;
        if notes.is_empty() {
            return Ok(Some(RiskReport {
                patient_id,
                risk_level: RiskLevel::None,
                trigger_terms: Vec::new(),
            }));
        }

        self.index.sync(patient_id, &notes).await?;

        let hits = self
            .index
            .search(patient_id, &self.catalog.query_terms())
            .await?;

        let trigger_terms = aggregate_triggers(&hits, &self.filter);
        let age = age_on(patient.date_of_birth, today);
        let risk = risk_level(age, patient.gender, trigger_terms.len());

        Ok(Some(RiskReport {
            patient_id,
            risk_level: risk,
            trigger_terms,
        }))
    }
}
