pub mod aggregate;
pub mod catalog;
pub mod classify;
pub mod clients;
pub mod error;
pub mod models;
pub mod negation;
pub mod report;
pub mod stores;
pub mod traits;

pub use aggregate::aggregate_triggers;
pub use catalog::{TriggerCatalog, TriggerCategory, TriggerTerm};
pub use classify::{age_on, risk_level};
pub use clients::{HttpNoteStore, HttpPatientDirectory};
pub use error::ReportError;
pub use models::{Gender, Note, Patient, RiskLevel, RiskReport, SearchHit};
pub use negation::NegationFilter;
pub use report::ReportPipeline;
pub use stores::ElasticsearchStore;
pub use traits::{NoteIndex, NoteStore, PatientDirectory};
