use crate::error::ReportError;
use crate::models::{Note, SearchHit};
use crate::traits::NoteIndex;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

const BACKEND: &str = "elasticsearch";

/// `NoteIndex` over any Elasticsearch-compatible HTTP API. The index is a
/// disposable projection of the note store: `sync` wipes and rebuilds the
/// patient's documents on every report request, trading write volume for a
/// hard no-staleness guarantee. Acceptable for a bounded per-patient note
/// count; an incremental sync would need index-side versioning first.
pub struct ElasticsearchStore {
    client: Arc<Client>,
    endpoint: String,
    index_name: String,
}

impl ElasticsearchStore {
    pub fn new(
        endpoint: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Result<Self, ReportError> {
        let endpoint = endpoint.into();
        url::Url::parse(&endpoint)?;

        Ok(Self {
            client: Arc::new(Client::new()),
            endpoint,
            index_name: index_name.into(),
        })
    }

    /// Creates the notes index with its mapping when absent.
    pub async fn ensure_index(&self) -> Result<(), ReportError> {
        let response = self
            .client
            .head(format!("{}/{}", self.endpoint, self.index_name))
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            return Ok(());
        }

        if !response.status().is_client_error() {
            return Err(ReportError::BackendResponse {
                backend: BACKEND.to_string(),
                details: response.status().to_string(),
            });
        }

        let response = self
            .client
            .put(format!("{}/{}", self.endpoint, self.index_name))
            .json(&json!({
                "settings": {
                    "number_of_shards": 1,
                    "number_of_replicas": 0
                },
                "mappings": {
                    "properties": {
                        "noteId": {"type": "keyword"},
                        "patientId": {"type": "integer"},
                        "note": {"type": "text"},
                        "date": {"type": "date"}
                    }
                }
            }))
            .send()
            .await?;

        if response.status().is_server_error() || response.status().is_client_error() {
            return Err(ReportError::Request(format!(
                "notes index setup failed with {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn delete_patient_documents(&self, patient_id: i32) -> Result<(), ReportError> {
        let response = self
            .client
            .post(format!(
                "{}/{}/_delete_by_query?conflicts=proceed",
                self.endpoint, self.index_name
            ))
            .json(&json!({
                "query": {
                    "term": {
                        "patientId": patient_id
                    }
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReportError::BackendResponse {
                backend: BACKEND.to_string(),
                details: response.status().to_string(),
            });
        }
        Ok(())
    }

    async fn refresh(&self) -> Result<(), ReportError> {
        let response = self
            .client
            .post(format!("{}/{}/_refresh", self.endpoint, self.index_name))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReportError::BackendResponse {
                backend: BACKEND.to_string(),
                details: response.status().to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NoteIndex for ElasticsearchStore {
    async fn sync(&self, patient_id: i32, notes: &[Note]) -> Result<(), ReportError> {
        self.ensure_index().await?;
        self.delete_patient_documents(patient_id).await?;

        let operations = bulk_operations(&self.index_name, patient_id, notes);

        if !operations.is_empty() {
            let payload: String = operations
                .into_iter()
                .map(|value| serde_json::to_string(&value))
                .collect::<Result<Vec<_>, serde_json::Error>>()?
                .join("\n")
                + "\n";

            let response = self
                .client
                .post(format!("{}/_bulk", self.endpoint))
                .header("Content-Type", "application/x-ndjson")
                .body(payload)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(ReportError::BackendResponse {
                    backend: BACKEND.to_string(),
                    details: response.status().to_string(),
                });
            }

            // A bulk response can carry per-item failures under a 200
            // status. Any rejected document would leave the index partial,
            // so the whole request fails.
            let response_json: Value = response.json().await?;
            if let Some(details) = bulk_rejection(&response_json) {
                return Err(ReportError::BackendResponse {
                    backend: BACKEND.to_string(),
                    details,
                });
            }
        }

        // Inserted documents must be visible to the query issued later in
        // the same request; an eventual-consistency window here would leak
        // stale highlights into the report.
        self.refresh().await
    }

    async fn search(
        &self,
        patient_id: i32,
        terms: &[String],
    ) -> Result<Vec<SearchHit>, ReportError> {
        let should: Vec<Value> = terms
            .iter()
            .map(|term| {
                json!({
                    "match": {
                        "note": {
                            "query": term,
                            "fuzziness": "AUTO"
                        }
                    }
                })
            })
            .collect();

        let body = json!({
            "size": 1000,
            "query": {
                "bool": {
                    "must": {
                        "bool": {
                            "should": should
                        }
                    },
                    "filter": {
                        "term": {
                            "patientId": patient_id
                        }
                    }
                }
            },
            "highlight": {
                "fields": {
                    "note": {
                        "pre_tags": ["«"],
                        "post_tags": ["»"]
                    }
                }
            }
        });

        let response = self
            .client
            .post(format!("{}/{}/_search", self.endpoint, self.index_name))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReportError::BackendResponse {
                backend: BACKEND.to_string(),
                details: response.status().to_string(),
            });
        }

        let response_json: Value = response.json().await?;
        Ok(parse_search_hits(&response_json))
    }
}

/// The delete-then-insert NDJSON body for one patient's notes. Blank notes
/// are skipped; every document is keyed by its note id, so re-inserting the
/// same note list overwrites instead of duplicating.
fn bulk_operations(index_name: &str, patient_id: i32, notes: &[Note]) -> Vec<Value> {
    let mut operations = Vec::new();
    for note in notes {
        if note.text.trim().is_empty() {
            continue;
        }
        operations.push(json!({
            "index": {
                "_index": index_name,
                "_id": note.id,
            }
        }));
        operations.push(json!({
            "noteId": note.id,
            "patientId": patient_id,
            "note": note.text,
            "date": note.date,
        }));
    }
    operations
}

fn bulk_rejection(response: &Value) -> Option<String> {
    let had_errors = response
        .pointer("/errors")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !had_errors {
        return None;
    }

    let details = response
        .pointer("/items")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.pointer("/index/error/reason").and_then(Value::as_str))
        .next()
        .unwrap_or("bulk insert reported item failures");

    Some(details.to_string())
}

fn parse_search_hits(response: &Value) -> Vec<SearchHit> {
    let hits = response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut result = Vec::new();

    for raw in hits {
        let note_id = raw
            .pointer("/_source/noteId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let fragments = raw
            .pointer("/highlight/note")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        result.push(SearchHit { note_id, fragments });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_hits_parse_source_and_highlight() {
        let response = json!({
            "hits": {
                "hits": [
                    {
                        "_source": {"noteId": "n-1", "patientId": 4, "note": "Cholestérol élevé"},
                        "highlight": {"note": ["«Cholestérol» élevé"]}
                    },
                    {
                        "_source": {"noteId": "n-2", "patientId": 4, "note": "Poids stable"}
                    }
                ]
            }
        });

        let hits = parse_search_hits(&response);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].note_id, "n-1");
        assert_eq!(hits[0].fragments, vec!["«Cholestérol» élevé"]);
        assert!(hits[1].fragments.is_empty());
    }

    #[test]
    fn missing_hits_section_parses_to_empty() {
        assert!(parse_search_hits(&json!({})).is_empty());
    }

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.to_string(),
            patient_id: 4,
            text: text.to_string(),
            date: "2025-01-24T09:46:17Z".parse().unwrap(),
        }
    }

    #[test]
    fn resync_with_the_same_notes_builds_identical_operations() {
        let notes = vec![note("n-1", "Cholestérol élevé"), note("n-2", "Poids stable")];

        let first = bulk_operations("medical_notes", 4, &notes);
        let second = bulk_operations("medical_notes", 4, &notes);

        assert_eq!(first, second);
        // Documents are keyed by note id, so a re-insert overwrites the
        // previous document instead of adding a duplicate.
        assert_eq!(first[0].pointer("/index/_id"), Some(&json!("n-1")));
        assert_eq!(first[2].pointer("/index/_id"), Some(&json!("n-2")));
    }

    #[test]
    fn blank_notes_are_not_indexed() {
        let notes = vec![note("n-1", "   "), note("n-2", "Vertiges au réveil")];
        let operations = bulk_operations("medical_notes", 4, &notes);

        assert_eq!(operations.len(), 2);
        assert_eq!(operations[0].pointer("/index/_id"), Some(&json!("n-2")));
    }

    #[test]
    fn bulk_item_failures_are_fatal_despite_200_status() {
        let response = json!({
            "took": 3,
            "errors": true,
            "items": [
                {"index": {"_id": "n-1", "status": 201}},
                {"index": {"_id": "n-2", "status": 429, "error": {"reason": "rejected execution"}}}
            ]
        });

        assert_eq!(bulk_rejection(&response), Some("rejected execution".to_string()));
    }

    #[test]
    fn clean_bulk_response_is_not_a_rejection() {
        let response = json!({
            "took": 3,
            "errors": false,
            "items": [{"index": {"_id": "n-1", "status": 201}}]
        });

        assert_eq!(bulk_rejection(&response), None);
        assert_eq!(bulk_rejection(&json!({})), None);
    }

    #[test]
    fn endpoint_must_be_a_valid_url() {
        assert!(ElasticsearchStore::new("not a url", "medical_notes").is_err());
        assert!(ElasticsearchStore::new("http://localhost:9200", "medical_notes").is_ok());
    }
}
