use crate::models::SearchHit;
use crate::negation::NegationFilter;
use std::collections::BTreeMap;

/// Reduces every hit for a patient into the final deduplicated trigger set.
///
/// Per fragment: merge marker spans, extract each marked surface form, drop
/// the literal "normal" span (a substring false positive of "anormal"),
/// drop negated mentions, and keep the raw matched surface form as reported
/// by the search engine. Deduplication is case-insensitive with the first
/// surface form winning; the returned order follows the lowercased keys so
/// the same hits always produce the same list.
pub fn aggregate_triggers(hits: &[SearchHit], filter: &NegationFilter) -> Vec<String> {
    let mut found: BTreeMap<String, String> = BTreeMap::new();

    for hit in hits {
        for fragment in &hit.fragments {
            let merged = filter.merge_spans(fragment);
            for term in filter.marked_terms(&merged) {
                let key = term.to_lowercase();
                if key == "normal" {
                    continue;
                }
                if filter.is_negated(&merged, &term) {
                    continue;
                }
                found.entry(key).or_insert(term);
            }
        }
    }

    found.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(fragments: &[&str]) -> SearchHit {
        SearchHit {
            note_id: "note-1".to_string(),
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn surface_forms_dedupe_case_insensitively() {
        let filter = NegationFilter::new();
        let hits = vec![
            hit(&["«Cholestérol» élevé détecté"]),
            hit(&["suivi du «cholestérol» en cours"]),
        ];
        let triggers = aggregate_triggers(&hits, &filter);
        assert_eq!(triggers, vec!["Cholestérol"]);
    }

    #[test]
    fn normal_span_is_excluded() {
        let filter = NegationFilter::new();
        let hits = vec![hit(&["tout est «normal» ce jour"])];
        assert!(aggregate_triggers(&hits, &filter).is_empty());
    }

    #[test]
    fn negated_mentions_are_excluded() {
        let filter = NegationFilter::new();
        let hits = vec![hit(&[
            "le patient ne présente aucune anomalie de «cholestérol»",
            "«Poids» stable depuis un an",
        ])];
        let triggers = aggregate_triggers(&hits, &filter);
        assert_eq!(triggers, vec!["Poids"]);
    }

    #[test]
    fn merged_multi_token_span_counts_once() {
        let filter = NegationFilter::new();
        let hits = vec![hit(&["dosage de l'«Hémoglobine» «A1C» anormalement haut"])];
        let triggers = aggregate_triggers(&hits, &filter);
        assert_eq!(triggers, vec!["Hémoglobine A1C"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let filter = NegationFilter::new();
        let hits = vec![
            hit(&["«Vertiges» au réveil", "«Poids» en hausse"]),
            hit(&["suivi «Rechute» probable"]),
        ];
        let first = aggregate_triggers(&hits, &filter);
        let second = aggregate_triggers(&hits, &filter);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn empty_hits_yield_empty_set() {
        let filter = NegationFilter::new();
        assert!(aggregate_triggers(&[], &filter).is_empty());
    }
}
