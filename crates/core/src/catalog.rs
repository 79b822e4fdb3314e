use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TriggerCategory {
    Biological,
    Physical,
    Habit,
    State,
    Symptom,
}

/// One entry of the closed trigger vocabulary. The canonical name is what
/// queries are built around; synonyms widen recall for lexical variants and
/// known misspellings and are never surfaced in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerTerm {
    pub canonical: String,
    pub category: TriggerCategory,
    pub synonyms: Vec<String>,
}

impl TriggerTerm {
    fn new(canonical: &str, category: TriggerCategory, synonyms: &[&str]) -> Self {
        Self {
            canonical: canonical.to_string(),
            category,
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The fixed vocabulary searched for in clinical notes. Built once at
/// startup and shared by the search and negation layers.
#[derive(Debug, Clone)]
pub struct TriggerCatalog {
    terms: Vec<TriggerTerm>,
}

impl TriggerCatalog {
    /// The standard twelve-entry French catalog.
    pub fn standard() -> Self {
        use TriggerCategory::*;

        let terms = vec![
            TriggerTerm::new(
                "Hémoglobine A1C",
                Biological,
                &[
                    "HbA1C",
                    "Hémoglobine glyquée",
                    "Hémoglobyne A1C",
                    "Hémoglobyne glikée",
                ],
            ),
            TriggerTerm::new(
                "Microalbumine",
                Biological,
                &[
                    "Albumine urinaire",
                    "Protéines urinaires",
                    "Mikroalbumine",
                    "Micralbumine",
                ],
            ),
            TriggerTerm::new("Taille", Physical, &["Hauteur", "Stature", "Tayle", "Tail"]),
            TriggerTerm::new("Poids", Physical, &["Masse corporelle", "Poid", "Poyds"]),
            TriggerTerm::new(
                "Fumeur",
                Habit,
                &["Tabagisme", "Consommation de tabac", "Fumeure", "Fumer"],
            ),
            TriggerTerm::new(
                "Fumeuse",
                Habit,
                &[
                    "Tabagisme féminin",
                    "Consommatrice de tabac",
                    "Fumeuze",
                    "Fumeusses",
                ],
            ),
            TriggerTerm::new(
                "Anormal",
                State,
                &["Irrégulier", "Pathologique", "Anormalle", "Anormale"],
            ),
            TriggerTerm::new(
                "Cholestérol",
                Biological,
                &["LDL", "HDL", "Triglycérides", "Cholesterole", "Colestérol"],
            ),
            TriggerTerm::new(
                "Vertiges",
                Symptom,
                &["Étourdissements", "Tête qui tourne", "Vertige", "Verstiges"],
            ),
            TriggerTerm::new(
                "Rechute",
                Symptom,
                &["Récidive", "Retour des symptômes", "Réchute", "Rechutte"],
            ),
            TriggerTerm::new(
                "Réaction",
                Symptom,
                &["Réaction allergique", "Effet indésirable", "Réactionne", "Réaxion"],
            ),
            TriggerTerm::new(
                "Anticorps",
                Biological,
                &["Immunoglobulines", "Réponse immunitaire", "Antycorps", "Antikorps"],
            ),
        ];

        Self { terms }
    }

    pub fn terms(&self) -> &[TriggerTerm] {
        &self.terms
    }

    /// Canonical names plus every synonym, in catalog order. Used only for
    /// query construction; order does not affect semantics.
    pub fn query_terms(&self) -> Vec<String> {
        let mut all = Vec::new();
        for term in &self.terms {
            all.push(term.canonical.clone());
            all.extend(term.synonyms.iter().cloned());
        }
        all
    }
}
