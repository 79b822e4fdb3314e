use regex::Regex;

/// Negation cue vocabulary, simple through indirect forms. Matched against
/// lowercased text.
const NEGATION_CUES: [&str; 36] = [
    // Simple negations
    "aucun",
    "aucune",
    "sans",
    "ne pas",
    "pas de",
    "n'est pas",
    "ni",
    "ni de",
    "jamais",
    "nulle part",
    "rien",
    "zéro",
    "non détecté",
    "ne montre pas",
    // Compound or implicit negations
    "n'est plus",
    "ne révèle pas",
    "ne présente pas",
    "ne contient pas",
    "ne souffre pas de",
    "exclu",
    "aucune trace de",
    "ne signale pas",
    "ne démontre pas",
    "ne trouve pas",
    "ne permet pas de",
    "ne semble pas",
    // Indirect negative formulations
    "n'a pas été trouvé",
    "ne figure pas",
    "aucun signe de",
    "n'a aucun",
    "aucune indication de",
    "aucun élément",
    "aucun symptôme de",
    "ne comporte pas",
    "ne dispose pas de",
    "pas retrouvé",
];

/// Nouns that carry a clinical negation when standing between a cue and the
/// mention ("aucune anomalie de l'Hémoglobine A1C").
const CLINICAL_NOUNS: &str = r"\b(anomalies?|problèmes?|dysfonctionnements?|altérations?|dégradations?|irrégularités?|défauts?|troubles?)\b";

/// Articles allowed between a cue and the mention without breaking
/// direct adjacency.
const PARTITIVE_ARTICLES: [&str; 7] = ["de", "du", "des", "d'", "la", "le", "l'"];

/// Decides whether a highlighted trigger mention is negated in its snippet.
/// Pure and total; every pattern is compiled once at construction.
pub struct NegationFilter {
    cue_patterns: Vec<Regex>,
    noun_pattern: Regex,
    span_gap: Regex,
    span_extract: Regex,
}

impl Default for NegationFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl NegationFilter {
    pub fn new() -> Self {
        let cue_patterns = NEGATION_CUES
            .iter()
            .map(|cue| {
                Regex::new(&format!(r"\b{}\b", regex::escape(cue)))
                    .expect("negation cue pattern is valid")
            })
            .collect();

        Self {
            cue_patterns,
            noun_pattern: Regex::new(CLINICAL_NOUNS).expect("clinical noun pattern is valid"),
            span_gap: Regex::new(r"»\s+«").expect("span gap pattern is valid"),
            span_extract: Regex::new(r"«([^«»]+)»").expect("span extract pattern is valid"),
        }
    }

    /// Collapses adjacent marker pairs separated only by whitespace into a
    /// single logical span, so a multi-token trigger highlighted word by
    /// word ("«Hémoglobine» «A1C»") counts as one mention.
    pub fn merge_spans(&self, fragment: &str) -> String {
        self.span_gap.replace_all(fragment, " ").into_owned()
    }

    /// The marked surface forms of a fragment, after span merging.
    pub fn marked_terms(&self, merged_fragment: &str) -> Vec<String> {
        self.span_extract
            .captures_iter(merged_fragment)
            .map(|capture| capture[1].to_string())
            .collect()
    }

    /// Whether the mention of `marked_term` inside `fragment` is negated.
    /// A mention is negated when a cue sits immediately next to the span
    /// (optionally across a partitive article), or when a cue anywhere on
    /// one side is joined to the span by a clinical-negation noun.
    ///
    /// When the same term is marked more than once in one fragment, the
    /// first occurrence governs the whole fragment; a later asserted
    /// mention does not resurrect a term negated earlier in the snippet.
    pub fn is_negated(&self, fragment: &str, marked_term: &str) -> bool {
        let merged = self.merge_spans(fragment);
        let lowered = merged.to_lowercase().replace('\u{2019}', "'");
        let needle = format!("«{}»", marked_term.to_lowercase().replace('\u{2019}', "'"));

        let Some(span_start) = lowered.find(&needle) else {
            return false;
        };

        let before = strip_markers(&lowered[..span_start]);
        let after = strip_markers(&lowered[span_start + needle.len()..]);

        self.negated_before(&before)
            || self.negated_after(&after)
            || self.contextual_before(&before)
            || self.contextual_after(&after)
    }

    fn negated_before(&self, before: &str) -> bool {
        let mut text = before.trim_end().to_string();
        // One or two article tokens may sit between the cue and the span
        // ("aucune trace de la ...").
        for _ in 0..3 {
            if self.ends_with_cue(&text) {
                return true;
            }
            match strip_trailing_article(&text) {
                Some(stripped) => text = stripped,
                None => return false,
            }
        }
        self.ends_with_cue(&text)
    }

    fn negated_after(&self, after: &str) -> bool {
        let mut text = after.trim_start().to_string();
        for _ in 0..3 {
            if self.starts_with_cue(&text) {
                return true;
            }
            match strip_leading_article(&text) {
                Some(stripped) => text = stripped,
                None => return false,
            }
        }
        self.starts_with_cue(&text)
    }

    fn ends_with_cue(&self, text: &str) -> bool {
        NEGATION_CUES.iter().any(|cue| {
            text.ends_with(cue)
                && text[..text.len() - cue.len()]
                    .chars()
                    .next_back()
                    .map_or(true, |c| !c.is_alphanumeric())
        })
    }

    fn starts_with_cue(&self, text: &str) -> bool {
        NEGATION_CUES.iter().any(|cue| {
            text.starts_with(cue)
                && text[cue.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric())
        })
    }

    /// Cue somewhere before the span with a clinical noun between them.
    fn contextual_before(&self, before: &str) -> bool {
        self.cue_patterns.iter().any(|cue| {
            cue.find_iter(before).any(|cue_match| {
                self.noun_pattern
                    .find_iter(before)
                    .any(|noun| noun.start() >= cue_match.end())
            })
        })
    }

    /// Cue somewhere after the span with a clinical noun between them.
    fn contextual_after(&self, after: &str) -> bool {
        self.cue_patterns.iter().any(|cue| {
            cue.find_iter(after).any(|cue_match| {
                self.noun_pattern
                    .find_iter(after)
                    .any(|noun| noun.end() <= cue_match.start())
            })
        })
    }
}

fn strip_markers(text: &str) -> String {
    text.replace(['«', '»'], "")
}

fn strip_trailing_article(text: &str) -> Option<String> {
    let trimmed = text.trim_end();
    for apostrophe_form in ["d'", "l'"] {
        if trimmed.ends_with(apostrophe_form) {
            return Some(trimmed[..trimmed.len() - apostrophe_form.len()].trim_end().to_string());
        }
    }
    let last = trimmed.rsplit(char::is_whitespace).next()?;
    if PARTITIVE_ARTICLES.contains(&last) {
        return Some(trimmed[..trimmed.len() - last.len()].trim_end().to_string());
    }
    None
}

fn strip_leading_article(text: &str) -> Option<String> {
    let trimmed = text.trim_start();
    for apostrophe_form in ["d'", "l'"] {
        if trimmed.starts_with(apostrophe_form) {
            return Some(trimmed[apostrophe_form.len()..].trim_start().to_string());
        }
    }
    let first = trimmed.split(char::is_whitespace).next()?;
    if PARTITIVE_ARTICLES.contains(&first) {
        return Some(trimmed[first.len()..].trim_start().to_string());
    }
    None
}
