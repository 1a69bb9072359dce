use serde::Serialize;

use crate::detection::{DetectionResult, SourceKind};

#[derive(Serialize)]
pub struct JsonReport {
    pub image_found: bool,
    pub keyword_found: bool,
    pub keywords: Vec<String>,
    pub keyword_highlight: Option<String>,
    pub sources: SourceBreakdown,
    pub evidence_count: usize,
}

#[derive(Serialize)]
pub struct SourceBreakdown {
    pub scrolled_text: usize,
    pub parent_element: usize,
    pub grandparent_element: usize,
    pub caption: usize,
    pub ocr: usize,
    pub impressum: usize,
}

impl From<&DetectionResult> for JsonReport {
    fn from(result: &DetectionResult) -> Self {
        let count = |kind: SourceKind| result.keywords_for(kind).len();

        Self {
            image_found: result.image_found,
            keyword_found: result.has_matches(),
            keywords: result
                .matched_keywords
                .iter()
                .map(|m| m.keyword.clone())
                .collect(),
            keyword_highlight: result.highlight_reference.clone(),
            sources: SourceBreakdown {
                scrolled_text: count(SourceKind::ScrolledText),
                parent_element: count(SourceKind::ParentElement),
                grandparent_element: count(SourceKind::GrandparentElement),
                caption: count(SourceKind::Caption),
                ocr: count(SourceKind::Ocr),
                impressum: count(SourceKind::Impressum),
            },
            evidence_count: result.evidence.len(),
        }
    }
}

impl JsonReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
