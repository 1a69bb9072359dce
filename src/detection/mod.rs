pub mod pipeline;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    ScrolledText,
    ParentElement,
    GrandparentElement,
    Caption,
    Ocr,
    Impressum,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::ScrolledText => "scrolled text",
            SourceKind::ParentElement => "parent element",
            SourceKind::GrandparentElement => "grandparent element",
            SourceKind::Caption => "caption",
            SourceKind::Ocr => "ocr",
            SourceKind::Impressum => "impressum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub source: SourceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    pub source: SourceKind,
    pub location: String,
    pub raw_text: String,
    pub excerpt: String,
}

impl TextSpan {
    pub fn new<L, T>(source: SourceKind, location: L, raw_text: T, excerpt_len: usize) -> Self
    where
        L: Into<String>,
        T: Into<String>,
    {
        let raw_text = raw_text.into();
        let excerpt = truncate_chars(&raw_text, excerpt_len);
        Self {
            source,
            location: location.into(),
            raw_text,
            excerpt,
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionResult {
    pub image_found: bool,
    pub matched_keywords: Vec<KeywordMatch>,
    pub evidence: Vec<TextSpan>,
    pub highlight_reference: Option<String>,
}

impl DetectionResult {
    // Unique per (keyword, source kind): the same keyword seen through two
    // different kinds stays as two entries, a repeat within one kind does not.
    pub fn add_match(&mut self, keyword: &str, source: SourceKind) -> bool {
        if self
            .matched_keywords
            .iter()
            .any(|m| m.source == source && m.keyword == keyword)
        {
            return false;
        }

        self.matched_keywords.push(KeywordMatch {
            keyword: keyword.to_string(),
            source,
        });
        true
    }

    pub fn has_matches(&self) -> bool {
        !self.matched_keywords.is_empty()
    }

    pub fn keywords_for(&self, source: SourceKind) -> Vec<&str> {
        self.matched_keywords
            .iter()
            .filter(|m| m.source == source)
            .map(|m| m.keyword.as_str())
            .collect()
    }
}
