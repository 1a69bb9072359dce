use aho_corasick::AhoCorasick;

use crate::{
    error::{CreditError, Result},
    keywords::CREDIT_KEYWORDS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordContext {
    pub keyword: String,
    pub context: String,
}

pub struct KeywordMatcher {
    automaton: AhoCorasick,
    keywords: Vec<String>,
}

impl KeywordMatcher {
    pub fn new<S: AsRef<str>>(dictionary: &[S]) -> Result<Self> {
        let mut keywords: Vec<String> = Vec::with_capacity(dictionary.len());
        for entry in dictionary {
            let normalized = entry.as_ref().trim().to_lowercase();
            if normalized.is_empty() || keywords.contains(&normalized) {
                continue;
            }
            keywords.push(normalized);
        }

        if keywords.is_empty() {
            return Err(CreditError::PipelineFailed(
                "keyword dictionary is empty".into(),
            ));
        }

        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&keywords)
            .map_err(|e| CreditError::PipelineFailed(format!("keyword automaton: {e}")))?;

        Ok(Self {
            automaton,
            keywords,
        })
    }

    pub fn with_default_dictionary() -> Result<Self> {
        Self::new(CREDIT_KEYWORDS)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn find_all(&self, text: &str) -> Vec<String> {
        let mut hits: Vec<(usize, usize, usize)> = self
            .automaton
            .find_overlapping_iter(text)
            .filter(|m| on_word_boundary(text, m.start(), m.end()))
            .map(|m| (m.start(), m.end(), m.pattern().as_usize()))
            .collect();

        // Earliest-ending hit wins among overlapping candidates, so a phrase
        // like "Getty Images" reports "getty" rather than both entries, while
        // longer entries still survive when a shorter prefix fails its right
        // boundary ("istock" inside "istockphoto.com").
        hits.sort_by_key(|&(start, end, _)| (end, start));

        let mut cursor = 0usize;
        let mut found = Vec::new();
        for (start, end, pattern) in hits {
            if start < cursor {
                continue;
            }
            cursor = end;

            let keyword = &self.keywords[pattern];
            if !found.iter().any(|k| k == keyword) {
                found.push(keyword.clone());
            }
        }

        found
    }

    pub fn find_first(&self, text: &str) -> Option<String> {
        self.find_all(text).into_iter().next()
    }

    pub fn scan(&self, text: &str) -> Vec<KeywordContext> {
        let mut found = Vec::new();

        for m in self.automaton.find_overlapping_iter(text) {
            if !on_word_boundary(text, m.start(), m.end()) {
                continue;
            }

            let keyword = &self.keywords[m.pattern().as_usize()];
            if found.iter().any(|c: &KeywordContext| &c.keyword == keyword) {
                continue;
            }

            found.push(KeywordContext {
                keyword: keyword.clone(),
                context: context_around(text, m.start(), m.end(), 100),
            });
        }

        found
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !is_word_char(c));
    let after_ok = text[end..].chars().next().is_none_or(|c| !is_word_char(c));
    before_ok && after_ok
}

fn context_around(text: &str, start: usize, end: usize, pad: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(pad.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(pad)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    text[from..to].split_whitespace().collect::<Vec<_>>().join(" ")
}
