use log::debug;

use crate::{
    detection::{
        DetectionResult,
        pipeline::{CreditPipeline, OcrService, PageSources},
    },
    error::Result,
    matcher::KeywordMatcher,
    search::{Candidate, SearchStrategy, SimilaritySearch, find_by_location},
};

pub mod detection;
pub mod error;
pub mod hash;
pub mod image_utils;
pub mod keywords;
pub mod matcher;
pub mod report;
pub mod search;

#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub hash_size: u32,
    pub similarity_threshold: f64,
    pub max_workers: usize,
    pub strategy: SearchStrategy,
    pub excerpt_len: usize,
    pub max_impressum_scrolls: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            hash_size: 8,
            similarity_threshold: 0.85,
            max_workers: 10,
            strategy: SearchStrategy::FirstMatch,
            excerpt_len: 200,
            max_impressum_scrolls: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    Locator,
    Similarity,
}

#[derive(Debug)]
pub struct FoundImage<H> {
    pub candidate: Candidate<H>,
    pub method: MatchMethod,
    pub score: Option<f64>,
}

pub struct CreditChecker {
    config: CheckerConfig,
    matcher: KeywordMatcher,
    search: SimilaritySearch,
}

impl CreditChecker {
    pub fn new() -> Result<Self> {
        Self::with_config(CheckerConfig::default())
    }

    pub fn with_config(config: CheckerConfig) -> Result<Self> {
        Self::build(config, KeywordMatcher::with_default_dictionary()?)
    }

    pub fn with_dictionary<S: AsRef<str>>(config: CheckerConfig, dictionary: &[S]) -> Result<Self> {
        Self::build(config, KeywordMatcher::new(dictionary)?)
    }

    fn build(config: CheckerConfig, matcher: KeywordMatcher) -> Result<Self> {
        let search = SimilaritySearch::new(
            config.hash_size,
            config.similarity_threshold,
            config.max_workers,
            config.strategy,
        )?;

        Ok(Self {
            config,
            matcher,
            search,
        })
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn matcher(&self) -> &KeywordMatcher {
        &self.matcher
    }

    pub fn similarity_search(&self) -> &SimilaritySearch {
        &self.search
    }

    pub fn find_image<H>(
        &self,
        target_url: &str,
        target_bytes: &[u8],
        mut candidates: Vec<Candidate<H>>,
    ) -> Result<Option<FoundImage<H>>> {
        if let Some(index) = find_by_location(target_url, &candidates) {
            debug!("target matched by locator: {}", candidates[index].source);
            let candidate = candidates.swap_remove(index);
            return Ok(Some(FoundImage {
                candidate,
                method: MatchMethod::Locator,
                score: None,
            }));
        }

        debug!("no locator match, falling back to similarity search");
        Ok(self
            .search
            .find(target_bytes, candidates)?
            .map(|hit| FoundImage {
                candidate: hit.candidate,
                method: MatchMethod::Similarity,
                score: Some(hit.score),
            }))
    }

    pub fn detect_credits(
        &self,
        image_found: bool,
        sources: &PageSources,
        ocr: Option<&dyn OcrService>,
    ) -> DetectionResult {
        CreditPipeline::new(&self.matcher)
            .with_excerpt_len(self.config.excerpt_len)
            .with_max_impressum_scrolls(self.config.max_impressum_scrolls)
            .detect(image_found, sources, ocr)
    }
}
