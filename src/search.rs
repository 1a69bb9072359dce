use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc,
};

use log::debug;

use crate::{
    error::{CreditError, Result},
    hash::{ImageFingerprint, PerceptualHasher},
    image_utils::decode_image,
};

pub const VALID_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

// FirstMatch stops at the first candidate to clear the threshold in
// completion order; reruns can therefore return a different qualifying
// candidate when several clear it. BestScore scores every candidate and is
// deterministic at the cost of never cancelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    FirstMatch,
    BestScore,
}

#[derive(Debug, Clone)]
pub struct Candidate<H> {
    pub handle: H,
    pub source: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct SearchHit<H> {
    pub candidate: Candidate<H>,
    pub score: f64,
    pub is_match: bool,
}

pub struct SimilaritySearch {
    hasher: PerceptualHasher,
    threshold: f64,
    strategy: SearchStrategy,
    pool: rayon::ThreadPool,
}

impl SimilaritySearch {
    pub fn new(
        hash_size: u32,
        threshold: f64,
        max_workers: usize,
        strategy: SearchStrategy,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CreditError::InvalidParameter(format!(
                "similarity threshold {threshold} outside [0, 1]"
            )));
        }
        if max_workers == 0 {
            return Err(CreditError::InvalidParameter(
                "max_workers must be at least 1".into(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_workers)
            .build()
            .map_err(|e| CreditError::WorkerPool(e.to_string()))?;

        Ok(Self {
            hasher: PerceptualHasher::new(hash_size)?,
            threshold,
            strategy,
            pool,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn search<H>(
        &self,
        target: &[u8],
        candidates: Vec<Candidate<H>>,
    ) -> Result<Vec<SearchHit<H>>> {
        let target_image =
            decode_image(target).map_err(|e| CreditError::TargetUnreadable(e.to_string()))?;
        let target_fingerprint = self
            .hasher
            .fingerprint(&target_image)
            .map_err(|e| CreditError::TargetUnreadable(e.to_string()))?;

        debug!(
            "similarity search over {} candidates (threshold {:.2})",
            candidates.len(),
            self.threshold
        );

        let stop = AtomicBool::new(false);
        let early_exit = self.strategy == SearchStrategy::FirstMatch;
        let hasher = self.hasher;
        let threshold = self.threshold;
        let mut collected: Vec<(usize, f64, bool)> = Vec::new();

        let inputs: Vec<(&[u8], &str)> = candidates
            .iter()
            .map(|c| (c.bytes.as_slice(), c.source.as_str()))
            .collect();

        // The collection loop stays on the caller thread; only the hashing
        // tasks run on the pool, so a one-worker pool cannot deadlock.
        self.pool.in_place_scope(|scope| {
            let (tx, rx) = mpsc::channel::<(usize, f64, bool)>();

            for (index, &(bytes, source)) in inputs.iter().enumerate() {
                let tx = tx.clone();
                let stop = &stop;
                let target_fingerprint = &target_fingerprint;

                scope.spawn(move |_| {
                    if early_exit && stop.load(Ordering::Relaxed) {
                        return;
                    }

                    let (score, is_match) =
                        score_candidate(hasher, target_fingerprint, bytes, threshold);
                    debug!("{source} -> similarity {score:.3} (match: {is_match})");
                    let _ = tx.send((index, score, is_match));
                });
            }
            drop(tx);

            for (index, score, is_match) in rx.iter() {
                collected.push((index, score, is_match));
                if early_exit && is_match {
                    stop.store(true, Ordering::Relaxed);
                    break;
                }
            }
        });
        drop(inputs);

        collected.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut slots: Vec<Option<Candidate<H>>> = candidates.into_iter().map(Some).collect();
        Ok(collected
            .into_iter()
            .filter_map(|(index, score, is_match)| {
                slots[index].take().map(|candidate| SearchHit {
                    candidate,
                    score,
                    is_match,
                })
            })
            .collect())
    }

    pub fn find<H>(
        &self,
        target: &[u8],
        candidates: Vec<Candidate<H>>,
    ) -> Result<Option<SearchHit<H>>> {
        let mut hits = self.search(target, candidates)?;

        if let Some(position) = hits.iter().position(|hit| hit.is_match) {
            return Ok(Some(hits.swap_remove(position)));
        }

        for (rank, hit) in hits.iter().take(3).enumerate() {
            debug!(
                "closest miss {}: {:.3} - {}",
                rank + 1,
                hit.score,
                hit.candidate.source
            );
        }

        Ok(None)
    }
}

fn score_candidate(
    hasher: PerceptualHasher,
    target: &ImageFingerprint,
    bytes: &[u8],
    threshold: f64,
) -> (f64, bool) {
    let fingerprint = match decode_image(bytes).and_then(|image| hasher.fingerprint(&image)) {
        Ok(fingerprint) => fingerprint,
        Err(_) => return (0.0, false),
    };

    match target.similarity(&fingerprint) {
        Some(score) => (score, score >= threshold),
        None => (0.0, false),
    }
}

pub fn find_by_location<H>(target_url: &str, candidates: &[Candidate<H>]) -> Option<usize> {
    if target_url.is_empty() {
        return None;
    }

    let filename = target_url
        .rsplit('/')
        .next()
        .and_then(|name| name.split('?').next())
        .filter(|name| !name.is_empty());

    candidates.iter().position(|candidate| {
        candidate.source.contains(target_url)
            || filename.is_some_and(|name| candidate.source.contains(name))
    })
}

pub fn has_image_extension(url: &str) -> bool {
    let lower = url.to_lowercase();
    VALID_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
