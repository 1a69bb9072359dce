use log::{debug, info, warn};

use crate::{
    detection::{DetectionResult, SourceKind, TextSpan},
    error::Result,
    matcher::KeywordMatcher,
};

pub const DEFAULT_EXCERPT_LEN: usize = 200;
pub const DEFAULT_MAX_IMPRESSUM_SCROLLS: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct ScrolledText {
    pub text: String,
    pub location: String,
}

#[derive(Debug, Clone, Default)]
pub struct CaptionText {
    pub text: String,
    pub selector: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImpressumPage {
    pub url: String,
    pub text: String,
    pub screenshots: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub struct PageSources {
    pub page_url: String,
    pub scrolled: Vec<ScrolledText>,
    pub parent: Option<String>,
    pub grandparent: Option<String>,
    pub captions_near: Vec<CaptionText>,
    pub captions_page: Vec<CaptionText>,
    pub image_bytes: Option<Vec<u8>>,
    pub impressum: Option<ImpressumPage>,
}

pub trait OcrService {
    fn text(&self, image: &[u8]) -> Result<String>;
}

pub struct CreditPipeline<'a> {
    matcher: &'a KeywordMatcher,
    excerpt_len: usize,
    max_impressum_scrolls: usize,
}

impl<'a> CreditPipeline<'a> {
    pub fn new(matcher: &'a KeywordMatcher) -> Self {
        Self {
            matcher,
            excerpt_len: DEFAULT_EXCERPT_LEN,
            max_impressum_scrolls: DEFAULT_MAX_IMPRESSUM_SCROLLS,
        }
    }

    pub fn with_excerpt_len(mut self, excerpt_len: usize) -> Self {
        self.excerpt_len = excerpt_len;
        self
    }

    pub fn with_max_impressum_scrolls(mut self, max_impressum_scrolls: usize) -> Self {
        self.max_impressum_scrolls = max_impressum_scrolls;
        self
    }

    pub fn detect(
        &self,
        image_found: bool,
        sources: &PageSources,
        ocr: Option<&dyn OcrService>,
    ) -> DetectionResult {
        let mut result = DetectionResult {
            image_found,
            ..DetectionResult::default()
        };

        self.check_scrolled(&mut result, sources);
        self.check_container(&mut result, SourceKind::ParentElement, sources.parent.as_deref());
        self.check_container(
            &mut result,
            SourceKind::GrandparentElement,
            sources.grandparent.as_deref(),
        );
        self.check_captions(&mut result, sources);
        self.check_image_ocr(&mut result, sources, ocr);

        // The cheap page sources gate the expensive impressum fallback; the
        // source order is part of the contract, not free to rearrange.
        if !result.has_matches() {
            self.check_impressum(&mut result, sources, ocr);
        }

        if let Some(first) = result.matched_keywords.first() {
            result.highlight_reference =
                Some(highlight_reference(&sources.page_url, &first.keyword));
            info!(
                "found {} credit keyword(s) on {}, first: {}",
                result.matched_keywords.len(),
                sources.page_url,
                first.keyword
            );
        } else {
            debug!("no credit keywords found on {}", sources.page_url);
        }

        result
    }

    fn check_scrolled(&self, result: &mut DetectionResult, sources: &PageSources) {
        for item in &sources.scrolled {
            let text = item.text.trim();
            if text.is_empty() {
                continue;
            }

            let mut recorded = false;
            for keyword in self.matcher.find_all(text) {
                recorded |= result.add_match(&keyword, SourceKind::ScrolledText);
            }
            if recorded {
                result.evidence.push(TextSpan::new(
                    SourceKind::ScrolledText,
                    item.location.as_str(),
                    text,
                    self.excerpt_len,
                ));
            }
        }
    }

    fn check_container(
        &self,
        result: &mut DetectionResult,
        kind: SourceKind,
        text: Option<&str>,
    ) {
        let Some(text) = text else { return };
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let mut recorded = false;
        for keyword in self.matcher.find_all(text) {
            recorded |= result.add_match(&keyword, kind);
        }
        if recorded {
            result
                .evidence
                .push(TextSpan::new(kind, kind.label(), text, self.excerpt_len));
        }
    }

    fn check_captions(&self, result: &mut DetectionResult, sources: &PageSources) {
        for (captions, scope) in [
            (&sources.captions_near, "near-image"),
            (&sources.captions_page, "page-wide"),
        ] {
            for caption in captions.iter() {
                let text = caption.text.trim();
                if text.is_empty() {
                    continue;
                }

                let mut recorded = false;
                for keyword in self.matcher.find_all(text) {
                    // Page-wide hits for a keyword already found near the
                    // image are dropped here by the per-kind dedup.
                    recorded |= result.add_match(&keyword, SourceKind::Caption);
                }
                if recorded {
                    result.evidence.push(TextSpan::new(
                        SourceKind::Caption,
                        format!("{scope} {}", caption.selector),
                        text,
                        self.excerpt_len,
                    ));
                }
            }
        }
    }

    fn check_image_ocr(
        &self,
        result: &mut DetectionResult,
        sources: &PageSources,
        ocr: Option<&dyn OcrService>,
    ) {
        let (Some(service), Some(bytes)) = (ocr, sources.image_bytes.as_deref()) else {
            return;
        };

        match service.text(bytes) {
            Ok(text) if !text.trim().is_empty() => {
                let text = text.trim();
                let mut recorded = false;
                for keyword in self.matcher.find_all(text) {
                    recorded |= result.add_match(&keyword, SourceKind::Ocr);
                }
                if recorded {
                    result.evidence.push(TextSpan::new(
                        SourceKind::Ocr,
                        "target image",
                        text,
                        self.excerpt_len,
                    ));
                }
            }
            Ok(_) => {}
            Err(e) => warn!("ocr unavailable for target image: {e}"),
        }
    }

    fn check_impressum(
        &self,
        result: &mut DetectionResult,
        sources: &PageSources,
        ocr: Option<&dyn OcrService>,
    ) {
        let Some(impressum) = &sources.impressum else {
            return;
        };

        let text = impressum.text.trim();
        let mut recorded = false;
        if !text.is_empty() {
            for keyword in self.matcher.find_all(text) {
                recorded |= result.add_match(&keyword, SourceKind::Impressum);
            }
            if recorded {
                result.evidence.push(TextSpan::new(
                    SourceKind::Impressum,
                    impressum.url.as_str(),
                    text,
                    self.excerpt_len,
                ));
            }
        }

        // OCR over scrolled screenshots only runs when the page text itself
        // yielded nothing.
        if recorded {
            return;
        }
        let Some(service) = ocr else { return };

        for (index, screenshot) in impressum
            .screenshots
            .iter()
            .take(self.max_impressum_scrolls)
            .enumerate()
        {
            match service.text(screenshot) {
                Ok(text) if !text.trim().is_empty() => {
                    let text = text.trim().to_string();
                    let mut shot_recorded = false;
                    for keyword in self.matcher.find_all(&text) {
                        shot_recorded |= result.add_match(&keyword, SourceKind::Impressum);
                    }
                    if shot_recorded {
                        result.evidence.push(TextSpan::new(
                            SourceKind::Impressum,
                            format!("{} screenshot {}", impressum.url, index + 1),
                            text,
                            self.excerpt_len,
                        ));
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("ocr failed on impressum screenshot {}: {e}", index + 1),
            }
        }
    }
}

fn highlight_reference(page_url: &str, keyword: &str) -> String {
    format!("{page_url}#:~:text={}", urlencoding::encode(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CreditError;

    fn pipeline_matcher() -> KeywordMatcher {
        KeywordMatcher::with_default_dictionary().unwrap()
    }

    fn scrolled(text: &str, location: &str) -> ScrolledText {
        ScrolledText {
            text: text.to_string(),
            location: location.to_string(),
        }
    }

    fn caption(text: &str, selector: &str) -> CaptionText {
        CaptionText {
            text: text.to_string(),
            selector: selector.to_string(),
        }
    }

    // Treats the "image" bytes as UTF-8 so each fixture controls its own text.
    struct EchoOcr;

    impl OcrService for EchoOcr {
        fn text(&self, image: &[u8]) -> Result<String> {
            Ok(String::from_utf8_lossy(image).into_owned())
        }
    }

    struct OfflineOcr;

    impl OcrService for OfflineOcr {
        fn text(&self, _image: &[u8]) -> Result<String> {
            Err(CreditError::PipelineFailed("ocr offline".into()))
        }
    }

    #[test]
    fn empty_sources_produce_an_empty_result() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);

        let result = pipeline.detect(true, &PageSources::default(), None);
        assert!(result.image_found);
        assert!(result.matched_keywords.is_empty());
        assert!(result.evidence.is_empty());
        assert!(result.highlight_reference.is_none());
    }

    #[test]
    fn scrolled_elements_dedup_per_keyword_but_not_per_kind() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);
        let sources = PageSources {
            page_url: "https://example.com/post".into(),
            scrolled: vec![
                scrolled("Photo by Getty, licensed via shutterstock", "DIV"),
                scrolled("another getty mention", "P"),
            ],
            captions_near: vec![caption("Credit: Getty", "figcaption")],
            ..PageSources::default()
        };

        let result = pipeline.detect(true, &sources, None);

        let scrolled_keywords = result.keywords_for(SourceKind::ScrolledText);
        assert_eq!(scrolled_keywords, vec!["getty", "shutterstock"]);
        assert_eq!(result.keywords_for(SourceKind::Caption), vec!["getty"]);
        assert_eq!(result.evidence.len(), 2);
    }

    #[test]
    fn page_wide_caption_does_not_duplicate_near_image_caption() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);
        let sources = PageSources {
            page_url: "https://example.com".into(),
            captions_near: vec![caption("Foto: Getty", "figcaption")],
            captions_page: vec![
                caption("Getty somewhere else on the page", ".credit"),
                caption("Archiv: Reuters", ".photo-credit"),
            ],
            ..PageSources::default()
        };

        let result = pipeline.detect(false, &sources, None);
        assert_eq!(
            result.keywords_for(SourceKind::Caption),
            vec!["getty", "reuters"]
        );
        assert_eq!(result.evidence.len(), 2);
    }

    #[test]
    fn parent_and_grandparent_are_tagged_separately() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);
        let sources = PageSources {
            page_url: "https://example.com".into(),
            parent: Some("Bild: imago images".into()),
            grandparent: Some("Gallery powered by imago".into()),
            ..PageSources::default()
        };

        let result = pipeline.detect(true, &sources, None);
        assert_eq!(result.keywords_for(SourceKind::ParentElement), vec!["imago"]);
        assert_eq!(
            result.keywords_for(SourceKind::GrandparentElement),
            vec!["imago"]
        );
    }

    #[test]
    fn target_image_ocr_hits_are_tagged_as_ocr() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);
        let sources = PageSources {
            page_url: "https://example.com".into(),
            image_bytes: Some(b"watermark: depositphotos".to_vec()),
            ..PageSources::default()
        };

        let result = pipeline.detect(true, &sources, Some(&EchoOcr));
        assert_eq!(result.keywords_for(SourceKind::Ocr), vec!["depositphotos"]);
    }

    #[test]
    fn missing_ocr_service_degrades_to_no_op() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);
        let sources = PageSources {
            page_url: "https://example.com".into(),
            image_bytes: Some(b"watermark: depositphotos".to_vec()),
            ..PageSources::default()
        };

        let without_service = pipeline.detect(true, &sources, None);
        assert!(without_service.matched_keywords.is_empty());

        let with_failing_service = pipeline.detect(true, &sources, Some(&OfflineOcr));
        assert!(with_failing_service.matched_keywords.is_empty());
    }

    #[test]
    fn impressum_is_skipped_when_primary_sources_match() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);
        let sources = PageSources {
            page_url: "https://example.com".into(),
            scrolled: vec![scrolled("Credit: Getty", "DIV")],
            impressum: Some(ImpressumPage {
                url: "https://example.com/impressum".into(),
                text: "Bildnachweis: shutterstock".into(),
                screenshots: Vec::new(),
            }),
            ..PageSources::default()
        };

        let result = pipeline.detect(true, &sources, None);
        assert!(result.keywords_for(SourceKind::Impressum).is_empty());
        assert_eq!(
            result.keywords_for(SourceKind::ScrolledText),
            vec!["getty"]
        );
    }

    #[test]
    fn impressum_fallback_works_without_a_located_image() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);
        let sources = PageSources {
            page_url: "https://example.com".into(),
            impressum: Some(ImpressumPage {
                url: "https://example.com/impressum".into(),
                text: "Bildnachweis: alle Fotos von shutterstock und alamy".into(),
                screenshots: Vec::new(),
            }),
            ..PageSources::default()
        };

        let result = pipeline.detect(false, &sources, None);
        assert!(!result.image_found);
        assert_eq!(
            result.keywords_for(SourceKind::Impressum),
            vec!["shutterstock", "alamy"]
        );
    }

    #[test]
    fn impressum_screenshots_are_only_consulted_when_its_text_is_silent() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);
        let sources = PageSources {
            page_url: "https://example.com".into(),
            impressum: Some(ImpressumPage {
                url: "https://example.com/impressum".into(),
                text: "Bildnachweis: shutterstock".into(),
                screenshots: vec![b"scrolled view mentions getty".to_vec()],
            }),
            ..PageSources::default()
        };

        let result = pipeline.detect(false, &sources, Some(&EchoOcr));
        assert_eq!(
            result.keywords_for(SourceKind::Impressum),
            vec!["shutterstock"]
        );
    }

    #[test]
    fn impressum_screenshot_ocr_is_bounded() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher).with_max_impressum_scrolls(10);

        let mut screenshots: Vec<Vec<u8>> = (0..10).map(|_| b"no credits here".to_vec()).collect();
        screenshots.push(b"finally: getty".to_vec());

        let sources = PageSources {
            page_url: "https://example.com".into(),
            impressum: Some(ImpressumPage {
                url: "https://example.com/impressum".into(),
                text: String::new(),
                screenshots,
            }),
            ..PageSources::default()
        };

        let result = pipeline.detect(false, &sources, Some(&EchoOcr));
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn impressum_screenshot_ocr_finds_credits_within_the_bound() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);
        let sources = PageSources {
            page_url: "https://example.com".into(),
            impressum: Some(ImpressumPage {
                url: "https://example.com/impressum".into(),
                text: String::new(),
                screenshots: vec![
                    b"nothing in the first view".to_vec(),
                    b"photos licensed from istock".to_vec(),
                ],
            }),
            ..PageSources::default()
        };

        let result = pipeline.detect(false, &sources, Some(&EchoOcr));
        assert_eq!(result.keywords_for(SourceKind::Impressum), vec!["istock"]);
        assert_eq!(result.evidence.len(), 1);
        assert!(result.evidence[0].location.ends_with("screenshot 2"));
    }

    #[test]
    fn highlight_uses_the_first_match_in_priority_order() {
        let matcher = pipeline_matcher();
        let pipeline = CreditPipeline::new(&matcher);
        let sources = PageSources {
            page_url: "https://example.com/article".into(),
            scrolled: vec![scrolled("via AP Photo", "SPAN")],
            parent: Some("also shutterstock".into()),
            ..PageSources::default()
        };

        let result = pipeline.detect(true, &sources, None);
        assert_eq!(
            result.highlight_reference.as_deref(),
            Some("https://example.com/article#:~:text=ap%20photo")
        );
    }
}
