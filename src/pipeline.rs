use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::completion::CompletionOracle;
use crate::composer::ContentComposer;
use crate::data_models::KeywordResult;
use crate::expander::KeywordExpander;

const BING_SEARCH_PREFIX: &str = "https://www.bing.com/search?q=";

/// Minimum spacing between consecutive oracle-bound seeds.
const PACING_INTERVAL: Duration = Duration::from_millis(500);

/// Interval limiter bounding the oracle call rate. Callers await `wait`
/// before starting work on a seed; the mutex is held across the sleep so the
/// ceiling also holds when several batches are in flight at once.
pub struct Pacer {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Pacer {
        Pacer {
            interval,
            last: Mutex::new(None),
        }
    }

    pub async fn wait(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Split raw multi-line input into seed keywords: one per line, trimmed,
/// empty lines dropped, input order kept.
pub fn split_seed_keywords(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// `q=` query with the seed and its related keywords joined by full-width
/// commas. No percent-encoding; the frontend pastes the URL as-is.
pub fn build_bing_url(main: &str, related: &[String]) -> String {
    let mut parts = Vec::with_capacity(related.len() + 1);
    parts.push(main.to_string());
    parts.extend(related.iter().cloned());
    format!("{}{}", BING_SEARCH_PREFIX, parts.join("，"))
}

/// Drives the whole batch: seed splitting, per-seed expansion and content
/// generation, artifact assembly, and failure isolation. One instance is
/// built at startup and shared across requests; it keeps no per-batch state.
pub struct KeywordPipeline {
    expander: KeywordExpander,
    composer: ContentComposer,
    pacer: Pacer,
}

impl KeywordPipeline {
    pub fn new(oracle: Arc<dyn CompletionOracle>) -> KeywordPipeline {
        Self::with_pacing(oracle, PACING_INTERVAL)
    }

    pub fn with_pacing(oracle: Arc<dyn CompletionOracle>, interval: Duration) -> KeywordPipeline {
        KeywordPipeline {
            expander: KeywordExpander::new(oracle.clone()),
            composer: ContentComposer::new(oracle),
            pacer: Pacer::new(interval),
        }
    }

    /// Process a raw keyword batch against a target URL. Errors only on an
    /// empty seed list; every per-keyword failure is captured in its own
    /// result entry and never aborts the rest of the batch.
    pub async fn process(&self, raw_keywords: &str, target_url: &str) -> Result<Vec<KeywordResult>> {
        let seeds = split_seed_keywords(raw_keywords);
        if seeds.is_empty() {
            anyhow::bail!("关键词不能为空");
        }

        let mut results = Vec::with_capacity(seeds.len());
        for seed in seeds {
            self.pacer.wait().await;
            results.push(self.process_one(&seed, target_url).await);
        }
        Ok(results)
    }

    async fn process_one(&self, seed: &str, target_url: &str) -> KeywordResult {
        log::info!("generating content for keyword: {seed}");

        let related = match self.expander.expand(seed).await {
            Ok(related) => related,
            Err(e) => {
                log::error!("keyword expansion failed for {seed}, error: {e}");
                return KeywordResult::Failure {
                    main: seed.to_string(),
                    error: e.to_string(),
                };
            }
        };

        let content = match self.composer.compose(seed, &related, target_url).await {
            Ok(content) => content,
            Err(e) => {
                log::error!("content generation failed for {seed}, error: {e}");
                return KeywordResult::Failure {
                    main: seed.to_string(),
                    error: e.to_string(),
                };
            }
        };

        let bing_url = build_bing_url(seed, &related);

        KeywordResult::Success {
            main: seed.to_string(),
            related,
            bing_url,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trims_and_drops_empty_lines() {
        let raw = "  词一  \n\n词二\n   \n词三\n";
        assert_eq!(split_seed_keywords(raw), vec!["词一", "词二", "词三"]);
    }

    #[test]
    fn test_split_preserves_input_order() {
        let raw = "c\na\nb";
        assert_eq!(split_seed_keywords(raw), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_split_blank_input_yields_nothing() {
        assert!(split_seed_keywords("   \n  \n").is_empty());
        assert!(split_seed_keywords("").is_empty());
    }

    #[test]
    fn test_bing_url_joins_main_then_related() {
        let related = vec!["词1".to_string(), "词2".to_string()];
        assert_eq!(
            build_bing_url("主词", &related),
            "https://www.bing.com/search?q=主词，词1，词2"
        );
    }

    #[test]
    fn test_bing_url_without_related_keywords() {
        assert_eq!(
            build_bing_url("主词", &[]),
            "https://www.bing.com/search?q=主词"
        );
    }

    #[tokio::test]
    async fn test_pacer_spaces_out_consecutive_waits() {
        let pacer = Pacer::new(Duration::from_millis(50));
        let start = Instant::now();
        pacer.wait().await; // first caller is not delayed
        pacer.wait().await;
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
