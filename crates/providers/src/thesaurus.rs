//! Word-association lookup (synonyms).
//!
//! A single pass-through call to a Datamuse-style "means like" endpoint.
//! All shaping happens client-side: keep plain lowercase alphabetic words,
//! sort by descending relevance score, truncate. An empty result set is an
//! upstream error, not an empty success.

use serde::Deserialize;
use tracing::debug;
use writebuddy_core::error::LookupError;

/// Client for the third-party word-association service.
pub struct ThesaurusClient {
    base_url: String,
    max_results: usize,
    client: reqwest::Client,
}

/// One scored entry from the upstream service.
#[derive(Debug, Clone, Deserialize)]
pub struct RelatedWord {
    pub word: String,
    #[serde(default)]
    pub score: i64,
}

impl ThesaurusClient {
    pub fn new(
        base_url: impl Into<String>,
        max_results: usize,
        timeout: std::time::Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results,
            client,
        }
    }

    /// Build a client from application config.
    pub fn from_config(config: &writebuddy_config::AppConfig) -> Self {
        Self::new(
            config.thesaurus.base_url.as_str(),
            config.thesaurus.max_results,
            std::time::Duration::from_secs(config.thesaurus.timeout_secs),
        )
    }

    /// Look up synonyms for a word.
    pub async fn synonyms(&self, word: &str) -> Result<Vec<String>, LookupError> {
        let url = format!("{}/words", self.base_url);

        debug!(word, "Looking up synonyms");

        let response = self
            .client
            .get(&url)
            .query(&[("ml", word)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Timeout(e.to_string())
                } else {
                    LookupError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(LookupError::BadPayload(format!(
                "Upstream returned status {}",
                response.status().as_u16()
            )));
        }

        let entries: Vec<RelatedWord> = response
            .json()
            .await
            .map_err(|e| LookupError::BadPayload(e.to_string()))?;

        let words = shape(entries, self.max_results);
        if words.is_empty() {
            return Err(LookupError::NoResults(word.to_string()));
        }
        Ok(words)
    }
}

/// Client-side shaping: alphabetic single words only, lowercased, sorted by
/// descending score, truncated to `max`.
fn shape(mut entries: Vec<RelatedWord>, max: usize) -> Vec<String> {
    entries.retain(|e| !e.word.is_empty() && e.word.chars().all(|c| c.is_ascii_alphabetic()));
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
        .into_iter()
        .take(max)
        .map(|e| e.word.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, score: i64) -> RelatedWord {
        RelatedWord {
            word: word.into(),
            score,
        }
    }

    #[test]
    fn sorts_by_descending_score() {
        let shaped = shape(
            vec![entry("glad", 50), entry("cheerful", 90), entry("content", 70)],
            10,
        );
        assert_eq!(shaped, vec!["cheerful", "content", "glad"]);
    }

    #[test]
    fn drops_phrases_and_non_alphabetic_entries() {
        let shaped = shape(
            vec![
                entry("joyful", 80),
                entry("on cloud nine", 75),
                entry("happy-go-lucky", 70),
                entry("over9000", 60),
            ],
            10,
        );
        assert_eq!(shaped, vec!["joyful"]);
    }

    #[test]
    fn lowercases_and_truncates() {
        let entries: Vec<RelatedWord> = (0..20)
            .map(|i| entry(if i == 0 { "Merry" } else { "glad" }, 100 - i))
            .collect();
        let shaped = shape(entries, 10);
        assert_eq!(shaped.len(), 10);
        assert_eq!(shaped[0], "merry");
    }

    #[test]
    fn empty_input_shapes_to_empty() {
        assert!(shape(Vec::new(), 10).is_empty());
    }

    #[test]
    fn parses_upstream_payload() {
        let payload = r#"[{"word":"happy","score":1000},{"word":"glad"}]"#;
        let entries: Vec<RelatedWord> = serde_json::from_str(payload).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].score, 0);
    }
}
