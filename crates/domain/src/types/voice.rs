//! Voice search models

use serde::{Deserialize, Serialize};

/// Transcript sent to the voice search host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSearchRequest {
    pub query: String,
    pub top_k: u32,
}

/// Nearest articles for a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSearchResponse {
    #[serde(default)]
    pub matches: Vec<VoiceMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceMatch {
    pub article_id: i64,
    pub title: String,
    /// Similarity, higher is closer
    pub score: f64,
}

impl VoiceSearchResponse {
    /// Best match, if any
    #[must_use]
    pub fn best(&self) -> Option<&VoiceMatch> {
        self.matches.iter().max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_match_is_highest_score() {
        let response = VoiceSearchResponse {
            matches: vec![
                VoiceMatch { article_id: 1, title: "Sunscreen".into(), score: 0.42 },
                VoiceMatch { article_id: 2, title: "Vitamin C".into(), score: 0.91 },
            ],
        };
        assert_eq!(response.best().map(|m| m.article_id), Some(2));
        assert!(VoiceSearchResponse { matches: Vec::new() }.best().is_none());
    }
}
