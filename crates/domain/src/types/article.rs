//! Encyclopedia article and comment models

use beautywiki_common::utils::{wire_date, wire_date_option};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article as listed in a category or search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default, with = "wire_date_option")]
    pub published_at: Option<DateTime<Utc>>,
}

/// One page of article summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    #[serde(default)]
    pub items: Vec<ArticleSummary>,
    #[serde(default)]
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl ArticlePage {
    /// Whether pages exist after this one
    #[must_use]
    pub fn has_more(&self) -> bool {
        u64::from(self.page) * u64::from(self.per_page) < self.total
    }
}

/// Full article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    /// HTML body, rendered by the caller
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(with = "wire_date")]
    pub published_at: DateTime<Utc>,
    #[serde(default, with = "wire_date_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Comment author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    pub user_id: i64,
    pub nickname: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Comment on an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub article_id: i64,
    pub author: CommentAuthor,
    pub content: String,
    /// Comment this one replies to
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default, with = "wire_date_option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a new comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

/// Visit history entry sent when an article is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub article_id: i64,
    /// Encoded as ISO-8601
    pub visited_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_page_decodes_with_missing_optionals() {
        let json = r#"{
            "items": [
                {"id": 1, "title": "Niacinamide", "publishedAt": "2025-03-02 08:30:00"},
                {"id": 2, "title": "Retinol", "viewCount": 12}
            ],
            "total": 45,
            "page": 2,
            "perPage": 20
        }"#;
        let page: ArticlePage = serde_json::from_str(json).unwrap();

        assert_eq!(page.items.len(), 2);
        assert!(page.items[0].published_at.is_some());
        assert_eq!(page.items[1].view_count, 12);
        assert!(page.has_more());
    }

    #[test]
    fn test_last_page_has_no_more() {
        let page = ArticlePage { items: Vec::new(), total: 40, page: 2, per_page: 20 };
        assert!(!page.has_more());
    }

    #[test]
    fn test_new_comment_omits_missing_parent() {
        let body = NewComment { content: "Helpful".into(), parent_id: None };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"content": "Helpful"}));
    }

    #[test]
    fn test_visit_record_serializes_iso8601() {
        use chrono::TimeZone;

        let record = VisitRecord {
            article_id: 9,
            visited_at: Utc.with_ymd_and_hms(2025, 6, 1, 4, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["visitedAt"], "2025-06-01T04:00:00Z");
    }
}
