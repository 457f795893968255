//! Encyclopedia articles, comments and visit history

use std::borrow::Cow;

use beautywiki_domain::constants::DEFAULT_PAGE_SIZE;
use beautywiki_domain::types::{
    Article, ArticlePage, ArticleSummary, Comment, NewComment, VisitRecord,
};
use beautywiki_domain::{ApiRequest, Endpoint, HttpMethod};
use chrono::Utc;
use serde::de::IgnoredAny;
use tracing::debug;

use crate::api::{ApiError, NetworkClient};

/// `GET /api/articles`
#[derive(Debug, Clone, Copy)]
pub struct ArticleListEndpoint;

impl Endpoint for ArticleListEndpoint {
    type Request = ();
    type Response = ArticlePage;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/api/articles")
    }
}

/// `GET /api/articles/{id}`
#[derive(Debug, Clone, Copy)]
pub struct ArticleEndpoint {
    pub id: i64,
}

impl Endpoint for ArticleEndpoint {
    type Request = ();
    type Response = Article;

    fn path(&self) -> Cow<'_, str> {
        Cow::Owned(format!("/api/articles/{}", self.id))
    }
}

/// `GET /api/articles/search`
#[derive(Debug, Clone, Copy)]
pub struct SearchEndpoint;

impl Endpoint for SearchEndpoint {
    type Request = ();
    type Response = Vec<ArticleSummary>;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/api/articles/search")
    }
}

/// `GET /api/articles/{id}/comments`
#[derive(Debug, Clone, Copy)]
pub struct CommentListEndpoint {
    pub article_id: i64,
}

impl Endpoint for CommentListEndpoint {
    type Request = ();
    type Response = Vec<Comment>;

    fn path(&self) -> Cow<'_, str> {
        Cow::Owned(format!("/api/articles/{}/comments", self.article_id))
    }
}

/// `POST /api/articles/{id}/comments`
#[derive(Debug, Clone, Copy)]
pub struct PostCommentEndpoint {
    pub article_id: i64,
}

impl Endpoint for PostCommentEndpoint {
    type Request = NewComment;
    type Response = Comment;

    fn path(&self) -> Cow<'_, str> {
        Cow::Owned(format!("/api/articles/{}/comments", self.article_id))
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn requires_auth(&self) -> bool {
        true
    }
}

/// `POST /api/user/visits`
#[derive(Debug, Clone, Copy)]
pub struct VisitEndpoint;

impl Endpoint for VisitEndpoint {
    type Request = VisitRecord;
    type Response = IgnoredAny;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("/api/user/visits")
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn requires_auth(&self) -> bool {
        true
    }
}

/// Article browsing and discussion
#[derive(Clone)]
pub struct EncyclopediaService {
    client: NetworkClient,
}

impl EncyclopediaService {
    pub fn new(client: NetworkClient) -> Self {
        Self { client }
    }

    /// One page of articles, optionally within a category
    ///
    /// Pages start at 1; a `per_page` of 0 uses the default page size.
    pub async fn articles(
        &self,
        page: u32,
        per_page: u32,
        category: Option<&str>,
    ) -> Result<ArticlePage, ApiError> {
        let per_page = if per_page == 0 { DEFAULT_PAGE_SIZE } else { per_page };
        let mut request = ApiRequest::new(ArticleListEndpoint)
            .with_query("page", page.max(1).to_string())
            .with_query("per_page", per_page.to_string());
        if let Some(category) = category {
            request = request.with_query("category", category);
        }
        self.client.send(&request).await
    }

    pub async fn article(&self, id: i64) -> Result<Article, ApiError> {
        self.client.send(&ApiRequest::new(ArticleEndpoint { id })).await
    }

    pub async fn comments(&self, article_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.client.send(&ApiRequest::new(CommentListEndpoint { article_id })).await
    }

    /// Comment on an article as the signed-in user
    ///
    /// # Errors
    /// `TokenMissing` when signed out; a blank comment is refused locally
    /// with `Encoding`
    pub async fn post_comment(&self, article_id: i64, text: &str) -> Result<Comment, ApiError> {
        let content = text.trim();
        if content.is_empty() {
            return Err(ApiError::Encoding("comment text is empty".to_string()));
        }

        let request = ApiRequest::new(PostCommentEndpoint { article_id })
            .with_body(NewComment { content: content.to_string(), parent_id: None });
        self.client.send(&request).await
    }

    /// Record that the signed-in user opened an article
    pub async fn record_visit(&self, article_id: i64) -> Result<(), ApiError> {
        let request = ApiRequest::new(VisitEndpoint)
            .with_body(VisitRecord { article_id, visited_at: Utc::now() });
        self.client.send(&request).await?;
        debug!(article_id, "Visit recorded");
        Ok(())
    }

    /// Articles matching `keyword`; a blank keyword matches nothing
    pub async fn search(&self, keyword: &str) -> Result<Vec<ArticleSummary>, ApiError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        let request = ApiRequest::new(SearchEndpoint).with_query("keyword", keyword);
        self.client.send(&request).await
    }
}
