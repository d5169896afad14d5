use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{Article, Comment, Favorite, Source, UserPreferences};
use crate::services::recommender::RankedRecommendation;
use crate::services::{article_search, recommendations};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub url: String,
    pub category: Option<String>,
    pub source: String,
    pub published_at: DateTime<Utc>,
}

impl From<&Article> for ArticleResponse {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            description: article.description.clone(),
            url: article.url.clone(),
            category: article.category.clone(),
            source: article.source.clone(),
            published_at: article.published_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
    pub source: String,
    /// Defaults to the ingestion time when omitted
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub user_id: String,
    pub article_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id.clone(),
            article_id: comment.article_id,
            body: comment.body.clone(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleDetailResponse {
    pub article: ArticleResponse,
    /// Whether the current user has favorited this article
    pub favorited: bool,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize)]
pub struct SetPreferencesRequest {
    pub sources: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct PreferencesOverviewResponse {
    pub preferences: UserPreferences,
    /// Corpus articles matching the preferences
    pub articles: Vec<ArticleResponse>,
    pub favorites: Vec<FavoriteResponse>,
}

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub article_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub article: ArticleResponse,
    pub favorited_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub article_id: Uuid,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendedQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub article: ArticleResponse,
    pub score: f64,
}

impl From<&RankedRecommendation> for RecommendationResponse {
    fn from(ranked: &RankedRecommendation) -> Self {
        Self {
            article: ArticleResponse::from(&ranked.article),
            score: ranked.score,
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Search or list articles
///
/// With `?q=` the provider is queried and the results are ingested into the
/// corpus before being returned. Without a query the current corpus is
/// listed, newest first.
pub async fn search_articles(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<ArticleResponse>>> {
    match params.q.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => {
            let articles = article_search::search_articles(state.provider.clone(), query).await?;

            let responses: Vec<ArticleResponse> =
                articles.iter().map(ArticleResponse::from).collect();

            let mut inner = state.inner.write().await;
            for article in articles {
                inner.ingest_article(article);
            }

            Ok(Json(responses))
        }
        _ => {
            let inner = state.inner.read().await;
            let mut articles: Vec<&Article> = inner.articles.values().collect();
            articles.sort_by(|a, b| {
                b.published_at
                    .cmp(&a.published_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            Ok(Json(articles.into_iter().map(ArticleResponse::from).collect()))
        }
    }
}

/// Ingest a single article into the corpus
pub async fn create_article(
    State(state): State<AppState>,
    Json(request): Json<CreateArticleRequest>,
) -> AppResult<(StatusCode, Json<ArticleResponse>)> {
    if request.url.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Article URL cannot be empty".to_string(),
        ));
    }
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Article title cannot be empty".to_string(),
        ));
    }

    let article = Article::new(
        request.title,
        request.description,
        request.url,
        request.category,
        request.source,
        request.published_at.unwrap_or_else(Utc::now),
    );
    let response = ArticleResponse::from(&article);

    let mut inner = state.inner.write().await;
    inner.ingest_article(article);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Article detail with the current user's favorited flag and its comments
pub async fn get_article(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ArticleDetailResponse>> {
    let inner = state.inner.read().await;

    let article = inner
        .articles
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("No article with id {}", id)))?;

    let favorited = user
        .id()
        .map(|user_id| {
            inner
                .favorites_for(user_id)
                .iter()
                .any(|f| f.article_id == id)
        })
        .unwrap_or(false);

    let comments = inner
        .comments
        .get(&id)
        .map(|comments| comments.iter().map(CommentResponse::from).collect())
        .unwrap_or_default();

    Ok(Json(ArticleDetailResponse {
        article: ArticleResponse::from(article),
        favorited,
        comments,
    }))
}

/// Source catalog from the news provider
pub async fn get_sources(State(state): State<AppState>) -> AppResult<Json<Vec<Source>>> {
    let sources = state.provider.fetch_sources().await?;
    Ok(Json(sources))
}

/// The current user's preferences with the matching slice of the corpus
/// and their favorites
pub async fn get_preferences(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<PreferencesOverviewResponse>> {
    let inner = state.inner.read().await;

    let preferences = user
        .id()
        .and_then(|user_id| inner.preferences.get(user_id).cloned())
        .unwrap_or_default();

    let mut matching: Vec<&Article> = inner
        .articles
        .values()
        .filter(|article| preferences.matches(article))
        .collect();
    matching.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let favorites = user
        .id()
        .map(|user_id| favorite_responses(&inner, user_id))
        .unwrap_or_default();

    Ok(Json(PreferencesOverviewResponse {
        preferences,
        articles: matching.into_iter().map(ArticleResponse::from).collect(),
        favorites,
    }))
}

/// Update the current user's preferences
pub async fn set_preferences(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<SetPreferencesRequest>,
) -> AppResult<Json<UserPreferences>> {
    let user_id = user.require()?;

    let mut inner = state.inner.write().await;
    let preferences = inner
        .preferences
        .entry(user_id.to_string())
        .or_default();

    if let Some(sources) = request.sources {
        preferences.set_sources(sources);
    }
    if let Some(categories) = request.categories {
        preferences.set_categories(categories);
    }

    Ok(Json(preferences.clone()))
}

/// The current user's favorites; empty for anonymous callers
pub async fn get_favorites(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<FavoriteResponse>>> {
    let inner = state.inner.read().await;

    let favorites = user
        .id()
        .map(|user_id| favorite_responses(&inner, user_id))
        .unwrap_or_default();

    Ok(Json(favorites))
}

/// Favorite an article for the current user
pub async fn add_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<FavoriteResponse>)> {
    let user_id = user.require()?.to_string();

    let mut inner = state.inner.write().await;

    let article = inner
        .articles
        .get(&request.article_id)
        .ok_or_else(|| AppError::NotFound(format!("No article with id {}", request.article_id)))?;
    let article_response = ArticleResponse::from(article);

    let favorites = inner.favorites.entry(user_id.clone()).or_default();

    // Favoriting twice is a no-op
    let favorite = match favorites.iter().find(|f| f.article_id == request.article_id) {
        Some(existing) => existing.clone(),
        None => {
            let favorite = Favorite::new(user_id, request.article_id);
            favorites.push(favorite.clone());
            favorite
        }
    };

    tracing::info!(
        article_id = %request.article_id,
        "Favorite added"
    );

    Ok((
        StatusCode::CREATED,
        Json(FavoriteResponse {
            article: article_response,
            favorited_at: favorite.favorited_at,
        }),
    ))
}

/// Comment on an article as the current user
pub async fn add_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<AddCommentRequest>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let user_id = user.require()?.to_string();

    if request.body.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Comment body cannot be empty".to_string(),
        ));
    }

    let mut inner = state.inner.write().await;

    if !inner.articles.contains_key(&request.article_id) {
        return Err(AppError::NotFound(format!(
            "No article with id {}",
            request.article_id
        )));
    }

    let comment = Comment::new(user_id, request.article_id, request.body);
    let response = CommentResponse::from(&comment);

    inner
        .comments
        .entry(request.article_id)
        .or_default()
        .push(comment);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Ranked article recommendations for the current user
///
/// Anonymous callers get the full corpus at score zero, ordered by recency.
pub async fn get_recommended(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<RecommendedQuery>,
) -> AppResult<Json<Vec<RecommendationResponse>>> {
    let inner = state.inner.read().await;

    let (favorite_articles, exclude_ids) = match user.id() {
        Some(user_id) => {
            let favorites = inner.favorites_for(user_id);
            let articles: Vec<Article> = favorites
                .iter()
                .filter_map(|f| inner.articles.get(&f.article_id).cloned())
                .collect();
            let exclude: HashSet<Uuid> = favorites.iter().map(|f| f.article_id).collect();
            (articles, exclude)
        }
        None => (Vec::new(), HashSet::new()),
    };

    let corpus: Vec<Article> = inner.articles.values().cloned().collect();
    let limit = params.limit.unwrap_or(state.recommendation_limit);

    let ranked =
        recommendations::recommend_articles(&favorite_articles, &corpus, &exclude_ids, limit);

    Ok(Json(ranked.iter().map(RecommendationResponse::from).collect()))
}

/// Resolves a user's favorites against the corpus
fn favorite_responses(
    inner: &super::state::AppStateInner,
    user_id: &str,
) -> Vec<FavoriteResponse> {
    inner
        .favorites_for(user_id)
        .iter()
        .filter_map(|favorite| {
            inner
                .articles
                .get(&favorite.article_id)
                .map(|article| FavoriteResponse {
                    article: ArticleResponse::from(article),
                    favorited_at: favorite.favorited_at,
                })
        })
        .collect()
}
