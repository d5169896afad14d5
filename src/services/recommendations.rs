use std::collections::HashSet;
use std::time::Instant;

use uuid::Uuid;

use crate::models::Article;
use crate::services::recommender::{RankedRecommendation, Recommender};

/// Computes ranked recommendations for a user
///
/// Builds an interest profile from the user's favorited articles, scores
/// every non-excluded corpus article against it and returns the top `limit`
/// results. `exclude_ids` is expected to hold the ids of the articles the
/// user already favorited so they are never recommended back.
///
/// Pure computation over the provided collections; callers with no
/// authenticated user pass empty favorites and exclusions and receive the
/// zero-score, recency-ordered corpus.
pub fn recommend_articles(
    favorites: &[Article],
    corpus: &[Article],
    exclude_ids: &HashSet<Uuid>,
    limit: usize,
) -> Vec<RankedRecommendation> {
    let start = Instant::now();

    tracing::info!(
        favorites = favorites.len(),
        corpus = corpus.len(),
        excluded = exclude_ids.len(),
        limit,
        "Computing recommendations"
    );

    let recommender = Recommender::new(favorites, corpus);
    let ranked = recommender.recommend(exclude_ids, limit);

    tracing::info!(
        returned = ranked.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendations computed"
    );

    ranked
}
