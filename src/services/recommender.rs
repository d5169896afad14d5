use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::Article;

/// Tokens shorter than this are discarded by the extractor
const MIN_TOKEN_LEN: usize = 3;

/// Weight assigned to the synthetic category and source terms
const TAG_WEIGHT: f64 = 1.0;

/// Common English words carrying no topical signal
const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "was", "were", "you", "your", "has", "have",
    "had", "his", "her", "its", "our", "their", "this", "that", "these", "those", "with",
    "from", "they", "them", "been", "will", "would", "could", "should", "than", "then",
    "what", "when", "where", "which", "while", "who", "whom", "why", "how", "all", "any",
    "each", "more", "most", "some", "such", "into", "over", "after", "before", "about",
    "against", "between", "through", "during", "out", "off", "above", "below", "there",
    "here", "can", "just", "also", "very", "too", "say", "says", "said",
];

/// Sparse weighted-term representation of an article
///
/// Weights are non-negative. An article with no extractable text and no
/// category or source yields an empty vector, which scores zero against
/// everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    weights: HashMap<String, f64>,
}

impl FeatureVector {
    /// Creates an empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the vector has no terms
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Weight of a term, 0.0 when absent
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    /// Sets the weight of a term
    pub fn insert(&mut self, term: String, weight: f64) {
        self.weights.insert(term, weight);
    }

    /// Adds every term of `other` into this vector, summing weights
    pub fn merge(&mut self, other: &FeatureVector) {
        for (term, weight) in &other.weights {
            *self.weights.entry(term.clone()).or_insert(0.0) += weight;
        }
    }

    /// Euclidean norm of the weights
    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }
}

/// Cosine similarity between two sparse vectors
///
/// Dot product over shared terms divided by the product of the norms.
/// Defined as 0.0 when either vector is empty, so degenerate inputs never
/// produce NaN or an error.
pub fn cosine_similarity(profile: &FeatureVector, candidate: &FeatureVector) -> f64 {
    let norm_product = profile.norm() * candidate.norm();
    if norm_product == 0.0 {
        return 0.0;
    }

    let dot: f64 = profile
        .weights
        .iter()
        .map(|(term, weight)| weight * candidate.weight(term))
        .sum();

    dot / norm_product
}

/// Turns articles into comparable feature vectors
///
/// Title and description are tokenized case-insensitively on
/// non-alphanumeric boundaries; short tokens and stop words are dropped and
/// the remaining tokens weighted by their share of the article's kept
/// tokens, which keeps every text weight in [0, 1] regardless of article
/// length. The category label and source id are injected as fixed-weight
/// tags so topical and source affinity count alongside the text.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    stop_words: HashSet<String>,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS)
    }
}

impl FeatureExtractor {
    /// Creates an extractor with the given stop-word set
    pub fn new(stop_words: &[&str]) -> Self {
        Self {
            stop_words: stop_words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Extracts the feature vector of an article
    ///
    /// Deterministic and side-effect free; an article with nothing to
    /// extract yields an empty vector, not an error.
    pub fn extract(&self, article: &Article) -> FeatureVector {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut total = 0usize;

        for text in [&article.title, &article.description] {
            for raw in text.split(|c: char| !c.is_alphanumeric()) {
                if raw.chars().count() < MIN_TOKEN_LEN {
                    continue;
                }
                let token = raw.to_lowercase();
                if self.stop_words.contains(&token) {
                    continue;
                }
                *counts.entry(token).or_insert(0) += 1;
                total += 1;
            }
        }

        let mut vector = FeatureVector::new();
        for (token, count) in counts {
            vector.insert(token, count as f64 / total as f64);
        }

        if let Some(category) = article.category.as_deref() {
            let category = category.trim().to_lowercase();
            if !category.is_empty() {
                vector.insert(format!("category:{}", category), TAG_WEIGHT);
            }
        }

        let source = article.source.trim().to_lowercase();
        if !source.is_empty() {
            vector.insert(format!("source:{}", source), TAG_WEIGHT);
        }

        vector
    }
}

/// A scored article in a recommendation result
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecommendation {
    pub article: Article,
    /// Finite, non-negative affinity against the user's interest profile
    pub score: f64,
}

/// Ranks unfavorited corpus articles against a user's favorites
pub struct Recommender<'a> {
    extractor: FeatureExtractor,
    favorites: &'a [Article],
    corpus: &'a [Article],
}

impl<'a> Recommender<'a> {
    /// Creates a recommender over the given favorites and corpus
    pub fn new(favorites: &'a [Article], corpus: &'a [Article]) -> Self {
        Self {
            extractor: FeatureExtractor::default(),
            favorites,
            corpus,
        }
    }

    /// Aggregates the favorites into a single interest profile
    ///
    /// Weights are summed per term across favorites without renormalizing,
    /// so repeated topical signal across favorites weighs more. No
    /// favorites means an empty profile, which scores zero everywhere.
    fn build_profile(&self) -> FeatureVector {
        let mut profile = FeatureVector::new();
        for favorite in self.favorites {
            profile.merge(&self.extractor.extract(favorite));
        }
        profile
    }

    /// Computes the top `top_k` recommendations
    ///
    /// Corpus articles whose id is in `exclude_ids` (typically the user's
    /// favorites) are skipped. The result is sorted by score descending,
    /// ties broken by publication time descending and then id ascending,
    /// which makes the ordering a total order and repeated calls
    /// deterministic. Empty favorites or corpus produce a valid, possibly
    /// empty, zero-score list rather than an error.
    pub fn recommend(
        &self,
        exclude_ids: &HashSet<Uuid>,
        top_k: usize,
    ) -> Vec<RankedRecommendation> {
        if top_k == 0 {
            return Vec::new();
        }

        let profile = self.build_profile();

        let mut ranked: Vec<RankedRecommendation> = self
            .corpus
            .iter()
            .filter(|article| !exclude_ids.contains(&article.id))
            .map(|article| {
                let features = self.extractor.extract(article);
                RankedRecommendation {
                    score: cosine_similarity(&profile, &features),
                    article: article.clone(),
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.article.published_at.cmp(&a.article.published_at))
                .then_with(|| a.article.id.cmp(&b.article.id))
        });

        ranked.truncate(top_k);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    const EPSILON: f64 = 1e-9;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn article(
        slug: &str,
        title: &str,
        description: &str,
        category: Option<&str>,
        source: &str,
        published_at: DateTime<Utc>,
    ) -> Article {
        Article::new(
            title.to_string(),
            description.to_string(),
            format!("https://example.com/{}", slug),
            category.map(str::to_string),
            source.to_string(),
            published_at,
        )
    }

    /// Bare article with a chosen id, for tie-break tests
    fn article_with_id(id: u128, published_at: DateTime<Utc>) -> Article {
        Article {
            id: Uuid::from_u128(id),
            title: String::new(),
            description: String::new(),
            url: format!("https://example.com/{}", id),
            category: None,
            source: String::new(),
            published_at,
        }
    }

    // Feature extraction

    #[test]
    fn test_extract_normalizes_term_frequencies() {
        let extractor = FeatureExtractor::default();
        let a = article(
            "btc",
            "Bitcoin rises",
            "Bitcoin falls again",
            None,
            "",
            ts(9),
        );

        let features = extractor.extract(&a);

        // 5 kept tokens, "bitcoin" appears twice
        assert!((features.weight("bitcoin") - 0.4).abs() < EPSILON);
        assert!((features.weight("rises") - 0.2).abs() < EPSILON);
        assert!((features.weight("falls") - 0.2).abs() < EPSILON);
        assert!((features.weight("again") - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_extract_drops_short_tokens_and_stop_words() {
        let extractor = FeatureExtractor::default();
        let a = article("cat", "The cat is on a mat", "", None, "", ts(9));

        let features = extractor.extract(&a);

        assert_eq!(features.len(), 2);
        assert!((features.weight("cat") - 0.5).abs() < EPSILON);
        assert!((features.weight("mat") - 0.5).abs() < EPSILON);
        assert_eq!(features.weight("the"), 0.0);
        assert_eq!(features.weight("is"), 0.0);
    }

    #[test]
    fn test_extract_injects_category_and_source_tags() {
        let extractor = FeatureExtractor::default();
        let a = article("tagged", "", "", Some("Finance"), "Daily-Ledger", ts(9));

        let features = extractor.extract(&a);

        assert_eq!(features.len(), 2);
        assert!((features.weight("category:finance") - 1.0).abs() < EPSILON);
        assert!((features.weight("source:daily-ledger") - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_extract_empty_article_yields_empty_vector() {
        let extractor = FeatureExtractor::default();
        let a = article("empty", "", "", None, "", ts(9));

        let features = extractor.extract(&a);
        assert!(features.is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = FeatureExtractor::default();
        let a = article(
            "idem",
            "Stock market rallies",
            "Shares climbed across the board",
            Some("finance"),
            "daily-ledger",
            ts(9),
        );

        assert_eq!(extractor.extract(&a), extractor.extract(&a));
    }

    #[test]
    fn test_custom_stop_words() {
        let extractor = FeatureExtractor::new(&["bitcoin"]);
        let a = article("btc", "Bitcoin rises", "", None, "", ts(9));

        let features = extractor.extract(&a);
        assert_eq!(features.weight("bitcoin"), 0.0);
        assert!((features.weight("rises") - 1.0).abs() < EPSILON);
    }

    // Similarity

    #[test]
    fn test_cosine_identical_vectors() {
        let mut v = FeatureVector::new();
        v.insert("stocks".to_string(), 0.5);
        v.insert("category:finance".to_string(), 1.0);

        assert!((cosine_similarity(&v, &v) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cosine_disjoint_vectors() {
        let mut a = FeatureVector::new();
        a.insert("stocks".to_string(), 1.0);
        let mut b = FeatureVector::new();
        b.insert("weather".to_string(), 1.0);

        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero_not_nan() {
        let empty = FeatureVector::new();
        let mut v = FeatureVector::new();
        v.insert("stocks".to_string(), 1.0);

        assert_eq!(cosine_similarity(&empty, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &empty), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_merge_sums_weights() {
        let mut a = FeatureVector::new();
        a.insert("stocks".to_string(), 0.4);
        let mut b = FeatureVector::new();
        b.insert("stocks".to_string(), 0.3);
        b.insert("earnings".to_string(), 0.2);

        a.merge(&b);

        assert!((a.weight("stocks") - 0.7).abs() < EPSILON);
        assert!((a.weight("earnings") - 0.2).abs() < EPSILON);
    }

    // Ranking

    #[test]
    fn test_recommend_scores_shared_topic_above_unrelated() {
        let favorite = article(
            "fav",
            "Stock market rallies",
            "",
            Some("finance"),
            "daily-ledger",
            ts(9),
        );
        let surge = article(
            "surge",
            "Stocks surge on earnings",
            "",
            Some("finance"),
            "wire-desk",
            ts(10),
        );
        let weather = article(
            "weather",
            "Local weather update",
            "",
            Some("weather"),
            "city-desk",
            ts(11),
        );

        let favorites = vec![favorite.clone()];
        let corpus = vec![favorite.clone(), surge.clone(), weather.clone()];
        let exclude: HashSet<Uuid> = [favorite.id].into_iter().collect();

        let recommender = Recommender::new(&favorites, &corpus);
        let ranked = recommender.recommend(&exclude, 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].article.id, surge.id);
        assert!(ranked[0].score > 0.0);
        assert_eq!(ranked[1].article.id, weather.id);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_recommend_never_returns_excluded_articles() {
        let favorites: Vec<Article> = Vec::new();
        let corpus = vec![
            article_with_id(1, ts(9)),
            article_with_id(2, ts(10)),
            article_with_id(3, ts(11)),
        ];
        let exclude: HashSet<Uuid> = [Uuid::from_u128(2)].into_iter().collect();

        let recommender = Recommender::new(&favorites, &corpus);
        let ranked = recommender.recommend(&exclude, 10);

        assert_eq!(ranked.len(), 2);
        assert!(ranked
            .iter()
            .all(|r| r.article.id != Uuid::from_u128(2)));
    }

    #[test]
    fn test_recommend_top_k_bound() {
        let favorites: Vec<Article> = Vec::new();
        let corpus: Vec<Article> = (1..=5).map(|i| article_with_id(i, ts(9))).collect();
        let exclude = HashSet::new();

        let recommender = Recommender::new(&favorites, &corpus);

        assert_eq!(recommender.recommend(&exclude, 3).len(), 3);
        // Fewer candidates than requested
        assert_eq!(recommender.recommend(&exclude, 10).len(), 5);
        assert!(recommender.recommend(&exclude, 0).is_empty());
    }

    #[test]
    fn test_recommend_empty_corpus() {
        let favorites = vec![article(
            "fav",
            "Stock market rallies",
            "",
            Some("finance"),
            "daily-ledger",
            ts(9),
        )];
        let corpus: Vec<Article> = Vec::new();

        let recommender = Recommender::new(&favorites, &corpus);
        assert!(recommender.recommend(&HashSet::new(), 10).is_empty());
    }

    #[test]
    fn test_recommend_no_favorites_falls_back_to_recency() {
        let favorites: Vec<Article> = Vec::new();
        let corpus = vec![
            article_with_id(1, ts(9)),
            article_with_id(2, ts(11)),
            article_with_id(3, ts(10)),
        ];

        let recommender = Recommender::new(&favorites, &corpus);
        let ranked = recommender.recommend(&HashSet::new(), 10);

        assert!(ranked.iter().all(|r| r.score == 0.0));
        let ids: Vec<Uuid> = ranked.iter().map(|r| r.article.id).collect();
        assert_eq!(
            ids,
            vec![
                Uuid::from_u128(2),
                Uuid::from_u128(3),
                Uuid::from_u128(1)
            ]
        );
    }

    #[test]
    fn test_recommend_equal_score_and_time_breaks_tie_by_id() {
        let favorites: Vec<Article> = Vec::new();
        let corpus = vec![
            article_with_id(7, ts(10)),
            article_with_id(2, ts(10)),
            article_with_id(5, ts(10)),
        ];

        let recommender = Recommender::new(&favorites, &corpus);
        let ranked = recommender.recommend(&HashSet::new(), 10);

        let ids: Vec<Uuid> = ranked.iter().map(|r| r.article.id).collect();
        assert_eq!(
            ids,
            vec![
                Uuid::from_u128(2),
                Uuid::from_u128(5),
                Uuid::from_u128(7)
            ]
        );
    }

    #[test]
    fn test_recommend_scores_are_monotonically_decreasing() {
        let favorites = vec![article(
            "fav",
            "Stock market rallies on strong earnings",
            "",
            Some("finance"),
            "daily-ledger",
            ts(9),
        )];
        let corpus = vec![
            article(
                "a",
                "Stocks surge on earnings",
                "",
                Some("finance"),
                "wire-desk",
                ts(10),
            ),
            article(
                "b",
                "Market rallies continue",
                "",
                Some("finance"),
                "wire-desk",
                ts(10),
            ),
            article("c", "Local weather update", "", None, "city-desk", ts(10)),
            article(
                "d",
                "Championship final tonight",
                "",
                Some("sports"),
                "city-desk",
                ts(10),
            ),
        ];

        let recommender = Recommender::new(&favorites, &corpus);
        let ranked = recommender.recommend(&HashSet::new(), 10);

        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let favorites = vec![article(
            "fav",
            "Stock market rallies",
            "",
            Some("finance"),
            "daily-ledger",
            ts(9),
        )];
        let corpus: Vec<Article> = (1..=20)
            .map(|i| {
                article(
                    &format!("article-{}", i),
                    "Stocks and earnings news roundup",
                    "",
                    Some("finance"),
                    "wire-desk",
                    ts(9),
                )
            })
            .collect();

        let recommender = Recommender::new(&favorites, &corpus);
        let first = recommender.recommend(&HashSet::new(), 10);
        let second = recommender.recommend(&HashSet::new(), 10);

        assert_eq!(first, second);
    }

    #[test]
    fn test_profile_accumulates_across_favorites() {
        let favorites = vec![
            article("f1", "Stocks rally", "", Some("finance"), "daily-ledger", ts(8)),
            article("f2", "Stocks slide", "", Some("finance"), "daily-ledger", ts(9)),
        ];
        let finance = article(
            "c1",
            "Stocks steady",
            "",
            Some("finance"),
            "wire-desk",
            ts(10),
        );
        let sports = article(
            "c2",
            "Match report",
            "",
            Some("sports"),
            "wire-desk",
            ts(10),
        );
        let corpus = vec![finance.clone(), sports.clone()];

        let recommender = Recommender::new(&favorites, &corpus);
        let ranked = recommender.recommend(&HashSet::new(), 10);

        assert_eq!(ranked[0].article.id, finance.id);
        assert!(ranked[0].score > ranked[1].score);
    }
}
