pub mod article_search;
pub mod providers;
pub mod recommendations;
pub mod recommender;

pub use recommender::{FeatureExtractor, FeatureVector, RankedRecommendation, Recommender};
