pub mod candidates;
pub mod catalog;
pub mod ledger;
pub mod providers;
pub mod recommendations;
pub mod scoring;
pub mod taste;
pub mod user_context;

pub use catalog::RecipeCatalog;
pub use ledger::{LowRatedSet, RatingLedger};
pub use recommendations::{rank_recommendations, RankingOptions, RecommendationOutcome};
pub use user_context::UserContext;
