use std::collections::HashSet;

use rand::Rng;

use crate::{
    models::{ProfiledCandidate, Recommendation},
    services::{
        catalog::RecipeCatalog,
        scoring::{predict_recipe_score, ScoringConfig},
        user_context::UserContext,
    },
};

pub const DEFAULT_TOP_N: usize = 3;

/// Score range for users without a context
const ANONYMOUS_SCORE_MIN: f64 = 3.0;
const ANONYMOUS_SCORE_MAX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingOptions {
    pub top_n: usize,
    /// One recipe per cuisine until every cuisine present is represented
    pub diverse: bool,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            diverse: false,
        }
    }
}

/// Result of a recommendation request
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    Ranked(Vec<Recommendation>),
    /// Nothing was left to rank once low-rated titles were removed
    NoCandidates,
    /// No usable ingredients were supplied
    EmptyInventory,
}

impl RecommendationOutcome {
    pub fn recommendations(&self) -> &[Recommendation] {
        match self {
            RecommendationOutcome::Ranked(list) => list,
            _ => &[],
        }
    }
}

/// Scores, filters and ranks profiled candidates for one user
///
/// Without a user every candidate gets a uniform draw in [3, 5]. Every
/// candidate is added to the catalog whether or not it is recommended.
///
/// Ranking is a stable sort on score, so equal scores keep input order.
/// Duplicate titles keep their best-ranked entry. When no candidate survives
/// the low-rated filter the outcome is [`RecommendationOutcome::NoCandidates`].
pub fn rank_recommendations<R: Rng + ?Sized>(
    candidates: Vec<ProfiledCandidate>,
    user: Option<&UserContext>,
    catalog: &mut RecipeCatalog,
    options: &RankingOptions,
    scoring: &ScoringConfig,
    rng: &mut R,
) -> RecommendationOutcome {
    if candidates.is_empty() {
        return RecommendationOutcome::NoCandidates;
    }

    let total = candidates.len();
    let mut scored: Vec<Recommendation> = Vec::with_capacity(total);
    let mut inserted = 0;

    for candidate in candidates {
        let recipe = candidate.recipe;
        let score = match user {
            Some(user) => predict_recipe_score(
                &recipe,
                &user.preferences,
                user.trained_model(),
                scoring,
            ),
            None => rng.gen_range(ANONYMOUS_SCORE_MIN..=ANONYMOUS_SCORE_MAX),
        };

        if user.is_some_and(|u| u.low_rated().contains(&recipe.title)) {
            catalog.insert_if_absent(recipe);
            continue;
        }

        scored.push(Recommendation {
            title: recipe.title.clone(),
            link: recipe.link.clone(),
            cuisine: recipe.cuisine,
            missing_ingredients: candidate.missing_ingredients,
            score,
        });
        if catalog.insert_if_absent(recipe) {
            inserted += 1;
        }
    }

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut seen_titles = HashSet::new();
    let mut ranked: Vec<Recommendation> = scored
        .into_iter()
        .filter(|r| seen_titles.insert(r.title.clone()))
        .collect();

    if options.diverse {
        ranked = diversify(ranked);
    }
    ranked.truncate(options.top_n);

    tracing::info!(
        user_id = user.map(UserContext::user_id).unwrap_or("anonymous"),
        candidates = total,
        new_recipes = inserted,
        returned = ranked.len(),
        model = user.is_some_and(|u| u.trained_model().is_some()),
        "Recommendations ranked"
    );

    if ranked.is_empty() {
        return RecommendationOutcome::NoCandidates;
    }
    RecommendationOutcome::Ranked(ranked)
}

/// Reorders a ranked list so each cuisine appears once before any repeats
fn diversify(ranked: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut seen = HashSet::new();
    let (mut picked, repeats): (Vec<_>, Vec<_>) =
        ranked.into_iter().partition(|r| seen.insert(r.cuisine));
    picked.extend(repeats);
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cuisine, Recipe, RecipeId, TasteDimension, TasteProfile};
    use crate::services::scoring::ForestParams;
    use rand::{rngs::StdRng, SeedableRng};

    fn profiled(id: u64, title: &str, cuisine: Cuisine, spicy: f64) -> ProfiledCandidate {
        let mut taste = TasteProfile::neutral();
        taste.set(TasteDimension::Spicy, spicy);
        ProfiledCandidate {
            recipe: Recipe {
                id: RecipeId(id),
                title: title.to_string(),
                link: format!("https://example.com/{}", id),
                cuisine,
                taste,
            },
            missing_ingredients: vec![],
        }
    }

    fn spicy_user() -> UserContext {
        let mut user = UserContext::new("eowyn");
        user.preferences.set(TasteDimension::Spicy, 5).unwrap();
        user
    }

    fn rank(
        candidates: Vec<ProfiledCandidate>,
        user: Option<&UserContext>,
        catalog: &mut RecipeCatalog,
        options: RankingOptions,
    ) -> Vec<Recommendation> {
        let mut rng = StdRng::seed_from_u64(1);
        match rank_recommendations(
            candidates,
            user,
            catalog,
            &options,
            &ScoringConfig::default(),
            &mut rng,
        ) {
            RecommendationOutcome::Ranked(list) => list,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    fn titles(list: &[Recommendation]) -> Vec<&str> {
        list.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_empty_candidates() {
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = rank_recommendations(
            vec![],
            None,
            &mut RecipeCatalog::new(),
            &RankingOptions::default(),
            &ScoringConfig::default(),
            &mut rng,
        );
        assert_eq!(outcome, RecommendationOutcome::NoCandidates);
        assert!(outcome.recommendations().is_empty());
    }

    #[test]
    fn test_ranks_by_similarity() {
        let user = spicy_user();
        let list = rank(
            vec![
                profiled(1, "Mild Korma", Cuisine::Indian, 1.0),
                profiled(2, "Vindaloo", Cuisine::Indian, 5.0),
                profiled(3, "Jalfrezi", Cuisine::Indian, 4.0),
            ],
            Some(&user),
            &mut RecipeCatalog::new(),
            RankingOptions::default(),
        );
        assert_eq!(titles(&list), vec!["Vindaloo", "Jalfrezi", "Mild Korma"]);
        assert_eq!(list[0].score, 5.0);
    }

    #[test]
    fn test_cap_enforced() {
        let user = spicy_user();
        let candidates = (0..50)
            .map(|i| profiled(i, &format!("Dish {}", i), Cuisine::American, 3.0))
            .collect();
        let list = rank(
            candidates,
            Some(&user),
            &mut RecipeCatalog::new(),
            RankingOptions::default(),
        );
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_ties_keep_input_order_and_dedupe() {
        let user = spicy_user();
        let list = rank(
            vec![
                profiled(1, "Tacos", Cuisine::Mexican, 3.0),
                profiled(2, "Nachos", Cuisine::Mexican, 3.0),
                profiled(3, "Tacos", Cuisine::Mexican, 3.0),
                profiled(4, "Elote", Cuisine::Mexican, 3.0),
            ],
            Some(&user),
            &mut RecipeCatalog::new(),
            RankingOptions {
                top_n: 10,
                diverse: false,
            },
        );
        assert_eq!(titles(&list), vec!["Tacos", "Nachos", "Elote"]);
    }

    #[test]
    fn test_low_rated_titles_dropped() {
        let catalog_seed = RecipeCatalog::new();
        let mut user = spicy_user();
        user.submit_rating(
            "Vindaloo",
            Cuisine::Indian,
            1,
            &catalog_seed,
            &ForestParams::default(),
        )
        .unwrap();

        let mut catalog = RecipeCatalog::new();
        let list = rank(
            vec![
                profiled(1, "Vindaloo", Cuisine::Indian, 5.0),
                profiled(2, "Jalfrezi", Cuisine::Indian, 4.0),
            ],
            Some(&user),
            &mut catalog,
            RankingOptions::default(),
        );
        assert_eq!(titles(&list), vec!["Jalfrezi"]);
        // Still learned as a feature row
        assert!(catalog.get_by_title("Vindaloo").is_some());
    }

    #[test]
    fn test_all_low_rated_reports_no_candidates() {
        let mut user = spicy_user();
        user.submit_rating(
            "Bad Stew",
            Cuisine::American,
            1,
            &RecipeCatalog::new(),
            &ForestParams::default(),
        )
        .unwrap();

        let mut catalog = RecipeCatalog::new();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = rank_recommendations(
            vec![profiled(1, "Bad Stew", Cuisine::American, 2.0)],
            Some(&user),
            &mut catalog,
            &RankingOptions::default(),
            &ScoringConfig::default(),
            &mut rng,
        );
        assert_eq!(outcome, RecommendationOutcome::NoCandidates);
        assert!(catalog.contains("Bad Stew"));
    }

    #[test]
    fn test_diverse_mode_spreads_cuisines() {
        let user = spicy_user();
        let list = rank(
            vec![
                profiled(1, "Vindaloo", Cuisine::Indian, 5.0),
                profiled(2, "Phaal", Cuisine::Indian, 5.0),
                profiled(3, "Arrabbiata", Cuisine::Italian, 4.0),
                profiled(4, "Carbonara", Cuisine::Italian, 1.0),
            ],
            Some(&user),
            &mut RecipeCatalog::new(),
            RankingOptions {
                top_n: 3,
                diverse: true,
            },
        );
        assert_eq!(titles(&list), vec!["Vindaloo", "Arrabbiata", "Phaal"]);
    }

    #[test]
    fn test_anonymous_scores_in_range() {
        let candidates = (0..20)
            .map(|i| profiled(i, &format!("Dish {}", i), Cuisine::Asian, 3.0))
            .collect();
        let list = rank(
            candidates,
            None,
            &mut RecipeCatalog::new(),
            RankingOptions {
                top_n: 20,
                diverse: false,
            },
        );
        assert_eq!(list.len(), 20);
        assert!(list.iter().all(|r| (3.0..=5.0).contains(&r.score)));
        assert!(list.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_new_recipes_inserted_once() {
        let mut catalog = RecipeCatalog::new();
        let candidates = || {
            vec![
                profiled(1, "Bibimbap", Cuisine::Asian, 3.0),
                profiled(2, "Bulgogi", Cuisine::Asian, 3.0),
            ]
        };
        rank(candidates(), None, &mut catalog, RankingOptions::default());
        rank(candidates(), None, &mut catalog, RankingOptions::default());
        assert_eq!(catalog.len(), 2);
    }
}
