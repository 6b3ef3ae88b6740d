/// Built-in backup recipe catalog
///
/// Serves a fixed set of well-known dishes when no recipe API key is
/// configured or the API cannot be reached. Detail payloads carry only the
/// cuisine tag, so taste profiles resolve to neutral.
use crate::{
    error::{AppError, AppResult},
    models::{Cuisine, RecipeCandidate, RecipeDetails, RecipeId},
    services::providers::RecipeProvider,
};

struct BackupRecipe {
    title: &'static str,
    cuisine: Cuisine,
    ingredients: &'static [&'static str],
}

const BACKUP_RECIPES: &[BackupRecipe] = &[
    BackupRecipe { title: "Simple Pasta", cuisine: Cuisine::Italian, ingredients: &["pasta", "tomato sauce"] },
    BackupRecipe { title: "Basic Stir Fry", cuisine: Cuisine::Asian, ingredients: &["vegetables", "soy sauce"] },
    BackupRecipe { title: "Quick Salad", cuisine: Cuisine::International, ingredients: &["lettuce", "dressing"] },
    BackupRecipe { title: "Spaghetti Carbonara", cuisine: Cuisine::Italian, ingredients: &["spaghetti", "egg", "pecorino cheese", "guanciale"] },
    BackupRecipe { title: "Chicken Curry", cuisine: Cuisine::Indian, ingredients: &["chicken", "curry paste", "coconut milk"] },
    BackupRecipe { title: "Beef Tacos", cuisine: Cuisine::Mexican, ingredients: &["ground beef", "taco shells", "lettuce", "cheese"] },
    BackupRecipe { title: "Greek Salad", cuisine: Cuisine::Mediterranean, ingredients: &["feta cheese", "olives", "cucumber", "tomato"] },
    BackupRecipe { title: "Hamburger", cuisine: Cuisine::American, ingredients: &["ground beef", "buns", "lettuce", "tomato"] },
    BackupRecipe { title: "Pizza Margherita", cuisine: Cuisine::Italian, ingredients: &["pizza dough", "mozzarella", "tomato sauce", "basil"] },
    BackupRecipe { title: "Pad Thai", cuisine: Cuisine::Asian, ingredients: &["rice noodles", "tofu", "peanuts", "bean sprouts"] },
    BackupRecipe { title: "Chicken Fajitas", cuisine: Cuisine::Mexican, ingredients: &["chicken", "bell pepper", "tortillas", "onion"] },
    BackupRecipe { title: "Hummus", cuisine: Cuisine::Mediterranean, ingredients: &["chickpeas", "tahini", "lemon", "garlic"] },
    BackupRecipe { title: "Mac and Cheese", cuisine: Cuisine::American, ingredients: &["macaroni", "cheddar cheese", "milk", "butter"] },
    BackupRecipe { title: "Risotto", cuisine: Cuisine::Italian, ingredients: &["arborio rice", "parmesan", "white wine", "stock"] },
    BackupRecipe { title: "Sushi Roll", cuisine: Cuisine::Asian, ingredients: &["sushi rice", "nori", "fish", "cucumber"] },
    BackupRecipe { title: "Enchiladas", cuisine: Cuisine::Mexican, ingredients: &["tortillas", "chicken", "enchilada sauce", "cheese"] },
    BackupRecipe { title: "Falafel", cuisine: Cuisine::Mediterranean, ingredients: &["chickpeas", "herbs", "spices", "oil"] },
    BackupRecipe { title: "BBQ Ribs", cuisine: Cuisine::American, ingredients: &["pork ribs", "bbq sauce", "spices"] },
    BackupRecipe { title: "Lasagna", cuisine: Cuisine::Italian, ingredients: &["lasagna noodles", "ground beef", "ricotta", "tomato sauce"] },
    BackupRecipe { title: "Fried Rice", cuisine: Cuisine::Asian, ingredients: &["rice", "egg", "vegetables", "soy sauce"] },
    BackupRecipe { title: "Quesadillas", cuisine: Cuisine::Mexican, ingredients: &["tortillas", "cheese", "chicken", "vegetables"] },
    BackupRecipe { title: "Shakshuka", cuisine: Cuisine::Mediterranean, ingredients: &["egg", "tomato", "bell pepper", "spices"] },
    BackupRecipe { title: "Chicken Tikka Masala", cuisine: Cuisine::Indian, ingredients: &["chicken", "yogurt", "tomato", "garam masala"] },
    BackupRecipe { title: "Dal", cuisine: Cuisine::Indian, ingredients: &["lentils", "onion", "garlic", "turmeric"] },
    BackupRecipe { title: "Gnocchi", cuisine: Cuisine::Italian, ingredients: &["potato", "flour", "egg", "butter"] },
    BackupRecipe { title: "Ramen", cuisine: Cuisine::Asian, ingredients: &["noodles", "broth", "egg", "pork"] },
    BackupRecipe { title: "Guacamole", cuisine: Cuisine::Mexican, ingredients: &["avocado", "lime", "tomato", "onion"] },
    BackupRecipe { title: "Meatloaf", cuisine: Cuisine::American, ingredients: &["ground beef", "breadcrumbs", "onion", "ketchup"] },
    BackupRecipe { title: "Apple Pie", cuisine: Cuisine::American, ingredients: &["apples", "pie crust", "cinnamon", "sugar"] },
    BackupRecipe { title: "Minestrone Soup", cuisine: Cuisine::Italian, ingredients: &["vegetables", "pasta", "beans", "broth"] },
];

/// Whether an on-hand ingredient covers a recipe ingredient ("cherry tomato" covers "tomato")
fn covers(on_hand: &str, needed: &str) -> bool {
    on_hand == needed || on_hand.contains(needed) || needed.contains(on_hand)
}

#[derive(Clone, Default)]
pub struct BackupCatalogProvider;

impl BackupCatalogProvider {
    pub fn new() -> Self {
        Self
    }

    fn entry(id: RecipeId) -> Option<&'static BackupRecipe> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        BACKUP_RECIPES.get(index)
    }
}

#[async_trait::async_trait]
impl RecipeProvider for BackupCatalogProvider {
    async fn search_recipes(&self, ingredients: &[String]) -> AppResult<Vec<RecipeCandidate>> {
        let on_hand: Vec<String> = ingredients
            .iter()
            .map(|i| i.trim().to_lowercase())
            .filter(|i| !i.is_empty())
            .collect();

        if on_hand.is_empty() {
            return Err(AppError::InvalidInput(
                "Ingredient list cannot be empty".to_string(),
            ));
        }

        let mut candidates: Vec<RecipeCandidate> = BACKUP_RECIPES
            .iter()
            .enumerate()
            .filter_map(|(index, recipe)| {
                let (used, missing): (Vec<&str>, Vec<&str>) = recipe
                    .ingredients
                    .iter()
                    .copied()
                    .partition(|needed| on_hand.iter().any(|have| covers(have, needed)));

                if used.is_empty() {
                    return None;
                }

                Some(RecipeCandidate {
                    id: RecipeId(index as u64 + 1),
                    title: recipe.title.to_string(),
                    missing_ingredients: missing.into_iter().map(str::to_string).collect(),
                })
            })
            .collect();

        // Fewest missing ingredients first; catalog order breaks ties
        candidates.sort_by_key(|c| c.missing_ingredients.len());

        tracing::info!(
            ingredients = on_hand.len(),
            results = candidates.len(),
            provider = "backup",
            "Recipe search completed"
        );

        Ok(candidates)
    }

    async fn fetch_recipe_details(&self, id: RecipeId) -> AppResult<RecipeDetails> {
        let recipe = Self::entry(id)
            .ok_or_else(|| AppError::NotFound(format!("No backup recipe with id {}", id)))?;

        Ok(RecipeDetails {
            cuisines: vec![recipe.cuisine.to_string()],
            ..RecipeDetails::default()
        })
    }

    async fn classify_cuisine(&self, _title: &str) -> AppResult<Option<Cuisine>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "backup"
    }
}
