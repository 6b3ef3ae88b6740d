use serde::Deserialize;

use crate::services::scoring::{ForestParams, ScoringConfig};
use crate::services::taste::{CuisineFallback, CuisinePolicy};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Recipe API key; without one only the backup catalog is served
    #[serde(default)]
    pub recipe_api_key: Option<String>,

    /// Recipe API base URL
    #[serde(default = "default_recipe_api_url")]
    pub recipe_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// How long recipe API responses stay cached, in seconds
    #[serde(default = "default_recipe_cache_ttl_secs")]
    pub recipe_cache_ttl_secs: u64,

    /// Number of candidates requested per ingredient search
    #[serde(default = "default_search_result_count")]
    pub search_result_count: usize,

    /// Candidates needing more extra ingredients than this are dropped
    #[serde(default = "default_max_missing_ingredients")]
    pub max_missing_ingredients: usize,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Weight of the learned prediction in the blended score
    #[serde(default = "default_blend_weight")]
    pub blend_weight: f64,

    #[serde(default = "default_forest_estimators")]
    pub forest_estimators: usize,

    #[serde(default = "default_forest_seed")]
    pub forest_seed: u64,

    #[serde(default)]
    pub cuisine_fallback: CuisineFallback,

    /// Serve the built-in catalog when the recipe API search fails
    #[serde(default = "default_use_backup_catalog")]
    pub use_backup_catalog: bool,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_recipe_api_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recipe_cache_ttl_secs() -> u64 {
    86_400 // 24 hours
}

fn default_search_result_count() -> usize {
    15
}

fn default_max_missing_ingredients() -> usize {
    2
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_blend_weight() -> f64 {
    0.5
}

fn default_forest_estimators() -> usize {
    100
}

fn default_forest_seed() -> u64 {
    42
}

fn default_use_backup_catalog() -> bool {
    true
}

/// Settings handed to the recommendation core
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub scoring: ScoringConfig,
    pub cuisine_policy: CuisinePolicy,
    pub max_missing_ingredients: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            cuisine_policy: CuisinePolicy::default(),
            max_missing_ingredients: default_max_missing_ingredients(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if !(0.0..=1.0).contains(&config.blend_weight) {
            anyhow::bail!(
                "BLEND_WEIGHT must be within [0, 1], got {}",
                config.blend_weight
            );
        }
        if config.forest_estimators == 0 {
            anyhow::bail!("FOREST_ESTIMATORS must be at least 1");
        }

        Ok(config)
    }

    /// Derives the core engine settings from this configuration
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            scoring: ScoringConfig {
                blend_weight: self.blend_weight,
                forest: ForestParams {
                    n_estimators: self.forest_estimators,
                    seed: self.forest_seed,
                    ..ForestParams::default()
                },
            },
            cuisine_policy: CuisinePolicy {
                fallback: self.cuisine_fallback,
                ..CuisinePolicy::default()
            },
            max_missing_ingredients: self.max_missing_ingredients,
        }
    }
}
