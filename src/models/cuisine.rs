use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Fixed cuisine vocabulary used for tagging recipes and one-hot encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cuisine {
    Italian,
    Asian,
    Indian,
    Mexican,
    Mediterranean,
    American,
    International,
}

impl Default for Cuisine {
    fn default() -> Self {
        Cuisine::International
    }
}

impl Cuisine {
    /// Every cuisine in vocabulary order
    pub const ALL: [Cuisine; 7] = [
        Cuisine::Italian,
        Cuisine::Asian,
        Cuisine::Indian,
        Cuisine::Mexican,
        Cuisine::Mediterranean,
        Cuisine::American,
        Cuisine::International,
    ];

    /// Cuisines a recipe can be assigned to by a random fallback
    pub const SPECIFIC: [Cuisine; 6] = [
        Cuisine::Italian,
        Cuisine::Asian,
        Cuisine::Indian,
        Cuisine::Mexican,
        Cuisine::Mediterranean,
        Cuisine::American,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::Italian => "Italian",
            Cuisine::Asian => "Asian",
            Cuisine::Indian => "Indian",
            Cuisine::Mexican => "Mexican",
            Cuisine::Mediterranean => "Mediterranean",
            Cuisine::American => "American",
            Cuisine::International => "International",
        }
    }

    /// Maps a free-form cuisine tag (as returned by recipe APIs) onto the vocabulary
    ///
    /// Regional tags collapse onto the broader cuisine. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Cuisine> {
        let tag = tag.trim().to_lowercase();
        let cuisine = match tag.as_str() {
            "italian" => Cuisine::Italian,
            "asian" | "chinese" | "japanese" | "thai" | "korean" | "vietnamese" => Cuisine::Asian,
            "indian" => Cuisine::Indian,
            "mexican" | "latin american" => Cuisine::Mexican,
            "mediterranean" | "greek" | "spanish" | "middle eastern" | "lebanese" => {
                Cuisine::Mediterranean
            }
            "american" | "southern" | "cajun" => Cuisine::American,
            "international" | "european" => Cuisine::International,
            _ => return None,
        };
        Some(cuisine)
    }
}

impl Display for Cuisine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Cuisine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cuisine::from_tag(s).ok_or_else(|| format!("Unknown cuisine: {}", s))
    }
}
