use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cuisine;

/// Ratings at or below this value mark a recipe as low-rated
pub const LOW_RATING_THRESHOLD: u8 = 2;

/// Star rating between 1 and 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_low(&self) -> bool {
        self.0 <= LOW_RATING_THRESHOLD
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(format!("Rating must be between 1 and 5, got {}", value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// One rating a user gave to a cooked recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingRecord {
    pub user: String,
    pub title: String,
    pub cuisine: Cuisine,
    pub rating: Rating,
    pub rated_at: DateTime<Utc>,
}
