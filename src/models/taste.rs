use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Neutral level on the 1–5 taste scale
pub const NEUTRAL_LEVEL: f64 = 3.0;
pub const MIN_LEVEL: f64 = 1.0;
pub const MAX_LEVEL: f64 = 5.0;

/// One of the six flavor dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TasteDimension {
    Spicy,
    Sweet,
    Salty,
    Sour,
    Bitter,
    Umami,
}

impl TasteDimension {
    /// Canonical feature order
    pub const ALL: [TasteDimension; 6] = [
        TasteDimension::Spicy,
        TasteDimension::Sweet,
        TasteDimension::Salty,
        TasteDimension::Sour,
        TasteDimension::Bitter,
        TasteDimension::Umami,
    ];
}

/// Flavor descriptor of a recipe
///
/// Dimensions may be absent; readers treat an absent dimension as neutral.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TasteProfile {
    levels: BTreeMap<TasteDimension, f64>,
}

impl TasteProfile {
    /// Profile with every dimension at the neutral level
    pub fn neutral() -> Self {
        Self::from_levels(TasteDimension::ALL.map(|d| (d, NEUTRAL_LEVEL)))
    }

    pub fn from_levels(levels: impl IntoIterator<Item = (TasteDimension, f64)>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
        }
    }

    pub fn set(&mut self, dimension: TasteDimension, level: f64) {
        self.levels.insert(dimension, level);
    }

    /// Level for a dimension, neutral when absent
    pub fn level(&self, dimension: TasteDimension) -> f64 {
        self.levels
            .get(&dimension)
            .copied()
            .unwrap_or(NEUTRAL_LEVEL)
    }

    /// Level for a dimension only when it was actually recorded
    pub fn recorded(&self, dimension: TasteDimension) -> Option<f64> {
        self.levels.get(&dimension).copied()
    }

    pub fn is_complete(&self) -> bool {
        TasteDimension::ALL
            .iter()
            .all(|d| self.levels.contains_key(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_dimension_reads_neutral() {
        let profile = TasteProfile::from_levels([(TasteDimension::Spicy, 5.0)]);
        assert_eq!(profile.level(TasteDimension::Spicy), 5.0);
        assert_eq!(profile.level(TasteDimension::Umami), NEUTRAL_LEVEL);
        assert_eq!(profile.recorded(TasteDimension::Umami), None);
        assert!(!profile.is_complete());
    }

    #[test]
    fn test_neutral_profile_is_complete() {
        let profile = TasteProfile::neutral();
        assert!(profile.is_complete());
        for dimension in TasteDimension::ALL {
            assert_eq!(profile.level(dimension), NEUTRAL_LEVEL);
        }
    }
}
