use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{TasteDimension, TasteProfile};

const NEUTRAL_PREFERENCE: u8 = 3;

/// A user's desired level for each taste dimension
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PreferenceVector {
    levels: BTreeMap<TasteDimension, u8>,
}

impl Default for PreferenceVector {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceVector {
    /// Creates neutral preferences (3/5 on every dimension)
    pub fn new() -> Self {
        Self {
            levels: TasteDimension::ALL
                .iter()
                .map(|d| (*d, NEUTRAL_PREFERENCE))
                .collect(),
        }
    }

    /// Sets the desired level for one dimension
    ///
    /// Levels outside 1..=5 are rejected and leave the vector untouched.
    pub fn set(&mut self, dimension: TasteDimension, level: u8) -> Result<(), String> {
        if !(1..=5).contains(&level) {
            return Err(format!(
                "{:?} preference must be between 1 and 5, got {}",
                dimension, level
            ));
        }
        self.levels.insert(dimension, level);
        Ok(())
    }

    /// Applies several updates at once; nothing changes if any is invalid
    pub fn update(&mut self, updates: &BTreeMap<TasteDimension, u8>) -> Result<(), String> {
        let mut next = self.clone();
        for (dimension, level) in updates {
            next.set(*dimension, *level)?;
        }
        *self = next;
        Ok(())
    }

    /// Restores every dimension to neutral
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Desired level for a dimension, neutral when absent
    pub fn level(&self, dimension: TasteDimension) -> f64 {
        self.levels
            .get(&dimension)
            .copied()
            .unwrap_or(NEUTRAL_PREFERENCE) as f64
    }

    /// Preferences viewed as a taste profile
    pub fn as_profile(&self) -> TasteProfile {
        TasteProfile::from_levels(self.levels.iter().map(|(d, l)| (*d, *l as f64)))
    }
}
