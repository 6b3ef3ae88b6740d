use crate::models::{
    taste::{MAX_LEVEL, MIN_LEVEL},
    PreferenceVector, TasteDimension, TasteProfile,
};

/// Largest possible distance between two levels on the 1–5 scale
const MAX_DISTANCE: f64 = MAX_LEVEL - MIN_LEVEL;

/// Cold-start match score in [0, 5]
///
/// Averages `1 - |recipe - preference| / 4` over the six dimensions and
/// scales by 5. Absent dimensions count as neutral on either side.
pub fn similarity_score(taste: &TasteProfile, preferences: &PreferenceVector) -> f64 {
    let total: f64 = TasteDimension::ALL
        .iter()
        .map(|dimension| {
            let distance = (taste.level(*dimension) - preferences.level(*dimension)).abs();
            1.0 - distance / MAX_DISTANCE
        })
        .sum();

    total / TasteDimension::ALL.len() as f64 * MAX_LEVEL
}
