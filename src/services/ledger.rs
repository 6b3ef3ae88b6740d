use std::collections::{BTreeSet, HashMap};

use crate::models::{Cuisine, Rating, RatingRecord};

/// Append-only history of one user's ratings
#[derive(Debug, Clone, Default)]
pub struct RatingLedger {
    records: Vec<RatingRecord>,
}

impl RatingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: RatingRecord) {
        self.records.push(record);
    }

    /// Full history, oldest first
    pub fn history(&self) -> &[RatingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest record per title, in order of first appearance
    ///
    /// A later rating for a title supersedes earlier ones for training.
    pub fn latest_by_title(&self) -> Vec<&RatingRecord> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut latest: Vec<&RatingRecord> = Vec::new();

        for record in &self.records {
            match slots.get(record.title.as_str()) {
                Some(&slot) => latest[slot] = record,
                None => {
                    slots.insert(record.title.as_str(), latest.len());
                    latest.push(record);
                }
            }
        }

        latest
    }

    /// Mean rating per cuisine over the full history
    pub fn cuisine_affinity(&self) -> HashMap<Cuisine, f64> {
        let mut sums: HashMap<Cuisine, (u32, u32)> = HashMap::new();
        for record in &self.records {
            let entry = sums.entry(record.cuisine).or_insert((0, 0));
            entry.0 += record.rating.value() as u32;
            entry.1 += 1;
        }

        sums.into_iter()
            .map(|(cuisine, (total, count))| (cuisine, total as f64 / count as f64))
            .collect()
    }
}

/// Titles a user rated at or below the low threshold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LowRatedSet {
    titles: BTreeSet<String>,
}

impl LowRatedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the title for a low rating, removes it for anything higher
    pub fn apply(&mut self, title: &str, rating: Rating) {
        if rating.is_low() {
            self.titles.insert(title.to_string());
        } else {
            self.titles.remove(title);
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
