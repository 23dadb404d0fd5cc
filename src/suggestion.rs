//! Candidate ranking from confirmed-sample frequency.
//!
//! This is a frequency heuristic, not recognition: characters the user has
//! trained most often come first, followed by a fixed base alphabet.

use std::collections::HashSet;

use crate::annotation::MAX_CANDIDATES;
use crate::config::SuggestionSettings;
use crate::training::TrainingEntry;

/// Placeholder returned when there is nothing to suggest.
pub const NO_SUGGESTION: &str = "?";

/// Builds candidate lists for new and re-analyzed annotations.
#[derive(Clone, Debug)]
pub struct SuggestionEngine {
    base_alphabet: Vec<String>,
}

impl SuggestionEngine {
    pub fn new(settings: &SuggestionSettings) -> Self {
        Self::with_alphabet(settings.base_alphabet.clone())
    }

    pub fn with_alphabet(base_alphabet: Vec<String>) -> Self {
        Self { base_alphabet }
    }

    pub fn base_alphabet(&self) -> &[String] {
        &self.base_alphabet
    }

    /// Trained characters by descending count, then the base alphabet, without repeats.
    pub fn pool(&self, entries: &[TrainingEntry]) -> Vec<String> {
        let mut trained: Vec<&TrainingEntry> = entries.iter().filter(|e| !e.unknown).collect();
        trained.sort_by(|a, b| b.count.cmp(&a.count));

        let mut seen = HashSet::new();
        trained
            .into_iter()
            .map(|entry| entry.char.as_str())
            .chain(self.base_alphabet.iter().map(String::as_str))
            .filter(|c| seen.insert(*c))
            .map(str::to_string)
            .collect()
    }

    /// Up to three consecutive pool entries starting at `seed`, wrapping around.
    ///
    /// Different seeds let neighbouring annotations show different candidate
    /// sets without hidden randomness.
    pub fn candidates(&self, entries: &[TrainingEntry], seed: u64) -> Vec<String> {
        let pool = self.pool(entries);
        if pool.is_empty() {
            return vec![NO_SUGGESTION.to_string()];
        }
        let count = MAX_CANDIDATES.min(pool.len());
        let start = (seed % pool.len() as u64) as usize;
        (0..count)
            .map(|offset| pool[(start + offset) % pool.len()].clone())
            .collect()
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(&SuggestionSettings::default())
    }
}
