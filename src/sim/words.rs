//! Word list and per-word learning state
//!
//! Words are loaded once; each carries a learning state that decides how
//! likely it is to come back in a later stage.

use std::collections::HashMap;
use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::LoadError;

/// A vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: u32,
    /// Prompt shown to the player
    pub word: String,
    /// Correct answer text
    pub ja: String,
}

/// Parse a word list from JSON text
pub fn parse_word_list(json: &str) -> Result<Vec<Word>, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Read a word list file
pub fn try_load_word_list(path: impl AsRef<Path>) -> Result<Vec<Word>, LoadError> {
    let json = std::fs::read_to_string(path)?;
    parse_word_list(&json)
}

/// Read a word list file; a missing or corrupt file yields no words
pub fn load_word_list(path: impl AsRef<Path>) -> Vec<Word> {
    let path = path.as_ref();
    match try_load_word_list(path) {
        Ok(words) => {
            log::info!("Loaded {} words from {}", words.len(), path.display());
            words
        }
        Err(err) => {
            log::error!("Word list unavailable ({}: {err}); continuing with no words", path.display());
            Vec::new()
        }
    }
}

/// Learning state of one word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WordState {
    #[default]
    Unseen,
    Correct,
    /// Queued for review
    Missed,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct Progress {
    state: WordState,
    miss_count: u32,
}

/// Counts per learning state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WordSummary {
    pub unseen: usize,
    pub correct: usize,
    pub missed: usize,
}

/// Word selection policy limits
#[derive(Debug, Clone, Copy)]
pub struct StagePolicy {
    pub min_words: usize,
    pub max_words: usize,
    pub max_new_words: usize,
}

impl From<&GameConfig> for StagePolicy {
    fn from(config: &GameConfig) -> Self {
        Self {
            min_words: config.words_per_stage_min,
            max_words: config.words_per_stage_max,
            max_new_words: config.new_words_per_stage_max,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WordManager {
    words: Vec<Word>,
    progress: HashMap<u32, Progress>,
}

impl WordManager {
    pub fn new(words: Vec<Word>) -> Self {
        let progress = words.iter().map(|w| (w.id, Progress::default())).collect();
        Self { words, progress }
    }

    /// Pick the words for a stage; the first one is the stage question
    ///
    /// Missed words come first, weighted by `miss_count + 1`, then unseen words
    /// up to the new-word cap, then any other word to fill the remaining slots.
    /// No word appears twice.
    pub fn stage_words<R: Rng + ?Sized>(
        &self,
        stage: u32,
        policy: StagePolicy,
        rng: &mut R,
    ) -> Vec<Word> {
        if self.words.is_empty() {
            log::warn!("Stage {stage}: word list is empty");
            return Vec::new();
        }

        let review: Vec<&Word> = self.in_state(WordState::Missed).collect();
        let unseen: Vec<&Word> = self.in_state(WordState::Unseen).collect();

        let wanted = rng.random_range(policy.min_words..=policy.max_words.max(policy.min_words));
        let wanted = wanted.min(self.words.len());

        let new_count = policy.max_new_words.min(unseen.len()).min(wanted);
        let review_count = (wanted - new_count).min(review.len());

        let mut selected: Vec<Word> = Vec::with_capacity(wanted);

        if review_count > 0 {
            match review.choose_multiple_weighted(rng, review_count, |w| self.miss_count(w.id) + 1) {
                Ok(picked) => selected.extend(picked.map(|w| (*w).clone())),
                Err(err) => log::warn!("Stage {stage}: review sampling failed: {err}"),
            }
        }

        selected.extend(unseen.choose_multiple(rng, new_count).map(|w| (*w).clone()));

        if selected.len() < wanted {
            let rest: Vec<&Word> = self
                .words
                .iter()
                .filter(|w| !selected.iter().any(|s| s.id == w.id))
                .collect();
            let needed = wanted - selected.len();
            selected.extend(rest.choose_multiple(rng, needed).map(|w| (*w).clone()));
        }

        selected.truncate(wanted);
        log::debug!(
            "Stage {stage}: {} words ({} review, {} new)",
            selected.len(),
            review_count,
            new_count
        );
        selected
    }

    /// Answered correctly; miss history is kept
    pub fn mark_correct(&mut self, id: u32) {
        match self.progress.get_mut(&id) {
            Some(p) => {
                p.state = WordState::Correct;
                log::debug!("Word {id} marked correct");
            }
            None => log::warn!("mark_correct: unknown word id {id}"),
        }
    }

    /// Answered wrong: queue for review unless already learned
    pub fn mark_miss(&mut self, id: u32) {
        match self.progress.get_mut(&id) {
            Some(p) => {
                if p.state != WordState::Correct {
                    p.state = WordState::Missed;
                }
                p.miss_count += 1;
                log::debug!("Word {id} missed ({} total)", p.miss_count);
            }
            None => log::warn!("mark_miss: unknown word id {id}"),
        }
    }

    /// Forget all progress
    pub fn reset(&mut self) {
        for p in self.progress.values_mut() {
            *p = Progress::default();
        }
    }

    pub fn word(&self, id: u32) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn all_words(&self) -> &[Word] {
        &self.words
    }

    pub fn state_of(&self, id: u32) -> Option<WordState> {
        self.progress.get(&id).map(|p| p.state)
    }

    pub fn miss_count(&self, id: u32) -> u32 {
        self.progress.get(&id).map_or(0, |p| p.miss_count)
    }

    pub fn summary(&self) -> WordSummary {
        let mut summary = WordSummary::default();
        for p in self.progress.values() {
            match p.state {
                WordState::Unseen => summary.unseen += 1,
                WordState::Correct => summary.correct += 1,
                WordState::Missed => summary.missed += 1,
            }
        }
        summary
    }

    fn in_state(&self, state: WordState) -> impl Iterator<Item = &Word> {
        self.words
            .iter()
            .filter(move |w| self.state_of(w.id) == Some(state))
    }
}
