//! Immutable word catalog with optional per-letter / per-rank indices.
//!
//! Words are normalised once on load (trimmed, unquoted, uppercased). Buckets
//! of the derived indices are sorted alphabetically; a bucket never holds a
//! word that lacks its letter at its rank.

use std::collections::BTreeMap;

use log::warn;
use rand::Rng;
use rand::seq::IndexedRandom;

#[cfg(feature = "serde_json")]
use crate::error::CatalogError;

/// List-boundary markers that must never be served as filler.
pub const SENTINEL_WORDS: &[&str] = &["DEBUT", "FIN", "LISTE", "VIDE"];

/// Served when filtering leaves nothing, so the stream never stalls.
pub const PLACEHOLDER_WORDS: &[&str] = &["LISTE", "VIDE", "ERREUR", "DATA"];

pub type StartIndex = BTreeMap<char, Vec<String>>;
pub type RankIndex = BTreeMap<usize, BTreeMap<char, Vec<String>>>;

/// Trim, strip quotes and uppercase a raw token. Empty tokens yield `None`.
pub fn normalize(raw: &str) -> Option<String> {
    let word = raw.trim().trim_matches('"').trim();
    if word.is_empty() {
        None
    } else {
        Some(word.to_uppercase())
    }
}

pub fn is_sentinel(word: &str) -> bool {
    SENTINEL_WORDS.iter().any(|s| s.eq_ignore_ascii_case(word))
}

/// Whether the 1-based `rank`-th character of `word` is `letter`.
pub fn letter_at_rank(word: &str, letter: char, rank: usize) -> bool {
    rank >= 1 && word.chars().nth(rank - 1) == Some(letter)
}

/// Which fallback tier produced a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSource {
    Rank,
    StartLetter,
    AnyWord,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub word: String,
    pub source: PickSource,
}

#[derive(Debug, Clone, Default)]
pub struct WordCatalog {
    words: Vec<String>,
    by_start_letter: Option<StartIndex>,
    by_rank_letter: Option<RankIndex>,
}

impl WordCatalog {
    /// Catalog without indices; lookups scan the word list.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .filter_map(|w| normalize(w.as_ref()))
                .collect(),
            by_start_letter: None,
            by_rank_letter: None,
        }
    }

    /// Catalog with both indices built from the word list.
    pub fn indexed<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new(words);
        catalog.build_indices();
        catalog
    }

    pub fn build_indices(&mut self) {
        let mut start = StartIndex::new();
        let mut rank = RankIndex::new();
        for word in &self.words {
            for (i, ch) in word.chars().enumerate() {
                if i == 0 {
                    start.entry(ch).or_default().push(word.clone());
                }
                rank.entry(i + 1)
                    .or_default()
                    .entry(ch)
                    .or_default()
                    .push(word.clone());
            }
        }
        for bucket in start.values_mut() {
            bucket.sort();
            bucket.dedup();
        }
        for letters in rank.values_mut() {
            for bucket in letters.values_mut() {
                bucket.sort();
                bucket.dedup();
            }
        }
        self.by_start_letter = Some(start);
        self.by_rank_letter = Some(rank);
    }

    /// Attach externally supplied indices. Entries that break the bucket
    /// invariant are dropped.
    pub fn with_supplied_indices(
        mut self,
        by_start_letter: Option<StartIndex>,
        by_rank_letter: Option<RankIndex>,
    ) -> Self {
        let mut dropped = 0usize;
        self.by_start_letter = by_start_letter.map(|mut index| {
            for (letter, bucket) in index.iter_mut() {
                let before = bucket.len();
                bucket.retain(|w| letter_at_rank(w, *letter, 1));
                dropped += before - bucket.len();
            }
            index
        });
        self.by_rank_letter = by_rank_letter.map(|mut index| {
            index.retain(|rank, _| *rank >= 1);
            for (rank, letters) in index.iter_mut() {
                for (letter, bucket) in letters.iter_mut() {
                    let before = bucket.len();
                    bucket.retain(|w| letter_at_rank(w, *letter, *rank));
                    dropped += before - bucket.len();
                }
            }
            index
        });
        if dropped > 0 {
            warn!("catalog: dropped {dropped} index entries that did not match their bucket");
        }
        self
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: json::CatalogData =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let catalog = data.into_catalog();
        if catalog.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(catalog)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn is_indexed(&self) -> bool {
        self.by_rank_letter.is_some()
    }

    /// Words eligible as filler: sentinels and `excluding` removed.
    pub fn filler_words(&self, excluding: Option<&str>) -> Vec<String> {
        self.words
            .iter()
            .filter(|w| !is_sentinel(w))
            .filter(|w| excluding.is_none_or(|x| !w.eq_ignore_ascii_case(x)))
            .cloned()
            .collect()
    }

    /// Alphabetical grouping by initial letter, for exporting sorted lists.
    pub fn grouped_by_initial(&self) -> StartIndex {
        if let Some(index) = &self.by_start_letter {
            return index.clone();
        }
        let mut groups = StartIndex::new();
        for word in &self.words {
            if let Some(first) = word.chars().next() {
                groups.entry(first).or_default().push(word.clone());
            }
        }
        for bucket in groups.values_mut() {
            bucket.sort();
        }
        groups
    }

    /// Pick a word with `letter` at `rank`, widening rank → start letter →
    /// any word. Sentinels and words in `exclude` are never returned unless
    /// only placeholders remain.
    pub fn pick_matching<R: Rng + ?Sized>(
        &self,
        letter: char,
        rank: usize,
        exclude: &[&str],
        rng: &mut R,
    ) -> Pick {
        let allowed =
            |w: &&String| !is_sentinel(w) && !exclude.iter().any(|x| x.eq_ignore_ascii_case(w));

        let by_rank: Vec<&String> = match &self.by_rank_letter {
            Some(index) => index
                .get(&rank)
                .and_then(|letters| letters.get(&letter))
                .map(|bucket| bucket.iter().filter(allowed).collect())
                .unwrap_or_default(),
            None => self
                .words
                .iter()
                .filter(|w| letter_at_rank(w, letter, rank))
                .filter(allowed)
                .collect(),
        };
        if let Some(word) = by_rank.choose(rng) {
            return Pick {
                word: (*word).clone(),
                source: PickSource::Rank,
            };
        }

        let by_start: Vec<&String> = match &self.by_start_letter {
            Some(index) => index
                .get(&letter)
                .map(|bucket| bucket.iter().filter(allowed).collect())
                .unwrap_or_default(),
            None => self
                .words
                .iter()
                .filter(|w| letter_at_rank(w, letter, 1))
                .filter(allowed)
                .collect(),
        };
        if let Some(word) = by_start.choose(rng) {
            warn!("catalog: no word with '{letter}' at rank {rank}, using start-letter fallback");
            return Pick {
                word: (*word).clone(),
                source: PickSource::StartLetter,
            };
        }

        warn!("catalog: no word for letter '{letter}', using a random word");
        let any: Vec<&String> = self.words.iter().filter(allowed).collect();
        if let Some(word) = any.choose(rng) {
            return Pick {
                word: (*word).clone(),
                source: PickSource::AnyWord,
            };
        }
        let idx = rng.random_range(0..PLACEHOLDER_WORDS.len());
        Pick {
            word: PLACEHOLDER_WORDS[idx].to_string(),
            source: PickSource::Placeholder,
        }
    }
}

#[cfg(feature = "serde_json")]
mod json {
    use std::collections::BTreeMap;

    use serde::Deserialize;

    use super::{RankIndex, StartIndex, WordCatalog, normalize};

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum CatalogData {
        Flat(Vec<String>),
        Indexed {
            words: Vec<String>,
            #[serde(default, rename = "byStartLetter")]
            by_start_letter: Option<BTreeMap<String, Vec<String>>>,
            #[serde(default, rename = "byRankLetter")]
            by_rank_letter: Option<BTreeMap<String, BTreeMap<String, Vec<String>>>>,
        },
    }

    fn letter_key(key: &str) -> Option<char> {
        normalize(key).and_then(|k| k.chars().next())
    }

    fn bucket(words: Vec<String>) -> Vec<String> {
        words.iter().filter_map(|w| normalize(w)).collect()
    }

    impl CatalogData {
        pub(super) fn into_catalog(self) -> WordCatalog {
            match self {
                CatalogData::Flat(words) => WordCatalog::indexed(words),
                CatalogData::Indexed {
                    words,
                    by_start_letter,
                    by_rank_letter,
                } => {
                    let start = by_start_letter.map(|raw| {
                        let mut index = StartIndex::new();
                        for (key, words) in raw {
                            if let Some(letter) = letter_key(&key) {
                                index.entry(letter).or_default().extend(bucket(words));
                            }
                        }
                        index
                    });
                    let rank = by_rank_letter.map(|raw| {
                        let mut index = RankIndex::new();
                        for (rank_key, letters) in raw {
                            let Ok(rank) = rank_key.trim().parse::<usize>() else {
                                continue;
                            };
                            for (key, words) in letters {
                                if let Some(letter) = letter_key(&key) {
                                    index
                                        .entry(rank)
                                        .or_default()
                                        .entry(letter)
                                        .or_default()
                                        .extend(bucket(words));
                                }
                            }
                        }
                        index
                    });
                    let mut catalog = WordCatalog::new(words);
                    if start.is_none() && rank.is_none() {
                        catalog.build_indices();
                        catalog
                    } else {
                        catalog.with_supplied_indices(start, rank)
                    }
                }
            }
        }
    }
}
