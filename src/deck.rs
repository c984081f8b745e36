//! Endless shuffled stream of filler words.
//!
//! The deck is a permutation of the catalog consumed cursor-first and wrapped
//! modulo its length. A short history keeps the stream from repeating a
//! recent word or starting two neighbours with the same letter.

use std::collections::VecDeque;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{PLACEHOLDER_WORDS, WordCatalog};

#[derive(Debug, Clone)]
pub struct FillerDeck {
    deck: Vec<String>,
    cursor: usize,
    history: VecDeque<String>,
    history_cap: usize,
    draw_attempts: usize,
    excluded: Option<String>,
}

impl FillerDeck {
    pub fn new<R: Rng + ?Sized>(
        catalog: &WordCatalog,
        history_cap: usize,
        draw_attempts: usize,
        rng: &mut R,
    ) -> Self {
        let mut deck = Self {
            deck: Vec::new(),
            cursor: 0,
            history: VecDeque::with_capacity(history_cap),
            history_cap,
            draw_attempts: draw_attempts.max(1),
            excluded: None,
        };
        deck.reshuffle(catalog, None, rng);
        deck
    }

    /// Rebuild the permutation, leaving out `excluding` (the armed target).
    pub fn reshuffle<R: Rng + ?Sized>(
        &mut self,
        catalog: &WordCatalog,
        excluding: Option<&str>,
        rng: &mut R,
    ) {
        let mut words = catalog.filler_words(excluding);
        if words.is_empty() {
            words = PLACEHOLDER_WORDS
                .iter()
                .filter(|w| excluding.is_none_or(|x| !w.eq_ignore_ascii_case(x)))
                .map(|w| w.to_string())
                .collect();
        }
        words.shuffle(rng);
        debug!("deck: reshuffled {} words (excluding {:?})", words.len(), excluding);
        self.deck = words;
        self.cursor = 0;
        self.excluded = excluding.map(str::to_uppercase);
    }

    /// Drop the exclusion without reshuffling the remaining order.
    pub fn clear_exclusion(&mut self) {
        self.excluded = None;
    }

    pub fn excluded(&self) -> Option<&str> {
        self.excluded.as_deref()
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    fn next_in_deck(&mut self) -> String {
        let word = self.deck[self.cursor % self.deck.len()].clone();
        self.cursor = (self.cursor + 1) % self.deck.len();
        word
    }

    fn too_close(&self, word: &str) -> bool {
        let mut recent = self.history.iter().rev();
        let last = recent.next();
        let before_last = recent.next();
        if last.is_some_and(|w| w == word) || before_last.is_some_and(|w| w == word) {
            return true;
        }
        match (last.and_then(|w| w.chars().next()), word.chars().next()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn remember(&mut self, word: &str) {
        if self.history_cap == 0 {
            return;
        }
        while self.history.len() >= self.history_cap {
            self.history.pop_front();
        }
        self.history.push_back(word.to_string());
    }

    /// Next filler word. Retries a bounded number of times to avoid a
    /// recent repeat, then accepts whatever comes.
    pub fn draw(&mut self) -> String {
        let mut word = self.next_in_deck();
        for _ in 1..self.draw_attempts {
            if !self.too_close(&word) {
                break;
            }
            word = self.next_in_deck();
        }
        if self
            .excluded
            .as_deref()
            .is_some_and(|x| word.eq_ignore_ascii_case(x))
        {
            word = self.substitute(&word);
        }
        self.remember(&word);
        word
    }

    fn substitute(&mut self, rejected: &str) -> String {
        for _ in 0..self.deck.len() {
            let candidate = self.next_in_deck();
            if !candidate.eq_ignore_ascii_case(rejected) {
                return candidate;
            }
        }
        PLACEHOLDER_WORDS
            .iter()
            .find(|w| !w.eq_ignore_ascii_case(rejected))
            .map(|w| w.to_string())
            .unwrap_or_else(|| PLACEHOLDER_WORDS[0].to_string())
    }

    pub fn draw_many(&mut self, n: usize) -> Vec<String> {
        (0..n).map(|_| self.draw()).collect()
    }
}
