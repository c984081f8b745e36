//! Forcing engine: decides which items to rewrite on each motion sample and
//! advances the session on each detected stop.
//!
//! Per-sample work is bounded by the look-ahead count. Session-advancing
//! state (`cursor`, `stops_remaining`) only changes in [`ForcingEngine::on_stop`].

use log::{debug, info, warn};
use rand::Rng;

use crate::catalog::{Pick, WordCatalog, letter_at_rank};
use crate::deck::FillerDeck;
use crate::feed::RenderFeed;
use crate::motion::MotionReading;
use crate::session::{ForcingSession, SessionMode, SessionState};
use crate::surface::Surface;
use crate::viewport::ItemId;

/// Result of handling one detected stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// No session armed; the stop was an ordinary landing.
    Idle,
    /// Nothing rendered under the viewport center.
    NoItem,
    /// The centered word carries the pending letter; the cursor advanced.
    Confirmed {
        item: ItemId,
        word: String,
        letter: char,
        completed: bool,
    },
    /// No qualifying word could be shown; the same letter is retried.
    Stalled { item: ItemId, letter: char },
    /// A countdown stop was consumed as a random landing.
    Counted { item: ItemId, remaining: u32 },
    /// The target appeared verbatim and the session completed.
    Revealed { item: ItemId, word: String },
}

#[derive(Debug, Clone, Default)]
pub struct ForcingEngine {
    state: SessionState,
}

impl ForcingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&ForcingSession> {
        self.state.session()
    }

    /// Replace any prior session in one step.
    pub fn arm(&mut self, session: ForcingSession) {
        info!(
            "forcing armed for {:?} ({:?})",
            session.target(),
            session.mode()
        );
        self.state = SessionState::Armed(session);
    }

    pub fn disarm(&mut self) {
        if self.state.is_armed() {
            info!("forcing disarmed");
        }
        self.state = SessionState::Idle;
    }

    /// Correction step for one motion sample. Returns the number of items
    /// rewritten. Rewriting the centered item is gated by the motion phase;
    /// look-ahead items are always eligible.
    #[allow(clippy::too_many_arguments)]
    pub fn correct<S, R>(
        &self,
        reading: MotionReading,
        center: Option<ItemId>,
        lookahead: usize,
        feed: &mut RenderFeed,
        catalog: &WordCatalog,
        surface: &mut S,
        rng: &mut R,
    ) -> usize
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(session) = self.state.session() else {
            return 0;
        };
        let Some((letter, rank)) = session.pending_letter() else {
            return 0;
        };
        let Some(center) = center else {
            return 0;
        };

        let mut targets = Vec::with_capacity(lookahead + 1);
        if reading.phase.allows_center_rewrite() {
            targets.push(center);
        }
        targets.extend(feed.neighbours(center, reading.direction(), lookahead));

        let mut shown: Vec<String> = targets
            .iter()
            .filter_map(|id| feed.text(*id).map(str::to_string))
            .collect();
        shown.push(session.target().to_string());

        let mut rewritten = 0;
        for id in targets {
            let Some(item) = feed.get(id) else {
                continue;
            };
            if item.forced || letter_at_rank(&item.text, letter, rank) {
                continue;
            }
            let exclude: Vec<&str> = shown.iter().map(String::as_str).collect();
            let pick = pick_qualifying(catalog, letter, rank, &exclude, session.target(), rng);
            debug!("rewrite {:?}: {:?} -> {:?}", id, item.text, pick.word);
            shown.push(pick.word.clone());
            feed.rewrite(id, pick.word, surface);
            rewritten += 1;
        }
        rewritten
    }

    /// Evaluate the landing at `center` and advance the session.
    pub fn on_stop<S, R>(
        &mut self,
        center: Option<ItemId>,
        feed: &mut RenderFeed,
        catalog: &WordCatalog,
        deck: &mut FillerDeck,
        surface: &mut S,
        rng: &mut R,
    ) -> StopOutcome
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let SessionState::Armed(session) = &mut self.state else {
            return StopOutcome::Idle;
        };
        let Some(center) = center else {
            return StopOutcome::NoItem;
        };
        let target = session.target().to_string();

        match &mut session.mode {
            SessionMode::LetterByLetter { rank, cursor } => {
                let rank = *rank;
                let Some(letter) = target.chars().nth(*cursor) else {
                    self.state = SessionState::Completed;
                    return StopOutcome::Idle;
                };
                let current = feed.text(center).unwrap_or_default().to_string();
                if !letter_at_rank(&current, letter, rank) {
                    let mut exclude: Vec<String> = feed
                        .neighbours(center, -1, 1)
                        .into_iter()
                        .chain(feed.neighbours(center, 1, 1))
                        .filter_map(|id| feed.text(id).map(str::to_string))
                        .collect();
                    exclude.push(current.clone());
                    exclude.push(target.clone());
                    let exclude: Vec<&str> = exclude.iter().map(String::as_str).collect();
                    let pick = pick_qualifying(catalog, letter, rank, &exclude, &target, rng);
                    if letter_at_rank(&pick.word, letter, rank) {
                        warn!("failsafe rewrite at stop: {current:?} -> {:?}", pick.word);
                        feed.rewrite(center, pick.word, surface);
                    }
                }

                let Some(word) = feed.text(center).map(str::to_string) else {
                    return StopOutcome::NoItem;
                };
                if !letter_at_rank(&word, letter, rank) {
                    warn!("no word with '{letter}' at rank {rank}; retrying on next stop");
                    return StopOutcome::Stalled {
                        item: center,
                        letter,
                    };
                }

                *cursor += 1;
                let completed = *cursor >= target.chars().count();
                info!("confirmed {word:?} for '{letter}' ({}/{})", cursor, target.chars().count());
                feed.clear_forced(surface);
                if completed {
                    info!("forcing complete for {target:?}");
                    self.state = SessionState::Completed;
                }
                StopOutcome::Confirmed {
                    item: center,
                    word,
                    letter,
                    completed,
                }
            }
            SessionMode::CountdownReveal { stops_remaining } => {
                *stops_remaining = stops_remaining.saturating_sub(1);
                if *stops_remaining == 0 {
                    feed.reveal(center, &target, surface);
                    info!("revealed {target:?}");
                    self.state = SessionState::Completed;
                    return StopOutcome::Revealed {
                        item: center,
                        word: target,
                    };
                }
                let remaining = *stops_remaining;
                if feed
                    .text(center)
                    .is_some_and(|w| w.eq_ignore_ascii_case(&target))
                {
                    let filler = deck.draw();
                    warn!("early landing on the target; replaced with {filler:?}");
                    feed.rewrite(center, filler, surface);
                }
                debug!("countdown stop, {remaining} remaining");
                StopOutcome::Counted {
                    item: center,
                    remaining,
                }
            }
        }
    }
}

/// Like [`WordCatalog::pick_matching`], but when every qualifying word is
/// in `avoid` a repeat is preferred over a word that misses the letter.
/// The target itself is never returned.
fn pick_qualifying<R: Rng + ?Sized>(
    catalog: &WordCatalog,
    letter: char,
    rank: usize,
    avoid: &[&str],
    target: &str,
    rng: &mut R,
) -> Pick {
    let pick = catalog.pick_matching(letter, rank, avoid, rng);
    if letter_at_rank(&pick.word, letter, rank) {
        return pick;
    }
    catalog.pick_matching(letter, rank, &[target], rng)
}
