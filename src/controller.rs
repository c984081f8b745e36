//! Top-level controller: composes catalog, deck, feed, motion tracking and the
//! forcing engine, and turns host events into state transitions.

use log::debug;
use rand::rngs::SmallRng;

use crate::catalog::WordCatalog;
use crate::config::ForceConfig;
use crate::deck::FillerDeck;
use crate::engine::{ForcingEngine, StopOutcome};
use crate::error::ArmError;
use crate::feed::RenderFeed;
use crate::motion::{MotionClassifier, MotionReading, QuietWatchdog, Thresholds};
use crate::random::seeded;
use crate::session::{ArmCommand, SessionState};
use crate::surface::Surface;
use crate::viewport::{ItemId, ViewportTracker};

/// Discrete inputs from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// One scroll-position sample.
    Scroll { at_ms: f64, offset: f64 },
    /// A quiet-period check scheduled by the sample whose token it carries.
    QuietCheck { token: u64 },
    Arm(ArmCommand),
    Reset,
    Resize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Sampled(SampleReport),
    Stopped(StopOutcome),
    /// A quiet check that was superseded by a newer sample.
    StillMoving,
    Armed(Result<(), ArmError>),
    Reset,
    Resized(Option<ItemId>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleReport {
    pub reading: MotionReading,
    /// Pass back in [`Event::QuietCheck`] after the quiet window.
    pub token: u64,
    pub center: Option<ItemId>,
    pub rewritten: usize,
    pub appended: usize,
}

pub struct Controller<S: Surface> {
    config: ForceConfig,
    catalog: WordCatalog,
    deck: FillerDeck,
    feed: RenderFeed,
    tracker: ViewportTracker,
    motion: MotionClassifier,
    watchdog: QuietWatchdog,
    engine: ForcingEngine,
    rng: SmallRng,
    surface: S,
}

impl<S: Surface> Controller<S> {
    pub fn new(catalog: WordCatalog, config: ForceConfig, seed: u64, surface: S) -> Self {
        let mut rng = seeded(seed);
        let deck = FillerDeck::new(&catalog, config.history_cap, config.draw_attempts, &mut rng);
        Self {
            motion: MotionClassifier::new(Thresholds::from(&config)),
            config,
            catalog,
            deck,
            feed: RenderFeed::new(),
            tracker: ViewportTracker::new(),
            watchdog: QuietWatchdog::new(),
            engine: ForcingEngine::new(),
            rng,
            surface,
        }
    }

    /// Initial fill of the list.
    pub fn start(&mut self) {
        let count = self.config.batch_size * self.config.initial_batches.max(1);
        let words = self.deck.draw_many(count);
        self.feed.append(words, &mut self.surface);
    }

    pub fn dispatch(&mut self, event: Event) -> Outcome {
        match event {
            Event::Scroll { at_ms, offset } => Outcome::Sampled(self.on_scroll(at_ms, offset)),
            Event::QuietCheck { token } => match self.quiet_check(token) {
                Some(outcome) => Outcome::Stopped(outcome),
                None => Outcome::StillMoving,
            },
            Event::Arm(command) => Outcome::Armed(self.arm(command)),
            Event::Reset => {
                self.reset();
                Outcome::Reset
            }
            Event::Resize => Outcome::Resized(self.refresh_highlight()),
        }
    }

    pub fn on_scroll(&mut self, at_ms: f64, offset: f64) -> SampleReport {
        let reading = self.motion.sample(at_ms, offset);
        let token = self.watchdog.touch();
        let appended = self.extend_if_needed();
        let center = self.center();
        let rewritten = self.engine.correct(
            reading,
            center,
            self.config.lookahead,
            &mut self.feed,
            &self.catalog,
            &mut self.surface,
            &mut self.rng,
        );
        SampleReport {
            reading,
            token,
            center,
            rewritten,
            appended,
        }
    }

    /// Handle a scheduled quiet-period check. `None` when a newer sample
    /// arrived since `token` was issued.
    pub fn quiet_check(&mut self, token: u64) -> Option<StopOutcome> {
        if !self.watchdog.check(token) {
            return None;
        }
        self.motion.settle();
        let center = self.center();
        let outcome = self.engine.on_stop(
            center,
            &mut self.feed,
            &self.catalog,
            &mut self.deck,
            &mut self.surface,
            &mut self.rng,
        );
        if self.tracker.set_active(center) {
            self.surface.highlight(center);
        }
        Some(outcome)
    }

    /// Arm a new session, replacing any prior one. On error nothing changes.
    pub fn arm(&mut self, command: ArmCommand) -> Result<(), ArmError> {
        let session = command.into_session().inspect_err(|e| {
            debug!("arming ignored: {e}");
        })?;

        self.feed.clear_marks(&mut self.surface);
        if let Some(center) = self.center() {
            self.feed.truncate_after(center, &mut self.surface);
        }
        self.deck
            .reshuffle(&self.catalog, Some(session.target()), &mut self.rng);
        let backfill = self.config.arming_backfill(session.len());
        let words = self.deck.draw_many(backfill);
        self.feed.append(words, &mut self.surface);
        self.engine.arm(session);
        self.refresh_highlight();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.engine.disarm();
        self.deck.clear_exclusion();
        self.feed.clear_marks(&mut self.surface);
    }

    fn extend_if_needed(&mut self) -> usize {
        if !self.feed.needs_extension(&self.surface, self.config.tail_margin_px) {
            return 0;
        }
        let words = self.deck.draw_many(self.config.batch_size);
        let n = words.len();
        self.feed.append(words, &mut self.surface);
        n
    }

    fn center(&self) -> Option<ItemId> {
        self.tracker
            .resolve(&self.surface.item_extents(), self.surface.viewport_center())
    }

    fn refresh_highlight(&mut self) -> Option<ItemId> {
        let center = self.center();
        if self.tracker.set_active(center) {
            self.surface.highlight(center);
        }
        center
    }

    pub fn state(&self) -> &SessionState {
        self.engine.state()
    }

    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    pub fn feed(&self) -> &RenderFeed {
        &self.feed
    }

    pub fn deck(&self) -> &FillerDeck {
        &self.deck
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Text of the item currently at the viewport center.
    pub fn centered_text(&self) -> Option<&str> {
        self.center().and_then(|id| self.feed.text(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FixedRowSurface;

    fn controller() -> Controller<FixedRowSurface> {
        let catalog = WordCatalog::indexed(crate::SAMPLE_WORDS.iter().copied());
        let mut c = Controller::new(
            catalog,
            ForceConfig::default(),
            99,
            FixedRowSurface::new(40.0, 400.0),
        );
        c.start();
        c
    }

    #[test]
    fn start_fills_initial_batches() {
        let c = controller();
        assert_eq!(c.feed().len(), 120);
        assert_eq!(c.surface().rows().len(), 120);
    }

    #[test]
    fn superseded_quiet_check_is_ignored() {
        let mut c = controller();
        let first = c.on_scroll(0.0, 0.0).token;
        let second = c.on_scroll(16.0, 40.0).token;
        assert_eq!(c.dispatch(Event::QuietCheck { token: first }), Outcome::StillMoving);
        assert_eq!(
            c.dispatch(Event::QuietCheck { token: second }),
            Outcome::Stopped(StopOutcome::Idle)
        );
        assert!(c.surface().highlighted().is_some());
    }

    #[test]
    fn coarse_clock_does_not_fire_a_superseded_check() {
        let mut c = controller();
        let first = c.on_scroll(100.0, 0.0).token;
        let second = c.on_scroll(100.0, 40.0).token;
        assert_eq!(c.quiet_check(first), None);
        assert_eq!(c.quiet_check(second), Some(StopOutcome::Idle));
    }

    #[test]
    fn scrolling_near_tail_appends_a_batch() {
        let mut c = controller();
        let near_tail = c.surface().content_height() - 400.0 - 100.0;
        c.surface_mut().scroll_to(near_tail);
        let report = c.on_scroll(0.0, near_tail);
        assert_eq!(report.appended, 40);
        assert_eq!(c.feed().len(), 160);
    }

    #[test]
    fn arming_truncates_future_and_backfills() {
        let mut c = controller();
        let offset = c.surface().offset_centering(10);
        c.surface_mut().scroll_to(offset);
        c.arm(ArmCommand::letters("chat", 1)).unwrap();
        // items 0..=10 kept, then max(40, 4 * 20) appended
        assert_eq!(c.feed().len(), 11 + 80);
        assert_eq!(c.deck().excluded(), Some("CHAT"));
        assert!(c.state().is_armed());
    }

    #[test]
    fn empty_arm_leaves_prior_session() {
        let mut c = controller();
        c.arm(ArmCommand::countdown("ZEBRE", 2)).unwrap();
        let before = c.state().clone();
        let len = c.feed().len();
        assert_eq!(
            c.dispatch(Event::Arm(ArmCommand::letters("  ", 1))),
            Outcome::Armed(Err(ArmError::EmptyTarget))
        );
        assert_eq!(c.state(), &before);
        assert_eq!(c.feed().len(), len);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut c = controller();
        c.arm(ArmCommand::letters("AB", 1)).unwrap();
        assert_eq!(c.dispatch(Event::Reset), Outcome::Reset);
        assert_eq!(c.state(), &SessionState::Idle);
        assert_eq!(c.deck().excluded(), None);
    }
}
