// Integration tests (native) for the `mentalist-scroll` crate.
// Scroll gestures are simulated on a headless fixed-row surface: each landing
// is a short burst of samples that decelerates onto a row, followed by the
// quiet-period check that declares the stop.

use mentalist_scroll::{
    ArmCommand, ArmError, Controller, Event, FixedRowSurface, ForceConfig, Outcome, SessionState,
    StopOutcome, WordCatalog,
};
use proptest::prelude::*;

struct Rig {
    c: Controller<FixedRowSurface>,
    clock: f64,
    center: usize,
}

impl Rig {
    fn new(catalog: WordCatalog, seed: u64) -> Self {
        let mut c = Controller::new(
            catalog,
            ForceConfig::default(),
            seed,
            FixedRowSurface::new(40.0, 400.0),
        );
        c.start();
        let center = 60;
        let offset = c.surface().offset_centering(center);
        c.surface_mut().scroll_to(offset);
        Self {
            c,
            clock: 1_000.0,
            center,
        }
    }

    /// Fling forward by `rows` without stopping; returns the last token.
    fn drift(&mut self, rows: usize) -> u64 {
        let start = self.c.surface().scroll_offset();
        self.center += rows;
        let end = self.c.surface().offset_centering(self.center);
        let mut token = 0;
        for fraction in [0.5, 0.8, 0.95, 0.99, 1.0] {
            self.clock += 16.0;
            let offset = start + (end - start) * fraction;
            self.c.surface_mut().scroll_to(offset);
            token = self.c.on_scroll(self.clock, offset).token;
        }
        token
    }

    /// Fling forward by `rows`, decelerating onto the new row, then stop.
    fn land(&mut self, rows: usize) -> StopOutcome {
        let token = self.drift(rows);
        self.clock += 150.0;
        let outcome = self.c.quiet_check(token).expect("quiet check after last sample");
        assert_eq!(
            self.c.surface().position_of(self.c.feed().items()[self.center].id),
            Some(self.center)
        );
        outcome
    }

    fn centered(&self) -> String {
        self.c.centered_text().unwrap_or_default().to_string()
    }
}

#[test]
fn letter_by_letter_spells_ab_with_fruit_catalog() {
    let catalog = WordCatalog::indexed(["APPLE", "BANANA", "CHERRY", "AVOCADO"]);
    let mut rig = Rig::new(catalog, 3);
    rig.c.arm(ArmCommand::letters("AB", 1)).unwrap();

    match rig.land(7) {
        StopOutcome::Confirmed { word, letter, completed, .. } => {
            assert_eq!(letter, 'A');
            assert!(word == "APPLE" || word == "AVOCADO", "got {word}");
            assert!(!completed);
        }
        other => panic!("unexpected {other:?}"),
    }
    match rig.land(7) {
        StopOutcome::Confirmed { word, completed, .. } => {
            assert_eq!(word, "BANANA");
            assert!(completed);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(rig.c.state(), &SessionState::Completed);
}

#[test]
fn countdown_reveals_zebra_on_third_stop() {
    let mut words: Vec<&str> = mentalist_scroll::SAMPLE_WORDS.to_vec();
    words.push("ZEBRA");
    let mut rig = Rig::new(WordCatalog::indexed(words), 8);
    rig.c.arm(ArmCommand::countdown("Zebra", 3)).unwrap();

    let armed_at = rig.center;
    assert!(
        rig.c.feed().items()[armed_at + 1..]
            .iter()
            .all(|item| item.text != "ZEBRA"),
        "backfill never contains the target"
    );

    assert!(matches!(rig.land(5), StopOutcome::Counted { remaining: 2, .. }));
    assert_ne!(rig.centered(), "ZEBRA");
    assert!(matches!(rig.land(9), StopOutcome::Counted { remaining: 1, .. }));
    assert_ne!(rig.centered(), "ZEBRA");
    assert!(matches!(rig.land(6), StopOutcome::Revealed { .. }));
    assert_eq!(rig.centered(), "ZEBRA");
    assert_eq!(rig.c.state(), &SessionState::Completed);
}

#[test]
fn rank_three_spells_cat() {
    let mut words: Vec<&str> = mentalist_scroll::SAMPLE_WORDS.to_vec();
    words.push("ABCDEF");
    let mut rig = Rig::new(WordCatalog::indexed(words), 21);
    rig.c.arm(ArmCommand::letters("cat", 3)).unwrap();

    let mut spelled = String::new();
    for _ in 0..3 {
        match rig.land(7) {
            StopOutcome::Confirmed { word, .. } => spelled.push(word.chars().nth(2).unwrap()),
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(spelled, "CAT");
    assert_eq!(rig.c.state(), &SessionState::Completed);
}

#[test]
fn empty_target_does_not_replace_armed_session() {
    let mut rig = Rig::new(mentalist_scroll::sample_catalog(), 4);
    rig.c.arm(ArmCommand::letters("LUNE", 1)).unwrap();
    rig.land(7);
    let before = rig.c.state().clone();

    let outcome = rig.c.dispatch(Event::Arm(ArmCommand::letters(" \t", 2)));
    assert_eq!(outcome, Outcome::Armed(Err(ArmError::EmptyTarget)));
    assert_eq!(rig.c.state(), &before);
}

#[test]
fn rearming_replaces_the_whole_session() {
    let mut rig = Rig::new(mentalist_scroll::sample_catalog(), 5);
    rig.c.arm(ArmCommand::letters("LUNE", 1)).unwrap();
    rig.land(7);
    rig.c.arm(ArmCommand::letters("OR", 2)).unwrap();
    assert_eq!(rig.c.state().describe(), "letters 0/2 rank 2");
    assert_eq!(rig.c.deck().excluded(), Some("OR"));
}

#[test]
fn arming_clears_forced_and_revealed_markers() {
    let mut words: Vec<&str> = mentalist_scroll::SAMPLE_WORDS.to_vec();
    words.push("ZEBRA");
    let mut rig = Rig::new(WordCatalog::indexed(words), 13);

    rig.c.arm(ArmCommand::countdown("ZEBRA", 1)).unwrap();
    assert!(matches!(rig.land(5), StopOutcome::Revealed { .. }));
    assert!(rig.c.surface().rows().iter().any(|r| r.revealed));

    rig.c.arm(ArmCommand::letters("LUNE", 1)).unwrap();
    assert!(rig.c.surface().rows().iter().all(|r| !r.revealed));
    rig.drift(7);
    assert!(rig.c.feed().marked_count() > 0);
    assert!(rig.c.surface().rows().iter().any(|r| r.forced));

    rig.c.arm(ArmCommand::letters("OR", 1)).unwrap();
    assert_eq!(rig.c.feed().marked_count(), 0);
    assert!(
        rig.c.surface().rows().iter().all(|r| !r.forced && !r.revealed),
        "no row keeps a marker after re-arming"
    );
    assert!(rig.c.feed().items().iter().all(|i| !i.forced && !i.revealed));
}

#[test]
fn sentinel_words_never_land() {
    let words = ["FIN", "FORET", "DRAGON", "CHAT", "LAPIN", "MAISON"];
    for seed in 0..40 {
        let mut rig = Rig::new(WordCatalog::indexed(words), seed);
        rig.c.arm(ArmCommand::letters("F", 1)).unwrap();
        match rig.land(7) {
            StopOutcome::Confirmed { word, .. } => assert_eq!(word, "FORET", "seed {seed}"),
            other => panic!("seed {seed}: unexpected {other:?}"),
        }
        assert!(rig.c.feed().items().iter().all(|i| i.text != "FIN"), "seed {seed}");
    }
}

#[test]
fn idle_list_lands_without_rewrites() {
    let mut rig = Rig::new(mentalist_scroll::sample_catalog(), 6);
    let before: Vec<String> = rig.c.feed().items().iter().map(|i| i.text.clone()).collect();
    assert_eq!(rig.land(7), StopOutcome::Idle);
    let after: Vec<String> = rig.c.feed().items()[..before.len()]
        .iter()
        .map(|i| i.text.clone())
        .collect();
    assert_eq!(before, after);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn confirmed_landings_spell_the_target(target in "[A-Z]{1,6}", seed in any::<u64>()) {
        let mut rig = Rig::new(mentalist_scroll::sample_catalog(), seed);
        rig.c.arm(ArmCommand::letters(target.clone(), 1)).unwrap();
        let mut spelled = String::new();
        for _ in 0..target.len() {
            match rig.land(7) {
                StopOutcome::Confirmed { word, .. } => spelled.push(word.chars().next().unwrap()),
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
        prop_assert_eq!(spelled, target);
        prop_assert_eq!(rig.c.state(), &SessionState::Completed);
    }
}
