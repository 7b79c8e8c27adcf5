//! Two-deck mixer: crossfade law and command dispatch.

mod common;

use std::sync::Arc;

use common::{track_file, CountingStore, Harness};
use parking_lot::Mutex;
use tempfile::TempDir;
use twindeck_dj::{Command, CommandOutcome, DeckId, DeckState, Mixer};

struct Rig {
    mixer: Mixer,
    one: Harness,
    two: Harness,
    store: Arc<Mutex<CountingStore>>,
}

fn rig() -> Rig {
    let store = Arc::new(Mutex::new(CountingStore::default()));
    let one = Harness::with_store(store.clone());
    let two = Harness::with_store(store.clone());
    let mixer = Mixer::new(one.controller(DeckId::One), two.controller(DeckId::Two));
    Rig {
        mixer,
        one,
        two,
        store,
    }
}

fn run(mixer: &mut Mixer, line: &str) -> CommandOutcome {
    mixer.handle_command(line.parse::<Command>().unwrap())
}

#[test]
fn test_crossfade_twenty() {
    let mut rig = rig();

    assert_eq!(run(&mut rig.mixer, "fade 20"), CommandOutcome::Applied);

    assert_eq!(rig.mixer.crossfade().value(), 20.0);
    assert_eq!(rig.mixer.deck(DeckId::Two).gain(), 20.0);
    assert_eq!(rig.mixer.deck(DeckId::One).gain(), 10.0);

    let store = rig.store.lock();
    assert_eq!(store.f64(DeckId::Two, "volume"), Some(20.0));
    assert_eq!(store.f64(DeckId::One, "volume"), Some(10.0));
    drop(store);

    let one_gain = *rig.one.engine.lock().gains.last().unwrap();
    let two_gain = *rig.two.engine.lock().gains.last().unwrap();
    assert!((two_gain - 20.0 / 30.0).abs() < 1e-12);
    assert!((one_gain - 10.0 / 30.0).abs() < 1e-12);
}

#[test]
fn test_crossfade_extremes_select_deck() {
    let mut rig = rig();

    run(&mut rig.mixer, "fade 0");
    assert_eq!(rig.mixer.deck(DeckId::One).gain(), 30.0);
    assert_eq!(rig.mixer.deck(DeckId::Two).gain(), 0.0);

    run(&mut rig.mixer, "fade 30");
    assert_eq!(rig.mixer.deck(DeckId::One).gain(), 0.0);
    assert_eq!(rig.mixer.deck(DeckId::Two).gain(), 30.0);
}

#[test]
fn test_crossfade_gains_sum() {
    let mut rig = rig();

    for value in [0.0, 7.5, 15.0, 22.5, 30.0] {
        rig.mixer
            .handle_command(Command::SetCrossfade { value });
        let sum = rig.mixer.deck(DeckId::One).gain() + rig.mixer.deck(DeckId::Two).gain();
        assert_eq!(sum, 30.0);
    }
}

#[test]
fn test_crossfade_reset() {
    let mut rig = rig();
    run(&mut rig.mixer, "fade 4");
    run(&mut rig.mixer, "reset fade");

    assert_eq!(rig.mixer.crossfade().value(), 15.0);
    assert_eq!(rig.mixer.deck(DeckId::One).gain(), 15.0);
    assert_eq!(rig.mixer.deck(DeckId::Two).gain(), 15.0);
}

#[test]
fn test_commands_target_one_deck() {
    let temp_dir = TempDir::new().unwrap();
    let path = track_file(&temp_dir, "a.wav");
    let mut rig = rig();

    let load = Command::Load {
        deck: DeckId::Two,
        path: Some(path),
    };
    assert_eq!(rig.mixer.handle_command(load), CommandOutcome::Loaded(DeckId::Two));
    assert_eq!(run(&mut rig.mixer, "play 2"), CommandOutcome::Applied);
    assert_eq!(run(&mut rig.mixer, "play 1"), CommandOutcome::Ignored);

    assert_eq!(rig.mixer.deck(DeckId::One).state(), DeckState::Empty);
    assert_eq!(rig.mixer.deck(DeckId::Two).state(), DeckState::Playing);
    assert_eq!(rig.one.engine.lock().starts, 0);
    assert_eq!(rig.two.engine.lock().starts, 1);
}

#[test]
fn test_load_outcomes() {
    let mut rig = rig();

    assert_eq!(run(&mut rig.mixer, "load 1"), CommandOutcome::NeedsPath(DeckId::One));
    assert_eq!(
        run(&mut rig.mixer, "load 1 /nowhere/x.mp3"),
        CommandOutcome::LoadFailed(DeckId::One)
    );
    assert_eq!(
        run(&mut rig.mixer, "drop 1 /a.mp3 /b.mp3"),
        CommandOutcome::Ignored
    );
}

#[test]
fn test_cue_commands() {
    let mut rig = rig();

    run(&mut rig.mixer, "seek 1 0.6");
    assert_eq!(run(&mut rig.mixer, "arm 1 1 on"), CommandOutcome::Applied);
    run(&mut rig.mixer, "seek 1 0.1");
    assert_eq!(run(&mut rig.mixer, "recall 1 1"), CommandOutcome::Applied);
    assert_eq!(rig.mixer.deck(DeckId::One).seek_value(), 0.6);

    assert_eq!(run(&mut rig.mixer, "recall 1 2"), CommandOutcome::Ignored);
    assert_eq!(run(&mut rig.mixer, "recall 2 1"), CommandOutcome::Ignored);

    run(&mut rig.mixer, "clear 1");
    assert_eq!(run(&mut rig.mixer, "recall 1 1"), CommandOutcome::Ignored);
}

#[test]
fn test_tick_drives_both_decks() {
    let temp_dir = TempDir::new().unwrap();
    let path = track_file(&temp_dir, "a.wav");
    let mut rig = rig();
    rig.mixer.deck_mut(DeckId::One).load_file(&path);
    rig.one.engine.lock().position = Some(0.5);

    let [one, two] = rig.mixer.tick();

    assert_eq!(one.map(|f| f.position), Some(0.5));
    assert_eq!(two, None);

    let snapshots = rig.mixer.snapshots();
    assert_eq!(snapshots[0].position, Some(0.5));
    assert_eq!(snapshots[1].position, None);
}
