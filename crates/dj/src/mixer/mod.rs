//! Two-deck mixer: both deck controllers plus the crossfader.

mod crossfade;

pub use crossfade::{CrossfadeController, GainControl, CROSSFADE_CENTRE};

use crate::command::Command;
use crate::controller::{DeckController, LoadOutcome};
use crate::deck::{Deck, DeckId};
use crate::sync::SyncFrame;

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command changed something.
    Applied,
    /// The command was valid but had no effect in the current state.
    Ignored,
    /// A track was loaded onto the deck.
    Loaded(DeckId),
    /// The deck could not load the requested track.
    LoadFailed(DeckId),
    /// The deck needs a path from the user before it can load.
    NeedsPath(DeckId),
}

/// Both decks and the crossfader. Deck 2 follows the fader value and
/// deck 1 gets the remainder.
pub struct Mixer {
    decks: [DeckController; 2],
    crossfade: CrossfadeController,
}

impl Mixer {
    pub fn new(deck_one: DeckController, deck_two: DeckController) -> Self {
        debug_assert_eq!(deck_one.id(), DeckId::One);
        debug_assert_eq!(deck_two.id(), DeckId::Two);
        Self {
            decks: [deck_one, deck_two],
            crossfade: CrossfadeController::new(),
        }
    }

    pub fn deck(&self, id: DeckId) -> &DeckController {
        &self.decks[id.index()]
    }

    pub fn deck_mut(&mut self, id: DeckId) -> &mut DeckController {
        &mut self.decks[id.index()]
    }

    pub fn crossfade(&self) -> &CrossfadeController {
        &self.crossfade
    }

    pub fn snapshots(&self) -> [Deck; 2] {
        [self.decks[0].snapshot(), self.decks[1].snapshot()]
    }

    /// Run one sync tick on both decks.
    pub fn tick(&mut self) -> [Option<SyncFrame>; 2] {
        let [one, two] = &mut self.decks;
        [one.tick(), two.tick()]
    }

    pub fn handle_command(&mut self, command: Command) -> CommandOutcome {
        log::debug!("Command {:?}", command);

        match command {
            Command::Play { deck } => applied(self.deck_mut(deck).play()),
            Command::Stop { deck } => applied(self.deck_mut(deck).stop()),
            Command::Load { deck, path } => match self.deck_mut(deck).load(path) {
                LoadOutcome::Loaded => CommandOutcome::Loaded(deck),
                LoadOutcome::Failed => CommandOutcome::LoadFailed(deck),
                LoadOutcome::NeedsPath => CommandOutcome::NeedsPath(deck),
            },
            Command::DropFiles { deck, paths } => {
                let single = paths.len() == 1;
                let loaded = self.deck_mut(deck).drop_files(&paths);
                match (single, loaded) {
                    (false, _) => CommandOutcome::Ignored,
                    (true, true) => CommandOutcome::Loaded(deck),
                    (true, false) => CommandOutcome::LoadFailed(deck),
                }
            }
            Command::ArmCue { deck, slot, armed } => {
                applied(self.deck_mut(deck).set_cue_armed(slot, armed))
            }
            Command::RecallCue { deck, slot } => applied(self.deck_mut(deck).recall_cue(slot)),
            Command::SetGain { deck, value } => {
                self.deck_mut(deck).set_gain(value);
                CommandOutcome::Applied
            }
            Command::SetSpeed { deck, value } => {
                self.deck_mut(deck).set_speed(value);
                CommandOutcome::Applied
            }
            Command::SetSeek { deck, value } => {
                self.deck_mut(deck).external_seek(value);
                CommandOutcome::Applied
            }
            Command::SetCrossfade { value } => {
                let [one, two] = &mut self.decks;
                self.crossfade.set_fader(value, two, one);
                CommandOutcome::Applied
            }
            Command::ResetGain { deck } => {
                self.deck_mut(deck).reset_gain();
                CommandOutcome::Applied
            }
            Command::ResetSpeed { deck } => {
                self.deck_mut(deck).reset_speed();
                CommandOutcome::Applied
            }
            Command::ResetCrossfade => {
                let [one, two] = &mut self.decks;
                self.crossfade.reset(two, one);
                CommandOutcome::Applied
            }
            Command::ClearCues { deck } => {
                self.deck_mut(deck).clear_cues();
                CommandOutcome::Applied
            }
        }
    }
}

fn applied(changed: bool) -> CommandOutcome {
    if changed {
        CommandOutcome::Applied
    } else {
        CommandOutcome::Ignored
    }
}
