//! User commands and their text form.
//!
//! ```text
//! play <deck>                 stop <deck>
//! load <deck> [path]          drop <deck> <path>...
//! arm <deck> <cue> on|off     recall <deck> <cue>
//! gain <deck> <0-30>          speed <deck> <0-2>
//! seek <deck> <0-1>           fade <0-30>
//! reset gain|speed <deck>     reset fade
//! clear <deck>
//! ```
//!
//! Decks are numbered 1 and 2, cue slots 1 to 5.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::deck::DeckId;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start playback.
    Play { deck: DeckId },
    /// Stop playback, keeping the position.
    Stop { deck: DeckId },
    /// Load a track. Without a path the remembered track is tried once.
    Load { deck: DeckId, path: Option<PathBuf> },
    /// Files dropped onto a deck.
    DropFiles { deck: DeckId, paths: Vec<PathBuf> },
    /// Arm or disarm a cue slot (zero-based).
    ArmCue { deck: DeckId, slot: usize, armed: bool },
    /// Jump to an armed cue slot (zero-based).
    RecallCue { deck: DeckId, slot: usize },
    /// Set the gain control (0.0 to 30.0).
    SetGain { deck: DeckId, value: f64 },
    /// Set the speed control (0.0 to 2.0).
    SetSpeed { deck: DeckId, value: f64 },
    /// Seek to a relative position (0.0 to 1.0).
    SetSeek { deck: DeckId, value: f64 },
    /// Move the crossfader (0.0 to 30.0).
    SetCrossfade { value: f64 },
    ResetGain { deck: DeckId },
    ResetSpeed { deck: DeckId },
    ResetCrossfade,
    /// Disarm every cue slot on a deck.
    ClearCues { deck: DeckId },
}

impl Command {
    /// Deck the command targets, if any.
    pub fn deck(&self) -> Option<DeckId> {
        match self {
            Command::Play { deck }
            | Command::Stop { deck }
            | Command::Load { deck, .. }
            | Command::DropFiles { deck, .. }
            | Command::ArmCue { deck, .. }
            | Command::RecallCue { deck, .. }
            | Command::SetGain { deck, .. }
            | Command::SetSpeed { deck, .. }
            | Command::SetSeek { deck, .. }
            | Command::ResetGain { deck }
            | Command::ResetSpeed { deck }
            | Command::ClearCues { deck } => Some(*deck),
            Command::SetCrossfade { .. } | Command::ResetCrossfade => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseCommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("Invalid deck '{0}' (expected 1 or 2)")]
    InvalidDeck(String),
    #[error("Invalid cue slot '{0}' (slots start at 1)")]
    InvalidSlot(String),
    #[error("Invalid {name} '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("Expected 'on' or 'off', got '{0}'")]
    InvalidToggle(String),
    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

/// Cursor over the whitespace-separated words of a command line.
struct Args<'a> {
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn next(&mut self, name: &'static str) -> Result<&'a str, ParseCommandError> {
        self.words
            .next()
            .ok_or(ParseCommandError::MissingArgument(name))
    }

    fn deck(&mut self) -> Result<DeckId, ParseCommandError> {
        let word = self.next("deck")?;
        word.parse::<u8>()
            .ok()
            .and_then(DeckId::from_number)
            .ok_or_else(|| ParseCommandError::InvalidDeck(word.to_string()))
    }

    fn slot(&mut self) -> Result<usize, ParseCommandError> {
        let word = self.next("cue slot")?;
        match word.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(ParseCommandError::InvalidSlot(word.to_string())),
        }
    }

    fn number(&mut self, name: &'static str) -> Result<f64, ParseCommandError> {
        let word = self.next(name)?;
        word.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseCommandError::InvalidNumber {
                name,
                value: word.to_string(),
            })
    }

    fn toggle(&mut self) -> Result<bool, ParseCommandError> {
        match self.next("on/off")? {
            "on" => Ok(true),
            "off" => Ok(false),
            other => Err(ParseCommandError::InvalidToggle(other.to_string())),
        }
    }

    /// Remaining words joined back together.
    fn rest(&mut self) -> Option<String> {
        let words: Vec<&str> = self.words.by_ref().collect();
        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }

    fn finish(mut self) -> Result<(), ParseCommandError> {
        match self.words.next() {
            Some(extra) => Err(ParseCommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(()),
        }
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut args = Args {
            words: line.split_whitespace(),
        };
        let verb = args.words.next().ok_or(ParseCommandError::Empty)?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "play" => Command::Play { deck: args.deck()? },
            "stop" => Command::Stop { deck: args.deck()? },
            "load" => Command::Load {
                deck: args.deck()?,
                path: args.rest().map(PathBuf::from),
            },
            "drop" => {
                let deck = args.deck()?;
                let paths: Vec<PathBuf> = args.words.by_ref().map(PathBuf::from).collect();
                // Paths are whitespace separated here, unlike `load`.
                if paths.is_empty() {
                    return Err(ParseCommandError::MissingArgument("path"));
                }
                Command::DropFiles { deck, paths }
            }
            "arm" => Command::ArmCue {
                deck: args.deck()?,
                slot: args.slot()?,
                armed: args.toggle()?,
            },
            "recall" => Command::RecallCue {
                deck: args.deck()?,
                slot: args.slot()?,
            },
            "gain" => Command::SetGain {
                deck: args.deck()?,
                value: args.number("gain")?,
            },
            "speed" => Command::SetSpeed {
                deck: args.deck()?,
                value: args.number("speed")?,
            },
            "seek" => Command::SetSeek {
                deck: args.deck()?,
                value: args.number("position")?,
            },
            "fade" => Command::SetCrossfade {
                value: args.number("crossfade")?,
            },
            "reset" => match args.next("control")? {
                "gain" => Command::ResetGain { deck: args.deck()? },
                "speed" => Command::ResetSpeed { deck: args.deck()? },
                "fade" => Command::ResetCrossfade,
                other => {
                    return Err(ParseCommandError::UnknownCommand(format!("reset {other}")))
                }
            },
            "clear" => Command::ClearCues { deck: args.deck()? },
            _ => return Err(ParseCommandError::UnknownCommand(verb.to_string())),
        };

        args.finish()?;
        Ok(command)
    }
}
