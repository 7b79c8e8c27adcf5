//! Headless deck player.
//!
//! Probes tracks with symphonia to learn their duration, then advances the
//! transport position from a monotonic clock scaled by the playback speed.
//! It produces no audio; gain is kept for whatever output stage consumes it.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::{EngineError, PlaybackEngine};
use crate::deck::DeckId;

/// State of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No file loaded.
    Empty,
    /// File loaded, ready to play.
    Ready,
    /// Currently playing.
    Playing,
    /// Stopped mid-track; position is kept.
    Paused,
}

/// Clock-driven playback engine for one deck.
pub struct ClockedPlayer {
    /// Deck identifier.
    deck_id: DeckId,
    /// Current player state.
    state: PlayerState,
    /// Sample rate of the loaded file.
    sample_rate: u32,
    /// Number of channels in the loaded file.
    channels: usize,
    /// Track duration in seconds.
    duration_seconds: f64,
    /// Position in seconds at `anchor`.
    anchor_position: f64,
    /// When playback (re)started at `anchor_position`. Only set while playing.
    anchor: Option<Instant>,
    /// Playback speed ratio.
    speed: f64,
    /// Linear output gain (0.0 to 1.0).
    gain: f64,
}

impl ClockedPlayer {
    /// Create a new, empty player.
    pub fn new(deck_id: DeckId) -> Self {
        Self {
            deck_id,
            state: PlayerState::Empty,
            sample_rate: 44100,
            channels: 2,
            duration_seconds: 0.0,
            anchor_position: 0.0,
            anchor: None,
            speed: 1.0,
            gain: 1.0,
        }
    }

    /// Current position in seconds.
    pub fn position_seconds(&self) -> f64 {
        match self.anchor {
            Some(anchor) if self.state == PlayerState::Playing => {
                let elapsed = anchor.elapsed().as_secs_f64() * self.speed;
                (self.anchor_position + elapsed).min(self.duration_seconds)
            }
            _ => self.anchor_position,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Re-anchor the clock at the current position.
    fn rebase(&mut self) {
        self.anchor_position = self.position_seconds();
        if self.state == PlayerState::Playing {
            self.anchor = Some(Instant::now());
        }
    }
}

impl PlaybackEngine for ClockedPlayer {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        log::info!("Deck {}: Loading file {:?}", self.deck_id, path);

        let file = File::open(path).map_err(|source| EngineError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint for the format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|source| EngineError::Format {
                path: path.to_path_buf(),
                source,
            })?;

        let track = probed
            .format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| EngineError::NoAudioTrack {
                path: path.to_path_buf(),
            })?;

        let params = &track.codec_params;
        let sample_rate = params.sample_rate.unwrap_or(44100);
        let duration_seconds = match (params.n_frames, params.time_base) {
            (Some(frames), Some(time_base)) => {
                let time = time_base.calc_time(frames);
                time.seconds as f64 + time.frac
            }
            (Some(frames), None) => frames as f64 / sample_rate as f64,
            _ => {
                return Err(EngineError::UnknownDuration {
                    path: path.to_path_buf(),
                })
            }
        };

        self.sample_rate = sample_rate;
        self.channels = params.channels.map(|c| c.count()).unwrap_or(2);
        self.duration_seconds = duration_seconds;
        self.anchor_position = 0.0;
        self.anchor = None;
        self.state = PlayerState::Ready;

        log::info!(
            "Deck {}: Loaded {} Hz, {} channels ({:.2}s)",
            self.deck_id,
            self.sample_rate,
            self.channels,
            self.duration_seconds
        );

        Ok(())
    }

    fn start(&mut self) {
        if matches!(self.state, PlayerState::Ready | PlayerState::Paused) {
            self.state = PlayerState::Playing;
            self.anchor = Some(Instant::now());
            log::debug!("Deck {}: Playing", self.deck_id);
        }
    }

    fn stop(&mut self) {
        if self.state == PlayerState::Playing {
            self.anchor_position = self.position_seconds();
            self.anchor = None;
            self.state = PlayerState::Paused;
            log::debug!("Deck {}: Stopped", self.deck_id);
        }
    }

    fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing && self.position_seconds() < self.duration_seconds
    }

    fn position_relative(&self) -> Option<f64> {
        if self.state == PlayerState::Empty || self.duration_seconds <= 0.0 {
            return None;
        }
        Some(self.position_seconds() / self.duration_seconds)
    }

    fn set_position_relative(&mut self, position: f64) {
        if self.state == PlayerState::Empty || !position.is_finite() {
            return;
        }
        self.anchor_position = position.clamp(0.0, 1.0) * self.duration_seconds;
        if self.state == PlayerState::Playing {
            self.anchor = Some(Instant::now());
        }
    }

    fn set_gain(&mut self, gain: f64) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    fn set_speed(&mut self, speed: f64) {
        self.rebase();
        self.speed = speed.max(0.0);
    }
}
