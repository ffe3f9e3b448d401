//! Sound cues
//!
//! The core never plays audio itself. Game events are turned into
//! `AudioCommand`s carrying an effective volume, and the platform
//! collaborator plays them.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Bird flapped
    Flap,
    /// Obstacle passed
    Score,
    /// Collision
    Hit,
    /// Snake ate food
    Eat,
    /// Mark placed on the grid
    Place,
    /// Session over
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Effect for a core event, if it has one
    pub fn for_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flapped => Some(SoundEffect::Flap),
            GameEvent::Scored => Some(SoundEffect::Score),
            GameEvent::Collided => Some(SoundEffect::Hit),
            GameEvent::AteFood => Some(SoundEffect::Eat),
            GameEvent::MarkPlaced(_) => Some(SoundEffect::Place),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
            GameEvent::HighScore => Some(SoundEffect::HighScore),
            GameEvent::MatchDecided => None,
        }
    }
}

/// Instruction for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AudioCommand {
    Play { effect: SoundEffect, volume: f32 },
    /// Start the looping background track
    StartMusic { volume: f32 },
    StopMusic,
}

/// Volume state and music tracking, owned by the state machine
#[derive(Debug, Clone)]
pub struct AudioMixer {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
    pending: Vec<AudioCommand>,
}

impl AudioMixer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            music_playing: false,
            pending: Vec::new(),
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    fn effective(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Queue the effect for an event (silent when muted)
    pub fn on_event(&mut self, event: GameEvent) {
        let Some(effect) = SoundEffect::for_event(event) else {
            return;
        };
        let volume = self.effective(self.sfx_volume);
        if volume <= 0.0 {
            return;
        }
        self.pending.push(AudioCommand::Play { effect, volume });
    }

    pub fn start_music(&mut self) {
        if self.music_playing {
            return;
        }
        self.music_playing = true;
        self.pending.push(AudioCommand::StartMusic {
            volume: self.effective(self.music_volume),
        });
    }

    pub fn stop_music(&mut self) {
        if !self.music_playing {
            return;
        }
        self.music_playing = false;
        self.pending.push(AudioCommand::StopMusic);
    }

    /// Take queued commands
    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_volume() {
        let mut mixer = AudioMixer::new(&Settings::default());
        mixer.on_event(GameEvent::Scored);
        mixer.on_event(GameEvent::MatchDecided);
        let cmds = mixer.drain();
        assert_eq!(cmds.len(), 1);
        match cmds[0] {
            AudioCommand::Play { effect, volume } => {
                assert_eq!(effect, SoundEffect::Score);
                assert!((volume - 0.8).abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(mixer.drain().is_empty());
    }

    #[test]
    fn test_muted_is_silent() {
        let mut mixer = AudioMixer::new(&Settings::default());
        mixer.set_muted(true);
        mixer.on_event(GameEvent::Collided);
        assert!(mixer.drain().is_empty());
    }

    #[test]
    fn test_music_start_stop_once() {
        let mut mixer = AudioMixer::new(&Settings::default());
        mixer.start_music();
        mixer.start_music();
        mixer.stop_music();
        mixer.stop_music();
        let cmds = mixer.drain();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[1], AudioCommand::StopMusic);
        assert!(!mixer.music_playing());
    }
}
