//! Audio cues
//!
//! The simulation only emits [`GameEvent`]s; this module maps them to sound
//! effects and hands them to whatever backend the host provides. Without a
//! backend everything stays silent.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Wing flap
    Flap,
    /// Star collected
    Score,
    /// Difficulty went up
    LevelUp,
    /// Fatal collision
    Hit,
    /// Run started (background music begins)
    RunStart,
    /// Run over (game-over loop begins)
    GameOver,
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flap => Some(SoundEffect::Flap),
            GameEvent::Score { .. } => Some(SoundEffect::Score),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::FatalCollision => Some(SoundEffect::Hit),
            GameEvent::RunStart => Some(SoundEffect::RunStart),
            GameEvent::RunEnd { .. } => Some(SoundEffect::GameOver),
        }
    }
}

/// Something that can actually make noise
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("backend", &self.backend.is_some())
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish()
    }
}

impl AudioManager {
    /// Manager over an optional backend; `None` means audio failed to start
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager that never plays anything
    pub fn silent() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Take volumes and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.play(effect, vol);
        }
    }

    /// Play the cue for a simulation event
    pub fn on_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(SoundEffect, f32)>>>;

    struct Recorder(Log);

    impl AudioBackend for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().push((effect, volume));
        }
    }

    fn recording() -> (AudioManager, Log) {
        let log: Log = Rc::default();
        let manager = AudioManager::new(Some(Box::new(Recorder(log.clone()))));
        (manager, log)
    }

    #[test]
    fn test_events_map_to_cues() {
        let (mut audio, log) = recording();
        audio.on_event(&GameEvent::Flap);
        audio.on_event(&GameEvent::Score { score: 1 });
        audio.on_event(&GameEvent::FatalCollision);
        let played: Vec<_> = log.borrow().iter().map(|(e, _)| *e).collect();
        assert_eq!(
            played,
            vec![SoundEffect::Flap, SoundEffect::Score, SoundEffect::Hit]
        );
    }

    #[test]
    fn test_mute_silences() {
        let (mut audio, log) = recording();
        audio.set_muted(true);
        audio.play(SoundEffect::Flap);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_volume_scales() {
        let (mut audio, log) = recording();
        audio.apply_settings(&Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Settings::default()
        });
        audio.play(SoundEffect::Score);
        assert!((log.borrow()[0].1 - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_silent_manager_is_harmless() {
        let mut audio = AudioManager::silent();
        assert!(!audio.is_enabled());
        audio.on_event(&GameEvent::RunStart);
    }
}
