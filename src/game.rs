//! Host-side game driver
//!
//! Owns the simulation and its collaborators:
//! - turns frame timestamps into clamped steps
//! - queues intents until the next tick
//! - fans events out to audio and best-score storage

use crate::audio::AudioManager;
use crate::consts::MAX_FRAME_DT;
use crate::highscores::ScoreStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Intent, TickInput, tick};
use crate::tuning::{ConfigError, WorldConfig};
use crate::view::FrameView;

/// Converts frame timestamps into clamped step sizes
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_time: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_time: None,
            max_dt,
        }
    }

    /// Step for a frame at `now` seconds. The first frame steps 0.
    pub fn step(&mut self, now: f64) -> f32 {
        let dt = match self.last_time {
            Some(prev) => (now - prev) as f32,
            None => 0.0,
        };
        self.last_time = Some(now);
        dt.clamp(0.0, self.max_dt)
    }
}

/// Game instance holding the simulation and its collaborators
#[derive(Debug)]
pub struct Game<S: ScoreStore> {
    state: GameState,
    input: TickInput,
    clock: FrameClock,
    audio: AudioManager,
    scores: S,
}

impl<S: ScoreStore> Game<S> {
    /// Validate `config` and set up a game in the ready phase
    pub fn new(
        config: WorldConfig,
        seed: u64,
        scores: S,
        audio: AudioManager,
    ) -> Result<Self, ConfigError> {
        let mut state = GameState::with_config(seed, config)?;
        state.best_score = scores.best_score();
        log::info!(
            "Game ready (seed {}, shape {:?}, best {}, audio {})",
            seed,
            state.config.obstacle_shape,
            state.best_score,
            if audio.is_enabled() { "on" } else { "silent" }
        );
        Ok(Self {
            state,
            input: TickInput::default(),
            clock: FrameClock::default(),
            audio,
            scores,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    /// Apply player preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.state.config.max_particles = settings.max_particles();
        self.audio.apply_settings(settings);
    }

    /// Queue an intent for the next tick (any phase)
    pub fn send(&mut self, intent: Intent) {
        self.input.push(intent);
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    /// Run one frame at host time `now` (seconds); returns the step used
    pub fn frame(&mut self, now: f64) -> f32 {
        let dt = self.clock.step(now);
        self.step(dt);
        dt
    }

    /// Run one tick with an explicit step
    pub fn step(&mut self, dt: f32) {
        tick(&mut self.state, &self.input, dt);
        self.input.clear_one_shots();
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            self.audio.on_event(&event);
            if let GameEvent::RunEnd { best, .. } = event {
                self.scores.set_best_score(best);
            }
        }
    }

    /// Snapshot for rendering
    pub fn view(&self) -> FrameView {
        FrameView::capture(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::StoredBestScore;
    use crate::persistence::MemoryStore;
    use crate::sim::GamePhase;

    /// Score store counting writes
    #[derive(Default)]
    struct CountingStore {
        best: u32,
        writes: u32,
    }

    impl ScoreStore for CountingStore {
        fn best_score(&self) -> u32 {
            self.best
        }

        fn set_best_score(&mut self, score: u32) {
            self.best = score;
            self.writes += 1;
        }
    }

    fn game() -> Game<CountingStore> {
        Game::new(
            WorldConfig::default(),
            1,
            CountingStore {
                best: 5,
                writes: 0,
            },
            AudioManager::silent(),
        )
        .expect("default config is valid")
    }

    #[test]
    fn test_frame_clock_clamps() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.step(10.0), 0.0);
        assert!((clock.step(10.016) - 0.016).abs() < 1e-4);
        assert_eq!(clock.step(12.0), MAX_FRAME_DT);
        // Clock going backwards never integrates negative time
        assert_eq!(clock.step(11.0), 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WorldConfig {
            obstacle_gap: 2000.0,
            ..Default::default()
        };
        let result = Game::new(config, 1, CountingStore::default(), AudioManager::silent());
        assert!(result.is_err());
    }

    #[test]
    fn test_best_score_loaded() {
        assert_eq!(game().state().best_score, 5);
    }

    #[test]
    fn test_one_write_per_run() {
        let mut game = game();
        game.send(Intent::Flap);
        let mut t = 0.0;
        while game.state().phase != GamePhase::GameOver && t < 30.0 {
            t += 1.0 / 60.0;
            game.frame(t);
        }
        assert_eq!(game.state().phase, GamePhase::GameOver);
        for _ in 0..10 {
            t += 1.0 / 60.0;
            game.frame(t);
        }
        assert_eq!(game.scores().writes, 1);
        assert_eq!(game.scores().best, 5);
    }

    #[test]
    fn test_intents_are_one_shot() {
        let mut game = game();
        game.send(Intent::Start);
        game.step(1.0 / 60.0);
        assert_eq!(game.state().phase, GamePhase::Running);

        game.send(Intent::TogglePause);
        game.step(1.0 / 60.0);
        assert_eq!(game.state().phase, GamePhase::Paused);
        game.step(1.0 / 60.0);
        assert_eq!(game.state().phase, GamePhase::Paused);
    }

    #[test]
    fn test_settings_cap_particles() {
        let mut game = game();
        game.apply_settings(&Settings {
            particles: false,
            ..Settings::default()
        });
        game.send(Intent::Flap);
        game.step(1.0 / 60.0);
        assert!(game.state().entities.particles().is_empty());
    }

    #[test]
    fn test_new_best_persisted_through_store() {
        let scores = StoredBestScore::load(MemoryStore::new());
        let mut game = Game::new(WorldConfig::default(), 3, scores, AudioManager::silent())
            .expect("valid");
        game.send(Intent::Start);
        game.step(1.0 / 60.0);
        game.state.score = 12;
        game.state.end_run();
        game.step(1.0 / 60.0);
        assert_eq!(game.scores().best_score(), 12);
    }
}
