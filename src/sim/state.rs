//! Game state and core simulation types
//!
//! [`GameState`] is the whole simulation context: hosts own it and pass it to
//! [`super::tick`]. Phase transitions live here so that every entry point
//! (intents, collisions) goes through the same guarded methods.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics;
use super::store::EntityStore;
use crate::consts::FLAP_BURST;
use crate::tuning::{ConfigError, WorldConfig};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first intent
    Ready,
    /// Active gameplay
    Running,
    /// Frozen; nothing integrates
    Paused,
    /// Run ended
    GameOver,
}

/// Stable obstacle handle (monotonic, never reused within a state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// The flying player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// x is fixed for the whole run
    pub pos: Vec2,
    /// Positive = falling
    pub vel_y: f32,
    /// Visual pitch (radians), derived from `vel_y`
    pub rotation: f32,
    pub radius: f32,
}

impl Player {
    /// Player at its spawn pose
    pub fn spawn(config: &WorldConfig) -> Self {
        Self {
            pos: Vec2::new(config.player_x(), config.height * 0.5),
            vel_y: 0.0,
            rotation: 0.0,
            radius: config.player_radius,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// A gap pair: solid above `top` and below `bottom`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Left edge
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
    /// Set once the obstacle's midline moved left of the player
    pub passed: bool,
}

impl Obstacle {
    #[inline]
    pub fn gap(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn gap_center(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }
}

/// A star bound to an obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub parent: ObstacleId,
    /// Horizontal offset from the parent's left edge
    pub offset_x: f32,
    /// Absolute position, recomputed every tick from the parent
    pub pos: Vec2,
    pub radius: f32,
    pub collected: bool,
}

/// Star dust (cosmetic only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub age: f32,
    /// Lifetime in seconds
    pub life: f32,
    pub rotation: f32,
    /// Radians per second
    pub spin: f32,
}

impl Particle {
    /// 0 when born, 1 when expired
    pub fn age_ratio(&self) -> f32 {
        if self.life <= 0.0 {
            1.0
        } else {
            (self.age / self.life).clamp(0.0, 1.0)
        }
    }
}

/// Discrete events for audio, UI and storage collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStart,
    Flap,
    Score { score: u32 },
    LevelUp { level: u32, speed: f32 },
    FatalCollision,
    RunEnd { score: u32, best: u32, new_best: bool },
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: WorldConfig,
    pub phase: GamePhase,
    /// Stars collected this run
    pub score: u32,
    /// Best score across runs (loaded from storage by the host)
    pub best_score: u32,
    /// Difficulty level, `score / speed_step_score`
    pub level: u32,
    /// Current obstacle speed (px/s)
    pub obstacle_speed: f32,
    pub entities: EntityStore,
    /// Obstacle travel since the last spawn
    pub spawn_distance: f32,
    /// Fractional particles owed to ambient emission
    pub emit_acc: f32,
    pub last_gap_center: Option<f32>,
    /// Star spin angle for renderers
    pub pickup_spin: f32,
    /// Integrated ticks this run
    pub time_ticks: u64,
    /// Drives obstacle generation
    pub(crate) rng: Pcg32,
    /// Drives cosmetic effects, kept apart so effects never shift obstacle layout
    pub(crate) fx_rng: Pcg32,
    events: Vec<GameEvent>,
}

/// Stream id for the cosmetic RNG
const FX_STREAM: u64 = 0x5eed_f00d;

impl GameState {
    /// New state with default tunables
    pub fn new(seed: u64) -> Self {
        Self::build(seed, WorldConfig::default())
    }

    /// New state with custom tunables, validated once here
    pub fn with_config(seed: u64, config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(seed, config))
    }

    fn build(seed: u64, config: WorldConfig) -> Self {
        Self {
            seed,
            phase: GamePhase::Ready,
            score: 0,
            best_score: 0,
            level: 0,
            obstacle_speed: config.base_obstacle_speed,
            entities: EntityStore::new(&config),
            spawn_distance: 0.0,
            emit_acc: 0.0,
            last_gap_center: None,
            pickup_spin: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::new(seed, FX_STREAM),
            events: Vec::new(),
            config,
        }
    }

    /// Pending events since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Reset run data to base values (phase untouched)
    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 0;
        self.obstacle_speed = self.config.base_obstacle_speed;
        self.entities.clear(&self.config);
        self.spawn_distance = 0.0;
        self.emit_acc = 0.0;
        self.last_gap_center = None;
        self.pickup_spin = 0.0;
        self.time_ticks = 0;
    }

    /// `ready --start--> running`; also accepted from game over
    pub fn start(&mut self) -> bool {
        self.begin_run()
    }

    /// `game over --restart--> running`; also accepted from ready
    pub fn restart(&mut self) -> bool {
        self.begin_run()
    }

    fn begin_run(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Ready | GamePhase::GameOver) {
            return false;
        }
        self.reset();
        self.phase = GamePhase::Running;
        self.push_event(GameEvent::RunStart);
        log::info!("Run started (best {})", self.best_score);
        true
    }

    /// `running <-> paused`; ignored elsewhere
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => self.phase = GamePhase::Paused,
            GamePhase::Paused => self.phase = GamePhase::Running,
            _ => return false,
        }
        true
    }

    /// Flap intent
    ///
    /// Starts the run from ready (and flaps), restarts from game over (no
    /// impulse that tick), and is ignored while paused.
    pub fn flap(&mut self) {
        match self.phase {
            GamePhase::Ready => {
                self.begin_run();
            }
            GamePhase::GameOver => {
                self.begin_run();
                return;
            }
            GamePhase::Paused => return,
            GamePhase::Running => {}
        }

        self.entities.player.vel_y = self.config.jump_impulse;
        self.push_event(GameEvent::Flap);
        for _ in 0..FLAP_BURST {
            physics::emit_particle(self);
        }
    }

    /// Fatal collision: `running --> game over`. No-op in any other phase.
    pub fn end_run(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::GameOver;
        let new_best = self.score > self.best_score;
        self.best_score = self.best_score.max(self.score);
        self.push_event(GameEvent::FatalCollision);
        self.push_event(GameEvent::RunEnd {
            score: self.score,
            best: self.best_score,
            new_best,
        });
        log::info!(
            "Run over: score {} (best {}){}",
            self.score,
            self.best_score,
            if new_best { " - new best!" } else { "" }
        );
        true
    }

    /// One star collected; raises difficulty on level boundaries
    pub fn award_pickup(&mut self) {
        self.score += 1;
        self.push_event(GameEvent::Score { score: self.score });

        let next_level = self.config.level_for_score(self.score);
        if next_level > self.level {
            self.level = next_level;
            self.obstacle_speed = self.config.speed_for_level(next_level);
            self.push_event(GameEvent::LevelUp {
                level: self.level,
                speed: self.obstacle_speed,
            });
            log::info!(
                "Difficulty level {} (obstacle speed {:.0})",
                self.level,
                self.obstacle_speed
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::generator::spawn_obstacle_pair;

    #[test]
    fn test_new_state_is_ready() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.obstacle_speed, BASE_OBSTACLE_SPEED);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = WorldConfig {
            obstacle_gap: 10_000.0,
            ..Default::default()
        };
        assert!(GameState::with_config(1, config).is_err());
    }

    #[test]
    fn test_flap_from_ready_starts_and_flaps() {
        let mut state = GameState::new(1);
        state.flap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.entities.player.vel_y, JUMP_IMPULSE);
        assert_eq!(
            state.events(),
            &[GameEvent::RunStart, GameEvent::Flap][..]
        );
        assert_eq!(state.entities.particles().len(), FLAP_BURST);
    }

    #[test]
    fn test_flap_ignored_while_paused() {
        let mut state = GameState::new(1);
        state.start();
        state.toggle_pause();
        state.drain_events().for_each(drop);
        state.flap();
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.entities.player.vel_y, 0.0);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_flap_from_game_over_restarts_without_impulse() {
        let mut state = GameState::new(1);
        state.start();
        state.end_run();
        state.flap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.entities.player.vel_y, 0.0);
    }

    #[test]
    fn test_invalid_transitions_are_noops() {
        let mut state = GameState::new(1);
        assert!(!state.toggle_pause());
        assert!(!state.end_run());
        assert_eq!(state.phase, GamePhase::Ready);

        state.start();
        assert!(!state.start());
        assert!(!state.restart());
        assert_eq!(state.phase, GamePhase::Running);

        state.toggle_pause();
        assert!(!state.restart());
        assert!(!state.end_run());
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_end_run_is_idempotent() {
        let mut state = GameState::new(1);
        state.start();
        state.score = 4;
        assert!(state.end_run());
        assert!(!state.end_run());
        let run_ends = state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnd { .. }))
            .count();
        assert_eq!(run_ends, 1);
        assert_eq!(state.best_score, 4);
    }

    #[test]
    fn test_best_score_keeps_max() {
        let mut state = GameState::new(1);
        state.best_score = 10;
        state.start();
        state.score = 3;
        state.end_run();
        assert_eq!(state.best_score, 10);
        assert!(state.events().contains(&GameEvent::RunEnd {
            score: 3,
            best: 10,
            new_best: false
        }));
    }

    #[test]
    fn test_level_up_at_step_score() {
        let mut state = GameState::new(1);
        state.start();
        for _ in 0..29 {
            state.award_pickup();
        }
        assert_eq!(state.level, 0);
        assert_eq!(state.obstacle_speed, BASE_OBSTACLE_SPEED);

        state.award_pickup();
        assert_eq!(state.score, 30);
        assert_eq!(state.level, 1);
        assert_eq!(state.obstacle_speed, BASE_OBSTACLE_SPEED + 12.0);
        assert!(state.events().contains(&GameEvent::LevelUp {
            level: 1,
            speed: BASE_OBSTACLE_SPEED + 12.0
        }));
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = GameState::new(7);
        state.start();
        state.flap();
        for _ in 0..2 {
            spawn_obstacle_pair(
                &mut state.entities,
                &state.config,
                &mut state.rng,
                &mut state.last_gap_center,
            );
        }
        for _ in 0..45 {
            state.award_pickup();
        }
        state.spawn_distance = 100.0;
        assert_eq!(state.entities.obstacles().len(), 2);
        assert_eq!(state.entities.pickups().len(), 2 * PICKUPS_PER_OBSTACLE);
        assert!(!state.entities.particles().is_empty());
        assert!(state.end_run());

        assert!(state.restart());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 0);
        assert_eq!(state.obstacle_speed, BASE_OBSTACLE_SPEED);
        assert_eq!(state.spawn_distance, 0.0);
        assert_eq!(state.last_gap_center, None);
        assert_eq!(state.best_score, 45);
        assert!(state.entities.obstacles().is_empty());
        assert!(state.entities.pickups().is_empty());
        assert!(state.entities.particles().is_empty());
        assert_eq!(state.entities.player, Player::spawn(&state.config));
    }

    #[test]
    fn test_negative_speed_increment_rejected() {
        let config = WorldConfig {
            speed_increment: -50.0,
            ..Default::default()
        };
        assert!(matches!(
            GameState::with_config(1, config),
            Err(ConfigError::Negative {
                field: "speed_increment",
                ..
            })
        ));
    }

    #[test]
    fn test_particle_age_ratio() {
        let p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 8.0,
            age: 0.25,
            life: 1.0,
            rotation: 0.0,
            spin: 0.0,
        };
        assert!((p.age_ratio() - 0.25).abs() < 1e-6);
    }
}
