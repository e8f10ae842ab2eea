//! Unicorn Fly - a side-scrolling arcade flyer
//!
//! Core modules:
//! - `sim`: Simulation core (physics, generation, collisions, game state)
//! - `tuning`: World tunables and startup validation
//! - `game`: Host-side frame driver wiring the sim to audio and storage
//! - `view`: Read-only snapshot for renderers
//! - `persistence`: Key-value storage for best score and settings

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod view;

pub use game::{FrameClock, Game};
pub use highscores::{ScoreStore, StoredBestScore};
pub use settings::{QualityPreset, Settings};
pub use tuning::{ConfigError, ObstacleShape, WorldConfig};

/// Default tunables
pub mod consts {
    /// Largest step a single tick may integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 480.0;
    pub const WORLD_HEIGHT: f32 = 720.0;
    pub const GROUND_OFFSET: f32 = 0.0;

    /// Player motion
    pub const GRAVITY: f32 = 1200.0;
    pub const JUMP_IMPULSE: f32 = -360.0;
    pub const MAX_FALL_SPEED: f32 = 600.0;
    /// Horizontal reference for the pitch angle (bigger = flatter)
    pub const PITCH_REFERENCE: f32 = 400.0;
    pub const PLAYER_RADIUS: f32 = 18.0;
    /// Player x as a fraction of world width
    pub const PLAYER_X_FRACTION: f32 = 0.28;

    /// Obstacle defaults
    pub const BASE_OBSTACLE_SPEED: f32 = 140.0;
    pub const OBSTACLE_GAP: f32 = 160.0;
    pub const OBSTACLE_SPACING: f32 = 210.0;
    pub const OBSTACLE_WIDTH: f32 = 70.0;
    /// Removed once `x + width` drops below `-OBSTACLE_CULL_MARGIN`
    pub const OBSTACLE_CULL_MARGIN: f32 = 100.0;

    /// Difficulty: one level per `SPEED_STEP_SCORE` points
    pub const SPEED_STEP_SCORE: u32 = 30;
    /// Obstacle speed added per level (px/s)
    pub const SPEED_INCREMENT: f32 = 12.0;

    /// Gap placement
    pub const UI_SAFE_TOP: f32 = 70.0;
    pub const MIN_GAP_DELTA: f32 = 70.0;
    pub const GAP_RESAMPLE_LIMIT: u32 = 8;

    /// Pickups
    pub const PICKUPS_PER_OBSTACLE: usize = 3;
    pub const PICKUP_SPACING: f32 = 42.0;
    pub const PICKUP_RADIUS: f32 = 10.0;
    pub const PICKUP_CULL_MARGIN: f32 = 50.0;
    pub const PICKUP_SPIN_RATE: f32 = 4.0;

    /// Cloud visuals (also the ellipse collision footprint)
    pub const CLOUD_WIDTH_SCALE: f32 = 1.7;
    pub const CLOUD_HEIGHT: f32 = 130.0;
    pub const CLOUD_OVERLAP: f32 = 18.0;
    pub const CLOUD_RX_FACTOR: f32 = 0.40;
    pub const CLOUD_RY_FACTOR: f32 = 0.45;

    /// Star dust
    pub const MAX_PARTICLES: usize = 256;
    pub const PARTICLE_DRIFT: f32 = 20.0;
    pub const EMIT_RATE: f32 = 12.0;
    pub const EMIT_BOOST: f32 = 18.0;
    /// Vertical velocity below which emission is boosted
    pub const EMIT_BOOST_VELOCITY: f32 = -40.0;
    pub const FLAP_BURST: usize = 7;
}
