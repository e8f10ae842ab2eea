//! World tunables
//!
//! Static configuration for a run. Everything mutable during play (current
//! obstacle speed, difficulty level) lives in [`crate::sim::GameState`] and is
//! derived from these base values on every reset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Invalid world configuration, reported once at startup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive and finite (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must be non-negative and finite (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("obstacle gap {gap} does not fit in the playfield height {playfield}")]
    GapTooLarge { gap: f32, playfield: f32 },
    #[error("no valid gap center: range [{min}, {max}] is empty")]
    EmptySpawnRange { min: f32, max: f32 },
    #[error("speed step score must be at least 1")]
    ZeroSpeedStep,
    #[error("invalid config JSON: {0}")]
    Parse(String),
}

/// How obstacle halves are shaped for collision
///
/// Picked once at startup. The rendered footprint and the collision footprint
/// are the same shape, so a host without cloud artwork must use `Rectangle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// Two ellipses approximating the cloud sprites
    #[default]
    EllipsePair,
    /// Two rectangles bounding the gap
    Rectangle,
}

impl ObstacleShape {
    /// Shape to use given whether the cloud artwork loaded
    pub fn for_assets(cloud_art_loaded: bool) -> Self {
        if cloud_art_loaded {
            ObstacleShape::EllipsePair
        } else {
            log::warn!("Cloud artwork unavailable, using rectangle obstacles");
            ObstacleShape::Rectangle
        }
    }
}

/// Visual footprint of the clouds framing a gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudShape {
    /// Drawn width relative to obstacle width
    pub width_scale: f32,
    /// Drawn height of each cloud
    pub height: f32,
    /// How far each cloud reaches into the gap
    pub overlap: f32,
    /// Ellipse radii relative to drawn width/height
    pub rx_factor: f32,
    pub ry_factor: f32,
    /// Ellipse center as a fraction of drawn height (measured from cloud top)
    pub bottom_center_factor: f32,
    pub top_center_factor: f32,
}

impl Default for CloudShape {
    fn default() -> Self {
        Self {
            width_scale: CLOUD_WIDTH_SCALE,
            height: CLOUD_HEIGHT,
            overlap: CLOUD_OVERLAP,
            rx_factor: CLOUD_RX_FACTOR,
            ry_factor: CLOUD_RY_FACTOR,
            bottom_center_factor: 0.52,
            top_center_factor: 0.48,
        }
    }
}

impl CloudShape {
    /// Part of a cloud that sticks out beyond the gap edge
    pub fn outer_extent(&self) -> f32 {
        self.height - self.overlap
    }
}

/// Tunables for one world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Height of the ground strip at the bottom of the world
    pub ground_offset: f32,

    pub gravity: f32,
    /// Vertical velocity set on flap (negative = up)
    pub jump_impulse: f32,
    pub max_fall_speed: f32,
    pub pitch_reference: f32,
    pub player_radius: f32,
    pub player_x_fraction: f32,

    pub base_obstacle_speed: f32,
    pub obstacle_gap: f32,
    pub obstacle_spacing: f32,
    pub obstacle_width: f32,
    pub obstacle_cull_margin: f32,

    pub speed_step_score: u32,
    pub speed_increment: f32,

    pub ui_safe_top: f32,
    pub min_gap_delta: f32,
    pub gap_resample_limit: u32,

    pub pickups_per_obstacle: usize,
    pub pickup_spacing: f32,
    pub pickup_radius: f32,
    pub pickup_cull_margin: f32,

    pub cloud: CloudShape,
    pub obstacle_shape: ObstacleShape,

    pub max_particles: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            ground_offset: GROUND_OFFSET,

            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            max_fall_speed: MAX_FALL_SPEED,
            pitch_reference: PITCH_REFERENCE,
            player_radius: PLAYER_RADIUS,
            player_x_fraction: PLAYER_X_FRACTION,

            base_obstacle_speed: BASE_OBSTACLE_SPEED,
            obstacle_gap: OBSTACLE_GAP,
            obstacle_spacing: OBSTACLE_SPACING,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_cull_margin: OBSTACLE_CULL_MARGIN,

            speed_step_score: SPEED_STEP_SCORE,
            speed_increment: SPEED_INCREMENT,

            ui_safe_top: UI_SAFE_TOP,
            min_gap_delta: MIN_GAP_DELTA,
            gap_resample_limit: GAP_RESAMPLE_LIMIT,

            pickups_per_obstacle: PICKUPS_PER_OBSTACLE,
            pickup_spacing: PICKUP_SPACING,
            pickup_radius: PICKUP_RADIUS,
            pickup_cull_margin: PICKUP_CULL_MARGIN,

            cloud: CloudShape::default(),
            obstacle_shape: ObstacleShape::default(),

            max_particles: MAX_PARTICLES,
        }
    }
}

impl WorldConfig {
    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check preconditions the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("pitch_reference", self.pitch_reference),
            ("player_radius", self.player_radius),
            ("base_obstacle_speed", self.base_obstacle_speed),
            ("obstacle_gap", self.obstacle_gap),
            ("obstacle_spacing", self.obstacle_spacing),
            ("obstacle_width", self.obstacle_width),
            ("pickup_radius", self.pickup_radius),
            ("cloud.height", self.cloud.height),
            ("cloud.width_scale", self.cloud.width_scale),
            ("cloud.rx_factor", self.cloud.rx_factor),
            ("cloud.ry_factor", self.cloud.ry_factor),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        // Zero allowed; obstacle speed must never drop on level-up
        let non_negative = [
            ("ground_offset", self.ground_offset),
            ("speed_increment", self.speed_increment),
            ("ui_safe_top", self.ui_safe_top),
            ("min_gap_delta", self.min_gap_delta),
            ("obstacle_cull_margin", self.obstacle_cull_margin),
            ("pickup_cull_margin", self.pickup_cull_margin),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.speed_step_score == 0 {
            return Err(ConfigError::ZeroSpeedStep);
        }

        let playfield = self.floor_y();
        if self.obstacle_gap >= playfield {
            return Err(ConfigError::GapTooLarge {
                gap: self.obstacle_gap,
                playfield,
            });
        }

        let (min, max) = self.gap_center_range();
        if max < min {
            return Err(ConfigError::EmptySpawnRange { min, max });
        }

        Ok(())
    }

    /// Y of the ground line (player dies below it)
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.height - self.ground_offset
    }

    #[inline]
    pub fn gap_half(&self) -> f32 {
        self.obstacle_gap * 0.5
    }

    /// Fixed x of the player
    #[inline]
    pub fn player_x(&self) -> f32 {
        self.width * self.player_x_fraction
    }

    /// Drawn cloud width
    #[inline]
    pub fn cloud_width(&self) -> f32 {
        self.obstacle_width * self.cloud.width_scale
    }

    /// Where a new obstacle's left edge is placed
    #[inline]
    pub fn spawn_x(&self) -> f32 {
        self.width + self.obstacle_width
    }

    /// Inclusive range of gap centers that keep both clouds fully on screen
    ///
    /// The top cloud must stay below the UI-safe margin and the bottom cloud
    /// above the ground line.
    pub fn gap_center_range(&self) -> (f32, f32) {
        let extent = self.cloud.outer_extent();
        let min_top = self.ui_safe_top.max(extent);
        let max_bottom = self.floor_y() - extent;
        (min_top + self.gap_half(), max_bottom - self.gap_half())
    }

    /// Obstacle speed at a given difficulty level
    pub fn speed_for_level(&self, level: u32) -> f32 {
        self.base_obstacle_speed + self.speed_increment * level as f32
    }

    /// Difficulty level reached at a given score
    pub fn level_for_score(&self, score: u32) -> u32 {
        score / self.speed_step_score.max(1)
    }
}
