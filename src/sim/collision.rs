//! Collision detection and resolution
//!
//! Player vs world bounds, stars and cloud obstacles. Obstacles are either two
//! ellipses matching the cloud artwork or two plain rectangles, selected once
//! through [`ObstacleShape`].

use glam::Vec2;

use super::state::{GamePhase, GameState, Obstacle, Player};
use crate::tuning::{ObstacleShape, WorldConfig};

/// Result of clamping the player against the world bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryContact {
    Clear,
    /// Bumped the ceiling (harmless)
    Ceiling,
    /// Touched the ground (fatal)
    Ground,
}

/// An axis-aligned ellipse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Vec2,
    pub rx: f32,
    pub ry: f32,
}

impl Ellipse {
    /// Approximate circle overlap test
    ///
    /// Works in the ellipse's unit space: the offset is divided by the radii
    /// and the circle radius is scaled by the larger radius.
    pub fn overlaps_circle(&self, pos: Vec2, radius: f32) -> bool {
        let d = (pos - self.center) / Vec2::new(self.rx, self.ry);
        let reach = 1.0 + radius / self.rx.max(self.ry);
        d.length_squared() <= reach * reach
    }
}

/// Collision ellipses for the clouds above and below a gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudPair {
    pub top: Ellipse,
    pub bottom: Ellipse,
}

impl CloudPair {
    pub fn for_obstacle(obstacle: &Obstacle, config: &WorldConfig) -> Self {
        let cloud = &config.cloud;
        let draw_w = config.cloud_width();
        let draw_h = cloud.height;
        // Clouds are drawn centered on the obstacle
        let cx = obstacle.x + config.obstacle_width * 0.5;
        let rx = draw_w * cloud.rx_factor;
        let ry = draw_h * cloud.ry_factor;

        let bottom_y = obstacle.bottom - cloud.overlap + draw_h * cloud.bottom_center_factor;
        let top_y = obstacle.top.max(0.0) - cloud.outer_extent() + draw_h * cloud.top_center_factor;

        Self {
            top: Ellipse {
                center: Vec2::new(cx, top_y),
                rx,
                ry,
            },
            bottom: Ellipse {
                center: Vec2::new(cx, bottom_y),
                rx,
                ry,
            },
        }
    }
}

/// Circle-circle overlap without a square root
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// Whether the player's horizontal extent overlaps the obstacle's columns
#[inline]
pub fn spans_overlap(pos: Vec2, radius: f32, obstacle: &Obstacle, width: f32) -> bool {
    pos.x + radius > obstacle.x && pos.x - radius < obstacle.x + width
}

/// Player circle vs one obstacle
pub fn hits_obstacle(
    pos: Vec2,
    radius: f32,
    obstacle: &Obstacle,
    config: &WorldConfig,
    shape: ObstacleShape,
) -> bool {
    if !spans_overlap(pos, radius, obstacle, config.obstacle_width) {
        return false;
    }

    match shape {
        ObstacleShape::Rectangle => {
            pos.y - radius < obstacle.top || pos.y + radius > obstacle.bottom
        }
        ObstacleShape::EllipsePair => {
            let clouds = CloudPair::for_obstacle(obstacle, config);
            if pos.y < obstacle.top {
                clouds.top.overlaps_circle(pos, radius)
            } else if pos.y > obstacle.bottom {
                clouds.bottom.overlaps_circle(pos, radius)
            } else {
                // Inside the gap the circle can still graze either cloud's lip
                clouds.top.overlaps_circle(pos, radius)
                    || clouds.bottom.overlaps_circle(pos, radius)
            }
        }
    }
}

/// Clamp the player into the world and report what it touched
pub fn clamp_to_bounds(player: &mut Player, config: &WorldConfig) -> BoundaryContact {
    if player.top() < 0.0 {
        player.pos.y = player.radius;
        player.vel_y = 0.0;
        return BoundaryContact::Ceiling;
    }
    let floor = config.floor_y();
    if player.bottom() > floor {
        player.pos.y = floor - player.radius;
        return BoundaryContact::Ground;
    }
    BoundaryContact::Clear
}

/// Run every collision check for this tick
///
/// Order: bounds, then stars, then obstacles. Does nothing unless running, so
/// repeated calls after a fatal hit cannot end the run twice.
pub fn resolve_collisions(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }

    if clamp_to_bounds(&mut state.entities.player, &state.config) == BoundaryContact::Ground {
        state.end_run();
        return;
    }

    let player = state.entities.player;
    let mut collected = 0;
    // A collected star stays one frame with its flag set so renderers can pop it
    state.entities.retain_pickups(|_, pickup| {
        if pickup.collected {
            return false;
        }
        if circles_overlap(player.pos, player.radius, pickup.pos, pickup.radius) {
            pickup.collected = true;
            collected += 1;
        }
        true
    });
    for _ in 0..collected {
        state.award_pickup();
    }

    let shape = state.config.obstacle_shape;
    let hit = state
        .entities
        .obstacles()
        .iter()
        .any(|o| hits_obstacle(player.pos, player.radius, o, &state.config, shape));
    if hit {
        state.end_run();
    }
}
