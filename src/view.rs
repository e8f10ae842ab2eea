//! Read-only frame snapshot for renderers
//!
//! Plain data copied out of [`GameState`]; serializable so a host can ship it
//! across a boundary (worker, socket, JS) as JSON.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub rotation: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupView {
    pub pos: Vec2,
    pub radius: f32,
    pub collected: bool,
    /// Spin angle; renderers stagger it per star
    pub spin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub rotation: f32,
    pub size: f32,
    /// 0 = new, 1 = about to expire
    pub age_ratio: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub score: u32,
    pub best_score: u32,
    pub level: u32,
    /// Scroll speed, for parallax layers
    pub obstacle_speed: f32,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub pickups: Vec<PickupView>,
    pub particles: Vec<ParticleView>,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let entities = &state.entities;
        let width = state.config.obstacle_width;
        Self {
            phase: state.phase,
            score: state.score,
            best_score: state.best_score,
            level: state.level,
            obstacle_speed: state.obstacle_speed,
            player: PlayerView {
                pos: entities.player.pos,
                rotation: entities.player.rotation,
                radius: entities.player.radius,
            },
            obstacles: entities
                .obstacles()
                .iter()
                .map(|o| ObstacleView {
                    x: o.x,
                    top: o.top,
                    bottom: o.bottom,
                    width,
                })
                .collect(),
            pickups: entities
                .pickups()
                .iter()
                .map(|p| PickupView {
                    pos: p.pos,
                    radius: p.radius,
                    collected: p.collected,
                    spin: state.pickup_spin,
                })
                .collect(),
            particles: entities
                .particles()
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    rotation: p.rotation,
                    size: p.size,
                    age_ratio: p.age_ratio(),
                })
                .collect(),
        }
    }

    /// JSON for hosts across a process or language boundary
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
