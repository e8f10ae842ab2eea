//! Clamped-step simulation tick
//!
//! The host calls [`tick`] once per frame with the frame's elapsed time.
//! Intents are applied first, then integration and collisions run if the
//! state is (still) running.

use super::collision::resolve_collisions;
use super::physics::advance;
use super::state::{GamePhase, GameState};
use crate::consts::MAX_FRAME_DT;

/// A discrete player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Flap,
    TogglePause,
    Start,
    Restart,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub flap: bool,
    pub toggle_pause: bool,
    pub start: bool,
    pub restart: bool,
    /// Demo mode - the autopilot flies
    pub autopilot: bool,
}

impl TickInput {
    /// Record an intent for the next tick
    pub fn push(&mut self, intent: Intent) {
        match intent {
            Intent::Flap => self.flap = true,
            Intent::TogglePause => self.toggle_pause = true,
            Intent::Start => self.start = true,
            Intent::Restart => self.restart = true,
        }
    }

    /// Clear one-shot intents after they were processed
    pub fn clear_one_shots(&mut self) {
        self.flap = false;
        self.toggle_pause = false;
        self.start = false;
        self.restart = false;
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.start {
        state.start();
    }
    if input.restart {
        state.restart();
    }
    if input.toggle_pause {
        state.toggle_pause();
    }

    let mut flap = input.flap;
    if input.autopilot {
        match state.phase {
            GamePhase::Ready => {
                state.start();
            }
            GamePhase::Running => flap |= autopilot_wants_flap(state),
            _ => {}
        }
    }
    if flap {
        state.flap();
    }

    if state.phase != GamePhase::Running {
        return;
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    advance(state, dt);
    resolve_collisions(state);
}

/// Flap when sinking below the next gap's target height
pub fn autopilot_wants_flap(state: &GameState) -> bool {
    let player = state.entities.player;
    let config = &state.config;
    let target = state
        .entities
        .obstacles()
        .iter()
        .find(|o| o.x + config.obstacle_width > player.pos.x - player.radius)
        .map(|o| o.gap_center() + config.gap_half() * 0.35)
        .unwrap_or(config.height * 0.5);
    player.pos.y > target && player.vel_y > 0.0
}
