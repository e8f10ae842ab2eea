//! Procedural obstacle placement

use rand::Rng;

use super::state::{ObstacleId, Pickup};
use super::store::EntityStore;
use crate::tuning::WorldConfig;
use glam::Vec2;

/// What a spawn produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOutcome {
    pub id: ObstacleId,
    pub gap_center: f32,
    /// Extra draws taken to move away from the previous gap
    pub resamples: u32,
    /// Resample budget ran out and the candidate was accepted anyway
    pub budget_exhausted: bool,
}

/// Horizontal offsets of the pickups bound to one obstacle, centered on its midline
pub fn pickup_offsets(config: &WorldConfig) -> impl Iterator<Item = f32> + '_ {
    let n = config.pickups_per_obstacle;
    let span = config.pickup_spacing * n.saturating_sub(1) as f32;
    let start = config.obstacle_width * 0.5 - span * 0.5;
    (0..n).map(move |i| start + i as f32 * config.pickup_spacing)
}

/// Append a new obstacle at the right edge plus its pickups
///
/// Precondition: `config` passed [`WorldConfig::validate`], so the gap-center
/// range is non-empty.
pub fn spawn_obstacle_pair<R: Rng>(
    store: &mut EntityStore,
    config: &WorldConfig,
    rng: &mut R,
    last_gap_center: &mut Option<f32>,
) -> SpawnOutcome {
    let (min_center, max_center) = config.gap_center_range();
    // Degenerate range still gets a 1px window to draw from
    let hi = max_center.max(min_center + 1.0);

    let mut gap_center = rng.random_range(min_center..hi);
    let mut resamples = 0;
    let mut budget_exhausted = false;

    // Avoid flat rows of gaps
    if let Some(prev) = *last_gap_center {
        while (gap_center - prev).abs() < config.min_gap_delta {
            if resamples >= config.gap_resample_limit {
                budget_exhausted = true;
                break;
            }
            gap_center = rng.random_range(min_center..hi);
            resamples += 1;
        }
    }
    *last_gap_center = Some(gap_center);

    let x = config.spawn_x();
    let id = store.push_obstacle(
        x,
        gap_center - config.gap_half(),
        gap_center + config.gap_half(),
    );

    for offset_x in pickup_offsets(config) {
        store.push_pickup(Pickup {
            parent: id,
            offset_x,
            pos: Vec2::new(x + offset_x, gap_center),
            radius: config.pickup_radius,
            collected: false,
        });
    }

    log::debug!(
        "Spawned obstacle {:?} gap center {:.1} ({} resamples)",
        id,
        gap_center,
        resamples
    );

    SpawnOutcome {
        id,
        gap_center,
        resamples,
        budget_exhausted,
    }
}
