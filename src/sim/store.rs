//! Entity storage
//!
//! Obstacles are kept sorted by [`ObstacleId`] (ids are handed out in append
//! order and removal preserves order), so parent lookups are a binary search.
//! Pickups point at their obstacle by id rather than by position, which keeps
//! every surviving reference valid no matter which obstacle is removed.

use std::collections::VecDeque;

use super::state::{Obstacle, ObstacleId, Particle, Pickup, Player};
use crate::tuning::WorldConfig;

/// Owns the player and every obstacle, pickup and particle
#[derive(Debug, Clone)]
pub struct EntityStore {
    pub player: Player,
    obstacles: Vec<Obstacle>,
    pickups: Vec<Pickup>,
    /// Oldest first
    particles: VecDeque<Particle>,
    next_id: u32,
}

/// Find an obstacle by id in an id-sorted slice
fn find(obstacles: &[Obstacle], id: ObstacleId) -> Option<&Obstacle> {
    obstacles
        .binary_search_by_key(&id, |o| o.id)
        .ok()
        .map(|i| &obstacles[i])
}

impl EntityStore {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            player: Player::spawn(config),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            particles: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Drop every entity and respawn the player. Ids keep counting up.
    pub fn clear(&mut self, config: &WorldConfig) {
        self.player = Player::spawn(config);
        self.obstacles.clear();
        self.pickups.clear();
        self.particles.clear();
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn particles(&self) -> &VecDeque<Particle> {
        &self.particles
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        find(&self.obstacles, id)
    }

    /// Append an obstacle and return its id
    pub fn push_obstacle(&mut self, x: f32, top: f32, bottom: f32) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            x,
            top,
            bottom,
            passed: false,
        });
        id
    }

    /// Append a pickup. Refused (returns false) if its parent does not exist.
    pub fn push_pickup(&mut self, pickup: Pickup) -> bool {
        if self.obstacle(pickup.parent).is_none() {
            log::warn!("Dropping pickup for unknown obstacle {:?}", pickup.parent);
            return false;
        }
        self.pickups.push(pickup);
        true
    }

    /// Append a particle, evicting the oldest when `cap` is reached
    pub fn push_particle(&mut self, particle: Particle, cap: usize) {
        if cap == 0 {
            return;
        }
        while self.particles.len() >= cap {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Remove the obstacle at `index` together with its pickups
    pub fn remove_obstacle_at(&mut self, index: usize) -> Option<Obstacle> {
        if index >= self.obstacles.len() {
            return None;
        }
        let removed = self.obstacles.remove(index);
        self.pickups.retain(|p| p.parent != removed.id);
        Some(removed)
    }

    /// Keep obstacles matching `keep`; pickups of dropped ones go too.
    /// Returns how many obstacles were removed.
    pub fn retain_obstacles<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Obstacle) -> bool,
    {
        let before = self.obstacles.len();
        let mut dropped = Vec::new();
        self.obstacles.retain(|o| {
            let k = keep(o);
            if !k {
                dropped.push(o.id);
            }
            k
        });
        if !dropped.is_empty() {
            self.pickups.retain(|p| !dropped.contains(&p.parent));
        }
        before - self.obstacles.len()
    }

    /// Keep pickups matching `keep`, which also sees the resolved parent
    /// (`None` if the parent is gone). Returns how many were removed.
    pub fn retain_pickups<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(Option<&Obstacle>, &mut Pickup) -> bool,
    {
        let before = self.pickups.len();
        let obstacles = &self.obstacles;
        self.pickups.retain_mut(|p| keep(find(obstacles, p.parent), p));
        before - self.pickups.len()
    }

    /// Keep particles matching `keep` (which may mutate them)
    pub fn retain_particles<F>(&mut self, keep: F)
    where
        F: FnMut(&mut Particle) -> bool,
    {
        self.particles.retain_mut(keep);
    }
}
