//! Shared actor record
//!
//! Every moving thing in the game (boats, enemies, cannonballs, powerups)
//! carries one [`Actor`]: kinematics, a forward-only life cycle and a rotated
//! opacity mask that is rebuilt only when the frame or angle changes.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sprite::{AlphaMask, Sprite, SpriteId};
use crate::RADIAN;

/// Kind tag used to select per-kind tuning tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Shark,
    Pirate,
    Mine,
    Seagull,
    Boss,
    Powerup,
    Cannon,
}

/// Life cycle of a destructible actor; only ever advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifeCycle {
    Alive,
    /// Death animation in progress
    Dying,
    /// Ready for removal
    Dead,
}

/// Rotated mask cached against the (frame, angle) it was built for
#[derive(Debug, Clone, Default)]
struct MaskCache {
    key: Option<(usize, f32)>,
    rotated: Option<AlphaMask>,
}

/// Common state of every simulated object
#[derive(Debug, Clone)]
pub struct Actor {
    pub kind: ActorKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    /// Rendered tilt in degrees (counter-clockwise on screen)
    angle: f32,
    /// Tilt the actor eases toward
    pub target_angle: f32,
    /// Hit points
    pub life: i32,
    lifecycle: LifeCycle,
    /// Airborne (above the water surface)
    pub jumping: bool,
    /// Ticks this actor has been updated
    pub ticks: u32,
    sprite: Arc<Sprite>,
    frame: usize,
    mask: MaskCache,
}

impl Actor {
    pub fn new(kind: ActorKind, sprite: Arc<Sprite>) -> Self {
        Self {
            kind,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            angle: 0.0,
            target_angle: 0.0,
            life: 0,
            lifecycle: LifeCycle::Alive,
            jumping: false,
            ticks: 0,
            sprite,
            frame: 0,
            mask: MaskCache::default(),
        }
    }

    pub fn with_life(mut self, life: i32) -> Self {
        self.life = life;
        self
    }

    pub fn at(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn moving(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    // --- Life cycle ---

    pub fn lifecycle(&self) -> LifeCycle {
        self.lifecycle
    }

    /// Death animation started (stays true once dead)
    pub fn is_dying(&self) -> bool {
        self.lifecycle >= LifeCycle::Dying
    }

    pub fn is_dead(&self) -> bool {
        self.lifecycle == LifeCycle::Dead
    }

    pub fn is_alive(&self) -> bool {
        self.lifecycle == LifeCycle::Alive
    }

    /// Alive -> Dying without touching kinematics; false if already dying
    pub fn begin_dying(&mut self) -> bool {
        if self.lifecycle != LifeCycle::Alive {
            return false;
        }
        self.lifecycle = LifeCycle::Dying;
        true
    }

    /// Dying -> Dead; an alive actor must start dying first
    pub fn finish_dying(&mut self) -> bool {
        if self.lifecycle != LifeCycle::Dying {
            return false;
        }
        self.lifecycle = LifeCycle::Dead;
        true
    }

    /// Standard death: a small hop and a roll toward 90 degrees
    pub fn die(&mut self) -> bool {
        if !self.begin_dying() {
            return false;
        }
        self.vel.y = -5.0;
        self.target_angle = 90.0;
        true
    }

    /// Subtract hit points; returns true if this hit started the death
    pub fn damage(&mut self, amount: i32) -> bool {
        self.life -= amount;
        self.life <= 0 && self.die()
    }

    // --- Sprite geometry ---

    pub fn sprite_id(&self) -> SpriteId {
        self.sprite.id
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn set_frame(&mut self, frame: usize) {
        self.frame = frame % self.sprite.frame_count();
    }

    pub fn frame_count(&self) -> usize {
        self.sprite.frame_count()
    }

    /// Unrotated mask of the current frame
    pub fn base_mask(&self) -> &AlphaMask {
        self.sprite.frame(self.frame)
    }

    /// Sprite box size of the current frame
    pub fn size(&self) -> Vec2 {
        let m = self.base_mask();
        Vec2::new(m.width() as f32, m.height() as f32)
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size().x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size().y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size() / 2.0
    }

    // --- Rotation ---

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Set the rendered tilt; the collision mask is rebuilt lazily
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    /// Rotate an offset (relative to the sprite center) by the current tilt
    pub fn rotate(&self, offset: Vec2) -> Vec2 {
        let (sin, cos) = (self.angle * RADIAN).sin_cos();
        Vec2::new(
            offset.x * cos + offset.y * sin,
            offset.y * cos - offset.x * sin,
        )
    }

    /// Screen position of a point given in unrotated sprite coordinates
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.center() + self.rotate(local - self.size() / 2.0)
    }

    /// Bring the cached rotated mask up to date with frame and angle
    pub fn refresh_mask(&mut self) {
        let key = (self.frame, self.angle);
        if self.mask.key == Some(key) {
            return;
        }
        self.mask.rotated = if self.angle == 0.0 {
            None
        } else {
            Some(self.base_mask().rotated(self.angle))
        };
        self.mask.key = Some(key);
    }

    /// True when the cached mask matches the current frame and angle
    pub fn mask_is_fresh(&self) -> bool {
        self.mask.key == Some((self.frame, self.angle))
    }

    /// Collision mask for the current frame and angle
    ///
    /// Call [`Actor::refresh_mask`] first; a stale cache returns the last built mask.
    pub fn collision_mask(&self) -> &AlphaMask {
        match (&self.mask.key, &self.mask.rotated) {
            (Some((frame, _)), Some(mask)) if *frame == self.frame => mask,
            _ => self.base_mask(),
        }
    }

    /// Top-left of the collision mask: the rotated box shares the sprite center
    pub fn collision_origin(&self) -> Vec2 {
        let mask = self.collision_mask();
        let rotated = Vec2::new(mask.width() as f32, mask.height() as f32);
        self.center() - rotated / 2.0
    }

    /// Swap in a custom sprite (e.g. a mine with its chain)
    pub fn replace_sprite(&mut self, sprite: Arc<Sprite>) {
        self.sprite = sprite;
        self.frame = 0;
        self.mask = MaskCache::default();
    }
}

/// Swap-remove every element matching `remove`, re-reading the length each step
///
/// Order is not preserved; an element swapped into slot `i` is examined next.
pub fn swap_remove_where<T>(items: &mut Vec<T>, mut remove: impl FnMut(&T) -> bool) -> usize {
    let mut removed = 0;
    let mut i = 0;
    while i < items.len() {
        if remove(&items[i]) {
            items.swap_remove(i);
            removed += 1;
        } else {
            i += 1;
        }
    }
    removed
}
