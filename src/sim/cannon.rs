//! Cannonballs

use glam::Vec2;

use super::actor::{Actor, ActorKind};
use super::sprite::{SpriteBank, SpriteId};
use super::water::WaterField;
use crate::consts::*;
use crate::{DEGREE, RADIAN};

/// Downward acceleration of a ball in flight
pub const BALL_GRAVITY: f32 = 0.4;
/// Velocity kept per tick once under water
pub const BALL_WATER_DRAG: f32 = 0.9;

const NORMAL_SPEED: f32 = 11.0;
const SPECIAL_SPEED: f32 = 14.0;
const NORMAL_ELEVATION: f32 = 25.0;
const SPECIAL_ELEVATION: f32 = 15.0;

/// Which way a shot leaves the muzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    /// Player shots
    Right,
    /// Enemy shots
    Left,
}

/// A ballistic projectile
#[derive(Debug, Clone)]
pub struct Cannon {
    pub actor: Actor,
    /// Heavy shot: faster, flatter and aligned with its flight path
    pub special: bool,
    /// Has touched the water at least once
    pub underwater: bool,
}

impl Cannon {
    /// Launch a ball from `muzzle`, elevated relative to the firing ship's tilt
    ///
    /// Special shots only exist for the rightward (player) heading.
    pub fn launch(
        sprites: &SpriteBank,
        muzzle: Vec2,
        ship_angle: f32,
        heading: Heading,
        special: bool,
    ) -> Self {
        let special = special && heading == Heading::Right;
        let (angle, speed) = match heading {
            Heading::Right if special => (-ship_angle - SPECIAL_ELEVATION, SPECIAL_SPEED),
            Heading::Right => (-ship_angle - NORMAL_ELEVATION, NORMAL_SPEED),
            Heading::Left => (-ship_angle + 180.0 + NORMAL_ELEVATION, NORMAL_SPEED),
        };
        let (sin, cos) = (angle * RADIAN).sin_cos();

        let mut actor = Actor::new(ActorKind::Cannon, sprites.get(SpriteId::Cannonball))
            .at(muzzle)
            .moving(Vec2::new(cos, sin) * speed);
        if special {
            actor.set_frame(1);
        }
        Self {
            actor,
            special,
            underwater: false,
        }
    }

    pub fn update(&mut self, water: &WaterField) {
        let a = &mut self.actor;
        a.pos += a.vel;
        a.vel.y += BALL_GRAVITY;

        if a.bottom() > water.level(a.center().x) {
            a.vel *= BALL_WATER_DRAG;
            self.underwater = true;
        }

        if self.special && a.vel.x != 0.0 {
            a.set_angle(-(a.vel.y / a.vel.x).atan() * DEGREE);
        }
    }

    /// Point the smoke trail is emitted from
    pub fn tail(&self) -> Vec2 {
        let a = &self.actor;
        let width = a.size().x;
        Vec2::new(
            a.pos.x,
            a.center().y - 3.0 + width * (a.angle() * RADIAN).sin(),
        )
    }

    /// Left the playfield through the edge it was heading for, or fell out the bottom
    pub fn out_of_field(&self) -> bool {
        let a = &self.actor;
        (a.right() < 0.0 && a.vel.x < 0.0)
            || (a.pos.x > FIELD_WIDTH && a.vel.x > 0.0)
            || a.pos.y > FIELD_HEIGHT
    }
}
