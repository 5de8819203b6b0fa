//! Boat kinematics
//!
//! The player's steamboat, pirate ships and the Titanic all float with one
//! routine: sample the sea under the hull at three points, push up when the
//! keel is under water, fall otherwise, and tilt with the local slope. The
//! differences between them are coefficients in [`BoatParams`].

use glam::Vec2;

use super::actor::{Actor, ActorKind};
use super::sprite::{SpriteBank, SpriteId};
use super::water::WaterField;
use crate::consts::*;
use crate::{DEGREE, ease_toward};

/// Horizontal span the surface slope is measured over (pixels)
const SLOPE_SPAN: f32 = 32.0;
/// Bobbing: degrees of sway and phase advance per tick
const BOB_DEGREES: f32 = 5.0;
const BOB_RATE: f32 = 0.05;
/// Fraction of the old angle kept per tick while afloat
const TILT_RETAIN: f32 = 0.8;

/// Per-kind floating coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoatParams {
    /// Angle retained per tick while sinking (higher = slower roll)
    pub death_retain: f32,
    /// Upward push when the whole hull is below the surface
    pub deep_thrust: f32,
    /// Which surface sample (left, center, right) the deck is compared with
    /// for the full push
    pub deep_sample: usize,
    /// Upward push per pixel of keel depth
    pub thrust: f32,
    /// Scale applied to the slope-derived tilt
    pub tilt: f32,
    /// Keel depth tolerated before buoyancy kicks in
    pub tolerance: f32,
    /// Stop drifting once fully on screen
    pub stationary: bool,
}

impl BoatParams {
    pub const PLAYER: Self = Self {
        death_retain: 0.9,
        deep_thrust: 2.0,
        deep_sample: 2,
        thrust: 0.25,
        tilt: 1.0,
        tolerance: 0.0,
        stationary: false,
    };

    pub const PIRATE: Self = Self {
        death_retain: 0.9,
        deep_thrust: 2.0,
        deep_sample: 1,
        thrust: 0.25,
        tilt: 1.0,
        tolerance: 4.0,
        stationary: false,
    };

    pub const BOSS: Self = Self {
        death_retain: 0.007,
        deep_thrust: 1.0,
        deep_sample: 1,
        thrust: 0.15,
        tilt: 0.01,
        tolerance: 4.0,
        stationary: true,
    };

    /// Table lookup by actor kind; non-boats float like pirates
    pub fn for_kind(kind: ActorKind) -> Self {
        match kind {
            ActorKind::Player => Self::PLAYER,
            ActorKind::Boss => Self::BOSS,
            _ => Self::PIRATE,
        }
    }
}

/// What happened during one boat step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoatStep {
    /// Landed back in the water after being airborne
    pub splashed: bool,
    /// Finished sinking this tick
    pub sank: bool,
}

/// Tilt that follows the surface slope plus a gentle bob
pub fn surface_tilt(levels: [f32; 3], ticks: u32, tilt: f32) -> f32 {
    tilt * ((levels[0] - levels[2]) / SLOPE_SPAN).atan() * DEGREE
        + (ticks as f32 * BOB_RATE).sin() * BOB_DEGREES
}

/// Advance a dying hull: roll toward the death tilt and sink off the bottom
pub fn sink(actor: &mut Actor, water: &WaterField, death_retain: f32) -> bool {
    let center_level = water.region(actor.pos, actor.size())[1];
    actor.set_angle(ease_toward(actor.angle(), actor.target_angle, death_retain));
    actor.pos.y += actor.vel.y;
    actor.vel.y += GRAVITY;
    if actor.bottom() > center_level {
        actor.vel.y *= WATER_DRAG;
    }
    actor.pos.y >= FIELD_HEIGHT && actor.finish_dying()
}

/// One tick of boat physics, shared by every boat-like actor
pub fn update_boat(actor: &mut Actor, water: &WaterField, params: &BoatParams) -> BoatStep {
    actor.ticks += 1;

    if actor.is_dying() {
        return BoatStep {
            splashed: false,
            sank: sink(actor, water, params.death_retain),
        };
    }

    let levels = water.region(actor.pos, actor.size());
    let bottom = actor.bottom();
    let mut step = BoatStep::default();

    if bottom > levels[1] + params.tolerance {
        step.splashed = actor.jumping;
        actor.jumping = false;

        actor.vel.y *= WATER_DRAG;
        if actor.pos.y > levels[params.deep_sample.min(2)] {
            // Whole hull under: full push
            actor.vel.y -= params.deep_thrust;
        } else {
            actor.vel.y -= params.thrust * (bottom - levels[1]);
        }
        actor.target_angle = surface_tilt(levels, actor.ticks, params.tilt);
    } else {
        actor.jumping = true;
    }

    if params.stationary && actor.right() < FIELD_WIDTH {
        actor.vel.x = 0.0;
    }

    actor.vel.y += GRAVITY;
    actor.pos += actor.vel;
    actor.set_angle(ease_toward(actor.angle(), actor.target_angle, TILT_RETAIN));
    step
}

/// The player's steamboat
#[derive(Debug, Clone)]
pub struct Steamboat {
    pub actor: Actor,
    pub moving_left: bool,
    pub moving_right: bool,
    /// Set on the tick the hull re-entered the water
    pub splash: bool,
    /// Hit feedback; the sprite is hidden on odd counts
    pub blinks: u32,
}

impl Steamboat {
    pub const START: Vec2 = Vec2::new(50.0, 20.0);
    pub const SPEED: f32 = 2.0;
    pub const JUMP_VELOCITY: f32 = -10.0;

    pub fn new(sprites: &SpriteBank) -> Self {
        Self {
            actor: Actor::new(ActorKind::Player, sprites.get(SpriteId::Steamboat))
                .with_life(MAX_HEARTS)
                .at(Self::START),
            moving_left: false,
            moving_right: false,
            splash: false,
            blinks: 0,
        }
    }

    pub fn move_left(&mut self, held: bool) {
        if !self.actor.is_dying() {
            self.moving_left = held;
        }
    }

    pub fn move_right(&mut self, held: bool) {
        if !self.actor.is_dying() {
            self.moving_right = held;
        }
    }

    /// Leap out of the water; ignored while airborne or sinking
    pub fn jump(&mut self) -> bool {
        if self.actor.is_dying() || self.actor.jumping {
            return false;
        }
        self.actor.jumping = true;
        self.actor.vel.y = Self::JUMP_VELOCITY;
        true
    }

    /// Start sinking
    pub fn die(&mut self) -> bool {
        self.moving_left = false;
        self.moving_right = false;
        self.actor.die()
    }

    pub fn visible(&self) -> bool {
        self.blinks % 2 == 0
    }

    pub fn update(&mut self, water: &WaterField) -> BoatStep {
        self.splash = false;

        if !self.actor.is_dying() {
            self.actor.vel.x = match (self.moving_left, self.moving_right) {
                (true, false) => -Self::SPEED,
                (_, true) => Self::SPEED,
                _ => 0.0,
            };
        }

        let step = update_boat(&mut self.actor, water, &BoatParams::PLAYER);

        if !self.actor.is_dying() {
            let max_x = FIELD_WIDTH - self.actor.size().x;
            self.actor.pos.x = self.actor.pos.x.clamp(0.0, max_x.max(0.0));
            self.splash = step.splashed;
        }

        self.blinks = self.blinks.saturating_sub(1);
        step
    }
}

/// A pirate ship drifting in from the right and firing back
#[derive(Debug, Clone)]
pub struct Pirate {
    pub actor: Actor,
}

impl Pirate {
    pub const LIFE: i32 = 2;
    /// Ticks between shots
    pub const FIRE_INTERVAL: u32 = 50;

    pub fn new(sprites: &SpriteBank, water: &WaterField) -> Self {
        Self {
            actor: Actor::new(ActorKind::Pirate, sprites.get(SpriteId::Pirate))
                .with_life(Self::LIFE)
                .at(Vec2::new(FIELD_WIDTH, water.level(FIELD_WIDTH)))
                .moving(Vec2::new(-1.0, 0.0)),
        }
    }

    pub fn update(&mut self, water: &WaterField) -> BoatStep {
        update_boat(&mut self.actor, water, &BoatParams::PIRATE)
    }

    pub fn ready_to_fire(&self) -> bool {
        self.actor.is_alive() && self.actor.ticks % Self::FIRE_INTERVAL == 0
    }
}

/// The Titanic: a slow, heavily armoured boss
#[derive(Debug, Clone)]
pub struct Boss {
    pub actor: Actor,
}

impl Boss {
    pub const LIFE: i32 = 100;
    /// Volley cadence and the two alternating elevation offsets (degrees)
    pub const VOLLEY_PERIOD: u32 = 100;
    pub const VOLLEY_OFFSETS: [(u32, f32); 2] = [(0, 50.0), (50, 52.5)];

    pub fn new(sprites: &SpriteBank, water: &WaterField) -> Self {
        let mut actor = Actor::new(ActorKind::Boss, sprites.get(SpriteId::Titanic))
            .with_life(Self::LIFE)
            .moving(Vec2::new(-1.0, 0.0));
        // Float with the keel on the surface at the right edge
        actor.pos = Vec2::new(FIELD_WIDTH, water.level(FIELD_WIDTH) - actor.size().y);
        Self { actor }
    }

    pub fn update(&mut self, water: &WaterField) -> BoatStep {
        update_boat(&mut self.actor, water, &BoatParams::BOSS)
    }

    /// Elevation offset of this tick's volley, if one is due
    pub fn volley(&self) -> Option<f32> {
        if !self.actor.is_alive() {
            return None;
        }
        let phase = self.actor.ticks % Self::VOLLEY_PERIOD;
        Self::VOLLEY_OFFSETS
            .iter()
            .find(|(at, _)| *at == phase)
            .map(|&(_, offset)| offset)
    }
}
