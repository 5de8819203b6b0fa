//! Sharks, mines, seagulls and floating hearts

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::actor::{Actor, ActorKind};
use super::sprite::{Sprite, SpriteBank, SpriteId};
use super::water::WaterField;
use crate::consts::*;
use crate::{DEGREE, ease_toward};

/// A shark riding the surface and leaping at intervals
#[derive(Debug, Clone)]
pub struct Shark {
    pub actor: Actor,
    pub step: u32,
}

impl Shark {
    /// Steps between leaps
    pub const LEAP_INTERVAL: u32 = 40;
    pub const LEAP_VELOCITY: Vec2 = Vec2::new(-3.0, -10.0);
    pub const SWIM_VELOCITY: Vec2 = Vec2::new(-2.0, 0.0);
    /// Height of the swimming shark's top above the surface
    const RIDE_HEIGHT: f32 = 8.0;

    pub fn new(sprites: &SpriteBank) -> Self {
        Self {
            actor: Actor::new(ActorKind::Shark, sprites.get(SpriteId::Shark))
                .with_life(1)
                .at(Vec2::new(FIELD_WIDTH, 0.0)),
            step: 0,
        }
    }

    pub fn update(&mut self, water: &WaterField) {
        let a = &mut self.actor;
        let levels = water.region(a.pos, a.size());

        if a.is_dying() {
            a.set_angle(ease_toward(a.angle(), a.target_angle, 0.6));
            a.pos += a.vel;
            a.vel.y += GRAVITY;
            if a.bottom() > levels[1] {
                a.vel *= WATER_DRAG;
            }
            if a.pos.y >= FIELD_HEIGHT {
                a.finish_dying();
            }
            return;
        }

        if !a.jumping {
            a.pos.y = levels[1] - Self::RIDE_HEIGHT;
            a.target_angle = ((levels[0] - levels[2]) / 32.0).atan() * DEGREE;
        } else {
            a.vel.y += GRAVITY;
            if a.pos.y > levels[1] - Self::RIDE_HEIGHT {
                a.jumping = false;
                a.vel = Self::SWIM_VELOCITY;
            }
        }

        if self.step % Self::LEAP_INTERVAL == 0 {
            a.jumping = true;
            a.vel = Self::LEAP_VELOCITY;
        }

        a.pos += a.vel;
        self.step += 1;
        a.set_angle(ease_toward(a.angle(), a.target_angle, 0.8));
    }
}

/// A naval mine chained to the sea floor
#[derive(Debug, Clone)]
pub struct Mine {
    pub actor: Actor,
    /// Remaining explosion ticks once triggered
    pub explode_frames: u32,
}

impl Mine {
    pub const EXPLOSION_TICKS: u32 = 10;
    /// Columns sampled when choosing the chain length
    const DEPTH_SAMPLE_WIDTH: f32 = 320.0;

    pub fn new(sprites: &SpriteBank, water: &WaterField, rng: &mut Pcg32) -> Self {
        let base = sprites.get(SpriteId::Mine);
        let column = rng.random::<f32>() * Self::DEPTH_SAMPLE_WIDTH;
        let depth = FIELD_HEIGHT - water.level(column) - 4.0;
        let chain = depth.max(0.0) as u32;
        let chained = Sprite::new(SpriteId::Mine, vec![base.frame(0).with_chain(chain)]);

        let mut actor = Actor::new(ActorKind::Mine, base).moving(Vec2::new(-1.0, 0.0));
        actor.replace_sprite(Arc::new(chained));
        actor.pos = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT - actor.size().y);
        Self {
            actor,
            explode_frames: 0,
        }
    }

    pub fn exploding(&self) -> bool {
        self.actor.is_dying()
    }

    /// Trigger the explosion; false if already exploding
    pub fn explode(&mut self) -> bool {
        if !self.actor.begin_dying() {
            return false;
        }
        self.explode_frames = Self::EXPLOSION_TICKS;
        true
    }

    pub fn update(&mut self, water: &WaterField) {
        let a = &mut self.actor;
        a.pos += a.vel;

        let height = a.size().y;
        let level = water.level(a.center().x);
        // Float on the surface when the chain reaches, else rest on the floor
        a.pos.y = if FIELD_HEIGHT - level < height - 4.0 {
            level - 4.0
        } else {
            FIELD_HEIGHT - height
        };

        if self.exploding() {
            if self.explode_frames > 0 {
                self.explode_frames -= 1;
            }
            if self.explode_frames == 0 {
                self.actor.finish_dying();
            }
        }
    }
}

/// A seagull crossing the sky
#[derive(Debug, Clone)]
pub struct Seagull {
    pub actor: Actor,
    pub step: u32,
}

impl Seagull {
    /// Steps per wing-beat frame
    const FLAP_EVERY: u32 = 3;

    pub fn new(sprites: &SpriteBank, rng: &mut Pcg32) -> Self {
        let altitude = FIELD_HEIGHT / 10.0 + rng.random::<f32>() * FIELD_HEIGHT / 10.0;
        Self {
            actor: Actor::new(ActorKind::Seagull, sprites.get(SpriteId::Seagull))
                .with_life(1)
                .at(Vec2::new(FIELD_WIDTH, altitude))
                .moving(Vec2::new(-2.0, 0.0)),
            step: 0,
        }
    }

    pub fn update(&mut self) {
        self.step += 1;
        let a = &mut self.actor;

        if !a.is_dying() && self.step % Self::FLAP_EVERY == 0 {
            a.set_frame(a.frame() + 1);
        }

        a.pos += a.vel;
        a.set_angle(ease_toward(a.angle(), a.target_angle, 0.2));

        if a.is_dying() {
            a.vel.y += GRAVITY;
            let outside = a.pos.x < 0.0
                || a.pos.x > FIELD_WIDTH
                || a.pos.y < 0.0
                || a.pos.y >= FIELD_HEIGHT;
            if outside {
                a.finish_dying();
            }
        }
    }
}

/// A heart bobbing on the waves; restores one life when touched
#[derive(Debug, Clone)]
pub struct Powerup {
    pub actor: Actor,
    /// Ticks of fade-out left once picked up
    pub fade: u32,
}

impl Powerup {
    pub const FADE_TICKS: u32 = 15;

    pub fn new(sprites: &SpriteBank, water: &WaterField) -> Self {
        Self {
            actor: Actor::new(ActorKind::Powerup, sprites.get(SpriteId::Heart))
                .with_life(1)
                .at(Vec2::new(FIELD_WIDTH, water.level(FIELD_WIDTH)))
                .moving(Vec2::new(-1.0, 0.0)),
            fade: 0,
        }
    }

    pub fn fading(&self) -> bool {
        self.actor.is_dying()
    }

    /// Collected by the player; false if already collected
    pub fn pick_up(&mut self) -> bool {
        if !self.actor.begin_dying() {
            return false;
        }
        self.fade = Self::FADE_TICKS;
        true
    }

    /// Opacity for the renderer (fades out after pickup)
    pub fn opacity(&self) -> f32 {
        if self.fading() {
            self.fade as f32 / Self::FADE_TICKS as f32
        } else {
            1.0
        }
    }

    pub fn update(&mut self, water: &WaterField) {
        if self.fading() {
            if self.fade > 0 {
                self.fade -= 1;
            } else {
                self.actor.finish_dying();
            }
        }

        let a = &mut self.actor;
        let level = water.level(a.center().x);
        let bottom = a.bottom();
        if bottom > level {
            a.vel.y *= WATER_DRAG;
            if a.pos.y > level {
                a.vel.y -= 2.0;
            } else {
                a.vel.y -= 0.25 * (bottom - level);
            }
        }
        a.vel.y += GRAVITY;
        a.pos += a.vel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::water::Relaxed;
    use rand::SeedableRng;

    fn calm_water() -> WaterField {
        let mut water = WaterField::new();
        water.amplitude = Relaxed::new(0.0);
        water.update();
        water
    }

    #[test]
    fn test_shark_leaps_every_forty_steps() {
        let water = calm_water();
        let mut shark = Shark::new(&SpriteBank::placeholder());
        shark.update(&water);
        assert!(shark.actor.jumping);
        assert_eq!(shark.actor.vel, Shark::LEAP_VELOCITY);

        let mut landed_at = None;
        for i in 1..40 {
            shark.update(&water);
            if !shark.actor.jumping && landed_at.is_none() {
                landed_at = Some(i);
            }
        }
        assert!(landed_at.is_some());
        shark.update(&water);
        assert!(shark.actor.jumping);
    }

    #[test]
    fn test_shark_rides_surface_between_leaps() {
        let water = calm_water();
        let mut shark = Shark::new(&SpriteBank::placeholder());
        for _ in 0..30 {
            shark.update(&water);
        }
        assert!(!shark.actor.jumping);
        shark.update(&water);
        assert!((shark.actor.pos.y - (water.level(0.0) - 8.0)).abs() < 1e-3);
    }

    #[test]
    fn test_mine_explosion_timer_ends_in_death() {
        let water = calm_water();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut mine = Mine::new(&SpriteBank::placeholder(), &water, &mut rng);
        assert!(mine.explode());
        assert!(!mine.explode());
        for _ in 0..Mine::EXPLOSION_TICKS - 1 {
            mine.update(&water);
            assert!(!mine.actor.is_dead());
        }
        mine.update(&water);
        assert!(mine.actor.is_dead());
    }

    #[test]
    fn test_mine_chain_reaches_floor() {
        let water = calm_water();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut mine = Mine::new(&SpriteBank::placeholder(), &water, &mut rng);
        mine.update(&water);
        // Chain spans the sampled depth, so the head floats at the surface
        let depth = FIELD_HEIGHT - water.level(0.0) - 4.0;
        assert_eq!(mine.actor.size().y, 14.0 + depth.floor());
        assert!((mine.actor.pos.y - (water.level(0.0) - 4.0)).abs() < 1e-3);
    }

    #[test]
    fn test_seagull_flaps_and_tumbles_out() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut gull = Seagull::new(&SpriteBank::placeholder(), &mut rng);
        assert!(gull.actor.pos.y >= FIELD_HEIGHT / 10.0 && gull.actor.pos.y < FIELD_HEIGHT / 5.0);
        for _ in 0..3 {
            gull.update();
        }
        assert_eq!(gull.actor.frame(), 1);

        assert!(gull.actor.damage(1));
        let mut ticks = 0;
        while !gull.actor.is_dead() && ticks < 200 {
            gull.update();
            ticks += 1;
        }
        assert!(gull.actor.is_dead());
    }

    #[test]
    fn test_powerup_fades_then_dies() {
        let water = calm_water();
        let mut heart = Powerup::new(&SpriteBank::placeholder(), &water);
        assert!(heart.pick_up());
        assert!(!heart.pick_up());
        for _ in 0..Powerup::FADE_TICKS {
            heart.update(&water);
            assert!(!heart.actor.is_dead());
        }
        heart.update(&water);
        assert!(heart.actor.is_dead());
        assert_eq!(heart.opacity(), 0.0);
    }
}
