//! Cosmetic particles
//!
//! Blood, smoke, splashes and splinters. Purely visual: nothing here feeds
//! back into gameplay, and the whole ensemble goes quiet when particle
//! effects are switched off.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::swap_remove_where;

/// RGB color
pub type Rgb = [u8; 3];

/// A single fading dot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    pub color: Rgb,
    /// Diameter in pixels
    pub size: u32,
    /// Lifetime at spawn (ticks)
    pub initial: u32,
    /// Ticks left
    pub life: u32,
    /// Peak opacity, 0..=1
    pub opacity: f32,
    /// Survives while moving downward (otherwise it vanishes at the apex)
    pub underwater: bool,
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel += self.accel;
        self.life = self.life.saturating_sub(1);
        if !self.underwater && self.vel.y > 0.0 {
            self.life = 0;
        }
    }

    /// Current alpha, fading linearly with remaining life
    pub fn alpha(&self) -> u8 {
        if self.initial == 0 {
            return 0;
        }
        (self.life as f32 * 255.0 * self.opacity / self.initial as f32).clamp(0.0, 255.0) as u8
    }
}

/// Particle recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Blood,
    Explosion,
    Water,
    Debris,
    Wood,
    Steam,
    Fire,
    /// Smoke left behind a cannonball
    Trace,
}

/// Uniform in [-half, half)
fn jitter(rng: &mut Pcg32, half: f32) -> f32 {
    rng.random::<f32>() * half * 2.0 - half
}

impl Effect {
    /// Roll a particle of this kind at `pos`
    pub fn spawn(self, pos: Vec2, rng: &mut Pcg32) -> Particle {
        let burst = |rng: &mut Pcg32| Vec2::new(jitter(rng, 2.5), jitter(rng, 2.5));
        let drift = |rng: &mut Pcg32| {
            Vec2::new(-rng.random::<f32>() * 0.3, -rng.random::<f32>() * 0.1)
        };
        let rising = Vec2::new(-0.1, -0.00002);

        let (vel, accel, color, size, initial, opacity, underwater) = match self {
            Effect::Blood => (
                burst(rng),
                Vec2::new(0.0, 0.7),
                [230, 30, 20],
                rng.random_range(1..=5),
                rng.random_range(0..30),
                1.0,
                true,
            ),
            Effect::Explosion => (
                burst(rng),
                Vec2::new(0.0, 0.2),
                [230, 30 + rng.random_range(0..200u8), 20],
                rng.random_range(1..=7),
                rng.random_range(0..30),
                1.0,
                true,
            ),
            Effect::Water => (
                Vec2::new(jitter(rng, 2.5), -rng.random::<f32>() * 2.5 - 2.0),
                Vec2::new(0.0, 0.3),
                [20, 60, 180],
                rng.random_range(1..=5),
                rng.random_range(0..30),
                0.5,
                false,
            ),
            Effect::Debris => (
                burst(rng),
                Vec2::new(0.0, 0.2),
                [90, 90, 90],
                rng.random_range(1..=7),
                rng.random_range(0..30),
                1.0,
                true,
            ),
            Effect::Wood => (
                burst(rng),
                Vec2::new(0.0, 0.2),
                [148, 69, 6],
                rng.random_range(1..=7),
                rng.random_range(0..30),
                1.0,
                true,
            ),
            Effect::Steam => (
                drift(rng),
                rising,
                [240, 240, 240],
                rng.random_range(1..=10),
                rng.random_range(0..30),
                0.5,
                true,
            ),
            Effect::Fire => (
                drift(rng),
                rising,
                [255, 210, 170],
                rng.random_range(1..=11),
                rng.random_range(0..30),
                0.4,
                false,
            ),
            Effect::Trace => (
                Vec2::ZERO,
                Vec2::ZERO,
                [170, 170, 170],
                6,
                rng.random_range(5..10),
                0.1 + rng.random::<f32>() * 0.1,
                false,
            ),
        };

        Particle {
            pos,
            vel,
            accel,
            color,
            size,
            initial,
            life: initial,
            opacity,
            underwater,
        }
    }
}

/// Every live particle in the scene
///
/// Owns its own RNG so switching effects off never changes the gameplay
/// random stream.
#[derive(Debug, Clone)]
pub struct Ensemble {
    enabled: bool,
    particles: Vec<Particle>,
    rng: Pcg32,
}

impl Ensemble {
    pub fn new(enabled: bool, seed: u64) -> Self {
        Self {
            enabled,
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Switching effects off drops whatever is still in flight
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.particles.clear();
        }
    }

    pub fn emit(&mut self, effect: Effect, pos: Vec2) {
        if self.enabled {
            let particle = effect.spawn(pos, &mut self.rng);
            self.particles.push(particle);
        }
    }

    pub fn emit_n(&mut self, effect: Effect, pos: Vec2, count: usize) {
        for _ in 0..count {
            self.emit(effect, pos);
        }
    }

    /// Uniform in [0, 1) from the cosmetic stream, for placing effects
    pub fn roll(&mut self) -> f32 {
        self.rng.random()
    }

    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.update();
        }
        swap_remove_where(&mut self.particles, |p| p.life == 0);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_ensemble_stays_empty() {
        let mut ensemble = Ensemble::new(false, 9);
        ensemble.emit_n(Effect::Explosion, Vec2::ZERO, 20);
        assert!(ensemble.is_empty());
    }

    #[test]
    fn test_particles_expire() {
        let mut ensemble = Ensemble::new(true, 9);
        ensemble.emit_n(Effect::Blood, Vec2::new(50.0, 50.0), 50);
        assert_eq!(ensemble.len(), 50);
        for _ in 0..30 {
            ensemble.update();
        }
        assert!(ensemble.is_empty());
    }

    #[test]
    fn test_splash_vanishes_once_falling() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut drop = Effect::Water.spawn(Vec2::ZERO, &mut rng);
        drop.life = 1000;
        drop.initial = 1000;
        let mut ticks = 0;
        while drop.life > 0 {
            drop.update();
            ticks += 1;
        }
        assert!(drop.vel.y > 0.0);
        assert!(ticks < 30);
    }

    #[test]
    fn test_alpha_fades_with_life() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut puff = Effect::Debris.spawn(Vec2::ZERO, &mut rng);
        puff.initial = 10;
        puff.life = 10;
        assert_eq!(puff.alpha(), 255);
        puff.life = 5;
        assert_eq!(puff.alpha(), 127);
        puff.initial = 0;
        assert_eq!(puff.alpha(), 0);
    }

    #[test]
    fn test_switching_off_drops_particles() {
        let mut ensemble = Ensemble::new(true, 1);
        ensemble.emit_n(Effect::Steam, Vec2::ZERO, 5);
        assert_eq!(ensemble.len(), 5);
        ensemble.set_enabled(false);
        assert!(ensemble.is_empty());
        assert!(!ensemble.enabled());
    }

    #[test]
    fn test_trace_is_stationary() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut trace = Effect::Trace.spawn(Vec2::new(3.0, 4.0), &mut rng);
        assert!((5..10).contains(&trace.initial));
        trace.update();
        assert_eq!(trace.pos, Vec2::new(3.0, 4.0));
    }
}
