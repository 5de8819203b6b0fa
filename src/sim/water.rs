//! Procedural water surface
//!
//! One height sample per playfield column, regenerated every tick from a
//! travelling sine wave. Every actor that floats, sinks or splashes asks this
//! field for the local sea level, so the whole scene shares one surface.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::consts::*;
use crate::ease_toward;

/// Fraction of the current value kept per tick while relaxing toward a target
const RELAX_RETAIN: f32 = 0.99;
/// Parameters closer than this to their target snap onto it
const SNAP_EPSILON: f32 = 1e-3;

/// A wave parameter that relaxes smoothly toward a requested value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relaxed {
    pub current: f32,
    pub target: f32,
}

impl Relaxed {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    /// Step toward the target; returns true if the value changed
    pub fn step(&mut self) -> bool {
        if self.current == self.target {
            return false;
        }
        let next = ease_toward(self.current, self.target, RELAX_RETAIN);
        self.current = if (next - self.target).abs() < SNAP_EPSILON {
            self.target
        } else {
            next
        };
        true
    }
}

/// The shared sea surface
#[derive(Debug, Clone)]
pub struct WaterField {
    /// Screen-space y of the surface per column (larger = lower)
    levels: Vec<f32>,
    /// Wave height (pixels)
    pub amplitude: Relaxed,
    /// Number of wave crests across the playfield
    pub wavelength: Relaxed,
    /// Temporal speed (cycles per second scaled by tick rate)
    pub speed: Relaxed,
    /// Mean water depth measured up from the playfield bottom
    pub baseline: Relaxed,
    /// Ticks elapsed
    t: f32,
}

impl Default for WaterField {
    fn default() -> Self {
        Self::new()
    }
}

impl WaterField {
    pub fn new() -> Self {
        let mut water = Self {
            levels: vec![0.0; WATER_COLUMNS],
            amplitude: Relaxed::new(FIELD_HEIGHT / 8.0),
            wavelength: Relaxed::new(0.02 * FIELD_WIDTH / TAU),
            speed: Relaxed::new(0.06 / TAU * TICK_RATE as f32),
            baseline: Relaxed::new(FIELD_HEIGHT / 24.0 * 8.0),
            t: 0.0,
        };
        water.sample();
        water
    }

    /// Spatial angular frequency (radians per pixel)
    fn spatial_freq(&self) -> f32 {
        TAU / self.wavelength.current / FIELD_WIDTH
    }

    /// Temporal angular frequency (radians per tick)
    fn angular_speed(&self) -> f32 {
        TAU / TICK_RATE as f32 * self.speed.current
    }

    fn sample(&mut self) {
        let xm = self.spatial_freq();
        let tm = self.angular_speed();
        let surface = FIELD_HEIGHT - self.baseline.current;
        let amplitude = self.amplitude.current;
        let phase = self.t * tm;
        for (x, level) in self.levels.iter_mut().enumerate() {
            let h = surface - (x as f32 * xm + phase).sin() * amplitude;
            *level = h.clamp(0.0, FIELD_HEIGHT);
        }
    }

    /// Recompute the surface for this tick and relax parameters toward their targets
    pub fn update(&mut self) {
        self.sample();
        self.amplitude.step();
        self.wavelength.step();
        self.speed.step();
        self.baseline.step();
        self.t += 1.0;
    }

    /// Water surface y at column `x` (clamped to the field)
    pub fn level(&self, x: f32) -> f32 {
        let last = self.levels.len() - 1;
        let xi = if x.is_nan() || x < 0.0 {
            0
        } else {
            (x as usize).min(last)
        };
        self.levels[xi]
    }

    /// Surface at an actor's left edge, center and right edge
    pub fn region(&self, pos: Vec2, size: Vec2) -> [f32; 3] {
        [
            self.level(pos.x),
            self.level(pos.x + size.x / 2.0),
            self.level(pos.x + size.x),
        ]
    }

    /// Request a new wave height; approached smoothly
    pub fn set_target_amplitude(&mut self, amplitude: f32) {
        self.amplitude.target = amplitude.max(0.0);
    }

    pub fn set_target_wavelength(&mut self, wavelength: f32) {
        // Zero would divide the spatial frequency by zero
        self.wavelength.target = wavelength.max(f32::EPSILON);
    }

    pub fn set_target_speed(&mut self, speed: f32) {
        self.speed.target = speed;
    }

    pub fn set_target_baseline(&mut self, baseline: f32) {
        self.baseline.target = baseline.clamp(0.0, FIELD_HEIGHT);
    }

    /// Per-column heights for the renderer
    pub fn levels(&self) -> &[f32] {
        &self.levels
    }
}
