//! Sprite dimensions and opacity masks
//!
//! Decoding artwork is the asset loader's job. The simulation only needs each
//! sprite frame's size (for geometry) and its alpha channel (for pixel-exact
//! collisions), which the loader hands over as a [`SpriteBank`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::RADIAN;

/// An 8-bit opacity mask, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AlphaMask {
    /// Mask with every pixel set to `alpha`
    pub fn filled(width: u32, height: u32, alpha: u8) -> Self {
        Self {
            width,
            height,
            data: vec![alpha; (width * height) as usize],
        }
    }

    /// Fully opaque ellipse inscribed in a `width` × `height` box
    pub fn ellipse(width: u32, height: u32) -> Self {
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f32 + 0.5 - rx) / rx;
            let dy = (y as f32 + 0.5 - ry) / ry;
            if dx * dx + dy * dy <= 1.0 { 255 } else { 0 }
        })
    }

    /// Mask built from a per-pixel function
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> Self {
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap raw alpha bytes; returns None if the length does not match
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha at (x, y); zero outside the mask
    #[inline]
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Copy of this mask extended downward by `extra` rows with a one-pixel
    /// opaque line hanging from the bottom center (a mine's chain)
    pub fn with_chain(&self, extra: u32) -> Self {
        let cx = self.width / 2;
        Self::from_fn(self.width, self.height + extra, |x, y| {
            if y < self.height {
                self.data[(y * self.width + x) as usize]
            } else if x == cx {
                255
            } else {
                0
            }
        })
    }

    /// Size of the box that holds this mask rotated by `angle` degrees
    pub fn rotated_size(&self, angle: f32) -> (u32, u32) {
        let (sin, cos) = (angle * RADIAN).sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        let rw = (w * cos.abs() + h * sin.abs()).round().max(1.0);
        let rh = (w * sin.abs() + h * cos.abs()).round().max(1.0);
        (rw as u32, rh as u32)
    }

    /// Mask rotated counter-clockwise (on screen) by `angle` degrees about its
    /// center, nearest-neighbour sampled into the enclosing box
    pub fn rotated(&self, angle: f32) -> Self {
        if angle == 0.0 {
            return self.clone();
        }
        let (rw, rh) = self.rotated_size(angle);
        let (sin, cos) = (angle * RADIAN).sin_cos();
        let (scx, scy) = (self.width as f32 / 2.0, self.height as f32 / 2.0);
        let (dcx, dcy) = (rw as f32 / 2.0, rh as f32 / 2.0);
        Self::from_fn(rw, rh, |x, y| {
            let dx = x as f32 + 0.5 - dcx;
            let dy = y as f32 + 0.5 - dcy;
            // Inverse of the forward rotation (x', y') = (x cos + y sin, y cos - x sin)
            let sx = dx * cos - dy * sin + scx;
            let sy = dx * sin + dy * cos + scy;
            self.alpha_at(sx.floor() as i32, sy.floor() as i32)
        })
    }

    /// Number of pixels with non-zero alpha
    pub fn coverage(&self) -> usize {
        self.data.iter().filter(|&&a| a != 0).count()
    }
}

/// Artwork identifiers known to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    Steamboat,
    Shark,
    Pirate,
    Mine,
    /// Three wing-beat frames
    Seagull,
    Titanic,
    Heart,
    /// Frame 0 normal shot, frame 1 heavy shot
    Cannonball,
    /// Four cloud variants
    Cloud,
}

/// All frames of one piece of artwork
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: SpriteId,
    /// Never empty
    frames: Vec<AlphaMask>,
}

impl Sprite {
    /// Artwork without frames gets a single 1×1 opaque frame
    pub fn new(id: SpriteId, frames: Vec<AlphaMask>) -> Self {
        if frames.is_empty() {
            log::warn!("Sprite {:?} has no frames, using 1x1 stand-in", id);
            return Self::stand_in(id);
        }
        Self { id, frames }
    }

    fn stand_in(id: SpriteId) -> Self {
        Self {
            id,
            frames: vec![AlphaMask::filled(1, 1, 255)],
        }
    }

    /// Frame `index`, wrapping around the frame count
    pub fn frame(&self, index: usize) -> &AlphaMask {
        &self.frames[index % self.frames.len()]
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Sprite catalogue handed to the simulation by the asset loader
#[derive(Debug, Clone)]
pub struct SpriteBank {
    sprites: HashMap<SpriteId, Arc<Sprite>>,
}

impl Default for SpriteBank {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl SpriteBank {
    /// Procedural stand-ins with the game's sprite proportions
    ///
    /// Used by headless runs and tests where no artwork is decoded.
    pub fn placeholder() -> Self {
        let hull = |w: u32, h: u32| {
            // Cabin on the upper half, full-width hull below
            AlphaMask::from_fn(w, h, move |x, y| {
                let cabin = x >= w / 4 && x < w * 3 / 4;
                if y >= h / 2 || cabin { 255 } else { 0 }
            })
        };

        let mut bank = Self {
            sprites: HashMap::new(),
        };
        bank.insert(Sprite::new(SpriteId::Steamboat, vec![hull(48, 26)]));
        bank.insert(Sprite::new(SpriteId::Shark, vec![AlphaMask::ellipse(40, 18)]));
        bank.insert(Sprite::new(SpriteId::Pirate, vec![hull(44, 40)]));
        bank.insert(Sprite::new(SpriteId::Mine, vec![AlphaMask::ellipse(14, 14)]));
        bank.insert(Sprite::new(
            SpriteId::Seagull,
            vec![
                AlphaMask::ellipse(26, 10),
                AlphaMask::ellipse(26, 14),
                AlphaMask::ellipse(26, 12),
            ],
        ));
        bank.insert(Sprite::new(SpriteId::Titanic, vec![hull(180, 90)]));
        bank.insert(Sprite::new(SpriteId::Heart, vec![AlphaMask::ellipse(14, 13)]));
        bank.insert(Sprite::new(
            SpriteId::Cannonball,
            vec![AlphaMask::ellipse(6, 6), AlphaMask::ellipse(12, 7)],
        ));
        bank.insert(Sprite::new(
            SpriteId::Cloud,
            vec![
                AlphaMask::ellipse(80, 30),
                AlphaMask::ellipse(60, 24),
                AlphaMask::ellipse(100, 36),
                AlphaMask::ellipse(70, 28),
            ],
        ));
        bank
    }

    /// Register (or replace) a sprite
    pub fn insert(&mut self, sprite: Sprite) {
        self.sprites.insert(sprite.id, Arc::new(sprite));
    }

    /// Shared handle to a sprite
    ///
    /// Missing artwork falls back to a 1×1 opaque pixel so geometry stays defined.
    pub fn get(&self, id: SpriteId) -> Arc<Sprite> {
        match self.sprites.get(&id) {
            Some(sprite) => Arc::clone(sprite),
            None => {
                log::warn!("Sprite {:?} missing from bank, using 1x1 stand-in", id);
                Arc::new(Sprite::stand_in(id))
            }
        }
    }
}
