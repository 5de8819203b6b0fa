//! Drifting clouds

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::actor::swap_remove_where;
use super::sprite::{SpriteBank, SpriteId};
use crate::consts::FIELD_WIDTH;

/// Ticks between new clouds
pub const CLOUD_INTERVAL: u32 = 150;
/// Clouds appear between the top of the sky and this height
const CLOUD_BAND: f32 = 70.0;
const CLOUD_DRIFT: Vec2 = Vec2::new(-1.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frame of the cloud sprite
    pub variant: usize,
    pub size: Vec2,
}

impl Cloud {
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sky {
    clouds: Vec<Cloud>,
    t: u32,
}

impl Sky {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, sprites: &SpriteBank, rng: &mut Pcg32) {
        if self.t % CLOUD_INTERVAL == 0 {
            let sprite = sprites.get(SpriteId::Cloud);
            let variant = rng.random_range(0..sprite.frame_count());
            let mask = sprite.frame(variant);
            self.clouds.push(Cloud {
                pos: Vec2::new(FIELD_WIDTH, rng.random::<f32>() * CLOUD_BAND),
                vel: CLOUD_DRIFT,
                variant,
                size: Vec2::new(mask.width() as f32, mask.height() as f32),
            });
        }

        for cloud in &mut self.clouds {
            cloud.pos += cloud.vel;
        }
        swap_remove_where(&mut self.clouds, |c| c.right() < 0.0);

        self.t = self.t.wrapping_add(1);
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_cloud_every_interval() {
        let sprites = SpriteBank::placeholder();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut sky = Sky::new();
        sky.update(&sprites, &mut rng);
        assert_eq!(sky.clouds().len(), 1);
        for _ in 1..CLOUD_INTERVAL {
            sky.update(&sprites, &mut rng);
        }
        assert_eq!(sky.clouds().len(), 1);
        sky.update(&sprites, &mut rng);
        assert_eq!(sky.clouds().len(), 2);
    }

    #[test]
    fn test_clouds_leave_on_the_left() {
        let sprites = SpriteBank::placeholder();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut sky = Sky::new();
        sky.update(&sprites, &mut rng);
        let first = sky.clouds()[0];
        let ticks = (FIELD_WIDTH + first.size.x) as u32 + 1;
        for _ in 0..ticks {
            sky.update(&sprites, &mut rng);
        }
        let updates = ticks + 1;
        let spawned = updates.div_ceil(CLOUD_INTERVAL) as usize;
        // The first cloud has drifted off and was dropped
        assert_eq!(sky.clouds().len(), spawned - 1);
        assert!(sky.clouds().iter().all(|c| c.right() >= 0.0));
        assert!(sky.clouds().iter().all(|c| c.pos.y >= 0.0 && c.pos.y < CLOUD_BAND));
    }
}
