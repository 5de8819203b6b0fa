//! Funny Boat - a side-scrolling steamboat arcade game
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (water, actors, spawning, collisions)
//! - `error`: Persistence errors
//! - `game_loop`: Tick source, input draining and frame presentation
//! - `settings`: Player configuration file
//! - `highscores`: Ranked score lists per game mode

pub mod error;
pub mod game_loop;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::PersistError;
pub use highscores::{HighScoreEntry, HighScores};
pub use settings::Settings;
pub use sim::{CoreFlags, GameState, Mode};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 30;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum catch-up ticks per presented frame to prevent spiral of death
    pub const MAX_CATCHUP_TICKS: u32 = 8;

    /// Playfield dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 300.0;
    /// Number of water columns (one per horizontal pixel)
    pub const WATER_COLUMNS: usize = FIELD_WIDTH as usize;

    /// Downward acceleration applied to floating and falling actors (px/tick²)
    pub const GRAVITY: f32 = 1.0;
    /// Vertical velocity damping while submerged
    pub const WATER_DRAG: f32 = 0.8;

    /// Player hearts
    pub const MAX_HEARTS: i32 = 5;
    /// Ticks that must pass between two normal shots
    pub const MIN_FIRE_DELAY: u32 = 1;
    /// Ticks that must pass between two heavy shots (2 seconds)
    pub const SPECIAL_FIRE_DELAY: u32 = 2 * TICK_RATE;

    /// Entries kept per high-score list
    pub const MAX_RANKS: usize = 10;
}

/// Degrees per radian
pub const DEGREE: f32 = 180.0 / std::f32::consts::PI;
/// Radians per degree
pub const RADIAN: f32 = std::f32::consts::PI / 180.0;

/// Relax `current` toward `target`, keeping `retain` of the current value.
///
/// `retain = 0.8` moves 20% of the remaining distance per call; `retain = 0`
/// snaps to the target.
#[inline]
pub fn ease_toward(current: f32, target: f32, retain: f32) -> f32 {
    current * retain + target * (1.0 - retain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_toward_moves_fraction_of_distance() {
        assert!((ease_toward(0.0, 10.0, 0.8) - 2.0).abs() < 1e-6);
        assert_eq!(ease_toward(3.0, 10.0, 0.0), 10.0);
        assert_eq!(ease_toward(3.0, 10.0, 1.0), 3.0);
    }

    #[test]
    fn test_angle_conversions_invert() {
        assert!((90.0 * RADIAN - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((std::f32::consts::PI * DEGREE - 180.0).abs() < 1e-4);
    }
}
