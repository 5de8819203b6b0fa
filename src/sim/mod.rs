//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable stage order within a tick
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod boat;
pub mod cannon;
pub mod collision;
pub mod enemy;
pub mod frame;
pub mod level;
pub mod particles;
pub mod sky;
pub mod sprite;
pub mod state;
pub mod tick;
pub mod water;

pub use actor::{Actor, ActorKind, LifeCycle};
pub use boat::{Boss, Pirate, Steamboat};
pub use cannon::{Cannon, Heading};
pub use collision::{Rect, collides, masks_overlap};
pub use enemy::{Mine, Powerup, Seagull, Shark};
pub use frame::Frame;
pub use level::{Banner, EnemyKind, Level, LevelMap, Mode};
pub use particles::{Effect, Ensemble, Particle};
pub use sprite::{AlphaMask, Sprite, SpriteBank, SpriteId};
pub use state::{CoreFlags, GameEvent, GameOver, GameState, Health, Score};
pub use tick::{TickInput, autopilot, tick};
pub use water::WaterField;
