//! Render output
//!
//! A [`Frame`] is everything a renderer needs to draw one tick: the water
//! surface, every visible actor box with its tilt, particles, clouds and the
//! HUD. It is plain data so it can be serialized for dumps and replays.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorKind};
use super::level::Banner;
use super::particles::Rgb;
use super::sprite::SpriteId;
use super::state::GameState;

/// One sprite to blit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub kind: ActorKind,
    pub sprite: SpriteId,
    pub frame: usize,
    /// Top-left of the unrotated sprite box
    pub pos: Vec2,
    pub size: Vec2,
    /// Degrees, rotated about the box center
    pub angle: f32,
    /// 0..=1
    pub opacity: f32,
}

impl Drawable {
    fn of(actor: &Actor, opacity: f32) -> Self {
        Self {
            kind: actor.kind,
            sprite: actor.sprite_id(),
            frame: actor.frame(),
            pos: actor.pos,
            size: actor.size(),
            angle: actor.angle(),
            opacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub pos: Vec2,
    pub size: u32,
    pub color: Rgb,
    pub alpha: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudSprite {
    pub pos: Vec2,
    pub variant: usize,
}

/// Heart row of the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hearts {
    pub full: i32,
    /// Recently lost, drawn broken
    pub broken: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u64,
    /// Water surface y per column
    pub water: Vec<f32>,
    pub clouds: Vec<CloudSprite>,
    /// Back to front
    pub drawables: Vec<Drawable>,
    pub particles: Vec<Dot>,
    pub hearts: Hearts,
    pub score: i64,
    pub banner: Option<Banner>,
    pub paused: bool,
    pub game_over: Option<String>,
}

impl Frame {
    /// Snapshot the scene in draw order
    pub fn capture(state: &GameState) -> Self {
        let mut drawables = Vec::with_capacity(state.actor_count());
        drawables.extend(state.mines.iter().map(|m| Drawable::of(&m.actor, 1.0)));
        drawables.extend(state.boss.iter().map(|b| Drawable::of(&b.actor, 1.0)));
        drawables.extend(state.pirates.iter().map(|p| Drawable::of(&p.actor, 1.0)));
        drawables.extend(state.sharks.iter().map(|s| Drawable::of(&s.actor, 1.0)));
        drawables.extend(state.seagulls.iter().map(|s| Drawable::of(&s.actor, 1.0)));
        drawables.extend(
            state
                .powerups
                .iter()
                .map(|p| Drawable::of(&p.actor, p.opacity())),
        );
        if state.player.visible() {
            drawables.push(Drawable::of(&state.player.actor, 1.0));
        }
        drawables.extend(
            state
                .player_cannons
                .iter()
                .chain(&state.enemy_cannons)
                .map(|c| Drawable::of(&c.actor, 1.0)),
        );

        let particles = state
            .particles
            .particles()
            .iter()
            .map(|p| Dot {
                pos: p.pos,
                size: p.size,
                color: p.color,
                alpha: p.alpha(),
            })
            .collect();

        let clouds = state
            .sky
            .clouds()
            .iter()
            .map(|c| CloudSprite {
                pos: c.pos,
                variant: c.variant,
            })
            .collect();

        Self {
            tick: state.t,
            water: state.water.levels().to_vec(),
            clouds,
            drawables,
            particles,
            hearts: Hearts {
                full: state.health.life(),
                broken: state.health.broken().count() as i32,
            },
            score: state.score.value(),
            // The outcome message replaces any phase banner
            banner: if state.game_over.is_some() {
                None
            } else {
                state.level.banner()
            },
            paused: state.paused,
            game_over: state.game_over.map(|g| g.message().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::level::Mode;
    use crate::sim::sprite::SpriteBank;
    use crate::sim::state::{CoreFlags, GameOver};
    use crate::sim::tick::{TickInput, tick};

    fn state() -> GameState {
        GameState::new(Mode::Story, 7, CoreFlags::default(), SpriteBank::placeholder())
    }

    #[test]
    fn test_capture_fresh_session() {
        let s = state();
        let frame = Frame::capture(&s);
        assert_eq!(frame.water.len(), WATER_COLUMNS);
        assert_eq!(frame.drawables.len(), 1);
        assert_eq!(frame.drawables[0].kind, ActorKind::Player);
        assert_eq!(frame.hearts, Hearts { full: MAX_HEARTS, broken: 0 });
        assert!(frame.game_over.is_none());
    }

    #[test]
    fn test_blinking_player_is_hidden() {
        let mut s = state();
        s.player.blinks = 3;
        let frame = Frame::capture(&s);
        assert!(frame.drawables.iter().all(|d| d.kind != ActorKind::Player));
    }

    #[test]
    fn test_banner_and_outcome_reach_the_hud() {
        let mut s = state();
        tick(&mut s, &TickInput::default());
        let frame = Frame::capture(&s);
        assert!(frame.banner.as_ref().is_some_and(|b| b.alpha == 255));

        s.game_over = Some(GameOver::Victory);
        let frame = Frame::capture(&s);
        assert_eq!(frame.game_over.as_deref(), Some(GameOver::Victory.message()));
        assert!(frame.banner.is_none());
    }

    #[test]
    fn test_frame_serializes_to_json() {
        let mut s = state();
        s.player_fire(false);
        tick(&mut s, &TickInput::default());
        let frame = Frame::capture(&s);
        let json = serde_json::to_string(&frame).unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tick, 1);
        assert_eq!(back.drawables.len(), frame.drawables.len());
    }
}
