//! Fixed timestep simulation tick
//!
//! Advances the whole scene by one step in a fixed stage order: spawn,
//! enemies, player, cannonballs, ambient effects, collisions, and finally the
//! player's life cycle. Removal of finished actors happens inside each
//! collection's own update stage, so collision resolution only ever sees
//! actors that are still in play.

use glam::Vec2;

use super::actor::{Actor, ActorKind, swap_remove_where};
use super::boat::{Boss, Pirate};
use super::cannon::{Cannon, Heading};
use super::collision::collides;
use super::enemy::{Mine, Powerup, Seagull, Shark};
use super::level::EnemyKind;
use super::particles::{Effect, Ensemble};
use super::state::{GameEvent, GameOver, GameState, HIT_BLINKS};
use super::water::WaterField;

/// Points per kill or hit
const SHARK_POINTS: i64 = 15;
const SEAGULL_POINTS: i64 = 75;
const PIRATE_POINTS: i64 = 25;
const BOSS_POINTS: i64 = 7;
const BOSS_HEAVY_POINTS: i64 = 100;
/// Damage a heavy shot deals to the boss
const BOSS_HEAVY_DAMAGE: i32 = 12;
/// Fraction of a ball's velocity passed on to what it hits
const KNOCKBACK: Vec2 = Vec2::new(0.6, 0.4);

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held steering
    pub left: bool,
    pub right: bool,
    /// Edge-triggered actions
    pub jump: bool,
    pub fire: bool,
    pub fire_special: bool,
    /// Pause toggle
    pub pause: bool,
    /// Let the built-in pilot steer and shoot
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        state.toggle_pause();
    }
    if state.paused {
        return;
    }

    let input = if input.autopilot {
        autopilot(state)
    } else {
        *input
    };

    // --- INPUT ---
    state.player.move_left(input.left);
    state.player.move_right(input.right);
    if input.jump {
        state.player.jump();
    }
    if input.fire {
        state.player_fire(false);
    }
    if input.fire_special {
        state.player_fire(true);
    }

    if state.game_over.is_none() {
        spawn(state);
    }

    update_enemies(state);
    update_player(state);
    update_cannons(&mut state.player_cannons, &state.water, &mut state.particles);
    update_cannons(&mut state.enemy_cannons, &state.water, &mut state.particles);

    state.score.update();
    add_environment_effects(state);
    state.particles.update();
    update_powerups(state);
    state.sky.update(&state.sprites, &mut state.rng);
    state.water.update();

    if state.game_over.is_none() {
        check_collisions(state);
    }

    update_player_lifecycle(state);

    state.last_shot = state.last_shot.saturating_add(1);
    state.last_special_shot = state.last_special_shot.saturating_add(1);
    state.t += 1;
}

/// Ask the level director what is due and put it on the water
fn spawn(state: &mut GameState) {
    let due = state.level.spawn(&mut state.water, &mut state.rng);
    if state.level.phase_started() {
        state.events.push(GameEvent::PhaseStarted {
            phase: state.level.phase(),
        });
    }

    for kind in due.iter() {
        match kind {
            EnemyKind::Shark => state.sharks.push(Shark::new(&state.sprites)),
            EnemyKind::Pirate => state.pirates.push(Pirate::new(&state.sprites, &state.water)),
            EnemyKind::Mine => {
                let mine = Mine::new(&state.sprites, &state.water, &mut state.rng);
                state.mines.push(mine);
            }
            EnemyKind::Seagull => {
                let gull = Seagull::new(&state.sprites, &mut state.rng);
                state.seagulls.push(gull);
            }
            EnemyKind::Boss => {
                if state.boss.is_none() {
                    log::info!("The Titanic has arrived (tick {})", state.t);
                    state.boss = Some(Boss::new(&state.sprites, &state.water));
                    state.events.push(GameEvent::BossArrived);
                }
            }
            EnemyKind::Powerup => state.powerups.push(Powerup::new(&state.sprites, &state.water)),
        }
    }
}

fn update_enemies(state: &mut GameState) {
    let GameState {
        sprites,
        water,
        particles,
        events,
        player,
        mines,
        sharks,
        pirates,
        boss,
        seagulls,
        enemy_cannons,
        game_over,
        ..
    } = state;
    let player_angle = player.actor.angle();

    // --- MINES ---
    for mine in mines.iter_mut() {
        mine.update(water);
        if mine.exploding() {
            let a = &mine.actor;
            let at = Vec2::new(a.center().x, a.pos.y + a.size().x / 2.0);
            particles.emit(Effect::Explosion, at);
            particles.emit(Effect::Debris, at);
        }
    }
    swap_remove_where(mines, |m| m.actor.is_dead() || m.actor.right() < 0.0);

    // --- SHARKS ---
    for shark in sharks.iter_mut() {
        shark.update(water);
        if shark.actor.is_dying() {
            particles.emit(Effect::Blood, shark.actor.center());
        }
    }
    swap_remove_where(sharks, |s| s.actor.is_dead() || s.actor.right() < 0.0);

    // --- PIRATES ---
    for pirate in pirates.iter_mut() {
        pirate.update(water);
        let a = &pirate.actor;
        let center = a.center();
        if pirate.ready_to_fire() {
            let muzzle = Vec2::new(a.pos.x, center.y);
            enemy_cannons.push(Cannon::launch(
                sprites,
                muzzle,
                player_angle,
                Heading::Left,
                false,
            ));
            particles.emit_n(Effect::Fire, a.rotate(Vec2::new(0.0, 10.0)) + center, 4);
            events.push(GameEvent::EnemyFired);
        } else if a.is_dying() {
            particles.emit(Effect::Explosion, center);
            particles.emit(Effect::Wood, center);
        }
    }
    swap_remove_where(pirates, |p| p.actor.is_dead() || p.actor.right() < 0.0);

    // --- BOSS ---
    if let Some(titanic) = boss.as_mut() {
        titanic.update(water);
        if let Some(elevation) = titanic.volley() {
            let muzzle = Vec2::new(titanic.actor.pos.x, titanic.actor.center().y);
            for spread in [-10.0, 0.0, 10.0] {
                let angle = player_angle + spread - elevation;
                enemy_cannons.push(Cannon::launch(sprites, muzzle, angle, Heading::Left, false));
            }
            events.push(GameEvent::EnemyFired);
        }
    }
    if boss.as_ref().is_some_and(|b| b.actor.is_dead()) {
        *boss = None;
        events.push(GameEvent::BossSunk);
        if game_over.is_none() {
            log::info!("Titanic sunk, victory");
            *game_over = Some(GameOver::Victory);
        }
    }

    // --- SEAGULLS ---
    for gull in seagulls.iter_mut() {
        gull.update();
    }
    swap_remove_where(seagulls, |s| s.actor.is_dead() || s.actor.right() < 0.0);
}

fn update_player(state: &mut GameState) {
    state.player.update(&state.water);
    state.health.update();
    if state.player.splash {
        state.events.push(GameEvent::Splash);
    }
}

/// Fly every ball, leave smoke behind it, and drop the ones that left the field
fn update_cannons(cannons: &mut Vec<Cannon>, water: &WaterField, particles: &mut Ensemble) {
    for ball in cannons.iter_mut() {
        if !ball.underwater {
            let tail = ball.tail();
            particles.emit(Effect::Trace, tail);
            particles.emit(Effect::Trace, tail + ball.actor.vel * 0.5);
        }
        if ball.special && (!ball.underwater || particles.roll() > 0.6) {
            particles.emit(Effect::Explosion, ball.tail());
        }

        let was_underwater = ball.underwater;
        ball.update(water);
        if ball.underwater && !was_underwater {
            for _ in 0..5 {
                let at = Vec2::new(
                    ball.actor.right() - 4.0 + particles.roll() * 8.0,
                    ball.actor.pos.y + particles.roll() * 2.0,
                );
                particles.emit(Effect::Water, at);
            }
        }
    }
    swap_remove_where(cannons, Cannon::out_of_field);
}

fn add_environment_effects(state: &mut GameState) {
    let boiler_hot = state.boiler_hot();
    let GameState {
        player,
        boss,
        particles,
        water,
        ..
    } = state;
    let boat = &player.actor;

    if boiler_hot {
        let funnel = boat.local_to_world(Vec2::new(5.0 + particles.roll() * 9.0, 0.0));
        let stack = boat.local_to_world(Vec2::new(19.0 + particles.roll() * 7.0, 5.0));
        particles.emit(Effect::Steam, funnel);
        particles.emit(Effect::Steam, stack);
    }

    if boat.is_dying() && !boat.is_dead() {
        particles.emit(Effect::Explosion, boat.center());
        particles.emit(Effect::Debris, boat.center());
    }

    if let Some(titanic) = boss.as_ref() {
        for i in 0..4 {
            let x = 49.0 + particles.roll() * 9.0 + 28.0 * i as f32;
            let at = titanic.actor.local_to_world(Vec2::new(x, 25.0));
            particles.emit(Effect::Steam, at);
        }
    }

    if player.splash {
        for _ in 0..10 {
            let x = boat.pos.x + (boat.right() - boat.pos.x) * particles.roll();
            particles.emit(Effect::Water, Vec2::new(x, water.level(x)));
        }
    }
}

fn update_powerups(state: &mut GameState) {
    for heart in state.powerups.iter_mut() {
        heart.update(&state.water);
    }
    swap_remove_where(&mut state.powerups, |p| {
        p.actor.is_dead() || p.actor.right() < 0.0
    });
}

/// Take a hit: lose a heart (unless invincible) and blink either way
fn damage_player(state: &mut GameState) {
    if !state.flags.invincible {
        state.health.damage();
        let center = state.player.actor.center();
        for _ in 0..10 {
            let scatter = Vec2::new(state.particles.roll() * 26.0, state.particles.roll() * 10.0);
            state.particles.emit(Effect::Debris, center + scatter);
        }
    }
    state.player.blinks += HIT_BLINKS;
    state.events.push(GameEvent::PlayerDamaged);
}

/// The ball that struck a target
struct Shot {
    vel: Vec2,
    special: bool,
}

/// First player ball touching `target`, removed from play unless it is a
/// heavy shot that keeps going
fn take_hit(target: &mut Actor, balls: &mut Vec<Cannon>, stops_heavy: bool) -> Option<Shot> {
    if target.is_dying() {
        return None;
    }
    let j = balls.iter_mut().position(|b| collides(target, &mut b.actor))?;
    let shot = Shot {
        vel: balls[j].actor.vel,
        special: balls[j].special,
    };
    if stops_heavy || !shot.special {
        balls.swap_remove(j);
    }
    Some(shot)
}

fn check_collisions(state: &mut GameState) {
    let hits = player_contacts(state);
    for _ in 0..hits {
        damage_player(state);
    }
    cannon_hits(state);
}

/// Things the player runs into; returns how many of them hurt
fn player_contacts(state: &mut GameState) -> usize {
    let GameState {
        player,
        health,
        powerups,
        mines,
        sharks,
        enemy_cannons,
        player_cannons,
        events,
        ..
    } = state;
    let boat = &mut player.actor;
    let mut hits = 0;

    for heart in powerups.iter_mut() {
        if !heart.fading() && !boat.is_dying() && collides(boat, &mut heart.actor) {
            health.add();
            heart.pick_up();
            events.push(GameEvent::PowerupCollected);
        }
    }

    for mine in mines.iter_mut() {
        if !mine.exploding() && !boat.is_dying() && collides(boat, &mut mine.actor) {
            mine.explode();
            events.push(GameEvent::Explosion);
            hits += 1;
        }
    }

    for shark in sharks.iter_mut() {
        if !shark.actor.is_dying() && !boat.is_dying() && collides(boat, &mut shark.actor) {
            shark.actor.damage(1);
            events.push(GameEvent::Hit {
                kind: ActorKind::Shark,
            });
            hits += 1;
        }
    }

    // Any ball falling back onto the hull hurts, the player's own included
    for balls in [enemy_cannons, player_cannons] {
        let mut i = 0;
        while i < balls.len() {
            if !boat.is_dying() && collides(boat, &mut balls[i].actor) {
                balls.swap_remove(i);
                hits += 1;
            } else {
                i += 1;
            }
        }
    }

    hits
}

/// Player balls against every enemy kind
fn cannon_hits(state: &mut GameState) {
    let GameState {
        player_cannons,
        sharks,
        seagulls,
        pirates,
        boss,
        score,
        particles,
        events,
        ..
    } = state;

    for shark in sharks.iter_mut() {
        if let Some(shot) = take_hit(&mut shark.actor, player_cannons, false) {
            score.add(SHARK_POINTS);
            shark.actor.damage(1);
            shark.actor.vel += shot.vel * KNOCKBACK;
            events.push(GameEvent::Hit {
                kind: ActorKind::Shark,
            });
        }
    }

    for gull in seagulls.iter_mut() {
        if let Some(shot) = take_hit(&mut gull.actor, player_cannons, false) {
            score.add(SEAGULL_POINTS);
            gull.actor.damage(1);
            gull.actor.vel += shot.vel * KNOCKBACK;
            events.push(GameEvent::Hit {
                kind: ActorKind::Seagull,
            });
        }
    }

    for pirate in pirates.iter_mut() {
        if take_hit(&mut pirate.actor, player_cannons, false).is_some() {
            score.add(PIRATE_POINTS);
            pirate.actor.damage(1);
            let center = pirate.actor.center();
            for _ in 0..6 {
                let splinter = Vec2::new(particles.roll() * 15.0, particles.roll() * 30.0 - 10.0);
                particles.emit(Effect::Wood, center + splinter);
            }
            events.push(GameEvent::Hit {
                kind: ActorKind::Pirate,
            });
        }
    }

    if let Some(titanic) = boss.as_mut() {
        if let Some(shot) = take_hit(&mut titanic.actor, player_cannons, true) {
            let (damage, points) = if shot.special {
                (BOSS_HEAVY_DAMAGE, BOSS_HEAVY_POINTS)
            } else {
                (1, BOSS_POINTS)
            };
            score.add(points);
            if titanic.actor.damage(damage) {
                log::info!("Titanic is going down");
            }
            events.push(GameEvent::Hit {
                kind: ActorKind::Boss,
            });
        }
    }
}

/// Health at zero starts the sinking; a fully sunk boat ends the session
fn update_player_lifecycle(state: &mut GameState) {
    if state.health.life() == 0 && !state.player.actor.is_dying() {
        state.player.die();
        state.events.push(GameEvent::PlayerSunk);
        log::info!("Player sinking at tick {}", state.t);
    } else if state.player.actor.is_dead() && state.game_over.is_none() {
        state.game_over = Some(GameOver::Sunk);
        log::info!("Game over, final score {}", state.final_score());
    }
}

/// Built-in pilot for demos and headless runs
///
/// Keeps the boat near the left of the screen (detouring for hearts), hops
/// over mines, sharks and incoming fire, and shoots whenever anything is in
/// play.
pub fn autopilot(state: &GameState) -> TickInput {
    let boat = &state.player.actor;
    let bow = boat.right();
    let ahead = |x: f32, reach: f32| x > boat.pos.x - 10.0 && x < bow + reach;

    let threatened = state
        .mines
        .iter()
        .any(|m| !m.exploding() && ahead(m.actor.pos.x, 40.0))
        || state
            .sharks
            .iter()
            .any(|s| s.actor.is_alive() && ahead(s.actor.pos.x, 30.0))
        || state
            .enemy_cannons
            .iter()
            .any(|c| c.actor.center().distance(boat.center()) < 50.0);

    let goal = state
        .powerups
        .iter()
        .filter(|p| !p.fading())
        .map(|p| p.actor.pos.x)
        .fold(None, |best: Option<f32>, x| Some(best.map_or(x, |b| b.min(x))))
        .unwrap_or(60.0);

    let targets = !state.sharks.is_empty()
        || !state.pirates.is_empty()
        || !state.seagulls.is_empty()
        || state.boss.is_some();

    TickInput {
        left: boat.pos.x > goal + 8.0,
        right: boat.pos.x < goal - 8.0,
        jump: threatened,
        fire: targets,
        fire_special: state.boss.is_some() || !state.pirates.is_empty(),
        pause: false,
        autopilot: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::level::Mode;
    use crate::sim::sprite::{Sprite, SpriteBank, SpriteId};
    use crate::sim::state::CoreFlags;

    fn state() -> GameState {
        GameState::new(Mode::Story, 12345, CoreFlags::default(), SpriteBank::placeholder())
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    /// A normal ball sitting on `center`
    fn ball_on(s: &GameState, center: Vec2, heading: Heading) -> Cannon {
        Cannon::launch(&s.sprites, center - Vec2::splat(3.0), 0.0, heading, false)
    }

    fn heavy_on(s: &GameState, center: Vec2) -> Cannon {
        Cannon::launch(&s.sprites, center - Vec2::new(6.0, 3.5), 0.0, Heading::Right, true)
    }

    #[test]
    fn test_single_fire_yields_one_cannon() {
        let mut s = state();
        tick(&mut s, &fire());
        for _ in 0..MIN_FIRE_DELAY {
            tick(&mut s, &TickInput::default());
        }
        assert_eq!(s.player_cannons.len(), 1);
        assert!(s.events.contains(&GameEvent::CannonFired { special: false }));
    }

    #[test]
    fn test_fire_is_rate_limited() {
        let mut s = state();
        tick(&mut s, &fire());
        tick(&mut s, &fire());
        assert_eq!(s.player_cannons.len(), 1);
        tick(&mut s, &fire());
        assert_eq!(s.player_cannons.len(), 2);
    }

    #[test]
    fn test_balls_pruned_on_exit() {
        let mut s = state();
        let sprites = SpriteBank::placeholder();
        let start = Vec2::new(FIELD_WIDTH - 5.0, 100.0);
        let mut right = Cannon::launch(&sprites, start, 0.0, Heading::Right, false);
        right.actor.vel = Vec2::new(10.0, 0.0);
        s.player_cannons.push(right);
        let mut left = Cannon::launch(&sprites, Vec2::new(-5.0, 100.0), 0.0, Heading::Left, false);
        left.actor.vel = Vec2::new(-10.0, 0.0);
        s.enemy_cannons.push(left);

        tick(&mut s, &TickInput::default());
        assert!(s.player_cannons.is_empty());
        assert!(s.enemy_cannons.is_empty());
    }

    #[test]
    fn test_empty_health_starts_sinking_then_game_over() {
        let mut s = state();
        for _ in 0..MAX_HEARTS {
            s.health.damage();
        }
        assert_eq!(s.health.life(), 0);
        assert!(!s.player.actor.is_dying());

        tick(&mut s, &TickInput::default());
        assert!(s.player.actor.is_dying());
        assert!(s.events.contains(&GameEvent::PlayerSunk));

        for _ in 0..500 {
            tick(&mut s, &TickInput::default());
        }
        assert_eq!(s.game_over, Some(GameOver::Sunk));
    }

    #[test]
    fn test_invincible_player_only_blinks() {
        let flags = CoreFlags {
            invincible: true,
            particles: true,
        };
        let mut s = GameState::new(Mode::Story, 1, flags, SpriteBank::placeholder());
        damage_player(&mut s);
        assert_eq!(s.health.life(), MAX_HEARTS);
        assert_eq!(s.player.blinks, HIT_BLINKS);
        assert!(s.events.contains(&GameEvent::PlayerDamaged));
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut s = state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut s, &pause);
        tick(&mut s, &fire());
        assert_eq!(s.t, 0);
        assert!(s.player_cannons.is_empty());
        tick(&mut s, &pause);
        assert_eq!(s.t, 1);
    }

    #[test]
    fn test_first_tick_announces_phase() {
        let mut s = state();
        tick(&mut s, &TickInput::default());
        assert!(s.events.contains(&GameEvent::PhaseStarted { phase: 0 }));
    }

    #[test]
    fn test_shark_hit_scores_and_consumes_ball() {
        let mut s = state();
        let mut shark = Shark::new(&s.sprites);
        shark.actor.pos = Vec2::new(200.0, 100.0);
        let center = shark.actor.center();
        s.sharks.push(shark);
        let ball = ball_on(&s, center, Heading::Right);
        let ball_vel = ball.actor.vel;
        s.player_cannons.push(ball);

        check_collisions(&mut s);
        assert_eq!(s.score.target(), SHARK_POINTS);
        assert!(s.sharks[0].actor.is_dying());
        assert!(s.player_cannons.is_empty());
        // Knocked along with the ball
        assert!(s.sharks[0].actor.vel.x > 0.0);
        assert!((s.sharks[0].actor.vel.x - ball_vel.x * KNOCKBACK.x).abs() < 1e-4);
    }

    #[test]
    fn test_heavy_shot_passes_through_shark_but_not_boss() {
        let mut s = state();
        let mut shark = Shark::new(&s.sprites);
        shark.actor.pos = Vec2::new(200.0, 100.0);
        let center = shark.actor.center();
        s.sharks.push(shark);
        let heavy = heavy_on(&s, center);
        s.player_cannons.push(heavy);
        check_collisions(&mut s);
        assert_eq!(s.player_cannons.len(), 1);
        assert!(s.sharks[0].actor.is_dying());

        let mut s = state();
        let mut boss = Boss::new(&s.sprites, &s.water);
        boss.actor.pos = Vec2::new(200.0, 100.0);
        let center = boss.actor.center();
        s.boss = Some(boss);
        let heavy = heavy_on(&s, center);
        s.player_cannons.push(heavy);
        check_collisions(&mut s);
        assert!(s.player_cannons.is_empty());
        assert_eq!(s.score.target(), BOSS_HEAVY_POINTS);
        assert_eq!(s.boss.as_ref().map(|b| b.actor.life), Some(Boss::LIFE - BOSS_HEAVY_DAMAGE));
    }

    #[test]
    fn test_pirate_hit_scores_and_splinters() {
        let mut s = state();
        let mut pirate = Pirate::new(&s.sprites, &s.water);
        pirate.actor.pos = Vec2::new(200.0, 100.0);
        let center = pirate.actor.center();
        s.pirates.push(pirate);
        let ball = ball_on(&s, center, Heading::Right);
        s.player_cannons.push(ball);

        check_collisions(&mut s);
        assert_eq!(s.score.target(), PIRATE_POINTS);
        assert_eq!(s.pirates[0].actor.life, Pirate::LIFE - 1);
        assert!(s.pirates[0].actor.is_alive());
        assert!(s.player_cannons.is_empty());
        assert!(s.events.contains(&GameEvent::Hit {
            kind: ActorKind::Pirate
        }));
    }

    #[test]
    fn test_seagull_hit_scores() {
        let mut s = state();
        let mut gull = Seagull::new(&s.sprites, &mut s.rng);
        gull.actor.pos = Vec2::new(200.0, 100.0);
        let center = gull.actor.center();
        s.seagulls.push(gull);
        let ball = ball_on(&s, center, Heading::Right);
        s.player_cannons.push(ball);

        check_collisions(&mut s);
        assert_eq!(s.score.target(), SEAGULL_POINTS);
        assert!(s.seagulls[0].actor.is_dying());
        assert!(s.player_cannons.is_empty());
    }

    #[test]
    fn test_normal_shot_chips_the_boss() {
        let mut s = state();
        let mut boss = Boss::new(&s.sprites, &s.water);
        boss.actor.pos = Vec2::new(200.0, 100.0);
        let center = boss.actor.center();
        s.boss = Some(boss);
        let ball = ball_on(&s, center, Heading::Right);
        s.player_cannons.push(ball);

        check_collisions(&mut s);
        assert_eq!(s.score.target(), BOSS_POINTS);
        assert_eq!(s.boss.as_ref().map(|b| b.actor.life), Some(Boss::LIFE - 1));
        assert!(s.player_cannons.is_empty());
    }

    #[test]
    fn test_pirate_fires_on_cadence() {
        let mut s = state();
        let mut pirate = Pirate::new(&s.sprites, &s.water);
        pirate.actor.ticks = Pirate::FIRE_INTERVAL - 1;
        s.pirates.push(pirate);

        update_enemies(&mut s);
        assert_eq!(s.enemy_cannons.len(), 1);
        assert!(s.enemy_cannons[0].actor.vel.x < 0.0);
        assert!(s.events.contains(&GameEvent::EnemyFired));

        update_enemies(&mut s);
        assert_eq!(s.enemy_cannons.len(), 1);
    }

    #[test]
    fn test_enemy_ball_hurts_player() {
        let mut s = state();
        // The hull drops one pixel during the tick; the ball stays put
        let center = s.player.actor.center();
        let mut ball = ball_on(&s, center, Heading::Left);
        ball.actor.vel = Vec2::ZERO;
        s.enemy_cannons.push(ball);

        tick(&mut s, &TickInput::default());
        assert_eq!(s.health.life(), MAX_HEARTS - 1);
        assert!(s.enemy_cannons.is_empty());
        assert!(s.events.contains(&GameEvent::PlayerDamaged));
    }

    #[test]
    fn test_own_ball_hurts_player() {
        let mut s = state();
        let center = s.player.actor.center();
        let ball = ball_on(&s, center, Heading::Right);
        s.player_cannons.push(ball);

        check_collisions(&mut s);
        assert_eq!(s.health.life(), MAX_HEARTS - 1);
        assert!(s.player_cannons.is_empty());
        assert_eq!(s.player.blinks, HIT_BLINKS);
    }

    #[test]
    fn test_mine_contact_explodes_and_hurts() {
        let mut s = state();
        let mut mine = Mine::new(&s.sprites, &s.water, &mut s.rng);
        mine.actor.pos = s.player.actor.center() - Vec2::splat(7.0);
        s.mines.push(mine);

        check_collisions(&mut s);
        assert!(s.mines[0].exploding());
        assert_eq!(s.health.life(), MAX_HEARTS - 1);
        assert_eq!(s.player.blinks, HIT_BLINKS);
    }

    #[test]
    fn test_heart_restores_life() {
        let mut s = state();
        s.health.damage();
        let mut heart = Powerup::new(&s.sprites, &s.water);
        heart.actor.pos = s.player.actor.center() - Vec2::splat(7.0);
        s.powerups.push(heart);

        check_collisions(&mut s);
        assert_eq!(s.health.life(), MAX_HEARTS);
        assert!(s.powerups[0].fading());
    }

    #[test]
    fn test_sunk_boss_is_victory() {
        let mut s = state();
        let mut boss = Boss::new(&s.sprites, &s.water);
        assert!(boss.actor.die());
        s.boss = Some(boss);

        for _ in 0..300 {
            tick(&mut s, &TickInput::default());
            if s.game_over.is_some() {
                break;
            }
        }
        assert_eq!(s.game_over, Some(GameOver::Victory));
        assert!(s.boss.is_none());
        assert!(s.events.contains(&GameEvent::BossSunk));
    }

    #[test]
    fn test_no_spawns_after_game_over() {
        let mut s = state();
        s.game_over = Some(GameOver::Sunk);
        for _ in 0..200 {
            tick(&mut s, &TickInput::default());
        }
        assert!(s.sharks.is_empty());
        assert_eq!(s.level.ticks_in_phase(), 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut a = state();
        let mut b = state();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..900 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.t, b.t);
        assert_eq!(a.score, b.score);
        assert_eq!(a.actor_count(), b.actor_count());
        assert_eq!(a.player.actor.pos, b.player.actor.pos);
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_frameless_artwork_still_plays() {
        let mut sprites = SpriteBank::placeholder();
        sprites.insert(Sprite::new(SpriteId::Cloud, Vec::new()));
        sprites.insert(Sprite::new(SpriteId::Shark, Vec::new()));
        let mut s = GameState::new(Mode::Story, 12345, CoreFlags::default(), sprites);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut s, &input);
        }
        assert_eq!(s.t, 200);
    }

    #[test]
    fn test_particle_setting_does_not_change_gameplay() {
        let quiet = CoreFlags {
            invincible: false,
            particles: false,
        };
        let mut a = state();
        let mut b = GameState::new(Mode::Story, 12345, quiet, SpriteBank::placeholder());
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert!(b.particles.is_empty());
        assert_eq!(a.score, b.score);
        assert_eq!(a.mines.len(), b.mines.len());
        assert_eq!(a.player.actor.pos, b.player.actor.pos);
    }
}
